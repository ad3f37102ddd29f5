use clap::Parser;
use gcal_sync::auth::CredentialStore;
use gcal_sync::batch::{BatchOperations, StdinConfirm};
use gcal_sync::calendar::GoogleCalendarClient;
use gcal_sync::cli::{self, Cli, Command};
use gcal_sync::config::Config;
use gcal_sync::error::CalResult;
use gcal_sync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let cli = Cli::parse();

    // Flag validation happens before credentials or any network call
    let command = match cli.command()? {
        Some(command) => command,
        None => {
            cli::print_usage_examples();
            return Ok(());
        }
    };

    let config = startup::load_config()?;
    run(command, config).await?;

    Ok(())
}

async fn run(command: Command, config: Config) -> CalResult<()> {
    let store = CredentialStore::new(&config);
    let token = store.get_credentials().await?;

    let client = GoogleCalendarClient::new(&config.calendar_id, &token);
    let batch = BatchOperations::new(&client, config.timezone);

    match command {
        Command::Create { file } => {
            info!("Importing events from {}", file.display());
            batch.create_events_from_csv(&file).await?;
        }
        Command::Delete { start, end, force } => {
            info!("Deleting events between {} and {}", start, end);
            batch
                .delete_events_in_range(start, end, force, &mut StdinConfirm)
                .await?;
        }
    }

    Ok(())
}
