use crate::datetime::parse_date;
use crate::error::{validation_error, CalResult};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Manage Google Calendar events from CSV files
#[derive(Debug, Parser)]
#[command(name = "gcal-sync", version, about)]
pub struct Cli {
    /// CSV file to import events from
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Start date for deletion (e.g. 28-7-2025)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date for deletion (e.g. 1-8-2025)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Delete events in the given date range
    #[arg(long)]
    pub delete: bool,

    /// Skip the delete confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Resolved action after flag validation
#[derive(Debug)]
pub enum Command {
    Create {
        file: PathBuf,
    },
    Delete {
        start: NaiveDate,
        end: NaiveDate,
        force: bool,
    },
}

impl Cli {
    /// Validate flag combinations and resolve the command to run. `None`
    /// means no action was requested and usage examples should be printed.
    /// All checks happen before any credential or network work.
    pub fn command(&self) -> CalResult<Option<Command>> {
        if self.delete {
            let (start_text, end_text) = match (&self.start, &self.end) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    return Err(validation_error(
                        "--delete requires both --start and --end dates",
                    ))
                }
            };

            let start = parse_date(start_text)?;
            let end = parse_date(end_text)?;
            if start > end {
                return Err(validation_error("Start date must be before end date"));
            }

            return Ok(Some(Command::Delete {
                start,
                end,
                force: self.force,
            }));
        }

        if let Some(file) = &self.file {
            if !file.exists() {
                return Err(validation_error(&format!(
                    "File {} not found",
                    file.display()
                )));
            }
            return Ok(Some(Command::Create { file: file.clone() }));
        }

        Ok(None)
    }
}

/// Help text shown when neither --file nor --delete is given
pub fn print_usage_examples() {
    println!("Usage examples:");
    println!("  Create events from CSV: gcal-sync -f july28.csv");
    println!("  Delete events in range: gcal-sync --delete -s 28-7-2025 -e 1-8-2025");
    println!("  Delete without confirmation: gcal-sync --delete -s 28-7-2025 -e 1-8-2025 --force");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gcal-sync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn delete_without_dates_is_a_usage_error() {
        let cli = parse(&["--delete"]);
        let err = cli.command().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("--start")));

        let cli = parse(&["--delete", "-s", "28-7-2025"]);
        assert!(cli.command().is_err());
    }

    #[test]
    fn delete_with_inverted_range_is_rejected() {
        let cli = parse(&["--delete", "-s", "1-8-2025", "-e", "28-7-2025"]);
        let err = cli.command().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("Start date")));
    }

    #[test]
    fn delete_with_valid_range_resolves() {
        let cli = parse(&["--delete", "-s", "28-7-2025", "-e", "1-8-2025", "--force"]);
        match cli.command().unwrap() {
            Some(Command::Delete { start, end, force }) => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2025, 7, 28).unwrap());
                assert_eq!(end, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn delete_takes_precedence_over_file() {
        let cli = parse(&[
            "--delete",
            "-s",
            "28-7-2025",
            "-e",
            "1-8-2025",
            "-f",
            "events.csv",
        ]);
        assert!(matches!(
            cli.command().unwrap(),
            Some(Command::Delete { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_validation_error() {
        let cli = parse(&["-f", "/definitely/not/here.csv"]);
        let err = cli.command().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("not found")));
    }

    #[test]
    fn existing_file_resolves_to_create() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "date,start time,end time,event name").unwrap();

        let path = tmp.path().to_str().unwrap().to_string();
        let cli = parse(&["-f", &path]);
        assert!(matches!(
            cli.command().unwrap(),
            Some(Command::Create { .. })
        ));
    }

    #[test]
    fn no_flags_means_no_command() {
        let cli = parse(&[]);
        assert!(cli.command().unwrap().is_none());
    }
}
