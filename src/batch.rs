use crate::calendar::models::CalendarEvent;
use crate::calendar::CalendarApi;
use crate::datetime::parse_datetime;
use crate::error::{validation_error, CalResult, Error};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// One CSV row describing an event to create. Header names are matched
/// case-sensitively.
#[derive(Debug, Deserialize)]
pub struct InputRow {
    pub date: String,
    #[serde(rename = "start time")]
    pub start_time: String,
    #[serde(rename = "end time")]
    pub end_time: String,
    #[serde(rename = "event name")]
    pub event_name: String,
}

/// Outcome of a single data row, 1-based over data rows (header excluded)
#[derive(Debug)]
pub enum RowOutcome {
    Created { row: usize, summary: String },
    Failed { row: usize, error: Error },
}

/// Typed per-row results for a create batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RowOutcome>,
}

impl BatchReport {
    /// Number of events successfully created
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Created { .. }))
            .count()
    }

    pub fn failures(&self) -> Vec<(usize, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                RowOutcome::Failed { row, error } => Some((*row, error)),
                RowOutcome::Created { .. } => None,
            })
            .collect()
    }
}

/// Interactive yes/no gate for destructive operations
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> CalResult<bool>;
}

/// Stdin-backed confirmation prompt
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> CalResult<bool> {
        print!("{} (y/N): ", prompt);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Only an explicit yes counts; anything else cancels
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Sequential create/delete operations against a calendar
pub struct BatchOperations<'a, C: CalendarApi> {
    client: &'a C,
    timezone: Tz,
}

impl<'a, C: CalendarApi> BatchOperations<'a, C> {
    pub fn new(client: &'a C, timezone: Tz) -> Self {
        Self { client, timezone }
    }

    /// Create one event per CSV row, in file order. A bad row (missing
    /// fields, unparseable date/time, or a remote failure) is recorded in the
    /// report and the batch continues with the next row.
    pub async fn create_events_from_csv(&self, path: &Path) -> CalResult<BatchReport> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            validation_error(&format!("Failed to open CSV file {}: {}", path.display(), e))
        })?;

        let mut report = BatchReport::default();
        for (index, record) in reader.deserialize::<InputRow>().enumerate() {
            let row = index + 1;
            let result = match record {
                Ok(input) => self.create_one(&input).await,
                Err(e) => Err(Error::from(e)),
            };

            match result {
                Ok(summary) => report.outcomes.push(RowOutcome::Created { row, summary }),
                Err(error) => {
                    warn!("Row {} failed: {}", row, error);
                    println!("Error creating event for row {}: {}", row, error);
                    report.outcomes.push(RowOutcome::Failed { row, error });
                }
            }
        }

        info!(
            "Create batch finished: {} created, {} failed",
            report.created(),
            report.failures().len()
        );
        println!("\nTotal events created: {}", report.created());
        Ok(report)
    }

    async fn create_one(&self, input: &InputRow) -> CalResult<String> {
        let date = input.date.trim();
        let start_time = input.start_time.trim();
        let end_time = input.end_time.trim();
        let event_name = input.event_name.trim();

        if date.is_empty() || start_time.is_empty() || end_time.is_empty() || event_name.is_empty()
        {
            return Err(validation_error(
                "Row is missing one of the required fields: date, start time, end time, event name",
            ));
        }

        let start = parse_datetime(date, start_time)?;
        let end = parse_datetime(date, end_time)?;

        let event = CalendarEvent::timed(event_name, start, end, self.timezone);
        self.client.insert_event(&event).await?;

        println!(
            "Created: {} on {} from {} to {}",
            event_name, date, start_time, end_time
        );
        Ok(event_name.to_string())
    }

    /// Delete every event whose start time falls between start_date 00:00:00
    /// and end_date 23:59:59 UTC. Prints a preview and, unless `force`, asks
    /// for confirmation before deleting anything. Returns the number of
    /// events actually deleted.
    pub async fn delete_events_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        force: bool,
        confirm: &mut dyn Confirm,
    ) -> CalResult<usize> {
        let time_min = start_date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| validation_error("Failed to construct range start timestamp"))?
            .and_utc()
            .to_rfc3339();
        let time_max = end_date
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| validation_error("Failed to construct range end timestamp"))?
            .and_utc()
            .to_rfc3339();

        println!(
            "Searching for events between {} and {}...",
            start_date, end_date
        );
        let events = self.client.list_events(&time_min, &time_max).await?;

        if events.is_empty() {
            println!("No events found in the specified date range.");
            return Ok(0);
        }

        println!("Found {} events to delete:", events.len());
        for event in &events {
            println!("  - {} ({})", event.title(), event.start_display());
        }

        if !force {
            let prompt = format!(
                "\nAre you sure you want to delete these {} events?",
                events.len()
            );
            if !confirm.confirm(&prompt)? {
                println!("Deletion cancelled.");
                return Ok(0);
            }
        }

        let mut deleted = 0;
        for event in &events {
            match self.client.delete_event(&event.id).await {
                Ok(()) => {
                    println!("Deleted: {}", event.title());
                    deleted += 1;
                }
                Err(e) => {
                    warn!("Failed to delete event {}: {}", event.id, e);
                    println!("Error deleting event {}: {}", event.title(), e);
                }
            }
        }

        println!("\nTotal events deleted: {}", deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("  YES \n"));
        assert!(is_affirmative("Y\n"));
    }

    #[test]
    fn non_affirmative_answers() {
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yeah"));
        assert!(!is_affirmative("sure"));
    }
}
