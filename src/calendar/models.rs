use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Event timestamp as the Calendar API represents it: a timezone-qualified
/// `dateTime` for timed events or a bare `date` for all-day events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Simplified calendar event representation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

/// One page of an events list response
#[derive(Debug, Default, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

impl CalendarEvent {
    /// Build a timed event in the given timezone. The timestamps are sent
    /// without an offset; the `timeZone` field tells the service how to
    /// interpret them.
    pub fn timed(summary: &str, start: NaiveDateTime, end: NaiveDateTime, timezone: Tz) -> Self {
        Self {
            id: String::new(),
            summary: Some(summary.to_string()),
            start: Some(EventDateTime {
                date_time: Some(start.format("%Y-%m-%dT%H:%M:%S").to_string()),
                date: None,
                time_zone: Some(timezone.name().to_string()),
            }),
            end: Some(EventDateTime {
                date_time: Some(end.format("%Y-%m-%dT%H:%M:%S").to_string()),
                date: None,
                time_zone: Some(timezone.name().to_string()),
            }),
        }
    }

    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("No title")
    }

    /// Start timestamp for display, preferring the timed form over the
    /// all-day form
    pub fn start_display(&self) -> &str {
        self.start
            .as_ref()
            .and_then(|s| s.date_time.as_deref().or(s.date.as_deref()))
            .unwrap_or("unknown start")
    }
}
