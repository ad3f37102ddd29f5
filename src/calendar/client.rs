use super::models::{CalendarEvent, EventsPage};
use crate::auth::StoredToken;
use crate::error::{remote_error, CalResult};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// The three remote operations the tool needs. A trait seam so batch
/// operations can be exercised against a mock in tests.
#[async_trait]
pub trait CalendarApi {
    /// List events with a start time inside the window, recurring events
    /// expanded to individual instances, ordered by start time
    async fn list_events(&self, time_min: &str, time_max: &str) -> CalResult<Vec<CalendarEvent>>;

    /// Insert one event, returning the identifier assigned by the service
    async fn insert_event(&self, event: &CalendarEvent) -> CalResult<String>;

    /// Delete one event by identifier
    async fn delete_event(&self, event_id: &str) -> CalResult<()>;
}

/// Authenticated facade over the Google Calendar v3 events API
pub struct GoogleCalendarClient {
    client: Client,
    calendar_id: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(calendar_id: &str, token: &StoredToken) -> Self {
        Self {
            client: Client::new(),
            calendar_id: calendar_id.to_string(),
            access_token: token.access_token.clone(),
        }
    }

    fn events_url(&self) -> CalResult<Url> {
        Url::parse(&format!("{}/{}/events", API_BASE, self.calendar_id))
            .map_err(|e| remote_error(&format!("Failed to build events URL: {}", e)))
    }

    /// Turn a non-success response into a remote error carrying the
    /// service-reported message
    async fn check(response: reqwest::Response, operation: &str) -> CalResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(remote_error(&format!(
            "Failed to {}: HTTP {} - {}",
            operation, status, error_body
        )))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_events(&self, time_min: &str, time_max: &str) -> CalResult<Vec<CalendarEvent>> {
        let mut url = self.events_url()?;
        url.query_pairs_mut()
            .append_pair("timeMin", time_min)
            .append_pair("timeMax", time_max)
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to fetch events: {}", e)))?;
        let response = Self::check(response, "fetch events").await?;

        let page: EventsPage = response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(page.items)
    }

    async fn insert_event(&self, event: &CalendarEvent) -> CalResult<String> {
        let response = self
            .client
            .post(self.events_url()?)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to insert event: {}", e)))?;
        let response = Self::check(response, "insert event").await?;

        let created: CalendarEvent = response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse insert response: {}", e)))?;

        Ok(created.id)
    }

    async fn delete_event(&self, event_id: &str) -> CalResult<()> {
        let mut url = self.events_url()?;
        url.path_segments_mut()
            .map_err(|_| remote_error("Failed to build delete URL"))?
            .push(event_id);

        let response = self
            .client
            .delete(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to delete event: {}", e)))?;
        Self::check(response, "delete event").await?;

        Ok(())
    }
}
