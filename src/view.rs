//! Home view state: what one page load ends up showing.
//!
//! `Loading -> {Error | Content}` is the only transition. `Content` is further
//! classified as empty or not, which is derived rather than a separate state.

use crate::summary::{NormalizedSummary, SummaryPayload, Topic, TopicSet};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;
use thiserror::Error;

/// The only error text the reader ever sees.
pub const LOAD_ERROR_MESSAGE: &str = "Could not load the news summary.";

#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    #[error("unrecognized timestamp: {0:?}")]
    Unparseable(String),
    #[error("timestamp does not exist in the local time zone: {0:?}")]
    NoLocalTime(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Empty,
    NonEmpty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub topics: Vec<Topic>,
    pub created_at: Option<String>,
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        if self.topics.is_empty() {
            ContentKind::Empty
        } else {
            ContentKind::NonEmpty
        }
    }

    /// `created_at` rendered for the update line, `None` when the payload had no
    /// timestamp or a blank one.
    pub fn updated_at(&self) -> Option<String> {
        self.created_at
            .as_deref()
            .filter(|created_at| !created_at.trim().is_empty())
            .map(format_update_time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Error(String),
    Content(Content),
}

impl ViewState {
    /// Classify a normalized summary.
    pub fn from_summary(summary: NormalizedSummary) -> Self {
        let NormalizedSummary { topics, created_at } = summary;
        if topics.is_empty() {
            return ViewState::Content(Content {
                topics: Vec::new(),
                created_at,
            });
        }
        match topics {
            TopicSet::List(topics) => ViewState::Content(Content { topics, created_at }),
            TopicSet::Opaque(value) => {
                tracing::warn!(payload = %value, "summary payload has no renderable topics");
                ViewState::Error(LOAD_ERROR_MESSAGE.to_string())
            }
        }
    }
}

/// State of one page load.
#[derive(Debug)]
pub struct HomeView {
    state: ViewState,
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Apply the outcome of the summary fetch.
    ///
    /// Only the first outcome counts; there is no way back to `Loading`.
    pub fn settle<E: Display>(&mut self, outcome: Result<SummaryPayload, E>) -> &ViewState {
        if !self.is_loading() {
            tracing::debug!("ignoring fetch outcome for a settled view");
            return &self.state;
        }
        self.state = match outcome {
            Ok(payload) => {
                tracing::debug!(shape = payload.shape(), "summary received");
                ViewState::from_summary(payload.normalize())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load summary");
                ViewState::Error(LOAD_ERROR_MESSAGE.to_string())
            }
        };
        &self.state
    }
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}

/// Format `created_at` as `YYYY.MM.DD, HH:MM` in local time, or `""` when it
/// cannot be parsed.
pub fn format_update_time(created_at: &str) -> String {
    if created_at.trim().is_empty() {
        return String::new();
    }
    match parse_timestamp(created_at) {
        Ok(time) => time.format("%Y.%m.%d, %H:%M").to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "could not format update time");
            String::new()
        }
    }
}

/// Parse an ISO 8601 timestamp into local time.
///
/// Offsets are honoured, date-times without one are local, bare dates are UTC midnight.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Local>, FormatError> {
    let input = input.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Ok(time.with_timezone(&Local));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| FormatError::NoLocalTime(input.to_string()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight).with_timezone(&Local));
        }
    }

    Err(FormatError::Unparseable(input.to_string()))
}
