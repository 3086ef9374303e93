//! Shared types used across roombook modules
//!
//! Contains the booking request/result pair exchanged with the automation
//! engine and the chat passthrough payloads.

use serde::{Deserialize, Serialize};

use crate::booking::clock::ClockTime;
use crate::core::error::{Result, RoombookError};

/// Room name reported when no dropdown option matched the configured room
/// code and the booking proceeded without a confirmed room.
pub const FALLBACK_ROOM_NAME: &str = "Selected Room";

/// A validated room booking request.
///
/// Immutable input to the engine; `validate` is the boundary check the HTTP
/// handler runs before anything reaches the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Calendar date, e.g. "2024-05-01"
    pub date: String,
    /// Start time in 24-hour "HH:MM" form
    #[serde(rename = "startTime", alias = "time")]
    pub start_time: String,
    /// Booking length in minutes
    #[serde(rename = "durationMinutes", alias = "duration")]
    pub duration_minutes: u32,
    /// Number of attendees
    #[serde(rename = "attendeeCount", alias = "attendees", default = "default_attendees")]
    pub attendee_count: u32,
}

fn default_attendees() -> u32 {
    1
}

impl BookingRequest {
    /// Check required-field presence and formats before the engine runs.
    pub fn validate(&self) -> Result<()> {
        if self.date.trim().is_empty() {
            return Err(RoombookError::invalid("Missing required field: date"));
        }
        self.start_time
            .parse::<ClockTime>()
            .map_err(|e| RoombookError::invalid(format!("Invalid startTime: {}", e)))?;
        if self.duration_minutes == 0 {
            return Err(RoombookError::invalid("duration must be positive"));
        }
        if self.attendee_count == 0 {
            return Err(RoombookError::invalid("attendees must be positive"));
        }
        Ok(())
    }

    /// Parsed start time. Callers must have validated the request.
    pub fn start(&self) -> Result<ClockTime> {
        self.start_time
            .parse::<ClockTime>()
            .map_err(|e| RoombookError::invalid(format!("Invalid startTime: {}", e)))
    }
}

/// Details of a completed booking attempt.
///
/// Produced once per successful run and never mutated afterwards. The wire
/// shape matches what the portal response consumers already expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResult {
    /// Resolved room label, or [`FALLBACK_ROOM_NAME`] when no option matched
    pub room_name: String,
    /// Echo of the requested date
    pub date: String,
    /// Formatted "<start> - <end>" range in 12-hour form
    #[serde(rename = "time")]
    pub time_range: String,
    /// Echo of the requested attendee count
    pub capacity: u32,
}

impl BookingResult {
    /// Human-readable confirmation line for response envelopes.
    pub fn summary(&self) -> String {
        format!(
            "Booked {} on {} from {}",
            self.room_name, self.date, self.time_range
        )
    }
}

/// Inbound chat message for the passthrough endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "agentId", default)]
    pub agent_id: Option<String>,
    #[serde(rename = "conversationId", default)]
    pub conversation_id: Option<String>,
}

/// Outbound chat reply
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(rename = "agentId")]
    pub agent_id: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}
