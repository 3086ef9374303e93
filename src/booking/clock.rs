//! Time arithmetic for portal time pickers
//!
//! The portal renders times as 12-hour labels ("3:00pm") while requests carry
//! 24-hour "HH:MM" strings. Pure conversions, no I/O.

use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build from hour/minute, or `None` when out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Portal-style 12-hour label: "15:00" -> "3:00pm", "00:00" -> "12:00am".
    pub fn to_label(&self) -> String {
        let suffix = if self.hour < 12 { "am" } else { "pm" };
        let h12 = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02}{}", h12, self.minute, suffix)
    }

    /// Parse a 12-hour label back into a clock time, e.g. "3:00pm" -> 15:00.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim().to_ascii_lowercase();
        let (time_part, pm) = if let Some(rest) = trimmed.strip_suffix("pm") {
            (rest.trim(), true)
        } else if let Some(rest) = trimmed.strip_suffix("am") {
            (rest.trim(), false)
        } else {
            return None;
        };

        let (h, m) = time_part.split_once(':')?;
        let h12: u8 = h.parse().ok()?;
        let minute: u8 = m.parse().ok()?;
        if !(1..=12).contains(&h12) || minute > 59 {
            return None;
        }

        let hour = match (h12, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Self::new(hour, minute)
    }

    /// Add a duration in minutes, wrapping modulo 24 hours.
    ///
    /// A booking that crosses midnight wraps to the next day's clock time
    /// while the calendar date on the request stays unchanged.
    pub fn add_minutes(&self, minutes: u32) -> Self {
        let total = (self.hour as u32 * 60 + self.minute as u32 + minutes) % MINUTES_PER_DAY;
        Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got '{}'", s))?;
        let hour: u8 = h
            .parse()
            .map_err(|_| format!("invalid hour in '{}'", s))?;
        let minute: u8 = m
            .parse()
            .map_err(|_| format!("invalid minute in '{}'", s))?;
        Self::new(hour, minute).ok_or_else(|| format!("time out of range: '{}'", s))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
