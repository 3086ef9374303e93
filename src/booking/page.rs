//! Page capability consumed by the navigation flow
//!
//! `PortalPage` is the seam between the booking logic and the live browser:
//! the navigator only ever talks to this trait, so tests can drive it with a
//! scripted page instead of a real portal.

use async_trait::async_trait;
use std::time::Duration;

use crate::booking::selectors::Selector;
use crate::core::Result;

/// A dropdown control discovered on the page, in page order.
#[derive(Debug, Clone)]
pub struct SelectControl {
    /// Position among all `<select>` elements on the page
    pub index: usize,
    /// Trimmed text of every option, in option order
    pub options: Vec<String>,
}

impl SelectControl {
    /// Combined lowercase option text, used for am/pm time-picker detection.
    pub fn joined_options(&self) -> String {
        self.options.join(" ").to_lowercase()
    }
}

/// One live page inside an isolated browser session.
///
/// Navigation-bound methods take an explicit budget and report an elapsed
/// budget as `RoombookError::NavigationTimeout`. Element interactions report
/// plain errors; fallback chains treat those as "try the next strategy".
#[async_trait]
pub trait PortalPage: Send + Sync {
    /// Navigate to a URL, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    /// URL the page currently shows.
    async fn current_url(&self) -> Result<String>;

    /// Wait until no further network activity is observed, bounded by `timeout`.
    async fn wait_network_idle(&self, timeout: Duration) -> Result<()>;

    /// Fill a form field located by `selector` with `value`.
    async fn fill(&self, selector: &Selector, value: &str) -> Result<()>;

    /// Click the element located by `selector`, bounded by `timeout`.
    async fn click(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Send a keypress to the focused element.
    async fn press(&self, key: &str) -> Result<()>;

    /// Enumerate every dropdown on the page with its option labels.
    async fn select_controls(&self) -> Result<Vec<SelectControl>>;

    /// Select the option with the given visible label on the nth dropdown.
    async fn select_by_label(&self, control_index: usize, label: &str) -> Result<()>;

    /// Tear the session down. Best-effort; implementations swallow their own
    /// cleanup failures.
    async fn close(&self);
}
