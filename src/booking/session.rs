//! Session lifecycle for booking attempts
//!
//! Exactly one isolated browser session exists per attempt. Credentials are
//! checked before anything is launched, and the session is torn down on every
//! exit path - success, classified failure, or timeout - before the outcome
//! reaches the caller.

use crate::booking::driver::AgentBrowserPage;
use crate::booking::navigator::Navigator;
use crate::booking::page::PortalPage;
use crate::core::config::PortalConfig;
use crate::core::types::{BookingRequest, BookingResult};
use crate::core::Result;

/// Run one booking attempt against the live portal.
pub async fn book(portal: &PortalConfig, request: &BookingRequest) -> Result<BookingResult> {
    // Fail fast on missing credentials; no browser gets launched.
    portal.credentials()?;

    let page = AgentBrowserPage::launch(portal).await?;
    tracing::info!(session = page.session_name(), date = %request.date, "booking attempt started");
    run_session(portal, request, &page).await
}

/// Run one booking attempt over an already-acquired page.
///
/// The page is closed before this returns, whatever the outcome; close
/// failures are swallowed by the page itself and never mask the result.
pub async fn run_session(
    portal: &PortalConfig,
    request: &BookingRequest,
    page: &dyn PortalPage,
) -> Result<BookingResult> {
    let credentials = portal.credentials()?;

    let outcome = Navigator::new(portal, credentials).run(page, request).await;
    page.close().await;

    match &outcome {
        Ok(result) => {
            tracing::info!(room = %result.room_name, range = %result.time_range, "booking attempt succeeded")
        }
        Err(err) => tracing::warn!(%err, "booking attempt failed"),
    }
    outcome
}
