//! Booking page navigation
//!
//! Drives a single attempt through the portal: open the booking page, detect
//! and clear a login redirect, pick room and time dropdowns heuristically,
//! submit, and verify. Room and time misses degrade the result instead of
//! failing the attempt; navigation timeouts abort it.

use std::time::Duration;

use crate::booking::clock::ClockTime;
use crate::booking::page::PortalPage;
use crate::booking::selectors::{
    normalize, try_click, try_fill, LOGIN_BUTTONS, PASSWORD_FIELDS, SUBMIT_BUTTONS,
    USERNAME_FIELDS,
};
use crate::core::config::{Credentials, PortalConfig};
use crate::core::types::{BookingRequest, BookingResult, FALLBACK_ROOM_NAME};
use crate::core::{Result, RoombookError};

/// Budget for a full page navigation.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(120);
/// Budget for network-idle after login and after returning to the booking page.
pub const LOGIN_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
/// Budget for network-idle after submitting the booking form.
pub const VERIFY_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
/// Budget for each individual click candidate in a fallback chain.
pub const CLICK_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// One booking attempt's walk through the portal.
pub struct Navigator<'a> {
    portal: &'a PortalConfig,
    credentials: Credentials,
}

impl<'a> Navigator<'a> {
    pub fn new(portal: &'a PortalConfig, credentials: Credentials) -> Self {
        Self {
            portal,
            credentials,
        }
    }

    /// Run the full flow against a live page and produce the booking result.
    pub async fn run(
        &self,
        page: &dyn PortalPage,
        request: &BookingRequest,
    ) -> Result<BookingResult> {
        let start = request.start()?;

        // Start at the booking URL; unauthenticated sessions get redirected
        // to the login page.
        page.goto(&self.portal.booking_url, NAVIGATION_TIMEOUT)
            .await?;
        let url = page.current_url().await?;
        if is_login_page(&url, &self.portal.login_url) {
            self.authenticate(page).await?;
        }

        let room_name = self.choose_room(page).await?;
        let (start_label, end_label) = self
            .choose_times(page, start, request.duration_minutes)
            .await?;
        self.submit(page).await?;
        page.wait_network_idle(VERIFY_IDLE_TIMEOUT).await?;

        Ok(BookingResult {
            room_name: room_name.unwrap_or_else(|| FALLBACK_ROOM_NAME.to_string()),
            date: request.date.clone(),
            time_range: format!("{} - {}", start_label, end_label),
            capacity: request.attendee_count,
        })
    }

    /// Clear the login redirect: fill credentials through the fallback
    /// chains, submit, and navigate back to the booking page.
    async fn authenticate(&self, page: &dyn PortalPage) -> Result<()> {
        tracing::info!("login redirect detected, authenticating");
        page.goto(&self.portal.login_url, NAVIGATION_TIMEOUT).await?;

        if !try_fill(page, USERNAME_FIELDS, &self.credentials.username)
            .await
            .succeeded()
        {
            return Err(RoombookError::interaction(
                "could not locate a username field on the login page",
            ));
        }
        if !try_fill(page, PASSWORD_FIELDS, &self.credentials.password)
            .await
            .succeeded()
        {
            return Err(RoombookError::interaction(
                "could not locate a password field on the login page",
            ));
        }

        let submit = try_click(page, LOGIN_BUTTONS, CLICK_ATTEMPT_TIMEOUT).await;
        if !submit.succeeded() {
            // Last resort: submit whichever field still has focus.
            page.press("Enter").await?;
        }

        page.wait_network_idle(LOGIN_IDLE_TIMEOUT).await?;
        page.goto(&self.portal.booking_url, NAVIGATION_TIMEOUT)
            .await?;
        page.wait_network_idle(LOGIN_IDLE_TIMEOUT).await?;
        Ok(())
    }

    /// Pick the first dropdown offering the configured room code.
    ///
    /// No match, or a failed select, leaves the form as-is and reports no
    /// confirmed room.
    async fn choose_room(&self, page: &dyn PortalPage) -> Result<Option<String>> {
        let target = normalize(&self.portal.room_code);
        let controls = page.select_controls().await?;

        for control in &controls {
            let matched = control
                .options
                .iter()
                .find(|option| normalize(option) == target);
            if let Some(label) = matched {
                match page.select_by_label(control.index, label).await {
                    Ok(()) => {
                        tracing::info!(room = %label, control = control.index, "room selected");
                        return Ok(Some(label.trim().to_string()));
                    }
                    Err(err) => {
                        tracing::debug!(control = control.index, %err, "room select missed");
                    }
                }
            }
        }

        tracing::warn!(
            room_code = %self.portal.room_code,
            "no dropdown matched the room code, proceeding without a confirmed room"
        );
        Ok(None)
    }

    /// Set start and end times on the first two am/pm dropdowns in page order.
    ///
    /// Either selection failing is tolerated; the labels are still used for
    /// the result's time range.
    async fn choose_times(
        &self,
        page: &dyn PortalPage,
        start: ClockTime,
        duration_minutes: u32,
    ) -> Result<(String, String)> {
        let start_label = start.to_label();
        let end_label = start.add_minutes(duration_minutes).to_label();

        let controls = page.select_controls().await?;
        let pickers: Vec<_> = controls
            .iter()
            .filter(|control| {
                let joined = control.joined_options();
                joined.contains("am") || joined.contains("pm")
            })
            .collect();

        if pickers.len() >= 2 {
            if let Err(err) = page.select_by_label(pickers[0].index, &start_label).await {
                tracing::debug!(label = %start_label, %err, "start time select missed");
            }
            if let Err(err) = page.select_by_label(pickers[1].index, &end_label).await {
                tracing::debug!(label = %end_label, %err, "end time select missed");
            }
        } else {
            tracing::warn!(
                found = pickers.len(),
                "expected two time pickers, leaving times untouched"
            );
        }

        Ok((start_label, end_label))
    }

    /// Click a likely submit button. All candidates missing is a hard failure.
    async fn submit(&self, page: &dyn PortalPage) -> Result<()> {
        let outcome = try_click(page, SUBMIT_BUTTONS, CLICK_ATTEMPT_TIMEOUT).await;
        if !outcome.succeeded() {
            return Err(RoombookError::submission(
                "no submit button candidate matched on the booking page",
            ));
        }
        Ok(())
    }
}

/// Whether a landed URL is the portal's login page.
fn is_login_page(url: &str, login_url: &str) -> bool {
    url.contains("login") || url.contains("signin") || url.starts_with(login_url)
}
