//! Booking engine end-to-end tests
//!
//! Drives the full session lifecycle against a scripted portal page: room
//! resolution, graceful degradation, timeout classification, and teardown.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use roombook::booking::clock::ClockTime;
use roombook::booking::page::{PortalPage, SelectControl};
use roombook::booking::selectors::Selector;
use roombook::booking::{book, run_session};
use roombook::core::config::PortalConfig;
use roombook::core::types::{BookingRequest, FALLBACK_ROOM_NAME};
use roombook::core::{Result, RoombookError};

const LOGIN_URL: &str = "https://members.example.com";
const BOOKING_URL: &str = "https://portal.example.com/home/calendar/roombooking";

fn portal() -> PortalConfig {
    PortalConfig {
        login_url: LOGIN_URL.to_string(),
        booking_url: BOOKING_URL.to_string(),
        headless: true,
        username: Some("user@example.com".to_string()),
        password: Some("hunter2".to_string()),
        room_code: "2-L".to_string(),
    }
}

fn request() -> BookingRequest {
    BookingRequest {
        date: "2024-05-01".to_string(),
        start_time: "15:00".to_string(),
        duration_minutes: 60,
        attendee_count: 2,
    }
}

/// A portal page that follows a fixed script.
#[derive(Default)]
struct ScriptedPage {
    /// Dropdowns on the booking page, with their option labels
    selects: Vec<Vec<String>>,
    /// Redirect the first navigation to the login page
    login_redirect: AtomicBool,
    /// Fail every network-idle wait with a timeout
    idle_times_out: bool,
    /// Refuse every form fill
    fills_fail: bool,
    /// Refuse every click
    clicks_fail: bool,

    current_url: Mutex<String>,
    visited: Mutex<Vec<String>>,
    filled: Mutex<Vec<String>>,
    pressed: Mutex<Vec<String>>,
    selections: Mutex<Vec<(usize, String)>>,
    closed: AtomicBool,
}

impl ScriptedPage {
    fn with_selects(selects: Vec<Vec<&str>>) -> Self {
        Self {
            selects: selects
                .into_iter()
                .map(|options| options.into_iter().map(String::from).collect())
                .collect(),
            ..Self::default()
        }
    }

    fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    fn selections(&self) -> Vec<(usize, String)> {
        self.selections.lock().unwrap().clone()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortalPage for ScriptedPage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        let landed = if self.login_redirect.swap(false, Ordering::SeqCst) {
            format!("{}/signin?next=roombooking", LOGIN_URL)
        } else {
            url.to_string()
        };
        *self.current_url.lock().unwrap() = landed;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.current_url.lock().unwrap().clone())
    }

    async fn wait_network_idle(&self, timeout: Duration) -> Result<()> {
        if self.idle_times_out {
            return Err(RoombookError::timeout(format!(
                "network-idle wait exceeded {}s",
                timeout.as_secs()
            )));
        }
        Ok(())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> Result<()> {
        if self.fills_fail {
            return Err(RoombookError::browser("no such element"));
        }
        self.filled
            .lock()
            .unwrap()
            .push(format!("{}={}", selector.to_query(), value));
        Ok(())
    }

    async fn click(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        if self.clicks_fail {
            return Err(RoombookError::browser(format!(
                "no element matching {}",
                selector.to_query()
            )));
        }
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.pressed.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn select_controls(&self) -> Result<Vec<SelectControl>> {
        Ok(self
            .selects
            .iter()
            .enumerate()
            .map(|(index, options)| SelectControl {
                index,
                options: options.clone(),
            })
            .collect())
    }

    async fn select_by_label(&self, control_index: usize, label: &str) -> Result<()> {
        let options = self
            .selects
            .get(control_index)
            .ok_or_else(|| RoombookError::browser("no such select"))?;
        if !options.iter().any(|o| o == label) {
            return Err(RoombookError::browser(format!("no option '{}'", label)));
        }
        self.selections
            .lock()
            .unwrap()
            .push((control_index, label.to_string()));
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Room option present, two am/pm pickers - full confirmation.
#[tokio::test]
async fn books_room_with_confirmed_match() {
    let page = ScriptedPage::with_selects(vec![
        vec!["Conference 1-A", "2-L", "3-C"],
        vec!["9:00am", "3:00pm", "4:00pm"],
        vec!["9:30am", "3:00pm", "4:00pm"],
    ]);

    let result = run_session(&portal(), &request(), &page).await.unwrap();

    assert_eq!(result.room_name, "2-L");
    assert_eq!(result.date, "2024-05-01");
    assert_eq!(result.time_range, "3:00pm - 4:00pm");
    assert_eq!(result.capacity, 2);
    assert_eq!(
        page.selections(),
        vec![
            (0, "2-L".to_string()),
            (1, "3:00pm".to_string()),
            (2, "4:00pm".to_string()),
        ]
    );
    assert!(page.is_closed());
}

/// Room codes match across case, spacing, and dash variants.
#[tokio::test]
async fn books_room_with_dash_variant_option() {
    let page = ScriptedPage::with_selects(vec![
        vec!["1-A", "2\u{2013}L"],
        vec!["9:00am", "3:00pm", "4:00pm"],
        vec!["9:30am", "3:00pm", "4:00pm"],
    ]);

    let result = run_session(&portal(), &request(), &page).await.unwrap();
    assert_eq!(result.room_name, "2\u{2013}L");
}

/// No option matches the room code - degraded result, not an error.
#[tokio::test]
async fn degrades_to_sentinel_room_when_nothing_matches() {
    let page = ScriptedPage::with_selects(vec![
        vec!["Conference 1-A", "3-C"],
        vec!["9:00am", "3:00pm", "4:00pm"],
        vec!["9:30am", "3:00pm", "4:00pm"],
    ]);

    let result = run_session(&portal(), &request(), &page).await.unwrap();

    assert_eq!(result.room_name, FALLBACK_ROOM_NAME);
    assert_eq!(result.time_range, "3:00pm - 4:00pm");
    // Time pickers are still set even without a room match.
    assert_eq!(
        page.selections(),
        vec![(1, "3:00pm".to_string()), (2, "4:00pm".to_string())]
    );
    assert!(page.is_closed());
}

/// Missing time pickers are tolerated; the computed labels still shape the result.
#[tokio::test]
async fn tolerates_missing_time_pickers() {
    let page = ScriptedPage::with_selects(vec![vec!["2-L"]]);

    let result = run_session(&portal(), &request(), &page).await.unwrap();

    assert_eq!(result.room_name, "2-L");
    assert_eq!(result.time_range, "3:00pm - 4:00pm");
    assert_eq!(page.selections(), vec![(0, "2-L".to_string())]);
}

/// The portal never reaches network-idle after login - the attempt fails
/// as a timeout and the session is still torn down.
#[tokio::test]
async fn classifies_idle_timeout_and_releases_session() {
    let page = ScriptedPage {
        idle_times_out: true,
        login_redirect: AtomicBool::new(true),
        ..ScriptedPage::with_selects(vec![vec!["2-L"]])
    };

    let err = run_session(&portal(), &request(), &page).await.unwrap_err();

    assert!(err.is_timeout(), "expected NavigationTimeout, got {:?}", err);
    assert!(page.is_closed(), "session must be released on timeout");
    // Authentication got as far as the login page before the wait expired.
    assert_eq!(page.visited(), vec![BOOKING_URL, LOGIN_URL]);
}

/// Missing credentials fail before any navigation.
#[tokio::test]
async fn missing_credentials_fail_before_navigation() {
    let mut portal = portal();
    portal.password = None;
    let page = ScriptedPage::with_selects(vec![vec!["2-L"]]);

    let err = run_session(&portal, &request(), &page).await.unwrap_err();

    assert!(matches!(err, RoombookError::Config(_)));
    assert!(page.visited().is_empty(), "no navigation may happen");
}

/// All credential-field strategies missing is an authentication failure.
#[tokio::test]
async fn unfillable_login_form_is_interaction_failure() {
    let page = ScriptedPage {
        fills_fail: true,
        login_redirect: AtomicBool::new(true),
        ..ScriptedPage::with_selects(vec![vec!["2-L"]])
    };

    let err = run_session(&portal(), &request(), &page).await.unwrap_err();

    assert!(matches!(err, RoombookError::ElementInteraction(_)));
    assert!(page.is_closed());
}

/// Every submit candidate missing fails the attempt as a submission failure.
/// The booking form has no keypress fallback, unlike the login form.
#[tokio::test]
async fn all_submit_candidates_missing_is_submission_failure() {
    let page = ScriptedPage {
        clicks_fail: true,
        ..ScriptedPage::with_selects(vec![
            vec!["Conference 1-A", "2-L"],
            vec!["9:00am", "3:00pm", "4:00pm"],
            vec!["9:30am", "3:00pm", "4:00pm"],
        ])
    };

    let err = run_session(&portal(), &request(), &page).await.unwrap_err();

    assert!(
        matches!(err, RoombookError::Submission(_)),
        "expected Submission, got {:?}",
        err
    );
    assert!(page.pressed.lock().unwrap().is_empty());
    assert!(page.is_closed(), "session must be released on failure");
    // Room and times were set before the submit chain ran out.
    assert_eq!(
        page.selections(),
        vec![
            (0, "2-L".to_string()),
            (1, "3:00pm".to_string()),
            (2, "4:00pm".to_string()),
        ]
    );
}

/// The authenticated path fills username then password through the chains.
#[tokio::test]
async fn login_redirect_fills_credentials() {
    let page = ScriptedPage {
        login_redirect: AtomicBool::new(true),
        ..ScriptedPage::with_selects(vec![
            vec!["2-L"],
            vec!["9:00am", "3:00pm", "4:00pm"],
            vec!["9:30am", "3:00pm", "4:00pm"],
        ])
    };

    let result = run_session(&portal(), &request(), &page).await.unwrap();
    assert_eq!(result.room_name, "2-L");

    let filled = page.filled.lock().unwrap().clone();
    assert_eq!(filled, vec!["label=Email=user@example.com", "label=Password=hunter2"]);
    // Booking page was re-opened after authentication.
    assert_eq!(page.visited(), vec![BOOKING_URL, LOGIN_URL, BOOKING_URL]);
}

/// End labels wrap past midnight while the date stays put.
#[tokio::test]
async fn midnight_wrap_keeps_request_date() {
    let page = ScriptedPage::with_selects(vec![
        vec!["2-L"],
        vec!["11:30pm", "12:30am"],
        vec!["11:30pm", "12:30am"],
    ]);
    let request = BookingRequest {
        start_time: "23:30".to_string(),
        ..request()
    };

    let result = run_session(&portal(), &request, &page).await.unwrap();
    assert_eq!(result.time_range, "11:30pm - 12:30am");
    assert_eq!(result.date, "2024-05-01");
    assert_eq!(
        ClockTime::from_label("12:30am").unwrap().to_string(),
        "00:30"
    );
}

/// Live smoke test against a real portal. Requires agent-browser and real
/// credentials in the environment.
#[tokio::test]
#[ignore] // Requires agent-browser to be installed and portal credentials
async fn live_booking_smoke() {
    let config = roombook::Config::load();
    if config.portal.credentials().is_err() {
        eprintln!("Skipping: portal credentials not configured");
        return;
    }

    match book(&config.portal, &request()).await {
        Ok(result) => println!("Booked: {}", result.summary()),
        Err(err) => eprintln!("Live booking failed (acceptable in CI): {}", err),
    }
}
