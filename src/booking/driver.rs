//! Browser driver - wraps the agent-browser CLI
//!
//! Implements [`PortalPage`] by shelling out to `agent-browser`, one isolated
//! named session per booking attempt. Navigation-bound commands run under an
//! explicit budget and surface an elapsed budget as `NavigationTimeout`;
//! element lookups fail as ordinary browser errors so fallback chains can
//! move on to the next strategy.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use uuid::Uuid;

use crate::booking::page::{PortalPage, SelectControl};
use crate::booking::selectors::Selector;
use crate::core::config::PortalConfig;
use crate::core::{Result, RoombookError};

/// JS snippet listing every dropdown's option labels, page order.
const LIST_SELECTS_SCRIPT: &str = "JSON.stringify(Array.from(document.querySelectorAll('select'))\
     .map(s => Array.from(s.options).map(o => (o.textContent || '').trim())))";

/// One live `agent-browser` session.
pub struct AgentBrowserPage {
    session_name: String,
    headed: bool,
}

impl AgentBrowserPage {
    /// Start a fresh, uniquely named session for one booking attempt.
    ///
    /// Fails with [`RoombookError::AgentBrowserNotFound`] when the CLI is not
    /// installed, before any browser process is spawned.
    pub async fn launch(portal: &PortalConfig) -> Result<Self> {
        if !Self::is_available().await {
            return Err(RoombookError::AgentBrowserNotFound);
        }

        Ok(Self {
            session_name: format!("roombook-{}", Uuid::new_v4().simple()),
            headed: !portal.headless,
        })
    }

    /// Check if agent-browser is installed
    pub async fn is_available() -> bool {
        Command::new("agent-browser")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Run an agent-browser command in this session
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("agent-browser");
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RoombookError::AgentBrowserNotFound
            } else {
                RoombookError::browser(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(RoombookError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Run a command under a navigation budget; elapsing the budget is a
    /// portal-unavailable condition, not a strategy miss.
    async fn run_bounded(&self, args: &[&str], budget: Duration, what: &str) -> Result<String> {
        match timeout(budget, self.run_command(args)).await {
            Ok(result) => result,
            Err(_) => Err(RoombookError::timeout(format!(
                "{} exceeded {}s",
                what,
                budget.as_secs()
            ))),
        }
    }

    /// Evaluate JavaScript on the page and return its printed result.
    async fn eval(&self, script: &str) -> Result<String> {
        self.run_command(&["eval", script])
            .await
            .map(|out| out.trim().to_string())
    }
}

#[async_trait]
impl PortalPage for AgentBrowserPage {
    async fn goto(&self, url: &str, budget: Duration) -> Result<()> {
        self.run_bounded(&["open", url], budget, &format!("navigation to {}", url))
            .await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.run_command(&["get", "url"])
            .await
            .map(|s| s.trim().to_string())
    }

    async fn wait_network_idle(&self, budget: Duration) -> Result<()> {
        self.run_bounded(
            &["wait", "--load", "networkidle"],
            budget,
            "network-idle wait",
        )
        .await?;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> Result<()> {
        let query = selector.to_query();
        self.run_command(&["fill", &query, value]).await?;
        Ok(())
    }

    async fn click(&self, selector: &Selector, per_attempt: Duration) -> Result<()> {
        let query = selector.to_query();
        match timeout(per_attempt, self.run_command(&["click", &query])).await {
            Ok(result) => result.map(|_| ()),
            // A slow click attempt is a miss for this strategy only.
            Err(_) => Err(RoombookError::browser(format!(
                "click on {} exceeded {}s",
                query,
                per_attempt.as_secs()
            ))),
        }
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.run_command(&["press", key]).await?;
        Ok(())
    }

    async fn select_controls(&self) -> Result<Vec<SelectControl>> {
        let raw = self.eval(LIST_SELECTS_SCRIPT).await?;
        let options = parse_select_inventory(&raw)?;
        Ok(options
            .into_iter()
            .enumerate()
            .map(|(index, options)| SelectControl { index, options })
            .collect())
    }

    async fn select_by_label(&self, control_index: usize, label: &str) -> Result<()> {
        let quoted = serde_json::to_string(label)?;
        let script = format!(
            "(() => {{ const s = document.querySelectorAll('select')[{idx}]; \
             if (!s) return false; \
             const o = Array.from(s.options).find(o => (o.textContent || '').trim() === {label}); \
             if (!o) return false; \
             s.value = o.value; \
             s.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            idx = control_index,
            label = quoted
        );

        match self.eval(&script).await?.as_str() {
            "true" => Ok(()),
            _ => Err(RoombookError::browser(format!(
                "no option labeled '{}' on select #{}",
                label, control_index
            ))),
        }
    }

    async fn close(&self) {
        if let Err(err) = self.run_command(&["close"]).await {
            tracing::debug!(session = %self.session_name, %err, "session close failed");
        }
    }
}

/// Parse the eval output of [`LIST_SELECTS_SCRIPT`]. Some CLI versions print
/// the stringified JSON, others re-quote it as a JSON string.
fn parse_select_inventory(raw: &str) -> Result<Vec<Vec<String>>> {
    if let Ok(parsed) = serde_json::from_str::<Vec<Vec<String>>>(raw) {
        return Ok(parsed);
    }
    let unquoted: String = serde_json::from_str(raw)?;
    Ok(serde_json::from_str(&unquoted)?)
}
