use std::fmt;
use std::time::Duration;

use chrono::Utc;
use reqwest::Url;
use tracing::instrument;

use crate::error::Result;
use crate::model::{Comparison, EventSnapshot, TeamNumber, TeamPage, TeamView};
use crate::nexus;
use crate::pipeline::{self, Schedule};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the upstream event API.
#[derive(Clone)]
pub struct NexusSettings {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl NexusSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for NexusSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NexusSettings")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// The main entry point for reading event schedules.
///
/// `NexusClient` wraps a [`reqwest::Client`] and the upstream settings. Each
/// call fetches a fresh snapshot and runs it through the pipeline; nothing
/// is cached between calls.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> nexus_match_view::Result<()> {
/// use nexus_match_view::{NexusClient, NexusSettings, TeamNumber};
///
/// let base_url = "https://frc.nexus/api/v1/event".parse().unwrap();
/// let client = NexusClient::new(NexusSettings::new(base_url).api_key("..."));
/// let team = TeamNumber::from_raw("frc254")?;
/// let view = client.get_team_view("2025miket", &team).await?;
/// println!("{} completed matches", view.completed.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NexusClient {
    http: reqwest::Client,
    settings: NexusSettings,
}

impl NexusClient {
    /// Create a new client with a default [`reqwest::Client`].
    pub fn new(settings: NexusSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// The per-request timeout from `settings` still applies.
    pub fn with_client(client: reqwest::Client, settings: NexusSettings) -> Self {
        Self {
            http: client,
            settings,
        }
    }

    pub fn settings(&self) -> &NexusSettings {
        &self.settings
    }

    /// Fetch the current snapshot of an event.
    #[instrument(skip(self))]
    pub async fn get_snapshot(&self, event_key: &str) -> Result<EventSnapshot> {
        nexus::event::get_event(&self.http, &self.settings, event_key).await
    }

    /// Fetch the upstream payload for an event as-is.
    #[instrument(skip(self))]
    pub async fn get_raw_event(&self, event_key: &str) -> Result<serde_json::Value> {
        nexus::event::get_raw_event(&self.http, &self.settings, event_key).await
    }

    /// Fetch an event and build one team's view of it.
    #[instrument(skip(self), fields(team = %team))]
    pub async fn get_team_view(&self, event_key: &str, team: &TeamNumber) -> Result<TeamView> {
        let snapshot = self.get_snapshot(event_key).await?;
        let schedule = Schedule::prepare(&snapshot);
        Ok(pipeline::build_team_view(&schedule, team))
    }

    /// Fetch an event once and build both a team's view and the fingerprint of
    /// the schedule behind it.
    #[instrument(skip(self), fields(team = %team))]
    pub async fn get_team_page(&self, event_key: &str, team: &TeamNumber) -> Result<TeamPage> {
        let snapshot = self.get_snapshot(event_key).await?;
        let schedule = Schedule::prepare(&snapshot);
        Ok(TeamPage {
            view: pipeline::build_team_view(&schedule, team),
            fingerprint: pipeline::fingerprint(&schedule)?,
            fetched_at: Utc::now(),
        })
    }

    /// Fetch an event and compare its fingerprint with the one a client last saw.
    #[instrument(skip(self))]
    pub async fn compare(&self, event_key: &str, previous: Option<&str>) -> Result<Comparison> {
        let snapshot = self.get_snapshot(event_key).await?;
        let schedule = Schedule::prepare(&snapshot);
        let fingerprint = pipeline::fingerprint(&schedule)?;
        Ok(fingerprint.compare(previous, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ErrorKind;
    use crate::model::MatchStatus;

    fn event_body(q2_status: &str) -> String {
        serde_json::json!({
            "nowQueuing": "Qualification 3",
            "matches": [
                {"label": "Qualification 1", "status": "On field",
                 "redTeams": ["1", "2", "3"], "blueTeams": ["4", "254", "6"]},
                {"label": "Qualification 2", "status": q2_status,
                 "redTeams": ["254", "8", "9"], "blueTeams": ["10", "11", "12"]},
                {"label": "Qualification 3", "status": "Now queuing",
                 "redTeams": ["13", "14", "15"], "blueTeams": ["16", "17", "18"]}
            ]
        })
        .to_string()
    }

    fn client(server: &mockito::Server) -> NexusClient {
        let base_url = Url::parse(&format!("{}/event", server.url())).unwrap();
        NexusClient::new(NexusSettings::new(base_url).api_key("secret"))
    }

    #[tokio::test]
    async fn test_get_team_view() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/event/2025miket")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(event_body("On field"))
            .create_async()
            .await;

        let team = TeamNumber::from_raw("frc254").unwrap();
        let view = client(&server)
            .get_team_view("2025miket", &team)
            .await
            .unwrap();

        assert_eq!(view.completed.len(), 1);
        assert_eq!(view.completed[0].label.as_str(), "Qualification 1");
        assert_eq!(view.active["Qualification"][0].status, MatchStatus::OnField);
    }

    #[tokio::test]
    async fn test_compare_detects_status_change() {
        let mut server = mockito::Server::new_async().await;
        let before = server
            .mock("GET", "/event/2025miket")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(event_body("On deck"))
            .expect(1)
            .create_async()
            .await;

        let client = client(&server);
        let first = client.compare("2025miket", None).await.unwrap();
        assert!(!first.changed);
        before.assert_async().await;
        before.remove_async().await;

        let _mock = server
            .mock("GET", "/event/2025miket")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(event_body("On field"))
            .create_async()
            .await;

        let second = client
            .compare("2025miket", Some(first.fingerprint.as_str()))
            .await
            .unwrap();
        assert!(second.changed);
        assert_ne!(second.fingerprint, first.fingerprint);

        let third = client
            .compare("2025miket", Some(second.fingerprint.as_str()))
            .await
            .unwrap();
        assert!(!third.changed);
    }

    #[tokio::test]
    async fn test_team_page_fingerprint_matches_compare() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/event/2025miket")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(event_body("Queuing soon"))
            .expect(2)
            .create_async()
            .await;

        let client = client(&server);
        let team = TeamNumber::from_raw("254").unwrap();
        let page = client.get_team_page("2025miket", &team).await.unwrap();
        assert_eq!(page.view.team, team);

        let check = client
            .compare("2025miket", Some(page.fingerprint.as_str()))
            .await
            .unwrap();
        assert!(!check.changed);
        assert_eq!(check.fingerprint, page.fingerprint);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_timeout_is_upstream_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/event/2025miket")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(500));
                w.write_all(b"{}")
            })
            .create_async()
            .await;

        let base_url = Url::parse(&format!("{}/event", server.url())).unwrap();
        let client = NexusClient::new(
            NexusSettings::new(base_url).timeout(Duration::from_millis(50)),
        );
        let err = client.get_snapshot("2025miket").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let settings = NexusSettings::new(Url::parse("https://frc.nexus/api/v1/event").unwrap())
            .api_key("super-secret");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
