use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::client::NexusSettings;
use crate::error::{Error, Result};
use crate::model::{EventSnapshot, NexusEvent};
use crate::nexus::{self, event_url};

#[instrument(skip(client, settings))]
pub(crate) async fn get_event(
    client: &reqwest::Client,
    settings: &NexusSettings,
    event_key: &str,
) -> Result<EventSnapshot> {
    let url = event_url(&settings.base_url, event_key);
    let event: Option<NexusEvent> =
        not_found_as_none(nexus::get_json(client, settings, &url).await)?;
    let event = event.ok_or_else(|| Error::EventNotFound {
        event_key: event_key.to_string(),
    })?;

    let snapshot = EventSnapshot::from_nexus(event_key, event).inspect_err(|e| {
        warn!(error = %e, "upstream event contains an unparsable match");
    })?;
    debug!(
        count = snapshot.matches().len(),
        now_queuing = snapshot.now_queuing(),
        "parsed event"
    );
    Ok(snapshot)
}

/// Upstream JSON for an event, untouched.
#[instrument(skip(client, settings))]
pub(crate) async fn get_raw_event(
    client: &reqwest::Client,
    settings: &NexusSettings,
    event_key: &str,
) -> Result<serde_json::Value> {
    let url = event_url(&settings.base_url, event_key);
    match not_found_as_none(nexus::get_json(client, settings, &url).await)? {
        None | Some(serde_json::Value::Null) => Err(Error::EventNotFound {
            event_key: event_key.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn not_found_as_none<T>(result: Result<Option<T>>) -> Result<Option<T>> {
    match result {
        Err(Error::UnexpectedStatus { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
        other => other,
    }
}
