pub(crate) mod event;

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::NexusSettings;
use crate::error::{Error, Result};

pub(crate) const API_KEY_HEADER: &str = "Nexus-Api-Key";

/// Fetch a URL from the upstream API and decode the JSON body.
///
/// Any non-success status is an error; a partial body is never returned.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    settings: &NexusSettings,
    url: &Url,
) -> Result<T> {
    debug!(url = %url, "fetching upstream");

    let mut request = client.get(url.clone()).timeout(settings.timeout);
    if let Some(api_key) = settings.api_key.as_deref() {
        request = request.header(API_KEY_HEADER, api_key);
    }

    let response = request.send().await.map_err(|e| {
        classify(url, settings.timeout, e, |url, source| Error::Http { url, source })
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }

    response.json::<T>().await.map_err(|e| {
        classify(url, settings.timeout, e, |url, source| Error::ResponseBody {
            url,
            source,
        })
    })
}

fn classify(
    url: &Url,
    timeout: Duration,
    source: reqwest::Error,
    otherwise: impl FnOnce(String, reqwest::Error) -> Error,
) -> Error {
    if source.is_timeout() {
        Error::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        otherwise(url.to_string(), source)
    }
}

/// `<base>/<event_key>`, with the key percent-encoded as a single path segment.
pub(crate) fn event_url(base: &Url, event_key: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(event_key);
    }
    url
}
