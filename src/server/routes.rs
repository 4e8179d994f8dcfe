use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use super::error::ApiError;
use super::render;
use super::AppState;
use crate::error::{Error, Result};
use crate::model::{Comparison, TeamNumber};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ViewParams {
    team_key: Option<String>,
    event_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmbedParams {
    team_key: Option<String>,
    event_key: Option<String>,
    height: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataCheckParams {
    event_key: Option<String>,
    #[serde(alias = "previousFingerprint")]
    last_update: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEventParams {
    event_key: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    present(value).ok_or(Error::MissingParameter { name })
}

/// Full-page view. Without both keys, or with a team key that is only the
/// organization prefix, asks for them instead of failing.
#[instrument(skip(state))]
pub(crate) async fn team_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> std::result::Result<Html<String>, ApiError> {
    let (Some(team_key), Some(event_key)) = (present(params.team_key), present(params.event_key))
    else {
        return Ok(Html(render::parameter_form()));
    };

    let Ok(team) = TeamNumber::from_raw(&team_key) else {
        return Ok(Html(render::parameter_form()));
    };
    let page = state.client.get_team_page(&event_key, &team).await?;
    Ok(Html(render::full_page(&page, &state.presentation)))
}

#[instrument(skip(state))]
pub(crate) async fn embed_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EmbedParams>,
) -> std::result::Result<Html<String>, ApiError> {
    let team_key = required(params.team_key, "teamKey")?;
    let event_key = required(params.event_key, "eventKey")?;
    let height = render::embed_height(params.height.as_deref());

    let team = TeamNumber::from_raw(&team_key)?;
    let page = state.client.get_team_page(&event_key, &team).await?;
    Ok(Html(render::embed_page(&page, &state.presentation, height)))
}

#[instrument(skip(state))]
pub(crate) async fn data_check(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DataCheckParams>,
) -> std::result::Result<Json<Comparison>, ApiError> {
    let event_key = required(params.event_key, "eventKey")?;
    let previous = present(params.last_update);
    let comparison = state.client.compare(&event_key, previous.as_deref()).await?;
    Ok(Json(comparison))
}

pub(crate) async fn health() -> impl IntoResponse {
    "OK"
}

#[instrument(skip(state))]
pub(crate) async fn raw_event(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawEventParams>,
) -> std::result::Result<Json<serde_json::Value>, ApiError> {
    let event_key = required(params.event_key, "eventKey")?;
    Ok(Json(state.client.get_raw_event(&event_key).await?))
}
