//! Installer script and command listing handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use simplens_shared::{Platform, ScriptKind};
use simplens_widget::{CommandTemplate, detect};
use tracing::{debug, error};

use crate::AppState;

/// Error body for a script that could not be loaded.
#[derive(Debug, Serialize)]
struct ScriptError {
    error: &'static str,
}

const LOAD_FAILED: ScriptError = ScriptError {
    error: "Failed to load installation script",
};

/// `GET /install/{key}`: the transformed script for `kind`, or a JSON 500.
pub(crate) async fn script(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    kind: ScriptKind,
) -> Response {
    let script = match state.assets.load(kind).await {
        Ok(script) => script,
        Err(e) => {
            error!(platform = %kind.platform(), error = %e, "failed to load installation script");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(LOAD_FAILED)).into_response();
        }
    };

    let etag = script.etag();
    let cache_control = format!("public, max-age={}", state.cache_max_age_secs);

    if if_none_match(&headers, &etag) {
        debug!(platform = %kind.platform(), "script not modified");
        return (
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag), (header::CACHE_CONTROL, cache_control)],
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, script.content_type().to_string()),
            (header::CONTENT_DISPOSITION, script.content_disposition()),
            (header::CACHE_CONTROL, cache_control),
            (header::ETAG, etag),
        ],
        script.into_body(),
    )
        .into_response()
}

/// `If-None-Match` uses weak comparison, so a `W/` prefix is ignored.
fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v: &HeaderValue| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .map(|candidate| candidate.strip_prefix("W/").unwrap_or(candidate))
        .any(|candidate| candidate == "*" || candidate == etag)
}

#[derive(Debug, Serialize)]
pub(crate) struct CommandListing<'a> {
    recommended: Platform,
    commands: Vec<&'a CommandTemplate>,
}

/// `GET /install`: the command registry plus the platform recommended for the
/// caller's `User-Agent`.
pub(crate) async fn commands(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let listing = CommandListing {
        recommended: detect(user_agent),
        commands: state.registry.iter().collect(),
    };
    Json(listing).into_response()
}
