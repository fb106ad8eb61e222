//! Changelog front matter endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use simplens_shared::{Result, SimplensError};
use tracing::error;

use crate::AppState;

const FENCE: &str = "---";

/// Extract the YAML front matter of a document as JSON.
///
/// A document that does not open with a `---` fence has no front matter and
/// yields an empty object. An opening fence without a closing one is an error.
pub fn parse_front_matter(document: &str) -> Result<Value> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);

    let mut lines = document.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == FENCE => {}
        _ => return Ok(json!({})),
    }

    let mut yaml = String::new();
    let mut closed = false;
    for line in lines {
        if line.trim_end() == FENCE {
            closed = true;
            break;
        }
        yaml.push_str(line);
    }

    if !closed {
        return Err(SimplensError::Changelog(
            "front matter is missing its closing '---'".into(),
        ));
    }

    if yaml.trim().is_empty() {
        return Ok(json!({}));
    }

    let value: Value = serde_yaml::from_str(&yaml)
        .map_err(|e| SimplensError::Changelog(format!("invalid front matter: {e}")))?;

    Ok(match value {
        Value::Null => json!({}),
        other => other,
    })
}

/// `GET /api/changelog`
pub(crate) async fn changelog(State(state): State<Arc<AppState>>) -> Response {
    let path = &state.changelog_path;
    let result = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SimplensError::io(path, e))
        .and_then(|doc| parse_front_matter(&doc));

    match result {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!(?path, error = %e, "failed to load changelog");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "releases": [] })),
            )
                .into_response()
        }
    }
}
