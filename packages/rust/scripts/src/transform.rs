//! Script transformation pipeline.
//!
//! A POSIX script is LF-normalized and wrapped with a preamble that
//! reattaches stdin to the terminal; a PowerShell script is passed through
//! untouched. Bodies are bytes so a UTF-16 PowerShell asset survives intact.

use sha2::{Digest, Sha256};
use simplens_shared::ScriptKind;

/// Prepended to every served `onboard.sh`.
///
/// When bash reads the script from a pipe, `BASH_SOURCE` is empty and stdin is
/// the pipe itself, so `read` prompts in the body would consume script text.
/// The guard slurps the rest of the pipe (bash reads pipes byte by byte, so
/// nothing past `fi` has been consumed yet) and re-runs it under bash with
/// stdin redirected from `/dev/tty`. `/dev/tty` must actually open: without a
/// controlling terminal it exists but fails with ENXIO, and the body then runs
/// as-is from the pipe.
pub const POSIX_PREAMBLE: &str = r#"#!/usr/bin/env bash
# Reattach stdin to the controlling terminal for piped installs.
if [ -z "${BASH_SOURCE[0]:-}" ] && [ ! -t 0 ] && { : </dev/tty; } 2>/dev/null; then
  __simplens_onboard="$(cat)"
  exec bash -c "$__simplens_onboard" onboard.sh "$@" < /dev/tty
fi
"#;

/// A script ready to be sent to a client. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedScript {
    kind: ScriptKind,
    body: Vec<u8>,
}

impl TransformedScript {
    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    /// `Content-Disposition` value naming the platform's script file.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.kind.file_name())
    }

    /// Strong entity tag: quoted hex SHA-256 of the body.
    pub fn etag(&self) -> String {
        let digest = Sha256::digest(&self.body);
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        format!("\"{hex}\"")
    }
}

/// Replace every `\r\n` with `\n`. Lone `\r` bytes are left alone.
pub fn normalize_line_endings(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == b'\r' && bytes.peek() == Some(&b'\n') {
            continue;
        }
        out.push(b);
    }
    out
}

/// Apply the platform's transformation to a raw script.
pub fn transform(kind: ScriptKind, raw: Vec<u8>) -> TransformedScript {
    let body = match kind {
        ScriptKind::Posix => {
            let normalized = normalize_line_endings(&raw);
            let mut body = Vec::with_capacity(POSIX_PREAMBLE.len() + normalized.len());
            body.extend_from_slice(POSIX_PREAMBLE.as_bytes());
            body.extend_from_slice(&normalized);
            body
        }
        // No stdin redirect for `irm | iex`; the script is served verbatim.
        ScriptKind::PowerShell => raw,
    };

    TransformedScript { kind, body }
}
