//! Core domain types: the closed platform enumeration and the scripted
//! subset that has an installer asset and an HTTP route.

use serde::{Deserialize, Serialize};

use crate::error::SimplensError;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// A platform key, used consistently across detection, commands, and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    Linux,
    Windows,
    PackageManager,
}

impl Platform {
    /// Every platform, in display order.
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Windows, Platform::PackageManager];

    /// The wire key (`linux`, `windows`, `packageManager`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::PackageManager => "packageManager",
        }
    }

    /// The installer script served for this platform, if any.
    ///
    /// Package-manager installs are a separate distribution channel and
    /// have no script route.
    pub fn script_kind(self) -> Option<ScriptKind> {
        match self {
            Self::Linux => Some(ScriptKind::Posix),
            Self::Windows => Some(ScriptKind::PowerShell),
            Self::PackageManager => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Platform {
    type Err = SimplensError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "packageManager" | "package-manager" | "npm" => Ok(Self::PackageManager),
            other => Err(SimplensError::config(format!(
                "unknown platform '{other}': expected 'linux', 'windows', or 'packageManager'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptKind
// ---------------------------------------------------------------------------

/// A platform that has an installer script asset and a `/install/{key}` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// `onboard.sh`, piped into bash.
    Posix,
    /// `onboard.ps1`, piped into `iex`.
    PowerShell,
}

impl ScriptKind {
    /// Every scripted platform. Route and asset tables are built from this list.
    pub const ALL: [ScriptKind; 2] = [ScriptKind::Posix, ScriptKind::PowerShell];

    pub fn platform(self) -> Platform {
        match self {
            Self::Posix => Platform::Linux,
            Self::PowerShell => Platform::Windows,
        }
    }

    /// Asset file name, also used as the download file name.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Posix => "onboard.sh",
            Self::PowerShell => "onboard.ps1",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Posix => "text/x-shellscript; charset=utf-8",
            Self::PowerShell => "text/plain",
        }
    }
}
