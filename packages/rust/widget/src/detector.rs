//! Platform detection from a user-agent-like signal.
//!
//! The mapping is total: every input, including an empty or absent signal,
//! resolves to exactly one [`Platform`]. Windows markers win over macOS
//! markers; anything else falls back to [`Platform::Linux`].

use simplens_shared::Platform;

/// Substrings identifying Windows (`Windows NT`, `Win32`, `Win64`).
const WINDOWS_MARKERS: &[&str] = &["Win"];

/// Substrings identifying macOS (`Macintosh`, `MacIntel`, `Mac OS X`).
const MAC_MARKERS: &[&str] = &["Mac"];

/// Detect the platform from an optional signal. `None` means a non-browser
/// context and yields the default.
pub fn detect(signal: Option<&str>) -> Platform {
    signal.map_or(Platform::Linux, detect_user_agent)
}

/// Detect the platform from a user-agent string.
pub fn detect_user_agent(user_agent: &str) -> Platform {
    if WINDOWS_MARKERS.iter().any(|m| user_agent.contains(m)) {
        Platform::Windows
    } else if MAC_MARKERS.iter().any(|m| user_agent.contains(m)) {
        // macOS users get the package-manager install rather than a piped script.
        Platform::PackageManager
    } else {
        Platform::Linux
    }
}

/// A user-agent-like signal describing the machine running this process.
pub fn host_signal() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows",
        "macos" => "Macintosh",
        _ => "",
    }
}

/// Detect the platform of the machine running this process.
pub fn detect_host() -> Platform {
    detect_user_agent(host_signal())
}
