//! Platform selection state.

use simplens_shared::Platform;

use crate::detector;

/// Currently selected platform: seeded once by detection, then changed only
/// by explicit user choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSelection {
    current: Platform,
}

impl PlatformSelection {
    /// Initialize from the client environment signal.
    pub fn detect(signal: Option<&str>) -> Self {
        Self {
            current: detector::detect(signal),
        }
    }

    pub fn current(&self) -> Platform {
        self.current
    }

    pub fn select(&mut self, platform: Platform) {
        self.current = platform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_comes_from_detector() {
        assert_eq!(
            PlatformSelection::detect(Some("Windows NT 10.0")).current(),
            Platform::Windows
        );
        assert_eq!(PlatformSelection::detect(None).current(), Platform::Linux);
    }

    #[test]
    fn explicit_choice_overrides_detection() {
        let mut selection = PlatformSelection::detect(Some("Macintosh"));
        assert_eq!(selection.current(), Platform::PackageManager);

        selection.select(Platform::Linux);
        assert_eq!(selection.current(), Platform::Linux);
    }
}
