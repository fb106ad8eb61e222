//! The fixed table of install command templates.

use serde::Serialize;
use simplens_shared::Platform;
use url::Url;

/// A display-ready install command for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTemplate {
    pub platform: Platform,
    pub label: &'static str,
    /// Icon identifier for the rendering layer.
    pub icon: &'static str,
    pub command: String,
    pub description: &'static str,
}

/// Immutable command table, total over [`Platform`].
///
/// Built once at startup from the public origin and shared read-only.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    templates: [CommandTemplate; 3],
}

impl CommandRegistry {
    /// Build the table, rendering script URLs against `base_url`.
    pub fn new(base_url: &Url) -> Self {
        let origin = base_url.as_str().trim_end_matches('/');
        Self {
            templates: Platform::ALL.map(|platform| template_for(platform, origin)),
        }
    }

    /// Look up the template for `platform`. Never fails.
    pub fn get(&self, platform: Platform) -> &CommandTemplate {
        &self.templates[slot(platform)]
    }

    /// Templates in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandTemplate> {
        self.templates.iter()
    }
}

fn slot(platform: Platform) -> usize {
    match platform {
        Platform::Linux => 0,
        Platform::Windows => 1,
        Platform::PackageManager => 2,
    }
}

fn template_for(platform: Platform, origin: &str) -> CommandTemplate {
    match platform {
        Platform::Linux => CommandTemplate {
            platform,
            label: "Linux",
            icon: "terminal",
            command: format!("curl -fsSL {origin}/api/install/linux | bash"),
            description: "Run the onboarding script in any bash shell",
        },
        Platform::Windows => CommandTemplate {
            platform,
            label: "Windows",
            icon: "windows",
            command: format!("irm {origin}/api/install/windows | iex"),
            description: "Run the onboarding script in PowerShell",
        },
        Platform::PackageManager => CommandTemplate {
            platform,
            label: "npm",
            icon: "package",
            command: "npx @simplens/onboard".to_string(),
            description: "Scaffold a deployment with the npm onboarding CLI",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CommandRegistry {
        CommandRegistry::new(&Url::parse("https://simplens.in/").unwrap())
    }

    #[test]
    fn registry_is_total_and_keyed_correctly() {
        let registry = registry();
        for platform in Platform::ALL {
            assert_eq!(registry.get(platform).platform, platform);
        }
    }

    #[test]
    fn iteration_follows_platform_order() {
        let order: Vec<Platform> = registry().iter().map(|t| t.platform).collect();
        assert_eq!(order, Platform::ALL.to_vec());
    }

    #[test]
    fn commands_point_at_install_routes() {
        let registry = registry();
        assert_eq!(
            registry.get(Platform::Linux).command,
            "curl -fsSL https://simplens.in/api/install/linux | bash"
        );
        assert_eq!(
            registry.get(Platform::Windows).command,
            "irm https://simplens.in/api/install/windows | iex"
        );
        assert_eq!(
            registry.get(Platform::PackageManager).command,
            "npx @simplens/onboard"
        );
    }

    #[test]
    fn custom_origin() {
        let registry = CommandRegistry::new(&Url::parse("http://localhost:3000").unwrap());
        assert!(
            registry
                .get(Platform::Linux)
                .command
                .contains("http://localhost:3000/api/install/linux")
        );
    }

    #[test]
    fn template_serializes_with_wire_keys() {
        let json = serde_json::to_value(registry().get(Platform::PackageManager)).unwrap();
        assert_eq!(json["platform"], "packageManager");
        assert_eq!(json["label"], "npm");
        assert!(json["description"].is_string());
    }
}
