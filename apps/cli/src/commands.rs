//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use simplens_scripts::AssetStore;
use simplens_server::AppState;
use simplens_shared::{AppConfig, Platform, ScriptKind, init_config, load_config, load_config_from};
use simplens_widget::{
    ClipboardWriter, CommandRegistry, FeedbackState, InstallWidget, detect_host, host_signal,
};
use tracing::{debug, info};

use crate::clipboard::ArboardClipboard;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SimpleNS onboarding: serve installer scripts and recommend install commands.
#[derive(Parser)]
#[command(
    name = "simplens",
    version,
    about = "Serve SimpleNS installer scripts and recommend the right install command.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to a config file (defaults to ./simplens.toml if present).
    #[arg(long, global = true, env = "SIMPLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start the HTTP server.
    Serve {
        /// Address to listen on (overrides server.bind).
        #[arg(short, long)]
        bind: Option<String>,

        /// Directory holding onboard.sh / onboard.ps1 (overrides assets.scripts_dir).
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Public origin used in install commands (overrides server.base_url).
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the script exactly as it would be served for a platform.
    Render {
        /// Platform key: linux or windows.
        platform: Platform,

        /// Directory holding the script assets.
        #[arg(long)]
        assets: Option<PathBuf>,
    },

    /// Show the recommended install command for a platform.
    Recommend {
        /// User-agent string to detect from (defaults to this machine's OS).
        #[arg(long)]
        user_agent: Option<String>,

        /// Explicit platform choice; overrides detection.
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Copy the command to the system clipboard.
        #[arg(long)]
        copy: bool,

        /// Print the command template as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Verify config and that every installer asset is present.
    Check,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write simplens.toml with defaults into the current directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

const LOG_TARGETS: &[&str] = &[
    "simplens",
    "simplens_server",
    "simplens_scripts",
    "simplens_widget",
    "simplens_shared",
    "tower_http",
];

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Serve {
            bind,
            assets,
            base_url,
        } => cmd_serve(config, bind, assets, base_url).await,
        Command::Render { platform, assets } => cmd_render(&config, platform, assets).await,
        Command::Recommend {
            user_agent,
            platform,
            copy,
            json,
        } => cmd_recommend(&config, user_agent.as_deref(), platform, copy, json),
        Command::Check => cmd_check(&config),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_serve(
    mut config: AppConfig,
    bind: Option<String>,
    assets: Option<PathBuf>,
    base_url: Option<String>,
) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(assets) = assets {
        config.assets.scripts_dir = assets;
    }
    if let Some(base_url) = base_url {
        config.server.base_url = base_url;
    }
    config.validate()?;

    let state = AppState::from_config(&config)?;
    // Never expose a route for a platform whose asset is missing.
    state.assets.verify()?;

    let addr = config.server.bind_addr()?;
    info!(
        %addr,
        assets = %state.assets.root().display(),
        base_url = %config.server.base_url,
        "starting server"
    );

    simplens_server::serve(Arc::new(state), addr).await?;
    Ok(())
}

async fn cmd_render(config: &AppConfig, platform: Platform, assets: Option<PathBuf>) -> Result<()> {
    let kind = script_kind(platform)?;
    let store = AssetStore::new(assets.unwrap_or_else(|| config.assets.scripts_dir.clone()));

    let script = store.load(kind).await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(script.body())?;
    stdout.flush()?;
    Ok(())
}

fn script_kind(platform: Platform) -> Result<ScriptKind> {
    platform
        .script_kind()
        .ok_or_else(|| eyre!("'{platform}' has no installer script; expected 'linux' or 'windows'"))
}

fn cmd_recommend(
    config: &AppConfig,
    user_agent: Option<&str>,
    platform: Option<Platform>,
    copy: bool,
    json: bool,
) -> Result<()> {
    let registry = Arc::new(CommandRegistry::new(&config.server.base_url()?));

    let signal = user_agent.unwrap_or_else(|| {
        debug!(host = %detect_host(), "no user agent given, using host platform");
        host_signal()
    });

    let mut widget = InstallWidget::mount(
        registry,
        Some(signal),
        config.widget.copy_feedback_delay(),
    );
    if let Some(platform) = platform {
        widget.select(platform);
    }

    let template = widget.template();
    if json {
        println!("{}", serde_json::to_string_pretty(template)?);
    } else {
        println!();
        println!("  {} ({})", template.label, template.platform);
        println!("  {}", template.command);
        println!("  {}", template.description);
        println!();
    }

    if copy {
        match ArboardClipboard::new() {
            Ok(mut clipboard) => {
                copy_selected(&mut widget, &mut clipboard, &mut std::io::stdout())?;
            }
            Err(e) => debug!(error = %e, "clipboard unavailable"),
        }
    }

    Ok(())
}

/// Copy the widget's command, report it, then hold the clipboard so the
/// command is still pasteable after we exit.
fn copy_selected(
    widget: &mut InstallWidget,
    clipboard: &mut impl ClipboardWriter,
    out: &mut impl Write,
) -> Result<FeedbackState> {
    let command = widget.template().command.clone();
    let state = widget.copy(clipboard);
    if state == FeedbackState::Copied {
        writeln!(out, "  Copied to clipboard.")?;
        out.flush()?;
        if let Err(e) = clipboard.hold(&command) {
            debug!(error = %e, "clipboard hold ended");
        }
    }
    Ok(state)
}

fn cmd_check(config: &AppConfig) -> Result<()> {
    let store = AssetStore::new(&config.assets.scripts_dir);
    store.verify()?;

    for kind in ScriptKind::ALL {
        println!(
            "  ok  /install/{:<8} {}",
            kind.platform().key(),
            store.path_for(kind).display()
        );
    }
    if config.content.changelog_path.is_file() {
        println!("  ok  /api/changelog     {}", config.content.changelog_path.display());
    } else {
        println!(
            "  --  /api/changelog     {} (missing; endpoint will return 500)",
            config.content.changelog_path.display()
        );
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use simplens_shared::SimplensError;

    type Log = Rc<RefCell<Vec<String>>>;

    struct RecordingClipboard {
        log: Log,
        fail: bool,
    }

    impl ClipboardWriter for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> simplens_shared::Result<()> {
            if self.fail {
                return Err(SimplensError::Clipboard("no display".into()));
            }
            self.log.borrow_mut().push(format!("write {text}"));
            Ok(())
        }

        fn hold(&mut self, text: &str) -> simplens_shared::Result<()> {
            self.log.borrow_mut().push(format!("hold {text}"));
            Ok(())
        }
    }

    struct LogWriter(Log);

    impl Write for LogWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let line = String::from_utf8_lossy(buf).trim().to_string();
            if !line.is_empty() {
                self.0.borrow_mut().push(line);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn widget() -> InstallWidget {
        let base_url = AppConfig::default().server.base_url().unwrap();
        let registry = CommandRegistry::new(&base_url);
        InstallWidget::mount(Arc::new(registry), None, Duration::from_secs(2))
    }

    #[tokio::test]
    async fn copy_reports_before_holding_clipboard() {
        let log = Log::default();
        let mut clipboard = RecordingClipboard { log: Rc::clone(&log), fail: false };
        let mut out = LogWriter(Rc::clone(&log));

        let mut widget = widget();
        let state = copy_selected(&mut widget, &mut clipboard, &mut out).unwrap();

        assert_eq!(state, FeedbackState::Copied);
        let command = "curl -fsSL https://simplens.in/api/install/linux | bash";
        assert_eq!(
            *log.borrow(),
            vec![
                format!("write {command}"),
                "Copied to clipboard.".to_string(),
                format!("hold {command}"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_copy_never_holds() {
        let log = Log::default();
        let mut clipboard = RecordingClipboard { log: Rc::clone(&log), fail: true };
        let mut out = LogWriter(Rc::clone(&log));

        let mut widget = widget();
        let state = copy_selected(&mut widget, &mut clipboard, &mut out).unwrap();

        assert_eq!(state, FeedbackState::Idle);
        assert!(log.borrow().is_empty());
    }
}
