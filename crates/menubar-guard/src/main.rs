//! menubar-guard: keeps the cursor out of the menu bar / notch strip.
//!
//! # Usage
//!
//! ```text
//! menubar-guard [OPTIONS]
//!
//! Options:
//!   --config <PATH>          Config file [default: platform config dir]
//!   --band-height <PX>       Height of the forbidden band in points
//!   --preset <PRESET>        strict | lenient
//!   --log-level <LEVEL>      tracing filter used when RUST_LOG is unset
//!   --print-config           Print the effective config and exit
//!   --init-config            Write the effective config if no file exists
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                     | Description                  |
//! |------------------------------|------------------------------|
//! | `MENUBAR_GUARD_CONFIG`       | Config file path             |
//! | `MENUBAR_GUARD_BAND_HEIGHT`  | Band height in points        |
//! | `MENUBAR_GUARD_PRESET`       | Policy preset                |
//! | `MENUBAR_GUARD_LOG_LEVEL`    | Fallback log filter          |
//!
//! CLI args take precedence over environment variables, which take
//! precedence over the config file.
//!
//! # Startup
//!
//! ```text
//! main()
//!  └─ load config, apply CLI overrides
//!  └─ query primary display             (exit 2 on failure)
//!  └─ build PointerClampFilter
//!  └─ supervise(MacosEventTap)          (exit 3 if the tap cannot be created)
//!       └─ runs until Ctrl-C / SIGTERM
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use guard_core::PolicyPreset;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use menubar_guard::exit_code::{self, exit_code_for};
use menubar_guard::infrastructure::storage::config::{self, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    /// Suppress in-band clicks, warp once on entry, rewrite in-band events.
    Strict,
    /// Track motion only and warp on every in-band move.
    Lenient,
}

impl From<PresetArg> for PolicyPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Strict => PolicyPreset::Strict,
            PresetArg::Lenient => PolicyPreset::Lenient,
        }
    }
}

/// Keeps the cursor out of the strip at the top of the main display.
///
/// Requires the Accessibility permission (System Settings → Privacy &
/// Security → Accessibility).
#[derive(Debug, Parser)]
#[command(name = "menubar-guard", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "MENUBAR_GUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Height of the forbidden band in points.
    #[arg(long, env = "MENUBAR_GUARD_BAND_HEIGHT")]
    band_height: Option<f64>,

    /// Clamp policy preset.
    #[arg(long, value_enum, env = "MENUBAR_GUARD_PRESET")]
    preset: Option<PresetArg>,

    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`).
    #[arg(long, env = "MENUBAR_GUARD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to the config path if no file
    /// exists there yet.
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config::config_file_path().context("locating config file"),
        }
    }

    /// Loads the config file and layers the CLI overrides on top.
    fn effective_config(&self) -> anyhow::Result<AppConfig> {
        let path = self.config_path()?;
        let mut cfg = config::load_config_from(&path)
            .with_context(|| format!("loading config from {}", path.display()))?;
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }

    fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(height) = self.band_height {
            cfg.policy.band_height = height;
        }
        if let Some(preset) = self.preset {
            cfg.policy.preset = preset.into();
        }
        if let Some(level) = &self.log_level {
            cfg.guard.log_level = level.clone();
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let loaded = cli.effective_config();

    let fallback_level = match &loaded {
        Ok(cfg) => cfg.guard.log_level.as_str(),
        Err(_) => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(fallback_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let result = match loaded {
        Ok(cfg) => run(&cli, cfg).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: &Cli, cfg: AppConfig) -> anyhow::Result<()> {
    if cli.print_config {
        print!("{}", config::render_config(&cfg)?);
        return Ok(());
    }
    if cli.init_config {
        let path = cli.config_path()?;
        if path.exists() {
            info!("config already exists at {}, leaving it untouched", path.display());
        } else {
            config::save_config_to(&path, &cfg)
                .with_context(|| format!("writing config to {}", path.display()))?;
            info!("wrote config to {}", path.display());
        }
        return Ok(());
    }

    run_guard(cfg).await
}

#[cfg(target_os = "macos")]
async fn run_guard(cfg: AppConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    use menubar_guard::application::clamp_pointer::PointerClampFilter;
    use menubar_guard::application::supervise::supervise;
    use menubar_guard::application::watch_display::DisplayWatcher;
    use menubar_guard::infrastructure::event_tap::macos::{
        CgCursorController, MacosEventTap, TapControl,
    };
    use menubar_guard::infrastructure::screen_info::macos::MacosDisplayProvider;
    use menubar_guard::infrastructure::screen_info::DisplayProvider;

    let policy = cfg.policy.to_policy();
    let provider = Arc::new(MacosDisplayProvider::new());
    let frame = provider
        .primary_display()
        .context("querying primary display")?;
    info!(
        width = frame.width,
        height = frame.height,
        band_height = policy.band_height,
        preset = ?cfg.policy.preset,
        span = ?policy.span,
        "menubar-guard starting"
    );

    let control = Arc::new(TapControl::new());
    let mut filter = PointerClampFilter::new(
        policy,
        Arc::new(CgCursorController::new()),
        control.clone(),
    )
    .context("invalid clamp policy")?;
    filter.set_display_frame(frame);

    let interval = cfg.runtime.maintenance_interval();
    let mut host = MacosEventTap::new(control, interval);
    if cfg.runtime.refresh_display {
        host = host.with_display_watcher(DisplayWatcher::new(provider, frame, interval));
    }

    info!("event tap starting; press Ctrl-C to exit");
    let stats = supervise(host, filter, shutdown_signal()).await?;
    info!(
        events = stats.events,
        forwarded = stats.forwarded,
        rewritten = stats.rewritten,
        suppressed = stats.suppressed,
        relocations = stats.relocations,
        relocation_failures = stats.relocation_failures,
        reenable_requests = stats.reenable_requests,
        "menubar-guard stopped"
    );
    Ok(())
}

#[cfg(not(target_os = "macos"))]
async fn run_guard(_cfg: AppConfig) -> anyhow::Result<()> {
    use menubar_guard::infrastructure::event_tap::TapError;

    Err(TapError::UnsupportedPlatform(std::env::consts::OS.to_string()).into())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix (launchd stops agents with it).
#[cfg(target_os = "macos")]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => Some(term),
        Err(e) => {
            error!("failed to listen for SIGTERM: {e}");
            None
        }
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => info!("received Ctrl-C, shutting down"),
            Err(e) => {
                error!("failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        },
        Some(()) = async {
            match term.as_mut() {
                Some(term) => term.recv().await,
                None => std::future::pending().await,
            }
        } => info!("received SIGTERM, shutting down"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
