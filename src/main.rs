//! motion-gallery - terminal gallery of animated demo widgets

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use motion_gallery::config::schema;
use motion_gallery::frontend::{Frontend, InputOutcome, TuiFrontend};
use motion_gallery::theme::ChromePresets;
use motion_gallery::{ConfigStore, DemoTable, Gallery, WidgetKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(ClapParser)]
#[command(name = "motion-gallery")]
#[command(about = "Terminal gallery of animated demo widgets", long_about = None)]
struct Cli {
    /// TOML file of session overrides, keyed by widget-kind (never written back)
    #[arg(short, long, value_name = "FILE")]
    overrides: Option<PathBuf>,

    /// Frame poll timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 16)]
    poll_timeout_ms: u64,

    /// Log file path
    #[arg(long, value_name = "FILE", default_value = "motion-gallery.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default configuration tree as TOML
    Defaults,
    /// Load an override file and list fields that fall back to defaults
    CheckOverrides {
        /// Override file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the TUI, so logs go to a file
    // (RUST_LOG controls the level, e.g. RUST_LOG=motion_gallery=trace)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("Failed to open log file {:?}", cli.log_file))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    match &cli.command {
        Some(Commands::Defaults) => print_defaults(),
        Some(Commands::CheckOverrides { file }) => check_overrides(file),
        None => run_tui(&cli),
    }
}

/// Read a TOML override file into the store's JSON representation
fn load_overrides(path: &Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read override file {:?}", path))?;
    let table: toml::Value = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse override file {:?}", path))?;
    serde_json::to_value(table).context("Failed to convert overrides to a config tree")
}

fn print_defaults() -> Result<()> {
    let store = ConfigStore::new();
    let text = toml::to_string_pretty(&store.default_tree())
        .context("Failed to render default configuration as TOML")?;
    print!("{}", text);
    Ok(())
}

fn check_overrides(path: &Path) -> Result<()> {
    let tree = load_overrides(path)?;
    let mut store = ConfigStore::new();
    let kinds = store
        .apply_overrides(&tree)
        .with_context(|| format!("Invalid override file {:?}", path))?;
    println!("Checking {:?} ({} widget-kinds overridden)", path, kinds.len());

    let mut problems = 0;
    for kind in WidgetKind::ALL {
        let resolved = store.get(kind);
        let mut fallbacks = schema::fallbacks_for(kind, resolved.tree());
        if kind == WidgetKind::WindowChrome {
            let variant = resolved.window_chrome().value.variant;
            if let Some(diagnostic) = ChromePresets::resolve(&variant).diagnostic {
                fallbacks.push(format!("variant ({})", diagnostic));
            }
        }

        if fallbacks.is_empty() {
            println!("✓ {}", kind.key());
        } else {
            println!("✗ {}: {} field(s) fall back to defaults", kind.key(), fallbacks.len());
            for field in &fallbacks {
                println!("    - {}", field);
            }
            problems += fallbacks.len();
        }
    }

    if problems == 0 {
        println!("All overrides resolve cleanly");
    }
    Ok(())
}

fn run_tui(cli: &Cli) -> Result<()> {
    let mut store = ConfigStore::new();
    if let Some(path) = &cli.overrides {
        let tree = load_overrides(path)?;
        let kinds = store
            .apply_overrides(&tree)
            .with_context(|| format!("Invalid override file {:?}", path))?;
        tracing::info!(?path, overridden = kinds.len(), "session overrides applied");
    }

    let demos = DemoTable::standard().context("Invalid demo table")?;
    let mut gallery = Gallery::new(demos, store);

    let mut frontend = TuiFrontend::new(Duration::from_millis(cli.poll_timeout_ms))?;
    let result = event_loop(&mut frontend, &mut gallery);
    frontend.cleanup()?;
    result
}

fn event_loop(frontend: &mut TuiFrontend, gallery: &mut Gallery) -> Result<()> {
    let mut last_tick = Instant::now();
    frontend.render(gallery)?;

    loop {
        for event in frontend.poll_events()? {
            match frontend.translate(&event) {
                InputOutcome::Quit => {
                    tracing::info!("quit requested");
                    return Ok(());
                }
                InputOutcome::Action(action) => {
                    gallery.apply(action);
                }
                InputOutcome::Redraw | InputOutcome::Ignored => {}
            }
        }

        let now = Instant::now();
        gallery.advance(now.duration_since(last_tick));
        last_tick = now;

        frontend.render(gallery)?;
    }
}
