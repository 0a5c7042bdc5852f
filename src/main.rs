use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use toastline::config::Config;
use toastline::toast::{driver, Category, DisplayState, OpenOptions, ToastController, ToastRegistry};
use toastline::ui::App;

/// Name the toast factory is registered under
const TOAST_NAME: &str = "toastline-toast";

#[derive(Parser)]
#[command(name = "toastline")]
#[command(about = "Single-message toast notifications for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transition duration in milliseconds (overrides config)
    #[arg(long, global = true, value_name = "MS")]
    transition: Option<u64>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive demo (default)
    Demo,
    /// Show one toast without a UI and print each state change as JSON
    Show(ShowArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Message text
    text: Option<String>,

    /// Category: success, error, warning or info
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    category: Option<String>,

    /// Auto-dismiss delay in milliseconds
    #[arg(short, long, value_name = "MS")]
    duration: Option<u64>,

    /// Explicit background color (wins over --type)
    #[arg(short, long, value_name = "COLOR")]
    color: Option<String>,

    /// Full options object, e.g. '{"text": "Saved", "type": "success"}'
    #[arg(long, conflicts_with_all = ["text", "category", "duration", "color"])]
    json: Option<String>,
}

impl ShowArgs {
    fn options(&self) -> Result<OpenOptions> {
        if let Some(json) = &self.json {
            return OpenOptions::from_json(json).context("Failed to parse --json options");
        }
        Ok(OpenOptions {
            text: self.text.clone(),
            duration: self.duration,
            background_color: self.color.clone(),
            category: self.category.as_deref().map(Category::parse),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let headless = matches!(cli.command, Some(Commands::Show(_)));
    setup_tracing(cli.verbose, headless);

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("warning: {:#}, using defaults", e);
        tracing::warn!(error = %e, "config not loaded");
        Config::default()
    });

    let mut template = config.controller();
    if let Some(ms) = cli.transition {
        template.set_transition_duration(Duration::from_millis(ms));
    }
    let mut registry = ToastRegistry::new();
    registry.register(TOAST_NAME, move || template.clone())?;
    let toast = registry.create(TOAST_NAME)?;

    match cli.command {
        None | Some(Commands::Demo) => {
            let mut app = App::new(toast, config.palette(), config.tick_rate());
            app.run()?;
        }
        Some(Commands::Show(args)) => {
            show(toast, args.options()?)?;
        }
    }

    Ok(())
}

/// Run one toast to completion on the async driver.
fn show(toast: ToastController, options: OpenOptions) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    runtime.block_on(async move {
        let (handle, task) = driver::spawn(toast);
        let mut updates = handle.subscribe();
        handle.open(options)?;

        let mut last: Option<(DisplayState, bool)> = None;
        loop {
            updates.changed().await.context("Toast driver stopped")?;
            let snapshot = updates.borrow_and_update().clone();

            let key = (snapshot.state, snapshot.surface_open);
            if last != Some(key) {
                println!("{}", serde_json::to_string(&snapshot)?);
                last = Some(key);
            }
            if !snapshot.surface_open {
                break;
            }
        }

        handle.shutdown()?;
        task.await.context("Toast driver panicked")?;
        Ok::<_, anyhow::Error>(())
    })
}

fn setup_tracing(verbose: bool, headless: bool) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("TOASTLINE_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("toastline=debug")
        } else {
            EnvFilter::new("toastline=info")
        }
    });

    if headless {
        // stdout carries the JSON lines
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        return;
    }

    // The TUI owns the terminal, so log to a file
    let Some(log_dir) = log_dir() else { return };
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let log_path = log_dir.join("toastline.log");
    if let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        tracing::info!(path = ?log_path, "tracing initialized");
    }
}

/// TOASTLINE_LOG_DIR, else the platform cache dir
fn log_dir() -> Option<PathBuf> {
    std::env::var_os("TOASTLINE_LOG_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs::cache_dir().map(|d| d.join("toastline")))
}
