use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pluginlist::{
    collector::Collector,
    config::Preferences,
    model::{Category, PluginList},
    output::{export_csv, export_json, print_plugin_table},
    platform::default_installed_folder,
    service::{serve, RefreshService, DEFAULT_ADDR},
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "pluginlist")]
#[command(
    author,
    version,
    about = "List installed FL Studio plugins from the plugin database"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the plugin database and export the plugin list
    Scan {
        /// Path to the plugin database 'Installed' folder
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Export plugin names only
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        names_only: Option<bool>,

        /// Export one CSV file per category
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        separate_files: Option<bool>,

        /// Export products grouped by manufacturer as JSON instead of CSV
        #[arg(long)]
        json: bool,

        /// Directory to write exported files into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Don't update the saved preferences
        #[arg(long)]
        no_save: bool,
    },

    /// Print collected plugins as tables
    List {
        /// Path to the plugin database 'Installed' folder
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Only show one category (effects, generators)
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Push refreshed plugin lists to a WebSocket client
    Serve {
        /// Path to the plugin database 'Installed' folder
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Address to listen on
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: String,

        /// Seconds between refreshes
        #[arg(long, default_value_t = 300)]
        interval: u64,

        /// Directory to write exported files into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Show or create the preferences file
    Config {
        /// Create a default preferences file
        #[arg(long)]
        init: bool,

        /// Show preferences file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let prefs_path = Preferences::default_path();

    match cli.command {
        Commands::Scan {
            folder,
            names_only,
            separate_files,
            json,
            output_dir,
            no_save,
        } => {
            let mut prefs = load_preferences(&prefs_path);
            if folder.is_some() {
                prefs.installed_folder = folder;
            }
            if let Some(value) = names_only {
                prefs.names_only = value;
            }
            if let Some(value) = separate_files {
                prefs.separate_files = value;
            }

            let root = resolve_folder(&prefs)?;
            prefs.installed_folder = Some(root.clone());
            if !no_save {
                prefs.save(&prefs_path)?;
            }

            run_scan(&root, &prefs, json, &output_dir)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::List { folder, category } => {
            let mut prefs = load_preferences(&prefs_path);
            if folder.is_some() {
                prefs.installed_folder = folder;
            }
            let root = resolve_folder(&prefs)?;

            let list = collect_with_progress(&Collector::new(root))?;
            print_plugin_table(&list, category);
            Ok(exit_codes::SUCCESS)
        }
        Commands::Serve {
            folder,
            addr,
            interval,
            output_dir,
        } => {
            let mut prefs = load_preferences(&prefs_path);
            if folder.is_some() {
                prefs.installed_folder = folder;
            }
            let root = resolve_folder(&prefs)?;
            tracing::info!("Installed folder: {}", root.display());

            let service = RefreshService::new(root, output_dir)
                .with_interval(Duration::from_secs(interval));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to listen on {}", addr))?;

            tokio::select! {
                result = serve(listener, service) => result?,
                _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
            }
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(&prefs_path, init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_scan(root: &Path, prefs: &Preferences, json: bool, output_dir: &Path) -> Result<()> {
    let list = collect_with_progress(&Collector::new(root))?;

    if json {
        export_json(&list, output_dir)?;
    } else {
        export_csv(&list, prefs.export_options(), output_dir)?;
    }

    Ok(())
}

fn collect_with_progress(collector: &Collector) -> Result<PluginList> {
    let progress = if std::io::stderr().is_terminal() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scanning plugin database...");
        Some(pb)
    } else {
        None
    };

    let result = collector.collect();

    if let Some(pb) = progress {
        match &result {
            Ok(list) => pb.finish_with_message(format!("Found {} plugins", list.total())),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result.with_context(|| {
        format!(
            "Failed to collect plugins from {}",
            collector.root().display()
        )
    })
}

fn load_preferences(path: &Path) -> Preferences {
    match Preferences::load(path) {
        Ok(prefs) => {
            if let Some(folder) = &prefs.installed_folder {
                tracing::info!(
                    "Found last configuration in {}. Previous 'Installed' folder was: {}",
                    path.display(),
                    folder.display()
                );
            }
            prefs
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable preferences: {:#}", e);
            Preferences::default()
        }
    }
}

fn resolve_folder(prefs: &Preferences) -> Result<PathBuf> {
    let folder = prefs
        .installed_folder
        .clone()
        .or_else(default_installed_folder)
        .context(
            "No 'Installed' folder configured. Pass --folder with the path to \
             'Image-Line/FL Studio/Presets/Plugin database/Installed'",
        )?;

    if !folder.is_dir() {
        anyhow::bail!(
            "Path not found: {}. Please make sure you have entered the correct absolute path.",
            folder.display()
        );
    }

    Ok(folder)
}

fn handle_config(prefs_path: &Path, init: bool, show_path: bool) -> Result<()> {
    if show_path {
        println!("{}", prefs_path.display());
        return Ok(());
    }

    if init {
        if prefs_path.exists() {
            println!("Preferences already exist at: {}", prefs_path.display());
            return Ok(());
        }

        let prefs = Preferences {
            installed_folder: default_installed_folder(),
            ..Preferences::default()
        };
        prefs.save(prefs_path)?;
        println!("Created preferences at: {}", prefs_path.display());
        println!();
        println!("{}", serde_json::to_string_pretty(&prefs)?);
        return Ok(());
    }

    if prefs_path.exists() {
        let content = std::fs::read_to_string(prefs_path)?;
        println!("Preferences file: {}", prefs_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No preferences file found.");
        println!("Run 'pluginlist config --init' to create one.");
        println!();
        println!("Default preferences:");
        println!("{}", Preferences::generate_default());
    }

    Ok(())
}
