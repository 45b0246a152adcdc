mod series;
mod table;
mod tui;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use weekplot_core::{config_dir, week_options_with_format, Config};

#[derive(Parser)]
#[command(name = "weekplot")]
#[command(about = "Weekly production charts in the terminal", long_about = None)]
struct Cli {
    /// Directory holding config.json and the TUI log (default: ~/.weekplot)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the Terminal User Interface
    Tui,
    /// List the selectable weeks for a start date (usage: weeks 2023-12-01)
    Weeks {
        /// ISO date or shortcut (today, +1w, fri, ...)
        start: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Project one chart (usage: series 2023-12-01 2023-W01:15 title:Line max:50)
    Series {
        /// ISO date or shortcut (today, +1w, fri, ...)
        start: String,
        /// Week values and settings as key:value
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        /// Print the render request as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = config_dir(cli.config_dir)?;
    let command = cli.command.unwrap_or(Commands::Tui);

    let (config, notices) = load_config(&dir);

    // The TUI owns the terminal, so its log goes to a file
    let log_file = matches!(command, Commands::Tui).then(|| config.log_file_path(&dir));
    init_logging(log_file.as_deref());
    for notice in &notices {
        log::warn!("{}", notice);
    }

    match command {
        Commands::Tui => {
            // stderr is hidden behind the alternate screen
            let status = (!notices.is_empty()).then(|| notices.join("; "));
            tui::run(&config, status)?;
        }
        Commands::Weeks { start, json } => {
            let start = series::resolve_start(&start, Local::now().date_naive())?;
            let options = week_options_with_format(&start, &config.date_label_format);
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                println!("{}", table::render_weeks(&start, &options));
            }
        }
        Commands::Series { start, args, json } => {
            let start = series::resolve_start(&start, Local::now().date_naive())?;
            let built = series::build_series(&start, &args, config.defaults.clone())?;
            for warning in &built.warnings {
                eprintln!("Warning: {}", warning);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&built.view)?);
            } else {
                println!("{}", table::render_series(&built.view));
            }
        }
        Commands::Config => {
            println!("# {}", Config::config_file(&dir).display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

/// Loads the config, falling back to defaults. Returns what had to be
/// replaced so it can be shown to the user.
fn load_config(dir: &Path) -> (Config, Vec<String>) {
    let (mut config, mut notices) = match Config::from_dir(dir) {
        Ok(config) => (config, Vec::new()),
        Err(e) => (Config::default(), vec![format!("{:#}, using defaults", e)]),
    };
    notices.extend(config.repair());
    (config, notices)
}

fn init_logging(log_file: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        match open_log_file(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                // Shown before the TUI takes over the screen
                eprintln!("Warning: could not open log file {:?}: {}", path, e);
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    let _ = builder.try_init();
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("weekplot-cli-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_config_reports_invalid_file() {
        let dir = temp_dir("invalid");
        fs::write(dir.join("config.json"), "{ nope").unwrap();

        let (config, notices) = load_config(&dir);
        assert_eq!(config, Config::default());
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("could not parse config file"));
        assert!(notices[0].ends_with("using defaults"));
    }

    #[test]
    fn test_load_config_reports_unusable_format() {
        let dir = temp_dir("format");
        fs::write(
            dir.join("config.json"),
            r#"{ "defaults": { "title": "Output" }, "date_label_format": "%Q" }"#,
        )
        .unwrap();

        let (config, notices) = load_config(&dir);
        assert_eq!(config.defaults.title, "Output");
        assert_eq!(config.date_label_format, "%-m/%-d/%Y");
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn test_load_config_missing_file_is_quiet() {
        let dir = temp_dir("missing");
        let (config, notices) = load_config(&dir);
        assert_eq!(config, Config::default());
        assert!(notices.is_empty());
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = temp_dir("log");
        let path = dir.join("nested").join("weekplot.log");
        assert!(open_log_file(&path).is_ok());
        assert!(path.exists());

        // a file where the parent directory should be
        let blocked = dir.join("nested").join("weekplot.log").join("x.log");
        assert!(open_log_file(&blocked).is_err());
    }
}
