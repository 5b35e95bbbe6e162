use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use skycast_core::{
    Config, DisplayUnit, Geolocator, Query, Session, ThemeMode, WeatherProvider, WeatherView,
    default_provider_from_config, geolocator_from_config,
};
use std::{path::PathBuf, process::ExitCode, sync::Arc};

use crate::{configure, logging::LogTarget, output, tui};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skycast",
    version,
    about = "Current weather and a 5-day forecast in your terminal"
)]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the full-screen weather view (the default).
    Ui(UiArgs),

    /// Print the weather for one location and exit.
    Show {
        /// City name or "lat,lon". Without it, the current location is used.
        query: Option<String>,

        #[arg(long)]
        fahrenheit: bool,
    },

    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, "rapidapi" or "weatherapi".
        provider: String,
    },
}

#[derive(Debug, Args, Default)]
pub struct UiArgs {
    /// Start with temperatures in Fahrenheit.
    #[arg(long)]
    pub fahrenheit: bool,

    /// Start in dark mode.
    #[arg(long)]
    pub dark: bool,

    /// Search this location instead of locating the device.
    #[arg(long)]
    pub query: Option<String>,
}

impl Cli {
    pub fn log_target(&self) -> Result<LogTarget> {
        match self.command {
            None | Some(Command::Ui(_)) => {
                let dirs = Config::project_dirs()?;
                Ok(LogTarget::File(dirs.data_dir().join("skycast.log")))
            }
            Some(_) => Ok(LogTarget::Stderr),
        }
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    pub async fn run(self) -> Result<ExitCode> {
        let path = self.config_path()?;
        let mut config = Config::load_from(&path)?;

        match self.command {
            Some(Command::Configure { provider }) => {
                configure::run(&path, config, &provider)?;
                Ok(ExitCode::SUCCESS)
            }
            Some(Command::Show { query, fahrenheit }) => {
                config.apply_env();
                show(&config, query.as_deref(), fahrenheit).await
            }
            Some(Command::Ui(args)) => {
                config.apply_env();
                ui(&config, args).await
            }
            None => {
                config.apply_env();
                ui(&config, UiArgs::default()).await
            }
        }
    }
}

fn initial_unit(config: &Config, fahrenheit: bool) -> DisplayUnit {
    if fahrenheit { DisplayUnit::Fahrenheit } else { config.default_unit }
}

async fn ui(config: &Config, args: UiArgs) -> Result<ExitCode> {
    let provider: Arc<dyn WeatherProvider> = Arc::from(default_provider_from_config(config)?);
    let geolocator: Arc<dyn Geolocator> = Arc::from(geolocator_from_config(config)?);

    let theme = if args.dark { ThemeMode::Dark } else { config.default_theme };
    let view = WeatherView::new(initial_unit(config, args.fahrenheit), theme);
    let mut session = Session::new(view, provider, geolocator, config.forecast_days);

    match args.query.as_deref().and_then(Query::parse) {
        Some(query) => session.start_with_query(query),
        None => session.start(),
    }

    tui::run(session).await?;
    Ok(ExitCode::SUCCESS)
}

async fn show(config: &Config, query: Option<&str>, fahrenheit: bool) -> Result<ExitCode> {
    let provider = default_provider_from_config(config)?;

    let query = match query.and_then(Query::parse) {
        Some(query) => query,
        None => {
            let geolocator = geolocator_from_config(config)?;
            let coords = geolocator
                .locate()
                .await
                .context("No location given and the current location could not be determined")?;
            Query::from_coordinates(coords)
        }
    };

    let mut view = WeatherView::new(initial_unit(config, fahrenheit), config.default_theme);
    let ticket = view.begin_fetch(query);
    let result = provider.fetch(&ticket.query, config.forecast_days).await;
    view.complete_fetch(ticket.generation, result);

    let screen = view.screen();
    print!("{}", output::render(&screen));

    Ok(if screen.error.is_some() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_opens_ui() {
        let cli = Cli::try_parse_from(["skycast"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.log_target().unwrap(), LogTarget::File(_)));
    }

    #[test]
    fn show_takes_optional_query() {
        let cli = Cli::try_parse_from(["skycast", "show", "New York", "--fahrenheit"]).unwrap();
        match cli.command {
            Some(Command::Show { query, fahrenheit }) => {
                assert_eq!(query.as_deref(), Some("New York"));
                assert!(fahrenheit);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["skycast", "show"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Show { query: None, .. })));
        assert_eq!(cli.log_target().unwrap(), LogTarget::Stderr);
    }

    #[test]
    fn global_config_flag() {
        let cli =
            Cli::try_parse_from(["skycast", "configure", "rapidapi", "--config", "/tmp/c.toml"])
                .unwrap();
        assert_eq!(cli.config_path().unwrap(), PathBuf::from("/tmp/c.toml"));
    }

    #[test]
    fn ui_flags() {
        let cli = Cli::try_parse_from(["skycast", "ui", "--dark", "--query", "Lima"]).unwrap();
        match cli.command {
            Some(Command::Ui(args)) => {
                assert!(args.dark);
                assert!(!args.fahrenheit);
                assert_eq!(args.query.as_deref(), Some("Lima"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flag_overrides_configured_unit() {
        let mut cfg = Config::default();
        assert_eq!(initial_unit(&cfg, false), DisplayUnit::Celsius);
        assert_eq!(initial_unit(&cfg, true), DisplayUnit::Fahrenheit);
        cfg.default_unit = DisplayUnit::Fahrenheit;
        assert_eq!(initial_unit(&cfg, false), DisplayUnit::Fahrenheit);
    }
}
