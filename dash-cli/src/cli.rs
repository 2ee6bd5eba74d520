use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Confirm, CustomType, Password, Text};
use std::{sync::Arc, time::Instant};
use weather_dash_core::{
    CachingGeolocator, Config, Coordinates, FileThemeStore, FixedGeolocator, MemoryThemeStore,
    Theme, ThemeStore, ViewController, WeatherBackend, backend_from_config,
    render::RenderContext, schedule::SUGGEST_DEBOUNCE,
};

use crate::{dashboard, logging::LogTarget, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard for the weather backend")]
pub struct Cli {
    /// Backend base URL, overriding the configured one.
    #[arg(long, global = true, value_name = "URL")]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the backend URL, login and default location.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "Paris".
        city: String,
    },

    /// Show weather for a position, or the configured default location.
    Locate {
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// List city suggestions for a partial name.
    Suggest { query: String },

    /// Print or change the saved theme.
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },

    /// Open the full-screen dashboard.
    Dashboard {
        /// City to load on start.
        city: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

impl Cli {
    pub fn log_target(&self) -> Result<LogTarget> {
        Ok(match self.command {
            Command::Dashboard { .. } => LogTarget::File(Config::log_file_path()?),
            _ => LogTarget::Stderr,
        })
    }

    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(url) = self.backend {
            config.backend.base_url = url;
        }

        match self.command {
            Command::Configure => configure(config)?,
            Command::Show { city } => {
                let mut controller = build_controller(&config, None).await?;
                controller.input(city, Instant::now());
                controller.submit().await;
                output::print_screen(&controller.screen(&RenderContext::local()));
            }
            Command::Locate { lat, lon } => {
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates { lat, lon });
                let mut controller = build_controller(&config, position).await?;
                controller.locate().await;
                output::print_screen(&controller.screen(&RenderContext::local()));
            }
            Command::Suggest { query } => {
                let mut controller = build_controller(&config, None).await?;
                let now = Instant::now();
                controller.input(query, now);
                controller.tick(now + SUGGEST_DEBOUNCE).await;
                output::print_suggestions(&controller.screen(&RenderContext::local()).suggestions);
            }
            Command::Theme { choice } => theme(choice)?,
            Command::Dashboard { city } => {
                let controller = build_controller(&config, None)
                    .await?
                    .with_auto_refresh(config.refresh_period(), Instant::now());
                dashboard::run(controller, city).await?;
            }
        }

        Ok(())
    }
}

/// Wire a controller to the configured backend, position source and theme file.
async fn build_controller(
    config: &Config,
    position: Option<Coordinates>,
) -> Result<ViewController> {
    let backend: Arc<dyn WeatherBackend> = Arc::from(backend_from_config(config).await?);
    let geolocator = CachingGeolocator::new(FixedGeolocator::new(position.or(config.location)));

    Ok(ViewController::new(backend, Box::new(geolocator), theme_store()))
}

fn theme_store() -> Box<dyn ThemeStore> {
    match FileThemeStore::default_location() {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!("Theme file unavailable, keeping theme in memory: {e:#}");
            Box::new(MemoryThemeStore::new())
        }
    }
}

fn configure(mut config: Config) -> Result<()> {
    config.backend.base_url = Text::new("Backend URL:")
        .with_default(&config.backend.base_url)
        .prompt()
        .context("Failed to read backend URL")?;

    let login = Confirm::new("Does the backend require a login?")
        .with_default(config.credentials().is_some())
        .prompt()?;
    if login {
        let username = Text::new("Username:")
            .with_initial_value(config.backend.username.as_deref().unwrap_or_default())
            .prompt()?;
        let password = Password::new("Password:").without_confirmation().prompt()?;
        config.set_credentials(username, password);
    } else {
        config.clear_credentials();
    }

    let fixed = Confirm::new("Set a default location for \"Use My Location\"?")
        .with_default(config.location.is_some())
        .prompt()?;
    config.location = if fixed {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number")
            .prompt()?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number")
            .prompt()?;
        Some(Coordinates { lat, lon })
    } else {
        None
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn theme(choice: Option<ThemeChoice>) -> Result<()> {
    let mut store = FileThemeStore::default_location()?;
    let current = weather_dash_core::theme::restore_theme(&store);

    let theme = match choice {
        None => current,
        Some(ThemeChoice::Light) => Theme::Light,
        Some(ThemeChoice::Dark) => Theme::Dark,
        Some(ThemeChoice::Toggle) => current.toggled(),
    };

    if choice.is_some() {
        store
            .save(theme.as_str())
            .with_context(|| format!("Failed to save theme to {}", store.path().display()))?;
    }

    println!("Theme: {theme}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_backend_after_subcommand() {
        let cli = Cli::parse_from(["weather-dash", "show", "Paris", "--backend", "http://h:1"]);
        assert_eq!(cli.backend.as_deref(), Some("http://h:1"));
        assert!(matches!(cli.command, Command::Show { ref city } if city == "Paris"));
    }

    #[test]
    fn locate_accepts_negative_coordinates() {
        let cli = Cli::parse_from(["weather-dash", "locate", "--lat", "-33.9", "--lon", "18.4"]);
        match cli.command {
            Command::Locate { lat, lon } => {
                assert_eq!(lat, Some(-33.9));
                assert_eq!(lon, Some(18.4));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn locate_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["weather-dash", "locate", "--lat", "1.0"]).is_err());
        assert!(Cli::try_parse_from(["weather-dash", "locate"]).is_ok());
    }

    #[test]
    fn theme_choice_is_optional() {
        let cli = Cli::parse_from(["weather-dash", "theme", "toggle"]);
        assert!(matches!(cli.command, Command::Theme { choice: Some(ThemeChoice::Toggle) }));

        let cli = Cli::parse_from(["weather-dash", "theme"]);
        assert!(matches!(cli.command, Command::Theme { choice: None }));

        assert!(Cli::try_parse_from(["weather-dash", "theme", "sepia"]).is_err());
    }

    #[test]
    fn only_dashboard_logs_to_a_file() {
        let cli = Cli::parse_from(["weather-dash", "suggest", "pa"]);
        assert_eq!(cli.log_target().unwrap(), LogTarget::Stderr);
    }
}
