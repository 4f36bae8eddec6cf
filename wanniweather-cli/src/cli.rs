use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};

use wanniweather_core::model::{RequestOutcome, Unit};
use wanniweather_core::provider::openweather::OpenWeatherProvider;
use wanniweather_core::{Config, WeatherQueryController};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wanniweather", version, about = "WanniWeather widget")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key in the config file.
    Configure,

    /// Show current conditions and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "Paris".
        city: String,

        /// Request Fahrenheit/mph instead of Celsius/m-s.
        #[arg(long)]
        imperial: bool,
    },

    /// Interactive widget loop: enter cities, toggle units.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, imperial } => {
                let unit = if imperial { Unit::Imperial } else { Unit::Metric };
                show(&city, unit).await
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key from prompt")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_controller() -> anyhow::Result<WeatherQueryController> {
    let config = Config::load()?;
    let api_key = config.resolve_api_key()?;
    let provider = OpenWeatherProvider::new(api_key);
    Ok(WeatherQueryController::new(Box::new(provider)))
}

async fn show(city: &str, unit: Unit) -> anyhow::Result<()> {
    let mut controller = build_controller()?;

    match controller.query(city, unit).await {
        RequestOutcome::Success => {
            render::render_results(&controller);
            Ok(())
        }
        RequestOutcome::Failed(message) => bail!("{message}"),
        // Empty city: query() refuses to fetch and stays Idle.
        RequestOutcome::Idle | RequestOutcome::Loading => bail!("Nothing to show: enter a city name."),
    }
}

async fn interactive() -> anyhow::Result<()> {
    let mut controller = build_controller()?;

    println!("WanniWeather — enter a city name, `:u` to toggle °C/°F, `:q` to quit.");

    loop {
        let prompt = format!("City [{}]:", controller.unit().temperature_suffix());
        let input = match Text::new(&prompt).prompt() {
            Ok(input) => input,
            // Esc / Ctrl-C leaves the loop cleanly.
            Err(inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match input.trim() {
            ":q" | ":quit" => break,
            ":u" | ":unit" => {
                let unit = controller.toggle_unit().await;
                println!("Units: {}", unit.temperature_suffix());
                render::render_outcome(&controller);
            }
            city => {
                controller.query(city, controller.unit()).await;
                render::render_outcome(&controller);
            }
        }
    }

    Ok(())
}
