use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weather_core::{CardRenderer, Config, Controller, SubmitOutcome, View, provider_from_config};

use crate::page::PageView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather as an HTML card")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key (and optionally a different base URL).
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,

        /// Provider base URL, e.g. "http://api.weatherapi.com/v1".
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Look up one city and print the card fragment.
    Show {
        /// City or location name.
        city: String,

        /// Write the full page here instead of printing the fragment.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Prompt for cities repeatedly, updating the card after each one.
    Interactive {
        /// Page file to keep up to date.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, base_url } => configure(api_key, base_url),
            Command::Show { city, output } => show(city, output).await,
            Command::Interactive { output } => interactive(output).await,
        }
    }
}

fn configure(api_key: Option<String>, base_url: Option<String>) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("WeatherAPI.com key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    cfg.set_api_key(api_key.to_string());
    if let Some(base_url) = base_url {
        cfg.base_url = base_url;
    }
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_controller(output: Option<PathBuf>) -> anyhow::Result<Controller<PageView>> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;
    let renderer = CardRenderer::new()?;
    let view = PageView::new(renderer.clone(), output);

    Ok(Controller::with_renderer(Arc::from(provider), renderer, view))
}

async fn show(city: String, output: Option<PathBuf>) -> anyhow::Result<()> {
    let to_file = output.is_some();
    let ctl = build_controller(output)?;

    ctl.view().await.set_input(&city);
    let outcome = ctl.submit().await;

    let view = ctl.into_view();
    if outcome == SubmitOutcome::Ignored {
        return Ok(());
    }

    if to_file {
        view.write_page()?;
    } else {
        println!("{}", view.container());
    }

    if outcome == SubmitOutcome::Failed {
        anyhow::bail!("weather lookup for '{}' failed", city.trim());
    }
    Ok(())
}

async fn interactive(output: Option<PathBuf>) -> anyhow::Result<()> {
    let to_file = output.is_some();
    let ctl = build_controller(output)?;
    ctl.view().await.write_page()?;

    loop {
        let city = match Text::new("City:").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        ctl.view().await.set_input(&city);
        let outcome = ctl.submit().await;

        let view = ctl.view().await;
        match outcome {
            SubmitOutcome::Ignored | SubmitOutcome::Superseded => {}
            SubmitOutcome::Rendered | SubmitOutcome::Failed if to_file => view.write_page()?,
            SubmitOutcome::Rendered | SubmitOutcome::Failed => println!("{}", view.container()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_parses_city_and_output() {
        let cli = Cli::try_parse_from(["weather", "show", "Paris", "--output", "page.html"])
            .expect("valid args");

        match cli.command {
            Command::Show { city, output } => {
                assert_eq!(city, "Paris");
                assert_eq!(output, Some(PathBuf::from("page.html")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn configure_accepts_key_flag() {
        let cli = Cli::try_parse_from(["weather", "configure", "--api-key", "K"]).expect("valid args");

        assert!(matches!(
            cli.command,
            Command::Configure { api_key: Some(ref k), base_url: None } if k == "K"
        ));
    }
}
