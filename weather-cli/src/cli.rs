use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_core::{Config, ProviderId};

use crate::menu::Session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather by city or IP location")]
pub struct Cli {
    /// Without a subcommand the interactive menu starts.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive numbered menu.
    Menu,

    /// Show weather for a city (aliases like "спб" or "msk" work too).
    Show {
        /// City name.
        city: String,
    },

    /// Show weather for the location of your public IP address.
    Here,

    /// Store an API key for a provider in the settings file.
    Configure {
        /// Provider short name, "openweather" or "yandex".
        provider: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Menu) {
            Command::Configure { provider } => configure(&provider),
            Command::Menu => session()?.run_menu().await,
            Command::Show { city } => {
                session()?.show_city(&city).await;
                Ok(())
            }
            Command::Here => session()?.show_here().await,
        }
    }
}

fn session() -> anyhow::Result<Session> {
    let config = Config::load().context("Failed to load configuration")?;
    Session::new(&config)
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new(&format!("API ключ для {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("Empty API key, nothing saved.");
    }

    config.upsert_provider_api_key(id, api_key);
    config.save_to(&path)?;

    println!("Ключ для {id} сохранён в {}", path.display());
    if id == ProviderId::OpenWeather && config.is_provider_configured(ProviderId::Yandex) {
        println!("Внимание: при заданном ключе Яндекс Погоды используется именно он.");
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
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["weather"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn show_takes_city() {
        let cli = Cli::try_parse_from(["weather", "show", "Нижний Новгород"]).expect("parses");
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city, "Нижний Новгород"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
