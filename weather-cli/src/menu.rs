use anyhow::{Result, bail};
use inquire::{InquireError, Text};
use tracing::debug;
use weather_core::{
    Config, LocationQuery, LocationResolver, ProviderId, WeatherLookup, WeatherRecord,
};

use crate::display;

/// One entry of the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    City,
    Here,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::City),
            "2" => Some(MenuChoice::Here),
            "3" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Lookup plus IP locator, built once per process from the loaded config.
#[derive(Debug)]
pub struct Session {
    lookup: WeatherLookup,
    locator: LocationResolver,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        let lookup = WeatherLookup::from_config(config)?;
        debug!(provider = ?lookup.selected_provider(), "weather session ready");

        Ok(Self {
            lookup,
            locator: LocationResolver::from_config(config)?,
        })
    }

    pub fn banner(&self) -> &'static str {
        match self.lookup.selected_provider() {
            Some(ProviderId::Yandex) => "Источник данных: Яндекс Погода",
            Some(ProviderId::OpenWeather) => "Источник данных: OpenWeatherMap",
            None => {
                "Демо-режим: ключ API не задан, показываются тестовые данные.\n\
                 Для работы с реальными данными получите API ключ на openweathermap.org"
            }
        }
    }

    pub async fn city_weather(&self, city: &str) -> Option<WeatherRecord> {
        self.lookup.lookup(&LocationQuery::city(city)).await
    }

    pub async fn show_city(&self, city: &str) {
        println!("\nИщем погоду в городе {}...", city.trim());
        let weather = self.city_weather(city).await;
        println!("{}", display::render(weather.as_ref()));
    }

    /// Locate by IP, then look up by coordinates. Errors if the location
    /// itself could not be determined.
    pub async fn show_here(&self) -> Result<()> {
        println!("\nОпределяем ваше местоположение по IP...");
        let Some(location) = self.locator.locate().await else {
            println!("  Не удалось определить местоположение. Попробуйте вариант с городом.");
            bail!("IP location unavailable");
        };

        println!(
            "Найдено: {} (lat: {}, lon: {})",
            location.city, location.lat, location.lon
        );
        println!("\nПолучаем погоду по координатам...");

        let weather = self.lookup.lookup(&location.into_query()).await;
        println!("{}", display::render(weather.as_ref()));
        Ok(())
    }

    /// The numbered menu loop; one line of input per prompt.
    pub async fn run_menu(&self) -> Result<()> {
        println!("Добро пожаловать в парсер погоды!");
        println!("{}", self.banner());

        loop {
            println!("\nВыберите действие:");
            println!("1. Узнать погоду в городе");
            println!("2. Погода по моему местоположению (IP)");
            println!("3. Выход");

            let Some(input) = prompt_line("Введите номер (1-3):")? else {
                break;
            };

            match MenuChoice::parse(&input) {
                Some(MenuChoice::City) => {
                    let Some(city) = prompt_line("Введите название города:")? else {
                        break;
                    };
                    if city.trim().is_empty() {
                        println!("  Пожалуйста, введите название города");
                    } else {
                        self.show_city(&city).await;
                    }
                }
                Some(MenuChoice::Here) => {
                    if let Err(err) = self.show_here().await {
                        debug!(error = %err, "IP weather skipped");
                    }
                }
                Some(MenuChoice::Exit) => break,
                None => println!("  Неверный выбор. Попробуйте снова."),
            }
        }

        println!("  До свидания!");
        Ok(())
    }
}

/// `None` when the user cancels (Esc / Ctrl-C).
fn prompt_line(message: &str) -> Result<Option<String>> {
    match Text::new(message).prompt() {
        Ok(line) => Ok(Some(line)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
