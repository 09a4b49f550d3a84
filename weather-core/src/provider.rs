use crate::{
    Config, CurrentWeatherData, WeatherRequest, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current-weather readings.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, request: &WeatherRequest) -> anyhow::Result<CurrentWeatherData>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather-bot configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = match &config.api_base_url {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url.clone()),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(Box::new(provider))
}
