//! Core library for the OpenWeather bot.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Retrieval of current weather from OpenWeather
//! - Rendering of readings into localized, emoji-annotated captions
//! - The bot's other texts (command menu, about, stop)
//!
//! It is used by `weather-bot`, but can also be reused by other binaries or services.

pub mod bot;
pub mod config;
pub mod error;
pub mod formatter;
pub mod i18n;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::FormatError;
pub use formatter::WeatherFormatter;
pub use i18n::{Catalog, Translator};
pub use model::{CurrentWeatherData, Units, WeatherRequest};
pub use provider::WeatherProvider;
