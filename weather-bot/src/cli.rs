use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use weather_core::{
    Catalog, Config, Units, WeatherFormatter, WeatherRequest,
    bot::{self, CommandEntry},
    formatter::sanitize_city,
    provider::provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-bot", version, about = "OpenWeather bot, rendered in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default presentation settings.
    Configure,

    /// Show current weather for a city, formatted as the bot caption.
    Show {
        /// City name; anything but letters, hyphens and spaces is dropped.
        city: String,

        /// "metric" for °C and m/s; any other value means °F and mph.
        #[arg(long)]
        units: Option<String>,

        /// Language code, e.g. "zh_cn", "en" or "ru".
        #[arg(long)]
        lang: Option<String>,

        /// Print the raw reading as JSON instead of the caption.
        #[arg(long)]
        json: bool,
    },

    /// Print the /about caption.
    About {
        #[arg(long)]
        lang: Option<String>,
    },

    /// Print the command menu; all locales unless --lang is given.
    Commands {
        #[arg(long)]
        lang: Option<String>,
    },

    /// Print the /stop confirmation.
    Stop {
        #[arg(long)]
        lang: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;

        match self.command {
            Command::Configure => configure(Config::load()?, &catalog)?,
            Command::Show { city, units, lang, json } => {
                let config = Config::load()?.with_env_overrides();
                let city = sanitize_city(&city);
                if city.is_empty() {
                    bail!("City name must contain at least one letter.");
                }

                let units = units.map(|u| Units::from_selector(&u)).unwrap_or(config.units);
                let lang = lang.unwrap_or_else(|| config.lang.clone());
                let request = WeatherRequest { city: city.clone(), units, lang: lang.clone() };

                let provider = provider_from_config(&config)?;
                let data = provider
                    .current(&request)
                    .await
                    .with_context(|| format!("Failed to get current weather for '{city}'"))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                } else {
                    let message =
                        WeatherFormatter::new(&catalog).compose(&data, units, &city, &lang)?;
                    println!("{message}");
                }
            }
            Command::About { lang } => {
                let lang = lang.unwrap_or_else(configured_lang);
                println!("{}", bot::about_text(&catalog, &lang));
            }
            Command::Commands { lang } => {
                let locales = match lang {
                    Some(lang) => vec![lang],
                    None => catalog.available_locales(),
                };

                for (lang, menu) in bot::command_menus(&catalog, &locales) {
                    println!("[{lang}]");
                    print!("{}", render_menu(&menu));
                }
            }
            Command::Stop { lang } => {
                let lang = lang.unwrap_or_else(configured_lang);
                println!("{}", bot::data_deleted_text(&catalog, &lang));
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config, catalog: &Catalog) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:").without_confirmation().prompt()?;
    config.set_api_key(key);

    let units = Select::new("Unit system:", vec![Units::Metric, Units::Imperial]).prompt()?;
    config.units = units;

    let lang = Select::new("Language:", catalog.available_locales()).prompt()?;
    config.lang = lang;

    config.save()?;
    tracing::info!(path = %Config::config_file_path()?.display(), "configuration saved");
    println!("Configuration saved.");

    Ok(())
}

/// Language for the text-only commands. A missing or unreadable config falls back to the default.
fn configured_lang() -> String {
    lang_or_default(Config::load())
}

fn lang_or_default(config: anyhow::Result<Config>) -> String {
    match config {
        Ok(config) => config.lang,
        Err(err) => {
            tracing::warn!(error = %err, "could not load config, using default language");
            Config::default().lang
        }
    }
}

/// One `/command - description` line per entry.
fn render_menu(menu: &[CommandEntry]) -> String {
    menu.iter().map(|e| format!("/{} - {}\n", e.command, e.description)).collect()
}
