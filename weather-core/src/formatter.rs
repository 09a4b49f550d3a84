//! Rendering of a [`CurrentWeatherData`] reading into the HTML caption the bot sends.

use chrono::{
    NaiveDateTime,
    format::{Item, StrftimeItems},
};

use crate::{
    error::FormatError,
    i18n::Translator,
    model::{CurrentWeatherData, Units},
};

/// Longest city name accepted from the user.
pub const MAX_CITY_CHARS: usize = 72;

/// Symbol used for codes missing from [`CONDITION_GROUPS`].
pub const UNKNOWN_CONDITION: &str = "🌀";

/// OpenWeather condition codes grouped by symbol, checked in order.
pub const CONDITION_GROUPS: &[(&[u16], &str)] = &[
    // clear
    (&[800], "☀"),
    // few clouds
    (&[801], "🌤"),
    // broken / overcast
    (&[803, 804], "🌥"),
    // scattered
    (&[802], "☁"),
    // rain
    (&[500, 501, 502, 503, 504], "🌦"),
    // drizzle and showers
    (&[300, 301, 302, 310, 311, 312, 313, 314, 321, 520, 521, 522, 531], "🌧"),
    // thunderstorm
    (&[200, 201, 202, 210, 211, 212, 221, 230, 231, 232], "⛈"),
    // snow and freezing rain
    (&[511, 600, 601, 602, 611, 612, 613, 615, 616, 620, 621, 622], "🌨"),
    // atmosphere
    (&[701, 711, 721, 731, 741, 751, 761, 762, 771, 781], "🌫"),
];

const INPUT_TIME_FORMAT: &str = "%Y %d %b %H:%M";
// The input carries no year; a leap year keeps "29 Feb" parseable.
const PLACEHOLDER_YEAR: &str = "2000";

/// Translation key of the display pattern for observation times; also the default pattern.
pub const TIME_PATTERN_KEY: &str = "%m月%d日 %H:%M";

const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Keep letters, hyphens and single interior spaces of a user-supplied city name.
pub fn sanitize_city(raw: &str) -> String {
    let mut city = String::new();

    for ch in raw.chars().take(MAX_CITY_CHARS) {
        if ch.is_alphabetic() || ch == '-' {
            city.push(ch);
        } else if ch.is_whitespace() && !city.is_empty() && !city.ends_with(' ') {
            city.push(' ');
        }
    }

    city.truncate(city.trim_end().len());
    city
}

pub fn condition_symbol(code: u16) -> &'static str {
    CONDITION_GROUPS
        .iter()
        .find(|(codes, _)| codes.contains(&code))
        .map(|(_, symbol)| *symbol)
        .unwrap_or(UNKNOWN_CONDITION)
}

/// Magnus approximation of the dew point.
///
/// Humidity is clamped to at least 1% so the logarithm stays finite.
pub fn dew_point(temp: i32, humidity: u8) -> i32 {
    let t = f64::from(temp);
    let rh = f64::from(humidity.max(1));

    let gamma = (MAGNUS_A * t) / (MAGNUS_B + t) + (rh / 100.0).ln();
    round_half_away(MAGNUS_B * gamma / (MAGNUS_A - gamma))
}

/// Nearest integer; ties go away from zero (`2.5` → `3`, `-2.5` → `-3`).
fn round_half_away(value: f64) -> i32 {
    value.round() as i32
}

/// Re-render `"16 Aug 11:14"` with the time pattern `translator` resolves for `lang`.
///
/// Locales without their own pattern get the default-locale one, same as their labels.
pub fn format_time(
    input: &str,
    translator: &dyn Translator,
    lang: &str,
) -> Result<String, FormatError> {
    let parsed =
        NaiveDateTime::parse_from_str(&format!("{PLACEHOLDER_YEAR} {input}"), INPUT_TIME_FORMAT)
            .map_err(|source| FormatError::InvalidTime { input: input.to_string(), source })?;

    let pattern = translator.translate(TIME_PATTERN_KEY, lang);
    if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        tracing::warn!(lang, %pattern, "invalid time pattern in catalogue, using default");
        return Ok(parsed.format(TIME_PATTERN_KEY).to_string());
    }

    Ok(parsed.format(&pattern).to_string())
}

/// Builds the current-weather caption, looking up every label through a [`Translator`].
pub struct WeatherFormatter<'a> {
    translator: &'a dyn Translator,
}

impl<'a> WeatherFormatter<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self { translator }
    }

    fn t(&self, key: &str, lang: &str) -> String {
        self.translator.translate(key, lang)
    }

    pub fn compose(
        &self,
        data: &CurrentWeatherData,
        units: Units,
        city: &str,
        lang: &str,
    ) -> Result<String, FormatError> {
        tracing::debug!(code = data.weather_code, lang, %units, "composing current weather");

        let time = format_time(&data.time, self.translator, lang)?;
        let emoji = condition_symbol(data.weather_code);
        let temp_units = units.temperature_label();
        let wind_units = self.t(units.wind_speed_key(), lang);
        let dew = dew_point(data.temp, data.humidity);

        let precipitation = match data.precipitation_value() {
            Some(mm) => {
                let fragment = format!(
                    ", <b>{mm} {}</b> {}",
                    self.t("毫米", lang),
                    self.t("一小时内的降水量", lang)
                );
                format!("☔ {}\n", fragment.trim_start_matches([',', ' ']).trim())
            }
            None => String::new(),
        };

        let gust = match data.gust_value() {
            Some(gust) => format!(", {}: <b>{gust} {wind_units}</b>", self.t("阵风可达", lang)),
            None => String::new(),
        };

        let mut message = format!("<b>{city}  {time}</b>\n{emoji} {}\n", data.weather_description);
        message.push_str(&precipitation);
        message.push('\n');
        message.push_str(&format!(
            "🌡 <b>{}{temp_units}</b>, {} <b>{}{temp_units}</b>\n\n",
            data.temp,
            self.t("体感温度", lang),
            data.feels_like,
        ));
        message.push_str(&format!(
            "💦 {}: <b>{}%</b>, {}: <b>{dew}{temp_units}</b>\n",
            self.t("湿度", lang),
            data.humidity,
            self.t("露点", lang),
        ));
        message.push_str(&format!(
            "💨 {}: <b>{} {wind_units}</b>{gust}\n",
            self.t("风速", lang),
            data.wind_speed,
        ));
        message.push_str(&format!(
            "🌡 {}: <b>{} {}</b>\n",
            self.t("气压", lang),
            data.pressure,
            self.t("百帕", lang),
        ));
        message.push_str(&format!(
            "🌫️ {}: <b>{} {}</b>\n\n",
            self.t("能见度", lang),
            data.visibility,
            self.t("公里", lang),
        ));
        message.push_str(&format!(
            "🌅 {}: <b>{}</b>  🌇 {}: <b>{}</b>",
            self.t("日出", lang),
            data.sunrise,
            self.t("日落", lang),
            data.sunset,
        ));

        Ok(message)
    }
}
