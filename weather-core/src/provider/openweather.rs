use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::{CurrentWeatherData, WeatherRequest};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

// Reported when the response has no visibility field.
const DEFAULT_VISIBILITY_M: i32 = 10_000;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: i32,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub struct OwWeather {
    pub id: u16,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct OwWind {
    pub speed: f64,
    pub gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OwVolume {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OwSys {
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Deserialize)]
pub struct OwCurrentResponse {
    pub dt: i64,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
    pub visibility: Option<i32>,
    pub rain: Option<OwVolume>,
    pub snow: Option<OwVolume>,
    pub sys: OwSys,
}

/// Convert a decoded `/data/2.5/weather` response into the formatter's input.
pub fn current_from_response(parsed: OwCurrentResponse) -> Result<CurrentWeatherData> {
    let offset = FixedOffset::east_opt(parsed.timezone)
        .ok_or_else(|| anyhow!("OpenWeather returned an invalid timezone offset: {}", parsed.timezone))?;

    let (weather_code, weather_description) = parsed
        .weather
        .first()
        .map(|w| (w.id, w.description.clone()))
        .unwrap_or_else(|| (0, "Unknown".to_string()));

    let rain = parsed.rain.and_then(|v| v.one_hour);
    let snow = parsed.snow.and_then(|v| v.one_hour);
    let precipitation = match (rain, snow) {
        (None, None) => None,
        (rain, snow) => Some(rain.unwrap_or(0.0) + snow.unwrap_or(0.0)),
    };

    Ok(CurrentWeatherData {
        weather_code,
        weather_description,
        temp: parsed.main.temp.round() as i32,
        feels_like: parsed.main.feels_like.round() as i32,
        humidity: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        gust: parsed.wind.gust,
        pressure: parsed.main.pressure,
        visibility: parsed.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000,
        precipitation,
        sunrise: local_time(parsed.sys.sunrise, offset, "%H:%M")?,
        sunset: local_time(parsed.sys.sunset, offset, "%H:%M")?,
        time: local_time(parsed.dt, offset, "%d %b %H:%M")?,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, request: &WeatherRequest) -> Result<CurrentWeatherData> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::info!(city = %request.city, units = %request.units, lang = %request.lang, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", request.city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", request.units.as_str()),
                ("lang", request.lang.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;
        tracing::debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        current_from_response(parsed)
    }
}

fn local_time(ts: i64, offset: FixedOffset, pattern: &str) -> Result<String> {
    let utc = DateTime::<Utc>::from_timestamp(ts, 0)
        .ok_or_else(|| anyhow!("OpenWeather returned an out-of-range timestamp: {ts}"))?;

    Ok(utc.with_timezone(&offset).format(pattern).to_string())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Units;

    // Beijing, 16 Aug 2023 03:14 UTC.
    const BEIJING: &str = r#"{
        "coord": {"lon": 116.3972, "lat": 39.9075},
        "weather": [{"id": 501, "main": "Rain", "description": "中雨", "icon": "10d"}],
        "main": {"temp": 24.6, "feels_like": 25.2, "temp_min": 23.9, "temp_max": 25.9, "pressure": 1006, "humidity": 88},
        "visibility": 7000,
        "wind": {"speed": 2.1, "deg": 150, "gust": 4.3},
        "rain": {"1h": 2.5},
        "dt": 1692155640,
        "sys": {"country": "CN", "sunrise": 1692134700, "sunset": 1692184020},
        "timezone": 28800,
        "name": "Beijing"
    }"#;

    fn parse(json: &str) -> OwCurrentResponse {
        serde_json::from_str(json).expect("fixture must decode")
    }

    #[test]
    fn converts_full_response() {
        let data = current_from_response(parse(BEIJING)).unwrap();

        assert_eq!(data.weather_code, 501);
        assert_eq!(data.weather_description, "中雨");
        assert_eq!(data.temp, 25);
        assert_eq!(data.feels_like, 25);
        assert_eq!(data.humidity, 88);
        assert_eq!(data.pressure, 1006);
        assert_eq!(data.visibility, 7);
        assert_eq!(data.gust, Some(4.3));
        assert_eq!(data.precipitation, Some(2.5));
        assert_eq!(data.time, "16 Aug 11:14");
        assert_eq!(data.sunrise, "05:25");
        assert_eq!(data.sunset, "19:07");
    }

    #[test]
    fn converts_minimal_response() {
        let json = r#"{
            "weather": [],
            "main": {"temp": -0.4, "feels_like": -3.6, "pressure": 1030, "humidity": 0},
            "wind": {"speed": 0.0},
            "snow": {"3h": 1.0},
            "dt": 0,
            "sys": {"sunrise": 0, "sunset": 0}
        }"#;
        let data = current_from_response(parse(json)).unwrap();

        assert_eq!(data.weather_code, 0);
        assert_eq!(data.weather_description, "Unknown");
        assert_eq!(data.temp, 0);
        assert_eq!(data.feels_like, -4);
        assert_eq!(data.visibility, 10);
        assert_eq!(data.gust, None);
        assert_eq!(data.precipitation, None);
        assert_eq!(data.time, "01 Jan 00:00");
    }

    #[test]
    fn rain_and_snow_add_up() {
        let mut parsed = parse(BEIJING);
        parsed.snow = Some(OwVolume { one_hour: Some(0.5) });

        let data = current_from_response(parsed).unwrap();
        assert_eq!(data.precipitation, Some(3.0));
    }

    #[test]
    fn invalid_timezone_is_an_error() {
        let mut parsed = parse(BEIJING);
        parsed.timezone = 90_000;

        let err = current_from_response(parsed).unwrap_err();
        assert!(err.to_string().contains("timezone"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let short = "error";
        assert_eq!(truncate_body(short), "error");

        let long = "é".repeat(250);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }

    #[tokio::test]
    async fn fetches_and_converts_current_weather() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("q".into(), "Beijing".into()),
                mockito::Matcher::UrlEncoded("appid".into(), "KEY".into()),
                mockito::Matcher::UrlEncoded("units".into(), "metric".into()),
                mockito::Matcher::UrlEncoded("lang".into(), "zh_cn".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BEIJING)
            .create_async()
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), server.url());
        let request = WeatherRequest {
            city: "Beijing".into(),
            units: Units::Metric,
            lang: "zh_cn".into(),
        };

        let data = provider.current(&request).await.unwrap();
        assert_eq!(data.weather_code, 501);
        assert_eq!(data.time, "16 Aug 11:14");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body(r#"{"cod":"404","message":"city not found"}"#)
            .create_async()
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), server.url());
        let request = WeatherRequest {
            city: "Atlantis".into(),
            units: Units::Metric,
            lang: "en".into(),
        };

        let err = provider.current(&request).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("city not found"));
    }
}
