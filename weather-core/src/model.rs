use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unit system used both for the provider query and for the labels in the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// `"metric"` selects Celsius and m/s; every other selector means imperial.
    pub fn from_selector(selector: &str) -> Self {
        if selector == "metric" { Units::Metric } else { Units::Imperial }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_label(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    /// Translation key of the wind speed unit.
    pub fn wind_speed_key(&self) -> &'static str {
        match self {
            Units::Metric => "米/秒",
            Units::Imperial => "英里/小时",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Units {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Units {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let selector = String::deserialize(deserializer)?;
        Ok(Units::from_selector(&selector))
    }
}

#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub city: String,
    pub units: Units,
    pub lang: String,
}

/// One current-weather reading, already converted to the requested unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherData {
    pub weather_code: u16,
    pub weather_description: String,
    pub temp: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed: f64,
    pub gust: Option<f64>,
    /// hPa
    pub pressure: i32,
    /// km
    pub visibility: i32,
    /// mm over the last hour
    pub precipitation: Option<f64>,
    pub sunrise: String,
    pub sunset: String,
    /// `"%d %b %H:%M"` in the location's local time, e.g. `"16 Aug 11:14"`.
    pub time: String,
}

impl CurrentWeatherData {
    pub fn gust_value(&self) -> Option<f64> {
        non_zero(self.gust)
    }

    pub fn precipitation_value(&self) -> Option<f64> {
        non_zero(self.precipitation)
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_metric_selects_metric() {
        assert_eq!(Units::from_selector("metric"), Units::Metric);
        assert_eq!(Units::from_selector("imperial"), Units::Imperial);
        assert_eq!(Units::from_selector("Metric"), Units::Imperial);
        assert_eq!(Units::from_selector(""), Units::Imperial);
    }

    #[test]
    fn unknown_units_deserialize_as_imperial() {
        let units: Units = serde_json::from_str("\"standard\"").unwrap();
        assert_eq!(units, Units::Imperial);

        let units: Units = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(units, Units::Metric);
        assert_eq!(serde_json::to_string(&units).unwrap(), "\"metric\"");
    }

    #[test]
    fn zero_optional_fields_count_as_absent() {
        let data = CurrentWeatherData {
            weather_code: 800,
            weather_description: "clear sky".into(),
            temp: 20,
            feels_like: 19,
            humidity: 50,
            wind_speed: 3.0,
            gust: Some(0.0),
            pressure: 1013,
            visibility: 10,
            precipitation: None,
            sunrise: "05:12".into(),
            sunset: "19:40".into(),
            time: "16 Aug 11:14".into(),
        };

        assert_eq!(data.gust_value(), None);
        assert_eq!(data.precipitation_value(), None);

        let data = CurrentWeatherData { gust: Some(7.5), precipitation: Some(2.5), ..data };
        assert_eq!(data.gust_value(), Some(7.5));
        assert_eq!(data.precipitation_value(), Some(2.5));
    }
}
