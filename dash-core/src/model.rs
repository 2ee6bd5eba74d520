use serde::{Deserialize, Deserializer, Serialize};

/// A latitude/longitude pair, also the JSON body of `POST /weather/coordinates`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub main: CurrentReadings,
    pub wind: Wind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Vec<Condition>,
}

impl CurrentWeather {
    /// Free-text description of the first reported condition, empty when none.
    pub fn description(&self) -> &str {
        first_description(&self.weather)
    }
}

/// Derived rain likelihood for one day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub day: String,
    #[serde(default)]
    pub date: Option<String>,
    pub probability: f64,
    pub condition: String,
}

/// One time-stamped reading from the multi-day series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds.
    pub dt: i64,
    pub main: ForecastReadings,
    pub wind: Wind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Vec<Condition>,
}

impl ForecastEntry {
    pub fn description(&self) -> &str {
        first_description(&self.weather)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub list: Option<Vec<ForecastEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
}

impl CitySuggestion {
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherAlert {
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Unix seconds.
    pub start: i64,
    /// Unix seconds.
    pub end: i64,
}

/// A successful weather payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub predictions: Vec<Prediction>,
    pub forecast: Option<Forecast>,
    pub alerts: Vec<WeatherAlert>,
}

impl WeatherReport {
    /// The forecast series, if the backend sent one with a `list`.
    pub fn forecast_list(&self) -> Option<&[ForecastEntry]> {
        self.forecast.as_ref().and_then(|f| f.list.as_deref())
    }
}

/// What a weather endpoint answered.
///
/// A backend-reported `error` is an expected response shape, not a failure of
/// the request itself.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    Rejected(String),
    Report(Box<WeatherReport>),
}

#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    current: Option<CurrentWeather>,
    #[serde(default, deserialize_with = "null_as_default")]
    predictions: Vec<Prediction>,
    #[serde(default)]
    forecast: Option<Forecast>,
    #[serde(default, deserialize_with = "null_as_default")]
    alerts: Vec<WeatherAlert>,
}

impl BackendReply {
    /// Classify a JSON body from `/weather` or `/weather/coordinates`.
    pub fn from_json(body: &str) -> Result<Self, String> {
        let raw: RawReply = serde_json::from_str(body).map_err(|e| e.to_string())?;

        if let Some(message) = raw.error.filter(|m| !m.is_empty()) {
            return Ok(BackendReply::Rejected(message));
        }

        let current = raw
            .current
            .ok_or_else(|| "response has neither `error` nor `current`".to_string())?;

        Ok(BackendReply::Report(Box::new(WeatherReport {
            current,
            predictions: raw.predictions,
            forecast: raw.forecast,
            alerts: raw.alerts,
        })))
    }
}

fn first_description(conditions: &[Condition]) -> &str {
    conditions.first().map(|c| c.description.as_str()).unwrap_or("")
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "current": {
            "name": "Paris",
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60, "pressure": 1012},
            "wind": {"speed": 3.1},
            "weather": [{"description": "light rain", "main": "Rain"}],
            "dt": 1700000000
        },
        "predictions": [{"day": "Mon", "probability": 72, "condition": "Rain likely"}]
    }"#;

    #[test]
    fn parses_report_and_ignores_unknown_fields() {
        let reply = BackendReply::from_json(PARIS).expect("valid body");
        let BackendReply::Report(report) = reply else {
            panic!("expected a report");
        };

        assert_eq!(report.current.name, "Paris");
        assert_eq!(report.current.description(), "light rain");
        assert_eq!(report.current.main.pressure, 1012.0);
        assert_eq!(report.predictions.len(), 1);
        assert_eq!(report.predictions[0].date, None);
        assert!(report.forecast_list().is_none());
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn error_field_wins_over_payload() {
        let reply = BackendReply::from_json(r#"{"error": "City not found or API error"}"#)
            .expect("valid body");
        assert_eq!(reply, BackendReply::Rejected("City not found or API error".into()));
    }

    #[test]
    fn empty_error_string_is_not_an_error() {
        let body = PARIS.replacen('{', r#"{"error": "","#, 1);
        let reply = BackendReply::from_json(&body).expect("valid body");
        assert!(matches!(reply, BackendReply::Report(_)));
    }

    #[test]
    fn missing_current_is_a_decode_failure() {
        let err = BackendReply::from_json(r#"{"predictions": []}"#).unwrap_err();
        assert!(err.contains("current"));
    }

    #[test]
    fn null_forecast_and_predictions_are_tolerated() {
        let body = PARIS.replacen('{', r#"{"forecast": null, "alerts": null,"#, 1);
        let BackendReply::Report(report) = BackendReply::from_json(&body).unwrap() else {
            panic!("expected a report");
        };
        assert!(report.forecast.is_none());
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn empty_weather_array_has_empty_description() {
        let body = PARIS.replace(r#"[{"description": "light rain", "main": "Rain"}]"#, "[]");
        let BackendReply::Report(report) = BackendReply::from_json(&body).unwrap() else {
            panic!("expected a report");
        };
        assert_eq!(report.current.description(), "");
    }

    #[test]
    fn suggestion_label_joins_name_and_country() {
        let city = CitySuggestion { name: "Paris".into(), country: "FR".into() };
        assert_eq!(city.label(), "Paris, FR");
    }
}
