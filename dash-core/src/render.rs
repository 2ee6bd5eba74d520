//! Pure mapping from [`ViewState`] to what the dashboard shows.

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::{
    band::{ProbabilityBand, bar_width},
    icons::{Icon, icon_for},
    model::{CurrentWeather, ForecastEntry, Prediction, WeatherAlert, WeatherReport},
    state::{SearchField, Status, ViewState},
    theme::Theme,
};

/// Forecast cards shown, one per day.
pub const FORECAST_DAYS: usize = 5;

pub const LOCATE_LABEL: &str = "Use My Location";
pub const LOCATING_LABEL: &str = "Getting location...";
pub const RAIN_CHANCE_LABEL: &str = "Rain Chance";

/// Shown in place of a timestamp outside chrono's range.
pub const UNKNOWN_TIME: &str = "?";

/// Timezone that date labels are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The system timezone, resolved per timestamp so DST changes apply.
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    fn convert(self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => at.with_timezone(&Local).fixed_offset(),
            Zone::Fixed(offset) => at.with_timezone(&offset),
        }
    }
}

/// Clock and timezone used for date labels.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub zone: Zone,
    pub now: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(offset: FixedOffset, now: DateTime<Utc>) -> Self {
        Self { zone: Zone::Fixed(offset), now }
    }

    pub fn local() -> Self {
        Self { zone: Zone::Local, now: Utc::now() }
    }

    fn format_at(&self, ts: i64, fmt: &str) -> String {
        match DateTime::from_timestamp(ts, 0) {
            Some(at) => self.zone.convert(at).format(fmt).to_string(),
            None => UNKNOWN_TIME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub theme: Theme,
    pub theme_class: &'static str,
    pub toggle_icon: &'static str,
    pub search: SearchField,
    /// Labels of the visible suggestion list; empty when hidden.
    pub suggestions: Vec<String>,
    pub location_button: LocationButton,
    pub loading: bool,
    pub error: Option<String>,
    pub results: Option<Results>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationButton {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub current: CurrentCard,
    pub predictions: Vec<PredictionCard>,
    /// `None` when the backend sent no forecast series.
    pub forecast: Option<Vec<ForecastCard>>,
    pub alerts: Vec<AlertCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentCard {
    pub city: String,
    pub date: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub condition: String,
    pub icon: Icon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionCard {
    pub day: String,
    pub date: Option<String>,
    pub probability: String,
    pub band: ProbabilityBand,
    pub bar_width: f64,
    pub label: &'static str,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub day: String,
    pub date: String,
    pub icon: Icon,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertCard {
    pub style_class: String,
    pub title: String,
    pub description: String,
    pub valid: String,
}

pub fn render(state: &ViewState, ctx: &RenderContext) -> Screen {
    let (loading, error, results) = match &state.status {
        Status::Idle => (false, None, None),
        Status::Loading => (true, None, None),
        Status::Error(message) => (false, Some(message.clone()), None),
        Status::Success(report) => (false, None, Some(render_results(report, ctx))),
    };

    let suggestions = if state.suggestions.visible {
        state.suggestions.items.iter().map(|c| c.label()).collect()
    } else {
        Vec::new()
    };

    Screen {
        theme: state.theme,
        theme_class: state.theme.style_class(),
        toggle_icon: state.theme.toggle_icon(),
        search: state.search.clone(),
        suggestions,
        location_button: LocationButton {
            label: if state.locating { LOCATING_LABEL } else { LOCATE_LABEL },
            disabled: state.locating,
        },
        loading,
        error,
        results,
    }
}

pub fn render_results(report: &WeatherReport, ctx: &RenderContext) -> Results {
    Results {
        current: render_current(&report.current, ctx),
        predictions: render_predictions(&report.predictions),
        forecast: report.forecast_list().map(|list| render_forecast(list, ctx)),
        alerts: render_alerts(&report.alerts, ctx),
    }
}

pub fn render_current(current: &CurrentWeather, ctx: &RenderContext) -> CurrentCard {
    let description = current.description();

    CurrentCard {
        city: current.name.clone(),
        date: ctx.zone.convert(ctx.now).format("%A, %B %-d, %Y").to_string(),
        temperature: degrees(current.main.temp),
        feels_like: degrees(current.main.feels_like),
        humidity: format!("{}%", current.main.humidity),
        wind_speed: format!("{} m/s", current.wind.speed),
        pressure: format!("{} hPa", current.main.pressure),
        condition: description.to_string(),
        icon: icon_for(description),
    }
}

pub fn render_predictions(predictions: &[Prediction]) -> Vec<PredictionCard> {
    predictions
        .iter()
        .map(|p| PredictionCard {
            day: p.day.clone(),
            date: p.date.clone().filter(|d| !d.is_empty()),
            probability: format!("{}%", round_display(p.probability)),
            band: ProbabilityBand::from_probability(p.probability),
            bar_width: bar_width(p.probability),
            label: RAIN_CHANCE_LABEL,
            condition: p.condition.clone(),
        })
        .collect()
}

/// First [`FORECAST_DAYS`] entries in input order; the first is always "Today".
pub fn render_forecast(list: &[ForecastEntry], ctx: &RenderContext) -> Vec<ForecastCard> {
    list.iter()
        .take(FORECAST_DAYS)
        .enumerate()
        .map(|(index, entry)| {
            let description = entry.description();

            ForecastCard {
                day: if index == 0 { "Today".to_string() } else { ctx.format_at(entry.dt, "%a") },
                date: ctx.format_at(entry.dt, "%b %-d"),
                icon: icon_for(description),
                temperature: degrees(entry.main.temp),
                condition: description.to_string(),
                humidity: format!("{}%", entry.main.humidity),
                wind_speed: format!("{} m/s", entry.wind.speed),
            }
        })
        .collect()
}

pub fn render_alerts(alerts: &[WeatherAlert], ctx: &RenderContext) -> Vec<AlertCard> {
    const WINDOW: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

    alerts
        .iter()
        .map(|alert| {
            let severity = alert.severity.as_deref().filter(|s| !s.is_empty()).unwrap_or("info");
            let title = alert.event.as_deref().filter(|e| !e.is_empty()).unwrap_or("Weather Alert");

            AlertCard {
                style_class: format!("alert-{severity}"),
                title: title.to_string(),
                description: alert.description.clone(),
                valid: format!(
                    "Valid: {} - {}",
                    ctx.format_at(alert.start, WINDOW),
                    ctx.format_at(alert.end, WINDOW),
                ),
            }
        })
        .collect()
}

/// Nearest integer, halves rounded up.
pub fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn degrees(value: f64) -> String {
    format!("{}°", round_display(value))
}
