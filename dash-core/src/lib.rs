//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - The view controller: user intent in, backend requests out
//! - An explicit view state and a pure render function over it
//! - The backend client abstraction and its HTTP implementation
//! - Static presentation data (condition icons, probability bands)
//! - Cancellable timers driven by caller-supplied time
//! - Configuration and theme persistence
//!
//! It is used by `weather-dash`, but any host that can draw a [`Screen`] and
//! feed key presses and clock ticks into a [`ViewController`] can reuse it.

pub mod backend;
pub mod band;
pub mod config;
pub mod controller;
pub mod error;
pub mod geo;
pub mod icons;
pub mod model;
pub mod render;
pub mod schedule;
pub mod state;
pub mod theme;

pub use backend::{WeatherBackend, backend_from_config, http::HttpBackend};
pub use band::ProbabilityBand;
pub use config::Config;
pub use controller::{
    Due, Key, PendingLocate, PendingQuery, PendingRefresh, PendingSuggest, Resolved, Suggested,
    ViewController,
};
pub use error::{FetchError, GeolocationError};
pub use geo::{CachingGeolocator, FixedGeolocator, Geolocator, PositionOptions};
pub use icons::{Icon, icon_for};
pub use model::{
    BackendReply, CitySuggestion, Coordinates, CurrentWeather, ForecastEntry, Prediction,
    WeatherAlert, WeatherReport,
};
pub use render::{RenderContext, Screen, Zone};
pub use state::{Status, ViewState};
pub use theme::{FileThemeStore, MemoryThemeStore, Theme, ThemeStore};
