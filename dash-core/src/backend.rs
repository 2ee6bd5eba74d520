use crate::{
    Config,
    backend::http::HttpBackend,
    error::FetchError,
    model::{BackendReply, CitySuggestion, Coordinates},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod http;

pub const WEATHER_ENDPOINT: &str = "/weather";
pub const COORDINATES_ENDPOINT: &str = "/weather/coordinates";
pub const CITY_SEARCH_ENDPOINT: &str = "/cities/search";
pub const LOGIN_ENDPOINT: &str = "/login";

/// The weather/prediction service the dashboard talks to.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    /// `POST /weather` with a form-encoded `city`.
    async fn weather_by_city(&self, city: &str) -> Result<BackendReply, FetchError>;

    /// `POST /weather/coordinates` with a JSON `{lat, lon}` body.
    async fn weather_by_coordinates(&self, coords: Coordinates)
    -> Result<BackendReply, FetchError>;

    /// `GET /cities/search?q=...`; possibly empty.
    async fn search_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, FetchError>;
}

/// Build the HTTP backend from config, logging in first when credentials are set.
pub async fn backend_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherBackend>> {
    let backend = HttpBackend::new(&config.backend.base_url)?;

    if let Some((username, password)) = config.credentials() {
        backend.login(username, password).await.map_err(|e| {
            anyhow::anyhow!(
                "{e}\n\
                 Hint: run `weather-dash configure` to update the stored credentials."
            )
        })?;
        tracing::info!(user = username, "logged in to weather backend");
    }

    Ok(Box::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn backend_from_config_rejects_invalid_base_url() {
        let mut cfg = Config::default();
        cfg.backend.base_url = "not a url".into();

        let err = backend_from_config(&cfg).await.unwrap_err();
        assert!(err.to_string().contains("Invalid backend URL"));
    }

    #[tokio::test]
    async fn backend_from_config_without_credentials_skips_login() {
        let cfg = Config::default();
        assert!(cfg.credentials().is_none());
        assert!(backend_from_config(&cfg).await.is_ok());
    }
}
