use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use crate::{
    backend::{
        CITY_SEARCH_ENDPOINT, COORDINATES_ENDPOINT, LOGIN_ENDPOINT, WEATHER_ENDPOINT,
        WeatherBackend,
    },
    error::FetchError,
    model::{BackendReply, CitySuggestion, Coordinates},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("weather-dash/", env!("CARGO_PKG_VERSION"));

/// Talks to the dashboard backend over HTTP, keeping its session cookie.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("Invalid backend URL '{base_url}'"))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Open a session; the backend answers a bad login by showing the login page again.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), FetchError> {
        let res = self
            .http
            .post(self.url(LOGIN_ENDPOINT))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint: LOGIN_ENDPOINT, source })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                endpoint: LOGIN_ENDPOINT,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        if res.url().path().trim_end_matches('/').ends_with(LOGIN_ENDPOINT) {
            return Err(FetchError::Auth(username.to_string()));
        }

        Ok(())
    }

    async fn read_body(
        endpoint: &'static str,
        res: reqwest::Response,
    ) -> Result<(StatusCode, String), FetchError> {
        let status = res.status();
        let body =
            res.text().await.map_err(|source| FetchError::Transport { endpoint, source })?;
        tracing::debug!(endpoint, %status, bytes = body.len(), "backend responded");
        Ok((status, body))
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    async fn weather_by_city(&self, city: &str) -> Result<BackendReply, FetchError> {
        tracing::debug!(city, "requesting weather by city");

        let res = self
            .http
            .post(self.url(WEATHER_ENDPOINT))
            .form(&[("city", city)])
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint: WEATHER_ENDPOINT, source })?;

        let (status, body) = Self::read_body(WEATHER_ENDPOINT, res).await?;
        decode_reply(WEATHER_ENDPOINT, status, &body)
    }

    async fn weather_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<BackendReply, FetchError> {
        tracing::debug!(lat = coords.lat, lon = coords.lon, "requesting weather by coordinates");

        let res = self
            .http
            .post(self.url(COORDINATES_ENDPOINT))
            .json(&coords)
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint: COORDINATES_ENDPOINT, source })?;

        let (status, body) = Self::read_body(COORDINATES_ENDPOINT, res).await?;
        decode_reply(COORDINATES_ENDPOINT, status, &body)
    }

    async fn search_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, FetchError> {
        let res = self
            .http
            .get(self.url(CITY_SEARCH_ENDPOINT))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint: CITY_SEARCH_ENDPOINT, source })?;

        let (status, body) = Self::read_body(CITY_SEARCH_ENDPOINT, res).await?;

        serde_json::from_str::<Option<Vec<CitySuggestion>>>(&body)
            .map(Option::unwrap_or_default)
            .map_err(|e| undecodable(CITY_SEARCH_ENDPOINT, status, &body, e.to_string()))
    }
}

/// The body is authoritative whatever the status; only an undecodable body
/// turns a non-success status into an error.
fn decode_reply(
    endpoint: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<BackendReply, FetchError> {
    BackendReply::from_json(body).map_err(|message| undecodable(endpoint, status, body, message))
}

fn undecodable(
    endpoint: &'static str,
    status: StatusCode,
    body: &str,
    message: String,
) -> FetchError {
    if status.is_success() {
        FetchError::Decode { endpoint, message }
    } else {
        FetchError::Status { endpoint, status: status.as_u16(), body: truncate_body(body) }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
