//! The view controller: turns user intent into backend requests and backend
//! answers into [`ViewState`] changes.
//!
//! Operations that issue a weather request are split in two. `begin_*` runs
//! synchronously and leaves the state showing the request in progress, so the
//! host can draw before awaiting. The returned pending value is then resolved
//! against the backend and applied; a response to a superseded request is
//! dropped.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    backend::WeatherBackend,
    error::{FetchError, GeolocationError},
    geo::{Geolocator, PositionOptions},
    model::{BackendReply, CitySuggestion},
    render::{RenderContext, Screen, render},
    schedule::{Debouncer, RefreshTimer, SUGGEST_DEBOUNCE},
    state::{RequestId, Status, ViewState},
    theme::{Theme, ThemeStore, persist_theme, restore_theme},
};

pub const VALIDATION_MESSAGE: &str = "Please enter a city name";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again.";
pub const LOCATION_FAILED_MESSAGE: &str =
    "Unable to get your location. Please enter a city manually.";
pub const LOCATION_WEATHER_FAILED_MESSAGE: &str = "Failed to get weather for your location";

/// Shortest trimmed input that triggers a suggestion lookup.
pub const MIN_QUERY_CHARS: usize = 2;

/// Keyboard shortcuts understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Focus the search field and select its text.
    FocusSearch,
    /// Submit, when the search field has focus.
    Enter,
    /// Clear the search field and hide results and errors.
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    City,
    Coordinates,
    Refresh,
}

/// A city query that has been started but not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingQuery {
    id: RequestId,
    city: String,
}

impl PendingQuery {
    pub fn city(&self) -> &str {
        &self.city
    }

    pub async fn run(self, backend: &dyn WeatherBackend) -> Resolved {
        let result = backend.weather_by_city(&self.city).await.map_err(Failure::Fetch);
        Resolved { id: self.id, origin: Origin::City, result }
    }
}

/// A location lookup that has been started but not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingLocate {
    id: RequestId,
    options: PositionOptions,
}

impl PendingLocate {
    /// Acquire a position within the lookup timeout, then ask for its weather.
    pub async fn run(self, geolocator: &dyn Geolocator, backend: &dyn WeatherBackend) -> Resolved {
        let position =
            tokio::time::timeout(self.options.timeout, geolocator.current_position(&self.options))
                .await
                .unwrap_or(Err(GeolocationError::Timeout));

        let result = match position {
            Ok(coords) => backend.weather_by_coordinates(coords).await.map_err(Failure::Fetch),
            Err(e) => Err(Failure::Position(e)),
        };
        Resolved { id: self.id, origin: Origin::Coordinates, result }
    }
}

/// A suggestion lookup whose quiet window has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingSuggest {
    query: String,
}

impl PendingSuggest {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn run(self, backend: &dyn WeatherBackend) -> Suggested {
        let result = backend.search_cities(&self.query).await;
        Suggested { query: self.query, result }
    }
}

/// A finished suggestion lookup waiting to be applied.
#[derive(Debug)]
pub struct Suggested {
    query: String,
    result: Result<Vec<CitySuggestion>, FetchError>,
}

/// Scheduled work that came due on a tick.
#[derive(Debug)]
pub enum Due {
    Suggest(PendingSuggest),
    Refresh(PendingRefresh),
}

/// A silent re-query of the last submitted city.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingRefresh {
    since: RequestId,
    city: String,
}

impl PendingRefresh {
    pub fn city(&self) -> &str {
        &self.city
    }

    pub async fn run(self, backend: &dyn WeatherBackend) -> Resolved {
        let result = backend.weather_by_city(&self.city).await.map_err(Failure::Fetch);
        Resolved { id: self.since, origin: Origin::Refresh, result }
    }
}

#[derive(Debug)]
enum Failure {
    Fetch(FetchError),
    Position(GeolocationError),
}

/// A finished weather request waiting to be applied.
#[derive(Debug)]
pub struct Resolved {
    id: RequestId,
    origin: Origin,
    result: Result<BackendReply, Failure>,
}

#[derive(Debug)]
pub struct ViewController {
    backend: Arc<dyn WeatherBackend>,
    geolocator: Arc<dyn Geolocator>,
    themes: Box<dyn ThemeStore>,
    state: ViewState,
    suggest: Debouncer<String>,
    refresh: Option<RefreshTimer>,
    last_city: Option<String>,
    position_options: PositionOptions,
}

impl ViewController {
    /// Create a controller, restoring the persisted theme.
    pub fn new(
        backend: Arc<dyn WeatherBackend>,
        geolocator: Box<dyn Geolocator>,
        themes: Box<dyn ThemeStore>,
    ) -> Self {
        let theme = restore_theme(themes.as_ref());

        Self {
            backend,
            geolocator: Arc::from(geolocator),
            themes,
            state: ViewState::new(theme),
            suggest: Debouncer::new(SUGGEST_DEBOUNCE),
            refresh: None,
            last_city: None,
            position_options: PositionOptions::default(),
        }
    }

    /// Enable periodic silent refresh (dashboard view only).
    pub fn with_auto_refresh(mut self, period: Duration, now: Instant) -> Self {
        self.refresh = Some(RefreshTimer::new(period, now));
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn backend(&self) -> Arc<dyn WeatherBackend> {
        Arc::clone(&self.backend)
    }

    pub fn geolocator(&self) -> Arc<dyn Geolocator> {
        Arc::clone(&self.geolocator)
    }

    pub fn last_city(&self) -> Option<&str> {
        self.last_city.as_deref()
    }

    pub fn screen(&self, ctx: &RenderContext) -> Screen {
        render(&self.state, ctx)
    }

    /// Validate the search text and start a city query.
    ///
    /// Empty input shows the validation message and sends nothing.
    pub fn begin_submit(&mut self) -> Option<PendingQuery> {
        let city = self.state.search.text.trim().to_string();
        if city.is_empty() {
            self.state.show_error(VALIDATION_MESSAGE);
            return None;
        }

        self.state.hide_suggestions();
        self.suggest.cancel();
        let id = self.state.issue_request();
        self.state.status = Status::Loading;
        self.last_city = Some(city.clone());

        tracing::debug!(?id, city = %city, "submitting weather query");
        Some(PendingQuery { id, city })
    }

    pub async fn complete(&mut self, pending: PendingQuery) -> bool {
        let resolved = pending.run(self.backend.as_ref()).await;
        self.apply(resolved)
    }

    /// Submit the current search text and wait for the answer.
    pub async fn submit(&mut self) {
        if let Some(pending) = self.begin_submit() {
            self.complete(pending).await;
        }
    }

    /// Apply a finished request. Returns whether it was still current.
    ///
    /// A refresh only ever replaces the results on success; its failures and
    /// rejections are logged and otherwise ignored.
    pub fn apply(&mut self, resolved: Resolved) -> bool {
        let Resolved { id, origin, result } = resolved;

        if origin == Origin::Coordinates {
            self.state.locating = false;
        }

        if origin == Origin::Refresh {
            return match result {
                Ok(BackendReply::Report(report)) => {
                    self.state.finish_request(id, Status::Success(report))
                }
                Ok(BackendReply::Rejected(message)) => {
                    tracing::info!("Auto-refresh rejected: {message}");
                    false
                }
                Err(e) => {
                    tracing::warn!("Auto-refresh failed: {e:?}");
                    false
                }
            };
        }

        let mut resolved_name = None;
        let outcome = match result {
            Ok(BackendReply::Rejected(message)) => Status::Error(message),
            Ok(BackendReply::Report(report)) => {
                if origin == Origin::Coordinates && !report.current.name.is_empty() {
                    resolved_name = Some(report.current.name.clone());
                }
                Status::Success(report)
            }
            Err(Failure::Position(e)) => {
                tracing::warn!("Geolocation error: {e}");
                Status::Error(LOCATION_FAILED_MESSAGE.into())
            }
            Err(Failure::Fetch(e)) => {
                tracing::error!(?id, "weather request failed: {e}");
                Status::Error(
                    match origin {
                        Origin::Coordinates => LOCATION_WEATHER_FAILED_MESSAGE,
                        _ => FETCH_FAILED_MESSAGE,
                    }
                    .to_string(),
                )
            }
        };

        let applied = self.state.finish_request(id, outcome);
        if applied {
            if let Some(name) = resolved_name {
                self.state.search.text = name.clone();
                self.last_city = Some(name);
            }
        }
        applied
    }

    /// Start a location lookup; `None` while one is already running.
    pub fn begin_locate(&mut self) -> Option<PendingLocate> {
        if self.state.locating {
            return None;
        }

        self.state.locating = true;
        let id = self.state.issue_request();
        Some(PendingLocate { id, options: self.position_options })
    }

    pub async fn complete_locate(&mut self, pending: PendingLocate) -> bool {
        let resolved = pending.run(self.geolocator.as_ref(), self.backend.as_ref()).await;
        self.apply(resolved)
    }

    /// Look up the current position and show its weather.
    pub async fn locate(&mut self) {
        if let Some(pending) = self.begin_locate() {
            self.complete_locate(pending).await;
        }
    }

    /// A keystroke changed the search text.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.state.search.text = text.into();
        self.state.search.selected = false;

        let query = self.state.search.text.trim();
        if query.chars().count() >= MIN_QUERY_CHARS {
            self.suggest.schedule(now, query.to_string());
        } else {
            self.suggest.cancel();
            self.state.hide_suggestions();
        }
    }

    /// Take the scheduled work that is due at `now` without running it.
    ///
    /// Hosts that must stay responsive run the returned work elsewhere and
    /// hand the results back through [`apply`](Self::apply) and
    /// [`apply_suggestions`](Self::apply_suggestions).
    pub fn poll_due(&mut self, now: Instant) -> Vec<Due> {
        let mut due = Vec::new();

        if let Some(query) = self.suggest.poll(now) {
            due.push(Due::Suggest(PendingSuggest { query }));
        }

        if self.refresh.as_mut().is_some_and(|timer| timer.poll(now)) {
            due.extend(self.begin_refresh().map(Due::Refresh));
        }

        due
    }

    /// Run whatever scheduled work is due at `now` and wait for it.
    pub async fn tick(&mut self, now: Instant) {
        for work in self.poll_due(now) {
            match work {
                Due::Suggest(pending) => {
                    let suggested = pending.run(self.backend.as_ref()).await;
                    self.apply_suggestions(suggested);
                }
                Due::Refresh(pending) => {
                    let resolved = pending.run(self.backend.as_ref()).await;
                    self.apply(resolved);
                }
            }
        }
    }

    /// Earliest instant at which [`poll_due`](Self::poll_due) has work to hand out.
    pub fn next_deadline(&self) -> Option<Instant> {
        let refresh = self.refresh.as_ref().and_then(RefreshTimer::deadline);
        match (self.suggest.deadline(), refresh) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Show fetched suggestions if the search text has not moved on since.
    pub fn apply_suggestions(&mut self, suggested: Suggested) -> bool {
        let Suggested { query, result } = suggested;

        if self.state.search.text.trim() != query {
            tracing::debug!(query, "discarding suggestions for outdated input");
            return false;
        }

        match result {
            Ok(items) => self.state.show_suggestions(items),
            Err(e) => {
                tracing::error!("Error fetching city suggestions: {e}");
                self.state.hide_suggestions();
            }
        }
        true
    }

    /// Start a silent refresh of the last submitted city, if any.
    ///
    /// The refresh does not supersede anything; it is dropped if a newer
    /// request is issued before it is applied.
    pub fn begin_refresh(&self) -> Option<PendingRefresh> {
        let city = self.last_city.clone()?;
        tracing::debug!(city = %city, "auto-refresh");
        Some(PendingRefresh { since: self.state.latest_request(), city })
    }

    /// Silently re-query the last submitted city. Errors are logged only.
    pub async fn refresh_now(&mut self) {
        if let Some(pending) = self.begin_refresh() {
            let resolved = pending.run(self.backend.as_ref()).await;
            self.apply(resolved);
        }
    }

    /// Pick a visible suggestion: fill the field and submit.
    pub fn choose_suggestion(&mut self, index: usize) -> Option<PendingQuery> {
        if !self.state.suggestions.visible {
            return None;
        }
        let chosen = self.state.suggestions.items.get(index)?.name.clone();

        self.state.search.text = chosen;
        self.state.search.selected = false;
        self.suggest.cancel();
        self.state.hide_suggestions();
        self.begin_submit()
    }

    /// Interaction outside the search field.
    pub fn dismiss_suggestions(&mut self) {
        self.state.hide_suggestions();
    }

    pub fn focus_search(&mut self) {
        self.state.search.focused = true;
    }

    pub fn blur_search(&mut self) {
        self.state.search.focused = false;
        self.state.search.selected = false;
        self.dismiss_suggestions();
    }

    pub fn key(&mut self, key: Key) -> Option<PendingQuery> {
        match key {
            Key::FocusSearch => {
                self.state.search.focused = true;
                self.state.search.selected = true;
                None
            }
            Key::Enter if self.state.search.focused => self.begin_submit(),
            Key::Enter => None,
            Key::Escape => {
                self.state.search.text.clear();
                self.state.search.selected = false;
                self.suggest.cancel();
                self.state.hide_suggestions();
                self.state.clear_results();
                self.last_city = None;
                None
            }
        }
    }

    /// Flip and persist the theme; storage failures are only logged.
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        persist_theme(self.themes.as_mut(), theme);
        theme
    }
}
