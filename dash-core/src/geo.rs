use async_trait::async_trait;
use std::{
    fmt::Debug,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::{error::GeolocationError, model::Coordinates};

/// How a position fix is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// A cached fix younger than this may be reused.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(10 * 60),
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Answers with a configured position, or `Unavailable` when there is none.
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        self.position.ok_or(GeolocationError::Unavailable)
    }
}

/// Reuses the last fix while it is younger than `maximum_age`.
#[derive(Debug)]
pub struct CachingGeolocator<G> {
    inner: G,
    last_fix: Mutex<Option<(Instant, Coordinates)>>,
}

impl<G: Geolocator> CachingGeolocator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner, last_fix: Mutex::new(None) }
    }

    fn cached(&self, maximum_age: Duration) -> Option<Coordinates> {
        let fix = *self.last_fix.lock().ok()?;
        fix.filter(|(at, _)| at.elapsed() < maximum_age)
            .map(|(_, coords)| coords)
    }
}

#[async_trait]
impl<G: Geolocator> Geolocator for CachingGeolocator<G> {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        if let Some(coords) = self.cached(options.maximum_age) {
            tracing::debug!("reusing cached position fix");
            return Ok(coords);
        }

        let coords = self.inner.current_position(options).await?;
        if let Ok(mut guard) = self.last_fix.lock() {
            *guard = Some((Instant::now(), coords));
        }
        Ok(coords)
    }
}
