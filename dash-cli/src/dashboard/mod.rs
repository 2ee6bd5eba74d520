//! Full-screen terminal dashboard.

mod app;
mod colors;
mod ui;

use anyhow::{Context, Result};
use weather_dash_core::ViewController;

pub use app::App;

/// Take over the terminal until the user quits.
pub async fn run(controller: ViewController, city: Option<String>) -> Result<()> {
    let mut terminal = ratatui::try_init().context("Failed to initialise terminal")?;
    tracing::info!("dashboard started");

    let result = App::new(controller).run(&mut terminal, city).await;

    ratatui::restore();
    tracing::info!("dashboard closed");
    result
}
