//! Explicit view state of the dashboard.
//!
//! Every visible aspect of the page is a field here; [`crate::render`] maps a
//! state to a screen without side effects.

use crate::{
    model::{CitySuggestion, WeatherReport},
    theme::Theme,
};

/// Most suggestions ever listed.
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error(String),
    Success(Box<WeatherReport>),
}

/// Generation of a user-initiated weather request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchField {
    pub text: String,
    pub focused: bool,
    /// Whole text selected; the next keystroke replaces it.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionList {
    pub items: Vec<CitySuggestion>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub status: Status,
    pub search: SearchField,
    pub suggestions: SuggestionList,
    /// Location button is disabled while a position/weather lookup runs.
    pub locating: bool,
    pub theme: Theme,
    latest: RequestId,
}

impl ViewState {
    pub fn new(theme: Theme) -> Self {
        Self { theme, ..Self::default() }
    }

    /// Issue a new request generation, superseding all earlier ones.
    pub fn issue_request(&mut self) -> RequestId {
        self.latest = RequestId(self.latest.0 + 1);
        self.latest
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id == self.latest
    }

    /// Apply a finished request's outcome unless a newer request was issued.
    /// Returns whether the outcome was applied.
    pub fn finish_request(&mut self, id: RequestId, outcome: Status) -> bool {
        if !self.is_current(id) {
            tracing::debug!(?id, latest = ?self.latest, "discarding stale response");
            return false;
        }
        self.status = outcome;
        true
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.status = Status::Error(message.into());
    }

    /// Hide both results and error. A request in flight keeps its loading
    /// indicator; its answer is still shown when it arrives.
    pub fn clear_results(&mut self) {
        if !self.is_loading() {
            self.status = Status::Idle;
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading)
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.status {
            Status::Success(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Replace the suggestion list; an empty list hides it.
    pub fn show_suggestions(&mut self, mut items: Vec<CitySuggestion>) {
        items.truncate(MAX_SUGGESTIONS);
        self.suggestions.visible = !items.is_empty();
        self.suggestions.items = items;
    }

    pub fn hide_suggestions(&mut self) {
        self.suggestions.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> CitySuggestion {
        CitySuggestion { name: name.into(), country: "XX".into() }
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut state = ViewState::default();
        let first = state.issue_request();
        let second = state.issue_request();

        assert!(!state.finish_request(first, Status::Error("late".into())));
        assert_eq!(state.status, Status::Idle);

        assert!(state.finish_request(second, Status::Error("fresh".into())));
        assert_eq!(state.status, Status::Error("fresh".into()));
    }

    #[test]
    fn suggestions_are_capped_and_empty_hides() {
        let mut state = ViewState::default();
        state.show_suggestions((0..8).map(|i| city(&format!("c{i}"))).collect());
        assert!(state.suggestions.visible);
        assert_eq!(state.suggestions.items.len(), MAX_SUGGESTIONS);

        state.show_suggestions(Vec::new());
        assert!(!state.suggestions.visible);
    }

    #[test]
    fn clearing_keeps_an_in_flight_request_visible() {
        let mut state = ViewState::default();
        state.status = Status::Error("City not found".into());
        state.clear_results();
        assert_eq!(state.status, Status::Idle);

        state.status = Status::Loading;
        state.clear_results();
        assert!(state.is_loading());
    }

    #[test]
    fn theme_is_carried_from_construction() {
        let state = ViewState::new(Theme::Dark);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.status, Status::Idle);
    }
}
