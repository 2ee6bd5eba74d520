use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap,
};
use weather_dash_core::render::{
    AlertCard, CurrentCard, ForecastCard, PredictionCard, Results, Screen,
};

use crate::dashboard::colors::{self, Palette};

pub fn draw(frame: &mut Frame, screen: &Screen, highlighted: Option<usize>) {
    let palette = colors::palette(screen.theme);
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let [header, search, body, help] = Layout::vertical([
        Constraint::Length(1), // Title and toggles
        Constraint::Length(3), // Search bar
        Constraint::Min(5),    // Weather
        Constraint::Length(1), // Key help
    ])
    .areas(area);

    draw_header(frame, screen, &palette, header);
    draw_search_bar(frame, screen, &palette, search);
    draw_body(frame, screen, &palette, body);
    draw_help(frame, &palette, help);

    if !screen.suggestions.is_empty() {
        draw_suggestions(frame, &screen.suggestions, highlighted, &palette, search, area);
    }

    if screen.search.focused {
        let width = screen.search.text.chars().count() as u16;
        let x = (search.x + 2 + width).min(search.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, search.y + 1));
    }
}

fn draw_header(frame: &mut Frame, screen: &Screen, palette: &Palette, area: Rect) {
    let location_style = if screen.location_button.disabled {
        Style::default().fg(palette.muted)
    } else {
        Style::default().fg(palette.accent)
    };

    let line = Line::from(vec![
        Span::styled(" Weather Dashboard ", Style::default().fg(palette.accent).bold()),
        Span::raw("  "),
        Span::styled(format!("[Ctrl+L] {}", screen.location_button.label), location_style),
        Span::raw("  "),
        Span::styled(
            format!("[Ctrl+T] {} {}", colors::toggle_glyph(screen.toggle_icon), screen.theme),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_search_bar(frame: &mut Frame, screen: &Screen, palette: &Palette, area: Rect) {
    let border = if screen.search.focused { palette.accent } else { palette.muted };
    let text_style = if screen.search.selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let input = Paragraph::new(Span::styled(screen.search.text.as_str(), text_style)).block(
        Block::bordered()
            .title(" City (Alt+S) ")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, area);
}

fn draw_suggestions(
    frame: &mut Frame,
    suggestions: &[String],
    highlighted: Option<usize>,
    palette: &Palette,
    search: Rect,
    area: Rect,
) {
    let height = (suggestions.len() as u16 + 2).min(area.bottom().saturating_sub(search.bottom()));
    let popup = Rect::new(search.x + 1, search.bottom(), search.width.saturating_sub(2), height);

    let items: Vec<ListItem> = suggestions.iter().map(|s| ListItem::new(s.as_str())).collect();
    let list = List::new(items)
        .block(Block::bordered().border_style(Style::default().fg(palette.accent)))
        .style(Style::default().bg(palette.background).fg(palette.text))
        .highlight_style(Style::default().fg(palette.background).bg(palette.accent));

    let mut state = ListState::default().with_selected(highlighted);
    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}

fn draw_body(frame: &mut Frame, screen: &Screen, palette: &Palette, area: Rect) {
    if screen.loading {
        let loading = Paragraph::new("Loading weather data...")
            .style(Style::default().fg(palette.muted))
            .centered()
            .block(Block::default().padding(Padding::top(area.height / 2)));
        frame.render_widget(loading, area);
        return;
    }

    if let Some(message) = &screen.error {
        let error = Paragraph::new(message.as_str())
            .style(Style::default().fg(palette.error))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(" Error ")
                    .border_style(Style::default().fg(palette.error)),
            );
        frame.render_widget(error, area);
        return;
    }

    if let Some(results) = &screen.results {
        draw_results(frame, results, palette, area);
    }
}

fn draw_results(frame: &mut Frame, results: &Results, palette: &Palette, area: Rect) {
    let predictions_height = if results.predictions.is_empty() { 0 } else { 5 };
    let has_forecast = results.forecast.as_ref().is_some_and(|f| !f.is_empty());
    let forecast_height = if has_forecast { 6 } else { 0 };

    let [current, predictions, forecast, alerts] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(predictions_height),
        Constraint::Length(forecast_height),
        Constraint::Min(0),
    ])
    .areas(area);

    draw_current(frame, &results.current, palette, current);
    draw_predictions(frame, &results.predictions, palette, predictions);
    if let Some(cards) = &results.forecast {
        draw_forecast(frame, cards, palette, forecast);
    }
    draw_alerts(frame, &results.alerts, alerts);
}

fn draw_current(frame: &mut Frame, card: &CurrentCard, palette: &Palette, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(card.city.as_str(), Style::default().bold()),
            Span::styled(format!("  {}", card.date), Style::default().fg(palette.muted)),
        ]),
        Line::from(format!("{} {}  {}", card.icon.glyph(), card.temperature, card.condition)),
        Line::styled(
            format!(
                "Feels like {}   Humidity {}   Wind {}   Pressure {}",
                card.feels_like, card.humidity, card.wind_speed, card.pressure
            ),
            Style::default().fg(palette.muted),
        ),
    ];

    let widget = Paragraph::new(lines).block(Block::bordered().title(" Now "));
    frame.render_widget(widget, area);
}

fn draw_predictions(frame: &mut Frame, cards: &[PredictionCard], palette: &Palette, area: Rect) {
    if cards.is_empty() || area.height == 0 {
        return;
    }

    let columns = Layout::horizontal(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let title = match &card.date {
            Some(date) => format!(" {} {date} ", card.day),
            None => format!(" {} ", card.day),
        };
        let block = Block::bordered().title(title);
        let inner = block.inner(*column);
        frame.render_widget(block, *column);

        let [bar, condition, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(colors::band_color(card.band)).bg(palette.background))
            .ratio(card.bar_width / 100.0)
            .label(format!("{} {}", card.probability, card.label));
        frame.render_widget(gauge, bar);
        frame.render_widget(
            Paragraph::new(card.condition.as_str()).style(Style::default().fg(palette.muted)),
            condition,
        );
    }
}

fn draw_forecast(frame: &mut Frame, cards: &[ForecastCard], palette: &Palette, area: Rect) {
    if cards.is_empty() || area.height == 0 {
        return;
    }

    let columns = Layout::horizontal(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(format!("{} {}", card.icon.glyph(), card.temperature)),
            Line::from(card.condition.as_str()),
            Line::styled(format!("Humidity {}", card.humidity), Style::default().fg(palette.muted)),
            Line::styled(format!("Wind {}", card.wind_speed), Style::default().fg(palette.muted)),
        ];
        let widget = Paragraph::new(lines)
            .block(Block::bordered().title(format!(" {} {} ", card.day, card.date)));
        frame.render_widget(widget, *column);
    }
}

fn draw_alerts(frame: &mut Frame, cards: &[AlertCard], area: Rect) {
    if cards.is_empty() || area.height == 0 {
        return;
    }

    let rows = Layout::vertical(vec![Constraint::Length(5); cards.len()]).split(area);
    for (card, row) in cards.iter().zip(rows.iter()) {
        let color = colors::alert_color(&card.style_class);
        let widget = Paragraph::new(vec![
            Line::from(card.description.as_str()),
            Line::styled(card.valid.as_str(), Style::default().add_modifier(Modifier::DIM)),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(format!(" \u{26A0} {} ", card.title))
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(widget, *row);
    }
}

fn draw_help(frame: &mut Frame, palette: &Palette, area: Rect) {
    let help = concat!(
        " Enter search  Esc clear  Up/Down/Tab suggestions",
        "  Ctrl+L locate  Ctrl+T theme  Ctrl+C quit",
    );
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(palette.muted)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use ratatui::{Terminal, backend::TestBackend};
    use weather_dash_core::{
        BackendReply, Theme, ViewState,
        render::{RenderContext, render},
        state::Status,
    };

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw_state(state: &ViewState, highlighted: Option<usize>) -> String {
        let ctx = RenderContext::new(
            FixedOffset::east_opt(0).unwrap(),
            DateTime::from_timestamp(1_704_888_000, 0).unwrap(),
        );
        let screen = render(state, &ctx);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &screen, highlighted)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn draws_report_cards() {
        let reply = BackendReply::from_json(
            r#"{
                "current": {"name": "Paris",
                    "main": {"temp": 18.4, "feels_like": 17.2, "humidity": 60, "pressure": 1012},
                    "wind": {"speed": 3.1}, "weather": [{"description": "light rain"}]},
                "predictions": [{"day": "Thu", "probability": 72, "condition": "Rain likely"}]
            }"#,
        )
        .unwrap();
        let BackendReply::Report(report) = reply else { panic!("expected report") };

        let mut state = ViewState::new(Theme::Dark);
        state.status = Status::Success(report);
        let text = draw_state(&state, None);

        assert!(text.contains("Weather Dashboard"));
        assert!(text.contains("Paris"));
        assert!(text.contains("Wednesday, January 10, 2024"));
        assert!(text.contains("72% Rain Chance"));
        assert!(text.contains("Use My Location"));
    }

    #[test]
    fn draws_error_and_locating_label() {
        let mut state = ViewState::new(Theme::Light);
        state.status = Status::Error("City not found".into());
        state.locating = true;
        let text = draw_state(&state, None);

        assert!(text.contains("City not found"));
        assert!(text.contains("Getting location..."));
    }

    #[test]
    fn draws_suggestion_popup() {
        let mut state = ViewState::new(Theme::Light);
        state.search.text = "Pa".into();
        state.search.focused = true;
        state.show_suggestions(vec![weather_dash_core::CitySuggestion {
            name: "Paris".into(),
            country: "FR".into(),
        }]);
        let text = draw_state(&state, Some(0));

        assert!(text.contains("Paris, FR"));
    }
}
