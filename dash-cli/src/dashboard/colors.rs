use ratatui::style::Color;
use weather_dash_core::{ProbabilityBand, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color::Rgb(240, 244, 248),
            text: Color::Rgb(33, 37, 41),
            muted: Color::Rgb(108, 117, 125),
            accent: Color::Rgb(52, 103, 235),
            error: Color::Rgb(200, 35, 51),
        },
        Theme::Dark => Palette {
            background: Color::Rgb(26, 26, 46),
            text: Color::Rgb(230, 230, 240),
            muted: Color::Rgb(140, 140, 160),
            accent: Color::Rgb(100, 181, 246),
            error: Color::Rgb(255, 107, 107),
        },
    }
}

pub fn band_color(band: ProbabilityBand) -> Color {
    match band {
        ProbabilityBand::Low => Color::Green,
        ProbabilityBand::Medium => Color::Yellow,
        ProbabilityBand::High => Color::Red,
    }
}

pub fn alert_color(style_class: &str) -> Color {
    match style_class.trim_start_matches("alert-") {
        "extreme" | "severe" => Color::Red,
        "moderate" | "warning" => Color::Yellow,
        _ => Color::Cyan,
    }
}

/// Terminal stand-in for the theme toggle's icon class.
pub fn toggle_glyph(toggle_icon: &str) -> &'static str {
    if toggle_icon.ends_with("fa-sun") { "\u{2600}" } else { "\u{263E}" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_by_theme() {
        assert_ne!(palette(Theme::Light).background, palette(Theme::Dark).background);
    }

    #[test]
    fn alert_colors_follow_severity() {
        assert_eq!(alert_color("alert-severe"), Color::Red);
        assert_eq!(alert_color("alert-moderate"), Color::Yellow);
        assert_eq!(alert_color("alert-info"), Color::Cyan);
    }

    #[test]
    fn toggle_glyph_matches_icon() {
        assert_eq!(toggle_glyph(Theme::Dark.toggle_icon()), "\u{2600}");
        assert_eq!(toggle_glyph(Theme::Light.toggle_icon()), "\u{263E}");
    }
}
