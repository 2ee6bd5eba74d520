use std::fmt::Write;
use weather_dash_core::render::{Results, Screen};

/// Render a screen as plain text, the way one-shot commands print it.
pub fn format_screen(screen: &Screen) -> String {
    if let Some(message) = &screen.error {
        return format!("Error: {message}\n");
    }
    if screen.loading {
        return "Loading...\n".to_string();
    }
    match &screen.results {
        Some(results) => format_results(results),
        None => String::new(),
    }
}

pub fn print_screen(screen: &Screen) {
    print!("{}", format_screen(screen));
}

pub fn print_suggestions(suggestions: &[String]) {
    if suggestions.is_empty() {
        println!("No suggestions.");
    }
    for label in suggestions {
        println!("{label}");
    }
}

fn format_results(results: &Results) -> String {
    let mut out = String::new();
    let c = &results.current;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}  {}", c.city, c.date);
    let _ = writeln!(out, "{} {}  {}", c.icon.glyph(), c.temperature, c.condition);
    let _ = writeln!(
        out,
        "Feels like {}  Humidity {}  Wind {}  Pressure {}",
        c.feels_like, c.humidity, c.wind_speed, c.pressure
    );

    if !results.predictions.is_empty() {
        let _ = writeln!(out, "\nRain predictions");
        for p in &results.predictions {
            let day = match &p.date {
                Some(date) => format!("{} {date}", p.day),
                None => p.day.clone(),
            };
            let _ = writeln!(
                out,
                "  {day:<12} {:>4} {}  [{}]  {}",
                p.probability,
                p.label,
                p.band.css_class(),
                p.condition
            );
        }
    }

    if let Some(forecast) = &results.forecast {
        let _ = writeln!(out, "\nForecast");
        for f in forecast {
            let _ = writeln!(
                out,
                "  {:<5} {:<6} {} {:>4}  {}  Humidity {}  Wind {}",
                f.day,
                f.date,
                f.icon.glyph(),
                f.temperature,
                f.condition,
                f.humidity,
                f.wind_speed
            );
        }
    }

    for alert in &results.alerts {
        let _ = writeln!(out, "\n[{}] {}", alert.style_class, alert.title);
        let _ = writeln!(out, "  {}", alert.description);
        let _ = writeln!(out, "  {}", alert.valid);
    }

    out
}
