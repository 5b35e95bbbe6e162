//! Plain-text rendering of a [`Screen`] for the `show` command.

use skycast_core::Screen;
use std::fmt::Write;

pub fn render(screen: &Screen) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} [{}]", screen.title, screen.background);

    if let Some(err) = &screen.error {
        let _ = writeln!(out, "{err}");
    }

    if let Some(current) = &screen.current {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", current.heading);
        let _ = writeln!(out, "Local time: {}", current.local_time);
        let _ = writeln!(out, "{}  {}", current.temperature, current.condition);
        let _ = writeln!(out, "Icon: {}", current.icon_url);
    }

    if !screen.forecast.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}-Day Forecast", screen.forecast.len());
        for card in &screen.forecast {
            let _ = writeln!(
                out,
                "{:<16} {:>8}  {}",
                card.date_label, card.temperature, card.condition
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::{FETCH_ERROR_MESSAGE, FetchError, Query, WeatherView, fixtures::loaded_view};

    #[test]
    fn renders_current_and_forecast() {
        let text = render(&loaded_view("Light rain", 5).screen());

        assert!(text.starts_with("SkyCast [rain]\n"));
        assert!(text.contains("London, United Kingdom\n"));
        assert!(text.contains("Local time: 2024-06-01 9:05\n"));
        assert!(text.contains("20.0°C  Light rain\n"));
        assert!(text.contains("5-Day Forecast\n"));

        let first = text.find("Sat 2024-06-01").unwrap();
        let last = text.find("Wed 2024-06-05").unwrap();
        assert!(first < last);
        assert_eq!(text.matches("2024-06-0").count(), 6);
    }

    #[test]
    fn renders_error_only() {
        let mut view = WeatherView::default();
        let ticket = view.begin_fetch(Query::parse("Atlantis").unwrap());
        view.complete_fetch(ticket.generation, Err(FetchError::Malformed("x".into())));

        let text = render(&view.screen());
        assert_eq!(text, format!("SkyCast [clear]\n{FETCH_ERROR_MESSAGE}\n"));
    }
}
