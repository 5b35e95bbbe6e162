use chrono::{Days, NaiveDate};

use crate::{
    model::{ForecastDay, Query, WeatherReport, WeatherSnapshot},
    view::WeatherView,
};

/// London at 20.0°C with `days` forecast days from 2024-06-01, averaging
/// 10.0°C, 11.0°C, ...
pub fn report(condition: &str, days: u32) -> WeatherReport {
    let first = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    WeatherReport {
        snapshot: WeatherSnapshot {
            location_name: "London".into(),
            country: "United Kingdom".into(),
            local_time: "2024-06-01 9:05".into(),
            current_temp_c: 20.0,
            condition_text: condition.into(),
            condition_icon_url: "https://cdn.weatherapi.com/day/113.png".into(),
        },
        forecast: (0..days)
            .map(|i| ForecastDay {
                date: first.checked_add_days(Days::new(u64::from(i))).unwrap(),
                avg_temp_c: 10.0 + f64::from(i),
                condition_text: condition.into(),
                condition_icon_url: "https://cdn.weatherapi.com/day/116.png".into(),
            })
            .collect(),
    }
}

/// A default view that has loaded [`report`] for "London".
pub fn loaded_view(condition: &str, days: u32) -> WeatherView {
    let mut view = WeatherView::default();
    let ticket = view.begin_fetch(Query::parse("London").unwrap());
    view.complete_fetch(ticket.generation, Ok(report(condition, days)));
    view
}
