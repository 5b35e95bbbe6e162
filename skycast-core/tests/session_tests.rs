//! Full startup cycle: locate, fetch over HTTP, apply to the view.

use std::sync::Arc;

use serde_json::json;
use skycast_core::{
    Action, BackgroundTheme, Coordinates, DisplayUnit, Event, Flow, Geolocator, LocationError,
    QueryEdit, Session, ThemeMode, WeatherView,
    geolocation::{FixedGeolocator, IpGeolocator},
    provider::rapidapi::RapidApiProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rapid(server: &MockServer) -> RapidApiProvider {
    RapidApiProvider::new("k".into(), None, reqwest::Client::new()).with_base_url(&server.uri())
}

fn body(name: &str, condition: &str) -> serde_json::Value {
    json!({
        "location": { "name": name, "country": "Norway", "localtime": "2024-01-10 14:30" },
        "current": { "temp_c": -3.0, "condition": { "text": condition, "icon": "//cdn/x.png" } },
        "forecast": { "forecastday": [
            { "date": "2024-01-10", "day": { "avgtemp_c": -4.0, "condition": { "text": "Snow", "icon": "//cdn/a.png" } } },
            { "date": "2024-01-11", "day": { "avgtemp_c": -2.0, "condition": { "text": "Cloudy", "icon": "//cdn/b.png" } } }
        ] }
    })
}

#[tokio::test]
async fn located_device_loads_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "59.91,10.75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body("Oslo", "Moderate snow")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(rapid(&server));
    let geo = Arc::new(FixedGeolocator(Coordinates { latitude: 59.91, longitude: 10.75 }));
    let view = WeatherView::new(DisplayUnit::Fahrenheit, ThemeMode::Dark);
    let mut session = Session::new(view, provider, geo, 5);

    session.start();
    for _ in 0..2 {
        let event = session.next_event().await.unwrap();
        assert_eq!(session.handle(event), Flow::Continue);
    }

    let screen = session.view().screen();
    assert_eq!(screen.background, BackgroundTheme::Snow);
    let current = screen.current.expect("current panel");
    assert_eq!(current.heading, "Oslo, Norway");
    assert_eq!(current.temperature, "26.6°F");
    assert_eq!(screen.forecast.len(), 2);
    assert_eq!(screen.forecast[1].temperature, "28.4°F");
}

#[tokio::test]
async fn search_after_error_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "Bergen"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(body("Bergen", "Patchy rain nearby")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Nowhere"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{}"))
        .mount(&server)
        .await;

    let provider = Arc::new(rapid(&server));
    let geo = Arc::new(FixedGeolocator(Coordinates { latitude: 0.0, longitude: 0.0 }));
    let mut session = Session::new(WeatherView::default(), provider, geo, 5);

    for (query, expect_error) in [("Nowhere", true), ("Bergen", false)] {
        session.handle(Event::Input(Action::Edit(QueryEdit::Replace(query.into()))));
        session.handle(Event::Input(Action::Search));
        let event = session.next_event().await.unwrap();
        session.handle(event);

        assert_eq!(session.view().error().is_some(), expect_error, "after {query}");
        assert_eq!(session.view().report().is_some(), !expect_error, "after {query}");
    }
    assert_eq!(session.view().background(), BackgroundTheme::Rain);
}

#[tokio::test]
async fn ip_geolocator_reads_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "country": "Norway", "lat": 59.91, "lon": 10.75
        })))
        .mount(&server)
        .await;

    let geo = IpGeolocator::new(Some(format!("{}/json", server.uri())), reqwest::Client::new());
    let coords = geo.locate().await.unwrap();
    assert_eq!(coords, Coordinates { latitude: 59.91, longitude: 10.75 });
}

#[tokio::test]
async fn ip_geolocator_reports_failed_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail", "message": "private range"
        })))
        .mount(&server)
        .await;

    let geo = IpGeolocator::new(Some(server.uri()), reqwest::Client::new());
    assert_eq!(
        geo.locate().await,
        Err(LocationError::Unavailable("private range".into()))
    );
}
