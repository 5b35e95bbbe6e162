//! Event loop that owns a [`WeatherView`].
//!
//! Geolocation and fetches run as spawned tasks and report back over the
//! session's channel, so the view is only ever mutated from the task that
//! drives the session.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    config::MAX_FORECAST_DAYS,
    error::{FetchError, LocationError},
    geolocation::Geolocator,
    model::{Coordinates, Query, WeatherReport},
    provider::WeatherProvider,
    view::{FetchTicket, QueryEdit, WeatherView},
};

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Edit(QueryEdit),
    Search,
    ToggleUnit,
    ToggleTheme,
    /// No state change; forces a render, e.g. after a terminal resize.
    Redraw,
    Quit,
}

#[derive(Debug)]
pub enum Event {
    Input(Action),
    Located(Result<Coordinates, LocationError>),
    Fetched { generation: u64, result: Result<WeatherReport, FetchError> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct Session<P: ?Sized, G: ?Sized> {
    view: WeatherView,
    provider: Arc<P>,
    geolocator: Arc<G>,
    forecast_days: u8,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl<P, G> Session<P, G>
where
    P: WeatherProvider + ?Sized + 'static,
    G: Geolocator + ?Sized + 'static,
{
    pub fn new(view: WeatherView, provider: Arc<P>, geolocator: Arc<G>, forecast_days: u8) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let forecast_days = forecast_days.clamp(1, MAX_FORECAST_DAYS);
        Self { view, provider, geolocator, forecast_days, tx, rx }
    }

    pub fn view(&self) -> &WeatherView {
        &self.view
    }

    /// Handle for feeding input events from another thread or task.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Ask the geolocator for a position; a fix triggers the first fetch.
    pub fn start(&self) {
        let geolocator = Arc::clone(&self.geolocator);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let location = geolocator.locate().await;
            let _ = tx.send(Event::Located(location));
        });
    }

    /// Skip geolocation and fetch `query` straight away.
    pub fn start_with_query(&mut self, query: Query) {
        self.view.edit_query(QueryEdit::Replace(query.to_string()));
        let ticket = self.view.begin_fetch(query);
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let days = self.forecast_days;

        tokio::spawn(async move {
            let result = provider.fetch(&ticket.query, days).await;
            let _ = tx.send(Event::Fetched { generation: ticket.generation, result });
        });
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Apply one event to the view, spawning whatever work it implies.
    pub fn handle(&mut self, event: Event) -> Flow {
        match event {
            Event::Input(Action::Quit) => return Flow::Quit,
            Event::Input(Action::Edit(edit)) => self.view.edit_query(edit),
            Event::Input(Action::Search) => {
                if let Some(ticket) = self.view.handle_search() {
                    self.spawn_fetch(ticket);
                }
            }
            Event::Input(Action::ToggleUnit) => self.view.toggle_unit(),
            Event::Input(Action::ToggleTheme) => self.view.toggle_theme(),
            Event::Input(Action::Redraw) => {}
            Event::Located(location) => {
                if let Some(ticket) = self.view.on_located(location) {
                    self.spawn_fetch(ticket);
                }
            }
            Event::Fetched { generation, result } => {
                self.view.complete_fetch(generation, result);
            }
        }
        Flow::Continue
    }

    /// Render, wait for the next event, apply it; until [`Action::Quit`].
    pub async fn run<F>(mut self, mut render: F) -> anyhow::Result<WeatherView>
    where
        F: FnMut(&WeatherView) -> anyhow::Result<()>,
    {
        loop {
            render(&self.view)?;

            let Some(event) = self.next_event().await else {
                break;
            };
            if self.handle(event) == Flow::Quit {
                break;
            }
        }

        tracing::debug!("session finished");
        Ok(self.view)
    }
}
