//! Full-screen terminal view.
//!
//! Keys are read on a plain thread and forwarded to the session as
//! [`Event::Input`]; the session re-renders after every event.

use std::{
    io::{self, Stdout},
    thread,
};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use skycast_core::{
    Action, BackgroundTheme, Event, Geolocator, QueryEdit, Screen, Session, ThemeMode,
    WeatherProvider,
};
use tokio::sync::mpsc::UnboundedSender;

const KEY_HINTS: &str = " Enter search · Ctrl-U/F2 unit · Ctrl-T/F3 theme · Ctrl-L clear · Esc quit ";

pub async fn run(session: Session<dyn WeatherProvider, dyn Geolocator>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    spawn_input_reader(session.sender());

    let result = session
        .run(|view| {
            let screen = view.screen();
            terminal.draw(|f| draw(f, &screen))?;
            Ok(())
        })
        .await;

    restore_terminal(&mut terminal)?;
    result.map(|_| ())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(term: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    term.show_cursor()?;
    Ok(())
}

fn spawn_input_reader(tx: UnboundedSender<Event>) {
    thread::spawn(move || {
        loop {
            let action = match event::read() {
                Ok(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => action_for_key(key),
                Ok(TermEvent::Resize(..)) => Some(Action::Redraw),
                Ok(_) => None,
                Err(err) => {
                    tracing::error!(error = %err, "failed to read terminal input");
                    Some(Action::Quit)
                }
            };

            let Some(action) = action else { continue };
            let quit = action == Action::Quit;
            if tx.send(Event::Input(action)).is_err() || quit {
                break;
            }
        }
    });
}

pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('u') if ctrl => Some(Action::ToggleUnit),
        KeyCode::Char('t') if ctrl => Some(Action::ToggleTheme),
        KeyCode::Char('l') if ctrl => Some(Action::Edit(QueryEdit::Clear)),
        KeyCode::F(2) => Some(Action::ToggleUnit),
        KeyCode::F(3) => Some(Action::ToggleTheme),
        KeyCode::Enter => Some(Action::Search),
        KeyCode::Backspace => Some(Action::Edit(QueryEdit::Backspace)),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Action::Edit(QueryEdit::Insert(c)))
        }
        _ => None,
    }
}

struct Palette {
    base: Style,
    accent: Color,
    error: Color,
}

fn palette(theme: ThemeMode, background: BackgroundTheme) -> Palette {
    let base = match theme {
        ThemeMode::Light => Style::default().fg(Color::Black).bg(Color::White),
        ThemeMode::Dark => Style::default().fg(Color::Gray).bg(Color::Black),
    };
    let accent = match background {
        BackgroundTheme::Rain => Color::Blue,
        BackgroundTheme::Cloudy => Color::DarkGray,
        BackgroundTheme::Snow => Color::Cyan,
        BackgroundTheme::Thunder => Color::Magenta,
        BackgroundTheme::Clear => Color::Yellow,
    };
    Palette { base, accent, error: Color::Red }
}

fn glyph(background: BackgroundTheme) -> &'static str {
    match background {
        BackgroundTheme::Rain => "☂",
        BackgroundTheme::Cloudy => "☁",
        BackgroundTheme::Snow => "❄",
        BackgroundTheme::Thunder => "↯",
        BackgroundTheme::Clear => "☀",
    }
}

pub fn draw(f: &mut Frame, screen: &Screen) {
    let pal = palette(screen.theme, screen.background);
    let area = f.area();
    f.render_widget(Block::default().style(pal.base), area);

    let [controls, error, current, forecast] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Min(0),
    ])
    .areas(area);

    draw_controls(f, controls, screen, &pal);

    if let Some(msg) = &screen.error {
        let line = Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(pal.error).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(line).style(pal.base), error);
    }

    draw_current(f, current, screen, &pal);
    draw_forecast(f, forecast, screen, &pal);
}

fn draw_controls(f: &mut Frame, area: Rect, screen: &Screen, pal: &Palette) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {} {} ", glyph(screen.background), screen.title),
            Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("[{}] [{}] ", screen.unit_toggle_label, screen.theme_toggle_label)),
    ]);

    let block = Block::bordered()
        .title(title)
        .title_bottom(Line::from(KEY_HINTS))
        .border_style(Style::default().fg(pal.accent))
        .style(pal.base);

    let input = if screen.query.is_empty() {
        Line::from(Span::styled("Enter city...", Style::default().add_modifier(Modifier::DIM)))
    } else {
        Line::from(screen.query.as_str())
    };
    f.render_widget(Paragraph::new(input).block(block), area);

    let typed = u16::try_from(screen.query.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = area.x.saturating_add(1).saturating_add(typed);
    if cursor_x < area.right().saturating_sub(1) {
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_current(f: &mut Frame, area: Rect, screen: &Screen, pal: &Palette) {
    let Some(current) = &screen.current else {
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            current.heading.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Local time: {}", current.local_time)),
        Line::from(vec![
            Span::styled(
                current.temperature.as_str(),
                Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(current.condition.as_str()),
        ]),
        Line::from(Span::styled(
            current.icon_url.as_str(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::bordered()
        .title(format!(" Now {} ", glyph(screen.background)))
        .border_style(Style::default().fg(pal.accent))
        .style(pal.base);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_forecast(f: &mut Frame, area: Rect, screen: &Screen, pal: &Palette) {
    if screen.forecast.is_empty() {
        return;
    }

    let block = Block::bordered()
        .title(format!(" {}-Day Forecast ", screen.forecast.len()))
        .border_style(Style::default().fg(pal.accent))
        .style(pal.base);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let count = screen.forecast.len() as u32;
    let columns = Layout::horizontal(
        screen.forecast.iter().map(|_| Constraint::Ratio(1, count)),
    )
    .split(inner);

    for (card, column) in screen.forecast.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                card.date_label.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(glyph(BackgroundTheme::from_condition(&card.condition))),
            Line::from(Span::styled(card.temperature.as_str(), Style::default().fg(pal.accent))),
            Line::from(card.condition.as_str()),
        ];
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).style(pal.base), *column);
    }
}
