use crate::clock::Clock;
use crate::engine::{TimerEngine, TimerSnapshot, TimerStatus};
use crate::utils::{format_clock, format_duration};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration as StdDuration;
use tracing::debug;

pub fn run_tui<C: Clock>(engine: &mut TimerEngine<C>, frame_interval: StdDuration) -> Result<()> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, engine, frame_interval);

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_loop<C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: &mut TimerEngine<C>,
    frame_interval: StdDuration,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, engine))?;

        if event::poll(frame_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(engine, key.code) {
                    return Ok(());
                }
            }
        }

        engine.tick();
    }
}

/// Applies a key press. Returns false when the user asked to quit.
fn handle_key<C: Clock>(engine: &mut TimerEngine<C>, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            engine.start_or_pause();
        }
        // Same as a disabled "next" button while completed or mid-transition.
        KeyCode::Char('n') | KeyCode::Right => {
            if !engine.is_completed() && !engine.is_transitioning() {
                engine.advance();
            }
        }
        KeyCode::Char('r') => engine.reset(),
        other => debug!(key = ?other, "unbound key"),
    }
    true
}

pub fn draw<C: Clock>(frame: &mut Frame, engine: &TimerEngine<C>) {
    let snapshot = engine.snapshot();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Countdown
            Constraint::Min(0),    // Up next
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], &engine.playlist().id, &snapshot);
    draw_countdown(frame, chunks[1], &snapshot);
    draw_upcoming(frame, chunks[2], engine);
    draw_footer(frame, chunks[3], &snapshot);
}

fn status_span(status: TimerStatus) -> Span<'static> {
    let (label, color) = match status {
        TimerStatus::Idle => ("READY", Color::Cyan),
        TimerStatus::Running => ("RUNNING", Color::Green),
        TimerStatus::Paused => ("PAUSED", Color::Yellow),
        TimerStatus::Transitioning => ("GET READY", Color::Magenta),
        TimerStatus::Completed => ("DONE", Color::Blue),
    };
    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn draw_header(frame: &mut Frame, area: Rect, playlist_id: &str, snapshot: &TimerSnapshot) {
    let header = Line::from(vec![
        Span::styled(
            " Intervo ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(playlist_id.to_string()),
        Span::raw(" | "),
        status_span(snapshot.status),
    ]);

    let para = Paragraph::new(header).block(Block::default().borders(Borders::ALL));
    frame.render_widget(para, area);
}

fn draw_countdown(frame: &mut Frame, area: Rect, snapshot: &TimerSnapshot) {
    let lines = match (&snapshot.current, snapshot.is_completed) {
        (Some(segment), false) => {
            let color = if segment.is_rest() {
                Color::Yellow
            } else {
                Color::Green
            };
            vec![
                Line::raw(""),
                Line::from(Span::styled(
                    segment.name.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::raw(""),
                Line::from(Span::styled(
                    format_clock(snapshot.remaining_secs),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ]
        }
        _ => vec![
            Line::raw(""),
            Line::from(Span::styled(
                "Timer completed!",
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )),
        ],
    };

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title(" NOW ").borders(Borders::ALL));
    frame.render_widget(para, area);
}

fn draw_upcoming<C: Clock>(frame: &mut Frame, area: Rect, engine: &TimerEngine<C>) {
    let items: Vec<ListItem> = engine
        .upcoming()
        .map(|segment| {
            let style = if segment.is_rest() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("  {:<24}", segment.name), style),
                Span::raw(format_duration(segment.duration)),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().title(" UP NEXT ").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, snapshot: &TimerSnapshot) {
    let toggle = if snapshot.is_transitioning {
        "-"
    } else if snapshot.is_running {
        "pause"
    } else {
        "start"
    };
    let next = if snapshot.is_completed || snapshot.is_transitioning {
        "-"
    } else {
        "next"
    };
    let help = Paragraph::new(format!(
        "space: {} | n: {} | r: reset | q: quit",
        toggle, next
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(help, area);
}
