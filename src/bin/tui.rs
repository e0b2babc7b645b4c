mod tui_app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tui_app::{
    format_kickoff, percent_color_name, placeholder, truncate, AppState, ConnectionStatus,
};

/// Hub-side polling runs every 30s; the client only needs to keep up.
const REDRAW_SECS: u64 = 5;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(io::Error::other)?;

    let mut app = AppState::new(base_url);

    // Initial fetch before rendering
    app.refresh(&client).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &client).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
) -> io::Result<()> {
    let refresh_interval = Duration::from_secs(REDRAW_SECS);
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app))?;

        let timeout = refresh_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            app.refresh(client).await;
                            last_tick = std::time::Instant::now();
                        }
                        KeyCode::Char('t') | KeyCode::Char('T') => app.retry_failed(client).await,
                        KeyCode::Char('m') | KeyCode::Char('M') => app.mark_all_read(client).await,
                        KeyCode::Right | KeyCode::Char('l') => {
                            app.next_sport();
                            app.refresh(client).await;
                        }
                        KeyCode::Left | KeyCode::Char('h') => {
                            app.prev_sport();
                            app.refresh(client).await;
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= refresh_interval {
            app.refresh(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState) {
    let area = f.area();

    // Outer vertical split: header | body | fixtures + notices | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // header
            Constraint::Min(8),         // body
            Constraint::Percentage(30), // fixtures + notices
            Constraint::Length(1),      // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    render_predictions(f, app, halves[0]);
    render_sport(f, app, halves[1]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_fixtures(f, app, lower[0]);
    render_notifications(f, app, lower[1]);

    render_footer(f, chunks[3]);
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn color_for(name: &str) -> Color {
    match name {
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "orange" => Color::LightRed,
        "red" => Color::Red,
        _ => Color::White,
    }
}

/// Loading / error / empty states render as a single line in the panel.
fn render_placeholder(f: &mut Frame, area: Rect, block: Block<'static>, text: String) {
    let color = if text.starts_with('✗') { Color::Red } else { Color::DarkGray };
    let paragraph = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };
    let unread = app.notifications.unread_count;
    let unread_color = if unread > 0 { Color::Magenta } else { Color::DarkGray };

    let title_spans = vec![
        Span::styled(
            " Predictions Hub  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(format!("🔔 {unread} unread"), Style::default().fg(unread_color)),
        Span::raw("  │  "),
        Span::styled(
            format!(
                "{} cycles ok / {} failed ({})",
                app.health.cycles_ok, app.health.cycles_failed, app.health.status
            ),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("updated {}s ago", app.last_refresh.elapsed().as_secs()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(title_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn render_predictions(f: &mut Frame, app: &AppState, area: Rect) {
    let page = &app.predictions;
    let updated = page
        .last_updated
        .as_deref()
        .map_or(String::new(), |t| format!("· {} ", format_kickoff(t)));
    let block = panel(format!(" PREDICTIONS {updated}"));

    if let Some(text) = placeholder(page, "No predictions available yet") {
        render_placeholder(f, area, block, text);
        return;
    }

    let header = Row::new(
        ["Prediction", "Conf"]
            .iter()
            .map(|h| Cell::from(*h).style(header_style())),
    );
    let rows: Vec<Row> = page
        .data
        .iter()
        .flatten()
        .map(|card| {
            let conf = card
                .confidence_percent
                .map_or("—".to_string(), |p| format!("{p}%"));
            let color = card.color.as_deref().map_or(Color::DarkGray, color_for);
            Row::new(vec![
                Cell::from(truncate(card.label(), 40)),
                Cell::from(conf).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(5)])
        .header(header)
        .block(block);
    f.render_widget(table, area);
}

fn render_sport(f: &mut Frame, app: &AppState, area: Rect) {
    let tabs: Vec<String> = app
        .sports
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if i == app.selected_sport {
                format!("[{} {}]", s.icon, s.name)
            } else {
                s.name.clone()
            }
        })
        .collect();
    let block = panel(format!(" {} ", tabs.join(" · ")));

    let Some(sport) = &app.sport_page else {
        render_placeholder(f, area, block, "Loading…".to_string());
        return;
    };
    if let Some(text) = placeholder(&sport.page, &format!("No {} predictions available", sport.sport.name)) {
        render_placeholder(f, area, block, text);
        return;
    }

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let header = Row::new(
        ["Time", "Match", "League", "Tip", "Conf"]
            .iter()
            .map(|h| Cell::from(*h).style(header_style())),
    );
    let feed = sport.page.data.as_ref();
    let rows: Vec<Row> = feed
        .map(|d| d.data.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|m| {
            let best = m.predictions.iter().max_by(|a, b| {
                a.confidence
                    .unwrap_or(0.0)
                    .total_cmp(&b.confidence.unwrap_or(0.0))
            });
            let tip = best
                .and_then(|l| l.suggested_bet.as_deref())
                .unwrap_or("—");
            let conf = best.and_then(|l| l.confidence);
            let time = if m.status == "live" {
                "LIVE".to_string()
            } else {
                m.time.clone()
            };
            Row::new(vec![
                Cell::from(time).style(Style::default().fg(Color::DarkGray)),
                Cell::from(truncate(&format!("{} vs {}", m.home_team, m.away_team), 32)),
                Cell::from(truncate(&m.league, 16)),
                Cell::from(truncate(tip, 16)),
                Cell::from(conf.map_or("—".to_string(), |c| format!("{c:.0}%")))
                    .style(Style::default().fg(conf.map_or(Color::DarkGray, |c| {
                        color_for(percent_color_name(c))
                    }))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(block);
    f.render_widget(table, inner[0]);

    let conclusion = feed.map_or("", |d| d.expert_conclusion.as_str());
    let paragraph = Paragraph::new(conclusion.to_string())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(paragraph, inner[1]);
}

fn render_fixtures(f: &mut Frame, app: &AppState, area: Rect) {
    let next = app
        .fixtures
        .next_refresh
        .as_deref()
        .map_or(String::new(), |t| format!("· next check {} ", format_kickoff(t)));
    let block = panel(format!(" FIXTURES {next}"));

    if let Some(text) = placeholder(&app.fixtures.page, "No upcoming fixtures") {
        render_placeholder(f, area, block, text);
        return;
    }

    let rows: Vec<Row> = app
        .fixtures
        .page
        .data
        .iter()
        .flatten()
        .map(|fx| {
            Row::new(vec![
                Cell::from(format_kickoff(&fx.kickoff)).style(Style::default().fg(Color::DarkGray)),
                Cell::from(truncate(&format!("{} vs {}", fx.home_team, fx.away_team), 34)),
                Cell::from(truncate(&fx.league, 14)).style(Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Length(11), Constraint::Min(10), Constraint::Length(14)],
    )
    .block(block);
    f.render_widget(table, area);
}

fn render_notifications(f: &mut Frame, app: &AppState, area: Rect) {
    let block = panel(" NOTIFICATIONS ".to_string());
    if app.notifications.notifications.is_empty() {
        render_placeholder(f, area, block, "No notifications".to_string());
        return;
    }

    let lines: Vec<Line> = app
        .notifications
        .notifications
        .iter()
        .map(|n| {
            let marker = if n.read { "  " } else { "● " };
            let style = if n.read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Magenta)),
                Span::styled(truncate(&n.title, 30), style),
                Span::styled(format!("  {}", truncate(&n.message, 40)), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("[← → / h l] ", Style::default().fg(Color::Yellow)),
        Span::raw("sport  "),
        Span::styled("[t] ", Style::default().fg(Color::Yellow)),
        Span::raw("try again  "),
        Span::styled("[m] ", Style::default().fg(Color::Yellow)),
        Span::raw("mark all read  "),
        Span::styled(format!("auto-refresh: {REDRAW_SECS}s"), Style::default().fg(Color::DarkGray)),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
