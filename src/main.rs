use std::env;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use formcast_terminal::dataset;
use formcast_terminal::export;
use formcast_terminal::form::MatchPrediction;
use formcast_terminal::match_store::MatchStore;
use formcast_terminal::overview;
use formcast_terminal::state::{AppState, PredictFocus, Screen};

struct App {
    store: MatchStore,
    state: AppState,
    should_quit: bool,
    export_path: PathBuf,
}

impl App {
    fn new(store: MatchStore) -> Self {
        let export_path = env::var("EXPORT_XLSX_PATH")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("match_summary.xlsx"));
        let state = AppState::new(&store);
        Self {
            store,
            state,
            should_quit: false,
            export_path,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Overview,
            KeyCode::Char('2') => self.state.screen = Screen::Teams,
            KeyCode::Char('3') => self.state.screen = Screen::Predict,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.select_next(self.store.team_names().len());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.select_prev(self.store.team_names().len());
            }
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                if self.state.screen == Screen::Predict {
                    self.state.toggle_predict_focus();
                }
            }
            KeyCode::Enter | KeyCode::Char('p') => {
                if self.state.screen == Screen::Predict {
                    self.state.run_prediction(&self.store);
                }
            }
            KeyCode::Char('e') => self.export_summary(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn export_summary(&mut self) {
        match export::export_summary(&self.export_path, &self.store) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} teams / {} matches to {}",
                report.teams,
                report.matches,
                self.export_path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    // Load the full match log before touching the terminal; a bad dataset is
    // fatal and should read like a normal CLI error.
    let csv_path = resolve_csv_path();
    let store = match dataset::load_store(&csv_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(store);
    app.state
        .push_log(format!("[INFO] Loaded {} matches from {}", app.store.len(), csv_path.display()));
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn resolve_csv_path() -> PathBuf {
    let args = env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--csv=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        if arg == "--csv"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return PathBuf::from(next);
        }
    }
    if let Ok(path) = env::var("MATCHES_CSV")
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    PathBuf::from("all_matches.csv")
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Overview => render_overview(frame, chunks[1], app),
        Screen::Teams => render_teams(frame, chunks[1], app),
        Screen::Predict => render_predict(frame, chunks[1], app),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Overview => format!(
            "FORMCAST OVERVIEW | {} matches | {} teams",
            state.overview.matches, state.overview.teams
        ),
        Screen::Teams => "FORMCAST TEAMS".to_string(),
        Screen::Predict => "FORMCAST PREDICT".to_string(),
    };
    let line1 = format!("  .-.  {}", title);
    let line2 = " /___\\".to_string();
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    let hints = match state.screen {
        Screen::Overview => "1 Overview | 2 Teams | 3 Predict | e Export | ? Help | q Quit",
        Screen::Teams => "1 Overview | 3 Predict | j/k/↑/↓ Move | e Export | ? Help | q Quit",
        Screen::Predict => {
            "1 Overview | 2 Teams | Tab Side | j/k Move | Enter Predict | ? Help | q Quit"
        }
    };
    match state.last_log() {
        Some(log) => format!("{hints}  |  {log}"),
        None => hints.to_string(),
    }
}

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(5)])
        .split(columns[0]);

    frame.render_widget(top_winners_chart(&app.state), left[0]);

    let spread = Paragraph::new(spread_text(&app.state))
        .block(Block::default().title("Score Spread").borders(Borders::ALL));
    frame.render_widget(spread, left[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Min(4),
        ])
        .split(columns[1]);

    let ov = &app.state.overview;
    let rate = ov
        .home_win_rate
        .map(|r| format!("{r:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());
    let summary = Paragraph::new(format!(
        "Matches: {}\nHome win rate: {rate}",
        ov.matches
    ))
    .block(Block::default().title("Dataset").borders(Borders::ALL));
    frame.render_widget(summary, right[0]);

    let mut highest_lines = Vec::new();
    for m in &ov.highest_scoring {
        highest_lines.push(format!(
            "{}  {} {}-{} {}",
            m.date, m.home_team, m.home_score, m.away_score, m.away_team
        ));
    }
    if highest_lines.is_empty() {
        highest_lines.push("no matches loaded".to_string());
    }
    let highest = Paragraph::new(highest_lines.join("\n")).block(
        Block::default()
            .title("Highest Scoring")
            .borders(Borders::ALL),
    );
    frame.render_widget(highest, right[1]);

    // The season list can outgrow the panel; the most recent seasons are
    // the interesting tail.
    let season_area = right[2];
    let visible = season_area.height.saturating_sub(2) as usize;
    let seasons = &ov.seasonal;
    let start = seasons.len().saturating_sub(visible);
    let season_lines = seasons[start..]
        .iter()
        .map(|s| {
            format!(
                "{}  home {:.2}  away {:.2}  ({} matches)",
                s.season, s.avg_home_score, s.avg_away_score, s.matches
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let seasonal = Paragraph::new(season_lines).block(
        Block::default()
            .title("Season Averages")
            .borders(Borders::ALL),
    );
    frame.render_widget(seasonal, season_area);
}

fn top_winners_chart(state: &AppState) -> BarChart<'static> {
    let bars = state
        .overview
        .top_winners
        .iter()
        .map(|row| {
            Bar::default()
                .label(row.team.clone().into())
                .value(row.wins as u64)
        })
        .collect::<Vec<_>>();

    BarChart::default()
        .block(Block::default().title("Top Winners").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
}

fn spread_text(state: &AppState) -> String {
    match &state.overview.spread {
        Some(spread) => format!(
            "home  min {:.0}  q1 {:.1}  med {:.1}  q3 {:.1}  max {:.0}\naway  min {:.0}  q1 {:.1}  med {:.1}  q3 {:.1}  max {:.0}",
            spread.home.min,
            spread.home.q1,
            spread.home.median,
            spread.home.q3,
            spread.home.max,
            spread.away.min,
            spread.away.q1,
            spread.away.median,
            spread.away.q3,
            spread.away.max,
        ),
        None => "no matches loaded".to_string(),
    }
}

fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(30)])
        .split(area);

    render_team_list(
        frame,
        columns[0],
        app,
        app.state.team_selected,
        "Teams",
        true,
    );

    let teams = app.store.team_names();
    let Some(team) = teams.get(app.state.team_selected) else {
        let empty =
            Paragraph::new("no teams loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, columns[1]);
        return;
    };

    let yearly = overview::team_results_by_year(&app.store, team);
    let played: usize = yearly.iter().map(|y| y.played()).sum();
    let mut lines = vec![format!("{team} - {played} matches"), String::new()];
    let visible = columns[1].height.saturating_sub(4) as usize;
    let start = yearly.len().saturating_sub(visible);
    for y in &yearly[start..] {
        lines.push(format!(
            "{}   W {:>3}   D {:>3}   L {:>3}",
            y.year, y.wins, y.draws, y.losses
        ));
    }
    let panel = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .title("Results by Year")
            .borders(Borders::ALL),
    );
    frame.render_widget(panel, columns[1]);
}

fn render_predict(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(9)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_team_list(
        frame,
        columns[0],
        app,
        app.state.predict_home,
        "Home Team",
        app.state.predict_focus == PredictFocus::Home,
    );
    render_team_list(
        frame,
        columns[1],
        app,
        app.state.predict_away,
        "Away Team",
        app.state.predict_focus == PredictFocus::Away,
    );

    let body = if let Some(error) = &app.state.prediction_error {
        format!("[!] {error}")
    } else if let Some(prediction) = &app.state.prediction {
        prediction_text(prediction)
    } else {
        "Select a home and an away team, then press Enter.".to_string()
    };
    let panel = Paragraph::new(body).block(
        Block::default()
            .title("Last 10 Matches Form")
            .borders(Borders::ALL),
    );
    frame.render_widget(panel, rows[1]);
}

fn prediction_text(p: &MatchPrediction) -> String {
    let mut lines = vec![
        format!(
            "{}: scored at home {}   conceded at home {}",
            p.home_team,
            fmt_stat(p.home_form.avg_scored_home),
            fmt_stat(p.home_form.avg_conceded_home)
        ),
        format!(
            "{}: scored away {}      conceded away {}",
            p.away_team,
            fmt_stat(p.away_form.avg_scored_away),
            fmt_stat(p.away_form.avg_conceded_away)
        ),
        format!(
            "Attack margins: home {}  vs  away {}",
            fmt_stat(p.home_margin),
            fmt_stat(p.away_margin)
        ),
        String::new(),
        format!("Prediction: {}", p.outcome.label()),
    ];
    if !p.home_form.has_data() || !p.away_form.has_data() {
        lines.push("(insufficient data for at least one side)".to_string());
    }
    lines.join("\n")
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn render_team_list(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    selected: usize,
    title: &str,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let teams = app.store.team_names();
    if teams.is_empty() {
        let empty =
            Paragraph::new("no teams loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    if visible == 0 {
        return;
    }
    let (start, end) = visible_range(selected, teams.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let style = if idx == selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let row = Paragraph::new(teams[idx].as_str()).style(style);
        frame.render_widget(row, row_area);
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Formcast Terminal - Help",
        "",
        "Global:",
        "  1            Overview",
        "  2            Teams",
        "  3            Predict",
        "  e            Export summary workbook",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Teams / Predict:",
        "  j/k or ↑/↓   Move selection",
        "  Tab / ←/→    Switch home/away side",
        "  Enter / p    Predict selected matchup",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
