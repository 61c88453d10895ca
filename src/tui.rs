//! Ratatui terminal dashboard over the launch dataset.
//!
//! Shows the site selector as tabs, the payload range, the success pie
//! (as a bar chart plus share table) and the payload/outcome scatter.
//! Tab/Left/Right switch site, [ ] move the low bound, { } move the high
//! bound, r resets the range, q/Esc quits.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset as ChartDataset, GraphType,
    Paragraph, Row, Table, Tabs,
};
use ratatui::Terminal;

use crate::charts::{Figure, PieChart, ScatterChart};
use crate::controls::PageLayout;
use crate::dataset::Dataset;
use crate::dispatch::{ControlEvent, ControlState, Dispatcher, OutputId, Update};
use crate::types::{SiteSelection, SLIDER_MAX, SLIDER_MIN};

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::LightRed,
    Color::LightBlue,
    Color::Rgb(255, 165, 0),
    Color::White,
];

/// App-level TUI state.
pub struct App {
    pub layout: PageLayout,
    pub controls: ControlState,
    pub selected_tab: usize,
    pub pie: Option<PieChart>,
    pub scatter: Option<ScatterChart>,
    pub should_quit: bool,
    pub dispatches: u64,
    pub last_dispatch: Duration,
    pub uptime: Instant,
}

impl App {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            layout: PageLayout::new(dataset),
            controls: ControlState::initial(dataset),
            selected_tab: 0,
            pie: None,
            scatter: None,
            should_quit: false,
            dispatches: 0,
            last_dispatch: Duration::ZERO,
            uptime: Instant::now(),
        }
    }

    fn site_count(&self) -> usize {
        self.layout.dropdown.options.len()
    }

    fn selection_at(&self, idx: usize) -> SiteSelection {
        self.layout
            .dropdown
            .options
            .get(idx)
            .map(|o| o.value.clone())
            .unwrap_or_default()
    }

    /// Store freshly rendered figures.
    fn record_updates(&mut self, updates: Vec<Update>, took: Duration) {
        self.dispatches += 1;
        self.last_dispatch = took;
        for update in updates {
            match (update.output, update.figure) {
                (OutputId::SuccessPieChart, Figure::Pie(pie)) => self.pie = Some(pie),
                (OutputId::SuccessPayloadScatterChart, Figure::Scatter(scatter)) => {
                    self.scatter = Some(scatter)
                }
                (output, figure) => {
                    tracing::warn!(output = output.as_str(), title = figure.title(), "unexpected figure kind")
                }
            }
        }
    }

    /// Translate a key press into a control event, if it maps to one.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<ControlEvent> {
        let payload = self.controls.payload;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab | KeyCode::Right => {
                self.selected_tab = (self.selected_tab + 1) % self.site_count();
                Some(ControlEvent::SiteSelected(self.selection_at(self.selected_tab)))
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.selected_tab = self
                    .selected_tab
                    .checked_sub(1)
                    .unwrap_or(self.site_count() - 1);
                Some(ControlEvent::SiteSelected(self.selection_at(self.selected_tab)))
            }
            KeyCode::Char('[') => Some(ControlEvent::PayloadChanged(payload.step_low(-1))),
            KeyCode::Char(']') => Some(ControlEvent::PayloadChanged(payload.step_low(1))),
            KeyCode::Char('{') => Some(ControlEvent::PayloadChanged(payload.step_high(-1))),
            KeyCode::Char('}') => Some(ControlEvent::PayloadChanged(payload.step_high(1))),
            KeyCode::Char('r') => Some(ControlEvent::PayloadChanged(self.layout.slider.value)),
            _ => None,
        }
    }
}

/// Run the terminal dashboard until the user quits.
pub fn run(dataset: Arc<Dataset>) -> Result<()> {
    let dispatcher = Dispatcher::new(dataset.clone());
    let mut app = App::new(&dataset);

    let started = Instant::now();
    let updates = dispatcher.initial(&app.controls);
    app.record_updates(updates, started.elapsed());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    let result = event_loop(&mut terminal, &dispatcher, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    dispatcher: &Dispatcher,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(event) = app.handle_key(key.code) {
                        let started = Instant::now();
                        let updates = dispatcher.apply(&mut app.controls, event);
                        app.record_updates(updates, started.elapsed());
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// ── Drawing ──────────────────────────────────────────────────────────────

fn draw(f: &mut ratatui::Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // site tabs
            Constraint::Length(4),  // controls + stats
            Constraint::Min(10),    // charts
            Constraint::Length(1),  // footer
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_controls(f, app, chunks[1]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    draw_pie(f, app, charts[0]);
    draw_scatter(f, app, charts[1]);

    draw_footer(f, app, chunks[3]);
}

fn draw_tabs(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .layout
        .dropdown
        .options
        .iter()
        .map(|o| Line::from(Span::styled(o.label.clone(), Style::default().fg(Color::White))))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", app.layout.title)),
        )
        .select(app.selected_tab)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_controls(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let payload = app.controls.payload;
    let points = app.scatter.as_ref().map(|s| s.point_count()).unwrap_or(0);

    let text = vec![
        Line::from(vec![
            Span::styled(app.layout.slider.label, Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(
                format!("{payload}"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(slider_bar(payload.low(), payload.high(), 40), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Points: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{points}"), Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled("Updates: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}", app.dispatches), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled("Last: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format_latency(app.last_dispatch.as_micros() as u64),
                Style::default().fg(latency_color(app.last_dispatch.as_micros() as u64)),
            ),
            Span::raw("  "),
            Span::styled("Uptime: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}s", app.uptime.elapsed().as_secs()),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Controls ");
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_pie(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(pie) = &app.pie else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(pie.slices.len() as u16 + 3)])
        .split(area);

    let bars: Vec<Bar> = pie
        .slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            Bar::default()
                .value(slice.value.round() as u64)
                .label(Line::from(short_label(&slice.label)))
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .value_style(Style::default().fg(Color::Black).bg(PALETTE[i % PALETTE.len()]))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", pie.title)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_gap(1)
        .bar_width(7);
    f.render_widget(chart, chunks[0]);

    let header = Row::new(vec!["Slice", "Value", "Share"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    let rows: Vec<Row> = pie
        .slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            Row::new(vec![
                slice.label.clone(),
                format!("{:.0}", slice.value),
                format!("{:.1}%", pie.percent(i)),
            ])
            .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Share "));
    f.render_widget(table, chunks[1]);
}

fn draw_scatter(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(scatter) = &app.scatter else {
        return;
    };

    let series_points: Vec<Vec<(f64, f64)>> = scatter
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .map(|p| (p.payload_mass_kg, p.class as f64))
                .collect()
        })
        .collect();

    let datasets: Vec<ChartDataset> = scatter
        .series
        .iter()
        .zip(series_points.iter())
        .enumerate()
        .map(|(i, (series, points))| {
            ChartDataset::default()
                .name(series.name.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .data(points)
        })
        .collect();

    let title = if scatter.is_empty() {
        format!(" {} (no data) ", scatter.title)
    } else {
        format!(" {} ", scatter.title)
    };

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title(scatter.x_title.clone())
                .bounds([SLIDER_MIN, SLIDER_MAX])
                .labels(vec![
                    Line::from("0"),
                    Line::from("5000"),
                    Line::from("10000"),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(scatter.y_title.clone())
                .bounds([-0.25, 1.25])
                .labels(vec![Line::from("0"), Line::from("1")]),
        );

    f.render_widget(chart, area);
}

fn draw_footer(f: &mut ratatui::Frame, _app: &App, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };
    let footer = Paragraph::new(Line::from(vec![
        key(" Tab"),
        Span::raw(" site  "),
        key("[ ]"),
        Span::raw(" low  "),
        key("{ }"),
        Span::raw(" high  "),
        key("r"),
        Span::raw(" reset  "),
        key("q"),
        Span::raw(" quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));

    f.render_widget(footer, area);
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// `[----====----]` rendering of the selected range on the slider track.
fn slider_bar(low: f64, high: f64, width: usize) -> String {
    let span = SLIDER_MAX - SLIDER_MIN;
    let pos = |v: f64| (((v - SLIDER_MIN) / span).clamp(0.0, 1.0) * (width - 1) as f64).round() as usize;
    let (a, b) = (pos(low), pos(high));
    let track: String = (0..width)
        .map(|i| if i >= a && i <= b { '=' } else { '-' })
        .collect();
    format!("[{track}]")
}

fn short_label(label: &str) -> String {
    label.chars().take(7).collect()
}

fn format_latency(us: u64) -> String {
    if us == 0 {
        "--".to_string()
    } else if us < 1_000 {
        format!("{}us", us)
    } else if us < 1_000_000 {
        format!("{:.1}ms", us as f64 / 1_000.0)
    } else {
        format!("{:.2}s", us as f64 / 1_000_000.0)
    }
}

fn latency_color(us: u64) -> Color {
    if us < 1_000 {
        Color::Green
    } else if us < 10_000 {
        Color::Yellow
    } else {
        Color::Red
    }
}
