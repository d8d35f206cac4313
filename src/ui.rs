//! TUI module using ratatui.
//!
//! One run is one page load: the summary is fetched once in the background while
//! the screen shows the loading state, then the settled page is drawn and can be
//! scrolled until the user quits.

use crate::client::{ApiClient, ClientError};
use crate::config::DisplayConfig;
use crate::render;
use crate::summary::SummaryPayload;
use crate::view::HomeView;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use futures::{Stream, StreamExt};
use ratatui::{Frame, Terminal};
use std::fmt::Display;
use std::io;
use thiserror::Error;
use tokio::task::{AbortHandle, JoinError, JoinHandle};

type Fetch = JoinHandle<Result<SummaryPayload, ClientError>>;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp(u16),
    ScrollDown(u16),
    Top,
    Bottom,
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown(1),
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp(1),
            KeyCode::PageDown | KeyCode::Char(' ') => Action::ScrollDown(10),
            KeyCode::PageUp => Action::ScrollUp(10),
            KeyCode::Home | KeyCode::Char('g') => Action::Top,
            KeyCode::End | KeyCode::Char('G') => Action::Bottom,
            _ => Action::None,
        }
    }
}

/// Screen state: the page load plus the scroll position.
pub struct App {
    view: HomeView,
    display: DisplayConfig,
    base_url: String,
    scroll: u16,
    lines: Vec<Line<'static>>,
}

impl App {
    pub fn new(display: DisplayConfig, base_url: impl Into<String>) -> Self {
        let mut app = Self {
            view: HomeView::new(),
            display,
            base_url: base_url.into(),
            scroll: 0,
            lines: Vec::new(),
        };
        app.relayout();
        app
    }

    pub fn view(&self) -> &HomeView {
        &self.view
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Hand the fetch outcome to the page load and lay the result out again.
    pub fn settle(&mut self, outcome: Result<SummaryPayload, ClientError>) {
        self.settle_with(outcome);
    }

    fn settle_joined(&mut self, joined: Result<Result<SummaryPayload, ClientError>, JoinError>) {
        match joined {
            Ok(outcome) => self.settle_with(outcome),
            Err(e) => {
                tracing::error!(error = %e, "summary task did not complete");
                self.settle_with(Err::<SummaryPayload, _>(e));
            }
        }
    }

    fn settle_with<E: Display>(&mut self, outcome: Result<SummaryPayload, E>) {
        self.view.settle(outcome);
        self.scroll = 0;
        self.relayout();
    }

    /// Returns `false` when the app should exit.
    pub fn apply(&mut self, action: Action) -> bool {
        let max = self.max_scroll();
        match action {
            Action::Quit => return false,
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(n),
            Action::ScrollDown(n) => self.scroll = self.scroll.saturating_add(n).min(max),
            Action::Top => self.scroll = 0,
            Action::Bottom => self.scroll = max,
            Action::None => {}
        }
        true
    }

    fn max_scroll(&self) -> u16 {
        u16::try_from(self.lines.len().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn relayout(&mut self) {
        let page = render::page(self.view.state(), &self.display);
        self.lines = render::lines(&page);
    }

    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let body = Paragraph::new(self.lines.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", render::TITLE)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(body, chunks[0]);

        let status = Line::from(vec![
            Span::styled(self.base_url.clone(), Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit  "),
            Span::styled("j/k", Style::default().fg(Color::Yellow)),
            Span::raw(" scroll"),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[1]);
    }
}

/// Put the terminal into TUI mode, undoing what was done if a later step fails.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    match enter_screen() {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = io::stdout().execute(LeaveAlternateScreen);
            let _ = disable_raw_mode();
            Err(e)
        }
    }
}

fn enter_screen() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore the terminal back to shell mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Cancels the summary fetch when the page load ends, on every exit path.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            tracing::debug!("aborting in-flight summary fetch");
        }
        self.0.abort();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

enum Wake {
    Fetched(Result<Result<SummaryPayload, ClientError>, JoinError>),
    Input(Option<io::Result<Event>>),
}

async fn wait_fetch(
    fetch: &mut Option<Fetch>,
) -> Result<Result<SummaryPayload, ClientError>, JoinError> {
    match fetch {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Wait for the fetch to finish or the next terminal event, whichever comes first.
async fn next_step<S>(
    app: &mut App,
    fetch: &mut Option<Fetch>,
    events: &mut S,
) -> Result<Step, UiError>
where
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    let wake = tokio::select! {
        joined = wait_fetch(fetch) => Wake::Fetched(joined),
        event = events.next() => Wake::Input(event),
    };

    match wake {
        Wake::Fetched(joined) => {
            *fetch = None;
            app.settle_joined(joined);
            Ok(Step::Continue)
        }
        Wake::Input(None) => Ok(Step::Quit),
        Wake::Input(Some(event)) => match event? {
            Event::Key(key) if !app.apply(Action::from(key)) => Ok(Step::Quit),
            _ => Ok(Step::Continue),
        },
    }
}

/// Run the TUI for one page load.
pub async fn run(client: ApiClient, display: DisplayConfig) -> Result<(), UiError> {
    let mut app = App::new(display, client.base_url());
    let fetch = tokio::spawn(async move { client.get_summary().await });
    let _abort = AbortOnDrop(fetch.abort_handle());

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, Some(fetch), EventStream::new()).await;
    let restored = restore_terminal(&mut terminal);
    result?;
    restored?;
    Ok(())
}

async fn event_loop<S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut fetch: Option<Fetch>,
    mut events: S,
) -> Result<(), UiError>
where
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    loop {
        terminal.draw(|frame| app.draw(frame))?;
        if next_step(app, &mut fetch, &mut events).await? == Step::Quit {
            return Ok(());
        }
    }
}
