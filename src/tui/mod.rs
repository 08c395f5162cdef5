//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and carries out
//! the `Effect`s that `update()` returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Exchange Lifecycle
//!
//! ```text
//! Enter ─► InputEvent::SubmitRequested ─► update(Submit) ─► Effect::SpawnRequest
//!                                                              │
//!                     tokio task: ChatBackend::send ◄──────────┘
//!                              │
//!            mpsc ─► Action::ExchangeSettled ─► update() ─► thread re-rendered
//! ```
//!
//! The task's `AbortHandle` is kept so quitting can cancel a request that
//! has not answered yet.
//!
//! ## Redraw Strategy
//!
//! - **Typing** (reply pending): draws every ~80ms for the dots animation.
//! - **Idle**: sleeps up to 500ms, only redraws on events.

mod component;
pub mod components;
pub mod event;
pub mod markdown;
pub mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use tokio::task::AbortHandle;

use crate::api::{ChatBackend, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    InputBox, InputEvent, SessionEvent, SessionListState, ThreadViewState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::markdown::Formatter;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub input_box: InputBox,
    pub thread_view: ThreadViewState,
    pub session_list: SessionListState,
    pub formatter: Formatter,
    pub suggestions: Vec<String>,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            input_box: InputBox::new(config.max_input_lines),
            thread_view: ThreadViewState::new(),
            session_list: SessionListState::new(),
            formatter: Formatter::new(config.markdown),
            suggestions: config.suggestions.clone(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol makes Shift+Enter distinguishable; terminals
        // without it ignore the sequence
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Everything the event loop needs to carry out effects.
struct Runtime {
    backend: Arc<dyn ChatBackend>,
    tx: mpsc::Sender<Action>,
    /// Request task of the open exchange, if any
    in_flight: Option<AbortHandle>,
}

impl Runtime {
    /// Apply an action and perform its effect. Returns true on quit.
    fn dispatch(&mut self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        match update(app, action) {
            Effect::None => false,
            Effect::ClearInput => {
                tui.input_box.clear();
                false
            }
            Effect::SpawnRequest { ticket, text } => {
                tui.input_box.clear();
                self.in_flight = Some(spawn_exchange(
                    self.backend.clone(),
                    ticket,
                    text,
                    self.tx.clone(),
                ));
                false
            }
            Effect::Quit => {
                if let Some(handle) = self.in_flight.take() {
                    info!("Aborting in-flight request");
                    handle.abort();
                }
                true
            }
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(
        config.endpoint.clone(),
        config.payload_field,
    ));
    let mut app = App::init();
    let mut tui = TuiState::new(&config);

    let mut terminal = ratatui::init();
    with_restore(
        || {
            // Dropped at the end of the loop, before the terminal is restored
            let _terminal_mode_guard = TerminalModeGuard::new()?;
            event_loop(&mut terminal, &mut app, &mut tui, backend)
        },
        ratatui::restore,
    )
}

/// Run `body`, then `restore`, whether `body` succeeded or not.
fn with_restore<T>(
    body: impl FnOnce() -> std::io::Result<T>,
    restore: impl FnOnce(),
) -> std::io::Result<T> {
    let result = body();
    if let Err(e) = &result {
        warn!("Event loop failed: {}", e);
    }
    restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    backend: Arc<dyn ChatBackend>,
) -> std::io::Result<()> {
    // Channel for actions from request tasks
    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime {
        backend,
        tx,
        in_flight: None,
    };

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut should_quit = false;

    while !should_quit {
        let animating = app.thread.is_typing();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let anim_frame = (start_time.elapsed().as_millis() / 300) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, tui, anim_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain every pending event before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(app, tui, &mut runtime, event) {
                should_quit = true;
                break;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if let Action::ExchangeSettled { ticket, .. } = &action
                && app.pending.as_ref().is_some_and(|p| p.ticket == *ticket)
            {
                runtime.in_flight = None;
            }
            if runtime.dispatch(app, tui, action) {
                should_quit = true;
            }
        }
    }

    info!("Charla shutting down");
    Ok(())
}

/// Route one terminal event. Returns true when the app should quit.
fn handle_event(app: &mut App, tui: &mut TuiState, runtime: &mut Runtime, event: TuiEvent) -> bool {
    match event {
        TuiEvent::ForceQuit => return runtime.dispatch(app, tui, Action::Quit),
        TuiEvent::Resize(width, _) => {
            if ui::is_wide(width) && app.menu_open {
                return runtime.dispatch(app, tui, Action::CloseMenu);
            }
            return false;
        }
        TuiEvent::ToggleMenu => {
            runtime.dispatch(app, tui, Action::ToggleMenu);
            if app.menu_open {
                tui.session_list
                    .select_active(app.sessions.entries(), app.sessions.active_id());
            }
            return false;
        }
        TuiEvent::NewSession => {
            let quit = runtime.dispatch(app, tui, Action::NewSession);
            // keep the highlight on the active entry after the insert at the head
            if app.menu_open {
                tui.session_list
                    .select_active(app.sessions.entries(), app.sessions.active_id());
            }
            return quit;
        }
        _ => {}
    }

    // Open menu owns the keyboard
    if app.menu_open {
        let Some(session_event) = tui.session_list.handle_event(&event, app.sessions.entries())
        else {
            return false;
        };
        return match session_event {
            SessionEvent::Switch(id) => runtime.dispatch(app, tui, Action::SwitchSession(id)),
            SessionEvent::NewSession => {
                runtime.dispatch(app, tui, Action::NewSession)
                    || runtime.dispatch(app, tui, Action::CloseMenu)
            }
            SessionEvent::Dismiss => runtime.dispatch(app, tui, Action::CloseMenu),
        };
    }

    match event {
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.thread_view.handle_event(&event);
            false
        }
        // With an empty compose box the arrows and End drive the thread
        TuiEvent::CursorUp if tui.input_box.is_empty() => {
            tui.thread_view.handle_event(&TuiEvent::ScrollUp);
            false
        }
        TuiEvent::CursorDown if tui.input_box.is_empty() => {
            tui.thread_view.handle_event(&TuiEvent::ScrollDown);
            false
        }
        TuiEvent::End if tui.input_box.is_empty() => {
            tui.thread_view.handle_event(&TuiEvent::End);
            false
        }
        TuiEvent::Suggestion(index) => {
            let Some(text) = tui.suggestions.get(usize::from(index)).cloned() else {
                debug!("No suggestion #{}", index + 1);
                return false;
            };
            tui.input_box.set_text(&text);
            runtime.dispatch(app, tui, Action::Submit(text))
        }
        TuiEvent::Escape => false,
        other => match tui.input_box.handle_event(&other) {
            Some(InputEvent::SubmitRequested(text)) => {
                if !app.can_send(&text) {
                    debug!("Submit rejected: reply pending");
                    return false;
                }
                runtime.dispatch(app, tui, Action::Submit(text))
            }
            Some(InputEvent::ContentChanged) | None => false,
        },
    }
}

/// Run one exchange on the tokio runtime and report back through `tx`.
pub fn spawn_exchange(
    backend: Arc<dyn ChatBackend>,
    ticket: u64,
    text: String,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!("Spawning exchange #{} via {}", ticket, backend.name());
    let handle = tokio::spawn(async move {
        let action = exchange(backend.as_ref(), ticket, &text).await;
        if tx.send(action).is_err() {
            warn!("Failed to deliver settle for exchange #{}: receiver dropped", ticket);
        }
    });
    handle.abort_handle()
}

/// Send `text` and wrap whatever comes back as the settle action.
pub async fn exchange(backend: &dyn ChatBackend, ticket: u64, text: &str) -> Action {
    let started = Instant::now();
    let outcome = backend.send(text).await;
    debug!(
        "Exchange #{} settled in {}ms (ok={})",
        ticket,
        started.elapsed().as_millis(),
        outcome.is_ok()
    );
    Action::ExchangeSettled { ticket, outcome }
}
