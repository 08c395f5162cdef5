//! # Actions
//!
//! Everything that can happen in Charla becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Endpoint answers? That's `Action::ExchangeSettled { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an `Effect` describing the I/O the adapter must
//! perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! One exchange, start to finish:
//!
//! ```text
//! Submit(text) ──► user message rendered, typing shown ──► Effect::SpawnRequest
//!                                                            │ (adapter runs request)
//! ExchangeSettled ◄──────────────────────────────────────────┘
//!      └──► typing removed, terminal message rendered, input unlocked
//! ```

use log::{debug, info, warn};

use crate::api::{BackendError, Reply};
use crate::core::message::Message;
use crate::core::session::derive_title;
use crate::core::state::{App, PendingExchange};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User asked to send the compose box contents.
    Submit(String),
    NewSession,
    SwitchSession(String),
    ToggleMenu,
    CloseMenu,
    /// The request for exchange `ticket` finished.
    ExchangeSettled {
        ticket: u64,
        outcome: Result<Reply, BackendError>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Send `text` to the endpoint and report back with `ExchangeSettled`.
    /// Also means the input was accepted and the compose box must be cleared.
    SpawnRequest { ticket: u64, text: String },
    ClearInput,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(raw) => submit(app, &raw),
        Action::ExchangeSettled { ticket, outcome } => settle(app, ticket, outcome),
        Action::NewSession => {
            let id = app.sessions.create().id.clone();
            info!("New session {}", id);
            show_empty_thread(app);
            app.status_message = String::from("New chat");
            Effect::ClearInput
        }
        Action::SwitchSession(id) => {
            if !app.sessions.switch(&id) {
                warn!("Switch to unknown session {} ignored", id);
                return Effect::None;
            }
            info!("Switched to session {}", id);
            show_empty_thread(app);
            app.menu_open = false;
            app.status_message = String::new();
            Effect::None
        }
        Action::ToggleMenu => {
            app.menu_open = !app.menu_open;
            Effect::None
        }
        Action::CloseMenu => {
            app.menu_open = false;
            Effect::None
        }
        Action::Quit => {
            if let Some(ticket) = app.dispose() {
                info!("Quitting with exchange #{} unsettled", ticket);
            }
            Effect::Quit
        }
    }
}

fn submit(app: &mut App, raw: &str) -> Effect {
    let text = raw.trim();
    if text.is_empty() {
        return Effect::None;
    }
    if app.is_busy() {
        debug!("Submit ignored: reply still pending");
        return Effect::None;
    }
    let Some(session) = app.sessions.current_mut() else {
        warn!("Submit ignored: no active session");
        return Effect::None;
    };

    let message = Message::user(text);
    session.messages.push(message.clone());
    if session.has_placeholder_title() {
        session.title = derive_title(text);
    }
    let session_id = session.id.clone();

    app.welcome_visible = false;
    app.thread.render(&message);
    let typing = app.thread.show_typing();
    let ticket = app.take_ticket();
    app.pending = Some(PendingExchange {
        ticket,
        session_id,
        typing,
    });
    app.status_message = String::from("Waiting for reply...");
    info!("Exchange #{} opened (len={})", ticket, text.len());

    Effect::SpawnRequest {
        ticket,
        text: text.to_string(),
    }
}

fn settle(app: &mut App, ticket: u64, outcome: Result<Reply, BackendError>) -> Effect {
    let Some(pending) = app.pending.take_if(|p| p.ticket == ticket) else {
        warn!("Ignoring settle for stale exchange #{}", ticket);
        return Effect::None;
    };
    app.thread.hide_typing(pending.typing);

    let (message, status) = match outcome {
        Ok(Reply::Answer(text)) => (Message::bot(text), "Reply received"),
        Ok(Reply::Fallback(text)) => (Message::fallback(text), "Fallback reply"),
        Ok(Reply::Failed(category)) => {
            info!("Exchange #{} failed upstream: {:?}", ticket, category);
            (Message::typed_error(category), "Assistant error")
        }
        Err(e) => {
            warn!("Exchange #{} transport failure: {}", ticket, e);
            (Message::connection_error(), "Connection error")
        }
    };

    if let Some(session) = app.sessions.get_mut(&pending.session_id) {
        session.messages.push(message.clone());
    }
    if app.sessions.active_id() == Some(pending.session_id.as_str()) {
        app.thread.render(&message);
    } else {
        debug!(
            "Exchange #{} settled for inactive session {}",
            ticket, pending.session_id
        );
    }
    app.status_message = String::from(status);
    Effect::None
}

/// Empty thread with the welcome placeholder. Any typing node goes too.
fn show_empty_thread(app: &mut App) {
    app.thread.clear();
    app.welcome_visible = true;
}
