//! # Core Application Logic
//!
//! Charla's business logic. It knows nothing about terminals.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │                         │
//!                    │  • App (state)          │
//!                    │  • Action / Effect      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │    API     │
//!           │  Adapter   │──Effect────► │  (reqwest) │
//!           │ (ratatui)  │◄──Action──── │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App`, the controller state
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`thread`]: the visible message thread
//! - [`session`]: in-memory session history and titles
//! - [`message`]: message records and error templates
//! - [`config`]: `~/.charla/config.toml` loading and resolution

pub mod action;
pub mod config;
pub mod message;
pub mod session;
pub mod state;
pub mod thread;
