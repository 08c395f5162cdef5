//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Created each frame from the data they draw:
//! - `TitleBar`: app name, session title, status, "↓ New" hint
//! - `MessageView`: one rendered message
//! - `TypingIndicator`: animated placeholder for a pending reply
//! - `Welcome`: greeting and suggestion shortcuts for an empty thread
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep presentation state between frames and emit events:
//! - `InputBox`: compose box, emits `InputEvent`
//! - `ThreadView` / `ThreadViewState`: scrollable thread with auto-follow
//! - `SessionList` / `SessionListState`: session sidebar, emits `SessionEvent`
//!
//! Each file holds its state types, event types, rendering and tests.
//! Components receive data as props instead of reaching into `App`:
//!
//! ```rust,ignore
//! TitleBar::new(app.current_title().to_string(), app.status_message.clone(), unseen)
//!     .render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs
//! ├── typing_indicator.rs
//! ├── thread_view.rs
//! ├── welcome.rs
//! ├── session_list.rs
//! └── input_box/       (compose box + char-grid layout)
//! ```

pub mod input_box;
pub mod message;
pub mod session_list;
pub mod thread_view;
pub mod title_bar;
pub mod typing_indicator;
pub mod welcome;

pub use input_box::{InputBox, InputEvent};
pub use session_list::{SessionEvent, SessionList, SessionListState};
pub use thread_view::{ThreadView, ThreadViewState};
pub use title_bar::TitleBar;
pub use welcome::Welcome;
