use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{SessionList, ThreadView, TitleBar, Welcome};

/// At this width and above the session sidebar is always shown.
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 100;

pub fn is_wide(width: u16) -> bool {
    width >= WIDE_LAYOUT_MIN_WIDTH
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, anim_frame: usize) {
    let area = frame.area();
    let wide = is_wide(area.width);

    let main_area = if wide {
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SessionList::WIDTH), Constraint::Min(0)])
                .areas(area);
        draw_sessions(frame, sidebar, app, tui);
        main
    } else {
        area
    };

    tui.input_box.busy = app.is_busy();
    let input_height = tui.input_box.calculate_height(main_area.width);
    let [title_area, body_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(input_height),
    ])
    .areas(main_area);

    if app.welcome_visible {
        Welcome::new(&tui.suggestions).render(frame, body_area);
    } else {
        ThreadView::new(&mut tui.thread_view, &app.thread, tui.formatter, anim_frame)
            .render(frame, body_area);
    }

    let unseen = !app.welcome_visible && tui.thread_view.has_content_below();
    TitleBar::new(
        app.current_title().to_string(),
        app.status_message.clone(),
        unseen,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);

    // Narrow terminals: sidebar only as an overlay while the menu is open
    if !wide && app.menu_open {
        let overlay = Rect {
            width: SessionList::WIDTH.min(area.width),
            ..area
        };
        draw_sessions(frame, overlay, app, tui);
    }
}

fn draw_sessions(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    SessionList::new(
        &mut tui.session_list,
        app.sessions.entries(),
        app.sessions.active_id(),
        app.menu_open,
    )
    .render(frame, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::config::ResolvedConfig;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &App, tui: &mut TuiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn tui_state() -> TuiState {
        TuiState::new(&ResolvedConfig::default())
    }

    #[test]
    fn fresh_app_shows_welcome_and_placeholder_title() {
        let app = test_app();
        let mut tui = tui_state();
        let text = screen(&app, &mut tui, 80, 24);
        assert!(text.contains("Ask anything"));
        assert!(text.contains("Alt+1"));
        assert!(text.contains("New chat"));
        assert!(text.contains("Send"));
    }

    #[test]
    fn sidebar_only_on_wide_terminals() {
        let app = test_app();
        let mut tui = tui_state();
        assert!(screen(&app, &mut tui, 120, 24).contains("Chats"));
        assert!(!screen(&app, &mut tui, 80, 24).contains("Chats"));
    }

    #[test]
    fn narrow_menu_opens_as_overlay() {
        let mut app = test_app();
        let mut tui = tui_state();
        update(&mut app, Action::ToggleMenu);
        let text = screen(&app, &mut tui, 80, 24);
        assert!(text.contains("Chats"));
        assert!(text.contains("n new"));
    }

    #[test]
    fn submitted_message_replaces_welcome() {
        let mut app = test_app();
        let mut tui = tui_state();
        update(&mut app, Action::Submit("Hello there".to_string()));
        let text = screen(&app, &mut tui, 80, 24);
        assert!(text.contains("Hello there"));
        assert!(!text.contains("Ask anything"));
        assert!(text.contains("waiting for reply"));
        assert!(text.contains('●'));
    }
}
