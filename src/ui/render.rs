use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{components, screens, Screen, Theme};
use crate::state::{AppState, NotificationLevel};

pub fn render(frame: &mut Frame, state: &AppState) {
    let theme = Theme::new();

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    // Render header
    let header = Paragraph::new(format!(
        "CERTDECK - Deployment actions for {}                [?] Help  [q] Quit",
        state.certificate.label()
    ))
    .style(theme.title_style());
    frame.render_widget(header, chunks[0]);

    // Render main content based on current screen
    match &state.current_screen {
        Screen::ActionList => screens::action_list::render(frame, chunks[1], state),
        Screen::ActionForm => screens::action_form::render(frame, chunks[1], state),
        Screen::Help => screens::help::render(frame, chunks[1]),
    }

    // Overlays above the active screen.
    if let Some(results) = &state.results {
        components::render_results(frame, chunks[1], results, state.selection.results_scroll);
    }
    if let Some(prompt) = &state.token_prompt {
        components::render_token_prompt(frame, chunks[1], prompt);
    }
    if let Some(dialog) = &state.confirm {
        components::render_confirm(frame, chunks[1], dialog);
    }

    // Render status bar
    let status = match state.notifications.back() {
        Some(notification) => {
            let style = match notification.level {
                NotificationLevel::Success => theme.success_style(),
                NotificationLevel::Warning => theme.warning_style(),
                NotificationLevel::Error => theme.error_style(),
                NotificationLevel::Info => theme.primary_style(),
            };
            Paragraph::new(notification.message.clone()).style(style)
        }
        None => Paragraph::new(format!(
            "Ready | Pending ops: {} | Actions: {}",
            state.pending_operations.len(),
            state.actions.len()
        )),
    };
    frame.render_widget(status, chunks[2]);
}
