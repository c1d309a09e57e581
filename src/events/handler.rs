use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::AppAction;
use crate::actions::ActionKind;
use crate::form::FormEntry;
use crate::state::AppState;
use crate::ui::Screen;

/// Convert crossterm events to AppActions.
///
/// Overlays swallow input first, then the current screen's keymap applies.
pub fn handle_event(event: Event, state: &AppState) -> AppAction {
    match event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            handle_key_event(key_event, state)
        }
        _ => AppAction::None,
    }
}

fn handle_key_event(key: KeyEvent, state: &AppState) -> AppAction {
    // Ctrl-C quits from anywhere, overlays included.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return AppAction::Quit;
    }

    if state.confirm.is_some() {
        return handle_confirm_keys(key);
    }
    if state.token_prompt.is_some() {
        return handle_token_prompt_keys(key);
    }
    if state.results.is_some() {
        return handle_results_keys(key);
    }

    match state.current_screen {
        Screen::ActionList => handle_list_keys(key, state),
        Screen::ActionForm => handle_form_keys(key, state),
        Screen::Help => handle_help_keys(key),
    }
}

fn handle_confirm_keys(key: KeyEvent) -> AppAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => AppAction::Confirm,
        KeyCode::Char('n') | KeyCode::Esc => AppAction::CancelConfirm,
        _ => AppAction::None,
    }
}

fn handle_token_prompt_keys(key: KeyEvent) -> AppAction {
    match key.code {
        KeyCode::Esc => AppAction::TokenCancel,
        KeyCode::Enter => AppAction::TokenSubmit,
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => AppAction::TokenNextField,
        KeyCode::Backspace => AppAction::TokenBackspace,
        KeyCode::Char(c) => AppAction::TokenInput(c),
        _ => AppAction::None,
    }
}

fn handle_results_keys(key: KeyEvent) -> AppAction {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => AppAction::CloseResults,
        KeyCode::Up | KeyCode::Char('k') => AppAction::ResultsScroll(-1),
        KeyCode::Down | KeyCode::Char('j') => AppAction::ResultsScroll(1),
        _ => AppAction::None,
    }
}

fn handle_list_keys(key: KeyEvent, state: &AppState) -> AppAction {
    let moving = state.selection.is_moving();
    match key.code {
        KeyCode::Char('q') => AppAction::Quit,
        KeyCode::Char('?') => AppAction::NavigateTo(Screen::Help),
        KeyCode::Esc if moving => AppAction::CancelMove,
        KeyCode::Up | KeyCode::Char('k') => AppAction::SelectPrevious,
        KeyCode::Down | KeyCode::Char('j') => AppAction::SelectNext,
        KeyCode::Char('a') => AppAction::OpenAdd(ActionKind::Copy),
        KeyCode::Char('e') => AppAction::OpenEdit,
        KeyCode::Enter if moving => AppAction::GrabOrCommit,
        KeyCode::Enter => AppAction::OpenEdit,
        KeyCode::Char('d') => AppAction::RequestDelete,
        KeyCode::Char('t') => AppAction::TestSelected,
        KeyCode::Char('x') => AppAction::RequestExecuteAll,
        KeyCode::Char('r') => AppAction::RefreshActions,
        KeyCode::Char('m') => AppAction::GrabOrCommit,
        KeyCode::Char('c') => AppAction::DismissNotification,
        KeyCode::Char(' ') => AppAction::ToggleSelected,
        _ => AppAction::None,
    }
}

fn handle_form_keys(key: KeyEvent, state: &AppState) -> AppAction {
    let form = match &state.form {
        Some(form) => form,
        None => return AppAction::None,
    };

    // Control-key chords first; plain characters belong to the fields.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => AppAction::FormSave,
            KeyCode::Char('t') => AppAction::NpmProbe,
            KeyCode::Char('r') => AppAction::NpmOpenTokenPrompt,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => AppAction::FormClose,
        KeyCode::Tab | KeyCode::Down => AppAction::FormNextField,
        KeyCode::BackTab | KeyCode::Up => AppAction::FormPreviousField,
        KeyCode::Left => AppAction::FormCycle(false),
        KeyCode::Right => AppAction::FormCycle(true),
        KeyCode::Backspace => AppAction::FormBackspace,
        KeyCode::Enter => AppAction::FormSave,
        KeyCode::Char(' ') => {
            // Space toggles checkboxes and the enabled row; elsewhere it is
            // ordinary input.
            match form.focused() {
                FormEntry::Enabled => AppAction::FormToggle,
                FormEntry::Field(spec)
                    if matches!(spec.control, crate::actions::Control::Checkbox) =>
                {
                    AppAction::FormToggle
                }
                _ => AppAction::FormInput(' '),
            }
        }
        KeyCode::Char(c) => AppAction::FormInput(c),
        _ => AppAction::None,
    }
}

fn handle_help_keys(key: KeyEvent) -> AppAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => AppAction::NavigateBack,
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CertificateRef;
    use crate::state::{ConfirmDialog, PendingConfirm};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn list_state() -> AppState {
        AppState::new(CertificateRef::new("abc123"))
    }

    #[test]
    fn list_keys_map_to_list_actions() {
        let state = list_state();
        assert!(matches!(
            handle_event(key(KeyCode::Char('t')), &state),
            AppAction::TestSelected
        ));
        assert!(matches!(
            handle_event(key(KeyCode::Char('x')), &state),
            AppAction::RequestExecuteAll
        ));
        assert!(matches!(
            handle_event(key(KeyCode::Enter), &state),
            AppAction::OpenEdit
        ));
    }

    #[test]
    fn confirm_overlay_swallows_list_keys() {
        let mut state = list_state();
        state.confirm = Some(ConfirmDialog {
            title: "Delete action".to_string(),
            message: "Really?".to_string(),
            pending: PendingConfirm::DeleteAction(0),
        });
        assert!(matches!(
            handle_event(key(KeyCode::Char('t')), &state),
            AppAction::None
        ));
        assert!(matches!(
            handle_event(key(KeyCode::Char('y')), &state),
            AppAction::Confirm
        ));
        assert!(matches!(
            handle_event(key(KeyCode::Esc), &state),
            AppAction::CancelConfirm
        ));
    }

    #[test]
    fn form_typing_reaches_the_fields_not_the_keymap() {
        let mut state = list_state();
        state.form = Some(crate::form::FormModel::open_add(ActionKind::Copy));
        state.current_screen = Screen::ActionForm;
        state.previous_screen.push(Screen::ActionList);

        // 'q' must not quit while a text field is focused.
        assert!(matches!(
            handle_event(key(KeyCode::Char('q')), &state),
            AppAction::FormInput('q')
        ));
    }

    #[test]
    fn enter_commits_a_move_in_progress() {
        let mut state = list_state();
        state.actions = crate::actions::samples::one_of_each();
        state.selection.grabbed = Some(0);
        assert!(matches!(
            handle_event(key(KeyCode::Enter), &state),
            AppAction::GrabOrCommit
        ));
        assert!(matches!(
            handle_event(key(KeyCode::Esc), &state),
            AppAction::CancelMove
        ));
    }
}
