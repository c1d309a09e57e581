use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::actions::DeployAction;
use crate::api::{ExecuteReport, TestOutcome};
use crate::form::FormModel;
use crate::models::{CertificateRef, DockerInventory, NpmSettings};
use crate::npm::NpmSession;
use crate::ui::Screen;

use super::async_ops::AsyncOperation;
use super::selection::SelectionState;

#[derive(Debug, Clone)]
pub struct AppState {
    /// The certificate whose actions are being edited. Written once at
    /// startup; everything else reads it.
    pub certificate: CertificateRef,
    /// Local copy of the server's ordered action list.
    pub actions: Vec<DeployAction>,
    pub loading: bool,

    // Editor state
    pub form: Option<FormModel>,
    pub npm_session: NpmSession,
    pub npm_settings: Option<NpmSettings>,
    pub docker: Option<DockerInventory>,

    // Overlays
    pub confirm: Option<ConfirmDialog>,
    pub token_prompt: Option<TokenPrompt>,
    pub results: Option<ResultsView>,

    // UI state
    pub current_screen: Screen,
    pub previous_screen: Vec<Screen>,
    pub selection: SelectionState,
    /// Pre-reorder list and grab position, for cancelling a move locally.
    pub reorder_snapshot: Option<(Vec<DeployAction>, usize)>,

    // Async operations tracking
    pub pending_operations: Vec<AsyncOperation>,
    pub notifications: VecDeque<Notification>,

    pub should_quit: bool,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Modal confirmation gate for destructive or bulk operations.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub pending: PendingConfirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirm {
    DeleteAction(usize),
    ExecuteAll,
    DiscardForm,
}

/// Credential entry for the NPM token exchange. The values are sent once on
/// submit and cleared immediately after.
#[derive(Debug, Clone, Default)]
pub struct TokenPrompt {
    pub email: String,
    pub password: String,
    pub focus: TokenField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenField {
    #[default]
    Email,
    Password,
}

impl TokenPrompt {
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            TokenField::Email => self.email.push(c),
            TokenField::Password => self.password.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            TokenField::Email => {
                self.email.pop();
            }
            TokenField::Password => {
                self.password.pop();
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            TokenField::Email => TokenField::Password,
            TokenField::Password => TokenField::Email,
        };
    }

    /// Take the credentials out, leaving the prompt empty.
    pub fn take_credentials(&mut self) -> (String, String) {
        (
            std::mem::take(&mut self.email),
            std::mem::take(&mut self.password),
        )
    }
}

/// Result dialog after a test or a bulk execute.
#[derive(Debug, Clone)]
pub enum ResultsView {
    Test {
        index: usize,
        name: String,
        outcome: TestOutcome,
    },
    Execute(ExecuteReport),
}

impl AppState {
    pub fn new(certificate: CertificateRef) -> Self {
        Self {
            certificate,
            actions: Vec::new(),
            loading: false,
            form: None,
            npm_session: NpmSession::default(),
            npm_settings: None,
            docker: None,
            confirm: None,
            token_prompt: None,
            results: None,
            current_screen: Screen::default(),
            previous_screen: Vec::new(),
            selection: SelectionState::default(),
            reorder_snapshot: None,
            pending_operations: Vec::new(),
            notifications: VecDeque::new(),
            should_quit: false,
        }
    }

    // Navigation methods
    pub fn navigate_to(&mut self, screen: Screen) {
        self.previous_screen.push(self.current_screen.clone());
        self.current_screen = screen;
    }

    pub fn navigate_back(&mut self) {
        if let Some(previous) = self.previous_screen.pop() {
            self.current_screen = previous;
        }
    }

    // Notification methods
    pub fn add_notification(&mut self, message: String, level: NotificationLevel) {
        self.notifications.push_back(Notification {
            message,
            level,
            timestamp: Utc::now(),
        });

        // Keep only the last 50 notifications
        while self.notifications.len() > 50 {
            self.notifications.pop_front();
        }
    }

    /// Drop the currently displayed (most recent) notification.
    pub fn dismiss_notification(&mut self) {
        self.notifications.pop_back();
    }

    /// Replace the local list with the server's canonical order.
    pub fn replace_actions(&mut self, actions: Vec<DeployAction>) {
        self.actions = actions;
        self.selection.list_index =
            crate::store::clamp_selection(self.selection.list_index, self.actions.len());
        self.selection.grabbed = None;
        self.reorder_snapshot = None;
    }

}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            timestamp: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            timestamp: Utc::now(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_with_a_shorter_list_clamps_the_cursor() {
        let mut state = AppState::new(CertificateRef::new("abc123"));
        state.actions = crate::actions::samples::one_of_each();
        state.selection.list_index = state.actions.len() - 1;

        state.replace_actions(state.actions[..2].to_vec());
        assert_eq!(state.selection.list_index, 1);
    }

    #[test]
    fn token_prompt_clears_credentials_on_take() {
        let mut prompt = TokenPrompt::default();
        for c in "admin@x".chars() {
            prompt.input_char(c);
        }
        prompt.focus_next();
        for c in "pw".chars() {
            prompt.input_char(c);
        }

        let (email, password) = prompt.take_credentials();
        assert_eq!(email, "admin@x");
        assert_eq!(password, "pw");
        assert!(prompt.email.is_empty());
        assert!(prompt.password.is_empty());
    }

    #[test]
    fn notifications_are_capped_at_fifty() {
        let mut state = AppState::new(CertificateRef::new("abc123"));
        for i in 0..60 {
            state.add_notification(format!("note {}", i), NotificationLevel::Info);
        }
        assert_eq!(state.notifications.len(), 50);
        assert_eq!(state.notifications.front().unwrap().message, "note 10");
    }
}
