use uuid::Uuid;

use crate::actions::ActionKind;
use crate::state::AsyncOperationResult;
use crate::ui::Screen;

/// Everything the update loop can be asked to do, from key handlers and
/// from settled async operations alike.
#[derive(Debug, Clone)]
pub enum AppAction {
    // Navigation
    NavigateTo(Screen),
    NavigateBack,

    // Action list
    SelectNext,
    SelectPrevious,
    RefreshActions,
    OpenAdd(ActionKind),
    OpenEdit,
    RequestDelete,
    RequestExecuteAll,
    ToggleSelected,
    TestSelected,
    /// Grab the selected row for reordering, or commit the move if one is
    /// already in progress.
    GrabOrCommit,
    CancelMove,

    // Confirmation overlay
    Confirm,
    CancelConfirm,

    // Form
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPreviousField,
    FormCycle(bool),
    FormToggle,
    FormSave,
    FormClose,

    // NPM integration
    NpmProbe,
    NpmOpenTokenPrompt,
    TokenInput(char),
    TokenBackspace,
    TokenNextField,
    TokenSubmit,
    TokenCancel,

    // Results overlay
    CloseResults,
    ResultsScroll(i32),

    // Async operation results
    AsyncOperationCompleted(Uuid, Result<AsyncOperationResult, String>),

    // Notifications
    DismissNotification,

    // System
    Quit,

    // No-op
    None,
}
