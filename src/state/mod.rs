pub mod app_state;
pub mod async_ops;
pub mod selection;

pub use app_state::{
    AppState, ConfirmDialog, Notification, NotificationLevel, PendingConfirm, ResultsView,
    TokenField, TokenPrompt,
};
pub use async_ops::{AsyncOperation, AsyncOperationResult, AsyncStatus, OperationType};
pub use selection::SelectionState;
