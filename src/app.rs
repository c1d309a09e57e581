use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::actions::{ActionKind, DeployAction};
use crate::api::{ApiClient, DeployClient, NpmClient, TokenStatus};
use crate::config::CertdeckConfig;
use crate::events::{handle_event, AppAction};
use crate::form::{FormEntry, FormModel};
use crate::models::CertificateRef;
use crate::state::{
    AppState, AsyncOperation, AsyncOperationResult, AsyncStatus, ConfirmDialog,
    NotificationLevel, OperationType, PendingConfirm, ResultsView, TokenPrompt,
};
use crate::ui::{render, Screen};

pub struct App {
    pub state: AppState,
    pub deploy_client: DeployClient,
    pub npm_client: NpmClient,
    pub settings: crate::config::Settings,
    pub action_tx: mpsc::UnboundedSender<AppAction>,
    pub action_rx: mpsc::UnboundedReceiver<AppAction>,
}

impl App {
    pub fn new(config: CertdeckConfig, certificate: CertificateRef) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let api = ApiClient::new(&config.server.base_url, config.server.api_key.clone())?;

        Ok(Self {
            state: AppState::new(certificate),
            deploy_client: DeployClient::new(api.clone()),
            npm_client: NpmClient::new(api),
            settings: config.settings,
            action_tx,
            action_rx,
        })
    }

    /// Main event loop following The Elm Architecture pattern
    pub async fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.spawn_load_actions();

        loop {
            // Render (TEA View)
            terminal.draw(|frame| render(frame, &self.state))?;

            // Handle events - multiplex between user input and async results
            tokio::select! {
                // User input events
                event_result = tokio::task::spawn_blocking(|| event::read()) => {
                    if let Ok(Ok(event)) = event_result {
                        let action = handle_event(event, &self.state);
                        if !matches!(action, AppAction::None) {
                            self.update(action);
                        }
                    }
                }

                // Async operation results
                Some(action) = self.action_rx.recv() => {
                    self.update(action);
                }
            }

            // Check if we should quit
            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Update function (TEA Update) - processes AppActions and updates state
    pub fn update(&mut self, action: AppAction) {
        match action {
            // Navigation
            AppAction::NavigateTo(screen) => {
                self.state.navigate_to(screen);
            }

            AppAction::NavigateBack => {
                self.state.navigate_back();
            }

            // List cursor / reordering
            AppAction::SelectNext => self.select(true),
            AppAction::SelectPrevious => self.select(false),

            AppAction::RefreshActions => {
                self.spawn_load_actions();
            }

            AppAction::OpenAdd(kind) => {
                self.state.form = Some(FormModel::open_add(kind));
                self.state.navigate_to(Screen::ActionForm);
                self.after_form_change();
            }

            AppAction::OpenEdit => {
                let index = self.state.selection.list_index;
                if let Some(action) = self.state.actions.get(index) {
                    self.state.form = Some(FormModel::open_edit(action, index));
                    self.state.navigate_to(Screen::ActionForm);
                    self.after_form_change();
                }
            }

            AppAction::RequestDelete => {
                let index = self.state.selection.list_index;
                let Some(action) = self.state.actions.get(index) else {
                    return;
                };
                if self.settings.confirm_delete {
                    self.state.confirm = Some(ConfirmDialog {
                        title: "Delete action".to_string(),
                        message: format!("Delete \"{}\"?", action.name),
                        pending: PendingConfirm::DeleteAction(index),
                    });
                } else {
                    self.spawn_delete(index);
                }
            }

            AppAction::RequestExecuteAll => {
                if self.state.actions.is_empty() {
                    self.state.add_notification(
                        "No deployment actions to execute".to_string(),
                        NotificationLevel::Info,
                    );
                    return;
                }
                if self.settings.confirm_execute {
                    self.state.confirm = Some(ConfirmDialog {
                        title: "Execute all actions".to_string(),
                        message: format!(
                            "Run all {} deployment actions now?",
                            self.state.actions.len()
                        ),
                        pending: PendingConfirm::ExecuteAll,
                    });
                } else {
                    self.spawn_execute_all();
                }
            }

            AppAction::ToggleSelected => {
                let index = self.state.selection.list_index;
                if let Some(action) = self.state.actions.get_mut(index) {
                    // Optimistic flip; a failed toggle reloads server truth.
                    action.enabled = !action.enabled;
                    let enabled = action.enabled;
                    self.spawn_toggle(index, enabled);
                }
            }

            AppAction::TestSelected => {
                let index = self.state.selection.list_index;
                if index < self.state.actions.len() {
                    self.spawn_test(index);
                }
            }

            AppAction::GrabOrCommit => {
                if self.state.selection.is_moving() {
                    self.commit_move();
                } else if self.state.actions.len() >= 2 {
                    let index = self.state.selection.list_index;
                    self.state.reorder_snapshot = Some((self.state.actions.clone(), index));
                    self.state.selection.grabbed = Some(index);
                }
            }

            AppAction::CancelMove => {
                if let Some((original, index)) = self.state.reorder_snapshot.take() {
                    self.state.actions = original;
                    self.state.selection.list_index = index;
                }
                self.state.selection.grabbed = None;
            }

            // Confirmation overlay
            AppAction::Confirm => {
                if let Some(dialog) = self.state.confirm.take() {
                    match dialog.pending {
                        PendingConfirm::DeleteAction(index) => self.spawn_delete(index),
                        PendingConfirm::ExecuteAll => self.spawn_execute_all(),
                        PendingConfirm::DiscardForm => self.close_form(),
                    }
                }
            }

            AppAction::CancelConfirm => {
                self.state.confirm = None;
            }

            // Form
            AppAction::FormInput(c) => {
                if let Some(form) = self.state.form.as_mut() {
                    form.input_char(c);
                }
            }

            AppAction::FormBackspace => {
                if let Some(form) = self.state.form.as_mut() {
                    form.backspace();
                }
            }

            AppAction::FormNextField => {
                if let Some(form) = self.state.form.as_mut() {
                    form.focus_next();
                }
            }

            AppAction::FormPreviousField => {
                if let Some(form) = self.state.form.as_mut() {
                    form.focus_previous();
                }
            }

            AppAction::FormCycle(forward) => self.cycle_form(forward),

            AppAction::FormToggle => {
                if let Some(form) = self.state.form.as_mut() {
                    form.toggle();
                }
            }

            AppAction::FormSave => self.save_form(),

            AppAction::FormClose => {
                let dirty = self.state.form.as_ref().map(|f| f.is_dirty()).unwrap_or(false);
                if dirty {
                    self.state.confirm = Some(ConfirmDialog {
                        title: "Unsaved changes".to_string(),
                        message: "Discard the changes to this action?".to_string(),
                        pending: PendingConfirm::DiscardForm,
                    });
                } else {
                    self.close_form();
                }
            }

            // NPM integration
            AppAction::NpmProbe => self.npm_probe(),

            AppAction::NpmOpenTokenPrompt => {
                if self.state.npm_session == crate::npm::NpmSession::TokenInvalid {
                    self.state.token_prompt = Some(TokenPrompt::default());
                }
            }

            AppAction::TokenInput(c) => {
                if let Some(prompt) = self.state.token_prompt.as_mut() {
                    prompt.input_char(c);
                }
            }

            AppAction::TokenBackspace => {
                if let Some(prompt) = self.state.token_prompt.as_mut() {
                    prompt.backspace();
                }
            }

            AppAction::TokenNextField => {
                if let Some(prompt) = self.state.token_prompt.as_mut() {
                    prompt.focus_next();
                }
            }

            AppAction::TokenSubmit => self.submit_token_request(),

            AppAction::TokenCancel => {
                self.state.token_prompt = None;
            }

            // Results overlay
            AppAction::CloseResults => {
                self.state.results = None;
                self.state.selection.results_scroll = 0;
            }

            AppAction::ResultsScroll(delta) => {
                let scroll = &mut self.state.selection.results_scroll;
                if delta < 0 {
                    *scroll = scroll.saturating_sub(delta.unsigned_abs() as usize);
                } else {
                    *scroll = scroll.saturating_add(delta as usize);
                }
            }

            // Async operation results
            AppAction::AsyncOperationCompleted(op_id, result) => {
                self.complete_operation(op_id, result);
            }

            // Notifications
            AppAction::DismissNotification => {
                self.state.dismiss_notification();
            }

            // System
            AppAction::Quit => {
                self.state.should_quit = true;
            }

            AppAction::None => {}
        }
    }

    fn select(&mut self, forward: bool) {
        let len = self.state.actions.len();
        if len == 0 {
            return;
        }
        let index = self.state.selection.list_index;

        if self.state.selection.is_moving() {
            // Moving the grabbed row: shift it one position, no wrap-around.
            let target = if forward {
                index + 1
            } else {
                index.wrapping_sub(1)
            };
            if target < len && crate::store::apply_reorder(&mut self.state.actions, index, target)
            {
                self.state.selection.list_index = target;
            }
            return;
        }

        self.state.selection.list_index = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
    }

    fn commit_move(&mut self) {
        let Some(from) = self.state.selection.grabbed.take() else {
            return;
        };
        let to = self.state.selection.list_index;
        self.state.reorder_snapshot = None;
        if from == to {
            return; // dropped back where it started
        }
        self.spawn_persist_order(from, to);
    }

    fn cycle_form(&mut self, forward: bool) {
        let focused_field = self.state.form.as_ref().map(|form| form.focused());

        // Container fields cycle through the server's inventory when it is
        // known; free typing still works for containers the server cannot see.
        if let Some(FormEntry::Field(spec)) = focused_field {
            if matches!(spec.id, "containerName" | "dockerContainer") {
                let names: Vec<String> = self
                    .state
                    .docker
                    .as_ref()
                    .map(|inv| inv.containers.iter().map(|c| c.name.clone()).collect())
                    .unwrap_or_default();
                if !names.is_empty() {
                    let Some(form) = self.state.form.as_mut() else {
                        return;
                    };
                    let current = form.value(spec.id).to_string();
                    let pos = names.iter().position(|n| *n == current);
                    let next = match (pos, forward) {
                        (Some(p), true) => (p + 1) % names.len(),
                        (Some(p), false) => (p + names.len() - 1) % names.len(),
                        (None, _) => 0,
                    };
                    form.set_field_from_user(spec.id, names[next].clone());
                    return;
                }
            }
        }

        // Picking an NPM certificate cycles through the fetched listing
        // instead of free-typing an id.
        let on_certificate_field = matches!(
            focused_field,
            Some(FormEntry::Field(spec)) if spec.id == "certificateId"
        );

        if on_certificate_field {
            if let Some(certificates) = self.state.npm_session.certificates() {
                if certificates.is_empty() {
                    return;
                }
                let Some(form) = self.state.form.as_mut() else {
                    return;
                };
                let current: Option<u64> = form.value("certificateId").parse().ok();
                let pos = current
                    .and_then(|id| certificates.iter().position(|c| c.id == id));
                let next = match (pos, forward) {
                    (Some(p), true) => (p + 1) % certificates.len(),
                    (Some(p), false) => (p + certificates.len() - 1) % certificates.len(),
                    (None, _) => 0,
                };
                form.set_field_from_user("certificateId", certificates[next].id.to_string());
                return;
            }
        }

        let before = self.form_context();
        if let Some(form) = self.state.form.as_mut() {
            form.cycle(forward);
        }
        if self.form_context() != before {
            self.after_form_change();
        }
    }

    fn form_context(&self) -> Option<(ActionKind, Option<String>)> {
        self.state
            .form
            .as_ref()
            .map(|f| (f.kind(), f.active_group().map(str::to_string)))
    }

    /// Kind-specific initialisers, run when the form opens or the kind or
    /// choice group changes.
    fn after_form_change(&mut self) {
        let Some((kind, group)) = self.form_context() else {
            return;
        };

        let wants_containers = kind == ActionKind::DockerRestart
            || (kind == ActionKind::NginxProxyManager && group.as_deref() == Some("container"));
        if wants_containers && self.state.docker.is_none() {
            self.spawn_load_containers();
        }

        if kind == ActionKind::NginxProxyManager && group.as_deref() == Some("api") {
            match &self.state.npm_settings {
                Some(settings) => {
                    let derived = settings.derived_url();
                    if let (Some(form), Some(url)) = (self.state.form.as_mut(), derived) {
                        form.prefill_field("npmUrl", &url);
                    }
                }
                None => self.spawn_load_deployment_settings(),
            }
        }
    }

    fn save_form(&mut self) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };
        if form.saving {
            return; // one in-flight save at a time
        }
        match form.build() {
            Ok(action) => {
                form.saving = true;
                let editing = form.edit_index();
                self.spawn_save(action, editing);
            }
            Err(error) => {
                tracing::debug!(field = error.field, "validation failed: {}", error.message);
                form.set_error(error);
            }
        }
    }

    fn close_form(&mut self) {
        self.state.form = None;
        self.state.npm_session.reset();
        if self.state.current_screen == Screen::ActionForm {
            self.state.navigate_back();
        }
    }

    fn npm_probe(&mut self) {
        let Some(form) = self.state.form.as_ref() else {
            return;
        };
        if form.kind() != ActionKind::NginxProxyManager
            || form.active_group() != Some("api")
        {
            return;
        }
        let url = form.value("npmUrl").trim().to_string();
        if url.is_empty() {
            self.state.add_notification(
                "Enter the NPM base URL first".to_string(),
                NotificationLevel::Warning,
            );
            return;
        }
        if self.state.npm_session.begin_probe() {
            self.spawn_npm_probe(url);
        }
    }

    fn submit_token_request(&mut self) {
        let Some(prompt) = self.state.token_prompt.as_mut() else {
            return;
        };
        let (email, password) = prompt.take_credentials();
        self.state.token_prompt = None;

        if email.is_empty() || password.is_empty() {
            self.state.add_notification(
                "Email and password are both required".to_string(),
                NotificationLevel::Warning,
            );
            return;
        }

        let url = self
            .state
            .form
            .as_ref()
            .map(|f| f.value("npmUrl").trim().to_string())
            .unwrap_or_default();
        if self.state.npm_session.begin_token_request() {
            self.spawn_npm_request_token(url, email, password);
        }
    }

    fn complete_operation(
        &mut self,
        op_id: Uuid,
        result: Result<AsyncOperationResult, String>,
    ) {
        let Some(position) = self
            .state
            .pending_operations
            .iter()
            .position(|o| o.id == op_id)
        else {
            return;
        };

        match result {
            Ok(async_result) => {
                self.state.pending_operations[position].complete();
                self.state.pending_operations.remove(position);
                self.handle_async_result(async_result);
            }
            Err(error) => {
                self.state.pending_operations[position].fail(error.clone());
                let operation = self.state.pending_operations.remove(position);
                self.handle_async_failure(operation, error);
            }
        }
    }

    fn handle_async_result(&mut self, result: AsyncOperationResult) {
        match result {
            AsyncOperationResult::ActionsLoaded(actions) => {
                self.state.loading = false;
                self.state.replace_actions(actions);
            }

            AsyncOperationResult::ActionSaved => {
                self.state.add_notification(
                    "Action saved".to_string(),
                    NotificationLevel::Success,
                );
                // The form may already be gone if it was dismissed mid-save;
                // the result still applies and the editor stays closed.
                if let Some(mut form) = self.state.form.take() {
                    form.mark_saved();
                    self.state.npm_session.reset();
                    if self.state.current_screen == Screen::ActionForm {
                        self.state.navigate_back();
                    }
                }
                self.spawn_load_actions();
            }

            AsyncOperationResult::ActionDeleted => {
                self.state.add_notification(
                    "Action deleted".to_string(),
                    NotificationLevel::Success,
                );
                self.spawn_load_actions();
            }

            AsyncOperationResult::TestFinished(index, outcome) => {
                if outcome.success {
                    let name = self
                        .state
                        .actions
                        .get(index)
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|| format!("action {}", index));
                    self.state.results = Some(ResultsView::Test {
                        index,
                        name,
                        outcome,
                    });
                } else {
                    let message = outcome
                        .message
                        .unwrap_or_else(|| "Test failed".to_string());
                    self.state
                        .add_notification(message, NotificationLevel::Error);
                }
            }

            AsyncOperationResult::Toggled(index, enabled) => {
                tracing::debug!(index, enabled, "toggle persisted");
            }

            AsyncOperationResult::Executed(report) => {
                let level = if report.actions_succeeded == report.actions_executed {
                    NotificationLevel::Success
                } else {
                    NotificationLevel::Warning
                };
                self.state.add_notification(
                    format!(
                        "Successfully executed {} of {} actions",
                        report.actions_succeeded, report.actions_executed
                    ),
                    level,
                );
                self.state.results = Some(ResultsView::Execute(report));
            }

            AsyncOperationResult::OrderPersisted => {
                self.state.add_notification(
                    "Order saved".to_string(),
                    NotificationLevel::Success,
                );
            }

            AsyncOperationResult::ContainersLoaded(inventory) => {
                if !inventory.docker_available {
                    self.state.add_notification(
                        "Docker is not available on the server".to_string(),
                        NotificationLevel::Info,
                    );
                }
                self.state.docker = Some(inventory);
            }

            AsyncOperationResult::DeploymentSettingsLoaded(settings) => {
                let derived = settings.derived_url();
                self.state.npm_settings = Some(settings);
                if let (Some(form), Some(url)) = (self.state.form.as_mut(), derived) {
                    form.prefill_field("npmUrl", &url);
                }
            }

            AsyncOperationResult::NpmReachable => {
                if self.state.npm_session.probe_succeeded() {
                    self.spawn_npm_validate_token();
                }
            }

            AsyncOperationResult::NpmTokenChecked(status) => match status {
                TokenStatus::Valid { user } => {
                    if self.state.npm_session.token_valid(user) {
                        self.spawn_npm_certificates();
                    }
                }
                TokenStatus::Invalid => {
                    self.state.npm_session.token_invalid();
                    self.state.add_notification(
                        "NPM token invalid - request a new one".to_string(),
                        NotificationLevel::Warning,
                    );
                }
            },

            AsyncOperationResult::NpmTokenGranted => {
                self.state.add_notification(
                    "NPM token stored".to_string(),
                    NotificationLevel::Success,
                );
                if self.state.npm_session.token_valid(None) {
                    self.spawn_npm_certificates();
                }
            }

            AsyncOperationResult::NpmCertificatesLoaded(certificates) => {
                self.state.npm_session.certificates_loaded(certificates);
            }
        }
    }

    /// Failure handling keyed on what was in flight: optimistic mutations
    /// reload server truth, everything else surfaces the message.
    fn handle_async_failure(&mut self, operation: AsyncOperation, error: String) {
        debug_assert!(matches!(operation.status, AsyncStatus::Failed(_)));
        match operation.operation_type {
            OperationType::LoadActions => {
                self.state.loading = false;
                self.state.add_notification(
                    format!("Failed to load actions: {}", error),
                    NotificationLevel::Error,
                );
            }
            OperationType::SaveAction { .. } => {
                if let Some(form) = self.state.form.as_mut() {
                    form.saving = false;
                }
                self.state
                    .add_notification(error, NotificationLevel::Error);
            }
            OperationType::ToggleAction(_) | OperationType::PersistOrder => {
                self.state
                    .add_notification(error, NotificationLevel::Error);
                self.spawn_load_actions();
            }
            OperationType::NpmProbe => {
                self.state.npm_session.probe_failed(error.clone());
                self.state
                    .add_notification(error, NotificationLevel::Error);
            }
            OperationType::NpmValidateToken | OperationType::NpmRequestToken => {
                self.state.npm_session.token_invalid();
                self.state
                    .add_notification(error, NotificationLevel::Error);
            }
            OperationType::LoadContainers => {
                self.state.add_notification(
                    format!("Could not list Docker containers: {}", error),
                    NotificationLevel::Info,
                );
            }
            OperationType::LoadDeploymentSettings => {
                tracing::debug!("deployment settings unavailable: {}", error);
            }
            _ => {
                self.state
                    .add_notification(error, NotificationLevel::Error);
            }
        }
    }

    // Async operation spawners

    fn begin_operation(&mut self, operation_type: OperationType) -> Uuid {
        let operation = AsyncOperation::new(operation_type);
        let id = operation.id;
        self.state.pending_operations.push(operation);
        id
    }

    fn spawn_load_actions(&mut self) {
        self.state.loading = true;
        let op_id = self.begin_operation(OperationType::LoadActions);
        let client = self.deploy_client.clone();
        let fingerprint = self.state.certificate.fingerprint.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.list(&fingerprint).await;
            let action = match result {
                Ok(actions) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::ActionsLoaded(actions)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_save(&mut self, action: DeployAction, editing: Option<usize>) {
        let op_id = self.begin_operation(OperationType::SaveAction { editing });
        let client = self.deploy_client.clone();
        let fingerprint = self.state.certificate.fingerprint.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = match editing {
                Some(index) => client.update(&fingerprint, index, &action).await,
                None => client.create(&fingerprint, &action).await,
            };
            let message = match result {
                Ok(()) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::ActionSaved),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(message);
        });
    }

    fn spawn_delete(&mut self, index: usize) {
        let op_id = self.begin_operation(OperationType::DeleteAction(index));
        let client = self.deploy_client.clone();
        let fingerprint = self.state.certificate.fingerprint.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.delete(&fingerprint, index).await;
            let action = match result {
                Ok(()) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::ActionDeleted),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_test(&mut self, index: usize) {
        let op_id = self.begin_operation(OperationType::TestAction(index));
        let client = self.deploy_client.clone();
        let fingerprint = self.state.certificate.fingerprint.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.test(&fingerprint, index).await;
            let action = match result {
                Ok(outcome) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::TestFinished(index, outcome)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_toggle(&mut self, index: usize, enabled: bool) {
        let op_id = self.begin_operation(OperationType::ToggleAction(index));
        let client = self.deploy_client.clone();
        let fingerprint = self.state.certificate.fingerprint.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.toggle(&fingerprint, index, enabled).await;
            let action = match result {
                Ok(()) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::Toggled(index, enabled)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_execute_all(&mut self) {
        let op_id = self.begin_operation(OperationType::ExecuteAll);
        let client = self.deploy_client.clone();
        let fingerprint = self.state.certificate.fingerprint.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.execute_all(&fingerprint).await;
            let action = match result {
                Ok(report) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::Executed(report)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_persist_order(&mut self, from: usize, to: usize) {
        let op_id = self.begin_operation(OperationType::PersistOrder);
        let client = self.deploy_client.clone();
        let fingerprint = self.state.certificate.fingerprint.clone();
        let actions = self.state.actions.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.persist_order(&fingerprint, &actions, from, to).await;
            let action = match result {
                Ok(()) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::OrderPersisted),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_load_containers(&mut self) {
        let op_id = self.begin_operation(OperationType::LoadContainers);
        let client = self.deploy_client.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.docker_containers().await;
            let action = match result {
                Ok(inventory) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::ContainersLoaded(inventory)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_load_deployment_settings(&mut self) {
        let op_id = self.begin_operation(OperationType::LoadDeploymentSettings);
        let client = self.deploy_client.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.deployment_settings().await;
            let action = match result {
                Ok(settings) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::DeploymentSettingsLoaded(settings)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_npm_probe(&mut self, api_url: String) {
        let op_id = self.begin_operation(OperationType::NpmProbe);
        let client = self.npm_client.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.check_connection(&api_url).await;
            let action = match result {
                Ok(()) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::NpmReachable),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_npm_validate_token(&mut self) {
        let op_id = self.begin_operation(OperationType::NpmValidateToken);
        let client = self.npm_client.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.validate_token().await;
            let action = match result {
                Ok(status) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::NpmTokenChecked(status)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_npm_request_token(&mut self, api_url: String, email: String, password: String) {
        let op_id = self.begin_operation(OperationType::NpmRequestToken);
        let client = self.npm_client.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.request_token(&api_url, &email, &password).await;
            let action = match result {
                Ok(()) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::NpmTokenGranted),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_npm_certificates(&mut self) {
        let op_id = self.begin_operation(OperationType::NpmListCertificates);
        let client = self.npm_client.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = client.certificates().await;
            let action = match result {
                Ok(certificates) => AppAction::AsyncOperationCompleted(
                    op_id,
                    Ok(AsyncOperationResult::NpmCertificatesLoaded(certificates)),
                ),
                Err(e) => AppAction::AsyncOperationCompleted(op_id, Err(e.to_string())),
            };
            let _ = tx.send(action);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = CertdeckConfig::default();
        config.settings.confirm_delete = true;
        App::new(config, CertificateRef::new("abc123")).unwrap()
    }

    fn loaded_app() -> App {
        let mut app = app();
        app.state.actions = crate::actions::samples::one_of_each();
        app
    }

    #[test]
    fn open_and_close_a_clean_form_never_prompts() {
        let mut app = loaded_app();
        app.update(AppAction::OpenAdd(ActionKind::Copy));
        assert!(app.state.form.is_some());
        assert_eq!(app.state.current_screen, Screen::ActionForm);

        app.update(AppAction::FormClose);
        assert!(app.state.confirm.is_none());
        assert!(app.state.form.is_none());
        assert_eq!(app.state.current_screen, Screen::ActionList);
    }

    #[test]
    fn closing_a_dirty_form_requires_confirmation() {
        let mut app = loaded_app();
        app.update(AppAction::OpenAdd(ActionKind::Copy));
        app.update(AppAction::FormNextField); // Name row
        app.update(AppAction::FormInput('x'));

        app.update(AppAction::FormClose);
        let dialog = app.state.confirm.as_ref().expect("confirmation dialog");
        assert_eq!(dialog.pending, PendingConfirm::DiscardForm);
        assert!(app.state.form.is_some());

        app.update(AppAction::Confirm);
        assert!(app.state.form.is_none());
        assert_eq!(app.state.current_screen, Screen::ActionList);
    }

    #[test]
    fn cancelling_the_discard_keeps_the_dirty_form_open() {
        let mut app = loaded_app();
        app.update(AppAction::OpenAdd(ActionKind::Copy));
        app.update(AppAction::FormNextField);
        app.update(AppAction::FormInput('x'));
        app.update(AppAction::FormClose);
        app.update(AppAction::CancelConfirm);
        assert!(app.state.form.as_ref().unwrap().is_dirty());
        assert_eq!(app.state.current_screen, Screen::ActionForm);
    }

    #[test]
    fn grab_move_and_cancel_restores_the_original_order() {
        let mut app = loaded_app();
        let original: Vec<String> =
            app.state.actions.iter().map(|a| a.name.clone()).collect();

        app.update(AppAction::GrabOrCommit);
        assert!(app.state.selection.is_moving());
        app.update(AppAction::SelectNext);
        app.update(AppAction::SelectNext);
        let moved: Vec<String> = app.state.actions.iter().map(|a| a.name.clone()).collect();
        assert_ne!(original, moved);

        app.update(AppAction::CancelMove);
        let restored: Vec<String> =
            app.state.actions.iter().map(|a| a.name.clone()).collect();
        assert_eq!(original, restored);
        assert!(!app.state.selection.is_moving());
    }

    #[test]
    fn moving_reorders_locally_like_the_spec_example() {
        let mut app = app();
        app.state.actions = crate::actions::samples::one_of_each()[..3].to_vec();
        let names = |app: &App| -> Vec<String> {
            app.state.actions.iter().map(|a| a.name.clone()).collect()
        };
        let (a, b, c) = (
            names(&app)[0].clone(),
            names(&app)[1].clone(),
            names(&app)[2].clone(),
        );

        // [A,B,C] -> [C,A,B]: grab C and move it to the front.
        app.state.selection.list_index = 2;
        app.update(AppAction::GrabOrCommit);
        app.update(AppAction::SelectPrevious);
        app.update(AppAction::SelectPrevious);
        assert_eq!(names(&app), vec![c, a, b]);
    }

    #[test]
    fn delete_is_gated_behind_a_confirmation() {
        let mut app = loaded_app();
        app.update(AppAction::RequestDelete);
        let dialog = app.state.confirm.as_ref().expect("confirmation dialog");
        assert_eq!(dialog.pending, PendingConfirm::DeleteAction(0));

        app.update(AppAction::CancelConfirm);
        assert!(app.state.confirm.is_none());
        assert_eq!(app.state.actions.len(), crate::actions::samples::one_of_each().len());
    }

    #[tokio::test]
    async fn toggle_flips_optimistically() {
        let mut app = loaded_app();
        let before = app.state.actions[0].enabled;
        app.update(AppAction::ToggleSelected);
        assert_eq!(app.state.actions[0].enabled, !before);
    }

    #[test]
    fn invalid_form_save_surfaces_a_field_error_without_closing() {
        let mut app = loaded_app();
        app.update(AppAction::OpenAdd(ActionKind::Email));
        app.update(AppAction::FormSave);
        let form = app.state.form.as_ref().unwrap();
        assert!(form.error.is_some());
        assert_eq!(app.state.current_screen, Screen::ActionForm);
    }

    #[test]
    fn npm_probe_requires_a_url() {
        let mut app = loaded_app();
        app.update(AppAction::OpenAdd(ActionKind::NginxProxyManager));
        // Switch the target to the API method.
        if let Some(form) = app.state.form.as_mut() {
            form.set_field_from_user("npmTarget", "api".to_string());
        }
        app.update(AppAction::NpmProbe);
        assert_eq!(app.state.npm_session, crate::npm::NpmSession::Idle);
        assert!(app
            .state
            .notifications
            .back()
            .unwrap()
            .message
            .contains("NPM base URL"));
    }

    #[test]
    fn token_prompt_opens_only_when_the_token_is_invalid() {
        let mut app = loaded_app();
        app.update(AppAction::NpmOpenTokenPrompt);
        assert!(app.state.token_prompt.is_none());

        app.state.npm_session = crate::npm::NpmSession::TokenInvalid;
        app.update(AppAction::NpmOpenTokenPrompt);
        assert!(app.state.token_prompt.is_some());
    }

    #[tokio::test]
    async fn save_result_after_dismissal_stays_closed() {
        let mut app = loaded_app();
        // Simulate a save settling when the form is already gone.
        let op_id = app.begin_operation(OperationType::SaveAction { editing: None });
        app.update(AppAction::AsyncOperationCompleted(
            op_id,
            Ok(AsyncOperationResult::ActionSaved),
        ));
        assert!(app.state.form.is_none());
        assert_eq!(app.state.current_screen, Screen::ActionList);
    }

    #[test]
    fn execute_report_toasts_the_success_ratio() {
        let mut app = loaded_app();
        let op_id = app.begin_operation(OperationType::ExecuteAll);
        let report: crate::api::ExecuteReport = serde_json::from_value(serde_json::json!({
            "success": true,
            "actionsExecuted": 2,
            "actionsSucceeded": 1,
            "results": [
                {"name": "one", "success": true},
                {"name": "two", "success": false, "message": "boom"},
            ],
        }))
        .unwrap();
        app.update(AppAction::AsyncOperationCompleted(
            op_id,
            Ok(AsyncOperationResult::Executed(report)),
        ));
        assert_eq!(
            app.state.notifications.back().unwrap().message,
            "Successfully executed 1 of 2 actions"
        );
        assert!(matches!(app.state.results, Some(ResultsView::Execute(_))));
    }

    #[tokio::test]
    async fn npm_handshake_walks_probe_validate_request_and_listing() {
        use crate::npm::NpmSession;

        let mut app = loaded_app();
        app.update(AppAction::OpenAdd(ActionKind::NginxProxyManager));
        if let Some(form) = app.state.form.as_mut() {
            form.set_field_from_user("npmTarget", "api".to_string());
            form.set_field_from_user("npmUrl", "http://npm.internal:81".to_string());
        }

        let op_of = |app: &App, matcher: fn(&OperationType) -> bool| {
            app.state
                .pending_operations
                .iter()
                .find(|o| matcher(&o.operation_type))
                .map(|o| o.id)
                .expect("operation in flight")
        };

        // Probe succeeds, which chains into token validation.
        app.update(AppAction::NpmProbe);
        assert_eq!(app.state.npm_session, NpmSession::Probing);
        let probe = op_of(&app, |t| matches!(t, OperationType::NpmProbe));
        app.update(AppAction::AsyncOperationCompleted(
            probe,
            Ok(AsyncOperationResult::NpmReachable),
        ));

        // The stored token is invalid; the prompt becomes available.
        let validate = op_of(&app, |t| matches!(t, OperationType::NpmValidateToken));
        app.update(AppAction::AsyncOperationCompleted(
            validate,
            Ok(AsyncOperationResult::NpmTokenChecked(TokenStatus::Invalid)),
        ));
        assert_eq!(app.state.npm_session, NpmSession::TokenInvalid);

        app.update(AppAction::NpmOpenTokenPrompt);
        for c in "admin@x".chars() {
            app.update(AppAction::TokenInput(c));
        }
        app.update(AppAction::TokenNextField);
        for c in "pw".chars() {
            app.update(AppAction::TokenInput(c));
        }
        app.update(AppAction::TokenSubmit);
        assert!(app.state.token_prompt.is_none());
        assert_eq!(app.state.npm_session, NpmSession::RequestingToken);

        // Granted token chains into the certificate listing.
        let request = op_of(&app, |t| matches!(t, OperationType::NpmRequestToken));
        app.update(AppAction::AsyncOperationCompleted(
            request,
            Ok(AsyncOperationResult::NpmTokenGranted),
        ));
        let listing = op_of(&app, |t| matches!(t, OperationType::NpmListCertificates));
        app.update(AppAction::AsyncOperationCompleted(
            listing,
            Ok(AsyncOperationResult::NpmCertificatesLoaded(vec![
                crate::models::NpmCertificate {
                    id: 3,
                    nice_name: Some("Main site".to_string()),
                    domain_names: vec!["example.com".to_string()],
                    expires_on: Some("2026-11-02 09:00:00".to_string()),
                },
            ])),
        ));
        assert!(matches!(app.state.npm_session, NpmSession::Certificates(_)));
    }

    #[tokio::test]
    async fn failed_reorder_persistence_reloads_the_canonical_order() {
        let mut app = loaded_app();
        app.update(AppAction::GrabOrCommit);
        app.update(AppAction::SelectNext);
        app.update(AppAction::GrabOrCommit); // commit 0 -> 1

        let persist = app
            .state
            .pending_operations
            .iter()
            .find(|o| matches!(o.operation_type, OperationType::PersistOrder))
            .unwrap()
            .id;
        app.update(AppAction::AsyncOperationCompleted(
            persist,
            Err("500 Internal Server Error".to_string()),
        ));
        assert!(app
            .state
            .pending_operations
            .iter()
            .any(|o| matches!(o.operation_type, OperationType::LoadActions)));
    }

    #[tokio::test]
    async fn failed_toggle_reloads_server_truth() {
        let mut app = loaded_app();
        app.update(AppAction::ToggleSelected);
        let toggle_op = app
            .state
            .pending_operations
            .iter()
            .find(|o| matches!(o.operation_type, OperationType::ToggleAction(_)))
            .unwrap()
            .id;
        app.update(AppAction::AsyncOperationCompleted(
            toggle_op,
            Err("boom".to_string()),
        ));
        // A reload was queued to restore the server's view.
        assert!(app
            .state
            .pending_operations
            .iter()
            .any(|o| matches!(o.operation_type, OperationType::LoadActions)));
    }
}
