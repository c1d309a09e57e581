use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::actions::DeployAction;
use crate::api::{ExecuteReport, TestOutcome, TokenStatus};
use crate::models::{DockerInventory, NpmCertificate, NpmSettings};

#[derive(Debug, Clone)]
pub struct AsyncOperation {
    pub id: Uuid,
    pub operation_type: OperationType,
    pub status: AsyncStatus,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum OperationType {
    LoadActions,
    SaveAction { editing: Option<usize> },
    DeleteAction(usize),
    TestAction(usize),
    ToggleAction(usize),
    ExecuteAll,
    PersistOrder,
    LoadContainers,
    LoadDeploymentSettings,
    NpmProbe,
    NpmValidateToken,
    NpmRequestToken,
    NpmListCertificates,
}

#[derive(Debug, Clone)]
pub enum AsyncStatus {
    InProgress,
    Completed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum AsyncOperationResult {
    ActionsLoaded(Vec<DeployAction>),
    ActionSaved,
    ActionDeleted,
    TestFinished(usize, TestOutcome),
    Toggled(usize, bool),
    Executed(ExecuteReport),
    OrderPersisted,
    ContainersLoaded(DockerInventory),
    DeploymentSettingsLoaded(NpmSettings),
    NpmReachable,
    NpmTokenChecked(TokenStatus),
    NpmTokenGranted,
    NpmCertificatesLoaded(Vec<NpmCertificate>),
}

impl AsyncOperation {
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_type,
            status: AsyncStatus::InProgress,
            started_at: Utc::now(),
        }
    }

    pub fn complete(&mut self) {
        self.status = AsyncStatus::Completed;
    }

    pub fn fail(&mut self, error: String) {
        self.status = AsyncStatus::Failed(error);
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, AsyncStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, AsyncStatus::Failed(_))
    }
}
