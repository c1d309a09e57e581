pub mod client;
pub mod deploy;
pub mod error;
pub mod fingerprint;
pub mod npm;

pub use client::{ApiClient, ApiResult};
pub use deploy::{DeployClient, ExecuteReport, ExecutionResult, TestOutcome};
pub use error::ApiError;
pub use fingerprint::encode_fingerprint;
pub use npm::{NpmClient, TokenStatus};
