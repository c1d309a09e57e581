pub mod describe;
pub mod kind;
pub mod model;
pub mod name;
pub mod schema;
pub mod validate;
pub mod values;

#[cfg(test)]
pub mod samples;

pub use describe::describe;
pub use kind::ActionKind;
pub use model::{
    ActionParams, BasicAuth, CommandParams, ContainerRef, CopyParams, CopySource,
    DeployAction, DockerRestartParams, EmailParams, FtpCopyParams, HttpMethod,
    NginxProxyManagerParams, NpmTarget, SmbCopyParams, SshAuth, SshCopyParams,
    WebhookParams,
};
pub use name::generate as generate_name;
pub use schema::{Control, FieldSpec};
pub use validate::{validate, FieldError};
pub use values::{to_values, FieldValues};
