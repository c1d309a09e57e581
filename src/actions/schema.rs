use super::kind::ActionKind;

/// How a field is edited and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Text,
    Secret,
    /// Filesystem path on the deployment target.
    Path,
    Port,
    Number,
    Octal,
    Checkbox,
    /// Raw JSON edited as text, parsed on save.
    Json,
    /// Fixed option list cycled in place.
    Select(&'static [&'static str]),
    /// Selector between mutually exclusive field groups; switching clears the
    /// sibling groups' values.
    Choice(&'static [&'static str]),
}

/// One entry of the per-kind field catalogue. The form renders, defaults,
/// watches and clears fields purely from this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub control: Control,
    pub default: &'static str,
    pub required: bool,
    /// Changes regenerate the action name (unless manually edited).
    pub watched: bool,
    /// Only visible while the kind's choice field holds this value.
    pub group: Option<&'static str>,
}

const fn field(id: &'static str, label: &'static str, control: Control) -> FieldSpec {
    FieldSpec {
        id,
        label,
        control,
        default: "",
        required: false,
        watched: false,
        group: None,
    }
}

impl FieldSpec {
    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn watched(mut self) -> Self {
        self.watched = true;
        self
    }

    const fn default_value(mut self, value: &'static str) -> Self {
        self.default = value;
        self
    }

    const fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }
}

pub const SOURCE_OPTIONS: &[&str] = &["cert", "key", "pem", "p12", "csr", "chain", "fullchain"];
const API_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];
const WEBHOOK_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

const COPY_FIELDS: &[FieldSpec] = &[
    field("source", "Source artifact", Control::Select(SOURCE_OPTIONS))
        .default_value("cert")
        .required()
        .watched(),
    field("destination", "Destination path", Control::Path)
        .required()
        .watched(),
    field("permissions", "Permissions (octal)", Control::Octal),
];

const COMMAND_FIELDS: &[FieldSpec] = &[
    field("command", "Command", Control::Text).required().watched(),
    field("cwd", "Working directory", Control::Path),
    field("verbose", "Verbose output", Control::Checkbox),
];

const DOCKER_RESTART_FIELDS: &[FieldSpec] = &[
    field(
        "containerChoice",
        "Identify container by",
        Control::Choice(&["name", "id"]),
    )
    .default_value("name")
    .watched(),
    field("containerName", "Container name", Control::Text)
        .required()
        .watched()
        .group("name"),
    field("containerId", "Container id", Control::Text)
        .required()
        .watched()
        .group("id"),
];

const NPM_FIELDS: &[FieldSpec] = &[
    field(
        "npmTarget",
        "Update method",
        Control::Choice(&["path", "container", "api"]),
    )
    .default_value("path")
    .watched(),
    field("npmPath", "NPM data directory", Control::Path)
        .required()
        .watched()
        .group("path"),
    field("dockerContainer", "NPM container", Control::Text)
        .required()
        .watched()
        .group("container"),
    field("npmUrl", "NPM base URL", Control::Text)
        .required()
        .watched()
        .group("api"),
    field("certificateId", "NPM certificate", Control::Number)
        .required()
        .group("api"),
    field("restartServices", "Restart proxy hosts", Control::Checkbox),
    field("verifyUpdate", "Verify after update", Control::Checkbox),
];

const SSH_COPY_FIELDS: &[FieldSpec] = &[
    field("host", "Host", Control::Text).required().watched(),
    field("port", "Port", Control::Port).default_value("22").required(),
    field("username", "Username", Control::Text).required(),
    field(
        "authMethod",
        "Authentication",
        Control::Choice(&["password", "privateKey"]),
    )
    .default_value("password"),
    field("password", "Password", Control::Secret)
        .required()
        .group("password"),
    field("privateKey", "Private key", Control::Secret)
        .required()
        .group("privateKey"),
    field("passphrase", "Key passphrase", Control::Secret).group("privateKey"),
    field("source", "Source artifact", Control::Select(SOURCE_OPTIONS))
        .default_value("cert")
        .required()
        .watched(),
    field("destination", "Destination path", Control::Path)
        .required()
        .watched(),
    field("permissions", "Permissions (octal)", Control::Octal),
    field("command", "Command after copy", Control::Text),
    field("verbose", "Verbose output", Control::Checkbox),
];

const SMB_COPY_FIELDS: &[FieldSpec] = &[
    field("host", "Host", Control::Text).required().watched(),
    field("share", "Share", Control::Text).required().watched(),
    field("source", "Source artifact", Control::Select(SOURCE_OPTIONS))
        .default_value("cert")
        .required()
        .watched(),
    field("destination", "Destination path", Control::Path)
        .required()
        .watched(),
    field("username", "Username", Control::Text),
    field("password", "Password", Control::Secret),
    field("domain", "Domain", Control::Text),
    field("verbose", "Verbose output", Control::Checkbox),
];

const FTP_COPY_FIELDS: &[FieldSpec] = &[
    field("host", "Host", Control::Text).required().watched(),
    field("port", "Port", Control::Port).default_value("21").required(),
    field("secure", "FTPS (TLS)", Control::Checkbox).watched(),
    field("source", "Source artifact", Control::Select(SOURCE_OPTIONS))
        .default_value("cert")
        .required()
        .watched(),
    field("destination", "Destination path", Control::Path)
        .required()
        .watched(),
    field("username", "Username", Control::Text),
    field("password", "Password", Control::Secret),
];

const API_CALL_FIELDS: &[FieldSpec] = &[
    field("url", "URL", Control::Text).required().watched(),
    field("method", "Method", Control::Select(API_METHODS))
        .default_value("GET")
        .required()
        .watched(),
    field("contentType", "Content type", Control::Text),
    field("body", "Request body", Control::Text),
    field("headers", "Extra headers (JSON)", Control::Json),
    field("username", "Basic auth username", Control::Text),
    field("password", "Basic auth password", Control::Secret),
];

const WEBHOOK_FIELDS: &[FieldSpec] = &[
    field("url", "URL", Control::Text).required().watched(),
    field("method", "Method", Control::Select(WEBHOOK_METHODS))
        .default_value("POST")
        .required(),
    field("contentType", "Content type", Control::Text),
    field("payload", "Payload (JSON)", Control::Json),
];

const EMAIL_FIELDS: &[FieldSpec] = &[
    field("to", "Recipient", Control::Text).required().watched(),
    field("subject", "Subject", Control::Text).required(),
    field("body", "Body", Control::Text).required(),
    field("attachCert", "Attach certificate", Control::Checkbox),
];

/// The ordered field catalogue for one action kind.
pub fn fields(kind: ActionKind) -> &'static [FieldSpec] {
    match kind {
        ActionKind::Copy => COPY_FIELDS,
        ActionKind::Command => COMMAND_FIELDS,
        ActionKind::DockerRestart => DOCKER_RESTART_FIELDS,
        ActionKind::NginxProxyManager => NPM_FIELDS,
        ActionKind::SshCopy => SSH_COPY_FIELDS,
        ActionKind::SmbCopy => SMB_COPY_FIELDS,
        ActionKind::FtpCopy => FTP_COPY_FIELDS,
        ActionKind::ApiCall => API_CALL_FIELDS,
        ActionKind::Webhook => WEBHOOK_FIELDS,
        ActionKind::Email => EMAIL_FIELDS,
    }
}

pub fn spec(kind: ActionKind, id: &str) -> Option<&'static FieldSpec> {
    fields(kind).iter().find(|f| f.id == id)
}

/// The kind's group selector, if it has mutually exclusive field groups.
pub fn choice_field(kind: ActionKind) -> Option<&'static FieldSpec> {
    fields(kind)
        .iter()
        .find(|f| matches!(f.control, Control::Choice(_)))
}

/// Whether a field is visible given the current choice selection.
pub fn is_visible(spec: &FieldSpec, active_group: Option<&str>) -> bool {
    match spec.group {
        None => true,
        Some(group) => active_group == Some(group),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_fields() {
        for kind in ActionKind::ALL {
            assert!(!fields(kind).is_empty(), "no fields for {}", kind);
        }
    }

    #[test]
    fn grouped_fields_belong_to_a_declared_choice() {
        for kind in ActionKind::ALL {
            let options: &[&str] = match choice_field(kind) {
                Some(spec) => match spec.control {
                    Control::Choice(options) => options,
                    _ => unreachable!(),
                },
                None => &[],
            };
            for spec in fields(kind) {
                if let Some(group) = spec.group {
                    assert!(
                        options.contains(&group),
                        "{}: field {} references unknown group {}",
                        kind,
                        spec.id,
                        group
                    );
                }
            }
        }
    }

    #[test]
    fn choice_defaults_select_an_option() {
        for kind in ActionKind::ALL {
            if let Some(spec) = choice_field(kind) {
                if let Control::Choice(options) = spec.control {
                    assert!(options.contains(&spec.default));
                }
            }
        }
    }

    #[test]
    fn field_ids_are_unique_per_kind() {
        for kind in ActionKind::ALL {
            let mut seen = std::collections::HashSet::new();
            for spec in fields(kind) {
                assert!(seen.insert(spec.id), "{}: duplicate field {}", kind, spec.id);
            }
        }
    }

    #[test]
    fn grouped_visibility_follows_the_selection() {
        let spec = super::spec(ActionKind::SshCopy, "password").unwrap();
        assert!(is_visible(spec, Some("password")));
        assert!(!is_visible(spec, Some("privateKey")));
        let host = super::spec(ActionKind::SshCopy, "host").unwrap();
        assert!(is_visible(host, Some("privateKey")));
    }
}
