use super::model::{ActionParams, ContainerRef, NpmTarget, SshAuth};

/// A validation failure anchored to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ValidationResult = Result<(), FieldError>;

fn require(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    Ok(())
}

fn check_port(field: &'static str, port: u16) -> ValidationResult {
    if port == 0 {
        return Err(FieldError::new(field, "must be between 1 and 65535"));
    }
    Ok(())
}

/// Octal permission string, at most 0777.
pub fn check_permissions(field: &'static str, raw: &str) -> ValidationResult {
    let digits = raw.strip_prefix("0o").unwrap_or(raw);
    let mode = u32::from_str_radix(digits, 8)
        .map_err(|_| FieldError::new(field, "must be an octal mode like 0644"))?;
    if mode > 0o777 {
        return Err(FieldError::new(field, "must not exceed 0777"));
    }
    Ok(())
}

/// The `^[^\s@]+@[^\s@]+\.[^\s@]+$` shape check: local part, an `@`, and a
/// domain containing a dot, with no whitespace or second `@` anywhere.
pub fn is_email_shaped(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@');
    let Some((domain_head, domain_tail)) = domain.rsplit_once('.') else {
        return false;
    };
    clean(local) && clean(domain_head) && clean(domain_tail)
}

fn check_hex_id(field: &'static str, id: &str) -> ValidationResult {
    let hex = id.len() == 12 || id.len() == 64;
    if !hex || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FieldError::new(field, "must be a 12 or 64 character hex id"));
    }
    Ok(())
}

/// Validate a fully built action. Field-level parse failures (ports, octal,
/// JSON) are caught earlier while building from the form; this is the
/// authoritative check run before every save.
pub fn validate(params: &ActionParams) -> ValidationResult {
    match params {
        ActionParams::Copy(p) => {
            require("destination", &p.destination)?;
            if !p.destination.starts_with('/') {
                return Err(FieldError::new("destination", "must be an absolute path"));
            }
            if let Some(perms) = &p.permissions {
                check_permissions("permissions", perms)?;
            }
            Ok(())
        }
        ActionParams::Command(p) => require("command", &p.command),
        ActionParams::DockerRestart(p) => match &p.container {
            ContainerRef::Id { container_id } => check_hex_id("containerId", container_id),
            ContainerRef::Name { container_name } => require("containerName", container_name),
        },
        ActionParams::NginxProxyManager(p) => match &p.target {
            NpmTarget::Path { npm_path } => require("npmPath", npm_path),
            NpmTarget::Container { docker_container } => {
                require("dockerContainer", docker_container)
            }
            NpmTarget::Api {
                npm_url,
                certificate_id,
            } => {
                require("npmUrl", npm_url)?;
                if *certificate_id == 0 {
                    return Err(FieldError::new("certificateId", "select a certificate"));
                }
                Ok(())
            }
        },
        ActionParams::SshCopy(p) => {
            require("host", &p.host)?;
            check_port("port", p.port)?;
            require("username", &p.username)?;
            require("destination", &p.destination)?;
            match &p.auth {
                SshAuth::Password { password } => require("password", password)?,
                SshAuth::PrivateKey { private_key, .. } => {
                    require("privateKey", private_key)?
                }
            }
            if let Some(perms) = &p.permissions {
                check_permissions("permissions", perms)?;
            }
            Ok(())
        }
        ActionParams::SmbCopy(p) => {
            require("host", &p.host)?;
            require("share", &p.share)?;
            require("destination", &p.destination)?;
            if p.domain.is_some() && p.username.is_none() {
                return Err(FieldError::new("domain", "requires a username"));
            }
            Ok(())
        }
        ActionParams::FtpCopy(p) => {
            require("host", &p.host)?;
            check_port("port", p.port)?;
            require("destination", &p.destination)?;
            Ok(())
        }
        ActionParams::ApiCall(p) => {
            require("url", &p.url)?;
            if p.body.is_some() && !p.method.has_body() {
                return Err(FieldError::new(
                    "body",
                    "only allowed for POST, PUT and PATCH",
                ));
            }
            Ok(())
        }
        ActionParams::Webhook(p) => {
            require("url", &p.url)?;
            if crate::actions::name::hostname(&p.url).is_empty() {
                return Err(FieldError::new("url", "must be an absolute http(s) URL"));
            }
            if !p.method.has_body() {
                return Err(FieldError::new("method", "must be POST, PUT or PATCH"));
            }
            Ok(())
        }
        ActionParams::Email(p) => {
            if !is_email_shaped(&p.to) {
                return Err(FieldError::new("to", "must be an email address"));
            }
            require("subject", &p.subject)?;
            require("body", &p.body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::model::*;

    #[test]
    fn samples_all_validate() {
        for action in crate::actions::samples::one_of_each() {
            validate(&action.params).unwrap_or_else(|e| {
                panic!("sample {} failed validation: {}", action.kind(), e)
            });
        }
    }

    #[test]
    fn copy_requires_an_absolute_destination() {
        let err = validate(&ActionParams::Copy(CopyParams {
            source: CopySource::Cert,
            destination: "relative/site.crt".to_string(),
            permissions: None,
        }))
        .unwrap_err();
        assert_eq!(err.field, "destination");
    }

    #[test]
    fn permissions_must_be_octal_within_0777() {
        for bad in ["1777", "abc", "0999"] {
            let err = validate(&ActionParams::Copy(CopyParams {
                source: CopySource::Cert,
                destination: "/etc/ssl/site.crt".to_string(),
                permissions: Some(bad.to_string()),
            }))
            .unwrap_err();
            assert_eq!(err.field, "permissions", "expected rejection for {}", bad);
        }

        validate(&ActionParams::Copy(CopyParams {
            source: CopySource::Cert,
            destination: "/etc/ssl/site.crt".to_string(),
            permissions: Some("0644".to_string()),
        }))
        .unwrap();
    }

    #[test]
    fn docker_ids_must_be_hex_of_known_length() {
        let check = |id: &str| {
            validate(&ActionParams::DockerRestart(DockerRestartParams {
                container: ContainerRef::Id {
                    container_id: id.to_string(),
                },
            }))
        };
        check("abcdef012345").unwrap();
        check(&"0123456789abcdef".repeat(4)).unwrap();
        assert!(check("abcdef01234").is_err());
        assert!(check("ghijkl012345").is_err());
    }

    #[test]
    fn ssh_rejects_port_zero_and_empty_auth() {
        let base = SshCopyParams {
            host: "web1".to_string(),
            port: 0,
            username: "deploy".to_string(),
            source: CopySource::Cert,
            destination: "/etc/ssl/site.crt".to_string(),
            auth: SshAuth::Password {
                password: "pw".to_string(),
            },
            permissions: None,
            command: None,
            verbose: None,
        };
        let err = validate(&ActionParams::SshCopy(base.clone())).unwrap_err();
        assert_eq!(err.field, "port");

        let empty_auth = SshCopyParams {
            port: 22,
            auth: SshAuth::Password {
                password: String::new(),
            },
            ..base
        };
        let err = validate(&ActionParams::SshCopy(empty_auth)).unwrap_err();
        assert_eq!(err.field, "password");
    }

    #[test]
    fn smb_domain_needs_a_username() {
        let err = validate(&ActionParams::SmbCopy(SmbCopyParams {
            host: "nas".to_string(),
            share: "certs".to_string(),
            source: CopySource::Cert,
            destination: "/site.crt".to_string(),
            username: None,
            password: None,
            domain: Some("WORKGROUP".to_string()),
            verbose: None,
        }))
        .unwrap_err();
        assert_eq!(err.field, "domain");
    }

    #[test]
    fn api_call_body_only_on_body_bearing_methods() {
        let err = validate(&ActionParams::ApiCall(ApiCallParams {
            url: "https://api.example.com/x".to_string(),
            method: HttpMethod::Get,
            content_type: None,
            body: Some("{}".to_string()),
            headers: None,
            auth: None,
        }))
        .unwrap_err();
        assert_eq!(err.field, "body");
    }

    #[test]
    fn email_shape_check_matches_the_pattern() {
        assert!(is_email_shaped("ops@example.com"));
        assert!(is_email_shaped("a.b+c@sub.example.co"));
        for bad in ["", "ops", "ops@", "@example.com", "ops@example", "o ps@example.com", "ops@@example.com"] {
            assert!(!is_email_shaped(bad), "accepted {:?}", bad);
        }
    }

    #[test]
    fn npm_api_target_needs_a_certificate() {
        let err = validate(&ActionParams::NginxProxyManager(NginxProxyManagerParams {
            target: NpmTarget::Api {
                npm_url: "https://npm.example.com".to_string(),
                certificate_id: 0,
            },
            restart_services: None,
            verify_update: None,
        }))
        .unwrap_err();
        assert_eq!(err.field, "certificateId");
    }
}
