use url::Url;

use super::kind::ActionKind;
use super::model::DeployAction;
use super::values::{to_values, FieldValues};

/// Substring after the last `/`, falling back to the whole path when that
/// would be empty (trailing slash, bare filename).
pub fn basename(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last,
        _ => path,
    }
}

/// Hostname of an absolute URL, or empty when there is none to extract.
pub fn hostname(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Hostname, else the first path segment of a scheme-less or relative URL.
fn hostname_or_first_segment(raw: &str) -> String {
    let host = hostname(raw);
    if !host.is_empty() {
        return host;
    }
    let without_scheme = raw.split_once("://").map(|(_, rest)| rest).unwrap_or(raw);
    without_scheme
        .split('/')
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Generate the display name for the current field values.
///
/// Returns an empty string when the inputs the template needs are missing;
/// callers treat that as "nothing to suggest".
pub fn generate(kind: ActionKind, values: &FieldValues) -> String {
    match kind {
        ActionKind::Copy => {
            let destination = values.get("destination");
            if destination.is_empty() {
                return String::new();
            }
            format!("Copy {} to {}", values.get("source"), basename(destination))
        }
        ActionKind::Command => {
            match values.get("command").split_whitespace().next() {
                Some(token) => format!("Run {}", token),
                None => "Run command".to_string(),
            }
        }
        ActionKind::DockerRestart => {
            let name = values.get("containerName");
            let id = values.get("containerId");
            if !name.is_empty() {
                format!("Restart {}", name)
            } else if !id.is_empty() {
                let short = &id[..id.len().min(12)];
                format!("Restart {}", short)
            } else {
                "Restart Docker container".to_string()
            }
        }
        ActionKind::NginxProxyManager => match values.get("npmTarget") {
            "container" => {
                let container = values.get("dockerContainer");
                if container.is_empty() {
                    return String::new();
                }
                format!("Update NPM container {}", container)
            }
            "api" => {
                let host = hostname(values.get("npmUrl"));
                if host.is_empty() {
                    return String::new();
                }
                format!("Update NPM {}", host)
            }
            _ => {
                let path = values.get("npmPath");
                if path.is_empty() {
                    return String::new();
                }
                format!("Update NPM at {}", basename(path))
            }
        },
        ActionKind::SshCopy => {
            let host = values.get("host");
            let destination = values.get("destination");
            if host.is_empty() || destination.is_empty() {
                return String::new();
            }
            format!(
                "SSH copy {} to {}/{}",
                values.get("source"),
                host,
                basename(destination)
            )
        }
        ActionKind::SmbCopy => {
            let host = values.get("host");
            let share = values.get("share");
            let destination = values.get("destination");
            if host.is_empty() || share.is_empty() || destination.is_empty() {
                return String::new();
            }
            format!(
                "SMB copy {} to {}/{}/{}",
                values.get("source"),
                host,
                share,
                basename(destination)
            )
        }
        ActionKind::FtpCopy => {
            let host = values.get("host");
            let destination = values.get("destination");
            if host.is_empty() || destination.is_empty() {
                return String::new();
            }
            let scheme = if values.flag("secure") { "FTPS" } else { "FTP" };
            format!(
                "{} copy {} to {}/{}",
                scheme,
                values.get("source"),
                host,
                basename(destination)
            )
        }
        ActionKind::ApiCall => {
            let url = values.get("url");
            if url.is_empty() {
                return String::new();
            }
            let target = hostname_or_first_segment(url);
            if target.is_empty() {
                return String::new();
            }
            format!("{} to {}", values.get("method"), target)
        }
        ActionKind::Webhook => {
            let host = hostname(values.get("url"));
            if host.is_empty() {
                return String::new();
            }
            format!("Webhook to {}", host)
        }
        ActionKind::Email => {
            let to = values.get("to");
            if to.is_empty() {
                return String::new();
            }
            format!("Email to {}", to)
        }
    }
}

impl DeployAction {
    /// The name the generator would produce for this action's current fields.
    pub fn generated_name(&self) -> String {
        generate(self.kind(), &to_values(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        let mut v = FieldValues::new();
        for (id, value) in pairs {
            v.set(id, *value);
        }
        v
    }

    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename("/etc/ssl/site.crt"), "site.crt");
        assert_eq!(basename("site.crt"), "site.crt");
        assert_eq!(basename("/etc/ssl/"), "/etc/ssl/");
    }

    #[test]
    fn copy_names_use_the_destination_basename() {
        let v = values(&[("source", "cert"), ("destination", "/etc/ssl/site.crt")]);
        assert_eq!(generate(ActionKind::Copy, &v), "Copy cert to site.crt");
    }

    #[test]
    fn copy_without_destination_generates_nothing() {
        let v = values(&[("source", "cert")]);
        assert_eq!(generate(ActionKind::Copy, &v), "");
    }

    #[test]
    fn command_names_use_the_first_token() {
        let v = values(&[("command", "systemctl reload nginx")]);
        assert_eq!(generate(ActionKind::Command, &v), "Run systemctl");
        assert_eq!(generate(ActionKind::Command, &values(&[])), "Run command");
    }

    #[test]
    fn docker_restart_prefers_the_name() {
        let v = values(&[("containerName", "proxy"), ("containerId", "abcdef012345")]);
        assert_eq!(generate(ActionKind::DockerRestart, &v), "Restart proxy");

        let long_id = "a".repeat(64);
        let v = values(&[("containerId", &long_id)]);
        assert_eq!(
            generate(ActionKind::DockerRestart, &v),
            format!("Restart {}", "a".repeat(12))
        );

        assert_eq!(
            generate(ActionKind::DockerRestart, &values(&[])),
            "Restart Docker container"
        );
    }

    #[test]
    fn npm_names_follow_the_target() {
        let path = values(&[("npmTarget", "path"), ("npmPath", "/opt/npm/data")]);
        assert_eq!(generate(ActionKind::NginxProxyManager, &path), "Update NPM at data");

        let container = values(&[("npmTarget", "container"), ("dockerContainer", "npm-app")]);
        assert_eq!(
            generate(ActionKind::NginxProxyManager, &container),
            "Update NPM container npm-app"
        );

        let api = values(&[("npmTarget", "api"), ("npmUrl", "https://npm.example.com:81")]);
        assert_eq!(
            generate(ActionKind::NginxProxyManager, &api),
            "Update NPM npm.example.com"
        );
    }

    #[test]
    fn remote_copy_names_include_host_and_basename() {
        let ssh = values(&[
            ("source", "cert"),
            ("host", "web1"),
            ("destination", "/etc/ssl/site.crt"),
        ]);
        assert_eq!(generate(ActionKind::SshCopy, &ssh), "SSH copy cert to web1/site.crt");

        let smb = values(&[
            ("source", "fullchain"),
            ("host", "nas"),
            ("share", "certs"),
            ("destination", "/live/site.pem"),
        ]);
        assert_eq!(
            generate(ActionKind::SmbCopy, &smb),
            "SMB copy fullchain to nas/certs/site.pem"
        );
    }

    #[test]
    fn ftp_names_mark_secure_transfers() {
        let mut v = values(&[
            ("source", "cert"),
            ("host", "ftp.example.com"),
            ("destination", "/site.crt"),
        ]);
        assert_eq!(
            generate(ActionKind::FtpCopy, &v),
            "FTP copy cert to ftp.example.com/site.crt"
        );
        v.set_flag("secure", true);
        assert_eq!(
            generate(ActionKind::FtpCopy, &v),
            "FTPS copy cert to ftp.example.com/site.crt"
        );
    }

    #[test]
    fn api_call_names_fall_back_to_the_first_path_segment() {
        let v = values(&[("method", "POST"), ("url", "https://hooks.example.com/deploy")]);
        assert_eq!(generate(ActionKind::ApiCall, &v), "POST to hooks.example.com");

        let bare = values(&[("method", "GET"), ("url", "internal-api/v1/status")]);
        assert_eq!(generate(ActionKind::ApiCall, &bare), "GET to internal-api");
    }

    #[test]
    fn webhook_names_require_a_hostname() {
        let v = values(&[("url", "https://hooks.example.com/x")]);
        assert_eq!(generate(ActionKind::Webhook, &v), "Webhook to hooks.example.com");
        assert_eq!(generate(ActionKind::Webhook, &values(&[("url", "nope")])), "");
    }

    #[test]
    fn email_names_use_the_recipient() {
        let v = values(&[("to", "ops@example.com")]);
        assert_eq!(generate(ActionKind::Email, &v), "Email to ops@example.com");
    }

    #[test]
    fn valid_samples_always_generate_a_name() {
        for action in crate::actions::samples::one_of_each() {
            crate::actions::validate::validate(&action.params).unwrap();
            assert!(
                !action.generated_name().is_empty(),
                "empty name for {}",
                action.kind()
            );
        }
    }
}
