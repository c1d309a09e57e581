use std::collections::BTreeMap;

use super::model::{
    ActionParams, ContainerRef, DeployAction, NpmTarget, SshAuth,
};

/// Flat string view of an action's fields, keyed by schema field id.
///
/// The form edits these values; the name generator reads them; `to_values`
/// seeds them from a saved action when the editor opens in edit mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    values: BTreeMap<String, String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, id: &str, value: impl Into<String>) {
        self.values.insert(id.to_string(), value.into());
    }

    pub fn clear(&mut self, id: &str) {
        self.values.remove(id);
    }

    pub fn is_set(&self, id: &str) -> bool {
        !self.get(id).is_empty()
    }

    pub fn flag(&self, id: &str) -> bool {
        self.get(id) == "true"
    }

    pub fn set_flag(&mut self, id: &str, on: bool) {
        self.set(id, if on { "true" } else { "false" });
    }
}

/// Seed field values from a saved action for the edit form.
pub fn to_values(action: &DeployAction) -> FieldValues {
    let mut v = FieldValues::new();

    match &action.params {
        ActionParams::Copy(p) => {
            v.set("source", p.source.as_str());
            v.set("destination", &p.destination);
            if let Some(perms) = &p.permissions {
                v.set("permissions", perms);
            }
        }
        ActionParams::Command(p) => {
            v.set("command", &p.command);
            if let Some(cwd) = &p.cwd {
                v.set("cwd", cwd);
            }
            if let Some(verbose) = p.verbose {
                v.set_flag("verbose", verbose);
            }
        }
        ActionParams::DockerRestart(p) => match &p.container {
            ContainerRef::Id { container_id } => {
                v.set("containerChoice", "id");
                v.set("containerId", container_id);
            }
            ContainerRef::Name { container_name } => {
                v.set("containerChoice", "name");
                v.set("containerName", container_name);
            }
        },
        ActionParams::NginxProxyManager(p) => {
            match &p.target {
                NpmTarget::Path { npm_path } => {
                    v.set("npmTarget", "path");
                    v.set("npmPath", npm_path);
                }
                NpmTarget::Container { docker_container } => {
                    v.set("npmTarget", "container");
                    v.set("dockerContainer", docker_container);
                }
                NpmTarget::Api {
                    npm_url,
                    certificate_id,
                } => {
                    v.set("npmTarget", "api");
                    v.set("npmUrl", npm_url);
                    v.set("certificateId", certificate_id.to_string());
                }
            }
            if let Some(restart) = p.restart_services {
                v.set_flag("restartServices", restart);
            }
            if let Some(verify) = p.verify_update {
                v.set_flag("verifyUpdate", verify);
            }
        }
        ActionParams::SshCopy(p) => {
            v.set("host", &p.host);
            v.set("port", p.port.to_string());
            v.set("username", &p.username);
            v.set("source", p.source.as_str());
            v.set("destination", &p.destination);
            match &p.auth {
                SshAuth::Password { password } => {
                    v.set("authMethod", "password");
                    v.set("password", password);
                }
                SshAuth::PrivateKey {
                    private_key,
                    passphrase,
                } => {
                    v.set("authMethod", "privateKey");
                    v.set("privateKey", private_key);
                    if let Some(phrase) = passphrase {
                        v.set("passphrase", phrase);
                    }
                }
            }
            if let Some(perms) = &p.permissions {
                v.set("permissions", perms);
            }
            if let Some(command) = &p.command {
                v.set("command", command);
            }
            if let Some(verbose) = p.verbose {
                v.set_flag("verbose", verbose);
            }
        }
        ActionParams::SmbCopy(p) => {
            v.set("host", &p.host);
            v.set("share", &p.share);
            v.set("source", p.source.as_str());
            v.set("destination", &p.destination);
            if let Some(username) = &p.username {
                v.set("username", username);
            }
            if let Some(password) = &p.password {
                v.set("password", password);
            }
            if let Some(domain) = &p.domain {
                v.set("domain", domain);
            }
            if let Some(verbose) = p.verbose {
                v.set_flag("verbose", verbose);
            }
        }
        ActionParams::FtpCopy(p) => {
            v.set("host", &p.host);
            v.set("port", p.port.to_string());
            v.set("source", p.source.as_str());
            v.set("destination", &p.destination);
            if let Some(username) = &p.username {
                v.set("username", username);
            }
            if let Some(password) = &p.password {
                v.set("password", password);
            }
            v.set_flag("secure", p.secure);
        }
        ActionParams::ApiCall(p) => {
            v.set("url", &p.url);
            v.set("method", p.method.as_str());
            if let Some(content_type) = &p.content_type {
                v.set("contentType", content_type);
            }
            if let Some(body) = &p.body {
                v.set("body", body);
            }
            if let Some(headers) = &p.headers {
                v.set(
                    "headers",
                    serde_json::to_string(headers).unwrap_or_default(),
                );
            }
            if let Some(auth) = &p.auth {
                v.set("username", &auth.username);
                v.set("password", &auth.password);
            }
        }
        ActionParams::Webhook(p) => {
            v.set("url", &p.url);
            v.set("method", p.method.as_str());
            if let Some(content_type) = &p.content_type {
                v.set("contentType", content_type);
            }
            if let Some(payload) = &p.payload {
                v.set(
                    "payload",
                    serde_json::to_string(payload).unwrap_or_default(),
                );
            }
        }
        ActionParams::Email(p) => {
            v.set("to", &p.to);
            v.set("subject", &p.subject);
            v.set("body", &p.body);
            if let Some(attach) = p.attach_cert {
                v.set_flag("attachCert", attach);
            }
        }
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::model::{CopyParams, CopySource};

    #[test]
    fn copy_action_seeds_its_fields() {
        let action = DeployAction {
            name: "Copy cert to site.crt".to_string(),
            enabled: true,
            params: ActionParams::Copy(CopyParams {
                source: CopySource::Cert,
                destination: "/etc/ssl/site.crt".to_string(),
                permissions: Some("0644".to_string()),
            }),
        };

        let v = to_values(&action);
        assert_eq!(v.get("source"), "cert");
        assert_eq!(v.get("destination"), "/etc/ssl/site.crt");
        assert_eq!(v.get("permissions"), "0644");
        assert_eq!(v.get("missing"), "");
    }

    #[test]
    fn choice_fields_reflect_the_active_variant() {
        for action in crate::actions::samples::one_of_each() {
            let v = to_values(&action);
            match action.params {
                ActionParams::DockerRestart(_) => assert!(v.is_set("containerChoice")),
                ActionParams::SshCopy(_) => assert!(v.is_set("authMethod")),
                ActionParams::NginxProxyManager(_) => assert!(v.is_set("npmTarget")),
                _ => {}
            }
        }
    }
}
