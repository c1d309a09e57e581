use super::model::{ActionParams, ContainerRef, NpmTarget};

/// One-line summary shown under the action name in the list view.
pub fn describe(params: &ActionParams) -> String {
    match params {
        ActionParams::Copy(p) => {
            let mut text = format!("Copy {} to {}", p.source, p.destination);
            if let Some(perms) = &p.permissions {
                text.push_str(&format!(" (mode {})", perms));
            }
            text
        }
        ActionParams::Command(p) => match &p.cwd {
            Some(cwd) if !cwd.is_empty() => format!("Run `{}` in {}", p.command, cwd),
            _ => format!("Run `{}`", p.command),
        },
        ActionParams::DockerRestart(p) => match &p.container {
            ContainerRef::Id { container_id } => {
                let short = &container_id[..container_id.len().min(12)];
                format!("Restart container {}", short)
            }
            ContainerRef::Name { container_name } => {
                format!("Restart container {}", container_name)
            }
        },
        ActionParams::NginxProxyManager(p) => match &p.target {
            NpmTarget::Path { npm_path } => {
                format!("Update NPM data directory {}", npm_path)
            }
            NpmTarget::Container { docker_container } => {
                format!("Update NPM in container {}", docker_container)
            }
            NpmTarget::Api {
                npm_url,
                certificate_id,
            } => format!("Update NPM certificate #{} via {}", certificate_id, npm_url),
        },
        ActionParams::SshCopy(p) => format!(
            "SSH copy {} to {}@{}:{}{}",
            p.source, p.username, p.host, p.port, p.destination
        ),
        ActionParams::SmbCopy(p) => format!(
            "SMB copy {} to //{}/{}{}",
            p.source, p.host, p.share, p.destination
        ),
        ActionParams::FtpCopy(p) => {
            let scheme = if p.secure { "FTPS" } else { "FTP" };
            format!("{} copy {} to {}:{}{}", scheme, p.source, p.host, p.port, p.destination)
        }
        ActionParams::ApiCall(p) => format!("{} {}", p.method, p.url),
        ActionParams::Webhook(p) => format!("{} webhook to {}", p.method, p.url),
        ActionParams::Email(p) => format!("Email {} ({})", p.to, p.subject),
    }
}
