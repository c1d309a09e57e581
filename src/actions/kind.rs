use serde::{Deserialize, Serialize};

/// Discriminant selecting which field set applies to a deployment action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Copy,
    Command,
    DockerRestart,
    NginxProxyManager,
    SshCopy,
    SmbCopy,
    FtpCopy,
    ApiCall,
    Webhook,
    Email,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::Copy,
        ActionKind::Command,
        ActionKind::DockerRestart,
        ActionKind::NginxProxyManager,
        ActionKind::SshCopy,
        ActionKind::SmbCopy,
        ActionKind::FtpCopy,
        ActionKind::ApiCall,
        ActionKind::Webhook,
        ActionKind::Email,
    ];

    /// Wire discriminant, also used as the badge in the list view.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Copy => "copy",
            ActionKind::Command => "command",
            ActionKind::DockerRestart => "docker-restart",
            ActionKind::NginxProxyManager => "nginx-proxy-manager",
            ActionKind::SshCopy => "ssh-copy",
            ActionKind::SmbCopy => "smb-copy",
            ActionKind::FtpCopy => "ftp-copy",
            ActionKind::ApiCall => "api-call",
            ActionKind::Webhook => "webhook",
            ActionKind::Email => "email",
        }
    }

    /// Human label shown in the kind selector.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Copy => "Copy file",
            ActionKind::Command => "Run command",
            ActionKind::DockerRestart => "Restart Docker container",
            ActionKind::NginxProxyManager => "Update Nginx Proxy Manager",
            ActionKind::SshCopy => "Copy over SSH",
            ActionKind::SmbCopy => "Copy to SMB share",
            ActionKind::FtpCopy => "Copy over FTP",
            ActionKind::ApiCall => "Call an API",
            ActionKind::Webhook => "Send a webhook",
            ActionKind::Email => "Send an email",
        }
    }

    pub fn next(&self) -> ActionKind {
        let idx = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> ActionKind {
        let idx = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown action kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn cycle_covers_all_kinds() {
        let mut kind = ActionKind::Copy;
        for _ in 0..ActionKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, ActionKind::Copy);
        assert_eq!(ActionKind::Copy.previous(), ActionKind::Email);
    }
}
