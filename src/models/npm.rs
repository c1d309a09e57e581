use serde::{Deserialize, Serialize};

/// A certificate as the Nginx Proxy Manager API reports it. Field names are
/// NPM's own (snake_case with `nice_name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpmCertificate {
    pub id: u64,
    #[serde(default)]
    pub nice_name: Option<String>,
    #[serde(default)]
    pub domain_names: Vec<String>,
    #[serde(default)]
    pub expires_on: Option<String>,
}

impl NpmCertificate {
    /// Display name: `nice_name`, else the first domain, else the id.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.nice_name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        if let Some(domain) = self.domain_names.first() {
            return domain.clone();
        }
        format!("#{}", self.id)
    }
}

/// Server-side NPM connection defaults from `GET /api/settings/deployment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpmSettings {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub use_https: bool,
    /// Present only as an indicator; the token itself stays server-side.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl NpmSettings {
    /// Derive a base URL from the stored host settings, when one is set.
    pub fn derived_url(&self) -> Option<String> {
        let host = self.host.as_deref().filter(|h| !h.is_empty())?;
        let scheme = if self.use_https { "https" } else { "http" };
        Some(match self.port {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_the_first_domain() {
        let named = NpmCertificate {
            id: 1,
            nice_name: Some("Main site".to_string()),
            domain_names: vec!["example.com".to_string()],
            expires_on: None,
        };
        assert_eq!(named.display_name(), "Main site");

        let unnamed = NpmCertificate {
            id: 2,
            nice_name: None,
            domain_names: vec!["example.org".to_string()],
            expires_on: None,
        };
        assert_eq!(unnamed.display_name(), "example.org");

        let bare = NpmCertificate {
            id: 3,
            nice_name: Some(String::new()),
            domain_names: vec![],
            expires_on: None,
        };
        assert_eq!(bare.display_name(), "#3");
    }

    #[test]
    fn derived_url_respects_scheme_and_port() {
        let settings = NpmSettings {
            host: Some("npm.internal".to_string()),
            port: Some(81),
            use_https: false,
            access_token: None,
        };
        assert_eq!(settings.derived_url().unwrap(), "http://npm.internal:81");

        let https = NpmSettings {
            host: Some("npm.internal".to_string()),
            port: None,
            use_https: true,
            access_token: None,
        };
        assert_eq!(https.derived_url().unwrap(), "https://npm.internal");

        assert!(NpmSettings::default().derived_url().is_none());
    }
}
