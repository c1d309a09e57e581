use crate::models::NpmCertificate;

/// Authentication/connection state against one Nginx Proxy Manager instance.
///
/// A single value holds the whole session; there is no way to be "connected"
/// and "token invalid" at the same time. Result transitions check the state
/// they settle from, so a stale completion after a reset is dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NpmSession {
    #[default]
    Idle,
    Probing,
    Unreachable(String),
    Reachable,
    TokenValid {
        user: Option<String>,
    },
    TokenInvalid,
    RequestingToken,
    Certificates(Vec<NpmCertificate>),
}

impl NpmSession {
    /// A probe or token request is in flight; new triggers are ignored.
    pub fn is_pending(&self) -> bool {
        matches!(self, NpmSession::Probing | NpmSession::RequestingToken)
    }

    /// Start a connectivity probe. Refused while another transition is
    /// pending.
    pub fn begin_probe(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = NpmSession::Probing;
        true
    }

    pub fn probe_succeeded(&mut self) -> bool {
        if *self != NpmSession::Probing {
            return false;
        }
        *self = NpmSession::Reachable;
        true
    }

    pub fn probe_failed(&mut self, message: impl Into<String>) -> bool {
        if *self != NpmSession::Probing {
            return false;
        }
        *self = NpmSession::Unreachable(message.into());
        true
    }

    pub fn token_valid(&mut self, user: Option<String>) -> bool {
        if !matches!(self, NpmSession::Reachable | NpmSession::RequestingToken) {
            return false;
        }
        *self = NpmSession::TokenValid { user };
        true
    }

    pub fn token_invalid(&mut self) -> bool {
        if !matches!(self, NpmSession::Reachable | NpmSession::RequestingToken) {
            return false;
        }
        *self = NpmSession::TokenInvalid;
        true
    }

    /// Begin exchanging operator credentials for a token. Only offered once
    /// the stored token proved invalid.
    pub fn begin_token_request(&mut self) -> bool {
        if *self != NpmSession::TokenInvalid {
            return false;
        }
        *self = NpmSession::RequestingToken;
        true
    }

    /// A certificate listing settled; sorted by display name before storing.
    pub fn certificates_loaded(&mut self, mut certificates: Vec<NpmCertificate>) -> bool {
        if !matches!(self, NpmSession::TokenValid { .. }) {
            return false;
        }
        certificates.sort_by_key(|c| c.display_name().to_lowercase());
        *self = NpmSession::Certificates(certificates);
        true
    }

    pub fn reset(&mut self) {
        *self = NpmSession::Idle;
    }

    pub fn certificates(&self) -> Option<&[NpmCertificate]> {
        match self {
            NpmSession::Certificates(list) => Some(list),
            _ => None,
        }
    }

    /// Short status text for the form's NPM panel.
    pub fn status_line(&self) -> String {
        match self {
            NpmSession::Idle => "Not connected - press t to test the connection".to_string(),
            NpmSession::Probing => "Checking connection...".to_string(),
            NpmSession::Unreachable(message) => format!("Unreachable: {}", message),
            NpmSession::Reachable => "Reachable - validating token...".to_string(),
            NpmSession::TokenValid { user } => match user {
                Some(user) => format!("Connected as {}", user),
                None => "Connected".to_string(),
            },
            NpmSession::TokenInvalid => {
                "Token invalid - press r to request a new token".to_string()
            }
            NpmSession::RequestingToken => "Requesting token...".to_string(),
            NpmSession::Certificates(list) => {
                format!("Connected - {} certificates", list.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(id: u64, name: &str) -> NpmCertificate {
        NpmCertificate {
            id,
            nice_name: Some(name.to_string()),
            domain_names: vec![],
            expires_on: None,
        }
    }

    #[test]
    fn happy_path_reaches_certificates() {
        let mut session = NpmSession::default();
        assert!(session.begin_probe());
        assert!(session.probe_succeeded());
        assert!(session.token_valid(Some("admin@example.com".to_string())));
        assert!(session.certificates_loaded(vec![cert(1, "a")]));
        assert!(matches!(session, NpmSession::Certificates(_)));
    }

    #[test]
    fn invalid_token_path_goes_through_request() {
        let mut session = NpmSession::default();
        session.begin_probe();
        session.probe_succeeded();
        assert!(session.token_invalid());
        assert!(session.begin_token_request());
        // A failed exchange lands back on TokenInvalid.
        assert!(session.token_invalid());
        assert_eq!(session, NpmSession::TokenInvalid);
        // A successful retry proceeds to TokenValid.
        assert!(session.begin_token_request());
        assert!(session.token_valid(None));
    }

    #[test]
    fn triggers_are_ignored_while_pending() {
        let mut session = NpmSession::default();
        assert!(session.begin_probe());
        assert!(!session.begin_probe());
        assert_eq!(session, NpmSession::Probing);

        session.probe_succeeded();
        session.token_invalid();
        session.begin_token_request();
        assert!(!session.begin_probe());
        assert_eq!(session, NpmSession::RequestingToken);
    }

    #[test]
    fn stale_results_after_reset_are_dropped() {
        let mut session = NpmSession::default();
        session.begin_probe();
        session.reset();
        assert!(!session.probe_succeeded());
        assert_eq!(session, NpmSession::Idle);
    }

    #[test]
    fn certificates_sort_case_insensitively_by_display_name() {
        let mut session = NpmSession::default();
        session.begin_probe();
        session.probe_succeeded();
        session.token_valid(None);
        session.certificates_loaded(vec![
            cert(1, "zeta.example.com"),
            cert(2, "Alpha site"),
            NpmCertificate {
                id: 3,
                nice_name: None,
                domain_names: vec!["beta.example.org".to_string()],
                expires_on: None,
            },
        ]);
        let names: Vec<String> = session
            .certificates()
            .unwrap()
            .iter()
            .map(|c| c.display_name())
            .collect();
        assert_eq!(names, vec!["Alpha site", "beta.example.org", "zeta.example.com"]);
    }
}
