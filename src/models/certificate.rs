use serde::{Deserialize, Serialize};

/// The certificate whose deployment actions are being edited.
///
/// The certificate list and detail views live elsewhere; the editor only
/// needs the fingerprint (possibly still carrying the `sha256 Fingerprint=`
/// prefix) and a label for the header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRef {
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CertificateRef {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            display_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Label for the header: the display name, else a shortened fingerprint.
    pub fn label(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        let fp = &self.fingerprint;
        if fp.len() > 16 {
            format!("{}…", &fp[..16])
        } else {
            fp.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_the_display_name() {
        let cert = CertificateRef::new("aabbccdd").with_name("example.com");
        assert_eq!(cert.label(), "example.com");
    }

    #[test]
    fn label_shortens_long_fingerprints() {
        let cert = CertificateRef::new("0123456789abcdef0123456789abcdef");
        assert_eq!(cert.label(), "0123456789abcdef…");
    }
}
