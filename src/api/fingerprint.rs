use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// The characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Normalise a certificate fingerprint into a URL path segment.
///
/// Fingerprints sometimes arrive prefixed as `sha256 Fingerprint=AB:CD:…`;
/// everything up to and including the first `=` is dropped and the remainder
/// trimmed before encoding. Inputs without `=` are encoded as-is.
pub fn encode_fingerprint(raw: &str) -> String {
    let stripped = match raw.split_once('=') {
        Some((_, rest)) => rest.trim(),
        None => raw,
    };
    utf8_percent_encode(stripped, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_hex_passes_through() {
        assert_eq!(encode_fingerprint("abc123"), "abc123");
    }

    #[test]
    fn colon_separated_digests_are_escaped() {
        assert_eq!(encode_fingerprint("AB:CD:EF"), "AB%3ACD%3AEF");
    }

    #[test]
    fn prefix_up_to_the_first_equals_is_stripped_and_trimmed() {
        assert_eq!(
            encode_fingerprint("sha256 Fingerprint= AB:CD:EF "),
            "AB%3ACD%3AEF"
        );
        // Only the first '=' splits; later ones are encoded.
        assert_eq!(encode_fingerprint("a=b=c"), "b%3Dc");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(encode_fingerprint(""), "");
    }

    #[test]
    fn unreserved_component_characters_survive() {
        assert_eq!(encode_fingerprint("A-b_c.d!e~f*g'h(i)j"), "A-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_fingerprint("a b+c/d"), "a%20b%2Bc%2Fd");
    }
}
