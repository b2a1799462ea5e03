//! Field validators for funnel inputs
//!
//! All validators are pure `&str -> bool` checks; they never panic and never
//! mutate anything. A failing validation keeps the visitor on the current
//! step with an inline error, it is not an error condition for the machine.

use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Maximum accepted email length (RFC 5321 limit)
const MAX_EMAIL_LEN: usize = 254;

/// Maximum accepted logo upload size in bytes
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Which validation rule a step applies to its raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    /// Any string, including empty
    Text,
    Email,
    Phone,
    Url,
    /// Color values come from a color input; no semantic validation
    Color,
}

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").unwrap())
}

/// Validate a raw input value against a rule
pub fn validate(kind: ValidatorKind, raw: &str) -> bool {
    match kind {
        ValidatorKind::Text | ValidatorKind::Color => true,
        ValidatorKind::Email => validate_email(raw),
        ValidatorKind::Phone => validate_phone(raw),
        ValidatorKind::Url => validate_url(raw),
    }
}

/// Email with a TLD of at least 2 characters, capped at 254 chars
fn validate_email(value: &str) -> bool {
    value.len() <= MAX_EMAIL_LEN && email_pattern().is_match(value)
}

/// Brazilian phone: 10-11 digits, real DDD, not a repeated-digit spam number
fn validate_phone(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 || digits.len() > 11 {
        return false;
    }
    // Reject repeated digits like 11111111111
    let first = digits.as_bytes()[0];
    if digits.bytes().all(|b| b == first) {
        return false;
    }
    // DDD range 11-99
    match digits[..2].parse::<u32>() {
        Ok(ddd) => (11..=99).contains(&ddd),
        Err(_) => false,
    }
}

/// URL that parses (with an implied https:// scheme) and has a dotted host
fn validate_url(value: &str) -> bool {
    let candidate = if value.starts_with("http") {
        value.to_string()
    } else {
        format!("https://{}", value)
    };
    match Url::parse(&candidate) {
        Ok(url) => url.host_str().map(|h| h.contains('.')).unwrap_or(false),
        Err(_) => false,
    }
}

/// Validate an uploaded logo: image MIME type (by filename) and size cap
pub fn validate_logo_file(file_name: &str, byte_len: usize) -> bool {
    if byte_len > MAX_LOGO_BYTES {
        return false;
    }
    mime_guess::from_path(file_name)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}

/// Validate a base64 logo payload against the decoded size cap.
/// Data URL prefixes (`data:image/png;base64,`) are accepted.
pub fn validate_logo_payload(file_name: &str, payload: &str) -> bool {
    let data = payload.rsplit(',').next().unwrap_or(payload);
    match base64::engine::general_purpose::STANDARD.decode(data) {
        Ok(bytes) => validate_logo_file(file_name, bytes.len()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_accepts_valid() {
        assert!(validate(ValidatorKind::Email, "a@b.co"));
        assert!(validate(ValidatorKind::Email, "maria.silva@empresa.com.br"));
    }

    #[test]
    fn test_email_rejects_invalid() {
        assert!(!validate(ValidatorKind::Email, "a@b"));
        assert!(!validate(ValidatorKind::Email, "no-at-sign.com"));
        assert!(!validate(ValidatorKind::Email, "a @b.co"));
        assert!(!validate(ValidatorKind::Email, ""));
    }

    #[test]
    fn test_email_rejects_overlong() {
        let local = "a".repeat(250);
        assert!(!validate(ValidatorKind::Email, &format!("{}@b.co", local)));
    }

    #[test]
    fn test_phone_accepts_valid() {
        assert!(validate(ValidatorKind::Phone, "11987654321"));
        assert!(validate(ValidatorKind::Phone, "(47) 3456-7890"));
    }

    #[test]
    fn test_phone_rejects_too_short_or_long() {
        assert!(!validate(ValidatorKind::Phone, "123"));
        assert!(!validate(ValidatorKind::Phone, "119876543210000"));
    }

    #[test]
    fn test_phone_rejects_repeated_digits() {
        assert!(!validate(ValidatorKind::Phone, "11111111111"));
        assert!(!validate(ValidatorKind::Phone, "2222222222"));
    }

    #[test]
    fn test_phone_rejects_invalid_ddd() {
        assert!(!validate(ValidatorKind::Phone, "0198765432"));
        assert!(!validate(ValidatorKind::Phone, "1098765432"));
    }

    #[test]
    fn test_url_accepts_with_and_without_scheme() {
        assert!(validate(ValidatorKind::Url, "https://example.com"));
        assert!(validate(ValidatorKind::Url, "www.exemplo.com.br"));
        assert!(validate(ValidatorKind::Url, "exemplo.com/pagina"));
    }

    #[test]
    fn test_url_rejects_malformed() {
        assert!(!validate(ValidatorKind::Url, "not a url"));
        assert!(!validate(ValidatorKind::Url, "localhost"));
        assert!(!validate(ValidatorKind::Url, ""));
    }

    #[test]
    fn test_text_and_color_accept_anything() {
        assert!(validate(ValidatorKind::Text, ""));
        assert!(validate(ValidatorKind::Text, "qualquer coisa"));
        assert!(validate(ValidatorKind::Color, "#ff0000"));
        assert!(validate(ValidatorKind::Color, "rebeccapurple"));
    }

    #[test]
    fn test_logo_file_accepts_images_under_cap() {
        assert!(validate_logo_file("logo.png", 1024));
        assert!(validate_logo_file("marca.jpg", 4 * 1024 * 1024));
        assert!(validate_logo_file("logo.svg", 2048));
    }

    #[test]
    fn test_logo_file_rejects_non_images_and_oversized() {
        assert!(!validate_logo_file("documento.pdf", 1024));
        assert!(!validate_logo_file("script.exe", 10));
        assert!(!validate_logo_file("logo.png", MAX_LOGO_BYTES + 1));
    }

    #[test]
    fn test_logo_payload_decodes_base64() {
        assert!(validate_logo_payload("logo.png", "aGVsbG8="));
        assert!(validate_logo_payload(
            "logo.png",
            "data:image/png;base64,aGVsbG8="
        ));
        assert!(!validate_logo_payload("logo.png", "not base64!!!"));
        assert!(!validate_logo_payload("documento.pdf", "aGVsbG8="));
    }
}
