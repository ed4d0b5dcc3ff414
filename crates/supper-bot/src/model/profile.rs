use serde::{Deserialize, Serialize};

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PHONE_CHARS: usize = 8;

/// Contact details kept per chat user so returning customers skip registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub handle: String,
    pub phone: String,
}

/// Trimmed name when long enough.
pub fn validate_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    (name.chars().count() >= MIN_NAME_CHARS).then(|| name.to_string())
}

/// Trimmed phone number when long enough.
pub fn validate_phone(raw: &str) -> Option<String> {
    let phone = raw.trim();
    (phone.chars().count() >= MIN_PHONE_CHARS).then(|| phone.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_fields_are_length_checked_after_trim() {
        assert_eq!(validate_name("  Jo "), Some("Jo".to_string()));
        assert_eq!(validate_name(" J "), None);
        assert_eq!(validate_phone(" 9123 4567 "), Some("9123 4567".to_string()));
        assert_eq!(validate_phone("9123456"), None);
    }
}
