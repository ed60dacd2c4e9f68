//! Domain model for a child profile.
use chrono::{DateTime, NaiveDate, Utc};
use shared::Gender;
use uuid::Uuid;

pub const DEFAULT_CHILD_COLOR: &str = "#8B5CF6";

#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub id: String,
    /// Owning user account; every read and write is scoped by it
    pub user_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub avatar_url: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Child {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// True for `#RRGGBB` strings
pub fn is_valid_hex_color(color: &str) -> bool {
    let bytes = color.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_validation() {
        assert!(is_valid_hex_color("#8B5CF6"));
        assert!(is_valid_hex_color("#abcdef"));
        assert!(is_valid_hex_color(DEFAULT_CHILD_COLOR));

        assert!(!is_valid_hex_color("8B5CF6"));
        assert!(!is_valid_hex_color("#8B5CF"));
        assert!(!is_valid_hex_color("#8B5CF6A"));
        assert!(!is_valid_hex_color("#GGGGGG"));
        assert!(!is_valid_hex_color(""));
    }
}
