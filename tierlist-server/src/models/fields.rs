//! Validated request field newtypes.
//!
//! Handlers construct these before touching the database, so repos only
//! ever see well-formed values.

use tierlist_core::email::is_valid_email;

use super::ValidationError;

/// Maximum length for tier list titles
const MAX_TITLE_LEN: usize = 120;

/// Maximum length for a single tag
const MAX_TAG_LEN: usize = 30;

/// Maximum tags per tier list
pub const MAX_TAGS_PER_LIST: usize = 5;

/// Maximum length for comment bodies
const MAX_COMMENT_LEN: usize = 1000;

/// Validated tier list title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierListTitle(String);

impl TierListTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated tag name.
///
/// Tags are free-form labels; the leading `#` users tend to type is
/// stripped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim().trim_start_matches('#').trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "tag" });
        }
        if trimmed.chars().count() > MAX_TAG_LEN {
            return Err(ValidationError::TooLong {
                field: "tag",
                max: MAX_TAG_LEN,
            });
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidFormat {
                field: "tag",
                reason: "tags cannot contain whitespace",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Validate a whole tag set, deduplicating and capping at five.
    pub fn parse_set(raw: &[String]) -> Result<Vec<TagName>, ValidationError> {
        let mut tags: Vec<TagName> = Vec::new();
        for s in raw {
            let tag = TagName::new(s)?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.len() > MAX_TAGS_PER_LIST {
            return Err(ValidationError::TooMany {
                field: "tags",
                max: MAX_TAGS_PER_LIST,
            });
        }
        Ok(tags)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated comment body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }
        if trimmed.chars().count() > MAX_COMMENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_COMMENT_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated email address (inquiry form)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if !is_valid_email(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "not a valid email address",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_trims_and_accepts() {
        let t = TierListTitle::new("  最強アニメランキング  ").unwrap();
        assert_eq!(t.as_str(), "最強アニメランキング");
    }

    #[test]
    fn title_rejects_empty_and_too_long() {
        assert!(matches!(
            TierListTitle::new("   "),
            Err(ValidationError::Empty { .. })
        ));
        let long = "あ".repeat(121);
        assert!(matches!(
            TierListTitle::new(&long),
            Err(ValidationError::TooLong { max: 120, .. })
        ));
    }

    #[test]
    fn title_length_counts_chars_not_bytes() {
        // 120 multibyte chars are fine even though that's 360 bytes
        let ok = "あ".repeat(120);
        assert!(TierListTitle::new(&ok).is_ok());
    }

    #[test]
    fn tag_strips_leading_hash() {
        assert_eq!(TagName::new("#anime").unwrap().as_str(), "anime");
        assert_eq!(TagName::new("anime").unwrap().as_str(), "anime");
    }

    #[test]
    fn tag_rejects_whitespace() {
        assert!(matches!(
            TagName::new("two words"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn tag_set_dedupes_and_caps_at_five() {
        let raw: Vec<String> = ["a", "b", "#a", "c"].iter().map(|s| s.to_string()).collect();
        let tags = TagName::parse_set(&raw).unwrap();
        assert_eq!(tags.len(), 3);

        let raw: Vec<String> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(matches!(
            TagName::parse_set(&raw),
            Err(ValidationError::TooMany { max: 5, .. })
        ));
    }

    #[test]
    fn comment_body_bounds() {
        assert!(CommentBody::new("looks right to me").is_ok());
        assert!(matches!(
            CommentBody::new(""),
            Err(ValidationError::Empty { .. })
        ));
        let long = "x".repeat(1001);
        assert!(matches!(
            CommentBody::new(&long),
            Err(ValidationError::TooLong { max: 1000, .. })
        ));
    }

    #[test]
    fn email_validation() {
        assert!(EmailAddress::new("user@example.com").is_ok());
        assert!(matches!(
            EmailAddress::new("user@"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            EmailAddress::new(""),
            Err(ValidationError::Empty { .. })
        ));
    }
}
