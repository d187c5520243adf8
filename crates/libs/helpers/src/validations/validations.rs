// An extension trait to provide the `graphemes` method on `String` and `&str`
use unicode_segmentation::UnicodeSegmentation;
use errors::CustomError;

/// A game identifier as submitted by a caller: either a catalog ID or a slug.
///
/// The value ends up in a catalog URL path, so path and query delimiters are
/// rejected here rather than escaped later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameIdentifier(String);

impl GameIdentifier {
    pub fn parse(s: String) -> std::result::Result<GameIdentifier, CustomError> {
        let trimmed = s.trim();
        let is_empty_or_whitespace = trimmed.is_empty();
        let is_too_long = trimmed.graphemes(true).count() > 256;
        let forbidden_characters = ['/', '?', '#', '&', '%', '\\', '"', '<', '>'];
        let contains_forbidden_characters = trimmed.chars().any(|c| forbidden_characters.contains(&c));

        if is_empty_or_whitespace {
            Err(CustomError::ValidationError("gameId is required".to_string()))
        } else if is_too_long || contains_forbidden_characters {
            Err(CustomError::ValidationError(format!("{} is not a valid game identifier", s)))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// True when the identifier consists of decimal digits only.
    pub fn is_numeric(&self) -> bool {
        self.0.chars().all(|c| c.is_ascii_digit())
    }
}

impl AsRef<str> for GameIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewScore(i32);

impl ReviewScore {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 10;

    pub fn parse(score: i32) -> std::result::Result<ReviewScore, CustomError> {
        if (Self::MIN..=Self::MAX).contains(&score) {
            Ok(Self(score))
        } else {
            Err(CustomError::ValidationError(format!(
                "reviewScore must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                score
            )))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}
