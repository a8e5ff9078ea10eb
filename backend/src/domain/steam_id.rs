//! Steam account identifiers.
//!
//! A caller names a Steam user by vanity name (the custom part of
//! `steamcommunity.com/id/<name>`). Steam resolves it into a stable 64-bit
//! [`SteamId`], which every later lookup uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const VANITY_MIN_LEN: usize = 2;
const VANITY_MAX_LEN: usize = 32;

/// Stable numeric handle of a Steam account (SteamID64).
///
/// Serialised as a decimal string because the value exceeds the integer
/// precision of JSON consumers such as JavaScript.
///
/// # Examples
/// ```
/// use workshop_stats::domain::SteamId;
///
/// let id: SteamId = "76561197960287930".parse().expect("numeric id");
/// assert_eq!(id.as_u64(), 76_561_197_960_287_930);
/// assert_eq!(id.to_string(), "76561197960287930");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId(u64);

impl SteamId {
    /// Wrap a raw SteamID64.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid [`SteamId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("steam id must be a positive decimal number, got {raw:?}")]
pub struct SteamIdParseError {
    raw: String,
}

impl FromStr for SteamId {
    type Err = SteamIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<u64>() {
            Ok(raw) if raw > 0 => Ok(Self(raw)),
            _ => Err(SteamIdParseError {
                raw: trimmed.to_owned(),
            }),
        }
    }
}

impl Serialize for SteamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SteamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Validation errors for [`VanityName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VanityNameValidationError {
    /// Name is empty after trimming.
    #[error("vanity name must not be empty")]
    Empty,
    /// Name is shorter or longer than Steam allows.
    #[error("vanity name must be between 2 and 32 characters")]
    Length,
    /// Name contains characters Steam never issues.
    #[error("vanity name may only contain letters, digits, '_' or '-'")]
    InvalidCharacter,
}

/// Validated Steam vanity name.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed.
/// - Length is 2 to 32 characters.
/// - Only ASCII letters, digits, `_` and `-` are allowed.
///
/// # Examples
/// ```
/// use workshop_stats::domain::VanityName;
///
/// let name = VanityName::new(" gabelogannewell ").expect("valid name");
/// assert_eq!(name.as_str(), "gabelogannewell");
/// assert!(VanityName::new("no spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VanityName(String);

impl VanityName {
    /// Validate and wrap a vanity name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, VanityNameValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(VanityNameValidationError::Empty);
        }
        let length = trimmed.chars().count();
        if !(VANITY_MIN_LEN..=VANITY_MAX_LEN).contains(&length) {
            return Err(VanityNameValidationError::Length);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(VanityNameValidationError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for VanityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of resolving a vanity name.
///
/// A handle is present only when resolution succeeded. An unresolved name is
/// a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VanityResolution {
    steam_id: Option<SteamId>,
}

impl VanityResolution {
    /// Resolution succeeded with the given handle.
    #[must_use]
    pub const fn resolved(steam_id: SteamId) -> Self {
        Self {
            steam_id: Some(steam_id),
        }
    }

    /// Steam reported no match for the name.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self { steam_id: None }
    }

    /// Whether Steam matched the name.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.steam_id.is_some()
    }

    /// Resolved handle, if any.
    #[must_use]
    pub const fn steam_id(&self) -> Option<SteamId> {
        self.steam_id
    }
}
