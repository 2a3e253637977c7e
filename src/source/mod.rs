//! Card profile sources.
//!
//! A source turns some external description of card types into an ordered
//! list of validated [`CardProfile`]s. Every record goes through
//! [`CardProfileBuilder::build`](crate::CardProfileBuilder::build), so a
//! source never hands out a profile that breaks a constraint.
//!
//! # Features
//!
//! - `json` - [`JsonSource`], loading [`ProfileSchema`] records from JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use cc_cardtype::source::JsonSource;
//! use cc_cardtype::Resolver;
//!
//! let resolver = Resolver::new().with_source(&JsonSource::new("cards.json"))?;
//! ```

#[cfg(feature = "json")]
mod json;

#[cfg(feature = "json")]
pub use json::JsonSource;

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::catalog::default_profiles;
use crate::error::{ConstraintError, ResolveError};
use crate::profile::{CardProfile, RawSize, SizeValue, CREDIT_CARD};
use crate::resolve::Resolver;

/// Something that produces card profiles.
pub trait ProfileSource {
    /// Loads the profiles, in resolution order.
    fn load(&self) -> Result<Vec<CardProfile>, SourceError>;
}

/// The built-in catalogue as a source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSource;

impl ProfileSource for DefaultSource {
    fn load(&self) -> Result<Vec<CardProfile>, SourceError> {
        Ok(default_profiles().to_vec())
    }
}

impl ProfileSource for [CardProfile] {
    fn load(&self) -> Result<Vec<CardProfile>, SourceError> {
        ensure_unique(self)?;
        Ok(self.to_vec())
    }
}

impl ProfileSource for Vec<CardProfile> {
    fn load(&self) -> Result<Vec<CardProfile>, SourceError> {
        self.as_slice().load()
    }
}

/// One card type as written in a profile file.
///
/// ```json
/// {
///   "type": "Debit Card",
///   "checkLuhn": true,
///   "name": "Napas",
///   "alias": "napas",
///   "breakpoint": [4, 8, 12],
///   "code": ["CVC", 3],
///   "length": [16, 19],
///   "idRange": ["9704"]
/// }
/// ```
///
/// `type` defaults to "Credit Card" and `checkLuhn` to `true`. Sizes may be
/// integers or digit strings; ranges are two-element arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
pub struct ProfileSchema {
    /// Card type label.
    #[cfg_attr(feature = "json", serde(rename = "type", default))]
    pub kind: Option<String>,
    /// Whether the checksum is consulted.
    #[cfg_attr(feature = "json", serde(rename = "checkLuhn", default))]
    pub check_luhn: Option<bool>,
    /// Display name.
    pub name: String,
    /// Machine key.
    pub alias: String,
    /// Display breakpoints.
    #[cfg_attr(feature = "json", serde(default))]
    pub breakpoint: Option<Vec<SizeValue>>,
    /// Security code label and length.
    pub code: (String, i64),
    /// Valid lengths.
    pub length: Vec<RawSize>,
    /// Issuer identification ranges.
    #[cfg_attr(feature = "json", serde(rename = "idRange"))]
    pub id_range: Vec<RawSize>,
}

impl ProfileSchema {
    /// Validates the record and builds the profile.
    pub fn into_profile(self) -> Result<CardProfile, ConstraintError> {
        let mut builder = CardProfile::builder(self.name, self.alias)
            .kind(self.kind.unwrap_or_else(|| CREDIT_CARD.to_string()))
            .needs_checksum(self.check_luhn.unwrap_or(true))
            .security_code(self.code.0, self.code.1)
            .lengths(self.length)
            .id_ranges(self.id_range);
        if let Some(breakpoints) = self.breakpoint {
            builder = builder.breakpoints(breakpoints);
        }
        builder.build()
    }
}

/// Error loading card profiles.
#[derive(Debug)]
pub enum SourceError {
    /// Failed to read the source.
    Io(std::io::Error),
    /// The source is not in the expected format.
    Parse(String),
    /// A record broke a profile constraint.
    InvalidRecord {
        /// Record key (object key, or the alias for array entries).
        key: String,
        /// File the record came from, if any.
        path: Option<PathBuf>,
        /// The violated constraint.
        source: ConstraintError,
    },
    /// Two records share an alias.
    DuplicateAlias {
        /// The repeated alias.
        alias: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(s) => write!(f, "Parse error: {}", s),
            Self::InvalidRecord { key, path, source } => match path {
                Some(path) => write!(
                    f,
                    "Invalid card profile \"{}\" in {}: {}",
                    key,
                    path.display(),
                    source
                ),
                None => write!(f, "Invalid card profile \"{}\": {}", key, source),
            },
            Self::DuplicateAlias { alias } => {
                write!(f, "Duplicate card profile alias \"{}\"", alias)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Rejects a profile list in which two profiles share an alias.
pub(crate) fn ensure_unique(profiles: &[CardProfile]) -> Result<(), SourceError> {
    let mut seen = HashSet::with_capacity(profiles.len());
    for profile in profiles {
        if !seen.insert(profile.alias()) {
            return Err(SourceError::DuplicateAlias {
                alias: profile.alias().to_string(),
            });
        }
    }
    Ok(())
}

impl Resolver {
    /// Registers every profile `source` yields, in order.
    ///
    /// # Errors
    ///
    /// Whatever the source fails with, or [`SourceError::DuplicateAlias`]
    /// if a loaded alias is already a candidate.
    pub fn with_source<S: ProfileSource + ?Sized>(mut self, source: &S) -> Result<Self, SourceError> {
        for profile in source.load()? {
            self.register(profile).map_err(|e| match e {
                ResolveError::DuplicateAlias { alias } => SourceError::DuplicateAlias { alias },
                other => SourceError::Parse(other.to_string()),
            })?;
        }
        Ok(self)
    }
}
