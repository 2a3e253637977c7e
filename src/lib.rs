//! # cc_cardtype
//!
//! Payment card type identification, validation and formatting for Rust,
//! driven by card profiles.
//!
//! ## Features
//!
//! - Card type resolution with most-specific BIN/IIN matching
//! - Co-branded BIN space handled by a fixed partner table
//! - Length, checksum and security code validation per profile
//! - Breakpoint-based display formatting
//! - Custom profiles from code or JSON files
//! - Pluggable checksum, off by default (Luhn available behind a feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use cc_cardtype::{catalog, resolve, is_number_valid, is_code_valid};
//!
//! // Identify a card type
//! let amex = resolve("3782 822463 10005", catalog::default_profiles())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(amex.name(), "American Express");
//!
//! // Validate against a profile
//! assert!(is_number_valid(amex, "378282246310005"));
//! assert!(is_code_valid(amex, "1234"));
//! assert!(!is_code_valid(amex, "123"));
//!
//! // Format for display
//! assert_eq!(amex.format("378282246310005").unwrap(), "3782 822463 10005");
//!
//! // Numbers that match nothing are not errors
//! assert!(resolve("0000000000000000", catalog::default_profiles())
//!     .unwrap()
//!     .is_none());
//! ```
//!
//! ## Custom Profiles
//!
//! ```rust
//! use cc_cardtype::{CardProfile, Resolver, DEBIT_CARD};
//!
//! let humo = CardProfile::builder("Humo", "humo")
//!     .kind(DEBIT_CARD)
//!     .breakpoints([4, 8, 12])
//!     .security_code("CVV", 3)
//!     .lengths([16])
//!     .id_ranges([9860])
//!     .build()
//!     .unwrap();
//!
//! // Built-in profiles are searched first, then registered ones.
//! let resolver = Resolver::new().with_profiles([humo]).unwrap();
//! let profile = resolver.resolve("9860 0000 0000 0000").unwrap().unwrap();
//! assert_eq!(profile.alias(), "humo");
//!
//! // Or only the registered ones.
//! assert!(Resolver::registered_only().resolve("4111111111111111").is_err());
//! ```
//!
//! ## Checksum
//!
//! ```rust
//! use cc_cardtype::checksum::ChecksumFn;
//! use cc_cardtype::{catalog, Validator};
//!
//! let visa = catalog::find("visa").unwrap();
//!
//! // By default no checksum is wired in: only length and prefix are checked
//! let lenient = Validator::default();
//! assert!(lenient.checksum().is_none());
//! assert!(lenient.is_number_valid(visa, "4111111111111112"));
//!
//! // Any algorithm can be plugged in, e.g. `Validator::with_checksum(Luhn)`
//! let strict = Validator::with_checksum(ChecksumFn::new("never", |_: &str| false));
//! assert!(!strict.is_number_valid(visa, "4111111111111111"));
//! ```
//!
//! ## Batch Processing
//!
//! ```rust
//! use cc_cardtype::{BatchResolver, Resolver};
//!
//! let resolver = Resolver::new();
//! let mut batch = BatchResolver::new(&resolver);
//! let cards = vec!["4111111111111111", "5500000000000004", "invalid"];
//!
//! let (resolved, unresolved) = batch.count_resolved(&cards).unwrap();
//! assert_eq!((resolved, unresolved), (2, 1));
//!
//! // Every examined profile is recorded until cleared
//! assert!(!batch.coverage().is_empty());
//! batch.clear_coverage();
//! ```
//!
//! ## Built-in Card Types
//!
//! | Card type | Prefix | Length | Code |
//! |-----------|--------|--------|------|
//! | American Express | 34, 37 | 15 | CID 4 |
//! | Diners Club | 30, 36, 38, 39, 55 | 14-19 | CVV 3 |
//! | Mastercard | 51-55, 2221-2720 | 16 | CVC 3 |
//! | Discover | 622126-622925, 6011, 644-649, 65 | 16-19 | CID 3 |
//! | UnionPay | 62 | 16-19 | CVN 3 |
//! | Maestro | 5018, 5020, 5038, 5893, 6304, 6759, 6761-6763, 676770, 676774 | 12-19 | CVC 3 |
//! | Visa | 4 | 13, 16, 19 | CVV 3 |
//! | Troy | 65, 9792 | 16 | CVV 3 |
//! | JCB | 3528-3589 | 16-19 | CVV 3 |
//! | Mir | 2200-2204 | 16-19 | CVP2 3 |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `luhn` | Provides the `Luhn` checksum for opt-in use (default) |
//! | `json` | JSON profile loader |
//! | `parallel` | Rayon-based batch resolution |
//! | `cli` | Command-line tool |
//! | `full` | `luhn`, `json` and `parallel` |
//!
//! ## Security
//!
//! - Normalized card digits are held in zeroizing buffers
//! - Errors and log events never contain card numbers, only digit counts
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod catalog;
pub mod checksum;
pub mod error;
pub mod format;
pub mod input;
pub mod matcher;
pub mod profile;
pub mod resolve;
pub mod source;
pub mod stream;
pub mod validate;

// Re-export main types at crate root
pub use batch::BatchResolver;
#[cfg(feature = "luhn")]
pub use checksum::Luhn;
pub use checksum::{Checksum, ChecksumFn};
pub use error::{Attribute, ConstraintContext, ConstraintError, FormatError, ResolveError};
pub use input::CardInput;
pub use profile::{
    CardProfile, CardProfileBuilder, IdRange, LengthConstraint, RawSize, SecurityCode, SizeValue,
    CREDIT_CARD, DEBIT_CARD, DEFAULT_CARD,
};
pub use resolve::{resolve, resolve_with, Coverage, Outcome, Resolver};
pub use source::{ProfileSource, SourceError};
pub use validate::{is_code_valid, is_number_valid, Validator};
