//! Core types for the Rolodex contact record.
//!
//! This crate holds the in-memory vCard record, its closed set of property
//! keys, the typed values those keys carry, validation and merging. It has no
//! parsing or I/O; the `rolodex-vcard` crate turns text into these types.

pub mod error;
pub mod merge;
pub mod property;
pub mod validate;
pub mod value;
pub mod vcard;

pub use error::{Error, Result};
pub use property::{
  Cardinality, EmailType, LangType, PropertyKey, RelatedType, TelType,
};
pub use validate::{Locator, ValidationError, ValidationErrorKind, ValidationErrors};
pub use value::{
  DateAndOrTime, DateParts, Gender, Moment, Organization, PropertyValue, Sex,
  StructuredName, TimeParts, Timezone, TypedValue, UtcOffset, Value,
};
pub use vcard::VCard;
