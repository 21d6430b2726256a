//! # xAPI Statement Model
//!
//! Canonical in-memory representation of xAPI Statements — the event records
//! exchanged by learning-record systems — together with the rules for reading
//! and writing them as JSON and for deciding when two records describe the
//! same event.
//!
//! ## Core Principles
//!
//! 1. **Values are immutable**: every object is built once via a builder and
//!    never mutated afterwards; "mutation" means building a new value.
//! 2. **Polymorphism is resolved by tag, defaulting by shape**: the
//!    `objectType` discriminant drives decoding, with Activity as the
//!    documented untagged default.
//! 3. **Equality ignores volatile metadata**: timestamps and attachment
//!    headers may legitimately differ between two representations of the same
//!    event and never participate in equality or hashing.
//! 4. **Decoding fails loudly, validation reports quietly**: malformed wire
//!    data aborts the decode; structural constraint violations are surfaced
//!    as data by the companion `xapi-validate` crate, never as panics.
//!
//! ## Module Organization
//!
//! - [`language_map`]: locale-tagged display text with the `und` fallback tag
//! - [`actor`]: Agent/Group polymorphism and membership
//! - [`verb`]: IRI-identified actions with display translations
//! - [`activity`]: Activities and their definitions
//! - [`object`]: the polymorphic object of a statement
//! - [`statement`]: the Statement and SubStatement aggregates
//! - [`context`], [`result`], [`attachment`]: supporting value objects
//! - [`error`]: codec error type

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod activity;
pub mod actor;
pub mod attachment;
pub mod context;
pub mod error;
pub mod language_map;
pub mod object;
pub mod result;
pub mod statement;
pub mod verb;

mod wire;

pub use activity::{Activity, ActivityBuilder, ActivityDefinition, ActivityDefinitionBuilder};
pub use actor::{Account, Actor, Agent, AgentBuilder, Group, GroupBuilder};
pub use attachment::{Attachment, AttachmentBuilder};
pub use context::{Context, ContextActivities, ContextActivitiesBuilder, ContextBuilder};
pub use error::ModelError;
pub use language_map::LanguageMap;
pub use object::{ObjectType, StatementObject, StatementReference, StatementReferenceBuilder};
pub use result::{Score, ScoreBuilder, StatementResult, StatementResultBuilder};
pub use statement::{Statement, StatementBuilder, SubStatement, SubStatementBuilder};
pub use verb::{Verb, VerbBuilder};

/// Extension map carried by Context, Result and Activity definitions.
///
/// Keyed by absolute IRI; values are opaque JSON. Insertion order is
/// preserved through encode/decode.
pub type Extensions = indexmap::IndexMap<String, serde_json::Value>;

/// The xAPI specification version this model implements.
pub const XAPI_VERSION: &str = "1.0.3";
