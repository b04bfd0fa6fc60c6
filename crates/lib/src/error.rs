//! Error types for schema composition and registry construction.
//!
//! Every construction-time error here is a contributor-authoring defect,
//! not a transient condition: callers abort registry construction on the
//! first error and never expose a partial registry. Lookup errors
//! (`UnknownRule`, `UnknownAttribute`) are returned to the caller for
//! user-facing reporting and do not corrupt registry state.

use thiserror::Error;

/// Errors raised while composing schemas or building the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
  /// A key was contributed by two independent sources.
  ///
  /// Source indices identify the offending inputs in evaluation order so
  /// the failing contributor can be named in diagnostics. When both sides
  /// come from the same source (a within-schema duplicate), both indices
  /// are that source's index.
  #[error("duplicate key '{key}' (first from source {first_source_index}, again from source {second_source_index})")]
  DuplicateKey {
    key: String,
    first_source_index: usize,
    second_source_index: usize,
  },

  /// A conditional default had no clause matching the active predicate and
  /// no fallback clause. Indicates a malformed contributor definition.
  #[error("no conditional default clause matches predicate '{predicate}' and no fallback is declared")]
  UnresolvedConditionalDefault { predicate: String },

  /// Lookup against the registry for a rule name that was never built.
  #[error("unknown rule: {0}")]
  UnknownRule(String),

  /// Reference to an attribute name that does not exist in the schema.
  #[error("unknown attribute: {0}")]
  UnknownAttribute(String),
}
