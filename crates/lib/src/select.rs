//! Platform-conditional default values.
//!
//! A [`ConditionalDefault`] is an ordered list of clauses: zero or more
//! exact predicate matches followed (optionally) by a fallback. Which
//! predicate is *active* is decided by the external platform/configuration
//! resolver; this module only consumes its result and picks the first
//! matching clause by linear scan.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attr::AttrValue;
use crate::consts::DEFAULT_PREDICATE;
use crate::error::SchemaError;

/// Identifier of a platform/configuration predicate, as produced by the
/// external configuration resolver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredicateId(pub String);

impl PredicateId {
  pub fn new(id: impl Into<String>) -> Self {
    PredicateId(id.into())
  }
}

impl fmt::Display for PredicateId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// One clause of a conditional default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultClause {
  /// Value selected when `predicate` is the active predicate.
  Exact { predicate: PredicateId, value: AttrValue },
  /// Value selected when no exact clause matched.
  Fallback { value: AttrValue },
}

/// An ordered predicate -> value mapping with an optional fallback.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalDefault {
  clauses: Vec<DefaultClause>,
}

impl ConditionalDefault {
  pub fn new() -> Self {
    ConditionalDefault { clauses: Vec::new() }
  }

  /// Append an exact-match clause. The reserved `"default"` predicate is
  /// normalized into a fallback clause.
  pub fn when(mut self, predicate: impl Into<String>, value: AttrValue) -> Self {
    let predicate = predicate.into();
    if predicate == DEFAULT_PREDICATE {
      self.clauses.push(DefaultClause::Fallback { value });
    } else {
      self.clauses.push(DefaultClause::Exact {
        predicate: PredicateId(predicate),
        value,
      });
    }
    self
  }

  /// Append a fallback clause.
  pub fn fallback(mut self, value: AttrValue) -> Self {
    self.clauses.push(DefaultClause::Fallback { value });
    self
  }

  pub fn clauses(&self) -> &[DefaultClause] {
    &self.clauses
  }

  /// Resolve against the active predicate: first matching exact clause
  /// wins, otherwise the first fallback clause. A well-formed schema always
  /// resolves; failure means a malformed contributor definition.
  pub fn resolve(&self, active: &PredicateId) -> Result<&AttrValue, SchemaError> {
    for clause in &self.clauses {
      if let DefaultClause::Exact { predicate, value } = clause
        && predicate == active
      {
        return Ok(value);
      }
    }
    for clause in &self.clauses {
      if let DefaultClause::Fallback { value } = clause {
        return Ok(value);
      }
    }
    Err(SchemaError::UnresolvedConditionalDefault {
      predicate: active.0.clone(),
    })
  }
}
