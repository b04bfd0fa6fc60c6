//! Attribute schemas: ordered attribute-name -> spec mappings whose key
//! uniqueness is checked at construction, never assembled by unchecked
//! union.
//!
//! # Ordering
//!
//! Backed by [`BTreeMap`], so iteration and serialization order is the
//! sorted attribute-name order. This keeps the shape of a composed schema
//! independent of the order its pieces were contributed in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attr::AttrSpec;
use crate::consts::is_hidden_attr;
use crate::error::SchemaError;

/// An ordered mapping from attribute name to [`AttrSpec`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrSchema {
  attrs: BTreeMap<String, AttrSpec>,
}

impl AttrSchema {
  pub fn new() -> Self {
    AttrSchema { attrs: BTreeMap::new() }
  }

  /// Build a schema from entries, rejecting duplicate names.
  ///
  /// A duplicate reports source index 0 for both sides: the entries form a
  /// single contribution.
  pub fn from_entries<N, I>(entries: I) -> Result<Self, SchemaError>
  where
    N: Into<String>,
    I: IntoIterator<Item = (N, AttrSpec)>,
  {
    let mut schema = AttrSchema::new();
    for (name, spec) in entries {
      schema.insert(name, spec)?;
    }
    Ok(schema)
  }

  /// Insert one attribute, rejecting a duplicate name.
  pub fn insert(&mut self, name: impl Into<String>, spec: AttrSpec) -> Result<(), SchemaError> {
    let name = name.into();
    if self.attrs.contains_key(&name) {
      return Err(SchemaError::DuplicateKey {
        key: name,
        first_source_index: 0,
        second_source_index: 0,
      });
    }
    self.attrs.insert(name, spec);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&AttrSpec> {
    self.attrs.get(name)
  }

  /// Like [`AttrSchema::get`], but an absent name is an error.
  pub fn attr(&self, name: &str) -> Result<&AttrSpec, SchemaError> {
    self
      .attrs
      .get(name)
      .ok_or_else(|| SchemaError::UnknownAttribute(name.to_string()))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.attrs.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.attrs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.attrs.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrSpec)> {
    self.attrs.iter().map(|(name, spec)| (name.as_str(), spec))
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.attrs.keys().map(String::as_str)
  }

  /// Attributes visible to build-file authors and query tooling: hidden
  /// (implementation-private) names are filtered out.
  pub fn iter_public(&self) -> impl Iterator<Item = (&str, &AttrSpec)> {
    self.iter().filter(|(name, _)| !is_hidden_attr(name))
  }

  pub(crate) fn from_map(attrs: BTreeMap<String, AttrSpec>) -> Self {
    AttrSchema { attrs }
  }
}
