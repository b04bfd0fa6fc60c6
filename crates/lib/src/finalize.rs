//! Value conformance ahead of implementation dispatch.
//!
//! Before the external engine dispatches a configured target to its rule's
//! implementation function, every attribute must be present-or-defaulted
//! and every default-only attribute fixed to its schema value.
//! `finalize_attrs` is that guarantee: it validates the build-file
//! author's declared values against the rule's schema, resolves
//! conditional defaults against the active platform predicate, and
//! produces the complete per-attribute value map. It never performs the
//! invocation itself.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::attr::{AttrDefault, AttrKind, AttrValue};
use crate::error::SchemaError;
use crate::registry::RuleDefinition;
use crate::select::PredicateId;

/// The complete, validated attribute values for one configured target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedAttrs {
  values: BTreeMap<String, AttrValue>,
}

impl FinalizedAttrs {
  pub fn get(&self, name: &str) -> Option<&AttrValue> {
    self.values.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
    self.values.iter().map(|(name, value)| (name.as_str(), value))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// Output of a rule implementation. Opaque to this crate: providers are
/// produced and consumed by the external execution engine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Providers(pub BTreeMap<String, AttrValue>);

/// The dispatch contract: an opaque reference to the per-language function
/// that turns finalized attributes into build outputs.
pub type ImplFn = fn(&FinalizedAttrs) -> Providers;

/// Errors raised while finalizing declared values against a schema.
///
/// These are lookup-time errors: they are returned to the caller (for
/// user-facing build-file diagnostics) and never corrupt registry state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FinalizeError {
  /// The author declared an attribute the rule's schema does not define.
  #[error("rule '{rule}' has no attribute '{attr}'")]
  UnknownAttribute { rule: String, attr: String },

  /// The author declared a value for a default-only attribute.
  #[error("attribute '{attr}' of rule '{rule}' is default-only and cannot be set")]
  DefaultOnlyAttribute { rule: String, attr: String },

  /// The declared value does not conform to the attribute's kind.
  #[error("attribute '{attr}' expects {expected}, got {got}")]
  TypeMismatch {
    attr: String,
    expected: String,
    got: &'static str,
  },

  /// A mandatory attribute was neither declared nor defaulted.
  #[error("missing required attribute '{attr}'")]
  MissingAttribute { attr: String },

  /// A conditional default failed to resolve for the active predicate.
  #[error("conditional default of attribute '{attr}' failed: {source}")]
  UnresolvedDefault {
    attr: String,
    #[source]
    source: SchemaError,
  },
}

/// Validate `declared` against the rule's schema and fill in defaults,
/// resolving conditional defaults against `active`.
pub fn finalize_attrs(
  def: &RuleDefinition,
  declared: &BTreeMap<String, AttrValue>,
  active: &PredicateId,
) -> Result<FinalizedAttrs, FinalizeError> {
  let schema = &def.attributes;

  for (name, value) in declared {
    let spec = schema.get(name).ok_or_else(|| FinalizeError::UnknownAttribute {
      rule: def.name.0.clone(),
      attr: name.clone(),
    })?;
    if spec.is_default_only() {
      return Err(FinalizeError::DefaultOnlyAttribute {
        rule: def.name.0.clone(),
        attr: name.clone(),
      });
    }
    if !spec.kind.accepts(value) {
      return Err(FinalizeError::TypeMismatch {
        attr: name.clone(),
        expected: spec.kind.to_string(),
        got: value.shape(),
      });
    }
  }

  let mut values = BTreeMap::new();
  for (name, spec) in schema.iter() {
    // Default-only attributes ignore `declared` entirely; the membership
    // check above already rejected any attempt to set one.
    let value = match declared.get(name) {
      Some(value) if spec.mutable => value.clone(),
      _ => match &spec.default {
        Some(AttrDefault::Value(value)) => value.clone(),
        Some(AttrDefault::Conditional(expr)) => expr
          .resolve(active)
          .map_err(|source| FinalizeError::UnresolvedDefault {
            attr: name.to_string(),
            source,
          })?
          .clone(),
        None if matches!(spec.kind, AttrKind::Option(_)) => AttrValue::None,
        None => {
          return Err(FinalizeError::MissingAttribute {
            attr: name.to_string(),
          });
        }
      },
    };
    values.insert(name.to_string(), value);
  }

  Ok(FinalizedAttrs { values })
}
