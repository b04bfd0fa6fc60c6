//! Deriving one rule's attribute schema from another's.
//!
//! A specialized rule (say, an extension rule that is "almost" the general
//! library rule plus a couple of extra fields) reuses the base rule's
//! machinery without re-listing every field. `derive_schema` copies the
//! base schema and:
//! - demotes every attribute the derived rule does not explicitly override
//!   to default-only, so the narrower rule never silently accepts fields
//!   that only make sense in the broader one;
//! - replaces overridden attributes wholesale, which may re-enable
//!   mutability where the derived rule declares it;
//! - inserts additions as new entries, rejecting collisions.

use std::collections::BTreeMap;

use crate::attr::AttrSpec;
use crate::error::SchemaError;
use crate::schema::AttrSchema;

/// Source indices reported in compose collision diagnostics.
const SOURCE_BASE: usize = 0;
const SOURCE_OVERRIDES: usize = 1;
const SOURCE_ADDITIONS: usize = 2;

/// Derive a schema from `base`, with `overrides` replacing existing specs
/// and `additions` inserting new ones.
///
/// Every `overrides` name must exist in `base`; overriding an unknown
/// attribute is an `UnknownAttribute` error rather than a silent insert,
/// so overrides and additions stay distinguishable. An `additions` name
/// colliding with the post-override base is a `DuplicateKey` error.
pub fn derive_schema(
  base: &AttrSchema,
  overrides: &AttrSchema,
  additions: &AttrSchema,
) -> Result<AttrSchema, SchemaError> {
  for name in overrides.names() {
    if !base.contains(name) {
      return Err(SchemaError::UnknownAttribute(name.to_string()));
    }
  }

  let mut derived: BTreeMap<String, AttrSpec> = BTreeMap::new();
  for (name, spec) in base.iter() {
    let spec = match overrides.get(name) {
      Some(replacement) => replacement.clone(),
      None => spec.promote_default_only(),
    };
    derived.insert(name.to_string(), spec);
  }

  for (name, spec) in additions.iter() {
    if derived.contains_key(name) {
      let first = if overrides.contains(name) { SOURCE_OVERRIDES } else { SOURCE_BASE };
      return Err(SchemaError::DuplicateKey {
        key: name.to_string(),
        first_source_index: first,
        second_source_index: SOURCE_ADDITIONS,
      });
    }
    derived.insert(name.to_string(), spec.clone());
  }

  Ok(AttrSchema::from_map(derived))
}
