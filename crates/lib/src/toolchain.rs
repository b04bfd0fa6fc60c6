//! Implicit toolchain dependency injection.
//!
//! A rule that compiles or links needs its toolchain(s) wired in without
//! the build-file author declaring anything: the schema grows one hidden,
//! default-only dependency attribute per toolchain, bound to the
//! well-known toolchain target. Rules needing several toolchains (a
//! language toolchain plus a linking toolchain, say) inject repeatedly.

use std::collections::BTreeSet;

use crate::attr::{AttrKind, AttrSpec, AttrValue, CapabilityTag};
use crate::consts::{TOOLCHAIN_ATTR_PREFIX, toolchain_label};
use crate::error::SchemaError;
use crate::schema::AttrSchema;

/// Name of the hidden attribute injected for `toolchain_name`.
pub fn toolchain_attr_name(toolchain_name: &str) -> String {
  format!("{TOOLCHAIN_ATTR_PREFIX}{toolchain_name}")
}

/// Add the hidden dependency attribute binding a rule to `toolchain_name`.
///
/// `required_capabilities` records which capability markers the resolved
/// toolchain target must expose; checking them is the external dependency
/// resolver's job. A collision with an existing attribute (including a
/// previously injected toolchain of the same name) is Merger-style fatal,
/// with source 0 naming the existing schema and source 1 the injection.
pub fn inject_toolchain(
  mut schema: AttrSchema,
  toolchain_name: &str,
  required_capabilities: BTreeSet<CapabilityTag>,
) -> Result<AttrSchema, SchemaError> {
  let attr_name = toolchain_attr_name(toolchain_name);
  if schema.contains(&attr_name) {
    return Err(SchemaError::DuplicateKey {
      key: attr_name,
      first_source_index: 0,
      second_source_index: 1,
    });
  }

  let spec = AttrSpec::default_only(AttrKind::Dep, AttrValue::label(toolchain_label(toolchain_name)))
    .with_capabilities(required_capabilities);
  schema.insert(attr_name, spec)?;
  Ok(schema)
}
