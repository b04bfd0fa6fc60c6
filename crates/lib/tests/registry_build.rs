//! End-to-end registry construction for a realistic rule family.
//!
//! Models a small compiled-language family the way a contributor module
//! would register it: a general `cc_library` base, a `cc_binary` derived
//! from it, and a `cc_test` derived from it that also receives the
//! implicit test-environment dependency at registry build time.

use std::collections::{BTreeMap, BTreeSet};

use rulekit_lib::attr::{AttrKind, AttrSpec, AttrValue, CapabilityTag};
use rulekit_lib::compose::derive_schema;
use rulekit_lib::consts;
use rulekit_lib::error::SchemaError;
use rulekit_lib::finalize::{FinalizedAttrs, Providers, finalize_attrs};
use rulekit_lib::registry::{Registry, RegistryBuilder, RuleName, RuleTemplate, TransitionId};
use rulekit_lib::schema::AttrSchema;
use rulekit_lib::select::{ConditionalDefault, PredicateId};
use rulekit_lib::toolchain::inject_toolchain;

fn compile_impl(attrs: &FinalizedAttrs) -> Providers {
  // Stand-in for the external per-language implementation: echo the
  // finalized attribute names as "outputs".
  let mut outputs = BTreeMap::new();
  for (name, value) in attrs.iter() {
    outputs.insert(name.to_string(), value.clone());
  }
  Providers(outputs)
}

fn caps(tags: &[&str]) -> BTreeSet<CapabilityTag> {
  tags.iter().map(|t| CapabilityTag::new(*t)).collect()
}

/// The general-purpose library schema the rest of the family derives from.
fn cc_library_schema() -> AttrSchema {
  let schema = AttrSchema::from_entries([
    ("srcs", AttrSpec::required(AttrKind::List(Box::new(AttrKind::Source)))),
    (
      "deps",
      AttrSpec::with_default(AttrKind::List(Box::new(AttrKind::Dep)), AttrValue::List(vec![])),
    ),
    (
      "linkage",
      AttrSpec::with_default(
        AttrKind::Enum(vec!["static".to_string(), "shared".to_string()]),
        AttrValue::str("static"),
      ),
    ),
    (
      "opt_level",
      AttrSpec::with_conditional_default(
        AttrKind::Int,
        ConditionalDefault::new()
          .when("os:windows", AttrValue::Int(1))
          .fallback(AttrValue::Int(2)),
      ),
    ),
  ])
  .unwrap();
  inject_toolchain(schema, "cc", caps(&["compile", "link"])).unwrap()
}

/// The whole cc family, registered the way a contributor module would.
fn cc_contribution() -> BTreeMap<RuleName, RuleTemplate> {
  let library = cc_library_schema();

  // Binaries reuse the library machinery but pin linkage and add an entry
  // point; authors cannot re-supply the pinned field.
  let binary_overrides = AttrSchema::from_entries([
    ("srcs", AttrSpec::required(AttrKind::List(Box::new(AttrKind::Source)))),
    (
      "deps",
      AttrSpec::with_default(AttrKind::List(Box::new(AttrKind::Dep)), AttrValue::List(vec![])),
    ),
  ])
  .unwrap();
  let binary_additions =
    AttrSchema::from_entries([("entry_point", AttrSpec::required(AttrKind::Source))]).unwrap();
  let binary = derive_schema(&library, &binary_overrides, &binary_additions).unwrap();

  // Tests look like binaries with an extra timeout knob; sources, deps and
  // the entry point stay author-settable.
  let test_overrides = AttrSchema::from_entries([
    ("srcs", AttrSpec::required(AttrKind::List(Box::new(AttrKind::Source)))),
    (
      "deps",
      AttrSpec::with_default(AttrKind::List(Box::new(AttrKind::Dep)), AttrValue::List(vec![])),
    ),
    ("entry_point", AttrSpec::required(AttrKind::Source)),
  ])
  .unwrap();
  let test_additions = AttrSchema::from_entries([(
    "timeout_secs",
    AttrSpec::with_default(AttrKind::Int, AttrValue::Int(300)),
  )])
  .unwrap();
  let test = derive_schema(&binary, &test_overrides, &test_additions).unwrap();

  let mut rules = BTreeMap::new();
  rules.insert(RuleName::new("cc_library"), RuleTemplate::new(compile_impl, library));
  rules.insert(
    RuleName::new("cc_binary"),
    RuleTemplate::new(compile_impl, binary).with_transition(TransitionId::new("target")),
  );
  rules.insert(RuleName::new("cc_test"), RuleTemplate::new(compile_impl, test));
  rules
}

fn build_registry() -> Registry {
  RegistryBuilder::new()
    .with_test_rules(["cc_test"])
    .contribute(cc_contribution())
    .build()
    .unwrap()
}

#[test]
fn registry_holds_the_whole_family() {
  let registry = build_registry();
  assert_eq!(registry.len(), 3);
  for name in ["cc_library", "cc_binary", "cc_test"] {
    assert!(registry.lookup(name).is_ok());
  }
}

#[test]
fn derived_binary_pins_unreferenced_base_attrs() {
  let registry = build_registry();
  let schema = registry.schema_for("cc_binary").unwrap();

  // Overridden attrs stay author-settable.
  assert!(schema.get("srcs").unwrap().mutable);
  assert!(schema.get("deps").unwrap().mutable);
  // Unreferenced base attrs got demoted to default-only.
  assert!(schema.get("linkage").unwrap().is_default_only());
  assert!(schema.get("opt_level").unwrap().is_default_only());
  // Additions are present and mutable.
  assert!(schema.get("entry_point").unwrap().mutable);
  // The injected toolchain survives derivation, still default-only.
  assert!(schema.get("_toolchain_cc").unwrap().is_default_only());
}

#[test]
fn only_declared_test_rules_get_the_test_env_dependency() {
  let registry = build_registry();
  assert!(registry.schema_for("cc_test").unwrap().contains(consts::TEST_ENV_ATTR));
  assert!(!registry.schema_for("cc_library").unwrap().contains(consts::TEST_ENV_ATTR));
  assert!(!registry.schema_for("cc_binary").unwrap().contains(consts::TEST_ENV_ATTR));
}

#[test]
fn test_rule_finalizes_with_injected_test_env() {
  let registry = build_registry();
  let def = registry.lookup("cc_test").unwrap();

  let mut declared = BTreeMap::new();
  declared.insert(
    "srcs".to_string(),
    AttrValue::List(vec![AttrValue::str("widget_test.c")]),
  );
  declared.insert("entry_point".to_string(), AttrValue::str("widget_test.c"));

  let finalized = finalize_attrs(def, &declared, &PredicateId::new("os:linux")).unwrap();
  assert_eq!(
    finalized.get(consts::TEST_ENV_ATTR),
    Some(&AttrValue::label(consts::TEST_ENV_LABEL))
  );
  assert_eq!(finalized.get("timeout_secs"), Some(&AttrValue::Int(300)));
}

#[test]
fn two_contributors_colliding_on_a_rule_name_abort_the_build() {
  let mut other = BTreeMap::new();
  other.insert(
    RuleName::new("cc_library"),
    RuleTemplate::new(compile_impl, AttrSchema::new()),
  );

  let err = RegistryBuilder::new()
    .with_test_rules(["cc_test"])
    .contribute(cc_contribution())
    .contribute(other)
    .build()
    .unwrap_err();
  assert_eq!(
    err,
    SchemaError::DuplicateKey {
      key: "cc_library".to_string(),
      first_source_index: 0,
      second_source_index: 1,
    }
  );
}

#[test]
fn finalize_then_dispatch_a_configured_target() {
  let registry = build_registry();
  let def = registry.lookup("cc_binary").unwrap();

  let mut declared = BTreeMap::new();
  declared.insert(
    "srcs".to_string(),
    AttrValue::List(vec![AttrValue::str("main.c")]),
  );
  declared.insert("entry_point".to_string(), AttrValue::str("main.c"));

  let finalized = finalize_attrs(def, &declared, &PredicateId::new("os:linux")).unwrap();

  // Pinned and injected attrs arrive fixed to their schema values.
  assert_eq!(finalized.get("linkage"), Some(&AttrValue::str("static")));
  assert_eq!(finalized.get("opt_level"), Some(&AttrValue::Int(2)));
  assert_eq!(
    finalized.get("_toolchain_cc"),
    Some(&AttrValue::label("//toolchains:cc"))
  );

  // Dispatch is the caller's move; the implementation sees every attr.
  let providers = (def.implementation)(&finalized);
  assert_eq!(providers.0.len(), def.attributes.len());
}

#[test]
fn conditional_default_tracks_the_active_platform() {
  let registry = build_registry();
  let def = registry.lookup("cc_library").unwrap();

  let mut declared = BTreeMap::new();
  declared.insert(
    "srcs".to_string(),
    AttrValue::List(vec![AttrValue::str("lib.c")]),
  );

  let on_windows = finalize_attrs(def, &declared, &PredicateId::new("os:windows")).unwrap();
  assert_eq!(on_windows.get("opt_level"), Some(&AttrValue::Int(1)));

  let elsewhere = finalize_attrs(def, &declared, &PredicateId::new("os:linux")).unwrap();
  assert_eq!(elsewhere.get("opt_level"), Some(&AttrValue::Int(2)));
}

#[test]
fn introspection_exposes_public_attrs_and_serializes() {
  let registry = build_registry();
  let schema = registry.schema_for("cc_test").unwrap();

  let public: Vec<_> = schema.iter_public().map(|(name, _)| name).collect();
  assert!(public.contains(&"timeout_secs"));
  assert!(!public.iter().any(|name| name.starts_with('_')));

  // Query tooling exports schemas as JSON.
  let json = serde_json::to_value(schema).unwrap();
  assert!(json.get("attrs").and_then(|a| a.get("timeout_secs")).is_some());
}
