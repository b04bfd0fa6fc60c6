//! Rule registry construction and lookup.
//!
//! The registry is the top-level table mapping rule name to its
//! implementation reference, final attribute schema, and optional
//! configuration transition. Construction is two-phase: a
//! [`RegistryBuilder`] collects contributions from every rule-family
//! module, then `build()` unions them (duplicate rule names are fatal),
//! applies the implicit test-environment injection, and produces a frozen
//! [`Registry`]. There is no update operation after `build()`; downstream
//! readers share the registry by reference.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::attr::{AttrKind, AttrSpec, AttrValue};
use crate::consts::{TEST_ENV_ATTR, TEST_ENV_LABEL, TEST_RULES};
use crate::error::SchemaError;
use crate::finalize::ImplFn;
use crate::merge::merge;
use crate::schema::AttrSchema;

/// Unique identifier of a buildable unit kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleName(pub String);

impl RuleName {
  pub fn new(name: impl Into<String>) -> Self {
    RuleName(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for RuleName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Borrow<str> for RuleName {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<&str> for RuleName {
  fn from(name: &str) -> Self {
    RuleName(name.to_string())
  }
}

/// Reference to a configuration transition, consumed by the external
/// configuration-resolution engine before attribute values are finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionId(pub String);

impl TransitionId {
  pub fn new(id: impl Into<String>) -> Self {
    TransitionId(id.into())
  }
}

/// One contributed rule: implementation reference, attribute schema, and
/// optional configuration transition.
#[derive(Debug, Clone)]
pub struct RuleTemplate {
  pub implementation: ImplFn,
  pub attrs: AttrSchema,
  pub transition: Option<TransitionId>,
}

impl RuleTemplate {
  pub fn new(implementation: ImplFn, attrs: AttrSchema) -> Self {
    RuleTemplate {
      implementation,
      attrs,
      transition: None,
    }
  }

  pub fn with_transition(mut self, transition: TransitionId) -> Self {
    self.transition = Some(transition);
    self
  }
}

/// A registered rule, frozen at registry build time.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
  pub name: RuleName,
  pub implementation: ImplFn,
  pub attributes: AttrSchema,
  pub transition: Option<TransitionId>,
}

/// Collects contributor rule maps ahead of the one-time registry build.
pub struct RegistryBuilder {
  contributions: Vec<BTreeMap<RuleName, RuleTemplate>>,
  test_rules: BTreeSet<RuleName>,
}

impl RegistryBuilder {
  /// A builder whose test-rule injection set is [`TEST_RULES`].
  pub fn new() -> Self {
    RegistryBuilder {
      contributions: Vec::new(),
      test_rules: TEST_RULES.iter().map(|name| RuleName::new(*name)).collect(),
    }
  }

  /// Replace the set of rule names receiving the implicit test-environment
  /// dependency. The set is explicit configuration, never inferred from
  /// naming convention.
  pub fn with_test_rules<N, I>(mut self, names: I) -> Self
  where
    N: Into<String>,
    I: IntoIterator<Item = N>,
  {
    self.test_rules = names.into_iter().map(|name| RuleName(name.into())).collect();
    self
  }

  /// Add one contributor's rule map. Uniqueness across contributors is
  /// checked at `build()`.
  pub fn contribute(mut self, rules: BTreeMap<RuleName, RuleTemplate>) -> Self {
    self.contributions.push(rules);
    self
  }

  /// Union all contributions into a frozen [`Registry`].
  ///
  /// Fails fast on any duplicate rule name and on a declared test rule
  /// that no contributor registered; no partial registry is ever produced.
  pub fn build(self) -> Result<Registry, SchemaError> {
    info!(contributors = self.contributions.len(), "building rule registry");
    let mut merged = merge(self.contributions)?;

    // Cross-cutting pass: the implicit test-environment dependency goes to
    // exactly the declared test rules, after individual composition.
    for name in &self.test_rules {
      let template = merged
        .get_mut(name)
        .ok_or_else(|| SchemaError::UnknownRule(name.0.clone()))?;
      template.attrs.insert(
        TEST_ENV_ATTR,
        AttrSpec::default_only(AttrKind::Dep, AttrValue::label(TEST_ENV_LABEL)),
      )?;
      debug!(rule = %name, "injected test-environment dependency");
    }

    let mut rules = BTreeMap::new();
    for (name, template) in merged {
      debug!(rule = %name, attrs = template.attrs.len(), "registered rule");
      rules.insert(
        name.clone(),
        RuleDefinition {
          name,
          implementation: template.implementation,
          attributes: template.attrs,
          transition: template.transition,
        },
      );
    }

    info!(rules = rules.len(), "rule registry frozen");
    Ok(Registry { rules })
  }
}

impl Default for RegistryBuilder {
  fn default() -> Self {
    RegistryBuilder::new()
  }
}

/// The frozen rule table. Read-only for the life of the process; safe to
/// read concurrently without synchronization.
#[derive(Debug)]
pub struct Registry {
  rules: BTreeMap<RuleName, RuleDefinition>,
}

impl Registry {
  pub fn lookup(&self, name: &str) -> Result<&RuleDefinition, SchemaError> {
    self
      .rules
      .get(name)
      .ok_or_else(|| SchemaError::UnknownRule(name.to_string()))
  }

  /// Schema introspection for build-file validation and metadata queries,
  /// without touching any implementation.
  pub fn schema_for(&self, name: &str) -> Result<&AttrSchema, SchemaError> {
    Ok(&self.lookup(name)?.attributes)
  }

  pub fn names(&self) -> impl Iterator<Item = &RuleName> {
    self.rules.keys()
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}
