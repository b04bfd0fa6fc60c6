//! Attribute specs and the attribute value model.
//!
//! An attribute is one declarable or implicit field of a rule. Each is
//! described by an [`AttrSpec`]: the [`AttrKind`] a declared value must
//! conform to, an optional default, and a mutability class.
//!
//! # Mutability
//!
//! `mutable = false` marks a *default-only* attribute: its value is fixed
//! by the schema and a build-file author can never supply one. Schema
//! derivation ([`crate::compose`]) demotes unreferenced base attributes to
//! default-only, and every injected toolchain dependency is default-only
//! from the start.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::select::ConditionalDefault;

/// Capability marker a resolved toolchain dependency must expose.
///
/// The schema only declares the requirement; validating the bound target
/// against these markers is the external dependency resolver's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityTag(pub String);

impl CapabilityTag {
  pub fn new(tag: impl Into<String>) -> Self {
    CapabilityTag(tag.into())
  }
}

impl fmt::Display for CapabilityTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrKind {
  String,
  Bool,
  Int,
  /// Homogeneous list of the element kind.
  List(Box<AttrKind>),
  /// Dictionary attribute. Build-file dictionary keys are always strings;
  /// the key kind is retained for introspection, values are checked
  /// against the value kind.
  Dict(Box<AttrKind>, Box<AttrKind>),
  /// Accepts a value conforming to any of the listed kinds.
  OneOf(Vec<AttrKind>),
  /// Closed set of admissible string values.
  Enum(Vec<String>),
  /// Reference to another buildable target.
  Dep,
  /// Reference to an input file.
  Source,
  /// An uninterpreted target label.
  Label,
  /// Optional attribute of the inner kind; absent means `AttrValue::None`.
  Option(Box<AttrKind>),
}

impl AttrKind {
  /// Whether `value` conforms to this kind.
  ///
  /// Target-shaped kinds (`Dep`, `Source`, `Label`) accept both plain
  /// strings and labels, since build-file authors write labels as strings.
  pub fn accepts(&self, value: &AttrValue) -> bool {
    match (self, value) {
      (AttrKind::String, AttrValue::Str(_)) => true,
      (AttrKind::Bool, AttrValue::Bool(_)) => true,
      (AttrKind::Int, AttrValue::Int(_)) => true,
      (AttrKind::List(elem), AttrValue::List(items)) => items.iter().all(|v| elem.accepts(v)),
      (AttrKind::Dict(_, val), AttrValue::Dict(entries)) => entries.values().all(|v| val.accepts(v)),
      (AttrKind::OneOf(kinds), v) => kinds.iter().any(|k| k.accepts(v)),
      (AttrKind::Enum(variants), AttrValue::Str(s)) => variants.iter().any(|v| v == s),
      (AttrKind::Dep | AttrKind::Source | AttrKind::Label, AttrValue::Str(_) | AttrValue::Label(_)) => true,
      (AttrKind::Option(_), AttrValue::None) => true,
      (AttrKind::Option(inner), v) => inner.accepts(v),
      _ => false,
    }
  }
}

impl fmt::Display for AttrKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AttrKind::String => write!(f, "string"),
      AttrKind::Bool => write!(f, "bool"),
      AttrKind::Int => write!(f, "int"),
      AttrKind::List(elem) => write!(f, "list<{elem}>"),
      AttrKind::Dict(key, val) => write!(f, "dict<{key}, {val}>"),
      AttrKind::OneOf(kinds) => {
        write!(f, "one_of<")?;
        for (i, kind) in kinds.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{kind}")?;
        }
        write!(f, ">")
      }
      AttrKind::Enum(variants) => write!(f, "enum<{}>", variants.join(", ")),
      AttrKind::Dep => write!(f, "dependency"),
      AttrKind::Source => write!(f, "source"),
      AttrKind::Label => write!(f, "label"),
      AttrKind::Option(inner) => write!(f, "option<{inner}>"),
    }
  }
}

/// A concrete attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
  Str(String),
  Bool(bool),
  Int(i64),
  List(Vec<AttrValue>),
  Dict(BTreeMap<String, AttrValue>),
  Label(String),
  None,
}

impl AttrValue {
  /// Short name of the value's shape, for diagnostics.
  pub fn shape(&self) -> &'static str {
    match self {
      AttrValue::Str(_) => "string",
      AttrValue::Bool(_) => "bool",
      AttrValue::Int(_) => "int",
      AttrValue::List(_) => "list",
      AttrValue::Dict(_) => "dict",
      AttrValue::Label(_) => "label",
      AttrValue::None => "none",
    }
  }

  pub fn str(s: impl Into<String>) -> Self {
    AttrValue::Str(s.into())
  }

  pub fn label(l: impl Into<String>) -> Self {
    AttrValue::Label(l.into())
  }
}

/// The default of an attribute: a concrete value, or a conditional
/// expression resolved against the active platform predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrDefault {
  Value(AttrValue),
  Conditional(ConditionalDefault),
}

/// Typed descriptor for one declarable or implicit field of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrSpec {
  pub kind: AttrKind,
  pub default: Option<AttrDefault>,
  /// False marks a default-only attribute: fixed by the schema, never
  /// author-supplied.
  pub mutable: bool,
  /// Capability markers the resolved dependency must expose. Only
  /// meaningful for `Dep`-kinded attributes; empty otherwise.
  pub required_capabilities: BTreeSet<CapabilityTag>,
}

impl AttrSpec {
  /// A mandatory, author-supplied attribute with no default.
  pub fn required(kind: AttrKind) -> Self {
    AttrSpec {
      kind,
      default: None,
      mutable: true,
      required_capabilities: BTreeSet::new(),
    }
  }

  /// An author-overridable attribute with a concrete default.
  pub fn with_default(kind: AttrKind, default: AttrValue) -> Self {
    AttrSpec {
      kind,
      default: Some(AttrDefault::Value(default)),
      mutable: true,
      required_capabilities: BTreeSet::new(),
    }
  }

  /// An author-overridable attribute whose default depends on the active
  /// platform predicate.
  pub fn with_conditional_default(kind: AttrKind, default: ConditionalDefault) -> Self {
    AttrSpec {
      kind,
      default: Some(AttrDefault::Conditional(default)),
      mutable: true,
      required_capabilities: BTreeSet::new(),
    }
  }

  /// A default-only attribute: fixed to `default`, never author-supplied.
  pub fn default_only(kind: AttrKind, default: AttrValue) -> Self {
    AttrSpec {
      kind,
      default: Some(AttrDefault::Value(default)),
      mutable: false,
      required_capabilities: BTreeSet::new(),
    }
  }

  pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = CapabilityTag>) -> Self {
    self.required_capabilities = capabilities.into_iter().collect();
    self
  }

  pub fn is_default_only(&self) -> bool {
    !self.mutable
  }

  /// Copy of this spec with `mutable` forced off. Used when a derived rule
  /// reuses a base attribute without letting authors re-supply it.
  pub fn promote_default_only(&self) -> AttrSpec {
    AttrSpec {
      mutable: false,
      ..self.clone()
    }
  }
}
