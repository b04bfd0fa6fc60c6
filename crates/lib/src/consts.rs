//! Well-known names and fixed product configuration.

/// Prefix marking an attribute as implementation-private. Hidden attributes
/// never accept author-supplied values and are filtered from public
/// introspection.
pub const HIDDEN_ATTR_PREFIX: &str = "_";

/// Prefix for injected toolchain dependency attributes.
pub const TOOLCHAIN_ATTR_PREFIX: &str = "_toolchain_";

/// Hidden attribute carrying the implicit test-environment dependency.
pub const TEST_ENV_ATTR: &str = "_test_env";

/// Well-known target providing the test-environment runner.
pub const TEST_ENV_LABEL: &str = "//toolchains:test_env";

/// Reserved predicate naming a conditional default's fallback clause.
pub const DEFAULT_PREDICATE: &str = "default";

/// Rule kinds that receive the implicit test-environment dependency.
///
/// This is an explicit configuration list, deliberately not inferred from
/// naming convention: which rules get the injected dependency is part of
/// the registry's contract with downstream execution.
pub const TEST_RULES: &[&str] = &["cc_test", "go_test", "python_test", "rust_test", "sh_test"];

/// The well-known target identifier a toolchain dependency is bound to.
pub fn toolchain_label(toolchain_name: &str) -> String {
  format!("//toolchains:{toolchain_name}")
}

/// Returns true for implementation-private attribute names.
pub fn is_hidden_attr(name: &str) -> bool {
  name.starts_with(HIDDEN_ATTR_PREFIX)
}
