//! rulekit-lib: rule-schema composition and registry engine
//!
//! This crate assembles, for every kind of buildable unit ("rule"), the set
//! of attributes a build-file author may declare, the implicit default-only
//! attributes the system injects (toolchain dependencies, hidden tool
//! dependencies), and the implementation function dispatched for it:
//! - `attr`: attribute specs and the attribute value model
//! - `select`: platform-conditional default values
//! - `schema`: ordered, uniqueness-checked attribute schemas
//! - `compose`: deriving one rule's schema from another's
//! - `toolchain`: implicit toolchain dependency injection
//! - `registry`: the frozen rule name -> definition table
//! - `finalize`: value conformance ahead of implementation dispatch
//!
//! Everything here is pure, build-time composition over static contributor
//! data. The registry is built exactly once at process start and is
//! read-only afterwards; share it by reference.

pub mod attr;
pub mod compose;
pub mod consts;
pub mod error;
pub mod finalize;
pub mod merge;
pub mod registry;
pub mod schema;
pub mod select;
pub mod toolchain;
