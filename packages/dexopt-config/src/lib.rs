/*
 * dexopt-config - Pipeline configuration for the bytecode optimizer
 *
 * Feature-First Architecture:
 * - shared/      : Collaborator models (DexType, DexClass, Scope)
 * - config/      : Typed JSON access, ConfigFiles store, lazily loaded data sets
 * - features/    : Vertical slices (keep_rules → rendering for audit)
 *
 * Every optimization pass receives one `ConfigFiles` by reference; there is
 * no global instance.
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models (types, classes, scope)
pub mod shared;

/// Configuration store and typed accessors
pub mod config;

/// Feature slices
pub mod features;

/// Crate-level error type
pub mod errors;

pub use config::{ConfigError, ConfigFiles, ConfigResult, InlinerConfig, JsonWrapper};
pub use errors::{DexoptError, Result};
pub use features::keep_rules::{show_configuration, show_keep, KeepSpec, ProguardConfiguration};
pub use shared::models::{DexClass, DexType, MethodTuple, Scope};
