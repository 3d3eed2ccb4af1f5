//! Feature slices

/// Keep rule model and canonical rendering
pub mod keep_rules;
