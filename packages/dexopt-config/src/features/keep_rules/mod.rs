//! Keep rules
//!
//! - `domain`: in-memory form of a parsed proguard configuration
//! - `infrastructure`: wildcard matching against a scope and canonical
//!   rendering back to proguard syntax
//!
//! Rendering is a pure function of its inputs. The same configuration and
//! scope always produce byte-identical text, which is what makes the output
//! usable for diffing optimizer runs.

pub mod domain;
pub mod infrastructure;

pub use domain::{
    ClassSpecification, Inheritance, KeepSpec, MemberSpecification, ProguardConfiguration,
    RuleSource,
};
pub use infrastructure::{show_configuration, show_keep, ClassSpecMatcher, NamePattern};
