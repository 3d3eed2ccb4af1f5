//! Keep rule infrastructure: matching and rendering

pub mod matcher;
pub mod pattern;
pub mod printer;

pub use matcher::{ClassMatch, ClassSpecMatcher, Hierarchy};
pub use pattern::NamePattern;
pub use printer::{show_class_spec, show_configuration, show_keep};
