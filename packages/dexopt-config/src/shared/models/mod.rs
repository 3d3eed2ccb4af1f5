//! Class scope models
//!
//! The optimizer owns the real class hierarchy; this crate only needs enough
//! of it to resolve type names, walk class names and match keep rules.

pub mod access_flags;
pub mod dex_class;
pub mod dex_type;
pub mod method_tuple;
pub mod scope;

pub use access_flags::AccessFlags;
pub use dex_class::{DexClass, DexMember};
pub use dex_type::{descriptor_to_java, java_to_descriptor, split_proto, DexType};
pub use method_tuple::{MethodMap, MethodTuple};
pub use scope::Scope;
