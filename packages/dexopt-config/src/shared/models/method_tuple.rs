//! Composite method key used by the moved-methods table

use super::DexType;
use std::collections::BTreeMap;

/// (class name, method name, signature) identifying a method before it moved
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodTuple {
    pub class_name: String,
    pub method_name: String,
    pub signature: String,
}

impl MethodTuple {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            signature: signature.into(),
        }
    }
}

/// Original method → class that now hosts it (ordered, like the map it replaces)
pub type MethodMap = BTreeMap<MethodTuple, DexType>;
