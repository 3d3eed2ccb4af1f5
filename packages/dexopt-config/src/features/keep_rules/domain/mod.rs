//! Keep rule domain model
//!
//! Class and annotation names are kept as written in the rule file (java
//! spelling, wildcards allowed). Member descriptors use the internal form
//! (`I`, `(Ljava/lang/String;)V`); an empty descriptor matches any type.

use crate::shared::models::AccessFlags;
use serde::{Deserialize, Serialize};

/// Field or method pattern inside a class specification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberSpecification {
    pub required_set_access_flags: AccessFlags,
    pub required_unset_access_flags: AccessFlags,
    pub annotation_type: String,
    /// Member name pattern, or `<init>`, `<fields>`, `<methods>`, `*`
    pub name: String,
    pub descriptor: String,
}

impl MemberSpecification {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            ..Self::default()
        }
    }

    pub fn with_access(mut self, set: AccessFlags, unset: AccessFlags) -> Self {
        self.required_set_access_flags = set;
        self.required_unset_access_flags = unset;
        self
    }

    pub fn with_annotation(mut self, annotation_type: impl Into<String>) -> Self {
        self.annotation_type = annotation_type.into();
        self
    }
}

/// Keyword used for the supertype clause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inheritance {
    #[default]
    Extends,
    Implements,
}

impl Inheritance {
    pub fn keyword(self) -> &'static str {
        match self {
            Inheritance::Extends => "extends",
            Inheritance::Implements => "implements",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassSpecification {
    /// Class name pattern; comma separated alternatives, `!` negates
    pub class_name: String,
    pub set_access_flags: AccessFlags,
    pub unset_access_flags: AccessFlags,
    pub annotation_type: String,
    pub extends_class_name: String,
    pub extends_annotation_type: String,
    pub inheritance: Inheritance,
    pub field_specifications: Vec<MemberSpecification>,
    pub method_specifications: Vec<MemberSpecification>,
}

impl ClassSpecification {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    pub fn with_access(mut self, set: AccessFlags, unset: AccessFlags) -> Self {
        self.set_access_flags = set;
        self.unset_access_flags = unset;
        self
    }

    pub fn with_annotation(mut self, annotation_type: impl Into<String>) -> Self {
        self.annotation_type = annotation_type.into();
        self
    }

    pub fn extending(mut self, inheritance: Inheritance, class_name: impl Into<String>) -> Self {
        self.inheritance = inheritance;
        self.extends_class_name = class_name.into();
        self
    }

    pub fn with_field(mut self, field: MemberSpecification) -> Self {
        self.field_specifications.push(field);
        self
    }

    pub fn with_method(mut self, method: MemberSpecification) -> Self {
        self.method_specifications.push(method);
        self
    }

    pub fn has_members(&self) -> bool {
        !self.field_specifications.is_empty() || !self.method_specifications.is_empty()
    }
}

/// Rule file location a rule came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSource {
    pub filename: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepSpec {
    /// Keep the matched classes themselves (`-keep` rather than `-keepclassmembers`)
    pub mark_classes: bool,
    /// Only keep classes that have all listed members (`-keepclasseswithmembers`)
    pub mark_conditionally: bool,
    pub allowshrinking: bool,
    pub allowoptimization: bool,
    pub allowobfuscation: bool,
    pub includedescriptorclasses: bool,
    pub class_spec: ClassSpecification,
    pub source: Option<RuleSource>,
}

impl Default for KeepSpec {
    fn default() -> Self {
        Self {
            mark_classes: true,
            mark_conditionally: false,
            allowshrinking: false,
            allowoptimization: false,
            allowobfuscation: false,
            includedescriptorclasses: false,
            class_spec: ClassSpecification::default(),
            source: None,
        }
    }
}

impl KeepSpec {
    /// Plain `-keep` rule for a class specification
    pub fn keep(class_spec: ClassSpecification) -> Self {
        Self {
            class_spec,
            ..Self::default()
        }
    }

    /// `-keepclassmembers` rule
    pub fn keep_class_members(class_spec: ClassSpecification) -> Self {
        Self {
            mark_classes: false,
            class_spec,
            ..Self::default()
        }
    }

    /// `-keepclasseswithmembers` rule
    pub fn keep_classes_with_members(class_spec: ClassSpecification) -> Self {
        Self {
            mark_conditionally: true,
            class_spec,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.source = Some(RuleSource {
            filename: filename.into(),
            line,
        });
        self
    }
}

/// Resolved proguard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProguardConfiguration {
    pub keep_rules: Vec<KeepSpec>,
    pub assumenosideeffects_rules: Vec<KeepSpec>,
    pub whyareyoukeeping_rules: Vec<KeepSpec>,
    pub shrink: bool,
    pub optimize: bool,
    pub obfuscate: bool,
    pub allowaccessmodification: bool,
}

impl Default for ProguardConfiguration {
    fn default() -> Self {
        Self {
            keep_rules: Vec::new(),
            assumenosideeffects_rules: Vec::new(),
            whyareyoukeeping_rules: Vec::new(),
            shrink: true,
            optimize: true,
            obfuscate: true,
            allowaccessmodification: false,
        }
    }
}
