//! Matching class specifications against a scope

use super::pattern::NamePattern;
use crate::features::keep_rules::domain::{ClassSpecification, MemberSpecification};
use crate::shared::models::{
    descriptor_to_java, split_proto, AccessFlags, DexClass, DexMember, DexType, Scope,
};
use std::collections::{HashMap, HashSet};

const INIT: &str = "<init>";
const CLINIT: &str = "<clinit>";
const ALL_FIELDS: &str = "<fields>";
const ALL_METHODS: &str = "<methods>";

/// Supertype lookup over the classes defined in a scope
pub struct Hierarchy<'a> {
    classes: HashMap<&'a DexType, &'a DexClass>,
}

impl<'a> Hierarchy<'a> {
    pub fn new(scope: &'a Scope) -> Self {
        Self {
            classes: scope.classes().iter().map(|cls| (&cls.ty, cls)).collect(),
        }
    }

    pub fn get(&self, ty: &DexType) -> Option<&'a DexClass> {
        self.classes.get(ty).copied()
    }

    /// All supertypes reachable from `cls`, nearest first
    ///
    /// Types outside the scope are reported but not expanded further.
    pub fn supertypes(&self, cls: &'a DexClass) -> Vec<&'a DexType> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut queue: Vec<&'a DexType> = cls.supertypes().collect();
        let mut next = 0;
        while next < queue.len() {
            let ty = queue[next];
            next += 1;
            if !seen.insert(ty) {
                continue;
            }
            out.push(ty);
            if let Some(parent) = self.get(ty) {
                queue.extend(parent.supertypes());
            }
        }
        out
    }
}

/// A class matched by a rule, with the members its member patterns selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch {
    pub class_name: String,
    /// `name:descriptor`, sorted
    pub members: Vec<String>,
}

struct MemberMatcher {
    spec_name: String,
    name: NamePattern,
    annotation: Option<NamePattern>,
    set: AccessFlags,
    unset: AccessFlags,
    descriptor: String,
}

impl MemberMatcher {
    fn new(spec: &MemberSpecification) -> Self {
        Self {
            spec_name: spec.name.clone(),
            name: NamePattern::member_name(&spec.name),
            annotation: optional_pattern(&spec.annotation_type),
            set: spec.required_set_access_flags,
            unset: spec.required_unset_access_flags,
            descriptor: spec.descriptor.clone(),
        }
    }

    fn matches_name(&self, member: &DexMember, is_method: bool) -> bool {
        let initializer = member.name == INIT || member.name == CLINIT;
        match self.spec_name.as_str() {
            ALL_FIELDS => !is_method,
            ALL_METHODS | "*" if is_method => !initializer,
            "*" => true,
            _ => self.name.matches(&member.name),
        }
    }

    fn matches(&self, member: &DexMember, is_method: bool) -> bool {
        self.matches_name(member, is_method)
            && access_matches(member.access, self.set, self.unset)
            && annotations_match(self.annotation.as_ref(), &member.annotations)
            && self.matches_descriptor(&member.descriptor, is_method)
    }

    fn matches_descriptor(&self, descriptor: &str, is_method: bool) -> bool {
        if self.descriptor.is_empty() {
            return true;
        }
        if !is_method {
            return type_matches(&self.descriptor, descriptor);
        }
        let (Some((want_args, want_ret)), Some((args, ret))) =
            (split_proto(&self.descriptor), split_proto(descriptor))
        else {
            return false;
        };
        if !type_matches(&want_ret, &ret) {
            return false;
        }
        if want_args.len() == 1 && want_args[0] == "..." {
            return true;
        }
        want_args.len() == args.len()
            && want_args
                .iter()
                .zip(&args)
                .all(|(want, have)| type_matches(want, have))
    }
}

fn type_matches(pattern: &str, descriptor: &str) -> bool {
    NamePattern::class_name(&descriptor_to_java(pattern)).matches(&descriptor_to_java(descriptor))
}

fn optional_pattern(text: &str) -> Option<NamePattern> {
    (!text.is_empty()).then(|| NamePattern::class_name(text))
}

fn access_matches(flags: AccessFlags, set: AccessFlags, unset: AccessFlags) -> bool {
    flags.contains(set) && !flags.intersects(unset)
}

fn annotations_match(pattern: Option<&NamePattern>, annotations: &[DexType]) -> bool {
    match pattern {
        None => true,
        Some(p) => annotations.iter().any(|anno| p.matches(&anno.java_name())),
    }
}

/// Compiled form of a `ClassSpecification`
pub struct ClassSpecMatcher {
    class_name: NamePattern,
    annotation: Option<NamePattern>,
    extends: Option<NamePattern>,
    extends_annotation: Option<NamePattern>,
    set: AccessFlags,
    unset: AccessFlags,
    fields: Vec<MemberMatcher>,
    methods: Vec<MemberMatcher>,
}

impl ClassSpecMatcher {
    pub fn new(spec: &ClassSpecification) -> Self {
        Self {
            class_name: NamePattern::class_name(&spec.class_name),
            annotation: optional_pattern(&spec.annotation_type),
            extends: optional_pattern(&spec.extends_class_name),
            extends_annotation: optional_pattern(&spec.extends_annotation_type),
            set: spec.set_access_flags,
            unset: spec.unset_access_flags,
            fields: spec.field_specifications.iter().map(MemberMatcher::new).collect(),
            methods: spec.method_specifications.iter().map(MemberMatcher::new).collect(),
        }
    }

    /// Does the class itself satisfy the specification (members aside)?
    pub fn matches_class(&self, cls: &DexClass, hierarchy: &Hierarchy<'_>) -> bool {
        self.class_name.matches(&cls.java_name())
            && access_matches(cls.access, self.set, self.unset)
            && annotations_match(self.annotation.as_ref(), &cls.annotations)
            && self.matches_extends(cls, hierarchy)
    }

    fn matches_extends(&self, cls: &DexClass, hierarchy: &Hierarchy<'_>) -> bool {
        let Some(extends) = &self.extends else {
            return true;
        };
        let Some(cls) = hierarchy.get(&cls.ty) else {
            return cls
                .supertypes()
                .any(|ty| extends.matches(&ty.java_name()) && self.extends_annotation.is_none());
        };
        hierarchy.supertypes(cls).into_iter().any(|ty| {
            extends.matches(&ty.java_name())
                && match &self.extends_annotation {
                    None => true,
                    Some(anno) => hierarchy
                        .get(ty)
                        .is_some_and(|parent| annotations_match(Some(anno), &parent.annotations)),
                }
        })
    }

    /// Match a class and select its members
    ///
    /// With `require_members`, every member pattern must select at least one
    /// member or the class is rejected.
    pub fn match_class(
        &self,
        cls: &DexClass,
        hierarchy: &Hierarchy<'_>,
        require_members: bool,
    ) -> Option<ClassMatch> {
        if !self.matches_class(cls, hierarchy) {
            return None;
        }
        let mut members = Vec::new();
        let groups = [(&self.fields, &cls.fields, false), (&self.methods, &cls.methods, true)];
        for (matchers, candidates, is_method) in groups {
            for matcher in matchers.iter() {
                let before = members.len();
                members.extend(
                    candidates
                        .iter()
                        .filter(|m| matcher.matches(m, is_method))
                        .map(|m| format!("{}:{}", m.name, m.descriptor)),
                );
                if require_members && members.len() == before {
                    return None;
                }
            }
        }
        members.sort();
        members.dedup();
        Some(ClassMatch {
            class_name: cls.java_name(),
            members,
        })
    }
}
