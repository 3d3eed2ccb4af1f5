//! Canonical proguard rendering of keep rules
//!
//! `show_keep` turns one rule back into rule syntax; `show_configuration`
//! writes the whole configuration together with what each rule matched in a
//! scope. Output ordering is fixed: sections in declaration order, rules in
//! configuration order, matched classes and members sorted by name.

use super::matcher::{ClassMatch, ClassSpecMatcher, Hierarchy};
use crate::errors::Result;
use crate::features::keep_rules::domain::{
    ClassSpecification, KeepSpec, MemberSpecification, ProguardConfiguration,
};
use crate::shared::models::{descriptor_to_java, split_proto, AccessFlags, Scope};
use rayon::prelude::*;
use std::io::Write;
use tracing::debug;

const CLASS_FLAGS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "public"),
    (AccessFlags::FINAL, "final"),
    (AccessFlags::ABSTRACT, "abstract"),
    (AccessFlags::SYNTHETIC, "synthetic"),
];

const FIELD_FLAGS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "public"),
    (AccessFlags::PRIVATE, "private"),
    (AccessFlags::PROTECTED, "protected"),
    (AccessFlags::STATIC, "static"),
    (AccessFlags::FINAL, "final"),
    (AccessFlags::VOLATILE, "volatile"),
    (AccessFlags::TRANSIENT, "transient"),
    (AccessFlags::SYNTHETIC, "synthetic"),
    (AccessFlags::ENUM, "enum"),
];

const METHOD_FLAGS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "public"),
    (AccessFlags::PRIVATE, "private"),
    (AccessFlags::PROTECTED, "protected"),
    (AccessFlags::STATIC, "static"),
    (AccessFlags::FINAL, "final"),
    (AccessFlags::SYNCHRONIZED, "synchronized"),
    (AccessFlags::BRIDGE, "bridge"),
    (AccessFlags::VARARGS, "varargs"),
    (AccessFlags::NATIVE, "native"),
    (AccessFlags::ABSTRACT, "abstract"),
    (AccessFlags::STRICT, "strictfp"),
    (AccessFlags::SYNTHETIC, "synthetic"),
];

/// Render one keep rule; `show_source` appends ` # file:line` when known
pub fn show_keep(keep_rule: &KeepSpec, show_source: bool) -> String {
    let mut text = keep_directive(keep_rule).to_string();
    if keep_rule.includedescriptorclasses {
        text.push_str(",includedescriptorclasses");
    }
    if keep_rule.allowoptimization {
        text.push_str(",allowoptimization");
    }
    if keep_rule.allowobfuscation {
        text.push_str(",allowobfuscation");
    }
    text.push(' ');
    text.push_str(&show_class_spec(&keep_rule.class_spec));
    if show_source {
        append_source(&mut text, keep_rule);
    }
    text
}

/// `-keepnames` and friends are the `allowshrinking` forms
fn keep_directive(rule: &KeepSpec) -> &'static str {
    match (rule.mark_conditionally, rule.mark_classes, rule.allowshrinking) {
        (true, _, false) => "-keepclasseswithmembers",
        (true, _, true) => "-keepclasseswithmembernames",
        (false, true, false) => "-keep",
        (false, true, true) => "-keepnames",
        (false, false, false) => "-keepclassmembers",
        (false, false, true) => "-keepclassmembernames",
    }
}

fn append_source(text: &mut String, rule: &KeepSpec) {
    if let Some(source) = &rule.source {
        text.push_str(&format!(" # {}:{}", source.filename, source.line));
    }
}

fn show_access(
    out: &mut String,
    set: AccessFlags,
    unset: AccessFlags,
    table: &[(AccessFlags, &str)],
) {
    for (flag, name) in table {
        if set.contains(*flag) {
            out.push_str(name);
            out.push(' ');
        }
        if unset.contains(*flag) {
            out.push('!');
            out.push_str(name);
            out.push(' ');
        }
    }
}

fn class_keyword(spec: &ClassSpecification) -> String {
    let kinds = [
        (AccessFlags::ANNOTATION, "@interface"),
        (AccessFlags::INTERFACE, "interface"),
        (AccessFlags::ENUM, "enum"),
    ];
    for (flag, keyword) in kinds {
        if spec.set_access_flags.contains(flag) {
            return keyword.to_string();
        }
    }
    for (flag, keyword) in kinds {
        if spec.unset_access_flags.contains(flag) {
            return format!("!{keyword}");
        }
    }
    "class".to_string()
}

/// Render a class specification (everything after the directive)
pub fn show_class_spec(spec: &ClassSpecification) -> String {
    let mut text = String::new();
    if !spec.annotation_type.is_empty() {
        text.push_str(&format!("@{} ", spec.annotation_type));
    }
    show_access(&mut text, spec.set_access_flags, spec.unset_access_flags, CLASS_FLAGS);
    text.push_str(&class_keyword(spec));
    text.push(' ');
    text.push_str(&spec.class_name);
    if !spec.extends_class_name.is_empty() {
        text.push(' ');
        text.push_str(spec.inheritance.keyword());
        text.push(' ');
        if !spec.extends_annotation_type.is_empty() {
            text.push_str(&format!("@{} ", spec.extends_annotation_type));
        }
        text.push_str(&spec.extends_class_name);
    }
    text.push_str(" {");
    for field in &spec.field_specifications {
        text.push(' ');
        text.push_str(&show_field(field));
        text.push(';');
    }
    for method in &spec.method_specifications {
        text.push(' ');
        text.push_str(&show_method(method));
        text.push(';');
    }
    text.push_str(" }");
    text
}

fn member_prefix(member: &MemberSpecification, table: &[(AccessFlags, &str)]) -> String {
    let mut text = String::new();
    if !member.annotation_type.is_empty() {
        text.push_str(&format!("@{} ", member.annotation_type));
    }
    show_access(
        &mut text,
        member.required_set_access_flags,
        member.required_unset_access_flags,
        table,
    );
    text
}

fn show_field(field: &MemberSpecification) -> String {
    let mut text = member_prefix(field, FIELD_FLAGS);
    if !field.descriptor.is_empty() {
        text.push_str(&descriptor_to_java(&field.descriptor));
        text.push(' ');
    }
    text.push_str(&field.name);
    text
}

fn show_method(method: &MemberSpecification) -> String {
    let mut text = member_prefix(method, METHOD_FLAGS);
    let Some((args, ret)) = split_proto(&method.descriptor) else {
        text.push_str(&method.name);
        return text;
    };
    let initializer = method.name == "<init>" || method.name == "<clinit>";
    if !initializer {
        text.push_str(&descriptor_to_java(&ret));
        text.push(' ');
    }
    let args: Vec<String> = args.iter().map(|a| descriptor_to_java(a)).collect();
    text.push_str(&format!("{}({})", method.name, args.join(",")));
    text
}

fn show_rule(directive: &str, rule: &KeepSpec) -> String {
    let mut text = format!("{} {}", directive, show_class_spec(&rule.class_spec));
    append_source(&mut text, rule);
    text
}

fn matches_in_scope(rule: &KeepSpec, scope: &Scope, hierarchy: &Hierarchy<'_>) -> Vec<ClassMatch> {
    let matcher = ClassSpecMatcher::new(&rule.class_spec);
    let mut matched: Vec<ClassMatch> = scope
        .classes()
        .par_iter()
        .filter_map(|cls| matcher.match_class(cls, hierarchy, rule.mark_conditionally))
        .collect();
    matched.sort_by(|a, b| a.class_name.cmp(&b.class_name));
    matched
}

/// Write the configuration and, under each rule, the classes it matched
pub fn show_configuration<W: Write>(
    output: &mut W,
    scope: &Scope,
    config: &ProguardConfiguration,
) -> Result<()> {
    let hierarchy = Hierarchy::new(scope);

    let switches = [
        (!config.shrink, "-dontshrink"),
        (!config.optimize, "-dontoptimize"),
        (!config.obfuscate, "-dontobfuscate"),
        (config.allowaccessmodification, "-allowaccessmodification"),
    ];
    writeln!(output, "# Options")?;
    for (enabled, switch) in switches {
        if enabled {
            writeln!(output, "{switch}")?;
        }
    }

    let sections: [(&str, Option<&str>, &[KeepSpec]); 3] = [
        ("keep", None, &config.keep_rules),
        ("assumenosideeffects", Some("-assumenosideeffects"), &config.assumenosideeffects_rules),
        ("whyareyoukeeping", Some("-whyareyoukeeping"), &config.whyareyoukeeping_rules),
    ];
    for (title, directive, rules) in sections {
        writeln!(output, "# {} rules ({})", title, rules.len())?;
        for rule in rules {
            let line = match directive {
                Some(directive) => show_rule(directive, rule),
                None => show_keep(rule, true),
            };
            writeln!(output, "{line}")?;

            let matched = matches_in_scope(rule, scope, &hierarchy);
            debug!(rule = %line, classes = matched.len(), "matched keep rule");
            for class_match in matched {
                writeln!(output, "#   matched: {}", class_match.class_name)?;
                for member in class_match.members {
                    writeln!(output, "#     {member}")?;
                }
            }
        }
    }
    Ok(())
}
