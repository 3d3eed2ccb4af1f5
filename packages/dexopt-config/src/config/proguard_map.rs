//! Proguard mapping file reader
//!
//! Format:
//! ```text
//! com.example.Foo -> a.a:
//!     int count -> a
//!     1:4:void run(int,java.lang.String):10:13 -> b
//! ```
//!
//! All keys and values are kept in internal form:
//! classes as descriptors (`Lcom/example/Foo;`), fields as
//! `Lcls;.name:Ltype;`, methods as `Lcls;.name:(args)ret`. Member types on
//! the obfuscated side are translated through the class map.

use crate::shared::models::java_to_descriptor;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Member line before class translation has been applied
struct PendingMember {
    class: String,
    name: String,
    new_name: String,
    /// Java field type, or (args, return) for methods
    kind: PendingKind,
}

enum PendingKind {
    Field(String),
    Method(Vec<String>, String),
}

#[derive(Debug, Clone, Default)]
pub struct ProguardMap {
    class_map: HashMap<String, String>,
    reverse_class_map: HashMap<String, String>,
    field_map: HashMap<String, String>,
    method_map: HashMap<String, String>,
}

impl ProguardMap {
    /// Load a mapping file; an empty path or unreadable file gives an empty map
    pub fn from_path(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let map = Self::parse(&text);
                debug!(path, classes = map.class_map.len(), "loaded proguard map");
                map
            }
            Err(err) => {
                warn!(path, error = %err, "cannot read proguard map, names are not translated");
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut map = Self::default();
        let mut pending = Vec::new();
        let mut current_class: Option<String> = None;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = trimmed.split_once(" -> ") else {
                warn!(line = trimmed, "unrecognized proguard map line");
                continue;
            };
            let indented = line.starts_with(char::is_whitespace);
            if !indented {
                let original = java_to_descriptor(lhs.trim());
                let renamed = java_to_descriptor(rhs.trim().trim_end_matches(':'));
                map.reverse_class_map
                    .insert(renamed.clone(), original.clone());
                map.class_map.insert(original.clone(), renamed);
                current_class = Some(original);
            } else if let Some(class) = &current_class {
                match parse_member(lhs.trim()) {
                    Some((name, kind)) => pending.push(PendingMember {
                        class: class.clone(),
                        name,
                        new_name: rhs.trim().to_string(),
                        kind,
                    }),
                    None => warn!(line = trimmed, "unrecognized proguard member line"),
                }
            }
        }

        for member in pending {
            map.add_member(member);
        }
        map
    }

    fn add_member(&mut self, member: PendingMember) {
        let new_class = self.translate_class(&member.class);
        match member.kind {
            PendingKind::Field(ty) => {
                let ty = java_to_descriptor(&ty);
                let key = format!("{}.{}:{}", member.class, member.name, ty);
                let value = format!(
                    "{}.{}:{}",
                    new_class,
                    member.new_name,
                    self.translate_type(&ty)
                );
                self.field_map.insert(key, value);
            }
            PendingKind::Method(args, ret) => {
                let args: Vec<String> = args.iter().map(|a| java_to_descriptor(a)).collect();
                let ret = java_to_descriptor(&ret);
                let key = format!("{}.{}:({}){}", member.class, member.name, args.concat(), ret);
                let new_args: String = args.iter().map(|a| self.translate_type(a)).collect();
                let value = format!(
                    "{}.{}:({}){}",
                    new_class,
                    member.new_name,
                    new_args,
                    self.translate_type(&ret)
                );
                self.method_map.insert(key, value);
            }
        }
    }

    /// Translate a type descriptor, looking through array dimensions
    fn translate_type(&self, descriptor: &str) -> String {
        let element = descriptor.trim_start_matches('[');
        let dims = descriptor.len() - element.len();
        format!("{}{}", &descriptor[..dims], self.translate_class(element))
    }

    /// Obfuscated name of a class; unknown classes map to themselves
    pub fn translate_class(&self, descriptor: &str) -> String {
        self.class_map
            .get(descriptor)
            .cloned()
            .unwrap_or_else(|| descriptor.to_string())
    }

    /// Original name of an obfuscated class; unknown classes map to themselves
    pub fn deobfuscate_class(&self, descriptor: &str) -> String {
        self.reverse_class_map
            .get(descriptor)
            .cloned()
            .unwrap_or_else(|| descriptor.to_string())
    }

    pub fn translate_field(&self, field: &str) -> String {
        self.field_map
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }

    pub fn translate_method(&self, method: &str) -> String {
        self.method_map
            .get(method)
            .cloned()
            .unwrap_or_else(|| method.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.class_map.is_empty()
    }
}

/// Parse `type name` or `[a:b:]ret name(args)[:c:d]`
fn parse_member(text: &str) -> Option<(String, PendingKind)> {
    // Leading line-number range
    let mut text = text;
    while let Some((prefix, rest)) = text.split_once(':') {
        if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
            text = rest;
        } else {
            break;
        }
    }

    let (ty, rest) = text.split_once(' ')?;
    let rest = rest.trim();
    match rest.find('(') {
        Some(open) => {
            let close = open + rest[open..].find(')')?;
            let name = rest[..open].to_string();
            let args = rest[open + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();
            Some((name, PendingKind::Method(args, ty.to_string())))
        }
        None => Some((rest.to_string(), PendingKind::Field(ty.to_string()))),
    }
}
