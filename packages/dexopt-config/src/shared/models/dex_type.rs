//! Type identities and descriptor/java name conversion

use std::fmt;
use std::sync::Arc;

/// Interned type identity, keyed by its internal descriptor (`Lcom/foo/Bar;`)
///
/// Two `DexType`s are the same type iff their descriptors are equal. Cloning
/// is cheap (shared string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DexType(Arc<str>);

impl DexType {
    /// Create a type from an internal descriptor
    pub fn new(descriptor: impl AsRef<str>) -> Self {
        Self(Arc::from(descriptor.as_ref()))
    }

    /// Create a type from a java name (`com.foo.Bar`, `int[]`)
    pub fn from_java(name: &str) -> Self {
        Self::new(java_to_descriptor(name))
    }

    /// Internal descriptor
    pub fn descriptor(&self) -> &str {
        &self.0
    }

    /// External java name
    pub fn java_name(&self) -> String {
        descriptor_to_java(&self.0)
    }
}

impl fmt::Display for DexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn primitive_to_java(c: char) -> Option<&'static str> {
    Some(match c {
        'V' => "void",
        'Z' => "boolean",
        'B' => "byte",
        'S' => "short",
        'C' => "char",
        'I' => "int",
        'J' => "long",
        'F' => "float",
        'D' => "double",
        _ => return None,
    })
}

fn java_to_primitive(name: &str) -> Option<char> {
    Some(match name {
        "void" => 'V',
        "boolean" => 'Z',
        "byte" => 'B',
        "short" => 'S',
        "char" => 'C',
        "int" => 'I',
        "long" => 'J',
        "float" => 'F',
        "double" => 'D',
        _ => return None,
    })
}

/// Convert an internal descriptor to its java spelling
///
/// Anything that is not a well-formed descriptor is returned unchanged, so
/// wildcard patterns such as `***` survive the conversion.
pub fn descriptor_to_java(descriptor: &str) -> String {
    let dims = descriptor.chars().take_while(|c| *c == '[').count();
    let element = &descriptor[dims..];
    let mut name = if element.len() == 1 {
        match element.chars().next().and_then(primitive_to_java) {
            Some(prim) => prim.to_string(),
            None => element.to_string(),
        }
    } else if element.starts_with('L') && element.ends_with(';') && element.len() > 2 {
        element[1..element.len() - 1].replace('/', ".")
    } else {
        element.to_string()
    };
    for _ in 0..dims {
        name.push_str("[]");
    }
    name
}

/// Convert a java type name to its internal descriptor
pub fn java_to_descriptor(name: &str) -> String {
    let mut element = name.trim();
    let mut dims = 0;
    while let Some(stripped) = element.strip_suffix("[]") {
        element = stripped;
        dims += 1;
    }
    let mut descriptor = "[".repeat(dims);
    match java_to_primitive(element) {
        Some(prim) => descriptor.push(prim),
        None => {
            descriptor.push('L');
            descriptor.push_str(&element.replace('.', "/"));
            descriptor.push(';');
        }
    }
    descriptor
}

/// Split a method prototype `(args)ret` into argument and return descriptors
///
/// Besides real descriptors this accepts the wildcard tokens used in keep
/// rules: `...` (any argument list) and runs of `*`.
pub fn split_proto(proto: &str) -> Option<(Vec<String>, String)> {
    let rest = proto.strip_prefix('(')?;
    let (args_text, ret) = rest.split_once(')')?;
    let mut args = Vec::new();
    let mut remaining = args_text;
    while !remaining.is_empty() {
        let len = next_descriptor_len(remaining)?;
        args.push(remaining[..len].to_string());
        remaining = &remaining[len..];
    }
    Some((args, ret.to_string()))
}

fn next_descriptor_len(text: &str) -> Option<usize> {
    if text.starts_with("...") {
        return Some(3);
    }
    let dims = text.bytes().take_while(|b| *b == b'[').count();
    let element = &text[dims..];
    let len = match element.bytes().next()? {
        b'L' => element.find(';')? + 1,
        b'*' => element.bytes().take_while(|b| *b == b'*').count(),
        _ => element.chars().next()?.len_utf8(),
    };
    Some(dims + len)
}
