//! Proguard name wildcards
//!
//! Class names: `?` one character other than `.`, `*` any run without `.`,
//! `**` (or more) anything. Member names: `?` and `*` match any character.
//! `%` matches a primitive type. A pattern may list comma separated
//! alternatives; the first alternative that matches decides, and a leading
//! `!` turns that decision into a rejection.

use regex::Regex;
use tracing::warn;

const PRIMITIVE_ALTERNATION: &str = "(?:boolean|byte|char|short|int|long|float|double|void)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    ClassName,
    MemberName,
}

#[derive(Debug, Clone)]
struct Alternative {
    negated: bool,
    /// `None` if the pattern failed to compile; never matches
    regex: Option<Regex>,
}

#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    alternatives: Vec<Alternative>,
}

impl NamePattern {
    /// Pattern over java class or type names
    pub fn class_name(pattern: &str) -> Self {
        Self::compile(pattern, Flavor::ClassName)
    }

    /// Pattern over field or method names
    pub fn member_name(pattern: &str) -> Self {
        Self::compile(pattern, Flavor::MemberName)
    }

    fn compile(pattern: &str, flavor: Flavor) -> Self {
        let alternatives = pattern
            .split(',')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(|alt| {
                let (negated, body) = match alt.strip_prefix('!') {
                    Some(body) => (true, body),
                    None => (false, alt),
                };
                let regex = match Regex::new(&to_regex(body, flavor)) {
                    Ok(regex) => Some(regex),
                    Err(err) => {
                        warn!(pattern = alt, error = %err, "unusable name pattern");
                        None
                    }
                };
                Alternative { negated, regex }
            })
            .collect();
        Self {
            source: pattern.to_string(),
            alternatives,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        for alt in &self.alternatives {
            if alt.regex.as_ref().is_some_and(|re| re.is_match(name)) {
                return !alt.negated;
            }
        }
        false
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn to_regex(pattern: &str, flavor: Flavor) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                let run = chars[i..].iter().take_while(|c| **c == '*').count();
                let any = flavor == Flavor::MemberName || run > 1;
                out.push_str(if any { ".*" } else { "[^.]*" });
                i += run;
                continue;
            }
            '?' => out.push_str(match flavor {
                Flavor::ClassName => "[^.]",
                Flavor::MemberName => ".",
            }),
            '%' => out.push_str(PRIMITIVE_ALTERNATION),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}
