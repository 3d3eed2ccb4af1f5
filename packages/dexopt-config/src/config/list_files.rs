//! Auxiliary list file grammar
//!
//! Coldstart classes: whitespace-separated tokens, each
//! `[<index>:]<descriptor-or-class-file>`. A class file path `com/a/B.class`
//! becomes `Lcom/a/B;`; a descriptor `Lcom/a/B;` is taken as is. Tokens that
//! are not a type descriptor after normalization are skipped.
//!
//! Coldstart methods: one identifier per line, `[<index>:]<method>`. Blank
//! lines and `#` comments are skipped.
//!
//! Method weights: whitespace-separated `<method> <weight>` pairs; reading
//! stops at the first pair whose weight is not an unsigned integer.
//!
//! Class lists: a JSON object mapping list names to arrays of identifiers.

use super::proguard_map::ProguardMap;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

const CLASS_FILE_SUFFIX: &str = ".class";

/// Read an auxiliary file named by a config value
///
/// An empty name means "not configured" and touches nothing. Read failures
/// are logged and reported as `None`.
pub fn read_aux_file(path: &str, what: &str) -> Option<String> {
    if path.is_empty() {
        debug!(what, "no file configured");
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(what, path, error = %err, "cannot read auxiliary file, using empty set");
            None
        }
    }
}

/// Drop a leading `<digits>:` bytecode-index prefix
pub fn strip_index_prefix(token: &str) -> &str {
    match token.split_once(':') {
        Some((index, rest))
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest
        }
        _ => token,
    }
}

/// Normalize one coldstart class token to a type descriptor
pub fn class_token_to_descriptor(token: &str) -> Option<String> {
    let token = strip_index_prefix(token.trim());
    let descriptor = match token.strip_suffix(CLASS_FILE_SUFFIX) {
        Some(stem) => format!("L{stem};"),
        None => token.to_string(),
    };
    let well_formed = descriptor.len() > 2
        && descriptor.starts_with('L')
        && descriptor.ends_with(';')
        && !descriptor[1..descriptor.len() - 1].contains(';');
    well_formed.then_some(descriptor)
}

pub fn parse_coldstart_classes(text: &str, proguard_map: &ProguardMap) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|token| {
            let descriptor = class_token_to_descriptor(token);
            if descriptor.is_none() {
                warn!(token, "skipping invalid coldstart class entry");
            }
            descriptor
        })
        .map(|descriptor| proguard_map.translate_class(&descriptor))
        .collect()
}

pub fn parse_coldstart_methods(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| strip_index_prefix(line).trim())
        .filter(|method| !method.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_method_weights(text: &str) -> HashMap<String, u32> {
    let mut weights = HashMap::new();
    let mut tokens = text.split_whitespace();
    while let (Some(method), Some(weight)) = (tokens.next(), tokens.next()) {
        match weight.parse::<u32>() {
            Ok(weight) => {
                weights.insert(method.to_string(), weight);
            }
            Err(_) => {
                warn!(method, weight, "malformed method weight, ignoring the rest of the file");
                break;
            }
        }
    }
    weights
}

/// Parse the class lists document; list entries that are not strings are skipped
pub fn parse_class_lists(text: &str) -> HashMap<String, Vec<String>> {
    let root: Value = match serde_json::from_str(text) {
        Ok(root) => root,
        Err(err) => {
            warn!(error = %err, "failed to parse class lists, using none");
            return HashMap::new();
        }
    };
    let Some(object) = root.as_object() else {
        warn!("class lists file is not a JSON object, using none");
        return HashMap::new();
    };
    object
        .iter()
        .map(|(name, entries)| {
            let list = entries
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            (name.clone(), list)
        })
        .collect()
}
