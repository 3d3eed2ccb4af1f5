//! Global inliner configuration
//!
//! Read from the `inliner` section, or from the legacy `MethodInlinePass`
//! section when `inliner` is absent. Fields missing from the chosen section
//! keep their defaults.

use super::json_wrapper::JsonWrapper;
use crate::shared::models::{DexType, Scope};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Default upper bound on callee size (in instructions) considered for inlining
pub const DEFAULT_MAX_INLINE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlinerConfig {
    pub virtual_inline: bool,
    pub true_virtual_inline: bool,
    pub throws_inline: bool,
    pub throw_after_no_return: bool,
    pub enforce_method_size_limit: bool,
    pub multiple_callers: bool,
    pub inline_small_non_deletables: bool,
    pub use_cfg_inliner: bool,
    pub max_inline_size: usize,

    /// Class name prefixes whose methods are never inlined
    pub black_list: Vec<String>,
    /// Class name prefixes whose methods never receive inlined code
    pub caller_black_list: Vec<String>,
    pub no_inline_annos: Vec<String>,
    pub force_inline_annos: Vec<String>,

    // Resolved against the scope by `populate`
    #[serde(skip)]
    pub black_list_types: HashSet<DexType>,
    #[serde(skip)]
    pub caller_black_list_types: HashSet<DexType>,
    #[serde(skip)]
    pub no_inline_anno_types: HashSet<DexType>,
    #[serde(skip)]
    pub force_inline_anno_types: HashSet<DexType>,
    #[serde(skip)]
    populated: bool,
}

impl Default for InlinerConfig {
    fn default() -> Self {
        Self {
            virtual_inline: true,
            true_virtual_inline: false,
            throws_inline: false,
            throw_after_no_return: false,
            enforce_method_size_limit: true,
            multiple_callers: false,
            inline_small_non_deletables: true,
            use_cfg_inliner: false,
            max_inline_size: DEFAULT_MAX_INLINE_SIZE,
            black_list: Vec::new(),
            caller_black_list: Vec::new(),
            no_inline_annos: Vec::new(),
            force_inline_annos: Vec::new(),
            black_list_types: HashSet::new(),
            caller_black_list_types: HashSet::new(),
            no_inline_anno_types: HashSet::new(),
            force_inline_anno_types: HashSet::new(),
            populated: false,
        }
    }
}

impl InlinerConfig {
    /// Build from the top-level document, honoring the legacy section name
    pub fn from_config(json: &JsonWrapper) -> Self {
        let mut section = json.section("inliner");
        if section.is_empty() {
            section = json.section("MethodInlinePass");
        }
        if section.is_empty() {
            warn!("no inliner config, using defaults");
            return Self::default();
        }
        Self::from_section(&section)
    }

    /// Override defaults with whatever the section provides
    pub fn from_section(jw: &JsonWrapper) -> Self {
        let d = Self::default();
        Self {
            virtual_inline: jw.get("virtual", d.virtual_inline),
            true_virtual_inline: jw.get("true_virtual_inline", d.true_virtual_inline),
            throws_inline: jw.get("throws", d.throws_inline),
            throw_after_no_return: jw.get("throw_after_no_return", d.throw_after_no_return),
            enforce_method_size_limit: jw
                .get("enforce_method_size_limit", d.enforce_method_size_limit),
            multiple_callers: jw.get("multiple_callers", d.multiple_callers),
            inline_small_non_deletables: jw
                .get("inline_small_non_deletables", d.inline_small_non_deletables),
            use_cfg_inliner: jw.get("use_cfg_inliner", d.use_cfg_inliner),
            max_inline_size: jw.get("max_inline_size", d.max_inline_size),
            black_list: jw.get("black_list", Vec::new()),
            caller_black_list: jw.get("caller_black_list", Vec::new()),
            no_inline_annos: jw.get("no_inline_annos", Vec::new()),
            force_inline_annos: jw.get("force_inline_annos", Vec::new()),
            ..d
        }
    }

    /// Resolve name prefixes and annotation names against the scope
    ///
    /// Runs once; later calls are no-ops.
    pub fn populate(&mut self, scope: &Scope) {
        if self.populated {
            return;
        }
        for cls in scope.classes() {
            let name = cls.name();
            if self.black_list.iter().any(|prefix| name.starts_with(prefix.as_str())) {
                self.black_list_types.insert(cls.ty.clone());
            }
            if self
                .caller_black_list
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
            {
                self.caller_black_list_types.insert(cls.ty.clone());
            }
        }
        self.no_inline_anno_types = resolve_annos(scope, &self.no_inline_annos, "no_inline");
        self.force_inline_anno_types =
            resolve_annos(scope, &self.force_inline_annos, "force_inline");
        self.populated = true;
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }
}

fn resolve_annos(scope: &Scope, names: &[String], what: &str) -> HashSet<DexType> {
    names
        .iter()
        .filter_map(|name| {
            let ty = scope.resolve_type(name);
            if ty.is_none() {
                warn!(annotation = %name, what, "cannot find inliner annotation type");
            }
            ty
        })
        .collect()
}
