//! ConfigFiles: the configuration store handed to every pass
//!
//! Read-mostly. Scalar settings are read at construction, scope-dependent
//! data during `load`, and the auxiliary list files on first request. Each
//! lazily loaded set sits behind a `OnceCell`, so it is computed at most once
//! even when the file yields nothing.

use super::error::{ConfigError, ConfigResult};
use super::inliner::InlinerConfig;
use super::json_wrapper::JsonWrapper;
use super::list_files::{
    parse_class_lists, parse_coldstart_classes, parse_coldstart_methods, parse_method_weights,
    read_aux_file,
};
use super::move_registry::MoveRegistry;
use super::proguard_map::ProguardMap;
use crate::shared::models::{DexType, MethodMap, MethodTuple, Scope};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Top-level keys read by `ConfigFiles`
pub mod keys {
    pub const COLDSTART_CLASSES: &str = "coldstart_classes";
    pub const COLDSTART_METHODS: &str = "coldstart_methods";
    pub const CLASS_LISTS: &str = "class_lists";
    pub const PROFILED_METHODS_FILE: &str = "profiled_methods_file";
    pub const METHOD_SORTING_WHITELISTED_SUBSTRINGS: &str = "method_sorting_whitelisted_substrings";
    pub const NO_OPTIMIZATIONS_ANNOTATIONS: &str = "no_optimizations_annotations";
    pub const PROGUARD_MAP: &str = "proguard_map";
    pub const PRINTSEEDS: &str = "printseeds";
    pub const INSTRUCTION_SIZE_BITWIDTH_LIMIT: &str = "instruction_size_bitwidth_limit";
}

/// Class list derived from the coldstart classes whenever class lists are loaded
pub const SECONDARY_DEX_HEAD_LIST: &str = "secondary_dex_head.list";

/// Bitwidth limits must leave room in a 32-bit instruction count
const MAX_BITWIDTH_LIMIT: u32 = 32;

#[derive(Debug)]
pub struct ConfigFiles {
    json: JsonWrapper,
    outdir: String,
    proguard_map: ProguardMap,

    coldstart_class_filename: String,
    coldstart_method_filename: String,
    profiled_methods_filename: String,
    class_lists_filename: String,
    /// Filename to dump computed seeds
    printseeds: String,
    /// Output instruction size of any method is limited to 2^n; 0 = no limit
    instruction_size_bitwidth_limit: u32,

    // Lazily loaded on first request
    coldstart_classes: OnceCell<Vec<String>>,
    coldstart_methods: OnceCell<Vec<String>>,
    class_lists: OnceCell<HashMap<String, Vec<String>>>,
    inliner_config: OnceCell<InlinerConfig>,

    // Populated by `load`
    loaded: bool,
    method_to_weight: HashMap<String, u32>,
    method_sorting_whitelisted_substrings: HashSet<String>,
    no_optimizations_annos: HashSet<DexType>,

    moves: MoveRegistry,
}

impl ConfigFiles {
    pub fn new(config: Value) -> Self {
        Self::with_outdir(config, "")
    }

    pub fn with_outdir(config: Value, outdir: impl Into<String>) -> Self {
        let json = JsonWrapper::new(config);

        let mut limit = json.get(keys::INSTRUCTION_SIZE_BITWIDTH_LIMIT, 0u32);
        if limit >= MAX_BITWIDTH_LIMIT {
            warn!(limit, "instruction_size_bitwidth_limit must be below 32, ignoring it");
            limit = 0;
        }

        Self {
            proguard_map: ProguardMap::from_path(&json.get_string(keys::PROGUARD_MAP, "")),
            coldstart_class_filename: json.get_string(keys::COLDSTART_CLASSES, ""),
            coldstart_method_filename: json.get_string(keys::COLDSTART_METHODS, ""),
            profiled_methods_filename: json.get_string(keys::PROFILED_METHODS_FILE, ""),
            class_lists_filename: json.get_string(keys::CLASS_LISTS, ""),
            printseeds: json.get_string(keys::PRINTSEEDS, ""),
            instruction_size_bitwidth_limit: limit,
            json,
            outdir: outdir.into(),
            coldstart_classes: OnceCell::new(),
            coldstart_methods: OnceCell::new(),
            class_lists: OnceCell::new(),
            inliner_config: OnceCell::new(),
            loaded: false,
            method_to_weight: HashMap::new(),
            method_sorting_whitelisted_substrings: HashSet::new(),
            no_optimizations_annos: HashSet::new(),
            moves: MoveRegistry::new(),
        }
    }

    /// Parse the configuration document from a file
    ///
    /// Unlike every other input, the document itself is required.
    pub fn from_path(path: impl AsRef<Path>, outdir: impl Into<String>) -> ConfigResult<Self> {
        let json = JsonWrapper::from_path(path)?;
        Ok(Self::with_outdir(json.as_value().clone(), outdir))
    }

    /// Load everything that needs the initial scope
    ///
    /// Expected once per run, before passes execute; repeated calls are
    /// ignored.
    pub fn load(&mut self, scope: &Scope) {
        if self.loaded {
            warn!("ConfigFiles::load called more than once, ignoring");
            return;
        }

        self.method_to_weight = read_aux_file(&self.profiled_methods_filename, "method weights")
            .map(|text| parse_method_weights(&text))
            .unwrap_or_default();
        self.method_sorting_whitelisted_substrings = self
            .json
            .get(keys::METHOD_SORTING_WHITELISTED_SUBSTRINGS, HashSet::new());
        self.no_optimizations_annos = self.resolve_no_optimizations_annos(scope);

        let json = &self.json;
        self.inliner_config
            .get_or_init(|| InlinerConfig::from_config(json));
        if let Some(inliner) = self.inliner_config.get_mut() {
            inliner.populate(scope);
        }

        self.loaded = true;
        info!(
            classes = scope.len(),
            weights = self.method_to_weight.len(),
            no_opt_annos = self.no_optimizations_annos.len(),
            "configuration loaded"
        );
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn resolve_no_optimizations_annos(&self, scope: &Scope) -> HashSet<DexType> {
        let names: Vec<String> = self
            .json
            .get(keys::NO_OPTIMIZATIONS_ANNOTATIONS, Vec::new());
        names
            .iter()
            .filter_map(|name| {
                let ty = scope.resolve_type(name);
                if ty.is_none() {
                    warn!(annotation = %name, "cannot find no_optimizations annotation type");
                }
                ty
            })
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lazily loaded lists
    // ═══════════════════════════════════════════════════════════════════════

    pub fn get_coldstart_classes(&self) -> &[String] {
        self.coldstart_classes.get_or_init(|| {
            let classes = read_aux_file(&self.coldstart_class_filename, "coldstart classes")
                .map(|text| parse_coldstart_classes(&text, &self.proguard_map))
                .unwrap_or_default();
            debug!(count = classes.len(), "loaded coldstart classes");
            classes
        })
    }

    pub fn get_coldstart_methods(&self) -> &[String] {
        self.coldstart_methods.get_or_init(|| {
            let methods = read_aux_file(&self.coldstart_method_filename, "coldstart methods")
                .map(|text| parse_coldstart_methods(&text))
                .unwrap_or_default();
            debug!(count = methods.len(), "loaded coldstart methods");
            methods
        })
    }

    pub fn ensure_class_lists_loaded(&self) {
        self.class_lists();
    }

    pub fn get_all_class_lists(&self) -> &HashMap<String, Vec<String>> {
        self.class_lists()
    }

    pub fn has_class_list(&self, name: &str) -> bool {
        self.class_lists().contains_key(name)
    }

    /// Entries of a named class list, in file order
    ///
    /// Asking for a list that was never configured is a caller error.
    pub fn get_class_list(&self, name: &str) -> ConfigResult<&[String]> {
        self.class_lists()
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::unknown_class_list(name))
    }

    fn class_lists(&self) -> &HashMap<String, Vec<String>> {
        self.class_lists.get_or_init(|| {
            let Some(text) = read_aux_file(&self.class_lists_filename, "class lists") else {
                return HashMap::new();
            };
            let mut lists = parse_class_lists(&text);
            lists.insert(
                SECONDARY_DEX_HEAD_LIST.to_string(),
                self.get_coldstart_classes().to_vec(),
            );
            debug!(count = lists.len(), "loaded class lists");
            lists
        })
    }

    /// Global inliner config, built on first request
    pub fn get_inliner_config(&self) -> &InlinerConfig {
        self.inliner_config
            .get_or_init(|| InlinerConfig::from_config(&self.json))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Plain accessors
    // ═══════════════════════════════════════════════════════════════════════

    pub fn get_no_optimizations_annos(&self) -> &HashSet<DexType> {
        &self.no_optimizations_annos
    }

    pub fn get_method_to_weight(&self) -> &HashMap<String, u32> {
        &self.method_to_weight
    }

    pub fn get_method_sorting_whitelisted_substrings(&self) -> &HashSet<String> {
        &self.method_sorting_whitelisted_substrings
    }

    /// Full path of a metadata file in the output directory
    ///
    /// Pure string composition: no existence check, nothing is created.
    pub fn metafile(&self, basename: &str) -> String {
        if basename.is_empty() {
            return String::new();
        }
        format!("{}/{}", self.outdir, basename)
    }

    pub fn get_outdir(&self) -> &str {
        &self.outdir
    }

    pub fn get_proguard_map(&self) -> &ProguardMap {
        &self.proguard_map
    }

    pub fn get_printseeds(&self) -> &str {
        &self.printseeds
    }

    pub fn get_instruction_size_bitwidth_limit(&self) -> u32 {
        self.instruction_size_bitwidth_limit
    }

    pub fn get_json_config(&self) -> &JsonWrapper {
        &self.json
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DEPRECATED: moved methods
    // ═══════════════════════════════════════════════════════════════════════

    pub fn save_move_map(&self) -> bool {
        self.moves.has_moves()
    }

    pub fn get_moved_methods_map(&self) -> &MethodMap {
        self.moves.methods()
    }

    /// Record a method relocation. The only mutation after construction.
    #[deprecated(note = "compatibility shim; do not build new features on the move map")]
    pub fn add_moved_methods(&mut self, method: MethodTuple, owner: DexType) {
        self.moves.add(method, owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metafile() {
        let conf = ConfigFiles::with_outdir(json!({}), "/tmp/out");
        assert_eq!(conf.metafile(""), "");
        assert_eq!(conf.metafile("seeds.txt"), "/tmp/out/seeds.txt");
        assert_eq!(conf.get_outdir(), "/tmp/out");
    }

    #[test]
    fn test_scalar_settings() {
        let conf = ConfigFiles::new(json!({
            "printseeds": "seeds.txt",
            "instruction_size_bitwidth_limit": 16
        }));
        assert_eq!(conf.get_printseeds(), "seeds.txt");
        assert_eq!(conf.get_instruction_size_bitwidth_limit(), 16);
        assert!(conf.get_proguard_map().is_empty());
    }

    #[test]
    fn test_bitwidth_limit_out_of_range() {
        let conf = ConfigFiles::new(json!({ "instruction_size_bitwidth_limit": 40 }));
        assert_eq!(conf.get_instruction_size_bitwidth_limit(), 0);

        let conf = ConfigFiles::new(json!({ "instruction_size_bitwidth_limit": -1 }));
        assert_eq!(conf.get_instruction_size_bitwidth_limit(), 0);
    }

    #[test]
    fn test_accessors_before_load() {
        let conf = ConfigFiles::new(json!({ "no_optimizations_annotations": ["La;"] }));
        assert!(!conf.is_loaded());
        assert!(conf.get_no_optimizations_annos().is_empty());
        assert!(conf.get_method_to_weight().is_empty());
        assert!(conf.get_method_sorting_whitelisted_substrings().is_empty());
        assert!(conf.get_coldstart_classes().is_empty());
        assert!(conf.get_all_class_lists().is_empty());
    }

    #[test]
    #[allow(deprecated)]
    fn test_move_map() {
        let mut conf = ConfigFiles::new(json!({}));
        assert!(!conf.save_move_map());
        assert!(conf.get_moved_methods_map().is_empty());

        let key = MethodTuple::new("Lcom/a/A;", "run", "()V");
        conf.add_moved_methods(key.clone(), DexType::new("Lcom/a/B;"));

        assert!(conf.save_move_map());
        assert_eq!(
            conf.get_moved_methods_map().get(&key),
            Some(&DexType::new("Lcom/a/B;"))
        );
    }

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigFiles>();
    }
}
