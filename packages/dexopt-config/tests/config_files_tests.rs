//! Integration tests for ConfigFiles
//!
//! Exercises the lazily loaded data sets against real files on disk.

use dexopt_config::config::*;
use dexopt_config::shared::models::{AccessFlags, DexClass, DexType, MethodTuple, Scope};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

fn sample_scope() -> Scope {
    Scope::new(vec![
        DexClass::new(DexType::new("Lcom/app/Main;"), AccessFlags::PUBLIC)
            .with_annotation(DexType::new("Lcom/app/annotations/DoNotOptimize;")),
        DexClass::new(DexType::new("Lcom/app/internal/Helper;"), AccessFlags::FINAL),
    ])
}

// ============================================================================
// Coldstart lists
// ============================================================================

#[test]
fn coldstart_classes_load_once_in_file_order() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "coldstart.txt",
        "com/app/Main.class\n1:Lcom/app/Zed;\nnot-a-class\ncom/app/Alpha.class\n",
    );
    let conf = ConfigFiles::new(json!({ "coldstart_classes": path }));

    let first = conf.get_coldstart_classes();
    assert_eq!(first, ["Lcom/app/Main;", "Lcom/app/Zed;", "Lcom/app/Alpha;"]);

    // Rewriting the file must not trigger a reload
    std::fs::write(dir.path().join("coldstart.txt"), "com/other/X.class\n").unwrap();
    let second = conf.get_coldstart_classes();
    assert!(std::ptr::eq(first, second));
    assert_eq!(second.len(), 3);
}

#[test]
fn empty_coldstart_file_is_not_reloaded() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "coldstart.txt", "");
    let conf = ConfigFiles::new(json!({ "coldstart_classes": path }));

    assert!(conf.get_coldstart_classes().is_empty());
    std::fs::write(dir.path().join("coldstart.txt"), "com/app/Late.class\n").unwrap();
    assert!(conf.get_coldstart_classes().is_empty());
}

#[test]
fn coldstart_classes_are_translated_through_proguard_map() {
    let dir = TempDir::new().unwrap();
    let mapping = write_file(&dir, "mapping.txt", "com.app.Main -> a.a:\n    int count -> a\n");
    let coldstart = write_file(
        &dir,
        "coldstart.txt",
        "com/app/Main.class\ncom/app/Other.class\n",
    );
    let conf = ConfigFiles::new(json!({
        "proguard_map": mapping,
        "coldstart_classes": coldstart
    }));

    assert_eq!(conf.get_coldstart_classes(), ["La/a;", "Lcom/app/Other;"]);
    assert_eq!(
        conf.get_proguard_map().translate_field("Lcom/app/Main;.count:I"),
        "La/a;.a:I"
    );
}

#[test]
fn coldstart_methods_and_missing_files() {
    let dir = TempDir::new().unwrap();
    let methods = write_file(
        &dir,
        "methods.txt",
        "Lcom/app/Main;.onCreate:()V\n\n2:Lcom/app/Main;.run:()V\n",
    );
    let conf = ConfigFiles::new(json!({
        "coldstart_methods": methods,
        "coldstart_classes": dir.path().join("absent.txt").to_str().unwrap()
    }));

    assert_eq!(
        conf.get_coldstart_methods(),
        ["Lcom/app/Main;.onCreate:()V", "Lcom/app/Main;.run:()V"]
    );
    assert!(conf.get_coldstart_classes().is_empty());
}

#[test]
fn unconfigured_file_names_give_empty_results() {
    let conf = ConfigFiles::new(json!({ "coldstart_classes": "", "coldstart_methods": 42 }));
    assert!(conf.get_coldstart_classes().is_empty());
    assert!(conf.get_coldstart_methods().is_empty());
}

// ============================================================================
// Class lists
// ============================================================================

#[test]
fn class_lists_are_loaded_from_json_file() {
    let dir = TempDir::new().unwrap();
    let coldstart = write_file(&dir, "coldstart.txt", "com/app/Main.class\n");
    let lists = write_file(
        &dir,
        "lists.json",
        r#"{ "primary.list": ["Lcom/app/B;", "Lcom/app/A;"], "empty.list": [] }"#,
    );
    let conf = ConfigFiles::new(json!({ "class_lists": lists, "coldstart_classes": coldstart }));

    assert!(!conf.has_class_list("X"));
    assert!(matches!(
        conf.get_class_list("X"),
        Err(ConfigError::UnknownClassList { ref name }) if name == "X"
    ));

    assert!(conf.has_class_list("primary.list"));
    assert_eq!(
        conf.get_class_list("primary.list").unwrap(),
        ["Lcom/app/B;", "Lcom/app/A;"]
    );

    assert!(conf.has_class_list("empty.list"));
    assert!(conf.get_class_list("empty.list").unwrap().is_empty());

    assert_eq!(
        conf.get_class_list(SECONDARY_DEX_HEAD_LIST).unwrap(),
        ["Lcom/app/Main;"]
    );
    assert_eq!(conf.get_all_class_lists().len(), 3);
}

#[test]
fn class_lists_load_is_attempted_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lists.json");
    let conf = ConfigFiles::new(json!({ "class_lists": path.to_str().unwrap() }));

    // File does not exist yet: empty, and that result sticks
    conf.ensure_class_lists_loaded();
    assert!(conf.get_all_class_lists().is_empty());

    std::fs::write(&path, r#"{ "late.list": ["La;"] }"#).unwrap();
    assert!(!conf.has_class_list("late.list"));
}

#[test]
fn unknown_class_list_error_names_the_list() {
    let conf = ConfigFiles::new(json!({}));
    let err = conf.get_class_list("hot_start.list").unwrap_err();
    assert!(err.to_string().contains("hot_start.list"));
}

// ============================================================================
// Scope-dependent data
// ============================================================================

#[test]
fn load_populates_scope_dependent_sets() {
    let dir = TempDir::new().unwrap();
    let weights = write_file(
        &dir,
        "weights.txt",
        "Lcom/app/Main;.run:()V 12\nLcom/app/Main;.stop:()V 4\n",
    );
    let mut conf = ConfigFiles::with_outdir(
        json!({
            "profiled_methods_file": weights,
            "method_sorting_whitelisted_substrings": ["Lcom/app/", "$lambda"],
            "no_optimizations_annotations": [
                "Lcom/app/annotations/DoNotOptimize;",
                "Lcom/app/annotations/Unknown;"
            ],
            "inliner": { "black_list": ["Lcom/app/internal/"] }
        }),
        dir.path().to_str().unwrap(),
    );

    assert!(conf.get_method_to_weight().is_empty());
    conf.load(&sample_scope());
    assert!(conf.is_loaded());

    assert_eq!(conf.get_method_to_weight().len(), 2);
    assert_eq!(conf.get_method_to_weight()["Lcom/app/Main;.run:()V"], 12);
    assert!(conf
        .get_method_sorting_whitelisted_substrings()
        .contains("$lambda"));

    let annos = conf.get_no_optimizations_annos();
    assert_eq!(annos.len(), 1);
    assert!(annos.contains(&DexType::new("Lcom/app/annotations/DoNotOptimize;")));

    let inliner = conf.get_inliner_config();
    assert!(inliner.is_populated());
    assert!(inliner
        .black_list_types
        .contains(&DexType::new("Lcom/app/internal/Helper;")));
}

#[test]
fn second_load_is_ignored() {
    let mut conf = ConfigFiles::new(json!({
        "no_optimizations_annotations": ["Lcom/app/annotations/DoNotOptimize;"]
    }));
    conf.load(&sample_scope());
    conf.load(&Scope::default());
    assert_eq!(conf.get_no_optimizations_annos().len(), 1);
}

// ============================================================================
// Inliner config
// ============================================================================

#[test]
fn inliner_section_is_honored() {
    let conf = ConfigFiles::new(json!({ "inliner": { "max_inline_size": 50 } }));
    assert_eq!(conf.get_inliner_config().max_inline_size, 50);
}

#[test]
fn legacy_inliner_section_is_honored() {
    let conf = ConfigFiles::new(json!({ "MethodInlinePass": { "max_inline_size": 50 } }));
    assert_eq!(conf.get_inliner_config().max_inline_size, 50);
}

#[test]
fn inliner_defaults_without_any_section() {
    let conf = ConfigFiles::new(json!({}));
    assert_eq!(conf.get_inliner_config(), &InlinerConfig::default());
    assert_eq!(conf.get_inliner_config().max_inline_size, DEFAULT_MAX_INLINE_SIZE);
    assert!(std::ptr::eq(conf.get_inliner_config(), conf.get_inliner_config()));
}

// ============================================================================
// Document loading, metafile, move map
// ============================================================================

#[test]
fn from_path_reads_document() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "printseeds": "seeds.txt" }"#).unwrap();

    let conf = ConfigFiles::from_path(file.path(), "/tmp/out").unwrap();
    assert_eq!(conf.get_printseeds(), "seeds.txt");
    assert_eq!(conf.metafile(conf.get_printseeds()), "/tmp/out/seeds.txt");
    assert_eq!(conf.metafile(""), "");
}

#[test]
fn from_path_rejects_malformed_document() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ printseeds: ").unwrap();
    assert!(matches!(
        ConfigFiles::from_path(file.path(), ""),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        ConfigFiles::from_path("/nonexistent/config.json", ""),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn json_config_is_exposed_unchanged() {
    let doc: Value = json!({ "custom_pass": { "threshold": 3 } });
    let conf = ConfigFiles::new(doc.clone());
    assert_eq!(conf.get_json_config().as_value(), &doc);
    assert_eq!(
        conf.get_json_config().section("custom_pass").get("threshold", 0i64),
        3
    );
}

#[test]
#[allow(deprecated)]
fn moved_methods_registry() {
    let mut conf = ConfigFiles::new(json!({}));
    assert!(!conf.save_move_map());
    assert!(conf.get_moved_methods_map().is_empty());

    let key = MethodTuple::new("Lcom/app/Main;", "helper", "(I)V");
    conf.add_moved_methods(key.clone(), DexType::new("Lcom/app/Utils;"));

    assert!(conf.save_move_map());
    assert_eq!(conf.get_moved_methods_map().len(), 1);
    assert_eq!(
        conf.get_moved_methods_map()[&key],
        DexType::new("Lcom/app/Utils;")
    );
}
