//! Pipeline Configuration
//!
//! Single source of tunable parameters and auxiliary data sets for the
//! optimization passes:
//! - `JsonWrapper`: typed, defaulting lookups over the raw JSON document
//! - `ConfigFiles`: the store handed to every pass; owns lazily loaded data
//!   sets (coldstart lists, class lists, inliner settings)
//! - `ProguardMap`: obfuscation mapping used to translate configured names
//!
//! # Examples
//!
//! ```rust,ignore
//! use dexopt_config::config::ConfigFiles;
//!
//! let mut conf = ConfigFiles::with_outdir(json, "/tmp/out");
//! conf.load(&scope);
//!
//! let head = conf.get_coldstart_classes();
//! let inliner = conf.get_inliner_config();
//! let seeds = conf.metafile("redex-seeds.txt");
//! ```
//!
//! # Failure policy
//!
//! Missing keys, wrong-typed values and unreadable auxiliary files degrade to
//! defaults or empty collections. The only hard failure is asking for a class
//! list that was never defined (`ConfigError::UnknownClassList`).

pub mod config_files;
pub mod error;
pub mod inliner;
pub mod json_wrapper;
pub mod list_files;
pub mod move_registry;
pub mod proguard_map;

// Re-exports
pub use config_files::{keys, ConfigFiles, SECONDARY_DEX_HEAD_LIST};
pub use error::{ConfigError, ConfigResult};
pub use inliner::{InlinerConfig, DEFAULT_MAX_INLINE_SIZE};
pub use json_wrapper::{FromJson, JsonWrapper};
pub use move_registry::MoveRegistry;
pub use proguard_map::ProguardMap;
