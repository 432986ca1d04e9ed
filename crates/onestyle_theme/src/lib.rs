//! onestyle theme store
//!
//! Configuration state management and CSS generation for onestyle design
//! tokens.
//!
//! # Overview
//!
//! - **[`ConfigStore`]**: owns the current [`ConfigDocument`] and custom
//!   overrides, applies named update operations, persists after every change
//!   and notifies subscribers
//! - **[`CssCompiler`]**: deterministic document → stylesheet compilation
//! - **[`transfer`]**: JSON export and validated import
//! - **[`CollectionStore`]**: user-named groupings of scopes, persisted
//!   independently
//! - **[`Storage`]**: the injected key-value backend ([`MemoryStorage`],
//!   [`FileStorage`])
//!
//! # Quick Start
//!
//! ```rust
//! use onestyle_theme::{ConfigStore, CssCompiler, MemoryStorage, StoreConfig};
//! use onestyle_core::PropertyMap;
//!
//! let mut store = ConfigStore::open(MemoryStorage::new(), StoreConfig::default());
//! store.create_new_scope("hero", PropertyMap::from([("--one-display", "block")]));
//!
//! let css = CssCompiler::default().compile(store.document(), store.overrides());
//! assert!(css.contains("[data-scope=\"hero\"] .one-block {"));
//! ```
//!
//! # Failure policy
//!
//! Store operations never panic and never surface storage failures: a failed
//! write is logged and the in-memory state stays authoritative for the
//! session. Only scale validation and imports report errors to the caller.

pub mod collection;
pub mod compiler;
pub mod defaults;
mod error;
pub mod storage;
pub mod store;
pub mod transfer;

pub use collection::{Collection, CollectionStore};
pub use compiler::{compile, CompilerOptions, CssCompiler};
pub use defaults::{default_document, DefaultPreset};
pub use error::{ImportError, StorageError, ThemeError};
pub use storage::{namespaced_key, FileStorage, MemoryStorage, Storage};
pub use store::{initialize, ConfigStore, StoreConfig, Subscriber, SubscriptionId};

pub use onestyle_core::{ConfigDocument, OverrideMap};
