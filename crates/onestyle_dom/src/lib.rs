//! onestyle DOM bridge
//!
//! Applies compiled theme CSS to a page. The DOM is reached only through the
//! [`StyleTarget`] capability, so everything here runs against
//! [`MemoryTarget`] in tests and against the browser with the `web` feature.
//!
//! ```rust
//! use onestyle_dom::{MemoryTarget, StyleInjector, ThemeSession};
//! use onestyle_theme::{ConfigStore, CssCompiler, MemoryStorage, StoreConfig};
//!
//! let dom = MemoryTarget::new();
//! let store = ConfigStore::open(MemoryStorage::new(), StoreConfig::default());
//! let mut session = ThemeSession::start(
//!     store,
//!     CssCompiler::default(),
//!     StyleInjector::new(dom.clone()),
//! );
//!
//! session.update(|store| store.add_custom_override("--color1-500", "hotpink"));
//! assert_eq!(dom.root_property("--color1-500").as_deref(), Some("hotpink"));
//!
//! let (_store, released) = session.close();
//! assert!(released.is_ok());
//! assert_eq!(dom.total_style_count(), 0);
//! ```

mod error;
pub mod injector;
pub mod session;
pub mod target;
#[cfg(feature = "web")]
pub mod web;

pub use error::{DomError, Result};
pub use injector::{InjectorOptions, StyleInjector};
pub use session::ThemeSession;
pub use target::{MemoryTarget, StyleTarget};
#[cfg(feature = "web")]
pub use web::{BrowserStorage, WebTarget};
