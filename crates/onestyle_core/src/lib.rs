//! onestyle core data model
//!
//! This crate defines the configuration document edited by onestyle
//! consumers and the value types it is built from:
//!
//! - **[`ConfigDocument`]**: brand color scales, color variations, the color
//!   book, component variable tables and scopes ("1Blocks")
//! - **[`PropertyMap`]**: an insertion-ordered CSS custom-property table
//! - **[`Hsla`]**: color parsing, formatting and HSLA adjustments used by the
//!   color book
//!
//! Nothing here performs I/O. Storage, CSS compilation and DOM injection live
//! in `onestyle_theme` and `onestyle_dom`.
//!
//! # Example
//!
//! ```rust
//! use onestyle_core::{PropertyMap, Scope};
//!
//! let scope = Scope::new(PropertyMap::from([("--one-display", "block")]))
//!     .with_preset("wide", PropertyMap::from([("--one-width", "100%")]));
//!
//! let resolved = scope.resolve(Some("wide"));
//! assert_eq!(resolved.get_str("--one-display"), Some("block"));
//! assert_eq!(resolved.get_str("--one-width"), Some("100%"));
//! ```

pub mod color;
pub mod document;
pub mod error;
pub mod property;

pub use color::{Hsla, HslaAdjustment};
pub use document::{
    check_scale, ColorBook, ColorScale, ColorVariations, Colors, ConfigDocument, OverrideMap,
    Scope, ThemeMeta, STANDARD_WEIGHTS,
};
pub use error::DocumentError;
pub use property::PropertyMap;
