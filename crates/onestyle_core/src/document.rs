//! The configuration document
//!
//! A [`ConfigDocument`] is the single root value edited by a onestyle store.
//! It serializes to the JSON layout shared with the editor front-ends:
//!
//! ```json
//! {
//!   "theme": { "name": "One", "version": "1.0.0" },
//!   "colors": { "brand": { "color1": { "50": "...", "950": "..." } } },
//!   "colorVariations": { "color1": { "muted": "..." } },
//!   "colorBook": { "base": "#3b82f6", "presets": { "soft": { ... } } },
//!   "components": { "button": { "--one-button-bg": "..." } },
//!   "scopes": { "hero": { "baseProperties": { ... }, "presets": { ... } } }
//! }
//! ```
//!
//! All maps are insertion ordered; the order is part of the document and is
//! the order CSS is generated in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::HslaAdjustment;
use crate::property::PropertyMap;
use crate::DocumentError;

/// Weight keys every brand color scale is expected to define.
pub const STANDARD_WEIGHTS: [&str; 11] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

/// Weight key -> CSS color value.
///
/// Values are kept as raw JSON so a stray non-string entry never fails the
/// whole document; only string values are compiled.
pub type ColorScale = IndexMap<String, Value>;

/// Variation name -> CSS color value, raw JSON like [`ColorScale`].
pub type ColorVariations = IndexMap<String, Value>;

/// Raw custom-property name -> value, applied above everything else.
pub type OverrideMap = IndexMap<String, String>;

/// Descriptive metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Colors {
    /// Color slot (`color1`, `primary`, ...) -> scale
    #[serde(default)]
    pub brand: IndexMap<String, ColorScale>,
}

/// A base color plus named HSLA adjustments derived from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub presets: IndexMap<String, HslaAdjustment>,
}

impl ColorBook {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.presets.is_empty()
    }
}

/// A named element style definition ("1Block").
///
/// `base_properties` cascade to every preset; a preset's own properties are
/// layered over the base when the scope is resolved, never merged into
/// storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_properties: Option<PropertyMap>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub presets: IndexMap<String, PropertyMap>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_base_scope: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Scope {
    pub fn new(base_properties: PropertyMap) -> Self {
        Self {
            base_properties: Some(base_properties),
            ..Self::default()
        }
    }

    pub fn with_preset(mut self, name: impl Into<String>, properties: PropertyMap) -> Self {
        self.presets.insert(name.into(), properties);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Resolve the properties to render for `preset`.
    ///
    /// The preset is layered over the base; an unknown or absent preset
    /// resolves to the base alone. Only string values are returned.
    pub fn resolve(&self, preset: Option<&str>) -> PropertyMap {
        let empty = PropertyMap::new();
        let base = self.base_properties.as_ref().unwrap_or(&empty);
        match preset.and_then(|name| self.presets.get(name)) {
            Some(overlay) => base.layered(overlay),
            None => base.layered(&empty),
        }
    }
}

/// The root design-token configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub theme: ThemeMeta,
    pub colors: Colors,
    #[serde(default)]
    pub color_variations: IndexMap<String, ColorVariations>,
    #[serde(default, skip_serializing_if = "ColorBook::is_empty")]
    pub color_book: ColorBook,
    #[serde(default)]
    pub components: IndexMap<String, PropertyMap>,
    #[serde(default)]
    pub scopes: IndexMap<String, Scope>,
    /// Sections this crate does not model (typography, spacing, ...),
    /// carried through verbatim.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ConfigDocument {
    pub fn brand_color(&self, slot: &str) -> Option<&ColorScale> {
        self.colors.brand.get(slot)
    }

    /// The string value of `weight` in brand scale `slot`.
    pub fn brand_value(&self, slot: &str, weight: &str) -> Option<&str> {
        self.colors.brand.get(slot)?.get(weight)?.as_str()
    }

    pub fn component(&self, name: &str) -> Option<&PropertyMap> {
        self.components.get(name)
    }

    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Report every brand scale that does not define all standard weights.
    pub fn validate(&self) -> Vec<DocumentError> {
        self.colors
            .brand
            .iter()
            .filter_map(|(slot, scale)| check_scale(slot, scale).err())
            .collect()
    }
}

/// Check that `scale` defines every weight in [`STANDARD_WEIGHTS`] as a
/// string.
///
/// Extra weights are allowed.
pub fn check_scale(color: &str, scale: &ColorScale) -> Result<(), DocumentError> {
    let missing: Vec<String> = STANDARD_WEIGHTS
        .iter()
        .filter(|w| !scale.get(**w).is_some_and(Value::is_string))
        .map(|w| w.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DocumentError::IncompleteScale {
            color: color.to_string(),
            missing,
        })
    }
}
