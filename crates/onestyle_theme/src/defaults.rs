//! Built-in default documents
//!
//! Each editor flavor ships its own starting document: the "one" design
//! system uses four numbered brand slots and `--one-*` variables, the "box"
//! system uses named slots and `--box-*` variables. They differ only in data.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use onestyle_core::{
    ColorBook, ColorScale, Colors, ConfigDocument, HslaAdjustment, PropertyMap, Scope, ThemeMeta,
    STANDARD_WEIGHTS,
};
use serde::{Deserialize, Serialize};

/// Built-in default document catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPreset {
    /// `--one-*` design system with `color1`..`color4`.
    #[default]
    One,
    /// `--box-*` design system with `primary`/`secondary`/`neutral`.
    Box,
}

impl DefaultPreset {
    /// Stable preset id for config/serialization.
    pub fn id(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Box => "box",
        }
    }

    /// User-facing display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::One => "One Design System",
            Self::Box => "Box Layout System",
        }
    }

    /// Custom-property prefix used by this preset's components and scopes.
    pub fn property_prefix(self) -> &'static str {
        match self {
            Self::One => "--one-",
            Self::Box => "--box-",
        }
    }

    /// Full preset list.
    pub fn all() -> &'static [DefaultPreset] {
        const PRESETS: [DefaultPreset; 2] = [DefaultPreset::One, DefaultPreset::Box];
        &PRESETS
    }

    /// Build the default document for this preset.
    pub fn document(self) -> ConfigDocument {
        match self {
            Self::One => one_document(),
            Self::Box => box_document(),
        }
    }
}

impl Display for DefaultPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DefaultPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown default preset `{s}` (expected one of: one, box)"))
    }
}

/// Convenience free function for ergonomic imports.
pub fn default_document(preset: DefaultPreset) -> ConfigDocument {
    preset.document()
}

fn scale(values: [&str; 11]) -> ColorScale {
    STANDARD_WEIGHTS
        .iter()
        .zip(values)
        .map(|(w, v)| (w.to_string(), v.into()))
        .collect()
}

fn props(entries: &[(&str, &str)]) -> PropertyMap {
    entries.iter().copied().collect()
}

// Tailwind-derived palettes.
const BLUE: [&str; 11] = [
    "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8",
    "#1e40af", "#1e3a8a", "#172554",
];
const VIOLET: [&str; 11] = [
    "#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9",
    "#5b21b6", "#4c1d95", "#2e1065",
];
const EMERALD: [&str; 11] = [
    "#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857",
    "#065f46", "#064e3b", "#022c22",
];
const SLATE: [&str; 11] = [
    "#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155",
    "#1e293b", "#0f172a", "#020617",
];
const INDIGO: [&str; 11] = [
    "#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca",
    "#3730a3", "#312e81", "#1e1b4b",
];
const AMBER: [&str; 11] = [
    "#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309",
    "#92400e", "#78350f", "#451a03",
];
const ZINC: [&str; 11] = [
    "#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46",
    "#27272a", "#18181b", "#09090b",
];

fn color_book(base: &str) -> ColorBook {
    let mut presets = IndexMap::new();
    presets.insert("soft".to_string(), HslaAdjustment::new(0.0, -20.0, 20.0, 1.0));
    presets.insert("deep".to_string(), HslaAdjustment::new(0.0, 10.0, -25.0, 1.0));
    presets.insert("glass".to_string(), HslaAdjustment::new(0.0, 0.0, 0.0, 0.4));
    ColorBook {
        base: Some(base.to_string()),
        presets,
    }
}

fn one_document() -> ConfigDocument {
    let mut brand = IndexMap::new();
    brand.insert("color1".to_string(), scale(BLUE));
    brand.insert("color2".to_string(), scale(VIOLET));
    brand.insert("color3".to_string(), scale(EMERALD));
    brand.insert("color4".to_string(), scale(SLATE));

    let mut components = IndexMap::new();
    components.insert(
        "one-button".to_string(),
        props(&[
            ("--one-button-bg", "var(--color1-600)"),
            ("--one-button-color", "var(--color4-50)"),
            ("--one-button-radius", "0.5rem"),
            ("--one-button-padding", "0.625rem 1.25rem"),
            ("--one-button-font-weight", "600"),
        ]),
    );
    components.insert(
        "one-card".to_string(),
        props(&[
            ("--one-card-bg", "var(--color4-50)"),
            ("--one-card-border", "1px solid var(--color4-200)"),
            ("--one-card-radius", "0.75rem"),
            ("--one-card-padding", "1.5rem"),
            ("--one-card-shadow", "0 1px 3px rgba(15, 23, 42, 0.1)"),
        ]),
    );
    components.insert(
        "one-heading".to_string(),
        props(&[
            ("--one-heading-color", "var(--color4-900)"),
            ("--one-heading-font-size", "clamp(1.75rem, 4vw, 3rem)"),
            ("--one-heading-line-height", "1.15"),
        ]),
    );
    components.insert(
        "one-text".to_string(),
        props(&[
            ("--one-text-color", "var(--color4-700)"),
            ("--one-text-font-size", "1rem"),
            ("--one-text-line-height", "1.6"),
        ]),
    );

    let mut scopes = IndexMap::new();
    scopes.insert(
        "one-body".to_string(),
        Scope {
            is_base_scope: true,
            ..Scope::new(props(&[
                ("--one-display", "block"),
                ("--one-max-width", "72rem"),
                ("--one-margin", "0 auto"),
            ]))
            .with_description("Page-level defaults inherited by every block")
        },
    );
    scopes.insert(
        "one-stack".to_string(),
        Scope::new(props(&[
            ("--one-display", "flex"),
            ("--one-flex-direction", "column"),
            ("--one-gap", "1rem"),
        ]))
        .with_preset("tight", props(&[("--one-gap", "0.5rem")]))
        .with_preset("loose", props(&[("--one-gap", "2rem")]))
        .with_description("Vertical stack of child blocks"),
    );

    ConfigDocument {
        theme: ThemeMeta {
            name: "One".to_string(),
            version: "1.0.0".to_string(),
        },
        colors: Colors { brand },
        color_variations: IndexMap::new(),
        color_book: color_book(BLUE[5]),
        components,
        scopes,
        extra: IndexMap::new(),
    }
}

fn box_document() -> ConfigDocument {
    let mut brand = IndexMap::new();
    brand.insert("primary".to_string(), scale(INDIGO));
    brand.insert("secondary".to_string(), scale(AMBER));
    brand.insert("neutral".to_string(), scale(ZINC));

    let mut components = IndexMap::new();
    components.insert(
        "box-container".to_string(),
        props(&[
            ("--box-max-width", "80rem"),
            ("--box-padding", "0 1.5rem"),
            ("--box-margin", "0 auto"),
        ]),
    );
    components.insert(
        "box-grid".to_string(),
        props(&[
            ("--box-columns", "repeat(auto-fit, minmax(16rem, 1fr))"),
            ("--box-gap", "1.5rem"),
        ]),
    );
    components.insert(
        "box-card".to_string(),
        props(&[
            ("--box-bg", "var(--neutral-50)"),
            ("--box-border", "1px solid var(--neutral-200)"),
            ("--box-radius", "0.5rem"),
            ("--box-padding", "1.25rem"),
        ]),
    );

    let mut scopes = IndexMap::new();
    scopes.insert(
        "box-section".to_string(),
        Scope {
            is_base_scope: true,
            ..Scope::new(props(&[
                ("--box-display", "block"),
                ("--box-padding-block", "4rem"),
            ]))
        }
        .with_preset("compact", props(&[("--box-padding-block", "2rem")])),
    );

    ConfigDocument {
        theme: ThemeMeta {
            name: "Box".to_string(),
            version: "1.0.0".to_string(),
        },
        colors: Colors { brand },
        color_variations: IndexMap::new(),
        color_book: color_book(INDIGO[5]),
        components,
        scopes,
        extra: IndexMap::new(),
    }
}
