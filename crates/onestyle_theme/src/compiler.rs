//! CSS generation
//!
//! [`CssCompiler`] turns a [`ConfigDocument`] plus custom overrides into
//! stylesheet text. Output is a pure function of its inputs: the same
//! document always yields byte-identical CSS, with blocks and declarations in
//! document order.
//!
//! Layout of the generated stylesheet:
//!
//! ```css
//! :root {
//!   --color1-50: #eff6ff;        /* brand scales */
//!   --color1-muted: #94a3b8;     /* color variations */
//!   --book-soft: hsla(...);      /* color book presets */
//!   --my-override: 3px;          /* custom overrides */
//! }
//!
//! .one-button {
//!   --one-button-bg: var(--color1-600);
//! }
//!
//! [data-scope="hero"] .one-block {
//!   --one-display: block;
//! }
//! ```
//!
//! Blocks with no declarations are omitted.

use indexmap::IndexMap;
use onestyle_core::{ConfigDocument, Hsla, OverrideMap, PropertyMap, Scope};
use tracing::trace;

/// Selector configuration for generated CSS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Selector of the block holding root-level custom properties
    /// (`:root` for a document, `:host` inside a shadow root).
    pub root_selector: String,
    /// Element selector appended to each `[data-scope="..."]` rule.
    /// Empty targets the scoped element itself.
    pub base_element_selector: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            root_selector: ":root".to_string(),
            base_element_selector: ".one-block".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CssCompiler {
    options: CompilerOptions,
}

impl CssCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile `doc` and `overrides` into stylesheet text.
    pub fn compile(&self, doc: &ConfigDocument, overrides: &OverrideMap) -> String {
        let mut blocks = Vec::new();

        let root = self.root_properties(doc, overrides);
        if let Some(block) = render_block(
            &self.options.root_selector,
            root.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ) {
            blocks.push(block);
        }

        for (name, properties) in &doc.components {
            let selector = format!(".{name}");
            if let Some(block) = self.render_properties(&selector, properties, overrides) {
                blocks.push(block);
            }
        }

        for (name, scope) in &doc.scopes {
            // A scope without a base property table has nothing to cascade.
            let Some(base) = scope.base_properties.as_ref() else {
                continue;
            };
            if let Some(block) = self.render_properties(&self.scope_selector(name), base, overrides)
            {
                blocks.push(block);
            }
        }

        if blocks.is_empty() {
            return String::new();
        }
        let mut css = blocks.join("\n\n");
        css.push('\n');
        css
    }

    /// Root-level custom properties, in emission order.
    ///
    /// Brand scales first (`--{slot}-{weight}`), then color variations
    /// (`--{slot}-{name}`), then color book presets (`--book-{name}`).
    /// Overrides replace a generated value in place or are appended, so every
    /// name appears once and the override always wins.
    pub fn root_properties(
        &self,
        doc: &ConfigDocument,
        overrides: &OverrideMap,
    ) -> IndexMap<String, String> {
        let mut vars = IndexMap::new();

        for (slot, scale) in &doc.colors.brand {
            for (weight, value) in scale {
                let Some(value) = value.as_str() else {
                    trace!("CssCompiler: dropped non-string weight `{}` of `{}`", weight, slot);
                    continue;
                };
                vars.insert(format!("--{slot}-{weight}"), value.to_string());
            }
        }

        for (slot, variations) in &doc.color_variations {
            for (name, value) in variations {
                let Some(value) = value.as_str() else {
                    trace!("CssCompiler: dropped non-string variation `{}` of `{}`", name, slot);
                    continue;
                };
                let var = format!("--{slot}-{name}");
                // Scale weights own their names.
                if vars.contains_key(&var) {
                    trace!("CssCompiler: variation `{}` shadows a scale weight", var);
                    continue;
                }
                vars.insert(var, value.to_string());
            }
        }

        if let Some(base) = doc.color_book.base.as_deref() {
            match Hsla::parse(base) {
                Ok(base) => {
                    for (name, adjustment) in &doc.color_book.presets {
                        vars.insert(format!("--book-{name}"), adjustment.apply(base).to_css());
                    }
                }
                Err(err) => trace!("CssCompiler: skipping color book presets: {}", err),
            }
        }

        for (name, value) in overrides {
            vars.insert(name.clone(), value.clone());
        }

        vars
    }

    /// Render a resolved scope as an inline `style` attribute value.
    ///
    /// This is how presets reach the page: the stylesheet carries only the
    /// scope's base properties, the preset layer is applied per element.
    pub fn inline_style(&self, scope: &Scope, preset: Option<&str>) -> String {
        scope
            .resolve(preset)
            .declarations()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn scope_selector(&self, scope: &str) -> String {
        let attr = format!("[data-scope=\"{}\"]", escape_attribute(scope));
        if self.options.base_element_selector.is_empty() {
            attr
        } else {
            format!("{attr} {}", self.options.base_element_selector)
        }
    }

    fn render_properties(
        &self,
        selector: &str,
        properties: &PropertyMap,
        overrides: &OverrideMap,
    ) -> Option<String> {
        let skipped = properties.len() - properties.declaration_count();
        if skipped > 0 {
            trace!(
                "CssCompiler: dropped {} non-string properties from `{}`",
                skipped,
                selector
            );
        }
        render_block(
            selector,
            properties.declarations().map(|(name, value)| {
                let value = overrides.get(name).map(String::as_str).unwrap_or(value);
                (name, value)
            }),
        )
    }
}

/// Compile with default selectors.
pub fn compile(doc: &ConfigDocument, overrides: &OverrideMap) -> String {
    CssCompiler::default().compile(doc, overrides)
}

fn render_block<'a>(
    selector: &str,
    declarations: impl Iterator<Item = (&'a str, &'a str)>,
) -> Option<String> {
    let mut body = String::new();
    for (name, value) in declarations {
        body.push_str("  ");
        body.push_str(name);
        body.push_str(": ");
        body.push_str(value);
        body.push_str(";\n");
    }
    if body.is_empty() {
        None
    } else {
        Some(format!("{selector} {{\n{body}}}"))
    }
}

fn escape_attribute(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
