//! Managed style injection
//!
//! [`StyleInjector`] keeps exactly one managed `<style>` element in its
//! target and mirrors root custom properties onto the root element's inline
//! style. Everything it adds is removed again on [`teardown`] or drop.
//!
//! [`teardown`]: StyleInjector::teardown

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::target::StyleTarget;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectorOptions {
    /// Reserved id of the managed style element.
    pub style_id: String,
    /// Leave the style element alone when its text is already current.
    /// Re-injecting identical CSS is safe either way.
    pub skip_unchanged: bool,
}

impl Default for InjectorOptions {
    fn default() -> Self {
        Self {
            style_id: "onestyle-theme".to_string(),
            skip_unchanged: true,
        }
    }
}

pub struct StyleInjector<T: StyleTarget> {
    target: T,
    options: InjectorOptions,
    /// Root properties this injector set, with the value it set.
    applied: IndexMap<String, String>,
    active: bool,
}

impl<T: StyleTarget> StyleInjector<T> {
    pub fn new(target: T) -> Self {
        Self::with_options(target, InjectorOptions::default())
    }

    pub fn with_options(target: T, options: InjectorOptions) -> Self {
        Self {
            target,
            options,
            applied: IndexMap::new(),
            active: false,
        }
    }

    pub fn options(&self) -> &InjectorOptions {
        &self.options
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Root properties currently set by this injector.
    pub fn applied_properties(&self) -> &IndexMap<String, String> {
        &self.applied
    }

    /// Apply `css` and `root_properties` to the target.
    ///
    /// Stale managed style elements are removed and a fresh one appended.
    /// Root properties set by a previous call but absent from
    /// `root_properties` are unset.
    pub fn inject(&mut self, css: &str, root_properties: &IndexMap<String, String>) -> Result<()> {
        let id = self.options.style_id.as_str();
        self.active = true;

        // Skipping is only safe when no duplicate of the element exists.
        let unchanged = self.options.skip_unchanged
            && self.target.style_count(id)? == 1
            && self.target.style_text(id)?.as_deref() == Some(css);
        if unchanged {
            trace!("StyleInjector::inject - `{}` unchanged", id);
        } else {
            let removed = self.target.remove_style(id)?;
            self.target.append_style(id, css)?;
            debug!(
                "StyleInjector::inject - `{}` ({} bytes, replaced {})",
                id,
                css.len(),
                removed
            );
        }

        let stale: Vec<String> = self
            .applied
            .keys()
            .filter(|name| !root_properties.contains_key(*name))
            .cloned()
            .collect();
        for name in stale {
            self.target.remove_root_property(&name)?;
            self.applied.shift_remove(&name);
        }

        for (name, value) in root_properties {
            if self.applied.get(name) == Some(value) {
                continue;
            }
            self.target.set_root_property(name, value)?;
            self.applied.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    /// Remove the managed style element and unset every root property this
    /// injector set.
    pub fn teardown(mut self) -> Result<()> {
        self.release()
    }

    /// Releases everything; later calls are no-ops until the next inject.
    /// Keeps going after a failed DOM call and reports the first failure.
    fn release(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        debug!(
            "StyleInjector::release - `{}` and {} root properties",
            self.options.style_id,
            self.applied.len()
        );

        let mut first_err = self.target.remove_style(&self.options.style_id).err();
        for (name, _) in std::mem::take(&mut self.applied) {
            if let Err(err) = self.target.remove_root_property(&name) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<T: StyleTarget> Drop for StyleInjector<T> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("StyleInjector: release on drop failed: {}", err);
        }
    }
}

impl<T: StyleTarget> std::fmt::Debug for StyleInjector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleInjector")
            .field("options", &self.options)
            .field("applied", &self.applied.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::MemoryTarget;
    use pretty_assertions::assert_eq;

    fn vars(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reinjection_keeps_one_managed_element() {
        let dom = MemoryTarget::new();
        let mut injector = StyleInjector::new(dom.clone());

        injector.inject(":root {}\n", &vars(&[])).unwrap();
        injector.inject(".a {}\n", &vars(&[])).unwrap();
        injector.inject(".b {}\n", &vars(&[])).unwrap();

        assert_eq!(dom.style_count_with_id("onestyle-theme"), 1);
        assert_eq!(dom.style_text("onestyle-theme").unwrap().as_deref(), Some(".b {}\n"));
    }

    #[test]
    fn stale_element_moves_to_the_end() {
        let mut dom = MemoryTarget::new();
        let mut injector = StyleInjector::new(dom.clone());
        injector.inject("a", &vars(&[])).unwrap();
        dom.append_style("other", "x").unwrap();

        injector.inject("b", &vars(&[])).unwrap();
        assert_eq!(dom.style_ids(), vec!["other", "onestyle-theme"]);
    }

    #[test]
    fn unchanged_css_is_skipped_when_enabled() {
        let dom = MemoryTarget::new();
        let mut injector = StyleInjector::new(dom.clone());
        injector.inject("a", &vars(&[])).unwrap();
        injector.inject("a", &vars(&[])).unwrap();
        assert_eq!(dom.append_count(), 1);

        let dom = MemoryTarget::new();
        let mut injector = StyleInjector::with_options(
            dom.clone(),
            InjectorOptions {
                skip_unchanged: false,
                ..InjectorOptions::default()
            },
        );
        injector.inject("a", &vars(&[])).unwrap();
        injector.inject("a", &vars(&[])).unwrap();
        assert_eq!(dom.append_count(), 2);
        assert_eq!(dom.total_style_count(), 1);
    }

    #[test]
    fn duplicate_elements_are_collapsed_even_when_first_matches() {
        let mut dom = MemoryTarget::new();
        dom.append_style("onestyle-theme", "a").unwrap();
        dom.append_style("onestyle-theme", "stale").unwrap();

        let mut injector = StyleInjector::new(dom.clone());
        injector.inject("a", &vars(&[])).unwrap();

        assert_eq!(dom.style_count_with_id("onestyle-theme"), 1);
        assert_eq!(dom.style_text("onestyle-theme").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn root_properties_follow_the_latest_inject() {
        let dom = MemoryTarget::new();
        let mut injector = StyleInjector::new(dom.clone());

        injector
            .inject("", &vars(&[("--a", "1"), ("--b", "2")]))
            .unwrap();
        injector
            .inject("", &vars(&[("--b", "3"), ("--c", "4")]))
            .unwrap();

        assert_eq!(dom.root_property_names(), vec!["--b", "--c"]);
        assert_eq!(dom.root_property("--b").as_deref(), Some("3"));
    }

    #[test]
    fn teardown_leaves_foreign_state_alone() {
        let mut dom = MemoryTarget::new();
        dom.set_root_property("--host", "keep").unwrap();
        dom.append_style("host-styles", "x").unwrap();

        let mut injector = StyleInjector::new(dom.clone());
        injector.inject("a", &vars(&[("--a", "1")])).unwrap();
        injector.teardown().unwrap();

        assert_eq!(dom.style_ids(), vec!["host-styles"]);
        assert_eq!(dom.root_property_names(), vec!["--host"]);
    }

    #[test]
    fn drop_releases() {
        let dom = MemoryTarget::new();
        {
            let mut injector = StyleInjector::new(dom.clone());
            injector.inject("a", &vars(&[("--a", "1")])).unwrap();
        }
        assert_eq!(dom.total_style_count(), 0);
        assert!(dom.root_property_names().is_empty());
    }

    #[test]
    fn never_injected_touches_nothing() {
        let mut dom = MemoryTarget::new();
        dom.append_style("onestyle-theme", "server rendered").unwrap();
        StyleInjector::new(dom.clone()).teardown().unwrap();
        assert_eq!(dom.total_style_count(), 1);
    }
}
