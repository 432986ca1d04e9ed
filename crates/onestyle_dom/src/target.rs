//! Style targets
//!
//! A [`StyleTarget`] is the root a theme is applied to: somewhere to hold
//! `<style>` elements (a document head or a shadow root) and a root element
//! whose inline style receives custom properties. [`MemoryTarget`] records
//! the same operations without a browser.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::Result;

/// The DOM operations a [`StyleInjector`](crate::StyleInjector) needs.
pub trait StyleTarget {
    /// Text of the first style element with `id`, if one exists.
    fn style_text(&self, id: &str) -> Result<Option<String>>;

    /// Number of style elements with `id`.
    fn style_count(&self, id: &str) -> Result<usize>;

    /// Append a new style element with `id` and `css` as its text.
    fn append_style(&mut self, id: &str, css: &str) -> Result<()>;

    /// Remove every style element with `id`. Returns how many were removed.
    fn remove_style(&mut self, id: &str) -> Result<usize>;

    /// Set an inline custom property on the root element.
    fn set_root_property(&mut self, name: &str, value: &str) -> Result<()>;

    /// Unset an inline custom property on the root element.
    fn remove_root_property(&mut self, name: &str) -> Result<()>;
}

impl<T: StyleTarget + ?Sized> StyleTarget for Box<T> {
    fn style_text(&self, id: &str) -> Result<Option<String>> {
        (**self).style_text(id)
    }

    fn style_count(&self, id: &str) -> Result<usize> {
        (**self).style_count(id)
    }

    fn append_style(&mut self, id: &str, css: &str) -> Result<()> {
        (**self).append_style(id, css)
    }

    fn remove_style(&mut self, id: &str) -> Result<usize> {
        (**self).remove_style(id)
    }

    fn set_root_property(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).set_root_property(name, value)
    }

    fn remove_root_property(&mut self, name: &str) -> Result<()> {
        (**self).remove_root_property(name)
    }
}

#[derive(Debug, Default)]
struct MemoryRoot {
    /// `(id, text)` in insertion order.
    styles: Vec<(String, String)>,
    root_properties: IndexMap<String, String>,
    appends: usize,
}

/// In-memory style target.
///
/// Clones share the same root, so a test can keep a handle after giving the
/// target away to an injector or session.
#[derive(Clone, Debug, Default)]
pub struct MemoryTarget {
    root: Rc<RefCell<MemoryRoot>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of style elements, managed or not.
    pub fn total_style_count(&self) -> usize {
        self.root.borrow().styles.len()
    }

    /// Number of style elements carrying `id`.
    pub fn style_count_with_id(&self, id: &str) -> usize {
        self.root
            .borrow()
            .styles
            .iter()
            .filter(|(style_id, _)| style_id == id)
            .count()
    }

    /// Style element ids in document order.
    pub fn style_ids(&self) -> Vec<String> {
        self.root
            .borrow()
            .styles
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Total number of style elements ever appended.
    pub fn append_count(&self) -> usize {
        self.root.borrow().appends
    }

    pub fn root_property(&self, name: &str) -> Option<String> {
        self.root.borrow().root_properties.get(name).cloned()
    }

    pub fn root_property_names(&self) -> Vec<String> {
        self.root.borrow().root_properties.keys().cloned().collect()
    }
}

impl StyleTarget for MemoryTarget {
    fn style_text(&self, id: &str) -> Result<Option<String>> {
        Ok(self
            .root
            .borrow()
            .styles
            .iter()
            .find(|(style_id, _)| style_id == id)
            .map(|(_, text)| text.clone()))
    }

    fn style_count(&self, id: &str) -> Result<usize> {
        Ok(self.style_count_with_id(id))
    }

    fn append_style(&mut self, id: &str, css: &str) -> Result<()> {
        let mut root = self.root.borrow_mut();
        root.styles.push((id.to_string(), css.to_string()));
        root.appends += 1;
        Ok(())
    }

    fn remove_style(&mut self, id: &str) -> Result<usize> {
        let mut root = self.root.borrow_mut();
        let before = root.styles.len();
        root.styles.retain(|(style_id, _)| style_id != id);
        Ok(before - root.styles.len())
    }

    fn set_root_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.root
            .borrow_mut()
            .root_properties
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_root_property(&mut self, name: &str) -> Result<()> {
        self.root.borrow_mut().root_properties.shift_remove(name);
        Ok(())
    }
}
