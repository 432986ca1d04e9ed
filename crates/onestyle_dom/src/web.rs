//! Browser bindings
//!
//! [`WebTarget`] applies styles to a live document or shadow root and
//! [`BrowserStorage`] persists the store in `window.localStorage`.

use onestyle_theme::{Storage, StorageError};
use web_sys::wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlHeadElement, Node, ShadowRoot};

use crate::error::{DomError, Result};
use crate::target::StyleTarget;

fn js_error(op: &'static str, err: JsValue) -> DomError {
    DomError::Operation {
        op,
        message: format!("{err:?}"),
    }
}

fn document() -> Result<Document> {
    web_sys::window()
        .ok_or_else(|| DomError::Unavailable("no global `window`".to_string()))?
        .document()
        .ok_or_else(|| DomError::Unavailable("window has no document".to_string()))
}

enum Container {
    Head(HtmlHeadElement),
    Shadow(ShadowRoot),
}

impl Container {
    fn query(&self, selector: &str) -> std::result::Result<Option<Element>, JsValue> {
        match self {
            Container::Head(head) => head.query_selector(selector),
            Container::Shadow(shadow) => shadow.query_selector(selector),
        }
    }

    fn count(&self, selector: &str) -> std::result::Result<u32, JsValue> {
        match self {
            Container::Head(head) => head.query_selector_all(selector).map(|l| l.length()),
            Container::Shadow(shadow) => shadow.query_selector_all(selector).map(|l| l.length()),
        }
    }

    fn node(&self) -> &Node {
        match self {
            Container::Head(head) => head.as_ref(),
            Container::Shadow(shadow) => shadow.as_ref(),
        }
    }
}

/// Style target over a DOM tree.
///
/// Style elements live in `container` (the document head, or a shadow root
/// when the themed UI is encapsulated in a web component). Root custom
/// properties go on `root`'s inline style.
pub struct WebTarget {
    document: Document,
    container: Container,
    root: HtmlElement,
}

impl WebTarget {
    /// Target the global document: `<head>` and `<html>`.
    pub fn document() -> Result<Self> {
        let document = document()?;
        let head = document
            .head()
            .ok_or_else(|| DomError::Unavailable("document has no <head>".to_string()))?;
        let root = document
            .document_element()
            .ok_or_else(|| DomError::Unavailable("document has no root element".to_string()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::Unavailable("root element is not an HTML element".to_string()))?;
        Ok(Self {
            document,
            container: Container::Head(head),
            root,
        })
    }

    /// Target a shadow root. Root properties are set on `host`.
    pub fn shadow(shadow: ShadowRoot, host: HtmlElement) -> Result<Self> {
        Ok(Self {
            document: document()?,
            container: Container::Shadow(shadow),
            root: host,
        })
    }

    fn selector(id: &str) -> String {
        format!(
            "style[id=\"{}\"]",
            id.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

impl StyleTarget for WebTarget {
    fn style_text(&self, id: &str) -> Result<Option<String>> {
        let element = self
            .container
            .query(&Self::selector(id))
            .map_err(|err| js_error("querySelector", err))?;
        Ok(element.and_then(|e| e.text_content()))
    }

    fn style_count(&self, id: &str) -> Result<usize> {
        let count = self
            .container
            .count(&Self::selector(id))
            .map_err(|err| js_error("querySelectorAll", err))?;
        Ok(count as usize)
    }

    fn append_style(&mut self, id: &str, css: &str) -> Result<()> {
        let style = self
            .document
            .create_element("style")
            .map_err(|err| js_error("createElement", err))?;
        style.set_id(id);
        style.set_text_content(Some(css));
        self.container
            .node()
            .append_child(&style)
            .map_err(|err| js_error("appendChild", err))?;
        Ok(())
    }

    fn remove_style(&mut self, id: &str) -> Result<usize> {
        let selector = Self::selector(id);
        let mut removed = 0;
        while let Some(element) = self
            .container
            .query(&selector)
            .map_err(|err| js_error("querySelector", err))?
        {
            element.remove();
            removed += 1;
        }
        Ok(removed)
    }

    fn set_root_property(&mut self, name: &str, value: &str) -> Result<()> {
        self.root
            .style()
            .set_property(name, value)
            .map_err(|err| js_error("setProperty", err))
    }

    fn remove_root_property(&mut self, name: &str) -> Result<()> {
        self.root
            .style()
            .remove_property(name)
            .map(|_| ())
            .map_err(|err| js_error("removeProperty", err))
    }
}

/// [`Storage`] backed by `window.localStorage`.
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| DomError::Unavailable("no global `window`".to_string()))?
            .local_storage()
            .map_err(|err| js_error("localStorage", err))?
            .ok_or_else(|| DomError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

fn backend_error(key: &str, err: JsValue) -> StorageError {
    StorageError::Backend {
        key: key.to_string(),
        message: format!("{err:?}"),
    }
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| backend_error(key, err))
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| backend_error(key, err))
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|err| backend_error(key, err))
    }
}
