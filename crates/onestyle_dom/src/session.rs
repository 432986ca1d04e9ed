//! Live theme sessions
//!
//! A [`ThemeSession`] wires the pieces of the data flow together: a store
//! mutation is followed by recompilation and re-injection in the same call.

use onestyle_theme::{ConfigStore, CssCompiler};
use tracing::warn;

use crate::error::Result;
use crate::injector::StyleInjector;
use crate::target::StyleTarget;

pub struct ThemeSession<T: StyleTarget> {
    store: ConfigStore,
    compiler: CssCompiler,
    injector: StyleInjector<T>,
}

impl<T: StyleTarget> ThemeSession<T> {
    /// Start a session and inject the store's current document.
    pub fn start(store: ConfigStore, compiler: CssCompiler, injector: StyleInjector<T>) -> Self {
        let mut session = Self {
            store,
            compiler,
            injector,
        };
        session.refresh();
        session
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn compiler(&self) -> &CssCompiler {
        &self.compiler
    }

    pub fn injector(&self) -> &StyleInjector<T> {
        &self.injector
    }

    /// The stylesheet for the current document and overrides.
    pub fn css(&self) -> String {
        self.compiler
            .compile(self.store.document(), self.store.overrides())
    }

    /// Run `f` against the store, then recompile and re-inject.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut ConfigStore) -> R) -> R {
        let result = f(&mut self.store);
        self.refresh();
        result
    }

    /// Recompile and re-inject. DOM failures are logged; the store is the
    /// source of truth and the next refresh retries.
    pub fn refresh(&mut self) {
        if let Err(err) = self.try_refresh() {
            warn!("ThemeSession: failed to apply styles: {}", err);
        }
    }

    fn try_refresh(&mut self) -> Result<()> {
        let css = self.css();
        let root = self
            .compiler
            .root_properties(self.store.document(), self.store.overrides());
        self.injector.inject(&css, &root)
    }

    /// End the session: release everything injected and hand back the store.
    pub fn close(self) -> (ConfigStore, Result<()>) {
        let Self {
            store, injector, ..
        } = self;
        (store, injector.teardown())
    }
}

impl<T: StyleTarget> std::fmt::Debug for ThemeSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeSession")
            .field("store", &self.store)
            .field("injector", &self.injector)
            .finish_non_exhaustive()
    }
}
