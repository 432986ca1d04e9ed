//! Subcommand implementations
//!
//! Each command opens the project's file-backed store, applies one operation
//! and writes its report to the given writer.

use anyhow::{bail, Context, Result};
use onestyle_theme::{
    namespaced_key, CollectionStore, ConfigStore, CssCompiler, FileStorage,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{OnestyleConfig, CONFIG_FILE};

/// A project directory and its loaded configuration.
pub struct Project {
    pub dir: PathBuf,
    pub config: OnestyleConfig,
}

impl Project {
    /// Load the project at `path` (a directory or an onestyle.toml).
    pub fn load(path: &Path) -> Result<Self> {
        let dir = if path.is_file() {
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            path.to_path_buf()
        };
        let config = OnestyleConfig::load_from_dir(path)?;
        Ok(Self { dir, config })
    }

    fn storage(&self) -> FileStorage {
        FileStorage::new(self.config.storage_dir(&self.dir))
    }

    pub fn open_store(&self) -> ConfigStore {
        ConfigStore::open(self.storage(), self.config.store_config())
    }

    pub fn open_collections(&self) -> CollectionStore {
        let storage = &self.config.storage;
        CollectionStore::open(
            self.storage(),
            namespaced_key(&storage.namespace, &storage.collections_key),
        )
    }

    pub fn compiler(&self) -> CssCompiler {
        CssCompiler::new(self.config.compiler_options())
    }
}

/// Write a fresh onestyle.toml into `dir`.
pub fn init(dir: &Path, name: Option<&str>, out: &mut impl Write) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let name = match name {
        Some(name) => name.to_string(),
        None => dir
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "onestyle".to_string()),
    };
    let config = OnestyleConfig::new(&name);
    fs::write(&path, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writeln!(out, "Created {}", path.display())?;
    Ok(())
}

/// Compile the stored document. `--wrap` emits a `<style>` element.
pub fn compile(
    project: &Project,
    dest: Option<&Path>,
    wrap: bool,
    out: &mut impl Write,
) -> Result<()> {
    let store = project.open_store();
    let css = project
        .compiler()
        .compile(store.document(), store.overrides());
    let text = if wrap {
        format!(
            "<style id=\"{}\">\n{}</style>\n",
            project.config.css.style_id, css
        )
    } else {
        css
    };
    emit(dest, &text, out)
}

pub fn export(project: &Project, dest: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let store = project.open_store();
    let mut text = store.export_config();
    text.push('\n');
    emit(dest, &text, out)
}

pub fn import(project: &Project, file: &Path, out: &mut impl Write) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut store = project.open_store();
    store
        .import_config(&text)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    for problem in store.document().validate() {
        writeln!(out, "warning: {problem}")?;
    }
    writeln!(out, "Imported {}", file.display())?;
    Ok(())
}

pub fn reset(project: &Project, confirmed: bool, out: &mut impl Write) -> Result<()> {
    if !confirmed {
        bail!("`reset` discards every customization and override; pass --yes to confirm");
    }
    let mut store = project.open_store();
    store.reset_to_default();
    writeln!(
        out,
        "Reset to the `{}` defaults",
        project.config.defaults.preset
    )?;
    Ok(())
}

pub fn sync(project: &Project, out: &mut impl Write) -> Result<()> {
    let mut store = project.open_store();
    let added = store.sync_new_components();
    if added.is_empty() {
        writeln!(out, "All default components present")?;
    } else {
        writeln!(out, "Added {} component(s): {}", added.len(), added.join(", "))?;
    }
    Ok(())
}

pub fn set_override(
    project: &Project,
    name: &str,
    value: &str,
    out: &mut impl Write,
) -> Result<()> {
    if !name.starts_with("--") {
        bail!("override name `{name}` must be a custom property (start with `--`)");
    }
    let mut store = project.open_store();
    store.add_custom_override(name, value);
    writeln!(out, "{name}: {value}")?;
    Ok(())
}

pub fn remove_override(project: &Project, name: &str, out: &mut impl Write) -> Result<()> {
    let mut store = project.open_store();
    if !store.remove_custom_override(name) {
        bail!("no override named `{name}`");
    }
    writeln!(out, "Removed {name}")?;
    Ok(())
}

pub fn list_overrides(project: &Project, out: &mut impl Write) -> Result<()> {
    let store = project.open_store();
    for (name, value) in store.overrides() {
        writeln!(out, "{name}: {value}")?;
    }
    Ok(())
}

pub fn list_collections(project: &Project, out: &mut impl Write) -> Result<()> {
    let store = project.open_store();
    let collections = project.open_collections();
    for collection in collections.iter() {
        let live = collections.resolve_scopes(store.document(), &collection.name);
        writeln!(
            out,
            "{} ({} of {} scopes present)",
            collection.name,
            live.len(),
            collection.items.len()
        )?;
        for item in &collection.items {
            let marker = if store.document().scope(item).is_some() {
                ""
            } else {
                " (missing)"
            };
            writeln!(out, "  {item}{marker}")?;
        }
    }
    Ok(())
}

pub fn add_to_collection(
    project: &Project,
    collection: &str,
    scope: &str,
    out: &mut impl Write,
) -> Result<()> {
    let mut collections = project.open_collections();
    collections.create(collection);
    if !collections.add_item(collection, scope) {
        bail!("`{scope}` is already in `{collection}`");
    }
    info!("added `{}` to collection `{}`", scope, collection);
    writeln!(out, "{collection}: +{scope}")?;
    Ok(())
}

pub fn remove_from_collection(
    project: &Project,
    collection: &str,
    scope: &str,
    out: &mut impl Write,
) -> Result<()> {
    let mut collections = project.open_collections();
    if !collections.remove_item(collection, scope) {
        bail!("`{scope}` is not in `{collection}`");
    }
    writeln!(out, "{collection}: -{scope}")?;
    Ok(())
}

pub fn prune_collections(project: &Project, out: &mut impl Write) -> Result<()> {
    let store = project.open_store();
    let mut collections = project.open_collections();
    let removed = collections.prune(store.document());
    writeln!(out, "Pruned {removed} missing scope reference(s)")?;
    Ok(())
}

fn emit(dest: Option<&Path>, text: &str, out: &mut impl Write) -> Result<()> {
    match dest {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            writeln!(out, "Wrote {}", path.display())?;
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn project() -> (TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::load(dir.path()).unwrap();
        (dir, project)
    }

    fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn override_is_compiled() {
        let (_dir, project) = project();
        run(|out| set_override(&project, "--color1-500", "hotpink", out));

        let css = run(|out| compile(&project, None, false, out));
        assert!(css.contains("  --color1-500: hotpink;\n"));

        let listed = run(|out| list_overrides(&project, out));
        assert_eq!(listed, "--color1-500: hotpink\n");

        run(|out| remove_override(&project, "--color1-500", out));
        assert!(remove_override(&project, "--color1-500", &mut Vec::new()).is_err());
    }

    #[test]
    fn wrap_uses_configured_style_id() {
        let (_dir, project) = project();
        let html = run(|out| compile(&project, None, true, out));
        assert!(html.starts_with("<style id=\"onestyle-theme\">\n:root {\n"));
        assert!(html.ends_with("}\n</style>\n"));
    }

    #[test]
    fn export_then_import_round_trips() {
        let (dir, project) = project();
        let file = dir.path().join("theme.json");
        run(|out| export(&project, Some(&file), out));

        let before = run(|out| compile(&project, None, false, out));
        let report = run(|out| import(&project, &file, out));
        assert_eq!(report, format!("Imported {}\n", file.display()));
        assert_eq!(run(|out| compile(&project, None, false, out)), before);
    }

    #[test]
    fn bad_import_fails_and_changes_nothing() {
        let (dir, project) = project();
        run(|out| set_override(&project, "--keep", "1", out));
        let before = run(|out| export(&project, None, out));

        let file = dir.path().join("broken.json");
        fs::write(&file, "{not json").unwrap();
        let err = import(&project, &file, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to import"));
        assert_eq!(run(|out| export(&project, None, out)), before);
    }

    #[test]
    fn reset_requires_confirmation() {
        let (_dir, project) = project();
        run(|out| set_override(&project, "--x", "1", out));

        assert!(reset(&project, false, &mut Vec::new()).is_err());
        assert_eq!(project.open_store().overrides().len(), 1);

        run(|out| reset(&project, true, out));
        assert!(project.open_store().overrides().is_empty());
    }

    #[test]
    fn collections_track_missing_scopes() {
        let (_dir, project) = project();
        run(|out| add_to_collection(&project, "Layout", "one-stack", out));
        run(|out| add_to_collection(&project, "Layout", "gone", out));

        let listing = run(|out| list_collections(&project, out));
        assert_eq!(
            listing,
            "Layout (1 of 2 scopes present)\n  one-stack\n  gone (missing)\n"
        );

        let pruned = run(|out| prune_collections(&project, out));
        assert_eq!(pruned, "Pruned 1 missing scope reference(s)\n");
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let (dir, _) = project();
        run(|out| init(dir.path(), Some("site"), out));
        assert!(init(dir.path(), Some("site"), &mut Vec::new()).is_err());

        let project = Project::load(dir.path()).unwrap();
        assert_eq!(project.config.project.name, "site");
    }
}
