//! Module manifests: the on-disk form of API modules.
//!
//! Each manifest file declares one module:
//!
//! ```yaml
//! name: SimpleApi
//! types:
//!   CustomType: A custom parameter type
//! entries:
//!   - route:
//!       method: get
//!       path: /simple
//!       description: This gets something.
//!   - mount:
//!       module: SimpleMountedApi
//!       prefix: v1
//! ```
//!
//! Entries keep their order; mounts refer to other modules by name and are resolved
//! by [`assemble`].

use crate::declaration::RouteDeclaration;
use crate::error::{Error, Result as DocResult};
use crate::module_tree::{ModuleId, ModuleTree};
use crate::scanner::ManifestScanner;
use crate::type_resolver::TypeRegistry;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One module as declared in a manifest file
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    pub name: String,
    /// Custom types documented by this module (name -> description)
    #[serde(default)]
    pub types: IndexMap<String, String>,
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

/// A manifest entry; exactly one of `route` and `mount` must be set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    #[serde(default)]
    pub route: Option<RouteDeclaration>,
    #[serde(default)]
    pub mount: Option<MountManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MountManifest {
    /// Name of the mounted module
    pub module: String,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// An assembled module tree, ready to walk
#[derive(Debug, Clone)]
pub struct LoadedApi {
    pub tree: ModuleTree,
    pub root: ModuleId,
    pub registry: TypeRegistry,
}

/// Reads module manifests from YAML or JSON files.
pub struct ManifestLoader;

impl ManifestLoader {
    /// Parses one manifest; `.json` files are read as JSON, everything else as YAML.
    pub fn load_file(path: &Path) -> Result<ModuleManifest> {
        debug!("Loading manifest: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let manifest: ModuleManifest = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON manifest: {}", path.display()))?,
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML manifest: {}", path.display()))?,
        };

        debug!(
            "Loaded module {} with {} entries",
            manifest.name,
            manifest.entries.len()
        );
        Ok(manifest)
    }

    /// Parses every file, returning one result per path.
    pub fn load_files(paths: &[PathBuf]) -> Vec<Result<ModuleManifest>> {
        paths
            .iter()
            .map(|path| {
                Self::load_file(path).inspect_err(|e| {
                    warn!("Failed to load {}: {:#}", path.display(), e);
                })
            })
            .collect()
    }

    /// Scans `dir`, loads every manifest and assembles the tree.
    ///
    /// Unlike a best-effort scan, any unreadable manifest fails the whole load: a
    /// missing module would silently drop routes from the document.
    pub fn load_dir(dir: &Path, root: Option<&str>) -> Result<LoadedApi> {
        let scan = ManifestScanner::new(dir.to_path_buf()).scan()?;
        for warning in &scan.warnings {
            warn!("{}", warning);
        }
        if scan.manifest_files.is_empty() {
            anyhow::bail!("No module manifests found in {}", dir.display());
        }
        info!("Found {} manifest files", scan.manifest_files.len());

        let manifests = Self::load_files(&scan.manifest_files)
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        let root_name = match root {
            Some(name) => name.to_string(),
            None => infer_root(&manifests)?,
        };
        info!("Root module: {}", root_name);

        let (tree, registry) = assemble(&manifests)?;
        let root = tree
            .find(&root_name)
            .ok_or_else(|| Error::InvalidArgument(format!("no module named '{}'", root_name)))?;

        Ok(LoadedApi {
            tree,
            root,
            registry,
        })
    }
}

/// Build a module tree and type registry from manifests, resolving mounts by name.
///
/// # Errors
///
/// [`Error::DuplicateModule`] when two manifests share a name,
/// [`Error::UnknownModule`] when a mount names a module nobody declares, and
/// [`Error::InvalidArgument`] for an entry that is not exactly one of route or mount.
pub fn assemble(manifests: &[ModuleManifest]) -> DocResult<(ModuleTree, TypeRegistry)> {
    let mut tree = ModuleTree::new();
    let mut registry = TypeRegistry::new();
    let mut ids = Vec::with_capacity(manifests.len());

    for manifest in manifests {
        if tree.find(&manifest.name).is_some() {
            return Err(Error::DuplicateModule(manifest.name.clone()));
        }
        ids.push(tree.add_module(&manifest.name));
        for (name, description) in &manifest.types {
            registry.register(name, description);
        }
    }

    for (manifest, &id) in manifests.iter().zip(&ids) {
        for (index, entry) in manifest.entries.iter().enumerate() {
            match (&entry.route, &entry.mount) {
                (Some(route), None) => {
                    tree.route(id, route.clone())?;
                }
                (None, Some(mount)) => {
                    let child = tree.find(&mount.module).ok_or_else(|| Error::UnknownModule {
                        name: mount.module.clone(),
                        referenced_by: manifest.name.clone(),
                    })?;
                    tree.mount(id, child, mount.prefix.as_deref())?;
                }
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "entry {} of module '{}' must be exactly one of 'route' or 'mount'",
                        index, manifest.name
                    )))
                }
            }
        }
    }

    Ok((tree, registry))
}

/// The single module that no other module mounts.
pub fn infer_root(manifests: &[ModuleManifest]) -> DocResult<String> {
    let mounted: HashSet<&str> = manifests
        .iter()
        .flat_map(|m| m.entries.iter())
        .filter_map(|e| e.mount.as_ref())
        .map(|m| m.module.as_str())
        .collect();

    let candidates: Vec<&str> = manifests
        .iter()
        .map(|m| m.name.as_str())
        .filter(|name| !mounted.contains(name))
        .collect();

    match candidates.as_slice() {
        [root] => Ok(root.to_string()),
        [] => Err(Error::InvalidArgument(
            "every module is mounted somewhere; pass the root module explicitly".to_string(),
        )),
        many => Err(Error::InvalidArgument(format!(
            "several candidate root modules ({}); pass the root module explicitly",
            many.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ROOT: &str = r#"
name: SimpleApi
entries:
  - mount:
      module: SimpleMountedApi
"#;

    const MOUNTED: &str = r#"
name: SimpleMountedApi
types:
  CustomType: ""
entries:
  - route:
      method: get
      path: /simple
      description: This gets something.
      notes: _test_
  - route:
      method: post
      path: /items
      description: this takes an array of parameters
"#;

    fn parse(yaml: &str) -> ModuleManifest {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = parse(MOUNTED);

        assert_eq!(manifest.name, "SimpleMountedApi");
        assert_eq!(manifest.entries.len(), 2);
        assert!(manifest.entries[0].route.is_some());
        assert!(manifest.types.contains_key("CustomType"));
    }

    #[test]
    fn test_assemble_resolves_mounts() {
        let manifests = vec![parse(ROOT), parse(MOUNTED)];
        let (tree, registry) = assemble(&manifests).unwrap();

        let root = tree.find("SimpleApi").unwrap();
        let paths: Vec<String> = tree.walk(root).unwrap().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/simple", "/items"]);
        assert!(registry.contains("CustomType"));
    }

    #[test]
    fn test_assemble_unknown_module() {
        let manifests = vec![parse(ROOT)];
        match assemble(&manifests) {
            Err(Error::UnknownModule { name, referenced_by }) => {
                assert_eq!(name, "SimpleMountedApi");
                assert_eq!(referenced_by, "SimpleApi");
            }
            other => panic!("expected unknown module, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_assemble_duplicate_module() {
        let manifests = vec![parse(MOUNTED), parse(MOUNTED)];
        assert!(matches!(assemble(&manifests), Err(Error::DuplicateModule(_))));
    }

    #[test]
    fn test_assemble_rejects_ambiguous_entry() {
        let manifest = parse("name: bad\nentries:\n  - {}\n");
        assert!(matches!(
            assemble(&[manifest]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_infer_root() {
        let manifests = vec![parse(MOUNTED), parse(ROOT)];
        assert_eq!(infer_root(&manifests).unwrap(), "SimpleApi");

        let two_roots = vec![parse(MOUNTED), parse("name: Other\n")];
        assert!(infer_root(&two_roots).is_err());
    }

    #[test]
    fn test_load_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("simple_api.yaml"), ROOT).unwrap();
        fs::write(temp_dir.path().join("simple_mounted_api.yaml"), MOUNTED).unwrap();

        let loaded = ManifestLoader::load_dir(temp_dir.path(), None).unwrap();

        assert_eq!(loaded.tree.len(), 2);
        assert_eq!(loaded.tree.module(loaded.root).unwrap().name, "SimpleApi");
    }

    #[test]
    fn test_load_dir_fails_on_broken_manifest() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("simple_api.yaml"), ROOT).unwrap();
        fs::write(temp_dir.path().join("broken.yaml"), "name: [unclosed").unwrap();

        assert!(ManifestLoader::load_dir(temp_dir.path(), Some("SimpleApi")).is_err());
    }

    #[test]
    fn test_load_json_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("api.json");
        fs::write(
            &path,
            r#"{"name": "api", "entries": [{"route": {"method": "GET", "path": "/status", "description": "ok"}}]}"#,
        )
        .unwrap();

        let manifest = ManifestLoader::load_file(&path).unwrap();
        assert_eq!(manifest.entries.len(), 1);
    }
}
