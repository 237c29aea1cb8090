//! API module tree and the walker that flattens it into routes.
//!
//! Modules live in an arena ([`ModuleTree`]) and refer to each other by [`ModuleId`].
//! Each module holds an ordered list of entries: its own route declarations and the
//! modules it mounts, optionally under a path prefix. Mounts are positional, so a
//! module's routes and its mounted children's routes come out in exactly the order
//! they were declared.
//!
//! # Example
//!
//! ```
//! use mounted_swagger::declaration::{HttpMethod, RouteDeclaration};
//! use mounted_swagger::module_tree::ModuleTree;
//!
//! let mut tree = ModuleTree::new();
//! let root = tree.add_module("SimpleApi");
//! let mounted = tree.add_module("SimpleMountedApi");
//! tree.route(mounted, RouteDeclaration::new(HttpMethod::Get, "/simple", "This gets something."))
//!     .unwrap();
//! tree.mount(root, mounted, Some("v1")).unwrap();
//!
//! let paths: Vec<String> = tree.walk(root).unwrap().map(|r| r.path).collect();
//! assert_eq!(paths, vec!["/v1/simple".to_string()]);
//! ```

use crate::declaration::RouteDeclaration;
use crate::error::{Error, Result};
use log::debug;

/// Identity of a module inside a [`ModuleTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(usize);

/// One positional entry of a module
#[derive(Debug, Clone)]
pub enum ModuleEntry {
    Route(RouteDeclaration),
    Mount {
        module: ModuleId,
        prefix: Option<String>,
    },
}

/// An API module: a named, ordered list of routes and mounts
#[derive(Debug, Clone)]
pub struct ApiModule {
    pub name: String,
    pub entries: Vec<ModuleEntry>,
}

/// Arena of API modules
#[derive(Debug, Clone, Default)]
pub struct ModuleTree {
    modules: Vec<ApiModule>,
}

/// A route declaration together with its resolved absolute path
#[derive(Debug, Clone)]
pub struct WalkedRoute<'a> {
    pub path: String,
    pub declaration: &'a RouteDeclaration,
    /// Module that declared the route
    pub module: ModuleId,
}

/// Join a base prefix and a relative path with exactly one `/` between them.
///
/// The result always starts with `/` and never ends with one, except for the root
/// path `/` itself. Characters inside segments are kept verbatim.
pub fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_matches('/');
    let path = path.trim_matches('/');
    match (base.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", path),
        (false, true) => format!("/{}", base),
        (false, false) => format!("/{}/{}", base, path),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl ModuleTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty module and return its id
    pub fn add_module(&mut self, name: &str) -> ModuleId {
        debug!("Adding module: {}", name);
        self.modules.push(ApiModule {
            name: name.to_string(),
            entries: Vec::new(),
        });
        ModuleId(self.modules.len() - 1)
    }

    /// Append a route declaration to `module`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `module` does not belong to this tree.
    pub fn route(&mut self, module: ModuleId, declaration: RouteDeclaration) -> Result<&mut Self> {
        self.get_mut(module)?
            .entries
            .push(ModuleEntry::Route(declaration));
        Ok(self)
    }

    /// Mount `child` into `parent` at the current position, optionally under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when either id does not belong to this tree.
    pub fn mount(
        &mut self,
        parent: ModuleId,
        child: ModuleId,
        prefix: Option<&str>,
    ) -> Result<&mut Self> {
        self.get(child)?;
        self.get_mut(parent)?.entries.push(ModuleEntry::Mount {
            module: child,
            prefix: prefix.map(str::to_string),
        });
        Ok(self)
    }

    /// Look up a module by id
    pub fn module(&self, id: ModuleId) -> Option<&ApiModule> {
        self.modules.get(id.0)
    }

    /// Find a module by name; the first one added wins
    pub fn find(&self, name: &str) -> Option<ModuleId> {
        self.modules
            .iter()
            .position(|m| m.name == name)
            .map(ModuleId)
    }

    /// Number of modules in the arena
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn get(&self, id: ModuleId) -> Result<&ApiModule> {
        self.modules
            .get(id.0)
            .ok_or_else(|| Error::InvalidArgument(format!("no module with id {}", id.0)))
    }

    fn get_mut(&mut self, id: ModuleId) -> Result<&mut ApiModule> {
        self.modules
            .get_mut(id.0)
            .ok_or_else(|| Error::InvalidArgument(format!("no module with id {}", id.0)))
    }

    /// Check that no module reachable from `root` mounts itself, directly or
    /// transitively. Mounting the same module twice side by side is fine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicMount`] naming the modules on the first cycle found.
    pub fn check_acyclic(&self, root: ModuleId) -> Result<()> {
        self.get(root)?;
        let mut marks = vec![Mark::Unvisited; self.modules.len()];
        // (module, index of the next entry to inspect)
        let mut stack: Vec<(ModuleId, usize)> = vec![(root, 0)];
        marks[root.0] = Mark::OnStack;

        while let Some(top) = stack.last_mut() {
            let (current, index) = *top;
            top.1 += 1;

            let module = self.get(current)?;
            let Some(entry) = module.entries.get(index) else {
                marks[current.0] = Mark::Done;
                stack.pop();
                continue;
            };

            let ModuleEntry::Mount { module: child, .. } = entry else {
                continue;
            };
            self.get(*child)?;
            match marks[child.0] {
                Mark::Done => {}
                Mark::Unvisited => {
                    marks[child.0] = Mark::OnStack;
                    stack.push((*child, 0));
                }
                Mark::OnStack => {
                    let start = stack
                        .iter()
                        .position(|(id, _)| id == child)
                        .unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..]
                        .iter()
                        .map(|(id, _)| self.modules[id.0].name.clone())
                        .collect();
                    cycle.push(self.modules[child.0].name.clone());
                    return Err(Error::CyclicMount { cycle });
                }
            }
        }

        Ok(())
    }

    /// Flatten the tree below `root` into routes with absolute paths.
    ///
    /// The mount graph is checked for cycles first; the returned iterator is lazy and
    /// a fresh one can be taken any number of times.
    pub fn walk(&self, root: ModuleId) -> Result<RouteWalk<'_>> {
        self.check_acyclic(root)?;
        Ok(RouteWalk {
            tree: self,
            stack: vec![Frame {
                module: root,
                next: 0,
                prefix: String::new(),
            }],
        })
    }
}

struct Frame {
    module: ModuleId,
    next: usize,
    prefix: String,
}

/// Depth-first iterator over the routes of a module tree
pub struct RouteWalk<'a> {
    tree: &'a ModuleTree,
    stack: Vec<Frame>,
}

impl<'a> Iterator for RouteWalk<'a> {
    type Item = WalkedRoute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let frame = self.stack.last_mut()?;
            let entry = tree
                .modules
                .get(frame.module.0)
                .and_then(|m| m.entries.get(frame.next));
            let Some(entry) = entry else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;

            match entry {
                ModuleEntry::Route(declaration) => {
                    return Some(WalkedRoute {
                        path: join_path(&frame.prefix, &declaration.path),
                        declaration,
                        module: frame.module,
                    });
                }
                ModuleEntry::Mount { module, prefix } => {
                    let prefix = match prefix {
                        Some(p) => join_path(&frame.prefix, p),
                        None => frame.prefix.clone(),
                    };
                    debug!(
                        "Entering mounted module {} at '{}'",
                        tree.modules.get(module.0).map_or("?", |m| m.name.as_str()),
                        prefix
                    );
                    self.stack.push(Frame {
                        module: *module,
                        next: 0,
                        prefix,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::HttpMethod;

    fn get(path: &str) -> RouteDeclaration {
        RouteDeclaration::new(HttpMethod::Get, path, path)
    }

    fn paths(tree: &ModuleTree, root: ModuleId) -> Vec<String> {
        tree.walk(root).unwrap().map(|r| r.path).collect()
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", ""), "/");
        assert_eq!(join_path("", "/"), "/");
        assert_eq!(join_path("", "simple"), "/simple");
        assert_eq!(join_path("/", "/simple"), "/simple");
        assert_eq!(join_path("/v1/", "/simple/"), "/v1/simple");
        assert_eq!(join_path("v1", ""), "/v1");
        assert_eq!(join_path("/api", "simple_with-headers"), "/api/simple_with-headers");
    }

    #[test]
    fn test_mount_without_prefix_keeps_paths() {
        let mut tree = ModuleTree::new();
        let root = tree.add_module("SimpleApi");
        let mounted = tree.add_module("SimpleMountedApi");
        tree.route(mounted, get(""))
            .unwrap()
            .route(mounted, get("/simple"))
            .unwrap()
            .route(mounted, get("/simple-test"))
            .unwrap();
        tree.mount(root, mounted, None).unwrap();

        assert_eq!(paths(&tree, root), vec!["/", "/simple", "/simple-test"]);
    }

    #[test]
    fn test_nested_prefixes_accumulate() {
        let mut tree = ModuleTree::new();
        let root = tree.add_module("root");
        let v1 = tree.add_module("v1");
        let ponies = tree.add_module("ponies");
        tree.route(ponies, get("/"))
            .unwrap()
            .route(ponies, get(":id"))
            .unwrap();
        tree.mount(v1, ponies, Some("/ponies/")).unwrap();
        tree.mount(root, v1, Some("v1")).unwrap();

        assert_eq!(paths(&tree, root), vec!["/v1/ponies", "/v1/ponies/:id"]);
    }

    #[test]
    fn test_declaration_order_interleaves_mounts() {
        let mut tree = ModuleTree::new();
        let root = tree.add_module("root");
        let child = tree.add_module("child");
        tree.route(child, get("/b")).unwrap();
        tree.route(root, get("/a")).unwrap();
        tree.mount(root, child, None).unwrap();
        tree.route(root, get("/c")).unwrap();

        assert_eq!(paths(&tree, root), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_walk_is_restartable() {
        let mut tree = ModuleTree::new();
        let root = tree.add_module("root");
        tree.route(root, get("/a"))
            .unwrap()
            .route(root, get("/b"))
            .unwrap();

        assert_eq!(paths(&tree, root), paths(&tree, root));
    }

    #[test]
    fn test_walk_reports_declaring_module() {
        let mut tree = ModuleTree::new();
        let root = tree.add_module("root");
        let child = tree.add_module("child");
        tree.route(child, get("/b")).unwrap();
        tree.mount(root, child, None).unwrap();

        let walked: Vec<_> = tree.walk(root).unwrap().collect();
        assert_eq!(walked[0].module, child);
        assert_eq!(tree.module(child).unwrap().name, "child");
    }

    #[test]
    fn test_self_mount_is_cyclic() {
        let mut tree = ModuleTree::new();
        let root = tree.add_module("loop");
        tree.mount(root, root, None).unwrap();

        match tree.walk(root) {
            Err(Error::CyclicMount { cycle }) => assert_eq!(cycle, vec!["loop", "loop"]),
            other => panic!("expected cyclic mount, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_transitive_cycle_detected() {
        let mut tree = ModuleTree::new();
        let a = tree.add_module("a");
        let b = tree.add_module("b");
        let c = tree.add_module("c");
        tree.route(a, get("/a")).unwrap();
        tree.mount(a, b, Some("b")).unwrap();
        tree.mount(b, c, Some("c")).unwrap();
        tree.mount(c, b, Some("again")).unwrap();

        match tree.check_acyclic(a) {
            Err(Error::CyclicMount { cycle }) => assert_eq!(cycle, vec!["b", "c", "b"]),
            other => panic!("expected cyclic mount, got {:?}", other),
        }
    }

    #[test]
    fn test_diamond_mount_is_not_a_cycle() {
        let mut tree = ModuleTree::new();
        let root = tree.add_module("root");
        let shared = tree.add_module("shared");
        tree.route(shared, get("/status")).unwrap();
        tree.mount(root, shared, Some("v1")).unwrap();
        tree.mount(root, shared, Some("v2")).unwrap();

        assert_eq!(paths(&tree, root), vec!["/v1/status", "/v2/status"]);
    }

    #[test]
    fn test_find_module_by_name() {
        let mut tree = ModuleTree::new();
        let a = tree.add_module("a");
        tree.add_module("b");

        assert_eq!(tree.find("a"), Some(a));
        assert!(tree.find("missing").is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_foreign_module_id_is_rejected() {
        let mut other = ModuleTree::new();
        other.add_module("a");
        let foreign = other.add_module("b");

        let mut tree = ModuleTree::new();
        let root = tree.add_module("root");

        assert!(matches!(
            tree.route(foreign, get("/lost")),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            tree.mount(root, foreign, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            tree.mount(foreign, root, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(tree.module(root).unwrap().entries.is_empty());
    }
}
