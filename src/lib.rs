//! mounted-swagger - Swagger documentation for trees of mounted API modules.
//!
//! API modules declare routes and mount other modules, optionally under a path
//! prefix. This crate walks such a module tree, normalizes every route declaration
//! into a Swagger 2.0 operation, folds them into one root [`Document`] and derives
//! per-resource documents from it on demand.
//!
//! # Architecture
//!
//! 1. [`declaration`] - Raw route declarations (method, path, description, headers, ...)
//! 2. [`module_tree`] - Arena of modules and the walker that resolves mount prefixes
//! 3. [`type_resolver`] - Describes declared parameter types, falling back for unknown ones
//! 4. [`normalizer`] - Turns one declaration into a canonical [`normalizer::Route`]
//! 5. [`document_builder`] - Folds routes into the root document
//! 6. [`partition`] - Per-resource sub-documents keyed by first path segment
//! 7. [`gateway`] - Serves the current document and swaps in rebuilt ones atomically
//! 8. [`manifest`] / [`scanner`] - Load module trees from YAML or JSON files
//! 9. [`serializer`] - Serializes documents to JSON or YAML
//!
//! # Example
//!
//! ```
//! use mounted_swagger::{
//!     config::DocConfig,
//!     declaration::{HttpMethod, RouteDeclaration},
//!     document_builder::generate,
//!     module_tree::ModuleTree,
//!     partition::partition,
//!     type_resolver::TypeRegistry,
//! };
//!
//! let mut tree = ModuleTree::new();
//! let root = tree.add_module("SimpleApi");
//! let mounted = tree.add_module("SimpleMountedApi");
//! tree.route(mounted, RouteDeclaration::new(HttpMethod::Get, "/simple", "This gets something."))
//!     .unwrap()
//!     .route(mounted, RouteDeclaration::new(HttpMethod::Post, "/items", "Creates an item."))
//!     .unwrap();
//! tree.mount(root, mounted, None).unwrap();
//!
//! let document = generate(&tree, root, &TypeRegistry::new(), &DocConfig::default()).unwrap();
//! assert_eq!(document.paths.len(), 2);
//!
//! let items = partition(&document, "items");
//! assert!(items.paths["/items"]["post"].responses.contains_key("201"));
//! ```
//!
//! # Command-Line Interface
//!
//! See the [`cli`] module.

pub mod cli;
pub mod config;
pub mod declaration;
pub mod document_builder;
pub mod error;
pub mod gateway;
pub mod manifest;
pub mod module_tree;
pub mod normalizer;
pub mod partition;
pub mod scanner;
pub mod serializer;
pub mod type_resolver;

pub use document_builder::Document;
pub use error::{Error, Result};
