use crate::config::DocConfig;
use crate::error::{Error, Result};
use crate::module_tree::{ModuleId, ModuleTree};
use crate::normalizer::{Route, RouteNormalizer};
use crate::type_resolver::TypeRegistry;
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Swagger Info object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
}

/// Document-wide fields, shared by a root document and all of its partitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Title and version of the API
    pub info: Info,
    /// Schema version literal
    pub swagger: String,
    /// Content types supported by the API as a whole
    pub produces: Vec<String>,
    /// Host the API is served from; omitted when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Transfer protocols; omitted when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
}

/// Lower-case method -> operation, in declaration order
pub type PathItem = IndexMap<String, Operation>;

/// Swagger Operation object - one method on one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Content types this operation produces
    pub produces: Vec<String>,
    /// Status code -> response
    pub responses: IndexMap<String, Response>,
    /// Request headers; omitted entirely when the route declares none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Header>>,
}

/// Swagger Response object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Description of the route, or the message of a declared status code
    pub description: String,
}

/// A documented request header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub description: String,
    pub required: bool,
}

/// A complete documentation document.
///
/// Serializes flat as `{info, swagger, produces, host, schemes, paths}`. A document is
/// never modified after it is built; partitions share its `meta` through the `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub meta: Arc<DocumentMeta>,
    /// Absolute path -> path item, in declaration order
    pub paths: IndexMap<String, PathItem>,
}

impl Document {
    /// Number of operations across all paths
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }

    /// Look up the operation for `path` and a lower-case `method` key
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(method))
    }
}

impl From<&DocConfig> for DocumentMeta {
    fn from(config: &DocConfig) -> Self {
        Self {
            info: Info {
                title: config.title.clone(),
                version: config.version.clone(),
            },
            swagger: config.swagger.clone(),
            produces: config.produces.clone(),
            host: config.host.clone(),
            schemes: config.schemes.clone(),
        }
    }
}

impl From<Route> for Operation {
    fn from(route: Route) -> Self {
        Self {
            produces: route.produces,
            responses: route.responses,
            headers: route.headers,
        }
    }
}

/// Document builder - folds normalized routes into a [`Document`]
pub struct DocumentBuilder {
    meta: Arc<DocumentMeta>,
    paths: IndexMap<String, PathItem>,
    route_count: usize,
}

impl DocumentBuilder {
    /// Create an empty builder whose document fields come from `config`
    pub fn new(config: &DocConfig) -> Self {
        debug!("Initializing DocumentBuilder");
        Self {
            meta: Arc::new(DocumentMeta::from(config)),
            paths: IndexMap::new(),
            route_count: 0,
        }
    }

    /// Add a route to the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRoute`] if the path already has an operation for the
    /// route's method.
    pub fn add_route(&mut self, route: Route) -> Result<()> {
        let method = route.method.key();
        debug!("Adding route: {} {}", route.method, route.path);

        if self
            .paths
            .get(&route.path)
            .is_some_and(|item| item.contains_key(method))
        {
            return Err(Error::DuplicateRoute {
                method: route.method.to_string(),
                path: route.path,
            });
        }

        let path_item = self.paths.entry(route.path.clone()).or_default();
        path_item.insert(method.to_string(), Operation::from(route));
        self.route_count += 1;
        Ok(())
    }

    /// Number of operations added so far
    pub fn route_count(&self) -> usize {
        self.route_count
    }

    /// Build the final document
    pub fn build(self) -> Document {
        debug!(
            "Building document with {} paths, {} operations",
            self.paths.len(),
            self.route_count
        );
        Document {
            meta: self.meta,
            paths: self.paths,
        }
    }
}

/// Build a document from already normalized routes
pub fn build_document<I>(routes: I, config: &DocConfig) -> Result<Document>
where
    I: IntoIterator<Item = Route>,
{
    let mut builder = DocumentBuilder::new(config);
    for route in routes {
        builder.add_route(route)?;
    }
    Ok(builder.build())
}

/// Walk the module tree below `root`, normalize every route and build the document.
///
/// Stops at the first malformed route, duplicate route or mount cycle; no partial
/// document is ever returned.
pub fn generate(
    tree: &ModuleTree,
    root: ModuleId,
    registry: &TypeRegistry,
    config: &DocConfig,
) -> Result<Document> {
    let normalizer = RouteNormalizer::new(registry).with_default_status(config.default_status);
    let mut builder = DocumentBuilder::new(config);

    for walked in tree.walk(root)? {
        let route = normalizer.normalize(walked.declaration, &walked.path)?;
        builder.add_route(route)?;
    }

    let document = builder.build();
    info!(
        "Built document: {} paths, {} operations",
        document.paths.len(),
        document.operation_count()
    );
    Ok(document)
}
