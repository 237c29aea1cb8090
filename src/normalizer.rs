use crate::declaration::{HttpMethod, RouteDeclaration};
use crate::document_builder::{Header, Response};
use crate::error::{Error, Result};
use crate::partition::resource_key;
use crate::type_resolver::TypeRegistry;
use indexmap::IndexMap;
use log::debug;

/// Content type a route produces unless it declares its own
pub const DEFAULT_PRODUCES: &str = "application/json";

/// A normalized route, ready to be placed in a document
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Absolute path, always starting with `/`
    pub path: String,
    pub method: HttpMethod,
    /// Per-route override, or the normalizer's default content types
    pub produces: Vec<String>,
    /// Status code -> response, primary code first
    pub responses: IndexMap<String, Response>,
    /// `None` when the declaration has no headers
    pub headers: Option<IndexMap<String, Header>>,
    /// First non-empty path segment; `None` for the root path
    pub resource_key: Option<String>,
}

/// Converts raw route declarations into [`Route`]s.
pub struct RouteNormalizer<'a> {
    registry: &'a TypeRegistry,
    default_status: u16,
    default_produces: Vec<String>,
}

/// Primary status code for a method: 201 for POST, 200 for GET and HEAD,
/// `default` for everything else.
pub fn primary_status(method: HttpMethod, default: u16) -> u16 {
    match method {
        HttpMethod::Get | HttpMethod::Head => 200,
        HttpMethod::Post => 201,
        _ => default,
    }
}

impl<'a> RouteNormalizer<'a> {
    /// Create a normalizer resolving parameter types against `registry`.
    ///
    /// Defaults to a primary status of 200 and produces of [`DEFAULT_PRODUCES`].
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            default_status: 200,
            default_produces: vec![DEFAULT_PRODUCES.to_string()],
        }
    }

    /// Status used as primary code for methods other than GET, HEAD and POST
    pub fn with_default_status(mut self, status: u16) -> Self {
        self.default_status = status;
        self
    }

    /// Content types for routes that do not declare their own
    pub fn with_default_produces(mut self, produces: Vec<String>) -> Self {
        self.default_produces = produces;
        self
    }

    /// Normalize one declaration mounted at `absolute_path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRoute`] when the declaration has no method, or the
    /// path is empty or not absolute.
    pub fn normalize(&self, decl: &RouteDeclaration, absolute_path: &str) -> Result<Route> {
        let method = decl.method.ok_or_else(|| Error::MalformedRoute {
            method: String::new(),
            path: absolute_path.to_string(),
            reason: "missing method".to_string(),
        })?;

        if absolute_path.is_empty() {
            return Err(Error::MalformedRoute {
                method: method.to_string(),
                path: String::new(),
                reason: "missing path".to_string(),
            });
        }
        if !absolute_path.starts_with('/') {
            return Err(Error::MalformedRoute {
                method: method.to_string(),
                path: absolute_path.to_string(),
                reason: "path must start with '/'".to_string(),
            });
        }

        debug!("Normalizing route: {} {}", method, absolute_path);

        let mut responses = IndexMap::new();
        responses.insert(
            primary_status(method, self.default_status).to_string(),
            Response {
                description: decl.description.clone(),
            },
        );
        for http_code in &decl.http_codes {
            // insert() on an existing key keeps its position
            responses.insert(
                http_code.code.to_string(),
                Response {
                    description: http_code.message.clone(),
                },
            );
        }

        let headers = if decl.headers.is_empty() {
            None
        } else {
            Some(
                decl.headers
                    .iter()
                    .map(|(name, header)| {
                        (
                            name.clone(),
                            Header {
                                description: header.description.clone(),
                                required: header.required,
                            },
                        )
                    })
                    .collect(),
            )
        };

        for (name, param) in &decl.params {
            let resolved = self.registry.resolve(param.type_ref.as_ref());
            debug!("  param {}: {}", name, resolved.description);
        }

        let produces = decl
            .produces
            .clone()
            .unwrap_or_else(|| self.default_produces.clone());

        Ok(Route {
            path: absolute_path.to_string(),
            method,
            produces,
            responses,
            headers,
            resource_key: resource_key(absolute_path).map(str::to_string),
        })
    }
}
