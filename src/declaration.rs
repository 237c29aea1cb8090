//! Route declarations as authored by API modules.
//!
//! These types are the raw input of the engine. They deserialize from YAML or JSON
//! module manifests (see [`crate::manifest`]) and can also be built programmatically:
//!
//! ```
//! use mounted_swagger::declaration::{HeaderDecl, HttpMethod, RouteDeclaration};
//!
//! let route = RouteDeclaration::new(HttpMethod::Get, "/simple_with_headers", "this gets something else")
//!     .with_header("XAuthToken", HeaderDecl::new("A required header.", true))
//!     .with_http_code(403, "invalid pony");
//! assert_eq!(route.http_codes.len(), 1);
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// HTTP methods a route can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Upper-case verb, as used in log lines and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Lower-case verb, used as the operation key inside a path item
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Scalar type names understood without registration
pub const BUILTIN_TYPES: &[&str] = &[
    "String", "Integer", "Float", "Boolean", "Date", "DateTime", "Symbol", "Array", "Hash",
    "File", "JSON",
];

/// Declared type of a parameter.
///
/// A closed union: either one of the [`BUILTIN_TYPES`] or a named custom type that is
/// looked up in a [`crate::type_resolver::TypeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum TypeRef {
    Builtin(String),
    Custom(String),
}

impl TypeRef {
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Builtin(name) | TypeRef::Custom(name) => name,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        if BUILTIN_TYPES.contains(&name) {
            TypeRef::Builtin(name.to_string())
        } else {
            TypeRef::Custom(name.to_string())
        }
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::from(name.as_str())
    }
}

/// A declared request parameter
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParamDecl {
    /// Declared type; `None` means the default scalar
    #[serde(rename = "type", default)]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl ParamDecl {
    pub fn new(description: &str) -> Self {
        Self {
            type_ref: None,
            description: description.to_string(),
            required: false,
        }
    }

    pub fn typed(type_ref: impl Into<TypeRef>, description: &str) -> Self {
        Self {
            type_ref: Some(type_ref.into()),
            description: description.to_string(),
            required: false,
        }
    }
}

/// A declared request header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeaderDecl {
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl HeaderDecl {
    pub fn new(description: &str, required: bool) -> Self {
        Self {
            description: description.to_string(),
            required,
        }
    }
}

/// An additional response code a route may answer with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpCode {
    pub code: u16,
    pub message: String,
}

/// One route as declared inside an API module.
///
/// `path` is relative to the module it is declared in; the module walker resolves it
/// against the mount prefixes above it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteDeclaration {
    #[serde(default)]
    pub method: Option<HttpMethod>,
    #[serde(default)]
    pub path: String,
    /// Becomes the description of the primary response
    pub description: String,
    /// Informational only, never emitted
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub headers: IndexMap<String, HeaderDecl>,
    #[serde(default)]
    pub params: IndexMap<String, ParamDecl>,
    #[serde(default)]
    pub http_codes: Vec<HttpCode>,
    /// Content types this route produces, when different from the default
    #[serde(default)]
    pub produces: Option<Vec<String>>,
}

impl RouteDeclaration {
    pub fn new(method: HttpMethod, path: &str, description: &str) -> Self {
        Self {
            method: Some(method),
            path: path.to_string(),
            description: description.to_string(),
            notes: None,
            headers: IndexMap::new(),
            params: IndexMap::new(),
            http_codes: Vec::new(),
            produces: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, header: HeaderDecl) -> Self {
        self.headers.insert(name.to_string(), header);
        self
    }

    pub fn with_param(mut self, name: &str, param: ParamDecl) -> Self {
        self.params.insert(name.to_string(), param);
        self
    }

    pub fn with_http_code(mut self, code: u16, message: &str) -> Self {
        self.http_codes.push(HttpCode {
            code,
            message: message.to_string(),
        });
        self
    }

    pub fn with_produces(mut self, produces: &[&str]) -> Self {
        self.produces = Some(produces.iter().map(|p| p.to_string()).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parse_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_type_ref_builtin_vs_custom() {
        assert_eq!(TypeRef::from("Integer"), TypeRef::Builtin("Integer".to_string()));
        assert_eq!(TypeRef::from("CustomType"), TypeRef::Custom("CustomType".to_string()));
    }

    #[test]
    fn test_deserialize_route_from_yaml() {
        let yaml = r#"
method: get
path: /simple_with_headers
description: this gets something else
headers:
  XAuthToken:
    description: A required header.
    required: true
  XOtherHeader:
    description: An optional header.
http_codes:
  - code: 403
    message: invalid pony
params:
  custom:
    type: CustomType
    description: array of items
"#;
        let route: RouteDeclaration = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(route.method, Some(HttpMethod::Get));
        assert_eq!(route.headers.len(), 2);
        assert!(route.headers["XAuthToken"].required);
        assert!(!route.headers["XOtherHeader"].required);
        assert_eq!(route.http_codes[0].code, 403);
        assert_eq!(
            route.params["custom"].type_ref,
            Some(TypeRef::Custom("CustomType".to_string()))
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown_method() {
        let yaml = "method: fetch\npath: /x\ndescription: nope\n";
        let result: Result<RouteDeclaration, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_method_is_optional_in_input() {
        let yaml = "path: /x\ndescription: no verb\n";
        let route: RouteDeclaration = serde_yaml::from_str(yaml).unwrap();
        assert!(route.method.is_none());
    }
}
