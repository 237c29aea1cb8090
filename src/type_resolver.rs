use crate::declaration::TypeRef;
use log::{debug, warn};
use std::collections::HashMap;

/// Description used when a parameter declares no type
pub const DEFAULT_TYPE_DESCRIPTION: &str = "String";

/// Description used for custom types nobody registered
pub const FALLBACK_TYPE_DESCRIPTION: &str = "Object";

/// Type registry - maps custom type names to their documentation descriptions
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Registered custom types (name -> description)
    custom_types: HashMap<String, String>,
}

/// Resolved type information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Human-readable description of the type
    pub description: String,
    /// How the description was obtained
    pub kind: TypeKind,
}

/// Type kind - records which branch of resolution produced a description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// No type declared, or a built-in scalar
    Builtin,
    /// A registered custom type
    Custom,
    /// An unregistered custom type that degraded to the fallback
    Fallback,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom type; an empty description documents it by name
    pub fn register(&mut self, name: &str, description: &str) {
        debug!("Registering custom type: {}", name);
        self.custom_types
            .insert(name.to_string(), description.to_string());
    }

    /// Merge every entry of `other` into this registry, later entries winning
    pub fn extend(&mut self, other: TypeRegistry) {
        self.custom_types.extend(other.custom_types);
    }

    /// Check if a custom type has been registered
    pub fn contains(&self, name: &str) -> bool {
        self.custom_types.contains_key(name)
    }

    /// Number of registered custom types
    pub fn len(&self) -> usize {
        self.custom_types.len()
    }

    /// Check if no custom type has been registered
    pub fn is_empty(&self) -> bool {
        self.custom_types.is_empty()
    }

    /// Resolve a declared type to its description.
    ///
    /// An absent type is [`DEFAULT_TYPE_DESCRIPTION`], a built-in type is its own name
    /// and a registered custom type is its registered description. Never fails: an
    /// unknown custom type resolves to [`FALLBACK_TYPE_DESCRIPTION`] with a warning.
    pub fn resolve(&self, type_ref: Option<&TypeRef>) -> ResolvedType {
        match type_ref {
            None => ResolvedType {
                description: DEFAULT_TYPE_DESCRIPTION.to_string(),
                kind: TypeKind::Builtin,
            },
            Some(TypeRef::Builtin(name)) => ResolvedType {
                description: name.clone(),
                kind: TypeKind::Builtin,
            },
            Some(TypeRef::Custom(name)) => match self.custom_types.get(name) {
                Some(description) if !description.is_empty() => ResolvedType {
                    description: description.clone(),
                    kind: TypeKind::Custom,
                },
                Some(_) => ResolvedType {
                    description: name.clone(),
                    kind: TypeKind::Custom,
                },
                None => {
                    warn!(
                        "Could not resolve custom type {}, documenting it as {}",
                        name, FALLBACK_TYPE_DESCRIPTION
                    );
                    ResolvedType {
                        description: FALLBACK_TYPE_DESCRIPTION.to_string(),
                        kind: TypeKind::Fallback,
                    }
                }
            },
        }
    }

    /// Shorthand for `resolve(type_ref).description`
    pub fn describe(&self, type_ref: Option<&TypeRef>) -> String {
        self.resolve(type_ref).description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_type_uses_default() {
        let registry = TypeRegistry::new();
        let resolved = registry.resolve(None);

        assert_eq!(resolved.description, "String");
        assert_eq!(resolved.kind, TypeKind::Builtin);
    }

    #[test]
    fn test_builtin_type_resolves_to_its_name() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.describe(Some(&TypeRef::from("Integer"))), "Integer");
    }

    #[test]
    fn test_registered_custom_type() {
        let mut registry = TypeRegistry::new();
        registry.register("Pony", "A small horse");
        registry.register("CustomType", "");

        let pony = registry.resolve(Some(&TypeRef::from("Pony")));
        assert_eq!(pony.description, "A small horse");
        assert_eq!(pony.kind, TypeKind::Custom);

        // Registered without a description: documented by name
        assert_eq!(registry.describe(Some(&TypeRef::from("CustomType"))), "CustomType");
    }

    #[test]
    fn test_unknown_custom_type_falls_back() {
        let registry = TypeRegistry::new();
        let resolved = registry.resolve(Some(&TypeRef::Custom("Missing".to_string())));

        assert_eq!(resolved.description, FALLBACK_TYPE_DESCRIPTION);
        assert_eq!(resolved.kind, TypeKind::Fallback);
    }

    #[test]
    fn test_extend_merges_registries() {
        let mut a = TypeRegistry::new();
        a.register("A", "first");
        let mut b = TypeRegistry::new();
        b.register("B", "second");
        b.register("A", "override");

        a.extend(b);

        assert_eq!(a.len(), 2);
        assert!(a.contains("B"));
        assert_eq!(a.describe(Some(&TypeRef::from("A"))), "override");
    }
}
