//! Per-resource views of a document.
//!
//! A route's resource key is the first non-empty segment of its path, taken
//! literally: `/simple`, `/simple-test` and `/simple_with_headers` are three
//! different resources. The root path `/` has no key and only appears in the
//! root document.

use crate::document_builder::Document;
use indexmap::IndexMap;
use log::debug;
use std::sync::Arc;

/// First non-empty path segment, or `None` for the root path
pub fn resource_key(path: &str) -> Option<&str> {
    path.split('/').find(|segment| !segment.is_empty())
}

/// Distinct resource keys of a document, in first-seen order
pub fn resource_keys(doc: &Document) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for path in doc.paths.keys() {
        if let Some(key) = resource_key(path) {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

/// The sub-document of `doc` holding only the paths whose resource key is `key`.
///
/// Shares `doc`'s metadata; an unknown key yields an empty `paths` map.
pub fn partition(doc: &Document, key: &str) -> Document {
    let paths: IndexMap<_, _> = doc
        .paths
        .iter()
        .filter(|(path, _)| resource_key(path) == Some(key))
        .map(|(path, item)| (path.clone(), item.clone()))
        .collect();
    debug!("Partition '{}': {} of {} paths", key, paths.len(), doc.paths.len());

    Document {
        meta: Arc::clone(&doc.meta),
        paths,
    }
}

/// Every partition of `doc`, keyed by resource key
pub fn partition_all(doc: &Document) -> IndexMap<String, Document> {
    resource_keys(doc)
        .into_iter()
        .map(|key| {
            let part = partition(doc, &key);
            (key, part)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocConfig;
    use crate::declaration::{HttpMethod, RouteDeclaration};
    use crate::document_builder::build_document;
    use crate::normalizer::RouteNormalizer;
    use crate::type_resolver::TypeRegistry;

    fn document(routes: &[(HttpMethod, &str)]) -> Document {
        let registry = TypeRegistry::new();
        let normalizer = RouteNormalizer::new(&registry);
        let routes = routes.iter().map(|(method, path)| {
            normalizer
                .normalize(&RouteDeclaration::new(*method, path, path), path)
                .unwrap()
        });
        build_document(routes, &DocConfig::default()).unwrap()
    }

    #[test]
    fn test_resource_key() {
        assert_eq!(resource_key("/simple-test"), Some("simple-test"));
        assert_eq!(resource_key("/items"), Some("items"));
        assert_eq!(resource_key("/v1/ponies/:id"), Some("v1"));
        assert_eq!(resource_key("//double"), Some("double"));
        assert_eq!(resource_key("/"), None);
        assert_eq!(resource_key(""), None);
    }

    #[test]
    fn test_separators_are_literal() {
        let doc = document(&[
            (HttpMethod::Get, "/simple"),
            (HttpMethod::Get, "/simple-test"),
            (HttpMethod::Get, "/simple_with_headers"),
        ]);

        assert_eq!(resource_keys(&doc), vec!["simple", "simple-test", "simple_with_headers"]);

        let simple = partition(&doc, "simple");
        assert_eq!(simple.paths.keys().collect::<Vec<_>>(), vec!["/simple"]);
        let dashed = partition(&doc, "simple-test");
        assert_eq!(dashed.paths.keys().collect::<Vec<_>>(), vec!["/simple-test"]);
    }

    #[test]
    fn test_partition_groups_nested_paths() {
        let doc = document(&[
            (HttpMethod::Get, "/ponies"),
            (HttpMethod::Get, "/unicorns"),
            (HttpMethod::Get, "/ponies/:id"),
            (HttpMethod::Delete, "/ponies/:id"),
        ]);

        let ponies = partition(&doc, "ponies");
        assert_eq!(
            ponies.paths.keys().collect::<Vec<_>>(),
            vec!["/ponies", "/ponies/:id"]
        );
        assert_eq!(ponies.operation_count(), 3);
    }

    #[test]
    fn test_unknown_key_gives_empty_paths() {
        let doc = document(&[(HttpMethod::Get, "/simple")]);
        let part = partition(&doc, "items");

        assert!(part.paths.is_empty());
        assert_eq!(part.meta, doc.meta);
    }

    #[test]
    fn test_partition_shares_meta() {
        let doc = document(&[(HttpMethod::Get, "/simple"), (HttpMethod::Get, "/items")]);

        for key in resource_keys(&doc) {
            let part = partition(&doc, &key);
            assert!(Arc::ptr_eq(&part.meta, &doc.meta));
        }
    }

    #[test]
    fn test_partitions_reconstruct_document_without_root() {
        let doc = document(&[
            (HttpMethod::Get, "/"),
            (HttpMethod::Get, "/simple"),
            (HttpMethod::Get, "/simple-test"),
            (HttpMethod::Post, "/items"),
            (HttpMethod::Get, "/simple/nested"),
        ]);

        let parts = partition_all(&doc);
        let mut seen = 0;
        for (key, part) in &parts {
            for (path, item) in &part.paths {
                assert_eq!(resource_key(path), Some(key.as_str()));
                assert_eq!(&doc.paths[path], item);
                seen += 1;
            }
        }

        // Everything except the root path, each exactly once
        assert_eq!(seen, doc.paths.len() - 1);
        assert!(parts.values().all(|p| !p.paths.contains_key("/")));
    }
}
