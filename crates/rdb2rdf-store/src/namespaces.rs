//! Prefix-to-namespace bindings
//!
//! Process-local mutable state guarded by nothing, matching the store's
//! single-threaded-use assumption — `StoreFacade` is not `Sync`.

use std::collections::HashMap;

/// A bidirectional prefix/namespace table.
#[derive(Debug, Default)]
pub struct NamespaceTable {
    by_prefix: HashMap<String, String>,
    by_namespace: HashMap<String, String>,
}

impl NamespaceTable {
    pub fn bind(&mut self, prefix: &str, namespace: &str) {
        self.by_prefix.insert(prefix.to_string(), namespace.to_string());
        self.by_namespace.insert(namespace.to_string(), prefix.to_string());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.by_namespace.get(namespace).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_prefix.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }
}
