//! Schema walker for the form-data generator
//!
//! Parses the OpenAPI-generated type-declaration source into a syntax tree
//! and indexes the named schema declarations. Only a small closed set of
//! node kinds matters here: top-level structs with named fields; every
//! other item kind is ignored.

use crate::error::{DashboardError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// The fixed, ordered list of chaos kinds the generator processes
pub const CHAOS_KINDS: [&str; 11] = [
    "AWSChaos",
    "DNSChaos",
    "GCPChaos",
    "IOChaos",
    "JVMChaos",
    "KernelChaos",
    "NetworkChaos",
    "PhysicalMachineChaos",
    "PodChaos",
    "StressChaos",
    "TimeChaos",
];

/// Naming convention for a chaos kind's schema declaration
pub fn spec_name(kind: &str) -> String {
    format!("V1alpha1{}Spec", kind)
}

/// Indexed schema declarations from one source file
#[derive(Debug)]
pub struct SchemaIndex {
    structs: BTreeMap<String, syn::ItemStruct>,
}

impl SchemaIndex {
    /// Parse a type-declaration source file
    pub fn parse_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse_source(&source)
    }

    /// Parse type declarations from a source string
    pub fn parse_source(source: &str) -> Result<Self> {
        let file = syn::parse_file(source)?;

        let mut structs = BTreeMap::new();
        for item in file.items {
            // Closed visitor: only named-field structs are schema candidates
            if let syn::Item::Struct(item_struct) = item {
                if matches!(item_struct.fields, syn::Fields::Named(_)) {
                    structs.insert(item_struct.ident.to_string(), item_struct);
                }
            }
        }

        Ok(Self { structs })
    }

    /// Look up a declaration by exact name (used for nested object types)
    pub fn get(&self, name: &str) -> Option<&syn::ItemStruct> {
        self.structs.get(name)
    }

    /// Find the spec declaration for a chaos kind
    ///
    /// A missing declaration is a hard error for this kind: downstream
    /// generated files would otherwise go stale silently.
    pub fn spec_for(&self, kind: &str) -> Result<&syn::ItemStruct> {
        let name = spec_name(kind);
        self.structs.get(&name).ok_or_else(|| {
            DashboardError::schema(kind, format!("declaration `{}` not found", name))
        })
    }

    /// Number of indexed declarations
    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        /// PodChaosSpec defines the attributes that a user creates on a chaos experiment about pods.
        pub struct V1alpha1PodChaosSpec {
            /// +kubebuilder:validation:Enum=pod-kill;pod-failure
            pub action: Option<String>,
            pub duration: Option<String>,
        }

        pub enum NotASchema {
            A,
            B,
        }

        pub struct Tuple(pub u32);
    "#;

    #[test]
    fn test_only_named_field_structs_indexed() {
        let index = SchemaIndex::parse_source(SOURCE).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get("V1alpha1PodChaosSpec").is_some());
        assert!(index.get("Tuple").is_none());
    }

    #[test]
    fn test_spec_lookup_by_convention() {
        let index = SchemaIndex::parse_source(SOURCE).unwrap();
        let spec = index.spec_for("PodChaos").unwrap();
        assert_eq!(spec.ident.to_string(), "V1alpha1PodChaosSpec");
    }

    #[test]
    fn test_missing_spec_is_schema_error() {
        let index = SchemaIndex::parse_source(SOURCE).unwrap();
        let err = index.spec_for("NetworkChaos").unwrap_err();
        match err {
            DashboardError::Schema { kind, message } => {
                assert_eq!(kind, "NetworkChaos");
                assert!(message.contains("V1alpha1NetworkChaosSpec"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_source_is_parse_error() {
        let err = SchemaIndex::parse_source("struct {").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }
}
