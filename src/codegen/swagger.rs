//! Swagger `$ref` rewrite
//!
//! Swagger tooling discards sibling properties placed next to a `$ref`, so
//! a fixed set of schema properties gets its `$ref` wrapped in an `allOf`
//! envelope, preserving the siblings. The rewrite is in place and guarded:
//! a property already carrying `allOf` is skipped, making repeat runs
//! no-ops.

use crate::error::Result;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// `(definition, property)` pairs whose `$ref` gets wrapped
pub const WRAPPED_PROPERTIES: [(&str, &str); 2] = [
    ("v1alpha1.IOChaosSpec", "attr"),
    ("v1alpha1.IOChaosSpec", "mistake"),
];

/// Rewrite the swagger document file in place
pub fn wrap_refs_with_all_of(source: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(source)?;
    let mut doc: Value = serde_yaml::from_str(&contents)?;

    for (definition, property) in WRAPPED_PROPERTIES {
        match property_mapping(&mut doc, definition, property) {
            Some(prop) => wrap_property(prop, definition, property),
            None => {
                tracing::warn!(
                    "Property {}.{} not found in {:?}, skipping",
                    definition,
                    property,
                    source
                );
            }
        }
    }

    std::fs::write(source, serde_yaml::to_string(&doc)?)?;
    Ok(())
}

/// Navigate to `definitions.<definition>.properties.<property>`
fn property_mapping<'a>(
    doc: &'a mut Value,
    definition: &str,
    property: &str,
) -> Option<&'a mut Mapping> {
    doc.get_mut("definitions")?
        .get_mut(definition)?
        .get_mut("properties")?
        .get_mut(property)?
        .as_mapping_mut()
}

fn wrap_property(prop: &mut Mapping, definition: &str, property: &str) {
    // Idempotence guard: already wrapped on a previous run
    if prop.contains_key("allOf") {
        tracing::debug!("{}.{} already wrapped, skipping", definition, property);
        return;
    }

    let Some(reference) = prop.remove("$ref") else {
        tracing::warn!("{}.{} has no $ref to wrap", definition, property);
        return;
    };

    let mut envelope = Mapping::new();
    envelope.insert(Value::from("$ref"), reference);
    prop.insert(
        Value::from("allOf"),
        Value::Sequence(vec![Value::Mapping(envelope)]),
    );
}
