//! Schema-to-form code generation
//!
//! A one-shot offline pipeline, independent of the running dashboard:
//! the OpenAPI-generated type declarations are parsed into a syntax tree
//! ([`walker`]), each chaos kind's spec declaration is reduced to form-field
//! metadata ([`extract`]), and the collected descriptors are emitted back as
//! generated source files ([`emit`]). A companion rewrite ([`swagger`])
//! patches the upstream swagger document before type generation.
//!
//! Invoked at build time through the `chaosdash-openapi` binary.

pub mod emit;
pub mod extract;
pub mod swagger;
pub mod walker;

pub use emit::{generate_forms, GenReport, ACTIONS_INDEX_FILE, GENERATED_BANNER};
pub use extract::{extract_form, ExtractedForm, FieldDescriptor, FieldKind, FieldValue};
pub use swagger::wrap_refs_with_all_of;
pub use walker::{spec_name, SchemaIndex, CHAOS_KINDS};
