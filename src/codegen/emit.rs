//! Form-data emitter
//!
//! Serializes the extracted `(actions, fields)` of each chaos kind back into
//! source-level declarations: one generated file per kind plus one aggregate
//! action index. Declarations are built as token streams and printed with
//! `prettyplease`. Each kind's generation is independent; a failure is
//! logged and the remaining kinds still run.

use crate::codegen::extract::{extract_form, ExtractedForm, FieldDescriptor, FieldKind, FieldValue};
use crate::codegen::walker::{SchemaIndex, CHAOS_KINDS};
use crate::error::Result;
use proc_macro2::TokenStream;
use quote::quote;
use std::path::Path;

/// Banner prefixed to every generated file
pub const GENERATED_BANNER: &str = "\
//! This file was auto-generated by chaosdash-openapi.
//! Do not make direct changes to the file.

";

/// Filename of the aggregate action index
pub const ACTIONS_INDEX_FILE: &str = "actions.rs";

/// Outcome of one generation run
#[derive(Debug, Default)]
pub struct GenReport {
    /// Kinds whose files were written successfully
    pub generated: Vec<String>,
    /// Per-kind failures: (kind, diagnostic)
    pub failed: Vec<(String, String)>,
}

/// Generate the per-kind form-data files and the aggregate action index
///
/// The aggregate map is fully assembled before any file write begins; the
/// writes themselves are independent and failure-isolated per file.
pub fn generate_forms(schema_path: &Path, out_dir: &Path) -> Result<GenReport> {
    let index = SchemaIndex::parse_file(schema_path)?;
    std::fs::create_dir_all(out_dir)?;

    let mut report = GenReport::default();
    let mut extracted: Vec<(&str, ExtractedForm)> = Vec::new();

    for kind in CHAOS_KINDS {
        match index.spec_for(kind) {
            Ok(spec) => extracted.push((kind, extract_form(spec, &index))),
            Err(e) => {
                tracing::error!("{}", e);
                report.failed.push((kind.to_string(), e.to_string()));
            }
        }
    }

    for (kind, form) in &extracted {
        let path = out_dir.join(format!("{}.rs", kind));
        let result = render_module(form)
            .and_then(|src| Ok(std::fs::write(&path, format!("{}{}", GENERATED_BANNER, src))?));
        match result {
            Ok(()) => {
                tracing::info!("{} form data generated", kind);
                report.generated.push(kind.to_string());
            }
            Err(e) => {
                tracing::error!("Failed to generate {} form data: {}", kind, e);
                report.failed.push((kind.to_string(), e.to_string()));
            }
        }
    }

    let entries: Vec<(&str, &[String])> = extracted
        .iter()
        .map(|(kind, form)| (*kind, form.actions.as_slice()))
        .collect();
    let index_path = out_dir.join(ACTIONS_INDEX_FILE);
    match render_actions_index(&entries)
        .and_then(|src| Ok(std::fs::write(&index_path, format!("{}{}", GENERATED_BANNER, src))?))
    {
        Ok(()) => tracing::info!("action index generated"),
        Err(e) => {
            tracing::error!("Failed to generate action index: {}", e);
            report.failed.push(("actions".to_string(), e.to_string()));
        }
    }

    Ok(report)
}

/// Render one kind's generated declaration source
///
/// Descriptors are emitted as plain expressions (`Vec::from([..])`, never
/// `vec![..]`): `prettyplease` leaves macro bodies as raw token streams,
/// which would make the generated files unreadable.
pub fn render_module(form: &ExtractedForm) -> Result<String> {
    let actions = &form.actions;
    let fields = form.fields.iter().map(descriptor_tokens);

    let tokens = quote! {
        use chaosdash_rs::codegen::{FieldDescriptor, FieldKind, FieldValue};

        pub const ACTIONS: &[&str] = &[#(#actions),*];

        pub fn fields() -> Vec<FieldDescriptor> {
            Vec::from([#(#fields),*])
        }
    };

    print_tokens(tokens)
}

/// Render the aggregate action index source
pub fn render_actions_index(entries: &[(&str, &[String])]) -> Result<String> {
    let rows = entries.iter().map(|(kind, actions)| {
        let actions = actions.iter();
        quote! { (#kind, &[#(#actions),*]) }
    });

    let tokens = quote! {
        pub const ALL_ACTIONS: &[(&str, &[&str])] = &[#(#rows),*];

        pub fn actions_for(kind: &str) -> Option<&'static [&'static str]> {
            ALL_ACTIONS.iter().find(|(k, _)| *k == kind).map(|(_, v)| *v)
        }
    };

    print_tokens(tokens)
}

fn print_tokens(tokens: TokenStream) -> Result<String> {
    let file = syn::parse2(tokens)?;
    Ok(prettyplease::unparse(&file))
}

fn descriptor_tokens(descriptor: &FieldDescriptor) -> TokenStream {
    let kind = kind_tokens(descriptor.field);
    let label = &descriptor.label;
    let value = value_tokens(&descriptor.value);
    let helper = &descriptor.helper_text;

    quote! {
        FieldDescriptor {
            field: #kind,
            label: #label.to_string(),
            value: #value,
            helper_text: #helper.to_string(),
        }
    }
}

fn kind_tokens(kind: FieldKind) -> TokenStream {
    match kind {
        FieldKind::Text => quote! { FieldKind::Text },
        FieldKind::Number => quote! { FieldKind::Number },
        FieldKind::Label => quote! { FieldKind::Label },
        FieldKind::TextText => quote! { FieldKind::TextText },
        FieldKind::Ref => quote! { FieldKind::Ref },
    }
}

fn value_tokens(value: &FieldValue) -> TokenStream {
    match value {
        FieldValue::Text(s) if s.is_empty() => quote! { FieldValue::Text(String::new()) },
        FieldValue::Text(s) => quote! { FieldValue::Text(#s.to_string()) },
        FieldValue::Number(n) => quote! { FieldValue::Number(#n) },
        FieldValue::Labels(items) if items.is_empty() => {
            quote! { FieldValue::Labels(Vec::new()) }
        }
        FieldValue::Labels(items) => {
            quote! { FieldValue::Labels(Vec::from([#(#items.to_string()),*])) }
        }
        FieldValue::Pairs(pairs) if pairs.is_empty() => {
            quote! { FieldValue::Pairs(Vec::new()) }
        }
        FieldValue::Pairs(pairs) => {
            let keys = pairs.iter().map(|(k, _)| k);
            let values = pairs.iter().map(|(_, v)| v);
            quote! { FieldValue::Pairs(Vec::from([#((#keys.to_string(), #values.to_string())),*])) }
        }
        FieldValue::Nested(fields) => {
            let fields = fields.iter().map(descriptor_tokens);
            quote! { FieldValue::Nested(Vec::from([#(#fields),*])) }
        }
    }
}
