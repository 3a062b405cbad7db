//! Field extractor for the form-data generator
//!
//! Walks the property members of a matched schema declaration in source
//! order and classifies each one: ignored outright, the enum-valued
//! `action` field, marker-ignored, or a regular form field with a kind,
//! default value and helper text. Nested object types recurse with the
//! same rules.

use crate::codegen::walker::SchemaIndex;
use regex::Regex;
use std::sync::OnceLock;

/// Schema properties never surfaced as form fields
pub const IGNORED_FIELDS: [&str; 3] = ["selector", "mode", "value"];

/// The reserved property enumerating a chaos kind's operation modes
pub const ACTION_FIELD: &str = "action";

/// Marker excluding a field from generated forms
pub const IGNORE_MARKER: &str = "+ui:form:ignore";

fn enum_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\+kubebuilder:validation:Enum=([A-Za-z0-9_;\-]+)")
            .expect("enum marker regex is valid")
    })
}

/// UI input kind driving a single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text input
    Text,
    /// Numeric input
    Number,
    /// List-of-strings input
    Label,
    /// Key/value pairs input
    TextText,
    /// Nested object with its own fields
    Ref,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Label => "label",
            FieldKind::TextText => "text-text",
            FieldKind::Ref => "ref",
        }
    }
}

/// A field's default value, derived from its declared type's shape
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Labels(Vec<String>),
    Pairs(Vec<(String, String)>),
    Nested(Vec<FieldDescriptor>),
}

/// Generated metadata record driving one form input
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub field: FieldKind,
    pub label: String,
    pub value: FieldValue,
    pub helper_text: String,
}

/// The extracted form data for one chaos kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedForm {
    /// Ordered operation modes parsed from the `action` property's comment
    pub actions: Vec<String>,
    /// Field descriptors in declaration order
    pub fields: Vec<FieldDescriptor>,
}

/// Concatenated doc comment of an item; absent comments are empty strings
pub fn doc_comment(attrs: &[syn::Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let syn::Meta::NameValue(meta) = &attr.meta {
            if let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) = &meta.value
            {
                lines.push(s.value().trim().to_string());
            }
        }
    }
    lines.join(" ")
}

/// Parse the embedded enum listing out of a documentation comment
pub fn parse_enum_marker(comment: &str) -> Vec<String> {
    enum_marker_re()
        .captures(comment)
        .map(|caps| {
            caps[1]
                .split(';')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the comment marks the field as excluded from generated forms
pub fn is_ignored_comment(comment: &str) -> bool {
    comment.contains(IGNORE_MARKER)
}

/// Helper text: the comment with generator markers removed
pub fn strip_markers(comment: &str) -> String {
    let without_enum = enum_marker_re().replace_all(comment, "");
    let without_ignore = without_enum.replace(IGNORE_MARKER, "");
    without_ignore.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the action list and field descriptors from a spec declaration
pub fn extract_form(spec: &syn::ItemStruct, index: &SchemaIndex) -> ExtractedForm {
    let mut form = ExtractedForm::default();
    let mut seen = vec![spec.ident.to_string()];

    let syn::Fields::Named(fields) = &spec.fields else {
        return form;
    };

    for field in &fields.named {
        let Some(ident) = field.ident.as_ref().map(|i| i.to_string()) else {
            continue;
        };
        if IGNORED_FIELDS.contains(&ident.as_str()) {
            continue;
        }

        let comment = doc_comment(&field.attrs);

        if ident == ACTION_FIELD {
            // Only one action field is expected; the latest wins
            form.actions = parse_enum_marker(&comment);
            continue;
        }

        if is_ignored_comment(&comment) {
            continue;
        }

        form.fields
            .push(descriptor_for(&ident, &field.ty, &comment, index, &mut seen));
    }

    form
}

/// Field descriptors of a nested object type, same rules minus the action
/// special case
fn extract_nested(target: &syn::ItemStruct, index: &SchemaIndex, seen: &mut Vec<String>) -> Vec<FieldDescriptor> {
    let mut out = Vec::new();
    let syn::Fields::Named(fields) = &target.fields else {
        return out;
    };

    for field in &fields.named {
        let Some(ident) = field.ident.as_ref().map(|i| i.to_string()) else {
            continue;
        };
        if IGNORED_FIELDS.contains(&ident.as_str()) {
            continue;
        }
        let comment = doc_comment(&field.attrs);
        if is_ignored_comment(&comment) {
            continue;
        }
        out.push(descriptor_for(&ident, &field.ty, &comment, index, seen));
    }

    out
}

fn descriptor_for(
    label: &str,
    ty: &syn::Type,
    comment: &str,
    index: &SchemaIndex,
    seen: &mut Vec<String>,
) -> FieldDescriptor {
    let (field, value) = classify(ty, index, seen);
    FieldDescriptor {
        field,
        label: label.to_string(),
        value,
        helper_text: strip_markers(comment),
    }
}

/// Classify a declared type into a UI field kind plus its default value
///
/// `Option<T>` is transparent; unknown shapes degrade to free text with a
/// diagnostic so a schema change never aborts a whole kind.
fn classify(ty: &syn::Type, index: &SchemaIndex, seen: &mut Vec<String>) -> (FieldKind, FieldValue) {
    let syn::Type::Path(type_path) = ty else {
        tracing::warn!("Unsupported field type shape, defaulting to text");
        return (FieldKind::Text, FieldValue::Text(String::new()));
    };
    let Some(segment) = type_path.path.segments.last() else {
        return (FieldKind::Text, FieldValue::Text(String::new()));
    };

    let name = segment.ident.to_string();
    match name.as_str() {
        "Option" => {
            if let Some(inner) = generic_arg(segment, 0) {
                classify(inner, index, seen)
            } else {
                (FieldKind::Text, FieldValue::Text(String::new()))
            }
        }
        "String" | "str" => (FieldKind::Text, FieldValue::Text(String::new())),
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize"
        | "f32" | "f64" => (FieldKind::Number, FieldValue::Number(0)),
        "Vec" => (FieldKind::Label, FieldValue::Labels(Vec::new())),
        "HashMap" | "BTreeMap" => (FieldKind::TextText, FieldValue::Pairs(Vec::new())),
        other => {
            if seen.iter().any(|s| s == other) {
                tracing::warn!("Recursive schema type `{}`, defaulting to text", other);
                return (FieldKind::Text, FieldValue::Text(String::new()));
            }
            if let Some(target) = index.get(other) {
                seen.push(other.to_string());
                let nested = extract_nested(target, index, seen);
                seen.pop();
                (FieldKind::Ref, FieldValue::Nested(nested))
            } else {
                tracing::warn!("Unknown field type `{}`, defaulting to text", other);
                (FieldKind::Text, FieldValue::Text(String::new()))
            }
        }
    }
}

fn generic_arg<'a>(segment: &'a syn::PathSegment, index: usize) -> Option<&'a syn::Type> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().nth(index).and_then(|arg| match arg {
        syn::GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
