//! Rust source file parser using syn to extract SearchRecord definitions.
//!
//! Field attributes are encoded the same way `#[derive(SearchRecord)]` encodes them, so the
//! tags seen here are the tags the derived code would carry.

use anyhow::{Context, Result};
use esmap::TypeDescriptor;
use std::path::Path;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Field, Fields, GenericArgument, Ident, Lit, LitStr, Meta, PathArguments, Token, Type};

const SKIP_TAG: &str = "-";

/// A record found in source, before its field types are linked to other records
#[derive(Debug, Clone)]
pub struct ScannedRecord {
    pub name: String,
    pub relative_path: String,
    pub line: usize,
    pub fields: Vec<ScannedField>,
}

#[derive(Debug, Clone)]
pub struct ScannedField {
    pub name: String,
    pub ty: ScannedType,
    pub external_tag: Option<String>,
    pub options_tag: Option<String>,
}

/// Field type shape as far as it can be read from source
#[derive(Debug, Clone)]
pub enum ScannedType {
    Known(TypeDescriptor),
    Pointer(Box<ScannedType>),
    Slice(Box<ScannedType>),
    /// A path type that is not a std/chrono type; may name another record
    Named(String),
}

/// Parse a Rust file and extract all SearchRecord definitions.
pub fn parse_record_file(path: &Path, relative_path: &str) -> Result<Vec<ScannedRecord>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse_record_source(&content, relative_path)
}

pub fn parse_record_source(content: &str, relative_path: &str) -> Result<Vec<ScannedRecord>> {
    let syntax = syn::parse_file(content).with_context(|| format!("Failed to parse Rust file: {relative_path}"))?;
    let lines: Vec<&str> = content.lines().collect();

    let mut records = Vec::new();
    collect_items(&syntax.items, &lines, relative_path, &mut records)?;
    Ok(records)
}

/// Walks items, descending into inline modules.
fn collect_items(items: &[syn::Item], lines: &[&str], relative_path: &str, out: &mut Vec<ScannedRecord>) -> Result<()> {
    for item in items {
        match item {
            syn::Item::Struct(item_struct) if has_search_record_derive(&item_struct.attrs) => {
                let name = item_struct.ident.to_string();
                let line = find_struct_line(lines, &name).unwrap_or(1);
                let fields = parse_fields(&item_struct.fields)
                    .with_context(|| format!("Failed to read attributes of {name} in {relative_path}"))?;
                out.push(ScannedRecord {
                    name,
                    relative_path: relative_path.to_string(),
                    line,
                    fields,
                });
            }
            syn::Item::Mod(module) => {
                if let Some((_, inner)) = &module.content {
                    collect_items(inner, lines, relative_path, out)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Find the line number where a struct is defined
fn find_struct_line(lines: &[&str], struct_name: &str) -> Option<usize> {
    let pattern = format!("struct {struct_name}");
    lines.iter().position(|line| line.contains(&pattern)).map(|i| i + 1)
}

/// Check if attributes include derive(SearchRecord)
fn has_search_record_derive(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("derive") {
            return false;
        }
        attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
            .map(|paths| {
                paths
                    .iter()
                    .any(|path| path.segments.last().is_some_and(|seg| seg.ident == "SearchRecord"))
            })
            .unwrap_or(false)
    })
}

fn parse_fields(fields: &Fields) -> syn::Result<Vec<ScannedField>> {
    let Fields::Named(named) = fields else {
        return Ok(Vec::new());
    };
    named.named.iter().map(parse_field).collect()
}

enum EsmapArg {
    Raw(String),
    Rename(LitStr),
    Skip(Ident),
    Setting(String),
}

impl Parse for EsmapArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            let raw: LitStr = input.parse()?;
            return Ok(EsmapArg::Raw(raw.value()));
        }

        let key = Ident::parse_any(input)?;
        let key_name = key.unraw().to_string();
        if !input.peek(Token![=]) {
            return match key_name.as_str() {
                "skip" => Ok(EsmapArg::Skip(key)),
                "rename" | "options" => Err(syn::Error::new(
                    key.span(),
                    format!("`{key_name}` requires a string value"),
                )),
                _ => Ok(EsmapArg::Setting(key_name)),
            };
        }

        input.parse::<Token![=]>()?;
        let value = match (key_name.as_str(), input.parse::<Lit>()?) {
            ("rename", Lit::Str(value)) => return Ok(EsmapArg::Rename(value)),
            ("options", Lit::Str(value)) => return Ok(EsmapArg::Raw(value.value())),
            ("rename" | "options", other) => return Err(syn::Error::new(other.span(), "expected a string literal")),
            (_, Lit::Str(value)) => value.value(),
            (_, Lit::Bool(value)) => value.value.to_string(),
            (_, Lit::Int(value)) => value.base10_digits().to_string(),
            (_, Lit::Float(value)) => value.base10_digits().to_string(),
            (_, other) => return Err(syn::Error::new(other.span(), "unsupported option value")),
        };
        Ok(EsmapArg::Setting(format!("{key_name}={value}")))
    }
}

fn parse_field(field: &Field) -> syn::Result<ScannedField> {
    let name = field
        .ident
        .as_ref()
        .map(|ident| ident.unraw().to_string())
        .unwrap_or_default();

    let mut options = Vec::new();
    let mut external_tag = None;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("esmap")) {
        let args = attr.parse_args_with(Punctuated::<EsmapArg, Token![,]>::parse_terminated)?;
        for arg in args {
            let (span, tag) = match arg {
                EsmapArg::Raw(tag) if tag.trim().is_empty() => continue,
                EsmapArg::Raw(tag) | EsmapArg::Setting(tag) => {
                    options.push(tag);
                    continue;
                }
                EsmapArg::Rename(value) => (value.span(), value.value()),
                EsmapArg::Skip(key) => (key.span(), SKIP_TAG.to_string()),
            };
            if external_tag.is_some() {
                return Err(syn::Error::new(span, "property name already set for this field"));
            }
            external_tag = Some(tag);
        }
    }
    if external_tag.is_none() {
        external_tag = serde_external_tag(&field.attrs);
    }

    Ok(ScannedField {
        name,
        ty: scan_type(&field.ty),
        external_tag,
        options_tag: (!options.is_empty()).then(|| options.join(",")),
    })
}

/// Property name from `#[serde(rename)]` / `#[serde(skip)]`
fn serde_external_tag(attrs: &[Attribute]) -> Option<String> {
    let mut tag = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let Ok(metas) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
            continue;
        };
        for meta in metas {
            match meta {
                Meta::Path(path) if path.is_ident("skip") || path.is_ident("skip_serializing") => {
                    return Some(SKIP_TAG.to_string());
                }
                Meta::NameValue(pair) if pair.path.is_ident("rename") => {
                    if let Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) = pair.value {
                        tag = Some(value.value());
                    }
                }
                Meta::List(list) if list.path.is_ident("rename") => {
                    let nested = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated);
                    for meta in nested.into_iter().flatten() {
                        if let Meta::NameValue(pair) = meta
                            && pair.path.is_ident("serialize")
                            && let Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) = pair.value
                        {
                            tag = Some(value.value());
                        }
                    }
                }
                _ => {}
            }
        }
    }
    tag
}

/// Reads the type shape from source, mirroring the `DescribeType` impls in the library.
fn scan_type(ty: &Type) -> ScannedType {
    match ty {
        Type::Reference(reference) => ScannedType::Pointer(Box::new(scan_type(&reference.elem))),
        Type::Paren(inner) => scan_type(&inner.elem),
        Type::Group(inner) => scan_type(&inner.elem),
        Type::Array(array) => ScannedType::Slice(Box::new(scan_type(&array.elem))),
        Type::Slice(slice) => ScannedType::Slice(Box::new(scan_type(&slice.elem))),
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return ScannedType::Known(TypeDescriptor::Other(String::new()));
            };
            let ident = segment.ident.to_string();
            if let Some(known) = primitive(&ident) {
                return ScannedType::Known(known);
            }
            match ident.as_str() {
                "Option" | "Box" | "Rc" | "Arc" => match first_type_argument(&segment.arguments) {
                    Some(inner) => ScannedType::Pointer(Box::new(scan_type(inner))),
                    None => ScannedType::Known(TypeDescriptor::Other(ident)),
                },
                "Vec" | "VecDeque" | "BTreeSet" | "HashSet" => match first_type_argument(&segment.arguments) {
                    Some(inner) => ScannedType::Slice(Box::new(scan_type(inner))),
                    None => ScannedType::Known(TypeDescriptor::Other(ident)),
                },
                _ => ScannedType::Named(ident),
            }
        }
        Type::Tuple(_) => ScannedType::Known(TypeDescriptor::Other("tuple".to_string())),
        _ => ScannedType::Known(TypeDescriptor::Other("unsupported".to_string())),
    }
}

fn primitive(ident: &str) -> Option<TypeDescriptor> {
    Some(match ident {
        "bool" => TypeDescriptor::Bool,
        "i8" => TypeDescriptor::Int8,
        "i16" => TypeDescriptor::Int16,
        "i32" => TypeDescriptor::Int32,
        "i64" => TypeDescriptor::Int64,
        "isize" => TypeDescriptor::Isize,
        "u8" => TypeDescriptor::UInt8,
        "u16" => TypeDescriptor::UInt16,
        "u32" => TypeDescriptor::UInt32,
        "u64" => TypeDescriptor::UInt64,
        "usize" => TypeDescriptor::Usize,
        "f32" => TypeDescriptor::Float32,
        "f64" => TypeDescriptor::Float64,
        "String" | "str" | "char" => TypeDescriptor::Str,
        "DateTime" | "NaiveDateTime" | "NaiveDate" | "SystemTime" => TypeDescriptor::DateTime,
        "Uuid" | "i128" | "u128" => TypeDescriptor::Other(ident.to_string()),
        _ => return None,
    })
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
