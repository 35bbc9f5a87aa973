#[allow(unused_imports)]
use super::*;

/// Omit sentinel understood by the schema builder.
const SKIP_TAG: &str = "-";

pub(crate) struct ParsedField {
    name: String,
    ty: Type,
    external_tag: Option<String>,
    options_tag: Option<String>,
}

/// One argument of `#[esmap(...)]`.
enum EsmapArg {
    /// `"raw,tag"` or `options = "raw,tag"`
    Raw(LitStr),
    Rename(LitStr),
    Skip(Span),
    /// Any other `key` or `key = literal`, re-encoded as `key` / `key=value`.
    Setting { key: String, value: Option<String> },
}

impl Parse for EsmapArg {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            return Ok(EsmapArg::Raw(input.parse()?));
        }

        // `type` is a keyword, so accept any identifier
        let key = Ident::parse_any(input)?;
        let key_name = key.unraw().to_string();
        if !input.peek(Token![=]) {
            return Ok(match key_name.as_str() {
                "skip" => EsmapArg::Skip(key.span()),
                "rename" | "options" => {
                    return Err(Error::new(key.span(), format!("`{key_name}` requires a string value")));
                }
                _ => EsmapArg::Setting {
                    key: key_name,
                    value: None,
                },
            });
        }

        input.parse::<Token![=]>()?;
        let lit: Lit = input.parse()?;
        match (key_name.as_str(), lit) {
            ("rename", Lit::Str(value)) => Ok(EsmapArg::Rename(value)),
            ("options", Lit::Str(value)) => Ok(EsmapArg::Raw(value)),
            ("rename" | "options", other) => Err(Error::new(other.span(), "expected a string literal")),
            (_, lit) => Ok(EsmapArg::Setting {
                key: key_name,
                value: Some(literal_text(&lit)?),
            }),
        }
    }
}

fn literal_text(lit: &Lit) -> Result<String> {
    Ok(match lit {
        Lit::Str(value) => value.value(),
        Lit::Bool(value) => value.value.to_string(),
        Lit::Int(value) => value.base10_digits().to_string(),
        Lit::Float(value) => value.base10_digits().to_string(),
        other => return Err(Error::new(other.span(), "unsupported option value")),
    })
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(field.span(), "SearchRecord requires named fields"))?;
        let name = ident.unraw().to_string();

        let mut options = Vec::new();
        let mut external_tag = None;
        for attr in &field.attrs {
            if attr.path().is_ident("esmap") {
                Self::parse_field_attr(attr, &mut options, &mut external_tag)?;
            }
        }
        if external_tag.is_none() {
            external_tag = serde_external_tag(&field.attrs);
        }

        Ok(Self {
            name,
            ty: field.ty.clone(),
            external_tag,
            options_tag: (!options.is_empty()).then(|| options.join(",")),
        })
    }

    fn parse_field_attr(attr: &Attribute, options: &mut Vec<String>, external_tag: &mut Option<String>) -> Result<()> {
        let args = attr.parse_args_with(Punctuated::<EsmapArg, Token![,]>::parse_terminated)?;
        for arg in args {
            match arg {
                EsmapArg::Raw(tag) => {
                    let tag = tag.value();
                    if !tag.trim().is_empty() {
                        options.push(tag);
                    }
                }
                EsmapArg::Rename(value) => {
                    if external_tag.is_some() {
                        return Err(Error::new(value.span(), "property name already set for this field"));
                    }
                    *external_tag = Some(value.value());
                }
                EsmapArg::Skip(span) => {
                    if external_tag.is_some() {
                        return Err(Error::new(span, "property name already set for this field"));
                    }
                    *external_tag = Some(SKIP_TAG.to_string());
                }
                EsmapArg::Setting { key, value } => match value {
                    Some(value) => options.push(format!("{key}={value}")),
                    None => options.push(key),
                },
            }
        }
        Ok(())
    }

    pub(crate) fn to_descriptor_tokens(&self) -> TokenStream2 {
        let name = &self.name;
        let ty = &self.ty;
        let external_tag = optional_string_tokens(self.external_tag.as_deref());
        let options_tag = optional_string_tokens(self.options_tag.as_deref());

        quote! {
            ::esmap::types::FieldDescriptor {
                name: #name.to_string(),
                ty: <#ty as ::esmap::types::DescribeType>::describe(),
                external_tag: #external_tag,
                options_tag: #options_tag,
            }
        }
    }
}

fn optional_string_tokens(value: Option<&str>) -> TokenStream2 {
    match value {
        Some(value) => {
            let lit = LitStr::new(value, Span::call_site());
            quote! { Some(#lit.to_string()) }
        }
        None => quote! { None },
    }
}

/// Property name from serde's attributes. Malformed serde attributes are left for serde to
/// report.
fn serde_external_tag(attrs: &[Attribute]) -> Option<String> {
    let mut tag = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let Ok(metas) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
            continue;
        };
        for meta in metas {
            match &meta {
                Meta::Path(path) if path.is_ident("skip") || path.is_ident("skip_serializing") => {
                    return Some(SKIP_TAG.to_string());
                }
                Meta::NameValue(pair) if pair.path.is_ident("rename") => {
                    if let Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) = &pair.value {
                        tag = Some(value.value());
                    }
                }
                Meta::List(list) if list.path.is_ident("rename") => {
                    if let Some(value) = serialize_rename(list) {
                        tag = Some(value);
                    }
                }
                _ => {}
            }
        }
    }
    tag
}

/// `rename(serialize = "...")`
fn serialize_rename(list: &syn::MetaList) -> Option<String> {
    let metas = list
        .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
        .ok()?;
    metas.into_iter().find_map(|meta| match meta {
        Meta::NameValue(pair) if pair.path.is_ident("serialize") => match pair.value {
            Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) => Some(value.value()),
            _ => None,
        },
        _ => None,
    })
}
