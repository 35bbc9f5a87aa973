use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Data, DeriveInput, Error, Expr, ExprLit, Field, Fields, GenericParam, Ident, Lit, LitStr, Meta, Result,
    Token, Type, parse_macro_input, spanned::Spanned,
};

mod parsed;

use parsed::ParsedRecord;

/// Derives `DescribeType` and `RecordMetadata` for a struct with named fields, and registers
/// non-generic records with the inventory.
///
/// Field attributes:
///
/// ```text
/// #[esmap("type=keyword,sortable")]        // raw option tag, appended verbatim
/// #[esmap(ref_id, case_sensitive = false)]  // same tag language, written as arguments
/// #[esmap(rename = "last_name")]            // property name
/// #[esmap(skip)]                            // keep the field out of the schema
/// ```
///
/// Without an `esmap` rename or skip, `#[serde(rename = "...")]`, `#[serde(skip)]` and
/// `#[serde(skip_serializing)]` decide the property name.
#[proc_macro_derive(SearchRecord, attributes(esmap))]
pub fn derive_search_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedRecord::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
