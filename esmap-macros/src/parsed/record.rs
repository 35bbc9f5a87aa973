#[allow(unused_imports)]
use super::*;

pub(crate) struct ParsedRecord {
    name: Ident,
    generics: syn::Generics,
    fields: Vec<ParsedField>,
}

impl ParsedRecord {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => {
                    let mut parsed = Vec::new();
                    for field in &named.named {
                        parsed.push(ParsedField::from_field(field)?);
                    }
                    parsed
                }
                _ => return Err(Error::new(input.ident.span(), "SearchRecord requires named fields")),
            },
            _ => return Err(Error::new(input.ident.span(), "SearchRecord can only be derived for structs")),
        };

        Ok(Self {
            name: input.ident.clone(),
            generics: input.generics.clone(),
            fields,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let name_lit = LitStr::new(&name.to_string(), Span::call_site());
        let field_inits = self.fields.iter().map(|field| field.to_descriptor_tokens());

        // every type parameter may appear in a field, so it has to be describable too
        let mut generics = self.generics.clone();
        let type_params: Vec<Ident> = generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(param) => Some(param.ident.clone()),
                _ => None,
            })
            .collect();
        {
            let where_clause = generics.make_where_clause();
            for param in &type_params {
                where_clause
                    .predicates
                    .push(syn::parse_quote!(#param: ::esmap::types::DescribeType + 'static));
            }
        }
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let registration = if self.generics.params.is_empty() {
            quote! {
                ::esmap::inventory::submit! {
                    ::esmap::registry::RecordRegistration {
                        type_name: #name_lit,
                        type_path: concat!(module_path!(), "::", #name_lit),
                        type_id: ::std::any::TypeId::of::<#name>,
                        descriptor_fn: <#name as ::esmap::types::RecordMetadata>::record_descriptor,
                    }
                }
            }
        } else {
            quote! {}
        };

        quote! {
            impl #impl_generics ::esmap::types::RecordMetadata for #name #ty_generics #where_clause {
                fn record_name() -> &'static str {
                    #name_lit
                }

                fn record_descriptor() -> ::esmap::types::RecordDescriptor {
                    ::esmap::types::RecordDescriptor {
                        name: #name_lit.to_string(),
                        type_path: ::std::any::type_name::<Self>().to_string(),
                        fields: vec![#(#field_inits),*],
                    }
                }
            }

            impl #impl_generics ::esmap::types::DescribeType for #name #ty_generics #where_clause {
                fn describe() -> ::esmap::types::TypeDescriptor {
                    ::esmap::types::TypeDescriptor::Record(::esmap::types::RecordRef::of::<Self>())
                }
            }

            #registration
        }
    }
}
