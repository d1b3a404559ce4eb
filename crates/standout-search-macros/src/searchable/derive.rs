//! Implementation of the `#[derive(Searchable)]` macro.
//!
//! This macro generates an implementation of the `Searchable` trait, with one
//! compiled accessor function per annotated field, and field name constants
//! for typo-free selectors.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Result};

use super::attrs::{parse_search_attrs, ReadKind};

/// Main implementation of the Searchable derive macro.
pub fn searchable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Searchable cannot be derived for generic structs",
        ));
    }

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Searchable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Searchable can only be derived for structs",
            ))
        }
    };

    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut field_names: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let search_attrs = parse_search_attrs(&field.attrs)?;

        if search_attrs.skip {
            continue;
        }

        // Unannotated fields are not searchable
        let kind = match search_attrs.kind {
            Some(kind) => kind,
            None if search_attrs.rename.is_some() => {
                return Err(Error::new(
                    search_attrs.span,
                    "rename requires a search kind: text, optional or display",
                ))
            }
            None => continue,
        };

        let search_name = search_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string());
        if !seen.insert(search_name.clone()) {
            return Err(Error::new(
                search_attrs.span,
                format!("duplicate searchable field name '{}'", search_name),
            ));
        }

        // Names that do not form an identifier get no constant
        if let Ok(const_name) = syn::parse_str::<Ident>(&to_screaming_snake_case(&search_name)) {
            field_constants.push(quote! {
                /// Searchable field name.
                pub const #const_name: &'static str = #search_name;
            });
        }

        let read_expr = match kind {
            ReadKind::Text => quote! { ::standout_search::read::text(&record.#field_name) },
            ReadKind::Optional => {
                quote! { ::standout_search::read::optional(&record.#field_name) }
            }
            ReadKind::Display => {
                quote! { ::standout_search::read::display(&record.#field_name) }
            }
        };

        field_arms.push(quote! {
            #search_name => {
                fn read(record: &#struct_name) -> ::standout_search::FieldRead<'_> {
                    #read_expr
                }
                ::core::option::Option::Some(read)
            }
        });
        field_names.push(search_name);
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::standout_search::Searchable for #struct_name {
            fn search_field(
                name: &str,
            ) -> ::core::option::Option<::standout_search::ReadFn<Self>> {
                match name {
                    #(#field_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn search_fields() -> &'static [&'static str] {
                &[#(#field_names),*]
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' || c == ' ' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
