//! Implementation of the `#[derive(Options)]` macro.
//!
//! Generates `argot::Options` for a struct with named fields:
//!
//! - `fields()` lists one `FieldSpec` per annotated field, splicing in the
//!   specs of `#[opt(flatten)]` fields with their path prefixed.
//! - `about()` returns the container `help` text.
//! - `bind()` decodes every field from the parsed option values under its
//!   canonical flag name (the last name in its flag list).

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_opt_attrs, split_flags};

/// Main implementation of the Options derive macro.
pub fn options_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Some(&named.named),
            Fields::Unit => None,
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    input.span(),
                    "Options can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Options can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut specs: Vec<TokenStream> = Vec::new();
    let mut binds: Vec<TokenStream> = Vec::new();

    for field in fields.into_iter().flatten() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let name_str = field_name.to_string();
        let ty = &field.ty;

        let attr = parse_opt_attrs(&field.attrs)?.ok_or_else(|| {
            Error::new(
                field.span(),
                format!(
                    "field '{}' needs #[opt(flag = \"...\")], #[opt(flatten)] or #[opt(skip)]",
                    name_str
                ),
            )
        })?;

        if attr.skip {
            binds.push(quote! {
                #field_name: ::std::default::Default::default(),
            });
            continue;
        }

        if attr.flatten {
            if attr.flag.is_some() {
                return Err(Error::new(
                    attr.span,
                    "a flattened field cannot declare its own flag",
                ));
            }
            specs.push(quote! {
                for spec in <#ty as ::argot::Options>::fields() {
                    fields.push(spec.nested(#name_str));
                }
            });
            binds.push(quote! {
                #field_name: <#ty as ::argot::Options>::bind(values)?,
            });
            continue;
        }

        let flag = attr.flag.as_ref().ok_or_else(|| {
            Error::new(
                attr.span,
                format!("field '{}' is missing flag = \"...\"", name_str),
            )
        })?;
        let names = split_flags(flag)?;
        let canonical = names.last().cloned().unwrap_or_default();
        let flag_value = flag.value();

        let mut spec = quote! {
            ::argot::FieldSpec::of::<#ty>(#name_str, #flag_value)
        };
        if let Some(help) = &attr.help {
            spec = quote! { #spec.help(#help) };
        }
        if let Some(default) = &attr.default {
            spec = quote! { #spec.default_value(#default) };
        }
        if let Some(env) = &attr.env {
            spec = quote! { #spec.env(#env) };
        }
        if attr.hidden {
            spec = quote! { #spec.hidden(true) };
        }

        specs.push(quote! {
            fields.push(#spec);
        });
        binds.push(quote! {
            #field_name: values.decode::<#ty>(#canonical)?,
        });
    }

    let about = match &container.help {
        Some(help) => quote! { ::std::option::Option::Some(#help) },
        None => quote! { ::std::option::Option::None },
    };

    let construct = if fields.is_some() {
        quote! { Self { #(#binds)* } }
    } else {
        quote! { Self }
    };

    let expanded = quote! {
        impl #impl_generics ::argot::Options for #struct_name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::argot::FieldSpec> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                #(#specs)*
                fields
            }

            fn about() -> ::std::option::Option<&'static str> {
                #about
            }

            fn bind(
                values: &::argot::OptionValues,
            ) -> ::std::result::Result<Self, ::argot::BindError> {
                #[allow(unused_variables)]
                let values = values;
                ::std::result::Result::Ok(#construct)
            }
        }
    };

    Ok(expanded)
}
