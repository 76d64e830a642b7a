//! Implementation of the `#[derive(FilterEnum)]` macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Lit, Result};

use crate::attrs::{parse_container_attrs, parse_filter_attrs};

/// Main implementation of the FilterEnum derive macro.
pub fn filter_enum_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let enum_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "FilterEnum cannot be derived for generic enums",
        ));
    }

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(Error::new(
                input.span(),
                "FilterEnum can only be derived for enums",
            ))
        }
    };
    if variants.is_empty() {
        return Err(Error::new(
            input.span(),
            "FilterEnum needs at least one variant",
        ));
    }

    let container = parse_container_attrs(&input.attrs)?;

    let mut entries: Vec<TokenStream> = Vec::new();
    let mut arms: Vec<TokenStream> = Vec::new();
    let mut next: u32 = 0;

    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "FilterEnum variants cannot carry data",
            ));
        }

        let attrs = parse_filter_attrs(&variant.attrs)?;
        if attrs.skip {
            return Err(Error::new(attrs.span, "enum variants cannot be skipped"));
        }

        let discriminant = match &variant.discriminant {
            Some((_, syn::Expr::Lit(syn::ExprLit {
                lit: Lit::Int(int), ..
            }))) => int.base10_parse::<u32>()?,
            Some((_, expr)) => {
                return Err(Error::new(
                    expr.span(),
                    "FilterEnum discriminants must be non-negative integer literals",
                ))
            }
            None => next,
        };
        next = discriminant.wrapping_add(1);

        let ident = &variant.ident;
        let name = attrs
            .rename
            .unwrap_or_else(|| container.name_for(&ident.to_string()));

        entries.push(quote! {
            ::sifter::EnumVariant::new(#name, #discriminant)
        });
        arms.push(quote! {
            #enum_name::#ident => #discriminant,
        });
    }

    let expanded = quote! {
        impl ::sifter::FilterEnum for #enum_name {
            const VARIANTS: &'static [::sifter::EnumVariant] = &[#(#entries),*];

            fn discriminant(&self) -> u32 {
                match self {
                    #(#arms)*
                }
            }
        }

        impl ::sifter::ScalarField for #enum_name {
            const SCALAR: ::sifter::ScalarType =
                ::sifter::ScalarType::Enum(<Self as ::sifter::FilterEnum>::VARIANTS);

            fn scalar_value(&self) -> ::sifter::Value<'_> {
                ::sifter::Value::Enum(::sifter::FilterEnum::discriminant(self))
            }
        }

        impl ::sifter::FieldValue for #enum_name {
            const TYPE: ::sifter::FieldType =
                ::sifter::FieldType::scalar(<Self as ::sifter::ScalarField>::SCALAR);

            fn field_value(&self) -> ::sifter::Value<'_> {
                ::sifter::ScalarField::scalar_value(self)
            }
        }
    };

    Ok(expanded)
}
