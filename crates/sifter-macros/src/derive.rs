//! Implementation of the `#[derive(Filterable)]` macro.
//!
//! This macro generates the field table behind `sifter::Filterable` and
//! field name constants for building requests.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::{parse_container_attrs, parse_filter_attrs};

/// Main implementation of the Filterable derive macro.
pub fn filterable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Filterable cannot be derived for generic structs",
        ));
    }

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Filterable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Filterable can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut accessors: Vec<TokenStream> = Vec::new();
    let mut descriptors: Vec<TokenStream> = Vec::new();
    let mut registered: Vec<String> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let filter_attrs = parse_filter_attrs(&field.attrs)?;
        if filter_attrs.skip {
            continue;
        }

        let rust_name = field_name.to_string();
        let rust_name = rust_name.trim_start_matches("r#");
        let filter_name = filter_attrs
            .rename
            .unwrap_or_else(|| container.name_for(rust_name));

        if registered
            .iter()
            .any(|other| other.eq_ignore_ascii_case(&filter_name))
        {
            return Err(Error::new(
                field.span(),
                format!("duplicate filter field name '{}'", filter_name),
            ));
        }
        registered.push(filter_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(rust_name));
        field_constants.push(quote! {
            /// Registered filter field name.
            pub const #const_name: &'static str = #filter_name;
        });

        let ty = &field.ty;
        let get_fn = format_ident!("get_{}", index);
        let copy_fn = format_ident!("copy_{}", index);
        accessors.push(quote! {
            fn #get_fn<'a>(record: &'a #struct_name) -> ::sifter::Value<'a> {
                ::sifter::FieldValue::field_value(&record.#field_name)
            }
            fn #copy_fn(source: &#struct_name, target: &mut #struct_name) {
                target.#field_name = ::core::clone::Clone::clone(&source.#field_name);
            }
        });
        descriptors.push(quote! {
            ::sifter::FieldDescriptor::<#struct_name>::new(
                #filter_name,
                <#ty as ::sifter::FieldValue>::TYPE,
                #get_fn,
                #copy_fn,
            )
        });
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::sifter::Filterable for #struct_name {
            fn fields() -> &'static [::sifter::FieldDescriptor<Self>] {
                #(#accessors)*

                static FIELDS: ::sifter::__private::Lazy<
                    ::std::vec::Vec<::sifter::FieldDescriptor<#struct_name>>,
                > = ::sifter::__private::Lazy::new(|| ::std::vec![#(#descriptors),*]);
                FIELDS.as_slice()
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
pub(crate) fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("birth_date"), "BIRTH_DATE");
        assert_eq!(to_screaming_snake_case("birthDate"), "BIRTH_DATE");
        assert_eq!(to_screaming_snake_case("XMLParser"), "XMLPARSER");
    }

    #[test]
    fn test_rejects_tuple_structs() {
        let input: DeriveInput = syn::parse_str("struct Pair(i32, i32);").unwrap();
        let err = filterable_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_rejects_generics() {
        let input: DeriveInput = syn::parse_str("struct Wrapper<T> { inner: T }").unwrap();
        assert!(filterable_derive_impl(input).is_err());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let input: DeriveInput = syn::parse_str(
            r#"struct Row { name: String, #[filter(rename = "NAME")] label: String }"#,
        )
        .unwrap();
        let err = filterable_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("duplicate filter field name"));
    }

    #[test]
    fn test_generates_constants_and_table() {
        let input: DeriveInput = syn::parse_str(
            r#"
            #[filter(rename_all = "PascalCase")]
            struct Customer {
                id: i32,
                birth_date: Option<String>,
                #[filter(skip)]
                secret: String,
            }
            "#,
        )
        .unwrap();
        let output = filterable_derive_impl(input).unwrap().to_string();
        assert!(output.contains("pub const BIRTH_DATE"));
        assert!(output.contains("\"BirthDate\""));
        assert!(output.contains("\"Id\""));
        assert!(!output.contains("SECRET"));
    }
}
