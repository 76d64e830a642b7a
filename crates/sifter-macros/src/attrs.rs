//! Attribute parsing for the sifter derive macros.
//!
//! Both derives read `#[filter(...)]`: on fields and variants it accepts
//! `skip` and `rename = "..."`, on the container `rename_all = "..."`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, MetaNameValue, Result, Token,
};

/// Naming convention applied to every field or variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    PascalCase,
    CamelCase,
    Lowercase,
    SnakeCase,
}

impl RenameRule {
    pub fn from_str(s: &str, span: Span) -> Result<Self> {
        match s {
            "PascalCase" => Ok(RenameRule::PascalCase),
            "camelCase" => Ok(RenameRule::CamelCase),
            "lowercase" => Ok(RenameRule::Lowercase),
            "snake_case" => Ok(RenameRule::SnakeCase),
            other => Err(Error::new(
                span,
                format!(
                    "unknown rename rule: '{}'. Expected one of: PascalCase, camelCase, lowercase, snake_case",
                    other
                ),
            )),
        }
    }

    /// Applies the rule to a Rust identifier (snake_case field or
    /// PascalCase variant).
    pub fn apply(self, name: &str) -> String {
        let words = split_words(name);
        match self {
            RenameRule::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
            RenameRule::CamelCase => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            RenameRule::Lowercase => name.to_lowercase(),
            RenameRule::SnakeCase => words
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

/// Splits on `_` and on lower-to-upper case boundaries.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_was_lower = false;

    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_was_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_was_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_was_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Field- and variant-level attributes from `#[filter(...)]`.
#[derive(Debug, Clone)]
pub struct FilterAttr {
    /// Leave this field out of the field table.
    pub skip: bool,
    /// Registered name (default: the Rust name after `rename_all`).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for FilterAttr {
    fn default() -> Self {
        FilterAttr {
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for FilterAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FilterAttr {
            span: input.span(),
            ..FilterAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_value(nv, "rename")?.0);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown filter attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Container-level attributes from `#[filter(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    pub rename_all: Option<RenameRule>,
}

impl ContainerAttr {
    /// Registered name for a Rust identifier.
    pub fn name_for(&self, ident: &str) -> String {
        match self.rename_all {
            Some(rule) => rule.apply(ident),
            None => ident.to_string(),
        }
    }
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                    let (rule, span) = string_value(nv, "rename_all")?;
                    attr.rename_all = Some(RenameRule::from_str(&rule, span)?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown filter attribute. Expected: rename_all = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn string_value(nv: &MetaNameValue, key: &str) -> Result<(String, Span)> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: Lit::Str(s), ..
    }) = &nv.value
    {
        Ok((s.value(), s.span()))
    } else {
        Err(Error::new(
            nv.value.span(),
            format!("{} must be a string literal", key),
        ))
    }
}

/// Extract `#[filter(...)]` from a field's or variant's attributes.
pub fn parse_filter_attrs(attrs: &[Attribute]) -> Result<FilterAttr> {
    for attr in attrs {
        if attr.path().is_ident("filter") {
            return attr.parse_args::<FilterAttr>();
        }
    }
    Ok(FilterAttr::default())
}

/// Extract `#[filter(...)]` from a struct's or enum's attributes.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("filter") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}
