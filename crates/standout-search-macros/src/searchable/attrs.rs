//! Attribute parsing for the Searchable derive macro.
//!
//! This module provides parsers for the `#[search(...)]` field attributes
//! used by the `Searchable` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field's value is read as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    /// Borrowed string data: `#[search(text)]`
    Text,
    /// `Option` of string data, `None` being absent: `#[search(optional)]`
    Optional,
    /// Any `Display` value, formatted per read: `#[search(display)]`
    Display,
}

impl ReadKind {
    /// Parse a read kind from an identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "text" | "Text" => Ok(ReadKind::Text),
            "optional" | "Optional" => Ok(ReadKind::Optional),
            "display" | "Display" => Ok(ReadKind::Display),
            other => Err(Error::new(
                ident.span(),
                format!(
                    "unknown search kind: '{}'. Expected one of: text, optional, display",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[search(...)]`.
#[derive(Debug, Clone)]
pub struct SearchAttr {
    /// How this field is read.
    pub kind: Option<ReadKind>,
    /// Exclude this field from searching.
    pub skip: bool,
    /// Field name used in selectors (default: the Rust field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for SearchAttr {
    fn default() -> Self {
        SearchAttr {
            kind: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for SearchAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SearchAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        if attr.kind.is_some() {
                            return Err(Error::new(ident.span(), "search kind specified twice"));
                        }
                        attr.kind = Some(ReadKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected search kind: text, optional, display, or skip",
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        if let syn::Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(s), ..
                        }) = &nv.value
                        {
                            let name = s.value();
                            if name.is_empty() {
                                return Err(Error::new(s.span(), "rename must not be empty"));
                            }
                            attr.rename = Some(name);
                            attr.span = s.span();
                        } else {
                            return Err(Error::new(
                                nv.value.span(),
                                "rename must be a string literal",
                            ));
                        }
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown search attribute. Expected: text, optional, display, skip, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[search(...)]` attributes from a field's attributes.
pub fn parse_search_attrs(attrs: &[Attribute]) -> Result<SearchAttr> {
    for attr in attrs {
        if attr.path().is_ident("search") {
            return attr.parse_args::<SearchAttr>();
        }
    }
    Ok(SearchAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_search(tokens: &str) -> Result<SearchAttr> {
        syn::parse_str::<SearchAttr>(tokens)
    }

    #[test]
    fn test_search_text() {
        let attr = parse_search("text").unwrap();
        assert_eq!(attr.kind, Some(ReadKind::Text));
        assert!(!attr.skip);
    }

    #[test]
    fn test_search_optional() {
        let attr = parse_search("optional").unwrap();
        assert_eq!(attr.kind, Some(ReadKind::Optional));
    }

    #[test]
    fn test_search_display_capitalized() {
        let attr = parse_search("Display").unwrap();
        assert_eq!(attr.kind, Some(ReadKind::Display));
    }

    #[test]
    fn test_search_skip() {
        let attr = parse_search("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn test_search_rename() {
        let attr = parse_search(r#"text, rename = "title""#).unwrap();
        assert_eq!(attr.kind, Some(ReadKind::Text));
        assert_eq!(attr.rename, Some("title".to_string()));
    }

    #[test]
    fn test_search_empty_rename() {
        let err = parse_search(r#"text, rename = """#).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_search_rename_not_string() {
        assert!(parse_search("text, rename = 3").is_err());
    }

    #[test]
    fn test_search_invalid_kind() {
        let result = parse_search("number");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown search kind"));
    }

    #[test]
    fn test_search_kind_twice() {
        assert!(parse_search("text, display").is_err());
    }
}
