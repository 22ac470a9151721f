//! Field-descriptor IR for query-type declarations.
//!
//! The front end reads a struct declaration (from a derive input or a parsed
//! source file) once and records, per field, what the emitters need: name,
//! column tag, value shape and role. Convention lookup happens later, in the
//! emitters, against an explicit operator registry.

use crate::syn_types::{is_bool, is_page_query, option_inner, unboxed, vec_inner};
use conquery_convention::is_or_group;
use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

/// How the derive wires `build_conditions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Generated routine emitted inline by the derive.
    Inline,
    /// Generated routine supplied by a CLI-written file (`#[orm(external)]`).
    External,
    /// No generated routine; reflective compilation (`#[orm(reflective)]`).
    Reflective,
}

/// Runtime shape of a filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// `bool`
    Bool,
    /// `Option<bool>`
    OptionBool,
    /// `Option<T>`
    OptionScalar,
    /// `Option<Vec<T>>`
    OptionVec,
    /// `Vec<T>`
    Vec,
}

/// Subquery configuration from `#[orm(subquery(...))]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubqueryDecl {
    pub select: String,
    pub from: String,
    pub correlate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRole {
    /// Direct column comparison.
    Filter(FieldShape),
    /// `Option<G>` OR subgroup.
    OrGroup,
    /// `Option<Box<Q>>` nested query.
    Subquery(SubqueryDecl),
}

/// One predicate field.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Rust identifier, as written (`r#type` keeps its prefix).
    pub ident: syn::Ident,
    /// Convention name (`type` for `r#type`).
    pub name: String,
    pub column: Option<String>,
    pub role: FieldRole,
}

impl FieldDecl {
    pub fn span(&self) -> Span {
        self.ident.span()
    }
}

/// A parsed query type.
#[derive(Debug, Clone)]
pub struct QueryTypeDecl {
    pub ident: syn::Ident,
    pub mode: CompileMode,
    /// Pagination field, if any.
    pub page: Option<syn::Ident>,
    /// Predicate fields in declaration order.
    pub fields: Vec<FieldDecl>,
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    page: bool,
    or: bool,
    column: Option<String>,
    subquery: Option<SubqueryDecl>,
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

fn parse_subquery(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<SubqueryDecl> {
    let mut select = None;
    let mut from = None;
    let mut correlate = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("select") {
            select = Some(parse_str_value(&inner)?);
        } else if inner.path.is_ident("from") {
            from = Some(parse_str_value(&inner)?);
        } else if inner.path.is_ident("correlate") {
            correlate = Some(parse_str_value(&inner)?);
        } else {
            return Err(inner.error("expected `select`, `from` or `correlate`"));
        }
        Ok(())
    })?;
    let Some(select) = select else {
        return Err(meta.error("orm(subquery(..)) requires select = \"...\""));
    };
    let Some(from) = from else {
        return Err(meta.error("orm(subquery(..)) requires from = \"...\""));
    };
    Ok(SubqueryDecl {
        select,
        from,
        correlate,
    })
}

fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else if meta.path.is_ident("page") {
                attrs.page = true;
            } else if meta.path.is_ident("or") {
                attrs.or = true;
            } else if meta.path.is_ident("column") {
                attrs.column = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("subquery") {
                attrs.subquery = Some(parse_subquery(&meta)?);
            } else {
                return Err(meta.error(
                    "unknown orm field attribute (expected skip, page, or, column, subquery)",
                ));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn parse_mode(input: &DeriveInput) -> Result<CompileMode> {
    let mut mode = CompileMode::Inline;
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("external") {
                CompileMode::External
            } else if meta.path.is_ident("reflective") {
                CompileMode::Reflective
            } else {
                return Err(meta.error("unknown orm attribute (expected external or reflective)"));
            };
            if mode != CompileMode::Inline && mode != next {
                return Err(meta.error("orm(external) and orm(reflective) are exclusive"));
            }
            mode = next;
            Ok(())
        })?;
    }
    Ok(mode)
}

fn filter_shape(ty: &syn::Type) -> Option<FieldShape> {
    if is_bool(ty) {
        return Some(FieldShape::Bool);
    }
    if vec_inner(ty).is_some() {
        return Some(FieldShape::Vec);
    }
    let inner = option_inner(ty)?;
    if is_bool(inner) {
        Some(FieldShape::OptionBool)
    } else if vec_inner(inner).is_some() {
        Some(FieldShape::OptionVec)
    } else {
        Some(FieldShape::OptionScalar)
    }
}

/// `Option<Q>` or `Option<Box<Q>>`.
fn is_nested_query(ty: &syn::Type) -> bool {
    option_inner(ty).is_some_and(|inner| matches!(unboxed(inner), syn::Type::Path(_)))
}

impl QueryTypeDecl {
    /// Parse a derive input (or an item struct converted to one).
    pub fn parse(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "QueryObject cannot be derived for generic structs",
            ));
        }
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                input,
                "QueryObject can only be derived for structs",
            ));
        };
        let Fields::Named(named) = &data.fields else {
            return Err(syn::Error::new_spanned(
                input,
                "QueryObject can only be derived for structs with named fields",
            ));
        };

        let mode = parse_mode(input)?;
        let mut page = None;
        let mut fields = Vec::new();

        for field in &named.named {
            let Some(ident) = field.ident.clone() else {
                continue;
            };
            let attrs = parse_field_attrs(field)?;
            if attrs.skip {
                continue;
            }
            if attrs.page || is_page_query(&field.ty) {
                if page.is_some() {
                    return Err(syn::Error::new_spanned(
                        field,
                        "only one pagination field is allowed",
                    ));
                }
                page = Some(ident);
                continue;
            }

            let name = ident.unraw().to_string();
            let role = if let Some(subquery) = attrs.subquery {
                if !is_nested_query(&field.ty) {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "subquery fields must be Option<Box<Q>> or Option<Q>",
                    ));
                }
                FieldRole::Subquery(subquery)
            } else if attrs.or || is_or_group(&name) {
                let plain_option = filter_shape(&field.ty) == Some(FieldShape::OptionScalar);
                if !plain_option || !is_nested_query(&field.ty) {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "OR group fields must be Option<G> or Option<Box<G>>",
                    ));
                }
                FieldRole::OrGroup
            } else {
                let Some(shape) = filter_shape(&field.ty) else {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "filter fields must be bool, Option<T>, Option<Vec<T>> or Vec<T> \
                         (a non-Option scalar has no \"not applied\" value)",
                    ));
                };
                FieldRole::Filter(shape)
            };

            fields.push(FieldDecl {
                ident,
                name,
                column: attrs.column,
                role,
            });
        }

        Ok(Self {
            ident: input.ident.clone(),
            mode,
            page,
            fields,
        })
    }

    /// Whether a struct carries `#[derive(QueryObject)]` (any path ending in it).
    pub fn derives_query_object(attrs: &[syn::Attribute]) -> bool {
        attrs.iter().any(|attr| {
            if !attr.path().is_ident("derive") {
                return false;
            }
            let mut found = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.segments.last().is_some_and(|s| s.ident == "QueryObject") {
                    found = true;
                }
                Ok(())
            });
            found
        })
    }
}
