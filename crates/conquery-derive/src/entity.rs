//! Entity derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn is_valid_sql_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn parse_ident_lit(lit: &LitStr, what: &str) -> Result<String> {
    let value = lit.value();
    if !is_valid_sql_ident(&value) {
        return Err(syn::Error::new(
            lit.span(),
            format!("{what} must be a plain SQL identifier, got {value:?}"),
        ));
    }
    Ok(value)
}

fn parse_table_attr(input: &DeriveInput) -> Result<Option<String>> {
    let mut table = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table = Some(parse_ident_lit(&lit, "orm(table)")?);
                Ok(())
            } else {
                Err(meta.error("unknown orm attribute (expected table)"))
            }
        })?;
    }
    Ok(table)
}

fn parse_column_attr(field: &syn::Field) -> Result<Option<String>> {
    let mut column = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                column = Some(parse_ident_lit(&lit, "orm(column)")?);
                Ok(())
            } else {
                Err(meta.error("unknown orm field attribute (expected column)"))
            }
        })?;
    }
    Ok(column)
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let first_is_id = fields
        .first()
        .and_then(|f| f.ident.as_ref())
        .is_some_and(|ident| ident == "id");
    if !first_is_id {
        return Err(syn::Error::new_spanned(
            &input,
            "Entity requires the first field to be the primary key `id`",
        ));
    }
    // INSERT and UPDATE need at least one non-key column.
    if fields.len() < 2 {
        return Err(syn::Error::new_spanned(
            &input,
            "Entity requires at least one column besides `id`",
        ));
    }

    let table = parse_table_attr(&input)?;
    let mut field_names = Vec::new();
    let mut columns = Vec::new();
    let mut values = Vec::new();
    let mut patch_values = Vec::new();

    for (idx, field) in fields.iter().enumerate() {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.unraw().to_string();
        let column = parse_column_attr(field)?.unwrap_or_else(|| field_name.clone());
        if idx == 0 && column != "id" {
            return Err(syn::Error::new_spanned(
                field,
                "the primary key column must be `id`",
            ));
        }
        field_names.push(field_name);
        columns.push(column);
        if idx == 0 {
            continue;
        }
        values.push(quote! { ::conquery::ToValue::to_value(&self.#ident) });
        patch_values.push(if option_inner(&field.ty).is_some() {
            quote! { self.#ident.as_ref().map(|v| ::conquery::ToValue::to_value(v)) }
        } else {
            quote! { ::core::option::Option::Some(::conquery::ToValue::to_value(&self.#ident)) }
        });
    }

    let type_name = name.to_string();
    let table_name = match &table {
        Some(t) => quote! { ::core::option::Option::Some(#t) },
        None => quote! { ::core::option::Option::None },
    };

    Ok(quote! {
        impl ::conquery::Entity for #name {
            const TYPE_NAME: &'static str = #type_name;
            const TABLE_NAME: ::core::option::Option<&'static str> = #table_name;
            const COLUMNS: &'static [&'static str] = &[#(#columns),*];
            const FIELDS: &'static [&'static str] = &[#(#field_names),*];

            fn metadata() -> &'static ::conquery::EntityMetadata {
                static META: ::std::sync::OnceLock<::conquery::EntityMetadata> =
                    ::std::sync::OnceLock::new();
                META.get_or_init(::conquery::EntityMetadata::of::<Self>)
            }

            fn id(&self) -> ::conquery::Value {
                ::conquery::ToValue::to_value(&self.id)
            }

            fn set_id(&mut self, id: i64) -> ::conquery::OrmResult<()> {
                self.id = ::conquery::decode_id(id)?;
                ::core::result::Result::Ok(())
            }

            fn values(&self) -> ::std::vec::Vec<::conquery::Value> {
                ::std::vec![#(#values),*]
            }

            fn patch_values(&self) -> ::std::vec::Vec<::core::option::Option<::conquery::Value>> {
                ::std::vec![#(#patch_values),*]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn expands_user_entity() {
        let input: DeriveInput = parse_quote! {
            struct UserEntity {
                id: i64,
                score: Option<i32>,
                #[orm(column = "note")]
                memo: String,
            }
        };
        let tokens = expand(input).unwrap().to_string();
        assert!(tokens.contains("\"note\""));
        assert!(tokens.contains("OnceLock"));
        syn::parse_str::<syn::File>(&tokens).unwrap();
        syn::parse2::<syn::File>(expand(parse_quote! {
            #[orm(table = "t_user")]
            struct UserEntity { id: i64, score: Option<i32> }
        }).unwrap())
        .unwrap();
    }

    #[test]
    fn rejects_missing_or_misplaced_id() {
        let cases: Vec<DeriveInput> = vec![
            parse_quote! { struct A { score: i32, id: i64 } },
            parse_quote! { struct A { #[orm(column = "user_id")] id: i64, score: i32 } },
            parse_quote! { struct A<T> { id: T, score: i32 } },
            parse_quote! { #[orm(table = "bad name")] struct A { id: i64, score: i32 } },
            parse_quote! { struct A(i64); },
        ];
        for input in cases {
            assert!(expand(input).is_err());
        }
    }

    #[test]
    fn rejects_key_only_entity() {
        let err = expand(parse_quote! { struct A { id: i64 } }).unwrap_err();
        assert!(err.to_string().contains("besides `id`"), "{err}");
    }
}
