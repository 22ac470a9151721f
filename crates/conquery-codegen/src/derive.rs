//! Token emission for `#[derive(QueryObject)]`.

use crate::decl::{CompileMode, FieldDecl, FieldRole, FieldShape, QueryTypeDecl};
use crate::emit::Generator;
use conquery_convention::Arity;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

fn is_trigger(generator: &Generator, field: &FieldDecl) -> bool {
    generator
        .registry()
        .resolve_with(&field.name, field.column.as_deref())
        .arity()
        == Arity::Zero
}

/// `QueryObject` impl (descriptors, page request, `build_conditions` wiring)
/// plus, in inline mode, the generated `static_conditions` routine.
pub fn expand_query_object(input: &DeriveInput, generator: &Generator) -> Result<TokenStream> {
    let decl = QueryTypeDecl::parse(input)?;
    // Rendered in every mode so unsupported fields fail the build either way.
    let routine = generator.render_impl(&decl)?;

    let ident = &decl.ident;
    let descriptors = decl.fields.iter().map(|field| {
        let f = &field.ident;
        let name = &field.name;
        let value = match &field.role {
            FieldRole::Filter(FieldShape::Bool) => quote! {
                ::conquery::Field::flag(#name, self.#f)
            },
            // `Some(true)` triggers a null-class operator; otherwise the value binds.
            FieldRole::Filter(FieldShape::OptionBool) if is_trigger(generator, field) => quote! {
                ::conquery::Field::flag(#name, self.#f == ::core::option::Option::Some(true))
            },
            FieldRole::Filter(FieldShape::OptionBool) => quote! {
                ::conquery::Field::scalar(#name, self.#f.map(::conquery::Value::Bool))
            },
            FieldRole::Filter(FieldShape::OptionScalar) => quote! {
                ::conquery::Field::scalar(#name, self.#f.as_ref().map(|v| ::conquery::ToValue::to_value(v)))
            },
            FieldRole::Filter(FieldShape::OptionVec) => quote! {
                ::conquery::Field::list(
                    #name,
                    self.#f
                        .as_ref()
                        .map(|v| v.iter().map(|x| ::conquery::ToValue::to_value(x)).collect()),
                )
            },
            FieldRole::Filter(FieldShape::Vec) => quote! {
                ::conquery::Field::list(
                    #name,
                    ::core::option::Option::Some(
                        self.#f.iter().map(|x| ::conquery::ToValue::to_value(x)).collect(),
                    ),
                )
            },
            FieldRole::OrGroup => quote! {
                ::conquery::Field::or_group(
                    #name,
                    self.#f.as_ref().map(|g| g as &dyn ::conquery::QueryObject),
                )
            },
            FieldRole::Subquery(sub) => {
                let select = &sub.select;
                let from = &sub.from;
                let correlate = sub.correlate.as_ref().map(|on| quote!(.correlate(#on)));
                quote! {
                    ::conquery::Field::subquery(
                        #name,
                        ::conquery::SubquerySpec::new(#select, #from) #correlate,
                        self.#f.as_ref().map(|q| q as &dyn ::conquery::QueryObject),
                    )
                }
            }
        };
        match &field.column {
            Some(column) => quote!(#value.column(#column)),
            None => value,
        }
    });

    let page_query = decl.page.as_ref().map(|page| {
        quote! {
            fn page_query(&self) -> ::conquery::PageQuery {
                ::core::clone::Clone::clone(&self.#page)
            }
        }
    });

    let build_conditions = (decl.mode != CompileMode::Reflective).then(|| {
        quote! {
            fn build_conditions(&self) -> ::conquery::Conditions {
                self.static_conditions()
            }
        }
    });

    let inline = if decl.mode == CompileMode::Inline {
        routine
            .parse::<TokenStream>()
            .map_err(|e| syn::Error::new_spanned(ident, format!("generated routine: {e}")))?
    } else {
        TokenStream::new()
    };

    Ok(quote! {
        impl ::conquery::QueryObject for #ident {
            fn fields(&self) -> ::std::vec::Vec<::conquery::Field<'_>> {
                ::std::vec![#(#descriptors),*]
            }

            #page_query

            #build_conditions
        }

        #inline
    })
}
