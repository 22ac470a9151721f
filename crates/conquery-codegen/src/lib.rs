//! # conquery-codegen
//!
//! Static code generation for conquery query objects.
//!
//! The front end ([`QueryTypeDecl`]) turns a struct declaration into a list of
//! field descriptors. The [`Generator`] resolves every field through an
//! [`OperatorRegistry`](conquery_convention::OperatorRegistry) and emits a
//! `static_conditions` routine whose output matches the reflective
//! `WhereCompiler` fragment for fragment. Both the derive macro and the
//! `conquery gen` command use this crate, so inline and file-based generation
//! produce the same bytes.
//!
//! ```ignore
//! let decl = QueryTypeDecl::parse(&syn::parse_str::<syn::DeriveInput>(src)?)?;
//! let text = Generator::default().render_impl(&decl)?;
//! ```

mod decl;
mod derive;
mod emit;
mod syn_types;

pub use decl::{CompileMode, FieldDecl, FieldRole, FieldShape, QueryTypeDecl, SubqueryDecl};
pub use derive::expand_query_object;
pub use emit::{GENERATED_MARKER, Generator};
