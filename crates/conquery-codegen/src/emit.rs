//! Reflection-free `static_conditions` emitter.
//!
//! Output is Rust source text, so the same bytes can be written to a file by
//! the CLI or parsed into tokens by the derive. Every branch is unrolled; only
//! the length of a list is left to run time.

use crate::decl::{FieldDecl, FieldRole, FieldShape, QueryTypeDecl};
use conquery_convention::{Arity, FieldConvention, OperatorRegistry, subquery_head};
use std::fmt::Write as _;
use syn::Result;

/// First line of every generated file.
pub const GENERATED_MARKER: &str = "// @generated by `conquery gen`. Do not edit by hand.";

const SOME: &str = "::core::option::Option::Some";
const TO_VALUE: &str = "::conquery::ToValue::to_value";

/// Text emitter for one backend's operator registry.
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    registry: OperatorRegistry,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(&OperatorRegistry::SQL)
    }
}

fn lit(s: &str) -> String {
    format!("{s:?}")
}

fn unsupported(field: &FieldDecl, conv: &FieldConvention, shape: &str) -> syn::Error {
    syn::Error::new(
        field.span(),
        format!(
            "`{}` resolves to {} ({:?} arity), which a {shape} field cannot express",
            field.name,
            conv.operator,
            conv.arity()
        ),
    )
}

impl Generator {
    pub fn new(registry: &OperatorRegistry) -> Self {
        Self {
            registry: *registry,
        }
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// `impl T { pub fn static_conditions(&self) -> Conditions { .. } }`
    pub fn render_impl(&self, decl: &QueryTypeDecl) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "impl {} {{", decl.ident);
        out.push_str("    /// Conditions compiled without reflection.\n");
        out.push_str("    pub fn static_conditions(&self) -> ::conquery::Conditions {\n");
        if decl.fields.is_empty() {
            out.push_str("        ::conquery::Conditions::new()\n");
        } else {
            let _ = writeln!(
                out,
                "        let mut c = ::conquery::Conditions::with_capacity({});",
                decl.fields.len()
            );
            for field in &decl.fields {
                out.push_str(&self.render_branch(field)?);
            }
            out.push_str("        c\n");
        }
        out.push_str("    }\n}\n");
        Ok(out)
    }

    /// A whole generated module: marker header, `use {module}::*;`, then one
    /// impl per declaration in the given order.
    pub fn render_file(
        &self,
        module: &str,
        sources: &[String],
        decls: &[QueryTypeDecl],
    ) -> Result<String> {
        let mut out = String::new();
        out.push_str(GENERATED_MARKER);
        out.push('\n');
        for source in sources {
            let _ = writeln!(out, "// source: {source}");
        }
        let _ = writeln!(out, "\nuse {module}::*;");
        for decl in decls {
            out.push('\n');
            out.push_str(&self.render_impl(decl)?);
        }
        Ok(out)
    }

    fn render_branch(&self, field: &FieldDecl) -> Result<String> {
        let ident = &field.ident;
        let column = field.column.as_deref();
        match &field.role {
            FieldRole::OrGroup => Ok(if_block(
                &format!("let {SOME}(g) = &self.{ident}"),
                &["c.push_or_group(::conquery::QueryObject::build_conditions(g));".to_string()],
            )),
            FieldRole::Subquery(sub) => {
                let conv = self.registry.resolve_subquery(&field.name, column);
                let head = subquery_head(&conv, &sub.select, &sub.from);
                let correlate = match &sub.correlate {
                    Some(on) => format!("{SOME}({})", lit(on)),
                    None => "::core::option::Option::None".to_string(),
                };
                Ok(if_block(
                    &format!("let {SOME}(q) = &self.{ident}"),
                    &[
                        "c.push_subquery(".to_string(),
                        format!("    {},", lit(&head)),
                        format!("    {correlate},"),
                        "    ::conquery::QueryObject::build_conditions(q),".to_string(),
                        ");".to_string(),
                    ],
                ))
            }
            FieldRole::Filter(shape) => {
                let conv = self.registry.resolve_with(&field.name, column);
                render_filter(field, *shape, &conv)
            }
        }
    }
}

/// One guarded statement block at routine-body indentation.
fn if_block(cond: &str, body: &[String]) -> String {
    let mut out = format!("        if {cond} {{\n");
    for line in body {
        out.push_str("            ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("        }\n");
    out
}

fn render_filter(field: &FieldDecl, shape: FieldShape, conv: &FieldConvention) -> Result<String> {
    let ident = &field.ident;
    let fragment = lit(&conv.fragment());
    let head = lit(&conv.head());
    let bind_some = format!("let {SOME}(v) = &self.{ident}");

    let (cond, stmt) = match (shape, conv.arity()) {
        (FieldShape::Bool, Arity::Zero) => (format!("self.{ident}"), format!("c.push_bare({fragment});")),
        (FieldShape::Bool, Arity::One) => (
            format!("self.{ident}"),
            format!("c.push({fragment}, ::conquery::Value::Bool(true));"),
        ),
        (FieldShape::OptionBool, Arity::Zero) => (
            format!("self.{ident} == {SOME}(true)"),
            format!("c.push_bare({fragment});"),
        ),
        (FieldShape::OptionBool, Arity::One) => {
            (bind_some, format!("c.push({fragment}, {TO_VALUE}(v));"))
        }
        (FieldShape::Bool | FieldShape::OptionBool, Arity::Many) => {
            return Err(unsupported(field, conv, "bool"));
        }
        (FieldShape::OptionScalar, Arity::Zero) => (
            format!("self.{ident}.is_some()"),
            format!("c.push_bare({fragment});"),
        ),
        (FieldShape::OptionScalar, Arity::One) => {
            (bind_some, format!("c.push({fragment}, {TO_VALUE}(v));"))
        }
        (FieldShape::OptionScalar, Arity::Many) => {
            (bind_some, format!("c.push_list({head}, [{TO_VALUE}(v)]);"))
        }
        (FieldShape::OptionVec, Arity::Many) => (
            bind_some,
            format!("c.push_list({head}, v.iter().map({TO_VALUE}));"),
        ),
        (FieldShape::Vec, Arity::Many) => {
            return Ok(format!(
                "        c.push_list({head}, self.{ident}.iter().map({TO_VALUE}));\n"
            ));
        }
        (FieldShape::OptionVec | FieldShape::Vec, Arity::Zero | Arity::One) => {
            return Err(unsupported(field, conv, "list"));
        }
    };
    Ok(if_block(&cond, &[stmt]))
}
