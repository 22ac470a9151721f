//! Reflective where-clause compilation.

use super::{FieldValue, QueryObject};
use crate::condition::Conditions;
use crate::value::Value;
use conquery_convention::{Arity, OperatorRegistry};

/// Walks a query object's field descriptors and resolves each name through an
/// [`OperatorRegistry`] at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhereCompiler {
    registry: OperatorRegistry,
}

impl WhereCompiler {
    pub fn new(registry: &OperatorRegistry) -> Self {
        Self {
            registry: *registry,
        }
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Compile every applied field, in declaration order.
    pub fn compile<Q: QueryObject + ?Sized>(&self, query: &Q) -> Conditions {
        let fields = query.fields();
        let mut out = Conditions::with_capacity(fields.len());
        for field in fields {
            match field.value {
                FieldValue::Flag(false)
                | FieldValue::Scalar(None)
                | FieldValue::List(None)
                | FieldValue::Or(None)
                | FieldValue::Subquery(_, None) => {}

                FieldValue::Or(Some(group)) => out.push_or_group(self.compile(group)),

                FieldValue::Subquery(spec, Some(inner)) => {
                    let conv = self.registry.resolve_subquery(field.name, field.column);
                    out.push_subquery(&spec.head(&conv), spec.correlate, self.compile(inner));
                }

                FieldValue::Flag(true) => {
                    let conv = self.registry.resolve_with(field.name, field.column);
                    match conv.arity() {
                        Arity::Zero => out.push_bare(conv.fragment()),
                        Arity::One => out.push(conv.fragment(), Value::Bool(true)),
                        // A trigger has no elements to test membership against.
                        Arity::Many => {}
                    }
                }

                FieldValue::Scalar(Some(value)) => {
                    let conv = self.registry.resolve_with(field.name, field.column);
                    match conv.arity() {
                        Arity::Zero => out.push_bare(conv.fragment()),
                        Arity::One => out.push(conv.fragment(), value),
                        Arity::Many => out.push_list(&conv.head(), [value]),
                    }
                }

                FieldValue::List(Some(values)) => {
                    let conv = self.registry.resolve_with(field.name, field.column);
                    if conv.arity() == Arity::Many {
                        out.push_list(&conv.head(), values);
                    }
                }
            }
        }
        out
    }

    /// WHERE clause text and its arguments.
    pub fn where_clause<Q: QueryObject + ?Sized>(&self, query: &Q) -> (String, Vec<Value>) {
        self.compile(query).into_where()
    }
}

/// WHERE clause text and arguments for `query`, through its own
/// [`build_conditions`](QueryObject::build_conditions) (static when derived).
pub fn build_where_clause<Q: QueryObject + ?Sized>(query: &Q) -> (String, Vec<Value>) {
    query.build_conditions().into_where()
}
