//! A query type whose routine comes from a `conquery gen` file.

use conquery::{QueryObject, Value, WhereCompiler};
use conquery_codegen::{Generator, QueryTypeDecl};

#[derive(Debug, Default, QueryObject)]
#[orm(external)]
pub struct ScoreQuery {
    pub score_lt: Option<i32>,
    pub memo_null: bool,
    pub id_in: Option<Vec<i64>>,
}

#[path = "external/generated.rs"]
mod generated;

#[test]
fn generated_file_is_up_to_date() {
    let file = syn::parse_file(include_str!("external.rs")).unwrap();
    let decls: Vec<QueryTypeDecl> = file
        .items
        .into_iter()
        .filter_map(|item| match item {
            syn::Item::Struct(s) if QueryTypeDecl::derives_query_object(&s.attrs) => {
                Some(QueryTypeDecl::parse(&syn::DeriveInput::from(s)).unwrap())
            }
            _ => None,
        })
        .collect();
    let rendered = Generator::default()
        .render_file("super", &["tests/external.rs".to_string()], &decls)
        .unwrap();
    assert_eq!(rendered, include_str!("external/generated.rs"));
}

#[test]
fn external_routine_backs_build_conditions() {
    let q = ScoreQuery {
        score_lt: Some(80),
        memo_null: true,
        id_in: Some(vec![7]),
    };
    let (clause, args) = conquery::build_where_clause(&q);
    assert_eq!(clause, " WHERE score < ? AND memo IS NULL AND id IN (?)");
    assert_eq!(args, vec![Value::Int(80), Value::Int(7)]);
    assert_eq!(q.build_conditions(), WhereCompiler::default().compile(&q));
}
