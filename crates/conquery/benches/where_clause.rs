use conquery::{PageQuery, QueryObject, WhereCompiler};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

#[derive(Default, QueryObject)]
struct AccountOr {
    username: Option<String>,
    email: Option<String>,
    mobile: Option<String>,
}

#[derive(Default, QueryObject)]
struct UserQuery {
    page: PageQuery,
    id: Option<i64>,
    id_in: Option<Vec<i64>>,
    score_lt: Option<i32>,
    score_ge: Option<i32>,
    memo_like: Option<String>,
    memo_null: bool,
    deleted: Option<bool>,
    account_or: Option<AccountOr>,
}

fn populated(list_len: i64) -> UserQuery {
    UserQuery {
        id_in: Some((0..list_len).collect()),
        score_lt: Some(80),
        score_ge: Some(10),
        memo_like: Some("%oo%".to_string()),
        memo_null: true,
        deleted: Some(true),
        account_or: Some(AccountOr {
            username: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
            mobile: None,
        }),
        ..Default::default()
    }
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_clause/compile");
    let compiler = WhereCompiler::default();

    for n in [1, 10, 100] {
        let q = populated(n);
        group.bench_with_input(BenchmarkId::new("reflective", n), &q, |b, q| {
            b.iter(|| black_box(compiler.compile(q)));
        });
        group.bench_with_input(BenchmarkId::new("static", n), &q, |b, q| {
            b.iter(|| black_box(q.static_conditions()));
        });
    }

    group.finish();
}

fn bench_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_clause/sparse");
    let compiler = WhereCompiler::default();
    let q = UserQuery {
        score_lt: Some(80),
        ..Default::default()
    };

    group.bench_function("reflective", |b| b.iter(|| black_box(compiler.where_clause(&q))));
    group.bench_function("static", |b| {
        b.iter(|| black_box(q.static_conditions().into_where()))
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_sparse);
criterion_main!(benches);
