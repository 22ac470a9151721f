#![allow(dead_code)]

use conquery::{Entity, FromRow, PageQuery, QueryObject, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Default, Entity, FromRow, serde::Serialize)]
pub struct UserEntity {
    pub id: i64,
    pub score: Option<i32>,
    pub memo: Option<String>,
}

impl UserEntity {
    pub fn new(score: Option<i32>, memo: Option<&str>) -> Self {
        Self {
            id: 0,
            score,
            memo: memo.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, QueryObject)]
pub struct AccountOr {
    pub memo: Option<String>,
    pub memo_null: bool,
    pub score_gt: Option<i32>,
}

#[derive(Debug, Clone, Default, QueryObject)]
pub struct UserQuery {
    pub page: PageQuery,
    pub id: Option<i64>,
    pub id_in: Option<Vec<i64>>,
    pub id_not_in: Option<Vec<i64>>,
    pub score_lt: Option<i32>,
    pub score_ge: Option<i32>,
    pub memo_like: Option<String>,
    pub memo_null: bool,
    pub memo_not_null: Option<bool>,
    pub account_or: Option<AccountOr>,
    #[orm(subquery(select = "avg(score)", from = "User"))]
    pub score_gt_avg: Option<Box<UserQuery>>,
}

pub const SCHEMA: &str = "CREATE TABLE User (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    score INTEGER,
    memo TEXT
);";

/// Rows 1..=4: (85, "Good"), (40, "Bad"), (55, NULL), (62, "Well").
pub const SEED: &str = "INSERT INTO User (score, memo) VALUES
    (85, 'Good'), (40, 'Bad'), (55, NULL), (62, 'Well');";

pub fn seeded() -> SqliteConnection {
    let conn = SqliteConnection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(SEED).unwrap();
    conn
}

pub fn ids(users: &[UserEntity]) -> Vec<i64> {
    users.iter().map(|u| u.id).collect()
}
