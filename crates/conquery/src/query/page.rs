//! Pagination and ordering requests.

use crate::error::{OrmError, OrmResult};
use crate::ident::validate_ident;
use serde::{Deserialize, Serialize};

/// Page number, page size and sort order carried by a query object.
///
/// Paging applies only when both `page_number` (1-based) and `page_size` are
/// present and positive. `sort` lists `column[,asc|desc]` items separated by
/// `;`, e.g. `"score,desc;id"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One validated `ORDER BY` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl PageQuery {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Both page number and page size are present and positive.
    pub fn need_paging(&self) -> bool {
        matches!(
            (self.page_number, self.page_size),
            (Some(n), Some(s)) if n > 0 && s > 0
        )
    }

    /// `(limit, offset)` when paging applies.
    pub fn limit_offset(&self) -> Option<(i64, i64)> {
        match (self.page_number, self.page_size) {
            (Some(n), Some(s)) if n > 0 && s > 0 => Some((s, (n - 1).saturating_mul(s))),
            _ => None,
        }
    }

    /// ` LIMIT size OFFSET skip`, or empty when paging does not apply.
    ///
    /// Both numbers are rendered literally so the argument list is unaffected.
    pub fn page_clause(&self) -> String {
        match self.limit_offset() {
            Some((limit, offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
            None => String::new(),
        }
    }

    /// Parse and validate `sort`.
    pub fn sort_keys(&self) -> OrmResult<Vec<SortKey>> {
        let Some(sort) = self.sort.as_deref() else {
            return Ok(Vec::new());
        };
        let mut keys = Vec::new();
        for item in sort.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (column, direction) = match item.split_once(',') {
                Some((column, dir)) => (column.trim(), parse_direction(dir.trim())?),
                None => (item, SortDirection::Asc),
            };
            keys.push(SortKey {
                column: validate_ident(column)?.to_string(),
                direction,
            });
        }
        Ok(keys)
    }

    /// ` ORDER BY a DESC, b ASC`, or empty when no sort is requested.
    pub fn sort_clause(&self) -> OrmResult<String> {
        let keys = self.sort_keys()?;
        if keys.is_empty() {
            return Ok(String::new());
        }
        let items: Vec<String> = keys
            .iter()
            .map(|k| format!("{} {}", k.column, k.direction.as_sql()))
            .collect();
        Ok(format!(" ORDER BY {}", items.join(", ")))
    }

    /// Ordering followed by paging, appended after the WHERE clause.
    pub fn to_sql(&self) -> OrmResult<String> {
        let mut out = self.sort_clause()?;
        out.push_str(&self.page_clause());
        Ok(out)
    }
}

fn parse_direction(s: &str) -> OrmResult<SortDirection> {
    if s.eq_ignore_ascii_case("asc") || s.is_empty() {
        Ok(SortDirection::Asc)
    } else if s.eq_ignore_ascii_case("desc") {
        Ok(SortDirection::Desc)
    } else {
        Err(OrmError::validation(format!(
            "Invalid sort direction '{s}' (expected asc or desc)"
        )))
    }
}
