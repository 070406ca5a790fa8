//! Search engine orchestrator / 検索エンジン
//!
//! Public operation: `search(params, db)`. Validates, detects the schema,
//! builds the statement, executes exactly once, normalizes rows. Holds no state
//! across calls; concurrent requests each bring their own store handle.

use sqlx::{Pool, Sqlite};
use thiserror::Error;

use crate::models::ScriptRecord;

use super::normalize::normalize_row;
use super::params::SearchParams;
use super::query::{build_search_query, BindValue};
use super::schema::{detect_schema, SchemaShape};

/// Search failure kinds / 検索の失敗種別
///
/// Display messages are what the caller is allowed to see; the sqlx cause
/// stays in `source` so raw query text never reaches the response.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Keyword empty after trimming / キーワード未入力
    #[error("キーワードを入力してください")]
    MissingKeyword,
    /// Store or query failure / ストアまたはクエリの失敗
    #[error("検索クエリの実行に失敗しました")]
    QueryExecutionFailed(#[source] sqlx::Error),
}

/// Descriptive metadata about one search / 検索1回分のメタ情報
#[derive(Debug, Clone)]
pub struct SearchInfo {
    pub schema: SchemaShape,
    pub count: usize,
}

impl SearchInfo {
    /// Summary string for the response's database_info field / レスポンス用の要約
    pub fn database_info(&self) -> String {
        format!("{}, {} hits", self.schema.describe(), self.count)
    }
}

/// Ordered records plus metadata / 順序付きレコードとメタ情報
#[derive(Debug)]
pub struct SearchOutcome {
    pub records: Vec<ScriptRecord>,
    pub info: SearchInfo,
}

/// Run one keyword search against an open store / ストアに対して検索を1回実行
pub async fn search(
    params: &SearchParams,
    db: &Pool<Sqlite>,
) -> Result<SearchOutcome, SearchError> {
    if params.keyword.trim().is_empty() {
        return Err(SearchError::MissingKeyword);
    }

    let shape = detect_schema(db)
        .await
        .map_err(SearchError::QueryExecutionFailed)?;

    let built = build_search_query(params, shape);

    let mut query = sqlx::query(&built.sql);
    for bind in &built.binds {
        query = match bind {
            BindValue::Text(s) => query.bind(s),
            BindValue::Int(n) => query.bind(n),
        };
    }

    let rows = query
        .fetch_all(db)
        .await
        .map_err(SearchError::QueryExecutionFailed)?;

    let records: Vec<ScriptRecord> = rows.iter().map(|row| normalize_row(row, shape)).collect();
    let count = records.len();

    tracing::debug!("Search done: schema={:?}, hits={}", shape, count);

    Ok(SearchOutcome {
        records,
        info: SearchInfo { schema: shape, count },
    })
}
