//! Store schema detection / ストアのスキーマ判定

use sqlx::{Pool, Sqlite};

/// Physical layout of the script store / 台本ストアの物理レイアウト
///
/// Resolved once per request; query building and row normalization branch
/// on this tag explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// One flat table with all columns / フラットな単一テーブル
    Legacy,
    /// Parent scripts table plus five content tables / 親テーブル＋5つのコンテンツテーブル
    Normalized,
}

impl SchemaShape {
    /// Human-readable description for the response metadata / レスポンス用の説明
    pub fn describe(&self) -> &'static str {
        match self {
            SchemaShape::Legacy => "legacy schema (flat scripts table)",
            SchemaShape::Normalized => "normalized schema (scripts + 5 content tables)",
        }
    }
}

/// Marker table that only exists in the normalized layout / 正規化レイアウトの目印テーブル
const NORMALIZED_MARKER_TABLE: &str = "dialogues";

/// Detect which layout the store uses / ストアのレイアウトを判定
///
/// A store without the marker table is treated as Legacy; only a real
/// query failure (corrupt file, not a database) surfaces as an error.
pub async fn detect_schema(db: &Pool<Sqlite>) -> Result<SchemaShape, sqlx::Error> {
    let marker: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind(NORMALIZED_MARKER_TABLE)
    .fetch_optional(db)
    .await?;

    Ok(if marker.is_some() {
        SchemaShape::Normalized
    } else {
        SchemaShape::Legacy
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> Pool<Sqlite> {
        // Single connection keeps the in-memory database alive / 単一接続でメモリDBを維持
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_detect_legacy_schema() {
        let db = memory_pool().await;
        sqlx::query("CREATE TABLE scripts (management_id TEXT, title TEXT)")
            .execute(&db)
            .await
            .unwrap();

        assert_eq!(detect_schema(&db).await.unwrap(), SchemaShape::Legacy);
    }

    #[tokio::test]
    async fn test_detect_normalized_schema() {
        let db = memory_pool().await;
        sqlx::query("CREATE TABLE scripts (id INTEGER PRIMARY KEY, management_id TEXT)")
            .execute(&db)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE dialogues (id INTEGER PRIMARY KEY, script_id INTEGER)")
            .execute(&db)
            .await
            .unwrap();

        assert_eq!(detect_schema(&db).await.unwrap(), SchemaShape::Normalized);
    }

    #[tokio::test]
    async fn test_detect_empty_store_is_legacy() {
        // No tables at all must not raise / テーブルが無くてもエラーにしない
        let db = memory_pool().await;
        assert_eq!(detect_schema(&db).await.unwrap(), SchemaShape::Legacy);
    }
}
