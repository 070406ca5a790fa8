//! Row normalization / 行の正規化
//!
//! Maps raw query rows into flat records, substituting empty-string/0
//! defaults for null or missing columns. Row order is preserved as
//! received; ordering is the query's responsibility.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::models::ScriptRecord;

use super::schema::SchemaShape;

/// Tag carried by rows from the flat schema / フラットスキーマの行に付くタグ
pub const LEGACY_CONTENT_TYPE: &str = "original";

fn text(row: &SqliteRow, column: &str) -> String {
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn integer(row: &SqliteRow, column: &str) -> i64 {
    row.try_get::<Option<i64>, _>(column)
        .ok()
        .flatten()
        .unwrap_or(0)
}

/// Map one raw row into a ScriptRecord / 1行をScriptRecordへ変換
///
/// Handles both projections: the 10-column legacy shape (the tag is
/// synthesized) and the 11-column normalized shape (the tag comes from
/// the query's CASE expression).
pub fn normalize_row(row: &SqliteRow, shape: SchemaShape) -> ScriptRecord {
    ScriptRecord {
        management_id: text(row, "management_id"),
        title: text(row, "title"),
        broadcast_date: text(row, "broadcast_date"),
        character_name: text(row, "character_name"),
        dialogue: text(row, "dialogue"),
        voice_instruction: text(row, "voice_instruction"),
        filming_instruction: text(row, "filming_instruction"),
        editing_instruction: text(row, "editing_instruction"),
        script_url: text(row, "script_url"),
        row_number: integer(row, "row_number"),
        content_type: match shape {
            SchemaShape::Legacy => LEGACY_CONTENT_TYPE.to_string(),
            SchemaShape::Normalized => text(row, "content_type"),
        },
    }
}
