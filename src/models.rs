use serde::{Deserialize, Serialize};

/// One row of the search result, flat regardless of the store schema.
/// 検索結果の1行。スキーマに関係なくフラットな形で返す。
///
/// String fields are never null in output: missing source columns become
/// empty strings, a missing row number becomes 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub management_id: String,
    pub title: String,
    pub broadcast_date: String,
    pub character_name: String,
    pub dialogue: String,
    pub voice_instruction: String,
    pub filming_instruction: String,
    pub editing_instruction: String,
    pub script_url: String,
    pub row_number: i64,
    /// Which content table supplied the text / どのテーブルの本文か
    /// "original" on the flat schema, otherwise the dependent table tag
    /// or "title" when only the title matched.
    pub content_type: String,
}
