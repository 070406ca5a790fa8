//! Query construction / クエリ構築
//!
//! Translates search parameters plus the detected schema shape into one
//! parameterized SQL statement and its positional argument list. User
//! values are only ever bound, never spliced into the SQL text.

use super::params::{SearchParams, SortOrder};
use super::schema::SchemaShape;

/// One positional query argument / クエリの位置引数
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

/// A statement plus its bound arguments, in bind order / 文と引数のペア
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Columns the keyword is matched against, per schema / キーワード照合対象の列
const LEGACY_KEYWORD_COLUMNS: &[&str] = &["title", "dialogue", "character_name"];
const NORMALIZED_KEYWORD_COLUMNS: &[&str] = &[
    "s.title",
    "d.dialogue",
    "d.character_name",
    "sd.description",
    "ve.effect",
    "ai.instruction",
    "tn.note",
];

/// Content type resolution: (existence predicate column, tag), evaluated
/// top to bottom. First match wins; the fallback tag is 'title'.
/// コンテンツ種別の優先順位。上から順に評価し、最初の一致を採用する。
const CONTENT_TYPE_PRIORITY: &[(&str, &str)] = &[
    ("d.id", "dialogue"),
    ("sd.id", "scene_description"),
    ("ve.id", "visual_effect"),
    ("ai.id", "audio_instruction"),
    ("tn.id", "technical_note"),
];

/// Build the single search statement for the detected schema / 検索文を構築
///
/// The caller has already rejected an empty keyword; this stage never
/// fails. LIMIT is always the last bound parameter.
pub fn build_search_query(params: &SearchParams, shape: SchemaShape) -> BuiltQuery {
    let pattern = format!("%{}%", params.keyword);
    let mut binds: Vec<BindValue> = Vec::new();

    let keyword_columns = match shape {
        SchemaShape::Legacy => LEGACY_KEYWORD_COLUMNS,
        SchemaShape::Normalized => NORMALIZED_KEYWORD_COLUMNS,
    };

    let keyword_clause = keyword_columns
        .iter()
        .map(|col| format!("{} LIKE ?", col))
        .collect::<Vec<_>>()
        .join(" OR ");
    for _ in keyword_columns {
        binds.push(BindValue::Text(pattern.clone()));
    }

    let mut sql = match shape {
        SchemaShape::Legacy => format!(
            "SELECT management_id, title, broadcast_date, character_name, dialogue, \
             voice_instruction, filming_instruction, editing_instruction, script_url, row_number \
             FROM scripts WHERE ({})",
            keyword_clause
        ),
        SchemaShape::Normalized => format!(
            "SELECT s.management_id, s.title, s.broadcast_date, d.character_name, \
             COALESCE(d.dialogue, sd.description, ve.effect, ai.instruction, tn.note) AS dialogue, \
             d.voice_instruction, d.filming_instruction, d.editing_instruction, s.script_url, \
             COALESCE(d.row_number, sd.row_number, ve.row_number, ai.row_number, tn.row_number) AS row_number, \
             {} \
             FROM scripts s \
             LEFT JOIN dialogues d ON d.script_id = s.id \
             LEFT JOIN scene_descriptions sd ON sd.script_id = s.id \
             LEFT JOIN visual_effects ve ON ve.script_id = s.id \
             LEFT JOIN audio_instructions ai ON ai.script_id = s.id \
             LEFT JOIN technical_notes tn ON tn.script_id = s.id \
             WHERE ({})",
            content_type_case(),
            keyword_clause
        ),
    };

    // Character filter only applies to dialogue rows on the normalized
    // schema / キャラクター絞り込みは正規化スキーマでは台詞テーブルに対して行う
    if let Some(ref character) = params.character_filter {
        let column = match shape {
            SchemaShape::Legacy => "character_name",
            SchemaShape::Normalized => "d.character_name",
        };
        sql.push_str(&format!(" AND {} LIKE ?", column));
        binds.push(BindValue::Text(format!("%{}%", character)));
    }

    sql.push_str(" ORDER BY ");
    sql.push_str(order_clause(params.sort_order, shape));

    sql.push_str(" LIMIT ?");
    binds.push(BindValue::Int(params.limit));

    BuiltQuery { sql, binds }
}

/// CASE expression resolving the content type tag by existence checks in
/// priority order / 存在チェックの優先順でタグを決めるCASE式
fn content_type_case() -> String {
    let mut case = String::from("CASE");
    for (key_column, tag) in CONTENT_TYPE_PRIORITY {
        case.push_str(&format!(" WHEN {} IS NOT NULL THEN '{}'", key_column, tag));
    }
    case.push_str(" ELSE 'title' END AS content_type");
    case
}

/// Fixed lookup from sort token to ORDER BY clause / 並び順の固定対応表
///
/// Every branch ends with the per-schema row number as tie-break so equal
/// primary-sort values come back in a stable order.
fn order_clause(sort: SortOrder, shape: SchemaShape) -> &'static str {
    match shape {
        SchemaShape::Legacy => match sort {
            SortOrder::ManagementIdAsc => "management_id ASC, row_number ASC",
            SortOrder::ManagementIdDesc => "management_id DESC, row_number ASC",
            SortOrder::BroadcastDateAsc => "broadcast_date ASC, row_number ASC",
            SortOrder::BroadcastDateDesc => "broadcast_date DESC, row_number ASC",
        },
        SchemaShape::Normalized => match sort {
            SortOrder::ManagementIdAsc => "s.management_id ASC, row_number ASC",
            SortOrder::ManagementIdDesc => "s.management_id DESC, row_number ASC",
            SortOrder::BroadcastDateAsc => "s.broadcast_date ASC, row_number ASC",
            SortOrder::BroadcastDateDesc => "s.broadcast_date DESC, row_number ASC",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(keyword: &str) -> SearchParams {
        SearchParams::from_request(keyword, None, None, 50)
    }

    #[test]
    fn test_legacy_bind_layout() {
        let built = build_search_query(&params("こんにちは"), SchemaShape::Legacy);

        // 3 keyword binds + limit / キーワード3個＋LIMIT
        assert_eq!(built.binds.len(), 4);
        for bind in &built.binds[..3] {
            assert_eq!(bind, &BindValue::Text("%こんにちは%".to_string()));
        }
        assert_eq!(built.binds.last(), Some(&BindValue::Int(50)));
    }

    #[test]
    fn test_normalized_bind_layout() {
        let built = build_search_query(&params("雨"), SchemaShape::Normalized);

        // 7 keyword binds + limit / キーワード7個＋LIMIT
        assert_eq!(built.binds.len(), 8);
        for bind in &built.binds[..7] {
            assert_eq!(bind, &BindValue::Text("%雨%".to_string()));
        }
        assert_eq!(built.binds.last(), Some(&BindValue::Int(50)));
    }

    #[test]
    fn test_character_filter_adds_one_bind_before_limit() {
        let p = SearchParams::from_request("歌", Some("サンサン"), None, 20);

        let built = build_search_query(&p, SchemaShape::Legacy);
        assert_eq!(built.binds.len(), 5);
        assert_eq!(built.binds[3], BindValue::Text("%サンサン%".to_string()));
        assert_eq!(built.binds[4], BindValue::Int(20));

        let built = build_search_query(&p, SchemaShape::Normalized);
        assert_eq!(built.binds.len(), 9);
        assert_eq!(built.binds[7], BindValue::Text("%サンサン%".to_string()));
        assert!(built.sql.contains("AND d.character_name LIKE ?"));
    }

    #[test]
    fn test_user_values_never_in_sql_text() {
        let p = SearchParams::from_request("'; DROP TABLE scripts; --", Some("x' OR 1=1"), None, 10);
        for shape in [SchemaShape::Legacy, SchemaShape::Normalized] {
            let built = build_search_query(&p, shape);
            assert!(!built.sql.contains("DROP TABLE"));
            assert!(!built.sql.contains("1=1"));
        }
    }

    #[test]
    fn test_order_clause_lookup() {
        let cases = [
            (SortOrder::ManagementIdAsc, "ORDER BY management_id ASC, row_number ASC"),
            (SortOrder::ManagementIdDesc, "ORDER BY management_id DESC, row_number ASC"),
            (SortOrder::BroadcastDateAsc, "ORDER BY broadcast_date ASC, row_number ASC"),
            (SortOrder::BroadcastDateDesc, "ORDER BY broadcast_date DESC, row_number ASC"),
        ];
        for (sort, expected) in cases {
            let p = SearchParams::from_request("a", None, Some(sort.as_token()), 5);
            let built = build_search_query(&p, SchemaShape::Legacy);
            assert!(built.sql.contains(expected), "missing {:?} in {}", expected, built.sql);
        }
    }

    #[test]
    fn test_every_order_branch_has_row_number_tiebreak() {
        for shape in [SchemaShape::Legacy, SchemaShape::Normalized] {
            for sort in [
                SortOrder::ManagementIdAsc,
                SortOrder::ManagementIdDesc,
                SortOrder::BroadcastDateAsc,
                SortOrder::BroadcastDateDesc,
            ] {
                assert!(order_clause(sort, shape).ends_with("row_number ASC"));
            }
        }
    }

    #[test]
    fn test_normalized_uses_left_joins_only() {
        let built = build_search_query(&params("a"), SchemaShape::Normalized);
        // Inner joins would drop parent-only rows / 内部結合では親のみの行が落ちる
        assert_eq!(built.sql.matches("LEFT JOIN").count(), 5);
        assert_eq!(built.sql.matches("JOIN").count(), 5);
    }

    #[test]
    fn test_content_type_priority_order_in_case() {
        let built = build_search_query(&params("a"), SchemaShape::Normalized);
        let tags = [
            "'dialogue'",
            "'scene_description'",
            "'visual_effect'",
            "'audio_instruction'",
            "'technical_note'",
            "'title'",
        ];
        let positions: Vec<usize> = tags
            .iter()
            .map(|t| built.sql.find(t).expect("tag missing from CASE"))
            .collect();
        for window in positions.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn test_limit_always_last_bind() {
        let p = SearchParams::from_request("a", Some("b"), Some("broadcast_date_asc"), 7);
        for shape in [SchemaShape::Legacy, SchemaShape::Normalized] {
            let built = build_search_query(&p, shape);
            assert_eq!(built.binds.last(), Some(&BindValue::Int(7)));
            assert!(built.sql.trim_end().ends_with("LIMIT ?"));
        }
    }
}
