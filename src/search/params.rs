//! Search parameters / 検索パラメータ

/// Requested result ordering / 結果の並び順
///
/// Unrecognized tokens resolve to the default instead of failing the
/// request, so an old client never breaks on a token it predates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    ManagementIdAsc,
    ManagementIdDesc,
    BroadcastDateAsc,
    BroadcastDateDesc,
}

impl SortOrder {
    /// Parse a request token, falling back to the default / トークンを解析
    pub fn from_token(token: &str) -> Self {
        match token {
            "management_id_asc" => SortOrder::ManagementIdAsc,
            "management_id_desc" => SortOrder::ManagementIdDesc,
            "broadcast_date_asc" => SortOrder::BroadcastDateAsc,
            "broadcast_date_desc" => SortOrder::BroadcastDateDesc,
            _ => SortOrder::default(),
        }
    }

    /// Canonical token echoed back in responses / レスポンスに返す正規トークン
    pub fn as_token(&self) -> &'static str {
        match self {
            SortOrder::ManagementIdAsc => "management_id_asc",
            SortOrder::ManagementIdDesc => "management_id_desc",
            SortOrder::BroadcastDateAsc => "broadcast_date_asc",
            SortOrder::BroadcastDateDesc => "broadcast_date_desc",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::ManagementIdAsc
    }
}

/// Default result cap / デフォルトの件数上限
pub const DEFAULT_LIMIT: i64 = 50;

/// Validated engine input, built once per request from untrusted values.
/// リクエストごとに未検証の入力から構築する
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Trimmed keyword; emptiness is rejected by the engine / キーワード
    pub keyword: String,
    /// Narrows results to rows whose character name contains this / キャラクター絞り込み
    pub character_filter: Option<String>,
    pub sort_order: SortOrder,
    pub limit: i64,
}

impl SearchParams {
    /// Build params from raw request values / 生のリクエスト値からパラメータを構築
    ///
    /// Trims keyword and filter, drops an empty filter, resolves the sort
    /// token, and replaces a non-positive limit with the default.
    pub fn from_request(
        keyword: &str,
        character_filter: Option<&str>,
        sort_order: Option<&str>,
        limit: i64,
    ) -> Self {
        let character_filter = character_filter
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Self {
            keyword: keyword.trim().to_string(),
            character_filter,
            sort_order: sort_order.map(SortOrder::from_token).unwrap_or_default(),
            limit: if limit > 0 { limit } else { DEFAULT_LIMIT },
        }
    }
}
