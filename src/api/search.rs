//! Search endpoint / 検索エンドポイント

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use script_search_backend::models::ScriptRecord;
use script_search_backend::search::{engine, SearchError, SearchParams};

use crate::state::AppState;

/// Search request body / 検索リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub character_filter: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Success payload / 成功レスポンス
#[derive(Debug, Serialize)]
pub struct SearchSuccess {
    pub success: bool,
    pub keyword: String,
    pub character_filter: Option<String>,
    pub sort_order: String,
    pub limit: i64,
    pub results: Vec<ScriptRecord>,
    pub count: usize,
    pub database_info: String,
}

/// Failure payload / 失敗レスポンス
#[derive(Debug, Serialize)]
pub struct SearchFailure {
    pub success: bool,
    pub error: String,
    pub error_code: &'static str,
}

/// Pin the charset the frontend expects / フロントエンドが期待するcharsetを付ける
fn utf8_json(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response
}

fn failure(status: StatusCode, error_code: &'static str, message: String) -> Response {
    utf8_json(
        (
            status,
            Json(SearchFailure {
                success: false,
                error: message,
                error_code,
            }),
        )
            .into_response(),
    )
}

/// POST /api/search - keyword search over the script store / 台本検索
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SearchRequest>>,
) -> Response {
    // Undecodable bodies degrade to the empty parameter set, which then
    // fails as a missing keyword / 解析不能なボディは空パラメータとして扱う
    let Json(req) = body.unwrap_or_default();

    let params = SearchParams::from_request(
        &req.keyword,
        req.character_filter.as_deref(),
        req.sort_order.as_deref(),
        req.limit,
    );

    // Reject before paying for a download / ダウンロード前に弾く
    if params.keyword.is_empty() {
        return failure(
            StatusCode::BAD_REQUEST,
            "MISSING_KEYWORD",
            SearchError::MissingKeyword.to_string(),
        );
    }

    let store = match state.provisioner.provision().await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Store provisioning failed: {}", e);
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "データベースに接続できませんでした".to_string(),
            );
        }
    };

    // The store is released on both paths before the response is built
    // 成否に関わらずストアを解放してからレスポンスを作る
    let result = engine::search(&params, store.pool()).await;
    store.release().await;

    match result {
        Ok(outcome) => {
            let database_info = outcome.info.database_info();
            utf8_json(
                (
                    StatusCode::OK,
                    Json(SearchSuccess {
                        success: true,
                        keyword: params.keyword.clone(),
                        character_filter: params.character_filter.clone(),
                        sort_order: params.sort_order.as_token().to_string(),
                        limit: params.limit,
                        results: outcome.records,
                        count: outcome.info.count,
                        database_info,
                    }),
                )
                    .into_response(),
            )
        }
        Err(e @ SearchError::MissingKeyword) => {
            failure(StatusCode::BAD_REQUEST, "MISSING_KEYWORD", e.to_string())
        }
        Err(e) => {
            tracing::error!("Search query failed: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "SEARCH_FAILED", e.to_string())
        }
    }
}

/// Any non-POST method on the search route / 検索ルートのPOST以外のメソッド
pub async fn method_not_allowed() -> Response {
    failure(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "Method not allowed".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"keyword":"こんにちは"}"#).unwrap();
        assert_eq!(req.keyword, "こんにちは");
        assert!(req.character_filter.is_none());
        assert!(req.sort_order.is_none());
        assert_eq!(req.limit, 50);
    }

    #[test]
    fn test_request_full_body() {
        let req: SearchRequest = serde_json::from_str(
            r#"{"keyword":"歌","character_filter":"サンサン","sort_order":"broadcast_date_desc","limit":10}"#,
        )
        .unwrap();
        assert_eq!(req.character_filter.as_deref(), Some("サンサン"));
        assert_eq!(req.sort_order.as_deref(), Some("broadcast_date_desc"));
        assert_eq!(req.limit, 10);
    }

    #[test]
    fn test_empty_body_falls_back_to_missing_keyword_shape() {
        // What the handler builds from a body it could not decode
        let req = SearchRequest::default();
        let params = SearchParams::from_request(
            &req.keyword,
            req.character_filter.as_deref(),
            req.sort_order.as_deref(),
            req.limit,
        );
        assert!(params.keyword.is_empty());
    }

    #[test]
    fn test_failure_payload_shape() {
        let payload = SearchFailure {
            success: false,
            error: "キーワードを入力してください".to_string(),
            error_code: "MISSING_KEYWORD",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "キーワードを入力してください");
        assert_eq!(json["error_code"], "MISSING_KEYWORD");
    }

    #[test]
    fn test_success_payload_shape() {
        let payload = SearchSuccess {
            success: true,
            keyword: "こんにちは".to_string(),
            character_filter: None,
            sort_order: "management_id_asc".to_string(),
            limit: 50,
            results: vec![ScriptRecord::default()],
            count: 1,
            database_info: "legacy schema (flat scripts table), 1 hits".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert!(json["character_filter"].is_null());
        // Record fields are concrete even when empty / 空でも欠損しない
        assert_eq!(json["results"][0]["dialogue"], "");
        assert_eq!(json["results"][0]["row_number"], 0);
    }
}
