use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - ヘルスチェック
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "台本検索サービスは正常に動作しています",
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
