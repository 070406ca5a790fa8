//! Data source provisioning / データソースの調達
//!
//! Resolves the configured remote database URL into a locally queryable
//! SQLite store for exactly one request: download to a temp file, open a
//! read-only pool, and release (close, then delete) when the request is
//! done. The engine never sees the file, only the open pool.
//!
//! Note: no connection reuse across requests. Every search pays one
//! download; the store file on the content host is the single source of
//! truth and may be replaced between requests.
//! リクエスト間で接続を使い回さない。ストアは毎回取得する。

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Downloads the script database and opens it per request / 台本DBを取得して開く
pub struct DataSourceProvisioner {
    remote_url: String,
    client: reqwest::Client,
}

/// An open store for one request's duration / 1リクエスト分の開いたストア
///
/// Holds the temp file alongside the pool; dropping the guard removes the
/// file even if `release` was never reached.
#[derive(Debug)]
pub struct ScriptStore {
    pool: Pool<Sqlite>,
    file: NamedTempFile,
}

impl ScriptStore {
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the pool, then delete the temp file / プールを閉じて一時ファイルを削除
    pub async fn release(self) {
        self.pool.close().await;
        if let Err(e) = self.file.close() {
            tracing::warn!("Failed to remove temp database file: {}", e);
        }
    }
}

impl DataSourceProvisioner {
    pub fn new(remote_url: String, timeout_secs: u64) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self { remote_url, client })
    }

    /// Download the remote database into a temp file and open it
    /// リモートDBを一時ファイルへダウンロードして開く
    pub async fn provision(&self) -> Result<ScriptStore, String> {
        if self.remote_url.is_empty() {
            return Err("Remote database URL is not configured".to_string());
        }

        let response = self
            .client
            .get(&self.remote_url)
            .send()
            .await
            .map_err(|e| format!("Database download failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Database download failed: HTTP {}", response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read download body: {}", e))?;

        tracing::debug!("Downloaded script database: {} bytes", bytes.len());

        let file = tempfile::Builder::new()
            .prefix("script_store_")
            .suffix(".db")
            .tempfile()
            .map_err(|e| format!("Failed to create temp file: {}", e))?;

        let mut writer = tokio::fs::File::create(file.path())
            .await
            .map_err(|e| format!("Failed to open temp file: {}", e))?;
        writer
            .write_all(&bytes)
            .await
            .map_err(|e| format!("Failed to write temp file: {}", e))?;
        writer
            .flush()
            .await
            .map_err(|e| format!("Failed to flush temp file: {}", e))?;

        Self::open_store(file).await
    }

    /// Open a read-only pool over an on-disk store file / ファイルを読み取り専用で開く
    async fn open_store(file: NamedTempFile) -> Result<ScriptStore, String> {
        let db_url = format!("sqlite:{}?mode=ro", file.path().to_string_lossy());

        // One request, one connection / 1リクエスト1接続
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&db_url)
            .await
            .map_err(|e| format!("Failed to open script database: {}", e))?;

        Ok(ScriptStore { pool, file })
    }
}
