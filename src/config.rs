//! Application configuration module / アプリ設定モジュール
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 初回起動時にデフォルト設定を作成

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Global configuration instance / グローバル設定インスタンス
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration / アプリ設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / サーバー設定
    pub server: ServerConfig,
    /// Script database configuration / 台本データベース設定
    pub database: DatabaseConfig,
}

/// Server configuration / サーバー設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / サーバー監視アドレス
    pub host: String,
    /// Server port / サーバーポート
    pub port: u16,
}

/// Script database configuration / 台本データベース設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Remote URL of the script SQLite file / 台本SQLiteファイルのリモートURL
    pub remote_url: String,
    /// Download timeout in seconds / ダウンロードのタイムアウト（秒）
    pub download_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8190,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            // Must be set before the search endpoint is usable / 検索を使う前に設定が必要
            remote_url: String::new(),
            download_timeout_secs: 300,
        }
    }
}

impl AppConfig {
    /// Get the server bind address / サーバーのバインドアドレスを取得
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 設定ファイルのパスを取得
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 設定を読み込み、なければデフォルトを作成
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config(&config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 設定をファイルに保存
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path();

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Get global configuration instance / グローバル設定インスタンスを取得
pub fn get_config() -> Arc<RwLock<AppConfig>> {
    CONFIG
        .get_or_init(|| {
            let config = load_config().unwrap_or_default();
            Arc::new(RwLock::new(config))
        })
        .clone()
}

/// Get a read-only snapshot of current config / 現在の設定の読み取り専用スナップショットを取得
pub fn config() -> AppConfig {
    get_config().read().clone()
}
