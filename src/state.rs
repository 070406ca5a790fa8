use script_search_backend::datasource::DataSourceProvisioner;

/// Shared application state / 共有アプリ状態
///
/// Only the provisioner lives here; each request provisions and releases
/// its own store, so there is no cross-request mutable state.
pub struct AppState {
    pub provisioner: DataSourceProvisioner,
}
