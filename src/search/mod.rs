//! Search module - keyword search over a provisioned script store / 検索モジュール
//!
//! Architecture principles / 構成の原則：
//! - The engine is a pure function: (parameters, open store) -> ordered records + info
//! - Schema shape is detected once per request; query building and row
//!   normalization branch on the resolved tag, never on runtime row shapes
//! - Exactly one query per call, no retries, no cross-request state
//!
//! Call direction: api -> engine -> (schema, query, normalize) / 呼び出し方向

pub mod engine;
pub mod normalize;
pub mod params;
pub mod query;
pub mod schema;

pub use engine::{SearchError, SearchInfo, SearchOutcome};
pub use params::{SearchParams, SortOrder};
pub use schema::SchemaShape;
