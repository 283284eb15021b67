//! # SaveMeToilet 共有ユーティリティ
//!
//! API サーバーと周辺ツールで共通に使うレスポンス型と Observability 基盤を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（`IntoResponse` 変換は API 側の責務）
//! - トレーシング関連の依存は `observability` feature の背後に置く

pub mod api_response;
pub mod health;
pub mod observability;

pub use api_response::FailureResponse;
pub use health::HealthResponse;
