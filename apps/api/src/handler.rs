//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、取得ロジックはユースケースに委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `connection`: 上流 API の接続テスト
//! - `toilet`: 公衆トイレデータのサンプル・件数

pub mod connection;
pub mod health;
pub mod toilet;

pub use connection::test_connection;
pub use health::{HealthState, health_check};
pub use toilet::{ToiletState, get_sample_toilets, get_toilet_count};
