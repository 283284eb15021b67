//! # ヘルスチェック共通型
//!
//! ヘルスチェックエンドポイントで使用するレスポンス型を提供する。

use serde::{Deserialize, Serialize};

/// ヘルスチェックで返す稼働状態
pub const STATUS_UP: &str = "UP";

/// ヘルスチェックレスポンス
///
/// `status` はサービスの稼働状態、`timestamp` は UNIX エポックミリ秒、
/// `version` は Cargo.toml のバージョンを示す。
///
/// ## 使用例
///
/// ```
/// use savemetoilet_shared::HealthResponse;
///
/// let response = HealthResponse::up("SaveMeToilet Backend is running", 0, "0.1.0");
/// assert_eq!(response.status, "UP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    /// 稼働状態（常に `"UP"`）
    pub status:    String,
    /// 人間向けのメッセージ
    pub message:   String,
    /// 応答時刻（UNIX エポックミリ秒）
    pub timestamp: i64,
    /// アプリケーションバージョン
    pub version:   String,
}

impl HealthResponse {
    /// 稼働中レスポンスを作成する
    pub fn up(message: impl Into<String>, timestamp: i64, version: impl Into<String>) -> Self {
        Self {
            status: STATUS_UP.to_string(),
            message: message.into(),
            timestamp,
            version: version.into(),
        }
    }
}
