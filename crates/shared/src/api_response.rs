//! # 失敗レスポンス
//!
//! 公開 API が失敗時に返す `{ "success": false, "message": "..." }` 形式を提供する。
//!
//! 成功時のレスポンスはエンドポイントごとに形が異なるため、各ハンドラで定義する。
//! 失敗時の形だけを共通化し、フロントエンドが `success` フラグで分岐できるようにする。

use serde::{Deserialize, Serialize};

/// 失敗レスポンス
///
/// ## 使用例
///
/// ```
/// use savemetoilet_shared::FailureResponse;
///
/// let response = FailureResponse::new("화장실 개수 조회 실패");
/// assert!(!response.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FailureResponse {
    /// 常に `false`
    pub success: bool,
    /// 失敗理由（内部情報・認証キーを含めない）
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
