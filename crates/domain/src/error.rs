//! # ドメイン層エラー定義
//!
//! ドメインの不変条件違反を表現するエラー型。
//!
//! ## 使用例
//!
//! ```rust
//! use savemetoilet_domain::{DomainError, page::FetchRange};
//!
//! let err = FetchRange::new(0, 10).unwrap_err();
//! assert!(matches!(err, DomainError::Validation(_)));
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層・設定層でこのエラーを受け取り、起動失敗やレスポンスに変換する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値が不変条件に違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 取得範囲の開始位置が 0
    /// - 取得範囲の終了位置が開始位置より前
    /// - 1 回の取得件数が上限（1000 件）を超える
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
