//! 上流 API クライアントのエラー型

use thiserror::Error;

use crate::retry::RetryDisposition;

/// 上流 API 呼び出しのエラー
///
/// メッセージに認証キーを含めない。reqwest のエラーは URL を取り除いてから保持する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
   /// リクエスト全体のタイムアウト
   #[error("上流 API の呼び出しがタイムアウトしました")]
   Timeout,

   /// 接続失敗などの通信エラー
   #[error("上流 API との通信に失敗しました: {0}")]
   Transport(String),

   /// 200 以外のステータス
   #[error("上流 API が予期しないステータス {status} を返しました")]
   HttpStatus { status: u16, body: String },

   /// 応答を期待する構造として解釈できない
   #[error("上流 API の応答を解釈できません: {0}")]
   Malformed(String),
}

impl UpstreamError {
   /// リトライ可否を分類する
   ///
   /// 上流の障害は種類を問わず再試行する。4xx も含む。
   pub fn retry_disposition(&self) -> RetryDisposition {
      RetryDisposition::Retry
   }

   /// ログ用のエラー種別
   pub fn kind(&self) -> &'static str {
      match self {
         Self::Timeout => "timeout",
         Self::Transport(_) => "transport",
         Self::HttpStatus { .. } => "http_status",
         Self::Malformed(_) => "malformed",
      }
   }
}

impl From<reqwest::Error> for UpstreamError {
   fn from(err: reqwest::Error) -> Self {
      if err.is_timeout() {
         return Self::Timeout;
      }
      let err = err.without_url();
      if err.is_decode() {
         Self::Malformed(err.to_string())
      } else {
         Self::Transport(err.to_string())
      }
   }
}
