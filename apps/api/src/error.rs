//! # API エラーハンドリング
//!
//! 公開 API の失敗レスポンス `{ "success": false, "message": "..." }` への変換。
//!
//! メッセージは利用者向けの文言だけにし、上流のエラー詳細や認証キーを含めない。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use savemetoilet_shared::FailureResponse;

use crate::usecase::{FetchFailure, FetchOutcome};

/// 失敗レスポンスを作成する
pub fn failure_response(status: StatusCode, message: impl Into<String>) -> Response {
   (status, Json(FailureResponse::new(message))).into_response()
}

/// 全件取得が 1 件も取れずに失敗した場合の 500 レスポンス
///
/// 失敗していない、または一部でも取得できている場合は `None`。
pub fn retrieval_failure_response(outcome: &FetchOutcome, context: &str) -> Option<Response> {
   let failure = outcome.failure.as_ref()?;
   if !outcome.dataset.is_empty() {
      tracing::warn!(
         failure.kind = failure.kind(),
         records = outcome.dataset.len(),
         "一部のデータのみで応答します: {}",
         failure
      );
      return None;
   }

   tracing::error!(
      error.category = "external_service",
      error.kind = failure.kind(),
      "公衆トイレデータを取得できませんでした: {}",
      failure
   );
   Some(failure_response(
      StatusCode::INTERNAL_SERVER_ERROR,
      format!("{context}: {}", failure_reason(failure)),
   ))
}

/// 利用者向けの失敗理由
fn failure_reason(failure: &FetchFailure) -> &'static str {
   match failure {
      FetchFailure::CountProbe(_) | FetchFailure::EnvelopeMissing => {
         "서울시 API에서 전체 개수를 가져오지 못했습니다"
      }
      FetchFailure::Page { .. } => "서울시 API 페이지 조회에 실패했습니다",
      FetchFailure::Interrupted { .. } => "요청이 중단되었습니다",
   }
}
