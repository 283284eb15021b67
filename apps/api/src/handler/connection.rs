//! # 接続テストハンドラ
//!
//! 上流 API に到達できるかを確認する。結果にかかわらず 200 を返し、
//! 成否は `success` で表す。

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::toilet::ToiletState;

const CONNECTED_MESSAGE: &str = "서울시 API 연결 성공";
const DISCONNECTED_MESSAGE: &str = "서울시 API 연결 실패";

/// 接続テストのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionResponse {
   pub success:   bool,
   pub message:   String,
   /// UNIX エポックミリ秒
   pub timestamp: i64,
}

/// 上流 API の接続テスト
#[utoipa::path(
   get,
   path = "/api/v1/test/connection",
   tag = "connection",
   responses(
      (status = 200, description = "接続テスト結果", body = ConnectionResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn test_connection(State(state): State<Arc<ToiletState>>) -> Json<ConnectionResponse> {
   let success = state.usecase.test_connection().await;
   let message = if success {
      CONNECTED_MESSAGE
   } else {
      DISCONNECTED_MESSAGE
   };

   Json(ConnectionResponse {
      success,
      message: message.to_string(),
      timestamp: state.clock.now_millis(),
   })
}
