//! # ヘルスチェックハンドラ
//!
//! サーバーの稼働状態を確認するためのエンドポイント。上流 API には依存しない。

use std::sync::Arc;

use axum::{Json, extract::State};
use savemetoilet_domain::clock::Clock;
use savemetoilet_shared::HealthResponse;

/// ヘルスチェックのメッセージ
pub const HEALTH_MESSAGE: &str = "SaveMeToilet Backend is running";

/// ヘルスチェックの共有状態
pub struct HealthState {
   pub clock: Arc<dyn Clock>,
}

/// ヘルスチェックエンドポイント
///
/// ルートの `/health` でも同じ応答を返す。
#[utoipa::path(
   get,
   path = "/api/v1/test/health",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = HealthResponse)
   )
)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
   Json(HealthResponse::up(
      HEALTH_MESSAGE,
      state.clock.now_millis(),
      env!("CARGO_PKG_VERSION"),
   ))
}
