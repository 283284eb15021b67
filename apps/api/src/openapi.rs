//! # OpenAPI 仕様定義
//!
//! utoipa を使用して公開 API の OpenAPI 仕様を Rust の型から生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use axum::Json;
use utoipa::OpenApi;

use crate::handler::{connection, health, toilet};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "SaveMeToilet API",
      version = "1.0.0",
      description = "ソウル市の公衆トイレ位置情報を提供する SaveMeToilet の API"
   ),
   paths(
      // health
      health::health_check,
      // connection
      connection::test_connection,
      // toilets
      toilet::get_sample_toilets,
      toilet::get_toilet_count,
   ),
   tags(
      (name = "health", description = "ヘルスチェック"),
      (name = "connection", description = "上流 API の接続テスト"),
      (name = "toilets", description = "公衆トイレデータ"),
   )
)]
pub struct ApiDoc;

/// OpenAPI ドキュメントを JSON で返す
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
   Json(ApiDoc::openapi())
}
