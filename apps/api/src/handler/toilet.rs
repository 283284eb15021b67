//! # 公衆トイレデータハンドラ
//!
//! 上流 API から全件取得したデータのサンプルと件数を返す。
//!
//! 途中で取得を打ち切った場合でも、1 件以上取れていれば `complete: false` を付けて 200 を返す。
//! 1 件も取れずに失敗した場合だけ 500 にする。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Query, State},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use savemetoilet_domain::{clock::Clock, toilet::ToiletRecord};
use savemetoilet_shared::FailureResponse;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::{IntoParams, ToSchema};

use crate::{
   error::retrieval_failure_response,
   usecase::{FetchOutcome, ToiletUseCaseImpl},
};

/// サンプル件数のデフォルト
pub const DEFAULT_SAMPLE_LIMIT: u32 = 10;

/// サンプル件数の上限
pub const MAX_SAMPLE_LIMIT: u32 = 100;

/// 公衆トイレ API の共有状態
pub struct ToiletState {
   pub usecase:  Arc<ToiletUseCaseImpl>,
   pub clock:    Arc<dyn Clock>,
   /// サーバー停止時にキャンセルされるトークン
   ///
   /// 取得中のリクエストはこの子トークンを使い、次のページ間の待機で打ち切って
   /// それまでのデータで応答する。
   pub shutdown: CancellationToken,
}

/// サンプル取得のクエリパラメータ
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SampleQuery {
   /// 返す件数（デフォルト 10、最大 100）
   pub limit: Option<u32>,
}

impl SampleQuery {
   fn effective_limit(&self) -> usize {
      self
         .limit
         .unwrap_or(DEFAULT_SAMPLE_LIMIT)
         .min(MAX_SAMPLE_LIMIT) as usize
   }
}

/// 公衆トイレ 1 件
///
/// フロントエンドが上流のキー名で参照するため、キー名は上流と同じにする。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToiletData {
   #[serde(rename = "POI_ID")]
   pub poi_id:      Option<String>,
   #[serde(rename = "FNAME")]
   pub name:        Option<String>,
   #[serde(rename = "ANAME")]
   pub kind:        Option<String>,
   #[serde(rename = "CNAME")]
   pub category:    Option<String>,
   #[serde(rename = "X_WGS84")]
   pub longitude:   Option<f64>,
   #[serde(rename = "Y_WGS84")]
   pub latitude:    Option<f64>,
   #[serde(rename = "INSERTDATE")]
   pub insert_date: Option<String>,
   #[serde(rename = "UPDATEDATE")]
   pub update_date: Option<String>,
}

impl From<ToiletRecord> for ToiletData {
   fn from(record: ToiletRecord) -> Self {
      Self {
         poi_id:      record.poi_id,
         name:        record.name,
         kind:        record.kind,
         category:    record.category,
         longitude:   record.longitude,
         latitude:    record.latitude,
         insert_date: record.insert_date,
         update_date: record.update_date,
      }
   }
}

/// サンプル取得のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SampleToiletsResponse {
   pub success:      bool,
   /// 取得できた件数
   pub total_count:  usize,
   pub sample_count: usize,
   pub toilets:      Vec<ToiletData>,
   /// 総件数まで取得できたか
   pub complete:     bool,
   pub message:      String,
}

/// 件数取得のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ToiletCountResponse {
   pub success:     bool,
   /// 取得できた件数
   pub total_count: usize,
   /// 総件数まで取得できたか
   pub complete:    bool,
   pub message:     String,
}

/// 全件取得し、サンプルを返す
#[utoipa::path(
   get,
   path = "/api/v1/test/toilets/sample",
   tag = "toilets",
   params(SampleQuery),
   responses(
      (status = 200, description = "サンプル取得成功（一部のみの場合あり）", body = SampleToiletsResponse),
      (status = 400, description = "limit が不正"),
      (status = 500, description = "1 件も取得できなかった", body = FailureResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_sample_toilets(
   State(state): State<Arc<ToiletState>>,
   Query(query): Query<SampleQuery>,
) -> Response {
   let outcome = fetch_all(&state).await;
   if let Some(response) = retrieval_failure_response(&outcome, "화장실 데이터 조회 실패") {
      return response;
   }

   let complete = outcome.is_complete();
   let total_count = outcome.dataset.len();
   let toilets: Vec<ToiletData> = outcome
      .dataset
      .into_sample(query.effective_limit())
      .into_iter()
      .map(ToiletData::from)
      .collect();
   let message = if complete {
      "화장실 데이터 샘플 조회 성공"
   } else {
      "화장실 데이터 일부만 조회되었습니다"
   };

   (
      StatusCode::OK,
      Json(SampleToiletsResponse {
         success: true,
         total_count,
         sample_count: toilets.len(),
         toilets,
         complete,
         message: message.to_string(),
      }),
   )
      .into_response()
}

/// 全件取得し、件数を返す
#[utoipa::path(
   get,
   path = "/api/v1/test/toilets/count",
   tag = "toilets",
   responses(
      (status = 200, description = "件数取得成功（一部のみの場合あり）", body = ToiletCountResponse),
      (status = 500, description = "1 件も取得できなかった", body = FailureResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_toilet_count(State(state): State<Arc<ToiletState>>) -> Response {
   let outcome = fetch_all(&state).await;
   if let Some(response) = retrieval_failure_response(&outcome, "화장실 개수 조회 실패") {
      return response;
   }

   let complete = outcome.is_complete();
   let message = if complete {
      "화장실 개수 조회 성공"
   } else {
      "화장실 개수 일부만 조회되었습니다"
   };

   (
      StatusCode::OK,
      Json(ToiletCountResponse {
         success: true,
         total_count: outcome.dataset.len(),
         complete,
         message: message.to_string(),
      }),
   )
      .into_response()
}

/// サーバー停止トークンの子トークンで全件取得する
async fn fetch_all(state: &ToiletState) -> FetchOutcome {
   let cancel = state.shutdown.child_token();
   state.usecase.fetch_all(&cancel).await
}
