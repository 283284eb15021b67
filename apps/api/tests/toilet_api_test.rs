//! # 公開 API の統合テスト
//!
//! `build_app` で組み立てたルーターに `oneshot` でリクエストを送り、
//! 応答の形とステータスを検証する。上流 API の呼び出しはスタブを使用する。
//!
//! ## テストケース
//!
//! - ヘルスチェック（`/health` と `/api/v1/test/health`）
//! - 接続テストの成功・失敗
//! - サンプル取得（件数指定、デフォルト、上限、不正値）
//! - 件数取得（成功、一部のみ、失敗時の 500）
//! - CORS ヘッダーと OpenAPI ドキュメント

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
   Router,
   body::{Body, to_bytes},
   http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use savemetoilet_api::{
   app_builder::build_app,
   client::{SeoulApiClient, UpstreamError},
   handler::{HealthState, ToiletState},
   pacing::{Sleeper, TokioSleeper},
   retry::RetryPolicy,
   usecase::{PaginationSettings, ToiletUseCaseImpl},
};
use savemetoilet_domain::{
   clock::{Clock, FixedClock},
   page::{ApiResult, FetchRange, PageResponse},
   toilet::ToiletRecord,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// 2025-01-01T00:00:00Z
const FIXED_MILLIS: i64 = 1_735_689_600_000;

/// 上流 API のスタブ
///
/// インデックス `i` のレコードは `POI_ID = i`。
/// `failing` に登録した範囲は常にタイムアウトする。
struct StubSeoulApiClient {
   total:       u32,
   result_code: &'static str,
   failing:     HashMap<FetchRange, UpstreamError>,
}

impl StubSeoulApiClient {
   fn new(total: u32) -> Self {
      Self {
         total,
         result_code: "INFO-000",
         failing: HashMap::new(),
      }
   }

   fn with_result_code(mut self, code: &'static str) -> Self {
      self.result_code = code;
      self
   }

   fn failing(mut self, range: FetchRange) -> Self {
      self.failing.insert(range, UpstreamError::Timeout);
      self
   }
}

#[async_trait]
impl SeoulApiClient for StubSeoulApiClient {
   async fn fetch_page(
      &self,
      range: FetchRange,
      _timeout: Duration,
   ) -> Result<Option<PageResponse>, UpstreamError> {
      if let Some(error) = self.failing.get(&range) {
         return Err(error.clone());
      }
      Ok(Some(PageResponse {
         total_count: self.total,
         result:      Some(ApiResult {
            code:    self.result_code.to_string(),
            message: String::new(),
         }),
         records:     Some(
            (range.start()..=range.end())
               .map(|i| ToiletRecord {
                  poi_id: Some(i.to_string()),
                  ..Default::default()
               })
               .collect(),
         ),
      }))
   }
}

fn test_app(client: StubSeoulApiClient, page_size: u32) -> Router {
   test_app_with(
      client,
      page_size,
      Arc::new(TokioSleeper),
      CancellationToken::new(),
   )
}

fn test_app_with(
   client: StubSeoulApiClient,
   page_size: u32,
   sleeper: Arc<dyn Sleeper>,
   shutdown: CancellationToken,
) -> Router {
   let clock: Arc<dyn Clock> = Arc::new(FixedClock::from_millis(FIXED_MILLIS).unwrap());
   let usecase = Arc::new(ToiletUseCaseImpl::new(
      Arc::new(client),
      sleeper,
      RetryPolicy::new(3, Duration::ZERO),
      PaginationSettings {
         page_size,
         pacing: Duration::ZERO,
         ..Default::default()
      },
   ));
   build_app(
      Arc::new(HealthState {
         clock: clock.clone(),
      }),
      Arc::new(ToiletState {
         usecase,
         clock,
         shutdown,
      }),
   )
}

/// 最初の待機でサーバー停止トークンをキャンセルし、そのまま待ち続ける Sleeper
struct ShutdownOnFirstPause {
   shutdown: CancellationToken,
}

#[async_trait]
impl Sleeper for ShutdownOnFirstPause {
   async fn sleep(&self, _duration: Duration) {
      self.shutdown.cancel();
      std::future::pending::<()>().await;
   }
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
   let response = app
      .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
   let status = response.status();
   let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
   let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
   (status, json)
}

// ===== health =====

#[rstest]
#[case("/health")]
#[case("/api/v1/test/health")]
#[tokio::test]
async fn test_ヘルスチェックは稼働状態を返す(#[case] uri: &str) {
   let app = test_app(StubSeoulApiClient::new(0), 1000);

   let (status, json) = get(app, uri).await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(
      json,
      serde_json::json!({
         "status": "UP",
         "message": "SaveMeToilet Backend is running",
         "timestamp": FIXED_MILLIS,
         "version": "1.0.0"
      })
   );
}

// ===== connection =====

#[rstest]
#[case("INFO-000", true, "서울시 API 연결 성공")]
#[case("ERROR-500", false, "서울시 API 연결 실패")]
#[tokio::test]
async fn test_接続テストは結果コードで成否を返す(
   #[case] code: &'static str,
   #[case] success: bool,
   #[case] message: &str,
) {
   let app = test_app(StubSeoulApiClient::new(1).with_result_code(code), 1000);

   let (status, json) = get(app, "/api/v1/test/connection").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(json["success"], success);
   assert_eq!(json["message"], message);
   assert_eq!(json["timestamp"], FIXED_MILLIS);
}

#[tokio::test]
async fn test_接続テストは上流が落ちていても200で失敗を返す() {
   let app = test_app(
      StubSeoulApiClient::new(1).failing(FetchRange::first()),
      1000,
   );

   let (status, json) = get(app, "/api/v1/test/connection").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(json["success"], false);
}

// ===== toilets/sample =====

#[tokio::test]
async fn test_サンプルは指定件数を先頭から返す() {
   let app = test_app(StubSeoulApiClient::new(5), 2);

   let (status, json) = get(app, "/api/v1/test/toilets/sample?limit=2").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(json["success"], true);
   assert_eq!(json["total_count"], 5);
   assert_eq!(json["sample_count"], 2);
   assert_eq!(json["complete"], true);
   assert_eq!(json["message"], "화장실 데이터 샘플 조회 성공");
   assert_eq!(json["toilets"][0]["POI_ID"], "1");
   assert_eq!(json["toilets"][1]["POI_ID"], "2");
   assert!(json["toilets"][0]["FNAME"].is_null());
}

#[rstest]
#[case("/api/v1/test/toilets/sample", 10)]
#[case("/api/v1/test/toilets/sample?limit=0", 0)]
#[case("/api/v1/test/toilets/sample?limit=1000", 100)]
#[tokio::test]
async fn test_サンプル件数はデフォルト10で上限100(
   #[case] uri: &str,
   #[case] expected: u64,
) {
   let app = test_app(StubSeoulApiClient::new(150), 1000);

   let (status, json) = get(app, uri).await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(json["total_count"], 150);
   assert_eq!(json["sample_count"], expected);
   assert_eq!(json["toilets"].as_array().unwrap().len() as u64, expected);
}

#[rstest]
#[case("/api/v1/test/toilets/sample?limit=-1")]
#[case("/api/v1/test/toilets/sample?limit=abc")]
#[tokio::test]
async fn test_不正なlimitは400(#[case] uri: &str) {
   let app = test_app(StubSeoulApiClient::new(5), 1000);

   let (status, _) = get(app, uri).await;

   assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_サンプルは総件数の取得に失敗したら500() {
   let app = test_app(
      StubSeoulApiClient::new(5).failing(FetchRange::first()),
      1000,
   );

   let (status, json) = get(app, "/api/v1/test/toilets/sample").await;

   assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
   assert_eq!(json["success"], false);
   assert!(
      json["message"]
         .as_str()
         .unwrap()
         .starts_with("화장실 데이터 조회 실패")
   );
}

// ===== toilets/count =====

#[tokio::test]
async fn test_件数は全件取得した件数を返す() {
   let app = test_app(StubSeoulApiClient::new(2500), 1000);

   let (status, json) = get(app, "/api/v1/test/toilets/count").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(
      json,
      serde_json::json!({
         "success": true,
         "total_count": 2500,
         "complete": true,
         "message": "화장실 개수 조회 성공"
      })
   );
}

#[tokio::test]
async fn test_総件数0なら件数0で成功() {
   let app = test_app(StubSeoulApiClient::new(0), 1000);

   let (status, json) = get(app, "/api/v1/test/toilets/count").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(json["success"], true);
   assert_eq!(json["total_count"], 0);
   assert_eq!(json["complete"], true);
}

#[tokio::test]
async fn test_途中のページが失敗したら一部のみで200() {
   let app = test_app(
      StubSeoulApiClient::new(2500).failing(FetchRange::new(1001, 2000).unwrap()),
      1000,
   );

   let (status, json) = get(app, "/api/v1/test/toilets/count").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(json["success"], true);
   assert_eq!(json["total_count"], 1000);
   assert_eq!(json["complete"], false);
}

#[tokio::test]
async fn test_件数は総件数の取得に失敗したら500() {
   let app = test_app(
      StubSeoulApiClient::new(5).failing(FetchRange::first()),
      1000,
   );

   let (status, json) = get(app, "/api/v1/test/toilets/count").await;

   assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
   assert_eq!(
      json,
      serde_json::json!({
         "success": false,
         "message": "화장실 개수 조회 실패: 서울시 API에서 전체 개수를 가져오지 못했습니다"
      })
   );
}

#[tokio::test]
async fn test_サーバー停止時は取得済みのデータで200を返す() {
   let shutdown = CancellationToken::new();
   let app = test_app_with(
      StubSeoulApiClient::new(2500),
      1000,
      Arc::new(ShutdownOnFirstPause {
         shutdown: shutdown.clone(),
      }),
      shutdown.clone(),
   );

   let (status, json) = get(app, "/api/v1/test/toilets/count").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(
      json,
      serde_json::json!({
         "success": true,
         "total_count": 1000,
         "complete": false,
         "message": "화장실 개수 일부만 조회되었습니다"
      })
   );
   assert!(shutdown.is_cancelled());
}

#[tokio::test]
async fn test_停止済みのサーバーではサンプルも一部のみを返す() {
   let shutdown = CancellationToken::new();
   shutdown.cancel();
   let app = test_app_with(
      StubSeoulApiClient::new(30),
      10,
      Arc::new(TokioSleeper),
      shutdown,
   );

   let (status, json) = get(app, "/api/v1/test/toilets/sample?limit=3").await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(json["total_count"], 10);
   assert_eq!(json["sample_count"], 3);
   assert_eq!(json["complete"], false);
}

// ===== 横断的な振る舞い =====

#[tokio::test]
async fn test_全オリジンからのcorsを許可する() {
   let app = test_app(StubSeoulApiClient::new(0), 1000);

   let response = app
      .oneshot(
         Request::builder()
            .uri("/api/v1/test/health")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap(),
      )
      .await
      .unwrap();

   assert_eq!(
      response
         .headers()
         .get("access-control-allow-origin")
         .unwrap(),
      "*"
   );
}

#[tokio::test]
async fn test_openapiドキュメントを返す() {
   let app = test_app(StubSeoulApiClient::new(0), 1000);

   let (status, json) = get(app, "/openapi.json").await;

   assert_eq!(status, StatusCode::OK);
   assert!(json["paths"]["/api/v1/test/toilets/sample"].is_object());
}

#[tokio::test]
async fn test_存在しないパスは404() {
   let app = test_app(StubSeoulApiClient::new(0), 1000);

   let (status, _) = get(app, "/api/v1/test/unknown").await;

   assert_eq!(status, StatusCode::NOT_FOUND);
}
