//! # 上流 API クライアントの統合テスト
//!
//! 上流 API を模した axum サーバーをエフェメラルポートで起動し、
//! reqwest 実装（`SeoulApiClientImpl`）を実際の HTTP 越しに検証する。
//!
//! ## テストケース
//!
//! - URL のパスに認証キー・サービス名・範囲が入る
//! - 認証キーが違うとエンベロープのない応答になり `None` を返す
//! - 200 以外のステータス、タイムアウト、上限超過、接続失敗
//! - 全件取得ユースケースを通した順序どおりの取得

use std::{sync::Arc, time::Duration};

use axum::{
   Json,
   Router,
   extract::{Path, State},
   http::StatusCode,
   routing::get,
};
use pretty_assertions::assert_eq;
use savemetoilet_api::{
   client::{ApiKey, ClientTimeouts, SeoulApiClient, SeoulApiClientImpl, UpstreamError},
   pacing::TokioSleeper,
   retry::RetryPolicy,
   usecase::{PaginationSettings, ToiletUseCaseImpl},
};
use savemetoilet_domain::page::FetchRange;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const API_KEY: &str = "test-secret-key";
const SERVICE: &str = "SearchPublicToiletPOIService";

/// 上流を模したサーバーを起動し、ベース URL を返す
async fn spawn_upstream(app: Router) -> String {
   let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
   let addr = listener.local_addr().unwrap();
   tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
   });
   format!("http://{addr}")
}

/// `total` 件のデータを持つ上流を模したルーター
///
/// インデックス `i` のレコードは `POI_ID = i`。
fn toilet_upstream(total: u32) -> Router {
   Router::new()
      .route("/{key}/json/{service}/{start}/{end}/", get(toilets))
      .with_state(total)
}

async fn toilets(
   State(total): State<u32>,
   Path((key, service, start, end)): Path<(String, String, u32, u32)>,
) -> Json<Value> {
   if key != API_KEY {
      return Json(json!({
         "RESULT": {"CODE": "INFO-100", "MESSAGE": "인증키가 유효하지 않습니다."}
      }));
   }
   let rows: Vec<Value> = (start..=end.min(total))
      .map(|i| {
         json!({
            "POI_ID": i.to_string(),
            "FNAME": format!("화장실 {i}"),
            "X_WGS84": "126.97",
            "Y_WGS84": 37.56
         })
      })
      .collect();
   Json(json!({
      service: {
         "list_total_count": total,
         "RESULT": {"CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다"},
         "row": rows
      }
   }))
}

fn client(base_url: &str, key: &str) -> SeoulApiClientImpl {
   client_with(
      base_url,
      key,
      ClientTimeouts {
         connect: Duration::from_secs(1),
         read:    Duration::from_secs(5),
      },
   )
}

fn client_with(base_url: &str, key: &str, timeouts: ClientTimeouts) -> SeoulApiClientImpl {
   SeoulApiClientImpl::new(base_url, ApiKey::new(key), SERVICE, timeouts).unwrap()
}

/// 応答を 5 秒遅らせる上流
fn slow_upstream() -> Router {
   Router::new().route(
      "/{*rest}",
      get(|| async {
         tokio::time::sleep(Duration::from_secs(5)).await;
         Json(json!({}))
      }),
   )
}

fn range(start: u32, end: u32) -> FetchRange {
   FetchRange::new(start, end).unwrap()
}

#[tokio::test]
async fn test_指定範囲のページを取得できる() {
   let base_url = spawn_upstream(toilet_upstream(5)).await;

   let page = client(&base_url, API_KEY)
      .fetch_page(range(2, 4), Duration::from_secs(5))
      .await
      .unwrap()
      .unwrap();

   assert_eq!(page.total_count, 5);
   assert!(page.is_ok());
   let records = page.records.unwrap();
   let ids: Vec<_> = records.iter().map(|r| r.poi_id.clone().unwrap()).collect();
   assert_eq!(ids, vec!["2", "3", "4"]);
   assert_eq!(records[0].longitude, Some(126.97));
   assert_eq!(records[0].latitude, Some(37.56));
}

#[tokio::test]
async fn test_エンベロープのない応答はnoneを返す() {
   let base_url = spawn_upstream(toilet_upstream(5)).await;

   let result = client(&base_url, "wrong-key")
      .fetch_page(FetchRange::first(), Duration::from_secs(5))
      .await;

   assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn test_200以外のステータスはhttp_statusエラー() {
   let app = Router::new().route(
      "/{*rest}",
      get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
   );
   let base_url = spawn_upstream(app).await;

   let result = client(&base_url, API_KEY)
      .fetch_page(FetchRange::first(), Duration::from_secs(5))
      .await;

   assert_eq!(
      result,
      Err(UpstreamError::HttpStatus {
         status: 503,
         body:   "maintenance".to_string(),
      })
   );
}

#[tokio::test]
async fn test_応答が遅ければタイムアウトエラー() {
   let base_url = spawn_upstream(slow_upstream()).await;

   let result = client(&base_url, API_KEY)
      .fetch_page(FetchRange::first(), Duration::from_millis(100))
      .await;

   assert_eq!(result, Err(UpstreamError::Timeout));
}

#[tokio::test]
async fn test_読み取りタイムアウトはリクエスト全体のタイムアウトより先に効く() {
   let base_url = spawn_upstream(slow_upstream()).await;
   let client = client_with(
      &base_url,
      API_KEY,
      ClientTimeouts {
         connect: Duration::from_secs(1),
         read:    Duration::from_millis(100),
      },
   );

   let started = std::time::Instant::now();
   let result = client
      .fetch_page(FetchRange::first(), Duration::from_secs(30))
      .await;

   assert_eq!(result, Err(UpstreamError::Timeout));
   assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_上限を超える応答はmalformed() {
   let base_url = spawn_upstream(toilet_upstream(1000)).await;

   let result = client(&base_url, API_KEY)
      .with_max_response_bytes(1024)
      .fetch_page(range(1, 1000), Duration::from_secs(5))
      .await;

   assert!(matches!(result, Err(UpstreamError::Malformed(_))));
}

#[tokio::test]
async fn test_接続できなければtransportエラーで認証キーを含まない() {
   // ポートを確保してすぐに閉じ、接続を拒否させる
   let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
   let addr = listener.local_addr().unwrap();
   drop(listener);

   let result = client(&format!("http://{addr}"), API_KEY)
      .fetch_page(FetchRange::first(), Duration::from_secs(5))
      .await;

   let error = result.unwrap_err();
   assert!(matches!(error, UpstreamError::Transport(_)), "{error:?}");
   assert!(!error.to_string().contains(API_KEY));
   assert!(!format!("{error:?}").contains(API_KEY));
}

#[tokio::test]
async fn test_ユースケース経由で全件を順序どおりに取得する() {
   let base_url = spawn_upstream(toilet_upstream(25)).await;
   let usecase = ToiletUseCaseImpl::new(
      Arc::new(client(&base_url, API_KEY)),
      Arc::new(TokioSleeper),
      RetryPolicy::new(3, Duration::ZERO),
      PaginationSettings {
         page_size: 10,
         pacing: Duration::ZERO,
         ..Default::default()
      },
   );

   let outcome = usecase.fetch_all(&CancellationToken::new()).await;

   assert!(outcome.is_complete());
   assert_eq!(outcome.total_count, 25);
   let ids: Vec<u32> = outcome
      .dataset
      .iter()
      .map(|r| r.poi_id.as_deref().unwrap().parse().unwrap())
      .collect();
   assert_eq!(ids, (1..=25).collect::<Vec<_>>());
   assert!(usecase.test_connection().await);
}
