//! # ソウル市 Open API クライアント
//!
//! 公衆トイレ位置情報サービス（`SearchPublicToiletPOIService`）の 1 ページ分を取得する。
//!
//! リクエスト URL は `{base}/{apiKey}/json/{service}/{start}/{end}/`。
//! 認証キーは URL パスに埋め込まれるため、ログには伏せ字にした URL だけを出す。

mod error;
mod response;

use std::{fmt, time::Duration};

use async_trait::async_trait;
pub use error::UpstreamError;
use savemetoilet_domain::page::{FetchRange, PageResponse};

/// 上流 API の既定のベース URL
pub const DEFAULT_BASE_URL: &str = "http://openapi.seoul.go.kr:8088";

/// 公衆トイレ位置情報のサービス名
pub const DEFAULT_TOILET_SERVICE: &str = "SearchPublicToiletPOIService";

/// 受け付ける応答本文の既定の上限（5 MiB）
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 5 * 1024 * 1024;

/// 上流 API の認証キー
///
/// `Debug` / `Display` では値を出力しない。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// URL 組み立て用に生の値を取り出す
   pub(crate) fn expose(&self) -> &str {
      &self.0
   }
}

impl fmt::Debug for ApiKey {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("ApiKey([REDACTED])")
   }
}

impl fmt::Display for ApiKey {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("[REDACTED]")
   }
}

/// クライアント全体に適用するタイムアウト
///
/// リクエスト全体のタイムアウトは呼び出しごとに [`SeoulApiClient::fetch_page`] へ渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
   /// 接続確立のタイムアウト
   pub connect: Duration,
   /// 1 回の読み取りが進まない状態のタイムアウト
   pub read:    Duration,
}

impl Default for ClientTimeouts {
   fn default() -> Self {
      Self {
         connect: Duration::from_secs(5),
         read:    Duration::from_secs(10),
      }
   }
}

/// 上流 API クライアントトレイト
///
/// テスト時にはスタブを使用できるようトレイトで定義する。
#[async_trait]
pub trait SeoulApiClient: Send + Sync {
   /// 指定範囲のページを 1 回取得する
   ///
   /// # 引数
   ///
   /// - `range`: 取得するインデックス範囲
   /// - `timeout`: リクエスト全体のタイムアウト
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(page))`: サービスエンベロープを含む応答
   /// - `Ok(None)`: 正しい JSON だがエンベロープがない応答
   async fn fetch_page(
      &self,
      range: FetchRange,
      timeout: Duration,
   ) -> Result<Option<PageResponse>, UpstreamError>;
}

/// 上流 API クライアント実装
///
/// 内部の `reqwest::Client` はコネクションプールを共有するため、
/// 1 つのインスタンスを全リクエストで使い回す。
#[derive(Clone)]
pub struct SeoulApiClientImpl {
   base_url:           String,
   api_key:            ApiKey,
   service_name:       String,
   max_response_bytes: usize,
   client:             reqwest::Client,
}

impl SeoulApiClientImpl {
   /// 新しいクライアントを作成する
   ///
   /// # 引数
   ///
   /// - `base_url`: 上流のベース URL（例: `http://openapi.seoul.go.kr:8088`）
   /// - `api_key`: 認証キー
   /// - `service_name`: サービス名（例: `SearchPublicToiletPOIService`）
   /// - `timeouts`: 接続と読み取りのタイムアウト（全リクエスト共通）
   pub fn new(
      base_url: &str,
      api_key: ApiKey,
      service_name: &str,
      timeouts: ClientTimeouts,
   ) -> Result<Self, UpstreamError> {
      let client = reqwest::Client::builder()
         .connect_timeout(timeouts.connect)
         .read_timeout(timeouts.read)
         .build()?;

      Ok(Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         api_key,
         service_name: service_name.to_string(),
         max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
         client,
      })
   }

   /// 応答本文の上限を変更する
   pub fn with_max_response_bytes(mut self, max_response_bytes: usize) -> Self {
      self.max_response_bytes = max_response_bytes;
      self
   }

   fn page_url(&self, range: FetchRange) -> String {
      self.build_url(self.api_key.expose(), range)
   }

   /// ログ出力用に認証キーを伏せた URL
   fn redacted_url(&self, range: FetchRange) -> String {
      self.build_url("***", range)
   }

   fn build_url(&self, key: &str, range: FetchRange) -> String {
      format!(
         "{}/{}/json/{}/{}/{}/",
         self.base_url,
         key,
         self.service_name,
         range.start(),
         range.end()
      )
   }
}

#[async_trait]
impl SeoulApiClient for SeoulApiClientImpl {
   #[tracing::instrument(skip_all, level = "debug", fields(range = %range))]
   async fn fetch_page(
      &self,
      range: FetchRange,
      timeout: Duration,
   ) -> Result<Option<PageResponse>, UpstreamError> {
      tracing::debug!(
         url = %self.redacted_url(range),
         timeout_ms = timeout.as_millis() as u64,
         "上流 API を呼び出します"
      );

      let res = self
         .client
         .get(self.page_url(range))
         .timeout(timeout)
         .send()
         .await?;

      response::handle_response(res, &self.service_name, self.max_response_bytes).await
   }
}
