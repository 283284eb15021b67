//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `API_PORT` | No | `8080` | ポート番号 |
//! | `SEOUL_API_KEY` | **Yes** | - | ソウル市 Open API の認証キー |
//! | `SEOUL_API_BASE_URL` | No | `http://openapi.seoul.go.kr:8088` | 上流のベース URL |
//! | `SEOUL_API_TOILET_SERVICE` | No | `SearchPublicToiletPOIService` | サービス名 |
//! | `SEOUL_API_TIMEOUT_SECS` | No | `30` | 全件取得時のリクエストタイムアウト |
//! | `SEOUL_API_PROBE_TIMEOUT_SECS` | No | `10` | 接続テストのリクエストタイムアウト |
//! | `SEOUL_API_CONNECT_TIMEOUT_SECS` | No | `5` | 接続確立のタイムアウト |
//! | `SEOUL_API_READ_TIMEOUT_SECS` | No | `10` | 読み取りが進まない状態のタイムアウト |
//! | `SEOUL_API_MAX_ATTEMPTS` | No | `3` | 初回を含む最大試行回数 |
//! | `SEOUL_API_RETRY_DELAY_MS` | No | `2000` | 再試行の間隔 |
//! | `SEOUL_API_PAGE_SIZE` | No | `1000` | 1 ページの件数（1〜1000） |
//! | `SEOUL_API_PACING_MS` | No | `100` | ページ間の待機時間 |
//! | `SEOUL_API_MAX_RESPONSE_BYTES` | No | `5242880` | 応答本文の上限 |

use std::{env, str::FromStr, time::Duration};

use savemetoilet_domain::page::MAX_PAGE_SIZE;
use thiserror::Error;

use crate::{
   client::{
      ApiKey,
      ClientTimeouts,
      seoul_api::{DEFAULT_BASE_URL, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TOILET_SERVICE},
   },
   retry::RetryPolicy,
   usecase::PaginationSettings,
};

/// 設定読み込みエラー
///
/// 変数名だけを保持し、値はメッセージに含めない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {reason}")]
   Invalid { name: &'static str, reason: String },
}

/// アプリケーション全体の設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
   /// バインドアドレス
   pub host:  String,
   /// ポート番号
   pub port:  u16,
   /// 上流 API の設定
   pub seoul: SeoulApiConfig,
}

/// 上流 API の設定
///
/// `Debug` 出力では認証キーが `[REDACTED]` になる。
#[derive(Debug, Clone)]
pub struct SeoulApiConfig {
   pub base_url:           String,
   pub api_key:            ApiKey,
   pub toilet_service:     String,
   pub request_timeout:    Duration,
   pub probe_timeout:      Duration,
   pub connect_timeout:    Duration,
   pub read_timeout:       Duration,
   pub max_attempts:       u32,
   pub retry_delay:        Duration,
   pub page_size:          u32,
   pub pacing:             Duration,
   pub max_response_bytes: usize,
}

impl SeoulApiConfig {
   pub fn client_timeouts(&self) -> ClientTimeouts {
      ClientTimeouts {
         connect: self.connect_timeout,
         read:    self.read_timeout,
      }
   }

   pub fn retry_policy(&self) -> RetryPolicy {
      RetryPolicy::new(self.max_attempts, self.retry_delay)
   }

   pub fn pagination_settings(&self) -> PaginationSettings {
      PaginationSettings {
         page_size:       self.page_size,
         pacing:          self.pacing,
         request_timeout: self.request_timeout,
         probe_timeout:   self.probe_timeout,
      }
   }
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の取得関数から設定を読み込む
   ///
   /// 空文字列は未設定として扱う。
   pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
   where
      F: Fn(&str) -> Option<String>,
   {
      let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

      let api_key = get("SEOUL_API_KEY").ok_or(ConfigError::Missing("SEOUL_API_KEY"))?;

      let page_size = parse_or(&get, "SEOUL_API_PAGE_SIZE", MAX_PAGE_SIZE)?;
      if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
         return Err(ConfigError::Invalid {
            name:   "SEOUL_API_PAGE_SIZE",
            reason: format!("1 以上 {MAX_PAGE_SIZE} 以下である必要があります"),
         });
      }

      let max_attempts: u32 = parse_or(&get, "SEOUL_API_MAX_ATTEMPTS", 3)?;
      if max_attempts == 0 {
         return Err(ConfigError::Invalid {
            name:   "SEOUL_API_MAX_ATTEMPTS",
            reason: "1 以上である必要があります".to_string(),
         });
      }

      Ok(Self {
         host:  get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port:  parse_or(&get, "API_PORT", 8080)?,
         seoul: SeoulApiConfig {
            base_url: get("SEOUL_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: ApiKey::new(api_key.trim()),
            toilet_service: get("SEOUL_API_TOILET_SERVICE")
               .unwrap_or_else(|| DEFAULT_TOILET_SERVICE.to_string()),
            request_timeout: Duration::from_secs(parse_or(&get, "SEOUL_API_TIMEOUT_SECS", 30)?),
            probe_timeout: Duration::from_secs(parse_or(
               &get,
               "SEOUL_API_PROBE_TIMEOUT_SECS",
               10,
            )?),
            connect_timeout: Duration::from_secs(parse_or(
               &get,
               "SEOUL_API_CONNECT_TIMEOUT_SECS",
               5,
            )?),
            read_timeout: Duration::from_secs(parse_or(
               &get,
               "SEOUL_API_READ_TIMEOUT_SECS",
               10,
            )?),
            max_attempts,
            retry_delay: Duration::from_millis(parse_or(&get, "SEOUL_API_RETRY_DELAY_MS", 2000)?),
            page_size,
            pacing: Duration::from_millis(parse_or(&get, "SEOUL_API_PACING_MS", 100)?),
            max_response_bytes: parse_or(
               &get,
               "SEOUL_API_MAX_RESPONSE_BYTES",
               DEFAULT_MAX_RESPONSE_BYTES,
            )?,
         },
      })
   }
}

/// 数値の環境変数をパースする（未設定ならデフォルト値）
fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
   T: FromStr,
   T::Err: std::fmt::Display,
   G: Fn(&str) -> Option<String>,
{
   match get(name) {
      Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
         name,
         reason: e.to_string(),
      }),
      None => Ok(default),
   }
}
