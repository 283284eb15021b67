//! # 公衆トイレ取得ユースケース
//!
//! 上流 API のページングを順に辿って全件を取得する。あわせて接続テストを提供する。
//!
//! ## 全件取得の流れ
//!
//! 1. 範囲 `[1, 1]` を取得して総件数を得る
//! 2. カーソル 1 から `page_size` 件ずつ、総件数に達するまで順に取得する
//! 3. ページの間にはペーシングの待機を挟む（最後のページの後は待たない）
//!
//! 取得は失敗しない。途中で打ち切った場合はそれまでのデータと理由
//! （[`FetchFailure`]）を [`FetchOutcome`] で返す。

use std::{sync::Arc, time::Duration};

use savemetoilet_domain::page::{Dataset, FetchRange, MAX_PAGE_SIZE, PageResponse};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
   client::{SeoulApiClient, UpstreamError},
   pacing::{self, Sleeper},
   retry::{RetryError, RetryPolicy},
};

/// ページング取得の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
   /// 1 ページの件数（`1..=MAX_PAGE_SIZE`）
   pub page_size:       u32,
   /// ページ間の待機時間
   pub pacing:          Duration,
   /// 全件取得時のリクエストタイムアウト
   pub request_timeout: Duration,
   /// 接続テストのリクエストタイムアウト
   pub probe_timeout:   Duration,
}

impl Default for PaginationSettings {
   fn default() -> Self {
      Self {
         page_size:       MAX_PAGE_SIZE,
         pacing:          Duration::from_millis(100),
         request_timeout: Duration::from_secs(30),
         probe_timeout:   Duration::from_secs(10),
      }
   }
}

/// 全件取得を打ち切った理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
   /// 総件数の取得に失敗した
   #[error("総件数の取得に失敗しました: {0}")]
   CountProbe(UpstreamError),

   /// 総件数の応答にサービスエンベロープがなかった
   #[error("総件数の応答にサービスエンベロープがありません")]
   EnvelopeMissing,

   /// ページの取得に失敗した
   #[error("範囲 {range} の取得に失敗しました: {error}")]
   Page {
      range: FetchRange,
      error: UpstreamError,
   },

   /// ページ間の待機中にキャンセルされた
   #[error("取得が中断されました（次の開始位置: {next_start}）")]
   Interrupted { next_start: u32 },
}

impl FetchFailure {
   /// ログ用の失敗種別
   pub fn kind(&self) -> &'static str {
      match self {
         Self::CountProbe(_) => "count_probe",
         Self::EnvelopeMissing => "envelope_missing",
         Self::Page { .. } => "page",
         Self::Interrupted { .. } => "interrupted",
      }
   }
}

/// 取得は続行したが注意が必要な事象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchWarning {
   /// 応答は正しいがレコードがなかったページ
   EmptyPage(FetchRange),
}

/// 全件取得の結果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchOutcome {
   /// 取得できたレコード（打ち切った場合はそれまでの分）
   pub dataset:     Dataset,
   /// 先頭ページが示した総件数（取得できなかった場合は 0）
   pub total_count: u32,
   /// 打ち切った理由（最後まで辿れた場合は `None`）
   pub failure:     Option<FetchFailure>,
   pub warnings:    Vec<FetchWarning>,
}

impl FetchOutcome {
   /// 総件数まで辿り切ったか
   pub fn is_complete(&self) -> bool {
      self.failure.is_none()
   }
}

/// 公衆トイレ取得ユースケース実装
pub struct ToiletUseCaseImpl {
   client:   Arc<dyn SeoulApiClient>,
   sleeper:  Arc<dyn Sleeper>,
   retry:    RetryPolicy,
   settings: PaginationSettings,
}

impl ToiletUseCaseImpl {
   pub fn new(
      client: Arc<dyn SeoulApiClient>,
      sleeper: Arc<dyn Sleeper>,
      retry: RetryPolicy,
      settings: PaginationSettings,
   ) -> Self {
      Self {
         client,
         sleeper,
         retry,
         settings,
      }
   }

   /// 公衆トイレを全件取得する
   ///
   /// 失敗しない。総件数が取れなければ空のデータ、途中のページが失敗すれば
   /// それまでのデータを返し、理由を [`FetchOutcome::failure`] に入れる。
   #[tracing::instrument(skip_all)]
   pub async fn fetch_all(&self, cancel: &CancellationToken) -> FetchOutcome {
      tracing::info!("公衆トイレの全件取得を開始します");

      let mut outcome = FetchOutcome::default();

      // 1. 総件数
      let total = match self
         .fetch_with_retry(FetchRange::first(), self.settings.request_timeout)
         .await
      {
         Ok(Some(page)) => page.total_count,
         Ok(None) => {
            tracing::error!(
               error.category = "external_service",
               error.kind = "envelope_missing",
               "総件数の応答にサービスエンベロープがありません"
            );
            outcome.failure = Some(FetchFailure::EnvelopeMissing);
            return outcome;
         }
         Err(e) => {
            let error = e.into_inner();
            tracing::error!(
               error.category = "external_service",
               error.kind = error.kind(),
               "総件数の取得に失敗しました: {}",
               error
            );
            outcome.failure = Some(FetchFailure::CountProbe(error));
            return outcome;
         }
      };
      outcome.total_count = total;
      tracing::info!(total_count = total, "総件数を取得しました");

      // 2. ページを順に取得
      let mut cursor = 1;
      while let Some(range) = FetchRange::window(cursor, self.settings.page_size, total) {
         tracing::debug!(range = %range, total_count = total, "ページを取得します");

         match self
            .fetch_with_retry(range, self.settings.request_timeout)
            .await
         {
            Ok(Some(PageResponse {
               records: Some(records),
               ..
            })) => {
               let added = records.len();
               outcome.dataset.append(records);
               tracing::debug!(
                  range = %range,
                  added,
                  accumulated = outcome.dataset.len(),
                  "ページを取得しました"
               );
            }
            Ok(_) => {
               tracing::warn!(range = %range, "ページの応答にレコードがありません");
               outcome.warnings.push(FetchWarning::EmptyPage(range));
            }
            Err(e) => {
               let error = e.into_inner();
               tracing::error!(
                  error.category = "external_service",
                  error.kind = error.kind(),
                  range = %range,
                  accumulated = outcome.dataset.len(),
                  "ページの取得に失敗したため取得を打ち切ります: {}",
                  error
               );
               outcome.failure = Some(FetchFailure::Page { range, error });
               break;
            }
         }

         if range.end() >= total {
            break;
         }
         cursor = range.next_start();

         // 3. ページ間の待機
         if pacing::pause(self.sleeper.as_ref(), self.settings.pacing, cancel)
            .await
            .is_err()
         {
            tracing::warn!(
               next_start = cursor,
               accumulated = outcome.dataset.len(),
               "待機中にキャンセルされたため取得を中断します"
            );
            outcome.failure = Some(FetchFailure::Interrupted { next_start: cursor });
            break;
         }
      }

      tracing::info!(
         total_count = total,
         records = outcome.dataset.len(),
         complete = outcome.is_complete(),
         "公衆トイレの全件取得が終了しました"
      );
      outcome
   }

   /// 上流 API に接続できるか確認する
   ///
   /// 範囲 `[1, 1]` を接続テスト用の短いタイムアウトで取得し、
   /// 結果コードが `INFO-000` の場合のみ `true` を返す。
   #[tracing::instrument(skip_all)]
   pub async fn test_connection(&self) -> bool {
      match self
         .fetch_with_retry(FetchRange::first(), self.settings.probe_timeout)
         .await
      {
         Ok(Some(page)) if page.is_ok() => {
            tracing::info!("上流 API への接続に成功しました");
            true
         }
         Ok(Some(page)) => {
            let code = page.result.map(|r| r.code).unwrap_or_default();
            tracing::error!(
               error.category = "external_service",
               error.kind = "result_code",
               result.code = %code,
               "上流 API が正常終了以外の結果コードを返しました"
            );
            false
         }
         Ok(None) => {
            tracing::error!(
               error.category = "external_service",
               error.kind = "envelope_missing",
               "接続テストの応答にサービスエンベロープがありません"
            );
            false
         }
         Err(e) => {
            let error = e.into_inner();
            tracing::error!(
               error.category = "external_service",
               error.kind = error.kind(),
               "上流 API への接続に失敗しました: {}",
               error
            );
            false
         }
      }
   }

   async fn fetch_with_retry(
      &self,
      range: FetchRange,
      timeout: Duration,
   ) -> Result<Option<PageResponse>, RetryError<UpstreamError>> {
      let client = self.client.as_ref();
      self
         .retry
         .run(
            self.sleeper.as_ref(),
            || client.fetch_page(range, timeout),
            UpstreamError::retry_disposition,
         )
         .await
   }
}
