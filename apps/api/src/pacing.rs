//! # 待機とキャンセル
//!
//! ページ間のペーシングとリトライ間隔の待機を抽象化する。
//!
//! 待機を [`Sleeper`] トレイト経由にすることで、テストでは実時間を使わずに
//! 待機回数と待機時間を検証できる。

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 待機を行うトレイト
#[async_trait]
pub trait Sleeper: Send + Sync {
   async fn sleep(&self, duration: Duration);
}

/// tokio のタイマーで待機する実装
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
   async fn sleep(&self, duration: Duration) {
      tokio::time::sleep(duration).await;
   }
}

/// 待機中にキャンセルされた
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("待機中にキャンセルされました")]
pub struct Interrupted;

/// キャンセル可能な待機
///
/// 待機開始前または待機中にトークンがキャンセルされた場合は [`Interrupted`] を返す。
pub async fn pause(
   sleeper: &dyn Sleeper,
   duration: Duration,
   cancel: &CancellationToken,
) -> Result<(), Interrupted> {
   tokio::select! {
      biased;
      _ = cancel.cancelled() => Err(Interrupted),
      _ = sleeper.sleep(duration) => Ok(()),
   }
}
