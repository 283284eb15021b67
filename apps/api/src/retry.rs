//! # リトライポリシー
//!
//! 上流呼び出しを固定間隔で再試行する。
//!
//! 再試行するかどうかはエラーごとに分類関数（[`RetryDisposition`]）で決める。
//! 間隔の待機は [`Sleeper`] に委ねる。

use std::{fmt, future::Future, time::Duration};

use thiserror::Error;

use crate::pacing::Sleeper;

/// エラーを再試行するか、即座に打ち切るか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
   Retry,
   Stop,
}

/// リトライ付き実行の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError<E> {
   /// 再試行しないと判定されたエラー
   #[error("再試行不可能なエラー: {0}")]
   Fatal(E),
   /// 最大試行回数を使い切った（最後のエラーを保持する）
   #[error("最大試行回数に達しました: {0}")]
   AttemptsExceeded(E),
}

impl<E> RetryError<E> {
   /// 最後に発生したエラーを取り出す
   pub fn into_inner(self) -> E {
      match self {
         Self::Fatal(err) | Self::AttemptsExceeded(err) => err,
      }
   }
}

/// 固定間隔のリトライポリシー
///
/// `max_attempts` は初回を含む総試行回数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
   max_attempts: u32,
   delay:        Duration,
}

impl Default for RetryPolicy {
   fn default() -> Self {
      Self {
         max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
         delay:        Self::DEFAULT_DELAY,
      }
   }
}

impl RetryPolicy {
   pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
   pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

   /// 試行回数は最低 1 回に丸める
   pub fn new(max_attempts: u32, delay: Duration) -> Self {
      Self {
         max_attempts: max_attempts.max(1),
         delay,
      }
   }

   pub fn max_attempts(&self) -> u32 {
      self.max_attempts
   }

   pub fn delay(&self) -> Duration {
      self.delay
   }

   /// 操作をポリシーに従って実行する
   ///
   /// 成功するか、分類関数が [`RetryDisposition::Stop`] を返すか、
   /// 試行回数を使い切るまで `op` を繰り返す。
   pub async fn run<F, Fut, T, E, C>(
      &self,
      sleeper: &dyn Sleeper,
      mut op: F,
      classify: C,
   ) -> Result<T, RetryError<E>>
   where
      F: FnMut() -> Fut,
      Fut: Future<Output = Result<T, E>>,
      E: fmt::Display,
      C: Fn(&E) -> RetryDisposition,
   {
      let mut attempt = 1;

      loop {
         match op().await {
            Ok(value) => {
               if attempt > 1 {
                  tracing::info!(attempt, "再試行で成功しました");
               }
               return Ok(value);
            }
            Err(err) => match classify(&err) {
               RetryDisposition::Stop => return Err(RetryError::Fatal(err)),
               RetryDisposition::Retry => {
                  if attempt >= self.max_attempts {
                     return Err(RetryError::AttemptsExceeded(err));
                  }
                  tracing::warn!(
                     attempt,
                     max_attempts = self.max_attempts,
                     delay_ms = self.delay.as_millis() as u64,
                     error = %err,
                     "上流呼び出しに失敗したため再試行します"
                  );
                  sleeper.sleep(self.delay).await;
                  attempt += 1;
               }
            },
         }
      }
   }
}
