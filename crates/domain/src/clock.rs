//! # Clock（時刻プロバイダ）
//!
//! 公開 API のレスポンスに載せる `timestamp`（UNIX エポックミリ秒）の出どころ。
//! ハンドラは時刻を直接取らず、注入された [`Clock`] から読む。

use chrono::{DateTime, Utc};

/// レスポンス時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;

   /// UNIX エポックからの経過ミリ秒
   fn now_millis(&self) -> i64 {
      self.now().timestamp_millis()
   }
}

/// システム時刻
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 常に同じ時刻を返す Clock
///
/// レスポンスの `timestamp` を検証するテストで使う。
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
   pub fn new(at: DateTime<Utc>) -> Self {
      Self(at)
   }

   /// エポックミリ秒から作成する（範囲外なら `None`）
   pub fn from_millis(millis: i64) -> Option<Self> {
      DateTime::from_timestamp_millis(millis).map(Self)
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.0
   }
}
