//! # ページ取得の値オブジェクト
//!
//! 上流 API のページング取得で扱う型を定義する。
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`FetchRange`] | 1 回のリクエストで取得するインデックス範囲 `[start, end]` |
//! | [`ApiResult`] | 上流の処理結果コード（`RESULT`） |
//! | [`PageResponse`] | 1 回のリクエストの応答（サービスエンベロープの中身） |
//! | [`Dataset`] | 全ページを連結したレコード列 |

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{DomainError, toilet::ToiletRecord};

/// 1 回のリクエストで取得できる最大件数（上流 API の制約）
pub const MAX_PAGE_SIZE: u32 = 1000;

/// 上流 API の正常終了コード
pub const RESULT_CODE_OK: &str = "INFO-000";

// =========================================================================
// FetchRange（取得範囲）
// =========================================================================

/// 取得範囲（値オブジェクト）
///
/// 上流の規約に合わせて 1 始まり・両端を含む。
///
/// # 不変条件
///
/// - `1 <= start <= end`
/// - `end - start + 1 <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchRange {
   start: u32,
   end:   u32,
}

impl FetchRange {
   /// 範囲を検証して作成する
   pub fn new(start: u32, end: u32) -> Result<Self, DomainError> {
      if start == 0 {
         return Err(DomainError::Validation(
            "取得範囲の開始位置は 1 以上である必要があります".to_string(),
         ));
      }
      if end < start {
         return Err(DomainError::Validation(format!(
            "取得範囲の終了位置 {end} が開始位置 {start} より前です"
         )));
      }
      if end - start + 1 > MAX_PAGE_SIZE {
         return Err(DomainError::Validation(format!(
            "1 回の取得件数は {MAX_PAGE_SIZE} 件以下である必要があります: {start}-{end}"
         )));
      }
      Ok(Self { start, end })
   }

   /// 総件数の確認に使う先頭 1 件の範囲 `[1, 1]`
   pub fn first() -> Self {
      Self { start: 1, end: 1 }
   }

   /// カーソル位置から始まるページ範囲を求める
   ///
   /// 終了位置は `min(cursor + page_size - 1, total)`。
   /// `page_size` は `1..=MAX_PAGE_SIZE` に丸める。
   /// `cursor` が 0 または `total` を超える場合は `None`（取得すべき範囲がない）。
   pub fn window(cursor: u32, page_size: u32, total: u32) -> Option<Self> {
      if cursor == 0 || cursor > total {
         return None;
      }
      let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
      let end = cursor.saturating_add(page_size - 1).min(total);
      Some(Self { start: cursor, end })
   }

   pub fn start(&self) -> u32 {
      self.start
   }

   pub fn end(&self) -> u32 {
      self.end
   }

   /// 範囲に含まれる件数
   pub fn len(&self) -> u32 {
      self.end - self.start + 1
   }

   /// 空の範囲は存在しない（不変条件）
   pub fn is_empty(&self) -> bool {
      false
   }

   /// 次のページの開始位置
   pub fn next_start(&self) -> u32 {
      self.end.saturating_add(1)
   }
}

impl fmt::Display for FetchRange {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}-{}", self.start, self.end)
   }
}

// =========================================================================
// PageResponse（ページ応答）
// =========================================================================

/// 上流の処理結果（`RESULT`）
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApiResult {
   #[serde(rename = "CODE", default)]
   pub code:    String,
   #[serde(rename = "MESSAGE", default)]
   pub message: String,
}

impl ApiResult {
   /// 正常終了コード（`INFO-000`）かどうか
   pub fn is_ok(&self) -> bool {
      self.code == RESULT_CODE_OK
   }
}

/// 1 回のリクエストの応答
///
/// `total_count` は先頭ページのものだけを正とする。
/// 欠落または解釈できない場合は 0 として扱う。
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PageResponse {
   #[serde(rename = "list_total_count", default, deserialize_with = "lenient_count")]
   pub total_count: u32,
   #[serde(rename = "RESULT", default)]
   pub result:      Option<ApiResult>,
   #[serde(rename = "row", default)]
   pub records:     Option<Vec<ToiletRecord>>,
}

impl PageResponse {
   /// 結果コードが正常終了かどうか
   pub fn is_ok(&self) -> bool {
      self.result.as_ref().is_some_and(ApiResult::is_ok)
   }
}

/// 総件数を寛容にデシリアライズする
///
/// 数値・数値文字列以外（負数、小数、`null` 等）は 0 とする。
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
   D: Deserializer<'de>,
{
   let value = Option::<Value>::deserialize(deserializer)?;
   let count = match value {
      Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
      Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
      _ => None,
   };
   Ok(count.unwrap_or(0))
}

// =========================================================================
// Dataset（データセット）
// =========================================================================

/// 全ページを連結したレコード列
///
/// 1 回の全件取得ごとに新しく作り、呼び出し元に所有権ごと渡す。
///
/// # 不変条件
///
/// - 追記のみ（削除・並べ替え・重複排除・フィルタはしない）
/// - ページの取得順とページ内の順序を保つ
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
   records: Vec<ToiletRecord>,
}

impl Dataset {
   pub fn new() -> Self {
      Self::default()
   }

   /// 1 ページ分のレコードを末尾に追記する
   pub fn append(&mut self, records: Vec<ToiletRecord>) {
      self.records.extend(records);
   }

   pub fn len(&self) -> usize {
      self.records.len()
   }

   pub fn is_empty(&self) -> bool {
      self.records.is_empty()
   }

   pub fn iter(&self) -> std::slice::Iter<'_, ToiletRecord> {
      self.records.iter()
   }

   /// 先頭から最大 `limit` 件を取り出す（残りは破棄する）
   pub fn into_sample(self, limit: usize) -> Vec<ToiletRecord> {
      let mut records = self.records;
      records.truncate(limit);
      records
   }
}
