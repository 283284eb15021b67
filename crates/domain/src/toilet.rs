//! # 公衆トイレレコード
//!
//! 上流 API（ソウル市公共データ `SearchPublicToiletPOIService`）の `row` 要素 1 件を表す。
//!
//! ## ドメイン用語
//!
//! | フィールド | 上流キー | 意味 |
//! |-----------|---------|------|
//! | `poi_id` | `POI_ID` | 施設 ID |
//! | `name` | `FNAME` | 施設名 |
//! | `kind` | `ANAME` | 種別（例: 民間開放トイレ） |
//! | `category` | `CNAME` | 分類 |
//! | `longitude` | `X_WGS84` | 経度（WGS84） |
//! | `latitude` | `Y_WGS84` | 緯度（WGS84） |
//! | `insert_date` | `INSERTDATE` | 登録日時（解釈しない文字列） |
//! | `update_date` | `UPDATEDATE` | 更新日時（解釈しない文字列） |
//!
//! シリアライズ時も上流キーをそのまま使う。フロントエンドが `POI_ID` / `FNAME` を参照するため。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 公衆トイレ 1 件（値オブジェクト）
///
/// 上流は項目の欠落や `null` を返すことがあるため、全フィールドを `Option` で保持する。
/// 重複の排除は行わない。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToiletRecord {
   #[serde(rename = "POI_ID", default, deserialize_with = "lenient_string")]
   pub poi_id:      Option<String>,
   #[serde(rename = "FNAME", default, deserialize_with = "lenient_string")]
   pub name:        Option<String>,
   #[serde(rename = "ANAME", default, deserialize_with = "lenient_string")]
   pub kind:        Option<String>,
   #[serde(rename = "CNAME", default, deserialize_with = "lenient_string")]
   pub category:    Option<String>,
   #[serde(rename = "X_WGS84", default, deserialize_with = "lenient_coordinate")]
   pub longitude:   Option<f64>,
   #[serde(rename = "Y_WGS84", default, deserialize_with = "lenient_coordinate")]
   pub latitude:    Option<f64>,
   #[serde(rename = "INSERTDATE", default, deserialize_with = "lenient_string")]
   pub insert_date: Option<String>,
   #[serde(rename = "UPDATEDATE", default, deserialize_with = "lenient_string")]
   pub update_date: Option<String>,
}

/// 文字列項目を寛容にデシリアライズする
///
/// 数値で返ってきた ID などは文字列化し、それ以外の型は `None` とする。
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
   D: Deserializer<'de>,
{
   let value = Option::<Value>::deserialize(deserializer)?;
   Ok(match value {
      Some(Value::String(s)) => Some(s),
      Some(Value::Number(n)) => Some(n.to_string()),
      _ => None,
   })
}

/// 座標を寛容にデシリアライズする
///
/// JSON 数値と数値文字列（`"127.0276"`）の両方を受け付ける。
/// 解釈できない値は `None` とし、レコード全体を不正扱いにはしない。
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
   D: Deserializer<'de>,
{
   let value = Option::<Value>::deserialize(deserializer)?;
   let coordinate = match value {
      Some(Value::Number(n)) => n.as_f64(),
      Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
      _ => None,
   };
   Ok(coordinate.filter(|v| v.is_finite()))
}
