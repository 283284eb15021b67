//! 上流レスポンスの共通ハンドリング

use savemetoilet_domain::page::{ApiResult, PageResponse};
use serde_json::Value;

use super::error::UpstreamError;

/// エラー応答の本文として保持する最大文字数
const ERROR_BODY_PREVIEW_CHARS: usize = 512;

/// 上流レスポンスの共通ハンドリング
///
/// 200 以外は [`UpstreamError::HttpStatus`] とする。
/// 200 の場合は本文を `max_bytes` まで読み込み、サービスエンベロープを取り出す。
///
/// # 引数
///
/// - `response`: 上流からの HTTP レスポンス
/// - `service_name`: エンベロープのキーとなるサービス名
/// - `max_bytes`: 受け付ける本文の最大バイト数
pub(super) async fn handle_response(
   mut response: reqwest::Response,
   service_name: &str,
   max_bytes: usize,
) -> Result<Option<PageResponse>, UpstreamError> {
   let status = response.status();

   if status != reqwest::StatusCode::OK {
      let body = read_body(&mut response, max_bytes)
         .await
         .map(|bytes| preview(&bytes))
         .unwrap_or_default();
      return Err(UpstreamError::HttpStatus {
         status: status.as_u16(),
         body,
      });
   }

   let bytes = read_body(&mut response, max_bytes).await?;
   let value: Value = serde_json::from_slice(&bytes)
      .map_err(|e| UpstreamError::Malformed(format!("JSON として解釈できません: {e}")))?;

   parse_envelope(value, service_name)
}

/// サービスエンベロープを取り出してページ応答に変換する
///
/// エンベロープがない場合は `Ok(None)`。上流はエラー時にトップレベルの
/// `RESULT` だけを返すため、その内容をログに出す。
pub(super) fn parse_envelope(
   value: Value,
   service_name: &str,
) -> Result<Option<PageResponse>, UpstreamError> {
   let Value::Object(mut root) = value else {
      return Err(UpstreamError::Malformed(
         "応答のトップレベルがオブジェクトではありません".to_string(),
      ));
   };

   match root.remove(service_name) {
      Some(envelope) => serde_json::from_value::<PageResponse>(envelope)
         .map(Some)
         .map_err(|e| UpstreamError::Malformed(format!("エンベロープを解釈できません: {e}"))),
      None => {
         let result = root
            .remove("RESULT")
            .and_then(|v| serde_json::from_value::<ApiResult>(v).ok())
            .unwrap_or_default();
         tracing::warn!(
            service = %service_name,
            result.code = %result.code,
            result.message = %result.message,
            "応答にサービスエンベロープがありません"
         );
         Ok(None)
      }
   }
}

/// 本文を上限付きで読み込む
async fn read_body(
   response: &mut reqwest::Response,
   max_bytes: usize,
) -> Result<Vec<u8>, UpstreamError> {
   if let Some(length) = response.content_length()
      && length > max_bytes as u64
   {
      return Err(too_large(max_bytes));
   }

   let mut body = Vec::new();
   while let Some(chunk) = response.chunk().await? {
      if body.len() + chunk.len() > max_bytes {
         return Err(too_large(max_bytes));
      }
      body.extend_from_slice(&chunk);
   }
   Ok(body)
}

fn too_large(max_bytes: usize) -> UpstreamError {
   UpstreamError::Malformed(format!("応答本文が上限 {max_bytes} バイトを超えました"))
}

fn preview(bytes: &[u8]) -> String {
   String::from_utf8_lossy(bytes)
      .chars()
      .take(ERROR_BODY_PREVIEW_CHARS)
      .collect()
}
