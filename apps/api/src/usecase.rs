//! # ユースケース層
//!
//! 上流 API からの公衆トイレデータ取得のロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: クライアントと待機処理を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod toilet;

pub use toilet::{
   FetchFailure,
   FetchOutcome,
   FetchWarning,
   PaginationSettings,
   ToiletUseCaseImpl,
};
