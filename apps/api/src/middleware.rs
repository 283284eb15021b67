//! # ミドルウェア
//!
//! 公開 API 用のミドルウェアを提供する。

mod cors;

pub use cors::cors_layer;
