//! # CORS
//!
//! ブラウザのフロントエンドから直接呼び出せるよう、全オリジンからの
//! `GET` / `POST` / `OPTIONS` を許可する。

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// 全オリジンを許可する CORS レイヤー
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
