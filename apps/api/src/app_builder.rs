//! # アプリケーション構築
//!
//! State を受け取り、ルーターとミドルウェアを組み立てる。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, routing::get};
use savemetoilet_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        HealthState,
        ToiletState,
        get_sample_toilets,
        get_toilet_count,
        health_check,
        test_connection,
    },
    middleware::cors_layer,
    openapi::openapi_json,
};

/// 公開 API のパスプレフィックス
pub const API_PREFIX: &str = "/api/v1/test";

/// ルーターを構築する
///
/// `/health` はロードバランサー向けにルートにも公開する。
pub fn build_app(health_state: Arc<HealthState>, toilet_state: Arc<ToiletState>) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health_check))
        .with_state(health_state);

    let api_routes = Router::new()
        .route("/connection", get(test_connection))
        .route("/toilets/sample", get(get_sample_toilets))
        .route("/toilets/count", get(get_toilet_count))
        .with_state(toilet_state)
        .merge(health_routes.clone());

    Router::new()
        .merge(health_routes)
        .nest(API_PREFIX, api_routes)
        .route("/openapi.json", get(openapi_json))
        .layer(cors_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
