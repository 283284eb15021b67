//! # SaveMeToilet API サーバー
//!
//! ## 環境変数
//!
//! 設定項目は [`savemetoilet_api::config`] を参照。`SEOUL_API_KEY` のみ必須。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p savemetoilet-api
//!
//! # 本番環境（環境変数を直接指定）
//! SEOUL_API_KEY=... LOG_FORMAT=json cargo run -p savemetoilet-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use savemetoilet_api::{
    app_builder::build_app,
    client::SeoulApiClientImpl,
    config::ApiConfig,
    handler::{HealthState, ToiletState},
    pacing::TokioSleeper,
    usecase::ToiletUseCaseImpl,
};
use savemetoilet_domain::clock::{Clock, SystemClock};
use savemetoilet_shared::observability::TracingConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("savemetoilet-api");
    savemetoilet_shared::observability::init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "savemetoilet-api").entered();

    // 設定読み込み
    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        base_url = %config.seoul.base_url,
        service = %config.seoul.toilet_service,
        page_size = config.seoul.page_size,
        max_attempts = config.seoul.max_attempts,
        "上流 API の設定を読み込みました"
    );

    // 依存関係の初期化
    let client = SeoulApiClientImpl::new(
        &config.seoul.base_url,
        config.seoul.api_key.clone(),
        &config.seoul.toilet_service,
        config.seoul.client_timeouts(),
    )
    .context("HTTP クライアントの初期化に失敗しました")?
    .with_max_response_bytes(config.seoul.max_response_bytes);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let usecase = Arc::new(ToiletUseCaseImpl::new(
        Arc::new(client),
        Arc::new(TokioSleeper),
        config.seoul.retry_policy(),
        config.seoul.pagination_settings(),
    ));

    let health_state = Arc::new(HealthState {
        clock: clock.clone(),
    });
    let shutdown = CancellationToken::new();
    let toilet_state = Arc::new(ToiletState {
        usecase,
        clock,
        shutdown: shutdown.clone(),
    });

    let app = build_app(health_state, toilet_state);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} にバインドできません"))?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("サーバーが異常終了しました")?;

    tracing::info!("API サーバーを停止しました");
    Ok(())
}

/// Ctrl+C を待ち、取得中のリクエストにキャンセルを伝える
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("シグナルの待機に失敗しました: {}", e);
    }
    tracing::info!("停止シグナルを受信しました。取得中のリクエストを打ち切ります");
    shutdown.cancel();
}
