//! # SaveMeToilet API サーバー
//!
//! ソウル市 Open API から公衆トイレ位置情報を取得し、フロントエンド向けに公開する。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │   Frontend  │────▶│     API     │────▶│ Seoul Open API   │
//! │             │     │ (port 8080) │     │ (port 8088)      │
//! └─────────────┘     └─────────────┘     └──────────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`client`] - 上流 API クライアント
//! - [`retry`] - リトライポリシー
//! - [`pacing`] - 待機とキャンセル
//! - [`usecase`] - 全件取得と接続テスト
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`error`] - 失敗レスポンスへの変換
//! - [`middleware`] - CORS
//! - [`app_builder`] - ルーター構築
//! - [`openapi`] - OpenAPI 仕様

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod pacing;
pub mod retry;
pub mod usecase;
