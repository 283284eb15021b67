//! # SaveMeToilet ドメイン層
//!
//! 公衆トイレデータの取得で扱う値オブジェクトとエラーを定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 上流 API から受け取ったレコードは不変の値として扱う
//! - **範囲の不変条件**: ページ取得範囲は生成時に検証し、不正な範囲を型レベルで排除
//! - **I/O を持たない**: HTTP 通信・スリープ・ログ初期化はアプリケーション層の責務
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → domain
//!  └──→ shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`clock`] - 現在時刻の抽象化
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`page`] - 取得範囲・ページ応答・データセット
//! - [`toilet`] - 公衆トイレレコード
//!
//! ## 使用例
//!
//! ```rust
//! use savemetoilet_domain::page::{Dataset, FetchRange};
//!
//! let range = FetchRange::new(1, 1000).unwrap();
//! assert_eq!(range.len(), 1000);
//!
//! let dataset = Dataset::new();
//! assert!(dataset.is_empty());
//! ```

pub mod clock;
pub mod error;
pub mod page;
pub mod toilet;

pub use error::DomainError;
