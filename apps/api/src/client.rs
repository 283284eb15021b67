//! # 外部 API クライアント
//!
//! ソウル市公共データ Open API との通信を担当する。

pub mod seoul_api;

pub use seoul_api::{ApiKey, ClientTimeouts, SeoulApiClient, SeoulApiClientImpl, UpstreamError};
