//! 実行スコープの BuildContext
//!
//! 1 回の実行で全ビルド対象が共有する基準タイムスタンプを保持します。
//! タイムスタンプは毎回必ず新しく生成します。過去の実行が残した
//! マーカーを読み戻すことはしません（このビルドモードではタイムスタンプ
//! ベースの差分検出を使わない、という意図的な方針です）。

use crate::error::{BuildError, BuildResult};
use chrono::{DateTime, Utc};
use std::path::Path;

/// タイムスタンプマーカーのプロジェクト相対パス
///
/// 下流のツール（増分コピーなど）が参照します。フォーマットは RFC 3339 の
/// 単一値で、この実行自身は読み戻しません。
pub const TIMESTAMP_MARKER: &str = ".zosen/build.timestamp";

/// 実行スコープの共有ビルドコンテキスト
///
/// 1 実行につき 1 インスタンスを作り、以降は読み取り専用です。
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// この実行の基準時刻
    pub timestamp: DateTime<Utc>,
}

impl BuildContext {
    /// BuildContext を作成し、タイムスタンプマーカーを書き出す
    ///
    /// マーカーの書き込みは最初のビルドが始まる前に必ず行われます。
    /// 書き込み失敗は致命的な設定エラーです。
    pub fn create(base_dir: &Path) -> BuildResult<BuildContext> {
        let timestamp = Utc::now();
        let marker = base_dir.join(TIMESTAMP_MARKER);

        if let Some(parent) = marker.parent() {
            std::fs::create_dir_all(parent).map_err(|source| BuildError::TimestampWrite {
                path: marker.clone(),
                source,
            })?;
        }
        std::fs::write(&marker, timestamp.to_rfc3339()).map_err(|source| {
            BuildError::TimestampWrite {
                path: marker.clone(),
                source,
            }
        })?;

        tracing::debug!(
            marker = %marker.display(),
            timestamp = %timestamp.to_rfc3339(),
            "Stored build timestamp"
        );

        Ok(BuildContext { timestamp })
    }
}
