//! プロジェクトメタデータ
//!
//! ビルド対象プロジェクトの識別子 (group / artifact / version) と
//! ベースディレクトリを保持します。解決時に読み取り専用で参照されます。

use std::path::PathBuf;

/// プロジェクトメタデータ
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    /// グループ識別子 (例: "club.chronista")
    pub group: String,
    /// アーティファクト識別子 (例: "api")
    pub artifact: String,
    /// バージョン文字列 (例: "1.2.3")
    pub version: String,
    /// プロジェクトのベースディレクトリ
    pub base_dir: PathBuf,
}

impl ProjectMeta {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            base_dir: base_dir.into(),
        }
    }

    /// 規約ベースのデフォルトイメージ名: {group}/{artifact}:{version}
    pub fn default_image_name(&self) -> String {
        format!("{}/{}:{}", self.group, self.artifact, self.version)
    }
}
