//! イメージ設定モデル
//!
//! 1 回の実行で処理するイメージの宣言的な記述です。
//! 解決時に `validated` で正規化され、以降は不変として扱われます。

use crate::error::{CoreError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 1 つのイメージの設定
///
/// `build` が無いイメージはビルド対象になりません。
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// イメージ名 (例: "ghcr.io/acme/api:1.0")
    pub name: String,
    /// ビルド設定（省略可）
    #[serde(default)]
    pub build: Option<BuildImageConfig>,
}

impl ImageConfig {
    /// 設定の検証と正規化
    ///
    /// ビルド設定があれば `base_dir` 基準でパスを正規化します。
    /// 検証エラーは実行全体を中断する致命的な設定エラーです。
    pub fn validated(&self, base_dir: &Path) -> Result<ImageConfig> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingImageName);
        }

        let build = match &self.build {
            Some(build) => Some(build.validated(&self.name, base_dir)?),
            None => None,
        };

        Ok(ImageConfig {
            name: self.name.clone(),
            build,
        })
    }
}

/// イメージのビルド設定
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildImageConfig {
    /// Dockerfile のパス（明示指定。context より優先）
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,
    /// ビルドコンテキストディレクトリ
    #[serde(default)]
    pub context: Option<PathBuf>,
    /// ベースイメージの pull ポリシー（省略時はグローバル設定を継承）
    #[serde(default)]
    pub pull_policy: Option<String>,
    /// ビルド成功後に付ける追加タグ
    #[serde(default)]
    pub tags: Vec<String>,
    /// このイメージのビルドだけをスキップ
    #[serde(default)]
    pub skip: bool,
}

impl BuildImageConfig {
    /// Dockerfile パスだけを指定したビルド設定（自動検出用）
    pub fn from_dockerfile(dockerfile: impl Into<PathBuf>) -> Self {
        Self {
            dockerfile: Some(dockerfile.into()),
            ..Default::default()
        }
    }

    /// ビルド設定の検証と正規化
    ///
    /// ルール:
    /// - `dockerfile` の明示指定が最優先。context 省略時は Dockerfile の
    ///   親ディレクトリがコンテキストになる。
    /// - `dockerfile` が無ければ `context` 配下の `Dockerfile` を入力とする。
    /// - どちらも無ければ設定エラー。
    ///
    /// 検証後は `dockerfile` と `context` の両方が絶対パスで埋まります。
    /// ファイルの存在確認はここでは行いません（ビルド実行時の責務）。
    pub fn validated(&self, image_name: &str, base_dir: &Path) -> Result<BuildImageConfig> {
        let (dockerfile, context) = if let Some(dockerfile) = &self.dockerfile {
            let dockerfile = absolutize(base_dir, dockerfile);
            let context = match &self.context {
                Some(context) => absolutize(base_dir, context),
                None => dockerfile
                    .parent()
                    .map(Path::to_path_buf)
                    .ok_or_else(|| {
                        CoreError::InvalidConfig(format!(
                            "Dockerfile パスに親ディレクトリがありません: {}",
                            dockerfile.display()
                        ))
                    })?,
            };
            (dockerfile, context)
        } else if let Some(context) = &self.context {
            let context = absolutize(base_dir, context);
            (context.join("Dockerfile"), context)
        } else {
            return Err(CoreError::MissingBuildInput(image_name.to_string()));
        };

        tracing::debug!(
            image = %image_name,
            dockerfile = %dockerfile.display(),
            context = %context.display(),
            "Validated build configuration"
        );

        Ok(BuildImageConfig {
            dockerfile: Some(dockerfile),
            context: Some(context),
            pull_policy: self.pull_policy.clone(),
            tags: self.tags.clone(),
            skip: self.skip,
        })
    }
}

/// 相対パスを base_dir 基準の絶対パスへ
fn absolutize(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
