//! ビルド対象の解決
//!
//! 明示的に設定されたイメージ、または規約ベースの自動検出から、
//! この実行で処理する対象の順序付きリストを作ります。

use crate::error::BuildResult;
use std::path::PathBuf;
use zosen_core::{BuildImageConfig, ImageConfig, ProjectMeta};

/// 規約ベースで探す Dockerfile の候補（この順に評価、最初の一致で確定）
const CONVENTIONAL_DOCKERFILES: [&str; 2] = ["Dockerfile", "docker/Dockerfile"];

/// 解決・検証済みのビルド対象
///
/// 実行の間は不変として扱います。
#[derive(Debug, Clone)]
pub struct ImageTarget {
    /// イメージ名
    pub name: String,
    /// 検証済みのビルド設定。None のイメージはビルドされない。
    pub build: Option<BuildImageConfig>,
}

/// ビルド対象リゾルバ
pub struct TargetResolver {
    project: ProjectMeta,
    images: Vec<ImageConfig>,
    /// 自動検出時のイメージ名オーバーライド
    name_override: Option<String>,
}

impl TargetResolver {
    pub fn new(
        project: ProjectMeta,
        images: Vec<ImageConfig>,
        name_override: Option<String>,
    ) -> Self {
        Self {
            project,
            images,
            name_override,
        }
    }

    /// 対象リストの解決
    ///
    /// - 明示的な設定があれば記述順のまま検証して返す（推測はしない）。
    /// - 無ければ規約ベースの自動検出で 1 件だけ合成する。
    /// - どちらも無ければ空リスト（エラーではない）。
    ///
    /// 検証エラーは致命的な設定エラーとしてそのまま伝播します。
    pub fn resolve(&self) -> BuildResult<Vec<ImageTarget>> {
        if !self.images.is_empty() {
            return self
                .images
                .iter()
                .map(|image| {
                    let validated = image.validated(&self.project.base_dir)?;
                    Ok(ImageTarget {
                        name: validated.name,
                        build: validated.build,
                    })
                })
                .collect();
        }

        match self.find_conventional_dockerfile() {
            Some(dockerfile) => {
                let name = self
                    .name_override
                    .clone()
                    .unwrap_or_else(|| self.project.default_image_name());

                tracing::info!(
                    image = %name,
                    dockerfile = %dockerfile.display(),
                    "No image configured, using auto-detected Dockerfile"
                );

                let image = ImageConfig {
                    name,
                    build: Some(BuildImageConfig::from_dockerfile(dockerfile)),
                };
                let validated = image.validated(&self.project.base_dir)?;
                Ok(vec![ImageTarget {
                    name: validated.name,
                    build: validated.build,
                }])
            }
            // 自動検出も失敗した場合は何もしない実行になる
            None => Ok(Vec::new()),
        }
    }

    /// 規約ベースの Dockerfile 検索（最初の一致で確定）
    fn find_conventional_dockerfile(&self) -> Option<PathBuf> {
        for candidate in CONVENTIONAL_DOCKERFILES {
            let path = self.project.base_dir.join(candidate);
            if path.is_file() {
                tracing::debug!(path = %path.display(), "Found conventional Dockerfile");
                return Some(path);
            }
        }
        None
    }
}
