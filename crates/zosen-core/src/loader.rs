//! zosen.toml の読み込み
//!
//! プロジェクトルートの `zosen.toml` からプロジェクトメタデータ、
//! 実行設定、イメージ定義を読み込みます。

use crate::error::{CoreError, Result};
use crate::model::ImageConfig;
use crate::project::ProjectMeta;
use serde::Deserialize;
use std::path::Path;

/// プロジェクトファイル名
pub const PROJECT_FILE: &str = "zosen.toml";

/// 読み込み済みプロジェクト
#[derive(Debug, Clone)]
pub struct Project {
    pub meta: ProjectMeta,
    pub settings: Settings,
    /// 明示的に設定されたイメージ（設定ファイルの記述順）
    pub images: Vec<ImageConfig>,
}

/// 実行全体に効く設定 ([settings] セクション)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 実行全体をスキップ
    pub skip_build: bool,
    /// ビルド成功後のタグ付けをスキップ
    pub skip_tag: bool,
    /// 自動検出時のイメージ名オーバーライド
    pub name: Option<String>,
    /// グローバルなデフォルト pull ポリシー
    pub image_pull_policy: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skip_build: false,
            skip_tag: false,
            name: None,
            image_pull_policy: "IfNotPresent".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    project: ProjectSection,
    #[serde(default)]
    settings: Settings,
    #[serde(default, rename = "image")]
    images: Vec<ImageConfig>,
}

#[derive(Debug, Deserialize)]
struct ProjectSection {
    group: String,
    artifact: String,
    version: String,
}

/// `{base_dir}/zosen.toml` を読み込む
///
/// イメージ定義の検証はここでは行いません（解決時の責務）。
pub fn load_project(base_dir: &Path) -> Result<Project> {
    let path = base_dir.join(PROJECT_FILE);
    if !path.is_file() {
        return Err(CoreError::ProjectFileNotFound(path));
    }

    tracing::debug!(path = %path.display(), "Loading project file");

    let content = std::fs::read_to_string(&path)?;
    let file: ProjectFile = toml::from_str(&content)?;

    Ok(Project {
        meta: ProjectMeta::new(
            file.project.group,
            file.project.artifact,
            file.project.version,
            base_dir,
        ),
        settings: file.settings,
        images: file.images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_project_full() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_FILE),
            r#"
[project]
group = "club.chronista"
artifact = "api"
version = "1.2.3"

[settings]
skip_tag = true
image_pull_policy = "Always"

[[image]]
name = "ghcr.io/acme/api:1.0"

[image.build]
dockerfile = "docker/api/Dockerfile"
pull_policy = "Never"

[[image]]
name = "redis:7"
"#,
        )
        .unwrap();

        let project = load_project(temp_dir.path()).unwrap();

        assert_eq!(project.meta.group, "club.chronista");
        assert_eq!(project.meta.artifact, "api");
        assert_eq!(project.meta.version, "1.2.3");
        assert_eq!(project.meta.base_dir, temp_dir.path());

        assert!(!project.settings.skip_build);
        assert!(project.settings.skip_tag);
        assert_eq!(project.settings.image_pull_policy, "Always");

        // 記述順が保持される
        assert_eq!(project.images.len(), 2);
        assert_eq!(project.images[0].name, "ghcr.io/acme/api:1.0");
        let build = project.images[0].build.as_ref().unwrap();
        assert_eq!(build.pull_policy.as_deref(), Some("Never"));
        assert_eq!(project.images[1].name, "redis:7");
        assert!(project.images[1].build.is_none());
    }

    #[test]
    fn test_load_project_minimal() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_FILE),
            "[project]\ngroup = \"g\"\nartifact = \"a\"\nversion = \"v\"\n",
        )
        .unwrap();

        let project = load_project(temp_dir.path()).unwrap();

        assert!(project.images.is_empty());
        assert!(!project.settings.skip_build);
        assert!(!project.settings.skip_tag);
        assert!(project.settings.name.is_none());
        // デフォルトの pull ポリシー
        assert_eq!(project.settings.image_pull_policy, "IfNotPresent");
    }

    #[test]
    fn test_load_project_missing_file() {
        let temp_dir = tempdir().unwrap();
        let result = load_project(temp_dir.path());
        assert!(matches!(result, Err(CoreError::ProjectFileNotFound(_))));
    }

    #[test]
    fn test_load_project_parse_error() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(PROJECT_FILE), "not toml at all [").unwrap();

        let result = load_project(temp_dir.path());
        assert!(matches!(result, Err(CoreError::TomlParse(_))));
    }
}
