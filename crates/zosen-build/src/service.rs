//! ビルドサービス
//!
//! ビルドとタグ付けの実行を抽象化するトレイトと、bollard を使った
//! Docker デーモン実装です。オーケストレータはトレイト越しにだけ
//! エンジンへ触れるため、テストでは記録用のフェイクに差し替えられます。

use crate::archive;
use crate::context::BuildContext;
use crate::error::{BuildError, BuildResult};
use crate::resolver::ImageTarget;
use bollard::Docker;
use colored::Colorize;
use futures_util::stream::StreamExt;
use std::collections::HashMap;

/// ビルドエンジンの抽象
///
/// 実装はビルド・タグ付けを同期的な 1 操作として完了させます
/// （戻った時点で成否が確定している）。
#[allow(async_fn_in_trait)]
pub trait BuildService {
    /// イメージをビルドする
    async fn build(
        &self,
        target: &ImageTarget,
        pull_policy: &str,
        context: &BuildContext,
    ) -> BuildResult<()>;

    /// ビルド済みイメージへ追加タグを付ける
    async fn tag(&self, name: &str, target: &ImageTarget) -> BuildResult<()>;
}

/// Docker デーモンを使う BuildService 実装
pub struct DockerBuildService {
    docker: Docker,
}

impl DockerBuildService {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// ビルド出力の処理
    fn handle_build_output(
        &self,
        name: &str,
        output: bollard::models::BuildInfo,
    ) -> BuildResult<()> {
        if let Some(stream) = output.stream {
            print!("{}", stream);
        }

        if let Some(error) = output.error {
            return Err(BuildError::BuildFailed {
                name: name.to_string(),
                message: error,
            });
        }

        if let Some(error_detail) = output.error_detail {
            let message = error_detail
                .message
                .unwrap_or_else(|| "Unknown build error".to_string());
            return Err(BuildError::BuildFailed {
                name: name.to_string(),
                message,
            });
        }

        if let Some(status) = output.status {
            // pull 等のステータスメッセージ
            println!("{}", status.cyan());
        }

        Ok(())
    }
}

impl BuildService for DockerBuildService {
    async fn build(
        &self,
        target: &ImageTarget,
        pull_policy: &str,
        context: &BuildContext,
    ) -> BuildResult<()> {
        let build = target.build.as_ref().ok_or_else(|| {
            BuildError::InvalidConfig(format!("Image '{}' has no build configuration", target.name))
        })?;
        let dockerfile = build.dockerfile.as_ref().ok_or_else(|| {
            BuildError::InvalidConfig(format!("Image '{}' was not validated", target.name))
        })?;
        let context_dir = build.context.as_ref().ok_or_else(|| {
            BuildError::InvalidConfig(format!("Image '{}' was not validated", target.name))
        })?;

        tracing::info!(image = %target.name, pull_policy = %pull_policy, "Building image");

        let archive_data = archive::create_archive(context_dir, dockerfile)?;

        // 実行の基準時刻をラベルとして焼き込む（下流ツールと同じ値）
        let build_date = context.timestamp.to_rfc3339();
        let mut labels = HashMap::new();
        labels.insert("club.chronista.zosen.build-date", build_date.as_str());

        #[allow(deprecated)]
        let options = bollard::image::BuildImageOptions {
            dockerfile: "Dockerfile",
            t: target.name.as_str(),
            labels,
            rm: true,
            forcerm: true,
            // pull ポリシーの解釈はエンジンの責務。"Always" のときだけ
            // デーモンにベースイメージの再取得を指示する。
            pull: pull_policy == "Always",
            ..Default::default()
        };

        use bytes::Bytes;
        use http_body_util::{Either, Full};
        let body = Full::new(Bytes::from(archive_data));
        #[allow(deprecated)]
        let mut stream = self
            .docker
            .build_image(options, None, Some(Either::Left(body)));

        while let Some(msg) = stream.next().await {
            match msg {
                Ok(output) => {
                    self.handle_build_output(&target.name, output)?;
                }
                Err(e) => {
                    return Err(BuildError::DockerConnection(e));
                }
            }
        }

        tracing::info!(image = %target.name, "Successfully built");
        Ok(())
    }

    async fn tag(&self, name: &str, target: &ImageTarget) -> BuildResult<()> {
        let Some(build) = target.build.as_ref() else {
            return Ok(());
        };
        if build.tags.is_empty() {
            return Ok(());
        }

        let (repo, _) = split_image_name(name);

        for tag in &build.tags {
            validate_tag(tag)?;

            #[allow(deprecated)]
            let options = bollard::image::TagImageOptions {
                repo,
                tag: tag.as_str(),
            };
            self.docker
                .tag_image(name, Some(options))
                .await
                .map_err(|e| BuildError::TagFailed {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;

            println!("  {} {}:{}", "✓".green(), repo, tag.cyan());
        }

        tracing::info!(image = %name, tags = build.tags.len(), "Tagged image");
        Ok(())
    }
}

/// イメージ名とタグを分離
/// 例: "redis:7-alpine" -> ("redis", "7-alpine")
///     "postgres" -> ("postgres", "latest")
pub fn split_image_name(image: &str) -> (&str, &str) {
    if let Some((name, tag)) = image.rsplit_once(':')
        && !tag.contains('/')
    {
        (name, tag)
    } else {
        (image, "latest")
    }
}

/// タグのバリデーション
///
/// Docker タグの制約:
/// - 128文字以下
/// - 英数字、ピリオド、ハイフン、アンダースコアのみ
/// - 先頭はピリオドまたはハイフンではない
pub fn validate_tag(tag: &str) -> BuildResult<()> {
    if tag.is_empty() {
        return Err(BuildError::InvalidTag {
            tag: "(empty)".to_string(),
        });
    }

    if tag.len() > 128 {
        return Err(BuildError::InvalidTag {
            tag: format!("Tag too long ({} characters, max 128)", tag.len()),
        });
    }

    if tag.starts_with('.') || tag.starts_with('-') {
        return Err(BuildError::InvalidTag {
            tag: tag.to_string(),
        });
    }

    for c in tag.chars() {
        if !c.is_ascii_alphanumeric() && c != '.' && c != '-' && c != '_' {
            return Err(BuildError::InvalidTag {
                tag: format!("Invalid character '{}' in tag: {}", c, tag),
            });
        }
    }

    Ok(())
}
