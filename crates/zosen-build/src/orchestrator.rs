//! ビルドオーケストレータ
//!
//! 対象の解決 → 対象ごとのスキップ判定 → ビルド → タグ付け、という
//! 実行全体の制御フローです。対象はリスト順に 1 つずつ処理し、
//! 最初の失敗で即座に中断します（途中までの成果はそのまま残す）。

use crate::context::BuildContext;
use crate::error::BuildResult;
use crate::policy::resolve_pull_policy;
use crate::resolver::TargetResolver;
use crate::service::BuildService;
use zosen_core::{ImageConfig, ProjectMeta, Settings};

/// 1 回の実行に効く設定
///
/// グローバルなフラグとしてではなく、不変の値として呼び出し時に渡します。
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 実行全体をスキップ
    pub skip_build: bool,
    /// ビルド成功後のタグ付けをスキップ
    pub skip_tag: bool,
    /// 自動検出時のイメージ名オーバーライド
    pub name: Option<String>,
    /// グローバルなデフォルト pull ポリシー
    pub image_pull_policy: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            skip_build: false,
            skip_tag: false,
            name: None,
            image_pull_policy: "IfNotPresent".to_string(),
        }
    }
}

impl From<&Settings> for RunConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            skip_build: settings.skip_build,
            skip_tag: settings.skip_tag,
            name: settings.name.clone(),
            image_pull_policy: settings.image_pull_policy.clone(),
        }
    }
}

/// ビルドオーケストレータ
pub struct BuildOrchestrator<S> {
    service: S,
    project: ProjectMeta,
}

impl<S: BuildService> BuildOrchestrator<S> {
    pub fn new(service: S, project: ProjectMeta) -> Self {
        Self { service, project }
    }

    /// 実行する
    ///
    /// - `skip_build` なら解決も副作用も一切なしで即終了。
    /// - 対象が空なら何もせず成功。
    /// - 各対象はリスト順に逐次処理。ビルド失敗・タグ付け失敗は
    ///   その場で伝播してループを止める。
    pub async fn run(&self, config: &RunConfig, images: &[ImageConfig]) -> BuildResult<()> {
        if config.skip_build {
            tracing::info!("Build is skipped");
            return Ok(());
        }

        let resolver = TargetResolver::new(
            self.project.clone(),
            images.to_vec(),
            config.name.clone(),
        );
        let targets = resolver.resolve()?;

        if targets.is_empty() {
            tracing::info!("No images to build");
            return Ok(());
        }

        // BuildContext は実行につき 1 つ。最初のビルド対象の直前に作り、
        // 以降の対象すべてで共有する（対象ごとに作り直すと複数対象の
        // 実行で基準時刻がずれるため）。
        let mut shared_context: Option<BuildContext> = None;

        for target in &targets {
            // build 設定の無いイメージはこの実行の対象外
            let Some(build) = target.build.as_ref() else {
                continue;
            };

            if build.skip {
                tracing::info!(image = %target.name, "Skipped building");
                continue;
            }

            if shared_context.is_none() {
                shared_context = Some(BuildContext::create(&self.project.base_dir)?);
            }
            let Some(context) = shared_context.as_ref() else {
                // 直前で必ず作成済み
                continue;
            };

            let pull_policy = resolve_pull_policy(Some(build), &config.image_pull_policy);

            self.service.build(target, &pull_policy, context).await?;

            if !config.skip_tag {
                self.service.tag(&target.name, target).await?;
            }
        }

        tracing::info!("All image builds completed");
        Ok(())
    }
}
