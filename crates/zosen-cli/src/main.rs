use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use zosen_build::{BuildOrchestrator, DockerBuildService, RunConfig};

#[derive(Parser)]
#[command(name = "zosen", version, about = "宣言的な設定からコンテナイメージをビルド・タグ付けする")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// zosen.toml のイメージをビルドしてタグ付けする
    Build {
        /// プロジェクトルート（省略時はカレントディレクトリ）
        #[arg(long)]
        project_root: Option<PathBuf>,
        /// 実行全体をスキップ
        #[arg(long)]
        skip_build: bool,
        /// ビルド成功後のタグ付けをスキップ
        #[arg(long)]
        skip_tag: bool,
        /// 自動検出時のイメージ名オーバーライド
        #[arg(long)]
        name: Option<String>,
        /// グローバルなデフォルト pull ポリシー (Always / IfNotPresent / Never)
        #[arg(long)]
        pull_policy: Option<String>,
    },
    /// バージョンを表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("zosen {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Build {
            project_root,
            skip_build,
            skip_tag,
            name,
            pull_policy,
        } => run_build(project_root, skip_build, skip_tag, name, pull_policy).await,
    }
}

async fn run_build(
    project_root: Option<PathBuf>,
    skip_build: bool,
    skip_tag: bool,
    name: Option<String>,
    pull_policy: Option<String>,
) -> anyhow::Result<()> {
    let base_dir = match project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let project = zosen_core::load_project(&base_dir)?;

    // CLI フラグは zosen.toml の [settings] を上書きする
    let mut config = RunConfig::from(&project.settings);
    if skip_build {
        config.skip_build = true;
    }
    if skip_tag {
        config.skip_tag = true;
    }
    if let Some(name) = name {
        config.name = Some(name);
    }
    if let Some(pull_policy) = pull_policy {
        config.image_pull_policy = pull_policy;
    }

    if config.skip_build {
        println!("{}", "ビルドはスキップされました (skip_build)".yellow());
        return Ok(());
    }

    let docker = init_docker_with_error_handling().await?;
    let orchestrator = BuildOrchestrator::new(DockerBuildService::new(docker), project.meta);

    match orchestrator.run(&config, &project.images).await {
        Ok(()) => {
            println!("{}", "✓ ビルドが完了しました".green());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            Err(e.into())
        }
    }
}

/// Docker接続を初期化（エラーハンドリング付き）
async fn init_docker_with_error_handling() -> anyhow::Result<bollard::Docker> {
    match bollard::Docker::connect_with_local_defaults() {
        Ok(docker) => {
            // 接続テスト
            match docker.ping().await {
                Ok(_) => Ok(docker),
                Err(e) => {
                    eprintln!();
                    eprintln!("{}", "✗ Docker接続エラー".red().bold());
                    eprintln!();
                    eprintln!("{}", "原因:".yellow());
                    eprintln!("  {}", e);
                    eprintln!();
                    eprintln!("{}", "解決方法:".yellow());
                    eprintln!("  • Dockerが起動しているか確認してください");
                    eprintln!("  • docker ps コマンドが正常に動作するか確認してください");
                    Err(anyhow::anyhow!("Docker接続に失敗しました"))
                }
            }
        }
        Err(e) => {
            eprintln!("{}", "✗ Dockerクライアントの初期化に失敗しました".red().bold());
            eprintln!("  {}", e);
            Err(e.into())
        }
    }
}
