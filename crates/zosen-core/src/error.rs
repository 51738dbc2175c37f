use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("設定ファイルのパースエラー: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("設定ファイルが見つかりません: {0}")]
    ProjectFileNotFound(PathBuf),

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error("イメージ '{0}' に build の入力が指定されていません (dockerfile または context が必要です)")]
    MissingBuildInput(String),

    #[error("イメージに name が指定されていません")]
    MissingImageName,
}

pub type Result<T> = std::result::Result<T, CoreError>;
