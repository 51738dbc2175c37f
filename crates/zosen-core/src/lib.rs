//! Zosen core model
//!
//! プロジェクトメタデータ、イメージ設定モデル、zosen.toml の読み込みを
//! 提供します。

pub mod error;
pub mod loader;
pub mod model;
pub mod project;

pub use error::{CoreError, Result};
pub use loader::{PROJECT_FILE, Project, Settings, load_project};
pub use model::{BuildImageConfig, ImageConfig};
pub use project::ProjectMeta;
