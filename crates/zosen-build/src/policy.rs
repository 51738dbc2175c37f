//! ベースイメージ pull ポリシーの解決
//!
//! 優先順位はイメージ個別の指定 > グローバルデフォルト。
//! 値そのものは不透明なトークンとして扱い、妥当性の検証はしません
//! （不正な値の扱いはビルドエンジン側の責務）。

use zosen_core::BuildImageConfig;

/// このビルドで使う pull ポリシーを決める
pub fn resolve_pull_policy(build: Option<&BuildImageConfig>, global_default: &str) -> String {
    match build.and_then(|build| build.pull_policy.as_deref()) {
        Some(policy) => policy.to_string(),
        None => global_default.to_string(),
    }
}
