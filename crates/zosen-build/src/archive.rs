//! Docker デーモンへ送るビルドコンテキストアーカイブの作成

use crate::error::{BuildError, BuildResult};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tar::Builder;

/// ビルドコンテキストを tar.gz アーカイブとして作成
///
/// コンテキストディレクトリの内容に加えて、Dockerfile を "Dockerfile" の
/// 名前でアーカイブ先頭階層に入れます（コンテキスト外の Dockerfile 指定に
/// 対応するため）。
pub fn create_archive(context_dir: &Path, dockerfile: &Path) -> BuildResult<Vec<u8>> {
    if !dockerfile.is_file() {
        return Err(BuildError::DockerfileNotFound(dockerfile.to_path_buf()));
    }
    if !context_dir.is_dir() {
        return Err(BuildError::ContextNotFound(context_dir.to_path_buf()));
    }

    tracing::debug!(context = %context_dir.display(), "Creating build context archive");

    let mut archive_data = Vec::new();
    {
        let encoder = GzEncoder::new(&mut archive_data, Compression::default());
        let mut tar = Builder::new(encoder);

        tar.append_dir_all(".", context_dir).map_err(BuildError::Io)?;

        let mut dockerfile_file = File::open(dockerfile)?;
        let mut dockerfile_content = Vec::new();
        dockerfile_file.read_to_end(&mut dockerfile_content)?;

        let mut header = tar::Header::new_gnu();
        header.set_path("Dockerfile").map_err(|e| {
            BuildError::InvalidConfig(format!("Failed to set Dockerfile path: {}", e))
        })?;
        header.set_size(dockerfile_content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        tar.append(&header, &dockerfile_content[..])
            .map_err(BuildError::Io)?;

        tar.finish().map_err(BuildError::Io)?;
    }

    tracing::debug!("Build context archive created: {} bytes", archive_data.len());

    Ok(archive_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_create_archive() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("app.py"), "print('hi')").unwrap();

        let dockerfile = temp_dir.path().join("Dockerfile");
        fs::write(&dockerfile, "FROM alpine\nCOPY app.py /").unwrap();

        let archive = create_archive(temp_dir.path(), &dockerfile).unwrap();
        assert!(!archive.is_empty());

        // 展開して Dockerfile が含まれることを確認
        let extract_dir = tempdir().unwrap();
        let mut reader = std::io::Cursor::new(archive);
        let decoder = flate2::read::GzDecoder::new(&mut reader);
        let mut tar = tar::Archive::new(decoder);
        tar.unpack(extract_dir.path()).unwrap();

        assert!(extract_dir.path().join("Dockerfile").exists());
        assert!(extract_dir.path().join("app.py").exists());
    }

    #[test]
    fn test_dockerfile_outside_context() {
        let temp_dir = tempdir().unwrap();
        let context_dir = temp_dir.path().join("ctx");
        fs::create_dir(&context_dir).unwrap();
        fs::write(context_dir.join("data.txt"), "data").unwrap();

        let dockerfile = temp_dir.path().join("custom.dockerfile");
        fs::write(&dockerfile, "FROM alpine").unwrap();

        let archive = create_archive(&context_dir, &dockerfile).unwrap();

        let extract_dir = tempdir().unwrap();
        let mut reader = std::io::Cursor::new(archive);
        let decoder = flate2::read::GzDecoder::new(&mut reader);
        let mut tar = tar::Archive::new(decoder);
        tar.unpack(extract_dir.path()).unwrap();

        // コンテキスト外の Dockerfile が "Dockerfile" として入る
        assert!(extract_dir.path().join("Dockerfile").exists());
        assert!(extract_dir.path().join("data.txt").exists());
    }

    #[test]
    fn test_missing_dockerfile_is_error() {
        let temp_dir = tempdir().unwrap();
        let result = create_archive(temp_dir.path(), &temp_dir.path().join("Dockerfile"));
        assert!(matches!(result, Err(BuildError::DockerfileNotFound(_))));
    }

    #[test]
    fn test_missing_context_is_error() {
        let temp_dir = tempdir().unwrap();
        let dockerfile = temp_dir.path().join("Dockerfile");
        fs::write(&dockerfile, "FROM alpine").unwrap();

        let result = create_archive(&temp_dir.path().join("nope"), &dockerfile);
        assert!(matches!(result, Err(BuildError::ContextNotFound(_))));
    }
}
