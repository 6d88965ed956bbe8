use crate::error::{FilterError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ARCHIVE_EXTENSIONS: &[&str] = &["ndjson", "jsonl"];

fn is_archive_extension(ext: &str) -> bool {
    ARCHIVE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// 入力パスからアーカイブファイルを集める
///
/// ファイルならそのまま、フォルダならサブフォルダも含めて `.ndjson` を探す。
/// 結果はパス順。
pub fn scan_archives(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(FilterError::FileNotFound(input.display().to_string()));
    }

    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut archives: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| is_archive_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();

    archives.sort();
    Ok(archives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_archive_extension() {
        assert!(is_archive_extension("ndjson"));
        assert!(is_archive_extension("NDJSON"));
        assert!(is_archive_extension("jsonl"));
        assert!(!is_archive_extension("json"));
        assert!(!is_archive_extension("txt"));
    }

    #[test]
    fn test_scan_not_found() {
        let result = scan_archives(Path::new("/nonexistent/archive"));
        assert!(matches!(result, Err(FilterError::FileNotFound(_))));
    }

    #[test]
    fn test_single_file_is_used_as_is() {
        let dir = tempdir().unwrap();
        // 拡張子に関係なく明示したファイルは読む
        let path = dir.path().join("dump.txt");
        fs::write(&path, "").unwrap();

        assert_eq!(scan_archives(&path).unwrap(), vec![path]);
    }

    #[test]
    fn test_folder_scan_is_recursive_and_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("2023")).unwrap();
        fs::write(dir.path().join("b.ndjson"), "").unwrap();
        fs::write(dir.path().join("a.ndjson"), "").unwrap();
        fs::write(dir.path().join("2023").join("c.ndjson"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();

        let archives = scan_archives(dir.path()).unwrap();
        assert_eq!(archives.len(), 3);
        assert!(archives.windows(2).all(|w| w[0] <= w[1]));
        assert!(archives.iter().all(|p| p.extension().unwrap() == "ndjson"));
    }
}
