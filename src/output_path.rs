use std::path::{Path, PathBuf};

/// Pick a file path that will not clobber an existing file unless allowed.
///
/// When the path is taken, a `_1`, `_2`, … suffix is inserted before the
/// extension until an unused name is found. Purely a name-selection
/// decision; nothing is created or removed here.
pub fn resolve_output_path(path: &Path, allow_overwrite: bool) -> PathBuf {
    if allow_overwrite || !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let extension = path.extension().and_then(|s| s.to_str());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1usize;
    loop {
        let file_name = match extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = parent.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_path_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("primers.xlsx");
        assert_eq!(resolve_output_path(&target, false), target);
    }

    #[test]
    fn test_existing_path_gets_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("primers.xlsx");
        fs::write(&target, b"taken").unwrap();
        assert_eq!(
            resolve_output_path(&target, false),
            dir.path().join("primers_1.xlsx")
        );

        fs::write(dir.path().join("primers_1.xlsx"), b"taken").unwrap();
        assert_eq!(
            resolve_output_path(&target, false),
            dir.path().join("primers_2.xlsx")
        );
    }

    #[test]
    fn test_overwrite_keeps_the_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("primers.xlsx");
        fs::write(&target, b"taken").unwrap();
        assert_eq!(resolve_output_path(&target, true), target);
    }

    #[test]
    fn test_path_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("primers");
        fs::write(&target, b"taken").unwrap();
        assert_eq!(
            resolve_output_path(&target, false),
            dir.path().join("primers_1")
        );
    }
}
