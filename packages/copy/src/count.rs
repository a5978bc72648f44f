//! File counting using jwalk, used to size progress bars before copying.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

/// How many files are counted between progress callbacks.
const PROGRESS_INTERVAL: u64 = 100;

/// Count the files a copy of `path` would produce.
///
/// A file counts as 1. A directory counts every file and symlink below it.
/// A missing path or a symlink counts as 0.
#[must_use]
pub fn count_files(path: &Path) -> u64 {
    count_files_with_progress(path, |_| {})
}

/// Like [`count_files`], calling `on_progress` with the running count while
/// walking large directories.
#[must_use]
pub fn count_files_with_progress<F>(path: &Path, on_progress: F) -> u64
where
    F: Fn(u64),
{
    let Ok(metadata) = path.symlink_metadata() else {
        return 0;
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        return 0;
    }
    if file_type.is_file() {
        return 1;
    }
    if !file_type.is_dir() {
        return 0;
    }

    let mut count = 0;
    for entry in jwalk::WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_dir() {
            continue;
        }
        count += 1;
        if count % PROGRESS_INTERVAL == 0 {
            on_progress(count);
        }
    }

    on_progress(count);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_count_files_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        fs::write(&file, "content").unwrap();

        assert_eq!(count_files(&file), 1);
    }

    #[test]
    fn test_count_files_nested_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "1").unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        fs::write(dir.path().join("x/b.txt"), "2").unwrap();
        fs::write(dir.path().join("x/y/c.txt"), "3").unwrap();

        assert_eq!(count_files(dir.path()), 3);
    }

    #[test]
    fn test_count_files_missing_path() {
        let dir = TempDir::new().unwrap();
        assert_eq!(count_files(&dir.path().join("missing")), 0);
    }

    #[test]
    fn test_count_files_with_progress_reports_intervals() {
        let dir = TempDir::new().unwrap();
        for i in 0..250 {
            fs::write(dir.path().join(format!("f{i}.txt")), "x").unwrap();
        }

        let reports = RefCell::new(Vec::new());
        let count = count_files_with_progress(dir.path(), |n| reports.borrow_mut().push(n));

        assert_eq!(count, 250);
        assert_eq!(reports.into_inner(), vec![100, 200, 250]);
    }
}
