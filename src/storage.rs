use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Where the single best-score scalar lives. XDG data dir when
/// available, otherwise the working directory.
pub fn default_path() -> PathBuf {
    let base = env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("runner-tui").join("high_score")
}

/// Reads the persisted high score. Missing, unreadable or malformed
/// content all degrade to 0.
pub fn load(path: &std::path::Path) -> u32 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Writes the high score as a plain numeric string, via a temp file and
/// rename so a crash mid-write never leaves a truncated record.
pub fn save(path: &std::path::Path, score: u32) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, score.to_string())?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_zero() {
        let dir = tempdir().unwrap();
        assert_eq!(load(&dir.path().join("high_score")), 0);
    }

    #[test]
    fn malformed_content_loads_as_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_score");
        fs::write(&path, "not a number").unwrap();
        assert_eq!(load(&path), 0);
        fs::write(&path, "-3").unwrap();
        assert_eq!(load(&path), 0);
    }

    #[test]
    fn round_trip_and_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("high_score");
        save(&path, 42).unwrap();
        assert_eq!(load(&path), 42);
        save(&path, 1234).unwrap();
        assert_eq!(load(&path), 1234);
    }

    #[test]
    fn trailing_whitespace_is_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_score");
        fs::write(&path, "99\n").unwrap();
        assert_eq!(load(&path), 99);
    }
}
