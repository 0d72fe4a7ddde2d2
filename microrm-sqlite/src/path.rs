use anyhow::{Context, Result};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Directory a database named without a path lives in: the one holding the
/// running executable, or the current directory when that is unknown.
pub fn default_directory() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|v| v.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_default()
}

/// Resolve the database file location and create its parent directories.
///
/// - no `db_path`: `db_name` inside [`default_directory`]
/// - `db_path` is an existing directory or ends with a separator: `db_name`
///   inside it
/// - otherwise `db_path` is the full file path
pub fn resolve_database_path(db_name: &str, db_path: Option<&Path>) -> Result<PathBuf> {
    let path = match db_path {
        None => default_directory().join(db_name),
        Some(path) => {
            let text = path.as_os_str().to_string_lossy();
            if path.is_dir() || text.ends_with('/') || text.ends_with('\\') {
                path.join(db_name)
            } else {
                path.to_path_buf()
            }
        }
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create the directory `{}`", parent.display()))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::resolve_database_path;
    use std::path::Path;

    #[test]
    fn directory_and_file_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = resolve_database_path("app.db", Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("app.db"));

        let nested = format!("{}/data/", dir.path().display());
        let path = resolve_database_path("app.db", Some(Path::new(&nested))).unwrap();
        assert_eq!(path, dir.path().join("data").join("app.db"));
        assert!(dir.path().join("data").is_dir());

        let file = dir.path().join("other").join("custom.sqlite");
        let path = resolve_database_path("app.db", Some(file.as_path())).unwrap();
        assert_eq!(path, file);
        assert!(dir.path().join("other").is_dir());
    }

    #[test]
    fn no_path_uses_the_executable_directory() {
        let path = resolve_database_path("app.db", None).unwrap();
        assert_eq!(path.file_name().and_then(|v| v.to_str()), Some("app.db"));
        let exe = std::env::current_exe().unwrap();
        assert_eq!(path.parent(), exe.parent());
    }
}
