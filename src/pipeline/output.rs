//! Output handling for generated recipes.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => OutputTarget::File(p),
            None => OutputTarget::Stdout,
        }
    }
}

/// Write output to the target (stdout or file)
///
/// Recipes already end in a newline, so nothing is appended on stdout. A
/// file is written through a sibling temporary and renamed into place, so an
/// existing recipe is never left half-written.
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            print!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Output path {:?} has no file name", path))?;
            let mut tmp_name = file_name.to_os_string();
            tmp_name.push(".tmp");
            let tmp = path.with_file_name(tmp_name);

            let written = std::fs::write(&tmp, content)
                .with_context(|| format!("Failed to write output to {:?}", tmp))
                .and_then(|()| {
                    std::fs::rename(&tmp, path)
                        .with_context(|| format!("Failed to move output into {:?}", path))
                });
            if let Err(e) = written {
                if let Err(cleanup) = std::fs::remove_file(&tmp) {
                    tracing::debug!("Could not remove {:?}: {}", tmp, cleanup);
                }
                return Err(e);
            }
            if !quiet {
                tracing::info!("Recipe written to {:?}", path);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_target_from_option_none() {
        let target = OutputTarget::from_option(None);
        assert!(matches!(target, OutputTarget::Stdout));
    }

    #[test]
    fn test_output_target_from_option_some() {
        let path = PathBuf::from("/tmp/foo-1.0.0.ebuild");
        let target = OutputTarget::from_option(Some(path.clone()));
        assert_eq!(target, OutputTarget::File(path));
    }

    #[test]
    fn test_write_output_replaces_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("foo-1.0.0.ebuild");
        std::fs::write(&path, "old\n").unwrap();

        write_output("new\n", &OutputTarget::File(path.clone()), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
        assert!(!tmp.path().join("foo-1.0.0.ebuild.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temporary() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file
        let path = tmp.path().join("foo-1.0.0.ebuild");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "").unwrap();

        assert!(write_output("new\n", &OutputTarget::File(path.clone()), true).is_err());
        assert!(path.join("keep").exists());
        assert!(!tmp.path().join("foo-1.0.0.ebuild.tmp").exists());
    }
}
