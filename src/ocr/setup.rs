use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::OcrSettings;
use crate::log;
use crate::paths;

#[cfg(windows)]
const EXECUTABLE_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const EXECUTABLE_NAME: &str = "tesseract";

const COMMON_PATHS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// Environment variables that override the executable, in priority order.
const OVERRIDE_VARS: &[&str] = &["TESSERACT_CMD", "TESSERACT_PATH"];

/// True when `cmd --version` runs successfully.
fn responds_to_version(cmd: &Path) -> bool {
    Command::new(cmd)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn check_override(source: &str, cmd: &str) -> Result<PathBuf> {
    let path = PathBuf::from(cmd.trim());
    if path.exists() || responds_to_version(&path) {
        log(&format!("Using Tesseract from {}: {}", source, path.display()));
        return Ok(path);
    }
    Err(anyhow!(
        "Tesseract from {} not found at '{}'",
        source,
        path.display()
    ))
}

/// Finds the Tesseract executable.
///
/// Order: `TESSERACT_CMD` / `TESSERACT_PATH`, the configured path, a local
/// copy, `PATH`, then common install locations. An explicit override that
/// does not exist is an error rather than silently ignored.
pub fn find_tesseract_executable(settings: &OcrSettings) -> Result<PathBuf> {
    for var in OVERRIDE_VARS {
        if let Ok(cmd) = std::env::var(var) {
            if !cmd.trim().is_empty() {
                return check_override(var, &cmd);
            }
        }
    }

    if let Some(cmd) = settings.tesseract_cmd.as_deref() {
        if !cmd.trim().is_empty() {
            return check_override("config.json", cmd);
        }
    }

    let local_exe = paths::get_tesseract_dir().join(EXECUTABLE_NAME);
    if local_exe.exists() {
        return Ok(local_exe);
    }

    let on_path = PathBuf::from("tesseract");
    if responds_to_version(&on_path) {
        return Ok(on_path);
    }

    for path in COMMON_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR and add it to PATH, \
         or set TESSERACT_CMD to the executable"
    ))
}

/// Finds a tessdata directory to pass explicitly.
///
/// `None` lets tesseract use its compiled-in default.
pub fn find_tessdata_dir() -> Option<PathBuf> {
    let local_tessdata = paths::get_tesseract_dir().join("tessdata");
    if local_tessdata.join("eng.traineddata").exists() {
        return Some(local_tessdata);
    }

    // Check TESSDATA_PREFIX environment variable
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let p = PathBuf::from(&prefix);
        if p.join("eng.traineddata").exists() {
            return Some(p);
        }
        let p = p.join("tessdata");
        if p.join("eng.traineddata").exists() {
            return Some(p);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_override_must_exist() {
        let err = check_override("config.json", "/nonexistent/dir/tesseract").unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_existing_override_is_used() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("tesseract");
        std::fs::write(&exe, "").unwrap();
        assert_eq!(check_override("TESSERACT_CMD", exe.to_str().unwrap()).unwrap(), exe);
    }
}
