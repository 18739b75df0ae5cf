use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    // Copy the set table and config next to the executable
    let Some(target_dir) = target_dir() else {
        return;
    };
    copy_data(&target_dir);
    copy_config(&target_dir);
}

/// OUT_DIR is target/<profile>/build/card-scanner-xxx/out; returns target/<profile>.
fn target_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    Path::new(&out_dir).ancestors().nth(3).map(Path::to_path_buf)
}

/// Recursively copies a directory and its contents.
fn copy_dir_recursive(src: &Path, dst: &Path) {
    let _ = fs::create_dir_all(dst);

    if let Ok(entries) = fs::read_dir(src) {
        for entry in entries.flatten() {
            let src_path = entry.path();
            let dst_path = dst.join(entry.file_name());

            if src_path.is_dir() {
                copy_dir_recursive(&src_path, &dst_path);
            } else {
                let _ = fs::copy(&src_path, &dst_path);
            }
        }
    }
}

/// Copies data/ (set abbreviations) to the target directory.
fn copy_data(target_dir: &Path) {
    let data_src = Path::new("data");
    if data_src.exists() {
        copy_dir_recursive(data_src, &target_dir.join("data"));
        println!("cargo:rerun-if-changed=data/");
    }
}

/// Copies config.json to the target directory.
fn copy_config(target_dir: &Path) {
    let config_src = Path::new("config.json");
    if config_src.exists() {
        let _ = fs::copy(config_src, target_dir.join("config.json"));
        println!("cargo:rerun-if-changed=config.json");
    }
}
