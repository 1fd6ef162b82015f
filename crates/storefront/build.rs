//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so `base.html` can link a content-addressed
//! copy (`static/css/derived/main.<hash>.css`). Static files are served with
//! a one-day cache, so a changed stylesheet must change its URL.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo"),
    );
    let source = manifest_dir.join("static/css/main.css");
    let derived_dir = manifest_dir.join("static/css/derived");

    println!("cargo:rerun-if-changed={}", source.display());

    match fingerprint(&source, &derived_dir, "main", "css") {
        Ok(hash) => println!("cargo:rustc-env=CSS_HASH={hash}"),
        Err(e) => {
            println!("cargo:warning=Stylesheet not fingerprinted: {e}");
            println!("cargo:rustc-env=CSS_HASH=missing");
        }
    }
}

/// Copy `source` to `<derived_dir>/<stem>.<hash>.<ext>` and remove copies
/// left by earlier builds. Returns the short hash.
fn fingerprint(source: &Path, derived_dir: &Path, stem: &str, ext: &str) -> Result<String, String> {
    let content = fs::read(source).map_err(|e| format!("read {}: {e}", source.display()))?;

    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest.get(..HASH_LEN).unwrap_or(&digest).to_string();
    let file_name = format!("{stem}.{hash}.{ext}");

    fs::create_dir_all(derived_dir).map_err(|e| format!("create {}: {e}", derived_dir.display()))?;

    let prefix = format!("{stem}.");
    let suffix = format!(".{ext}");
    if let Ok(entries) = fs::read_dir(derived_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != file_name && name.starts_with(&prefix) && name.ends_with(&suffix) {
                let _ = fs::remove_file(entry.path());
            }
        }
    }

    fs::write(derived_dir.join(&file_name), &content)
        .map_err(|e| format!("write {file_name}: {e}"))?;
    Ok(hash)
}
