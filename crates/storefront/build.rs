//! Build script for storefront crate.
//!
//! Fingerprints `static/css/main.css` so the stylesheet can be served with
//! immutable caching. The hash is exposed as `CSS_HASH` and the file is
//! copied to `static/css/derived/main.{hash}.css`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping CSS fingerprint");
        println!("cargo:rustc-env=CSS_HASH=");
        return;
    };
    let css_dir = Path::new(&manifest_dir).join("static/css");

    match fingerprint(&css_dir.join("main.css"), &css_dir.join("derived")) {
        Ok(hash) => println!("cargo:rustc-env=CSS_HASH={hash}"),
        Err(e) => {
            println!("cargo:warning=Could not fingerprint main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

fn fingerprint(source: &Path, derived_dir: &Path) -> std::io::Result<String> {
    println!("cargo:rerun-if-changed={}", source.display());

    let content = fs::read(source)?;
    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest[..HASH_LEN].to_string();

    fs::create_dir_all(derived_dir)?;
    let target: PathBuf = derived_dir.join(format!("main.{hash}.css"));
    if !target.exists() {
        fs::write(&target, &content)?;
    }

    Ok(hash)
}
