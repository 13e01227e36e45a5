use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Static assets that get a cache-busting hash, with the constant it is exposed as
const HASHED_ASSETS: &[(&str, &str)] = &[
    ("static/js/study.js", "STUDY_JS_HASH"),
    ("static/css/styles.css", "STYLES_CSS_HASH"),
];

fn hash_file(path: &Path) -> String {
    let content = fs::read(path).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

fn main() {
    println!("cargo:rerun-if-changed=templates/");

    let mut generated = String::new();
    for (asset, constant) in HASHED_ASSETS {
        println!("cargo:rerun-if-changed={}", asset);
        generated.push_str(&format!(
            "/// Hash of {} for cache busting\npub const {}: &str = \"{}\";\n",
            asset,
            constant,
            hash_file(Path::new(asset))
        ));
    }

    let out_dir = std::env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("asset_hashes.rs"), generated).unwrap();
}
