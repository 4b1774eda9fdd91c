// build.rs: stamp the build time into the binary

use chrono::Utc;
use std::{env, fs, path::PathBuf};

fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR")).join("build_info.rs");
    let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    // included by main.rs
    fs::write(&out, format!("pub const BUILD_DATE: &str = \"{stamp}\";\n"))
        .expect("write build_info.rs");

    println!("cargo:rerun-if-changed=build.rs");
}
