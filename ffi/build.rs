//! Generates `include/userlist.h` from the `extern "C"` surface.
//!
//! Header generation is best-effort: a cbindgen failure is reported as a
//! cargo warning and never fails the build.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };

    let result = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("USERLIST_H")
        .generate();

    match result {
        Ok(bindings) => {
            bindings.write_to_file(crate_dir.join("include").join("userlist.h"));
        }
        Err(err) => println!("cargo:warning=cbindgen skipped: {err}"),
    }
}
