use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let header = crate_dir.join("include").join("linkapi_ffi.h");

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("LINKAPI_FFI_H")
        .with_cpp_compat(true)
        .generate();

    match bindings {
        Ok(bindings) => {
            if let Some(dir) = header.parent() {
                if let Err(err) = std::fs::create_dir_all(dir) {
                    println!("cargo:warning=cannot create {}: {err}", dir.display());
                    return;
                }
            }
            bindings.write_to_file(&header);
        }
        Err(err) => println!("cargo:warning=C header not generated: {err}"),
    }
}
