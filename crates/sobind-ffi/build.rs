use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let output_dir = PathBuf::from(&crate_dir).join("include");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/api.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-changed=src/memory.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    // A missing header must not block building the library itself
    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        println!("cargo:warning=Unable to create {}: {}", output_dir.display(), e);
        return;
    }

    // Generate the header file using cbindgen.toml config
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(load_config(&crate_dir))
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(output_dir.join("example.h"));
        }
        Err(e) => {
            println!("cargo:warning=Unable to generate example.h: {}", e);
        }
    }
}

fn load_config(crate_dir: &str) -> cbindgen::Config {
    let path = PathBuf::from(crate_dir).join("cbindgen.toml");
    cbindgen::Config::from_file(&path).unwrap_or_default()
}
