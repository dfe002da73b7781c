fn main() {
    // The engine is an external native library; the only build-time concern
    // here is telling the linker where to find it.
    println!("cargo:rerun-if-env-changed=OQS_LIB_DIR");
    if let Ok(dir) = std::env::var("OQS_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    println!("cargo:rustc-link-lib=oqs");
}
