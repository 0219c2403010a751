fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let include_dir = format!("{}/include", crate_dir);
    std::fs::create_dir_all(&include_dir).expect("Unable to create include directory");

    let config = cbindgen::Config::from_file("cbindgen.toml")
        .unwrap_or_default();

    cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .with_language(cbindgen::Language::C)
        .with_include_guard("DT_TENSOR_H")
        .generate()
        .expect("Unable to generate C bindings")
        .write_to_file(format!("{}/dt_tensor.h", include_dir));
}
