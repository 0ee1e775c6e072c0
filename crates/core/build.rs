use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    // The introspection shim is only compiled when it is linked into the crate
    #[cfg(feature = "bundled-shim")]
    build_shim()?;

    Ok(())
}

#[cfg(feature = "bundled-shim")]
fn build_shim() -> Result<(), Box<dyn Error>> {
    const SHIM_SOURCE: &str = "native/vipsgen_introspect.c";
    const SHIM_HEADER: &str = "native/vipsgen_introspect.h";

    println!("cargo:rerun-if-changed={SHIM_SOURCE}");
    println!("cargo:rerun-if-changed={SHIM_HEADER}");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");

    // Emits the link flags for libvips and glib
    let vips = pkg_config::Config::new()
        .atleast_version("8.10")
        .probe("vips")?;

    let mut build = cc::Build::new();
    build.file(SHIM_SOURCE).include("native").warnings(false);
    for path in &vips.include_paths {
        build.include(path);
    }
    build.try_compile("vipsgen_introspect")?;

    Ok(())
}
