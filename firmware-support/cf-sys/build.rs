// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use std::{env, error::Error, path::PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=csrc/firmware_apis_shim.c");
    println!("cargo:rerun-if-env-changed=FIRMWARE_APIS_DIR");

    // Host builds use the simulated management SoC only.
    if env::var("CARGO_FEATURE_CARAVEL").is_err() {
        return Ok(());
    }

    let apis_dir = PathBuf::from(env::var("FIRMWARE_APIS_DIR")?);

    cc::Build::new()
        .file("csrc/firmware_apis_shim.c")
        .include(&apis_dir)
        .flag("-march=rv32imc")
        .flag("-mabi=ilp32")
        .flag("-Os")
        .flag("-ffreestanding")
        .flag("-ffunction-sections")
        .flag("-fdata-sections")
        .compile("firmware_apis_shim");

    Ok(())
}
