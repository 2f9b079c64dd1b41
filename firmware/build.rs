//! Build script of the Medibox firmware.
//!
//! Puts `memory.x` on the linker search path and turns the two json files in `config/` into
//! constants the firmware includes from `OUT_DIR`:
//! - `config/wifi_config.json` → `wifi_secrets.rs` with `SSID` and `PASSWORD`
//! - `config/time_api.json` → `time_api_config.rs` with `TIME_SERVER_URL`
//!
//! Missing json files are created with dummy values, the firmware then builds but cannot sync
//! its clock.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::print_stdout)]

use std::{
    env, fs,
    fs::File,
    io,
    io::Write,
    path::{Path, PathBuf},
};

fn main() {
    memory_x();
    wifi_secrets().unwrap();
    time_api_config().unwrap();
}

/// Read a json file from the `config` directory, creating it with `dummy` if it does not exist
fn read_config(file_name: &str, dummy: &str) -> serde_json::Value {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR environment variable not set");
    let config_dir = Path::new(&manifest_dir).join("config");
    let config_path = config_dir.join(file_name);
    println!("cargo:rerun-if-changed={}", config_path.display());

    let contents = if config_path.exists() {
        fs::read_to_string(&config_path).expect("Could not read config file")
    } else {
        println!("cargo:warning={file_name} not found, creating it with dummy values");
        fs::create_dir_all(&config_dir).expect("Could not create config directory");
        fs::write(&config_path, dummy).expect("Could not write dummy config file");
        dummy.to_string()
    };
    serde_json::from_str(&contents).expect("Could not parse config file")
}

/// Create a file in `OUT_DIR`
fn out_file(file_name: &str) -> File {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
    File::create(Path::new(&out_dir).join(file_name)).expect("Could not create output file")
}

/// Generate `wifi_secrets.rs` from `wifi_config.json`
fn wifi_secrets() -> io::Result<()> {
    let config = read_config("wifi_config.json", r#"{"ssid":"dummy","password":"dummy"}"#);
    let ssid = config["ssid"]
        .as_str()
        .expect("ssid not found in wifi_config.json");
    let password = config["password"]
        .as_str()
        .expect("password not found in wifi_config.json");

    let mut f = out_file("wifi_secrets.rs");
    writeln!(f, "/// Network the device joins for the startup time sync")?;
    writeln!(f, "pub const SSID: &str = {ssid:?};")?;
    writeln!(f, "/// WPA2 passphrase of [`SSID`]")?;
    writeln!(f, "pub const PASSWORD: &str = {password:?};")?;
    Ok(())
}

/// Generate `time_api_config.rs` from `time_api.json`
fn time_api_config() -> io::Result<()> {
    let config = read_config(
        "time_api.json",
        r#"{"baseurl":"http://worldtimeapi.org/api","path":"/timezone/Asia/Kolkata"}"#,
    );
    let baseurl = config["baseurl"]
        .as_str()
        .expect("baseurl not found in time_api.json");
    let path = config["path"]
        .as_str()
        .expect("path not found in time_api.json");
    let url = format!("{baseurl}{path}");

    let mut f = out_file("time_api_config.rs");
    writeln!(f, "/// Endpoint answering with a json object holding `unixtime`")?;
    writeln!(f, "pub const TIME_SERVER_URL: &str = {url:?};")?;
    Ok(())
}

/// Handle the `memory.x` linker script
fn memory_x() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
