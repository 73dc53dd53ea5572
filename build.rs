//! Build script for the firmware. It generates the configuration constants from the JSON files in
//! `config/` and puts `memory.x` where the linker finds it.
//!
//! Host builds of the library (`cargo test`) need none of this, so the script only does its work
//! when the `firmware` feature is enabled.

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

/// UDP port for alarm messages when `alarm_config.json` does not name one
const DEFAULT_LISTEN_PORT: u64 = 4242;

fn main() {
    println!("cargo:rerun-if-changed=config");
    if env::var_os("CARGO_FEATURE_FIRMWARE").is_none() {
        return;
    }
    memory_x();
    wifi_secrets().unwrap();
    time_api_config().unwrap();
    alarm_config().unwrap();
}

/// Read `config/<name>`, or create it with `dummy` contents if it doesn't exist
fn read_config(name: &str, dummy: &str) -> serde_json::Value {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR environment variable not set");
    let config_dir = Path::new(&manifest_dir).join("config");
    let config_path = config_dir.join(name);
    let config_contents = if config_path.exists() {
        fs::read_to_string(&config_path).unwrap_or_else(|_| panic!("Could not read {name} file"))
    } else {
        println!("{name} not found, creating with dummy values");
        fs::create_dir_all(&config_dir).expect("Could not create config directory");
        fs::write(&config_path, dummy)
            .unwrap_or_else(|_| panic!("Could not write dummy {name} file"));
        dummy.to_string()
    };
    serde_json::from_str(&config_contents).unwrap_or_else(|_| panic!("Could not parse {name} file"))
}

/// Create a file in the output directory
fn out_file(name: &str) -> File {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
    File::create(Path::new(&out_dir).join(name))
        .unwrap_or_else(|_| panic!("Could not create {name} file"))
}

/// Generate `wifi_secrets.rs` from `wifi_config.json`
fn wifi_secrets() -> io::Result<()> {
    let config = read_config("wifi_config.json", r#"{"ssid":"dummy","password":"dummy"}"#);
    let ssid = config["ssid"]
        .as_str()
        .expect("ssid not found in wifi_config.json file");
    let password = config["password"]
        .as_str()
        .expect("password not found in wifi_config.json file");

    let mut f = out_file("wifi_secrets.rs");
    writeln!(f, "pub const SSID: &str = {ssid:?};")?;
    writeln!(f, "pub const PASSWORD: &str = {password:?};")?;
    Ok(())
}

/// Generate `time_api_config.rs` from `time_api.json`
fn time_api_config() -> io::Result<()> {
    let config = read_config(
        "time_api.json",
        r#"{"time api by zone":{"baseurl":"http://worldtimeapi.org/api","timezone":"/timezone/Etc/UTC"}}"#,
    );
    let baseurl = config["time api by zone"]["baseurl"]
        .as_str()
        .expect("baseurl not found in time_api.json file");
    let timezone = config["time api by zone"]["timezone"]
        .as_str()
        .expect("timezone not found in time_api.json file");

    // Combine baseurl and timezone into a single string for TIME_SERVER_URL
    let combined_url = format!("{baseurl}{timezone}");

    let mut f = out_file("time_api_config.rs");
    writeln!(f, "pub const TIME_SERVER_URL: &str = {combined_url:?};")?;
    Ok(())
}

/// Generate `alarm_config.rs` from `alarm_config.json`
fn alarm_config() -> io::Result<()> {
    let config = read_config(
        "alarm_config.json",
        &format!(r#"{{"listen_port":{DEFAULT_LISTEN_PORT}}}"#),
    );
    let port = config["listen_port"].as_u64().unwrap_or(DEFAULT_LISTEN_PORT);
    let port = u16::try_from(port).expect("listen_port in alarm_config.json is not a valid port");

    let mut f = out_file("alarm_config.rs");
    writeln!(f, "pub const ALARM_LISTEN_PORT: u16 = {port};")?;
    Ok(())
}

/// Handle the `memory.x` linker script
fn memory_x() {
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // only re-run the build script when `memory.x` is changed
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
