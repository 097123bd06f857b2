//! Build script for plumbline-daemon
//!
//! Validates the embedded plumbline.toml at compile time so a broken
//! default never ships inside the binary.

use std::fs;
use std::path::Path;

const SECTIONS: [&str; 5] = ["sensor", "actuator", "tracking", "jog", "logging"];
const ACCEL_RANGES: [&str; 4] = ["2g", "4g", "8g", "16g"];
const GYRO_RANGES: [&str; 4] = ["250dps", "500dps", "1000dps", "2000dps"];

fn main() {
    println!("cargo:rerun-if-changed=plumbline.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("plumbline.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read plumbline.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in plumbline.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let errors = validate(&config);
    if !errors.is_empty() {
        fail("Invalid plumbline.toml", &errors);
    }
}

fn validate(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(table) = config.as_table() {
        for key in table.keys() {
            if !SECTIONS.contains(&key.as_str()) {
                errors.push(format!("unknown section [{}]", key));
            }
        }
    }

    let get = |section: &str, key: &str| config.get(section).and_then(|s| s.get(key));

    if let Some(toml::Value::String(range)) = get("sensor", "accel_range") {
        if !ACCEL_RANGES.contains(&range.as_str()) {
            errors.push(format!("[sensor] accel_range must be one of {:?}", ACCEL_RANGES));
        }
    }
    if let Some(toml::Value::String(range)) = get("sensor", "gyro_range") {
        if !GYRO_RANGES.contains(&range.as_str()) {
            errors.push(format!("[sensor] gyro_range must be one of {:?}", GYRO_RANGES));
        }
    }

    let min = get("actuator", "min_pulse").and_then(toml::Value::as_integer);
    let max = get("actuator", "max_pulse").and_then(toml::Value::as_integer);
    if let (Some(min), Some(max)) = (min, max) {
        if min >= max {
            errors.push("[actuator] min_pulse must be below max_pulse".to_string());
        }
    }

    for key in ["connect_timeout_ms", "read_timeout_ms"] {
        if get("actuator", key).and_then(toml::Value::as_integer) == Some(0) {
            errors.push(format!("[actuator] {} must be non-zero", key));
        }
    }

    if let Some(tolerance) = get("tracking", "tolerance_deg").and_then(toml::Value::as_float) {
        if tolerance < 0.0 {
            errors.push("[tracking] tolerance_deg must be non-negative".to_string());
        }
    }

    errors
}

fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| format!("║  • {:<62} ║", line))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
