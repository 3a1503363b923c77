// build.rs - scanner limits from config/<profile>.toml, emitted as `compile_time` constants
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(serde::Deserialize)]
struct Profile {
    scanner: ScannerLimits,
    input: InputLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct ScannerLimits {
    max_rules: usize,
    max_delimiter_length: usize,
    max_delimiters: usize,
    max_tokens_per_scan: usize,
    max_dialect_words: usize,
}

#[derive(serde::Deserialize)]
struct InputLimits {
    max_script_size: u64,
    max_dialect_file_size: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    memory_logger_capacity: usize,
}

const HARD_SCRIPT_CEILING: u64 = 1_000_000_000;
const PRODUCTION_SCRIPT_CEILING: u64 = 200_000_000;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SQLSCAN_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=SQLSCAN_CONFIG_DIR");

    let profile = env::var("SQLSCAN_BUILD_PROFILE").unwrap_or_else(|_| "development".into());
    let path = profile_path(&profile);
    println!("cargo:rerun-if-changed={}", path.display());

    let text = fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "cannot read build profile {} ({}); set SQLSCAN_BUILD_PROFILE or SQLSCAN_CONFIG_DIR",
            path.display(),
            e
        )
    });
    let limits: Profile = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("{} is not a valid profile: {}", path.display(), e));

    if let Err(problem) = check(&limits, &profile) {
        panic!("{}: {}", path.display(), problem);
    }

    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out.join("constants.rs"), render(&limits, &profile))
        .expect("failed to write constants.rs");
}

/// Profiles live in `<workspace>/<SQLSCAN_CONFIG_DIR or config>/<profile>.toml`
fn profile_path(profile: &str) -> PathBuf {
    let manifest = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let workspace = Path::new(&manifest)
        .parent()
        .expect("sql_scanner sits inside the workspace");
    let dir = env::var("SQLSCAN_CONFIG_DIR").unwrap_or_else(|_| "config".into());
    workspace.join(dir).join(format!("{}.toml", profile))
}

fn check(limits: &Profile, profile: &str) -> Result<(), String> {
    let scanner = &limits.scanner;
    if scanner.max_rules == 0 || scanner.max_tokens_per_scan == 0 {
        return Err("max_rules and max_tokens_per_scan must be positive".into());
    }
    if scanner.max_delimiter_length == 0 || scanner.max_delimiters == 0 {
        return Err("delimiter limits must be positive".into());
    }
    if limits.input.max_script_size > HARD_SCRIPT_CEILING {
        return Err(format!("max_script_size above {}", HARD_SCRIPT_CEILING));
    }
    if profile == "production" && limits.input.max_script_size > PRODUCTION_SCRIPT_CEILING {
        return Err(format!(
            "production max_script_size above {}",
            PRODUCTION_SCRIPT_CEILING
        ));
    }
    let logging = &limits.logging;
    if logging.memory_logger_capacity == 0
        || logging.memory_logger_capacity > logging.log_buffer_size
    {
        return Err("memory_logger_capacity must be in 1..=log_buffer_size".into());
    }
    Ok(())
}

fn render(limits: &Profile, profile: &str) -> String {
    let sections: [(&str, Vec<(&str, &str, String)>); 3] = [
        (
            "scanner",
            vec![
                ("MAX_RULES", "usize", limits.scanner.max_rules.to_string()),
                ("MAX_DELIMITER_LENGTH", "usize", limits.scanner.max_delimiter_length.to_string()),
                ("MAX_DELIMITERS", "usize", limits.scanner.max_delimiters.to_string()),
                ("MAX_TOKENS_PER_SCAN", "usize", limits.scanner.max_tokens_per_scan.to_string()),
                ("MAX_DIALECT_WORDS", "usize", limits.scanner.max_dialect_words.to_string()),
            ],
        ),
        (
            "input",
            vec![
                ("MAX_SCRIPT_SIZE", "u64", limits.input.max_script_size.to_string()),
                ("MAX_DIALECT_FILE_SIZE", "u64", limits.input.max_dialect_file_size.to_string()),
            ],
        ),
        (
            "logging",
            vec![
                ("LOG_BUFFER_SIZE", "usize", limits.logging.log_buffer_size.to_string()),
                ("MAX_LOG_MESSAGE_LENGTH", "usize", limits.logging.max_log_message_length.to_string()),
                ("MEMORY_LOGGER_CAPACITY", "usize", limits.logging.memory_logger_capacity.to_string()),
            ],
        ),
    ];

    let mut code = format!("// Generated by build.rs from the `{}` profile\n\npub mod compile_time {{\n", profile);
    for (module, constants) in sections {
        let _ = writeln!(code, "    pub mod {} {{", module);
        for (name, ty, value) in constants {
            let _ = writeln!(code, "        pub const {}: {} = {};", name, ty, value);
        }
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    code
}
