//! Scanner configuration
//!
//! `compile_time` holds the limits build.rs generated from
//! `config/<profile>.toml`; `runtime` holds user preferences.

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Which build profile produced `compile_time`
pub mod build_info {
    pub fn profile() -> &'static str {
        option_env!("SQLSCAN_BUILD_PROFILE").unwrap_or("development")
    }

    pub fn config_dir() -> &'static str {
        option_env!("SQLSCAN_CONFIG_DIR").unwrap_or("config")
    }

    /// `config/development.toml` style path of the profile file
    pub fn profile_file() -> String {
        format!("{}/{}.toml", config_dir(), profile())
    }
}
