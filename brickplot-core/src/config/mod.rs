//! Configuration types
//!
//! Plotter configuration comes from built-in defaults, from a TOML file
//! (see [`toml::parse_config`]) or from a postcard binary blob stored in
//! flash (see [`storage`]).

pub mod calibration;
#[cfg(feature = "serde")]
pub mod storage;
pub mod toml;
pub mod types;

pub use calibration::*;
pub use types::*;
