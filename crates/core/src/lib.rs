#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 최상위 에러 타입 (`SbomStreamError`, `ConfigError`, `SbomError`)
//! - [`config`]: 통합 설정 (`SbomStreamConfig`, TOML 파싱 + 환경변수 오버라이드)

pub mod config;
pub mod error;

// --- Public API Re-exports ---

pub use config::{GeneralConfig, ParserSettings, SbomStreamConfig};
pub use error::{ConfigError, SbomError, SbomStreamError};
