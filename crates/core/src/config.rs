//! 설정 관리 — sbomstream.toml 파싱 및 런타임 설정
//!
//! [`SbomStreamConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`SBOMSTREAM_PARSER_BUFFER_SIZE=65536` 형식)
//! 2. 설정 파일 (`sbomstream.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```
//! use sbomstream_core::config::SbomStreamConfig;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SbomStreamConfig::parse("[parser]\nbuffer_size = 65536").unwrap();
//! assert_eq!(config.parser.buffer_size, 65536);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SbomStreamError};

/// sbomstream 통합 설정
///
/// `sbomstream.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SbomStreamConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스트리밍 파서 설정
    #[serde(default)]
    pub parser: ParserSettings,
}

impl SbomStreamConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SbomStreamError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SbomStreamError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SbomStreamError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SbomStreamError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SbomStreamError> {
        toml::from_str(toml_str).map_err(|e| {
            SbomStreamError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SBOMSTREAM_{SECTION}_{FIELD}`
    /// 예: `SBOMSTREAM_PARSER_BUFFER_SIZE=65536`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SBOMSTREAM_GENERAL_LOG_LEVEL");
        override_string(
            &mut self.general.log_format,
            "SBOMSTREAM_GENERAL_LOG_FORMAT",
        );

        // Parser
        override_usize(
            &mut self.parser.buffer_size,
            "SBOMSTREAM_PARSER_BUFFER_SIZE",
        );
        override_usize(
            &mut self.parser.max_buffer_size,
            "SBOMSTREAM_PARSER_MAX_BUFFER_SIZE",
        );
        override_bool(
            &mut self.parser.require_root_fields,
            "SBOMSTREAM_PARSER_REQUIRE_ROOT_FIELDS",
        );
        override_string(
            &mut self.parser.compliance_standard,
            "SBOMSTREAM_PARSER_COMPLIANCE_STANDARD",
        );
        override_csv(
            &mut self.parser.skipped_properties,
            "SBOMSTREAM_PARSER_SKIPPED_PROPERTIES",
        );
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SbomStreamError> {
        self.general.validate()?;
        self.parser.validate()?;
        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 출력 형식 (plain, json)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "plain".to_owned(),
        }
    }
}

impl GeneralConfig {
    fn validate(&self) -> Result<(), SbomStreamError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.as_str()) {
            return Err(SbomStreamError::Config(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of {LEVELS:?}"),
            }));
        }
        const FORMATS: [&str; 2] = ["plain", "json"];
        if !FORMATS.contains(&self.log_format.as_str()) {
            return Err(SbomStreamError::Config(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of {FORMATS:?}"),
            }));
        }
        Ok(())
    }
}

/// 버퍼 크기 상한값 상수
const MAX_BUFFER_SIZE_LIMIT: usize = 1024 * 1024 * 1024; // 1 GiB

/// 스트리밍 파서 설정
///
/// `sbomstream-spdx` 크레이트의 `ParserOptions::from_core`가
/// 이 섹션을 읽어 파서 고유 옵션으로 변환합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// 읽기 선행 버퍼 초기 크기 (바이트)
    pub buffer_size: usize,
    /// 버퍼 확장 상한 (바이트). 단일 토큰이 이 크기를 넘으면 파싱 실패
    pub max_buffer_size: usize,
    /// 필수 최상위 필드 검증 여부 (테스트/진단용으로만 비활성화)
    pub require_root_fields: bool,
    /// 컴플라이언스 표준 선택자 (예: "NTIA", 빈 문자열이면 비활성)
    pub compliance_standard: String,
    /// 스트리밍/수집 대신 건너뛸 최상위 필드 목록
    pub skipped_properties: Vec<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            buffer_size: 32 * 1024,             // 32 KiB
            max_buffer_size: 64 * 1024 * 1024,  // 64 MiB
            require_root_fields: true,
            compliance_standard: String::new(),
            skipped_properties: Vec::new(),
        }
    }
}

impl ParserSettings {
    fn validate(&self) -> Result<(), SbomStreamError> {
        if self.buffer_size == 0 {
            return Err(SbomStreamError::Config(ConfigError::InvalidValue {
                field: "parser.buffer_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }));
        }
        if self.max_buffer_size < self.buffer_size {
            return Err(SbomStreamError::Config(ConfigError::InvalidValue {
                field: "parser.max_buffer_size".to_owned(),
                reason: "must be greater than or equal to buffer_size".to_owned(),
            }));
        }
        if self.max_buffer_size > MAX_BUFFER_SIZE_LIMIT {
            return Err(SbomStreamError::Config(ConfigError::InvalidValue {
                field: "parser.max_buffer_size".to_owned(),
                reason: format!("must be at most {MAX_BUFFER_SIZE_LIMIT}"),
            }));
        }
        Ok(())
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = value;
    }
}

fn override_bool(target: &mut bool, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" => *target = true,
            "false" | "0" | "no" => *target = false,
            _ => tracing::warn!(var, value = %value, "ignoring invalid boolean env override"),
        }
    }
}

fn override_usize(target: &mut usize, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(var, value = %value, "ignoring invalid integer env override"),
        }
    }
}

fn override_csv(target: &mut Vec<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }
}
