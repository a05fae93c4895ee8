//! 파서 옵션
//!
//! [`ParserOptions`]는 core의
//! [`ParserSettings`](sbomstream_core::config::ParserSettings)를 파서
//! 고유 타입(컴플라이언스 표준, 체크섬 알고리즘)으로 해석한 설정입니다.
//!
//! # 사용 예시
//!
//! ```
//! use sbomstream_spdx::ParserOptions;
//!
//! // 기본값으로 생성
//! let options = ParserOptions::default();
//! options.validate().unwrap();
//!
//! // 빌더로 생성
//! use sbomstream_spdx::ParserOptionsBuilder;
//!
//! let options = ParserOptionsBuilder::new()
//!     .buffer_size(64 * 1024)
//!     .skip_property("files")
//!     .build()
//!     .unwrap();
//! ```

use tracing::warn;

use sbomstream_core::config::ParserSettings;

use crate::compliance::ComplianceStandard;
use crate::error::SpdxParseError;
use crate::types::ChecksumAlgorithm;

/// 읽기 선행 버퍼 기본 크기
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;
/// 버퍼 확장 기본 상한
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// 스트리밍 파서 옵션
///
/// # 필드
///
/// - **buffer_size**: 읽기 선행 버퍼 초기 크기 (0이면 생성 시점 설정 에러)
/// - **max_buffer_size**: 버퍼 확장 상한. 단일 토큰이 이보다 크면
///   구조적 파싱 에러 (적대적 입력에 대한 메모리 상한)
/// - **require_root_fields**: 필수 최상위 필드 검증 여부
///   (테스트/진단용으로만 비활성화)
/// - **compliance**: 컴플라이언스 표준. 수집되는 위반 종류에만 영향을
///   주며 구조적 필수 필드에는 영향을 주지 않음
/// - **skipped_properties**: 스트리밍/수집 대신 버릴 최상위 필드 목록
/// - **required_file_algorithms**: 파일 레코드가 반드시 포함해야 하는
///   체크섬 알고리즘 집합
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// 읽기 선행 버퍼 초기 크기 (바이트)
    pub buffer_size: usize,
    /// 버퍼 확장 상한 (바이트)
    pub max_buffer_size: usize,
    /// 필수 최상위 필드 검증 여부
    pub require_root_fields: bool,
    /// 컴플라이언스 표준 (None이면 비활성)
    pub compliance: Option<ComplianceStandard>,
    /// 건너뛸 최상위 필드 목록
    pub skipped_properties: Vec<String>,
    /// 파일 레코드 필수 체크섬 알고리즘
    pub required_file_algorithms: Vec<ChecksumAlgorithm>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            require_root_fields: true,
            compliance: None,
            skipped_properties: Vec::new(),
            required_file_algorithms: vec![ChecksumAlgorithm::Sha1, ChecksumAlgorithm::Sha256],
        }
    }
}

impl ParserOptions {
    /// core의 `ParserSettings`에서 파서 옵션을 생성합니다.
    ///
    /// 알 수 없는 컴플라이언스 표준 문자열은 경고 후 비활성으로
    /// 처리됩니다.
    pub fn from_core(core: &ParserSettings) -> Self {
        let compliance = if core.compliance_standard.is_empty() {
            None
        } else {
            let parsed = ComplianceStandard::from_str_loose(&core.compliance_standard);
            if parsed.is_none() {
                warn!(
                    standard = %core.compliance_standard,
                    "unknown compliance standard, running without compliance checks"
                );
            }
            parsed
        };

        Self {
            buffer_size: core.buffer_size,
            max_buffer_size: core.max_buffer_size,
            require_root_fields: core.require_root_fields,
            compliance,
            skipped_properties: core.skipped_properties.clone(),
            ..Self::default()
        }
    }

    /// 옵션 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `buffer_size`: 0보다 커야 함
    /// - `max_buffer_size`: `buffer_size` 이상이어야 함
    pub fn validate(&self) -> Result<(), SpdxParseError> {
        if self.buffer_size == 0 {
            return Err(SpdxParseError::Config {
                field: "buffer_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if self.max_buffer_size < self.buffer_size {
            return Err(SpdxParseError::Config {
                field: "max_buffer_size".to_owned(),
                reason: "must be greater than or equal to buffer_size".to_owned(),
            });
        }
        Ok(())
    }
}

/// [`ParserOptions`] 빌더
///
/// 유연한 옵션 구성 및 빌드 시 유효성 검증을 제공합니다.
#[derive(Default)]
pub struct ParserOptionsBuilder {
    options: ParserOptions,
}

impl ParserOptionsBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 읽기 선행 버퍼 초기 크기를 설정합니다.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.options.buffer_size = size;
        self
    }

    /// 버퍼 확장 상한을 설정합니다.
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.options.max_buffer_size = size;
        self
    }

    /// 필수 최상위 필드 검증 여부를 설정합니다.
    pub fn require_root_fields(mut self, require: bool) -> Self {
        self.options.require_root_fields = require;
        self
    }

    /// 컴플라이언스 표준을 설정합니다.
    pub fn compliance(mut self, standard: ComplianceStandard) -> Self {
        self.options.compliance = Some(standard);
        self
    }

    /// 건너뛸 최상위 필드를 추가합니다.
    pub fn skip_property(mut self, name: impl Into<String>) -> Self {
        self.options.skipped_properties.push(name.into());
        self
    }

    /// 파일 레코드 필수 체크섬 알고리즘을 설정합니다.
    pub fn required_file_algorithms(mut self, algorithms: Vec<ChecksumAlgorithm>) -> Self {
        self.options.required_file_algorithms = algorithms;
        self
    }

    /// 옵션을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `SpdxParseError::Config` 반환
    pub fn build(self) -> Result<ParserOptions, SpdxParseError> {
        self.options.validate()?;
        Ok(self.options)
    }
}
