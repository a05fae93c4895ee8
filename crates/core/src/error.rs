//! 에러 타입 — 도메인별 에러 정의
//!
//! [`SbomStreamError`]는 워크스페이스 전체의 최상위 에러 타입입니다.
//! 각 멤버 크레이트는 자기 도메인 에러를 정의하고
//! `From<도메인 에러> for SbomStreamError` 구현으로 `?` 연산자를 통해
//! 자연스럽게 전파합니다.

/// sbomstream 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SbomStreamError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// SBOM 문서 처리 에러
    #[error("sbom error: {0}")]
    Sbom(#[from] SbomError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// SBOM 문서 처리 에러
///
/// 멤버 크레이트의 구조적 파싱 에러, 입력 잘림, 호출 규약 위반이
/// 이 타입으로 수렴합니다.
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
    /// 문서가 기대한 JSON/SPDX 형태가 아님
    #[error("parse failed: {0}")]
    ParseFailed(String),

    /// 구조적으로 더 많은 바이트가 필요한 지점에서 스트림이 끝남
    #[error("unexpected end of stream: {0}")]
    Truncated(String),

    /// SBOM 문서 생성 실패
    #[error("generation failed: {0}")]
    Generation(String),

    /// 호출자 규약 위반 (잘못된 입력이 아닌 잘못된 사용)
    #[error("usage error: {0}")]
    Usage(String),
}
