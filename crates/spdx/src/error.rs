//! SPDX 파서 에러 타입
//!
//! [`SpdxParseError`]는 스트리밍 파서 내에서 발생할 수 있는 모든 에러를
//! 나타냅니다. `From<SpdxParseError> for SbomStreamError` 구현을 통해
//! `?` 연산자로 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **설정**: `Config` -- 생성 시점에 즉시 보고, 파스 루프로 미루지 않음
//! - **구조적 파싱 실패**: `Structural` -- 잘못된 토큰, 필수 필드 누락,
//!   알 수 없는 열거형 값, JSON 문법 오류. 바이트 오프셋 포함
//! - **입력 잘림**: `UnexpectedEof` -- 구조적으로 더 많은 바이트가 필요한
//!   지점에서 스트림이 끝남 (최상위 객체의 정상 종료와 구분됨)
//! - **호출 규약 위반**: `Usage` -- 잘못된 입력이 아닌 잘못된 호출 순서
//! - **파일 I/O**: `Io`
//!
//! 컴플라이언스 위반은 에러가 아니라 수집 데이터입니다.
//! [`InvalidElementInfo`](crate::compliance::InvalidElementInfo)를 참조하세요.

use sbomstream_core::error::{SbomError, SbomStreamError};

/// SPDX 스트리밍 파서 도메인 에러
///
/// # 에러 변환
///
/// `From<SpdxParseError> for SbomStreamError` 구현으로
/// 워크스페이스 최상위 에러 타입으로 자동 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum SpdxParseError {
    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 구조적 파싱 실패
    #[error("structural parse error at offset {offset}: {reason}")]
    Structural {
        /// 실패 시점의 스트림 바이트 오프셋
        offset: u64,
        /// 실패 사유 (기대한 토큰, 누락 필드 목록 등)
        reason: String,
    },

    /// 구조적으로 더 많은 바이트가 필요한 지점에서 스트림이 끝남
    #[error("unexpected end of stream at offset {offset}")]
    UnexpectedEof {
        /// 스트림이 끝난 시점의 바이트 오프셋
        offset: u64,
    },

    /// 호출 규약 위반
    #[error("usage error: {0}")]
    Usage(String),

    /// SBOM 문서 생성 실패 (직렬화 측)
    #[error("generation error: {0}")]
    Generation(String),

    /// 스트림 읽기 실패
    #[error("io error at offset {offset}: {source}")]
    Io {
        /// 실패 시점의 스트림 바이트 오프셋
        offset: u64,
        /// 원본 I/O 에러
        source: std::io::Error,
    },
}

impl From<SpdxParseError> for SbomStreamError {
    fn from(err: SpdxParseError) -> Self {
        match err {
            SpdxParseError::Config { field, reason } => {
                SbomStreamError::Config(sbomstream_core::error::ConfigError::InvalidValue {
                    field,
                    reason,
                })
            }
            SpdxParseError::Structural { offset, reason } => SbomStreamError::Sbom(
                SbomError::ParseFailed(format!("at offset {offset}: {reason}")),
            ),
            SpdxParseError::UnexpectedEof { offset } => SbomStreamError::Sbom(
                SbomError::Truncated(format!("stream ended at offset {offset}")),
            ),
            SpdxParseError::Usage(msg) => SbomStreamError::Sbom(SbomError::Usage(msg)),
            SpdxParseError::Generation(msg) => {
                SbomStreamError::Sbom(SbomError::Generation(msg))
            }
            SpdxParseError::Io { source, .. } => SbomStreamError::Io(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = SpdxParseError::Config {
            field: "buffer_size".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("buffer_size"));
        assert!(msg.contains("greater than 0"));
    }

    #[test]
    fn structural_error_includes_offset() {
        let err = SpdxParseError::Structural {
            offset: 1234,
            reason: "expected object start '{'".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1234"));
        assert!(msg.contains("object start"));
    }

    #[test]
    fn unexpected_eof_display() {
        let err = SpdxParseError::UnexpectedEof { offset: 77 };
        let msg = err.to_string();
        assert!(msg.contains("unexpected end of stream"));
        assert!(msg.contains("77"));
    }

    #[test]
    fn usage_error_display() {
        let err = SpdxParseError::Usage("metadata requested before parse completed".to_owned());
        assert!(err.to_string().contains("usage error"));
    }

    #[test]
    fn converts_to_core_parse_failed() {
        let err = SpdxParseError::Structural {
            offset: 9,
            reason: "bad".to_owned(),
        };
        let core_err: SbomStreamError = err.into();
        assert!(matches!(
            core_err,
            SbomStreamError::Sbom(SbomError::ParseFailed(_))
        ));
    }

    #[test]
    fn converts_to_core_truncated() {
        let err = SpdxParseError::UnexpectedEof { offset: 3 };
        let core_err: SbomStreamError = err.into();
        assert!(matches!(
            core_err,
            SbomStreamError::Sbom(SbomError::Truncated(_))
        ));
    }

    #[test]
    fn converts_to_core_usage() {
        let err = SpdxParseError::Usage("bad call order".to_owned());
        let core_err: SbomStreamError = err.into();
        assert!(matches!(core_err, SbomStreamError::Sbom(SbomError::Usage(_))));
    }

    #[test]
    fn converts_to_core_config() {
        let err = SpdxParseError::Config {
            field: "x".to_owned(),
            reason: "y".to_owned(),
        };
        let core_err: SbomStreamError = err.into();
        assert!(matches!(core_err, SbomStreamError::Config(_)));
    }

    #[test]
    fn converts_to_core_io() {
        let err = SpdxParseError::Io {
            offset: 0,
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"),
        };
        let core_err: SbomStreamError = err.into();
        assert!(matches!(core_err, SbomStreamError::Io(_)));
    }
}
