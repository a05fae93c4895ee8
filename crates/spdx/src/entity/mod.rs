//! 엔티티 객체 파서 -- 파일, 패키지, 관계, 외부 참조, 생성 정보
//!
//! [`EntityRecord`] trait은 배열 원소 하나(JSON 객체 하나)를 소비해
//! 타입화된 레코드 하나를 만드는 파서가 구현해야 하는 인터페이스입니다.
//! 각 파서는 스트림 위치 하나에 묶인 단명/단회용이며:
//!
//! - 객체 시작 토큰을 읽고 (다른 토큰이면 구조적 에러)
//! - 프로퍼티 이름별로 값을 해석하거나, 알 수 없는 프로퍼티는 전방
//!   호환을 위해 통째로 건너뛰고
//! - 객체가 닫힌 뒤 엔티티별 필수 필드 검증을 수행합니다. 실패 시
//!   누락 필드 전부를 쉼표로 연결한 구조적 에러를 반환합니다.
//!
//! 열거형 값 프로퍼티(관계 타입, 체크섬 알고리즘)는 알 수 없는 값을
//! 기본값으로 보정하지 않고 값과 오프셋을 담은 구조적 에러가 됩니다.

pub mod creation;
pub mod external_ref;
pub mod file;
pub mod package;
pub mod relationship;

use std::io::Read;

use crate::error::SpdxParseError;
use crate::reader::JsonCursor;
use crate::types::{Checksum, ChecksumAlgorithm};

/// 엔티티 파서 공유 설정
///
/// 파사드 생성 시점에 한 번 만들어져 불변으로 전달됩니다.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// 파일 레코드가 반드시 포함해야 하는 체크섬 알고리즘 집합
    pub required_file_algorithms: Vec<ChecksumAlgorithm>,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self {
            required_file_algorithms: vec![ChecksumAlgorithm::Sha1, ChecksumAlgorithm::Sha256],
        }
    }
}

/// 배열 원소 하나를 소비해 레코드 하나를 만드는 파서 인터페이스
pub trait EntityRecord: Sized {
    /// 에러 메시지와 로그에 쓰는 엔티티 이름
    const ENTITY: &'static str;

    /// 커서가 가리키는 JSON 객체 하나를 소비해 레코드를 만듭니다.
    ///
    /// 진입 시 커서는 여는 `{` 앞(공백 허용)에 있어야 하며, 반환 시
    /// 닫는 `}` 직후에 있습니다.
    fn parse_object<R: Read>(
        cursor: &mut JsonCursor<R>,
        ctx: &ParseContext,
    ) -> Result<Self, SpdxParseError>;
}

/// 누락 필드 목록을 쉼표로 연결한 구조적 에러를 만듭니다.
pub(crate) fn missing_fields_error(offset: u64, entity: &str, missing: &[&str]) -> SpdxParseError {
    SpdxParseError::Structural {
        offset,
        reason: format!("{entity} missing required fields: {}", missing.join(", ")),
    }
}

/// 문자열 배열 하나를 읽습니다.
pub(crate) fn read_string_array<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<Vec<String>, SpdxParseError> {
    cursor.expect_array_start()?;
    let mut items = Vec::new();
    let mut first = true;
    while cursor.array_next_element(first)? {
        first = false;
        items.push(cursor.read_string()?);
    }
    Ok(items)
}

/// 알고리즘 문자열을 파싱합니다. 알 수 없는 값은 구조적 에러입니다.
pub(crate) fn parse_algorithm<R: Read>(
    cursor: &JsonCursor<R>,
    raw: &str,
) -> Result<ChecksumAlgorithm, SpdxParseError> {
    ChecksumAlgorithm::parse(raw).ok_or_else(|| SpdxParseError::Structural {
        offset: cursor.offset(),
        reason: format!("unknown checksum algorithm '{raw}'"),
    })
}

/// 체크섬 객체 하나를 읽습니다.
///
/// SPDX 2.x의 `checksumValue`와 3.0의 `hashValue` 표기를 모두
/// 받아들입니다.
pub(crate) fn read_checksum<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<Checksum, SpdxParseError> {
    cursor.expect_object_start()?;
    let mut algorithm = None;
    let mut value = None;
    let mut first = true;
    while let Some(key) = cursor.next_object_key(first)? {
        first = false;
        match key.as_str() {
            "algorithm" => {
                let raw = cursor.read_string()?;
                algorithm = Some(parse_algorithm(cursor, &raw)?);
            }
            "checksumValue" | "hashValue" => value = Some(cursor.read_string()?),
            _ => cursor.skip_value()?,
        }
    }
    match (algorithm, value) {
        (Some(algorithm), Some(value)) => Ok(Checksum { algorithm, value }),
        (algorithm, value) => {
            let mut missing = Vec::new();
            if algorithm.is_none() {
                missing.push("algorithm");
            }
            if value.is_none() {
                missing.push("checksumValue");
            }
            Err(missing_fields_error(cursor.offset(), "checksum", &missing))
        }
    }
}

/// 체크섬 객체 배열을 읽습니다.
pub(crate) fn read_checksum_array<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<Vec<Checksum>, SpdxParseError> {
    cursor.expect_array_start()?;
    let mut checksums = Vec::new();
    let mut first = true;
    while cursor.array_next_element(first)? {
        first = false;
        checksums.push(read_checksum(cursor)?);
    }
    Ok(checksums)
}
