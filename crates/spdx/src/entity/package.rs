//! 패키지 엔티티 파서
//!
//! SPDX 2.x `packages` 배열의 객체 하나를 [`PackageRecord`]로
//! 파싱합니다. 필수 필드는 `name` 하나뿐이며, 검증 코드의 SHA-256
//! 포함 여부 같은 컴플라이언스 성격의 검사는 여기서 하지 않습니다
//! (NTIA 검사는 수집형이므로 컴플라이언스 계층이 담당).

use std::io::Read;

use crate::entity::{
    EntityRecord, ParseContext, missing_fields_error, read_checksum_array, read_string_array,
};
use crate::error::SpdxParseError;
use crate::reader::JsonCursor;
use crate::types::{Checksum, ChecksumAlgorithm, ExternalRef, PackageRecord, PackageVerificationCode};

impl EntityRecord for PackageRecord {
    const ENTITY: &'static str = "package";

    fn parse_object<R: Read>(
        cursor: &mut JsonCursor<R>,
        _ctx: &ParseContext,
    ) -> Result<Self, SpdxParseError> {
        cursor.expect_object_start()?;

        let mut record = PackageRecord::default();
        let mut name: Option<String> = None;

        let mut first = true;
        while let Some(key) = cursor.next_object_key(first)? {
            first = false;
            match key.as_str() {
                "name" => name = Some(cursor.read_string()?),
                "SPDXID" => record.spdx_id = Some(cursor.read_string()?),
                "versionInfo" => record.version = Some(cursor.read_string()?),
                "downloadLocation" => record.download_location = Some(cursor.read_string()?),
                "supplier" => record.supplier = Some(cursor.read_string()?),
                "licenseConcluded" => record.license_concluded = Some(cursor.read_string()?),
                "licenseDeclared" => record.license_declared = Some(cursor.read_string()?),
                "copyrightText" => record.copyright_text = Some(cursor.read_string()?),
                "checksums" => record.checksums = read_checksum_array(cursor)?,
                "externalRefs" => record.external_refs = read_external_refs(cursor)?,
                "packageVerificationCode" => {
                    record.verification_code = Some(read_verification_code(cursor)?);
                }
                "hasFiles" => record.has_files = read_string_array(cursor)?,
                "filesAnalyzed" => record.files_analyzed = Some(cursor.read_bool()?),
                _ => cursor.skip_value()?,
            }
        }

        let Some(name) = name else {
            return Err(missing_fields_error(cursor.offset(), Self::ENTITY, &["name"]));
        };
        record.name = name;
        Ok(record)
    }
}

/// `externalRefs` 배열을 읽습니다.
fn read_external_refs<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<Vec<ExternalRef>, SpdxParseError> {
    cursor.expect_array_start()?;
    let mut refs = Vec::new();
    let mut first = true;
    while cursor.array_next_element(first)? {
        first = false;
        refs.push(read_external_ref(cursor)?);
    }
    Ok(refs)
}

fn read_external_ref<R: Read>(cursor: &mut JsonCursor<R>) -> Result<ExternalRef, SpdxParseError> {
    cursor.expect_object_start()?;
    let mut category = None;
    let mut ref_type = None;
    let mut locator = None;
    let mut first = true;
    while let Some(key) = cursor.next_object_key(first)? {
        first = false;
        match key.as_str() {
            "referenceCategory" => category = Some(cursor.read_string()?),
            "referenceType" => ref_type = Some(cursor.read_string()?),
            "referenceLocator" => locator = Some(cursor.read_string()?),
            _ => cursor.skip_value()?,
        }
    }
    match (category, ref_type, locator) {
        (Some(category), Some(ref_type), Some(locator)) => Ok(ExternalRef {
            category,
            ref_type,
            locator,
        }),
        (category, ref_type, locator) => {
            let mut missing = Vec::new();
            if category.is_none() {
                missing.push("referenceCategory");
            }
            if ref_type.is_none() {
                missing.push("referenceType");
            }
            if locator.is_none() {
                missing.push("referenceLocator");
            }
            Err(missing_fields_error(
                cursor.offset(),
                "externalRef",
                &missing,
            ))
        }
    }
}

/// `packageVerificationCode` 객체를 읽습니다.
///
/// SPDX 2.x의 단일 값(`packageVerificationCodeValue`, SHA-1 해시)을
/// 통합 체크섬 목록 형태로 변환합니다.
fn read_verification_code<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<PackageVerificationCode, SpdxParseError> {
    cursor.expect_object_start()?;
    let mut value = None;
    let mut excluded_files = Vec::new();
    let mut first = true;
    while let Some(key) = cursor.next_object_key(first)? {
        first = false;
        match key.as_str() {
            "packageVerificationCodeValue" => value = Some(cursor.read_string()?),
            "packageVerificationCodeExcludedFiles" => {
                excluded_files = read_string_array(cursor)?;
            }
            _ => cursor.skip_value()?,
        }
    }
    let Some(value) = value else {
        return Err(missing_fields_error(
            cursor.offset(),
            "packageVerificationCode",
            &["packageVerificationCodeValue"],
        ));
    };
    Ok(PackageVerificationCode {
        checksums: vec![Checksum::new(ChecksumAlgorithm::Sha1, value)],
        excluded_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::test_support::cursor;

    const FULL_PACKAGE: &str = r#"{
        "name": "serde",
        "SPDXID": "SPDXRef-Package-serde",
        "versionInfo": "1.0.204",
        "downloadLocation": "https://crates.io/crates/serde",
        "supplier": "Organization: serde-rs",
        "licenseConcluded": "MIT OR Apache-2.0",
        "licenseDeclared": "MIT OR Apache-2.0",
        "copyrightText": "NOASSERTION",
        "checksums": [{"algorithm": "SHA256", "checksumValue": "abc"}],
        "externalRefs": [{
            "referenceCategory": "PACKAGE-MANAGER",
            "referenceType": "purl",
            "referenceLocator": "pkg:cargo/serde@1.0.204"
        }],
        "packageVerificationCode": {
            "packageVerificationCodeValue": "d6a770ba38583ed4bb4525bd96e50461655d2758",
            "packageVerificationCodeExcludedFiles": ["./package.spdx"]
        },
        "hasFiles": ["SPDXRef-File-0"],
        "filesAnalyzed": true
    }"#;

    #[test]
    fn parse_full_package() {
        let mut c = cursor(FULL_PACKAGE);
        let package = PackageRecord::parse_object(&mut c, &ParseContext::default()).unwrap();
        assert_eq!(package.name, "serde");
        assert_eq!(package.version.as_deref(), Some("1.0.204"));
        assert_eq!(package.supplier.as_deref(), Some("Organization: serde-rs"));
        assert_eq!(package.purl(), Some("pkg:cargo/serde@1.0.204"));
        assert_eq!(package.has_files, vec!["SPDXRef-File-0"]);
        assert_eq!(package.files_analyzed, Some(true));

        let code = package.verification_code.unwrap();
        assert!(code.has_algorithm(ChecksumAlgorithm::Sha1));
        assert_eq!(code.excluded_files, vec!["./package.spdx"]);
    }

    #[test]
    fn parse_minimal_package() {
        let mut c = cursor(r#"{"name": "lone"}"#);
        let package = PackageRecord::parse_object(&mut c, &ParseContext::default()).unwrap();
        assert_eq!(package.name, "lone");
        assert!(package.version.is_none());
        assert!(package.verification_code.is_none());
    }

    #[test]
    fn missing_name_is_structural() {
        let mut c = cursor(r#"{"versionInfo": "1.0"}"#);
        let err = PackageRecord::parse_object(&mut c, &ParseContext::default()).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => assert!(reason.contains("name")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn verification_code_without_value_is_structural() {
        let json = r#"{"name": "x", "packageVerificationCode": {"comment": "empty"}}"#;
        let mut c = cursor(json);
        let err = PackageRecord::parse_object(&mut c, &ParseContext::default()).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => {
                assert!(reason.contains("packageVerificationCodeValue"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn incomplete_external_ref_lists_missing() {
        let json = r#"{"name": "x", "externalRefs": [{"referenceType": "purl"}]}"#;
        let mut c = cursor(json);
        let err = PackageRecord::parse_object(&mut c, &ParseContext::default()).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => {
                assert!(reason.contains("referenceCategory"));
                assert!(reason.contains("referenceLocator"));
                assert!(!reason.contains("referenceType,"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_properties_are_skipped() {
        let json = r#"{"primaryPackagePurpose": "LIBRARY", "name": "x", "attributionTexts": ["a"]}"#;
        let mut c = cursor(json);
        let package = PackageRecord::parse_object(&mut c, &ParseContext::default()).unwrap();
        assert_eq!(package.name, "x");
    }
}
