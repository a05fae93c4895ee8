//! 외부 문서 참조 엔티티 파서
//!
//! SPDX 2.x `externalDocumentRefs` 배열의 객체 하나를
//! [`ExternalDocumentRef`]로 파싱합니다. 세 필드 모두 필수이며,
//! 체크섬 알고리즘은 SPDX 2.x 호환을 위해 SHA-1이어야 합니다.

use std::io::Read;

use crate::entity::{EntityRecord, ParseContext, missing_fields_error, read_checksum};
use crate::error::SpdxParseError;
use crate::reader::JsonCursor;
use crate::types::{ChecksumAlgorithm, ExternalDocumentRef};

impl EntityRecord for ExternalDocumentRef {
    const ENTITY: &'static str = "externalDocumentRef";

    fn parse_object<R: Read>(
        cursor: &mut JsonCursor<R>,
        _ctx: &ParseContext,
    ) -> Result<Self, SpdxParseError> {
        cursor.expect_object_start()?;

        let mut external_document_id: Option<String> = None;
        let mut spdx_document: Option<String> = None;
        let mut checksum = None;

        let mut first = true;
        while let Some(key) = cursor.next_object_key(first)? {
            first = false;
            match key.as_str() {
                "externalDocumentId" => external_document_id = Some(cursor.read_string()?),
                "spdxDocument" => spdx_document = Some(cursor.read_string()?),
                "checksum" => checksum = Some(read_checksum(cursor)?),
                _ => cursor.skip_value()?,
            }
        }

        match (external_document_id, spdx_document, checksum) {
            (Some(external_document_id), Some(spdx_document), Some(checksum)) => {
                if checksum.algorithm != ChecksumAlgorithm::Sha1 {
                    return Err(SpdxParseError::Structural {
                        offset: cursor.offset(),
                        reason: format!(
                            "external document reference checksum must be SHA1, found {}",
                            checksum.algorithm
                        ),
                    });
                }
                Ok(ExternalDocumentRef {
                    external_document_id,
                    spdx_document,
                    checksum,
                })
            }
            (external_document_id, spdx_document, checksum) => {
                let mut missing = Vec::new();
                if external_document_id.is_none() {
                    missing.push("externalDocumentId");
                }
                if spdx_document.is_none() {
                    missing.push("spdxDocument");
                }
                if checksum.is_none() {
                    missing.push("checksum");
                }
                Err(missing_fields_error(cursor.offset(), Self::ENTITY, &missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::test_support::cursor;

    #[test]
    fn parse_valid_reference() {
        let json = r#"{
            "externalDocumentId": "DocumentRef-other",
            "spdxDocument": "https://example.com/other-doc",
            "checksum": {"algorithm": "SHA1", "checksumValue": "d6a770ba38"}
        }"#;
        let mut c = cursor(json);
        let r = ExternalDocumentRef::parse_object(&mut c, &ParseContext::default()).unwrap();
        assert_eq!(r.external_document_id, "DocumentRef-other");
        assert_eq!(r.spdx_document, "https://example.com/other-doc");
        assert_eq!(r.checksum.algorithm, ChecksumAlgorithm::Sha1);
    }

    #[test]
    fn non_sha1_checksum_is_structural() {
        let json = r#"{
            "externalDocumentId": "DocumentRef-other",
            "spdxDocument": "https://example.com/other-doc",
            "checksum": {"algorithm": "SHA256", "checksumValue": "abc"}
        }"#;
        let mut c = cursor(json);
        let err = ExternalDocumentRef::parse_object(&mut c, &ParseContext::default()).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => {
                assert!(reason.contains("SHA1"));
                assert!(reason.contains("SHA256"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_all_listed() {
        let mut c = cursor(r#"{"externalDocumentId": "DocumentRef-x"}"#);
        let err = ExternalDocumentRef::parse_object(&mut c, &ParseContext::default()).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => {
                assert!(reason.contains("spdxDocument"));
                assert!(reason.contains("checksum"));
                assert!(!reason.contains("externalDocumentId,"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
