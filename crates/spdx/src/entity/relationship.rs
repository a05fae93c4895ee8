//! 관계 엔티티 파서
//!
//! SPDX 2.x `relationships` 배열의 객체 하나를 [`RelationshipRecord`]로
//! 파싱합니다. 세 필드 모두 필수이며, 알 수 없는 관계 타입 문자열은
//! 값과 오프셋을 담은 구조적 에러입니다.
//!
//! `relatedSpdxElement`가 `DocumentRef-x:SPDXRef-y` 형식이면 외부 문서
//! 식별자를 분리해 `external_document_id`에 담습니다.

use std::io::Read;

use crate::entity::{EntityRecord, ParseContext, missing_fields_error};
use crate::error::SpdxParseError;
use crate::reader::JsonCursor;
use crate::types::{RelationshipRecord, RelationshipType};

impl EntityRecord for RelationshipRecord {
    const ENTITY: &'static str = "relationship";

    fn parse_object<R: Read>(
        cursor: &mut JsonCursor<R>,
        _ctx: &ParseContext,
    ) -> Result<Self, SpdxParseError> {
        cursor.expect_object_start()?;

        let mut element_id: Option<String> = None;
        let mut related: Option<String> = None;
        let mut type_raw: Option<String> = None;

        let mut first = true;
        while let Some(key) = cursor.next_object_key(first)? {
            first = false;
            match key.as_str() {
                "spdxElementId" => element_id = Some(cursor.read_string()?),
                "relatedSpdxElement" => related = Some(cursor.read_string()?),
                "relationshipType" => type_raw = Some(cursor.read_string()?),
                _ => cursor.skip_value()?,
            }
        }

        let mut missing = Vec::new();
        if element_id.is_none() {
            missing.push("spdxElementId");
        }
        if related.is_none() {
            missing.push("relatedSpdxElement");
        }
        if type_raw.is_none() {
            missing.push("relationshipType");
        }
        if !missing.is_empty() {
            return Err(missing_fields_error(cursor.offset(), Self::ENTITY, &missing));
        }

        let type_raw = type_raw.unwrap_or_default();
        let relationship_type =
            RelationshipType::parse(&type_raw).ok_or_else(|| SpdxParseError::Structural {
                offset: cursor.offset(),
                reason: format!("unknown relationship type '{type_raw}'"),
            })?;

        let related = related.unwrap_or_default();
        let (external_document_id, related_element_id) = split_external_reference(related);

        Ok(RelationshipRecord {
            spdx_element_id: element_id.unwrap_or_default(),
            related_element_id,
            external_document_id,
            relationship_type,
        })
    }
}

/// `DocumentRef-x:SPDXRef-y` 형식에서 외부 문서 식별자를 분리합니다.
fn split_external_reference(related: String) -> (Option<String>, String) {
    match related.split_once(':') {
        Some((doc, element)) if doc.starts_with("DocumentRef-") => {
            (Some(doc.to_owned()), element.to_owned())
        }
        _ => (None, related),
    }
}
