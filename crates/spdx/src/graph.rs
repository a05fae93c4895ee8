//! SPDX 3.0 그래프 엘리먼트 -- `@graph` 배열의 다형 객체
//!
//! SPDX 3.0 문서는 이질적인 엘리먼트 객체의 단일 `@graph` 배열로
//! 구성되며, 각 객체는 자신의 `type` 필드로 판별됩니다.
//! [`GraphElement`]는 닫힌 태그 유니언이므로 모든 소비 지점에서
//! 전수 매칭이 강제되고, 새 엘리먼트 종류 추가는 컴파일 타임에
//! 검사되는 변경이 됩니다.
//!
//! `type` 필드는 객체 내 어느 위치에나 올 수 있으므로, 파서는 필드를
//! 누적한 뒤 객체가 닫힐 때 판별자에 따라 변형을 만듭니다.
//! 알 수 없는 판별자는 구조적 파싱 에러입니다.

use std::io::Read;

use crate::entity::{missing_fields_error, read_checksum, read_string_array};
use crate::error::SpdxParseError;
use crate::reader::JsonCursor;
use crate::types::{Checksum, RelationshipType};
use crate::util;

/// SPDX 3.0 그래프 엘리먼트 (닫힌 태그 유니언)
#[derive(Debug, Clone, PartialEq)]
pub enum GraphElement {
    /// `software_File`
    File(FileElement),
    /// `software_Package`
    Package(PackageElement),
    /// `Relationship`
    Relationship(RelationshipElement),
    /// `SpdxDocument`
    SpdxDocument(SpdxDocumentElement),
    /// `CreationInfo`
    CreationInfo(CreationInfoElement),
    /// `ExternalMap`
    ExternalMap(ExternalMapElement),
}

impl GraphElement {
    /// 엘리먼트의 SPDX 식별자를 반환합니다.
    pub fn spdx_id(&self) -> &str {
        match self {
            Self::File(e) => &e.spdx_id,
            Self::Package(e) => &e.spdx_id,
            Self::Relationship(e) => &e.spdx_id,
            Self::SpdxDocument(e) => &e.spdx_id,
            Self::CreationInfo(e) => &e.spdx_id,
            Self::ExternalMap(e) => &e.external_spdx_id,
        }
    }

    /// 엘리먼트의 `type` 판별자 문자열을 반환합니다.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::File(_) => "software_File",
            Self::Package(_) => "software_Package",
            Self::Relationship(_) => "Relationship",
            Self::SpdxDocument(_) => "SpdxDocument",
            Self::CreationInfo(_) => "CreationInfo",
            Self::ExternalMap(_) => "ExternalMap",
        }
    }
}

/// `software_File` 엘리먼트
#[derive(Debug, Clone, PartialEq)]
pub struct FileElement {
    /// SPDX 식별자
    pub spdx_id: String,
    /// 파일 이름
    pub name: String,
    /// 내용 검증 체크섬 목록
    pub verified_using: Vec<Checksum>,
    /// 저작권 표기
    pub copyright_text: Option<String>,
}

/// `software_Package` 엘리먼트
#[derive(Debug, Clone, PartialEq)]
pub struct PackageElement {
    /// SPDX 식별자
    pub spdx_id: String,
    /// 패키지 이름
    pub name: String,
    /// 패키지 버전
    pub version: Option<String>,
    /// 다운로드 위치
    pub download_location: Option<String>,
    /// Package URL
    pub package_url: Option<String>,
    /// 공급 주체
    pub supplied_by: Option<String>,
    /// 내용 검증 체크섬 목록
    pub verified_using: Vec<Checksum>,
    /// 저작권 표기
    pub copyright_text: Option<String>,
}

/// `Relationship` 엘리먼트 (3.0 고유 형태: `to`는 목록)
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipElement {
    /// SPDX 식별자
    pub spdx_id: String,
    /// 출발 엘리먼트 식별자
    pub from: String,
    /// 대상 엘리먼트 식별자 목록
    pub to: Vec<String>,
    /// 관계 타입
    pub relationship_type: RelationshipType,
}

/// `SpdxDocument` 엘리먼트
#[derive(Debug, Clone, PartialEq)]
pub struct SpdxDocumentElement {
    /// SPDX 식별자
    pub spdx_id: String,
    /// 문서 이름
    pub name: Option<String>,
    /// 연결된 CreationInfo 엘리먼트 식별자 (예: `_:creationinfo`)
    pub creation_info: Option<String>,
    /// 문서의 루트 엘리먼트 식별자 목록
    pub root_elements: Vec<String>,
}

/// `CreationInfo` 엘리먼트
#[derive(Debug, Clone, PartialEq)]
pub struct CreationInfoElement {
    /// 엘리먼트 식별자 (관례상 `_:creationinfo`)
    pub spdx_id: String,
    /// 생성 시각 (RFC3339)
    pub created: String,
    /// 생성 주체 식별자/이름 목록
    pub created_by: Vec<String>,
    /// SPDX 사양 버전
    pub spec_version: Option<String>,
}

/// `ExternalMap` 엘리먼트
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalMapElement {
    /// 외부 엘리먼트 SPDX 식별자
    pub external_spdx_id: String,
    /// 외부 문서 위치 힌트
    pub location_hint: Option<String>,
    /// 외부 문서 검증 체크섬 목록
    pub verified_using: Vec<Checksum>,
}

/// 필드 누적기 -- `type` 판별자가 어느 위치에 오든 단일 패스로 파싱
#[derive(Default)]
struct ElementFields {
    type_name: Option<String>,
    spdx_id: Option<String>,
    name: Option<String>,
    verified_using: Vec<Checksum>,
    copyright_text: Option<String>,
    version: Option<String>,
    download_location: Option<String>,
    package_url: Option<String>,
    supplied_by: Option<String>,
    from: Option<String>,
    to: Vec<String>,
    relationship_type_raw: Option<String>,
    creation_info: Option<String>,
    root_elements: Vec<String>,
    created: Option<String>,
    created_by: Vec<String>,
    spec_version: Option<String>,
    external_spdx_id: Option<String>,
    location_hint: Option<String>,
}

/// `@graph` 배열의 엘리먼트 객체 하나를 파싱합니다.
pub(crate) fn parse_element<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<GraphElement, SpdxParseError> {
    cursor.expect_object_start()?;

    let mut fields = ElementFields::default();
    let mut first = true;
    while let Some(key) = cursor.next_object_key(first)? {
        first = false;
        match key.as_str() {
            "type" => fields.type_name = Some(cursor.read_string()?),
            "spdxId" => fields.spdx_id = Some(cursor.read_string()?),
            "name" => fields.name = Some(cursor.read_string()?),
            "verifiedUsing" => fields.verified_using = read_verified_using(cursor)?,
            "software_copyrightText" => fields.copyright_text = Some(cursor.read_string()?),
            "software_packageVersion" => fields.version = Some(cursor.read_string()?),
            "software_downloadLocation" => {
                fields.download_location = Some(cursor.read_string()?);
            }
            "software_packageUrl" => fields.package_url = Some(cursor.read_string()?),
            "suppliedBy" => fields.supplied_by = Some(cursor.read_string()?),
            "from" => fields.from = Some(cursor.read_string()?),
            "to" => fields.to = read_string_or_array(cursor)?,
            "relationshipType" => fields.relationship_type_raw = Some(cursor.read_string()?),
            "creationInfo" => fields.creation_info = Some(cursor.read_string()?),
            "rootElement" => fields.root_elements = read_string_or_array(cursor)?,
            "created" => fields.created = Some(cursor.read_string()?),
            "createdBy" => fields.created_by = read_string_array(cursor)?,
            "specVersion" => fields.spec_version = Some(cursor.read_string()?),
            "externalSpdxId" => fields.external_spdx_id = Some(cursor.read_string()?),
            "locationHint" => fields.location_hint = Some(cursor.read_string()?),
            _ => cursor.skip_value()?,
        }
    }

    build_element(fields, cursor.offset())
}

/// 누적된 필드를 판별자에 따라 엘리먼트 변형으로 조립합니다.
fn build_element(fields: ElementFields, offset: u64) -> Result<GraphElement, SpdxParseError> {
    let Some(type_name) = fields.type_name else {
        return Err(SpdxParseError::Structural {
            offset,
            reason: "graph element missing 'type' discriminator".to_owned(),
        });
    };

    let entity = format!("graph element '{type_name}'");
    match type_name.as_str() {
        "software_File" => {
            let mut missing = Vec::new();
            if fields.spdx_id.is_none() {
                missing.push("spdxId");
            }
            if fields.name.is_none() {
                missing.push("name");
            }
            if !missing.is_empty() {
                return Err(missing_fields_error(offset, &entity, &missing));
            }
            Ok(GraphElement::File(FileElement {
                spdx_id: fields.spdx_id.unwrap_or_default(),
                name: fields.name.unwrap_or_default(),
                verified_using: fields.verified_using,
                copyright_text: fields.copyright_text,
            }))
        }
        "software_Package" => {
            let mut missing = Vec::new();
            if fields.spdx_id.is_none() {
                missing.push("spdxId");
            }
            if fields.name.is_none() {
                missing.push("name");
            }
            if !missing.is_empty() {
                return Err(missing_fields_error(offset, &entity, &missing));
            }
            Ok(GraphElement::Package(PackageElement {
                spdx_id: fields.spdx_id.unwrap_or_default(),
                name: fields.name.unwrap_or_default(),
                version: fields.version,
                download_location: fields.download_location,
                package_url: fields.package_url,
                supplied_by: fields.supplied_by,
                verified_using: fields.verified_using,
                copyright_text: fields.copyright_text,
            }))
        }
        "Relationship" => {
            let mut missing = Vec::new();
            if fields.spdx_id.is_none() {
                missing.push("spdxId");
            }
            if fields.from.is_none() {
                missing.push("from");
            }
            if fields.to.is_empty() {
                missing.push("to");
            }
            if fields.relationship_type_raw.is_none() {
                missing.push("relationshipType");
            }
            if !missing.is_empty() {
                return Err(missing_fields_error(offset, &entity, &missing));
            }
            let raw = fields.relationship_type_raw.unwrap_or_default();
            let relationship_type =
                RelationshipType::parse(&raw).ok_or_else(|| SpdxParseError::Structural {
                    offset,
                    reason: format!("unknown relationship type '{raw}'"),
                })?;
            Ok(GraphElement::Relationship(RelationshipElement {
                spdx_id: fields.spdx_id.unwrap_or_default(),
                from: fields.from.unwrap_or_default(),
                to: fields.to,
                relationship_type,
            }))
        }
        "SpdxDocument" => {
            let Some(spdx_id) = fields.spdx_id else {
                return Err(missing_fields_error(offset, &entity, &["spdxId"]));
            };
            Ok(GraphElement::SpdxDocument(SpdxDocumentElement {
                spdx_id,
                name: fields.name,
                creation_info: fields.creation_info,
                root_elements: fields.root_elements,
            }))
        }
        "CreationInfo" => {
            let mut missing = Vec::new();
            if fields.spdx_id.is_none() {
                missing.push("spdxId");
            }
            if fields.created.is_none() {
                missing.push("created");
            }
            if fields.created_by.is_empty() {
                missing.push("createdBy");
            }
            if !missing.is_empty() {
                return Err(missing_fields_error(offset, &entity, &missing));
            }
            let created = fields.created.unwrap_or_default();
            if !util::is_timestamp(&created) {
                return Err(SpdxParseError::Structural {
                    offset,
                    reason: format!("CreationInfo.created is not a valid timestamp: '{created}'"),
                });
            }
            Ok(GraphElement::CreationInfo(CreationInfoElement {
                spdx_id: fields.spdx_id.unwrap_or_default(),
                created,
                created_by: fields.created_by,
                spec_version: fields.spec_version,
            }))
        }
        "ExternalMap" => {
            let Some(external_spdx_id) = fields.external_spdx_id else {
                return Err(missing_fields_error(offset, &entity, &["externalSpdxId"]));
            };
            Ok(GraphElement::ExternalMap(ExternalMapElement {
                external_spdx_id,
                location_hint: fields.location_hint,
                verified_using: fields.verified_using,
            }))
        }
        unknown => Err(SpdxParseError::Structural {
            offset,
            reason: format!("unknown graph element type '{unknown}'"),
        }),
    }
}

/// `verifiedUsing` 배열을 읽습니다 (`hashValue` 표기의 해시 객체 목록).
fn read_verified_using<R: Read>(
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

/// 단일 문자열 또는 문자열 배열을 읽습니다.
///
/// SPDX 3.0 직렬화는 단일 값 목록을 문자열 하나로 줄여 쓰기도 합니다.
fn read_string_or_array<R: Read>(
    cursor: &mut JsonCursor<R>,
) -> Result<Vec<String>, SpdxParseError> {
    match cursor.peek_nonws()? {
        Some(b'[') => read_string_array(cursor),
        _ => Ok(vec![cursor.read_string()?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::test_support::cursor;
    use crate::types::ChecksumAlgorithm;

    #[test]
    fn parse_file_element() {
        let json = r#"{
            "type": "software_File",
            "spdxId": "SPDXRef-File-0",
            "name": "./src/main.rs",
            "verifiedUsing": [{"algorithm": "sha256", "hashValue": "abc"}]
        }"#;
        let mut c = cursor(json);
        let element = parse_element(&mut c).unwrap();
        let GraphElement::File(file) = element else {
            panic!("expected file element");
        };
        assert_eq!(file.spdx_id, "SPDXRef-File-0");
        assert_eq!(file.verified_using[0].algorithm, ChecksumAlgorithm::Sha256);
    }

    #[test]
    fn parse_package_element_with_type_last() {
        // type 판별자가 객체 끝에 와도 단일 패스로 파싱된다
        let json = r#"{
            "spdxId": "SPDXRef-Package-serde",
            "name": "serde",
            "software_packageVersion": "1.0.204",
            "software_packageUrl": "pkg:cargo/serde@1.0.204",
            "verifiedUsing": [{"algorithm": "sha256", "hashValue": "abc"}],
            "type": "software_Package"
        }"#;
        let mut c = cursor(json);
        let GraphElement::Package(package) = parse_element(&mut c).unwrap() else {
            panic!("expected package element");
        };
        assert_eq!(package.name, "serde");
        assert_eq!(package.version.as_deref(), Some("1.0.204"));
        assert_eq!(package.package_url.as_deref(), Some("pkg:cargo/serde@1.0.204"));
    }

    #[test]
    fn parse_relationship_with_to_list() {
        let json = r#"{
            "type": "Relationship",
            "spdxId": "SPDXRef-Rel-0",
            "from": "SPDXRef-Package-a",
            "to": ["SPDXRef-Package-b", "SPDXRef-Package-c"],
            "relationshipType": "dependsOn"
        }"#;
        let mut c = cursor(json);
        let GraphElement::Relationship(rel) = parse_element(&mut c).unwrap() else {
            panic!("expected relationship element");
        };
        assert_eq!(rel.to.len(), 2);
        assert_eq!(rel.relationship_type, RelationshipType::DependsOn);
    }

    #[test]
    fn parse_relationship_with_single_to() {
        let json = r#"{
            "type": "Relationship",
            "spdxId": "SPDXRef-Rel-1",
            "from": "a",
            "to": "b",
            "relationshipType": "contains"
        }"#;
        let mut c = cursor(json);
        let GraphElement::Relationship(rel) = parse_element(&mut c).unwrap() else {
            panic!("expected relationship element");
        };
        assert_eq!(rel.to, vec!["b"]);
    }

    #[test]
    fn parse_document_and_creation_info() {
        let json = r#"{
            "type": "SpdxDocument",
            "spdxId": "SPDXRef-Document",
            "name": "example",
            "creationInfo": "_:creationinfo",
            "rootElement": ["SPDXRef-Package-root"]
        }"#;
        let mut c = cursor(json);
        let GraphElement::SpdxDocument(doc) = parse_element(&mut c).unwrap() else {
            panic!("expected document element");
        };
        assert_eq!(doc.creation_info.as_deref(), Some("_:creationinfo"));
        assert_eq!(doc.root_elements, vec!["SPDXRef-Package-root"]);

        let json = r#"{
            "type": "CreationInfo",
            "spdxId": "_:creationinfo",
            "created": "2024-05-08T15:58:25Z",
            "createdBy": ["SPDXRef-Organization-Example"],
            "specVersion": "3.0.0"
        }"#;
        let mut c = cursor(json);
        let GraphElement::CreationInfo(info) = parse_element(&mut c).unwrap() else {
            panic!("expected creation info element");
        };
        assert_eq!(info.created, "2024-05-08T15:58:25Z");
        assert_eq!(info.spec_version.as_deref(), Some("3.0.0"));
    }

    #[test]
    fn parse_external_map() {
        let json = r#"{
            "type": "ExternalMap",
            "externalSpdxId": "DocumentRef-other:SPDXRef-x",
            "locationHint": "https://example.com/other.spdx.json",
            "verifiedUsing": [{"algorithm": "sha1", "hashValue": "aa"}]
        }"#;
        let mut c = cursor(json);
        let GraphElement::ExternalMap(map) = parse_element(&mut c).unwrap() else {
            panic!("expected external map element");
        };
        assert_eq!(map.external_spdx_id, "DocumentRef-other:SPDXRef-x");
    }

    #[test]
    fn missing_type_is_structural() {
        let mut c = cursor(r#"{"spdxId": "SPDXRef-x", "name": "n"}"#);
        let err = parse_element(&mut c).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => {
                assert!(reason.contains("'type' discriminator"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_structural() {
        let mut c = cursor(r#"{"type": "software_Snippet", "spdxId": "x"}"#);
        let err = parse_element(&mut c).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => {
                assert!(reason.contains("software_Snippet"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn relationship_missing_fields_are_all_listed() {
        let mut c = cursor(r#"{"type": "Relationship"}"#);
        let err = parse_element(&mut c).unwrap_err();
        match err {
            SpdxParseError::Structural { reason, .. } => {
                assert!(reason.contains("spdxId"));
                assert!(reason.contains("from"));
                assert!(reason.contains("to"));
                assert!(reason.contains("relationshipType"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_created_timestamp_is_structural() {
        let json = r#"{
            "type": "CreationInfo",
            "spdxId": "_:creationinfo",
            "created": "soon",
            "createdBy": ["x"]
        }"#;
        let mut c = cursor(json);
        assert!(matches!(
            parse_element(&mut c),
            Err(SpdxParseError::Structural { .. })
        ));
    }

    #[test]
    fn spdx_id_accessor_covers_all_variants() {
        let json = r#"{"type": "SpdxDocument", "spdxId": "SPDXRef-Document"}"#;
        let mut c = cursor(json);
        let element = parse_element(&mut c).unwrap();
        assert_eq!(element.spdx_id(), "SPDXRef-Document");
        assert_eq!(element.type_name(), "SpdxDocument");
    }
}
