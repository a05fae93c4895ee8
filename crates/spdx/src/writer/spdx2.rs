//! SPDX 2.3 JSON SBOM 생성
//!
//! [SPDX](https://spdx.dev/) 2.3 사양에 따른 JSON SBOM 문서를 생성합니다.

use serde::Serialize;

use crate::error::SpdxParseError;
use crate::types::{
    ChecksumAlgorithm, ExternalDocumentRef, FileRecord, PackageRecord, RelationshipRecord,
    SbomDocument, SbomDraft, SbomFormat,
};
use crate::util;

/// SPDX 2.3 문서 루트 구조
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Spdx2Doc {
    spdx_version: String,
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    data_license: String,
    document_namespace: String,
    creation_info: CreationInfoJson,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_document_refs: Vec<ExternalDocRefJson>,
    files: Vec<FileJson>,
    packages: Vec<PackageJson>,
    relationships: Vec<RelationshipJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    document_describes: Vec<String>,
}

/// SPDX 생성 정보
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreationInfoJson {
    created: String,
    creators: Vec<String>,
}

/// SPDX 파일
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileJson {
    file_name: String,
    #[serde(rename = "SPDXID", skip_serializing_if = "Option::is_none")]
    spdx_id: Option<String>,
    checksums: Vec<ChecksumJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    license_info_in_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    copyright_text: Option<String>,
}

/// SPDX 패키지
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    name: String,
    #[serde(rename = "SPDXID", skip_serializing_if = "Option::is_none")]
    spdx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    download_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_declared: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    copyright_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<ChecksumJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<ExternalRefJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_verification_code: Option<VerificationCodeJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    has_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files_analyzed: Option<bool>,
}

/// SPDX 체크섬
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChecksumJson {
    algorithm: String,
    checksum_value: String,
}

/// SPDX 외부 참조 (purl 등)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExternalRefJson {
    reference_category: String,
    reference_type: String,
    reference_locator: String,
}

/// SPDX 패키지 검증 코드
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationCodeJson {
    package_verification_code_value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    package_verification_code_excluded_files: Vec<String>,
}

/// SPDX 관계
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipJson {
    spdx_element_id: String,
    related_spdx_element: String,
    relationship_type: String,
}

/// SPDX 외부 문서 참조
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExternalDocRefJson {
    external_document_id: String,
    spdx_document: String,
    checksum: ChecksumJson,
}

/// 초안에서 SPDX 2.3 JSON SBOM을 생성합니다.
pub fn generate(draft: &SbomDraft) -> Result<SbomDocument, SpdxParseError> {
    let namespace = format!("https://sbomstream.dev/spdx/{}", uuid::Uuid::new_v4());

    let doc = Spdx2Doc {
        spdx_version: "SPDX-2.3".to_owned(),
        spdx_id: "SPDXRef-DOCUMENT".to_owned(),
        name: draft.name.clone(),
        data_license: "CC0-1.0".to_owned(),
        document_namespace: namespace,
        creation_info: CreationInfoJson {
            created: util::current_timestamp(),
            creators: vec!["Tool: sbomstream".to_owned()],
        },
        external_document_refs: draft.external_refs.iter().map(external_doc_ref).collect(),
        files: draft.files.iter().map(file).collect(),
        packages: draft.packages.iter().map(package).collect(),
        relationships: draft.relationships.iter().map(relationship).collect(),
        document_describes: describes(draft),
    };

    let content = serde_json::to_string_pretty(&doc)
        .map_err(|e| SpdxParseError::Generation(format!("spdx 2.3 serialization failed: {e}")))?;

    Ok(SbomDocument {
        format: SbomFormat::Spdx2,
        content,
        element_count: draft.element_count(),
    })
}

/// DESCRIBES 관계에서 documentDescribes 목록을 유도합니다.
fn describes(draft: &SbomDraft) -> Vec<String> {
    draft
        .relationships
        .iter()
        .filter(|r| {
            r.relationship_type == crate::types::RelationshipType::Describes
                && r.spdx_element_id == "SPDXRef-DOCUMENT"
        })
        .map(|r| r.related_element_id.clone())
        .collect()
}

fn checksum(c: &crate::types::Checksum) -> ChecksumJson {
    ChecksumJson {
        algorithm: c.algorithm.as_spdx2().to_owned(),
        checksum_value: c.value.clone(),
    }
}

fn file(record: &FileRecord) -> FileJson {
    FileJson {
        file_name: record.path.clone(),
        spdx_id: record.spdx_id.clone(),
        checksums: record.checksums.iter().map(checksum).collect(),
        license_concluded: record.license_concluded.clone(),
        license_info_in_files: record.license_info_in_files.clone(),
        copyright_text: record.copyright_text.clone(),
    }
}

fn package(record: &PackageRecord) -> PackageJson {
    // 2.x 검증 코드는 SHA-1 단일 값 형식
    let package_verification_code = record.verification_code.as_ref().and_then(|code| {
        code.checksums
            .iter()
            .find(|c| c.algorithm == ChecksumAlgorithm::Sha1)
            .map(|c| VerificationCodeJson {
                package_verification_code_value: c.value.clone(),
                package_verification_code_excluded_files: code.excluded_files.clone(),
            })
    });

    PackageJson {
        name: record.name.clone(),
        spdx_id: record.spdx_id.clone(),
        version_info: record.version.clone(),
        download_location: record.download_location.clone(),
        supplier: record.supplier.clone(),
        license_concluded: record.license_concluded.clone(),
        license_declared: record.license_declared.clone(),
        copyright_text: record.copyright_text.clone(),
        checksums: record.checksums.iter().map(checksum).collect(),
        external_refs: record
            .external_refs
            .iter()
            .map(|r| ExternalRefJson {
                reference_category: r.category.clone(),
                reference_type: r.ref_type.clone(),
                reference_locator: r.locator.clone(),
            })
            .collect(),
        package_verification_code,
        has_files: record.has_files.clone(),
        files_analyzed: record.files_analyzed,
    }
}

fn relationship(record: &RelationshipRecord) -> RelationshipJson {
    let related_spdx_element = match &record.external_document_id {
        Some(doc) => format!("{doc}:{}", record.related_element_id),
        None => record.related_element_id.clone(),
    };
    RelationshipJson {
        spdx_element_id: record.spdx_element_id.clone(),
        related_spdx_element,
        relationship_type: record.relationship_type.as_spdx2().to_owned(),
    }
}

fn external_doc_ref(record: &ExternalDocumentRef) -> ExternalDocRefJson {
    ExternalDocRefJson {
        external_document_id: record.external_document_id.clone(),
        spdx_document: record.spdx_document.clone(),
        checksum: checksum(&record.checksum),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Checksum, RelationshipType};

    fn sample_draft() -> SbomDraft {
        SbomDraft {
            name: "sample".to_owned(),
            files: vec![FileRecord {
                spdx_id: Some("SPDXRef-File-0".to_owned()),
                path: "./src/main.rs".to_owned(),
                checksums: vec![
                    Checksum::new(ChecksumAlgorithm::Sha1, "aaa"),
                    Checksum::new(ChecksumAlgorithm::Sha256, "bbb"),
                ],
                ..Default::default()
            }],
            packages: vec![PackageRecord {
                spdx_id: Some("SPDXRef-Package-serde".to_owned()),
                name: "serde".to_owned(),
                version: Some("1.0.204".to_owned()),
                ..Default::default()
            }],
            relationships: vec![RelationshipRecord {
                spdx_element_id: "SPDXRef-DOCUMENT".to_owned(),
                related_element_id: "SPDXRef-Package-serde".to_owned(),
                external_document_id: None,
                relationship_type: RelationshipType::Describes,
            }],
            external_refs: vec![],
        }
    }

    #[test]
    fn generate_contains_required_fields() {
        let document = generate(&sample_draft()).unwrap();
        assert!(document.content.contains("SPDX-2.3"));
        assert!(document.content.contains("SPDXRef-DOCUMENT"));
        assert!(document.content.contains("CC0-1.0"));
        assert!(document.content.contains("sbomstream"));
        assert_eq!(document.element_count, 3);
    }

    #[test]
    fn generate_is_valid_json() {
        let document = generate(&sample_draft()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&document.content).unwrap();
        assert_eq!(parsed["spdxVersion"], "SPDX-2.3");
        assert!(parsed["files"].is_array());
        assert!(parsed["packages"].is_array());
        assert!(parsed["relationships"].is_array());
    }

    #[test]
    fn generate_derives_document_describes() {
        let document = generate(&sample_draft()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&document.content).unwrap();
        assert_eq!(parsed["documentDescribes"][0], "SPDXRef-Package-serde");
    }

    #[test]
    fn generate_unique_namespace() {
        let draft = sample_draft();
        let d1 = generate(&draft).unwrap();
        let d2 = generate(&draft).unwrap();
        let v1: serde_json::Value = serde_json::from_str(&d1.content).unwrap();
        let v2: serde_json::Value = serde_json::from_str(&d2.content).unwrap();
        // Each generation should have a unique namespace
        assert_ne!(v1["documentNamespace"], v2["documentNamespace"]);
    }

    #[test]
    fn generate_external_document_target() {
        let mut draft = sample_draft();
        draft.relationships.push(RelationshipRecord {
            spdx_element_id: "SPDXRef-Package-serde".to_owned(),
            related_element_id: "SPDXRef-Package-b".to_owned(),
            external_document_id: Some("DocumentRef-other".to_owned()),
            relationship_type: RelationshipType::DependsOn,
        });
        let document = generate(&draft).unwrap();
        assert!(
            document
                .content
                .contains("DocumentRef-other:SPDXRef-Package-b")
        );
    }

    #[test]
    fn generate_empty_draft() {
        let draft = SbomDraft {
            name: "empty".to_owned(),
            ..Default::default()
        };
        let document = generate(&draft).unwrap();
        assert_eq!(document.element_count, 0);
        let parsed: serde_json::Value = serde_json::from_str(&document.content).unwrap();
        assert_eq!(parsed["files"].as_array().unwrap().len(), 0);
    }
}
