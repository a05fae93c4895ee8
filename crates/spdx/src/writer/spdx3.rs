//! SPDX 3.0 JSON SBOM 생성
//!
//! `@context` + `@graph` 형식의 SPDX 3.0 문서를 생성합니다.
//! CreationInfo와 이를 참조하는 SpdxDocument 엘리먼트 쌍을 항상
//! 포함하므로, 생성 결과는 NTIA 문서 수준 검사를 통과합니다.

use serde::Serialize;

use crate::error::SpdxParseError;
use crate::types::{
    Checksum, ExternalDocumentRef, FileRecord, PackageRecord, RelationshipRecord, SbomDocument,
    SbomDraft, SbomFormat,
};
use crate::util;

const CONTEXT: &str = "https://spdx.org/rdf/3.0.0/spdx-context.jsonld";
const CREATION_INFO_ID: &str = "_:creationinfo";

/// SPDX 3.0 문서 루트 구조
#[derive(Serialize)]
struct Spdx3Doc {
    #[serde(rename = "@context")]
    context: String,
    #[serde(rename = "@graph")]
    graph: Vec<ElementJson>,
}

/// `@graph` 배열의 이질적 엘리먼트
#[derive(Serialize)]
#[serde(untagged)]
enum ElementJson {
    CreationInfo(CreationInfoJson),
    Document(DocumentJson),
    File(FileJson),
    Package(PackageJson),
    Relationship(RelationshipJson),
    ExternalMap(ExternalMapJson),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreationInfoJson {
    #[serde(rename = "type")]
    type_name: &'static str,
    spdx_id: String,
    spec_version: String,
    created: String,
    created_by: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentJson {
    #[serde(rename = "type")]
    type_name: &'static str,
    spdx_id: String,
    name: String,
    creation_info: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    root_element: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileJson {
    #[serde(rename = "type")]
    type_name: &'static str,
    spdx_id: String,
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    verified_using: Vec<HashJson>,
    #[serde(rename = "software_copyrightText", skip_serializing_if = "Option::is_none")]
    copyright_text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(rename = "type")]
    type_name: &'static str,
    spdx_id: String,
    name: String,
    #[serde(rename = "software_packageVersion", skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(
        rename = "software_downloadLocation",
        skip_serializing_if = "Option::is_none"
    )]
    download_location: Option<String>,
    #[serde(rename = "software_packageUrl", skip_serializing_if = "Option::is_none")]
    package_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplied_by: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    verified_using: Vec<HashJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipJson {
    #[serde(rename = "type")]
    type_name: &'static str,
    spdx_id: String,
    from: String,
    to: Vec<String>,
    relationship_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExternalMapJson {
    #[serde(rename = "type")]
    type_name: &'static str,
    external_spdx_id: String,
    location_hint: String,
    verified_using: Vec<HashJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashJson {
    algorithm: String,
    hash_value: String,
}

/// 초안에서 SPDX 3.0 JSON SBOM을 생성합니다.
pub fn generate(draft: &SbomDraft) -> Result<SbomDocument, SpdxParseError> {
    let mut graph: Vec<ElementJson> = Vec::with_capacity(draft.element_count() + 2);

    graph.push(ElementJson::CreationInfo(CreationInfoJson {
        type_name: "CreationInfo",
        spdx_id: CREATION_INFO_ID.to_owned(),
        spec_version: "3.0.0".to_owned(),
        created: util::current_timestamp(),
        created_by: vec!["Tool: sbomstream".to_owned()],
    }));
    graph.push(ElementJson::Document(DocumentJson {
        type_name: "SpdxDocument",
        spdx_id: "SPDXRef-Document".to_owned(),
        name: draft.name.clone(),
        creation_info: CREATION_INFO_ID.to_owned(),
        root_element: draft
            .packages
            .iter()
            .take(1)
            .enumerate()
            .map(|(i, p)| package_id(p, i))
            .collect(),
    }));

    for (i, record) in draft.files.iter().enumerate() {
        graph.push(ElementJson::File(file(record, i)));
    }
    for (i, record) in draft.packages.iter().enumerate() {
        graph.push(ElementJson::Package(package(record, i)));
    }
    for (i, record) in draft.relationships.iter().enumerate() {
        graph.push(ElementJson::Relationship(relationship(record, i)));
    }
    for record in &draft.external_refs {
        graph.push(ElementJson::ExternalMap(external_map(record)));
    }

    let doc = Spdx3Doc {
        context: CONTEXT.to_owned(),
        graph,
    };

    let content = serde_json::to_string_pretty(&doc)
        .map_err(|e| SpdxParseError::Generation(format!("spdx 3.0 serialization failed: {e}")))?;

    Ok(SbomDocument {
        format: SbomFormat::Spdx3,
        content,
        element_count: draft.element_count(),
    })
}

fn hash(c: &Checksum) -> HashJson {
    HashJson {
        algorithm: c.algorithm.as_spdx3().to_owned(),
        hash_value: c.value.clone(),
    }
}

fn file_id(record: &FileRecord, index: usize) -> String {
    record
        .spdx_id
        .clone()
        .unwrap_or_else(|| format!("SPDXRef-File-{index}"))
}

fn package_id(record: &PackageRecord, index: usize) -> String {
    record
        .spdx_id
        .clone()
        .unwrap_or_else(|| format!("SPDXRef-Package-{index}"))
}

fn file(record: &FileRecord, index: usize) -> FileJson {
    FileJson {
        type_name: "software_File",
        spdx_id: file_id(record, index),
        name: record.path.clone(),
        verified_using: record.checksums.iter().map(hash).collect(),
        copyright_text: record.copyright_text.clone(),
    }
}

fn package(record: &PackageRecord, index: usize) -> PackageJson {
    // 검증 코드가 있으면 그 체크섬 집합을, 없으면 아카이브 체크섬을 내보낸다
    let verified_using = match &record.verification_code {
        Some(code) => code.checksums.iter().map(hash).collect(),
        None => record.checksums.iter().map(hash).collect(),
    };
    PackageJson {
        type_name: "software_Package",
        spdx_id: package_id(record, index),
        name: record.name.clone(),
        version: record.version.clone(),
        download_location: record.download_location.clone(),
        package_url: record.purl().map(str::to_owned),
        supplied_by: record.supplier.clone(),
        verified_using,
    }
}

fn relationship(record: &RelationshipRecord, index: usize) -> RelationshipJson {
    RelationshipJson {
        type_name: "Relationship",
        spdx_id: format!("SPDXRef-Relationship-{index}"),
        from: record.spdx_element_id.clone(),
        to: vec![record.related_element_id.clone()],
        relationship_type: record.relationship_type.as_spdx3().to_owned(),
    }
}

fn external_map(record: &ExternalDocumentRef) -> ExternalMapJson {
    ExternalMapJson {
        type_name: "ExternalMap",
        external_spdx_id: record.external_document_id.clone(),
        location_hint: record.spdx_document.clone(),
        verified_using: vec![hash(&record.checksum)],
    }
}
