//! Round-trip tests: writer -> parser
//!
//! Documents generated by the writers must parse back to records whose
//! mandatory fields equal the original inputs.

use sbomstream_spdx::{
    Checksum, ChecksumAlgorithm, ComplianceStandard, ExternalDocumentRef, FileRecord,
    GraphElement, PackageRecord, PackageVerificationCode, ParserOptionsBuilder,
    RelationshipRecord, RelationshipType, SbomDraft, SbomFormat, SbomWriter, Spdx2Parser,
    Spdx3Parser,
};

fn sample_draft() -> SbomDraft {
    SbomDraft {
        name: "roundtrip".to_owned(),
        files: vec![FileRecord {
            spdx_id: Some("SPDXRef-File-0".to_owned()),
            path: "./src/main.rs".to_owned(),
            checksums: vec![
                Checksum::new(ChecksumAlgorithm::Sha1, "c2b4e1b8"),
                Checksum::new(ChecksumAlgorithm::Sha256, "f2ca1bb6"),
            ],
            license_concluded: Some("MIT".to_owned()),
            license_info_in_files: vec!["MIT".to_owned()],
            copyright_text: Some("Copyright Example".to_owned()),
        }],
        packages: vec![PackageRecord {
            spdx_id: Some("SPDXRef-Package-serde".to_owned()),
            name: "serde".to_owned(),
            version: Some("1.0.204".to_owned()),
            download_location: Some("https://crates.io/crates/serde".to_owned()),
            supplier: Some("Organization: serde-rs".to_owned()),
            verification_code: Some(PackageVerificationCode {
                checksums: vec![
                    Checksum::new(ChecksumAlgorithm::Sha1, "d6a770ba"),
                    Checksum::new(ChecksumAlgorithm::Sha256, "15e1cc0b"),
                ],
                excluded_files: vec![],
            }),
            ..Default::default()
        }],
        relationships: vec![RelationshipRecord {
            spdx_element_id: "SPDXRef-DOCUMENT".to_owned(),
            related_element_id: "SPDXRef-Package-serde".to_owned(),
            external_document_id: None,
            relationship_type: RelationshipType::Describes,
        }],
        external_refs: vec![ExternalDocumentRef {
            external_document_id: "DocumentRef-other".to_owned(),
            spdx_document: "https://example.com/other.spdx.json".to_owned(),
            checksum: Checksum::new(ChecksumAlgorithm::Sha1, "aabbccdd"),
        }],
    }
}

#[test]
fn spdx2_roundtrip_preserves_mandatory_fields() {
    let draft = sample_draft();
    let generated = SbomWriter::new(SbomFormat::Spdx2).generate(&draft).unwrap();

    let mut parser = Spdx2Parser::new(generated.content.as_bytes()).unwrap();
    let document = parser.collect_document().unwrap();

    assert_eq!(document.files.len(), 1);
    let file = &document.files[0];
    assert_eq!(file.path, draft.files[0].path);
    assert_eq!(file.checksums, draft.files[0].checksums);

    assert_eq!(document.packages.len(), 1);
    let package = &document.packages[0];
    assert_eq!(package.name, "serde");
    assert_eq!(package.version.as_deref(), Some("1.0.204"));
    // 2.x 직렬화는 검증 코드를 SHA-1 단일 값으로 내보낸다
    let code = package.verification_code.as_ref().unwrap();
    assert!(code.has_algorithm(ChecksumAlgorithm::Sha1));

    assert_eq!(document.relationships.len(), 1);
    let rel = &document.relationships[0];
    assert_eq!(rel.spdx_element_id, "SPDXRef-DOCUMENT");
    assert_eq!(rel.related_element_id, "SPDXRef-Package-serde");
    assert_eq!(rel.relationship_type, RelationshipType::Describes);

    assert_eq!(document.external_refs.len(), 1);
    assert_eq!(
        document.external_refs[0].external_document_id,
        "DocumentRef-other"
    );

    // 생성기가 만든 메타데이터도 온전히 돌아온다
    assert_eq!(document.metadata.spdx_version.as_deref(), Some("SPDX-2.3"));
    assert_eq!(document.metadata.data_license.as_deref(), Some("CC0-1.0"));
    assert_eq!(document.metadata.document_describes, vec!["SPDXRef-Package-serde"]);
    assert!(document.metadata.creation_info.is_some());
}

#[test]
fn spdx3_roundtrip_preserves_mandatory_fields() {
    let draft = sample_draft();
    let generated = SbomWriter::new(SbomFormat::Spdx3).generate(&draft).unwrap();

    let mut parser = Spdx3Parser::new(generated.content.as_bytes()).unwrap();
    let elements = parser.collect_elements().unwrap();

    let package = elements
        .iter()
        .find_map(|e| match e {
            GraphElement::Package(p) => Some(p),
            _ => None,
        })
        .unwrap();
    assert_eq!(package.name, "serde");
    assert_eq!(package.version.as_deref(), Some("1.0.204"));
    assert_eq!(
        package.verified_using,
        draft.packages[0].verification_code.as_ref().unwrap().checksums
    );

    let file = elements
        .iter()
        .find_map(|e| match e {
            GraphElement::File(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert_eq!(file.name, "./src/main.rs");
    assert_eq!(file.verified_using, draft.files[0].checksums);

    let rel = elements
        .iter()
        .find_map(|e| match e {
            GraphElement::Relationship(r) => Some(r),
            _ => None,
        })
        .unwrap();
    assert_eq!(rel.from, "SPDXRef-DOCUMENT");
    assert_eq!(rel.to, vec!["SPDXRef-Package-serde"]);
    assert_eq!(rel.relationship_type, RelationshipType::Describes);

    assert!(
        elements
            .iter()
            .any(|e| matches!(e, GraphElement::ExternalMap(_)))
    );
}

#[test]
fn spdx3_roundtrip_passes_ntia_when_sha256_present() {
    let generated = SbomWriter::new(SbomFormat::Spdx3)
        .generate(&sample_draft())
        .unwrap();

    let options = ParserOptionsBuilder::new()
        .compliance(ComplianceStandard::Ntia)
        .build()
        .unwrap();
    let mut parser = Spdx3Parser::with_options(generated.content.as_bytes(), &options).unwrap();
    parser.collect_elements().unwrap();
    assert!(parser.invalid_elements().unwrap().is_empty());
}

#[test]
fn spdx3_roundtrip_flags_package_without_sha256() {
    let mut draft = sample_draft();
    draft.files.clear();
    draft.packages[0].verification_code = Some(PackageVerificationCode {
        checksums: vec![Checksum::new(ChecksumAlgorithm::Sha1, "only-sha1")],
        excluded_files: vec![],
    });

    let generated = SbomWriter::new(SbomFormat::Spdx3).generate(&draft).unwrap();

    let options = ParserOptionsBuilder::new()
        .compliance(ComplianceStandard::Ntia)
        .build()
        .unwrap();
    let mut parser = Spdx3Parser::with_options(generated.content.as_bytes(), &options).unwrap();
    // 파싱은 위반과 무관하게 끝까지 진행된다
    parser.collect_elements().unwrap();

    let invalid = parser.invalid_elements().unwrap();
    assert_eq!(invalid.len(), 1);
    assert_eq!(
        invalid.iter().next().unwrap().element_id.as_deref(),
        Some("SPDXRef-Package-serde")
    );
}

#[test]
fn spdx2_roundtrip_with_tiny_buffer() {
    let generated = SbomWriter::new(SbomFormat::Spdx2)
        .generate(&sample_draft())
        .unwrap();
    let options = ParserOptionsBuilder::new().buffer_size(2).build().unwrap();
    let mut parser = Spdx2Parser::with_options(generated.content.as_bytes(), &options).unwrap();
    let document = parser.collect_document().unwrap();
    assert_eq!(document.packages.len(), 1);
    assert_eq!(document.files.len(), 1);
}
