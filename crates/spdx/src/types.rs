//! 도메인 타입 -- SPDX 엔티티 레코드
//!
//! 파일, 패키지, 관계, 외부 문서 참조 등 SPDX 문서를 구성하는 핵심
//! 타입을 정의합니다. 모든 레코드는 스트리밍 파서가 JSON 객체 하나를
//! 소비할 때마다 하나씩 생성됩니다.

use std::collections::BTreeMap;
use std::fmt;

/// 체크섬 알고리즘 (닫힌 열거형)
///
/// SPDX가 허용하는 해시 알고리즘의 부분집합입니다. 알 수 없는 알고리즘
/// 문자열은 기본값으로 보정되지 않고 구조적 파싱 에러가 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChecksumAlgorithm {
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// SHA3-256
    Sha3_256,
    /// SHA3-384
    Sha3_384,
    /// SHA3-512
    Sha3_512,
    /// BLAKE3
    Blake3,
    /// Adler-32
    Adler32,
}

impl ChecksumAlgorithm {
    /// 문자열에서 알고리즘을 파싱합니다.
    ///
    /// 대소문자와 하이픈 유무를 구분하지 않습니다
    /// (`"SHA256"`, `"sha256"`, `"SHA-256"` 모두 허용).
    /// 알 수 없는 알고리즘은 `None`을 반환하며, 호출자가 구조적 에러로
    /// 처리합니다.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "md5" => Some(Self::Md5),
            "sha1" => Some(Self::Sha1),
            "sha224" => Some(Self::Sha224),
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            "sha3256" => Some(Self::Sha3_256),
            "sha3384" => Some(Self::Sha3_384),
            "sha3512" => Some(Self::Sha3_512),
            "blake3" => Some(Self::Blake3),
            "adler32" => Some(Self::Adler32),
            _ => None,
        }
    }

    /// SPDX 2.x 표기 (예: `"SHA256"`)를 반환합니다.
    pub fn as_spdx2(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Sha224 => "SHA224",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_384 => "SHA3-384",
            Self::Sha3_512 => "SHA3-512",
            Self::Blake3 => "BLAKE3",
            Self::Adler32 => "ADLER32",
        }
    }

    /// SPDX 3.0 표기 (예: `"sha256"`)를 반환합니다.
    pub fn as_spdx3(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Blake3 => "blake3",
            Self::Adler32 => "adler32",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_spdx2())
    }
}

/// 알고리즘과 16진수 해시 값의 쌍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    /// 해시 알고리즘
    pub algorithm: ChecksumAlgorithm,
    /// 16진수 해시 값
    pub value: String,
}

impl Checksum {
    /// 새 체크섬을 생성합니다.
    pub fn new(algorithm: ChecksumAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

/// 패키지 검증 코드
///
/// SPDX 2.x의 단일 값 형식(`packageVerificationCodeValue`, SHA-1)과
/// SPDX 3.0의 `verifiedUsing` 체크섬 목록 형식을 하나의 구조로 담습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVerificationCode {
    /// 검증 체크섬 목록
    pub checksums: Vec<Checksum>,
    /// 검증에서 제외된 파일 목록
    pub excluded_files: Vec<String>,
}

impl PackageVerificationCode {
    /// 주어진 알고리즘의 체크섬이 포함되어 있는지 확인합니다.
    pub fn has_algorithm(&self, algorithm: ChecksumAlgorithm) -> bool {
        self.checksums.iter().any(|c| c.algorithm == algorithm)
    }
}

/// 파일 레코드
///
/// SPDX 2.x `files` 배열의 원소 하나에 대응합니다.
/// 경로는 항상 `.`으로 시작하도록 정규화됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRecord {
    /// SPDX 식별자 (예: `SPDXRef-File-0`)
    pub spdx_id: Option<String>,
    /// 정규화된 상대 경로
    pub path: String,
    /// 내용 체크섬 목록
    pub checksums: Vec<Checksum>,
    /// 최종 판단된 라이선스
    pub license_concluded: Option<String>,
    /// 파일 내에서 발견된 라이선스 목록
    pub license_info_in_files: Vec<String>,
    /// 저작권 표기
    pub copyright_text: Option<String>,
}

impl FileRecord {
    /// 주어진 알고리즘의 체크섬 값을 반환합니다.
    pub fn checksum(&self, algorithm: ChecksumAlgorithm) -> Option<&str> {
        self.checksums
            .iter()
            .find(|c| c.algorithm == algorithm)
            .map(|c| c.value.as_str())
    }
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} checksums)", self.path, self.checksums.len())
    }
}

/// 패키지 외부 참조 (예: Package URL)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRef {
    /// 참조 분류 (예: `PACKAGE-MANAGER`)
    pub category: String,
    /// 참조 타입 (예: `purl`)
    pub ref_type: String,
    /// 참조 위치 (예: `pkg:cargo/serde@1.0.204`)
    pub locator: String,
}

/// 패키지 레코드
///
/// SPDX 2.x `packages` 배열의 원소 하나에 대응합니다.
/// `name`만 필수이며 나머지는 문서에 따라 비어 있을 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    /// SPDX 식별자
    pub spdx_id: Option<String>,
    /// 패키지 이름 (필수)
    pub name: String,
    /// 패키지 버전
    pub version: Option<String>,
    /// 다운로드 위치
    pub download_location: Option<String>,
    /// 공급자 (예: `Organization: Example Corp`)
    pub supplier: Option<String>,
    /// 최종 판단된 라이선스
    pub license_concluded: Option<String>,
    /// 선언된 라이선스
    pub license_declared: Option<String>,
    /// 저작권 표기
    pub copyright_text: Option<String>,
    /// 패키지 아카이브 체크섬 목록
    pub checksums: Vec<Checksum>,
    /// 외부 식별자 목록 (purl 등)
    pub external_refs: Vec<ExternalRef>,
    /// 패키지 검증 코드
    pub verification_code: Option<PackageVerificationCode>,
    /// 패키지에 포함된 파일의 SPDX 식별자 목록
    pub has_files: Vec<String>,
    /// 파일 분석 수행 여부
    pub files_analyzed: Option<bool>,
}

impl PackageRecord {
    /// 첫 번째 Package URL 외부 참조를 반환합니다.
    pub fn purl(&self) -> Option<&str> {
        self.external_refs
            .iter()
            .find(|r| r.ref_type == "purl")
            .map(|r| r.locator.as_str())
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// 관계 타입 (닫힌 열거형)
///
/// 알 수 없는 관계 타입 문자열은 구조적 파싱 에러입니다.
/// SPDX 2.x의 SCREAMING_SNAKE 표기와 3.0의 camelCase 표기를 모두
/// 받아들입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    /// CONTAINS
    Contains,
    /// DEPENDS_ON
    DependsOn,
    /// DESCRIBES
    Describes,
    /// DESCRIBED_BY
    DescribedBy,
    /// PREREQUISITE_FOR
    PrerequisiteFor,
    /// HAS_PREREQUISITE
    HasPrerequisite,
    /// PATCH_FOR
    PatchFor,
    /// PATCHED_BY
    PatchedBy,
    /// COPY_OF
    CopyOf,
    /// DYNAMIC_LINK
    DynamicLink,
    /// GENERATED_FROM
    GeneratedFrom,
    /// SPECIFICATION_FOR
    SpecificationFor,
    /// HAS_DECLARED_LICENSE
    HasDeclaredLicense,
    /// HAS_CONCLUDED_LICENSE
    HasConcludedLicense,
}

impl RelationshipType {
    /// 문자열에서 관계 타입을 파싱합니다.
    ///
    /// 알 수 없는 값은 `None`을 반환하며, 호출자가 값과 오프셋을 담은
    /// 구조적 에러로 처리합니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONTAINS" | "contains" => Some(Self::Contains),
            "DEPENDS_ON" | "dependsOn" => Some(Self::DependsOn),
            "DESCRIBES" | "describes" => Some(Self::Describes),
            "DESCRIBED_BY" | "describedBy" => Some(Self::DescribedBy),
            "PREREQUISITE_FOR" | "prerequisiteFor" => Some(Self::PrerequisiteFor),
            "HAS_PREREQUISITE" | "hasPrerequisite" => Some(Self::HasPrerequisite),
            "PATCH_FOR" | "patchFor" => Some(Self::PatchFor),
            "PATCHED_BY" | "patchedBy" => Some(Self::PatchedBy),
            "COPY_OF" | "copyOf" => Some(Self::CopyOf),
            "DYNAMIC_LINK" | "dynamicLink" => Some(Self::DynamicLink),
            "GENERATED_FROM" | "generatedFrom" => Some(Self::GeneratedFrom),
            "SPECIFICATION_FOR" | "specificationFor" => Some(Self::SpecificationFor),
            "HAS_DECLARED_LICENSE" | "hasDeclaredLicense" => Some(Self::HasDeclaredLicense),
            "HAS_CONCLUDED_LICENSE" | "hasConcludedLicense" => Some(Self::HasConcludedLicense),
            _ => None,
        }
    }

    /// SPDX 2.x 표기 (SCREAMING_SNAKE)를 반환합니다.
    pub fn as_spdx2(&self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::DependsOn => "DEPENDS_ON",
            Self::Describes => "DESCRIBES",
            Self::DescribedBy => "DESCRIBED_BY",
            Self::PrerequisiteFor => "PREREQUISITE_FOR",
            Self::HasPrerequisite => "HAS_PREREQUISITE",
            Self::PatchFor => "PATCH_FOR",
            Self::PatchedBy => "PATCHED_BY",
            Self::CopyOf => "COPY_OF",
            Self::DynamicLink => "DYNAMIC_LINK",
            Self::GeneratedFrom => "GENERATED_FROM",
            Self::SpecificationFor => "SPECIFICATION_FOR",
            Self::HasDeclaredLicense => "HAS_DECLARED_LICENSE",
            Self::HasConcludedLicense => "HAS_CONCLUDED_LICENSE",
        }
    }

    /// SPDX 3.0 표기 (camelCase)를 반환합니다.
    pub fn as_spdx3(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::DependsOn => "dependsOn",
            Self::Describes => "describes",
            Self::DescribedBy => "describedBy",
            Self::PrerequisiteFor => "prerequisiteFor",
            Self::HasPrerequisite => "hasPrerequisite",
            Self::PatchFor => "patchFor",
            Self::PatchedBy => "patchedBy",
            Self::CopyOf => "copyOf",
            Self::DynamicLink => "dynamicLink",
            Self::GeneratedFrom => "generatedFrom",
            Self::SpecificationFor => "specificationFor",
            Self::HasDeclaredLicense => "hasDeclaredLicense",
            Self::HasConcludedLicense => "hasConcludedLicense",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_spdx2())
    }
}

/// 관계 레코드
///
/// SPDX 2.x `relationships` 배열의 원소 하나에 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRecord {
    /// 출발 엘리먼트 SPDX 식별자
    pub spdx_element_id: String,
    /// 대상 엘리먼트 SPDX 식별자
    pub related_element_id: String,
    /// 대상이 다른 문서에 있을 때의 외부 문서 식별자
    /// (`DocumentRef-x:SPDXRef-y` 형식에서 분리)
    pub external_document_id: Option<String>,
    /// 관계 타입
    pub relationship_type: RelationshipType,
}

impl fmt::Display for RelationshipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.spdx_element_id, self.relationship_type, self.related_element_id
        )
    }
}

/// 외부 문서 참조 레코드
///
/// SPDX 2.x `externalDocumentRefs` 배열의 원소 하나에 대응합니다.
/// 세 필드 모두 필수이며 체크섬 알고리즘은 SHA-1이어야 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDocumentRef {
    /// 외부 문서 식별자 (예: `DocumentRef-other`)
    pub external_document_id: String,
    /// 외부 SPDX 문서 네임스페이스 URI
    pub spdx_document: String,
    /// 외부 문서 체크섬 (SHA-1)
    pub checksum: Checksum,
}

/// 문서 생성 정보
///
/// `created`는 RFC3339 타임스탬프로 파싱 가능해야 하며 `creators`는
/// 비어 있을 수 없습니다. 둘 중 하나라도 없으면 해당 객체에 대한
/// 구조적 파싱 에러입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationInfo {
    /// 생성 시각 (RFC3339)
    pub created: String,
    /// 생성 주체 목록 (`Tool: x`, `Organization: y`, `Person: z`)
    pub creators: Vec<String>,
}

/// 문서 메타데이터
///
/// 최상위 스칼라 필드를 모아 만든 타입화된 뷰입니다. 스트림이 모두
/// 소진된 뒤에만 완성되며, 인식되지 않은 필드는 `extra`에 원본 JSON
/// 값 그대로 보존됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMeta {
    /// SPDX 버전 문자열 (예: `SPDX-2.2`)
    pub spdx_version: Option<String>,
    /// 데이터 라이선스 (예: `CC0-1.0`)
    pub data_license: Option<String>,
    /// 문서 SPDX 식별자
    pub spdx_id: Option<String>,
    /// 문서 이름
    pub name: Option<String>,
    /// 문서 네임스페이스 URI
    pub document_namespace: Option<String>,
    /// 문서 생성 정보
    pub creation_info: Option<CreationInfo>,
    /// 문서가 기술하는 엘리먼트 식별자 목록
    pub document_describes: Vec<String>,
    /// 인식되지 않은 최상위 필드 (pass-through)
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// SBOM 직렬화 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SbomFormat {
    /// SPDX 2.3 JSON
    Spdx2,
    /// SPDX 3.0 JSON (`@context` + `@graph`)
    Spdx3,
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spdx2 => write!(f, "spdx-2"),
            Self::Spdx3 => write!(f, "spdx-3"),
        }
    }
}

impl SbomFormat {
    /// 문자열에서 SBOM 형식을 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spdx-2" | "spdx2" | "spdx-2.2" | "spdx-2.3" => Some(Self::Spdx2),
            "spdx-3" | "spdx3" | "spdx-3.0" => Some(Self::Spdx3),
            _ => None,
        }
    }
}

/// 생성된 SBOM 문서
///
/// 생성기가 만든 SBOM의 형식과 JSON 내용을 담습니다.
#[derive(Debug, Clone)]
pub struct SbomDocument {
    /// SBOM 형식
    pub format: SbomFormat,
    /// JSON 문자열 내용
    pub content: String,
    /// 포함된 엘리먼트 수 (파일 + 패키지 + 관계 + 외부 참조)
    pub element_count: usize,
}

impl fmt::Display for SbomDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SbomDocument(format={}, elements={})",
            self.format, self.element_count,
        )
    }
}

/// 생성기 입력 초안
///
/// 레코드 목록에서 SPDX 문서를 생성할 때 사용하는 입력 묶음입니다.
#[derive(Debug, Clone, Default)]
pub struct SbomDraft {
    /// 문서 이름
    pub name: String,
    /// 파일 레코드 목록
    pub files: Vec<FileRecord>,
    /// 패키지 레코드 목록
    pub packages: Vec<PackageRecord>,
    /// 관계 레코드 목록
    pub relationships: Vec<RelationshipRecord>,
    /// 외부 문서 참조 목록
    pub external_refs: Vec<ExternalDocumentRef>,
}

impl SbomDraft {
    /// 초안에 담긴 전체 엘리먼트 수를 반환합니다.
    pub fn element_count(&self) -> usize {
        self.files.len() + self.packages.len() + self.relationships.len() + self.external_refs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_algorithm_parse_variants() {
        assert_eq!(
            ChecksumAlgorithm::parse("SHA256"),
            Some(ChecksumAlgorithm::Sha256)
        );
        assert_eq!(
            ChecksumAlgorithm::parse("sha-256"),
            Some(ChecksumAlgorithm::Sha256)
        );
        assert_eq!(
            ChecksumAlgorithm::parse("sha256"),
            Some(ChecksumAlgorithm::Sha256)
        );
        assert_eq!(
            ChecksumAlgorithm::parse("SHA3-256"),
            Some(ChecksumAlgorithm::Sha3_256)
        );
        assert_eq!(
            ChecksumAlgorithm::parse("sha3_256"),
            Some(ChecksumAlgorithm::Sha3_256)
        );
        assert_eq!(ChecksumAlgorithm::parse("crc32"), None);
        assert_eq!(ChecksumAlgorithm::parse(""), None);
    }

    #[test]
    fn checksum_algorithm_display() {
        assert_eq!(ChecksumAlgorithm::Sha1.to_string(), "SHA1");
        assert_eq!(ChecksumAlgorithm::Sha3_256.to_string(), "SHA3-256");
    }

    #[test]
    fn checksum_algorithm_spdx3_names() {
        assert_eq!(ChecksumAlgorithm::Sha256.as_spdx3(), "sha256");
        assert_eq!(ChecksumAlgorithm::Blake3.as_spdx3(), "blake3");
    }

    #[test]
    fn verification_code_has_algorithm() {
        let code = PackageVerificationCode {
            checksums: vec![Checksum::new(ChecksumAlgorithm::Sha256, "abc")],
            excluded_files: vec![],
        };
        assert!(code.has_algorithm(ChecksumAlgorithm::Sha256));
        assert!(!code.has_algorithm(ChecksumAlgorithm::Sha1));
    }

    #[test]
    fn file_record_checksum_lookup() {
        let file = FileRecord {
            path: "./src/main.rs".to_owned(),
            checksums: vec![
                Checksum::new(ChecksumAlgorithm::Sha1, "aaa"),
                Checksum::new(ChecksumAlgorithm::Sha256, "bbb"),
            ],
            ..Default::default()
        };
        assert_eq!(file.checksum(ChecksumAlgorithm::Sha256), Some("bbb"));
        assert_eq!(file.checksum(ChecksumAlgorithm::Md5), None);
    }

    #[test]
    fn package_record_purl_lookup() {
        let package = PackageRecord {
            name: "serde".to_owned(),
            external_refs: vec![ExternalRef {
                category: "PACKAGE-MANAGER".to_owned(),
                ref_type: "purl".to_owned(),
                locator: "pkg:cargo/serde@1.0.204".to_owned(),
            }],
            ..Default::default()
        };
        assert_eq!(package.purl(), Some("pkg:cargo/serde@1.0.204"));
    }

    #[test]
    fn package_display() {
        let package = PackageRecord {
            name: "serde".to_owned(),
            version: Some("1.0.204".to_owned()),
            ..Default::default()
        };
        assert_eq!(package.to_string(), "serde@1.0.204");
    }

    #[test]
    fn relationship_type_parse_both_spellings() {
        assert_eq!(
            RelationshipType::parse("DEPENDS_ON"),
            Some(RelationshipType::DependsOn)
        );
        assert_eq!(
            RelationshipType::parse("dependsOn"),
            Some(RelationshipType::DependsOn)
        );
        assert_eq!(
            RelationshipType::parse("HAS_DECLARED_LICENSE"),
            Some(RelationshipType::HasDeclaredLicense)
        );
        assert_eq!(RelationshipType::parse("KNOWS_ABOUT"), None);
        assert_eq!(RelationshipType::parse("depends_on"), None);
    }

    #[test]
    fn relationship_type_roundtrip_names() {
        let t = RelationshipType::DescribedBy;
        assert_eq!(RelationshipType::parse(t.as_spdx2()), Some(t));
        assert_eq!(RelationshipType::parse(t.as_spdx3()), Some(t));
    }

    #[test]
    fn relationship_display() {
        let rel = RelationshipRecord {
            spdx_element_id: "SPDXRef-DOCUMENT".to_owned(),
            related_element_id: "SPDXRef-Package-a".to_owned(),
            external_document_id: None,
            relationship_type: RelationshipType::Describes,
        };
        assert_eq!(
            rel.to_string(),
            "SPDXRef-DOCUMENT DESCRIBES SPDXRef-Package-a"
        );
    }

    #[test]
    fn sbom_format_from_str_loose() {
        assert_eq!(SbomFormat::from_str_loose("spdx-2.3"), Some(SbomFormat::Spdx2));
        assert_eq!(SbomFormat::from_str_loose("SPDX3"), Some(SbomFormat::Spdx3));
        assert_eq!(SbomFormat::from_str_loose("cyclonedx"), None);
    }

    #[test]
    fn sbom_draft_element_count() {
        let draft = SbomDraft {
            name: "test".to_owned(),
            packages: vec![PackageRecord {
                name: "a".to_owned(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(draft.element_count(), 1);
    }
}
