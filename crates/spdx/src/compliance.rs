//! 컴플라이언스 표준 검사 -- NTIA 최소 필드 집합
//!
//! 컴플라이언스 위반은 예외가 아니라 수집 데이터입니다. 비준수 문서도
//! 문법적으로는 유효한, 완전히 파싱 가능한 SBOM이므로 위반은
//! [`InvalidElementInfo`] 집합에 누적되고 파싱은 계속됩니다.
//! 워크플로를 실패시킬지는 호출자가 결정합니다.
//!
//! # NTIA 검사 규칙
//!
//! - 엘리먼트 단위: `software_File` / `software_Package`는 SHA-256
//!   체크섬을 포함한 검증 코드(`verifiedUsing`)를 가져야 합니다.
//! - 문서 단위: 유효한 `SpdxDocument` + `CreationInfo` 쌍(문서의
//!   `creationInfo` 참조가 실제 CreationInfo 엘리먼트로 해석됨)이
//!   정확히 하나 있어야 합니다. 0개 또는 2개 이상이면 문제가 되는
//!   루트마다 식별 엔트리가 수집됩니다.

use std::collections::BTreeSet;
use std::fmt;

use tracing::warn;

use crate::graph::GraphElement;
use crate::types::ChecksumAlgorithm;

/// 컴플라이언스 표준 선택자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceStandard {
    /// NTIA 최소 필드 집합
    Ntia,
}

impl ComplianceStandard {
    /// 문자열에서 표준을 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ntia" => Some(Self::Ntia),
            _ => None,
        }
    }
}

impl fmt::Display for ComplianceStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ntia => write!(f, "NTIA"),
        }
    }
}

/// NTIA 위반 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NtiaViolation {
    /// 파일/패키지의 검증 코드에 SHA-256 체크섬이 없음
    MissingSha256VerificationCode,
    /// SpdxDocument의 creationInfo 참조가 없거나 해석되지 않음
    InvalidCreationInfoReference,
    /// 유효한 SpdxDocument + CreationInfo 루트가 하나도 없음
    MissingDocumentRoot,
    /// 유효한 문서 루트가 둘 이상
    DuplicateDocumentRoot,
}

impl fmt::Display for NtiaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSha256VerificationCode => {
                write!(f, "verification code missing SHA-256 checksum")
            }
            Self::InvalidCreationInfoReference => {
                write!(f, "creation info reference missing or unresolved")
            }
            Self::MissingDocumentRoot => {
                write!(f, "no valid spdx document root present")
            }
            Self::DuplicateDocumentRoot => {
                write!(f, "more than one valid spdx document root present")
            }
        }
    }
}

/// 컴플라이언스 검사를 통과하지 못한 엘리먼트 식별 정보
///
/// 파싱을 중단시키지 않고 집합에 누적됩니다. `element_id`가 없는
/// 엔트리는 특정 엘리먼트가 아닌 문서 수준 위반(예: 루트 부재)입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvalidElementInfo {
    /// 위반 엘리먼트의 SPDX 식별자 (문서 수준 위반이면 None)
    pub element_id: Option<String>,
    /// 엘리먼트 타입 판별자
    pub element_type: String,
    /// 위반 종류
    pub violation: NtiaViolation,
}

impl fmt::Display for InvalidElementInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element_id {
            Some(id) => write!(f, "{} ({}): {}", id, self.element_type, self.violation),
            None => write!(f, "({}): {}", self.element_type, self.violation),
        }
    }
}

/// NTIA 검증기
///
/// 그래프 엘리먼트가 분류될 때마다 [`NtiaVerifier::observe`]로 전달되고,
/// 터미널 상태에서 [`NtiaVerifier::finalize`]가 문서 수준 불변식을
/// 평가합니다.
#[derive(Debug, Default)]
pub struct NtiaVerifier {
    invalid: BTreeSet<InvalidElementInfo>,
    /// (문서 spdxId, creationInfo 참조)
    documents: Vec<(String, Option<String>)>,
    creation_ids: BTreeSet<String>,
    finalized: bool,
}

impl NtiaVerifier {
    /// 새 검증기를 만듭니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 그래프 엘리먼트 하나를 관찰하고 엘리먼트 단위 규칙을 적용합니다.
    pub fn observe(&mut self, element: &GraphElement) {
        match element {
            GraphElement::File(file) => {
                if !file
                    .verified_using
                    .iter()
                    .any(|c| c.algorithm == ChecksumAlgorithm::Sha256)
                {
                    warn!(spdx_id = %file.spdx_id, "file fails ntia verification code check");
                    self.invalid.insert(InvalidElementInfo {
                        element_id: Some(file.spdx_id.clone()),
                        element_type: "software_File".to_owned(),
                        violation: NtiaViolation::MissingSha256VerificationCode,
                    });
                }
            }
            GraphElement::Package(package) => {
                if !package
                    .verified_using
                    .iter()
                    .any(|c| c.algorithm == ChecksumAlgorithm::Sha256)
                {
                    warn!(spdx_id = %package.spdx_id, "package fails ntia verification code check");
                    self.invalid.insert(InvalidElementInfo {
                        element_id: Some(package.spdx_id.clone()),
                        element_type: "software_Package".to_owned(),
                        violation: NtiaViolation::MissingSha256VerificationCode,
                    });
                }
            }
            GraphElement::SpdxDocument(doc) => {
                self.documents
                    .push((doc.spdx_id.clone(), doc.creation_info.clone()));
            }
            GraphElement::CreationInfo(info) => {
                self.creation_ids.insert(info.spdx_id.clone());
            }
            GraphElement::Relationship(_) | GraphElement::ExternalMap(_) => {}
        }
    }

    /// 문서 수준 불변식을 평가합니다. 여러 번 불러도 한 번만 수행됩니다.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        let mut valid_roots = Vec::new();
        for (id, creation_ref) in &self.documents {
            let resolved = creation_ref
                .as_ref()
                .is_some_and(|r| self.creation_ids.contains(r));
            if resolved {
                valid_roots.push(id.clone());
            } else {
                self.invalid.insert(InvalidElementInfo {
                    element_id: Some(id.clone()),
                    element_type: "SpdxDocument".to_owned(),
                    violation: NtiaViolation::InvalidCreationInfoReference,
                });
            }
        }

        if valid_roots.is_empty() {
            warn!("document has no valid spdx document root");
            self.invalid.insert(InvalidElementInfo {
                element_id: None,
                element_type: "SpdxDocument".to_owned(),
                violation: NtiaViolation::MissingDocumentRoot,
            });
        } else if valid_roots.len() > 1 {
            warn!(count = valid_roots.len(), "document has multiple valid roots");
            for id in valid_roots {
                self.invalid.insert(InvalidElementInfo {
                    element_id: Some(id),
                    element_type: "SpdxDocument".to_owned(),
                    violation: NtiaViolation::DuplicateDocumentRoot,
                });
            }
        }
    }

    /// 지금까지 수집된 위반 엘리먼트 집합을 반환합니다.
    pub fn invalid_elements(&self) -> &BTreeSet<InvalidElementInfo> {
        &self.invalid
    }
}
