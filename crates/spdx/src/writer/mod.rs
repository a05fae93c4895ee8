//! SPDX 문서 생성기 -- 레코드에서 JSON SBOM 생성
//!
//! 파서의 역방향입니다. 레코드 묶음([`SbomDraft`])에서 SPDX 2.3 또는
//! SPDX 3.0 JSON 문서를 생성하며, 주 용도는 라운드트립 테스트(생성한
//! 문서를 파서로 되읽어 필수 필드 동일성 검증)입니다.

pub mod spdx2;
pub mod spdx3;

use crate::error::SpdxParseError;
use crate::types::{SbomDocument, SbomDraft, SbomFormat};

/// SBOM 생성기
///
/// 형식을 선택해 [`SbomDraft`]를 JSON 문서로 직렬화합니다.
pub struct SbomWriter {
    format: SbomFormat,
}

impl SbomWriter {
    /// 주어진 형식의 생성기를 만듭니다.
    pub fn new(format: SbomFormat) -> Self {
        Self { format }
    }

    /// 초안에서 SBOM 문서를 생성합니다.
    pub fn generate(&self, draft: &SbomDraft) -> Result<SbomDocument, SpdxParseError> {
        match self.format {
            SbomFormat::Spdx2 => spdx2::generate(draft),
            SbomFormat::Spdx3 => spdx3::generate(draft),
        }
    }
}
