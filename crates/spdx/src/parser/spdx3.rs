//! SPDX 3.0 JSON 파서 파사드
//!
//! SPDX 3.0 문서는 `@context`와, 타입 판별자를 가진 이질적 엘리먼트의
//! 단일 `@graph` 배열로 구성됩니다. [`Spdx3Parser`]는 `@graph`를
//! 스트리밍 배열로 등록하고 `@context` 및 그 밖의 최상위 필드를
//! 메타데이터로 수집합니다.
//!
//! 컴플라이언스 표준(NTIA)이 설정되면 각 그래프 엘리먼트가 분류될
//! 때마다 표준별 술어 검사가 적용되고, 위반은
//! [`InvalidElementInfo`] 집합에 누적됩니다. 파싱은 중단되지 않으며,
//! 문서 수준 불변식("유효한 루트 정확히 하나")은 터미널 상태에서
//! 평가됩니다.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use serde_json::Value;

use crate::compliance::{ComplianceStandard, InvalidElementInfo, NtiaVerifier};
use crate::config::ParserOptions;
use crate::engine::{FieldHandler, GraphIter, SectionKind, StreamEngine};
use crate::entity::ParseContext;
use crate::error::SpdxParseError;
use crate::graph::GraphElement;
use crate::reader::JsonCursor;

/// SPDX 3.0 문서 메타데이터
///
/// `@context`와 인식되지 않은 최상위 필드의 타입화된 뷰입니다.
/// 문서 자체의 서술 정보는 `@graph`의 `SpdxDocument` 엘리먼트에
/// 담깁니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spdx3Metadata {
    /// `@context` 값 (문자열 또는 배열)
    pub context: Option<Value>,
    /// 인식되지 않은 최상위 필드 (pass-through)
    pub extra: BTreeMap<String, Value>,
}

/// `next_section()`이 반환하는 섹션
pub enum Spdx3Section<'a, R: Read> {
    /// `@graph` 배열 -- 그래프 엘리먼트 스트림
    Graph(GraphStream<'a, R>),
    /// 루트 객체가 닫힘 (터미널, 멱등)
    Finished,
}

/// `@graph` 배열 위의 단일 패스 엘리먼트 스트림
///
/// 컴플라이언스 표준이 설정되어 있으면 엘리먼트가 나갈 때마다
/// 검증기에 관찰시킵니다.
pub struct GraphStream<'a, R: Read> {
    inner: GraphIter<'a, R>,
    ntia: Option<&'a mut NtiaVerifier>,
}

impl<R: Read> Iterator for GraphStream<'_, R> {
    type Item = Result<GraphElement, SpdxParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if let Ok(element) = &item {
            if let Some(verifier) = self.ntia.as_mut() {
                verifier.observe(element);
            }
        }
        Some(item)
    }
}

/// SPDX 3.0 JSON 스트리밍 파서
pub struct Spdx3Parser<R: Read> {
    engine: StreamEngine<R>,
    verifier: NtiaVerifier,
    compliance: Option<ComplianceStandard>,
    metadata: Option<Spdx3Metadata>,
}

impl<R: Read> Spdx3Parser<R> {
    /// 기본 옵션으로 파서를 생성합니다.
    pub fn new(reader: R) -> Result<Self, SpdxParseError> {
        Self::with_options(reader, &ParserOptions::default())
    }

    /// 주어진 옵션으로 파서를 생성합니다.
    ///
    /// # Errors
    ///
    /// 잘못된 옵션(0 크기 버퍼 등)은 [`SpdxParseError::Config`]로 즉시
    /// 보고됩니다.
    pub fn with_options(reader: R, options: &ParserOptions) -> Result<Self, SpdxParseError> {
        options.validate()?;
        let cursor = JsonCursor::new(reader, options.buffer_size, options.max_buffer_size)?;

        let mut handlers: BTreeMap<String, FieldHandler> = BTreeMap::new();
        handlers.insert("@graph".to_owned(), FieldHandler::Graph);
        for name in &options.skipped_properties {
            handlers.insert(name.clone(), FieldHandler::Skip);
        }

        let required = if options.require_root_fields {
            vec!["@graph".to_owned()]
        } else {
            Vec::new()
        };

        let ctx = ParseContext {
            required_file_algorithms: options.required_file_algorithms.clone(),
        };

        Ok(Self {
            engine: StreamEngine::new(cursor, handlers, required, ctx),
            verifier: NtiaVerifier::new(),
            compliance: options.compliance,
            metadata: None,
        })
    }

    /// 설정된 컴플라이언스 표준을 반환합니다.
    pub fn compliance(&self) -> Option<ComplianceStandard> {
        self.compliance
    }

    /// 다음 명시적 섹션까지 전진합니다.
    ///
    /// 반환된 그래프 섹션은 다음 호출 전에 끝까지 소진해야 합니다.
    /// 터미널 도달 후의 호출은 항상 [`Spdx3Section::Finished`]를
    /// 반환합니다.
    pub fn next_section(&mut self) -> Result<Spdx3Section<'_, R>, SpdxParseError> {
        match self.engine.advance()? {
            SectionKind::Graph => {
                let ntia = if self.compliance.is_some() {
                    Some(&mut self.verifier)
                } else {
                    None
                };
                Ok(Spdx3Section::Graph(GraphStream {
                    inner: self.engine.graph()?,
                    ntia,
                }))
            }
            SectionKind::Finished => {
                self.finalize()?;
                Ok(Spdx3Section::Finished)
            }
            other => Err(SpdxParseError::Usage(format!(
                "unexpected section {other:?} for the spdx 3.0 parser"
            ))),
        }
    }

    /// 터미널 전이 시 메타데이터를 굳히고 문서 수준 검사를 평가합니다.
    fn finalize(&mut self) -> Result<(), SpdxParseError> {
        if self.metadata.is_some() {
            return Ok(());
        }
        if self.compliance.is_some() {
            self.verifier.finalize();
        }
        let mut metadata = Spdx3Metadata::default();
        for (key, value) in self.engine.take_metadata() {
            if key == "@context" {
                metadata.context = Some(value);
            } else {
                metadata.extra.insert(key, value);
            }
        }
        self.metadata = Some(metadata);
        Ok(())
    }

    /// 파싱 완료 후 문서 메타데이터를 반환합니다.
    ///
    /// # Errors
    ///
    /// 터미널 상태 도달 전에 부르면 [`SpdxParseError::Usage`].
    pub fn metadata(&self) -> Result<&Spdx3Metadata, SpdxParseError> {
        self.metadata.as_ref().ok_or_else(|| {
            SpdxParseError::Usage(
                "metadata requested before the document was fully parsed".to_owned(),
            )
        })
    }

    /// 파싱 완료 후 컴플라이언스 위반 엘리먼트 집합을 반환합니다.
    ///
    /// 컴플라이언스 표준이 설정되지 않았으면 빈 집합입니다.
    ///
    /// # Errors
    ///
    /// 터미널 상태 도달 전에 부르면 [`SpdxParseError::Usage`].
    pub fn invalid_elements(&self) -> Result<&BTreeSet<InvalidElementInfo>, SpdxParseError> {
        if self.metadata.is_none() {
            return Err(SpdxParseError::Usage(
                "invalid elements requested before the document was fully parsed".to_owned(),
            ));
        }
        Ok(self.verifier.invalid_elements())
    }

    /// 지금까지 관찰한 최상위 필드 이름 집합을 반환합니다.
    pub fn observed_fields(&self) -> &BTreeSet<String> {
        self.engine.observed_fields()
    }

    /// 문서 전체를 수집해 반환합니다 (스트리밍이 필요 없는 경우).
    pub fn collect_elements(&mut self) -> Result<Vec<GraphElement>, SpdxParseError> {
        let mut elements = Vec::new();
        loop {
            match self.next_section()? {
                Spdx3Section::Graph(stream) => {
                    for element in stream {
                        elements.push(element?);
                    }
                }
                Spdx3Section::Finished => break,
            }
        }
        Ok(elements)
    }
}
