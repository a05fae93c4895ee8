//! SPDX 2.x JSON 파서 파사드
//!
//! [`Spdx2Parser`]는 `files` / `packages` / `relationships` /
//! `externalDocumentRefs`를 스트리밍 배열로, `creationInfo`를 즉시
//! 파싱하는 객체로 등록하고 나머지 최상위 필드는 메타데이터로
//! 수집합니다.
//!
//! # 호출 규약
//!
//! [`Spdx2Parser::next_section`]이 반환한 배열 섹션은 다음 호출 전에
//! 끝까지 소진해야 합니다. 이터레이터가 엔진을 가변으로 빌리므로
//! 중첩 호출은 컴파일되지 않고, 일부만 소비하고 버린 경우 다음
//! `next_section()`이 사용 에러를 반환합니다.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use crate::engine::{FieldHandler, RecordIter, SectionKind, StreamEngine};
use crate::entity::ParseContext;
use crate::error::SpdxParseError;
use crate::config::ParserOptions;
use crate::reader::JsonCursor;
use crate::types::{
    DocumentMeta, ExternalDocumentRef, FileRecord, PackageRecord, RelationshipRecord,
};

/// SPDX 2.x에서 스트리밍되는 최상위 배열 필드
const ARRAY_FIELDS: [(&str, FieldHandler); 4] = [
    ("files", FieldHandler::Files),
    ("packages", FieldHandler::Packages),
    ("relationships", FieldHandler::Relationships),
    ("externalDocumentRefs", FieldHandler::ExternalRefs),
];

/// 필수 최상위 필드 (`require_root_fields`가 켜져 있을 때)
const REQUIRED_FIELDS: [&str; 3] = ["files", "packages", "relationships"];

/// `next_section()`이 반환하는 섹션
pub enum Spdx2Section<'a, R: Read> {
    /// `files` 배열 -- 파일 레코드 스트림
    Files(RecordIter<'a, R, FileRecord>),
    /// `packages` 배열 -- 패키지 레코드 스트림
    Packages(RecordIter<'a, R, PackageRecord>),
    /// `relationships` 배열 -- 관계 레코드 스트림
    Relationships(RecordIter<'a, R, RelationshipRecord>),
    /// `externalDocumentRefs` 배열 -- 외부 문서 참조 스트림
    ExternalRefs(RecordIter<'a, R, ExternalDocumentRef>),
    /// 루트 객체가 닫힘 (터미널, 멱등)
    Finished,
}

/// 완전히 수집된 SPDX 2.x 문서
///
/// 스트리밍이 필요 없는 호출자를 위한 편의 결과물입니다.
#[derive(Debug, Clone, Default)]
pub struct Spdx2Document {
    /// 파일 레코드 목록
    pub files: Vec<FileRecord>,
    /// 패키지 레코드 목록
    pub packages: Vec<PackageRecord>,
    /// 관계 레코드 목록
    pub relationships: Vec<RelationshipRecord>,
    /// 외부 문서 참조 목록
    pub external_refs: Vec<ExternalDocumentRef>,
    /// 문서 메타데이터
    pub metadata: DocumentMeta,
}

/// SPDX 2.x JSON 스트리밍 파서
pub struct Spdx2Parser<R: Read> {
    engine: StreamEngine<R>,
    metadata: Option<DocumentMeta>,
}

impl<R: Read> Spdx2Parser<R> {
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

        let mut handlers: BTreeMap<String, FieldHandler> = ARRAY_FIELDS
            .iter()
            .map(|(name, handler)| ((*name).to_owned(), *handler))
            .collect();
        handlers.insert("creationInfo".to_owned(), FieldHandler::CreationInfo);
        // 호출자 지정 생략 필드가 기본 핸들러를 덮어쓴다
        for name in &options.skipped_properties {
            handlers.insert(name.clone(), FieldHandler::Skip);
        }

        let required = if options.require_root_fields {
            REQUIRED_FIELDS.iter().map(|s| (*s).to_owned()).collect()
        } else {
            Vec::new()
        };

        let ctx = ParseContext {
            required_file_algorithms: options.required_file_algorithms.clone(),
        };

        Ok(Self {
            engine: StreamEngine::new(cursor, handlers, required, ctx),
            metadata: None,
        })
    }

    /// 다음 명시적 섹션까지 전진합니다.
    ///
    /// 반환된 배열 섹션은 다음 호출 전에 끝까지 소진해야 합니다.
    /// 터미널 도달 후의 호출은 항상 [`Spdx2Section::Finished`]를
    /// 반환합니다.
    pub fn next_section(&mut self) -> Result<Spdx2Section<'_, R>, SpdxParseError> {
        match self.engine.advance()? {
            SectionKind::Files => Ok(Spdx2Section::Files(self.engine.files()?)),
            SectionKind::Packages => Ok(Spdx2Section::Packages(self.engine.packages()?)),
            SectionKind::Relationships => {
                Ok(Spdx2Section::Relationships(self.engine.relationships()?))
            }
            SectionKind::ExternalRefs => {
                Ok(Spdx2Section::ExternalRefs(self.engine.external_refs()?))
            }
            SectionKind::Graph => Err(SpdxParseError::Usage(
                "'@graph' sections are not produced by the spdx 2.x parser".to_owned(),
            )),
            SectionKind::Finished => {
                self.finalize()?;
                Ok(Spdx2Section::Finished)
            }
        }
    }

    /// 터미널 전이 시 메타데이터를 타입화된 형태로 굳힙니다.
    fn finalize(&mut self) -> Result<(), SpdxParseError> {
        if self.metadata.is_none() {
            let raw = self.engine.take_metadata();
            let creation_info = self.engine.take_creation_info();
            let meta = super::coerce_metadata(raw, creation_info, self.engine.offset())?;
            self.metadata = Some(meta);
        }
        Ok(())
    }

    /// 파싱 완료 후 문서 메타데이터를 반환합니다.
    ///
    /// # Errors
    ///
    /// 터미널 상태 도달 전에 부르면 [`SpdxParseError::Usage`]. 전체
    /// 패스를 마쳐야만 모든 스칼라 필드가 관찰되었음이 보장됩니다.
    pub fn metadata(&self) -> Result<&DocumentMeta, SpdxParseError> {
        self.metadata.as_ref().ok_or_else(|| {
            SpdxParseError::Usage(
                "metadata requested before the document was fully parsed".to_owned(),
            )
        })
    }

    /// 지금까지 관찰한 최상위 필드 이름 집합을 반환합니다.
    pub fn observed_fields(&self) -> &BTreeSet<String> {
        self.engine.observed_fields()
    }

    /// 현재 스트림 바이트 오프셋을 반환합니다.
    pub fn offset(&self) -> u64 {
        self.engine.offset()
    }

    /// 문서 전체를 수집해 반환합니다 (스트리밍이 필요 없는 경우).
    pub fn collect_document(&mut self) -> Result<Spdx2Document, SpdxParseError> {
        let mut document = Spdx2Document::default();
        loop {
            match self.next_section()? {
                Spdx2Section::Files(iter) => {
                    for file in iter {
                        document.files.push(file?);
                    }
                }
                Spdx2Section::Packages(iter) => {
                    for package in iter {
                        document.packages.push(package?);
                    }
                }
                Spdx2Section::Relationships(iter) => {
                    for relationship in iter {
                        document.relationships.push(relationship?);
                    }
                }
                Spdx2Section::ExternalRefs(iter) => {
                    for external_ref in iter {
                        document.external_refs.push(external_ref?);
                    }
                }
                Spdx2Section::Finished => break,
            }
        }
        document.metadata = self.metadata()?.clone();
        Ok(document)
    }
}
