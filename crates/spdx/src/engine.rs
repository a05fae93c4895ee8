//! 루트 디스패처 + 대용량 문서 엔진
//!
//! [`StreamEngine`]은 최상위 프로퍼티 이름 -> 핸들러 맵으로 구성되어
//! 루트 객체를 필드 단위로 전진합니다.
//!
//! - 배열 핸들러가 등록된 필드: [`StreamEngine::advance`]가 해당
//!   [`SectionKind`]를 반환하고, 호출자는 대응하는 이터레이터
//!   (`files()`, `packages()`, ...)를 받아 끝(`]`)까지 소진해야 합니다.
//!   소진 전에 다시 `advance()`를 부르면 [`SpdxParseError::Usage`]가
//!   됩니다 (릴리스 빌드 포함).
//! - `Skip` 핸들러: 값을 통째로 소비해 버리고 제어를 돌려주지 않고
//!   다음 필드로 진행합니다.
//! - 등록되지 않은 필드: 값 전체를 읽어 원본 JSON 그대로 메타데이터
//!   맵에 수집합니다.
//!
//! 루트 객체가 닫히면 필수 최상위 필드 관찰 여부를 검증한 뒤 비가역
//! `Finished` 상태로 전이합니다. 이후의 `advance()`는 항상
//! `Finished`를 반환합니다 (멱등).

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::marker::PhantomData;

use tracing::debug;

use crate::entity::{EntityRecord, ParseContext};
use crate::error::SpdxParseError;
use crate::graph::{self, GraphElement};
use crate::reader::JsonCursor;
use crate::types::CreationInfo;

/// 최상위 필드 핸들러
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldHandler {
    /// `files` 배열 스트리밍
    Files,
    /// `packages` 배열 스트리밍
    Packages,
    /// `relationships` 배열 스트리밍
    Relationships,
    /// `externalDocumentRefs` 배열 스트리밍
    ExternalRefs,
    /// `@graph` 배열 스트리밍
    Graph,
    /// `creationInfo` 객체를 즉시 파싱해 보관
    CreationInfo,
    /// 값을 소비해 버림 (호출자 지정 생략 필드)
    Skip,
}

/// `advance()`가 반환하는 명시적 섹션 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// `files` 배열이 열림
    Files,
    /// `packages` 배열이 열림
    Packages,
    /// `relationships` 배열이 열림
    Relationships,
    /// `externalDocumentRefs` 배열이 열림
    ExternalRefs,
    /// `@graph` 배열이 열림
    Graph,
    /// 루트 객체가 닫힘 (터미널, 멱등)
    Finished,
}

/// 엔진 상태 기계: NotStarted -> Iterating -> Finished (비가역)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    NotStarted,
    Iterating,
    Finished,
}

/// 대용량 문서 스트리밍 엔진
///
/// 파스 1회 동안 바이트 버퍼와 토큰 리더를 배타적으로 소유합니다.
/// 단일 스레드 pull 기반이며 내부 태스크가 없습니다.
pub struct StreamEngine<R: Read> {
    cursor: JsonCursor<R>,
    handlers: BTreeMap<String, FieldHandler>,
    required_fields: Vec<String>,
    ctx: ParseContext,
    state: EngineState,
    first_field: bool,
    /// 배열 섹션이 열렸지만 아직 이터레이터를 받아가지 않음
    pending: Option<SectionKind>,
    /// 이터레이터가 나가 있고 아직 `]`를 소비하지 않음
    array_open: bool,
    observed: BTreeSet<String>,
    metadata: BTreeMap<String, serde_json::Value>,
    creation_info: Option<CreationInfo>,
}

impl<R: Read> StreamEngine<R> {
    /// 핸들러 맵과 필수 필드 목록으로 엔진을 만듭니다.
    pub(crate) fn new(
        cursor: JsonCursor<R>,
        handlers: BTreeMap<String, FieldHandler>,
        required_fields: Vec<String>,
        ctx: ParseContext,
    ) -> Self {
        Self {
            cursor,
            handlers,
            required_fields,
            ctx,
            state: EngineState::NotStarted,
            first_field: true,
            pending: None,
            array_open: false,
            observed: BTreeSet::new(),
            metadata: BTreeMap::new(),
            creation_info: None,
        }
    }

    /// 현재 스트림 바이트 오프셋을 반환합니다.
    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    /// 지금까지 관찰한 최상위 필드 이름 집합을 반환합니다.
    pub fn observed_fields(&self) -> &BTreeSet<String> {
        &self.observed
    }

    /// 수집된 원본 메타데이터 맵을 꺼냅니다.
    pub(crate) fn take_metadata(&mut self) -> BTreeMap<String, serde_json::Value> {
        std::mem::take(&mut self.metadata)
    }

    /// 파싱된 `creationInfo`를 꺼냅니다.
    pub(crate) fn take_creation_info(&mut self) -> Option<CreationInfo> {
        self.creation_info.take()
    }

    /// 다음 명시적 섹션까지 전진합니다.
    ///
    /// `Skip` 필드와 메타데이터 필드는 내부에서 소비하고, 배열
    /// 핸들러가 등록된 필드를 만나면 `[`까지 소비한 뒤 해당
    /// [`SectionKind`]를 반환합니다. 루트 객체가 닫히면 필수 필드를
    /// 검증하고 `Finished`를 반환하며, 이후 호출도 항상 `Finished`
    /// 입니다.
    ///
    /// # Errors
    ///
    /// 직전 배열 섹션이 소진되지 않았으면 [`SpdxParseError::Usage`].
    pub fn advance(&mut self) -> Result<SectionKind, SpdxParseError> {
        if self.pending.is_some() || self.array_open {
            return Err(SpdxParseError::Usage(
                "previous array section was not fully drained before advancing".to_owned(),
            ));
        }
        match self.state {
            EngineState::Finished => return Ok(SectionKind::Finished),
            EngineState::NotStarted => {
                self.cursor.expect_object_start()?;
                self.state = EngineState::Iterating;
                self.first_field = true;
            }
            EngineState::Iterating => {}
        }
        loop {
            let Some(name) = self.cursor.next_object_key(self.first_field)? else {
                self.finish()?;
                return Ok(SectionKind::Finished);
            };
            self.first_field = false;
            self.observed.insert(name.clone());
            match self.handlers.get(name.as_str()).copied() {
                Some(FieldHandler::Skip) => {
                    debug!(field = %name, "discarding skipped top-level field");
                    self.cursor.skip_value()?;
                }
                Some(FieldHandler::CreationInfo) => {
                    let info = CreationInfo::parse_object(&mut self.cursor, &self.ctx)?;
                    self.creation_info = Some(info);
                }
                Some(FieldHandler::Files) => return self.open_array(SectionKind::Files, name),
                Some(FieldHandler::Packages) => {
                    return self.open_array(SectionKind::Packages, name);
                }
                Some(FieldHandler::Relationships) => {
                    return self.open_array(SectionKind::Relationships, name);
                }
                Some(FieldHandler::ExternalRefs) => {
                    return self.open_array(SectionKind::ExternalRefs, name);
                }
                Some(FieldHandler::Graph) => return self.open_array(SectionKind::Graph, name),
                None => {
                    debug!(field = %name, "collecting top-level metadata field");
                    let value = self.cursor.read_value()?;
                    self.metadata.insert(name, value);
                }
            }
        }
    }

    fn open_array(
        &mut self,
        kind: SectionKind,
        name: String,
    ) -> Result<SectionKind, SpdxParseError> {
        debug!(field = %name, "streaming top-level array field");
        self.cursor.expect_array_start()?;
        self.pending = Some(kind);
        Ok(kind)
    }

    /// 루트 객체 닫힘 처리: 필수 필드 검증 + 후행 내용 검사 + 종료 전이
    fn finish(&mut self) -> Result<(), SpdxParseError> {
        let missing: Vec<&str> = self
            .required_fields
            .iter()
            .filter(|field| !self.observed.contains(field.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(SpdxParseError::Structural {
                offset: self.cursor.offset(),
                reason: format!("missing required top-level fields: {}", missing.join(", ")),
            });
        }
        self.cursor.expect_end_of_stream()?;
        self.state = EngineState::Finished;
        Ok(())
    }

    /// `advance()`가 예고한 섹션의 소유권을 이터레이터로 넘깁니다.
    fn claim(&mut self, kind: SectionKind) -> Result<(), SpdxParseError> {
        if self.pending != Some(kind) {
            return Err(SpdxParseError::Usage(format!(
                "section iterator requested out of order (pending: {:?})",
                self.pending
            )));
        }
        self.pending = None;
        self.array_open = true;
        Ok(())
    }

    /// `files` 배열의 레코드 이터레이터를 반환합니다.
    pub fn files(&mut self) -> Result<RecordIter<'_, R, crate::types::FileRecord>, SpdxParseError> {
        self.claim(SectionKind::Files)?;
        Ok(RecordIter::new(self))
    }

    /// `packages` 배열의 레코드 이터레이터를 반환합니다.
    pub fn packages(
        &mut self,
    ) -> Result<RecordIter<'_, R, crate::types::PackageRecord>, SpdxParseError> {
        self.claim(SectionKind::Packages)?;
        Ok(RecordIter::new(self))
    }

    /// `relationships` 배열의 레코드 이터레이터를 반환합니다.
    pub fn relationships(
        &mut self,
    ) -> Result<RecordIter<'_, R, crate::types::RelationshipRecord>, SpdxParseError> {
        self.claim(SectionKind::Relationships)?;
        Ok(RecordIter::new(self))
    }

    /// `externalDocumentRefs` 배열의 레코드 이터레이터를 반환합니다.
    pub fn external_refs(
        &mut self,
    ) -> Result<RecordIter<'_, R, crate::types::ExternalDocumentRef>, SpdxParseError> {
        self.claim(SectionKind::ExternalRefs)?;
        Ok(RecordIter::new(self))
    }

    /// `@graph` 배열의 엘리먼트 이터레이터를 반환합니다.
    pub fn graph(&mut self) -> Result<GraphIter<'_, R>, SpdxParseError> {
        self.claim(SectionKind::Graph)?;
        Ok(GraphIter {
            engine: self,
            first: true,
            done: false,
        })
    }
}

/// 열린 배열 섹션 위의 단일 패스 레코드 이터레이터
///
/// 엔진을 가변으로 빌리므로, 이 이터레이터가 살아 있는 동안에는 다음
/// 섹션을 요청할 수 없습니다 (대여 검사기가 중첩 호출을 차단).
/// 배열 끝 `]`를 소비하기 전에 버리면 엔진은 다음 `advance()`에서
/// 사용 에러를 반환합니다.
pub struct RecordIter<'a, R: Read, T: EntityRecord> {
    engine: &'a mut StreamEngine<R>,
    first: bool,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, R: Read, T: EntityRecord> RecordIter<'a, R, T> {
    fn new(engine: &'a mut StreamEngine<R>) -> Self {
        Self {
            engine,
            first: true,
            done: false,
            _marker: PhantomData,
        }
    }
}

impl<R: Read, T: EntityRecord> Iterator for RecordIter<'_, R, T> {
    type Item = Result<T, SpdxParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let has_element = match self.engine.cursor.array_next_element(self.first) {
            Ok(has) => has,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if !has_element {
            self.done = true;
            self.engine.array_open = false;
            return None;
        }
        self.first = false;
        match T::parse_object(&mut self.engine.cursor, &self.engine.ctx) {
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// 열린 `@graph` 배열 위의 단일 패스 엘리먼트 이터레이터
pub struct GraphIter<'a, R: Read> {
    engine: &'a mut StreamEngine<R>,
    first: bool,
    done: bool,
}

impl<R: Read> Iterator for GraphIter<'_, R> {
    type Item = Result<GraphElement, SpdxParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let has_element = match self.engine.cursor.array_next_element(self.first) {
            Ok(has) => has,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if !has_element {
            self.done = true;
            self.engine.array_open = false;
            return None;
        }
        self.first = false;
        match graph::parse_element(&mut self.engine.cursor) {
            Ok(element) => Some(Ok(element)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
