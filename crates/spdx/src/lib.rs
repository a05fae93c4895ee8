#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 타입 (`SpdxParseError`)
//! - [`config`]: 파서 옵션 (`ParserOptions`, builder)
//! - [`types`]: 도메인 타입 (`FileRecord`, `PackageRecord`, `RelationshipRecord`, ...)
//! - [`util`]: 타임스탬프 검증/생성, 경로 정규화
//! - [`reader`]: 바이트 커서 (`JsonCursor`, 재개 가능한 토큰 읽기)
//! - [`entity`]: 엔티티 객체 파서 (`EntityRecord` trait, 파일/패키지/관계/...)
//! - [`graph`]: SPDX 3.0 그래프 엘리먼트 (`GraphElement` 태그 유니언)
//! - [`engine`]: 루트 디스패처 + 대용량 문서 엔진 (`StreamEngine`)
//! - [`parser`]: 형식별 파사드 (`Spdx2Parser`, `Spdx3Parser`)
//! - [`compliance`]: NTIA 검사 (`NtiaVerifier`, `InvalidElementInfo`)
//! - [`writer`]: SPDX 2.3 / 3.0 JSON 생성 (`SbomWriter`, 라운드트립용)
//!
//! # Architecture
//!
//! ```text
//! bytes --> JsonCursor --> StreamEngine --> Spdx2Parser / Spdx3Parser
//!              |                |                     |
//!        (refill + grow)  entity parsers        NtiaVerifier
//!                               |                     |
//!                      records / elements      InvalidElementInfo
//!                               |
//!                      lazy iterators --> caller (pull)
//! ```
//!
//! 데이터는 한 방향으로만 흐릅니다: 바이트 -> 토큰 -> 엔티티 레코드 ->
//! (a) 호출자에게 넘기는 타입화된 스트림 또는 (b) 파싱 완료 후 읽는
//! 메타데이터.

pub mod compliance;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod graph;
pub mod parser;
pub mod reader;
pub mod types;
pub mod util;
pub mod writer;

// --- Public API Re-exports ---

// Parser facades
pub use parser::spdx2::{Spdx2Document, Spdx2Parser, Spdx2Section};
pub use parser::spdx3::{GraphStream, Spdx3Metadata, Spdx3Parser, Spdx3Section};

// Options
pub use config::{DEFAULT_BUFFER_SIZE, DEFAULT_MAX_BUFFER_SIZE, ParserOptions, ParserOptionsBuilder};

// Error
pub use error::SpdxParseError;

// Engine
pub use engine::{GraphIter, RecordIter, SectionKind, StreamEngine};

// Reader
pub use reader::JsonCursor;

// Types
pub use types::{
    Checksum, ChecksumAlgorithm, CreationInfo, DocumentMeta, ExternalDocumentRef, ExternalRef,
    FileRecord, PackageRecord, PackageVerificationCode, RelationshipRecord, RelationshipType,
    SbomDocument, SbomDraft, SbomFormat,
};

// Graph elements
pub use graph::GraphElement;

// Compliance
pub use compliance::{ComplianceStandard, InvalidElementInfo, NtiaVerifier, NtiaViolation};

// Writer
pub use writer::SbomWriter;
