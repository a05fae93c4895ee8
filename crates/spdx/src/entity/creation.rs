//! 생성 정보 엔티티 파서
//!
//! 최상위 `creationInfo` 객체를 [`CreationInfo`]로 파싱합니다.
//! `created`(타임스탬프로 파싱 가능해야 함)와 비어 있지 않은
//! `creators` 둘 다 필수이며, 누락은 이 객체에 대한 구조적 파싱
//! 에러입니다.

use std::io::Read;

use crate::entity::{EntityRecord, ParseContext, missing_fields_error, read_string_array};
use crate::error::SpdxParseError;
use crate::reader::JsonCursor;
use crate::types::CreationInfo;
use crate::util;

impl EntityRecord for CreationInfo {
    const ENTITY: &'static str = "creationInfo";

    fn parse_object<R: Read>(
        cursor: &mut JsonCursor<R>,
        _ctx: &ParseContext,
    ) -> Result<Self, SpdxParseError> {
        cursor.expect_object_start()?;

        let mut created: Option<String> = None;
        let mut creators = Vec::new();

        let mut first = true;
        while let Some(key) = cursor.next_object_key(first)? {
            first = false;
            match key.as_str() {
                "created" => created = Some(cursor.read_string()?),
                "creators" => creators = read_string_array(cursor)?,
                _ => cursor.skip_value()?,
            }
        }

        let mut missing = Vec::new();
        if created.is_none() {
            missing.push("created");
        }
        if creators.is_empty() {
            missing.push("creators");
        }
        if !missing.is_empty() {
            return Err(missing_fields_error(cursor.offset(), Self::ENTITY, &missing));
        }

        let created = created.unwrap_or_default();
        if !util::is_timestamp(&created) {
            return Err(SpdxParseError::Structural {
                offset: cursor.offset(),
                reason: format!("creationInfo.created is not a valid timestamp: '{created}'"),
            });
        }

        Ok(CreationInfo { created, creators })
    }
}
