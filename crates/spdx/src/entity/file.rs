//! 파일 엔티티 파서
//!
//! SPDX 2.x `files` 배열의 객체 하나를 [`FileRecord`]로 파싱합니다.
//!
//! # 필수 필드
//!
//! - `fileName` (`.`으로 시작하도록 정규화)
//! - `checksums` -- 비어 있을 수 없으며, 설정된 필수 알고리즘
//!   (기본 SHA-1 + SHA-256)이 모두 포함되어야 합니다

use std::io::Read;

use crate::entity::{
    EntityRecord, ParseContext, missing_fields_error, read_checksum_array, read_string_array,
};
use crate::error::SpdxParseError;
use crate::reader::JsonCursor;
use crate::types::FileRecord;
use crate::util;

impl EntityRecord for FileRecord {
    const ENTITY: &'static str = "file";

    fn parse_object<R: Read>(
        cursor: &mut JsonCursor<R>,
        ctx: &ParseContext,
    ) -> Result<Self, SpdxParseError> {
        cursor.expect_object_start()?;

        let mut file_name: Option<String> = None;
        let mut spdx_id: Option<String> = None;
        let mut checksums = Vec::new();
        let mut license_concluded: Option<String> = None;
        let mut license_info_in_files = Vec::new();
        let mut copyright_text: Option<String> = None;

        let mut first = true;
        while let Some(key) = cursor.next_object_key(first)? {
            first = false;
            match key.as_str() {
                "fileName" => file_name = Some(cursor.read_string()?),
                "SPDXID" => spdx_id = Some(cursor.read_string()?),
                "checksums" => checksums = read_checksum_array(cursor)?,
                "licenseConcluded" => license_concluded = Some(cursor.read_string()?),
                "licenseInfoInFiles" => license_info_in_files = read_string_array(cursor)?,
                "copyrightText" => copyright_text = Some(cursor.read_string()?),
                _ => cursor.skip_value()?,
            }
        }

        let mut missing = Vec::new();
        if file_name.is_none() {
            missing.push("fileName");
        }
        if checksums.is_empty() {
            missing.push("checksums");
        }
        if !missing.is_empty() {
            return Err(missing_fields_error(cursor.offset(), Self::ENTITY, &missing));
        }

        let path = util::normalize_file_path(&file_name.unwrap_or_default());

        let absent: Vec<&str> = ctx
            .required_file_algorithms
            .iter()
            .filter(|required| !checksums.iter().any(|c| c.algorithm == **required))
            .map(|required| required.as_spdx2())
            .collect();
        if !absent.is_empty() {
            return Err(SpdxParseError::Structural {
                offset: cursor.offset(),
                reason: format!(
                    "file '{path}' missing required checksum algorithms: {}",
                    absent.join(", ")
                ),
            });
        }

        Ok(FileRecord {
            spdx_id,
            path,
            checksums,
            license_concluded,
            license_info_in_files,
            copyright_text,
        })
    }
}
