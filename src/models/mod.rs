//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `site`: 사이트(Site): 모델을 묶는 최상위 범위
//! - `model`: 모델(Model)과 필드(Field): 사용자가 정의하는 콘텐츠 타입
//! - `content`: 콘텐츠(ContentItem)와 필드 값(FieldValue)
//! - `page`: 페이지네이션 요청 파라미터와 응답 봉투(envelope)
//!
//! `pub use X::*;`로 하위 모듈의 공개 항목을 재공개하여
//! `crate::models::Model`처럼 짧게 접근할 수 있게 합니다.

pub mod content;
pub mod model;
pub mod page;
pub mod site;

pub use content::*;
pub use model::*;
pub use page::*;
pub use site::*;

use chrono::{DateTime, Utc};

/// 새 문서 id를 생성합니다.
///
/// UUIDv7은 타임스탬프 기반이라 생성 순서대로 정렬됩니다.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// 저장용 타임스탬프 문자열을 만듭니다.
///
/// 항상 `YYYY-MM-DDTHH:MM:SS.ffffffZ` 고정 폭이므로
/// 문자열 비교 순서가 곧 시간 순서입니다. (정렬과 커서 비교가 이 성질에 의존합니다)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// 현재 시각의 저장용 타임스탬프
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
