//! # 페이지네이션 요청/응답 구조체
//!
//! - `PageParams`: URL 쿼리 파라미터 (`?page=&pageSize=&cursor=&mode=`)
//! - `Paginated<T>`: 목록 응답 봉투 `{ items, page?, pageSize, hasNext, nextCursor?, totalItems? }`

use serde::{Deserialize, Serialize};

/// 목록 조회 쿼리 파라미터
///
/// 숫자 파라미터도 문자열로 받습니다.
/// `pageSize=abc`처럼 숫자가 아닌 값은 400이 아니라 기본값으로 처리해야 하므로,
/// 파싱은 `services::pagination`에서 직접 수행합니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub cursor: Option<String>,
    /// `"cursor"`이면 커서 없이도 커서 방식으로 첫 페이지를 조회합니다.
    pub mode: Option<String>,
}

/// 목록 응답 봉투
///
/// `Option` 필드는 `None`이면 JSON에서 아예 빠집니다. (`skip_serializing_if`)
/// - `page`: 오프셋 방식일 때만 포함
/// - `nextCursor`: 다음 페이지가 있을 때만 포함
/// - `totalItems`: 커서 방식의 첫 페이지(커서 미지정)에서만 포함
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub page_size: u32,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
}

impl<T> Paginated<T> {
    /// 페이지 메타데이터는 그대로 두고 항목만 변환합니다.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            has_next: self.has_next,
            next_cursor: self.next_cursor,
            total_items: self.total_items,
        }
    }
}
