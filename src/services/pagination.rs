//! # 콘텐츠 페이지네이션 엔진
//!
//! 모델에 속한 콘텐츠를 생성일 내림차순으로 잘라서 반환합니다.
//! 두 가지 방식을 지원합니다:
//!
//! - **오프셋 방식**: `page`(1부터) × `pageSize`만큼 건너뛴 뒤 조회합니다.
//!   스냅샷 격리가 없으므로, 페이지 사이에 문서가 추가/삭제되면
//!   항목이 건너뛰어지거나 중복될 수 있습니다. 이 동작은 의도된 것입니다.
//! - **커서 방식**: 이전 페이지 마지막 항목의 id를 커서로 받아 그 문서 "다음"부터 조회합니다.
//!   기준이 숫자 오프셋이 아니라 문서이므로, 앞쪽에 새 문서가 추가되어도 이어서 읽기가 흔들리지 않습니다.
//!
//! 두 방식 모두 `pageSize + 1`개를 요청해서, 하나가 더 오면 다음 페이지가 있다고 판단합니다.
//! 별도의 COUNT 쿼리 없이 `hasNext`를 알 수 있습니다.

use crate::db::{Anchor, ContentQuery, ContentStore};
use crate::error::AppError;
use crate::models::{ContentItem, PageParams, Paginated};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// 유효 범위로 보정된 페이지 크기 (1..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    /// 요청된 크기를 보정합니다.
    ///
    /// - 유한하지 않거나(NaN, ∞) 0 이하 → 기본값 20
    /// - 그 외 → 소수점 버림 후 1..=100으로 제한
    pub fn from_requested(requested: f64) -> Self {
        if !requested.is_finite() || requested <= 0.0 {
            return Self::default();
        }
        Self(requested.floor().clamp(1.0, f64::from(MAX_PAGE_SIZE)) as u32)
    }

    /// 쿼리 문자열 값을 보정합니다. 없거나 숫자가 아니면 기본값입니다.
    pub fn parse(raw: Option<&str>) -> Self {
        match parse_number(raw) {
            Some(requested) => Self::from_requested(requested),
            None => Self::default(),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

/// 1부터 시작하는 페이지 번호
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber(u32);

impl PageNumber {
    /// 유한하지 않거나 1보다 작으면 1, 그 외에는 소수점 버림
    pub fn from_requested(requested: f64) -> Self {
        if !requested.is_finite() || requested < 1.0 {
            return Self::default();
        }
        Self(requested.floor().min(f64::from(u32::MAX)) as u32)
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match parse_number(raw) {
            Some(requested) => Self::from_requested(requested),
            None => Self::default(),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self(1)
    }
}

/// 빈 문자열은 "값 없음", 숫자가 아닌 문자열은 NaN으로 취급합니다.
fn parse_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    Some(raw.parse::<f64>().unwrap_or(f64::NAN))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMode {
    Offset { page: PageNumber },
    /// `cursor`가 `None`이면 첫 페이지입니다.
    Cursor { cursor: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub mode: PageMode,
    pub page_size: PageSize,
}

impl PageRequest {
    /// 쿼리 파라미터로 요청을 만듭니다.
    ///
    /// 비어 있지 않은 `cursor`가 있거나 `mode=cursor`이면 커서 방식,
    /// 그 외에는 오프셋 방식입니다.
    pub fn from_params(params: &PageParams) -> Self {
        let page_size = PageSize::parse(params.page_size.as_deref());
        let cursor = params
            .cursor
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);
        let wants_cursor = params
            .mode
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("cursor"));

        let mode = if cursor.is_some() || wants_cursor {
            PageMode::Cursor { cursor }
        } else {
            PageMode::Offset {
                page: PageNumber::parse(params.page.as_deref()),
            }
        };

        Self { mode, page_size }
    }
}

/// 모델 하나의 콘텐츠 페이지를 조회합니다.
///
/// 저장소 에러는 로그로 남긴 뒤 일반적인 "Failed to retrieve content" 에러로 바꿉니다.
/// 재시도하지 않고, 부분 결과도 반환하지 않습니다.
pub async fn fetch_page(
    store: &dyn ContentStore,
    model_id: &str,
    request: &PageRequest,
) -> Result<Paginated<ContentItem>, AppError> {
    let result = match &request.mode {
        PageMode::Offset { page } => fetch_offset(store, model_id, *page, request.page_size).await,
        PageMode::Cursor { cursor } => {
            fetch_cursor(store, model_id, cursor.as_deref(), request.page_size).await
        }
    };

    result.map_err(|e| {
        tracing::error!(model_id, error = %e, "Error getting content page");
        AppError::Internal("Failed to retrieve content".to_string())
    })
}

async fn fetch_offset(
    store: &dyn ContentStore,
    model_id: &str,
    page: PageNumber,
    page_size: PageSize,
) -> Result<Paginated<ContentItem>, AppError> {
    let offset = u64::from(page.get() - 1) * u64::from(page_size.get());
    tracing::debug!(model_id, page = page.get(), page_size = page_size.get(), "offset page");

    let docs = store
        .list_content(&ContentQuery {
            model_id: model_id.to_string(),
            after: None,
            offset,
            limit: page_size.get() + 1,
        })
        .await?;

    let (items, has_next) = truncate(docs, page_size);
    Ok(Paginated {
        next_cursor: next_cursor(&items, has_next),
        items,
        page: Some(page.get()),
        page_size: page_size.get(),
        has_next,
        // 오프셋 방식에서는 전체 개수를 계산하지 않습니다.
        total_items: None,
    })
}

async fn fetch_cursor(
    store: &dyn ContentStore,
    model_id: &str,
    cursor: Option<&str>,
    page_size: PageSize,
) -> Result<Paginated<ContentItem>, AppError> {
    // 커서가 가리키는 문서가 사라졌으면 커서가 없는 것처럼 처음부터 조회합니다.
    let after = match cursor {
        Some(id) => {
            let anchor = store.get_content(id).await?.as_ref().map(Anchor::from);
            if anchor.is_none() {
                tracing::debug!(model_id, cursor = id, "cursor document not found, restarting");
            }
            anchor
        }
        None => None,
    };

    let docs = store
        .list_content(&ContentQuery {
            model_id: model_id.to_string(),
            after,
            offset: 0,
            limit: page_size.get() + 1,
        })
        .await?;
    let (items, has_next) = truncate(docs, page_size);

    // 전체 개수는 커서를 넘기지 않은 첫 호출에서만 셉니다.
    let total_items = match cursor {
        None => Some(store.count_content(model_id).await?),
        Some(_) => None,
    };

    Ok(Paginated {
        next_cursor: next_cursor(&items, has_next),
        items,
        page: None,
        page_size: page_size.get(),
        has_next,
        total_items,
    })
}

/// `pageSize + 1`개로 조회한 결과를 `pageSize`개로 자르고 다음 페이지 여부를 반환합니다.
fn truncate(mut docs: Vec<ContentItem>, page_size: PageSize) -> (Vec<ContentItem>, bool) {
    let size = page_size.get() as usize;
    let has_next = docs.len() > size;
    docs.truncate(size);
    (docs, has_next)
}

fn next_cursor(items: &[ContentItem], has_next: bool) -> Option<String> {
    if has_next {
        items.last().map(|item| item.id.clone())
    } else {
        None
    }
}
