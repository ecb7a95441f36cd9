//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 문서 저장소와 직접 상호작용하는 코드를 모아둔 모듈입니다.
//!
//! 라우트 핸들러와 서비스는 전역 연결 객체를 직접 쓰지 않고,
//! `ContentStore` 트레이트 객체를 주입받아 사용합니다.
//! 덕분에 테스트에서는 메모리 구현(`MemoryStore`)으로 바꿔 끼울 수 있습니다.
//!
//! 각 하위 모듈:
//! - `sites`, `models`, `content`: 컬렉션별 SQLite 쿼리 함수
//! - `sqlite`: 위 함수들로 `ContentStore`를 구현한 `SqliteStore`
//! - `memory`: 테스트용 메모리 구현

pub mod content;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod sites;
pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::AppError;
use crate::models::{ContentItem, Model, Site};
use async_trait::async_trait;

/// 커서 기준점: 이 문서 "다음"부터 조회합니다.
///
/// 정렬이 `(created_at DESC, id DESC)`이므로,
/// 기준점보다 뒤에 오는 문서는 `created_at`이 더 작거나,
/// `created_at`이 같으면서 `id`가 더 작은 문서입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub created_at: String,
    pub id: String,
}

impl From<&ContentItem> for Anchor {
    fn from(item: &ContentItem) -> Self {
        Anchor {
            created_at: item.created_at.clone(),
            id: item.id.clone(),
        }
    }
}

/// 콘텐츠 목록 조회 조건
#[derive(Debug, Clone)]
pub struct ContentQuery {
    pub model_id: String,
    /// 있으면 이 기준점 뒤의 문서만 조회합니다.
    pub after: Option<Anchor>,
    /// 건너뛸 문서 수 (오프셋 방식)
    pub offset: u64,
    /// 가져올 최대 문서 수
    pub limit: u32,
}

/// 조건부 모델 삭제 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelDeletion {
    Deleted,
    NotFound,
    /// 모델을 참조하는 콘텐츠가 남아 있어 삭제하지 않았습니다.
    InUse,
}

/// 문서 저장소 추상화
///
/// `#[async_trait]`: 트레이트 안의 async fn을 `Box<dyn Future>`로 바꿔
/// `Arc<dyn ContentStore>` 같은 트레이트 객체로 쓸 수 있게 합니다.
/// `Send + Sync`: 여러 요청 핸들러(스레드)가 동시에 공유할 수 있어야 합니다.
#[async_trait]
pub trait ContentStore: Send + Sync {
    // ── 사이트 ──
    async fn list_sites(&self) -> Result<Vec<Site>, AppError>;
    async fn get_site(&self, id: &str) -> Result<Option<Site>, AppError>;
    async fn find_site_by_app_id(&self, app_id: &str) -> Result<Option<Site>, AppError>;
    async fn create_site(&self, site: &Site) -> Result<(), AppError>;

    // ── 모델 ──
    /// 생성일 내림차순. `site_id`가 `None`이면 전체 모델을 반환합니다.
    async fn list_models(&self, site_id: Option<&str>) -> Result<Vec<Model>, AppError>;
    async fn get_model(&self, id: &str) -> Result<Option<Model>, AppError>;
    /// `site_id`가 `None`이면 사이트가 없는 모델 중에서 찾습니다.
    async fn find_model_by_app_id(
        &self,
        site_id: Option<&str>,
        app_id: &str,
    ) -> Result<Option<Model>, AppError>;
    /// 같은 사이트에 같은 appId가 있으면 `AppError::Conflict`.
    async fn create_model(&self, model: &Model) -> Result<(), AppError>;
    /// 모델 문서 전체를 덮어씁니다. 없으면 `false`. appId 충돌은 `AppError::Conflict`.
    async fn update_model(&self, model: &Model) -> Result<bool, AppError>;
    /// 콘텐츠가 하나도 없을 때만 삭제합니다. 검사와 삭제는 한 번에 수행됩니다.
    async fn delete_model_if_unused(&self, id: &str) -> Result<ModelDeletion, AppError>;

    // ── 콘텐츠 ──
    async fn get_content(&self, id: &str) -> Result<Option<ContentItem>, AppError>;
    /// `(created_at DESC, id DESC)` 순서로 조건에 맞는 콘텐츠를 반환합니다.
    async fn list_content(&self, query: &ContentQuery) -> Result<Vec<ContentItem>, AppError>;
    async fn count_content(&self, model_id: &str) -> Result<u64, AppError>;
    /// 모델이 있을 때만 저장합니다. 검사와 저장은 한 번에 수행됩니다. 모델이 없으면 `false`.
    async fn create_content(&self, item: &ContentItem) -> Result<bool, AppError>;
    /// `data`와 `updated_at`을 덮어씁니다. 없으면 `false`.
    async fn update_content(&self, item: &ContentItem) -> Result<bool, AppError>;
    async fn delete_content(&self, id: &str) -> Result<bool, AppError>;
}
