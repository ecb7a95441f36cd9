//! 테스트용 메모리 저장소
//!
//! `SqliteStore`와 같은 정렬/필터 규칙을 Vec 위에서 흉내 냅니다.
//! `fail_with`로 모든 호출이 실패하도록 만들어 에러 경로를 테스트할 수 있습니다.

use super::{ContentQuery, ContentStore, ModelDeletion};
use crate::error::AppError;
use crate::models::{ContentItem, Model, Site};
use async_trait::async_trait;
use std::cmp::Reverse;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
    sites: Vec<Site>,
    models: Vec<Model>,
    content: Vec<ContentItem>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이후 모든 호출을 `AppError::Internal(message)`로 실패시킵니다.
    pub async fn fail_with(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }

    async fn check(&self) -> Result<(), AppError> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(AppError::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

/// `(site_id, app_id)` 유니크 인덱스와 같은 규칙. 사이트 없는 모델끼리는 겹쳐도 됩니다.
fn ensure_unique_app_id(models: &[Model], model: &Model) -> Result<(), AppError> {
    let taken = model.site.is_some()
        && models
            .iter()
            .any(|m| m.id != model.id && m.site == model.site && m.app_id == model.app_id);
    if taken {
        return Err(AppError::Conflict(format!(
            "A model with appId '{}' already exists in this site",
            model.app_id
        )));
    }
    Ok(())
}

/// 저장소 정렬 키: `(created_at DESC, id DESC)`
fn newest_first(items: &mut [ContentItem]) {
    items.sort_by_key(|i| Reverse((i.created_at.clone(), i.id.clone())));
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_sites(&self) -> Result<Vec<Site>, AppError> {
        self.check().await?;
        let mut sites = self.inner.read().await.sites.clone();
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sites)
    }

    async fn get_site(&self, id: &str) -> Result<Option<Site>, AppError> {
        self.check().await?;
        Ok(self.inner.read().await.sites.iter().find(|s| s.id == id).cloned())
    }

    async fn find_site_by_app_id(&self, app_id: &str) -> Result<Option<Site>, AppError> {
        self.check().await?;
        Ok(self.inner.read().await.sites.iter().find(|s| s.app_id == app_id).cloned())
    }

    async fn create_site(&self, site: &Site) -> Result<(), AppError> {
        self.check().await?;
        self.inner.write().await.sites.push(site.clone());
        Ok(())
    }

    async fn list_models(&self, site_id: Option<&str>) -> Result<Vec<Model>, AppError> {
        self.check().await?;
        let mut models: Vec<Model> = self
            .inner
            .read()
            .await
            .models
            .iter()
            .filter(|m| site_id.is_none() || m.site.as_deref() == site_id)
            .cloned()
            .collect();
        models.sort_by_key(|m| Reverse((m.created_at.clone(), m.id.clone())));
        Ok(models)
    }

    async fn get_model(&self, id: &str) -> Result<Option<Model>, AppError> {
        self.check().await?;
        Ok(self.inner.read().await.models.iter().find(|m| m.id == id).cloned())
    }

    async fn find_model_by_app_id(
        &self,
        site_id: Option<&str>,
        app_id: &str,
    ) -> Result<Option<Model>, AppError> {
        self.check().await?;
        Ok(self
            .inner
            .read()
            .await
            .models
            .iter()
            .filter(|m| m.app_id == app_id && m.site.as_deref() == site_id)
            .min_by_key(|m| (m.created_at.clone(), m.id.clone()))
            .cloned())
    }

    async fn create_model(&self, model: &Model) -> Result<(), AppError> {
        self.check().await?;
        let mut inner = self.inner.write().await;
        ensure_unique_app_id(&inner.models, model)?;
        inner.models.push(model.clone());
        Ok(())
    }

    async fn update_model(&self, model: &Model) -> Result<bool, AppError> {
        self.check().await?;
        let mut inner = self.inner.write().await;
        ensure_unique_app_id(&inner.models, model)?;
        match inner.models.iter_mut().find(|m| m.id == model.id) {
            Some(existing) => {
                *existing = model.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_model_if_unused(&self, id: &str) -> Result<ModelDeletion, AppError> {
        self.check().await?;
        // 쓰기 잠금 하나 안에서 검사와 삭제를 함께 수행합니다.
        let mut inner = self.inner.write().await;
        let Some(index) = inner.models.iter().position(|m| m.id == id) else {
            return Ok(ModelDeletion::NotFound);
        };
        if inner.content.iter().any(|c| c.model_id == id) {
            return Ok(ModelDeletion::InUse);
        }
        inner.models.remove(index);
        Ok(ModelDeletion::Deleted)
    }

    async fn get_content(&self, id: &str) -> Result<Option<ContentItem>, AppError> {
        self.check().await?;
        Ok(self.inner.read().await.content.iter().find(|c| c.id == id).cloned())
    }

    async fn list_content(&self, query: &ContentQuery) -> Result<Vec<ContentItem>, AppError> {
        self.check().await?;
        let mut items: Vec<ContentItem> = self
            .inner
            .read()
            .await
            .content
            .iter()
            .filter(|c| c.model_id == query.model_id)
            .filter(|c| match &query.after {
                Some(anchor) => {
                    (c.created_at.as_str(), c.id.as_str())
                        < (anchor.created_at.as_str(), anchor.id.as_str())
                }
                None => true,
            })
            .cloned()
            .collect();
        newest_first(&mut items);

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        Ok(items
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect())
    }

    async fn count_content(&self, model_id: &str) -> Result<u64, AppError> {
        self.check().await?;
        let inner = self.inner.read().await;
        Ok(inner.content.iter().filter(|c| c.model_id == model_id).count() as u64)
    }

    async fn create_content(&self, item: &ContentItem) -> Result<bool, AppError> {
        self.check().await?;
        let mut inner = self.inner.write().await;
        if !inner.models.iter().any(|m| m.id == item.model_id) {
            return Ok(false);
        }
        inner.content.push(item.clone());
        Ok(true)
    }

    async fn update_content(&self, item: &ContentItem) -> Result<bool, AppError> {
        self.check().await?;
        let mut inner = self.inner.write().await;
        match inner.content.iter_mut().find(|c| c.id == item.id) {
            Some(existing) => {
                existing.data = item.data.clone();
                existing.updated_at = item.updated_at.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_content(&self, id: &str) -> Result<bool, AppError> {
        self.check().await?;
        let mut inner = self.inner.write().await;
        let before = inner.content.len();
        inner.content.retain(|c| c.id != id);
        Ok(inner.content.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentData;

    fn model(id: &str, app_id: &str, site: Option<&str>) -> Model {
        Model {
            id: id.into(),
            name: app_id.into(),
            app_id: app_id.into(),
            description: String::new(),
            preview_url: None,
            site: site.map(String::from),
            fields: Vec::new(),
            created_at: "2024-01-01T00:00:00.000000Z".into(),
            updated_at: "2024-01-01T00:00:00.000000Z".into(),
        }
    }

    fn item(id: &str, model_id: &str) -> ContentItem {
        ContentItem {
            id: id.into(),
            model_id: model_id.into(),
            data: ContentData::new(),
            created_at: "2024-01-01T00:00:01.000000Z".into(),
            updated_at: "2024-01-01T00:00:01.000000Z".into(),
        }
    }

    #[tokio::test]
    async fn content_needs_an_existing_model() {
        let store = MemoryStore::new();
        store.create_model(&model("m1", "post", None)).await.unwrap();

        assert_eq!(store.delete_model_if_unused("m1").await.unwrap(), ModelDeletion::Deleted);
        assert!(!store.create_content(&item("a", "m1")).await.unwrap());
        assert!(store.get_content("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn app_ids_are_unique_per_site() {
        let store = MemoryStore::new();
        store.create_model(&model("m1", "post", Some("s1"))).await.unwrap();

        let err = store.create_model(&model("m2", "post", Some("s1"))).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        store.create_model(&model("m3", "post", Some("s2"))).await.unwrap();
        store.create_model(&model("m4", "post", None)).await.unwrap();
        store.create_model(&model("m5", "post", None)).await.unwrap();

        // 자기 자신과는 충돌하지 않습니다.
        let mut same = model("m1", "post", Some("s1"));
        same.description = "edited".into();
        assert!(store.update_model(&same).await.unwrap());
    }
}
