//! # SQLite 저장소
//!
//! `SqlitePool` 위에서 `ContentStore`를 구현합니다.
//! 실제 SQL은 컬렉션별 모듈(`sites`, `models`, `content`)에 있고,
//! 여기서는 트레이트 메서드를 그 함수들로 연결만 합니다.

use super::{content, models, sites, ContentQuery, ContentStore, ModelDeletion};
use crate::error::AppError;
use crate::models::{ContentItem, Model, Site};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// SQLite 기반 문서 저장소
///
/// `SqlitePool`은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 데이터베이스에 연결하고 마이그레이션을 실행합니다.
    ///
    /// `sqlx::migrate!`는 컴파일 타임에 ./migrations 폴더의 SQL 파일을 포함시키며,
    /// 아직 실행되지 않은 마이그레이션만 순서대로 실행합니다.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }

    /// 테스트용 메모리 데이터베이스
    ///
    /// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로
    /// 연결을 하나로 고정하고, 유휴 연결이 닫히지 않게 합니다.
    #[cfg(test)]
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn list_sites(&self) -> Result<Vec<Site>, AppError> {
        sites::list_sites(&self.pool).await
    }

    async fn get_site(&self, id: &str) -> Result<Option<Site>, AppError> {
        sites::get_site(&self.pool, id).await
    }

    async fn find_site_by_app_id(&self, app_id: &str) -> Result<Option<Site>, AppError> {
        sites::find_site_by_app_id(&self.pool, app_id).await
    }

    async fn create_site(&self, site: &Site) -> Result<(), AppError> {
        sites::create_site(&self.pool, site).await
    }

    async fn list_models(&self, site_id: Option<&str>) -> Result<Vec<Model>, AppError> {
        models::list_models(&self.pool, site_id).await
    }

    async fn get_model(&self, id: &str) -> Result<Option<Model>, AppError> {
        models::get_model(&self.pool, id).await
    }

    async fn find_model_by_app_id(
        &self,
        site_id: Option<&str>,
        app_id: &str,
    ) -> Result<Option<Model>, AppError> {
        models::find_model_by_app_id(&self.pool, site_id, app_id).await
    }

    async fn create_model(&self, model: &Model) -> Result<(), AppError> {
        models::create_model(&self.pool, model).await
    }

    async fn update_model(&self, model: &Model) -> Result<bool, AppError> {
        models::update_model(&self.pool, model).await
    }

    async fn delete_model_if_unused(&self, id: &str) -> Result<ModelDeletion, AppError> {
        models::delete_model_if_unused(&self.pool, id).await
    }

    async fn get_content(&self, id: &str) -> Result<Option<ContentItem>, AppError> {
        content::get_content(&self.pool, id).await
    }

    async fn list_content(&self, query: &ContentQuery) -> Result<Vec<ContentItem>, AppError> {
        content::list_content(&self.pool, query).await
    }

    async fn count_content(&self, model_id: &str) -> Result<u64, AppError> {
        content::count_content(&self.pool, model_id).await
    }

    async fn create_content(&self, item: &ContentItem) -> Result<bool, AppError> {
        content::create_content(&self.pool, item).await
    }

    async fn update_content(&self, item: &ContentItem) -> Result<bool, AppError> {
        content::update_content(&self.pool, item).await
    }

    async fn delete_content(&self, id: &str) -> Result<bool, AppError> {
        content::delete_content(&self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Anchor;
    use crate::models::{ContentData, Field, FieldType, FieldValue};

    fn site(id: &str, app_id: &str) -> Site {
        Site {
            id: id.into(),
            name: app_id.into(),
            app_id: app_id.into(),
            logo: None,
            created_at: "2024-01-01T00:00:00.000000Z".into(),
        }
    }

    fn model(id: &str, app_id: &str, site: Option<&str>, created_at: &str) -> Model {
        Model {
            id: id.into(),
            name: app_id.into(),
            app_id: app_id.into(),
            description: String::new(),
            preview_url: None,
            site: site.map(String::from),
            fields: vec![Field {
                id: Some("f1".into()),
                app_id: "title".into(),
                name: "Title".into(),
                field_type: FieldType::Text,
                order: 1,
                ..Default::default()
            }],
            created_at: created_at.into(),
            updated_at: created_at.into(),
        }
    }

    fn item(id: &str, model_id: &str, second: u32) -> ContentItem {
        let ts = format!("2024-01-01T00:00:{second:02}.000000Z");
        ContentItem {
            id: id.into(),
            model_id: model_id.into(),
            data: ContentData::from([("f1".to_string(), FieldValue::from(id))]),
            created_at: ts.clone(),
            updated_at: ts,
        }
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn models_round_trip_with_fields() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.create_site(&site("s1", "blog")).await.unwrap();
        store
            .create_model(&model("m1", "post", Some("s1"), "2024-01-01T00:00:01.000000Z"))
            .await
            .unwrap();
        store
            .create_model(&model("m2", "page", Some("s1"), "2024-01-01T00:00:02.000000Z"))
            .await
            .unwrap();

        let listed = store.list_models(Some("s1")).await.unwrap();
        assert_eq!(listed.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), ["m2", "m1"]);
        assert_eq!(listed[1].fields[0].app_id, "title");

        let found = store.find_model_by_app_id(Some("s1"), "post").await.unwrap();
        assert_eq!(found.map(|m| m.id), Some("m1".to_string()));
        assert!(store.find_model_by_app_id(None, "post").await.unwrap().is_none());

        let mut edited = store.get_model("m1").await.unwrap().unwrap();
        edited.fields[0].use_as_title = true;
        assert!(store.update_model(&edited).await.unwrap());
        let reloaded = store.get_model("m1").await.unwrap().unwrap();
        assert!(reloaded.fields[0].use_as_title);
    }

    #[tokio::test]
    async fn content_lists_newest_first_with_anchor_and_offset() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .create_model(&model("m1", "post", None, "2024-01-01T00:00:00.000000Z"))
            .await
            .unwrap();
        store
            .create_model(&model("m2", "page", None, "2024-01-01T00:00:00.000000Z"))
            .await
            .unwrap();
        for (n, id) in ["a", "b", "c", "d"].iter().enumerate() {
            assert!(store.create_content(&item(id, "m1", n as u32 + 1)).await.unwrap());
        }
        assert!(store.create_content(&item("other", "m2", 9)).await.unwrap());

        let query = ContentQuery { model_id: "m1".into(), after: None, offset: 1, limit: 2 };
        assert_eq!(ids(&store.list_content(&query).await.unwrap()), ["c", "b"]);

        let anchor = store.get_content("c").await.unwrap().unwrap();
        let query = ContentQuery {
            model_id: "m1".into(),
            after: Some(Anchor::from(&anchor)),
            offset: 0,
            limit: 10,
        };
        assert_eq!(ids(&store.list_content(&query).await.unwrap()), ["b", "a"]);
        assert_eq!(store.count_content("m1").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn equal_timestamps_break_ties_by_id() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .create_model(&model("m1", "post", None, "2024-01-01T00:00:00.000000Z"))
            .await
            .unwrap();
        for id in ["x1", "x3", "x2"] {
            store.create_content(&item(id, "m1", 5)).await.unwrap();
        }
        let query = ContentQuery { model_id: "m1".into(), after: None, offset: 0, limit: 10 };
        assert_eq!(ids(&store.list_content(&query).await.unwrap()), ["x3", "x2", "x1"]);

        let query = ContentQuery {
            model_id: "m1".into(),
            after: Some(Anchor { created_at: "2024-01-01T00:00:05.000000Z".into(), id: "x3".into() }),
            offset: 0,
            limit: 10,
        };
        assert_eq!(ids(&store.list_content(&query).await.unwrap()), ["x2", "x1"]);
    }

    #[tokio::test]
    async fn model_with_content_is_not_deleted() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .create_model(&model("m1", "post", None, "2024-01-01T00:00:00.000000Z"))
            .await
            .unwrap();
        store.create_content(&item("a", "m1", 1)).await.unwrap();

        assert_eq!(store.delete_model_if_unused("m1").await.unwrap(), ModelDeletion::InUse);
        assert!(store.delete_content("a").await.unwrap());
        assert_eq!(store.delete_model_if_unused("m1").await.unwrap(), ModelDeletion::Deleted);
        assert_eq!(store.delete_model_if_unused("m1").await.unwrap(), ModelDeletion::NotFound);
    }

    #[tokio::test]
    async fn content_update_overwrites_data() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .create_model(&model("m1", "post", None, "2024-01-01T00:00:00.000000Z"))
            .await
            .unwrap();
        let mut stored = item("a", "m1", 1);
        store.create_content(&stored).await.unwrap();

        stored.data.insert("f2".into(), FieldValue::TextList(vec!["x".into(), "y".into()]));
        stored.updated_at = "2024-02-01T00:00:00.000000Z".into();
        assert!(store.update_content(&stored).await.unwrap());

        let reloaded = store.get_content("a").await.unwrap().unwrap();
        assert_eq!(reloaded, stored);
        assert!(!store.update_content(&item("missing", "m1", 1)).await.unwrap());
    }

    #[tokio::test]
    async fn content_is_not_created_for_a_deleted_model() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .create_model(&model("m1", "post", None, "2024-01-01T00:00:00.000000Z"))
            .await
            .unwrap();

        // 핸들러가 모델을 읽은 뒤, 저장하기 전에 모델이 삭제된 경우
        assert!(store.get_model("m1").await.unwrap().is_some());
        assert_eq!(store.delete_model_if_unused("m1").await.unwrap(), ModelDeletion::Deleted);
        assert!(!store.create_content(&item("a", "m1", 1)).await.unwrap());

        assert!(store.get_content("a").await.unwrap().is_none());
        assert_eq!(store.count_content("m1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_app_id_in_a_site_is_a_conflict() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.create_site(&site("s1", "blog")).await.unwrap();
        store.create_site(&site("s2", "docs")).await.unwrap();
        store
            .create_model(&model("m1", "post", Some("s1"), "2024-01-01T00:00:01.000000Z"))
            .await
            .unwrap();

        let err = store
            .create_model(&model("m2", "post", Some("s1"), "2024-01-01T00:00:02.000000Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // 다른 사이트에서는 같은 appId를 쓸 수 있습니다.
        store
            .create_model(&model("m3", "post", Some("s2"), "2024-01-01T00:00:03.000000Z"))
            .await
            .unwrap();

        let mut renamed = model("m4", "page", Some("s1"), "2024-01-01T00:00:04.000000Z");
        store.create_model(&renamed).await.unwrap();
        renamed.app_id = "post".into();
        let err = store.update_model(&renamed).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn site_logo_and_preview_url_are_stored() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut blog = site("s1", "blog");
        blog.logo = Some("data:image/png;base64,AAAA".into());
        store.create_site(&blog).await.unwrap();
        assert_eq!(store.get_site("s1").await.unwrap(), Some(blog));

        let mut post = model("m1", "post", Some("s1"), "2024-01-01T00:00:01.000000Z");
        post.preview_url = Some("https://blog.example.com/{title}".into());
        store.create_model(&post).await.unwrap();
        assert_eq!(store.get_model("m1").await.unwrap(), Some(post));
    }
}
