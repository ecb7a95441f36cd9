//! 라우터 테스트 공용 도우미
//!
//! 실제 마이그레이션을 적용한 메모리 SQLite 위에 전체 라우터를 띄우고,
//! `oneshot`으로 요청 하나씩 보냅니다.

use super::{router, AppState};
use crate::db::{ContentStore, SqliteStore};
use crate::models::{ContentData, ContentItem, Field, FieldType, FieldValue, Model, Site};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub async fn api(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&v).unwrap())
        }
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn empty_router() -> Router {
    let store = SqliteStore::in_memory().await.unwrap();
    router(AppState::new(store))
}

fn timestamp(second: u32) -> String {
    format!("2024-01-01T00:00:{second:02}.000000Z")
}

fn text_field(id: &str, app_id: &str, field_type: FieldType, order: u32) -> Field {
    Field {
        id: Some(id.into()),
        app_id: app_id.into(),
        name: app_id.into(),
        field_type,
        order,
        ..Default::default()
    }
}

/// 고정 데이터
///
/// - 사이트 `s1`(appId `blog`): 모델 `m1`(`post`, 필드 f1=title, f2=body, 미리보기 URL 있음)과
///   모델 `m2`(`page`, 필드 없음)
/// - 사이트 `s2`(appId `docs`): 모델 `m3`(`post`)
/// - `m1`의 콘텐츠 `t1`..`t7` (1초 간격, `t7`이 최신), `m2`의 콘텐츠 `p1`
pub async fn seeded_store() -> SqliteStore {
    let store = SqliteStore::in_memory().await.unwrap();

    for (id, app_id) in [("s1", "blog"), ("s2", "docs")] {
        store
            .create_site(&Site {
                id: id.into(),
                name: app_id.into(),
                app_id: app_id.into(),
                logo: None,
                created_at: timestamp(0),
            })
            .await
            .unwrap();
    }

    let mut title = text_field("f1", "title", FieldType::Text, 1);
    title.required = true;
    title.use_as_title = true;
    let models = [
        ("m1", "post", "s1", vec![title, text_field("f2", "body", FieldType::Markdown, 2)], 1),
        ("m2", "page", "s1", vec![], 2),
        ("m3", "post", "s2", vec![text_field("g1", "heading", FieldType::Text, 1)], 3),
    ];
    for (id, app_id, site, fields, second) in models {
        let preview_url =
            (id == "m1").then(|| "https://blog.example.com/{title}?v={version}".to_string());
        store
            .create_model(&Model {
                id: id.into(),
                name: app_id.into(),
                app_id: app_id.into(),
                description: String::new(),
                preview_url,
                site: Some(site.into()),
                fields,
                created_at: timestamp(second),
                updated_at: timestamp(second),
            })
            .await
            .unwrap();
    }

    for n in 1..=7 {
        let data = ContentData::from([
            ("f1".to_string(), FieldValue::Text(format!("Post {n}"))),
            ("f2".to_string(), FieldValue::Text(format!("Body {n}"))),
        ]);
        store
            .create_content(&ContentItem {
                id: format!("t{n}"),
                model_id: "m1".into(),
                data,
                created_at: timestamp(10 + n),
                updated_at: timestamp(10 + n),
            })
            .await
            .unwrap();
    }

    store
        .create_content(&ContentItem {
            id: "p1".into(),
            model_id: "m2".into(),
            data: ContentData::from([("raw".to_string(), FieldValue::from("kept"))]),
            created_at: timestamp(30),
            updated_at: timestamp(30),
        })
        .await
        .unwrap();

    store
}

pub async fn seeded_router() -> Router {
    router(AppState::new(seeded_store().await))
}
