//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `public`: 공개 읽기 API (`/api/{site}/...`), 데이터 키를 appId로 변환해서 반환
//! - `sites`: 사이트 관리 (`/admin/sites`)
//! - `models`: 모델/필드/폼 스키마 관리 (`/admin/models/...`)
//! - `content`: 콘텐츠 관리와 미리보기 URL (`/admin/models/{id}/content`, `/admin/content/{id}`)
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod content;
pub mod health;
pub mod models;
pub mod public;
pub mod sites;

#[cfg(test)]
mod testing;

use crate::db::ContentStore;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 저장소는 트레이트 객체로 주입되므로, 테스트에서는 메모리 DB를 넣을 수 있습니다.
/// `Arc`를 clone해도 저장소 자체는 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(store: impl ContentStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// 전체 라우터를 만듭니다.
///
/// `main`과 핸들러 테스트가 같은 라우터를 사용합니다.
/// axum 0.8부터 경로 파라미터는 `{name}` 문법입니다.
pub fn router(state: AppState) -> Router {
    // 공개 읽기 API
    let public_routes = Router::new()
        .route("/{site}/models", get(public::list_models))
        .route("/{site}/content/{model}", get(public::list_content))
        .route("/{site}/content/{model}/{content_id}", get(public::get_content));

    // 관리 API: 편집 화면이 사용하는 CRUD
    let admin_routes = Router::new()
        .route("/sites", get(sites::list_sites).post(sites::create_site))
        .route("/models", get(models::list_models).post(models::create_model))
        .route(
            "/models/{id}",
            get(models::get_model)
                .patch(models::update_model)
                .delete(models::delete_model),
        )
        .route("/models/{id}/fields", post(models::add_field))
        .route(
            "/models/{id}/fields/{field_id}",
            put(models::update_field).delete(models::delete_field),
        )
        .route("/models/{id}/fields/{field_id}/move", post(models::move_field))
        .route("/models/{id}/form", get(models::get_form))
        .route(
            "/models/{id}/content",
            get(content::list_content).post(content::create_content),
        )
        .route(
            "/content/{id}",
            get(content::get_content)
                .put(content::update_content)
                .delete(content::delete_content),
        )
        .route("/content/{id}/preview", get(content::preview_content));

    // 개발 편의상 모든 출처/메서드/헤더를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", public_routes)
        .nest("/admin", admin_routes)
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
