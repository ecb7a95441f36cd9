//! # 공개 읽기 API
//!
//! 외부 사이트/앱이 콘텐츠를 가져가는 읽기 전용 엔드포인트입니다.
//! 사이트와 모델은 내부 id가 아니라 외부용 `appId`로 지정합니다.
//!
//! ## 엔드포인트
//! - `GET /api/{site}/models`                       → 사이트의 모델 목록 (생성일 내림차순)
//! - `GET /api/{site}/content/{model}`              → 콘텐츠 페이지 (`?page=&pageSize=&cursor=&mode=`)
//! - `GET /api/{site}/content/{model}/{contentId}` → 콘텐츠 하나
//!
//! 콘텐츠 응답의 `data` 키는 필드 id가 아니라 필드 appId입니다.

use super::AppState;
use crate::db::ContentStore;
use crate::error::AppError;
use crate::models::{ContentItem, Model, PageParams, Paginated, Site};
use crate::services::{fetch_page, FieldMapping, PageRequest};
use axum::{
    extract::{Path, Query, State},
    Json,
};

/// 사이트 appId로 사이트를 찾습니다.
///
/// - 빈 값 → 400
/// - 없는 사이트 → 404
pub(crate) async fn resolve_site(store: &dyn ContentStore, app_id: &str) -> Result<Site, AppError> {
    let app_id = app_id.trim();
    if app_id.is_empty() {
        return Err(AppError::bad_request("Site appId is required"));
    }

    store
        .find_site_by_app_id(app_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Site with appId '{app_id}' not found")))
}

/// 사이트 안에서 모델 appId로 모델을 찾습니다.
async fn resolve_model(
    store: &dyn ContentStore,
    site_app_id: &str,
    model_app_id: &str,
) -> Result<Model, AppError> {
    let site = resolve_site(store, site_app_id).await?;
    if model_app_id.trim().is_empty() {
        return Err(AppError::bad_request("Model appId is required"));
    }

    store
        .find_model_by_app_id(Some(&site.id), model_app_id.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Model not found in this site"))
}

/// `GET /api/{site}/models`
pub async fn list_models(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Json<Vec<Model>>, AppError> {
    let site = resolve_site(state.store.as_ref(), &site).await?;
    let models = state.store.list_models(Some(&site.id)).await?;
    Ok(Json(models))
}

/// `GET /api/{site}/content/{model}`
///
/// 비어 있지 않은 `cursor`가 있거나 `mode=cursor`이면 커서 방식,
/// 그 외에는 `page` 기반 오프셋 방식으로 조회합니다.
/// 커서 방식 응답에는 `page`가 없습니다.
pub async fn list_content(
    State(state): State<AppState>,
    Path((site, model)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<ContentItem>>, AppError> {
    let model = resolve_model(state.store.as_ref(), &site, &model).await?;
    if model.id.is_empty() {
        return Err(AppError::Internal("Model document ID is missing".to_string()));
    }

    let request = PageRequest::from_params(&params);
    let page = fetch_page(state.store.as_ref(), &model.id, &request).await?;

    // 매핑은 요청당 한 번만 만들고 모든 항목에 재사용합니다.
    let mapping = FieldMapping::from_fields(&model.fields);
    Ok(Json(page.map(|item| mapping.remap(&item))))
}

/// `GET /api/{site}/content/{model}/{contentId}`
///
/// 콘텐츠가 있어도 지정한 모델 소속이 아니면 404입니다.
pub async fn get_content(
    State(state): State<AppState>,
    Path((site, model, content_id)): Path<(String, String, String)>,
) -> Result<Json<ContentItem>, AppError> {
    let model = resolve_model(state.store.as_ref(), &site, &model).await?;

    let item = state
        .store
        .get_content(&content_id)
        .await?
        .ok_or_else(|| AppError::not_found("Content item not found"))?;

    if item.model_id != model.id {
        return Err(AppError::not_found("Content item does not belong to this model"));
    }

    Ok(Json(FieldMapping::from_fields(&model.fields).remap(&item)))
}
