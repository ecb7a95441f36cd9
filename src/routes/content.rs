//! # 콘텐츠 관리 핸들러
//!
//! 편집 화면이 사용하는 콘텐츠 CRUD입니다.
//! 공개 API와 달리 `data` 키는 필드 id 그대로 주고받습니다.
//!
//! ## 엔드포인트
//! - `GET    /admin/models/{id}/content` → 모델의 콘텐츠 페이지 (`?page=&pageSize=&cursor=&mode=`)
//! - `POST   /admin/models/{id}/content` → 새 콘텐츠 생성
//! - `GET    /admin/content/{id}`        → 단일 콘텐츠 조회
//! - `PUT    /admin/content/{id}`        → 콘텐츠 데이터 덮어쓰기
//! - `DELETE /admin/content/{id}`        → 콘텐츠 삭제 (즉시, 되돌릴 수 없음)
//! - `GET    /admin/content/{id}/preview`→ 모델의 미리보기 URL을 이 콘텐츠 값으로 채운 결과
//!
//! 쓰기 요청은 모델의 폼 스키마로 검증되며, 실패하면 필드별 에러 목록과 함께 400을 반환합니다.

use super::{models::load_model, AppState};
use crate::db::ContentStore;
use crate::error::AppError;
use crate::models::{self, ContentData, ContentInput, ContentItem, Model, PageParams, Paginated};
use crate::services::{fetch_page, resolve_preview_url, FormSchema, PageRequest};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// 모델 스키마로 입력 데이터를 검증하고 스키마에 있는 키만 남깁니다.
///
/// 저장된 필드가 하나도 없는 모델은 검증 없이 그대로 저장합니다.
fn validated(model: &Model, data: ContentData) -> Result<ContentData, AppError> {
    let schema = FormSchema::from_fields(&model.fields);
    if schema.fields.is_empty() {
        return Ok(data);
    }
    schema.validate(&data).map_err(AppError::Validation)
}

async fn load_content(store: &dyn ContentStore, id: &str) -> Result<ContentItem, AppError> {
    store
        .get_content(id)
        .await?
        .ok_or_else(|| AppError::not_found("Content item not found"))
}

/// `GET /admin/models/{id}/content`
pub async fn list_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<ContentItem>>, AppError> {
    let store = state.store.as_ref();
    let model = load_model(store, &id).await?;
    let page = fetch_page(store, &model.id, &PageRequest::from_params(&params)).await?;
    Ok(Json(page))
}

/// `POST /admin/models/{id}/content`
pub async fn create_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ContentInput>,
) -> Result<(StatusCode, Json<ContentItem>), AppError> {
    let store = state.store.as_ref();
    let model = load_model(store, &id).await?;
    let data = validated(&model, input.data)?;

    let now = models::now_timestamp();
    let item = ContentItem {
        id: models::new_id(),
        model_id: model.id,
        data,
        created_at: now.clone(),
        updated_at: now,
    };
    // 모델을 읽은 뒤 삭제된 경우에도 저장소가 거절합니다.
    if !store.create_content(&item).await? {
        return Err(AppError::not_found("Model not found"));
    }
    tracing::debug!(content_id = %item.id, model_id = %item.model_id, "content created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /admin/content/{id}`
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentItem>, AppError> {
    Ok(Json(load_content(state.store.as_ref(), &id).await?))
}

/// `PUT /admin/content/{id}`: `data` 전체를 덮어씁니다. 동시 수정은 마지막 쓰기가 이깁니다.
pub async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ContentInput>,
) -> Result<Json<ContentItem>, AppError> {
    let store = state.store.as_ref();
    let mut item = load_content(store, &id).await?;
    let model = load_model(store, &item.model_id).await?;

    item.data = validated(&model, input.data)?;
    item.updated_at = models::now_timestamp();
    if !store.update_content(&item).await? {
        return Err(AppError::not_found("Content item not found"));
    }

    Ok(Json(item))
}

/// `DELETE /admin/content/{id}`
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_content(&id).await? {
        return Err(AppError::not_found("Content item not found"));
    }
    tracing::debug!(content_id = %id, "content deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/content/{id}/preview`
///
/// 응답: `{ "url": "..." }`. 모델에 미리보기 URL이 없으면 404입니다.
pub async fn preview_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = state.store.as_ref();
    let item = load_content(store, &id).await?;
    let model = load_model(store, &item.model_id).await?;

    let template = model
        .preview_url
        .as_deref()
        .ok_or_else(|| AppError::not_found("Model has no preview URL"))?;
    let url = resolve_preview_url(template, &model.fields, &item.data)?;

    Ok(Json(json!({ "url": url })))
}
