//! # 모델(Model) 관리 핸들러
//!
//! 모델 CRUD와 필드 편집, 콘텐츠 입력 폼 스키마를 제공합니다.
//!
//! ## 엔드포인트
//! - `GET    /admin/models?site=`                      → 모델 목록
//! - `POST   /admin/models`                            → 새 모델 생성
//! - `GET    /admin/models/{id}`                       → 단일 모델 조회
//! - `PATCH  /admin/models/{id}`                       → 모델 정보 수정 (부분 업데이트)
//! - `DELETE /admin/models/{id}`                       → 모델 삭제 (콘텐츠가 있으면 409)
//! - `POST   /admin/models/{id}/fields`                → 필드 추가
//! - `PUT    /admin/models/{id}/fields/{fieldId}`      → 필드 수정
//! - `DELETE /admin/models/{id}/fields/{fieldId}`      → 필드 삭제
//! - `POST   /admin/models/{id}/fields/{fieldId}/move` → 필드 한 칸 이동 (`{ "direction": "up" | "down" }`)
//! - `GET    /admin/models/{id}/form?content=`         → 폼 스키마와 초기값
//!
//! 필드 편집은 모델을 읽고 → `services::fields`로 필드 목록을 바꾸고 → 모델을 통째로 저장합니다.
//! 동시 편집 충돌은 감지하지 않습니다. (마지막 쓰기가 이김)

use super::AppState;
use crate::db::{ContentStore, ModelDeletion};
use crate::error::AppError;
use crate::models::{
    self, CreateModelRequest, FieldInput, Model, MoveFieldRequest, UpdateModelRequest,
};
use crate::services::{fields, FormSchema};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ModelListParams {
    /// 사이트 id. 없으면 전체 모델
    pub site: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FormParams {
    /// 편집할 기존 콘텐츠 id
    pub content: Option<String>,
}

/// id로 모델을 읽습니다. 없으면 404입니다.
pub(crate) async fn load_model(store: &dyn ContentStore, id: &str) -> Result<Model, AppError> {
    store
        .get_model(id)
        .await?
        .ok_or_else(|| AppError::not_found("Model not found"))
}

/// `updated_at`을 갱신하고 모델을 저장합니다.
async fn save_model(store: &dyn ContentStore, mut model: Model) -> Result<Model, AppError> {
    model.updated_at = models::now_timestamp();
    if !store.update_model(&model).await? {
        return Err(AppError::not_found("Model not found"));
    }
    Ok(model)
}

/// 같은 사이트 범위에 appId가 이미 있으면 409
async fn ensure_model_app_id_free(
    store: &dyn ContentStore,
    site: Option<&str>,
    app_id: &str,
    except: Option<&str>,
) -> Result<(), AppError> {
    match store.find_model_by_app_id(site, app_id).await? {
        Some(existing) if Some(existing.id.as_str()) != except => Err(AppError::Conflict(
            format!("A model with appId '{app_id}' already exists in this site"),
        )),
        _ => Ok(()),
    }
}

/// `GET /admin/models`
pub async fn list_models(
    State(state): State<AppState>,
    Query(params): Query<ModelListParams>,
) -> Result<Json<Value>, AppError> {
    let site = params.site.as_deref().filter(|s| !s.is_empty());
    let models = state.store.list_models(site).await?;
    Ok(Json(json!({ "models": models })))
}

/// `POST /admin/models`: 필드 없는 새 모델을 만듭니다.
pub async fn create_model(
    State(state): State<AppState>,
    Json(req): Json<CreateModelRequest>,
) -> Result<(StatusCode, Json<Model>), AppError> {
    let store = state.store.as_ref();

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Model name is required"));
    }
    let app_id = fields::resolve_app_id(req.app_id.as_deref(), name)?;

    let site = req.site.filter(|s| !s.is_empty());
    if let Some(site_id) = site.as_deref() {
        if store.get_site(site_id).await?.is_none() {
            return Err(AppError::not_found("Site not found"));
        }
    }
    ensure_model_app_id_free(store, site.as_deref(), &app_id, None).await?;

    let now = models::now_timestamp();
    let model = Model {
        id: models::new_id(),
        name: name.to_string(),
        app_id,
        description: req.description.unwrap_or_default(),
        preview_url: req.preview_url.filter(|u| !u.trim().is_empty()),
        site,
        fields: Vec::new(),
        created_at: now.clone(),
        updated_at: now,
    };
    store.create_model(&model).await?;
    tracing::info!(model_id = %model.id, app_id = %model.app_id, "model created");

    Ok((StatusCode::CREATED, Json(model)))
}

/// `GET /admin/models/{id}`
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Model>, AppError> {
    Ok(Json(load_model(state.store.as_ref(), &id).await?))
}

/// `PATCH /admin/models/{id}`: 보낸 항목만 바꿉니다. 필드 목록은 필드 전용 엔드포인트로 바꿉니다.
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateModelRequest>,
) -> Result<Json<Model>, AppError> {
    let store = state.store.as_ref();
    let mut model = load_model(store, &id).await?;

    if let Some(name) = req.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Model name is required"));
        }
        model.name = name.to_string();
    }
    if let Some(app_id) = req.app_id {
        let app_id = app_id.trim();
        fields::validate_app_id(app_id)?;
        ensure_model_app_id_free(store, model.site.as_deref(), app_id, Some(model.id.as_str())).await?;
        model.app_id = app_id.to_string();
    }
    if let Some(description) = req.description {
        model.description = description;
    }
    if let Some(preview_url) = req.preview_url {
        model.preview_url = Some(preview_url).filter(|u| !u.trim().is_empty());
    }

    Ok(Json(save_model(store, model).await?))
}

/// `DELETE /admin/models/{id}`
///
/// 콘텐츠가 남아 있으면 삭제하지 않고 409를 반환합니다.
/// 삭제는 "콘텐츠가 없을 때만", 콘텐츠 생성은 "모델이 있을 때만" 저장소에서 한 문장으로 수행되므로
/// 두 요청이 겹쳐도 모델 없는 콘텐츠가 남지 않습니다.
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    match state.store.delete_model_if_unused(&id).await? {
        ModelDeletion::Deleted => {
            tracing::info!(model_id = %id, "model deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        ModelDeletion::NotFound => Err(AppError::not_found("Model not found")),
        ModelDeletion::InUse => {
            tracing::warn!(model_id = %id, "refusing to delete model with content");
            Err(AppError::Conflict(
                "Cannot delete model: content items still reference it".to_string(),
            ))
        }
    }
}

/// `POST /admin/models/{id}/fields`: 필드를 맨 뒤에 추가하고 변경된 모델을 반환합니다.
pub async fn add_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<FieldInput>,
) -> Result<(StatusCode, Json<Model>), AppError> {
    let store = state.store.as_ref();
    let mut model = load_model(store, &id).await?;
    fields::upsert_field(&mut model.fields, None, input)?;
    Ok((StatusCode::CREATED, Json(save_model(store, model).await?)))
}

/// `PUT /admin/models/{id}/fields/{fieldId}`
pub async fn update_field(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
    Json(input): Json<FieldInput>,
) -> Result<Json<Model>, AppError> {
    let store = state.store.as_ref();
    let mut model = load_model(store, &id).await?;
    fields::upsert_field(&mut model.fields, Some(field_id.as_str()), input)?;
    Ok(Json(save_model(store, model).await?))
}

/// `DELETE /admin/models/{id}/fields/{fieldId}`
///
/// 기존 콘텐츠에 남은 이 필드의 값은 지우지 않습니다.
pub async fn delete_field(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
) -> Result<Json<Model>, AppError> {
    let store = state.store.as_ref();
    let mut model = load_model(store, &id).await?;
    fields::remove_field(&mut model.fields, &field_id)?;
    Ok(Json(save_model(store, model).await?))
}

/// `POST /admin/models/{id}/fields/{fieldId}/move`
pub async fn move_field(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
    Json(req): Json<MoveFieldRequest>,
) -> Result<Json<Model>, AppError> {
    let store = state.store.as_ref();
    let mut model = load_model(store, &id).await?;
    fields::move_field(&mut model.fields, &field_id, req.direction)?;
    Ok(Json(save_model(store, model).await?))
}

/// `GET /admin/models/{id}/form?content=`: 콘텐츠 입력 폼 정보
///
/// 응답: `{ "fields": [...], "values": { fieldId: value } }`
/// `content`가 있으면 그 콘텐츠의 값이 타입 기본값보다 우선합니다.
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<FormParams>,
) -> Result<Json<Value>, AppError> {
    let store = state.store.as_ref();
    let model = load_model(store, &id).await?;
    let schema = FormSchema::from_fields(&model.fields);

    let existing = match params.content.as_deref().filter(|c| !c.is_empty()) {
        Some(content_id) => {
            let item = store
                .get_content(content_id)
                .await?
                .filter(|item| item.model_id == model.id)
                .ok_or_else(|| AppError::not_found("Content item not found"))?;
            Some(item.data)
        }
        None => None,
    };

    let values = schema.defaults(existing.as_ref());
    Ok(Json(json!({ "fields": schema.fields, "values": values })))
}
