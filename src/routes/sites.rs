//! # 사이트 관리 핸들러
//!
//! - `GET  /admin/sites` → 사이트 목록 (이름순)
//! - `POST /admin/sites` → 새 사이트 생성

use super::AppState;
use crate::db::ContentStore;
use crate::error::AppError;
use crate::models::{self, CreateSiteRequest, Site};
use crate::services::fields::resolve_app_id;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn list_sites(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let sites = state.store.list_sites().await?;
    Ok(Json(json!({ "sites": sites })))
}

/// `POST /admin/sites`
///
/// appId가 없으면 이름에서 camelCase로 만듭니다. 이미 있는 appId면 409입니다.
pub async fn create_site(
    State(state): State<AppState>,
    Json(req): Json<CreateSiteRequest>,
) -> Result<(StatusCode, Json<Site>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Site name is required"));
    }
    let app_id = resolve_app_id(req.app_id.as_deref(), name)?;

    if state.store.find_site_by_app_id(&app_id).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A site with appId '{app_id}' already exists"
        )));
    }

    let site = Site {
        id: models::new_id(),
        name: name.to_string(),
        app_id,
        logo: req.logo.filter(|l| !l.is_empty()),
        created_at: models::now_timestamp(),
    };
    state.store.create_site(&site).await?;
    tracing::info!(site_id = %site.id, app_id = %site.app_id, "site created");

    Ok((StatusCode::CREATED, Json(site)))
}
