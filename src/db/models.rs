//! # 모델 데이터베이스 쿼리 모듈
//!
//! `models` 테이블에 대한 CRUD 쿼리 함수들입니다.
//! 필드 목록은 `fields` 컬럼에 JSON 배열로 저장되며,
//! `sqlx::types::Json`으로 감싸서 바인딩하고 `#[sqlx(json)]`으로 읽어옵니다.

use crate::db::ModelDeletion;
use crate::error::AppError;
use crate::models::Model;
use sqlx::{types::Json, SqlitePool};

/// 모델 목록을 생성일 내림차순으로 조회합니다.
///
/// `site_id`가 있으면 해당 사이트의 모델만, 없으면 전체 모델을 반환합니다.
pub async fn list_models(pool: &SqlitePool, site_id: Option<&str>) -> Result<Vec<Model>, AppError> {
    // if let Some(x) = ...: Option이 Some일 때만 실행되는 패턴 매칭
    let models = if let Some(site_id) = site_id {
        sqlx::query_as::<_, Model>(
            r#"
            SELECT id, name, app_id, description, preview_url, site_id, fields, created_at, updated_at
            FROM models
            WHERE site_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(site_id)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, Model>(
            r#"
            SELECT id, name, app_id, description, preview_url, site_id, fields, created_at, updated_at
            FROM models
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await?
    };

    Ok(models)
}

/// ID로 단일 모델을 조회합니다.
///
/// - `Ok(Some(Model))`: 모델을 찾은 경우
/// - `Ok(None)`: 해당 ID의 모델이 없는 경우
pub async fn get_model(pool: &SqlitePool, id: &str) -> Result<Option<Model>, AppError> {
    let model = sqlx::query_as::<_, Model>(
        r#"
        SELECT id, name, app_id, description, preview_url, site_id, fields, created_at, updated_at
        FROM models
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(model)
}

/// 사이트 범위 안에서 appId로 모델을 찾습니다.
///
/// SQL에서 `site_id = NULL`은 항상 거짓이므로,
/// 사이트가 없는 모델은 `IS NULL`로 따로 조회합니다.
pub async fn find_model_by_app_id(
    pool: &SqlitePool,
    site_id: Option<&str>,
    app_id: &str,
) -> Result<Option<Model>, AppError> {
    let model = match site_id {
        Some(site_id) => {
            sqlx::query_as::<_, Model>(
                r#"
                SELECT id, name, app_id, description, preview_url, site_id, fields, created_at, updated_at
                FROM models
                WHERE app_id = ? AND site_id = ?
                ORDER BY created_at, id
                LIMIT 1
                "#,
            )
            .bind(app_id)
            .bind(site_id)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Model>(
                r#"
                SELECT id, name, app_id, description, preview_url, site_id, fields, created_at, updated_at
                FROM models
                WHERE app_id = ? AND site_id IS NULL
                ORDER BY created_at, id
                LIMIT 1
                "#,
            )
            .bind(app_id)
            .fetch_optional(pool)
            .await?
        }
    };

    Ok(model)
}

/// `(site_id, app_id)` 유니크 인덱스 위반을 409로 바꿉니다.
///
/// 핸들러의 사전 검사와 INSERT 사이에 같은 appId가 먼저 저장된 경우입니다.
fn duplicate_app_id(err: sqlx::Error, app_id: &str) -> AppError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => AppError::Conflict(format!(
            "A model with appId '{app_id}' already exists in this site"
        )),
        _ => AppError::Database(err),
    }
}

/// 새 모델을 저장합니다. id와 타임스탬프는 호출하는 쪽에서 채워서 넘깁니다.
pub async fn create_model(pool: &SqlitePool, model: &Model) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO models (id, name, app_id, description, preview_url, site_id, fields, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&model.id)
    .bind(&model.name)
    .bind(&model.app_id)
    .bind(&model.description)
    .bind(&model.preview_url)
    .bind(&model.site) // Option<String>: None이면 SQL NULL
    .bind(Json(&model.fields)) // Vec<Field> → JSON 문자열
    .bind(&model.created_at)
    .bind(&model.updated_at)
    .execute(pool)
    .await
    .map_err(|e| duplicate_app_id(e, &model.app_id))?;

    Ok(())
}

/// 모델 문서를 통째로 덮어씁니다.
///
/// 동시 편집 충돌 감지는 하지 않습니다. 마지막 쓰기가 이깁니다.
pub async fn update_model(pool: &SqlitePool, model: &Model) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE models
        SET name = ?, app_id = ?, description = ?, preview_url = ?, site_id = ?, fields = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&model.name)
    .bind(&model.app_id)
    .bind(&model.description)
    .bind(&model.preview_url)
    .bind(&model.site)
    .bind(Json(&model.fields))
    .bind(&model.updated_at)
    .bind(&model.id)
    .execute(pool)
    .await
    .map_err(|e| duplicate_app_id(e, &model.app_id))?;

    Ok(result.rows_affected() > 0)
}

/// 콘텐츠가 없는 경우에만 모델을 삭제합니다.
///
/// `NOT EXISTS` 조건을 DELETE 문 안에 넣어 검사와 삭제를 한 문장으로 처리합니다.
/// 삭제되지 않았다면 모델이 없는 것인지, 콘텐츠가 남아 있는 것인지 구분해서 알려줍니다.
pub async fn delete_model_if_unused(pool: &SqlitePool, id: &str) -> Result<ModelDeletion, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM models
        WHERE id = ?
          AND NOT EXISTS (SELECT 1 FROM content WHERE model_id = ?)
        "#,
    )
    .bind(id)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(ModelDeletion::Deleted);
    }

    Ok(match get_model(pool, id).await? {
        Some(_) => ModelDeletion::InUse,
        None => ModelDeletion::NotFound,
    })
}
