//! # 콘텐츠 데이터베이스 쿼리 모듈
//!
//! `content` 테이블에 대한 조회/생성/수정/삭제 쿼리 함수들입니다.
//!
//! ## 정렬 규칙
//! 모든 목록 조회는 `ORDER BY created_at DESC, id DESC`입니다.
//! `created_at`은 고정 폭 UTC 문자열이라 문자열 비교가 곧 시간 비교이고,
//! 생성 시각이 같은 문서끼리는 `id` 내림차순으로 순서가 고정됩니다.

use crate::db::{Anchor, ContentQuery};
use crate::error::AppError;
use crate::models::ContentItem;
use sqlx::{types::Json, SqlitePool};

/// ID로 단일 콘텐츠를 조회합니다.
pub async fn get_content(pool: &SqlitePool, id: &str) -> Result<Option<ContentItem>, AppError> {
    let item = sqlx::query_as::<_, ContentItem>(
        r#"
        SELECT id, model_id, data, created_at, updated_at
        FROM content
        WHERE id = ?
        "#,
    )
    .bind(id)
    // .fetch_optional(): 결과가 0행이면 None, 1행이면 Some(ContentItem)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// 모델에 속한 콘텐츠를 정렬 순서대로 조회합니다.
///
/// # 매개변수
/// - `query.after`: 있으면 이 기준점보다 "뒤"의 문서만 조회 (커서 방식)
/// - `query.offset`: 건너뛸 문서 수 (오프셋 방식)
/// - `query.limit`: 최대 문서 수
///
/// 오프셋 방식은 스냅샷 격리가 없습니다.
/// 두 번의 조회 사이에 문서가 추가/삭제되면 항목이 건너뛰어지거나 중복될 수 있습니다.
pub async fn list_content(
    pool: &SqlitePool,
    query: &ContentQuery,
) -> Result<Vec<ContentItem>, AppError> {
    // SQLite의 LIMIT/OFFSET은 i64로 바인딩합니다.
    let limit = i64::from(query.limit);
    let offset = i64::try_from(query.offset)
        .map_err(|_| AppError::bad_request("Page offset is too large"))?;

    let items = match &query.after {
        Some(Anchor { created_at, id }) => {
            sqlx::query_as::<_, ContentItem>(
                r#"
                SELECT id, model_id, data, created_at, updated_at
                FROM content
                WHERE model_id = ?
                  AND (created_at < ? OR (created_at = ? AND id < ?))
                ORDER BY created_at DESC, id DESC
                LIMIT ? OFFSET ?
                "#,
                // ↑ 기준점 "뒤" = 더 오래되었거나, 같은 시각이면서 id가 더 작은 문서
            )
            .bind(&query.model_id)
            .bind(created_at)
            .bind(created_at)
            .bind(id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ContentItem>(
                r#"
                SELECT id, model_id, data, created_at, updated_at
                FROM content
                WHERE model_id = ?
                ORDER BY created_at DESC, id DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(&query.model_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(items)
}

/// 모델에 속한 콘텐츠 수를 셉니다.
pub async fn count_content(pool: &SqlitePool, model_id: &str) -> Result<u64, AppError> {
    // query_scalar: 결과의 첫 번째 컬럼 하나만 값으로 꺼냅니다.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content WHERE model_id = ?")
        .bind(model_id)
        .fetch_one(pool)
        .await?;

    // COUNT(*)는 음수가 될 수 없으므로 변환 실패 시 0으로 처리합니다.
    Ok(u64::try_from(count).unwrap_or(0))
}

/// 모델이 아직 있을 때만 새 콘텐츠를 저장합니다.
///
/// 모델 존재 검사를 INSERT 문 안에 넣어, 그 사이에 모델이 삭제되어도
/// 주인 없는 콘텐츠가 생기지 않습니다.
///
/// - `Ok(true)`: 저장 성공
/// - `Ok(false)`: 해당 모델이 없음
pub async fn create_content(pool: &SqlitePool, item: &ContentItem) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO content (id, model_id, data, created_at, updated_at)
        SELECT ?, ?, ?, ?, ?
        WHERE EXISTS (SELECT 1 FROM models WHERE id = ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.model_id)
    .bind(Json(&item.data))
    .bind(&item.created_at)
    .bind(&item.updated_at)
    .bind(&item.model_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 콘텐츠의 데이터를 덮어씁니다.
///
/// - `Ok(true)`: 수정 성공
/// - `Ok(false)`: 해당 ID의 콘텐츠가 없음
pub async fn update_content(pool: &SqlitePool, item: &ContentItem) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE content SET data = ?, updated_at = ? WHERE id = ?")
        .bind(Json(&item.data))
        .bind(&item.updated_at)
        .bind(&item.id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 콘텐츠를 삭제합니다. 삭제는 즉시 반영되며 되돌릴 수 없습니다.
pub async fn delete_content(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM content WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    // .rows_affected(): 삭제된 행이 있으면 true
    Ok(result.rows_affected() > 0)
}
