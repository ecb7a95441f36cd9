use crate::error::AppError;
use crate::models::Site;
use sqlx::SqlitePool;

pub async fn list_sites(pool: &SqlitePool) -> Result<Vec<Site>, AppError> {
    let sites = sqlx::query_as::<_, Site>(
        "SELECT id, name, app_id, logo, created_at FROM sites ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(sites)
}

pub async fn get_site(pool: &SqlitePool, id: &str) -> Result<Option<Site>, AppError> {
    let site = sqlx::query_as::<_, Site>(
        "SELECT id, name, app_id, logo, created_at FROM sites WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(site)
}

pub async fn find_site_by_app_id(pool: &SqlitePool, app_id: &str) -> Result<Option<Site>, AppError> {
    let site = sqlx::query_as::<_, Site>(
        "SELECT id, name, app_id, logo, created_at FROM sites WHERE app_id = ? LIMIT 1",
    )
    .bind(app_id)
    .fetch_optional(pool)
    .await?;

    Ok(site)
}

pub async fn create_site(pool: &SqlitePool, site: &Site) -> Result<(), AppError> {
    sqlx::query("INSERT INTO sites (id, name, app_id, logo, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&site.id)
        .bind(&site.name)
        .bind(&site.app_id)
        .bind(&site.logo)
        .bind(&site.created_at)
        .execute(pool)
        .await?;

    Ok(())
}
