//! # contentdesk 웹 서버 진입점
//!
//! 헤드리스 CMS의 사이트/모델/콘텐츠 문서를 HTTP로 제공하는 서버입니다.
//! - 공개 읽기 API: `/api/{site}/...` (필드 id 대신 appId 키로 변환된 콘텐츠)
//! - 관리 API: `/admin/...` (편집 화면용 CRUD)
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 저장소 연결 및 마이그레이션
//! 4. 라우터 구성
//! 5. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use anyhow::Result;
use config::Config;
use db::SqliteStore;
use routes::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 contentdesk, tower_http, axum 모듈을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contentdesk=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting contentdesk server on {}:{}", config.host, config.port);

    // ── 4단계: 저장소 연결 ──
    // 연결 풀 생성과 마이그레이션을 함께 수행합니다.
    let store = SqliteStore::connect(&config.database_url, config.max_connections).await?;

    // ── 5단계: 라우터 구성 ──
    // 저장소는 AppState를 통해 모든 핸들러에 주입됩니다.
    let app = routes::router(AppState::new(store));

    // ── 6단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
