//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": "ok" }`
//!
//! 로드밸런서나 컨테이너 오케스트레이터가 서버 가동 여부를 확인할 때 사용합니다.
//! 저장소에는 접근하지 않습니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 서버 상태를 확인합니다.
///
/// `Result`를 사용하지 않으므로 이 핸들러는 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
