use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub app_id: String,
    /// 관리 화면용 로고 이미지 (data URL 또는 이미지 URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiteRequest {
    pub name: String,
    /// 없으면 이름에서 camelCase로 생성합니다.
    pub app_id: Option<String>,
    pub logo: Option<String>,
}
