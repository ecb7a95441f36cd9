//! # 콘텐츠 모델 정의
//!
//! 콘텐츠(ContentItem)는 모델 하나에 속한 데이터 레코드입니다.
//! `data`의 키는 저장 시 항상 필드 `id`이고, 공개 API에서만 `appId`로 바뀝니다.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// 필드 값: 문자열, 불리언, 숫자, 문자열 목록 중 하나
///
/// `#[serde(untagged)]`: JSON에 타입 태그 없이 값 모양 그대로 직렬화합니다.
/// 예: `"hello"`, `true`, `3.5`, `["a", "b"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    TextList(Vec<String>),
}

impl FieldValue {
    /// 검증 에러 메시지에 쓰는 값 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
            FieldValue::TextList(_) => "list",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::TextList(value)
    }
}

/// 콘텐츠 데이터: 키 → 값 맵. 값이 없는 필드는 키 자체가 없습니다.
pub type ContentData = BTreeMap<String, FieldValue>;

/// `null` 값을 "키 없음"으로 취급하며 `ContentData`를 읽습니다.
pub fn deserialize_data<'de, D>(deserializer: D) -> Result<ContentData, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<FieldValue>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    /// 소유 모델의 `id` (appId가 아님)
    pub model_id: String,
    #[sqlx(json)]
    #[serde(default, deserialize_with = "deserialize_data")]
    pub data: ContentData,
    pub created_at: String,
    pub updated_at: String,
}

/// 콘텐츠 생성/수정 요청 본문. 키는 필드 id입니다.
#[derive(Debug, Deserialize)]
pub struct ContentInput {
    #[serde(default, deserialize_with = "deserialize_data")]
    pub data: ContentData,
}
