//! # 모델(Model)과 필드(Field) 정의
//!
//! 모델은 사용자가 정의하는 콘텐츠 타입입니다. (예: "블로그 글", "상품")
//! 모델은 순서가 있는 타입 필드 목록을 가지며, 콘텐츠는 이 필드 목록에 맞춰 작성됩니다.
//!
//! ## 두 가지 식별자
//! - `id`: 내부 식별자. 콘텐츠의 `data` 맵에서 키로 쓰입니다.
//! - `appId`: 외부 식별자(camelCase). 공개 API 응답에서만 키로 쓰입니다.

use serde::{Deserialize, Serialize};

/// 필드 타입
///
/// JSON에서는 `"text"`, `"textList"` 같은 문자열로 표현됩니다.
/// 알 수 없는 타입 문자열은 `Other`로 보존하여,
/// 저장된 모델이 새 타입 때문에 읽기 실패하지 않도록 합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Boolean,
    Markdown,
    Media,
    Datetime,
    Number,
    Color,
    TextList,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Markdown => "markdown",
            FieldType::Media => "media",
            FieldType::Datetime => "datetime",
            FieldType::Number => "number",
            FieldType::Color => "color",
            FieldType::TextList => "textList",
            FieldType::Other(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => FieldType::Text,
            "boolean" => FieldType::Boolean,
            "markdown" => FieldType::Markdown,
            "media" => FieldType::Media,
            "datetime" => FieldType::Datetime,
            "number" => FieldType::Number,
            "color" => FieldType::Color,
            "textList" => FieldType::TextList,
            _ => FieldType::Other(value),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// 모델의 필드 하나
///
/// `id`가 없는 필드는 아직 저장되지 않은 필드입니다.
/// 이런 필드는 콘텐츠 스키마와 appId 매핑에서 모두 제외됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub app_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// 목록 화면에서 제목으로 쓰는 필드. 모델 안에서 최대 하나만 true입니다.
    #[serde(default)]
    pub use_as_title: bool,
    #[serde(default)]
    pub show_in_list: bool,
    /// 1부터 시작하는 표시 순서. 재정렬 후에는 항상 1..N 연속값입니다.
    #[serde(default)]
    pub order: u32,
}

/// 모델 엔티티: DB의 `models` 테이블 한 행(row)에 대응합니다.
///
/// `fields`는 JSON 컬럼에 통째로 저장됩니다. (`#[sqlx(json)]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    pub app_id: String,
    pub description: String,
    /// 미리보기 URL 템플릿. `{appId}`는 콘텐츠의 해당 필드 값으로 바뀝니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// 소유 사이트의 id. 단일 사이트 구성에서는 없을 수 있습니다.
    #[sqlx(rename = "site_id")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[sqlx(json)]
    pub fields: Vec<Field>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelRequest {
    pub name: String,
    pub app_id: Option<String>,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub site: Option<String>,
}

/// 모델 수정 요청 (PATCH). 보낸 항목만 변경합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModelRequest {
    pub name: Option<String>,
    pub app_id: Option<String>,
    pub description: Option<String>,
    /// 빈 문자열이면 미리보기 URL을 지웁니다.
    pub preview_url: Option<String>,
}

/// 필드 추가/수정 요청 본문
///
/// `appId`가 비어 있으면 `name`에서 camelCase로 생성합니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInput {
    pub name: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub use_as_title: bool,
    #[serde(default)]
    pub show_in_list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Deserialize)]
pub struct MoveFieldRequest {
    pub direction: MoveDirection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_type_round_trips_known_and_unknown_names() {
        let field: Field = serde_json::from_value(json!({
            "id": "f1", "appId": "tags", "name": "Tags", "type": "textList", "order": 1
        }))
        .unwrap();
        assert_eq!(field.field_type, FieldType::TextList);

        let odd: Field = serde_json::from_value(json!({ "name": "Geo", "type": "geopoint" })).unwrap();
        assert_eq!(odd.field_type, FieldType::Other("geopoint".into()));
        assert_eq!(serde_json::to_value(&odd).unwrap()["type"], "geopoint");
        assert!(odd.id.is_none());
    }

    #[test]
    fn model_row_serializes_for_the_api() {
        let model = Model {
            id: "m1".into(),
            name: "Post".into(),
            app_id: "post".into(),
            description: String::new(),
            preview_url: Some("https://example.com/{slug}".into()),
            site: None,
            fields: vec![Field { id: Some("f1".into()), app_id: "title".into(), name: "Title".into(), order: 1, ..Default::default() }],
            created_at: "t".into(),
            updated_at: "t".into(),
        };
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["appId"], "post");
        assert!(value.get("site").is_none());
        assert_eq!(value["previewUrl"], "https://example.com/{slug}");
        assert_eq!(value["fields"][0]["type"], "text");
        assert_eq!(value["fields"][0]["useAsTitle"], false);
    }
}
