//! # 동적 폼 스키마
//!
//! 모델의 필드 목록으로 콘텐츠 입력 폼의 검증 규칙과 기본값을 만듭니다.
//! 모델마다 코드를 따로 쓰지 않고, 하나의 범용 폼이 임의 모양의 콘텐츠를 다룰 수 있게 합니다.
//!
//! 타입별 동작(규칙, 기본값, 위젯)은 모두 아래 `FieldType` impl 한 곳에 모여 있습니다.
//! 새 타입을 추가하면 `match`가 빠짐없이 처리하도록 컴파일러가 알려줍니다.
//!
//! appId 형식/중복 검사는 여기서 하지 않습니다. (필드 정의 시점에 `fields` 모듈에서 수행)

use crate::error::FieldError;
use crate::models::{ContentData, Field, FieldType, FieldValue};
use serde::Serialize;

/// 필드 값이 가져야 하는 모양
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    String,
    Boolean,
    Number,
    StringList,
    /// 알 수 없는 타입: 문자열, 불리언, 문자열 목록, 숫자 모두 허용
    Any,
}

impl ValueKind {
    fn accepts(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (ValueKind::Any, _)
                | (ValueKind::String, FieldValue::Text(_))
                | (ValueKind::Boolean, FieldValue::Bool(_))
                | (ValueKind::Number, FieldValue::Number(_))
                | (ValueKind::StringList, FieldValue::TextList(_))
        )
    }

    fn describe(self) -> &'static str {
        match self {
            ValueKind::String => "a string",
            ValueKind::Boolean => "a boolean",
            ValueKind::Number => "a number",
            ValueKind::StringList => "a list of strings",
            ValueKind::Any => "a string, boolean, list or number",
        }
    }
}

/// 필드 하나의 검증 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub kind: ValueKind,
    /// 값이 반드시 있어야 함
    pub required: bool,
    /// 문자열/목록이 비어 있으면 안 됨
    pub non_empty: bool,
}

impl Rule {
    /// 값 하나를 검사합니다. 실패하면 `label`을 넣은 메시지를 반환합니다.
    pub fn check(&self, label: &str, value: Option<&FieldValue>) -> Result<(), String> {
        let Some(value) = value else {
            return if self.required {
                Err(format!("{label} is required"))
            } else {
                Ok(())
            };
        };

        if !self.kind.accepts(value) {
            return Err(format!(
                "{label} must be {}, got {}",
                self.kind.describe(),
                value.kind()
            ));
        }

        let empty = match value {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::TextList(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        };
        if self.non_empty && empty {
            return Err(format!("{label} is required"));
        }

        Ok(())
    }
}

const DEFAULT_COLOR: &str = "#000000";

impl FieldType {
    /// 타입별 검증 규칙
    ///
    /// | 타입 | 값 | required일 때 |
    /// |------|----|---------------|
    /// | text, markdown, datetime | 문자열 | 비어 있지 않은 문자열 |
    /// | boolean | 불리언 | (항상 선택) |
    /// | number | 숫자 | 값이 있어야 함 |
    /// | color | 문자열 | 값이 있어야 함 |
    /// | media, textList | 문자열 목록 | 비어 있지 않은 목록 |
    /// | 그 외 | 아무거나 | (항상 선택) |
    pub fn rule(&self, required: bool) -> Rule {
        let (kind, required, non_empty) = match self {
            FieldType::Text | FieldType::Markdown | FieldType::Datetime => {
                (ValueKind::String, required, required)
            }
            FieldType::Boolean => (ValueKind::Boolean, false, false),
            FieldType::Number => (ValueKind::Number, required, false),
            FieldType::Color => (ValueKind::String, required, false),
            FieldType::Media | FieldType::TextList => (ValueKind::StringList, required, required),
            FieldType::Other(_) => (ValueKind::Any, false, false),
        };
        Rule {
            kind,
            required,
            non_empty,
        }
    }

    /// 새 콘텐츠의 기본값. `None`이면 키 자체를 만들지 않습니다.
    pub fn default_value(&self) -> Option<FieldValue> {
        match self {
            FieldType::Text | FieldType::Markdown | FieldType::Datetime => {
                Some(FieldValue::Text(String::new()))
            }
            FieldType::Boolean => Some(FieldValue::Bool(false)),
            FieldType::Media | FieldType::TextList => Some(FieldValue::TextList(Vec::new())),
            FieldType::Color => Some(FieldValue::Text(DEFAULT_COLOR.to_string())),
            FieldType::Number | FieldType::Other(_) => None,
        }
    }

    /// 편집 화면이 그릴 입력 위젯 이름
    pub fn widget(&self) -> &'static str {
        match self {
            FieldType::Text | FieldType::Other(_) => "textInput",
            FieldType::Boolean => "checkbox",
            FieldType::Markdown => "markdownEditor",
            FieldType::Media => "mediaPicker",
            FieldType::Datetime => "dateTimePicker",
            FieldType::Number => "numberInput",
            FieldType::Color => "colorPicker",
            FieldType::TextList => "tagInput",
        }
    }
}

/// 폼에 나타나는 필드 하나
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    pub app_id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub widget: &'static str,
    pub rule: Rule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
}

/// 모델 하나의 폼 스키마. 필드는 `order` 순서입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FormField>,
}

impl FormSchema {
    /// 필드 목록으로 스키마를 만듭니다.
    ///
    /// 아직 저장되지 않아 `id`가 없는 필드는 건너뜁니다.
    pub fn from_fields(fields: &[Field]) -> Self {
        let mut ordered: Vec<&Field> = fields.iter().collect();
        ordered.sort_by_key(|f| f.order);

        let fields = ordered
            .into_iter()
            .filter_map(|field| {
                let id = field.id.as_deref().filter(|id| !id.is_empty())?;
                Some(FormField {
                    id: id.to_string(),
                    app_id: field.app_id.clone(),
                    name: field.name.clone(),
                    description: field.description.clone(),
                    field_type: field.field_type.clone(),
                    widget: field.field_type.widget(),
                    rule: field.field_type.rule(field.required),
                    default_value: field.field_type.default_value(),
                })
            })
            .collect();

        Self { fields }
    }

    /// 폼의 초기값을 만듭니다.
    ///
    /// 기존 콘텐츠를 편집하는 경우 필드마다 기존 값이 타입 기본값보다 우선합니다.
    pub fn defaults(&self, existing: Option<&ContentData>) -> ContentData {
        self.fields
            .iter()
            .filter_map(|field| {
                let value = existing
                    .and_then(|data| data.get(&field.id))
                    .cloned()
                    .or_else(|| field.default_value.clone())?;
                Some((field.id.clone(), value))
            })
            .collect()
    }

    /// 입력 데이터를 검증합니다.
    ///
    /// 성공하면 스키마에 있는 키만 남긴 데이터를, 실패하면 필드별 에러 목록을 반환합니다.
    pub fn validate(&self, data: &ContentData) -> Result<ContentData, Vec<FieldError>> {
        let mut cleaned = ContentData::new();
        let mut errors = Vec::new();

        for field in &self.fields {
            let value = data.get(&field.id);
            match field.rule.check(&field.name, value) {
                Ok(()) => {
                    if let Some(value) = value {
                        cleaned.insert(field.id.clone(), value.clone());
                    }
                }
                Err(message) => errors.push(FieldError::new(field.id.as_str(), message)),
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }
}
