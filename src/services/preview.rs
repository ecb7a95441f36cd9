//! # 미리보기 URL
//!
//! 모델의 `previewUrl` 템플릿에 있는 `{appId}` 자리표시자를 콘텐츠 값으로 채웁니다.
//! 예: 템플릿 `https://blog.example.com/{slug}`, slug 필드 값 `hello` → `https://blog.example.com/hello`
//!
//! 값은 인코딩하지 않고 그대로 넣습니다.
//! 채울 값을 찾지 못한 자리표시자는 원문(`{slug}`) 그대로 남습니다.

use crate::error::AppError;
use crate::models::{ContentData, Field, FieldValue};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}"));

/// URL에 넣을 문자열. 빈 문자열, 0, false는 값이 없는 것으로 봅니다.
fn display_value(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(text) if !text.is_empty() => Some(text.clone()),
        FieldValue::Number(n) if *n != 0.0 && !n.is_nan() => Some(n.to_string()),
        FieldValue::Bool(true) => Some("true".to_string()),
        FieldValue::TextList(items) => Some(items.join(",")),
        _ => None,
    }
}

/// 템플릿의 `{appId}`를 `data`의 값으로 바꾼 URL을 반환합니다.
///
/// 자리표시자 이름은 앞뒤 공백을 무시하고, id가 있는 필드 중 appId가 같은 첫 필드의 값을 씁니다.
pub fn resolve_preview_url(
    template: &str,
    fields: &[Field],
    data: &ContentData,
) -> Result<String, AppError> {
    let pattern = PLACEHOLDER
        .as_ref()
        .map_err(|e| AppError::Internal(format!("Regex error: {e}")))?;

    let url = pattern.replace_all(template, |caps: &Captures| {
        let app_id = caps[1].trim();
        fields
            .iter()
            .filter(|field| field.app_id == app_id)
            .find_map(|field| field.id.as_deref().filter(|id| !id.is_empty()))
            .and_then(|field_id| data.get(field_id))
            .and_then(display_value)
            .unwrap_or_else(|| caps[0].to_string())
    });

    Ok(url.into_owned())
}
