//! # 필드 정의 편집
//!
//! 모델의 필드 목록을 추가/수정/삭제/재정렬하는 순수 함수들입니다.
//! 저장소에 접근하지 않고 `Vec<Field>`만 바꾸므로, 라우트 핸들러가
//! 모델을 읽고 → 이 함수로 수정하고 → 모델을 통째로 저장합니다.
//!
//! 모든 함수가 끝난 뒤 다음이 성립합니다:
//! - `order`는 1..N 연속값
//! - `useAsTitle`이 true인 필드는 최대 하나
//! - 필드 appId는 모델 안에서 유일

use crate::error::AppError;
use crate::models::{Field, FieldInput, MoveDirection};
use regex::Regex;
use std::sync::LazyLock;

/// 처음 쓸 때 한 번만 컴파일합니다.
static APP_ID_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$"));

/// appId 형식을 검사합니다: 소문자로 시작하고 영문자/숫자만 포함 (camelCase)
pub fn validate_app_id(app_id: &str) -> Result<(), AppError> {
    let pattern = APP_ID_PATTERN
        .as_ref()
        .map_err(|e| AppError::Internal(format!("Regex error: {e}")))?;

    if pattern.is_match(app_id) {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "Invalid appId '{app_id}': must start with a lowercase letter and contain only letters and digits"
        )))
    }
}

/// 표시 이름을 camelCase appId 후보로 바꿉니다.
///
/// `slug::slugify`로 악센트 제거/소문자화/구분자 통일을 한 뒤 단어 경계를 대문자로 잇습니다.
/// 예: `"Blog Post"` → `"blogPost"`, `"Café Menü"` → `"cafeMenu"`
pub fn to_camel_case(name: &str) -> String {
    let slug = slug::slugify(name);
    let mut out = String::with_capacity(slug.len());

    for (i, word) in slug.split('-').filter(|w| !w.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}

/// 요청에 appId가 있으면 그것을, 없으면 이름에서 만든 값을 검사해서 반환합니다.
pub fn resolve_app_id(explicit: Option<&str>, name: &str) -> Result<String, AppError> {
    let app_id = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(app_id) => app_id.to_string(),
        None => to_camel_case(name),
    };
    validate_app_id(&app_id)?;
    Ok(app_id)
}

fn new_field_id() -> String {
    format!("field_{}", uuid::Uuid::now_v7().simple())
}

/// order 순으로 정렬하고 1..N으로 다시 번호를 매깁니다.
fn renumber(fields: &mut [Field]) {
    fields.sort_by_key(|f| f.order);
    for (i, field) in fields.iter_mut().enumerate() {
        field.order = i as u32 + 1;
    }
}

/// 필드를 추가하거나(`field_id`가 `None`) 기존 필드를 수정합니다.
///
/// - 새 필드: `field_<uuid>` id를 받고 맨 뒤(`order = N + 1`)에 붙습니다.
/// - 수정: id와 order는 유지하고 나머지 속성을 덮어씁니다.
/// - 저장된 필드가 `useAsTitle`이면 다른 모든 필드의 `useAsTitle`을 끕니다.
///
/// 저장된 필드를 반환합니다.
pub fn upsert_field(
    fields: &mut Vec<Field>,
    field_id: Option<&str>,
    input: FieldInput,
) -> Result<Field, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Field name is required"));
    }
    let app_id = resolve_app_id(input.app_id.as_deref(), name)?;

    let taken = fields
        .iter()
        .any(|f| f.app_id == app_id && f.id.as_deref() != field_id);
    if taken {
        return Err(AppError::Conflict(format!(
            "A field with appId '{app_id}' already exists in this model"
        )));
    }

    let index = match field_id {
        Some(id) => fields
            .iter()
            .position(|f| f.id.as_deref() == Some(id))
            .ok_or_else(|| AppError::not_found("Field not found"))?,
        None => {
            renumber(fields);
            fields.push(Field {
                id: Some(new_field_id()),
                order: fields.len() as u32 + 1,
                ..Default::default()
            });
            fields.len() - 1
        }
    };

    let field = &mut fields[index];
    field.name = name.to_string();
    field.app_id = app_id;
    field.description = input.description;
    field.field_type = input.field_type;
    field.required = input.required;
    field.use_as_title = input.use_as_title;
    field.show_in_list = input.show_in_list;
    let saved = field.clone();

    if saved.use_as_title {
        for other in fields.iter_mut().filter(|f| f.id != saved.id) {
            other.use_as_title = false;
        }
    }

    Ok(saved)
}

/// 필드를 삭제하고 남은 필드의 order를 1..N으로 다시 매깁니다.
///
/// 기존 콘텐츠의 해당 키는 그대로 남습니다. (공개 API에서는 매핑이 없어 빠집니다)
pub fn remove_field(fields: &mut Vec<Field>, field_id: &str) -> Result<Field, AppError> {
    let index = fields
        .iter()
        .position(|f| f.id.as_deref() == Some(field_id))
        .ok_or_else(|| AppError::not_found("Field not found"))?;

    let removed = fields.remove(index);
    renumber(fields);
    Ok(removed)
}

/// 필드를 한 칸 위/아래로 옮깁니다.
///
/// 이웃과 자리를 바꾼 뒤 두 필드만이 아니라 전체 order를 1..N으로 다시 매깁니다.
/// 맨 위에서 위로, 맨 아래에서 아래로 옮기면 순서는 그대로입니다. (번호는 정리됨)
pub fn move_field(
    fields: &mut [Field],
    field_id: &str,
    direction: MoveDirection,
) -> Result<(), AppError> {
    fields.sort_by_key(|f| f.order);
    let index = fields
        .iter()
        .position(|f| f.id.as_deref() == Some(field_id))
        .ok_or_else(|| AppError::not_found("Field not found"))?;

    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&i| i < fields.len()),
    };
    if let Some(neighbour) = neighbour {
        fields.swap(index, neighbour);
    }

    for (i, field) in fields.iter_mut().enumerate() {
        field.order = i as u32 + 1;
    }
    Ok(())
}
