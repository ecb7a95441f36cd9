//! # 필드 키 변환 (field id → appId)
//!
//! 콘텐츠의 `data`는 저장 시 필드 `id`를 키로 사용합니다.
//! 공개 API 응답에서는 이 키를 외부용 `appId`로 바꿔서 내보냅니다.
//! 변환은 읽을 때만 적용되며, 저장된 데이터는 바뀌지 않습니다.

use crate::models::{ContentData, ContentItem, Field};
use std::collections::HashMap;

/// 필드 id → appId 매핑
///
/// 요청마다 한 번 만들고, 그 요청의 모든 항목 변환에 재사용합니다.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    app_ids: HashMap<String, String>,
    /// id를 가진 필드가 하나도 없는 모델: 키를 바꾸지 않습니다.
    identity: bool,
}

impl FieldMapping {
    /// 모델의 필드 목록으로 매핑을 만듭니다.
    ///
    /// `id`와 `appId`가 모두 채워진 필드만 포함합니다.
    /// id는 있지만 appId가 빈 필드는 매핑에 없으므로 그 키는 버려집니다.
    pub fn from_fields(fields: &[Field]) -> Self {
        let identity = !fields
            .iter()
            .any(|field| field.id.as_deref().is_some_and(|id| !id.is_empty()));

        let app_ids = fields
            .iter()
            .filter_map(|field| match field.id.as_deref() {
                Some(id) if !id.is_empty() && !field.app_id.is_empty() => {
                    Some((id.to_string(), field.app_id.clone()))
                }
                _ => None,
            })
            .collect();

        Self { app_ids, identity }
    }

    /// 콘텐츠 하나의 `data` 키를 appId로 바꾼 새 콘텐츠를 반환합니다.
    ///
    /// - 필드 목록 전체가 아니라 항목이 가진 키만 순회합니다.
    ///   일부 필드만 있는 오래된 레코드도 에러 없이 처리됩니다.
    /// - 매핑에 없는 키는 조용히 버립니다.
    /// - id를 가진 필드가 없는 옛 모델이면 항목을 그대로 반환합니다.
    pub fn remap(&self, item: &ContentItem) -> ContentItem {
        if self.identity {
            return item.clone();
        }

        let data: ContentData = item
            .data
            .iter()
            .filter_map(|(field_id, value)| {
                self.app_ids
                    .get(field_id)
                    .map(|app_id| (app_id.clone(), value.clone()))
            })
            .collect();

        ContentItem {
            data,
            ..item.clone()
        }
    }
}
