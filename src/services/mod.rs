//! # 서비스 계층
//!
//! HTTP나 저장소 세부사항과 무관한 도메인 로직을 모아둔 모듈입니다.
//! - `remap`: 콘텐츠 데이터 키를 필드 id에서 appId로 변환
//! - `pagination`: 오프셋/커서 방식 콘텐츠 페이지네이션
//! - `schema`: 필드 목록으로 폼 검증 규칙과 기본값 생성
//! - `fields`: 필드 추가/수정/삭제/재정렬과 appId 규칙
//! - `preview`: 모델의 미리보기 URL 템플릿을 콘텐츠 값으로 채움

pub mod fields;
pub mod pagination;
pub mod preview;
pub mod remap;
pub mod schema;

pub use pagination::{fetch_page, PageRequest};
pub use preview::resolve_preview_url;
pub use remap::FieldMapping;
pub use schema::FormSchema;
