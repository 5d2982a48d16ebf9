//! Domain layer
//! 비즈니스 규칙(엔티티/값 객체/도메인 정책)을 외부 의존성 없이 표현한다.

pub mod classify;
pub mod decoration;
pub mod identity;
pub mod merge_request;
pub mod policy;
pub mod target;
