//! 유스케이스 모음.

pub mod decorate_mr;
pub mod inspect_config;
