//! Interface layer
//! CLI 입력을 해석하고 유스케이스를 조립한다.

pub mod cli;
pub mod composition;
