//! 콘솔 리포터 포트 구현 어댑터.

use crate::application::ports::Reporter;

/// 진행 상황을 stdout에 출력한다. 진단 로그는 `tracing`(stderr)으로 분리된다.
#[derive(Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn section(&self, name: &str) {
        println!();
        println!("==================== {} ====================", name);
    }

    fn kv(&self, key: &str, value: &str) {
        println!("{:<12}: {}", key, value);
    }

    fn status(&self, scope: &str, message: &str) {
        println!("[{:<12}] {}", scope, message);
    }
}
