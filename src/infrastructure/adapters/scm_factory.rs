//! SCM blame 포트 구현 어댑터.

use std::path::Path;

use crate::application::ports::{ScmBlame, ScmFactory};
use crate::infrastructure::scm::GitBlame;

pub struct GitScmFactory;

impl ScmFactory for GitScmFactory {
    fn build(&self, repo_dir: &Path) -> Box<dyn ScmBlame> {
        Box::new(GitBlame::new(repo_dir.to_path_buf()))
    }
}
