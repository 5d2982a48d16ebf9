//! 입력 URL을 GitLab MR 대상으로 해석하는 모듈.

use anyhow::{Result, bail};
use url::Url;

/// MR 식별자는 원문 그대로 보관하고, 숫자 해석은 실행 단계에서 한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestTarget {
    pub host: String,
    pub project_path: String,
    pub merge_request_id: String,
    pub url: String,
}

impl MergeRequestTarget {
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL host is missing"))?
            .to_string();

        let segments: Vec<String> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).map(ToString::to_string).collect())
            .unwrap_or_default();

        match parse_gitlab(&host, &segments, input) {
            Some(target) => Ok(target),
            None => bail!("unsupported URL format: {input}"),
        }
    }
}

/// 숫자 IID로 해석한다. 실패 시 입력 오류로 실행을 중단한다.
pub fn parse_merge_request_id(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(iid) => Ok(iid),
        Err(_) => bail!("Could not parse Merge Request ID"),
    }
}

fn parse_gitlab(host: &str, segments: &[String], input: &str) -> Option<MergeRequestTarget> {
    // /group/.../project/-/merge_requests/<iid>
    let sep = segments.iter().position(|s| s == "-")?;
    if sep == 0 || segments.get(sep + 1)? != "merge_requests" {
        return None;
    }
    let merge_request_id = segments.get(sep + 2)?.clone();

    Some(MergeRequestTarget {
        host: host.to_string(),
        project_path: segments[..sep].join("/"),
        merge_request_id,
        url: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_group_path() {
        let target =
            MergeRequestTarget::parse("https://gitlab.example.com/group/sub/app/-/merge_requests/42")
                .unwrap();
        assert_eq!(target.host, "gitlab.example.com");
        assert_eq!(target.project_path, "group/sub/app");
        assert_eq!(parse_merge_request_id(&target.merge_request_id).unwrap(), 42);
    }

    #[test]
    fn non_numeric_id_is_input_error() {
        let target =
            MergeRequestTarget::parse("https://gitlab.example.com/group/app/-/merge_requests/abc")
                .unwrap();
        let err = parse_merge_request_id(&target.merge_request_id).unwrap_err();
        assert_eq!(err.to_string(), "Could not parse Merge Request ID");
    }

    #[test]
    fn rejects_non_merge_request_url() {
        assert!(MergeRequestTarget::parse("https://gitlab.example.com/group/app/-/issues/3").is_err());
        assert!(MergeRequestTarget::parse("https://gitlab.example.com/-/merge_requests/3").is_err());
    }
}
