use super::{FetchError, RepoFetcher, RepoFile, RepoTree, TreeFilter};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url, header};
use serde::Deserialize;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("codecanvas/", env!("CARGO_PKG_VERSION"));

/// GitHub REST v3 client. Works unauthenticated at the public rate
/// limit; a token raises the limit and unlocks private repositories.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
    filter: TreeFilter,
}

#[derive(Deserialize)]
struct TreeResponse {
    sha: String,
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
}

/// Build an endpoint URL from path segments. Segments are
/// percent-encoded, so repository paths containing `#`, `?`, or spaces
/// survive as part of the request path.
fn api_url(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url =
        Url::parse(base).map_err(|_| FetchError::InvalidApiBase(base.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidApiBase(base.to_string()))?
        .extend(segments);
    Ok(url)
}

impl GitHubClient {
    pub fn new(token: Option<String>, filter: TreeFilter) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token, filter)
    }

    /// Point the client at a different API root.
    pub fn with_api_base(api_base: &str, token: Option<String>, filter: TreeFilter) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            filter,
        }
    }

    async fn get(&self, url: Url, accept: &str) -> Result<Response, FetchError> {
        let mut request = self
            .http
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    fn check_status(
        response: Response,
        owner: &str,
        repo: &str,
    ) -> Result<Response, FetchError> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            _ => Ok(response.error_for_status()?),
        }
    }
}

#[async_trait]
impl RepoFetcher for GitHubClient {
    async fn fetch_tree(&self, owner: &str, repo: &str) -> Result<RepoTree, FetchError> {
        let mut url = api_url(
            &self.api_base,
            &["repos", owner, repo, "git", "trees", "HEAD"],
        )?;
        url.set_query(Some("recursive=1"));
        let response = self.get(url, "application/vnd.github+json").await?;
        let response = Self::check_status(response, owner, repo)?;
        let payload: TreeResponse = response.json().await?;

        let blobs = payload
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| RepoFile {
                path: entry.path,
                size: entry.size,
            });
        let (files, warnings) = self.filter.apply(blobs);

        Ok(RepoTree {
            files,
            sha: payload.sha,
            warnings,
            truncated: payload.truncated,
        })
    }

    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, FetchError> {
        let mut segments = vec!["repos", owner, repo, "contents"];
        segments.extend(path.split('/'));
        let url = api_url(&self.api_base, &segments)?;
        // The raw media type skips the base64 content envelope.
        let response = self.get(url, "application/vnd.github.raw+json").await?;
        let response = Self::check_status(response, owner, repo)?;
        Ok(response.text().await?)
    }
}
