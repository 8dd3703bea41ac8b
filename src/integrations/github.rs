use crate::config::LabelDef;
use crate::data::{Milestone, RawIssue};
use crate::integrations::{IssuePage, IssueTracker, QueryMode, HTTP_CLIENT};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt};
use futures::FutureExt;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub const GITHUB_API_URL: &str = "https://api.github.com";
const PER_PAGE: u32 = 100;

static NEXT_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("valid regex"));

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("GitHub API rate limited (resets at {reset:?})")]
    RateLimited { reset: Option<u64> },
    #[error("GitHub API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Response body layout of a paginated issue endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageShape {
    /// A bare JSON array of issues
    Array,
    /// A search result object with the issues under `items`
    SearchItems,
}

#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<RawIssue>,
}

#[derive(Deserialize)]
struct RepoResponse {
    full_name: String,
}

/// GitHub REST client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    token: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        HTTP_CLIENT
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "triage")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, TrackerError> {
        let response = builder.send().await?;
        check_response(response).await
    }

    fn first_page_url(&self, mode: &QueryMode) -> (String, PageShape) {
        match mode {
            QueryMode::Organization(org) => (
                format!(
                    "{}/orgs/{}/issues?filter=all&sort=updated&per_page={}",
                    self.base_url,
                    urlencoding::encode(org),
                    PER_PAGE
                ),
                PageShape::Array,
            ),
            QueryMode::Search(query) => (
                format!(
                    "{}/search/issues?q={}&sort=updated&order=desc&per_page={}",
                    self.base_url,
                    urlencoding::encode(query),
                    PER_PAGE
                ),
                PageShape::SearchItems,
            ),
            QueryMode::AuthenticatedUser => (
                format!("{}/issues?sort=updated&per_page={}", self.base_url, PER_PAGE),
                PageShape::Array,
            ),
        }
    }

    async fn fetch_page(
        &self,
        url: &str,
        shape: PageShape,
    ) -> Result<(Vec<RawIssue>, Option<String>)> {
        tracing::debug!("Fetching issue page: {}", url);
        let response = self.send(self.request(Method::GET, url)).await?;
        let next = next_page_url(response.headers());
        let issues = match shape {
            PageShape::Array => response
                .json::<Vec<RawIssue>>()
                .await
                .context("Failed to decode issue page")?,
            PageShape::SearchItems => {
                response
                    .json::<SearchResponse>()
                    .await
                    .context("Failed to decode search page")?
                    .items
            }
        };
        Ok((issues, next))
    }

    async fn get_all<T: serde::de::DeserializeOwned>(&self, first: String) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut next = Some(first);
        while let Some(url) = next {
            let response = self.send(self.request(Method::GET, &url)).await?;
            next = next_page_url(response.headers());
            let mut page: Vec<T> = response
                .json()
                .await
                .with_context(|| format!("Failed to decode {}", url))?;
            out.append(&mut page);
        }
        Ok(out)
    }

    pub async fn fetch_milestones(&self, owner: &str, repo: &str) -> Result<Vec<Milestone>> {
        self.get_all(format!(
            "{}/repos/{}/{}/milestones?state=open&per_page={}",
            self.base_url, owner, repo, PER_PAGE
        ))
        .await
        .with_context(|| format!("Failed to list milestones for {}/{}", owner, repo))
    }

    pub async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        due_on: Option<DateTime<Utc>>,
    ) -> Result<Milestone> {
        let mut body = serde_json::json!({ "title": title });
        if let Some(due) = due_on {
            body["due_on"] = serde_json::Value::String(due.to_rfc3339());
        }
        let url = format!("{}/repos/{}/{}/milestones", self.base_url, owner, repo);
        let response = self
            .send(self.request(Method::POST, &url).json(&body))
            .await
            .with_context(|| format!("Failed to create milestone {} in {}/{}", title, owner, repo))?;
        Ok(response.json().await?)
    }

    pub async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<LabelDef>> {
        self.get_all(format!(
            "{}/repos/{}/{}/labels?per_page={}",
            self.base_url, owner, repo, PER_PAGE
        ))
        .await
        .with_context(|| format!("Failed to list labels for {}/{}", owner, repo))
    }

    pub async fn create_label(&self, owner: &str, repo: &str, label: &LabelDef) -> Result<()> {
        let url = format!("{}/repos/{}/{}/labels", self.base_url, owner, repo);
        self.send(self.request(Method::POST, &url).json(label))
            .await
            .with_context(|| format!("Failed to create label {}", label.name))?;
        Ok(())
    }

    pub async fn update_label_color(&self, owner: &str, repo: &str, label: &LabelDef) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/labels/{}",
            self.base_url,
            owner,
            repo,
            urlencoding::encode(&label.name)
        );
        let body = serde_json::json!({ "color": label.color });
        self.send(self.request(Method::PATCH, &url).json(&body))
            .await
            .with_context(|| format!("Failed to update label {}", label.name))?;
        Ok(())
    }

    /// `owner/repo` of every repository visible to the user, or in `org`.
    pub async fn list_repos(&self, org: Option<&str>) -> Result<Vec<String>> {
        let url = match org {
            Some(org) => format!(
                "{}/orgs/{}/repos?type=all&per_page={}",
                self.base_url,
                urlencoding::encode(org),
                PER_PAGE
            ),
            None => format!("{}/user/repos?type=all&per_page={}", self.base_url, PER_PAGE),
        };
        let repos: Vec<RepoResponse> = self.get_all(url).await.context("Failed to list repos")?;
        Ok(repos.into_iter().map(|r| r.full_name).collect())
    }
}

impl IssueTracker for GithubClient {
    fn list_milestones<'a>(&'a self, project: &'a str) -> BoxFuture<'a, Result<Vec<Milestone>>> {
        async move {
            let (owner, repo) = crate::data::owner_repo(project)
                .with_context(|| format!("Invalid project name: {}", project))?;
            self.fetch_milestones(owner, repo).await
        }
        .boxed()
    }

    fn issues(&self, mode: &QueryMode) -> BoxStream<'static, IssuePage> {
        let client = self.clone();
        let (first, shape) = self.first_page_url(mode);
        stream::unfold(Some(first), move |next| {
            let client = client.clone();
            async move {
                let url = next?;
                match client.fetch_page(&url, shape).await {
                    Ok((issues, next)) => Some((Ok(issues), next)),
                    Err(e) => Some((Err(e), None)),
                }
            }
        })
        .boxed()
    }

    fn replace_labels<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        number: u64,
        labels: &'a [String],
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let url = format!(
                "{}/repos/{}/{}/issues/{}/labels",
                self.base_url, owner, repo, number
            );
            let body = serde_json::json!({ "labels": labels });
            self.send(self.request(Method::PUT, &url).json(&body))
                .await
                .with_context(|| format!("Failed to set labels on {}/{}#{}", owner, repo, number))?;
            Ok(())
        }
        .boxed()
    }

    fn set_milestone<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        number: u64,
        milestone: Option<u64>,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let url = format!("{}/repos/{}/{}/issues/{}", self.base_url, owner, repo, number);
            let body = serde_json::json!({ "milestone": milestone });
            self.send(self.request(Method::PATCH, &url).json(&body))
                .await
                .with_context(|| {
                    format!("Failed to set milestone on {}/{}#{}", owner, repo, number)
                })?;
            Ok(())
        }
        .boxed()
    }
}

async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if is_rate_limited(status, response.headers()) {
        let reset = header_u64(response.headers(), "x-ratelimit-reset");
        tracing::warn!("GitHub API rate limited, reset at {:?}", reset);
        return Err(TrackerError::RateLimited { reset });
    }
    let body = response.text().await.unwrap_or_default();
    Err(TrackerError::Status {
        status: status.as_u16(),
        body,
    })
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

/// 429 always, 403 only when the remaining quota is exhausted.
fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    match status {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => header_u64(headers, "x-ratelimit-remaining") == Some(0),
        _ => false,
    }
}

/// URL of the `rel="next"` entry of a `Link` header.
fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get("link")?.to_str().ok()?;
    NEXT_LINK
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
