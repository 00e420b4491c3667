/// GitHub 内容 API 客户端
///
/// 封装仓库文件的存在性检查与新建提交
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::clients::{ContentStore, WriteOutcome};
use crate::config::Config;
use crate::error::WriteError;

const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("idea-polish/", env!("CARGO_PKG_VERSION"));

/// GitHub 客户端
pub struct GithubClient {
    http: reqwest::Client,
    api_base_url: String,
    token: String,
    owner: String,
    repo: String,
    committer: Committer,
}

#[derive(Debug, Clone, Serialize)]
struct Committer {
    name: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct CreateFileRequest<'a> {
    message: &'a str,
    /// base64 编码的文件内容
    content: String,
    committer: &'a Committer,
}

impl GithubClient {
    /// 创建新的 GitHub 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: config.github_api_base_url.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
            owner: config.github_owner.clone(),
            repo: config.github_repo.clone(),
            committer: Committer {
                name: config.committer_name.clone(),
                email: config.committer_email.clone(),
            },
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base_url,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header("User-Agent", USER_AGENT)
    }
}

#[async_trait]
impl ContentStore for GithubClient {
    async fn exists(&self, path: &str) -> Result<bool, WriteError> {
        let response = self
            .with_headers(self.http.get(self.contents_url(path)))
            .send()
            .await
            .map_err(|source| WriteError::RequestFailed {
                path: path.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(bad_status(path, status, response).await),
        }
    }

    async fn create(
        &self,
        path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<WriteOutcome, WriteError> {
        debug!("写入文件: {} ({} 字节)", path, content.len());

        let body = CreateFileRequest {
            message: commit_message,
            content: STANDARD.encode(content.as_bytes()),
            committer: &self.committer,
        };

        let response = self
            .with_headers(self.http.put(self.contents_url(path)))
            .json(&body)
            .send()
            .await
            .map_err(|source| WriteError::RequestFailed {
                path: path.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::CREATED => Ok(WriteOutcome::Created),
            // 不带 sha 更新已有文件时 GitHub 返回 422
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                debug!("路径已存在: {}", path);
                Ok(WriteOutcome::Conflict)
            }
            status => Err(bad_status(path, status, response).await),
        }
    }
}

async fn bad_status(path: &str, status: StatusCode, response: reqwest::Response) -> WriteError {
    let body = response.text().await.unwrap_or_default();
    WriteError::BadStatus {
        path: path.to_string(),
        status: status.as_u16(),
        body,
    }
}
