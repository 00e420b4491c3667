use std::time::Duration;

use crate::error::ConfigError;

/// 程序配置
///
/// 构造后不再修改，按值（或 `Arc`）传给流程层。
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 润色、翻译、扩展使用的模型
    pub llm_model_name: String,
    /// 生成标题、slug 使用的轻量模型
    pub llm_title_model_name: String,
    // --- GitHub 配置 ---
    pub github_api_base_url: String,
    pub github_token: String,
    pub github_owner: String,
    pub github_repo: String,
    pub committer_name: String,
    pub committer_email: String,
    /// 文档在仓库中的目录
    pub content_dir: String,
    // --- 流程配置 ---
    /// 返回内容无法解析时的额外重试次数
    pub max_malformed_retries: usize,
    /// slug 冲突时最多尝试的候选数量
    pub max_slug_attempts: usize,
    pub title_timeout_secs: u64,
    pub slug_timeout_secs: u64,
    pub polish_timeout_secs: u64,
    pub augment_timeout_secs: u64,
    pub write_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: String::new(),
            llm_model_name: "anthropic/claude-sonnet-4-5-20250929".to_string(),
            llm_title_model_name: "anthropic/claude-haiku-4-5-20251001".to_string(),
            github_api_base_url: "https://api.github.com".to_string(),
            github_token: String::new(),
            github_owner: String::new(),
            github_repo: String::new(),
            committer_name: "Ideas API Server".to_string(),
            committer_email: "ideas@localhost".to_string(),
            content_dir: "content/ideas".to_string(),
            max_malformed_retries: 1,
            max_slug_attempts: 20,
            title_timeout_secs: 30,
            slug_timeout_secs: 30,
            polish_timeout_secs: 90,
            augment_timeout_secs: 90,
            write_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置或无法解析的项使用默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        let (github_owner, github_repo) = std::env::var("GIT_REPO")
            .ok()
            .and_then(|v| split_repo(&v))
            .unwrap_or((default.github_owner, default.github_repo));

        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_title_model_name: std::env::var("LLM_TITLE_MODEL_NAME").unwrap_or(default.llm_title_model_name),
            github_api_base_url: std::env::var("GIT_API_BASE_URL").unwrap_or(default.github_api_base_url),
            github_token: std::env::var("GIT_TOKEN").unwrap_or(default.github_token),
            github_owner,
            github_repo,
            committer_name: std::env::var("GIT_COMMITTER_NAME").unwrap_or(default.committer_name),
            committer_email: std::env::var("GIT_COMMITTER_EMAIL").unwrap_or(default.committer_email),
            content_dir: std::env::var("IDEAS_CONTENT_DIR").unwrap_or(default.content_dir),
            max_malformed_retries: std::env::var("MAX_MALFORMED_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_malformed_retries),
            max_slug_attempts: std::env::var("MAX_SLUG_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_slug_attempts),
            title_timeout_secs: std::env::var("TITLE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.title_timeout_secs),
            slug_timeout_secs: std::env::var("SLUG_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.slug_timeout_secs),
            polish_timeout_secs: std::env::var("POLISH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.polish_timeout_secs),
            augment_timeout_secs: std::env::var("AUGMENT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.augment_timeout_secs),
            write_timeout_secs: std::env::var("WRITE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.write_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 检查必填项
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("LLM_API_BASE_URL", &self.llm_api_base_url),
            ("LLM_API_KEY", &self.llm_api_key),
            ("GIT_TOKEN", &self.github_token),
        ];
        for (var_name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EnvVarNotFound {
                    var_name: var_name.to_string(),
                });
            }
        }

        if self.github_owner.is_empty() || self.github_repo.is_empty() {
            return Err(ConfigError::EnvVarParseFailed {
                var_name: "GIT_REPO".to_string(),
                value: format!("{}/{}", self.github_owner, self.github_repo),
                expected_type: "owner/repo".to_string(),
            });
        }

        if self.max_slug_attempts == 0 {
            return Err(ConfigError::EnvVarParseFailed {
                var_name: "MAX_SLUG_ATTEMPTS".to_string(),
                value: "0".to_string(),
                expected_type: "正整数".to_string(),
            });
        }

        Ok(())
    }

    pub fn title_timeout(&self) -> Duration {
        Duration::from_secs(self.title_timeout_secs)
    }

    pub fn slug_timeout(&self) -> Duration {
        Duration::from_secs(self.slug_timeout_secs)
    }

    pub fn polish_timeout(&self) -> Duration {
        Duration::from_secs(self.polish_timeout_secs)
    }

    pub fn augment_timeout(&self) -> Duration {
        Duration::from_secs(self.augment_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

/// 解析 `owner/repo`
fn split_repo(value: &str) -> Option<(String, String)> {
    let (owner, repo) = value.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}
