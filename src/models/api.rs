//! 提交接口的数据结构
//!
//! HTTP 层与命令行共用的请求/响应格式。

use serde::{Deserialize, Serialize};

use crate::error::{AppResult, ValidationError};
use crate::models::IdeaSubmission;

/// 提交请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub augmented: Option<String>,
}

impl SubmitRequest {
    /// 转换为经过校验的提交
    pub fn into_submission(self) -> Result<IdeaSubmission, ValidationError> {
        IdeaSubmission::new(self.title, self.content, self.augmented)
    }
}

/// 提交响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SubmitResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            message: None,
            content: None,
        }
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: None,
            content: Some(content.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            content: None,
        }
    }
}

impl<T> From<AppResult<T>> for SubmitResponse {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(_) => SubmitResponse::ok(),
            Err(e) => SubmitResponse::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_request_optional_fields() {
        let req: SubmitRequest = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert_eq!(req.title, None);
        assert_eq!(req.augmented, None);

        let idea = req.into_submission().unwrap();
        assert_eq!(idea.content(), "hello");
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(
            serde_json::to_string(&SubmitResponse::ok()).unwrap(),
            r#"{"ok":true}"#
        );
        assert_eq!(
            serde_json::to_string(&SubmitResponse::with_content("x")).unwrap(),
            r#"{"ok":true,"content":"x"}"#
        );

        let failed: SubmitResponse =
            AppResult::<()>::Err(AppError::from(ValidationError::EmptyContent)).into();
        assert!(!failed.ok);
        assert_eq!(failed.message.as_deref(), Some("输入无效: 内容不能为空"));
    }
}
