use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tokio_util::sync::CancellationToken;

use idea_polish::clients::{ChatBackend, ContentStore, WriteOutcome};
use idea_polish::error::{LlmError, UpstreamError, WriteError};
use idea_polish::models::classify;
use idea_polish::services::prompts;
use idea_polish::workflow::PipelineStage;
use idea_polish::{AppError, Config, IdeaFlow, IdeaSubmission, LanguageTag, SubmitRequest};

const CONTENT: &str = "所有权让内存安全在编译期就得到保证，借用检查器负责执行这些规则。";

/// 润色结果，正文中的换行没有转义
const POLISHED_ZH: &str = "{\"lang\":\"zh\",\"polished_title\":\"所有权\",\"polished_content\":\"所有权在编译期保证内存安全。\n\n借用检查器负责执行规则。\",\"translated_title\":\"Why Ownership Matters\",\"translated_content\":\"Ownership guarantees memory safety at compile time.\n\nThe borrow checker enforces the rules.\"}";

const AUGMENT_ZH: &str = "### 背景\n\nRust 的所有权模型来自线性类型研究。";
const AUGMENT_EN: &str =
    "### Context\n\nRust's ownership model grew out of research on linear types.";

// ========== 测试替身 ==========

/// 按 system 提示词区分调用类型的 LLM 替身
struct FakeChat {
    polish_replies: Mutex<Vec<String>>,
    slug_reply: String,
    delay: Option<Duration>,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl FakeChat {
    fn new(polish_replies: &[&str], slug_reply: &str) -> Self {
        Self {
            polish_replies: Mutex::new(polish_replies.iter().map(|s| s.to_string()).collect()),
            slug_reply: slug_reply.to_string(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls_of(&self, kind: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, user)| user.clone())
            .collect()
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for FakeChat {
    async fn complete(&self, _model: &str, system: &str, user: &str) -> Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let (kind, reply) = if system == prompts::TITLE_PROMPT {
            ("title", "所有权".to_string())
        } else if system == prompts::POLISH_PROMPT {
            let mut replies = self.polish_replies.lock().unwrap();
            let reply = if replies.len() > 1 {
                replies.remove(0)
            } else {
                replies[0].clone()
            };
            ("polish", reply)
        } else if system == prompts::SLUG_PROMPT {
            ("slug", self.slug_reply.clone())
        } else if system == prompts::AUGMENT_PROMPT {
            // 按输入语言生成扩展内容
            let block = match classify(user) {
                LanguageTag::Zh => AUGMENT_ZH,
                LanguageTag::En => AUGMENT_EN,
            };
            ("augment", block.to_string())
        } else if system == prompts::TRANSLATE_PROMPT {
            let block = if user.starts_with("Source language: English") {
                AUGMENT_ZH
            } else {
                AUGMENT_EN
            };
            ("translate", block.to_string())
        } else {
            panic!("未知的提示词: {}", system);
        };

        self.calls.lock().unwrap().push((kind, user.to_string()));
        Ok(reply)
    }
}

/// 内存中的内容仓库
#[derive(Default)]
struct MemoryStore {
    files: Mutex<HashMap<String, String>>,
    /// exists() 查不到、create() 时才发现已被占用的路径（模拟并发写入）
    racing: HashSet<String>,
    /// 路径以此结尾时 create() 返回错误
    failing_suffix: Mutex<Option<&'static str>>,
    /// 路径以此结尾时 create() 先等待一段时间
    slow_suffix: Option<(&'static str, Duration)>,
}

impl MemoryStore {
    fn file(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn exists(&self, path: &str) -> Result<bool, WriteError> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn create(
        &self,
        path: &str,
        content: &str,
        _commit_message: &str,
    ) -> Result<WriteOutcome, WriteError> {
        if let Some((suffix, delay)) = self.slow_suffix {
            if path.ends_with(suffix) {
                tokio::time::sleep(delay).await;
            }
        }

        let failing = *self.failing_suffix.lock().unwrap();
        if let Some(suffix) = failing {
            if path.ends_with(suffix) {
                return Err(WriteError::BadStatus {
                    path: path.to_string(),
                    status: 500,
                    body: "internal error".to_string(),
                });
            }
        }

        let mut files = self.files.lock().unwrap();
        if self.racing.contains(path) || files.contains_key(path) {
            return Ok(WriteOutcome::Conflict);
        }
        files.insert(path.to_string(), content.to_string());
        Ok(WriteOutcome::Created)
    }
}

// ========== 辅助函数 ==========

fn test_config() -> Config {
    Config {
        max_malformed_retries: 1,
        ..Config::default()
    }
}

fn received_at() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2025-03-01T08:30:00+08:00").unwrap()
}

fn submission(title: Option<&str>, augmented: Option<&str>) -> IdeaSubmission {
    IdeaSubmission::new(
        title.map(str::to_string),
        CONTENT,
        augmented.map(str::to_string),
    )
    .unwrap()
    .with_received_at(received_at())
}

fn flow(config: Config, chat: &Arc<FakeChat>, store: &Arc<MemoryStore>) -> IdeaFlow {
    IdeaFlow::with_backends(config, chat.clone(), store.clone())
}

// ========== 测试 ==========

#[tokio::test]
async fn test_post_writes_both_documents() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "why-ownership-matters"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let outcome = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.lang, LanguageTag::Zh);
    assert_eq!(outcome.slug.as_str(), "why-ownership-matters");
    assert_eq!(outcome.native_path, "content/ideas/why-ownership-matters.zh.md");
    assert_eq!(outcome.other_path, "content/ideas/why-ownership-matters.en.md");

    let zh = store.file(&outcome.native_path).unwrap();
    assert!(zh.starts_with("---\ntitle: \"所有权\"\nslug: \"why-ownership-matters\"\n"));
    assert!(zh.contains("date: 2025-03-01T08:30:00+08:00\nlang: zh\n"));
    assert!(zh.contains("counterpart: \"content/ideas/why-ownership-matters.en.md\""));
    assert!(zh.contains(
        "所有权在编译期保证内存安全。\n\n借用检查器负责执行规则。\n"
    ));
    assert!(zh.contains("## 延伸阅读\n\n### 背景"));

    let en = store.file(&outcome.other_path).unwrap();
    assert!(en.starts_with("---\ntitle: \"Why Ownership Matters\"\n"));
    assert!(en.contains("lang: en\n"));
    assert!(en.contains(
        "Ownership guarantees memory safety at compile time.\n\nThe borrow checker"
    ));
    assert!(en.contains("## Augmented\n\n### Context"));

    // 有标题时不生成标题；扩展内容生成后再翻译
    assert!(chat.calls_of("title").is_empty());
    assert_eq!(chat.calls_of("polish").len(), 1);
    assert_eq!(chat.calls_of("augment").len(), 1);
    assert_eq!(chat.calls_of("translate").len(), 1);
    assert_eq!(
        chat.calls_of("slug"),
        vec!["Why Ownership Matters".to_string()]
    );
}

#[tokio::test]
async fn test_post_generates_title_when_missing() {
    let fenced = format!("```json\n{}\n```", POLISHED_ZH);
    let chat = Arc::new(FakeChat::new(&[fenced.as_str()], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    flow.post(&submission(None, None), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(chat.calls_of("title"), vec![CONTENT.to_string()]);
    let polish = chat.calls_of("polish");
    assert!(polish[0].contains("Title: 所有权\n"));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_slug_collision_gets_suffix() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);
    let cancel = CancellationToken::new();

    let first = flow
        .post(&submission(Some("所有权"), None), &cancel)
        .await
        .unwrap();
    let first_zh = store.file(&first.native_path).unwrap();

    let second = flow
        .post(&submission(Some("所有权"), Some("预先写好的扩展")), &cancel)
        .await
        .unwrap();

    assert_eq!(first.slug.as_str(), "ownership");
    assert_eq!(second.slug.as_str(), "ownership-2");
    assert_eq!(store.len(), 4);
    // 第一篇没有被覆盖
    assert_eq!(store.file(&first.native_path).unwrap(), first_zh);
    assert!(store
        .file("content/ideas/ownership-2.zh.md")
        .unwrap()
        .contains("slug: \"ownership-2\""));
}

#[tokio::test]
async fn test_conflict_during_write_picks_next_slug() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore {
        racing: HashSet::from(["content/ideas/ownership.zh.md".to_string()]),
        ..MemoryStore::default()
    });
    let flow = flow(test_config(), &chat, &store);

    let outcome = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.slug.as_str(), "ownership-2");
    assert!(store.file("content/ideas/ownership.zh.md").is_none());
    assert!(store.file("content/ideas/ownership-2.en.md").is_some());
}

#[tokio::test]
async fn test_partial_commit_names_committed_language() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore {
        failing_suffix: Mutex::new(Some(".en.md")),
        ..MemoryStore::default()
    });
    let flow = flow(test_config(), &chat, &store);

    let err = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        AppError::PartialCommit {
            committed,
            committed_path,
            missing,
            pending,
            ..
        } => {
            assert_eq!(committed, LanguageTag::Zh);
            assert_eq!(missing, LanguageTag::En);
            assert_eq!(committed_path, "content/ideas/ownership.zh.md");
            assert_eq!(pending.path, "content/ideas/ownership.en.md");
            assert_eq!(pending.lang(), LanguageTag::En);
        }
        other => panic!("应该是部分提交错误，实际: {:?}", other),
    }
    assert!(store.file("content/ideas/ownership.zh.md").is_some());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_complete_writes_only_missing_document() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore {
        failing_suffix: Mutex::new(Some(".en.md")),
        ..MemoryStore::default()
    });
    let flow = flow(test_config(), &chat, &store);
    let cancel = CancellationToken::new();

    let err = flow
        .post(&submission(Some("所有权"), None), &cancel)
        .await
        .unwrap_err();
    let pending = err.pending_document().unwrap().clone();
    let zh_before = store.file("content/ideas/ownership.zh.md").unwrap();
    let calls_before = chat.total_calls();

    // 仓库恢复后只补写缺失的英文文档
    *store.failing_suffix.lock().unwrap() = None;
    flow.complete(&pending, &cancel).await.unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(
        store.file("content/ideas/ownership.en.md").unwrap(),
        pending.render()
    );
    assert_eq!(store.file("content/ideas/ownership.zh.md").unwrap(), zh_before);
    assert!(store.file("content/ideas/ownership-2.zh.md").is_none());
    assert_eq!(chat.total_calls(), calls_before);

    // 再补写一次不会覆盖
    let err = flow.complete(&pending, &cancel).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Upstream {
            stage: PipelineStage::Committed,
            source: UpstreamError::Write(WriteError::AlreadyExists { .. }),
        }
    ));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_cancel_during_second_write_is_partial() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore {
        slow_suffix: Some((".en.md", Duration::from_secs(5))),
        ..MemoryStore::default()
    });
    let flow = flow(test_config(), &chat, &store);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let err = flow
        .post(&submission(Some("所有权"), None), &cancel)
        .await
        .unwrap_err();

    match err {
        AppError::PartialCommit {
            committed,
            missing,
            source,
            ..
        } => {
            assert_eq!(committed, LanguageTag::Zh);
            assert_eq!(missing, LanguageTag::En);
            assert!(matches!(
                *source,
                AppError::Cancelled {
                    stage: PipelineStage::Committed
                }
            ));
        }
        other => panic!("应该是部分提交错误，实际: {:?}", other),
    }
    assert!(store.file("content/ideas/ownership.zh.md").is_some());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_second_write_timeout_is_partial() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore {
        slow_suffix: Some((".en.md", Duration::from_secs(5))),
        ..MemoryStore::default()
    });
    let config = Config {
        write_timeout_secs: 1,
        ..test_config()
    };
    let flow = flow(config, &chat, &store);

    let err = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        AppError::PartialCommit { source, .. } => assert!(matches!(
            *source,
            AppError::Upstream {
                stage: PipelineStage::Committed,
                source: UpstreamError::Timeout { .. },
            }
        )),
        other => panic!("应该是部分提交错误，实际: {:?}", other),
    }
    assert!(store.file("content/ideas/ownership.zh.md").is_some());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_empty_content_makes_no_calls() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let request = SubmitRequest {
        title: Some("标题".to_string()),
        content: "  \n\t ".to_string(),
        augmented: None,
    };
    let response = flow.handle_post(request, &CancellationToken::new()).await;

    assert!(!response.ok);
    assert_eq!(response.message.as_deref(), Some("输入无效: 内容不能为空"));
    assert_eq!(chat.total_calls(), 0);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_improve_empty_content_is_reported() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let response = flow
        .handle_improve(SubmitRequest::default(), &CancellationToken::new())
        .await;

    assert!(!response.ok);
    assert_eq!(response.message.as_deref(), Some("输入无效: 内容不能为空"));
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"ok":false,"message":"输入无效: 内容不能为空"}"#
    );
    assert_eq!(chat.total_calls(), 0);
}

#[tokio::test]
async fn test_malformed_response_retries_once_then_fails() {
    let chat = Arc::new(FakeChat::new(&["Sure! Here is your JSON: {\"lang\":"], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let err = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        AppError::MalformedResponse { stage, raw, .. } => {
            assert_eq!(stage, PipelineStage::Polished);
            assert!(raw.starts_with("Sure!"));
        }
        other => panic!("应该是解析错误，实际: {:?}", other),
    }
    assert_eq!(chat.calls_of("polish").len(), 2);
    assert!(chat.calls_of("slug").is_empty());
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_malformed_then_valid_recovers() {
    let chat = Arc::new(FakeChat::new(
        &["{\"lang\":\"zh\",\"polished_title\":\"所有权\"", POLISHED_ZH],
        "ownership",
    ));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let outcome = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap();

    let polish = chat.calls_of("polish");
    assert_eq!(polish.len(), 2);
    assert!(!polish[0].contains(prompts::MALFORMED_RETRY_HINT));
    assert!(polish[1].ends_with(prompts::MALFORMED_RETRY_HINT));
    assert_eq!(outcome.slug.as_str(), "ownership");
}

#[tokio::test]
async fn test_no_retry_when_budget_is_zero() {
    let chat = Arc::new(FakeChat::new(&["not json"], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let config = Config {
        max_malformed_retries: 0,
        ..test_config()
    };
    let flow = flow(config, &chat, &store);

    let err = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MalformedResponse { .. }));
    assert_eq!(chat.calls_of("polish").len(), 1);
}

#[tokio::test]
async fn test_supplied_augmentation_skips_augment_call() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let outcome = flow
        .post(
            &submission(Some("所有权"), Some("### 背景\n\n调用方写好的内容")),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(chat.calls_of("augment").is_empty());
    let translate = chat.calls_of("translate");
    assert_eq!(translate.len(), 1);
    assert!(translate[0].contains("调用方写好的内容"));
    assert!(store
        .file(&outcome.native_path)
        .unwrap()
        .contains("## 延伸阅读\n\n### 背景\n\n调用方写好的内容\n"));
}

#[tokio::test]
async fn test_slug_falls_back_to_english_title() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "所有权"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let outcome = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.slug.as_str(), "why-ownership-matters");
}

#[tokio::test]
async fn test_documents_match_their_language_when_model_disagrees() {
    // 夹杂大量英文标识符的中文会被识别成英文，而模型按中文润色
    let content = "我用Rust tokio axum hyper serde写了HTTP server";
    assert_eq!(classify(content), LanguageTag::En);

    let reply = r#"{"lang":"zh","polished_title":"用 Rust 写服务","polished_content":"我用 Rust 的 tokio、axum、hyper 和 serde 写了一个 HTTP 服务。","translated_title":"Writing an HTTP Server in Rust","translated_content":"I wrote an HTTP server in Rust with tokio, axum, hyper and serde."}"#;
    let chat = Arc::new(FakeChat::new(&[reply], "rust-server"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let idea = IdeaSubmission::new(None, content, None)
        .unwrap()
        .with_received_at(received_at());
    let outcome = flow.post(&idea, &CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.lang, LanguageTag::En);
    assert_eq!(outcome.native_path, "content/ideas/rust-server.en.md");

    let en = store.file("content/ideas/rust-server.en.md").unwrap();
    assert!(en.contains("title: \"Writing an HTTP Server in Rust\"\n"));
    assert!(en.contains("lang: en\n"));
    assert!(en.contains("I wrote an HTTP server in Rust"));
    assert!(en.contains("## Augmented\n\n### Context"));
    assert_eq!(classify(&en), LanguageTag::En);
    assert!(!en.chars().any(|c| ('\u{4E00}'..='\u{9FFF}').contains(&c)));

    let zh = store.file("content/ideas/rust-server.zh.md").unwrap();
    assert!(zh.contains("title: \"用 Rust 写服务\"\n"));
    assert!(zh.contains("lang: zh\n"));
    assert!(zh.contains(
        "我用 Rust 的 tokio、axum、hyper 和 serde 写了一个 HTTP 服务。"
    ));
    assert!(zh.contains("## 延伸阅读\n\n### 背景"));
    assert!(!zh.contains("I wrote an HTTP server"));

    // 扩展内容基于英文原文生成
    assert!(chat.calls_of("augment")[0].contains("Title: Writing an HTTP Server in Rust"));
}

#[tokio::test]
async fn test_improve_returns_polished_content_without_commit() {
    // 模型声称是英文，但识别结果是中文，以识别结果为准
    let reply = POLISHED_ZH.replacen("\"lang\":\"zh\"", "\"lang\":\"en\"", 1);
    let chat = Arc::new(FakeChat::new(&[reply.as_str()], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);
    let cancel = CancellationToken::new();

    let result = flow.improve(&submission(None, None), &cancel).await.unwrap();
    assert_eq!(result.lang, LanguageTag::Zh);
    assert_eq!(
        result.polished_content,
        "所有权在编译期保证内存安全。\n\n借用检查器负责执行规则。"
    );

    let response = flow
        .handle_improve(
            SubmitRequest {
                content: CONTENT.to_string(),
                ..SubmitRequest::default()
            },
            &cancel,
        )
        .await;
    assert!(response.ok);
    assert_eq!(
        response.content.as_deref(),
        Some("所有权在编译期保证内存安全。\n\n借用检查器负责执行规则。")
    );

    assert!(chat.calls_of("title").is_empty());
    assert!(chat.calls_of("slug").is_empty());
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_cancelled_request_stops_before_any_write() {
    let chat = Arc::new(FakeChat::new(&[POLISHED_ZH], "ownership"));
    let store = Arc::new(MemoryStore::default());
    let flow = flow(test_config(), &chat, &store);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = flow
        .post(&submission(Some("所有权"), None), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Cancelled {
            stage: PipelineStage::Polished
        }
    ));
    assert_eq!(chat.total_calls(), 0);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let chat = Arc::new(FakeChat {
        delay: Some(Duration::from_secs(5)),
        ..FakeChat::new(&[POLISHED_ZH], "ownership")
    });
    let store = Arc::new(MemoryStore::default());
    let config = Config {
        polish_timeout_secs: 1,
        ..test_config()
    };
    let flow = flow(config, &chat, &store);

    let err = flow
        .post(&submission(Some("所有权"), None), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        AppError::Upstream {
            stage: PipelineStage::Polished,
            source: UpstreamError::Timeout { after },
        } => assert_eq!(after, Duration::from_secs(1)),
        other => panic!("应该是超时错误，实际: {:?}", other),
    }
}
