use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use idea_polish::utils::logging;
use idea_polish::{Config, IdeaFlow, SubmitRequest};

/// 润色一条想法，生成中英双语文档并提交到仓库
#[derive(Debug, Parser)]
#[command(name = "idea-polish", version)]
struct Cli {
    /// 标题（留空时自动生成）
    #[arg(short, long)]
    title: Option<String>,

    /// 想法内容（留空时从标准输入读取）
    #[arg(short, long)]
    content: Option<String>,

    /// 预先写好的扩展内容文件
    #[arg(long)]
    augmented_file: Option<PathBuf>,

    /// 只润色，不提交
    #[arg(long)]
    improve: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    config.validate()?;
    logging::log_startup(&config);

    let content = match cli.content {
        Some(content) => content,
        None => read_stdin()?,
    };
    let augmented = match &cli.augmented_file {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("无法读取扩展内容文件: {}", path.display()))?,
        ),
        None => None,
    };

    let request = SubmitRequest {
        title: cli.title,
        content,
        augmented,
    };

    // Ctrl-C 取消正在进行的请求
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let flow = IdeaFlow::new(config);
    let response = if cli.improve {
        flow.handle_improve(request, &cancel).await
    } else {
        flow.handle_post(request, &cancel).await
    };

    println!("{}", serde_json::to_string(&response)?);

    if !response.ok {
        std::process::exit(1);
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("idea (Ctrl-D to send)");
    }
    let mut content = String::new();
    stdin
        .read_to_string(&mut content)
        .context("无法读取标准输入")?;
    Ok(content)
}
