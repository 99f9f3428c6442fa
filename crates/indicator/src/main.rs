/// btop-monitor
///
/// 面板式系统监控，从 /proc 采样 CPU、内存、交换区、网络和负载

use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod cli;
mod config;
mod indicator;
mod launcher;
mod metrics;
mod panel;

use cli::{Cli, Commands};
use config::Settings;
use indicator::{collect_detailed, Indicator, OutputFormat};
use launcher::Launcher;
use metrics::MetricSampler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    // RUST_LOG 优先，其次使用配置中的 log_level
    // 面板内容写到 stdout，日志写到 stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .init();

    info!("🚀 启动 btop-monitor...");
    info!(
        "✅ 配置加载成功，监控项: {:?}，面板位置: {} #{}",
        settings.active_monitors(),
        settings.panel_position.as_str(),
        settings.panel_index
    );

    match cli.command.clone().unwrap_or_default() {
        Commands::Run { json, ticks } => {
            let shutdown = CancellationToken::new();
            tokio::spawn(wait_for_shutdown(shutdown.clone()));

            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            let mut indicator = Indicator::new(
                MetricSampler::with_root(&cli.proc_root),
                settings,
                cli.config.clone(),
                format,
                std::io::stdout(),
            );
            indicator.run(shutdown, ticks).await?;
        }
        Commands::Snapshot { json, warmup_ms } => {
            let warmup = warmup_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.refresh_interval());
            let mut sampler = MetricSampler::with_root(&cli.proc_root);
            let stats = collect_detailed(&mut sampler, warmup).await;
            sampler.destroy();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", panel::render_detailed(&stats));
            }
        }
        Commands::Launch { dry_run } => {
            let launcher = Launcher::from_settings(&settings);
            if dry_run {
                let path_var = std::env::var_os("PATH").unwrap_or_default();
                println!("{}", launcher.command_line(&path_var)?);
            } else {
                let pid = launcher.launch()?;
                info!("✅ 终端已启动 (pid: {})", pid);
            }
        }
    }

    info!("👋 btop-monitor 已退出");
    Ok(())
}

/// 等待 Ctrl-C 或 SIGTERM 后触发停止
async fn wait_for_shutdown(shutdown: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("无法监听 SIGTERM: {}", e);
            match tokio::signal::ctrl_c().await {
                Ok(()) => shutdown.cancel(),
                Err(e) => warn!("无法监听 Ctrl-C: {}", e),
            }
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("收到 Ctrl-C"),
        _ = terminate.recv() => info!("收到 SIGTERM"),
    }
    shutdown.cancel();
}
