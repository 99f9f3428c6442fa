/// 命令行参数解析

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::metrics::procfs::DEFAULT_PROC_ROOT;

#[derive(Debug, Parser)]
#[command(name = "btop-monitor")]
#[command(author, version, about = "基于 /proc 的面板式系统监控", long_about = None)]
pub struct Cli {
    /// 配置文件路径（TOML/YAML/JSON）
    #[arg(short, long, env = "BTOP_MONITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// procfs 挂载点
    #[arg(long, default_value = DEFAULT_PROC_ROOT)]
    pub proc_root: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// 按刷新间隔持续输出面板内容
    Run {
        /// 每次刷新输出 JSON 格式的面板单元
        #[arg(long)]
        json: bool,

        /// 刷新指定次数后退出
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// 输出一次详细统计
    Snapshot {
        /// 以 JSON 格式输出
        #[arg(long)]
        json: bool,

        /// 预热采样与正式采样之间的间隔（毫秒），默认使用 refresh_rate
        #[arg(long)]
        warmup_ms: Option<u64>,
    },

    /// 在终端中启动 btop
    Launch {
        /// 只打印命令行，不启动进程
        #[arg(long)]
        dry_run: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Run {
            json: false,
            ticks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::try_parse_from(["btop-monitor"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.proc_root, PathBuf::from("/proc"));
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Commands::Run { json: false, ticks: None }
        ));
    }

    #[test]
    fn test_parse_snapshot() {
        let cli = Cli::try_parse_from([
            "btop-monitor",
            "--proc-root",
            "/tmp/proc",
            "snapshot",
            "--json",
            "--warmup-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cli.proc_root, PathBuf::from("/tmp/proc"));
        assert!(matches!(
            cli.command,
            Some(Commands::Snapshot { json: true, warmup_ms: Some(250) })
        ));
    }

    #[test]
    fn test_parse_launch_dry_run() {
        let cli = Cli::try_parse_from(["btop-monitor", "launch", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Launch { dry_run: true })));
    }
}
