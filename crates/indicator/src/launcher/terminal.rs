/// 终端启动器
///
/// 检测可用终端，并在其中启动 btop

use common::models::constants::TERMINAL_AUTO;
use common::{Error, Result};
use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::config::Settings;

/// 终端检测顺序（先找到的优先）
pub const TERMINAL_COMMANDS: &[(&str, &str)] = &[
    ("ptyxis", "ptyxis -e %c"),
    ("ghostty", "ghostty -e %c"),
    ("kgx", "kgx -e %c"),
    ("gnome-terminal", "gnome-terminal -- %c"),
    ("kitty", "kitty %c"),
    ("alacritty", "alacritty -e %c"),
    ("konsole", "konsole -e %c"),
    ("terminator", "terminator -e %c"),
    ("xterm", "xterm -e %c"),
];

/// 命令模板中的占位符
const COMMAND_PLACEHOLDER: &str = "%c";

/// 在 PATH 中查找可执行文件
pub fn find_in_path(binary: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// 按检测顺序返回第一个可用终端的命令模板
pub fn detect_terminal(path_var: &OsStr) -> Option<&'static str> {
    TERMINAL_COMMANDS
        .iter()
        .find(|(binary, _)| find_in_path(binary, path_var).is_some())
        .map(|(binary, template)| {
            debug!("检测到终端: {}", binary);
            *template
        })
}

/// 终端启动器
#[derive(Debug, Clone)]
pub struct Launcher {
    terminal_command: String,
    btop_command: String,
}

impl Launcher {
    pub fn new(terminal_command: impl Into<String>, btop_command: impl Into<String>) -> Self {
        Self {
            terminal_command: terminal_command.into(),
            btop_command: btop_command.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.terminal_command, &settings.btop_command)
    }

    /// 生成完整命令行，`path_var` 用于自动检测终端
    pub fn command_line(&self, path_var: &OsStr) -> Result<String> {
        let template = if self.terminal_command.trim() == TERMINAL_AUTO {
            detect_terminal(path_var).ok_or_else(|| {
                Error::Launcher("未找到终端模拟器，请安装一个或在配置中手动指定".to_string())
            })?
        } else {
            self.terminal_command.as_str()
        };

        Ok(template.replace(COMMAND_PLACEHOLDER, &self.btop_command))
    }

    /// 启动终端，不等待其退出，返回子进程 PID
    pub fn launch(&self) -> Result<u32> {
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        let command_line = self.command_line(&path_var)?;
        let (program, args) = split_command_line(&command_line)?;

        info!("🖥️ 启动终端: {}", command_line);
        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Launcher(format!("{}: {}", program, e)))?;

        Ok(child.id())
    }
}

/// 按空白拆分命令行
pub fn split_command_line(command_line: &str) -> Result<(String, Vec<String>)> {
    let mut parts = command_line.split_whitespace().map(str::to_string);
    let program = parts
        .next()
        .ok_or_else(|| Error::Launcher("终端命令为空".to_string()))?;
    Ok((program, parts.collect()))
}
