use std::path::PathBuf;
use thiserror::Error;

/// 统一错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("读取 {path} 失败: {source}")]
    ProcRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析错误: {0}")]
    Parse(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("启动终端失败: {0}")]
    Launcher(String),

    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// 包装 /proc 读取错误，保留文件路径
    pub fn proc_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ProcRead {
            path: path.into(),
            source,
        }
    }
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, Error>;
