/// 配置管理
///
/// 加载顺序：内置默认值 → 配置文件（可选）→ BTOP_MONITOR_* 环境变量

use common::models::constants::{
    DEFAULT_BTOP_COMMAND, DEFAULT_RED_THRESHOLD, DEFAULT_REFRESH_RATE_MS,
    DEFAULT_YELLOW_THRESHOLD, TERMINAL_AUTO,
};
use common::{Error, MonitorType, PanelPosition, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use validator::{Validate, ValidationError};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "BTOP_MONITOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_thresholds"))]
pub struct Settings {
    /// 面板显示的监控项，按顺序排列
    pub monitor_types: Vec<MonitorType>,
    /// 旧版单监控项配置，monitor_types 为空时使用
    pub monitor_type: MonitorType,
    /// 刷新间隔（毫秒）
    #[validate(range(min = 500, max = 10000))]
    pub refresh_rate: u64,
    pub use_icon: bool,
    #[validate(range(max = 100))]
    pub yellow_threshold: u8,
    #[validate(range(max = 100))]
    pub red_threshold: u8,
    /// 终端命令模板，`%c` 会被替换为 btop_command；`auto` 表示自动检测
    #[validate(length(min = 1))]
    pub terminal_command: String,
    #[validate(length(min = 1))]
    pub btop_command: String,
    pub panel_position: PanelPosition,
    #[validate(range(max = 20))]
    pub panel_index: u8,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monitor_types: vec![MonitorType::Cpu],
            monitor_type: MonitorType::Cpu,
            refresh_rate: DEFAULT_REFRESH_RATE_MS,
            use_icon: false,
            yellow_threshold: DEFAULT_YELLOW_THRESHOLD,
            red_threshold: DEFAULT_RED_THRESHOLD,
            terminal_command: TERMINAL_AUTO.to_string(),
            btop_command: DEFAULT_BTOP_COMMAND.to_string(),
            panel_position: PanelPosition::Right,
            panel_index: 0,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// 从配置文件和环境变量加载配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// `env` 为 None 时读取进程环境变量
    fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("monitor_types")
                .source(env),
        );

        let settings: Settings = builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| Error::Config(e.to_string()))?;

        settings
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(settings)
    }

    /// 实际生效的监控项（去重，保持顺序）
    pub fn active_monitors(&self) -> Vec<MonitorType> {
        if self.monitor_types.is_empty() {
            return vec![self.monitor_type];
        }
        let mut monitors = Vec::with_capacity(self.monitor_types.len());
        for monitor in &self.monitor_types {
            if !monitors.contains(monitor) {
                monitors.push(*monitor);
            }
        }
        monitors
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_rate)
    }
}

fn validate_thresholds(settings: &Settings) -> std::result::Result<(), ValidationError> {
    if settings.yellow_threshold > settings.red_threshold {
        return Err(ValidationError::new("yellow_threshold_above_red_threshold"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.active_monitors(), vec![MonitorType::Cpu]);
        assert_eq!(settings.refresh_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
monitor_types = ["cpu", "network", "load"]
refresh_rate = 2000
use_icon = true
yellow_threshold = 60
red_threshold = 90
terminal_command = "kitty %c"
panel_position = "left"
panel_index = 3
"#,
        )
        .unwrap();

        let settings = Settings::load_with_env(Some(&path), env(&[])).unwrap();
        assert_eq!(
            settings.active_monitors(),
            vec![MonitorType::Cpu, MonitorType::Net, MonitorType::Load]
        );
        assert_eq!(settings.refresh_rate, 2000);
        assert!(settings.use_icon);
        assert_eq!(settings.yellow_threshold, 60);
        assert_eq!(settings.red_threshold, 90);
        assert_eq!(settings.terminal_command, "kitty %c");
        assert_eq!(settings.btop_command, "btop");
        assert_eq!(settings.panel_position, PanelPosition::Left);
        assert_eq!(settings.panel_index, 3);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "refresh_rate = 2000\n").unwrap();

        let settings = Settings::load_with_env(
            Some(&path),
            env(&[
                ("BTOP_MONITOR_REFRESH_RATE", "3000"),
                ("BTOP_MONITOR_MONITOR_TYPES", "memory,swap"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.refresh_rate, 3000);
        assert_eq!(
            settings.active_monitors(),
            vec![MonitorType::Memory, MonitorType::Swap]
        );
    }

    #[test]
    fn test_legacy_monitor_type_fallback() {
        let settings = Settings {
            monitor_types: vec![],
            monitor_type: MonitorType::Swap,
            ..Settings::default()
        };
        assert_eq!(settings.active_monitors(), vec![MonitorType::Swap]);
    }

    #[test]
    fn test_active_monitors_deduplicates() {
        let settings = Settings {
            monitor_types: vec![MonitorType::Net, MonitorType::Cpu, MonitorType::Net],
            ..Settings::default()
        };
        assert_eq!(settings.active_monitors(), vec![MonitorType::Net, MonitorType::Cpu]);
    }

    #[test]
    fn test_rejects_out_of_range_refresh_rate() {
        let err = Settings::load_with_env(None, env(&[("BTOP_MONITOR_REFRESH_RATE", "100")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let settings = Settings {
            yellow_threshold: 90,
            red_threshold: 80,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(Settings::load_with_env(Some(&path), env(&[])).is_err());
    }
}
