/// 面板标签渲染
///
/// 把一次采样转换为每个监控项的显示文本和告警等级

use common::utils::format_speed;
use common::{MonitorType, Severity};
use serde::Serialize;

use crate::config::Settings;
use crate::metrics::{MetricSnapshot, NetworkRate};

/// 单个监控项的显示内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelCell {
    pub monitor: MonitorType,
    /// 图标模式下的符号图标名
    pub icon: Option<&'static str>,
    pub text: String,
    /// 无数据时为 None，不着色
    pub severity: Option<Severity>,
    pub style_class: Option<&'static str>,
}

impl PanelCell {
    /// 首次采样前的占位内容
    pub fn placeholder(monitor: MonitorType, use_icon: bool) -> Self {
        Self {
            monitor,
            icon: icon_for(monitor, use_icon),
            text: unavailable_text(monitor, use_icon),
            severity: None,
            style_class: None,
        }
    }
}

/// 按配置渲染面板上的所有监控项
pub fn render_cells(snapshot: &MetricSnapshot, settings: &Settings) -> Vec<PanelCell> {
    settings
        .active_monitors()
        .into_iter()
        .map(|monitor| render_cell(monitor, snapshot, settings))
        .collect()
}

fn render_cell(monitor: MonitorType, snapshot: &MetricSnapshot, settings: &Settings) -> PanelCell {
    let use_icon = settings.use_icon;
    let prefix = prefix(monitor, use_icon);

    let percent = |value: Option<u8>| {
        value.map(|v| {
            (
                format!("{}{}%", prefix, v),
                Severity::from_percent(
                    f64::from(v),
                    settings.yellow_threshold,
                    settings.red_threshold,
                ),
            )
        })
    };

    let rendered = match monitor {
        MonitorType::Cpu => percent(snapshot.cpu),
        MonitorType::Memory => percent(snapshot.memory),
        MonitorType::Swap => percent(snapshot.swap),
        MonitorType::Net => snapshot.network.map(|rate| network_text(&prefix, rate)),
        MonitorType::Load => snapshot.load.map(|load| {
            let text = format!("{}{:.1}", prefix, load.load1);
            let severity = match snapshot.cpu_cores {
                Some(cores) => Severity::from_percent(
                    load.load1 / cores as f64 * 100.0,
                    settings.yellow_threshold,
                    settings.red_threshold,
                ),
                None => Severity::Normal,
            };
            (text, severity)
        }),
    };

    match rendered {
        Some((text, severity)) => PanelCell {
            monitor,
            icon: icon_for(monitor, use_icon),
            text,
            severity: Some(severity),
            style_class: Some(severity.style_class()),
        },
        None => PanelCell::placeholder(monitor, use_icon),
    }
}

fn network_text(prefix: &str, rate: NetworkRate) -> (String, Severity) {
    let text = format!(
        "{}{}↑ {}↓",
        prefix,
        format_speed(rate.tx_per_sec),
        format_speed(rate.rx_per_sec)
    );
    (text, Severity::from_network_rate(rate.rx_per_sec, rate.tx_per_sec))
}

fn prefix(monitor: MonitorType, use_icon: bool) -> String {
    if use_icon {
        String::new()
    } else {
        format!("{} ", monitor.text_label())
    }
}

fn icon_for(monitor: MonitorType, use_icon: bool) -> Option<&'static str> {
    use_icon.then(|| monitor.icon_name())
}

fn unavailable_text(monitor: MonitorType, use_icon: bool) -> String {
    let prefix = prefix(monitor, use_icon);
    match monitor {
        MonitorType::Net => format!("{}--↑ --↓", prefix),
        MonitorType::Load => format!("{}--", prefix),
        _ => format!("{}--%", prefix),
    }
}

/// 拼接成一行文本输出
pub fn render_line(cells: &[PanelCell]) -> String {
    cells
        .iter()
        .map(|cell| cell.text.as_str())
        .collect::<Vec<_>>()
        .join("  ")
}
