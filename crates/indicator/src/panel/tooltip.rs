/// 详细统计渲染
///
/// 对应面板悬停时弹出的详情：CPU、内存、交换分区、网络、系统

use common::utils::{format_byte_quantity, format_bytes};
use std::fmt::Write;

use crate::metrics::DetailedStats;

/// 最多展示的活跃网卡数
const MAX_INTERFACES: usize = 3;

const LABEL_WIDTH: usize = 18;

struct Section {
    title: &'static str,
    rows: Vec<(String, String)>,
}

impl Section {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            rows: Vec::new(),
        }
    }

    fn row(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.rows.push((label.into(), value.into()));
    }
}

/// 渲染为分段文本
pub fn render_detailed(stats: &DetailedStats) -> String {
    let mut sections = Vec::new();

    let mut cpu = Section::new("CPU");
    if let Some(usage) = stats.cpu {
        cpu.row("Usage", format!("{}%", usage));
    }
    if let Some(cores) = stats.cpu_cores {
        cpu.row("Cores", cores.to_string());
    }
    if let Some(load) = stats.load {
        cpu.row("Load Average", load.to_string());
    }
    sections.push(cpu);

    let mut memory = Section::new("Memory");
    if let Some(mem) = stats.memory {
        memory.row("Usage", format!("{}%", mem.percent));
        memory.row(
            "Used / Total",
            format!("{} / {}", format_bytes(mem.used), format_bytes(mem.total)),
        );
        memory.row("Available", format_bytes(mem.available));
        memory.row(
            "Buffers / Cached",
            format!("{} / {}", format_bytes(mem.buffers), format_bytes(mem.cached)),
        );
    }
    sections.push(memory);

    if let Some(swap) = stats.swap.filter(|s| s.is_configured()) {
        let mut section = Section::new("Swap");
        section.row("Usage", format!("{}%", swap.percent));
        section.row(
            "Used / Total",
            format!("{} / {}", format_bytes(swap.used), format_bytes(swap.total)),
        );
        sections.push(section);
    }

    let mut network = Section::new("Network");
    if let Some(rate) = stats.network_rate {
        network.row("Download", format!("{}/s", format_byte_quantity(rate.rx_per_sec)));
        network.row("Upload", format!("{}/s", format_byte_quantity(rate.tx_per_sec)));
    }
    if let Some(net) = &stats.network {
        network.row("Total Received", format_bytes(net.rx_total));
        network.row("Total Sent", format_bytes(net.tx_total));
        for iface in net.interfaces.iter().take(MAX_INTERFACES) {
            network.row(
                iface.name.clone(),
                format!("↓{} ↑{}", format_bytes(iface.rx_bytes), format_bytes(iface.tx_bytes)),
            );
        }
    }
    sections.push(network);

    if let Some(uptime) = stats.uptime {
        let mut system = Section::new("System");
        system.row("Uptime", uptime.to_string());
        sections.push(system);
    }

    let mut out = String::new();
    match &stats.hostname {
        Some(host) => {
            let _ = writeln!(out, "System Monitor ({})", host);
        }
        None => {
            let _ = writeln!(out, "System Monitor");
        }
    }
    for section in sections {
        let _ = writeln!(out, "\n{}", section.title);
        for (label, value) in section.rows {
            let _ = writeln!(out, "  {:<width$}{}", label, value, width = LABEL_WIDTH);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::{
        InterfaceTraffic, LoadAverage, MemoryDetails, NetworkDetails, SwapDetails, Uptime,
    };
    use crate::metrics::NetworkRate;

    fn stats() -> DetailedStats {
        DetailedStats {
            hostname: Some("box".to_string()),
            sampled_at: chrono::Utc::now(),
            cpu: Some(42),
            cpu_cores: Some(8),
            load: Some(LoadAverage {
                load1: 1.5,
                load5: 0.6,
                load15: 0.3,
            }),
            memory: Some(MemoryDetails {
                total: 2048 * 1024,
                used: 1024 * 1024,
                free: 512 * 1024,
                available: 1024 * 1024,
                buffers: 512,
                cached: 2048,
                percent: 50,
            }),
            swap: Some(SwapDetails {
                total: 0,
                used: 0,
                free: 0,
                percent: 0,
            }),
            network: Some(NetworkDetails {
                rx_total: 4096,
                tx_total: 100,
                interfaces: (0..5)
                    .map(|i| InterfaceTraffic {
                        name: format!("eth{}", i),
                        rx_bytes: 1,
                        tx_bytes: 2,
                    })
                    .collect(),
            }),
            network_rate: Some(NetworkRate {
                rx_per_sec: 1536.0,
                tx_per_sec: 10.0,
            }),
            uptime: Some(Uptime::from_seconds(7_260.0)),
        }
    }

    #[test]
    fn test_render_detailed_sections() {
        let text = render_detailed(&stats());
        assert!(text.starts_with("System Monitor (box)\n"));
        assert!(text.contains("  Usage             42%"));
        assert!(text.contains("Cores             8"));
        assert!(text.contains("Load Average      1.5 / 0.6 / 0.3"));
        assert!(text.contains("1.0 MB / 2.0 MB"));
        assert!(text.contains("512 B / 2.0 KB"));
        assert!(text.contains("Download          1.5 KB/s"));
        assert!(text.contains("Upload            10 B/s"));
        assert!(text.contains("Total Received    4.0 KB"));
        assert!(text.contains("Uptime            2h 1m"));
    }

    #[test]
    fn test_swap_hidden_when_not_configured() {
        let text = render_detailed(&stats());
        assert!(!text.contains("\nSwap\n"));
    }

    #[test]
    fn test_interfaces_limited() {
        let text = render_detailed(&stats());
        assert!(text.contains("eth2"));
        assert!(!text.contains("eth3"));
        assert!(text.contains("↓1 B ↑2 B"));
    }
}
