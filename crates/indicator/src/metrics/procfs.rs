/// /proc 文件读取与解析
///
/// 解析函数只处理文本内容，不做任何 I/O，便于单独测试

use common::models::constants::LOOPBACK_INTERFACE;
use common::{Error, Result};
use std::path::PathBuf;

use super::types::{CpuSample, InterfaceTraffic, LoadAverage};

/// 默认 procfs 挂载点
pub const DEFAULT_PROC_ROOT: &str = "/proc";

pub const STAT: &str = "stat";
pub const MEMINFO: &str = "meminfo";
pub const NET_DEV: &str = "net/dev";
pub const LOADAVG: &str = "loadavg";
pub const CPUINFO: &str = "cpuinfo";
pub const UPTIME: &str = "uptime";

/// procfs 读取器
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 读取 root 下的相对路径
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|e| Error::proc_read(path, e))
    }
}

/// 解析 /proc/stat 的汇总 CPU 行
///
/// 字段顺序：user nice system idle iowait irq softirq steal。
/// 老内核缺少尾部字段时按 0 处理，至少需要 idle。
pub fn parse_cpu_sample(content: &str) -> Result<CpuSample> {
    let line = content
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or_else(|| Error::Parse("缺少汇总 cpu 行".to_string()))?;

    let mut fields = [0u64; 8];
    let mut parsed = 0;
    for (slot, token) in fields.iter_mut().zip(line.split_whitespace().skip(1)) {
        *slot = token
            .parse()
            .map_err(|_| Error::Parse(format!("无效的 cpu 字段: {}", token)))?;
        parsed += 1;
    }
    if parsed < 4 {
        return Err(Error::Parse(format!("cpu 行字段不足: {}", line)));
    }

    let [user, nice, system, idle, iowait, irq, softirq, steal] = fields;
    let idle_ticks = checked_sum(&[idle, iowait])?;
    let active = checked_sum(&[user, nice, system, irq, softirq, steal])?;

    Ok(CpuSample {
        idle_ticks,
        total_ticks: checked_sum(&[idle_ticks, active])?,
    })
}

/// 累加计数器，溢出时返回解析错误
pub fn checked_sum(values: &[u64]) -> Result<u64> {
    values
        .iter()
        .try_fold(0u64, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| Error::Parse("计数器累加溢出".to_string()))
}

/// meminfo 的 kB 值换算为字节，溢出时为 None
pub fn kib_to_bytes(kib: u64) -> Option<u64> {
    kib.checked_mul(1024)
}

/// 取 /proc/meminfo 中以 `key` 开头的行的第一个整数（kB），缺失时为 0
pub fn meminfo_value(content: &str, key: &str) -> u64 {
    content
        .lines()
        .find(|line| line.starts_with(key))
        .and_then(first_integer)
        .unwrap_or(0)
}

fn first_integer(line: &str) -> Option<u64> {
    let start = line.find(|c: char| c.is_ascii_digit())?;
    let digits: String = line[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// 解析 /proc/net/dev，返回非回环网卡的累计收发字节
///
/// 跳过两行表头；接口名之后第 1 列为 rx_bytes，第 9 列为 tx_bytes。
/// 格式不符的行直接忽略。
pub fn parse_net_dev(content: &str) -> Vec<InterfaceTraffic> {
    content
        .lines()
        .skip(2)
        .filter_map(|line| {
            let (name, counters) = line.trim().split_once(':')?;
            let name = name.trim();
            if name.is_empty() || name == LOOPBACK_INTERFACE {
                return None;
            }
            let fields: Vec<u64> = counters
                .split_whitespace()
                .take(9)
                .map(|f| f.parse::<u64>())
                .collect::<std::result::Result<_, _>>()
                .ok()?;
            if fields.len() < 9 {
                return None;
            }
            Some(InterfaceTraffic {
                name: name.to_string(),
                rx_bytes: fields[0],
                tx_bytes: fields[8],
            })
        })
        .collect()
}

/// 统计 /proc/cpuinfo 中的逻辑 CPU 数
pub fn count_processors(content: &str) -> usize {
    content
        .lines()
        .filter(|line| {
            line.strip_prefix("processor")
                .map(|rest| rest.trim_start().starts_with(':'))
                .unwrap_or(false)
        })
        .count()
}

/// 解析 /proc/loadavg 的前三列
pub fn parse_loadavg(content: &str) -> Result<LoadAverage> {
    let mut parts = content.split_whitespace().map(|p| {
        p.parse::<f64>()
            .map_err(|_| Error::Parse(format!("无效的负载值: {}", p)))
    });
    let mut next = || {
        parts
            .next()
            .unwrap_or_else(|| Err(Error::Parse("loadavg 字段不足".to_string())))
    };

    Ok(LoadAverage {
        load1: next()?,
        load5: next()?,
        load15: next()?,
    })
}

/// 解析 /proc/uptime 的开机秒数
pub fn parse_uptime_seconds(content: &str) -> Result<f64> {
    let token = content
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::Parse("uptime 内容为空".to_string()))?;
    token
        .parse()
        .map_err(|_| Error::Parse(format!("无效的 uptime: {}", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NET_DEV_SAMPLE: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 9999999    100    0    0    0     0          0         0  9999999     100    0    0    0     0       0          0
  eth0: 1000      10    0    0    0     0          0         0     2000      20    0    0    0     0       0          0
 wlan0:    0       0    0    0    0     0          0         0        0       0    0    0    0     0       0          0
docker0:500  5 0 0 0 0 0 0 700 7 0 0 0 0 0 0
";

    #[test]
    fn test_parse_cpu_sample() {
        let content = "cpu  100 20 30 400 50 6 7 8 0 0\ncpu0 1 2 3 4 5 6 7 8 0 0\n";
        let sample = parse_cpu_sample(content).unwrap();
        assert_eq!(sample.idle_ticks, 450);
        assert_eq!(sample.total_ticks, 621);
    }

    #[test]
    fn test_parse_cpu_sample_short_line() {
        let sample = parse_cpu_sample("cpu 10 0 10 80\n").unwrap();
        assert_eq!(sample.idle_ticks, 80);
        assert_eq!(sample.total_ticks, 100);
    }

    #[test]
    fn test_parse_cpu_sample_missing_line() {
        assert!(parse_cpu_sample("cpu0 1 2 3 4\nintr 5\n").is_err());
        assert!(parse_cpu_sample("cpu 1 2\n").is_err());
        assert!(parse_cpu_sample("cpu 1 x 3 4\n").is_err());
    }

    #[test]
    fn test_parse_cpu_sample_overflow_is_error() {
        let content = "cpu  18446744073709551615 1 0 0 0 0 0 0\n";
        assert!(matches!(parse_cpu_sample(content), Err(Error::Parse(_))));
        let content = "cpu  0 0 0 18446744073709551615 1 0 0 0\n";
        assert!(matches!(parse_cpu_sample(content), Err(Error::Parse(_))));
    }

    #[test]
    fn test_checked_sum_and_kib_to_bytes() {
        assert_eq!(checked_sum(&[1, 2, 3]).unwrap(), 6);
        assert!(checked_sum(&[u64::MAX, 1]).is_err());
        assert_eq!(kib_to_bytes(2), Some(2048));
        assert_eq!(kib_to_bytes(18014398509481984), None);
    }

    #[test]
    fn test_meminfo_value() {
        let content = "MemTotal:       1000000 kB\nMemFree:  200 kB\nCached:  300 kB\nSwapCached: 7 kB\n";
        assert_eq!(meminfo_value(content, "MemTotal:"), 1_000_000);
        assert_eq!(meminfo_value(content, "Cached:"), 300);
        assert_eq!(meminfo_value(content, "MemAvailable:"), 0);
    }

    #[test]
    fn test_parse_net_dev_excludes_loopback() {
        let interfaces = parse_net_dev(NET_DEV_SAMPLE);
        let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "wlan0", "docker0"]);
        assert_eq!(interfaces[0].rx_bytes, 1000);
        assert_eq!(interfaces[0].tx_bytes, 2000);
        assert_eq!(interfaces[2].rx_bytes, 500);
        assert_eq!(interfaces[2].tx_bytes, 700);
    }

    #[test]
    fn test_parse_net_dev_skips_malformed_lines() {
        let content = "h1\nh2\n  eth0: 1 2 3\n  eth1: 5 0 0 0 0 0 0 0 6 0 0 0 0 0 0 0\n\n";
        let interfaces = parse_net_dev(content);
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "eth1");
    }

    #[test]
    fn test_count_processors() {
        let content = "processor\t: 0\nmodel name\t: x\n\nprocessor\t: 1\nprocessors: no\n";
        assert_eq!(count_processors(content), 2);
    }

    #[test]
    fn test_parse_loadavg() {
        let load = parse_loadavg("0.52 0.58 0.59 1/467 12345\n").unwrap();
        assert_eq!(load.load1, 0.52);
        assert_eq!(load.load5, 0.58);
        assert_eq!(load.load15, 0.59);
        assert!(parse_loadavg("0.5 0.6").is_err());
    }

    #[test]
    fn test_parse_uptime_seconds() {
        assert_eq!(parse_uptime_seconds("350735.47 234388.90\n").unwrap(), 350735.47);
        assert!(parse_uptime_seconds("").is_err());
    }
}
