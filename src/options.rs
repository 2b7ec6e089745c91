use std::time::Duration;

use crate::error::{BusterError, Result};

/// 默认并发数
pub const DEFAULT_THREADS: usize = 10;
/// 单次查询默认超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
/// 字典来源为标准输入时的标记
pub const STDIN_WORDLIST: &str = "-";

/// 引擎级别的全局配置
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// 并发工作数
    pub threads: usize,
    /// 字典路径，`-` 表示从标准输入读取
    pub wordlist: String,
    /// 结果输出文件
    pub output: Option<String>,
    /// 输出未解析的候选域名
    pub verbose: bool,
    /// 静默模式：不打印横幅，不做根域名校验
    pub quiet: bool,
    /// 不输出进度
    pub no_progress: bool,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        GlobalOptions {
            threads: DEFAULT_THREADS,
            wordlist: STDIN_WORDLIST.to_string(),
            output: None,
            verbose: false,
            quiet: false,
            no_progress: false,
        }
    }
}

impl GlobalOptions {
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(BusterError::Config("threads must be at least 1".to_string()));
        }
        if self.wordlist.trim().is_empty() {
            return Err(BusterError::Config("wordlist must be set".to_string()));
        }
        Ok(())
    }

    pub fn reads_stdin(&self) -> bool {
        self.wordlist == STDIN_WORDLIST
    }
}

/// DNS插件配置
#[derive(Debug, Clone)]
pub struct DnsOptions {
    /// 目标根域名
    pub domain: String,
    /// 输出解析到的IP
    pub show_ips: bool,
    /// 输出CNAME（show_ips 优先）
    pub show_cname: bool,
    /// 检测到泛解析时仍继续
    pub wildcard_forced: bool,
    /// 指定DNS服务器（`ip` 或 `ip:port`）
    pub resolver: Option<String>,
    /// 单次查询超时
    pub timeout: Duration,
}

impl Default for DnsOptions {
    fn default() -> Self {
        DnsOptions {
            domain: String::new(),
            show_ips: false,
            show_cname: false,
            wildcard_forced: false,
            resolver: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DnsOptions {
    /// 校验并规范化根域名
    pub fn validate(&mut self) -> Result<()> {
        self.domain = normalize_domain(&self.domain)?;
        if self.timeout.is_zero() {
            return Err(BusterError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// 去除首尾空白与末尾的点并转小写，拒绝非法域名
pub fn normalize_domain(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let domain = trimmed.strip_suffix('.').unwrap_or(trimmed).to_ascii_lowercase();

    if domain.is_empty() {
        return Err(BusterError::Config("please provide a domain".to_string()));
    }
    if domain.len() > 253 {
        return Err(BusterError::Config(format!("domain too long: {}", domain)));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(BusterError::Config(format!("empty label in domain: {}", raw)));
        }
        if label.len() > 63 {
            return Err(BusterError::Config(format!("label too long in domain: {}", label)));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(BusterError::Config(format!("label may not start or end with '-': {}", label)));
        }
        if let Some(c) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(BusterError::Config(format!("invalid character {:?} in domain: {}", c, raw)));
        }
    }

    Ok(domain)
}
