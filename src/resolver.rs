use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use trust_dns_resolver::config::{LookupIpStrategy, NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::proto::rr::RData;
use trust_dns_resolver::TokioAsyncResolver;

use crate::error::{BusterError, Result};
use crate::options::DnsOptions;

/// DNS解析接口
///
/// 探测逻辑只依赖这两个查询，测试中可以替换为内存实现。
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// 解析所有 A/AAAA 地址
    async fn lookup_host(&self, name: &str) -> Result<Vec<String>>;

    /// 查询规范名（CNAME链的最终目标），没有别名时返回名称本身
    async fn lookup_cname(&self, name: &str) -> Result<String>;
}

/// 基于 trust-dns 的系统解析器
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn new(nameserver: Option<&str>, timeout: Duration) -> Result<Self> {
        let (config, mut opts) = match nameserver {
            Some(server) => {
                let addr = parse_nameserver(server)?;
                let group = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
                (ResolverConfig::from_parts(None, vec![], group), ResolverOpts::default())
            }
            None => match trust_dns_resolver::system_conf::read_system_conf() {
                Ok(conf) => conf,
                Err(e) => {
                    debug!("无法读取系统DNS配置，使用默认配置: {}", e);
                    (ResolverConfig::default(), ResolverOpts::default())
                }
            },
        };
        opts.timeout = timeout;
        opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;

        Ok(SystemResolver {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }

    pub fn from_options(opts: &DnsOptions) -> Result<Self> {
        Self::new(opts.resolver.as_deref(), opts.timeout)
    }
}

#[async_trait]
impl DnsLookup for SystemResolver {
    async fn lookup_host(&self, name: &str) -> Result<Vec<String>> {
        let absolute = absolute_name(name);
        let response = self
            .resolver
            .lookup_ip(absolute.as_str())
            .await
            .map_err(|e| resolution_error(name, e))?;

        let ips: Vec<String> = response.iter().map(|ip| ip.to_string()).collect();
        if ips.is_empty() {
            return Err(BusterError::Resolution {
                name: name.to_string(),
                reason: "no addresses".to_string(),
            });
        }
        Ok(ips)
    }

    async fn lookup_cname(&self, name: &str) -> Result<String> {
        let absolute = absolute_name(name);
        let response = self
            .resolver
            .lookup_ip(absolute.as_str())
            .await
            .map_err(|e| resolution_error(name, e))?;

        // 应答中的CNAME按链顺序排列，取最后一个目标
        let canonical = response
            .as_lookup()
            .record_iter()
            .filter_map(|record| match record.data() {
                Some(RData::CNAME(cname)) => Some(cname.to_string()),
                _ => None,
            })
            .last();

        Ok(canonical.unwrap_or(absolute))
    }
}

/// 解析 `ip` 或 `ip:port` 形式的DNS服务器地址
pub fn parse_nameserver(server: &str) -> Result<SocketAddr> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }
    server
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| BusterError::Config(format!("invalid resolver address: {}", server)))
}

/// 补全末尾的点，避免系统搜索域参与解析
fn absolute_name(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

fn resolution_error(name: &str, e: impl std::fmt::Display) -> BusterError {
    BusterError::Resolution {
        name: name.to_string(),
        reason: e.to_string(),
    }
}
