use log::debug;

use crate::resolver::DnsLookup;
use crate::wildcard::WildcardState;

/// 单个候选词的探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 解析成功且不属于泛解析
    Found { entity: String, extra: Option<String> },
    /// 未能解析（仅在 verbose 时产生）
    Missing { entity: String },
    /// 命中泛解析地址，丢弃
    Suppressed,
    /// 未解析且不需要报告
    NoOpinion,
}

impl ProbeOutcome {
    /// 只有 Found / Missing 会交给引擎
    pub fn is_reportable(&self) -> bool {
        matches!(self, ProbeOutcome::Found { .. } | ProbeOutcome::Missing { .. })
    }
}

/// 附加信息的显示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraInfo {
    None,
    Ips,
    Cname,
}

impl ExtraInfo {
    /// IP 显示优先于 CNAME
    pub fn from_flags(show_ips: bool, show_cname: bool) -> Self {
        if show_ips {
            ExtraInfo::Ips
        } else if show_cname {
            ExtraInfo::Cname
        } else {
            ExtraInfo::None
        }
    }
}

/// 子域名探测器
///
/// 不持有可变状态，可被任意数量的工作任务同时调用。
pub struct SubdomainProber<'a, R: DnsLookup + ?Sized> {
    pub resolver: &'a R,
    pub domain: &'a str,
    pub wildcard: &'a WildcardState,
    pub extra: ExtraInfo,
    pub verbose: bool,
}

impl<'a, R: DnsLookup + ?Sized> SubdomainProber<'a, R> {
    pub fn fqdn(&self, word: &str) -> String {
        format!("{}.{}", word, self.domain)
    }

    pub async fn probe(&self, word: &str) -> ProbeOutcome {
        let subdomain = self.fqdn(word);

        let ips = match self.resolver.lookup_host(&subdomain).await {
            Ok(ips) => ips,
            Err(e) => {
                debug!("{}", e);
                return if self.verbose {
                    ProbeOutcome::Missing { entity: subdomain }
                } else {
                    ProbeOutcome::NoOpinion
                };
            }
        };

        if self.wildcard.suppresses(&ips) {
            debug!("丢弃泛解析结果: {} [{}]", subdomain, ips.join(", "));
            return ProbeOutcome::Suppressed;
        }

        let extra = match self.extra {
            ExtraInfo::Ips => Some(ips.join(", ")),
            // CNAME 查询失败时静默忽略
            ExtraInfo::Cname => self.resolver.lookup_cname(&subdomain).await.ok(),
            ExtraInfo::None => None,
        };

        ProbeOutcome::Found {
            entity: subdomain,
            extra,
        }
    }
}
