use async_trait::async_trait;
use log::{debug, info, warn};

use crate::describe::describe_config;
use crate::error::{BusterError, Result};
use crate::format::format_outcome;
use crate::options::{DnsOptions, GlobalOptions};
use crate::plugin::Plugin;
use crate::prober::{ExtraInfo, ProbeOutcome, SubdomainProber};
use crate::resolver::{DnsLookup, SystemResolver};
use crate::wildcard::{WildcardDetector, WildcardState};

/// DNS子域名探测插件
pub struct DnsPlugin<R: DnsLookup = SystemResolver> {
    global: GlobalOptions,
    options: DnsOptions,
    resolver: R,
    wildcard: WildcardState,
    preflighted: bool,
}

impl DnsPlugin<SystemResolver> {
    /// 使用系统解析器创建插件
    pub fn new(global: GlobalOptions, options: DnsOptions) -> Result<Self> {
        let resolver = SystemResolver::from_options(&options)?;
        Self::with_resolver(global, options, resolver)
    }
}

impl<R: DnsLookup> DnsPlugin<R> {
    pub fn with_resolver(global: GlobalOptions, mut options: DnsOptions, resolver: R) -> Result<Self> {
        global.validate()?;
        options.validate()?;

        Ok(DnsPlugin {
            global,
            options,
            resolver,
            wildcard: WildcardState::default(),
            preflighted: false,
        })
    }

    pub fn wildcard_state(&self) -> &WildcardState {
        &self.wildcard
    }

    pub fn options(&self) -> &DnsOptions {
        &self.options
    }

    /// 泛解析且未强制继续时的中止错误
    fn wildcard_abort(&self) -> Option<BusterError> {
        if self.wildcard.is_wildcard && !self.options.wildcard_forced {
            Some(BusterError::WildcardDetected {
                domain: self.options.domain.clone(),
                ips: self.wildcard.addresses.stringify(),
            })
        } else {
            None
        }
    }

    fn prober(&self) -> SubdomainProber<'_, R> {
        SubdomainProber {
            resolver: &self.resolver,
            domain: &self.options.domain,
            wildcard: &self.wildcard,
            extra: ExtraInfo::from_flags(self.options.show_ips, self.options.show_cname),
            verbose: self.global.verbose,
        }
    }
}

#[async_trait]
impl<R: DnsLookup> Plugin for DnsPlugin<R> {
    fn name(&self) -> &'static str {
        "dns"
    }

    async fn preflight(&mut self) -> Result<()> {
        // 泛解析状态只写入一次，重复调用返回第一次的结论
        if self.preflighted {
            debug!("预检已执行，沿用已有的泛解析状态");
            return match self.wildcard_abort() {
                Some(e) => Err(e),
                None => Ok(()),
            };
        }
        self.preflighted = true;

        let detector = WildcardDetector::new(&self.resolver, &self.options.domain);

        // 泛解析检测
        let state = detector.detect().await;
        if state.is_wildcard {
            let ips = state.addresses.stringify();
            warn!("[-] Wildcard DNS found. IP address(es): {}", ips);
            if !self.options.wildcard_forced {
                self.wildcard = state;
                return Err(BusterError::WildcardDetected {
                    domain: self.options.domain.clone(),
                    ips,
                });
            }
            info!("已指定 --wildcard，继续处理并过滤泛解析结果");
        }

        // 根域名不能解析只是提示，可能是拼写错误
        if !self.global.quiet && !detector.validate_base_domain().await {
            warn!("[-] Unable to validate base domain: {}", self.options.domain);
        }

        self.wildcard = state;
        Ok(())
    }

    async fn probe(&self, word: &str) -> Result<Vec<ProbeOutcome>> {
        let outcome = self.prober().probe(word).await;
        if outcome.is_reportable() {
            Ok(vec![outcome])
        } else {
            Ok(Vec::new())
        }
    }

    fn result_to_string(&self, outcome: &ProbeOutcome) -> Result<String> {
        Ok(format_outcome(outcome))
    }

    fn config_string(&self) -> Result<String> {
        Ok(describe_config(&self.global, &self.options))
    }
}
