use rand::Rng;

use crate::address_set::AddressSet;
use crate::resolver::DnsLookup;

/// 随机标签长度
const LABEL_LEN: usize = 32;
const LABEL_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 泛解析状态
///
/// 预检阶段写入一次，之后以共享只读引用交给所有探测任务。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WildcardState {
    pub is_wildcard: bool,
    pub addresses: AddressSet,
}

impl WildcardState {
    /// 解析结果是否与泛解析地址有交集
    pub fn suppresses<S: AsRef<str>>(&self, resolved: &[S]) -> bool {
        self.is_wildcard && self.addresses.contains_any(resolved)
    }
}

/// 泛解析检测器
pub struct WildcardDetector<'a, R: DnsLookup + ?Sized> {
    resolver: &'a R,
    domain: &'a str,
}

impl<'a, R: DnsLookup + ?Sized> WildcardDetector<'a, R> {
    pub fn new(resolver: &'a R, domain: &'a str) -> Self {
        WildcardDetector { resolver, domain }
    }

    /// 解析一个几乎不可能存在的随机子域名，能解析即视为泛解析
    pub async fn detect(&self) -> WildcardState {
        let probe = format!("{}.{}", random_label(), self.domain);

        match self.resolver.lookup_host(&probe).await {
            Ok(ips) => WildcardState {
                is_wildcard: true,
                addresses: ips.into_iter().collect(),
            },
            Err(_) => WildcardState::default(),
        }
    }

    /// 检查根域名本身能否解析（部分域名没有根记录，仅作提示）
    pub async fn validate_base_domain(&self) -> bool {
        self.resolver.lookup_host(self.domain).await.is_ok()
    }
}

/// 生成测试用的随机标签
pub fn random_label() -> String {
    let mut rng = rand::thread_rng();
    (0..LABEL_LEN)
        .map(|_| LABEL_CHARS[rng.gen_range(0..LABEL_CHARS.len())] as char)
        .collect()
}
