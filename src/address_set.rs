use std::collections::HashSet;

/// IP地址字符串集合
///
/// 由泛解析检测写入一次，之后只读。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSet {
    set: HashSet<String>,
}

impl AddressSet {
    pub fn new() -> Self {
        AddressSet {
            set: HashSet::new(),
        }
    }

    pub fn add(&mut self, ip: impl Into<String>) {
        self.set.insert(ip.into());
    }

    pub fn add_range<I, S>(&mut self, ips: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ip in ips {
            self.add(ip);
        }
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.set.contains(ip)
    }

    /// 是否与给定地址列表存在交集
    pub fn contains_any<S: AsRef<str>>(&self, ips: &[S]) -> bool {
        ips.iter().any(|ip| self.set.contains(ip.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// 排序后以逗号拼接，便于日志输出
    pub fn stringify(&self) -> String {
        let mut ips: Vec<&str> = self.set.iter().map(|s| s.as_str()).collect();
        ips.sort_unstable();
        ips.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for AddressSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = AddressSet::new();
        set.add_range(iter);
        set
    }
}
