//! # rdnsbuster
//!
//! 基于字典的DNS子域名暴破插件，带泛解析检测与过滤。
//!
//! ## 特性
//!
//! - 🔍 **泛解析过滤**: 预检阶段解析随机子域名，命中泛解析地址的结果自动丢弃
//! - 🚀 **并发探测**: 预检完成后以固定并发数探测候选词
//! - 📝 **附加信息**: 可选输出解析到的IP或CNAME
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use rdnsbuster::{DnsOptions, DnsPlugin, Engine, GlobalOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let global = GlobalOptions {
//!         wordlist: "words.txt".to_string(),
//!         ..Default::default()
//!     };
//!     let dns = DnsOptions {
//!         domain: "example.com".to_string(),
//!         show_ips: true,
//!         ..Default::default()
//!     };
//!
//!     let plugin = DnsPlugin::new(global.clone(), dns)?;
//!     let stats = Engine::new(global, plugin).run().await?;
//!     println!("发现 {} 个子域名", stats.found);
//!     Ok(())
//! }
//! ```

pub mod logger;
pub mod error;
pub mod options;
pub mod input;
pub mod address_set;
pub mod resolver;
pub mod wildcard;
pub mod prober;
pub mod format;
pub mod describe;
pub mod plugin;
pub mod dns;
pub mod engine;

// 重新导出主要的公共API
pub use address_set::AddressSet;
pub use dns::DnsPlugin;
pub use engine::{Engine, RunStats};
pub use error::{BusterError, Result};
pub use options::{DnsOptions, GlobalOptions};
pub use plugin::Plugin;
pub use prober::{ExtraInfo, ProbeOutcome, SubdomainProber};
pub use resolver::{DnsLookup, SystemResolver};
pub use wildcard::{WildcardDetector, WildcardState};
