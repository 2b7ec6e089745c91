use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rdnsbuster::{
    BusterError, DnsLookup, DnsOptions, DnsPlugin, Engine, GlobalOptions, Plugin, ProbeOutcome,
};

/// 内存解析器：显式记录优先，其余子域名按泛解析地址应答
struct MockResolver {
    domain: String,
    records: HashMap<String, Vec<String>>,
    wildcard: Option<Vec<String>>,
    apex: bool,
    calls: Arc<AtomicUsize>,
}

impl MockResolver {
    fn new(domain: &str) -> Self {
        MockResolver {
            domain: domain.to_string(),
            records: HashMap::new(),
            wildcard: None,
            apex: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn with_record(mut self, name: &str, ips: &[&str]) -> Self {
        self.records
            .insert(name.to_string(), ips.iter().map(|s| s.to_string()).collect());
        self
    }

    fn with_wildcard(mut self, ips: &[&str]) -> Self {
        self.wildcard = Some(ips.iter().map(|s| s.to_string()).collect());
        self
    }

    fn without_apex(mut self) -> Self {
        self.apex = false;
        self
    }
}

#[async_trait]
impl DnsLookup for MockResolver {
    async fn lookup_host(&self, name: &str) -> rdnsbuster::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ips) = self.records.get(name) {
            return Ok(ips.clone());
        }
        if name == self.domain {
            if self.apex {
                return Ok(vec!["192.0.2.1".to_string()]);
            }
        } else if name.ends_with(&format!(".{}", self.domain)) {
            if let Some(ref ips) = self.wildcard {
                return Ok(ips.clone());
            }
        }
        Err(BusterError::Resolution {
            name: name.to_string(),
            reason: "NXDOMAIN".to_string(),
        })
    }

    async fn lookup_cname(&self, name: &str) -> rdnsbuster::Result<String> {
        Ok(format!("{}.", name))
    }
}

fn quiet_global() -> GlobalOptions {
    GlobalOptions {
        quiet: true,
        no_progress: true,
        ..Default::default()
    }
}

fn dns_options(domain: &str) -> DnsOptions {
    DnsOptions {
        domain: domain.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_wildcard_zone_detected_with_override() {
    let resolver = MockResolver::new("example.com").with_wildcard(&["1.2.3.4", "1.2.3.5"]);
    let mut opts = dns_options("example.com");
    opts.wildcard_forced = true;

    let mut plugin = DnsPlugin::with_resolver(quiet_global(), opts, resolver).unwrap();
    plugin.preflight().await.unwrap();

    let state = plugin.wildcard_state();
    assert!(state.is_wildcard);
    assert_eq!(state.addresses.len(), 2);
    assert!(state.addresses.contains("1.2.3.4"));
    assert!(state.addresses.contains("1.2.3.5"));
}

#[tokio::test]
async fn test_wildcard_without_override_aborts() {
    for threads in [1, 10, 200] {
        for verbose in [false, true] {
            let resolver = MockResolver::new("example.com").with_wildcard(&["1.2.3.4"]);
            let global = GlobalOptions {
                threads,
                verbose,
                ..quiet_global()
            };
            let mut plugin =
                DnsPlugin::with_resolver(global, dns_options("example.com"), resolver).unwrap();

            match plugin.preflight().await {
                Err(BusterError::WildcardDetected { domain, ips }) => {
                    assert_eq!(domain, "example.com");
                    assert_eq!(ips, "1.2.3.4");
                }
                other => panic!("expected wildcard abort, got {:?}", other),
            }
            assert!(plugin.wildcard_state().is_wildcard);
        }
    }
}

#[tokio::test]
async fn test_plain_zone_has_no_wildcard() {
    let resolver = MockResolver::new("example.com").with_record("www.example.com", &["1.2.3.4"]);
    let mut plugin =
        DnsPlugin::with_resolver(quiet_global(), dns_options("example.com"), resolver).unwrap();
    plugin.preflight().await.unwrap();

    assert!(!plugin.wildcard_state().is_wildcard);
    assert!(plugin.wildcard_state().addresses.is_empty());
}

#[tokio::test]
async fn test_unresolvable_base_domain_is_only_a_warning() {
    let resolver = MockResolver::new("example.com").without_apex();
    let global = GlobalOptions {
        quiet: false,
        ..quiet_global()
    };
    let mut plugin = DnsPlugin::with_resolver(global, dns_options("example.com"), resolver).unwrap();

    assert!(plugin.preflight().await.is_ok());
}

#[tokio::test]
async fn test_probe_under_forced_wildcard() {
    let resolver = MockResolver::new("example.com")
        .with_wildcard(&["1.2.3.4"])
        .with_record("mail.example.com", &["5.6.7.8"]);
    let mut opts = dns_options("example.com");
    opts.wildcard_forced = true;
    opts.show_ips = true;

    let mut plugin = DnsPlugin::with_resolver(quiet_global(), opts, resolver).unwrap();
    plugin.preflight().await.unwrap();

    assert!(plugin.probe("anything").await.unwrap().is_empty());

    let results = plugin.probe("mail").await.unwrap();
    assert_eq!(
        results,
        vec![ProbeOutcome::Found {
            entity: "mail.example.com".to_string(),
            extra: Some("5.6.7.8".to_string()),
        }]
    );
    assert_eq!(
        plugin.result_to_string(&results[0]).unwrap(),
        "Found: mail.example.com [5.6.7.8]"
    );
}

#[tokio::test]
async fn test_missing_reported_only_when_verbose() {
    let resolver = MockResolver::new("example.com");
    let mut plugin =
        DnsPlugin::with_resolver(quiet_global(), dns_options("example.com"), resolver).unwrap();
    plugin.preflight().await.unwrap();
    assert!(plugin.probe("nope").await.unwrap().is_empty());

    let resolver = MockResolver::new("example.com");
    let global = GlobalOptions {
        verbose: true,
        ..quiet_global()
    };
    let mut plugin = DnsPlugin::with_resolver(global, dns_options("example.com"), resolver).unwrap();
    plugin.preflight().await.unwrap();

    let results = plugin.probe("nope").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        plugin.result_to_string(&results[0]).unwrap(),
        "Missing: nope.example.com"
    );
}

#[tokio::test]
async fn test_probe_is_idempotent() {
    let resolver = MockResolver::new("example.com")
        .with_wildcard(&["1.2.3.4"])
        .with_record("api.example.com", &["10.0.0.1"]);
    let mut opts = dns_options("example.com");
    opts.wildcard_forced = true;
    let mut plugin = DnsPlugin::with_resolver(quiet_global(), opts, resolver).unwrap();
    plugin.preflight().await.unwrap();

    let first_api = plugin.probe("api").await.unwrap();
    let first_noise = plugin.probe("noise").await.unwrap();
    for _ in 0..20 {
        assert_eq!(plugin.probe("api").await.unwrap(), first_api);
        assert_eq!(plugin.probe("noise").await.unwrap(), first_noise);
    }
}

#[tokio::test]
async fn test_cname_shown_when_ips_disabled() {
    let resolver = MockResolver::new("example.com").with_record("www.example.com", &["1.2.3.4"]);
    let mut opts = dns_options("example.com");
    opts.show_cname = true;
    let mut plugin = DnsPlugin::with_resolver(quiet_global(), opts, resolver).unwrap();
    plugin.preflight().await.unwrap();

    let results = plugin.probe("www").await.unwrap();
    assert_eq!(
        plugin.result_to_string(&results[0]).unwrap(),
        "Found: www.example.com [www.example.com.]"
    );
}

#[test]
fn test_invalid_configuration_rejected() {
    let bad_domain = DnsPlugin::with_resolver(
        quiet_global(),
        dns_options("not a domain"),
        MockResolver::new("example.com"),
    );
    assert!(matches!(bad_domain, Err(BusterError::Config(_))));

    let no_threads = DnsPlugin::with_resolver(
        GlobalOptions {
            threads: 0,
            ..quiet_global()
        },
        dns_options("example.com"),
        MockResolver::new("example.com"),
    );
    assert!(matches!(no_threads, Err(BusterError::Config(_))));
}

#[test]
fn test_config_string() {
    let global = GlobalOptions {
        threads: 20,
        wordlist: "/tmp/words.txt".to_string(),
        ..quiet_global()
    };
    let plugin = DnsPlugin::with_resolver(
        global,
        dns_options("Example.com."),
        MockResolver::new("example.com"),
    )
    .unwrap();

    let config = plugin.config_string().unwrap();
    assert!(config.starts_with("[+] Domain:"));
    assert!(config.contains("example.com"));
    assert!(config.contains("/tmp/words.txt"));
    assert!(!config.contains("Verbose"));
}

#[tokio::test]
async fn test_engine_streams_found_lines() {
    let resolver = MockResolver::new("example.com")
        .with_wildcard(&["1.2.3.4"])
        .with_record("www.example.com", &["10.0.0.1"])
        .with_record("mail.example.com", &["10.0.0.2"]);
    let mut opts = dns_options("example.com");
    opts.wildcard_forced = true;
    let global = GlobalOptions {
        threads: 4,
        ..quiet_global()
    };
    let plugin = DnsPlugin::with_resolver(global.clone(), opts, resolver).unwrap();

    let wordlist = "www\n\n# comment\n  mail  \nnoise\nstatic\n";
    let (stats, sink) = Engine::new(global, plugin)
        .run_with(wordlist.as_bytes(), Vec::new())
        .await
        .unwrap();

    assert_eq!(stats.words, 4);
    assert_eq!(stats.found, 2);
    assert_eq!(stats.missing, 0);

    let output = String::from_utf8(sink).unwrap();
    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, vec!["Found: mail.example.com", "Found: www.example.com"]);
}

#[tokio::test]
async fn test_engine_stops_before_pool_on_wildcard() {
    let resolver = MockResolver::new("example.com").with_wildcard(&["1.2.3.4"]);
    let calls = resolver.calls.clone();
    let global = quiet_global();
    let plugin = DnsPlugin::with_resolver(global.clone(), dns_options("example.com"), resolver).unwrap();

    let result = Engine::new(global, plugin)
        .run_with("www\nmail\n".as_bytes(), Vec::new())
        .await;

    assert!(matches!(result, Err(BusterError::WildcardDetected { .. })));
    // 只有预检的随机子域名查询
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_engine_reports_missing_in_verbose_mode() {
    let resolver = MockResolver::new("example.com").with_record("www.example.com", &["10.0.0.1"]);
    let global = GlobalOptions {
        verbose: true,
        threads: 2,
        ..quiet_global()
    };
    let plugin = DnsPlugin::with_resolver(global.clone(), dns_options("example.com"), resolver).unwrap();

    let (stats, sink) = tokio_test::block_on(
        Engine::new(global, plugin).run_with("www\nghost\n".as_bytes(), Vec::new()),
    )
    .unwrap();

    assert_eq!(stats.found, 1);
    assert_eq!(stats.missing, 1);
    let output = String::from_utf8(sink).unwrap();
    assert!(output.contains("Found: www.example.com\n"));
    assert!(output.contains("Missing: ghost.example.com\n"));
}

#[tokio::test]
async fn test_base_domain_lookup_skipped_when_quiet() {
    let resolver = MockResolver::new("example.com");
    let calls = resolver.calls.clone();
    let mut plugin =
        DnsPlugin::with_resolver(quiet_global(), dns_options("example.com"), resolver).unwrap();
    plugin.preflight().await.unwrap();
    // 只有随机子域名一次查询
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let resolver = MockResolver::new("example.com");
    let calls = resolver.calls.clone();
    let global = GlobalOptions {
        quiet: false,
        ..quiet_global()
    };
    let mut plugin = DnsPlugin::with_resolver(global, dns_options("example.com"), resolver).unwrap();
    plugin.preflight().await.unwrap();
    // 随机子域名 + 根域名
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_second_preflight_keeps_wildcard_state() {
    let resolver = MockResolver::new("example.com").with_wildcard(&["1.2.3.4"]);
    let calls = resolver.calls.clone();
    let mut opts = dns_options("example.com");
    opts.wildcard_forced = true;
    let mut plugin = DnsPlugin::with_resolver(quiet_global(), opts, resolver).unwrap();

    plugin.preflight().await.unwrap();
    let first = plugin.wildcard_state().clone();
    plugin.preflight().await.unwrap();

    assert_eq!(plugin.wildcard_state(), &first);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_second_preflight_repeats_wildcard_abort() {
    let resolver = MockResolver::new("example.com").with_wildcard(&["1.2.3.4"]);
    let calls = resolver.calls.clone();
    let mut plugin =
        DnsPlugin::with_resolver(quiet_global(), dns_options("example.com"), resolver).unwrap();

    assert!(matches!(plugin.preflight().await, Err(BusterError::WildcardDetected { .. })));
    assert!(matches!(plugin.preflight().await, Err(BusterError::WildcardDetected { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_engine_rejects_zero_threads() {
    let resolver = MockResolver::new("example.com");
    let plugin =
        DnsPlugin::with_resolver(quiet_global(), dns_options("example.com"), resolver).unwrap();
    let global = GlobalOptions {
        threads: 0,
        ..quiet_global()
    };

    let result = Engine::new(global, plugin)
        .run_with("www\n".as_bytes(), Vec::new())
        .await;
    assert!(matches!(result, Err(BusterError::Config(_))));
}

#[tokio::test]
async fn test_engine_skips_invalid_utf8_line() {
    let resolver = MockResolver::new("example.com")
        .with_record("www.example.com", &["10.0.0.1"])
        .with_record("mail.example.com", &["10.0.0.2"]);
    let global = GlobalOptions {
        threads: 2,
        ..quiet_global()
    };
    let plugin = DnsPlugin::with_resolver(global.clone(), dns_options("example.com"), resolver).unwrap();

    let wordlist: &[u8] = b"www\n\xff\xfe\nmail\r\n";
    let (stats, sink) = Engine::new(global, plugin)
        .run_with(wordlist, Vec::new())
        .await
        .unwrap();

    assert_eq!(stats.words, 2);
    assert_eq!(stats.found, 2);
    let output = String::from_utf8(sink).unwrap();
    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, vec!["Found: mail.example.com", "Found: www.example.com"]);
}
