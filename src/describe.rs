use crate::options::{DnsOptions, GlobalOptions};

/// 键列与值列之间的空格数
const PADDING: usize = 3;

/// 生成当前配置的对齐文本
pub fn describe_config(global: &GlobalOptions, opts: &DnsOptions) -> String {
    let mut rows: Vec<(&str, String)> = vec![
        ("[+] Domain:", opts.domain.clone()),
        ("[+] Threads:", global.threads.to_string()),
    ];

    if opts.show_cname {
        rows.push(("[+] Show CNAME:", "true".to_string()));
    }
    if opts.show_ips {
        rows.push(("[+] Show IPs:", "true".to_string()));
    }
    if opts.wildcard_forced {
        rows.push(("[+] Wildcard forced:", "true".to_string()));
    }
    if let Some(ref resolver) = opts.resolver {
        rows.push(("[+] Resolver:", resolver.clone()));
    }
    rows.push(("[+] Timeout:", format_duration(opts.timeout)));

    let wordlist = if global.reads_stdin() {
        "stdin (pipe)".to_string()
    } else {
        global.wordlist.clone()
    };
    rows.push(("[+] Wordlist:", wordlist));

    if global.verbose {
        rows.push(("[+] Verbose:", "true".to_string()));
    }

    align_rows(&rows)
}

/// 按最长的键对齐
pub fn align_rows(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0) + PADDING;
    rows.iter()
        .map(|(key, value)| format!("{:<width$}{}", key, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn format_duration(d: std::time::Duration) -> String {
    if d.subsec_millis() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}
