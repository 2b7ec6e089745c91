use std::time::Duration;

use clap::Parser;

use crate::options::{DnsOptions, GlobalOptions};

#[derive(Parser, Debug)]
#[command(name = "rdnsbuster")]
#[command(author = "gelenlen")]
#[command(version)]
#[command(about = "DNS subdomain brute-forcing with wildcard suppression", long_about = None, arg_required_else_help = true)]
pub struct Opts {
    /// the target domain
    #[arg(short, long)]
    pub domain: String,

    /// path to the wordlist, `-` reads from stdin
    #[arg(short, long, default_value = "-")]
    pub wordlist: String,

    /// number of concurrent probes
    #[arg(short, long, default_value_t = 10)]
    pub threads: usize,

    /// output file to write results to
    #[arg(short, long)]
    pub output: Option<String>,

    /// show IP addresses
    #[arg(short = 'i', long)]
    pub show_ips: bool,

    /// show CNAME records (ignored with --show-ips)
    #[arg(short = 'c', long)]
    pub show_cname: bool,

    /// force continued operation when wildcard found
    #[arg(long)]
    pub wildcard: bool,

    /// verbose output, also prints names that do not resolve
    #[arg(short, long)]
    pub verbose: bool,

    /// don't print the banner and other noise
    #[arg(short, long)]
    pub quiet: bool,

    /// don't report progress
    #[arg(short = 'z', long)]
    pub no_progress: bool,

    /// use a custom DNS server (ip or ip:port)
    #[arg(short, long)]
    pub resolver: Option<String>,

    /// DNS query timeout in seconds
    #[arg(long, default_value_t = 1)]
    pub timeout: u64,
}

impl Opts {
    /// 拆分为引擎配置和插件配置
    pub fn into_options(self) -> (GlobalOptions, DnsOptions) {
        let global = GlobalOptions {
            threads: self.threads,
            wordlist: self.wordlist,
            output: self.output,
            verbose: self.verbose,
            quiet: self.quiet,
            no_progress: self.no_progress,
        };
        let dns = DnsOptions {
            domain: self.domain,
            show_ips: self.show_ips,
            show_cname: self.show_cname,
            wildcard_forced: self.wildcard,
            resolver: self.resolver,
            timeout: Duration::from_secs(self.timeout),
        };
        (global, dns)
    }
}
