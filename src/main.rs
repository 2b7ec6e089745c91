use clap::Parser;
use colored::Colorize;
use log::debug;

use rdnsbuster::input::Opts;
use rdnsbuster::logger;
use rdnsbuster::{DnsPlugin, Engine};

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    logger::init_logger(opts.verbose, opts.quiet);

    if let Err(e) = run(opts).await {
        eprintln!("{} {}", "[!]".red(), e);
        std::process::exit(1);
    }
}

async fn run(opts: Opts) -> rdnsbuster::Result<()> {
    let (global, dns) = opts.into_options();
    let plugin = DnsPlugin::new(global.clone(), dns)?;

    let stats = Engine::new(global, plugin).run().await?;
    debug!("{:?}", stats);
    Ok(())
}
