//! 并发暴破引擎
//!
//! 负责读取字典、执行预检、以固定并发数调用插件并写出结果。

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::Colorize;
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task;
use tokio::sync::{mpsc, Semaphore};

use crate::error::Result;
use crate::options::GlobalOptions;
use crate::plugin::Plugin;
use crate::prober::ProbeOutcome;

/// 每隔多少个候选词输出一次进度
const PROGRESS_EVERY: usize = 1000;

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub words: usize,
    pub found: usize,
    pub missing: usize,
    pub elapsed: Duration,
}

/// 暴破引擎
pub struct Engine<P: Plugin> {
    global: GlobalOptions,
    plugin: P,
}

impl<P: Plugin + 'static> Engine<P> {
    pub fn new(global: GlobalOptions, plugin: P) -> Self {
        Engine { global, plugin }
    }

    /// 从配置的字典读取并把结果写到标准输出（以及输出文件）
    pub async fn run(self) -> Result<RunStats> {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = if self.global.reads_stdin() {
            Box::new(BufReader::new(tokio::io::stdin()))
        } else {
            Box::new(BufReader::new(tokio::fs::File::open(&self.global.wordlist).await?))
        };

        let file = match self.global.output {
            Some(ref path) => Some(BufWriter::new(File::create(path)?)),
            None => None,
        };
        let sink = TeeWriter {
            console: io::stdout(),
            file,
        };

        let (stats, _) = self.run_with(reader, sink).await?;
        Ok(stats)
    }

    /// 使用给定的字典和输出执行一次完整运行，返回统计与输出对象
    pub async fn run_with<Rd, W>(self, mut reader: Rd, sink: W) -> Result<(RunStats, W)>
    where
        Rd: AsyncBufRead + Unpin + Send,
        W: Write + Send + 'static,
    {
        let Engine { global, mut plugin } = self;
        global.validate()?;
        let start = Instant::now();

        if !global.quiet {
            print_banner(plugin.name(), &plugin.config_string()?);
        }

        // 预检在打开工作池之前顺序执行
        plugin.preflight().await?;

        let plugin = Arc::new(plugin);
        let semaphore = Arc::new(Semaphore::new(global.threads));
        let (tx, rx) = mpsc::channel::<(ProbeOutcome, String)>(global.threads * 2);
        // 写出是阻塞IO，放到阻塞线程池
        let writer = task::spawn_blocking(move || write_results(rx, sink));

        let mut words = 0usize;
        let mut line_no = 0usize;
        let mut buf = Vec::new();
        let read_error = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break None,
                Ok(_) => line_no += 1,
                Err(e) => break Some(e),
            }

            // 单行编码错误只跳过该行
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(_) => {
                    warn!("字典第 {} 行不是有效的UTF-8，已跳过", line_no);
                    continue;
                }
            };
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            // 输出端已关闭（写入失败），不再继续
            if tx.is_closed() {
                break None;
            }

            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break None,
            };
            let plugin = Arc::clone(&plugin);
            let tx = tx.clone();
            let word = word.to_string();

            tokio::spawn(async move {
                let _permit = permit;
                match plugin.probe(&word).await {
                    Ok(outcomes) => {
                        for outcome in outcomes {
                            match plugin.result_to_string(&outcome) {
                                Ok(line) => {
                                    let _ = tx.send((outcome, line)).await;
                                }
                                Err(e) => warn!("无法格式化结果 {}: {}", word, e),
                            }
                        }
                    }
                    Err(e) if e.is_fatal() => warn!("探测失败 {}: {}", word, e),
                    Err(e) => debug!("{}", e),
                }
            });

            words += 1;
            if !global.no_progress && words % PROGRESS_EVERY == 0 {
                debug!("进度: 已提交 {} 个候选词", words);
            }
        };
        drop(tx);

        // 先等已提交的结果写完，再返回读取错误
        let (found, missing, sink) = writer.await??;
        if let Some(e) = read_error {
            return Err(e.into());
        }
        let stats = RunStats {
            words,
            found,
            missing,
            elapsed: start.elapsed(),
        };

        if !global.quiet {
            print_footer(&stats);
        }
        Ok((stats, sink))
    }
}

/// 单一写出任务，所有结果行从这里顺序输出
fn write_results<W: Write>(
    mut rx: mpsc::Receiver<(ProbeOutcome, String)>,
    mut sink: W,
) -> Result<(usize, usize, W)> {
    let mut found = 0;
    let mut missing = 0;

    while let Some((outcome, line)) = rx.blocking_recv() {
        match outcome {
            ProbeOutcome::Found { .. } => found += 1,
            ProbeOutcome::Missing { .. } => missing += 1,
            _ => continue,
        }
        writeln!(sink, "{}", line)?;
    }
    sink.flush()?;

    Ok((found, missing, sink))
}

/// 同时写到终端和输出文件
struct TeeWriter {
    console: io::Stdout,
    file: Option<BufWriter<File>>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        if let Some(ref mut file) = self.file {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        if let Some(ref mut file) = self.file {
            file.flush()?;
        }
        Ok(())
    }
}

fn print_banner(plugin: &str, config: &str) {
    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("{} v{} ({} mode)", "rdnsbuster".bold(), env!("CARGO_PKG_VERSION"), plugin);
    println!("{}", separator);
    println!("{}", config);
    println!("{}", separator);
    println!("{} Starting rdnsbuster", chrono::Local::now().format("%Y/%m/%d %H:%M:%S"));
    println!("{}", separator);
}

fn print_footer(stats: &RunStats) {
    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("{} Finished", chrono::Local::now().format("%Y/%m/%d %H:%M:%S"));
    println!("{}", separator);
    info!(
        "共 {} 个候选词, 发现 {} 个, 未解析 {} 个, 耗时 {:.2?}",
        stats.words, stats.found, stats.missing, stats.elapsed
    );
}
