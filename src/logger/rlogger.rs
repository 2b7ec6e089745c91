use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// 根据 verbose / quiet 选择日志级别
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// 初始化日志，日志写到 stderr，结果行写到 stdout
///
/// 重复初始化会被忽略。
pub fn init_logger(verbose: bool, quiet: bool) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let _ = TermLogger::init(
        level_for(verbose, quiet),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
