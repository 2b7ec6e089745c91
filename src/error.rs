use thiserror::Error;

/// 运行过程中的错误类型
///
/// 只有配置错误和预检阶段的泛解析错误会终止整个运行，
/// 单个候选词的解析失败只会折叠为 `Missing` / `NoOpinion`。
#[derive(Error, Debug)]
pub enum BusterError {
    /// 参数缺失或非法，构造插件时即被拒绝
    #[error("configuration error: {0}")]
    Config(String),

    /// 检测到泛解析且未指定 `--wildcard`
    #[error(
        "Wildcard DNS found for {domain} (IP address(es): {ips}). \
         To force processing of Wildcard DNS, specify the '--wildcard' switch."
    )]
    WildcardDetected { domain: String, ips: String },

    /// 单次DNS解析失败
    #[error("unable to resolve {name}: {reason}")]
    Resolution { name: String, reason: String },

    /// 写出结果或读取字典时的IO错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 工作任务异常退出
    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BusterError {
    /// 是否为致命错误（需要在打开工作池之前停止）
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BusterError::Resolution { .. })
    }
}

pub type Result<T> = std::result::Result<T, BusterError>;
