use async_trait::async_trait;

use crate::error::Result;
use crate::prober::ProbeOutcome;

/// 暴破引擎与探测插件之间的接口
///
/// `preflight` 需要 `&mut self`，`probe` 只需要 `&self`：
/// 引擎必须在预检完成后才能把插件共享给工作任务。
#[async_trait]
pub trait Plugin: Send + Sync {
    /// 插件名称
    fn name(&self) -> &'static str;

    /// 打开工作池之前执行一次，返回错误时整个运行终止
    async fn preflight(&mut self) -> Result<()>;

    /// 探测单个候选词，返回 0 或 1 个可报告的结果
    async fn probe(&self, word: &str) -> Result<Vec<ProbeOutcome>>;

    /// 将结果渲染为一行文本
    fn result_to_string(&self, outcome: &ProbeOutcome) -> Result<String>;

    /// 当前配置的描述
    fn config_string(&self) -> Result<String>;
}
