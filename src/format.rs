use std::fmt;
use std::io::Write;

use crate::error::Result;
use crate::prober::ProbeOutcome;

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Missing { entity } => write!(f, "Missing: {}", entity),
            ProbeOutcome::Found { entity, extra } => match extra.as_deref() {
                Some(extra) if !extra.is_empty() => write!(f, "Found: {} [{}]", entity, extra),
                _ => write!(f, "Found: {}", entity),
            },
            // 引擎不会转发这两种结果
            ProbeOutcome::Suppressed | ProbeOutcome::NoOpinion => Ok(()),
        }
    }
}

/// 将结果格式化为一行文本
pub fn format_outcome(outcome: &ProbeOutcome) -> String {
    outcome.to_string()
}

/// 写出一行结果，IO错误交给调用方
pub fn write_outcome<W: Write>(writer: &mut W, outcome: &ProbeOutcome) -> Result<()> {
    if outcome.is_reportable() {
        writeln!(writer, "{}", outcome)?;
    }
    Ok(())
}
