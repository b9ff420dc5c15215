//! 诊断日志初始化
//!
//! 库内部通过 `tracing` 宏输出诊断事件；二进制入口在这里安装订阅器。
//! `RUST_LOG` 优先，否则默认只输出警告，`--verbose` 时打开本crate的debug事件。

use tracing_subscriber::EnvFilter;

/// 默认过滤规则
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,digital_pulse_meter=debug"
    } else {
        "warn"
    }
}

/// 安装全局订阅器（输出到stderr，重复调用静默忽略）
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
