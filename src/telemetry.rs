//! Tracing setup for the composition root.
//!
//! 组合根的日志初始化。
//!
//! The shell calls [`init_tracing`] once before building the runtime;
//! everything below logs through `tracing::` macros and inherits the
//! filter installed here.

use std::io;

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Default log directives: the workspace crates are chatty in debug
/// builds and quiet in release; HTTP internals are always capped at warn
/// because connection pool churn drowns everything else at info.
fn default_directives() -> String {
    let app_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    format!("{app_level},hn_app={app_level},hn_infra={app_level},hyper_util=warn,reqwest=warn")
}

/// Install the global tracing subscriber, writing to stdout.
///
/// `RUST_LOG` overrides the defaults wholesale.
///
/// # Errors / 错误
/// Fails when a subscriber is already installed, which means the shell
/// called this twice, or when `RUST_LOG` does not parse.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()));

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new("%Y-%m-%dT%H:%M:%S%.3fZ".into()))
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stdout);

    registry().with(filter).with(stdout_layer).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cap_http_noise_at_warn() {
        let directives = default_directives();
        assert!(directives.contains("hyper_util=warn"));
        assert!(directives.contains("reqwest=warn"));
        assert!(directives.contains("hn_app="));
        assert!(directives.contains("hn_infra="));
    }
}
