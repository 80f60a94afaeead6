//! HomeNet Library
//!
//! 家庭网络客户端核心库
//!
//! Composition root for the HomeNet core: wires the `hn-infra` adapters
//! into the `hn-app` use cases and exposes one [`CoreRuntime`] to the
//! shell. Phone shells swap in their own adapters through
//! [`hn_app::CoreDeps`]; everything else stays identical across
//! platforms.

pub mod runtime;
pub mod telemetry;

// 重新导出常用类型
pub use hn_app::CoreDeps;
pub use hn_core::{AppBootstrapResult, BootstrapFailure, CoreConfig, LoginCredentials};
pub use runtime::{CoreRuntime, UseCases};
