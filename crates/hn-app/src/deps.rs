//! # Application Dependencies / 应用依赖
//!
//! The adapter bundle the composition root assembles before wiring use
//! cases. 组合根在装配用例前收集的适配器集合。
//!
//! Deliberately a plain struct rather than a builder: every field is
//! required, and a missing adapter fails at compile time instead of at
//! first use.

use std::sync::Arc;

use hn_core::ports::{
    ApiClientPort, ClockPort, KeyValueStorePort, NotificationRendererPort, PlatformPort,
    PushMessagingPort,
};
use hn_core::CoreConfig;

/// Everything the use-case layer needs, gathered once.
/// 用例层所需的全部依赖。
///
/// Plain data: no defaults, no optional fields.
pub struct CoreDeps {
    /// Backend API dependencies / 后端接口依赖
    pub api: Arc<dyn ApiClientPort>,

    /// Storage dependencies / 存储依赖
    pub store: Arc<dyn KeyValueStorePort>,

    /// Push dependencies / 推送依赖
    pub messaging: Arc<dyn PushMessagingPort>,
    pub renderer: Arc<dyn NotificationRendererPort>,

    /// Platform dependencies / 平台依赖
    pub platform: Arc<dyn PlatformPort>,
    pub clock: Arc<dyn ClockPort>,

    /// Static configuration / 静态配置
    pub config: CoreConfig,
}
