//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 平台基础设施层的公共 traits 和工具。
//!
//! ## 核心组件
//!
//! - [`HealthCheck`] - 健康检查 trait
//! - [`Managed`] - 生命周期托管 trait
//! - [`Task`] - 管理任务 trait
//! - [`TypeInfo`] - 类型元数据
//! - [`AutoConfigError`] - 自动装配错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 异步优先的设计理念
//! - 宿主框架只通过窄接口交互

pub mod errors;
pub mod health;
pub mod lifecycle;
pub mod metadata;
pub mod task;

pub use errors::*;
pub use health::*;
pub use lifecycle::*;
pub use metadata::*;
pub use task::*;
