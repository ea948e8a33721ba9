//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义自动装配引擎与注入容器之间的接缝。
//!
//! ## 核心接口
//!
//! - [`Injector`] - 按类型解析实例的注入容器接口
//! - [`Instance`] - 类型擦除后的共享实例

pub mod resolver;

pub use resolver::*;
