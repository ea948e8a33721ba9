//! 演示应用组件
//!
//! 本模块下的组件都通过 `discoverable!` 登记到类型目录，由自动装配注册到宿主

pub mod bundles;
pub mod health;
pub mod providers;
pub mod resources;
pub mod services;
pub mod tasks;
