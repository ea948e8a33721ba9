//! # 自动装配演示
//!
//! 演示宿主如何通过命名空间扫描自动注册组件：
//! 启动阶段注册插件，运行阶段注册健康检查、提供者、资源、任务和托管服务。

mod app;
mod host;
mod legacy;
mod logging;

use anyhow::Context;
use auto_config::{AutoConfig, AutoConfigOptions, RegistrationCategory, RegistrationReport};
use clap::Parser;
use di_impl::{DiContainerImpl, Lifetime};
use infrastructure_common::{HealthStatus, TaskParameters};
use tracing::{error, info, warn};

use crate::app::bundles::AdminBundle;
use crate::app::health::{BidderUpstreamCheck, DiskSpaceCheck};
use crate::app::providers::RequestIdProvider;
use crate::app::services::{BudgetSyncService, CampaignCache};
use crate::app::tasks::FlushCacheTask;
use crate::host::{DemoBootstrap, DemoEnvironment, HealthRegistry};
use crate::logging::{parse_log_level, LoggingConfig};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "auto-config-demo")]
#[command(about = "Lorn ADSP 自动装配演示")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/app.toml")]
    config: String,

    /// 扫描的命名空间前缀，指定后覆盖配置文件
    #[arg(short, long)]
    namespace: Vec<String>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 使用开发环境日志格式
    #[arg(long)]
    dev: bool,

    /// 输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    info!("启动自动装配演示");

    let options = load_options(&args)?;
    let container = build_container();
    let mut engine = AutoConfig::from_options(&options).context("创建自动装配引擎失败")?;
    info!("类型索引包含 {} 个声明", engine.index().len());

    let mut bootstrap = DemoBootstrap::default();
    let report = engine
        .initialize(&mut bootstrap, &container)
        .await
        .context("启动阶段自动装配失败")?;
    print_report("启动阶段", &report);

    let mut environment = DemoEnvironment::default();
    for bundle in bootstrap.bundles() {
        bundle.run(&mut environment);
    }

    let report = engine
        .run(&mut environment, &container)
        .await
        .context("运行阶段自动装配失败")?;
    print_report("运行阶段", &report);

    environment.start().await.context("启动托管组件失败")?;

    demonstrate_routes(&environment);
    demonstrate_health_check(&environment).await;
    demonstrate_task(&environment).await;

    environment.stop().await;
    info!("演示结束");
    Ok(())
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let mut config = if args.json_logs {
        LoggingConfig::production()
    } else if args.dev {
        LoggingConfig::development()
    } else {
        LoggingConfig::default()
    };

    if !args.dev {
        config.level = parse_log_level(&args.log_level);
    }

    config.init()
}

fn load_options(args: &Args) -> anyhow::Result<AutoConfigOptions> {
    if !args.namespace.is_empty() {
        info!("使用命令行指定的命名空间: {:?}", args.namespace);
        return Ok(AutoConfigOptions::new(args.namespace.iter().cloned()));
    }

    AutoConfigOptions::load(&args.config)
        .with_context(|| format!("加载自动装配选项失败: {}", args.config))
}

/// 注入容器只负责构造实例，不参与发现
fn build_container() -> DiContainerImpl {
    DiContainerImpl::builder()
        .register_instance(AdminBundle)
        .register_instance(DiskSpaceCheck::new(0.42, 0.2))
        .register_instance(BidderUpstreamCheck)
        .register_instance(RequestIdProvider::default())
        .register_instance(FlushCacheTask)
        .register_factory(Lifetime::Singleton, || Ok(CampaignCache::default()))
        .register_factory(Lifetime::Singleton, || Ok(BudgetSyncService::new(8)))
        .build()
}

fn print_report(phase: &str, report: &RegistrationReport) {
    info!("{}共注册 {} 个组件", phase, report.len());
    for category in RegistrationCategory::ALL {
        let names = report.type_names(category);
        if !names.is_empty() {
            info!("  {}: {}", category, names.join(", "));
        }
    }
}

fn demonstrate_routes(environment: &DemoEnvironment) {
    for (route, descriptor) in environment.routes() {
        info!("路由 {} -> {}", route, descriptor);
    }
    info!(
        "内容协商提供者 {} 个",
        environment.injectable_provider_count()
    );

    if let Some(request_ids) = environment.provider::<RequestIdProvider>() {
        info!("示例请求ID: {}", request_ids.next_id());
    }
}

async fn demonstrate_health_check(environment: &DemoEnvironment) {
    let reports = environment.health().check_all().await;
    for report in &reports {
        match &report.status {
            HealthStatus::Healthy => info!("健康检查 {} 正常 ({:?})", report.name, report.duration),
            HealthStatus::Degraded(message) => {
                warn!("健康检查 {} 降级: {}", report.name, message)
            }
            HealthStatus::Unhealthy(message) => {
                error!("健康检查 {} 不健康: {}", report.name, message)
            }
        }
    }

    info!("整体健康状态: {:?}", HealthRegistry::overall(&reports));
}

async fn demonstrate_task(environment: &DemoEnvironment) {
    let parameters = TaskParameters::new()
        .with("region", "cn-east")
        .with("region", "cn-north");

    if let Err(e) = environment.run_task("flush_cache", &parameters).await {
        error!("管理任务执行失败: {}", e);
    }
}
