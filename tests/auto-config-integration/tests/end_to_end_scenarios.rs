//! 自动装配端到端场景测试

mod common;

use auto_config::{AutoConfig, AutoConfigOptions, EngineState, Phase, RegistrationCategory};
use common::{init_test_logger, HostCall, RecordingBootstrap, RecordingEnvironment};
use di_impl::DiContainerImpl;
use infrastructure_common::{AutoConfigError, AutoConfigResult, DependencyError};

mod scenario_a {
    pub mod app {
        pub mod services {
            use async_trait::async_trait;
            use auto_config::discoverable;
            use infrastructure_common::{LifecycleError, Managed};

            pub struct OrderService;

            #[async_trait]
            impl Managed for OrderService {
                fn name(&self) -> &str {
                    "order-service"
                }

                async fn start(&self) -> Result<(), LifecycleError> {
                    Ok(())
                }

                async fn stop(&self) -> Result<(), LifecycleError> {
                    Ok(())
                }
            }

            pub trait PooledService: Managed {
                fn pool_size(&self) -> usize {
                    4
                }
            }

            discoverable!(Concrete OrderService: [dyn Managed]);
            discoverable!(Abstract dyn PooledService: [dyn Managed]);
        }

        pub mod services_legacy {
            use async_trait::async_trait;
            use auto_config::discoverable;
            use infrastructure_common::{LifecycleError, Managed};

            pub struct LegacyService;

            #[async_trait]
            impl Managed for LegacyService {
                fn name(&self) -> &str {
                    "legacy-service"
                }

                async fn start(&self) -> Result<(), LifecycleError> {
                    Ok(())
                }

                async fn stop(&self) -> Result<(), LifecycleError> {
                    Ok(())
                }
            }

            discoverable!(Concrete LegacyService: [dyn Managed]);
        }
    }
}

mod scenario_b {
    pub mod app {
        pub mod resources {
            use auto_config::{discoverable, PATH};

            pub struct UsersResource;
            pub struct OrdersResource;

            discoverable!(Concrete UsersResource, tags: [PATH]);
            discoverable!(Concrete OrdersResource, tags: [PATH]);
        }
    }
}

mod scenario_c {
    pub mod plugins {
        use auto_config::{discoverable, Bootstrap, Bundle};

        pub struct AssetsBundle;

        impl Bundle for AssetsBundle {
            fn name(&self) -> &str {
                "assets"
            }

            fn initialize(&self, _bootstrap: &mut dyn Bootstrap) {}
        }

        discoverable!(Concrete AssetsBundle: [dyn Bundle]);
    }
}

mod full {
    pub mod app {
        use async_trait::async_trait;
        use auto_config::{discoverable, Bootstrap, Bundle, InjectableProvider, PATH, PROVIDER};
        use infrastructure_common::{
            HealthCheck, HealthStatus, LifecycleError, Managed, Task, TaskError, TaskParameters,
        };

        pub struct AdminBundle;

        impl Bundle for AdminBundle {
            fn name(&self) -> &str {
                "admin"
            }

            fn initialize(&self, _bootstrap: &mut dyn Bootstrap) {}
        }

        pub struct DatabaseCheck;

        #[async_trait]
        impl HealthCheck for DatabaseCheck {
            fn name(&self) -> &str {
                "database"
            }

            async fn check(&self) -> HealthStatus {
                HealthStatus::healthy()
            }
        }

        pub struct ClockProvider;

        pub struct JsonProvider;

        impl InjectableProvider for JsonProvider {}

        pub struct StatusResource;

        pub struct ReindexTask;

        #[async_trait]
        impl Task for ReindexTask {
            fn name(&self) -> &str {
                "reindex"
            }

            async fn execute(&self, _parameters: &TaskParameters) -> Result<(), TaskError> {
                Ok(())
            }
        }

        pub struct CacheService;

        #[async_trait]
        impl Managed for CacheService {
            fn name(&self) -> &str {
                "cache"
            }

            async fn start(&self) -> Result<(), LifecycleError> {
                Ok(())
            }

            async fn stop(&self) -> Result<(), LifecycleError> {
                Ok(())
            }
        }

        discoverable!(Concrete AdminBundle: [dyn Bundle]);
        discoverable!(Concrete DatabaseCheck: [dyn HealthCheck]);
        discoverable!(Concrete ClockProvider, tags: [PROVIDER]);
        discoverable!(Concrete JsonProvider: [dyn InjectableProvider]);
        discoverable!(Concrete StatusResource, tags: [PATH]);
        discoverable!(Concrete ReindexTask: [dyn Task]);
        discoverable!(Concrete CacheService: [dyn Managed]);
    }
}

mod abort {
    pub mod app {
        use async_trait::async_trait;
        use auto_config::discoverable;
        use infrastructure_common::{HealthCheck, HealthStatus, LifecycleError, Managed};

        pub struct AlphaCheck;

        #[async_trait]
        impl HealthCheck for AlphaCheck {
            fn name(&self) -> &str {
                "alpha"
            }

            async fn check(&self) -> HealthStatus {
                HealthStatus::healthy()
            }
        }

        pub struct BetaCheck;

        #[async_trait]
        impl HealthCheck for BetaCheck {
            fn name(&self) -> &str {
                "beta"
            }

            async fn check(&self) -> HealthStatus {
                HealthStatus::healthy()
            }
        }

        pub struct LateService;

        #[async_trait]
        impl Managed for LateService {
            fn name(&self) -> &str {
                "late"
            }

            async fn start(&self) -> Result<(), LifecycleError> {
                Ok(())
            }

            async fn stop(&self) -> Result<(), LifecycleError> {
                Ok(())
            }
        }

        discoverable!(Concrete AlphaCheck: [dyn HealthCheck]);
        discoverable!(Concrete BetaCheck: [dyn HealthCheck]);
        discoverable!(Concrete LateService: [dyn Managed]);
    }
}

mod duplicate {
    use auto_config::discoverable;

    pub struct Twice;

    discoverable!(Concrete Twice);
    discoverable!(Concrete Twice);
}

mod inherited {
    use async_trait::async_trait;
    use auto_config::discoverable;
    use infrastructure_common::{LifecycleError, Managed};

    pub trait PooledService: Managed {}

    pub struct ConnectionPool;

    #[async_trait]
    impl Managed for ConnectionPool {
        fn name(&self) -> &str {
            "connection-pool"
        }

        async fn start(&self) -> Result<(), LifecycleError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), LifecycleError> {
            Ok(())
        }
    }

    impl PooledService for ConnectionPool {}

    discoverable!(Abstract dyn PooledService: [dyn Managed]);
    discoverable!(Concrete ConnectionPool: [dyn PooledService]);
}

mod halted {
    use async_trait::async_trait;
    use auto_config::{discoverable, Bootstrap, Bundle};
    use infrastructure_common::{HealthCheck, HealthStatus};

    pub struct BrokenBundle;

    impl Bundle for BrokenBundle {
        fn name(&self) -> &str {
            "broken"
        }

        fn initialize(&self, _bootstrap: &mut dyn Bootstrap) {}
    }

    pub struct QueueCheck;

    #[async_trait]
    impl HealthCheck for QueueCheck {
        fn name(&self) -> &str {
            "queue"
        }

        async fn check(&self) -> HealthStatus {
            HealthStatus::healthy()
        }
    }

    discoverable!(Concrete BrokenBundle: [dyn Bundle]);
    discoverable!(Concrete QueueCheck: [dyn HealthCheck]);
}

mod stray {
    use async_trait::async_trait;
    use auto_config::discoverable;
    use infrastructure_common::{LifecycleError, Managed};

    pub struct StrayService;

    #[async_trait]
    impl Managed for StrayService {
        fn name(&self) -> &str {
            "stray"
        }

        async fn start(&self) -> Result<(), LifecycleError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), LifecycleError> {
            Ok(())
        }
    }

    discoverable!(Concrete StrayService: [dyn Managed]);
}

fn namespace(path: &str) -> String {
    format!("{}.{}", module_path!(), path)
}

#[tokio::test]
async fn scenario_a_only_concrete_managed_type_is_managed() {
    init_test_logger();
    let container = DiContainerImpl::builder()
        .register_instance(scenario_a::app::services::OrderService)
        .register_instance(scenario_a::app::services_legacy::LegacyService)
        .build();
    let mut engine = AutoConfig::new([namespace("scenario_a.app.services")]).unwrap();
    let mut environment = RecordingEnvironment::default();

    let report = engine.run(&mut environment, &container).await.unwrap();

    assert_eq!(
        environment.calls,
        vec![HostCall::Managed("order-service".to_string())]
    );
    assert_eq!(report.count(RegistrationCategory::Managed), 1);
    assert_eq!(engine.index().len(), 2);
}

#[tokio::test]
async fn scenario_b_resources_registered_once_each_as_types() {
    init_test_logger();
    let container = DiContainerImpl::new();
    let mut engine = AutoConfig::new([namespace("scenario_b.app.resources")]).unwrap();
    let mut environment = RecordingEnvironment::default();

    let report = engine.run(&mut environment, &container).await.unwrap();

    assert_eq!(
        environment.calls,
        vec![
            HostCall::Resource("OrdersResource".to_string()),
            HostCall::Resource("UsersResource".to_string()),
        ]
    );
    assert_eq!(report.count(RegistrationCategory::Resource), 2);
    assert_eq!(report.len(), 2);
}

#[tokio::test]
async fn scenario_c_failing_bundle_aborts_bootstrap() {
    init_test_logger();
    let container = DiContainerImpl::new();
    let mut engine = AutoConfig::new([namespace("scenario_c")]).unwrap();
    let mut bootstrap = RecordingBootstrap::default();

    let error = engine.initialize(&mut bootstrap, &container).await.unwrap_err();

    match error {
        AutoConfigError::ResolutionError {
            category,
            type_name,
            source,
        } => {
            assert_eq!(category, "bundle");
            assert!(type_name.ends_with("scenario_c::plugins::AssetsBundle"));
            assert!(matches!(
                source,
                DependencyError::ComponentNotRegistered { .. }
            ));
        }
        other => panic!("期望解析错误, 实际: {:?}", other),
    }
    assert!(bootstrap.calls.is_empty());
    assert_eq!(engine.state(), EngineState::Uninitialized);
}

fn full_container() -> DiContainerImpl {
    DiContainerImpl::builder()
        .register_instance(full::app::AdminBundle)
        .register_instance(full::app::DatabaseCheck)
        .register_instance(full::app::ClockProvider)
        .register_instance(full::app::ReindexTask)
        .register_instance(full::app::CacheService)
        .build()
}

#[tokio::test]
async fn bootstrap_phase_registers_and_initializes_bundles() {
    init_test_logger();
    let container = full_container();
    let mut engine = AutoConfig::new([namespace("full")]).unwrap();
    let mut bootstrap = RecordingBootstrap::default();

    let report = engine.initialize(&mut bootstrap, &container).await.unwrap();

    assert_eq!(bootstrap.calls, vec![HostCall::Bundle("admin".to_string())]);
    assert_eq!(bootstrap.initialized, vec!["admin".to_string()]);
    assert_eq!(report.len(), 1);
    assert_eq!(engine.state(), EngineState::Bootstrapped);
}

#[tokio::test]
async fn run_phase_follows_fixed_category_order() {
    init_test_logger();
    let container = full_container();
    let mut engine = AutoConfig::new([namespace("full.app")]).unwrap();
    let mut bootstrap = RecordingBootstrap::default();
    let mut environment = RecordingEnvironment::default();

    engine.initialize(&mut bootstrap, &container).await.unwrap();
    let report = engine.run(&mut environment, &container).await.unwrap();

    assert_eq!(
        environment.calls,
        vec![
            HostCall::HealthCheck("database".to_string()),
            HostCall::Provider("ClockProvider".to_string()),
            HostCall::InjectableProvider("JsonProvider".to_string()),
            HostCall::Resource("StatusResource".to_string()),
            HostCall::Task("reindex".to_string()),
            HostCall::Managed("cache".to_string()),
        ]
    );
    let categories: Vec<_> = environment.calls.iter().map(HostCall::category).collect();
    assert_eq!(categories, Phase::Run.categories().collect::<Vec<_>>());
    assert!(environment.providers[0].is::<full::app::ClockProvider>());
    assert_eq!(report.len(), 6);
    assert_eq!(engine.state(), EngineState::RunComplete);
}

#[tokio::test]
async fn types_outside_namespaces_are_never_discovered() {
    init_test_logger();
    let container = full_container();
    let mut engine = AutoConfig::new([namespace("full.app")]).unwrap();
    let mut environment = RecordingEnvironment::default();

    engine.run(&mut environment, &container).await.unwrap();

    let prefix = format!("{}::full::app", module_path!());
    assert!(engine
        .index()
        .declarations()
        .iter()
        .all(|descriptor| descriptor.module_path.starts_with(&prefix)));
    assert!(!environment
        .calls
        .contains(&HostCall::Managed("stray".to_string())));
}

#[tokio::test]
async fn resolution_failure_stops_remaining_registrations() {
    init_test_logger();
    let container = DiContainerImpl::builder()
        .register_instance(abort::app::AlphaCheck)
        .register_instance(abort::app::LateService)
        .build();
    let mut engine = AutoConfig::new([namespace("abort")]).unwrap();
    let mut environment = RecordingEnvironment::default();

    let error = engine.run(&mut environment, &container).await.unwrap_err();

    assert!(error.is_resolution_error());
    assert_eq!(
        environment.calls,
        vec![HostCall::HealthCheck("alpha".to_string())]
    );
    assert!(environment.managed.is_empty());
    assert_eq!(engine.state(), EngineState::Uninitialized);
}

#[tokio::test]
async fn repeated_run_registers_duplicates() {
    init_test_logger();
    let container = DiContainerImpl::new();
    let mut engine = AutoConfig::new([namespace("scenario_b")]).unwrap();
    let mut environment = RecordingEnvironment::default();

    engine.run(&mut environment, &container).await.unwrap();
    engine.run(&mut environment, &container).await.unwrap();

    assert_eq!(environment.calls.len(), 4);
    assert_eq!(engine.state(), EngineState::RunComplete);
}

#[test]
fn empty_namespace_set_is_configuration_error() {
    let error = AutoConfig::new(Vec::<String>::new()).unwrap_err();
    assert!(error.is_configuration_error());

    let error = AutoConfig::new(["", "  "]).unwrap_err();
    assert!(error.is_configuration_error());
}

#[test]
fn duplicate_identity_is_scan_error() {
    let error = AutoConfig::new([namespace("duplicate")]).unwrap_err();

    assert!(error.is_scan_error());
    assert!(error.to_string().contains("Twice"));
}

#[test]
fn concrete_type_reaching_contract_through_base_is_scan_error() {
    let error = AutoConfig::new([namespace("inherited")]).unwrap_err();

    assert!(error.is_scan_error());
    let message = error.to_string();
    assert!(message.contains("ConnectionPool"));
    assert!(message.contains("dyn Managed"));
}

async fn start_host(
    engine: &mut AutoConfig,
    container: &DiContainerImpl,
    bootstrap: &mut RecordingBootstrap,
    environment: &mut RecordingEnvironment,
) -> AutoConfigResult<()> {
    engine.initialize(bootstrap, container).await?;
    engine.run(environment, container).await?;
    Ok(())
}

#[tokio::test]
async fn aborted_bootstrap_never_reaches_run_phase() {
    init_test_logger();
    let container = DiContainerImpl::builder()
        .register_instance(halted::QueueCheck)
        .build();
    let mut engine = AutoConfig::new([namespace("halted")]).unwrap();
    let mut bootstrap = RecordingBootstrap::default();
    let mut environment = RecordingEnvironment::default();

    let error = start_host(&mut engine, &container, &mut bootstrap, &mut environment)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        AutoConfigError::ResolutionError { category: "bundle", .. }
    ));
    assert!(bootstrap.calls.is_empty());
    assert!(environment.calls.is_empty());
    assert_eq!(engine.state(), EngineState::Uninitialized);
}

#[test]
fn engine_builds_from_options() {
    let toml = format!(
        "[auto_config]\nnamespaces = [\"{}\", \"{}\"]\n",
        namespace("scenario_b.app.resources"),
        namespace("scenario_a.app.services"),
    );
    let options = AutoConfigOptions::from_toml_str(&toml).unwrap();

    let engine = AutoConfig::from_options(&options).unwrap();
    assert_eq!(engine.index().namespaces().len(), 2);
    assert_eq!(engine.index().len(), 4);

    let error = AutoConfig::from_options(&AutoConfigOptions::default()).unwrap_err();
    assert!(error.is_configuration_error());
}
