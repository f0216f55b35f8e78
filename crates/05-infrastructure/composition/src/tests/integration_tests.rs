//! 容器构建器集成测试

use crate::builder::ContainerBuilder;
use crate::logging::LoggingConfig;
use config_impl::{ContainerProperties, ALLOW_BEAN_DEFINITION_OVERRIDING, FAIL_FAST};
use di_abstractions::DependencyDescriptor;
use di_impl::{
    KnownClasses, COMMON_ANNOTATION_PROCESSOR_BEAN_NAME, CONFIGURATION_ANNOTATION_PROCESSOR_BEAN_NAME,
    JSR250_MARKER_CLASS_NAME,
};
use infrastructure_common::annotations;
use infrastructure_common::{
    DefinitionError, InfrastructureError, StandardClassMetadata, StandardMethodMetadata, TracingApplicationStartup,
};
use std::io::Write;
use std::sync::{Arc, Once};
use tempfile::NamedTempFile;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

const METADATA_JSON: &str = r#"{
    "classes": [
        {
            "class_name": "com.acme.AppConfig",
            "annotations": [
                {
                    "type": "lorn.di.annotation.Configuration",
                    "attributes": { "value": "", "proxyBeanMethods": true },
                    "meta_annotations": ["lorn.di.stereotype.Component"]
                }
            ]
        },
        {
            "class_name": "com.acme.OrderService",
            "annotations": [
                {
                    "type": "lorn.di.stereotype.Service",
                    "attributes": { "value": "orders" },
                    "meta_annotations": ["lorn.di.stereotype.Component"]
                }
            ]
        },
        {
            "class_name": "com.acme.Plain"
        }
    ],
    "methods": [
        {
            "method_name": "clock",
            "declaring_class_name": "com.acme.AppConfig",
            "return_type_name": "com.acme.Clock",
            "annotations": [
                { "type": "lorn.di.annotation.Bean", "attributes": { "name": [] } }
            ]
        },
        {
            "method_name": "auditLog",
            "declaring_class_name": "com.acme.AppConfig",
            "return_type_name": "com.acme.AuditLog",
            "final": true,
            "annotations": [
                { "type": "lorn.di.annotation.Bean", "attributes": { "name": ["auditLog", "audit"] } }
            ]
        }
    ]
}"#;

fn metadata_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(METADATA_JSON.as_bytes()).unwrap();
    file
}

fn properties(entries: &[(&str, &str)]) -> Arc<ContainerProperties> {
    let properties = ContainerProperties::empty();
    for (key, value) in entries {
        properties.set_property(key, Some(*value));
    }
    Arc::new(properties)
}

#[test]
fn test_build_from_metadata_file_collects_problems() {
    init_test_logger();
    let file = metadata_file();

    let context = ContainerBuilder::new()
        .add_metadata_json_file(file.path())
        .expect("添加元数据文件应该成功")
        .with_properties(properties(&[(FAIL_FAST, "false")]))
        .build()
        .expect("收集模式下构建应该成功");

    let user = context.user_bean_names();
    assert_eq!(user, vec!["appConfig", "orders", "clock", "auditLog"]);
    assert!(!context.contains_bean_definition("plain"));

    let clock = context.bean_definition("clock").unwrap();
    assert_eq!(clock.factory_bean_name(), Some("appConfig"));
    assert!(context.bean_factory().canonical_name("audit") == "auditLog");

    assert!(context.has_problems());
    assert_eq!(context.problems().len(), 1);
    let error = context.ensure_no_problems().unwrap_err();
    assert!(matches!(error, InfrastructureError::ProblemsDetected { count: 1, .. }));
    assert!(error.to_string().contains("com.acme.AppConfig#auditLog"));
}

#[test]
fn test_fail_fast_flag_from_properties_file() {
    init_test_logger();
    let file = metadata_file();

    let mut toml = NamedTempFile::new().unwrap();
    writeln!(toml, "[lorn.di]").unwrap();
    writeln!(toml, "fail-fast = true").unwrap();
    let properties = Arc::new(ContainerProperties::empty());
    properties.reload_from(toml.path()).unwrap();
    assert!(properties.get_flag(FAIL_FAST));

    let result = ContainerBuilder::new()
        .add_metadata_json_file(file.path())
        .unwrap()
        .with_properties(properties)
        .build();

    assert!(matches!(
        result,
        Err(InfrastructureError::DefinitionError {
            source: DefinitionError::ProblemReported { .. }
        })
    ));
}

#[test]
fn test_missing_metadata_file_is_reported() {
    let result = ContainerBuilder::new().add_metadata_json_file("/nonexistent/metadata.json");
    assert!(matches!(result, Err(InfrastructureError::ConfigError { .. })));
}

#[test]
fn test_startup_steps_are_recorded() {
    let startup = Arc::new(TracingApplicationStartup::new());
    let context = ContainerBuilder::new()
        .add_component(
            StandardClassMetadata::new("com.acme.Greeter")
                .with_annotation(annotations::component(None))
                .into_shared(),
        )
        .fail_fast(false)
        .with_properties(properties(&[]))
        .with_application_startup(startup.clone())
        .build()
        .unwrap();

    assert_eq!(context.user_bean_names(), vec!["greeter"]);
    let steps = startup.recorded_steps();
    let names: Vec<_> = steps.iter().map(|step| step.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "lorn.di.context.beanfactory.create",
            "lorn.di.context.components.register",
            "lorn.di.context.config-classes.parse",
            "lorn.di.context.config-classes.validate",
            "lorn.di.context.bean-methods.load",
        ]
    );
    assert!(steps[1].tags.contains(&("count".to_string(), "1".to_string())));
}

#[test]
fn test_infrastructure_and_user_names_are_separated() {
    let context = ContainerBuilder::new()
        .with_known_classes(KnownClasses::new().with(JSR250_MARKER_CLASS_NAME))
        .add_component(
            StandardClassMetadata::new("com.acme.Repo")
                .with_annotation(annotations::repository(None))
                .into_shared(),
        )
        .with_properties(properties(&[]))
        .build()
        .unwrap();

    let infrastructure = context.infrastructure_bean_names();
    assert!(infrastructure.iter().any(|name| name == CONFIGURATION_ANNOTATION_PROCESSOR_BEAN_NAME));
    assert!(infrastructure.iter().any(|name| name == COMMON_ANNOTATION_PROCESSOR_BEAN_NAME));
    assert_eq!(context.user_bean_names(), vec!["repo"]);
    assert_eq!(context.bean_definition_count(), infrastructure.len() + 1);
}

#[test]
fn test_bean_definition_overriding_policy() {
    let duplicate = || {
        StandardClassMetadata::new("com.acme.First")
            .with_annotation(annotations::component(Some("shared")))
            .into_shared()
    };
    let other = || {
        StandardClassMetadata::new("com.acme.Second")
            .with_annotation(annotations::component(Some("shared")))
            .into_shared()
    };

    let rejected = ContainerBuilder::new()
        .add_component(duplicate())
        .add_component(other())
        .with_properties(properties(&[]))
        .build();
    assert!(matches!(
        rejected,
        Err(InfrastructureError::DefinitionError {
            source: DefinitionError::DuplicateBeanName { .. }
        })
    ));

    let context = ContainerBuilder::new()
        .add_component(duplicate())
        .add_component(other())
        .with_properties(properties(&[(ALLOW_BEAN_DEFINITION_OVERRIDING, "TRUE")]))
        .build()
        .unwrap();
    let shared = context.bean_definition("shared").unwrap();
    assert_eq!(shared.bean_class_name(), Some("com.acme.Second"));
}

#[test]
fn test_explicit_configuration_with_qualified_candidates() {
    let config = StandardClassMetadata::new("com.acme.DataConfig")
        .with_annotation(annotations::configuration(None, false))
        .into_shared();
    let primary = StandardMethodMetadata::new("com.acme.DataConfig", "mainDataSource")
        .returning("com.acme.DataSource")
        .with_annotation(annotations::bean(&[]))
        .with_annotation(annotations::primary())
        .into_shared();
    let replica = StandardMethodMetadata::new("com.acme.DataConfig", "replicaDataSource")
        .returning("com.acme.DataSource")
        .with_annotation(annotations::bean(&[]))
        .with_annotation(annotations::qualifier("replica"))
        .into_shared();

    let context = ContainerBuilder::new()
        .add_configuration(config, vec![primary, replica])
        .auto_configure_production()
        .with_logging(LoggingConfig::default())
        .with_properties(properties(&[]))
        .build()
        .unwrap();

    assert!(!context.has_problems());
    assert!(context.contains_bean_definition("dataConfig"));

    let all = context.find_autowire_candidates(&DependencyDescriptor::new().with_type("com.acme.DataSource"));
    assert_eq!(all.len(), 2);

    let replicas = context.find_autowire_candidates(
        &DependencyDescriptor::new().with_type("com.acme.DataSource").with_qualifier("replica"),
    );
    assert_eq!(replicas.len(), 1);
    assert_eq!(replicas[0].bean_name(), "replicaDataSource");
}
