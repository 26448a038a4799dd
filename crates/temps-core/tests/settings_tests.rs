use temps_core::{
    namespace_info_from, ContextError, DatasourceSettings, NamespaceMapper, RequestContext,
};

#[test]
fn test_settings_yaml_roundtrip() {
    let yaml = r#"
namespace:
  stack_id: "12"
querier:
  skip_cache: false
logging:
  level: warn
  format: full
"#;

    let settings = DatasourceSettings::from_yaml(yaml).unwrap();
    assert_eq!(settings.namespace.stack_id.as_deref(), Some("12"));
    assert!(!settings.querier.skip_cache);
    assert_eq!(settings.logging.level, "warn");

    // Serialize back and make sure nothing is lost
    let serialized = serde_yaml::to_string(&settings).unwrap();
    let reparsed = DatasourceSettings::from_yaml(&serialized).unwrap();
    assert_eq!(reparsed, settings);
}

#[test]
fn test_stack_mapper_feeds_request_context() {
    let settings = DatasourceSettings::from_yaml("namespace:\n  stack_id: \"12\"\n").unwrap();
    let mapper = NamespaceMapper::new(&settings.namespace);

    let ctx = RequestContext::new().with_namespace(mapper.namespace_for(1));
    let info = namespace_info_from(&ctx, true).unwrap();
    assert_eq!(info.org_id, 1);
    assert_eq!(info.stack_id.as_deref(), Some("12"));
    assert_eq!(info.value, "stack-12");
}

#[test]
fn test_org_namespace_feeds_request_context() {
    let mapper = NamespaceMapper::default();

    let ctx = RequestContext::new().with_namespace(mapper.namespace_for(7));
    assert_eq!(namespace_info_from(&ctx, true).unwrap().org_id, 7);

    let ctx = RequestContext::new();
    assert_eq!(
        namespace_info_from(&ctx, true).unwrap_err(),
        ContextError::MissingNamespace
    );
}
