#![allow(clippy::unwrap_used)]

use webthumb_xml::{
    from_xml_str, from_xml_str_with_config, parse, Config, ErrorKind, Field, FieldBinding,
    FromXml, Job, Registry, Response, Result, Status, ValueKind,
};

#[test]
fn test_malformed_xml_never_materializes() {
    let cases = [
        "<webthumb><jobs></webthumb>",
        "<webthumb><jobs><job>wt1</job></jobs>",
        "<webthumb><credits><reserve>1</credits></reserve></webthumb>",
        "<webthumb attr=unquoted/>",
        "not xml at all",
    ];
    for case in cases {
        let err = from_xml_str::<Response>(case).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedXml, "input: {case}");
        assert!(err.to_string().starts_with("error at "));
    }
}

#[test]
fn test_non_numeric_integer_aborts_whole_response() {
    let xml = "<webthumb><jobs>\
               <job estimate='20' cost='1'>wt1</job>\
               <job estimate='soon' cost='2'>wt2</job>\
               </jobs></webthumb>";
    let err = from_xml_str::<Response>(xml).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeCoercion {
            field: "estimate",
            raw: "soon".to_string(),
            expected: "integer",
        }
    );
    assert!(err.message().starts_with("webthumb/jobs/job/"));
    assert!(err.to_string().contains("soon"));
}

#[test]
fn test_non_numeric_double_is_coercion_error() {
    let xml = "<webthumb><credits><reserve>lots</reserve></credits></webthumb>";
    let err = from_xml_str::<Response>(xml).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::TypeCoercion {
            field: "reserve",
            expected: "double",
            ..
        }
    ));
}

#[test]
fn test_malformed_date_is_date_format_error() {
    let xml = "<job time='27.02.2008 16:49'>wt1</job>";
    let err = from_xml_str::<Job>(xml).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::DateFormat {
            field: "time",
            raw: "27.02.2008 16:49".to_string(),
        }
    );
}

#[test]
fn test_status_id_present_but_required_job_id_missing() {
    let status: Status = from_xml_str("<status id='wt1'></status>").unwrap();
    assert_eq!(status.state, None);

    let err = from_xml_str::<Job>("<job estimate='1'></job>").unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::MissingChild {
            element: "job".to_string(),
            field: "id",
        }
    );
}

#[test]
fn test_required_nested_object_missing() {
    #[derive(Debug, Default)]
    struct Envelope {
        credits: Option<webthumb_xml::Credits>,
    }

    impl FromXml for Envelope {
        fn bindings() -> Vec<FieldBinding> {
            vec![FieldBinding::child_object::<webthumb_xml::Credits>("credits", "credits").required()]
        }

        fn assign(&mut self, field: Field) -> Result<()> {
            self.credits = field.into_optional_object()?;
            Ok(())
        }
    }

    let err = from_xml_str::<Envelope>("<webthumb/>").unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MissingChild {
            field: "credits",
            ..
        }
    ));

    let ok = from_xml_str::<Envelope>("<webthumb><credits/></webthumb>").unwrap();
    assert!(ok.credits.is_some());
}

#[test]
fn test_type_without_bindings_is_unknown() {
    #[derive(Debug, Default)]
    struct Opaque;

    impl FromXml for Opaque {
        fn bindings() -> Vec<FieldBinding> {
            Vec::new()
        }

        fn assign(&mut self, field: Field) -> Result<()> {
            Err(field.undeclared::<Self>())
        }
    }

    let err = from_xml_str::<Opaque>("<opaque/>").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownBinding { .. }));
}

#[test]
fn test_undeclared_field_in_assign_is_reported() {
    #[derive(Debug, Default)]
    struct Forgetful;

    impl FromXml for Forgetful {
        fn bindings() -> Vec<FieldBinding> {
            vec![FieldBinding::attribute("size", "size", ValueKind::Integer)]
        }

        fn assign(&mut self, field: Field) -> Result<()> {
            Err(field.undeclared::<Self>())
        }
    }

    let err = from_xml_str::<Forgetful>("<x size='1'/>").unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::UndeclaredField { field: "size", .. }
    ));
}

#[test]
fn test_lookup_by_type_id_requires_registration() {
    let registry = Registry::new();
    let id = std::any::TypeId::of::<Job>();
    assert!(registry.lookup(id, "Job").is_err());
    registry.bindings_for::<Job>().unwrap();
    assert_eq!(registry.lookup(id, "Job").unwrap().len(), 5);
}

#[test]
fn test_config_limits_apply_before_mapping() {
    let deep = "<webthumb><jobStatus><status/></jobStatus></webthumb>";
    let err = from_xml_str_with_config::<Response>(deep, Config::new(2, 0)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 2 });

    let ok = from_xml_str_with_config::<Response>(deep, Config::unlimited()).unwrap();
    assert_eq!(ok.job_status.map(|s| s.statuses.len()), Some(1));
}

#[test]
fn test_parse_is_schema_agnostic() {
    let root = parse("<anything a='1'><b>text</b><b/></anything>").unwrap();
    assert_eq!(root.name, "anything");
    assert_eq!(root.children_named("b").count(), 2);
}
