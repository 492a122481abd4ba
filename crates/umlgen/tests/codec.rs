//! Client model wire round-trip

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use serde_json::{json, Value};
use umlgen::plugins::flutter::{decode, encode, CodecError, DartModel, FieldValue, ModelInstance};
use umlgen::prelude::*;
use umlgen::WireKind;

fn invoice_diagram() -> Diagram {
    Diagram::new()
        .with_class(UmlClass::new("c", "Customer"))
        .with_class(
            UmlClass::new("i", "Invoice")
                .with_attribute(UmlAttribute::new("number", "string"))
                .with_attribute(UmlAttribute::new("lines", "int"))
                .with_attribute(UmlAttribute::new("amount", "BigDecimal"))
                .with_attribute(UmlAttribute::new("settled", "boolean"))
                .with_attribute(UmlAttribute::new("issuedAt", "LocalDateTime"))
                .with_attribute(UmlAttribute::new("currency", "Currency")),
        )
        .with_relation(
            UmlRelation::new("r", "c", "i", RelationKind::Association).with_multiplicity("1", "*"),
        )
}

fn invoice_model() -> DartModel {
    let diagram = invoice_diagram();
    let settings = ProjectSettings::new("billing", "com.example", GeneratorConfig::default());
    let mut diagnostics = Diagnostics::new();
    let model = ProjectModel::build(&diagram, settings, &mut diagnostics);
    DartModel::from_shape(model.shape("i").unwrap())
}

fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
    (1..=9999i32, 1..=12u32, 1..=28u32, 0..24u32, 0..60u32, 0..60u32, 0..1_000_000u32).prop_map(
        |(y, mo, d, h, mi, s, micros)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .and_then(|date| date.and_hms_micro_opt(h, mi, s, micros))
                .unwrap()
        },
    )
}

fn value_for(kind: WireKind) -> BoxedStrategy<FieldValue> {
    match kind {
        WireKind::Int => any::<i64>().prop_map(FieldValue::Int).boxed(),
        WireKind::Double => (-1.0e15f64..1.0e15f64).prop_map(FieldValue::Double).boxed(),
        WireKind::Bool => any::<bool>().prop_map(FieldValue::Bool).boxed(),
        WireKind::String => ".{0,24}".prop_map(FieldValue::String).boxed(),
        WireKind::DateTime => timestamp().prop_map(FieldValue::DateTime).boxed(),
        WireKind::Passthrough => "[A-Z]{3}"
            .prop_map(|code| FieldValue::Raw(Value::String(code)))
            .boxed(),
    }
}

/// Any instance of `model` with every field independently present or null
fn instances(model: DartModel) -> impl Strategy<Value = ModelInstance> {
    let fields: Vec<_> = model
        .fields
        .iter()
        .map(|f| (Just(f.name.clone()), prop::option::of(value_for(f.wire()))))
        .collect();
    fields.prop_map(|values| {
        values
            .into_iter()
            .fold(ModelInstance::new(), |instance, (name, value)| match value {
                Some(value) => instance.with(name, value),
                None => instance,
            })
    })
}

#[test]
fn test_model_mirrors_the_dto() {
    let model = invoice_model();
    let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "number", "lines", "amount", "settled", "issuedAt", "currency", "customerId"]
    );
}

#[test]
fn test_server_payload_decodes() {
    let model = invoice_model();
    let payload = json!({
        "id": 7,
        "number": "INV-7",
        "lines": 3,
        "amount": 120,
        "settled": false,
        "issuedAt": "2024-03-01T09:30:00",
        "currency": "EUR",
        "customerId": null,
        "links": []
    });
    let instance = decode(&model, &payload).unwrap();
    assert_eq!(instance.get("amount"), Some(&FieldValue::Double(120.0)));
    assert_eq!(instance.get("customerId"), None);
    assert_eq!(
        instance.get("issuedAt"),
        Some(&FieldValue::DateTime(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 30, 0).unwrap()
        ))
    );

    let encoded = encode(&model, &instance).unwrap();
    assert_eq!(encoded["issuedAt"], "2024-03-01T09:30:00.000");
    assert_eq!(encoded["customerId"], Value::Null);
    assert!(!encoded.contains_key("links"));
}

#[test]
fn test_wrong_kinds_are_rejected() {
    let model = invoice_model();
    let err = decode(&model, &json!({"lines": "three"})).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { expected: WireKind::Int, .. }));

    let instance = ModelInstance::new().with("amount", FieldValue::Double(f64::NAN));
    assert!(matches!(encode(&model, &instance), Err(CodecError::OutOfRange { .. })));

    let instance = ModelInstance::new().with("nickname", FieldValue::String("x".into()));
    assert!(matches!(encode(&model, &instance), Err(CodecError::UnknownField { .. })));
}

proptest! {
    #[test]
    fn prop_encode_then_decode_is_identity(instance in instances(invoice_model())) {
        let model = invoice_model();
        let wire = Value::Object(encode(&model, &instance).unwrap());
        let decoded = decode(&model, &wire).unwrap();
        prop_assert_eq!(decoded, instance);
    }
}
