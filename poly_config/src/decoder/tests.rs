//! Unit tests for decoder dispatch, binding and variant resolution.

use std::collections::BTreeSet;

use anyhow::{Context, Result, ensure};
use rstest::{fixture, rstest};

use super::*;
use crate::error::{ErrorKind, SetupError, ValidationError, ValidationLevel};
use crate::node::ConfigNode;
use crate::schema::{Component, Schema, SchemaCatalog, VariantRegistry};
use crate::value::{RecordValue, Value};

struct Items(BTreeSet<&'static str>);

impl IdentifierCatalog for Items {
    fn kind(&self) -> &str {
        "item"
    }

    fn resolve(&self, text: &str) -> Option<String> {
        let wanted = text.to_ascii_lowercase();
        self.0.contains(wanted.as_str()).then_some(wanted)
    }
}

fn positive_amount(record: &RecordValue) -> Result<(), String> {
    match record.get("amount") {
        Some(Value::Integer(amount)) if *amount >= 1 => Ok(()),
        other => Err(format!("amount is lower than one: {}", other.map_or_else(String::new, Value::to_string))),
    }
}

fn non_empty_items(record: &RecordValue) -> Result<(), String> {
    match record.get("items") {
        Some(Value::List(items)) if !items.is_empty() => Ok(()),
        _ => Err("the drop list is empty".to_owned()),
    }
}

#[fixture]
fn catalog() -> SchemaCatalog {
    SchemaCatalog::builder()
        .schema(
            Schema::builder("SimpleDrop")
                .field("item", TypeKind::identifier("item"))
                .field("amount", TypeKind::Integer)
                .check(positive_amount)
                .build()
                .expect("valid schema"),
        )
        .schema(
            Schema::builder("RandomDrop")
                .field("items", TypeKind::list(TypeKind::union("TowerDrop")))
                .check(non_empty_items)
                .build()
                .expect("valid schema"),
        )
        .schema(
            Schema::builder("Settings")
                .component(Component::new("health_multiplier", TypeKind::Float).with_default("1.03"))
                .component(Component::new("mitosis", TypeKind::Bool).with_default("true"))
                .field("drop", TypeKind::String)
                .component(Component::optional("buildable_on_path", TypeKind::set(TypeKind::String)))
                .component(Component::new("label", TypeKind::String).nullable())
                .build()
                .expect("valid schema"),
        )
        .union(
            VariantRegistry::builder("TowerDrop")
                .variant("simple", "SimpleDrop")
                .variant("random", "RandomDrop")
                .default_variant("simple")
                .build()
                .expect("valid registry"),
        )
        .build()
        .expect("valid catalog")
}

#[fixture]
fn registry() -> DecoderRegistry {
    DecoderRegistry::with_defaults().with(IdentifierDecoder::new(Items(
        ["copper", "lead", "silicon"].into_iter().collect(),
    )))
}

fn map(entries: Vec<(&str, ConfigNode)>) -> ConfigNode {
    ConfigNode::map(entries).expect("unique keys")
}

fn leaf(text: &str) -> ConfigNode {
    ConfigNode::leaf(text)
}

fn kinds(result: &DecodeResult<Value>) -> Vec<&ErrorKind> {
    result.errors().iter().map(ValidationError::kind).collect()
}

struct Shouting;

impl Decoder for Shouting {
    fn name(&self) -> &str {
        "Shouting"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::String)
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        _: &TypeKind,
        _: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        match expect_leaf(node) {
            Ok(text) => DecodeResult::ok(Value::String(text.to_uppercase())),
            Err(kind) => DecodeResult::failed(path, kind, self.name()),
        }
    }
}

#[rstest]
fn higher_priority_decoder_wins(catalog: SchemaCatalog) {
    let registry = DecoderRegistry::with_defaults().with(Shouting);
    let ctx = DecoderContext::new(&registry, &catalog);
    let result = ctx.decode(&CanonicalPath::root(), Some(&leaf("copper")), &TypeKind::String);
    assert_eq!(result.value(), Some(&Value::String("COPPER".into())));
}

#[rstest]
fn equal_priority_decoders_are_a_setup_error(catalog: SchemaCatalog) {
    let registry = DecoderRegistry::with_defaults().with(StringDecoder);
    let err = registry
        .validate(&catalog, &TypeKind::record("Settings"))
        .expect_err("two string decoders");
    assert_eq!(
        err,
        SetupError::AmbiguousDecoders {
            type_name: "string".into(),
            first: "String".into(),
            second: "String".into(),
        }
    );
}

#[rstest]
fn unhandled_type_is_a_setup_error(catalog: SchemaCatalog) {
    let err = DecoderRegistry::with_defaults()
        .validate(&catalog, &TypeKind::union("TowerDrop"))
        .expect_err("no item decoder");
    assert_eq!(
        err,
        SetupError::NoDecoder {
            type_name: "item identifier".into()
        }
    );
}

#[rstest]
#[case(TypeKind::Bool, "TRUE", Value::Bool(true))]
#[case(TypeKind::Bool, " false ", Value::Bool(false))]
#[case(TypeKind::Integer, "50", Value::Integer(50))]
#[case(TypeKind::Integer, "-3", Value::Integer(-3))]
#[case(TypeKind::Float, "1.03", Value::Float(1.03))]
#[case(TypeKind::Float, "2", Value::Float(2.0))]
#[case(TypeKind::String, " spaced ", Value::String(" spaced ".into()))]
fn decodes_scalars(
    catalog: SchemaCatalog,
    registry: DecoderRegistry,
    #[case] ty: TypeKind,
    #[case] text: &str,
    #[case] expected: Value,
) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let result = ctx.decode(&CanonicalPath::root(), Some(&leaf(text)), &ty);
    assert_eq!(result.value(), Some(&expected));
    assert!(result.errors().is_empty());
}

#[rstest]
#[case(TypeKind::Bool, "yes")]
#[case(TypeKind::Integer, "1.5")]
#[case(TypeKind::Float, "fast")]
#[case(TypeKind::Float, "NaN")]
fn rejects_unparsable_scalars(
    catalog: SchemaCatalog,
    registry: DecoderRegistry,
    #[case] ty: TypeKind,
    #[case] text: &str,
) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let result = ctx.decode(&CanonicalPath::parse("value"), Some(&leaf(text)), &ty);
    assert!(!result.has_value());
    assert!(matches!(kinds(&result).as_slice(), [ErrorKind::InvalidValue { .. }]));
}

#[rstest]
#[case("1", true)]
#[case("4294967295", true)]
#[case("0", false)]
#[case("5000000000", false)]
fn bounded_integers_report_their_range(
    catalog: SchemaCatalog,
    registry: DecoderRegistry,
    #[case] text: &str,
    #[case] accepted: bool,
) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let ty = TypeKind::integer_in(1, u32::MAX.into());
    let path = CanonicalPath::parse("drops.basic").index(0).key("amount");
    let result = ctx.decode(&path, Some(&leaf(text)), &ty);
    assert_eq!(result.has_value(), accepted);
    if !accepted {
        assert!(matches!(
            kinds(&result).as_slice(),
            [ErrorKind::OutOfRange { min: 1, max: 4_294_967_295, .. }]
        ));
        assert_eq!(result.errors()[0].path(), &path);
    }
}

#[rstest]
fn scalar_decoders_reject_mappings(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("a", leaf("1"))]);
    let result = ctx.decode(&CanonicalPath::root(), Some(&node), &TypeKind::Integer);
    assert_eq!(
        kinds(&result),
        [&ErrorKind::Structural {
            expected: "leaf",
            found: "mapping"
        }]
    );
}

#[rstest]
#[case("conveyor, junction", 2)]
#[case("conveyor", 1)]
#[case("   ", 0)]
fn leaves_decode_as_comma_separated_lists(
    catalog: SchemaCatalog,
    registry: DecoderRegistry,
    #[case] text: &str,
    #[case] expected: usize,
) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let result = ctx.decode(
        &CanonicalPath::root(),
        Some(&leaf(text)),
        &TypeKind::list(TypeKind::String),
    );
    match result.value() {
        Some(Value::List(items)) => assert_eq!(items.len(), expected),
        other => panic!("expected a list, got {other:?}"),
    }
}

#[rstest]
fn list_collects_every_bad_element(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = ConfigNode::array(vec![leaf("1"), leaf("two"), leaf("3"), leaf("four")]);
    let result = ctx.decode(
        &CanonicalPath::parse("amounts"),
        Some(&node),
        &TypeKind::list(TypeKind::Integer),
    );
    assert!(!result.has_value());
    let paths: Vec<String> = result.errors().iter().map(|e| e.path().to_string()).collect();
    assert_eq!(paths, ["amounts[1]", "amounts[3]"]);
}

#[rstest]
fn set_rejects_duplicates(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = ConfigNode::array(vec![leaf("conveyor"), leaf("junction"), leaf("conveyor")]);
    let result = ctx.decode(
        &CanonicalPath::parse("blocks"),
        Some(&node),
        &TypeKind::set(TypeKind::String),
    );
    assert!(!result.has_value());
    assert_eq!(result.errors()[0].path().to_string(), "blocks[2]");
    assert_eq!(
        result.errors()[0].kind(),
        &ErrorKind::DuplicateValue {
            value: "conveyor".into()
        }
    );
}

#[rstest]
fn map_keys_decode_through_key_type(catalog: SchemaCatalog, registry: DecoderRegistry) -> Result<()> {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("copper", leaf("3")), ("tin", leaf("4"))]);
    let result = ctx.decode(
        &CanonicalPath::parse("weights"),
        Some(&node),
        &TypeKind::map(TypeKind::identifier("item"), TypeKind::Integer),
    );
    ensure!(!result.has_value(), "unknown key must block the map");
    let error = result.errors().first().context("expected an error")?;
    ensure!(error.path().to_string() == "weights.tin", "unexpected path {}", error.path());
    ensure!(
        matches!(error.kind(), ErrorKind::UnknownIdentifier { kind, value } if kind == "item" && value == "tin"),
        "unexpected kind {:?}",
        error.kind()
    );
    Ok(())
}

#[rstest]
fn binder_reports_every_problem_in_one_pass(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("health-multiplier", leaf("fast"))]);
    let result = ctx.decode(&CanonicalPath::root(), Some(&node), &TypeKind::record("Settings"));
    assert!(!result.has_value());
    let levels: Vec<ValidationLevel> = result.errors().iter().map(ValidationError::level).collect();
    assert_eq!(
        levels,
        [
            ValidationLevel::Error,
            ValidationLevel::MissingOptionalValueUsingDefault,
            ValidationLevel::MissingRequiredValue,
            ValidationLevel::MissingOptionalValueUsingDefault,
            ValidationLevel::MissingOptionalValueUsingDefault,
        ]
    );
}

#[rstest]
fn binder_applies_defaults_and_empty_states(catalog: SchemaCatalog, registry: DecoderRegistry) -> Result<()> {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("drop", leaf("basic"))]);
    let result = ctx.decode(&CanonicalPath::root(), Some(&node), &TypeKind::record("Settings"));
    let record = result
        .value()
        .and_then(Value::as_record)
        .context("settings should bind")?;
    ensure!(record.get("health_multiplier") == Some(&Value::Float(1.03)));
    ensure!(record.get("mitosis") == Some(&Value::Bool(true)));
    ensure!(record.get("buildable_on_path") == Some(&Value::Null));
    ensure!(record.get("label") == Some(&Value::Null));
    ensure!(!result.has_blocking_errors());
    ensure!(result.errors().len() == 4, "got {:?}", result.errors());
    Ok(())
}

#[rstest]
fn binder_requires_a_mapping(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let result = ctx.decode(
        &CanonicalPath::root(),
        Some(&ConfigNode::array(vec![])),
        &TypeKind::record("Settings"),
    );
    assert_eq!(
        kinds(&result),
        [&ErrorKind::Structural {
            expected: "mapping",
            found: "sequence"
        }]
    );
}

#[rstest]
fn resolver_uses_default_variant(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("item", leaf("Copper")), ("amount", leaf("50"))]);
    let result = ctx.decode(&CanonicalPath::root(), Some(&node), &TypeKind::union("TowerDrop"));
    match result.value() {
        Some(Value::Variant { tag, record, .. }) => {
            assert_eq!(tag, "simple");
            assert_eq!(record.get("amount"), Some(&Value::Integer(50)));
            assert_eq!(record.get("item").and_then(Value::as_str), Some("copper"));
        }
        other => panic!("expected a variant, got {other:?}"),
    }
}

#[rstest]
#[case("weighted")]
#[case("  ")]
#[case("Simple")]
fn resolver_rejects_unregistered_discriminators(
    catalog: SchemaCatalog,
    registry: DecoderRegistry,
    #[case] tag: &str,
) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("type", leaf(tag)), ("item", leaf("copper")), ("amount", leaf("1"))]);
    let result = ctx.decode(
        &CanonicalPath::parse("drops.basic").index(0),
        Some(&node),
        &TypeKind::union("TowerDrop"),
    );
    assert!(!result.has_value());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].path().to_string(), "drops.basic[0].type");
    assert!(matches!(
        result.errors()[0].kind(),
        ErrorKind::InvalidVariantDiscriminator { union, .. } if union == "TowerDrop"
    ));
}

#[rstest]
fn resolver_rejects_structured_discriminator(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("type", ConfigNode::array(vec![leaf("simple")]))]);
    let result = ctx.decode(&CanonicalPath::root(), Some(&node), &TypeKind::union("TowerDrop"));
    assert_eq!(
        kinds(&result),
        [&ErrorKind::Structural {
            expected: "leaf",
            found: "sequence"
        }]
    );
}

#[rstest]
fn construction_checks_follow_structural_success(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![("type", leaf("random")), ("items", ConfigNode::array(vec![]))]);
    let result = ctx.decode(&CanonicalPath::parse("drops.x").index(0), Some(&node), &TypeKind::union("TowerDrop"));
    assert!(!result.has_value());
    assert_eq!(
        kinds(&result),
        [&ErrorKind::Construction {
            message: "the drop list is empty".into()
        }]
    );
    assert_eq!(result.errors()[0].raised_by(), "RandomDrop");
}

#[rstest]
fn nested_variants_resolve_recursively(catalog: SchemaCatalog, registry: DecoderRegistry) {
    let ctx = DecoderContext::new(&registry, &catalog);
    let node = map(vec![
        ("type", leaf("random")),
        (
            "items",
            ConfigNode::array(vec![
                map(vec![("item", leaf("lead")), ("amount", leaf("2"))]),
                map(vec![("item", leaf("unobtainium")), ("amount", leaf("0"))]),
            ]),
        ),
    ]);
    let result = ctx.decode(&CanonicalPath::root(), Some(&node), &TypeKind::union("TowerDrop"));
    assert!(!result.has_value());
    let paths: Vec<String> = result.errors().iter().map(|e| e.path().to_string()).collect();
    assert_eq!(paths, ["items[1].item"]);
}
