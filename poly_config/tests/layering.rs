//! File and environment layering.

mod common;

use anyhow::{Context, Result};
use common::{Garrison, NESTED, PREFIX, engine};
use poly_config::{
    ConfigEngine, ConfigSource, EnvSource, FileSource, PathLexer, Schema, SchemaCatalog, Sources,
    TypeKind, Value,
};
use rstest::rstest;
use serial_test::serial;
use test_helpers::config_dir::ConfigDir;
use test_helpers::env::PrefixedEnv;
use test_helpers::jail::{figment_error, with_jail};

fn sources(file: &str) -> Sources {
    Sources::new()
        .with(FileSource::new(file))
        .with(EnvSource::prefixed(PREFIX))
}

#[rstest]
#[serial]
fn environment_overrides_file_values() -> Result<()> {
    let garrison = with_jail(|jail| {
        jail.create_file("config.yaml", NESTED)?;
        jail.set_env("XP_GARRISON_HEALTH_MULTIPLIER", "1.5");
        jail.set_env("XP_GARRISON_UNITS__MACE__DROP", "mixed");
        let result = engine()
            .load::<Garrison>(&sources("config.yaml"))
            .map_err(figment_error)?;
        result
            .value()
            .cloned()
            .ok_or_else(|| figment_error(format!("{:?}", result.errors())))
    })?;
    assert!((garrison.health_multiplier - 1.5).abs() < f64::EPSILON);
    assert_eq!(garrison.units.get("dagger").map(|unit| unit.drop.as_str()), Some("basic"));
    assert_eq!(garrison.units.get("mace").map(|unit| unit.drop.as_str()), Some("mixed"));
    Ok(())
}

#[rstest]
#[serial]
fn environment_lists_are_comma_separated() -> Result<()> {
    let node = with_jail(|jail| {
        jail.set_env("XP_GARRISON_BLOCKS", "conveyor, junction,router");
        let result = EnvSource::prefixed(PREFIX)
            .load(&PathLexer::default())
            .map_err(figment_error)?;
        result.value().cloned().ok_or_else(|| figment_error("no overlay"))
    })?;
    let engine = ConfigEngine::builder(
        SchemaCatalog::builder()
            .schema(
                Schema::builder("Blocks")
                    .field("blocks", TypeKind::set(TypeKind::String))
                    .build()?,
            )
            .build()?,
        TypeKind::record("Blocks"),
    )
    .build()?;
    let value = engine.decode_node(Some(&node));
    let blocks = value
        .value()
        .and_then(Value::as_record)
        .and_then(|record| record.get("blocks"))
        .context("decoded blocks")?;
    assert_eq!(blocks.to_string(), "[conveyor, junction, router]");
    Ok(())
}

#[rstest]
#[serial]
fn process_environment_overlay_without_jail() -> Result<()> {
    let dir = ConfigDir::new()?;
    let path = dir.write("garrison.yaml", NESTED)?;
    let _env = PrefixedEnv::new(PREFIX).set("MITOSIS", "false");
    let result = engine().load::<Garrison>(&sources(path.as_str()))?;
    let garrison = result.value().context("decoded garrison")?;
    assert!(!garrison.mitosis);
    assert!((garrison.health_multiplier - 1.2).abs() < f64::EPSILON);
    Ok(())
}
