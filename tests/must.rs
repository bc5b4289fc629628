//! Unwrapper behavior as seen from outside the crate.

use must_try::{abort_on_err, catch, must, must_nil, must_ok, raise, throw, MustExt};
use std::cell::Cell;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: String },

    #[error("Invalid config format: {0}")]
    Parse(String),
}

fn read_config(path: &str) -> (String, Option<ConfigError>) {
    match path {
        "missing.toml" => (String::new(), Some(ConfigError::NotFound { path: path.into() })),
        "invalid.toml" => (String::new(), Some(ConfigError::Parse("unexpected token".into()))),
        _ => ("config_data".into(), None),
    }
}

#[test]
fn returns_value_when_error_absent() {
    let (data, err) = read_config("app.toml");
    assert_eq!(must(data, err), "config_data");
}

#[test]
fn no_side_effects_when_error_absent() {
    let effects = Cell::new(0);
    let err = abort_on_err(|| {
        let v = must(5, None::<ConfigError>);
        effects.set(v);
    });
    assert!(err.is_none());
    assert_eq!(effects.get(), 5);
}

#[test]
fn aborts_with_exactly_the_error() {
    let err = abort_on_err(|| {
        let (data, err) = read_config("missing.toml");
        must(data, err);
    })
    .unwrap();

    assert!(err.is_passthrough());
    assert_eq!(err.message(), "Config file not found: missing.toml");
    assert_eq!(
        err.downcast::<ConfigError>().unwrap(),
        ConfigError::NotFound { path: "missing.toml".into() }
    );
}

#[test]
fn code_after_abort_never_runs() {
    let reached = Cell::new(false);
    let err = abort_on_err(|| {
        let (data, err) = read_config("invalid.toml");
        let _ = must(data, err);
        reached.set(true);
    });
    assert!(err.is_some());
    assert!(!reached.get());
}

#[test]
fn must_nil_only_aborts_on_error() {
    assert!(abort_on_err(|| must_nil(None::<ConfigError>)).is_none());

    let err = abort_on_err(|| must_nil(Some(ConfigError::Parse("eof".into())))).unwrap();
    assert_eq!(err.message(), "Invalid config format: eof");
}

#[test]
fn must_ok_and_ext_agree() {
    let a = catch(|| must_ok("12".parse::<i64>())).unwrap();
    let b = catch(|| "12".parse::<i64>().must()).unwrap();
    assert_eq!(a, b);

    let a = catch(|| must_ok("x".parse::<i64>())).unwrap_err();
    let b = catch(|| "x".parse::<i64>().must()).unwrap_err();
    assert_eq!(a.message(), b.message());
}

#[test]
fn plain_catch_unwind_recovers_the_error() {
    let payload = std::panic::catch_unwind(|| {
        must_nil(Some(ConfigError::Parse("some error".into())));
    })
    .unwrap_err();
    let err = payload.downcast::<must_try::Error>().unwrap();
    assert_eq!(err.to_string(), "Invalid config format: some error");
    assert_eq!(
        err.downcast::<ConfigError>().unwrap(),
        ConfigError::Parse("some error".into())
    );
}

#[test]
fn thrown_errors_carry_no_location() {
    let err = abort_on_err(|| throw(ConfigError::Parse("bad".into()))).unwrap();
    assert!(err.is_passthrough());
    assert!(err.location().is_none());
}

#[test]
fn raised_values_record_location() {
    let line = line!() + 1;
    let err = abort_on_err(|| raise("bad")).unwrap();
    let loc = err.location().unwrap();
    assert_eq!(loc.file(), file!());
    assert_eq!(loc.line(), line);
}

#[test]
fn uncaught_abort_keeps_unwinding() {
    let outer = std::panic::catch_unwind(|| {
        must_nil(Some(ConfigError::Parse("loose".into())));
    });
    assert!(outer.is_err());
}
