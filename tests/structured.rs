//! Integration tests for structured error construction, display, field
//! flattening and JSON serialization.

use std::{error::Error, sync::Arc, thread};

use erreur::{
    ContextField, FieldValue, PlainError, ResultExt, Structured, erreur, fields, find_structured,
    is_structured_chain, log_field, structure, wrap,
};

#[derive(Debug, thiserror::Error)]
#[error("request failed")]
struct RequestError {
    #[source]
    source: Structured,
}

#[derive(Debug, thiserror::Error)]
#[error("transport failed")]
struct TransportError {
    #[source]
    source: RequestError,
}

#[derive(Debug, thiserror::Error)]
#[error("bare failure")]
struct BareError;

#[test]
fn test_structure_keeps_cause_and_message() {
    let cause = Structured::new("disk full", []);
    let err = Structured::structure(cause.clone(), fields!["volume" => "/data"]);

    let inner = err.cause().unwrap().downcast_ref::<Structured>().unwrap();
    assert!(inner.ptr_eq(&cause));
    assert_eq!(err.to_string(), cause.to_string());
    assert_eq!(err.message(), None);
}

#[test]
fn test_structure_of_foreign_error_passes_display_through() {
    let err = Structured::structure(BareError, fields!["attempt" => 2]);
    assert_eq!(err.to_string(), "bare failure");
    assert!(err.cause().unwrap().is::<BareError>());
}

#[test]
fn test_none_propagates() {
    assert!(structure(None::<PlainError>, fields!["k" => 1]).is_none());
    assert!(wrap(None::<PlainError>, "m", fields!["k" => 1]).is_none());
}

#[test]
fn test_result_ext_propagates_ok() {
    let ok: Result<&str, BareError> = Ok("fine");
    assert_eq!(ok.wrap_err("unused", []).unwrap(), "fine");

    let ok: Result<&str, BareError> = Ok("fine");
    assert_eq!(ok.structure_err([]).unwrap(), "fine");
}

#[test]
fn test_new_display() {
    assert_eq!(Structured::new("m", []).to_string(), "m");
}

#[test]
fn test_wrap_display() {
    let err = Structured::wrap(Structured::new("inner", []), "outer", []);
    assert_eq!(err.to_string(), "outer: inner");
}

#[test]
fn test_double_wrap_display() {
    let err = Structured::wrap(
        Structured::wrap(Structured::new("a", []), "b", []),
        "c",
        [],
    );
    assert_eq!(err.to_string(), "c: b: a");
}

#[test]
fn test_json_shape() {
    let err = Structured::new("m", fields!["code" => 1234, "addr" => "x"]);
    assert_eq!(err.json(), r#"{"msg":"m","code":1234,"addr":"x"}"#);
}

#[test]
fn test_nested_json_keeps_levels_apart() {
    let err = Structured::wrap(
        Structured::wrap(PlainError::from_static("inner"), "mid", fields!["f" => "1"]),
        "outer",
        fields!["g" => "2"],
    );
    assert_eq!(
        err.json(),
        r#"{"msg":"outer","g":"2","cause":{"msg":"mid","f":"1"}}"#
    );
}

#[test]
fn test_key_collisions_do_not_clobber() {
    let err = Structured::wrap(
        Structured::new("inner", fields!["id" => 1]),
        "outer",
        fields!["id" => 2],
    );
    let value: serde_json::Value = serde_json::from_str(&err.json()).unwrap();
    assert_eq!(value["id"], 2);
    assert_eq!(value["cause"]["id"], 1);
}

#[test]
fn test_duplicate_keys_on_one_node_are_both_written() {
    let err = Structured::new("m", fields!["k" => 1, "k" => 2]);
    assert_eq!(err.json(), r#"{"msg":"m","k":1,"k":2}"#);
}

#[test]
fn test_annotated_headline_is_single_level() {
    let inner = Structured::wrap(PlainError::from_static("leaf"), "mid", fields!["a" => 1]);
    let err = Structured::structure(inner, fields!["b" => 2]);

    // An annotated node borrows its cause's display string as its headline.
    assert_eq!(err.to_string(), "mid: leaf");
    assert_eq!(err.headline(), "mid: leaf");
    assert_eq!(
        err.json(),
        r#"{"msg":"mid: leaf","b":2,"cause":{"msg":"mid","a":1}}"#
    );
}

#[test]
fn test_all_field_kinds() {
    let nested = Structured::new("nested", []);
    let err = Structured::new(
        "kinds",
        [
            ContextField::string("s", "text"),
            ContextField::int("i", -7),
            ContextField::uint("u", u64::MAX),
            ContextField::float("f", 1.5),
            ContextField::bool("b", true),
            ContextField::object("o", nested),
            ContextField::skip(),
            ContextField::error("e", &BareError),
        ],
    );
    assert_eq!(
        err.json(),
        r#"{"msg":"kinds","s":"text","i":-7,"u":18446744073709551615,"f":1.5,"b":true,"o":{"msg":"nested"},"e":"bare failure"}"#
    );
}

#[test]
fn test_serde_serialize_matches_json() {
    let err = erreur!("m", "code" => 7);
    assert_eq!(serde_json::to_string(&err).unwrap(), err.json());
    assert_eq!(String::from_utf8(err.json_bytes()).unwrap(), err.json());
}

#[test]
fn test_find_structured_through_foreign_chain() {
    let err = TransportError {
        source: RequestError {
            source: Structured::new("refused", fields!["port" => 443]),
        },
    };
    let found = find_structured(&err).unwrap();
    assert_eq!(found.headline(), "refused");
    assert!(is_structured_chain(&err));
}

#[test]
fn test_find_structured_without_structured_ancestor() {
    assert!(find_structured(&BareError).is_none());
    assert!(!is_structured_chain(&BareError));
}

#[test]
fn test_foreign_cause_with_structured_ancestor_nests_it() {
    let foreign = RequestError {
        source: Structured::wrap(
            Structured::new("deepest", fields!["d" => 0]),
            "deep",
            fields!["depth" => 1],
        ),
    };
    let err = Structured::wrap(foreign, "top", fields!["depth" => 0]);

    assert_eq!(err.to_string(), "top: request failed");
    assert_eq!(
        err.json(),
        r#"{"msg":"top","depth":0,"cause":{"msg":"deep","depth":1,"cause":{"msg":"deepest","d":0}}}"#
    );
}

#[test]
fn test_foreign_cause_without_structure_has_no_cause_field() {
    let err = Structured::wrap(BareError, "top", fields!["k" => "v"]);
    assert_eq!(err.json(), r#"{"msg":"top","k":"v"}"#);
    assert_eq!(err.to_string(), "top: bare failure");
}

#[test]
fn test_log_field_none_contributes_nothing() {
    let field = log_field::<Structured>(None);
    assert!(field.is_skip());

    let err = Structured::new("m", [field]);
    assert_eq!(err.json(), r#"{"msg":"m"}"#);
}

#[test]
fn test_log_field_finds_structured_in_foreign_chain() {
    let err = RequestError {
        source: Structured::new("refused", []),
    };
    let field = log_field(Some(&err));
    assert_eq!(field.key(), "error");
    match field.value() {
        FieldValue::Object(found) => assert_eq!(found.headline(), "refused"),
        other => panic!("expected an object field, got {other:?}"),
    }
}

#[test]
fn test_log_field_foreign_falls_back_to_text() {
    let field = log_field(Some(&BareError));
    let err = Structured::new("m", [field]);
    assert_eq!(err.json(), r#"{"msg":"m","error":"bare failure"}"#);
}

#[test]
fn test_serialization_is_stable() {
    let err = Structured::wrap(
        Structured::new("inner", fields!["z" => 1, "a" => 2, "m" => 3]),
        "outer",
        fields!["y" => true, "b" => false],
    );
    let first = err.json();
    for _ in 0..10 {
        assert_eq!(err.json(), first);
    }
    let keys: Vec<_> = err.fields().iter().map(|f| f.key().to_owned()).collect();
    assert_eq!(keys, ["y", "b", "cause"]);
}

#[test]
fn test_concurrent_serialization() {
    let err = Arc::new(Structured::wrap(
        Structured::new("inner", fields!["n" => 1]),
        "outer",
        fields!["m" => 2],
    ));
    let expected = err.json();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let err = Arc::clone(&err);
            thread::spawn(move || err.json())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_wrap_boxed_error() {
    let boxed: Box<dyn Error + Send + Sync> = "parse failure".into();
    let err = Structured::wrap_boxed(boxed, "config invalid", fields!["line" => 3]);
    assert_eq!(err.to_string(), "config invalid: parse failure");
    assert_eq!(err.json(), r#"{"msg":"config invalid","line":3}"#);

    let boxed: Box<dyn Error + Send + Sync> = Box::new(Structured::new("inner", []));
    let err = Structured::structure_boxed(boxed, []);
    assert_eq!(err.json(), r#"{"msg":"inner","cause":{"msg":"inner"}}"#);
}

#[test]
fn test_source_is_cause() {
    let err = Structured::wrap(BareError, "outer", []);
    assert!(err.source().unwrap().is::<BareError>());
    assert!(Structured::new("leaf", []).source().is_none());
}

#[test]
fn test_wrap_err_with_is_lazy_on_error_only() {
    let mut calls = 0;
    let result: Result<(), BareError> = Err(BareError);
    let err = result
        .wrap_err_with(|| {
            calls += 1;
            ("loading failed", fields!["calls" => 1])
        })
        .unwrap_err();
    assert_eq!(calls, 1);
    assert_eq!(err.json(), r#"{"msg":"loading failed","calls":1}"#);
}

#[test]
fn test_associated_find_through_foreign_chain() {
    let err = TransportError {
        source: RequestError {
            source: Structured::new("refused", fields!["port" => 443]),
        },
    };
    let found = Structured::find(&err).unwrap();
    assert_eq!(found.json(), r#"{"msg":"refused","port":443}"#);
    assert!(Structured::find(&BareError).is_none());
}

#[test]
fn test_structure_of_foreign_wrapper_nests_its_structured_source() {
    let foreign = RequestError {
        source: Structured::new("in", fields!["a" => 1]),
    };
    let err = Structured::structure(foreign, fields!["b" => 2]);
    assert_eq!(err.json(), r#"{"msg":"request failed","b":2,"cause":{"msg":"in","a":1}}"#);
}

#[test]
fn test_deep_chain() {
    let mut err = Structured::new("level 0", []);
    for depth in 1..200 {
        err = Structured::wrap(err, "level", fields!["depth" => depth]);
    }
    assert!(err.to_string().ends_with("level: level 0"));
    assert_eq!(err.to_string().matches(": ").count(), 199);

    let value: serde_json::Value = serde_json::from_str(&err.json()).unwrap();
    assert_eq!(value["depth"], 199);
    assert_eq!(value["cause"]["depth"], 198);
}
