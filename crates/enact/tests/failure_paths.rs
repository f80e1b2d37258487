use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use enact::{
    form_data, no_input, object, redirect, ActionError, FieldErrors, FnAuthenticator, JsonSchema,
    NavigationSignal,
};
use serde_json::{json, Value};

fn open_schema() -> JsonSchema<Value> {
    JsonSchema::new(json!({
        "type": "object",
        "properties": {"n": {"type": "integer"}},
        "required": ["n"],
    }))
    .unwrap()
}

#[derive(Debug, Clone)]
struct Session;

#[tokio::test]
async fn test_validation_failure_skips_handler_and_resolver() {
    let handler_calls = Arc::new(AtomicUsize::new(0));
    let resolver_calls = Arc::new(AtomicUsize::new(0));

    let resolver_count = Arc::clone(&resolver_calls);
    let handler_count = Arc::clone(&handler_calls);
    let action = object(open_schema())
        .authenticated(FnAuthenticator::new(move || {
            resolver_count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok::<_, ActionError>(Session))
        }))
        .handler(move |input: Value, _session: Session| {
            handler_count.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, ActionError>(input) }
        });

    let result = action.invoke(json!({"n": "not a number"})).await.unwrap();

    assert!(result.is_invalid());
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
    assert_eq!(resolver_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_deserialization_failure_after_acceptance_skips_handler() {
    #[derive(serde::Deserialize)]
    struct Narrow {
        age: u8,
    }
    let schema: JsonSchema<Narrow> = JsonSchema::new(json!({
        "type": "object",
        "properties": {"age": {"type": "number"}},
        "required": ["age"],
    }))
    .unwrap();

    let handler_calls = Arc::new(AtomicUsize::new(0));
    let handler_count = Arc::clone(&handler_calls);
    let action = object(schema).handler(move |input: Narrow| {
        handler_count.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, ActionError>(json!({"age": input.age})) }
    });

    // 300 satisfies the schema's "number" but not the handler's input type.
    let result = action.invoke(json!({"age": 300})).await.unwrap();

    assert!(result.is_invalid());
    let errors = result.field_errors().unwrap();
    assert!(errors.get(FieldErrors::ROOT).is_some(), "got: {errors:?}");
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_handler_error_folds_to_verbatim_message() {
    let action = object(open_schema()).handler(|_input: Value| async {
        Err::<Value, _>(ActionError::message("boom badly"))
    });

    let result = action.invoke(json!({"n": 1})).await.unwrap();

    assert!(result.is_failed());
    assert_eq!(result.message(), Some("boom badly"));
    let wire = serde_json::to_value(&result).unwrap();
    assert_eq!(wire, json!({"error": {"message": "boom badly"}}));
}

#[tokio::test]
async fn test_anyhow_handler_error_folds_to_message() {
    let action = object(open_schema())
        .handler(|_input: Value| async { Err::<Value, _>(anyhow::anyhow!("downstream failed")) });

    let result = action.invoke(json!({"n": 1})).await.unwrap();

    assert!(result.is_failed());
    assert_eq!(result.message(), Some("downstream failed"));
}

#[tokio::test]
async fn test_handler_panic_folds_to_message() {
    async fn faulty() -> Result<Value, ActionError> {
        panic!("handler fault")
    }
    let action = object(open_schema()).handler(|_input: Value| faulty());

    let result = action.invoke(json!({"n": 1})).await.unwrap();

    assert!(result.is_failed());
    assert_eq!(result.message(), Some("handler fault"));
}

#[tokio::test]
async fn test_panic_before_first_poll_is_still_trapped() {
    let action = object(open_schema()).handler(
        |_input: Value| -> std::future::Ready<Result<Value, ActionError>> {
            panic!("eager fault")
        },
    );

    let result = action.invoke(json!({"n": 1})).await.unwrap();
    assert!(result.is_failed());
    assert_eq!(result.message(), Some("eager fault"));
}

#[tokio::test]
async fn test_navigation_signal_from_handler_passes_through() {
    let action = object(open_schema())
        .handler(|_input: Value| async { Err::<Value, _>(redirect("/login")) });

    let err = action.invoke(json!({"n": 1})).await.unwrap_err();

    assert!(err.is_signal());
    assert_eq!(err.as_signal().map(NavigationSignal::location), Some("/login"));
}

#[tokio::test]
async fn test_navigation_signal_from_resolver_passes_through() {
    let handler_calls = Arc::new(AtomicUsize::new(0));

    let handler_count = Arc::clone(&handler_calls);
    let action = object(open_schema())
        .authenticated(FnAuthenticator::new(|| {
            std::future::ready(Err::<Session, _>(redirect("/login")))
        }))
        .handler(move |input: Value, _session: Session| {
            handler_count.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, ActionError>(input) }
        });

    let err = action.invoke(json!({"n": 1})).await.unwrap_err();

    assert!(err.is_signal());
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_signal_survives_added_context() {
    let action = object(open_schema()).handler(|_input: Value| async {
        let err = anyhow::Error::new(NavigationSignal::new("/next")).context("while saving");
        Err::<Value, _>(ActionError::from(err))
    });

    let err = action.invoke(json!({"n": 1})).await.unwrap_err();

    assert_eq!(err.as_signal().map(NavigationSignal::location), Some("/next"));
    assert!(err.to_string().contains("while saving"), "got: {err}");
}

#[tokio::test]
async fn test_resolver_failure_folds_when_not_a_signal() {
    let handler_calls = Arc::new(AtomicUsize::new(0));
    let observed = Arc::new(Mutex::new(Vec::new()));

    let handler_count = Arc::clone(&handler_calls);
    let observer_log = Arc::clone(&observed);
    let action = no_input()
        .authenticated(FnAuthenticator::new(|| {
            std::future::ready(Err::<Session, _>(ActionError::message("no session")))
        }))
        .on_failure(move |err| observer_log.lock().unwrap().push(err.to_string()))
        .handler(move |_session: Session| {
            handler_count.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ActionError>(json!({})) }
        });

    let result = action.invoke().await.unwrap();

    assert_eq!(result.message(), Some("no session"));
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
    assert_eq!(*observed.lock().unwrap(), ["no session"]);
}

#[tokio::test]
async fn test_observer_sees_every_folded_failure() {
    let observed = Arc::new(Mutex::new(Vec::new()));

    let observer_log = Arc::clone(&observed);
    let action = object(open_schema())
        .on_failure(move |err| observer_log.lock().unwrap().push(err.to_string()))
        .handler(|input: Value| async move {
            Err::<Value, _>(ActionError::message(format!("rejected {}", input["n"])))
        });

    action.invoke(json!({"n": 1})).await.unwrap();
    action.invoke(json!({"n": 2})).await.unwrap();

    assert_eq!(*observed.lock().unwrap(), ["rejected 1", "rejected 2"]);
}

#[tokio::test]
async fn test_observer_skipped_for_validation_and_signals() {
    let observer_calls = Arc::new(AtomicUsize::new(0));

    let observer_count = Arc::clone(&observer_calls);
    let action = object(open_schema())
        .on_failure(move |_err| {
            observer_count.fetch_add(1, Ordering::SeqCst);
        })
        .handler(|_input: Value| async { Err::<Value, _>(redirect("/away")) });

    let invalid = action.invoke(json!({})).await.unwrap();
    assert!(invalid.is_invalid());

    let err = action.invoke(json!({"n": 1})).await.unwrap_err();
    assert!(err.is_signal());

    assert_eq!(observer_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_observer_panic_reaches_the_caller() {
    let action = object(open_schema())
        .on_failure(|_err| panic!("observer exploded"))
        .handler(|_input: Value| async { Err::<Value, _>(ActionError::message("boom")) });

    let join = tokio::spawn(async move { action.invoke(json!({"n": 1})).await });

    let err = join.await.unwrap_err();
    assert!(err.is_panic());
}

#[tokio::test]
async fn test_repeat_invocations_are_independent() {
    let action = object(open_schema())
        .handler(|input: Value| async move { Ok::<_, ActionError>(input["n"].clone()) });

    let first = action.invoke(json!({"n": 7})).await.unwrap();
    let second = action.invoke(json!({"n": 7})).await.unwrap();
    assert_eq!(first, second);

    let failing = object(open_schema())
        .handler(|_input: Value| async { Err::<Value, _>(ActionError::message("always")) });
    let first = failing.invoke(json!({"n": 7})).await.unwrap();
    let second = failing.invoke(json!({"n": 7})).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_form_validation_failure_reports_fields() {
    let schema: JsonSchema<Value> = JsonSchema::new(json!({
        "type": "object",
        "properties": {"email": {"type": "string", "minLength": 3}},
        "required": ["email"],
    }))
    .unwrap();
    let action = enact::form(schema)
        .handler(|input: Value| async move { Ok::<_, ActionError>(input) });

    let result = action.invoke(form_data! { "email" => "x" }).await.unwrap();

    assert!(result.is_invalid());
    let errors = result.field_errors().unwrap();
    assert!(errors.get("email").is_some(), "got: {errors:?}");
}
