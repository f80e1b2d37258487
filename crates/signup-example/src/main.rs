//! Signup demo: a small account flow built on enact actions.
//!
//! Three actions cover the three input shapes. Each is defined once as a
//! static handle, then invoked with sample inputs so the run prints the
//! wire form of every outcome: a result, field errors, a folded failure
//! message, and a navigation signal. Run with `RUST_LOG=enact=trace` to
//! watch the pipeline log its stages.

use enact::{
    form, form_data, no_input, object, redirect, ActionError, ActionResult, FnAuthenticator,
    FormAction, HandlerResult, JsonSchema, NoInputAction, ObjectAction,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Deserialize)]
struct SignupInput {
    email: String,
    plan: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SubscribeInput {
    topic: String,
}

#[derive(Debug, Clone)]
struct Session {
    user: String,
}

static SIGNUP: Lazy<FormAction<SignupInput, Value>> = Lazy::new(|| {
    let schema = JsonSchema::new(json!({
        "type": "object",
        "properties": {
            "email": {"type": "string", "minLength": 3, "pattern": ".+@.+"},
            "plan": {"type": "string", "enum": ["free", "pro"]},
        },
        "required": ["email", "plan"],
    }))
    .expect("signup schema document is well-formed");

    form(schema)
        .name("signup")
        .authenticated(FnAuthenticator::new(|| async {
            Ok::<_, ActionError>(Session {
                user: "ada".to_string(),
            })
        }))
        .on_failure(|err| tracing::warn!(error = %err, "signup failed"))
        .handler(|input: SignupInput, session: Session| async move {
            let account = provision(&input, &session)?;
            Ok::<_, ActionError>(account)
        })
});

static SUBSCRIBE: Lazy<ObjectAction<SubscribeInput, Value>> = Lazy::new(|| {
    let schema = JsonSchema::new(json!({
        "type": "object",
        "properties": {"topic": {"type": "string", "minLength": 1}},
        "required": ["topic"],
    }))
    .expect("subscribe schema document is well-formed");

    object(schema).name("subscribe").handler(subscribe)
});

async fn subscribe(input: SubscribeInput) -> HandlerResult<Value> {
    Ok(json!({"subscribed": input.topic}))
}

static DELETE_ACCOUNT: Lazy<NoInputAction<Value>> = Lazy::new(|| {
    no_input()
        .name("delete-account")
        .authenticated(FnAuthenticator::new(|| async {
            // Nobody is signed in for this demo; deletion bounces to login.
            Err::<Session, _>(redirect("/login"))
        }))
        .handler(|session: Session| async move {
            Ok::<_, ActionError>(json!({"deleted": session.user}))
        })
});

fn provision(input: &SignupInput, session: &Session) -> anyhow::Result<Value> {
    if input.email.ends_with("@blocked.example") {
        anyhow::bail!("provider rejected {}", input.email);
    }
    Ok(json!({
        "account": input.email,
        "plan": input.plan,
        "created_by": session.user,
    }))
}

fn print_outcome<O: serde::Serialize>(
    label: &str,
    outcome: Result<ActionResult<O>, ActionError>,
) -> anyhow::Result<()> {
    println!("== {label}");
    match outcome {
        Ok(result) => println!("{}\n", serde_json::to_string_pretty(&result)?),
        Err(err) => match err.as_signal() {
            Some(signal) => println!("-> navigate to {}\n", signal.location()),
            None => return Err(err.into()),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A valid form submission: typed input plus the session principal.
    print_outcome(
        "signup, valid input",
        SIGNUP
            .invoke(form_data! { "email" => "ada@example.com", "plan" => "pro" })
            .await,
    )?;

    // Validation rejects before the handler or the authenticator runs.
    print_outcome(
        "signup, rejected input",
        SIGNUP
            .invoke(form_data! { "email" => "x", "plan" => "gold" })
            .await,
    )?;

    // The schema accepts this one; the handler's failure folds to a message.
    print_outcome(
        "signup, provider failure",
        SIGNUP
            .invoke(form_data! { "email" => "ada@blocked.example", "plan" => "free" })
            .await,
    )?;

    // Plain-object shape: the value is validated as-is.
    print_outcome(
        "subscribe",
        SUBSCRIBE.invoke(json!({"topic": "weekly"})).await,
    )?;

    // Principal resolution raises a navigation signal; it escapes unfolded.
    print_outcome("delete account", DELETE_ACCOUNT.invoke().await)?;

    Ok(())
}
