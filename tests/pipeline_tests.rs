mod common;

use common::{responses, tokens};
use fsrouter::controller::{
    run, Controller, ControllerOptions, ControllerRoute, ControllerState, AUTH_PROVIDER_MISSING_MESSAGE,
    INVALID_JSON_MESSAGE,
};
use fsrouter::deferred::Deferred;
use fsrouter::error::{FieldError, ResponseError};
use fsrouter::router::RouteHandler;
use fsrouter::schema::{
    FnSchema, Issue, JsonSchemaValidator, PathSegment, StandardProps, StandardSchema, ValidationResult,
    ADAPTER_CONTRACT_MESSAGE, NONCONFORMING_RESULT_MESSAGE,
};
use fsrouter::security::{BearerJwtProvider, Session, SessionProvider};
use fsrouter::server::{HandlerRequest, HandlerResponse, HeaderVec};
use futures::future::BoxFuture;
use futures::FutureExt;
use http::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Reports everything the pipeline exposed to user logic.
struct Inspect;

impl Controller for Inspect {
    type Body = Value;

    fn handle<'a>(&'a self, state: &'a ControllerState<Value>) -> BoxFuture<'a, anyhow::Result<HandlerResponse>> {
        async move {
            Ok(HandlerResponse::ok_json(json!({
                "params": state.params(),
                "session": state.session().map(|s| s.session.clone()),
                "user": state.user(),
                "body": state.body(),
            })))
        }
        .boxed()
    }
}

#[derive(Debug, Deserialize)]
struct NewUser {
    username: String,
    #[serde(default)]
    password: Option<String>,
}

/// Rejects reserved usernames and short passwords after the schema passed.
struct CreateUser;

impl Controller for CreateUser {
    type Body = NewUser;

    fn validate(&self, body: &NewUser) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if body.username == "admin" {
            errors.push(FieldError::new("username", "reserved"));
        }
        if body.password.as_deref().is_some_and(|p| p.len() < 8) {
            errors.push(FieldError::new("password", "too short"));
        }
        errors
    }

    fn handle<'a>(&'a self, state: &'a ControllerState<NewUser>) -> BoxFuture<'a, anyhow::Result<HandlerResponse>> {
        async move {
            let user = state.body().ok_or_else(ResponseError::validation)?;
            Ok(HandlerResponse::json(
                201,
                json!({ "username": user.username, "raw": state.body_value() }),
            ))
        }
        .boxed()
    }
}

enum Failure {
    Typed,
    Untyped,
    Panic,
}

struct Failing(Failure);

impl Controller for Failing {
    type Body = Value;

    fn handle<'a>(&'a self, _state: &'a ControllerState<Value>) -> BoxFuture<'a, anyhow::Result<HandlerResponse>> {
        async move {
            let result: anyhow::Result<HandlerResponse> = match self.0 {
                Failure::Typed => Err(ResponseError::conflict()
                    .with_message("Username taken")
                    .with_field_errors(vec![FieldError::new("username", "exists")])
                    .into()),
                Failure::Untyped => Err(anyhow::anyhow!("connection refused: db.internal:5432")),
                Failure::Panic => panic!("handler exploded"),
            };
            result
        }
        .boxed()
    }
}

fn username_schema() -> Arc<dyn StandardSchema> {
    Arc::new(
        JsonSchemaValidator::new(&json!({
            "type": "object",
            "required": ["username"],
            "properties": {
                "username": { "type": "string" },
                "password": { "type": "string" }
            }
        }))
        .unwrap(),
    )
}

struct StaticSession(Option<Session>);

impl SessionProvider for StaticSession {
    fn get_session<'a>(&'a self, _headers: &'a HeaderVec) -> Deferred<'a, Option<Session>> {
        Deferred::ready(self.0.clone())
    }
}

/// Answers after a short sleep, echoing the `x-user` header.
struct SlowSession;

impl SessionProvider for SlowSession {
    fn get_session<'a>(&'a self, headers: &'a HeaderVec) -> Deferred<'a, Option<Session>> {
        Deferred::pending(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("x-user"))
                .map(|(_, v)| Session::new(json!({ "sid": "s-1" }), json!({ "name": v })))
        })
    }
}

fn post_json(path: &str, body: &Value) -> HandlerRequest {
    HandlerRequest::new(Method::POST, path).with_json(body)
}

// Scenario A
#[tokio::test]
async fn test_missing_required_field_is_400_with_field() {
    let route = ControllerRoute::new(ControllerOptions::new().with_schema(username_schema()), || CreateUser);

    let res = route.call(post_json("/users", &json!({}))).await;
    assert_eq!(res.status, 400);
    assert_eq!(responses::message(&res), "Validation failed");
    let fields = responses::fields(&res);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field, "username");
    assert!(fields[0].message.contains("username"));
}

// Scenario B
#[tokio::test]
async fn test_malformed_uuid_param_is_404() {
    let options = ControllerOptions::new().validate_uuids(["id"]);

    let req = HandlerRequest::new(Method::GET, "/users/not-a-uuid").with_path_param("id", "not-a-uuid");
    let res = run(&Inspect, &options, req).await;
    assert_eq!(res.status, 404);
    assert_eq!(responses::message(&res), "Not found");
    assert!(res.body.get("fields").is_none());
}

#[tokio::test]
async fn test_missing_uuid_param_is_404() {
    let options = ControllerOptions::new().validate_uuids(["id", "post_id"]);

    let req = HandlerRequest::new(Method::GET, "/users/x/posts").with_path_param("id", USER_ID);
    let res = run(&Inspect, &options, req).await;
    assert_eq!(res.status, 404);
    assert!(responses::fields(&res).is_empty());
}

#[tokio::test]
async fn test_valid_uuid_params_expose_declared_keys_only() {
    let options = ControllerOptions::new().validate_uuids(["id"]);

    let req = HandlerRequest::new(Method::GET, "/users/x")
        .with_path_param("id", USER_ID)
        .with_path_param("tab", "profile");
    let res = run(&Inspect, &options, req).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["params"], json!({ "id": USER_ID }));
}

// Scenario C
#[tokio::test]
async fn test_session_is_exposed_to_user_logic() {
    let session = Session::new(json!({ "id": "sess-9", "expires": 1700 }), json!({ "id": "u-1", "role": "admin" }));
    let options = ControllerOptions::new()
        .require_auth()
        .with_auth(Arc::new(StaticSession(Some(session))));

    let res = run(&Inspect, &options, HandlerRequest::new(Method::GET, "/me")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["session"], json!({ "id": "sess-9", "expires": 1700 }));
    assert_eq!(res.body["user"], json!({ "id": "u-1", "role": "admin" }));
}

#[tokio::test]
async fn test_required_auth_without_provider_is_401() {
    let options = ControllerOptions::new().require_auth();

    for req in [
        HandlerRequest::new(Method::GET, "/me"),
        HandlerRequest::new(Method::GET, "/me").with_header("Authorization", "Bearer anything"),
        HandlerRequest::new(Method::GET, "/me").with_header("Cookie", "session=abc"),
    ] {
        let res = run(&Inspect, &options, req).await;
        assert_eq!(res.status, 401);
        assert_eq!(responses::message(&res), AUTH_PROVIDER_MISSING_MESSAGE);
    }
}

#[tokio::test]
async fn test_required_auth_without_session_is_401() {
    let options = ControllerOptions::new()
        .require_auth()
        .with_auth(Arc::new(StaticSession(None)));

    let res = run(&Inspect, &options, HandlerRequest::new(Method::GET, "/me")).await;
    assert_eq!(res.status, 401);
    assert_eq!(responses::message(&res), "Unauthorized");
}

#[tokio::test]
async fn test_optional_auth_attaches_absent_session() {
    let options = ControllerOptions::new().with_auth(Arc::new(StaticSession(None)));

    let res = run(&Inspect, &options, HandlerRequest::new(Method::GET, "/feed")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["session"], Value::Null);
    assert_eq!(res.body["user"], Value::Null);
}

#[tokio::test]
async fn test_async_session_provider_is_awaited() {
    let options = ControllerOptions::new().require_auth().with_auth(Arc::new(SlowSession));

    let req = HandlerRequest::new(Method::GET, "/me").with_header("x-user", "ada");
    let res = run(&Inspect, &options, req).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["user"], json!({ "name": "ada" }));

    let res = run(&Inspect, &options, HandlerRequest::new(Method::GET, "/me")).await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn test_bearer_provider_in_pipeline() {
    let options = ControllerOptions::new()
        .require_auth()
        .with_auth(Arc::new(BearerJwtProvider::new("sig")));

    let good = HandlerRequest::new(Method::GET, "/me")
        .with_header("Authorization", tokens::bearer(&json!({ "user": { "id": 7 } }), "sig"));
    let res = run(&Inspect, &options, good).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["user"], json!({ "id": 7 }));

    let forged = HandlerRequest::new(Method::GET, "/me")
        .with_header("Authorization", tokens::bearer(&json!({ "user": { "id": 7 } }), "nope"));
    assert_eq!(run(&Inspect, &options, forged).await.status, 401);
}

#[tokio::test]
async fn test_uuid_failure_short_circuits_authentication() {
    let options = ControllerOptions::new().validate_uuids(["id"]).require_auth();

    let req = HandlerRequest::new(Method::GET, "/users/1").with_path_param("id", "1");
    let res = run(&Inspect, &options, req).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn test_auth_failure_short_circuits_body_validation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let schema = FnSchema::new("counting", move |input: Value| {
        seen.fetch_add(1, Ordering::SeqCst);
        ValidationResult::success(input)
    });
    let options = ControllerOptions::new().require_auth().with_schema(Arc::new(schema));

    let res = run(&Inspect, &options, post_json("/users", &json!({}))).await;
    assert_eq!(res.status, 401);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_json_body_is_400() {
    let options = ControllerOptions::new().with_schema(username_schema());

    let req = HandlerRequest::new(Method::POST, "/users").with_body("{ not json");
    let res = run(&CreateUser, &options, req).await;
    assert_eq!(res.status, 400);
    assert_eq!(responses::message(&res), INVALID_JSON_MESSAGE);

    let empty = run(&CreateUser, &options, HandlerRequest::new(Method::POST, "/users")).await;
    assert_eq!(empty.status, 400);
    assert_eq!(responses::message(&empty), INVALID_JSON_MESSAGE);
}

#[tokio::test]
async fn test_every_issue_becomes_a_field_error() {
    let schema = FnSchema::new("fixed", |_input: Value| {
        ValidationResult::failure(vec![
            Issue::new("Required").at([PathSegment::from("username")]),
            Issue::new("Expected string").at([
                PathSegment::from("items"),
                PathSegment::from(0u64),
                PathSegment::from("name"),
            ]),
            Issue::new("Object is invalid"),
        ])
    });
    let options = ControllerOptions::new().with_schema(Arc::new(schema));

    let res = run(&Inspect, &options, post_json("/orders", &json!({ "items": [{}] }))).await;
    assert_eq!(res.status, 400);
    assert_eq!(
        responses::fields(&res),
        vec![
            FieldError::new("username", "Required"),
            FieldError::new("items.[0].name", "Expected string"),
            FieldError::new("", "Object is invalid"),
        ]
    );
}

#[tokio::test]
async fn test_json_schema_reports_all_issues() {
    let schema = JsonSchemaValidator::new(&json!({
        "type": "object",
        "required": ["username", "email"],
        "properties": { "age": { "type": "integer" } }
    }))
    .unwrap();
    let options = ControllerOptions::new().with_schema(Arc::new(schema));

    let res = run(&Inspect, &options, post_json("/users", &json!({ "age": "old" }))).await;
    assert_eq!(res.status, 400);
    let mut fields: Vec<String> = responses::fields(&res).into_iter().map(|f| f.field).collect();
    fields.sort();
    assert_eq!(fields, vec!["age", "email", "username"]);
}

#[tokio::test]
async fn test_schema_output_reaches_user_logic_unchanged() {
    let options = ControllerOptions::new().with_schema(username_schema());

    let body = json!({ "username": "ada", "password": "correct horse" });
    let res = run(&CreateUser, &options, post_json("/users", &body)).await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["username"], "ada");
    assert_eq!(res.body["raw"], body);
}

#[tokio::test]
async fn test_transforming_schema_output_is_the_body() {
    let schema = FnSchema::new_async("trim", |input: Value| async move {
        let name = input["username"].as_str().unwrap_or_default().trim().to_string();
        ValidationResult::success(json!({ "username": name }))
    });
    let options = ControllerOptions::new().with_schema(Arc::new(schema));

    let res = run(&CreateUser, &options, post_json("/users", &json!({ "username": "  ada  " }))).await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["username"], "ada");
    assert_eq!(res.body["raw"], json!({ "username": "ada" }));
}

#[tokio::test]
async fn test_extra_validation_errors_are_reported_together() {
    let options = ControllerOptions::new().with_schema(username_schema());

    let res = run(
        &CreateUser,
        &options,
        post_json("/users", &json!({ "username": "admin", "password": "short" })),
    )
    .await;
    assert_eq!(res.status, 400);
    assert_eq!(
        responses::fields(&res),
        vec![
            FieldError::new("username", "reserved"),
            FieldError::new("password", "too short"),
        ]
    );
}

#[tokio::test]
async fn test_extra_validation_skipped_without_schema() {
    let route = ControllerRoute::new(ControllerOptions::new(), || CreateUser);

    // No schema: the body is never read, so the controller sees no body at all.
    let res = route
        .call(post_json("/users", &json!({ "username": "admin", "password": "short" })))
        .await;
    assert_eq!(res.status, 400);
    assert!(responses::fields(&res).is_empty());
}

#[tokio::test]
async fn test_extra_validation_skipped_when_schema_fails() {
    let options = ControllerOptions::new().with_schema(username_schema());

    let res = run(&CreateUser, &options, post_json("/users", &json!({ "password": "short" }))).await;
    assert_eq!(res.status, 400);
    let fields = responses::fields(&res);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field, "username");
}

#[tokio::test]
async fn test_body_type_mismatch_is_validation_error() {
    // Schema accepts anything; NewUser needs a username string.
    let schema = FnSchema::new("any", ValidationResult::success);
    let options = ControllerOptions::new().with_schema(Arc::new(schema));

    let res = run(&CreateUser, &options, post_json("/users", &json!({ "username": 42 }))).await;
    assert_eq!(res.status, 400);
    let fields = responses::fields(&res);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field, "");
}

struct NoCapability;

impl StandardSchema for NoCapability {
    fn standard(&self) -> Option<StandardProps> {
        None
    }
}

#[tokio::test]
async fn test_schema_without_adapter_is_validation_error() {
    let options = ControllerOptions::new().with_schema(Arc::new(NoCapability));

    let res = run(&Inspect, &options, post_json("/users", &json!({}))).await;
    assert_eq!(res.status, 400);
    assert_eq!(responses::message(&res), ADAPTER_CONTRACT_MESSAGE);
}

#[tokio::test]
async fn test_nonconforming_result_is_validation_error() {
    let schema = FnSchema::new("broken", |_input: Value| ValidationResult::default());
    let options = ControllerOptions::new().with_schema(Arc::new(schema));

    let res = run(&Inspect, &options, post_json("/users", &json!({}))).await;
    assert_eq!(res.status, 400);
    assert_eq!(responses::message(&res), NONCONFORMING_RESULT_MESSAGE);
}

#[tokio::test]
async fn test_typed_user_error_is_rendered_as_is() {
    let res = run(&Failing(Failure::Typed), &ControllerOptions::new(), HandlerRequest::new(Method::POST, "/users")).await;
    assert_eq!(res.status, 409);
    assert_eq!(responses::message(&res), "Username taken");
    assert_eq!(responses::fields(&res), vec![FieldError::new("username", "exists")]);
}

#[tokio::test]
async fn test_untyped_user_error_is_500_without_cause() {
    let res = run(&Failing(Failure::Untyped), &ControllerOptions::new(), HandlerRequest::new(Method::GET, "/users")).await;
    assert_eq!(res.status, 500);
    assert_eq!(res.body, json!({ "message": "Internal server error" }));
    assert!(!res.body.to_string().contains("db.internal"));
}

#[tokio::test]
async fn test_panicking_user_logic_is_500() {
    let route = ControllerRoute::new(ControllerOptions::new(), || Failing(Failure::Panic));

    let res = route.call(HandlerRequest::new(Method::GET, "/users")).await;
    assert_eq!(res.status, 500);
    assert_eq!(res.body, json!({ "message": "Internal server error" }));

    // The route keeps serving after a panic.
    let again = route.call(HandlerRequest::new(Method::GET, "/users")).await;
    assert_eq!(again.status, 500);
}

#[tokio::test]
async fn test_one_controller_per_request() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let route = ControllerRoute::new(ControllerOptions::new(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Inspect
    });

    for _ in 0..3 {
        route.call(HandlerRequest::new(Method::GET, "/")).await;
    }
    assert_eq!(built.load(Ordering::SeqCst), 3);
}
