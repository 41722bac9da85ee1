//! Outcome classification of `TransportExecutor::perform` against a stub
//! transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use assert2::{check, let_assert};
use bytes::Bytes;
use courier::context::Job;
use courier::testing::StubTransport;
use courier::{
    Blocking, Error, Header, HttpResponse, Request, RequestBody, ResponseMetadata, Spawn,
    TransportExecutor, TransportReply, Url, UrlResponse, auth, body, decoder, validate,
};
use serde::Deserialize;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("connection reset by peer")]
struct ConnectionReset;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

fn base_url() -> Url {
    Url::parse("https://api.example.com/v1").expect("valid URL")
}

fn ok_response(status: u16) -> HttpResponse {
    HttpResponse::new(status, std::collections::HashMap::new())
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn conversion_failure_never_reaches_the_transport() {
    let stub = StubTransport::http(200, "unused");
    let executor = TransportExecutor::new(stub.clone());

    let request = Request::<String>::new(base_url(), "/upload")
        .sending(|_: &mut Header| -> courier::Result<RequestBody> {
            Err(Error::custom(ConnectionReset))
        });

    let_assert!(Err(err) = executor.perform(&request).await);
    check!(err.cause().downcast_ref::<ConnectionReset>().is_some());
    check!(err.request().is_none());
    check!(err.response().is_none());
    check!(stub.request_count() == 0);
}

#[tokio::test]
async fn transport_error_without_response() {
    let stub = StubTransport::failing(|| Error::transport(ConnectionReset));
    let executor = TransportExecutor::new(stub.clone());

    let request = Request::<String>::new(base_url(), "/users");
    let_assert!(Err(err) = executor.perform(&request).await);

    check!(err.cause().is_transport());
    check!(
        err.to_string() == "transport error: connection reset by peer"
    );
    check!(!err.reached_server());
    let_assert!(Some(sent) = err.request());
    check!(sent == &stub.requests()[0]);
}

#[tokio::test]
async fn neither_response_nor_error_is_no_response() {
    let executor = TransportExecutor::new(StubTransport::new(|_| TransportReply::empty()));

    let request = Request::<()>::new(base_url(), "");
    let_assert!(Err(err) = executor.perform(&request).await);
    check!(err.cause().is_no_response());
    check!(err.response().is_none());
    check!(err.request().is_some());
}

#[tokio::test]
async fn non_http_response_is_rejected() {
    let executor = TransportExecutor::new(StubTransport::new(|request| {
        TransportReply::new(
            Some(Bytes::from_static(b"file contents")),
            Some(ResponseMetadata::Other(UrlResponse {
                url: Some(request.url().clone()),
                mime_type: Some("text/plain".to_string()),
            })),
            None,
        )
    }));

    let request = Request::<String>::new(base_url(), "/file");
    let_assert!(Err(err) = executor.perform(&request).await);
    check!(err.cause().is_non_http_response());
    let_assert!(Some(ResponseMetadata::Other(other)) = err.response());
    check!(other.mime_type.as_deref() == Some("text/plain"));
    check!(err.http_response().is_none());
}

#[tokio::test]
async fn http_response_with_error_keeps_the_response() {
    let executor = TransportExecutor::new(StubTransport::new(|_| {
        TransportReply::http(ok_response(200), "partial")
            .with_error(Error::transport(ConnectionReset))
    }));

    let request = Request::<String>::new(base_url(), "/big");
    let_assert!(Err(err) = executor.perform(&request).await);
    check!(err.cause().is_transport());
    check!(err.status() == Some(200));
}

#[tokio::test]
async fn validator_rejection_is_unacceptable_response() {
    let executor = TransportExecutor::builder(StubTransport::http(404, r#"{"error":"not found"}"#))
        .validate(validate::success_status())
        .build();

    let request = Request::<()>::new(base_url(), "/users/0").receiving(decoder::json::<User>());
    let_assert!(Err(err) = executor.perform(&request).await);
    let_assert!(Error::UnacceptableResponse { status: 404 } = err.cause());
    check!(err.status() == Some(404));
    check!(err.to_string() == "unacceptable response (status 404)");
}

#[tokio::test]
async fn without_validator_any_status_is_decoded() {
    let executor = TransportExecutor::new(StubTransport::http(500, "oops"));

    let request = Request::<String>::new(base_url(), "/");
    let_assert!(Ok(response) = executor.perform(&request).await);
    check!(response.status() == 500);
    check!(response.value() == "oops");
}

#[tokio::test]
async fn unit_resource_succeeds_without_data() {
    let executor = TransportExecutor::builder(StubTransport::http_without_data(204))
        .validate(validate::success_status())
        .build();

    let request = Request::<()>::new(base_url(), "/ping");
    let_assert!(Ok(response) = executor.perform(&request).await);
    check!(response.status() == 204);
}

#[tokio::test]
async fn unit_resource_with_custom_decoder_skips_missing_data() {
    let executor = TransportExecutor::new(StubTransport::http_without_data(200));

    let request = Request::<()>::with_decoder(
        base_url(),
        "/ping",
        |_: &HttpResponse, _: Bytes| -> courier::Result<()> { Ok(()) },
    );
    let_assert!(Ok(response) = executor.perform(&request).await);
    check!(response.status() == 200);

    let received = Request::<String>::new(base_url(), "/ping")
        .receiving(|_: &HttpResponse, data: Bytes| -> courier::Result<()> {
            assert!(data.is_empty());
            Ok(())
        });
    let_assert!(Ok(_) = executor.perform(&received).await);
}

#[tokio::test]
async fn missing_data_is_no_data() {
    let executor = TransportExecutor::new(StubTransport::http_without_data(200));

    let request = Request::<String>::new(base_url(), "/");
    let_assert!(Err(err) = executor.perform(&request).await);
    check!(err.cause().is_no_data());
    check!(err.status() == Some(200));
}

#[tokio::test]
async fn decoder_failure_keeps_the_response() {
    let executor = TransportExecutor::new(StubTransport::http(200, r#"{"id":"not a number"}"#));

    let request = Request::<()>::new(base_url(), "/users/1").receiving(decoder::json::<User>());
    let_assert!(Err(err) = executor.perform(&request).await);
    let_assert!(Error::JsonDeserialization { path, .. } = err.cause());
    check!(path == "id");
    check!(err.status() == Some(200));
}

#[tokio::test]
async fn json_resource_is_decoded() {
    let transport = StubTransport::http(200, r#"{"id":42,"name":"Alice"}"#);
    let executor = TransportExecutor::builder(transport)
        .validate(validate::success_status())
        .build();

    let request = Request::<()>::new(base_url(), "/users/42").receiving(decoder::json::<User>());
    let_assert!(Ok(response) = executor.perform(&request).await);
    check!(
        response.into_value()
            == User {
                id: 42,
                name: "Alice".to_string()
            }
    );
}

// ============================================================================
// Request assembly as seen by the transport
// ============================================================================

#[tokio::test]
async fn transport_sees_the_assembled_request() {
    let stub = StubTransport::http(201, "");
    let executor = TransportExecutor::new(stub.clone());

    let request = Request::<()>::new(base_url(), "/users")
        .using_method(courier::Method::Post)
        .adding_query_item(("notify", "false"))
        .sending(body::json(serde_json::json!({ "name": "Bob" })))
        .authenticated(auth::bearer_token("secret"));

    let_assert!(Ok(_) = executor.perform(&request).await);
    let requests = stub.requests();
    let_assert!([sent] = requests.as_slice());
    check!(sent.method() == courier::Method::Post);
    check!(
        sent.url().as_str() == "https://api.example.com/v1/users?notify=false"
    );
    check!(sent.header("Authorization") == Some("Bearer secret"));
    check!(
        sent.header("Content-Type") == Some("application/json; charset=utf-8")
    );
    check!(
        sent.body().as_bytes().map(Bytes::as_ref) == Some(br#"{"name":"Bob"}"#.as_slice())
    );
}

#[tokio::test]
async fn providers_run_once_per_perform() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let request = Request::<()>::new(base_url(), "/").authenticated(move |_: &mut Header| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let executor = TransportExecutor::new(StubTransport::http(200, ""));

    let _ = executor.perform(&request).await;
    let _ = executor.perform(&request).await;
    check!(calls.load(Ordering::SeqCst) == 2);
}

// ============================================================================
// Hooks and contexts
// ============================================================================

#[tokio::test]
async fn task_hook_sees_each_task_once() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let executor = TransportExecutor::builder(StubTransport::http(200, ""))
        .on_task(move |_task| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    for path in ["/a", "/b"] {
        let request = Request::<()>::new(base_url(), path);
        let _ = executor.perform(&request).await;
    }
    check!(seen.load(Ordering::SeqCst) == 2);
}

#[tokio::test]
async fn task_hook_is_skipped_when_conversion_fails() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let executor = TransportExecutor::builder(StubTransport::http(200, ""))
        .on_task(move |_task| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    let mailto = Url::parse("mailto:ops@example.com").expect("valid URL");
    let request = Request::<()>::new(mailto, "/x");
    let_assert!(Err(err) = executor.perform(&request).await);
    let_assert!(Error::InvalidRequestUrl(_) = err.cause());
    check!(seen.load(Ordering::SeqCst) == 0);
}

#[tokio::test]
async fn decoding_runs_on_the_decode_context() {
    let dispatched = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&dispatched);
    let executor = TransportExecutor::builder(StubTransport::http(200, "body"))
        .decode_on(move |job: Job| {
            counter.fetch_add(1, Ordering::SeqCst);
            job();
        })
        .validate(validate::success_status())
        .build();

    let request = Request::<String>::new(base_url(), "/");
    let_assert!(Ok(response) = executor.perform(&request).await);
    check!(response.value() == "body");
    check!(dispatched.load(Ordering::SeqCst) == 1);

    // Failures before decoding never dispatch.
    let rejected = TransportExecutor::builder(StubTransport::http(500, "body"))
        .decode_on({
            let counter = Arc::clone(&dispatched);
            move |job: Job| {
                counter.fetch_add(1, Ordering::SeqCst);
                job();
            }
        })
        .validate(validate::success_status())
        .build();
    let request = Request::<String>::new(base_url(), "/");
    let_assert!(Err(_) = rejected.perform(&request).await);
    check!(dispatched.load(Ordering::SeqCst) == 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_decode_context() {
    let executor = TransportExecutor::builder(StubTransport::http(200, r#"{"id":1,"name":"Ann"}"#))
        .decode_on(Blocking)
        .build();

    let request = Request::<()>::new(base_url(), "/users/1").receiving(decoder::json::<User>());
    let_assert!(Ok(response) = executor.perform(&request).await);
    check!(response.value().name == "Ann");
}

#[tokio::test]
async fn dropped_decode_job_is_an_error() {
    let executor = TransportExecutor::builder(StubTransport::http(200, "body"))
        .decode_on(|job: Job| drop(job))
        .build();

    let request = Request::<String>::new(base_url(), "/");
    let_assert!(Err(err) = executor.perform(&request).await);
    check!(err.status() == Some(200));
}

#[tokio::test]
async fn perform_with_delivers_on_the_callback_context() {
    let executor = TransportExecutor::builder(StubTransport::http(200, "pong"))
        .deliver_on(Spawn::current())
        .build();

    let (tx, rx) = tokio::sync::oneshot::channel();
    let handle = executor.perform_with(Request::<String>::new(base_url(), "/ping"), move |outcome| {
        let _ = tx.send(outcome.map(courier::Response::into_value));
    });

    handle.await.expect("perform task");
    let_assert!(Ok(Ok(value)) = rx.await);
    check!(value == "pong");
}

#[tokio::test]
async fn perform_with_delivers_failures_too() {
    let executor = TransportExecutor::new(StubTransport::new(|_| TransportReply::empty()));

    let (tx, rx) = tokio::sync::oneshot::channel();
    let _handle = executor.perform_with(Request::<()>::new(base_url(), "/"), move |outcome| {
        let no_response = outcome
            .map(|_| ())
            .map_err(|err| err.cause().is_no_response());
        let _ = tx.send(no_response);
    });

    let_assert!(Ok(Err(true)) = rx.await);
}
