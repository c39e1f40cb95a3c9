use graphsync_core::{Term, Triple, UpdateStatement};
use graphsync_transport::{
    RetryPolicy, SparqlUpdateClient, TransportConfig, TransportError, UpdateSink,
};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, max_retries: u32) -> SparqlUpdateClient {
    let config = TransportConfig::new(&format!("{}/update", server.uri()))
        .unwrap()
        .with_header("Authorization", "Bearer t0ken")
        .with_retry(
            RetryPolicy::default()
                .with_max_retries(max_retries)
                .with_initial_delay(Duration::from_millis(5)),
        );
    SparqlUpdateClient::new(config).unwrap()
}

fn statements() -> Vec<UpdateStatement> {
    let graph = "http://example.org/g";
    let subject = "http://example.org/p/1";
    vec![
        UpdateStatement::delete_predicate(graph, subject, "http://example.org/name"),
        UpdateStatement::insert(
            graph,
            vec![Triple::new(subject, "http://example.org/name", Term::string("Jane"))],
        )
        .unwrap(),
    ]
}

#[tokio::test]
async fn posts_sparql_update_with_configured_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update"))
        .and(header("content-type", "application/sparql-update"))
        .and(header("authorization", "Bearer t0ken"))
        .and(body_string_contains("DELETE {"))
        .and(body_string_contains("INSERT DATA"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, 0).submit(&statements()).await.unwrap();
}

#[tokio::test]
async fn retries_transient_statuses_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, 3).execute("INSERT DATA {}").await.unwrap();
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("parse error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, 5).execute("garbage").await.unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "parse error");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server, 2).execute("INSERT DATA {}").await.unwrap_err();
    assert!(matches!(err, TransportError::Exhausted { attempts: 3, .. }));
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn empty_sequences_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client_for(&server, 0).submit(&[]).await.unwrap();
}
