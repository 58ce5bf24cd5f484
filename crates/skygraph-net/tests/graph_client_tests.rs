//! End-to-end tests for the graph query client against a mock service.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;
use skygraph_core::AbortController;
use skygraph_net::graph::{ActorIdentity, GraphClient, NeighborhoodQuery, PathQuery};
use skygraph_net::NetworkError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> GraphClient {
    GraphClient::new(server.uri()).expect("Failed to build client")
}

fn dids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("did:plc:{i:04}")).collect()
}

fn query_values(request: &Request, key: &str) -> Vec<String> {
    request
        .url
        .query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

/// Answers `akas` with one alias per requested did.
fn echo_akas(request: &Request) -> ResponseTemplate {
    let akas: HashMap<String, Vec<String>> = query_values(request, "did")
        .into_iter()
        .map(|did| {
            let handle = format!("{}.test", did.trim_start_matches("did:plc:"));
            (did, vec![handle])
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({ "akas": akas }))
}

#[tokio::test]
async fn test_whois_returns_inner_mapping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/whois"))
        .and(query_param("actor", "alice.test"))
        .and(query_param("actor", "bob.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "whois": {
                "alice.test": { "did": "did:plc:1", "alsoKnownAs": ["alice.test"] },
                "bob.test": { "did": "did:plc:2", "alsoKnownAs": ["bob.test"] }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let found = client_for(&mock_server)
        .whois(&["alice.test", "bob.test"])
        .await
        .expect("whois failed");

    let expected = HashMap::from([
        (
            "alice.test".to_string(),
            ActorIdentity {
                did: "did:plc:1".into(),
                also_known_as: vec!["alice.test".into()],
            },
        ),
        (
            "bob.test".to_string(),
            ActorIdentity {
                did: "did:plc:2".into(),
                also_known_as: vec!["bob.test".into()],
            },
        ),
    ]);
    assert_eq!(found, expected);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(query_values(&requests[0], "actor"), ["alice.test", "bob.test"]);
}

#[tokio::test]
async fn test_whois_actor_missing_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/whois"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "whois": {} })))
        .mount(&mock_server)
        .await;

    let found = client_for(&mock_server)
        .whois_actor("ghost.test")
        .await
        .expect("whois failed");
    assert!(found.is_none());
}

#[tokio::test]
async fn test_whois_not_found_is_request_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/whois"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown actor"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .whois_actor("ghost.test")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        NetworkError::RequestFailed { body, .. } => assert_eq!(body, "unknown actor"),
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/mutuals"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .mutuals(&["did:plc:a"])
        .await
        .unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn test_neighborhood() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/neighborhood"))
        .and(query_param("did", "did:plc:a"))
        .and(query_param("ignoreDid", "did:plc:x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "n": ["did:plc:a", "did:plc:b", "did:plc:c"],
            "e": [[0, 1], [1, 2], [2, 0]],
            "t": 3
        })))
        .mount(&mock_server)
        .await;

    let graph = client_for(&mock_server)
        .neighborhood(&NeighborhoodQuery::new(["did:plc:a"]).ignore(["did:plc:x"]))
        .await
        .expect("neighborhood failed");

    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.t, 3);
    assert_eq!(graph.edge(2), Some(("did:plc:c", "did:plc:a")));
    assert!(graph.is_consistent());
}

#[tokio::test]
async fn test_akas_chunks_250_into_three_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/akas"))
        .respond_with(echo_akas)
        .expect(3)
        .mount(&mock_server)
        .await;

    let input = dids(250);
    let akas = client_for(&mock_server)
        .akas(&input)
        .await
        .expect("akas failed");

    assert_eq!(akas.len(), 250);
    for did in &input {
        assert!(akas.contains_key(did), "missing {did}");
    }
    assert_eq!(akas["did:plc:0042"], ["0042.test"]);

    let requests = mock_server.received_requests().await.unwrap();
    let mut sizes: Vec<usize> = requests
        .iter()
        .map(|request| query_values(request, "did").len())
        .collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(sizes, [100, 100, 50]);

    let mut sent: Vec<String> = requests
        .iter()
        .flat_map(|request| query_values(request, "did"))
        .collect();
    sent.sort();
    assert_eq!(sent, input);
}

#[tokio::test]
async fn test_akas_empty_input_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let akas = client_for(&mock_server)
        .akas::<String>(&[])
        .await
        .expect("akas failed");
    assert!(akas.is_empty());
}

#[tokio::test]
async fn test_akas_merges_in_chunk_order() {
    let mock_server = MockServer::start().await;

    // Every chunk reports a shared key; the first chunk answers last.
    Mock::given(method("GET"))
        .and(path("/_/akas"))
        .respond_with(|request: &Request| {
            let first = query_values(request, "did")[0].clone();
            let (tag, delay) = match first.as_str() {
                "did:plc:0000" => ("chunk-0", 300),
                "did:plc:0002" => ("chunk-1", 0),
                _ => ("chunk-2", 100),
            };
            ResponseTemplate::new(200)
                .set_body_json(json!({ "akas": { "shared": [tag] } }))
                .set_delay(Duration::from_millis(delay))
        })
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = GraphClient::builder(mock_server.uri())
        .akas_chunk_size(2)
        .build()
        .expect("Failed to build client");
    let akas = client.akas(&dids(5)).await.expect("akas failed");

    assert_eq!(akas["shared"], ["chunk-2"]);
}

#[tokio::test]
async fn test_akas_chunk_failure_fails_the_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/akas"))
        .and(query_param("did", "did:plc:0150"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_/akas"))
        .respond_with(echo_akas)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .akas(&dids(250))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_mutuals_between_sends_both_dids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/mutuals"))
        .and(query_param("did", "did:plc:a"))
        .and(query_param("did", "did:plc:b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "mutuals": ["did:plc:m1", "did:plc:m2"] })),
        )
        .mount(&mock_server)
        .await;

    let mutuals = client_for(&mock_server)
        .mutuals_between("did:plc:a", "did:plc:b")
        .await
        .expect("mutuals failed");
    assert_eq!(mutuals, ["did:plc:m1", "did:plc:m2"]);
}

#[tokio::test]
async fn test_incoming() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/incoming"))
        .and(query_param("did", "did:plc:a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "incoming": ["did:plc:z"] })),
        )
        .mount(&mock_server)
        .await;

    let incoming = client_for(&mock_server)
        .incoming(&["did:plc:a"])
        .await
        .expect("incoming failed");
    assert_eq!(incoming, ["did:plc:z"]);
}

#[tokio::test]
async fn test_paths_streams_records_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/paths"))
        .and(query_param("sourceDid", "a"))
        .and(query_param("targetDid", "c"))
        .and(query_param("maxMutuals", "25"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/jsonl")
                .set_body_string("[\"a\",\"b\",\"c\"]\n[\"a\",\"d\",\"c\"]\n"),
        )
        .mount(&mock_server)
        .await;

    let paths = client_for(&mock_server)
        .paths(&PathQuery::new("a", "c").max_mutuals(25))
        .await
        .expect("paths failed")
        .collect_all()
        .await
        .expect("stream failed");

    assert_eq!(paths, vec![vec!["a", "b", "c"], vec!["a", "d", "c"]]);
}

#[tokio::test]
async fn test_paths_sends_ignore_list_and_omits_missing_cap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/paths"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    let mut paths = client_for(&mock_server)
        .paths(&PathQuery::new("a", "c").ignore(["x", "y"]))
        .await
        .expect("paths failed");
    assert!(paths.next().await.is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(query_values(&requests[0], "ignoreDid"), ["x", "y"]);
    assert!(query_values(&requests[0], "maxMutuals").is_empty());
}

#[tokio::test]
async fn test_paths_malformed_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/paths"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[\"a\",\"c\"]\n{broken\n"))
        .mount(&mock_server)
        .await;

    let mut paths = client_for(&mock_server)
        .paths(&PathQuery::new("a", "c"))
        .await
        .expect("paths failed");
    assert_eq!(paths.next().await.unwrap().unwrap(), ["a", "c"]);
    assert!(paths.next().await.unwrap().unwrap_err().is_decode());
    assert!(paths.next().await.is_none());
}

#[tokio::test]
async fn test_paths_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/paths"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such actor"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .paths(&PathQuery::new("a", "missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_abort_stops_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/paths"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[\"a\",\"c\"]\n")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let controller = AbortController::new();
    let client = client_for(&mock_server).with_abort_signal(controller.signal());

    let aborter = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.abort_with("search cancelled");
    });

    let err = client.paths(&PathQuery::new("a", "c")).await.unwrap_err();
    match err {
        NetworkError::Aborted(reason) => assert_eq!(reason.message(), "search cancelled"),
        other => panic!("expected Aborted, got {other:?}"),
    }
    aborter.await.unwrap();
}

#[tokio::test]
async fn test_abort_after_response_head() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_/paths"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[\"a\",\"c\"]\n"))
        .mount(&mock_server)
        .await;

    let controller = AbortController::new();
    let client = client_for(&mock_server).with_abort_signal(controller.signal());

    let mut paths = client
        .paths(&PathQuery::new("a", "c"))
        .await
        .expect("paths failed");
    controller.abort();

    assert!(paths.next().await.unwrap().unwrap_err().is_aborted());
    assert!(paths.next().await.is_none());
    assert_eq!(paths.records_yielded(), 0);
}
