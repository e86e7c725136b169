//! End-to-end tests: config + lookup CSV + real HTTP against mock source servers.

use std::io::Write;
use std::time::Duration;

use ontology_search::SourceEndpoints;
use search_dragon::{DragonConfig, DragonError, RequestContext, SearchRequest};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lookup_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(
        b"curie,system\n\
          MONDO,http://purl.obolibrary.org/obo/mondo.owl\n\
          HP,http://purl.obolibrary.org/obo/hp.owl\n\
          MSH,http://id.nlm.nih.gov/mesh\n",
    )
    .expect("write lookup");
    file
}

fn config_for(server: &MockServer, lookup: &tempfile::NamedTempFile) -> DragonConfig {
    let mut config = DragonConfig::default();
    config.search.endpoints = SourceEndpoints::with_root(&server.uri());
    config.search.timeout_seconds = 2;
    config.lookup.path = Some(lookup.path().to_path_buf());
    config.credentials.umls_api_key = Some("e2e-secret".into());
    config
}

async fn mount_ols(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ols4/api/search"))
        .and(query_param("q", "asthma"))
        .and(query_param("rows", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"numFound": 35, "docs": [
                {"obo_id": "MONDO:0004979", "iri": "http://purl.obolibrary.org/obo/MONDO_0004979",
                 "label": "asthma", "description": ["A bronchial disease."], "ontology_prefix": "mondo"},
                {"obo_id": "HP:0002099", "iri": "http://purl.obolibrary.org/obo/HP_0002099",
                 "label": "Asthma", "description": null, "ontology_prefix": "hp"},
            ]}
        })))
        .mount(server)
        .await;
}

async fn mount_umls(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/search/current"))
        .and(query_param("string", "asthma"))
        .and(query_param("apiKey", "e2e-secret"))
        .and(query_param("returnIdType", "code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"recCount": 1, "results": [
                {"ui": "D001249", "rootSource": "MSH",
                 "uri": "https://uts-ws.nlm.nih.gov/rest/content/current/source/MSH/D001249",
                 "name": "Asthma"},
            ]}
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn searches_two_sources_over_http() {
    let server = MockServer::start().await;
    mount_ols(&server).await;
    mount_umls(&server).await;
    let lookup = lookup_file();
    let config = config_for(&server, &lookup);
    let request = SearchRequest::new("asthma", &["ols", "umls"], 10);

    let response = search_dragon::run_search(&config, &request, &RequestContext::new())
        .await
        .expect("search succeeds");

    assert_eq!(response.results_count, 3);
    assert!(response.more_results_available);
    let codes: Vec<_> = response.results.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["MONDO:0004979", "HP:0002099", "D001249"]);
    assert_eq!(response.results[2].system, "http://id.nlm.nih.gov/mesh");
    assert_eq!(response.results_per_ontology.get("MSH"), Some(&1));
    assert!(response.results[1].description.is_empty());
    assert!(!response.search_query.contains("e2e-secret"));
    assert!(response.search_query.contains("apiKey={{REDACTED}}"));
}

#[tokio::test]
async fn failing_source_degrades_to_partial_results() {
    let server = MockServer::start().await;
    mount_ols(&server).await;
    Mock::given(method("GET"))
        .and(path("/ols4/api/v2/entities"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let lookup = lookup_file();
    let config = config_for(&server, &lookup);
    let request = SearchRequest::new("asthma", &["ols2", "ols"], 10);

    let response = search_dragon::run_search(&config, &request, &RequestContext::new())
        .await
        .expect("partial results");

    assert_eq!(response.results_count, 2);
    assert!(response.search_query.contains("/ols4/api/v2/entities?search=asthma"));
}

#[tokio::test]
async fn slow_source_times_out() {
    let server = MockServer::start().await;
    mount_ols(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/search/current"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": {"recCount": 0, "results": []}}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    let lookup = lookup_file();
    let mut config = config_for(&server, &lookup);
    config.search.timeout_seconds = 1;
    let request = SearchRequest::new("asthma", &["umls", "ols"], 10);

    let response = search_dragon::run_search(&config, &request, &RequestContext::new())
        .await
        .expect("timeout is not fatal");

    assert_eq!(response.results_count, 2);
    assert!(response.results.iter().all(|r| r.ontology_prefix != "MSH"));
}

#[tokio::test]
async fn unreadable_lookup_leaves_systems_blank() {
    let server = MockServer::start().await;
    mount_ols(&server).await;
    let lookup = lookup_file();
    let mut config = config_for(&server, &lookup);
    config.lookup.path = Some("/nonexistent/ontology_lookup.csv".into());
    let request = SearchRequest::new("asthma", &["ols"], 10);

    let response = search_dragon::run_search(&config, &request, &RequestContext::new())
        .await
        .expect("search succeeds");

    assert_eq!(response.results_count, 2);
    assert!(response.results.iter().all(|r| r.system.is_empty()));
}

#[tokio::test]
async fn missing_umls_key_is_a_config_error() {
    let server = MockServer::start().await;
    let lookup = lookup_file();
    let mut config = config_for(&server, &lookup);
    config.credentials.umls_api_key = None;
    // Empty fallback: the key must not come from the test environment either.
    let credentials = search_dragon::LayeredCredentials::with_fallback(
        config.credentials.clone(),
        ontology_search::StaticCredentials::new(),
    );
    let request = SearchRequest::new("asthma", &["umls"], 10);

    let err = ontology_search::search(
        &request,
        &config.search,
        &ontology_search::OntologyLookup::empty(),
        &credentials,
    )
    .await
    .map_err(DragonError::from)
    .unwrap_err();

    assert!(matches!(
        err,
        DragonError::Search(ontology_search::SearchError::Config(_))
    ));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn cancelled_request_returns_empty_page() {
    let server = MockServer::start().await;
    mount_ols(&server).await;
    let lookup = lookup_file();
    let config = config_for(&server, &lookup);
    let ctx = RequestContext::new();
    ctx.cancel_token().cancel();
    let request = SearchRequest::new("asthma", &["ols"], 10);

    let response = search_dragon::run_search(&config, &request, &ctx)
        .await
        .expect("cancellation is not fatal");

    assert_eq!(response.results_count, 0);
    assert!(!response.more_results_available);
}
