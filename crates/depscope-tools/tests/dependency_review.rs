use std::sync::Arc;
use std::time::{Duration, Instant};

use depscope_core::{
    CallContext, CallToolRequest, NullTranslator, Tool, ToolError, is_error_result, result_text,
};
use depscope_github::{ClientError, GitHubClient};
use depscope_tools::DependencyReviewCompareTool;
use depscope_tools::dependency_review::{DESCRIPTION_KEY, TITLE_KEY};
use rmcp::model::CallToolResult;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPARE_PATH: &str = "/repos/owner/repo/dependency-graph/compare/main...feature";

fn tool_for(base_url: String) -> DependencyReviewCompareTool {
    let clients = Arc::new(move |_: &CallContext| {
        GitHubClient::builder()
            .base_url(base_url.clone())
            .token("ghp_test")
            .build()
    });
    DependencyReviewCompareTool::new(clients, &NullTranslator)
}

fn compare_request() -> CallToolRequest {
    CallToolRequest::new(DependencyReviewCompareTool::NAME)
        .with_argument("owner", "owner")
        .with_argument("repo", "repo")
        .with_argument("basehead", "main...feature")
}

async fn call(tool: &DependencyReviewCompareTool, request: &CallToolRequest) -> CallToolResult {
    tool.call(&CallContext::new(tool.name()), request)
        .await
        .expect("tool call should not propagate an error")
}

fn dependency_changes() -> Value {
    json!([
        {
            "change_type": "removed",
            "manifest": "package.json",
            "ecosystem": "npm",
            "name": "helmet",
            "version": "4.6.0",
            "package_url": "pkg:npm/helmet@4.6.0",
            "license": "MIT",
            "source_repository_url": "https://github.com/helmetjs/helmet",
            "vulnerabilities": []
        },
        {
            "change_type": "added",
            "manifest": "package.json",
            "ecosystem": "npm",
            "name": "helmet",
            "version": "5.0.0",
            "package_url": "pkg:npm/helmet@5.0.0",
            "license": "MIT",
            "source_repository_url": "https://github.com/helmetjs/helmet",
            "vulnerabilities": []
        },
        {
            "change_type": "added",
            "manifest": "Gemfile",
            "ecosystem": "rubygems",
            "name": "ruby-openid",
            "version": "2.7.0",
            "package_url": "pkg:gem/ruby-openid@2.7.0",
            "license": null,
            "source_repository_url": "https://github.com/openid/ruby-openid",
            "vulnerabilities": [
                {
                    "severity": "critical",
                    "advisory_ghsa_id": "GHSA-fqfj-cmh6-hj49",
                    "advisory_summary": "Ruby OpenID",
                    "advisory_url": "https://github.com/advisories/GHSA-fqfj-cmh6-hj49"
                }
            ]
        }
    ])
}

#[test]
fn test_descriptor() {
    let tool = tool_for("http://127.0.0.1:1".to_string());
    let descriptor = tool.descriptor();

    assert_eq!(descriptor.name(), "get_dependency_review_compare");
    assert_eq!(
        descriptor.description(),
        "Get a diff of the dependencies between commits in a GitHub repository."
    );
    assert_eq!(descriptor.title(), Some("Compare dependencies between commits"));
    assert!(descriptor.is_read_only());

    let schema = descriptor.input_schema();
    let properties: Vec<&str> = schema.properties().iter().map(|p| p.name()).collect();
    assert_eq!(properties, vec!["owner", "repo", "basehead", "name"]);
    assert_eq!(schema.required(), vec!["owner", "repo", "basehead"]);
    assert!(schema.properties().iter().all(|p| !p.describe().is_empty()));

    let json = schema.to_json();
    assert_eq!(json["properties"]["basehead"]["type"], "string");
    assert_eq!(json["required"], json!(["owner", "repo", "basehead"]));
}

#[test]
fn test_descriptor_uses_translations() {
    let translator = |key: &str, default: &str| -> String {
        match key {
            DESCRIPTION_KEY => "Abhängigkeiten vergleichen".to_string(),
            TITLE_KEY => "Vergleich".to_string(),
            _ => default.to_string(),
        }
    };
    let clients = Arc::new(|_: &CallContext| -> Result<GitHubClient, ClientError> {
        Err(ClientError::MissingToken)
    });
    let tool = DependencyReviewCompareTool::new(clients, &translator);

    assert_eq!(tool.descriptor().description(), "Abhängigkeiten vergleichen");
    assert_eq!(tool.descriptor().title(), Some("Vergleich"));
}

#[tokio::test]
async fn test_successful_compare() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dependency_changes()))
        .expect(1)
        .mount(&server)
        .await;

    let tool = tool_for(server.uri());
    let result = call(&tool, &compare_request()).await;

    assert!(!is_error_result(&result));
    let text = result_text(&result).unwrap();
    let returned: Value = serde_json::from_str(text).unwrap();
    assert_eq!(returned, dependency_changes());
    assert_eq!(returned[2]["vulnerabilities"][0]["severity"], "critical");
    assert!(returned[2]["license"].is_null());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), COMPARE_PATH);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_field_order_is_preserved() {
    let server = MockServer::start().await;
    let body = r#"[{"version":"1.0.0","name":"zlib","change_type":"added"}]"#;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = call(&tool_for(server.uri()), &compare_request()).await;
    assert_eq!(result_text(&result), Some(body));
}

#[tokio::test]
async fn test_manifest_filter_is_sent_as_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .and(query_param("name", "package.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let request = compare_request().with_argument("name", "package.json");
    let result = call(&tool_for(server.uri()), &request).await;

    assert!(!is_error_result(&result));
    assert_eq!(result_text(&result), Some("[]"));
}

#[tokio::test]
async fn test_empty_manifest_means_no_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let request = compare_request().with_argument("name", "");
    call(&tool_for(server.uri()), &request).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_not_found_is_error_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"message": "Not Found"}"#),
        )
        .mount(&server)
        .await;

    let result = call(&tool_for(server.uri()), &compare_request()).await;

    assert!(is_error_result(&result));
    let text = result_text(&result).unwrap();
    assert!(text.contains("failed to get dependency changes"));
    assert!(text.contains(r#"{"message": "Not Found"}"#));
}

#[tokio::test]
async fn test_forbidden_is_error_result() {
    let server = MockServer::start().await;
    let body = r#"{"message": "Dependency review not available for this repository"}"#;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string(body))
        .mount(&server)
        .await;

    let result = call(&tool_for(server.uri()), &compare_request()).await;

    assert!(is_error_result(&result));
    assert_eq!(
        result_text(&result).unwrap(),
        format!("failed to get dependency changes: {body}")
    );
}

#[tokio::test]
async fn test_missing_required_parameters() {
    let server = MockServer::start().await;
    let tool = tool_for(server.uri());

    let cases = [
        (
            CallToolRequest::new(DependencyReviewCompareTool::NAME)
                .with_argument("repo", "repo")
                .with_argument("basehead", "main...feature"),
            "owner",
        ),
        (
            CallToolRequest::new(DependencyReviewCompareTool::NAME)
                .with_argument("owner", "owner")
                .with_argument("basehead", "main...feature"),
            "repo",
        ),
        (
            CallToolRequest::new(DependencyReviewCompareTool::NAME)
                .with_argument("owner", "owner")
                .with_argument("repo", "repo"),
            "basehead",
        ),
    ];

    for (request, missing) in cases {
        let result = call(&tool, &request).await;
        assert!(is_error_result(&result));
        assert_eq!(
            result_text(&result).unwrap(),
            format!("missing required parameter: {missing}")
        );
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_and_mistyped_parameters() {
    let server = MockServer::start().await;
    let tool = tool_for(server.uri());

    let result = call(&tool, &compare_request().with_argument("owner", "")).await;
    assert_eq!(
        result_text(&result),
        Some("missing required parameter: owner")
    );

    let result = call(&tool, &compare_request().with_argument("repo", 42)).await;
    assert!(is_error_result(&result));
    assert_eq!(
        result_text(&result),
        Some("parameter repo is not of type string")
    );

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let clients = Arc::new(|_: &CallContext| -> Result<GitHubClient, ClientError> {
        Err(ClientError::MissingToken)
    });
    let tool = DependencyReviewCompareTool::new(clients, &NullTranslator);

    let err = tool
        .call(&CallContext::new(tool.name()), &compare_request())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to get GitHub client"));
}

#[tokio::test]
async fn test_connection_refused_propagates() {
    let tool = tool_for("http://127.0.0.1:1".to_string());

    let err = tool
        .call(&CallContext::new(tool.name()), &compare_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Transport { .. }));
    assert!(err.to_string().starts_with("failed to get dependency changes: "));
}

#[tokio::test]
async fn test_malformed_success_body_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"not": "an array"}"#))
        .mount(&server)
        .await;

    let tool = tool_for(server.uri());
    let err = tool
        .call(&CallContext::new(tool.name()), &compare_request())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "encoding");
    assert!(err.to_string().starts_with("failed to marshal dependency changes: "));
}

#[tokio::test]
async fn test_non_object_records_pass_through() {
    let server = MockServer::start().await;
    let changes = json!([null, {"name": "helmet"}, "pkg:npm/helmet@5.0.0"]);

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(changes.clone()))
        .mount(&server)
        .await;

    let result = call(&tool_for(server.uri()), &compare_request()).await;

    assert!(!is_error_result(&result));
    let text = result_text(&result).unwrap();
    assert_eq!(serde_json::from_str::<Value>(text).unwrap(), changes);
}

#[tokio::test]
async fn test_dropped_call_abandons_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COMPARE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(dependency_changes())
                .set_delay(Duration::from_secs(60)),
        )
        .mount(&server)
        .await;

    let tool = tool_for(server.uri());
    let ctx = CallContext::new(tool.name());
    let request = compare_request();

    let started = Instant::now();
    let outcome =
        tokio::time::timeout(Duration::from_millis(250), tool.call(&ctx, &request)).await;

    assert!(outcome.is_err(), "call should still be waiting on the upstream");
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
