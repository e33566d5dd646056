//! # Dependency review
//!
//! `get_dependency_review_compare` returns the dependency changes between
//! two revisions of a repository, as reported by GitHub's dependency graph
//! compare endpoint. Records are passed through as opaque JSON values.

use std::sync::Arc;

use async_trait::async_trait;
use depscope_core::{
    CallContext, CallToolRequest, ParamError, ParamSpec, Tool, ToolAnnotations, ToolDescriptor,
    ToolError, Translator, error_result, optional_param, required_param, text_result,
};
use depscope_github::{ClientProvider, Method, StatusCode};
use rmcp::model::CallToolResult;
use serde_json::Value;
use tracing::{Instrument, debug, warn};

pub const DESCRIPTION_KEY: &str = "TOOL_GET_DEPENDENCY_REVIEW_COMPARE_DESCRIPTION";
pub const TITLE_KEY: &str = "TOOL_GET_DEPENDENCY_REVIEW_COMPARE_USER_TITLE";

const DEFAULT_DESCRIPTION: &str =
    "Get a diff of the dependencies between commits in a GitHub repository.";
const DEFAULT_TITLE: &str = "Compare dependencies between commits";

/// Compare the dependencies of two Git revisions.
pub struct DependencyReviewCompareTool {
    descriptor: ToolDescriptor,
    clients: Arc<dyn ClientProvider>,
}

impl DependencyReviewCompareTool {
    pub const NAME: &'static str = "get_dependency_review_compare";

    pub fn new(clients: Arc<dyn ClientProvider>, translator: &dyn Translator) -> Self {
        Self {
            descriptor: descriptor(translator),
            clients,
        }
    }
}

fn descriptor(t: &dyn Translator) -> ToolDescriptor {
    ToolDescriptor::new(
        DependencyReviewCompareTool::NAME,
        t.translate(DESCRIPTION_KEY, DEFAULT_DESCRIPTION),
    )
    .with_annotations(ToolAnnotations::read_only(
        t.translate(TITLE_KEY, DEFAULT_TITLE),
    ))
    .with_param(
        ParamSpec::string("owner")
            .required()
            .description("The account owner of the repository."),
    )
    .with_param(
        ParamSpec::string("repo")
            .required()
            .description("The name of the repository."),
    )
    .with_param(
        ParamSpec::string("basehead")
            .required()
            .description(
                "The base and head Git revisions to compare in the format {base}...{head}.",
            ),
    )
    .with_param(ParamSpec::string("name").description(
        "The full path, relative to the repository root, of the dependency manifest file.",
    ))
}

/// Validated arguments for one comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CompareParams {
    owner: String,
    repo: String,
    basehead: String,
    manifest: String,
}

impl CompareParams {
    fn from_request(request: &CallToolRequest) -> Result<Self, ParamError> {
        Ok(Self {
            owner: required_param(request, "owner")?,
            repo: required_param(request, "repo")?,
            basehead: required_param(request, "basehead")?,
            manifest: optional_param(request, "name")?,
        })
    }

    /// Request path relative to the API root. Values are inserted as given.
    fn path(&self) -> String {
        let path = format!(
            "repos/{}/{}/dependency-graph/compare/{}",
            self.owner, self.repo, self.basehead
        );
        if self.manifest.is_empty() {
            path
        } else {
            format!("{path}?name={}", self.manifest)
        }
    }
}

#[async_trait]
impl Tool for DependencyReviewCompareTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(
        &self,
        ctx: &CallContext,
        request: &CallToolRequest,
    ) -> Result<CallToolResult, ToolError> {
        let params = match CompareParams::from_request(request) {
            Ok(params) => params,
            Err(e) => return Ok(error_result(e.to_string())),
        };

        self.compare(ctx, &params).instrument(ctx.span()).await
    }
}

impl DependencyReviewCompareTool {
    async fn compare(
        &self,
        ctx: &CallContext,
        params: &CompareParams,
    ) -> Result<CallToolResult, ToolError> {
        let client = self
            .clients
            .client(ctx)
            .await
            .map_err(ToolError::client_unavailable)?;

        let request = client
            .new_request(Method::GET, &params.path())
            .map_err(ToolError::request_build)?;

        let response = client
            .execute(request)
            .await
            .map_err(|e| ToolError::transport("failed to get dependency changes", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_err(ToolError::body_read)?;
            warn!(
                owner = %params.owner,
                repo = %params.repo,
                status = status.as_u16(),
                "Dependency review request rejected"
            );
            return Ok(error_result(format!(
                "failed to get dependency changes: {body}"
            )));
        }

        let body = response.bytes().await.map_err(ToolError::body_read)?;
        let changes: Vec<Value> = serde_json::from_slice(&body)
            .map_err(|e| ToolError::encoding("failed to marshal dependency changes", e))?;
        let text = serde_json::to_string(&changes)
            .map_err(|e| ToolError::encoding("failed to marshal dependency changes", e))?;

        debug!(
            owner = %params.owner,
            repo = %params.repo,
            basehead = %params.basehead,
            changes = changes.len(),
            "Fetched dependency changes"
        );
        Ok(text_result(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depscope_core::NullTranslator;
    use depscope_github::{ClientError, GitHubClient};

    fn no_client(_: &CallContext) -> Result<GitHubClient, ClientError> {
        Err(ClientError::MissingToken)
    }

    fn params(manifest: &str) -> CompareParams {
        CompareParams {
            owner: "octo".to_string(),
            repo: "app".to_string(),
            basehead: "main...feature".to_string(),
            manifest: manifest.to_string(),
        }
    }

    #[test]
    fn test_path_without_manifest() {
        assert_eq!(
            params("").path(),
            "repos/octo/app/dependency-graph/compare/main...feature"
        );
    }

    #[test]
    fn test_path_with_manifest() {
        assert_eq!(
            params("package.json").path(),
            "repos/octo/app/dependency-graph/compare/main...feature?name=package.json"
        );
    }

    #[test]
    fn test_params_stop_at_first_missing() {
        let request = CallToolRequest::new(DependencyReviewCompareTool::NAME)
            .with_argument("owner", "octo");
        let err = CompareParams::from_request(&request).unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: repo");
    }

    #[test]
    fn test_manifest_wrong_type() {
        let request = CallToolRequest::new(DependencyReviewCompareTool::NAME)
            .with_argument("owner", "octo")
            .with_argument("repo", "app")
            .with_argument("basehead", "a...b")
            .with_argument("name", 7);
        let err = CompareParams::from_request(&request).unwrap_err();
        assert_eq!(err.to_string(), "parameter name is not of type string");
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let tool = DependencyReviewCompareTool::new(Arc::new(no_client), &NullTranslator);
        let request = CallToolRequest::new(DependencyReviewCompareTool::NAME)
            .with_argument("owner", "octo")
            .with_argument("repo", "app")
            .with_argument("basehead", "main...feature");

        let err = tool
            .call(&CallContext::new(tool.name()), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ClientUnavailable(_)));
        assert!(err.to_string().starts_with("failed to get GitHub client: "));
    }
}
