//! OpenCTI GraphQL client

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::Observable;
use crate::platform::{Platform, PlatformError};

const OBSERVABLE_QUERY: &str = r#"
query Observable($id: String!) {
  stixCyberObservable(id: $id) {
    id
    entity_type
    observable_value
    hashes { algorithm hash }
    objectMarking { definition_type definition }
  }
}
"#;

const PUSH_BUNDLE_MUTATION: &str = r#"
mutation PushBundle($connectorId: String!, $bundle: String!) {
  stixBundlePush(connectorId: $connectorId, bundle: $bundle)
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Client for the OpenCTI GraphQL API
pub struct OpenCtiClient {
    client: Client,
    graphql_url: String,
    token: String,
    connector_id: String,
}

impl OpenCtiClient {
    pub fn new(url: &str, token: &str, connector_id: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            graphql_url: format!("{}/graphql", url.trim_end_matches('/')),
            token: token.to_string(),
            connector_id: connector_id.to_string(),
        })
    }

    async fn execute(&self, query: &str, variables: Value) -> Result<Value, PlatformError> {
        let response = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api { status, body });
        }

        let body: GraphQlResponse = response.json().await?;

        if let Some(errors) = body.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(PlatformError::Query(messages.join("; ")));
        }

        body.data
            .ok_or_else(|| PlatformError::Malformed("response carried no data".to_string()))
    }
}

#[async_trait]
impl Platform for OpenCtiClient {
    async fn observable(&self, id: &str) -> Result<Option<Observable>, PlatformError> {
        let data = self
            .execute(OBSERVABLE_QUERY, json!({ "id": id }))
            .await?;

        match data.get("stixCyberObservable") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| PlatformError::Malformed(e.to_string())),
        }
    }

    async fn push_bundle(&self, bundle: &str) -> Result<(), PlatformError> {
        self.execute(
            PUSH_BUNDLE_MUTATION,
            json!({ "connectorId": self.connector_id, "bundle": bundle }),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn observable_read_parses_platform_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "stixCyberObservable": {
                        "id": "ipv4-addr--42",
                        "entity_type": "IPv4-Addr",
                        "observable_value": "1.2.3.4",
                        "hashes": null,
                        "objectMarking": [
                            { "definition_type": "TLP", "definition": "TLP:GREEN" }
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = OpenCtiClient::new(&server.uri(), "token", "censys").unwrap();
        let observable = client.observable("ipv4-addr--42").await.unwrap().unwrap();

        assert_eq!(observable.entity_type, EntityType::Ipv4Addr);
        assert_eq!(observable.value, "1.2.3.4");
        assert_eq!(observable.markings().len(), 1);
    }

    #[tokio::test]
    async fn observable_read_maps_null_to_absence() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "stixCyberObservable": null }
            })))
            .mount(&server)
            .await;

        let client = OpenCtiClient::new(&server.uri(), "token", "censys").unwrap();
        assert!(client.observable("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn graphql_errors_surface_as_query_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "You must be logged in" }]
            })))
            .mount(&server)
            .await;

        let client = OpenCtiClient::new(&server.uri(), "token", "censys").unwrap();
        let err = client.push_bundle("{}").await.unwrap_err();
        assert!(matches!(err, PlatformError::Query(_)));
    }
}
