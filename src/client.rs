//! HTTP transport to the GraphQL endpoint.
//!
//! Every call is a single POST with no retries. Non-2xx answers come back as
//! [`ClientError::Server`] carrying the body so the session can record them.

use std::collections::BTreeMap;
use std::time::Instant;

use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};

use crate::error::ClientError;
use crate::models::{ExecutionFailure, RequestEcho};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const ACCEPT_ANY: &str = "application/json, text/plain, */*";

/// Standard introspection query used to populate the schema cache
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types { ...FullType }
    directives {
      name
      description
      locations
      args { ...InputValue }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args { ...InputValue }
    type { ...TypeRef }
    isDeprecated
    deprecationReason
  }
  inputFields { ...InputValue }
  interfaces { ...TypeRef }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes { ...TypeRef }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType { kind name }
            }
          }
        }
      }
    }
  }
}
"#;

/// A 2xx answer from the endpoint
#[derive(Debug, Clone)]
pub struct ExecutionResponse {
    pub request: RequestEcho,
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body, or the raw text when the body is not JSON
    pub body: serde_json::Value,
    pub elapsed_ms: u64,
}

impl ExecutionResponse {
    /// `"<code> <reason>"`
    pub fn status_label(&self) -> String {
        format!("{} {}", self.status, self.status_text).trim_end().to_string()
    }

    /// The GraphQL `data` member, if the body has one
    pub fn data(&self) -> Option<serde_json::Value> {
        self.body.get("data").cloned()
    }
}

impl ClientError {
    /// The locally recorded form of a server failure; `None` when no response arrived
    pub fn to_failure(&self) -> Option<ExecutionFailure> {
        match self {
            ClientError::Server {
                status,
                headers,
                body,
                ..
            } => Some(ExecutionFailure {
                status: format!("{} failed", status),
                response: body.clone(),
                headers: headers.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphqlClient {
    http: reqwest::Client,
}

impl GraphqlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// POST one query to `endpoint`
    pub async fn execute(
        &self,
        endpoint: &str,
        query: &str,
        variables: &str,
    ) -> Result<ExecutionResponse, ClientError> {
        let body = serde_json::json!({
            "query": query,
            "variables": parse_variables(variables),
        })
        .to_string();

        let mut request_headers = BTreeMap::new();
        request_headers.insert(CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string());
        request_headers.insert(ACCEPT.to_string(), ACCEPT_ANY.to_string());

        let start = Instant::now();
        let response = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, ACCEPT_ANY)
            .body(body.clone())
            .send()
            .await?;

        let status = response.status();
        let headers = header_map(response.headers());
        let text = response.text().await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        let body_value = parse_body(text);

        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                headers,
                body: body_value,
            });
        }

        Ok(ExecutionResponse {
            request: RequestEcho {
                data: body,
                headers: request_headers,
                method: "POST".to_string(),
                url: endpoint.to_string(),
            },
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body: body_value,
            elapsed_ms,
        })
    }

    /// Fetch the introspection result and return its `data` member
    pub async fn introspect(&self, endpoint: &str) -> Result<serde_json::Value, ClientError> {
        let response = self.execute(endpoint, INTROSPECTION_QUERY, "").await?;
        Ok(response.data().unwrap_or(serde_json::Value::Null))
    }
}

/// Blank variables become `null`, JSON is sent as JSON, anything else as a string
fn parse_variables(variables: &str) -> serde_json::Value {
    if variables.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(variables).unwrap_or_else(|_| serde_json::Value::String(variables.to_string()))
}

fn parse_body(text: String) -> serde_json::Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => serde_json::Value::String(text),
    }
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_form_typed_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("content-type", FORM_CONTENT_TYPE))
            .and(body_json(json!({ "query": "{ viewer { id } }", "variables": { "a": 1 } })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-request-id", "abc")
                    .set_body_json(json!({ "data": { "viewer": { "id": "42" } } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GraphqlClient::new();
        let url = format!("{}/graphql", server.uri());
        let response = client
            .execute(&url, "{ viewer { id } }", r#"{"a": 1}"#)
            .await
            .unwrap();

        assert_eq!(response.status_label(), "200 OK");
        assert_eq!(response.data(), Some(json!({ "viewer": { "id": "42" } })));
        assert_eq!(response.headers.get("x-request-id").map(String::as_str), Some("abc"));
        assert_eq!(response.request.method, "POST");
        assert_eq!(response.request.url, url);
        assert_eq!(
            response.request.headers.get("content-type").map(String::as_str),
            Some(FORM_CONTENT_TYPE)
        );
    }

    #[tokio::test]
    async fn server_error_keeps_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "errors": [{ "message": "boom" }] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = GraphqlClient::new()
            .execute(&server.uri(), "{ viewer { id } }", "")
            .await
            .unwrap_err();

        let failure = err.to_failure().unwrap();
        assert_eq!(failure.status, "500 failed");
        assert_eq!(failure.response["errors"][0]["message"], "boom");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let err = GraphqlClient::new()
            .execute("http://127.0.0.1:9/graphql", "{ a }", "")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert!(err.to_failure().is_none());
    }

    #[test]
    fn variables_are_parsed_when_possible() {
        assert_eq!(parse_variables("  "), serde_json::Value::Null);
        assert_eq!(parse_variables(r#"{"id": 1}"#), json!({ "id": 1 }));
        assert_eq!(parse_variables("{id:"), json!("{id:"));
    }
}
