//! Mock REST server shared by the integration tests.
//!
//! Routes:
//!
//! - `GET /tests/simple` answers `simple test`, `HEAD` answers `200`
//! - `GET /tests/with_args` echoes `foo` and `bar` as JSON (`null` when absent)
//! - `GET /tests/list.json`, `GET /tests/list.xml` echo `foo`
//! - `GET /tests/get_object/:id` answers `{"id": ":id"}`
//! - `GET /tests/jsonquery` decodes `q` as JSON and answers it re-encoded
//! - `GET /tests/old` redirects to `/tests/simple`
//! - `GET /tests/missing` answers `404`
//! - `POST|PUT /tests/form` echoes the form body
//! - `DELETE /tests/items/:id` answers `deleted :id` plus the query string

#![allow(dead_code)]

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Start a server with every fixture route mounted.
pub async fn fixture_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tests/simple"))
        .respond_with(ResponseTemplate::new(200).set_body_string("simple test"))
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/tests/simple"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tests/with_args"))
        .respond_with(|request: &Request| {
            let body = format!(
                r#"{{"foo": {}, "bar": {}}}"#,
                json_or_null(query(request, "foo")),
                json_or_null(query(request, "bar")),
            );
            ResponseTemplate::new(200).set_body_string(body)
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/tests/list\.(json|xml)$"))
        .respond_with(|request: &Request| {
            ResponseTemplate::new(200).set_body_string(query(request, "foo").unwrap_or_default())
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/tests/get_object/[^/]+$"))
        .respond_with(|request: &Request| {
            let id = last_segment(request);
            ResponseTemplate::new(200).set_body_string(format!(r#"{{"id": "{}"}}"#, id))
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tests/jsonquery"))
        .respond_with(|request: &Request| {
            let decoded = query(request, "q")
                .and_then(|q| serde_json::from_str::<serde_json::Value>(&q).ok());
            match decoded {
                Some(value) => ResponseTemplate::new(200).set_body_string(value.to_string()),
                None => ResponseTemplate::new(400).set_body_string("q is not JSON"),
            }
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tests/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/tests/simple"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tests/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    for verb in ["POST", "PUT"] {
        Mock::given(method(verb))
            .and(path("/tests/form"))
            .respond_with(|request: &Request| {
                let mut body = request.method.to_string();
                body.push(' ');
                body.push_str(&String::from_utf8_lossy(&request.body));
                if let Some(query) = request.url.query() {
                    body.push('?');
                    body.push_str(query);
                }
                ResponseTemplate::new(200).set_body_string(body)
            })
            .mount(&server)
            .await;
    }

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/tests/items/[^/]+$"))
        .respond_with(|request: &Request| {
            let body = format!(
                "deleted {} {}",
                last_segment(request),
                request.url.query().unwrap_or_default()
            );
            ResponseTemplate::new(200).set_body_string(body)
        })
        .mount(&server)
        .await;

    server
}

/// Decoded value of a query parameter.
pub fn query(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn last_segment(request: &Request) -> String {
    request
        .url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

fn json_or_null(value: Option<String>) -> String {
    serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string())
}
