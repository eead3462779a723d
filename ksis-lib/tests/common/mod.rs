//! Local HTTP backend for integration tests.
//!
//! Serves whatever the test's handler returns and records every request.

#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use ksis_lib::KsisClient;
use ksis_lib::auth::StaticTokenProvider;
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: String,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Handler = dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync;

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    /// Starts a server answering every request with `handler`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler: Arc<Handler> = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let recorded = recorded.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let handler = handler.clone();
                        let recorded = recorded.clone();
                        async move {
                            let request = record(req).await;
                            let (status, body) = handler(&request);
                            recorded.lock().unwrap().push(request);

                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(status)
                                    .header("Content-Type", "application/json")
                                    .body(Full::new(Bytes::from(body)))
                                    .unwrap(),
                            )
                        }
                    });

                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// A client pointed at this server.
    pub fn client(&self) -> KsisClient {
        self.client_with_token(TOKEN)
    }

    pub fn client_with_token(&self, token: &str) -> KsisClient {
        KsisClient::builder()
            .url(&self.base_url)
            .token_provider(StaticTokenProvider::new(token))
            .build()
            .unwrap()
    }
}

async fn record(req: Request<Incoming>) -> RecordedRequest {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = url::form_urlencoded::parse(req.uri().query().unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = req.into_body().collect().await.unwrap().to_bytes();

    RecordedRequest {
        method,
        path,
        query,
        body: String::from_utf8_lossy(&bytes).into_owned(),
        authorization,
    }
}

/// An unsigned JWT carrying `claims`.
pub fn jwt(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

/// `{"content": [...], "totalPages": n}` for rows `1..=total` of the
/// page the request asks for.
pub fn paged(request: &RecordedRequest, total: i64, row: impl Fn(i64) -> serde_json::Value) -> String {
    let page: i64 = request.param("page").unwrap().parse().unwrap();
    let size: i64 = request.param("size").unwrap().parse().unwrap();
    let content: Vec<_> = (page * size + 1..=(page + 1) * size)
        .filter(|id| *id <= total)
        .map(row)
        .collect();
    serde_json::json!({
        "content": content,
        "totalPages": (total + size - 1) / size,
        "totalElements": total,
    })
    .to_string()
}

pub fn notice(id: i64) -> serde_json::Value {
    serde_json::json!({ "noticeId": id, "title": format!("notice {id}"), "regDate": "2024-05-01" })
}
