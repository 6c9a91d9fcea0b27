//! # at-transport-reqwest
//!
//! `HttpTransport` over `reqwest`. Sends JSON and multipart bodies, parses
//! JSON replies, and maps every failure onto `ApiError`. No retries and no
//! request timeout: a call that never resolves stays pending.

use async_trait::async_trait;
use at_core::{
    ApiError, HttpRequest, HttpResponse, HttpTransport, Method, MultipartForm, RequestBody,
};
use reqwest::multipart::{Form, Part};

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Uses a pre-configured client (proxies, TLS roots, pools).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(to_form(form)?),
        };

        let resp = builder.send().await.map_err(network)?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let text = resp.text().await.map_err(network)?;

        if !(200..300).contains(&status) {
            tracing::debug!(status, url = %request.url, "non-success status");
            return Err(ApiError::from_status(status, &text));
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?)
        };
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_form(form: MultipartForm) -> Result<Form, ApiError> {
    let mut out = Form::new();
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    if let Some(file) = form.file {
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::Request(format!("content type {:?}: {e}", file.content_type)))?;
        out = out.part(file.field_name, part);
    }
    Ok(out)
}

fn network(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}
