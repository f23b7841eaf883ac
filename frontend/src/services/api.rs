//! HTTP client for the orders backend.
//!
//! Every request goes to `<base URL><path>` and carries
//! `Authorization: Bearer <token>` when the [`Session`] holds a token.
//! JSON requests use `gloo-net`; multipart uploads use `XMLHttpRequest`
//! because `fetch` exposes no upload progress.

use std::rc::Rc;

use gloo_net::http::Request;
use js_sys::Promise;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, ProgressEvent, XmlHttpRequest};

use crate::config::ACCESS_TOKEN_KEY;
use crate::types::{ApiError, ApiResult};

/// Callback receiving `(bytes_loaded, bytes_total)` while a body uploads.
pub type ProgressCallback = Rc<dyn Fn(u64, u64)>;

/// Authentication context handed to the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
}

impl Session {
    /// Session with an explicit token. Blank tokens count as absent.
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Session without credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read the token from the browser's local storage.
    ///
    /// A missing storage or key yields an anonymous session.
    pub fn from_local_storage() -> Self {
        let token = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(ACCESS_TOKEN_KEY).ok().flatten());

        let session = Self::new(token);
        if session.is_authenticated() {
            log::debug!("🔑 Access token found in local storage");
        } else {
            log::debug!("🔓 No access token, requests will be unauthenticated");
        }
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// `Authorization` header value, if a token is present.
    pub fn bearer(&self) -> Option<String> {
        self.access_token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Client bound to one backend and one session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            base_url: base_url.into(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Join the base URL and a relative path with exactly one `/`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn authorization(&self) -> Option<String> {
        self.session.bearer()
    }

    /// Headers sent with every request. `Content-Type` is added only for
    /// JSON; multipart bodies get theirs, with the boundary, from the browser.
    pub fn request_headers(&self, json_body: bool) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Accept", "application/json".to_string())];
        if json_body {
            headers.push(("Content-Type", "application/json".to_string()));
        }
        if let Some(auth) = self.authorization() {
            headers.push(("Authorization", auth));
        }
        headers
    }

    /// POST a JSON body and return the parsed JSON response.
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> ApiResult<Value> {
        let url = self.url(path);
        let builder = self
            .request_headers(true)
            .into_iter()
            .fold(Request::post(&url), |builder, (name, value)| {
                builder.header(name, &value)
            });

        let request = builder
            .json(body)
            .map_err(|e| ApiError::Browser(format!("Failed to build request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response: {}", e)))?;

        classify_response(status, &text)
    }

    /// POST a multipart form, reporting upload progress.
    ///
    /// The browser sets the multipart `Content-Type` and boundary.
    pub async fn post_form(
        &self,
        path: &str,
        form: &FormData,
        on_progress: Option<ProgressCallback>,
    ) -> ApiResult<Value> {
        let url = self.url(path);
        let xhr = XmlHttpRequest::new().map_err(browser_error)?;
        xhr.open_with_async("POST", &url, true)
            .map_err(browser_error)?;
        for (name, value) in self.request_headers(false) {
            xhr.set_request_header(name, &value)
                .map_err(browser_error)?;
        }

        // Must outlive the request, dropped when this future completes.
        let _progress_listener = match on_progress {
            Some(callback) => {
                let listener = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
                    if event.length_computable() {
                        callback(event.loaded() as u64, event.total() as u64);
                    }
                });
                xhr.upload()
                    .map_err(browser_error)?
                    .set_onprogress(Some(listener.as_ref().unchecked_ref()));
                Some(listener)
            }
            None => None,
        };

        let settled = Promise::new(&mut |resolve, reject| {
            xhr.set_onload(Some(&resolve));
            xhr.set_onerror(Some(&reject));
            xhr.set_onabort(Some(&reject));
            xhr.set_ontimeout(Some(&reject));
        });

        xhr.send_with_opt_form_data(Some(form))
            .map_err(browser_error)?;

        JsFuture::from(settled)
            .await
            .map_err(|_| ApiError::Network(format!("Request to {} did not complete", url)))?;

        let status = xhr.status().map_err(browser_error)?;
        let text = xhr
            .response_text()
            .map_err(browser_error)?
            .unwrap_or_default();

        classify_response(status, &text)
    }
}

/// Map a completed response to the client's result.
///
/// 2xx yields the JSON body, `null` when empty and a JSON string when the
/// server answered in plain text. Anything else yields [`ApiError::Http`]
/// with the body attached when it parses as JSON.
pub fn classify_response(status: u16, text: &str) -> ApiResult<Value> {
    let parsed = if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(text)
    };

    if (200..300).contains(&status) {
        Ok(parsed.unwrap_or_else(|_| Value::String(text.to_string())))
    } else {
        Err(ApiError::Http {
            status,
            body: parsed.ok().filter(|v| !v.is_null()),
        })
    }
}

fn browser_error(value: JsValue) -> ApiError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    ApiError::Browser(message)
}
