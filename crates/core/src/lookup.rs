//! Code lookup boundary.
//!
//! [`CodeLookup`] is the single capability the pipeline needs from the outside world: turn a
//! code into a description, or report that it cannot. Implementations never return errors.
//! A transport failure, a non-success status, an unparseable body and a search with zero
//! matches all come back as `None`, and the caller treats that code as malformed.
//!
//! Two adapters are provided:
//! - [`NlmClient`]: blocking HTTP client for the NLM Clinical Tables ICD-10-CM search API
//! - [`InMemoryLookup`]: fixed code → description table, used for offline runs and tests

use crate::config::CoreConfig;
use crate::{DxError, DxResult};
use dx_types::{Code, Description};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Resolves a diagnosis code to its description.
pub trait CodeLookup {
    /// Returns the canonical description for `code`, or `None` if it cannot be resolved.
    fn lookup(&self, code: &Code) -> Option<Description>;
}

impl<T: CodeLookup + ?Sized> CodeLookup for &T {
    fn lookup(&self, code: &Code) -> Option<Description> {
        (**self).lookup(code)
    }
}

impl<T: CodeLookup + ?Sized> CodeLookup for Box<T> {
    fn lookup(&self, code: &Code) -> Option<Description> {
        (**self).lookup(code)
    }
}

// ============================================================================
// HTTP adapter
// ============================================================================

/// Blocking client for the NLM Clinical Tables search API.
///
/// Each call to [`CodeLookup::lookup`] issues exactly one
/// `GET {base_url}?sf={search_fields}&terms={code}&maxList={max_list}` request. There is no
/// retry and no cache. Timeouts are whatever the underlying `reqwest` client uses.
#[derive(Clone, Debug)]
pub struct NlmClient {
    client: reqwest::blocking::Client,
    base_url: String,
    search_fields: String,
    max_list: u32,
}

impl NlmClient {
    /// Creates a client with a default `reqwest` configuration.
    ///
    /// # Errors
    ///
    /// Returns `DxError::HttpClient` if the TLS backend cannot be initialised.
    pub fn from_config(cfg: &CoreConfig) -> DxResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(DxError::HttpClient)?;
        Ok(Self::with_client(client, cfg))
    }

    /// Creates a client around an already-configured `reqwest` client.
    pub fn with_client(client: reqwest::blocking::Client, cfg: &CoreConfig) -> Self {
        Self {
            client,
            base_url: cfg.lookup_base_url().to_string(),
            search_fields: cfg.search_fields().to_string(),
            max_list: cfg.max_list(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl CodeLookup for NlmClient {
    fn lookup(&self, code: &Code) -> Option<Description> {
        let Some(term) = code.query_term() else {
            tracing::debug!("code {} has no query form; skipping lookup", code);
            return None;
        };

        let max_list = self.max_list.to_string();
        let response = match self
            .client
            .get(&self.base_url)
            .query(&[
                ("sf", self.search_fields.as_str()),
                ("terms", &*term),
                ("maxList", max_list.as_str()),
            ])
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("lookup request for {} failed: {}", term, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "lookup for {} returned HTTP status {}",
                term,
                response.status()
            );
            return None;
        }

        let body: Value = match response.json() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("lookup response for {} was not valid JSON: {}", term, e);
                return None;
            }
        };

        parse_search_response(&body)
    }
}

/// Extracts the first match's description from a search response envelope.
///
/// The envelope is a JSON array `[count, [codes...], extra, [[code, description], ...]]`.
/// Returns `None` when `count` is missing or zero, or when the first match has no usable
/// description.
pub fn parse_search_response(body: &Value) -> Option<Description> {
    let count = body.get(0)?.as_u64()?;
    if count == 0 {
        return None;
    }

    let description = body.get(3)?.get(0)?.get(1)?.as_str()?;
    Description::new(description).ok()
}

// ============================================================================
// In-memory adapter
// ============================================================================

/// Lookup backed by a fixed table of code → description.
///
/// Keys are compared against [`Code::query_term`], so the number `1` and the string `"1"`
/// resolve identically here, just as they would against the HTTP service.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLookup {
    entries: HashMap<String, Description>,
}

impl InMemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a lookup from `(code, description)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `DxError::Description` if any description is blank.
    pub fn from_pairs<I, K, V>(pairs: I) -> DxResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut lookup = Self::new();
        for (code, description) in pairs {
            lookup.insert(code, Description::new(description)?);
        }
        Ok(lookup)
    }

    /// Loads a JSON object of `{ "CODE": "description", ... }` from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON object of strings, or
    /// contains a blank description.
    pub fn from_json_file(path: &Path) -> DxResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(DxError::FileRead)?;
        let raw: HashMap<String, String> =
            serde_json::from_str(&contents).map_err(DxError::Deserialization)?;
        Self::from_pairs(raw)
    }

    pub fn insert(&mut self, code: impl Into<String>, description: Description) {
        self.entries.insert(code.into(), description);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CodeLookup for InMemoryLookup {
    fn lookup(&self, code: &Code) -> Option<Description> {
        let term = code.query_term()?;
        self.entries.get(&*term).cloned()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PriorityKeywords;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves a single canned HTTP response and hands back the raw request it received.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).expect("read request");
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
            request
        });
        (format!("http://{addr}/search"), handle)
    }

    fn client_for(base_url: &str) -> NlmClient {
        let cfg = CoreConfig::new(
            base_url.to_string(),
            "code".into(),
            1,
            PriorityKeywords::default(),
        )
        .expect("valid config");
        let http = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .expect("build client");
        NlmClient::with_client(http, &cfg)
    }

    #[test]
    fn parse_search_response_takes_first_match() {
        let body = json!([
            2,
            ["U07.1", "U07.0"],
            null,
            [["U07.1", "COVID-19"], ["U07.0", "Vaping-related disorder"]]
        ]);
        assert_eq!(
            parse_search_response(&body).map(|d| d.to_string()),
            Some("COVID-19".into())
        );
    }

    #[test]
    fn parse_search_response_zero_matches_is_none() {
        assert!(parse_search_response(&json!([0, [], null, []])).is_none());
    }

    #[test]
    fn parse_search_response_rejects_unexpected_shapes() {
        assert!(parse_search_response(&json!({"count": 1})).is_none());
        assert!(parse_search_response(&json!([1, ["X"], null, []])).is_none());
        assert!(parse_search_response(&json!([1, ["X"], null, [["X", "  "]]])).is_none());
        assert!(parse_search_response(&json!(["1", ["X"], null, [["X", "Thing"]]])).is_none());
    }

    #[test]
    fn nlm_client_sends_query_and_reads_description() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"[1,["U07.1"],null,[["U07.1","COVID-19"]]]"#,
        );
        let client = client_for(&url);

        let description = client.lookup(&Code::from("U07.1"));
        let request = server.join().expect("server thread");

        assert_eq!(description.map(|d| d.to_string()), Some("COVID-19".into()));
        let request_line = request.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET /search?"));
        assert!(request_line.contains("sf=code"));
        assert!(request_line.contains("terms=U07.1"));
        assert!(request_line.contains("maxList=1"));
    }

    #[test]
    fn nlm_client_coerces_numeric_codes() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"[0,[],null,[]]"#);
        let client = client_for(&url);

        assert!(client.lookup(&Code::from(1)).is_none());
        let request = server.join().expect("server thread");
        assert!(request.lines().next().unwrap_or_default().contains("terms=1&"));
    }

    #[test]
    fn nlm_client_non_success_status_is_none() {
        let (url, server) = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let client = client_for(&url);

        assert!(client.lookup(&Code::from("I10")).is_none());
        server.join().expect("server thread");
    }

    #[test]
    fn nlm_client_unreachable_host_is_none() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = client_for(&format!("http://{addr}/search"));
        assert!(client.lookup(&Code::from("I10")).is_none());
    }

    #[test]
    fn nlm_client_skips_request_for_unqueryable_code() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.set_nonblocking(true).expect("nonblocking");
        let addr = listener.local_addr().expect("addr");
        let client = client_for(&format!("http://{addr}/search"));

        assert!(client.lookup(&Code::Other(json!(null))).is_none());
        assert!(client.lookup(&Code::Other(json!(["I10"]))).is_none());

        let err = listener.accept().expect_err("no connection expected");
        assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);
    }

    #[test]
    fn in_memory_lookup_matches_numeric_codes_by_text() {
        let lookup = InMemoryLookup::from_pairs([("1", "One")]).expect("valid");
        assert_eq!(lookup.lookup(&Code::from(1)).map(|d| d.to_string()), Some("One".into()));
        assert!(lookup.lookup(&Code::from("2")).is_none());
    }

    #[test]
    fn in_memory_lookup_rejects_blank_descriptions() {
        let err = InMemoryLookup::from_pairs([("I10", " ")]).expect_err("blank");
        assert!(matches!(err, DxError::Description(_)));
    }
}
