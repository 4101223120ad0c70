use crate::http::headers::Headers;

/// HTTP request methods.
///
/// Only the four methods the router serves get their own variant; anything
/// else is carried verbatim in `Unknown` and answered with 405.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource or the listing
    GET,
    /// PUT - Store a resource from a JSON upload
    PUT,
    /// POST - Acknowledge a payload
    POST,
    /// DELETE - Remove a resource
    DELETE,
    /// Any other token from the request line
    Unknown(String),
}

/// Value of the `Connection` header as far as the server cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionDirective {
    KeepAlive,
    #[default]
    Close,
}

/// Everything the request line and header block carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    /// Raw request target, not percent-decoded
    pub target: String,
    /// Text after the last '.' in the target, if any
    pub extension: Option<String>,
    /// Protocol version without the `HTTP/` prefix (e.g. "1.1")
    pub version: String,
    pub headers: Headers,
    /// Body length from the first `Content-Length` line; later duplicates
    /// in `headers` do not change it
    pub content_length: usize,
}

/// A complete request: head plus exactly `Content-Length` body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub target: String,
    pub extension: Option<String>,
    pub version: String,
    pub headers: Headers,
    /// Declared body length; for framed requests equal to `body.len()`
    pub content_length: usize,
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Unknown("get".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "PUT" => Method::PUT,
            "POST" => Method::POST,
            "DELETE" => Method::DELETE,
            other => Method::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
            Method::POST => "POST",
            Method::DELETE => "DELETE",
            Method::Unknown(token) => token,
        }
    }
}

impl ConnectionDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionDirective::KeepAlive => "keep-alive",
            ConnectionDirective::Close => "close",
        }
    }
}

/// Text after the last '.' of `target`, or `None` when there is no dot.
pub fn extension_of(target: &str) -> Option<String> {
    target
        .rfind('.')
        .map(|idx| target[idx + 1..].to_string())
}

/// Parses a `Content-Length` value; absent or unparsable values count as 0.
pub fn parse_content_length(value: Option<&str>) -> usize {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

impl RequestHead {
    pub fn into_request(self, body: Vec<u8>) -> Request {
        Request {
            method: self.method,
            target: self.target,
            extension: self.extension,
            version: self.version,
            headers: self.headers,
            content_length: self.content_length,
            body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            target: None,
            version: None,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Sets the body and a matching Content-Length header.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.headers.insert("Content-Length", self.body.len().to_string());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let target = self.target.ok_or("target missing")?;
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            extension: extension_of(&target),
            target,
            version: self.version.unwrap_or_else(|| "1.1".to_string()),
            content_length: parse_content_length(self.headers.get("Content-Length")),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Connection directive requested by the client.
    ///
    /// Only an explicit `Connection: keep-alive` keeps the transport open;
    /// a missing header means close.
    pub fn connection(&self) -> ConnectionDirective {
        match self.header("Connection") {
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => ConnectionDirective::KeepAlive,
            _ => ConnectionDirective::Close,
        }
    }

    pub fn keep_alive(&self) -> bool {
        self.connection() == ConnectionDirective::KeepAlive
    }
}
