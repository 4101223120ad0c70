use crate::http::request::ConnectionDirective;

/// HTTP status codes supported by the server.
///
/// - `Ok` (200), `Created` (201), `Accepted` (202)
/// - `BadRequest` (400), `Forbidden` (403), `NotFound` (404)
/// - `MethodNotAllowed` (405), `PayloadTooLarge` (413)
/// - `UnsupportedMediaType` (415): reserved, no route produces it
/// - `InternalServerError` (500)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    Accepted,
    BadRequest,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    UnsupportedMediaType,
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::Accepted => 202,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::PayloadTooLarge => 413,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Accepted => "Accepted",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A response ready to be serialized.
///
/// Content length is not stored; the writer measures `body` at
/// serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// Protocol version without the `HTTP/` prefix
    pub version: String,
    pub content_type: String,
    pub connection: ConnectionDirective,
    /// File name offered in `Content-Disposition: attachment`
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    version: String,
    content_type: String,
    connection: ConnectionDirective,
    content_disposition: Option<String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new builder: HTTP/1.1, `text/html`, `Connection: close`.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            version: "1.1".to_string(),
            content_type: "text/html".to_string(),
            connection: ConnectionDirective::Close,
            content_disposition: None,
            body: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn connection(mut self, connection: ConnectionDirective) -> Self {
        self.connection = connection;
        self
    }

    /// Marks the body as a download named `filename`.
    pub fn attachment(mut self, filename: impl Into<String>) -> Self {
        self.content_disposition = Some(filename.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            version: self.version,
            content_type: self.content_type,
            connection: self.connection,
            content_disposition: self.content_disposition,
            body: self.body,
        }
    }
}

impl Response {
    /// A `text/html` response whose body is the status itself,
    /// e.g. `<h1>404 NOT FOUND</h1>`.
    pub fn status_page(status: StatusCode) -> Self {
        let body = format!(
            "<h1>{} {}</h1>",
            status.as_u16(),
            status.reason_phrase().to_ascii_uppercase()
        );
        ResponseBuilder::new(status).body(body).build()
    }

    /// Creates a 200 OK response with the given body and type.
    pub fn ok(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(content_type)
            .body(body)
            .build()
    }

    pub fn not_found() -> Self {
        Self::status_page(StatusCode::NotFound)
    }

    pub fn internal_error() -> Self {
        Self::status_page(StatusCode::InternalServerError)
    }

    /// Always the length of the body as it stands now.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Copies version and connection directive from the request side.
    pub fn for_exchange(mut self, version: &str, connection: ConnectionDirective) -> Self {
        self.version = version.to_string();
        self.connection = connection;
        self
    }
}
