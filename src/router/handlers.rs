use serde::{Deserialize, Serialize};

use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::router::INDEX_NAME;
use crate::store::{ContentStore, StoreError};

/// Body accepted by PUT.
#[derive(Debug, Deserialize)]
pub struct Upload {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct Listing {
    list: Vec<String>,
}

pub async fn get_index<S: ContentStore>(store: &S) -> Response {
    match store.read(INDEX_NAME).await {
        Ok(body) => Response::ok("text/html", body),
        Err(StoreError::NotFound(_)) => Response::not_found(),
        Err(e) => store_failure("read", INDEX_NAME, e),
    }
}

pub async fn list<S: ContentStore>(store: &S) -> Response {
    let names = match store.list().await {
        Ok(names) => names,
        Err(e) => return store_failure("list", "", e),
    };

    match serde_json::to_vec(&Listing { list: names }) {
        Ok(body) => Response::ok("application/json", body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode listing");
            Response::internal_error()
        }
    }
}

pub async fn get_file<S: ContentStore>(store: &S, name: &str, req: &Request) -> Response {
    match store.read(name).await {
        Ok(body) => {
            let content_type = mime::content_type_for(req.extension.as_deref());
            let mut builder = ResponseBuilder::new(StatusCode::Ok);
            if mime::is_attachment(&content_type) {
                builder = builder.attachment(req.target.as_str());
            }
            builder.content_type(content_type).body(body).build()
        }
        Err(StoreError::NotFound(_) | StoreError::InvalidName(_)) => Response::not_found(),
        Err(e) => store_failure("read", name, e),
    }
}

pub async fn put<S: ContentStore>(store: &S, body: &[u8]) -> Response {
    let upload: Upload = match serde_json::from_slice(body) {
        Ok(upload) => upload,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected upload payload");
            return Response::status_page(StatusCode::BadRequest);
        }
    };

    match store.write(&upload.filename, upload.content.as_bytes()).await {
        Ok(()) => Response::status_page(StatusCode::Created),
        Err(StoreError::InvalidName(name)) => {
            tracing::warn!(name = %name, "Rejected upload name");
            Response::status_page(StatusCode::BadRequest)
        }
        Err(e) => store_failure("write", &upload.filename, e),
    }
}

pub fn post() -> Response {
    Response::status_page(StatusCode::Accepted)
}

pub async fn delete<S: ContentStore>(store: &S, name: &str) -> Response {
    match store.delete(name).await {
        // Deleting an absent entry still succeeds.
        Ok(()) | Err(StoreError::NotFound(_)) => Response::status_page(StatusCode::Accepted),
        Err(StoreError::InvalidName(_)) => Response::status_page(StatusCode::BadRequest),
        Err(e) => store_failure("delete", name, e),
    }
}

pub fn forbidden() -> Response {
    Response::status_page(StatusCode::Forbidden)
}

pub fn method_not_allowed() -> Response {
    Response::status_page(StatusCode::MethodNotAllowed)
}

fn store_failure(op: &str, name: &str, e: StoreError) -> Response {
    tracing::error!(op, name, error = %e, "Content store failure");
    Response::internal_error()
}
