//! Request routing
//!
//! Maps a complete request onto one of the file operations and produces a
//! response. Every method has exactly one arm; nothing cascades into a
//! neighbouring case.
//!
//! | Request                     | Outcome                                   |
//! |-----------------------------|-------------------------------------------|
//! | `GET /`, `GET index.html`   | the index page, or 404                    |
//! | `GET list`                  | `{"list": [...]}`                         |
//! | `GET <name>`                | the entry, typed by extension, or 404     |
//! | `PUT <any>`                 | JSON `{filename, content}` upload, 201    |
//! | `POST <any>`                | acknowledged, 202                         |
//! | `DELETE <protected>`        | 403                                       |
//! | `DELETE <name>`             | removed (absent is fine), 202             |
//! | anything else               | 405                                       |

pub mod handlers;

use std::sync::Arc;

use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::store::{entry_name, ContentStore};

/// Name served for `GET /`.
pub const INDEX_NAME: &str = "index.html";

/// Name answering with the store listing.
pub const LIST_NAME: &str = "list";

pub struct Router<S> {
    store: Arc<S>,
    protected: Vec<String>,
}

impl<S: ContentStore> Router<S> {
    pub fn new(store: Arc<S>, protected: Vec<String>) -> Self {
        Self { store, protected }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn route(&self, req: &Request) -> Response {
        let resource = resource_name(&req.target);

        let response = match &req.method {
            Method::GET => match resource {
                INDEX_NAME => handlers::get_index(self.store.as_ref()).await,
                LIST_NAME => handlers::list(self.store.as_ref()).await,
                name => handlers::get_file(self.store.as_ref(), name, req).await,
            },
            Method::PUT => handlers::put(self.store.as_ref(), &req.body).await,
            Method::POST => handlers::post(),
            Method::DELETE if self.is_protected(resource) => handlers::forbidden(),
            Method::DELETE => handlers::delete(self.store.as_ref(), resource).await,
            Method::Unknown(_) => handlers::method_not_allowed(),
        };

        tracing::debug!(
            method = req.method.as_str(),
            target = %req.target,
            status = response.status.as_u16(),
            "Routed request"
        );

        response
    }

    fn is_protected(&self, resource: &str) -> bool {
        let name = entry_name(resource).unwrap_or_else(|_| resource.to_string());
        self.protected.iter().any(|p| *p == name)
    }
}

/// Target with its leading slashes removed; the bare root means the index.
pub fn resource_name(target: &str) -> &str {
    match target.trim_start_matches('/') {
        "" => INDEX_NAME,
        name => name,
    }
}
