use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::{timeout_at, Instant};

use crate::http::framer::{FrameError, FrameLimits, Framer};
use crate::http::request::{ConnectionDirective, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::router::Router;
use crate::store::ContentStore;

const READ_CHUNK: usize = 4096;

/// Per-connection settings.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionConfig {
    pub idle_timeout: Duration,
    pub limits: FrameLimits,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(3),
            limits: FrameLimits::default(),
        }
    }
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, ConnectionDirective),
    Closed,
}

/// How a connection ended, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Peer closed its write half
    PeerClosed,
    /// Response carried `Connection: close`
    Completed,
    /// No complete request before the idle deadline
    IdleTimeout,
    /// Request rejected by the framer
    Rejected,
    /// Handler failed; connection torn down after a 500
    InternalFault,
}

pub struct Connection<T, S> {
    stream: T,
    framer: Framer,
    router: Arc<Router<S>>,
    idle_timeout: Duration,
    idle_deadline: Instant,
    state: ConnectionState,
    close_reason: CloseReason,
}

impl<T, S> Connection<T, S>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: ContentStore,
{
    pub fn new(stream: T, router: Arc<Router<S>>, config: ConnectionConfig) -> Self {
        Self {
            stream,
            framer: Framer::new(config.limits),
            router,
            idle_timeout: config.idle_timeout,
            idle_deadline: Instant::now() + config.idle_timeout,
            state: ConnectionState::Reading,
            close_reason: CloseReason::PeerClosed,
        }
    }

    /// Drives the connection until it closes.
    ///
    /// Returns `Err` only for transport failures; protocol rejections and
    /// timeouts end the connection with `Ok`.
    pub async fn run(&mut self) -> anyhow::Result<CloseReason> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(req) => ConnectionState::Processing(req),
                    None => ConnectionState::Closed,
                },

                ConnectionState::Processing(req) => {
                    let version = req.version.clone();
                    let response = match Self::dispatch(Arc::clone(&self.router), req).await {
                        Some((response, directive)) => response.for_exchange(&version, directive),
                        None => {
                            self.close_reason = CloseReason::InternalFault;
                            Response::internal_error()
                                .for_exchange(&version, ConnectionDirective::Close)
                        }
                    };

                    let directive = response.connection;
                    ConnectionState::Writing(ResponseWriter::new(&response), directive)
                }

                ConnectionState::Writing(mut writer, directive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if directive == ConnectionDirective::KeepAlive {
                        // Drop the consumed request, keep anything pipelined.
                        self.framer.complete();
                        self.idle_deadline = Instant::now() + self.idle_timeout;
                        ConnectionState::Reading
                    } else {
                        if self.close_reason != CloseReason::InternalFault {
                            self.close_reason = CloseReason::Completed;
                        }
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            };
        }

        Ok(self.close_reason)
    }

    /// Accumulates bytes until the framer yields a request.
    ///
    /// `None` means the connection should close without dispatching.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            match self.framer.next_request() {
                Ok(Some(request)) => return Ok(Some(request)),
                Ok(None) => {}
                Err(e) => {
                    self.reject(e).await?;
                    return Ok(None);
                }
            }

            let mut temp = [0u8; READ_CHUNK];
            let n = match timeout_at(self.idle_deadline, self.stream.read(&mut temp)).await {
                Ok(read) => read?,
                Err(_) => {
                    tracing::debug!(buffered = self.framer.buffered(), "Idle timeout");
                    self.close_reason = CloseReason::IdleTimeout;
                    return Ok(None);
                }
            };

            if n == 0 {
                self.close_reason = CloseReason::PeerClosed;
                return Ok(None);
            }

            self.framer.push(&temp[..n]);
        }
    }

    /// Runs the router in its own task so a panicking handler becomes a
    /// `None` here instead of unwinding through the connection.
    async fn dispatch(
        router: Arc<Router<S>>,
        req: Request,
    ) -> Option<(Response, ConnectionDirective)> {
        let directive = req.connection();
        match tokio::spawn(async move { router.route(&req).await }).await {
            Ok(response) => Some((response, directive)),
            Err(e) => {
                tracing::error!(error = %e, "Request handler failed");
                None
            }
        }
    }

    /// Answers a framing error and leaves the connection closing.
    async fn reject(&mut self, err: FrameError) -> anyhow::Result<()> {
        tracing::warn!(error = %err, "Rejecting request");
        self.close_reason = CloseReason::Rejected;

        let status = match err {
            FrameError::MalformedHeader(_) => StatusCode::BadRequest,
            FrameError::HeaderTooLarge { .. } | FrameError::BodyTooLarge { .. } => {
                StatusCode::PayloadTooLarge
            }
        };

        ResponseWriter::new(&Response::status_page(status))
            .write_to_stream(&mut self.stream)
            .await
    }
}
