//! Request framing over an arbitrarily fragmented byte stream.
//!
//! The framer is pure state: bytes go in through [`Framer::push`], complete
//! requests come out of [`Framer::next_request`]. It never touches the
//! transport, so the same sequence of bytes produces the same requests no
//! matter how the reads were split.

use bytes::{Buf, BytesMut};
use thiserror::Error;

use crate::http::parser::{find_headers_end, parse_head, ParseError, HEADER_DELIMITER};
use crate::http::request::{Request, RequestHead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePhase {
    /// Looking for the end of the header block
    AwaitingHeader,
    /// Header accepted, waiting for `expected_body_len` bytes of body
    AwaitingBody,
    /// A request was handed out and has not been completed yet
    Idle,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] ParseError),
    #[error("header block exceeds {limit} bytes")]
    HeaderTooLarge { limit: usize },
    #[error("declared body of {declared} bytes exceeds {limit} bytes")]
    BodyTooLarge { declared: usize, limit: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct FrameLimits {
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_header_bytes: 8 * 1024,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug)]
pub struct Framer {
    buffer: BytesMut,
    phase: ParsePhase,
    head: Option<RequestHead>,
    header_len: usize,
    expected_body_len: usize,
    limits: FrameLimits,
}

impl Framer {
    pub fn new(limits: FrameLimits) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            phase: ParsePhase::AwaitingHeader,
            head: None,
            header_len: 0,
            expected_body_len: 0,
            limits,
        }
    }

    pub fn phase(&self) -> ParsePhase {
        self.phase
    }

    /// Bytes held that have not been consumed by a completed request.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Returns the next complete request, or `None` if more bytes are needed.
    ///
    /// Once a request is returned the framer stays `Idle` until
    /// [`Framer::complete`] is called; further bytes are buffered meanwhile.
    pub fn next_request(&mut self) -> Result<Option<Request>, FrameError> {
        loop {
            match self.phase {
                ParsePhase::AwaitingHeader => {
                    let Some(end) = find_headers_end(&self.buffer) else {
                        // A delimiter straddling the limit may still complete it.
                        let slack = HEADER_DELIMITER.len() - 1;
                        if self.buffer.len() > self.limits.max_header_bytes + slack {
                            return Err(FrameError::HeaderTooLarge {
                                limit: self.limits.max_header_bytes,
                            });
                        }
                        return Ok(None);
                    };

                    if end > self.limits.max_header_bytes + HEADER_DELIMITER.len() {
                        return Err(FrameError::HeaderTooLarge {
                            limit: self.limits.max_header_bytes,
                        });
                    }

                    let head = parse_head(&self.buffer[..end - HEADER_DELIMITER.len()])?;
                    let declared = head.content_length;
                    if declared > self.limits.max_body_bytes {
                        return Err(FrameError::BodyTooLarge {
                            declared,
                            limit: self.limits.max_body_bytes,
                        });
                    }

                    self.header_len = end;
                    self.expected_body_len = declared;
                    self.head = Some(head);
                    self.phase = ParsePhase::AwaitingBody;
                }

                ParsePhase::AwaitingBody => {
                    if self.buffer.len() - self.header_len < self.expected_body_len {
                        return Ok(None);
                    }

                    let Some(head) = self.head.take() else {
                        // Unreachable through the public API; restart cleanly.
                        self.phase = ParsePhase::AwaitingHeader;
                        continue;
                    };

                    let start = self.header_len;
                    let body = self.buffer[start..start + self.expected_body_len].to_vec();
                    self.phase = ParsePhase::Idle;
                    return Ok(Some(head.into_request(body)));
                }

                ParsePhase::Idle => return Ok(None),
            }
        }
    }

    /// Drops the bytes of the request last returned and rearms for the next
    /// header. Bytes of a following request already in the buffer are kept.
    pub fn complete(&mut self) {
        if self.phase == ParsePhase::Idle {
            self.buffer.advance(self.header_len + self.expected_body_len);
        }
        self.header_len = 0;
        self.expected_body_len = 0;
        self.head = None;
        self.phase = ParsePhase::AwaitingHeader;
    }
}
