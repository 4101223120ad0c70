use filament::http::framer::{FrameError, FrameLimits, Framer, ParsePhase};
use filament::http::request::{Method, Request};

const PUT_REQUEST: &[u8] = b"PUT /upload HTTP/1.1\r\n\
    Host: localhost\r\n\
    Connection: keep-alive\r\n\
    Content-Length: 35\r\n\
    \r\n\
    {\"filename\":\"a.txt\",\"content\":\"hi\"}";

fn frame_all(chunks: &[&[u8]]) -> Vec<Request> {
    let mut framer = Framer::new(FrameLimits::default());
    let mut requests = Vec::new();

    for chunk in chunks {
        framer.push(chunk);
        while let Some(req) = framer.next_request().unwrap() {
            requests.push(req);
            framer.complete();
        }
    }

    requests
}

#[test]
fn test_whole_request_in_one_push() {
    let requests = frame_all(&[PUT_REQUEST]);

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].body.len(), 35);
}

#[test]
fn test_every_split_point_gives_the_same_request() {
    let whole = frame_all(&[PUT_REQUEST]);

    for split in 1..PUT_REQUEST.len() {
        let (a, b) = PUT_REQUEST.split_at(split);
        assert_eq!(frame_all(&[a, b]), whole, "split at {split}");
    }
}

#[test]
fn test_byte_at_a_time() {
    let chunks: Vec<&[u8]> = PUT_REQUEST.chunks(1).collect();
    assert_eq!(frame_all(&chunks), frame_all(&[PUT_REQUEST]));
}

#[test]
fn test_two_requests_in_one_push() {
    let mut stream = PUT_REQUEST.to_vec();
    stream.extend_from_slice(b"GET /a.txt HTTP/1.1\r\n\r\n");

    let requests = frame_all(&[stream.as_slice()]);

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, Method::GET);
    assert_eq!(requests[1].target, "/a.txt");
    assert!(requests[1].body.is_empty());
}

#[test]
fn test_phase_transitions() {
    let mut framer = Framer::new(FrameLimits::default());
    assert_eq!(framer.phase(), ParsePhase::AwaitingHeader);

    framer.push(&PUT_REQUEST[..30]);
    assert_eq!(framer.next_request().unwrap(), None);
    assert_eq!(framer.phase(), ParsePhase::AwaitingHeader);

    framer.push(&PUT_REQUEST[30..PUT_REQUEST.len() - 1]);
    assert_eq!(framer.next_request().unwrap(), None);
    assert_eq!(framer.phase(), ParsePhase::AwaitingBody);

    framer.push(&PUT_REQUEST[PUT_REQUEST.len() - 1..]);
    assert!(framer.next_request().unwrap().is_some());
    assert_eq!(framer.phase(), ParsePhase::Idle);

    framer.complete();
    assert_eq!(framer.phase(), ParsePhase::AwaitingHeader);
    assert_eq!(framer.buffered(), 0);
}

#[test]
fn test_body_bytes_beyond_content_length_stay_buffered() {
    let mut framer = Framer::new(FrameLimits::default());
    framer.push(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nokGET");

    let req = framer.next_request().unwrap().unwrap();
    assert_eq!(req.body, b"ok");

    framer.complete();
    assert_eq!(framer.buffered(), 3);
}

#[test]
fn test_malformed_request_line() {
    let mut framer = Framer::new(FrameLimits::default());
    framer.push(b"HELLO\r\n\r\n");

    assert!(matches!(
        framer.next_request(),
        Err(FrameError::MalformedHeader(_))
    ));
}

#[test]
fn test_header_limit_allows_exact_fit() {
    let request = b"GET / HTTP/1.1\r\n\r\n";
    let mut framer = Framer::new(FrameLimits {
        max_header_bytes: request.len() - 4,
        max_body_bytes: 0,
    });
    framer.push(request);

    assert!(framer.next_request().unwrap().is_some());
}

#[test]
fn test_declared_body_over_limit() {
    let mut framer = Framer::new(FrameLimits {
        max_header_bytes: 1024,
        max_body_bytes: 10,
    });
    framer.push(b"PUT / HTTP/1.1\r\nContent-Length: 11\r\n\r\n");

    assert_eq!(
        framer.next_request(),
        Err(FrameError::BodyTooLarge {
            declared: 11,
            limit: 10
        })
    );
}

#[test]
fn test_duplicate_content_length_uses_first() {
    let mut framer = Framer::new(FrameLimits::default());
    framer.push(b"PUT / HTTP/1.1\r\nContent-Length: 2\r\nContent-Length: 0\r\n\r\nok");

    let req = framer.next_request().unwrap().unwrap();
    assert_eq!(req.body, b"ok");
    assert_eq!(req.content_length, 2);

    framer.complete();
    assert_eq!(framer.buffered(), 0);
    assert_eq!(framer.next_request().unwrap(), None);
}
