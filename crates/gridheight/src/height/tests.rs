use super::*;
use nalgebra::vector;
use reqwest::Url;
use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Scripted transport: returns canned results and records requested URLs.
struct Scripted {
    reply: Result<Vec<u8>, LookupError>,
    seen: RefCell<Vec<String>>,
}

impl Scripted {
    fn body(body: &str) -> Self {
        Self {
            reply: Ok(body.as_bytes().to_vec()),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn failing(err: LookupError) -> Self {
        Self {
            reply: Err(err),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for Scripted {
    fn get(&self, url: &Url) -> Result<Vec<u8>, LookupError> {
        self.seen.borrow_mut().push(url.to_string());
        self.reply.clone()
    }
}

fn resolver(t: Scripted) -> SwisstopoResolver<Scripted> {
    SwisstopoResolver::new(&SwisstopoCfg::default(), t).unwrap()
}

#[test]
fn parses_string_and_number_heights() {
    assert_eq!(parse_height(br#"{"height":"1234.5"}"#), Ok(1234.5));
    assert_eq!(parse_height(br#"{"height": 433.2}"#), Ok(433.2));
    assert_eq!(parse_height(br#"{"height":" 12 ","extra":[1,2]}"#), Ok(12.0));
}

#[test]
fn request_url_carries_coordinates_and_reference() {
    let r = resolver(Scripted::body(r#"{"height":"1"}"#));
    let url = r.request_url(vector![2600000.0, 1199999.5]);
    assert_eq!(url.host_str(), Some("api3.geo.admin.ch"));
    assert_eq!(url.path(), "/rest/services/height");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("easting".to_string(), "2600000".to_string()),
            ("northing".to_string(), "1199999.5".to_string()),
            ("sr".to_string(), "2056".to_string()),
            ("format".to_string(), "json".to_string()),
        ]
    );
}

#[test]
fn successful_lookup_returns_height() {
    let mut r = resolver(Scripted::body(r#"{"height":"541.7"}"#));
    assert_eq!(r.resolve_height(vector![2600000.0, 1200000.0]), Ok(541.7));
    assert_eq!(r.transport().seen.borrow().len(), 1);
}

#[test]
fn transport_failure_is_not_found() {
    let mut r = resolver(Scripted::failing(LookupError::Status(503)));
    assert_eq!(
        r.resolve_height(vector![1.0, 2.0]),
        Err(LookupError::Status(503))
    );
    let mut r = resolver(Scripted::failing(LookupError::Transport(
        "connection reset".into(),
    )));
    assert!(matches!(
        r.resolve_height(vector![1.0, 2.0]),
        Err(LookupError::Transport(_))
    ));
}

#[test]
fn empty_body_is_not_found() {
    let mut r = resolver(Scripted::body(""));
    assert_eq!(r.resolve_height(vector![1.0, 2.0]), Err(LookupError::EmptyBody));
    let mut r = resolver(Scripted::body(" \r\n"));
    assert_eq!(r.resolve_height(vector![1.0, 2.0]), Err(LookupError::EmptyBody));
}

#[test]
fn invalid_json_is_not_found() {
    for body in ["<html>502 Bad Gateway</html>", "{\"height\":", "[1, 2, 3]", "42"] {
        let mut r = resolver(Scripted::body(body));
        assert!(
            matches!(
                r.resolve_height(vector![1.0, 2.0]),
                Err(LookupError::Malformed(_))
            ),
            "body {body:?}"
        );
    }
}

#[test]
fn missing_or_non_numeric_height_is_not_found() {
    let mut r = resolver(Scripted::body(r#"{"elevation":"12"}"#));
    assert_eq!(
        r.resolve_height(vector![1.0, 2.0]),
        Err(LookupError::MissingHeight)
    );
    for body in [
        r#"{"height":"n/a"}"#,
        r#"{"height":null}"#,
        r#"{"height":true}"#,
        r#"{"height":{"value":1}}"#,
        r#"{"height":"NaN"}"#,
        r#"{"height":"inf"}"#,
    ] {
        let mut r = resolver(Scripted::body(body));
        assert!(
            matches!(
                r.resolve_height(vector![1.0, 2.0]),
                Err(LookupError::NonNumericHeight(_))
            ),
            "body {body}"
        );
    }
}

#[test]
fn resolver_is_reusable_after_failures() {
    let mut calls = 0;
    let mut flaky = |p: Vector2<f64>| {
        calls += 1;
        if calls % 2 == 0 {
            Err(LookupError::EmptyBody)
        } else {
            Ok(p.x)
        }
    };
    assert_eq!(flaky.resolve_height(vector![3.0, 0.0]), Ok(3.0));
    assert_eq!(
        flaky.resolve_height(vector![4.0, 0.0]),
        Err(LookupError::EmptyBody)
    );
    assert_eq!(flaky.resolve_height(vector![5.0, 0.0]), Ok(5.0));
}

#[test]
fn invalid_endpoint_is_rejected() {
    let cfg = SwisstopoCfg {
        endpoint: "not a url".to_string(),
        sr: 2056,
    };
    assert!(SwisstopoResolver::new(&cfg, Scripted::body("")).is_err());
}

/// Serve exactly one HTTP/1.1 response on loopback; returns the base URL and
/// a handle yielding the raw request head.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..n]);
        }
        let resp = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(resp.as_bytes()).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&head).into_owned()
    });
    (format!("http://{addr}/rest/services/height"), handle)
}

fn loopback_resolver(endpoint: String) -> SwisstopoResolver<HttpTransport> {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    let cfg = SwisstopoCfg {
        endpoint,
        ..SwisstopoCfg::default()
    };
    SwisstopoResolver::new(&cfg, HttpTransport::with_client(client)).unwrap()
}

#[test]
fn http_transport_reads_height_from_live_socket() {
    let (endpoint, server) = serve_once("200 OK", r#"{"height":"612.3"}"#);
    let mut r = loopback_resolver(endpoint);
    assert_eq!(r.resolve_height(vector![2600123.0, 1200456.0]), Ok(612.3));
    let head = server.join().unwrap();
    let request_line = head.lines().next().unwrap();
    assert!(request_line.starts_with("GET /rest/services/height?"));
    assert!(request_line.contains("easting=2600123"));
    assert!(request_line.contains("northing=1200456"));
    assert!(request_line.contains("sr=2056"));
    assert!(request_line.contains("format=json"));
}

#[test]
fn http_transport_maps_error_status() {
    let (endpoint, server) = serve_once("500 Internal Server Error", r#"{"error":"x"}"#);
    let mut r = loopback_resolver(endpoint);
    assert_eq!(
        r.resolve_height(vector![1.0, 1.0]),
        Err(LookupError::Status(500))
    );
    server.join().unwrap();
}

#[test]
fn http_transport_maps_refused_connection() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let mut r = loopback_resolver(format!("http://127.0.0.1:{port}/height"));
    assert!(matches!(
        r.resolve_height(vector![1.0, 1.0]),
        Err(LookupError::Transport(_))
    ));
}
