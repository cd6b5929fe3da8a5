use waypoint::http::response::{reason_phrase, Response};
use waypoint::http::writer::serialize_response;

fn wire(resp: &Response) -> String {
    String::from_utf8(serialize_response(resp).to_vec()).unwrap()
}

#[test]
fn test_reason_phrase_table() {
    let table = [
        (200, "OK"),
        (201, "Created"),
        (204, "No Content"),
        (301, "Moved Permanently"),
        (302, "Found"),
        (304, "Not Modified"),
        (400, "Bad Request"),
        (401, "Unauthorized"),
        (403, "Forbidden"),
        (404, "Not Found"),
        (405, "Method Not Allowed"),
        (409, "Conflict"),
        (415, "Unsupported Media Type"),
        (422, "Unprocessable Entity"),
        (500, "Internal Server Error"),
        (501, "Not Implemented"),
        (502, "Bad Gateway"),
        (503, "Service Unavailable"),
        (504, "Gateway Timeout"),
    ];

    for (code, phrase) in table {
        assert_eq!(reason_phrase(code), phrase, "code {}", code);
    }
}

#[test]
fn test_unknown_status_has_empty_reason() {
    let out = wire(&Response::new(418));

    assert!(out.starts_with("HTTP/1.1 418 \r\n"));
}

#[test]
fn test_content_length_added_for_json_body() {
    let resp = Response::new(200)
        .with_header("Content-Type", "application/json")
        .with_body("{}");

    let out = wire(&resp);

    assert!(out.contains("Content-Length: 2\r\n"));
    assert_eq!(
        out,
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\r\n{}"
    );
}

#[test]
fn test_content_length_uses_utf8_byte_length() {
    let resp = Response::new(200).with_body("日本");

    assert!(wire(&resp).contains("Content-Length: 6\r\n"));
}

#[test]
fn test_explicit_content_length_is_preserved() {
    let resp = Response::new(200)
        .with_header("Content-Length", "999")
        .with_body("test");

    let out = wire(&resp);

    assert!(out.contains("Content-Length: 999\r\n"));
    assert_eq!(out.matches("Content-Length").count(), 1);
}

#[test]
fn test_empty_body_has_no_content_length() {
    let out = wire(&Response::new(204));

    assert_eq!(out, "HTTP/1.1 204 No Content\r\n\r\n");
}

#[test]
fn test_headers_serialized_in_insertion_order() {
    let resp = Response::new(200)
        .with_header("Zeta", "1")
        .with_header("Alpha", "2")
        .with_header("Mid", "3")
        .with_body("x");

    let out = wire(&resp);
    let zeta = out.find("Zeta: 1\r\n").unwrap();
    let alpha = out.find("Alpha: 2\r\n").unwrap();
    let mid = out.find("Mid: 3\r\n").unwrap();

    assert!(zeta < alpha && alpha < mid);
}

#[test]
fn test_with_header_replaces_in_place() {
    let resp = Response::new(200)
        .with_header("A", "1")
        .with_header("B", "2")
        .with_header("A", "3");

    assert_eq!(
        resp.headers,
        vec![
            ("A".to_string(), "3".to_string()),
            ("B".to_string(), "2".to_string())
        ]
    );
}

#[test]
fn test_body_written_without_terminator() {
    let out = wire(&Response::ok("done"));

    assert!(out.ends_with("\r\n\r\ndone"));
}

#[test]
fn test_fixed_error_responses() {
    let not_found = Response::not_found();
    assert_eq!(not_found.status, 404);
    assert_eq!(not_found.header("Content-Type"), Some("text/plain"));
    assert_eq!(not_found.body, "Not Found");

    let internal = Response::internal_error();
    assert_eq!(internal.status, 500);
    assert_eq!(internal.header("Content-Type"), Some("text/plain"));
    assert_eq!(internal.body, "Internal Server Error");
}
