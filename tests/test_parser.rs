use waypoint::http::parser::{parse_request_head, ParseError};

#[test]
fn test_parse_simple_get_request() {
    let req = "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_head(req).unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert!(parsed.body.is_empty());
    assert!(parsed.route_params.is_empty());
}

#[test]
fn test_parse_multiple_headers() {
    let req = "GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let parsed = parse_request_head(req).unwrap();

    assert_eq!(parsed.headers.len(), 3);
    assert_eq!(parsed.headers.get("User-Agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("Accept").unwrap(), "*/*");
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = "GET /search?q=rust HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_head(req).unwrap();

    assert_eq!(parsed.path, "/search?q=rust");
    assert_eq!(parsed.path_without_query(), "/search");
}

#[test]
fn test_parse_empty_request() {
    assert_eq!(parse_request_head("").unwrap_err(), ParseError::Empty);
    assert_eq!(parse_request_head("  \r\n \t ").unwrap_err(), ParseError::Empty);
    assert_eq!(ParseError::Empty.to_string(), "Empty request");
}

#[test]
fn test_parse_single_token_request_line() {
    let err = parse_request_head("INVALID\r\n\r\n").unwrap_err();

    assert_eq!(err, ParseError::InvalidRequestLine("INVALID".to_string()));
    assert_eq!(err.to_string(), "Invalid request line: 'INVALID'");
}

#[test]
fn test_parse_empty_method() {
    let err = parse_request_head(" /path HTTP/1.1\r\n\r\n").unwrap_err();

    assert!(matches!(err, ParseError::EmptyMethod(_)));
}

#[test]
fn test_parse_header_without_separator_is_skipped() {
    let req = "GET / HTTP/1.1\r\nBrokenHeader\r\nNoSpace:value\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_head(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert_eq!(parsed.header("BrokenHeader"), None);
}

#[test]
fn test_parse_repeated_header_last_wins() {
    let req = "GET / HTTP/1.1\r\nX-Tag: one\r\nX-Tag: two\r\n\r\n";
    let parsed = parse_request_head(req).unwrap();

    assert_eq!(parsed.header("X-Tag"), Some("two"));
}

#[test]
fn test_parse_header_value_keeps_extra_separators() {
    let req = "GET / HTTP/1.1\r\nX-Note: a: b\r\n\r\n";
    let parsed = parse_request_head(req).unwrap();

    assert_eq!(parsed.header("X-Note"), Some("a: b"));
}

#[test]
fn test_parse_header_case_preservation() {
    let req = "GET / HTTP/1.1\r\ncontent-type: application/json\r\n\r\n";
    let parsed = parse_request_head(req).unwrap();

    assert!(parsed.headers.contains_key("content-type"));
    assert!(!parsed.headers.contains_key("Content-Type"));
}

#[test]
fn test_parse_ignores_body_bytes() {
    let req = "POST /api HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
    let parsed = parse_request_head(req).unwrap();

    assert_eq!(parsed.content_length(), Some(5));
    assert!(parsed.body.is_empty());
}

#[test]
fn test_parse_request_line_without_version() {
    let parsed = parse_request_head("DELETE /items/3\r\n\r\n").unwrap();

    assert_eq!(parsed.method, "DELETE");
    assert_eq!(parsed.path, "/items/3");
    assert_eq!(parsed.version, "HTTP/1.1");
}
