#[cfg(test)]
use super::*;
#[cfg(test)]
use crate::node::{Entry, EntryKind};

fn malformed_code(input: &str) -> Option<u32> {
    match parse(input) {
        Err(JcfError::Malformed { code, .. }) => code,
        other => panic!("expected Malformed for {:?}, got {:?}", input, other),
    }
}

#[test]
fn test_parser_basic_document() {
    let input = "Server: {Name: MyServer\nPort: 8080\n}\n";

    let doc = parse(input).expect("Failed to parse document");

    println!("--- Parsed Document ---");
    println!("{:#?}", doc);

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get_scalar("Server.Name").unwrap(), "MyServer");
    assert_eq!(doc.get_scalar("Server.Port").unwrap(), "8080");
}

#[test]
fn test_keys_and_values_are_trimmed() {
    let doc = parse("   spaced key   :    some value with spaces   \n").unwrap();
    assert_eq!(doc.entry("spaced key"), Some(&Entry::Scalar("some value with spaces".into())));
}

#[test]
fn test_only_first_colon_separates() {
    let doc = parse("Url: http://localhost:8080/index\n").unwrap();
    assert_eq!(doc.get_raw("Url").unwrap(), "http://localhost:8080/index");
}

#[test]
fn test_blank_lines_and_crlf() {
    let doc = parse("\n\n  \nA: 1\r\n\r\nB: 2\r\n").unwrap();
    assert_eq!(doc.get_raw("A").unwrap(), "1");
    assert_eq!(doc.get_raw("B").unwrap(), "2");
    assert_eq!(doc.len(), 2);
}

#[test]
fn test_missing_trailing_newline_still_flushes() {
    let doc = parse("A: 1\nB: 2").unwrap();
    assert_eq!(doc.get_raw("B").unwrap(), "2");

    let doc = parse("A: {B: {C: v}}").unwrap();
    assert_eq!(doc.get_scalar("A.B.C").unwrap(), "v");
}

#[test]
fn test_nested_blocks_and_lists() {
    let input = r#"
JWS: {
    Listener: {
        State: Debug
        Debug: {
            Port: 8080
        }
    }
    Routes: [
        {
            Path: /
            Target: index.html
        }
        { Path: /about
          Target: about.html
        }
    ]
}
"#;
    let doc = parse(input).expect("Failed to parse document");

    println!("--- Parsed Document with List ---");
    println!("{:#?}", doc);

    assert_eq!(doc.get_scalar("JWS.Listener.Debug.Port").unwrap(), "8080");
    let routes = doc.get_list("JWS.Routes").unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[1].get_scalar("Target").unwrap(), "about.html");
}

#[test]
fn test_list_elements_may_be_comma_separated() {
    let doc = parse("A: [{X: 1}, {X: 2}]\n").unwrap();
    assert_eq!(doc.get_scalar("A#0.X").unwrap(), "1");
    assert_eq!(doc.get_scalar("A#1.X").unwrap(), "2");
    assert!(matches!(doc.get_scalar("A#2.X"), Err(JcfError::UnknownKey { .. })));
}

#[test]
fn test_empty_block_and_list() {
    let doc = parse("A: {}\nB: []\nC: [ {} ]\n").unwrap();
    assert_eq!(doc.entry("A").map(Entry::kind), Some(EntryKind::Block));
    assert_eq!(doc.entry("B"), Some(&Entry::List(Vec::new())));
    assert_eq!(doc.get_list("C").unwrap().len(), 1);
}

#[test]
fn test_later_key_replaces_earlier_one() {
    let doc = parse("X: 1\nX: {\n    Y: 2\n}\n").unwrap();
    assert_eq!(doc.len(), 1);
    assert!(matches!(doc.get_scalar("X"), Err(JcfError::WrongType { .. })));
    assert_eq!(doc.get_scalar("X.Y").unwrap(), "2");
}

#[test]
fn test_unterminated_block() {
    assert_eq!(malformed_code("A: {B: 1"), Some(205));
    assert_eq!(malformed_code("A: [\n  { B: 1 }\n"), Some(205));
}

#[test]
fn test_closing_unopened_list() {
    assert_eq!(malformed_code("A: ]"), Some(202));
    assert_eq!(malformed_code("A: }\n"), Some(202));
}

#[test]
fn test_mismatched_delimiters() {
    assert_eq!(malformed_code("A: {B: 1]\n"), Some(203));
    assert_eq!(malformed_code("A: [ { B: 1 ] }\n"), Some(203));
}

#[test]
fn test_block_outside_value_position() {
    assert_eq!(malformed_code("{ A: 1 }\n"), Some(201));
    assert_eq!(malformed_code("A: text {\n}\n"), Some(201));
    assert_eq!(malformed_code(": {\n}\n"), Some(209));
}

#[test]
fn test_key_without_colon() {
    assert_eq!(malformed_code("JustAKey\n"), Some(204));
    assert_eq!(malformed_code("A: 1\nJustAKey"), Some(204));
}

#[test]
fn test_value_without_key() {
    assert_eq!(malformed_code(": orphan\n"), Some(206));
}

#[test]
fn test_text_after_closed_block() {
    assert_eq!(malformed_code("A: { B: 1 } trailing\n"), Some(207));
    assert!(parse("A: { B: 1 }   \nC: 2\n").is_ok());
}

#[test]
fn test_path_syntax_in_keys_is_rejected() {
    assert_eq!(malformed_code("Server.Name: x\n"), Some(208));
    assert_eq!(malformed_code("List#0: {\n}\n"), Some(208));
}

#[test]
fn test_list_cannot_hold_lists_or_scalars() {
    assert_eq!(malformed_code("A: [ [ { X: 1 } ] ]\n"), Some(210));
    assert_eq!(malformed_code("A: [ X: 1 ]\n"), Some(211));
    // A list inside a block inside a list is fine.
    assert!(parse("A: [ { B: [ { C: 1 } ] } ]\n").is_ok());
}

#[test]
fn test_error_positions_point_into_nested_blocks() {
    let input = "Top: {\n    Inner: {\n        NoColon\n    }\n}\n";
    match parse(input) {
        Err(JcfError::Malformed { line, column, code, key, .. }) => {
            assert_eq!(code, Some(204));
            assert_eq!(line, 3);
            assert_eq!(column, 16);
            assert_eq!(key, "NoColon");
        }
        other => panic!("expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_unterminated_reports_opening_position() {
    match parse("A: 1\nB: {\n  C: 2\n") {
        Err(JcfError::Malformed { line, column, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(column, 4);
        }
        other => panic!("expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_parse_file_missing() {
    let err = parse_file("/definitely/not/here.jcf").unwrap_err();
    assert!(matches!(err, JcfError::FileError { code: Some(301), .. }));
}

#[test]
fn test_parse_file_reads_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jws.jcf");
    std::fs::write(&path, "JWS: {\n    Server: {\n        Root: /var/www\n    }\n}\n").unwrap();

    let doc = parse_file(&path).expect("Failed to parse file");
    assert_eq!(doc.get_scalar("JWS.Server.Root").unwrap(), "/var/www");
}
