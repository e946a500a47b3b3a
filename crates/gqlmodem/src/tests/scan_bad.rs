use super::utils::collect;
use crate::{scan, Error, ErrorCode, Expect, Token};

fn fail(input: &[u8]) -> Error {
    collect(input).expect_err("scan unexpectedly succeeded")
}

#[track_caller]
fn assert_fail(input: &[u8], code: ErrorCode, index: usize, expect: Expect) {
    let err = fail(input);
    assert_eq!(err.code, code, "code for {:?}", String::from_utf8_lossy(input));
    assert_eq!(err.index, index, "index for {:?}", String::from_utf8_lossy(input));
    assert_eq!(err.expect, expect, "expectation for {:?}", String::from_utf8_lossy(input));
}

#[test]
fn empty_input() {
    assert_fail(b"", ErrorCode::UnexpectedEof, 0, Expect::Def);
    assert_fail(b"  ,\n", ErrorCode::UnexpectedEof, 4, Expect::Def);
}

#[test]
fn unterminated_selection_set() {
    assert_fail(b"{", ErrorCode::UnexpectedEof, 1, Expect::Sel);
}

#[test]
fn missing_value() {
    assert_fail(b"{a(b: )}", ErrorCode::InvalidValue, 6, Expect::Val);
}

#[test]
fn leading_zero() {
    assert_fail(b"{a(b: 01)}", ErrorCode::InvalidNumber, 7, Expect::Val);
}

#[test]
fn unterminated_string() {
    let err = fail(b"{a(b:\"abc");
    assert_eq!(err.code, ErrorCode::UnexpectedEof);
    assert_eq!(err.index, 9);
    assert_eq!(err.expect, Expect::EndOfString);
    assert_eq!(err.at, None);
}

#[test]
fn illegal_escape() {
    let err = fail(br#"{a(b: "x\q")}"#);
    assert_eq!(err.code, ErrorCode::UnexpectedToken);
    assert_eq!(err.index, 9);
    assert_eq!(err.at, Some('q'));
    assert_eq!(err.expect, Expect::EscapedSequence);
}

#[test]
fn short_unicode_escape() {
    assert_fail(
        br#"{a(b: "\u12g4")}"#,
        ErrorCode::UnexpectedToken,
        11,
        Expect::EscapedUnicodeSequence,
    );
}

#[test]
fn control_byte_in_string() {
    assert_fail(
        b"{a(b: \"x\x01\")}",
        ErrorCode::UnexpectedToken,
        8,
        Expect::EndOfString,
    );
}

#[test]
fn unterminated_block_string() {
    assert_fail(
        b"{a(b: \"\"\"abc",
        ErrorCode::UnexpectedEof,
        12,
        Expect::EndOfBlockString,
    );
}

#[test]
fn malformed_numbers() {
    assert_fail(b"{a(b:0x)}", ErrorCode::InvalidNumber, 6, Expect::Val);
    assert_fail(b"{a(b:1.)}", ErrorCode::InvalidNumber, 7, Expect::Val);
    assert_fail(b"{a(b:1e)}", ErrorCode::InvalidNumber, 7, Expect::Val);
    assert_fail(b"{a(b:+1)}", ErrorCode::InvalidNumber, 5, Expect::Val);
    assert_fail(b"{a(b:-)}", ErrorCode::InvalidNumber, 6, Expect::Val);
}

#[test]
fn keyword_value_typo() {
    assert_fail(b"{a(b:nil)}", ErrorCode::InvalidValue, 5, Expect::Val);
    assert_fail(b"{a(b:ture)}", ErrorCode::InvalidValue, 5, Expect::Val);
}

#[test]
fn unclosed_variable_type_wrapper() {
    // `[` without its `]`; the error points just before the revealing `)`.
    assert_fail(
        b"query($x:[Int){a}",
        ErrorCode::InvalidType,
        12,
        Expect::VarType,
    );
}

#[test]
fn closing_bracket_without_wrapper() {
    assert_fail(
        b"query($x:Int]){a}",
        ErrorCode::UnexpectedToken,
        12,
        Expect::VarName,
    );
}

#[test]
fn missing_variable_marker() {
    assert_fail(b"query(x:Int){a}", ErrorCode::UnexpectedToken, 6, Expect::VarName);
}

#[test]
fn missing_variable_reference_name() {
    assert_fail(b"{x(y:$)}", ErrorCode::UnexpectedToken, 6, Expect::VarRefName);
}

#[test]
fn malformed_spread() {
    assert_fail(b"{.a}", ErrorCode::UnexpectedToken, 2, Expect::Frag);
    assert_fail(b"{..a}", ErrorCode::UnexpectedToken, 3, Expect::Frag);
    assert_fail(b"{..", ErrorCode::UnexpectedEof, 3, Expect::Frag);
}

#[test]
fn fragment_named_on() {
    assert_fail(
        b"fragment on on T{x}",
        ErrorCode::IllegalFragmentName,
        9,
        Expect::FragName,
    );
}

#[test]
fn fragment_missing_on() {
    assert_fail(
        b"fragment F of T{x}",
        ErrorCode::UnexpectedToken,
        11,
        Expect::FragKeywordOn,
    );
}

#[test]
fn alias_without_field_name() {
    assert_fail(b"{a:1}", ErrorCode::UnexpectedToken, 3, Expect::FieldName);
}

#[test]
fn definition_keyword_unknown() {
    assert_fail(b"que {a}", ErrorCode::UnexpectedToken, 0, Expect::Def);
}

#[test]
fn truncated_operation() {
    assert_fail(b"query", ErrorCode::UnexpectedEof, 5, Expect::AfterDefKeyword);
}

#[test]
fn argument_without_column() {
    assert_fail(b"{a(b 1)}", ErrorCode::UnexpectedToken, 5, Expect::ColumnAfterArg);
}

#[test]
fn object_field_without_column() {
    assert_fail(
        b"{a(b:{k 1})}",
        ErrorCode::UnexpectedToken,
        8,
        Expect::ColObjFieldName,
    );
}

#[test]
fn empty_selection_set() {
    assert_fail(b"{}", ErrorCode::UnexpectedToken, 1, Expect::FieldNameOrAlias);
}

#[test]
fn callback_abort() {
    let err = scan(b"{a}", |_| true).unwrap_err();
    assert_eq!(err.code, ErrorCode::CallbackAbort);
    assert_eq!(err.index, 0);

    // Abort on the third emission; exactly three tokens are observed.
    let mut seen = Vec::new();
    let err = scan(b"{a(b:1)}", |sc| {
        seen.push(sc.token());
        seen.len() == 3
    })
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::CallbackAbort);
    assert_eq!(seen, [Token::DefQry, Token::Set, Token::Field]);
}

#[test]
fn error_display_renderings() {
    assert_eq!(
        fail(b"{").to_string(),
        "error at index 1: unexpected end of file; expected selection",
    );
    assert_eq!(
        fail(b"{a(b: 01)}").to_string(),
        "error at index 7 ('1'): invalid number value; expected value",
    );
    assert_eq!(
        fail(b"{a(b: \"x\x02\")}").to_string(),
        "error at index 8 (0x2): unexpected token; expected end of string",
    );
}

#[test]
fn error_position_is_first_invalid_offset() {
    // No prefix of a valid document reports an error beyond its own end.
    let doc = b"query Q($x:[Int!]=[1]){f(a:$x){g}}";
    for cut in 1..doc.len() {
        let prefix = &doc[..cut];
        if let Err(err) = collect(prefix) {
            assert!(
                err.index <= prefix.len(),
                "error index {} beyond prefix length {}",
                err.index,
                prefix.len(),
            );
        }
    }
}
