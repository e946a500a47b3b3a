use quickcheck::{Arbitrary, Gen, QuickCheck};

use super::utils::collect;
use crate::{scan, ErrorCode, Token};

/// A syntactically valid executable document assembled from fixed pools of
/// names and values.
#[derive(Clone, Debug)]
struct Doc(String);

const NAMES: &[&str] = &["a", "bb", "ccc", "x1", "_u", "Zz9"];
const VALUES: &[&str] = &[
    "1",
    "-2.5",
    "0",
    "1e9",
    "true",
    "false",
    "null",
    "\"str\"",
    "\"\"",
    "$v",
    "RED",
    "[1, 2]",
    "[]",
    "{k: 1}",
    "{k: [true], l: \"s\"}",
];

fn push_selection_set(g: &mut Gen, depth: usize, out: &mut String) {
    out.push('{');
    let fields = usize::arbitrary(g) % 3 + 1;
    for _ in 0..fields {
        out.push_str(g.choose(NAMES).unwrap());
        if bool::arbitrary(g) {
            out.push('(');
            out.push_str(g.choose(NAMES).unwrap());
            out.push(':');
            out.push_str(g.choose(VALUES).unwrap());
            out.push(')');
        }
        if depth > 0 && bool::arbitrary(g) {
            push_selection_set(g, depth - 1, out);
        }
        out.push(' ');
    }
    out.push('}');
}

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut out = String::new();
        if bool::arbitrary(g) {
            out.push_str("query ");
            out.push_str(g.choose(NAMES).unwrap());
            if bool::arbitrary(g) {
                out.push_str("($v: [Int!] = [1]) ");
            } else {
                out.push(' ');
            }
        }
        push_selection_set(g, 2, &mut out);
        Doc(out)
    }
}

/// A document covering most token kinds, used by the abort and thread
/// tests.
const CORPUS: &[u8] = b"query Q($x:[Int!]!=[1] @d(a:1)) @op \
    {f(b:{k:[RED,\"s\"]}) @fd {g} ...F ... on T @i {h}} \
    fragment F on T {z}";

#[test]
fn generated_documents_scan_balanced() {
    fn prop(doc: Doc) -> bool {
        let mut depth = 0i64;
        let mut opens = 0i64;
        let result = scan(doc.0.as_bytes(), |sc| {
            match sc.token() {
                Token::Set => {
                    assert_eq!(sc.selection_level() as i64, depth);
                    depth += 1;
                    opens += 1;
                }
                Token::SetEnd => {
                    depth -= 1;
                    opens -= 1;
                }
                Token::Obj | Token::Arr | Token::ArgList | Token::VarList | Token::VarTypeArr => {
                    opens += 1;
                }
                Token::ObjEnd
                | Token::ArrEnd
                | Token::ArgListEnd
                | Token::VarListEnd
                | Token::VarTypeArrEnd => {
                    opens -= 1;
                }
                _ => {}
            }
            false
        });
        result.is_ok() && depth == 0 && opens == 0
    }
    QuickCheck::new().tests(500).quickcheck(prop as fn(Doc) -> bool);
}

#[test]
fn scanning_is_deterministic() {
    fn prop(doc: Doc) -> bool {
        let first = collect(doc.0.as_bytes());
        let second = collect(doc.0.as_bytes());
        first == second
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(Doc) -> bool);
}

#[test]
fn arbitrary_bytes_never_break_the_scanner() {
    fn prop(bytes: Vec<u8>) -> bool {
        match collect(&bytes) {
            Ok(_) => true,
            Err(err) => {
                // The message renders for every error shape.
                let _ = err.to_string();
                err.index <= bytes.len()
            }
        }
    }
    QuickCheck::new()
        .tests(2_000)
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

#[test]
fn token_payloads_match_their_ranges() {
    fn prop(doc: Doc) -> bool {
        let input = doc.0.as_bytes();
        let mut ok = true;
        let _ = scan(input, |sc| {
            if let Some(tail) = sc.index_tail() {
                ok &= sc.value() == Some(&input[tail..sc.index_head()]);
            } else {
                ok &= sc.value().is_none();
            }
            false
        });
        ok
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(Doc) -> bool);
}

#[test]
fn abort_at_every_position() {
    let full = collect(CORPUS).unwrap();
    assert!(full.len() > 20, "corpus should produce a rich stream");

    for cut in 0..full.len() {
        let mut seen = 0usize;
        let mut prefix = Vec::new();
        let err = scan(CORPUS, |sc| {
            prefix.push(sc.token());
            seen += 1;
            seen > cut
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CallbackAbort);
        assert_eq!(seen, cut + 1);
        let expected: Vec<Token> = full[..=cut].iter().map(|e| e.token).collect();
        assert_eq!(prefix, expected);
    }
}

#[test]
fn repeated_scans_reuse_pooled_state() {
    let baseline = collect(CORPUS).unwrap();
    for _ in 0..64 {
        assert_eq!(collect(CORPUS).unwrap(), baseline);
    }
}

#[test]
fn concurrent_scans_share_the_pool() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                let baseline = collect(CORPUS).unwrap();
                for _ in 0..64 {
                    assert_eq!(collect(CORPUS).unwrap(), baseline);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
