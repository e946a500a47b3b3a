#![no_main]

use gqlmodem::Token;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut depth = 0i64;
    let mut opens = 0i64;
    let result = gqlmodem::scan(data, |sc| {
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
                opens += 1
            }
            Token::ObjEnd
            | Token::ArrEnd
            | Token::ArgListEnd
            | Token::VarListEnd
            | Token::VarTypeArrEnd => opens -= 1,
            _ => {}
        }
        // Payload ranges always alias the input.
        if let Some(tail) = sc.index_tail() {
            assert_eq!(sc.value(), Some(&data[tail..sc.index_head()]));
        }
        false
    });
    match result {
        Ok(()) => {
            assert_eq!(depth, 0);
            assert_eq!(opens, 0);
        }
        Err(err) => {
            assert!(err.index <= data.len());
            // The message renders for every error shape.
            let _ = err.to_string();
        }
    }
});
