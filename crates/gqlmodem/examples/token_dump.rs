//! Prints the token stream of a sample document, one emission per line,
//! indented by selection level.

fn main() {
    let document = br#"
        query Hero($ep: Episode! = JEDI) @cached {
          hero(episode: $ep) {
            name
            friends @include(if: true) { name }
            ...CharacterFields
          }
        }
        fragment CharacterFields on Character {
          id
          appearsIn
        }
    "#;

    let result = gqlmodem::scan(document, |sc| {
        let indent = "  ".repeat(sc.selection_level());
        match sc.value() {
            Some(v) => println!("{indent}{:?} {}", sc.token(), String::from_utf8_lossy(v)),
            None => println!("{indent}{:?}", sc.token()),
        }
        false
    });
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
