//! The scanner state object and the driver state machine.
//!
//! One pass over the input, no lookahead beyond a bounded window (keyword
//! length, block-string quotes, the spread dots), no allocation on the
//! steady-state path. The driver is a single loop over a [`State`] enum;
//! every state consumes leading separators (and comments where the grammar
//! permits them) before acting, emits tokens through the caller's sink and
//! names its successor.
#![allow(clippy::too_many_lines)]
#![allow(clippy::inline_always)]

use crate::{
    block_string, classify,
    error::{rune_at, Error, ErrorCode},
    expect::Expect,
    pool,
    token::Token,
};

/// Marker for one open composite value. The scanner's stack holds these
/// while traversing nested arrays and objects inside a single argument
/// value; it is empty between arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Composite {
    Obj,
    Arr,
}

/// Positions at which a directive may be attached. Decides where the driver
/// resumes once a directive (and its optional argument list) completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirTarget {
    /// On an operation, between its header and its selection set.
    Opr,
    /// On a variable definition, after its type or default value.
    Var,
    /// On a field, after its name or argument list.
    Field,
    /// On a named fragment spread.
    FragRef,
    /// On an inline fragment or a fragment definition, after the type
    /// condition.
    FragInlineOrDef,
}

impl DirTarget {
    /// The state scanning continues in after the directive.
    fn resume(self) -> State {
        match self {
            DirTarget::Opr | DirTarget::FragInlineOrDef => State::DirList,
            DirTarget::Var => State::AfterVarFollow,
            DirTarget::Field => State::AfterArgList,
            DirTarget::FragRef => State::SpreadFollow,
        }
    }
}

/// Grammar positions of the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Definition,
    AfterDefKeyword,
    AfterFragmentKeyword,
    QueryVar,
    AfterDeclVarName,
    VarType,
    AfterVarTypeName,
    AfterVarTypeNotNull,
    AfterVarType,
    /// Variable-list tail after a default value or variable directive: no
    /// second default is accepted here.
    AfterVarFollow,
    SelectionSet,
    Selection,
    AfterSelection,
    /// After the `...` of a fragment spread.
    Spread,
    /// Between `... on` and the inline type condition.
    FragInlineEntry,
    FragKeywordOn,
    FragTypeCond,
    AfterFieldName,
    ArgList,
    ColumnAfterArgName,
    Value,
    AfterValue,
    AfterArgList,
    /// Name lexing; the current expectation selects the token to emit.
    Name,
    Comment,
    /// At a `@` marker.
    Directive,
    /// After a directive name: an optional argument list follows.
    DirFollow,
    /// Zero or more directives, then a selection set.
    DirList,
    /// After a named spread: optional directives, then back to the
    /// selection.
    SpreadFollow,
    DefinitionEnd,
}

/// Scanner state lent to the sink for the duration of one token emission.
///
/// Payloads are views into the input buffer: [`value`](Scanner::value)
/// borrows with the input's lifetime, so a sink may keep a payload slice as
/// long as the buffer itself lives, or copy it.
///
/// # Examples
///
/// ```rust
/// use gqlmodem::{scan, Token};
///
/// let mut fields = Vec::new();
/// scan(b"query Q { user { id } }", |sc| {
///     if sc.token() == Token::Field {
///         fields.push(sc.value().unwrap().to_vec());
///     }
///     false
/// })
/// .unwrap();
/// assert_eq!(fields, [b"user".to_vec(), b"id".to_vec()]);
/// ```
#[derive(Debug)]
pub struct Scanner<'s> {
    input: &'s [u8],
    /// Index of the next byte to inspect. `0 <= head <= input.len()`.
    head: usize,
    /// First byte of the current token's payload, `None` for structural
    /// markers.
    tail: Option<usize>,
    token: Token,
    expect: Expect,
    sel_depth: usize,
    stack: pool::Lease,
}

/// Scans `input` as a GraphQL executable document, invoking `sink` once per
/// token in source order.
///
/// The sink returns `true` to abort, which surfaces as
/// [`ErrorCode::CallbackAbort`]. The first error ends the scan; no recovery
/// is attempted.
///
/// # Errors
///
/// Returns the first lexical error with its byte offset, the code point at
/// that offset and the construct the scanner was expecting.
///
/// # Examples
///
/// ```rust
/// use gqlmodem::{scan, Token};
///
/// let mut kinds = Vec::new();
/// scan(b"{a}", |sc| {
///     kinds.push(sc.token());
///     false
/// })
/// .unwrap();
/// assert_eq!(kinds, [Token::DefQry, Token::Set, Token::Field, Token::SetEnd]);
/// ```
pub fn scan<'s, F>(input: &'s [u8], mut sink: F) -> Result<(), Error>
where
    F: FnMut(&Scanner<'s>) -> bool,
{
    let mut scanner = Scanner::new(input);
    scanner.run(&mut sink)
}

impl<'s> Scanner<'s> {
    fn new(input: &'s [u8]) -> Self {
        Scanner {
            input,
            head: 0,
            tail: None,
            token: Token::DefQry,
            expect: Expect::Def,
            sel_depth: 0,
            stack: pool::Lease::acquire(),
        }
    }

    /// The kind of the token currently being emitted.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// The payload of the current token, or `None` for structural markers.
    ///
    /// For [`Token::StrBlock`] this is the raw uninterpreted body; use
    /// [`scan_interpreted`](Scanner::scan_interpreted) for the interpreted
    /// contents.
    #[must_use]
    pub fn value(&self) -> Option<&'s [u8]> {
        self.tail.map(|tail| &self.input[tail..self.head])
    }

    /// Number of currently open selection sets.
    #[must_use]
    pub fn selection_level(&self) -> usize {
        self.sel_depth
    }

    /// The current head index.
    #[must_use]
    pub fn index_head(&self) -> usize {
        self.head
    }

    /// The start index of the current token's payload, or `None` when the
    /// token has no byte range.
    #[must_use]
    pub fn index_tail(&self) -> Option<usize> {
        self.tail
    }

    /// Streams the interpreted contents of the current token through
    /// `buffer` into `sink` until the end of the value or until `sink`
    /// returns `true`.
    ///
    /// For [`Token::StrBlock`] the GraphQL block-string interpretation is
    /// applied; any other payload is streamed verbatim in `buffer`-sized
    /// chunks. An empty buffer streams nothing.
    pub fn scan_interpreted<F>(&self, buffer: &mut [u8], mut sink: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        let value = self.value().unwrap_or(&[]);
        if self.token == Token::StrBlock {
            block_string::write_interpreted(value, buffer, &mut sink);
        } else {
            block_string::write_raw(value, buffer, &mut sink);
        }
    }

    // ------------------------------------------------------------------
    // Driver internals
    // ------------------------------------------------------------------

    #[inline(always)]
    fn at_end(&self) -> bool {
        self.head >= self.input.len()
    }

    /// The byte at the head. Callers check `at_end` first.
    #[inline(always)]
    fn byte(&self) -> u8 {
        self.input[self.head]
    }

    #[inline(always)]
    fn peek(&self, n: usize) -> Option<u8> {
        self.input.get(self.head + n).copied()
    }

    /// Advances the head past spaces, tabs, line feeds, carriage returns
    /// and commas.
    #[inline(always)]
    fn skip_separators(&mut self) {
        while self.head < self.input.len() && classify::is_separator(self.input[self.head]) {
            self.head += 1;
        }
    }

    fn fail(&self, code: ErrorCode) -> Error {
        Error {
            index: self.head,
            at: rune_at(self.input, self.head),
            code,
            expect: self.expect,
        }
    }

    /// The expectation to report for errors in value position: the default
    /// variable value annotation survives, everything else is a plain
    /// value.
    fn value_expect(&self) -> Expect {
        if self.expect == Expect::DefaultVarVal {
            Expect::DefaultVarVal
        } else {
            Expect::Val
        }
    }

    #[inline(always)]
    fn emit<F>(&mut self, sink: &mut F, token: Token) -> Result<(), Error>
    where
        F: FnMut(&Scanner<'s>) -> bool,
    {
        self.token = token;
        if sink(self) {
            return Err(self.fail(ErrorCode::CallbackAbort));
        }
        Ok(())
    }

    /// Emits a token without a payload range.
    #[inline(always)]
    fn emit_marker<F>(&mut self, sink: &mut F, token: Token) -> Result<(), Error>
    where
        F: FnMut(&Scanner<'s>) -> bool,
    {
        self.tail = None;
        self.emit(sink, token)
    }

    fn run<F>(&mut self, sink: &mut F) -> Result<(), Error>
    where
        F: FnMut(&Scanner<'s>) -> bool,
    {
        // Nesting depth of `[` wrappers in the variable type being scanned.
        let mut type_arr_lvl = 0usize;
        // Where scanning resumes after the directive in flight.
        let mut dir_target = DirTarget::Opr;
        // Whether the open argument list belongs to a directive.
        let mut dir_args = false;
        // Whether the value being scanned is a variable's default value.
        let mut in_default_val = false;

        self.skip_separators();
        if self.at_end() {
            self.expect = Expect::Def;
            return Err(self.fail(ErrorCode::UnexpectedEof));
        }

        let mut state = State::Definition;
        loop {
            state = match state {
                State::Definition => {
                    if self.at_end() {
                        State::DefinitionEnd
                    } else if self.byte() == b'#' {
                        self.expect = Expect::Def;
                        State::Comment
                    } else if self.byte() == b'{' {
                        // A bare selection set is a query shorthand; the `{`
                        // also opens the set, so the head stays put.
                        self.emit_marker(sink, Token::DefQry)?;
                        self.expect = Expect::SelSet;
                        State::SelectionSet
                    } else if classify::keyword_at(self.input, self.head, b"query") {
                        self.emit_marker(sink, Token::DefQry)?;
                        self.head += 5;
                        self.expect = Expect::AfterDefKeyword;
                        State::AfterDefKeyword
                    } else if classify::keyword_at(self.input, self.head, b"mutation") {
                        self.emit_marker(sink, Token::DefMut)?;
                        self.head += 8;
                        self.expect = Expect::AfterDefKeyword;
                        State::AfterDefKeyword
                    } else if classify::keyword_at(self.input, self.head, b"subscription") {
                        self.emit_marker(sink, Token::DefSub)?;
                        self.head += 12;
                        self.expect = Expect::AfterDefKeyword;
                        State::AfterDefKeyword
                    } else if classify::keyword_at(self.input, self.head, b"fragment") {
                        self.emit_marker(sink, Token::DefFrag)?;
                        self.head += 8;
                        self.expect = Expect::FragName;
                        State::AfterFragmentKeyword
                    } else {
                        self.expect = Expect::Def;
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    }
                }

                State::AfterDefKeyword => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    match self.byte() {
                        b'#' => State::Comment,
                        b'{' => {
                            self.expect = Expect::SelSet;
                            State::SelectionSet
                        }
                        b'(' => {
                            self.emit_marker(sink, Token::VarList)?;
                            self.head += 1;
                            self.expect = Expect::VarName;
                            State::QueryVar
                        }
                        b'@' => {
                            dir_target = DirTarget::Opr;
                            State::Directive
                        }
                        _ => {
                            self.expect = Expect::OprName;
                            State::Name
                        }
                    }
                }

                State::AfterFragmentKeyword => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else {
                        State::Name
                    }
                }

                State::QueryVar => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.head + 1 >= self.input.len() {
                        // A variable marker needs at least one name byte.
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    } else if self.byte() != b'$' {
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    } else {
                        self.head += 1;
                        State::Name
                    }
                }

                State::AfterDeclVarName => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() != b':' {
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    } else {
                        self.head += 1;
                        self.expect = Expect::VarType;
                        State::VarType
                    }
                }

                State::VarType => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() == b'[' {
                        self.emit_marker(sink, Token::VarTypeArr)?;
                        self.head += 1;
                        type_arr_lvl += 1;
                        State::VarType
                    } else {
                        self.expect = Expect::VarType;
                        State::Name
                    }
                }

                State::AfterVarTypeName => {
                    self.skip_separators();
                    if !self.at_end() && self.byte() == b'!' {
                        self.emit_marker(sink, Token::VarTypeNotNull)?;
                        self.head += 1;
                    }
                    State::AfterVarTypeNotNull
                }

                State::AfterVarTypeNotNull => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() == b']' {
                        if type_arr_lvl < 1 {
                            self.expect = Expect::VarName;
                            return Err(self.fail(ErrorCode::UnexpectedToken));
                        }
                        self.emit_marker(sink, Token::VarTypeArrEnd)?;
                        self.head += 1;
                        type_arr_lvl -= 1;
                        self.skip_separators();
                        if !self.at_end() && self.byte() == b'!' {
                            self.emit_marker(sink, Token::VarTypeNotNull)?;
                            self.head += 1;
                        }
                        if type_arr_lvl > 0 {
                            State::AfterVarTypeName
                        } else {
                            self.expect = Expect::AfterVarType;
                            State::AfterVarType
                        }
                    } else {
                        self.expect = Expect::AfterVarType;
                        State::AfterVarType
                    }
                }

                State::AfterVarType => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if type_arr_lvl != 0 {
                        // An unclosed `[` wrapper; point at the byte before
                        // the one that revealed it.
                        self.head -= 1;
                        self.expect = Expect::VarType;
                        return Err(self.fail(ErrorCode::InvalidType));
                    } else if self.byte() == b'=' {
                        self.head += 1;
                        self.stack.clear();
                        in_default_val = true;
                        self.expect = Expect::DefaultVarVal;
                        State::Value
                    } else if self.byte() == b'@' {
                        dir_target = DirTarget::Var;
                        State::Directive
                    } else if self.byte() != b')' {
                        self.expect = Expect::AfterVarType;
                        State::QueryVar
                    } else {
                        self.emit_marker(sink, Token::VarListEnd)?;
                        self.head += 1;
                        dir_target = DirTarget::Opr;
                        State::DirList
                    }
                }

                State::AfterVarFollow => {
                    self.skip_separators();
                    if self.at_end() {
                        self.expect = Expect::AfterVarType;
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    match self.byte() {
                        b'#' => {
                            dir_target = DirTarget::Var;
                            self.expect = Expect::Dir;
                            State::Comment
                        }
                        b'@' => {
                            dir_target = DirTarget::Var;
                            State::Directive
                        }
                        b')' => {
                            self.emit_marker(sink, Token::VarListEnd)?;
                            self.head += 1;
                            dir_target = DirTarget::Opr;
                            State::DirList
                        }
                        _ => {
                            self.expect = Expect::AfterVarType;
                            State::QueryVar
                        }
                    }
                }

                State::SelectionSet => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() != b'{' {
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    } else {
                        self.emit_marker(sink, Token::Set)?;
                        self.sel_depth += 1;
                        self.head += 1;
                        self.expect = Expect::Sel;
                        State::Selection
                    }
                }

                State::Selection => {
                    self.skip_separators();
                    if self.at_end() {
                        self.expect = Expect::Sel;
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        self.expect = Expect::Sel;
                        State::Comment
                    } else if self.byte() != b'.' {
                        self.expect = Expect::FieldNameOrAlias;
                        State::Name
                    } else {
                        self.expect = Expect::Frag;
                        let len = self.input.len();
                        if self.head + 2 >= len {
                            self.head = if self.head + 1 >= len {
                                self.head + 1
                            } else {
                                self.head + 2
                            };
                            return Err(self.fail(ErrorCode::UnexpectedEof));
                        }
                        if self.input[self.head + 2] != b'.' || self.input[self.head + 1] != b'.' {
                            // Point at the first byte breaking the spread.
                            if self.input[self.head + 1] != b'.' {
                                self.head += 1;
                            } else {
                                self.head += 2;
                            }
                            return Err(self.fail(ErrorCode::UnexpectedToken));
                        }
                        self.head += 3;
                        State::Spread
                    }
                }

                State::Spread => {
                    self.skip_separators();
                    if self.head + 1 >= self.input.len() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() == b'o' && self.peek(1) == Some(b'n') {
                        match self.peek(2) {
                            None => {
                                self.head = self.input.len();
                                return Err(self.fail(ErrorCode::UnexpectedEof));
                            }
                            Some(b) if classify::is_separator(b) || b == b'#' => {
                                self.head += 2;
                                self.expect = Expect::FragInlined;
                                State::FragInlineEntry
                            }
                            // A name merely starting with `on` is a spread.
                            Some(_) => {
                                self.expect = Expect::FragRef;
                                State::Name
                            }
                        }
                    } else {
                        self.expect = Expect::FragRef;
                        State::Name
                    }
                }

                State::FragInlineEntry => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else {
                        State::Name
                    }
                }

                State::FragKeywordOn => {
                    self.skip_separators();
                    if self.head + 1 >= self.input.len() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() != b'o' || self.input[self.head + 1] != b'n' {
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    } else {
                        self.head += 2;
                        self.expect = Expect::FragTypeCond;
                        State::FragTypeCond
                    }
                }

                State::FragTypeCond => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else {
                        State::Name
                    }
                }

                State::AfterFieldName => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    match self.byte() {
                        b'(' => {
                            self.emit_marker(sink, Token::ArgList)?;
                            self.head += 1;
                            self.skip_separators();
                            self.expect = Expect::ArgName;
                            dir_args = false;
                            State::ArgList
                        }
                        b'{' => {
                            self.expect = Expect::SelSet;
                            State::SelectionSet
                        }
                        b'#' => {
                            self.expect = Expect::AfterFieldName;
                            State::Comment
                        }
                        b'@' => {
                            dir_target = DirTarget::Field;
                            State::Directive
                        }
                        _ => {
                            self.expect = Expect::AfterSelection;
                            State::AfterSelection
                        }
                    }
                }

                State::ArgList => {
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else {
                        State::Name
                    }
                }

                State::ColumnAfterArgName => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() != b':' {
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    } else {
                        self.head += 1;
                        self.stack.clear();
                        self.expect = Expect::Val;
                        State::Value
                    }
                }

                State::Value => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    match self.byte() {
                        b'#' => State::Comment,
                        b'{' => {
                            self.emit_marker(sink, Token::Obj)?;
                            self.stack.push(Composite::Obj);
                            self.head += 1;
                            self.skip_separators();
                            self.expect = Expect::ObjFieldName;
                            State::Name
                        }
                        b'[' => {
                            self.emit_marker(sink, Token::Arr)?;
                            self.head += 1;
                            self.skip_separators();
                            if self.at_end() {
                                self.expect = Expect::Val;
                                return Err(self.fail(ErrorCode::UnexpectedEof));
                            }
                            if self.byte() == b']' {
                                self.emit_marker(sink, Token::ArrEnd)?;
                                self.head += 1;
                            } else {
                                self.stack.push(Composite::Arr);
                            }
                            self.expect = Expect::AfterValue;
                            State::AfterValue
                        }
                        b'"' => self.lex_string(sink)?,
                        b'$' => {
                            self.head += 1;
                            self.expect = Expect::VarRefName;
                            State::Name
                        }
                        b'n' => self.lex_value_keyword(sink, b"null", Token::Null)?,
                        b't' => self.lex_value_keyword(sink, b"true", Token::True)?,
                        b'f' => self.lex_value_keyword(sink, b"false", Token::False)?,
                        b'+' | b'-' | b'0'..=b'9' => self.lex_number(sink)?,
                        b if classify::is_name_start(b) => {
                            self.expect = Expect::ValEnum;
                            State::Name
                        }
                        _ => {
                            self.expect = self.value_expect();
                            return Err(self.fail(ErrorCode::InvalidValue));
                        }
                    }
                }

                State::AfterValue => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else {
                        match self.stack.top() {
                            Some(Composite::Obj) => {
                                if self.byte() == b'}' {
                                    self.stack.pop();
                                    self.emit_marker(sink, Token::ObjEnd)?;
                                    self.head += 1;
                                    self.expect = Expect::AfterValue;
                                    State::AfterValue
                                } else {
                                    self.expect = Expect::ObjFieldName;
                                    State::Name
                                }
                            }
                            Some(Composite::Arr) => {
                                if self.byte() == b']' {
                                    self.stack.pop();
                                    self.emit_marker(sink, Token::ArrEnd)?;
                                    self.head += 1;
                                    self.expect = Expect::AfterValue;
                                    State::AfterValue
                                } else {
                                    State::Value
                                }
                            }
                            None if in_default_val => {
                                in_default_val = false;
                                State::AfterVarFollow
                            }
                            None => {
                                if self.byte() == b')' {
                                    self.emit_marker(sink, Token::ArgListEnd)?;
                                    self.head += 1;
                                    if dir_args {
                                        dir_args = false;
                                        dir_target.resume()
                                    } else {
                                        self.expect = Expect::AfterArgList;
                                        State::AfterArgList
                                    }
                                } else {
                                    self.expect = Expect::ArgName;
                                    State::Name
                                }
                            }
                        }
                    }
                }

                State::AfterArgList => {
                    self.expect = Expect::AfterArgList;
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    match self.byte() {
                        b'#' => State::Comment,
                        b'{' => {
                            self.expect = Expect::SelSet;
                            State::SelectionSet
                        }
                        b'}' => {
                            self.expect = Expect::AfterSelection;
                            State::AfterSelection
                        }
                        b'@' => {
                            dir_target = DirTarget::Field;
                            State::Directive
                        }
                        _ => {
                            self.expect = Expect::Sel;
                            State::Selection
                        }
                    }
                }

                State::AfterSelection => {
                    self.skip_separators();
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if self.byte() == b'#' {
                        State::Comment
                    } else if self.byte() == b'}' {
                        self.emit_marker(sink, Token::SetEnd)?;
                        self.sel_depth -= 1;
                        self.head += 1;
                        self.skip_separators();
                        if self.sel_depth < 1 {
                            State::DefinitionEnd
                        } else {
                            State::AfterSelection
                        }
                    } else {
                        self.expect = Expect::Sel;
                        State::Selection
                    }
                }

                State::Name => {
                    if self.at_end() {
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    let start = self.head;
                    self.tail = Some(start);
                    if !classify::is_name_start(self.byte()) {
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    }
                    self.head += 1;
                    // Eight name-body checks per round while comfortably
                    // inside the buffer, then a byte-wise tail.
                    'bulk: while self.head + 8 <= self.input.len() {
                        for _ in 0..8 {
                            if !classify::is_name_body(self.input[self.head]) {
                                break 'bulk;
                            }
                            self.head += 1;
                        }
                    }
                    while self.head < self.input.len()
                        && classify::is_name_body(self.input[self.head])
                    {
                        self.head += 1;
                    }
                    if self.head < self.input.len() {
                        let b = self.byte();
                        if classify::is_control(b) && !classify::is_separator(b) {
                            return Err(self.fail(ErrorCode::UnexpectedToken));
                        }
                    }

                    match self.expect {
                        Expect::FieldNameOrAlias => {
                            let name_end = self.head;
                            self.skip_separators();
                            if self.at_end() {
                                return Err(self.fail(ErrorCode::UnexpectedEof));
                            }
                            if self.byte() == b':' {
                                let colon = self.head;
                                self.head = name_end;
                                self.emit(sink, Token::FieldAlias)?;
                                self.head = colon + 1;
                                self.skip_separators();
                                self.expect = Expect::FieldName;
                                State::Name
                            } else {
                                self.head = name_end;
                                self.emit(sink, Token::Field)?;
                                State::AfterFieldName
                            }
                        }
                        Expect::FieldName => {
                            self.emit(sink, Token::Field)?;
                            State::AfterFieldName
                        }
                        Expect::ArgName => {
                            self.emit(sink, Token::ArgName)?;
                            self.skip_separators();
                            self.expect = Expect::ColumnAfterArg;
                            State::ColumnAfterArgName
                        }
                        Expect::ObjFieldName => {
                            self.emit(sink, Token::ObjField)?;
                            self.skip_separators();
                            if self.at_end() {
                                self.expect = Expect::ColObjFieldName;
                                return Err(self.fail(ErrorCode::UnexpectedEof));
                            }
                            if self.byte() != b':' {
                                self.expect = Expect::ColObjFieldName;
                                return Err(self.fail(ErrorCode::UnexpectedToken));
                            }
                            self.head += 1;
                            self.skip_separators();
                            self.expect = Expect::Val;
                            State::Value
                        }
                        Expect::VarRefName => {
                            self.emit(sink, Token::VarRef)?;
                            self.expect = Expect::AfterValue;
                            State::AfterValue
                        }
                        Expect::VarType => {
                            self.emit(sink, Token::VarTypeName)?;
                            self.expect = Expect::AfterVarTypeName;
                            State::AfterVarTypeName
                        }
                        Expect::VarName | Expect::AfterVarType => {
                            self.emit(sink, Token::VarName)?;
                            self.expect = Expect::ColumnAfterVar;
                            State::AfterDeclVarName
                        }
                        Expect::OprName => {
                            self.emit(sink, Token::OprName)?;
                            self.skip_separators();
                            if self.at_end() {
                                self.expect = Expect::SelSet;
                                return Err(self.fail(ErrorCode::UnexpectedEof));
                            }
                            match self.byte() {
                                b'{' => {
                                    self.expect = Expect::SelSet;
                                    State::SelectionSet
                                }
                                b'(' => {
                                    self.emit_marker(sink, Token::VarList)?;
                                    self.head += 1;
                                    self.expect = Expect::VarName;
                                    State::QueryVar
                                }
                                b'@' => {
                                    dir_target = DirTarget::Opr;
                                    State::Directive
                                }
                                _ => {
                                    self.expect = Expect::SelSet;
                                    return Err(self.fail(ErrorCode::UnexpectedToken));
                                }
                            }
                        }
                        Expect::ValEnum => {
                            self.emit(sink, Token::EnumVal)?;
                            self.expect = Expect::AfterValue;
                            State::AfterValue
                        }
                        Expect::FragInlined => {
                            self.emit(sink, Token::FragInline)?;
                            dir_target = DirTarget::FragInlineOrDef;
                            State::DirList
                        }
                        Expect::FragRef => {
                            self.emit(sink, Token::FragRef)?;
                            dir_target = DirTarget::FragRef;
                            State::SpreadFollow
                        }
                        Expect::FragName => {
                            if &self.input[start..self.head] == b"on" {
                                // `on` is reserved for type conditions.
                                self.head = start;
                                return Err(self.fail(ErrorCode::IllegalFragmentName));
                            }
                            self.emit(sink, Token::FragName)?;
                            self.expect = Expect::FragKeywordOn;
                            State::FragKeywordOn
                        }
                        Expect::FragTypeCond => {
                            self.emit(sink, Token::FragTypeCond)?;
                            dir_target = DirTarget::FragInlineOrDef;
                            State::DirList
                        }
                        Expect::DirName => {
                            self.emit(sink, Token::DirName)?;
                            State::DirFollow
                        }
                        _ => unreachable!("unhandled expectation at name dispatch: {:?}", self.expect),
                    }
                }

                State::Directive => {
                    // Callers position the head at the `@` marker.
                    self.head += 1;
                    self.expect = Expect::DirName;
                    State::Name
                }

                State::DirFollow => {
                    self.skip_separators();
                    if self.at_end() {
                        dir_target.resume()
                    } else {
                        match self.byte() {
                            b'#' => State::Comment,
                            b'(' => {
                                self.emit_marker(sink, Token::ArgList)?;
                                self.head += 1;
                                self.skip_separators();
                                self.expect = Expect::ArgName;
                                dir_args = true;
                                State::ArgList
                            }
                            _ => dir_target.resume(),
                        }
                    }
                }

                State::DirList => {
                    self.skip_separators();
                    match self.peek(0) {
                        Some(b'@') => State::Directive,
                        Some(b'#') => {
                            self.expect = Expect::Dir;
                            State::Comment
                        }
                        _ => {
                            self.expect = Expect::SelSet;
                            State::SelectionSet
                        }
                    }
                }

                State::SpreadFollow => {
                    self.skip_separators();
                    match self.peek(0) {
                        Some(b'@') => State::Directive,
                        Some(b'#') => {
                            self.expect = Expect::Dir;
                            State::Comment
                        }
                        _ => {
                            self.expect = Expect::AfterSelection;
                            State::AfterSelection
                        }
                    }
                }

                State::Comment => {
                    self.head += 1;
                    // Eight bytes per round to the line feed, then a
                    // byte-wise tail.
                    'bulk: while self.head + 8 <= self.input.len() {
                        for _ in 0..8 {
                            if self.input[self.head] == b'\n' {
                                break 'bulk;
                            }
                            self.head += 1;
                        }
                    }
                    while self.head < self.input.len() && self.input[self.head] != b'\n' {
                        self.head += 1;
                    }
                    self.tail = None;
                    self.skip_separators();
                    match self.expect {
                        Expect::Def => State::Definition,
                        Expect::SelSet => State::SelectionSet,
                        Expect::Sel => State::Selection,
                        Expect::AfterSelection => State::AfterSelection,
                        Expect::VarName => State::QueryVar,
                        Expect::ArgName => State::ArgList,
                        Expect::ColumnAfterArg => State::ColumnAfterArgName,
                        Expect::Val | Expect::DefaultVarVal => State::Value,
                        Expect::AfterFieldName => State::AfterFieldName,
                        Expect::AfterValue => State::AfterValue,
                        Expect::AfterArgList => State::AfterArgList,
                        Expect::AfterDefKeyword => State::AfterDefKeyword,
                        Expect::FragName => State::AfterFragmentKeyword,
                        Expect::FragKeywordOn => State::FragKeywordOn,
                        Expect::FragTypeCond => State::FragTypeCond,
                        Expect::FragInlined => State::FragInlineEntry,
                        Expect::Frag => State::Spread,
                        Expect::ColumnAfterVar => State::AfterDeclVarName,
                        Expect::VarType => State::VarType,
                        Expect::AfterVarType => State::AfterVarType,
                        Expect::AfterVarTypeName => State::AfterVarTypeName,
                        Expect::Dir => dir_target.resume(),
                        Expect::DirName => State::DirFollow,
                        // Expectations a comment cannot precede.
                        _ => State::DefinitionEnd,
                    }
                }

                State::DefinitionEnd => {
                    self.sel_depth = 0;
                    self.expect = Expect::Def;
                    self.skip_separators();
                    if self.at_end() {
                        return Ok(());
                    }
                    State::Definition
                }
            };
        }
    }

    /// Lexes one of the fixed value keywords `null`, `true`, `false`.
    fn lex_value_keyword<F>(
        &mut self,
        sink: &mut F,
        keyword: &'static [u8],
        token: Token,
    ) -> Result<State, Error>
    where
        F: FnMut(&Scanner<'s>) -> bool,
    {
        if self.head + keyword.len() > self.input.len() {
            self.head = self.input.len();
            self.expect = self.value_expect();
            return Err(self.fail(ErrorCode::UnexpectedEof));
        }
        if &self.input[self.head..self.head + keyword.len()] != keyword {
            self.expect = self.value_expect();
            return Err(self.fail(ErrorCode::InvalidValue));
        }
        self.tail = Some(self.head);
        self.head += keyword.len();
        self.emit(sink, token)?;
        self.expect = Expect::AfterValue;
        Ok(State::AfterValue)
    }

    /// Lexes a numeric literal. Emits [`Token::Int`] when neither a
    /// fraction nor an exponent was seen, [`Token::Float`] otherwise.
    fn lex_number<F>(&mut self, sink: &mut F) -> Result<State, Error>
    where
        F: FnMut(&Scanner<'s>) -> bool,
    {
        enum Stage {
            Integer,
            Fraction,
            Exponent,
            Emit,
        }

        let len = self.input.len();
        self.tail = Some(self.head);
        let mut float = false;
        let mut stage = Stage::Integer;

        match self.byte() {
            b'-' => {
                self.head += 1;
                if self.head >= len {
                    // At least one digit is required after the sign.
                    self.expect = self.value_expect();
                    return Err(self.fail(ErrorCode::UnexpectedEof));
                }
            }
            b'0' => {
                self.head += 1;
                if self.head < len {
                    let b = self.input[self.head];
                    if b == b'.' {
                        self.head += 1;
                        float = true;
                        stage = Stage::Fraction;
                    } else if b == b'e' || b == b'E' {
                        self.head += 1;
                        float = true;
                        stage = Stage::Exponent;
                    } else if classify::is_number_end(b) {
                        stage = Stage::Emit;
                    } else {
                        // A leading zero admits no further digits.
                        self.expect = self.value_expect();
                        return Err(self.fail(ErrorCode::InvalidNumber));
                    }
                }
            }
            _ => {}
        }

        loop {
            match stage {
                Stage::Integer => {
                    let start = self.head;
                    let mut next = None;
                    while self.head < len {
                        let b = self.input[self.head];
                        if classify::is_digit(b) {
                            self.head += 1;
                            continue;
                        }
                        if b == b'.' {
                            self.head += 1;
                            float = true;
                            next = Some(Stage::Fraction);
                            break;
                        }
                        if classify::is_number_end(b) {
                            if self.head == start {
                                self.expect = self.value_expect();
                                return Err(self.fail(ErrorCode::InvalidNumber));
                            }
                            next = Some(Stage::Emit);
                            break;
                        }
                        if b == b'e' || b == b'E' {
                            self.head += 1;
                            float = true;
                            next = Some(Stage::Exponent);
                            break;
                        }
                        self.expect = self.value_expect();
                        return Err(self.fail(ErrorCode::InvalidNumber));
                    }
                    stage = next.unwrap_or(Stage::Emit);
                }
                Stage::Fraction => {
                    let start = self.head;
                    let mut next = None;
                    while self.head < len {
                        let b = self.input[self.head];
                        if classify::is_digit(b) {
                            self.head += 1;
                            continue;
                        }
                        if classify::is_number_end(b) {
                            if self.head == start {
                                self.expect = self.value_expect();
                                return Err(self.fail(ErrorCode::InvalidNumber));
                            }
                            next = Some(Stage::Emit);
                            break;
                        }
                        if b == b'e' || b == b'E' {
                            self.head += 1;
                            next = Some(Stage::Exponent);
                            break;
                        }
                        self.expect = self.value_expect();
                        return Err(self.fail(ErrorCode::InvalidNumber));
                    }
                    match next {
                        Some(n) => stage = n,
                        None => {
                            if self.head == start {
                                self.expect = self.value_expect();
                                return Err(self.fail(ErrorCode::UnexpectedEof));
                            }
                            stage = Stage::Emit;
                        }
                    }
                }
                Stage::Exponent => {
                    if self.head >= len {
                        self.expect = self.value_expect();
                        return Err(self.fail(ErrorCode::UnexpectedEof));
                    }
                    if matches!(self.input[self.head], b'-' | b'+') {
                        self.head += 1;
                    }
                    let start = self.head;
                    let mut done = false;
                    while self.head < len {
                        let b = self.input[self.head];
                        if classify::is_digit(b) {
                            self.head += 1;
                            continue;
                        }
                        if classify::is_number_end(b) && self.head != start {
                            done = true;
                        }
                        break;
                    }
                    if !done {
                        self.expect = self.value_expect();
                        return Err(self.fail(ErrorCode::InvalidNumber));
                    }
                    stage = Stage::Emit;
                }
                Stage::Emit => {
                    self.emit(sink, if float { Token::Float } else { Token::Int })?;
                    self.expect = Expect::AfterValue;
                    return Ok(State::AfterValue);
                }
            }
        }
    }

    /// Lexes a string or block string. The head is at the opening quote.
    fn lex_string<F>(&mut self, sink: &mut F) -> Result<State, Error>
    where
        F: FnMut(&Scanner<'s>) -> bool,
    {
        let len = self.input.len();
        self.head += 1;
        self.tail = Some(self.head);

        if self.head + 1 < len && self.input[self.head] == b'"' && self.input[self.head + 1] == b'"'
        {
            self.head += 2;
            self.tail = Some(self.head);
            return self.lex_block_string(sink);
        }

        let mut escaped = false;
        loop {
            if !escaped {
                // Eight bytes per round to the next quote, backslash or
                // control byte.
                'bulk: while self.head + 8 <= len {
                    for _ in 0..8 {
                        let b = self.input[self.head];
                        if b == b'"' || b == b'\\' || b < 0x20 {
                            break 'bulk;
                        }
                        self.head += 1;
                    }
                }
            }
            if self.head >= len {
                break;
            }
            let b = self.byte();
            if classify::is_control(b) {
                self.expect = Expect::EndOfString;
                return Err(self.fail(ErrorCode::UnexpectedToken));
            }
            if escaped {
                match b {
                    b'\\' | b'/' | b'"' | b'b' | b'f' | b'r' | b'n' | b't' => self.head += 1,
                    b'u' => {
                        self.head += 1;
                        for _ in 0..4 {
                            if self.head >= len {
                                self.expect = Expect::EscapedUnicodeSequence;
                                return Err(self.fail(ErrorCode::UnexpectedEof));
                            }
                            if !classify::is_hex_digit(self.input[self.head]) {
                                self.expect = Expect::EscapedUnicodeSequence;
                                return Err(self.fail(ErrorCode::UnexpectedToken));
                            }
                            self.head += 1;
                        }
                    }
                    _ => {
                        self.expect = Expect::EscapedSequence;
                        return Err(self.fail(ErrorCode::UnexpectedToken));
                    }
                }
                escaped = false;
                continue;
            }
            if b == b'"' {
                // Payload excludes the delimiters; the head advances past
                // the closing quote after the emission.
                self.emit(sink, Token::Str)?;
                self.head += 1;
                self.expect = Expect::AfterValue;
                return Ok(State::AfterValue);
            }
            if b == b'\\' {
                escaped = true;
            }
            self.head += 1;
        }
        self.expect = Expect::EndOfString;
        Err(self.fail(ErrorCode::UnexpectedEof))
    }

    /// Lexes a block string body. The head is past the opening `"""`.
    fn lex_block_string<F>(&mut self, sink: &mut F) -> Result<State, Error>
    where
        F: FnMut(&Scanner<'s>) -> bool,
    {
        let len = self.input.len();
        self.expect = Expect::EndOfBlockString;
        while self.head < len {
            let b = self.input[self.head];
            if b == b'\\'
                && self.peek(3) == Some(b'"')
                && self.peek(2) == Some(b'"')
                && self.peek(1) == Some(b'"')
            {
                self.head += 4;
                continue;
            }
            if b == b'"' && self.peek(1) == Some(b'"') && self.peek(2) == Some(b'"') {
                self.emit(sink, Token::StrBlock)?;
                self.head += 3;
                return Ok(State::AfterValue);
            }
            self.head += 1;
        }
        // Unterminated; the after-value entry reports the end of input with
        // the block-string expectation.
        Ok(State::AfterValue)
    }
}
