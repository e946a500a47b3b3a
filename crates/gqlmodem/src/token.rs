//! Token kinds emitted by the scanner.

use core::fmt;

/// The kind tag of a scanned token.
///
/// Kinds are stable `u8` identities (`Token as u8`), so callers may switch on
/// them or use them as compact table indices. Payload-bearing kinds (names,
/// strings, numeric literals) convey their bytes through
/// [`Scanner::value`](crate::Scanner::value); structural markers carry no
/// payload.
///
/// # Examples
///
/// ```rust
/// use gqlmodem::{scan, Token};
///
/// let mut fields = Vec::new();
/// scan(b"{user{name}}", |sc| {
///     if sc.token() == Token::Field {
///         fields.extend(sc.value().map(<[u8]>::to_vec));
///     }
///     false
/// })
/// .unwrap();
/// assert_eq!(fields, [b"user".to_vec(), b"name".to_vec()]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Token {
    /// Query operation definition (`query` keyword or a bare selection set).
    DefQry = 1,
    /// Mutation operation definition.
    DefMut,
    /// Subscription operation definition.
    DefSub,
    /// Fragment definition.
    DefFrag,
    /// Operation name.
    OprName,
    /// Directive name (payload excludes the `@` marker).
    DirName,
    /// Variable list opener `(`.
    VarList,
    /// Variable list closer `)`.
    VarListEnd,
    /// Argument list opener `(`.
    ArgList,
    /// Argument list closer `)`.
    ArgListEnd,
    /// Selection set opener `{`.
    Set,
    /// Selection set closer `}`.
    SetEnd,
    /// Fragment type condition (the name after `on`).
    FragTypeCond,
    /// Fragment name in a fragment definition.
    FragName,
    /// Inline fragment type condition (`... on Name`).
    FragInline,
    /// Named fragment spread (`...Name`).
    FragRef,
    /// Field alias (the name before `:`).
    FieldAlias,
    /// Field name.
    Field,
    /// Argument name.
    ArgName,
    /// Enum value literal.
    EnumVal,
    /// Array value opener `[`.
    Arr,
    /// Array value closer `]`.
    ArrEnd,
    /// String value (payload excludes the delimiting quotes).
    Str,
    /// Block string value (raw body; see
    /// [`Scanner::scan_interpreted`](crate::Scanner::scan_interpreted)).
    StrBlock,
    /// Integer value.
    Int,
    /// Float value (a numeric literal with a fraction or exponent).
    Float,
    /// Boolean `true` value.
    True,
    /// Boolean `false` value.
    False,
    /// `null` value.
    Null,
    /// Variable name in a variable declaration (payload excludes `$`).
    VarName,
    /// Variable type name.
    VarTypeName,
    /// Variable list type opener `[`.
    VarTypeArr,
    /// Variable list type closer `]`.
    VarTypeArrEnd,
    /// Non-null marker `!` on a variable type.
    VarTypeNotNull,
    /// Variable reference in value position (payload excludes `$`).
    VarRef,
    /// Object value opener `{`.
    Obj,
    /// Object value closer `}`.
    ObjEnd,
    /// Object field name.
    ObjField,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Token::DefQry => "query definition",
            Token::DefMut => "mutation definition",
            Token::DefSub => "subscription definition",
            Token::DefFrag => "fragment definition",
            Token::OprName => "operation name",
            Token::DirName => "directive name",
            Token::VarList => "variable list",
            Token::VarListEnd => "variable list end",
            Token::ArgList => "argument list",
            Token::ArgListEnd => "argument list end",
            Token::Set => "selection set",
            Token::SetEnd => "selection set end",
            Token::FragTypeCond => "fragment type condition",
            Token::FragName => "fragment name",
            Token::FragInline => "fragment inline",
            Token::FragRef => "named spread",
            Token::FieldAlias => "field alias",
            Token::Field => "field",
            Token::ArgName => "argument name",
            Token::EnumVal => "enum value",
            Token::Arr => "array",
            Token::ArrEnd => "array end",
            Token::Str => "string",
            Token::StrBlock => "block string",
            Token::Int => "integer",
            Token::Float => "float",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::VarName => "variable name",
            Token::VarTypeName => "variable type name",
            Token::VarTypeArr => "variable array type",
            Token::VarTypeArrEnd => "variable array type end",
            Token::VarTypeNotNull => "variable type not null",
            Token::VarRef => "variable reference",
            Token::Obj => "object",
            Token::ObjEnd => "object end",
            Token::ObjField => "object field",
        })
    }
}
