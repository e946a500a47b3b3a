//! Grammar expectations used to drive shared states and annotate errors.

use core::fmt;

/// The grammar construct the scanner expects next.
///
/// Every [`Error`](crate::Error) carries the expectation that was active when
/// the scan failed; its [`Display`](fmt::Display) rendering is the
/// human-readable `expected …` clause of the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Expect {
    /// A value literal.
    Val = 1,
    /// An enum value literal.
    ValEnum,
    /// A default variable value after `=`.
    DefaultVarVal,
    /// An executable definition.
    Def,
    /// An operation name.
    OprName,
    /// A selection set.
    SelSet,
    /// An argument name.
    ArgName,
    /// A legal escape sequence inside a string.
    EscapedSequence,
    /// Four hexadecimal digits of a `\u` escape.
    EscapedUnicodeSequence,
    /// The closing quote of a string.
    EndOfString,
    /// The closing triple-quote of a block string.
    EndOfBlockString,
    /// The `:` between an argument name and its value.
    ColumnAfterArg,
    /// A field name or alias.
    FieldNameOrAlias,
    /// A field name after an alias.
    FieldName,
    /// A selection.
    Sel,
    /// A directive after `@`-bearing positions.
    Dir,
    /// A directive name after `@`.
    DirName,
    /// A variable declaration name.
    VarName,
    /// A referenced variable name after `$` in value position.
    VarRefName,
    /// A variable type.
    VarType,
    /// The `:` between a variable name and its type.
    ColumnAfterVar,
    /// An object field name.
    ObjFieldName,
    /// The `:` between an object field name and its value.
    ColObjFieldName,
    /// A fragment type condition.
    FragTypeCond,
    /// The keyword `on` of a fragment definition.
    FragKeywordOn,
    /// A fragment definition name.
    FragName,
    /// A fragment spread after `...`.
    Frag,
    /// A named spread.
    FragRef,
    /// An inlined fragment type condition.
    FragInlined,
    /// What may follow a field name.
    AfterFieldName,
    /// What may follow a selection.
    AfterSelection,
    /// What may follow an argument value.
    AfterValue,
    /// What may follow an argument list.
    AfterArgList,
    /// What may follow a definition keyword.
    AfterDefKeyword,
    /// What may follow a variable type. Doubles as the expectation while
    /// scanning any variable after the first, so its rendering covers both.
    AfterVarType,
    /// What may follow a variable type name.
    AfterVarTypeName,
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expect::Val => "value",
            Expect::ValEnum => "enum value",
            Expect::DefaultVarVal => "default variable value",
            Expect::Def => "definition",
            Expect::OprName => "operation name",
            Expect::SelSet => "selection set",
            Expect::ArgName => "argument name",
            Expect::EscapedSequence => "escaped sequence",
            Expect::EscapedUnicodeSequence => "escaped unicode sequence",
            Expect::EndOfString => "end of string",
            Expect::EndOfBlockString => "end of block string",
            Expect::ColumnAfterArg => "column after argument name",
            Expect::FieldNameOrAlias => "field name or alias",
            Expect::FieldName => "field name",
            Expect::Sel => "selection",
            Expect::Dir | Expect::DirName => "directive name",
            Expect::VarName => "variable name",
            Expect::VarRefName => "referenced variable name",
            Expect::VarType => "variable type",
            Expect::ColumnAfterVar => "column after variable name",
            Expect::ObjFieldName => "object field name",
            Expect::ColObjFieldName => "column after object field name",
            Expect::FragTypeCond => "fragment type condition",
            Expect::FragKeywordOn => "keyword 'on'",
            Expect::FragName => "fragment name",
            Expect::Frag => "fragment",
            Expect::FragRef => "spread name",
            Expect::FragInlined => "inlined fragment",
            Expect::AfterFieldName => "selection, selection set or end of selection set",
            Expect::AfterSelection => "selection or end of selection set",
            Expect::AfterValue => "argument list closure or argument",
            Expect::AfterArgList => "selection set or selection",
            Expect::AfterDefKeyword => "variable list or selection set",
            Expect::AfterVarType | Expect::AfterVarTypeName => {
                "variable list closure or variable"
            }
        })
    }
}
