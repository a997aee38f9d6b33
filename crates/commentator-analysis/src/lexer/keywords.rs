//! C++ keyword tables.

/// Reserved words, including builtin type names.
pub const KEYWORDS: &[&str] = &[
    "alignas", "alignof", "asm", "auto", "bool", "break", "case", "catch", "char",
    "char8_t", "char16_t", "char32_t", "class", "co_await", "co_return", "co_yield",
    "concept", "const", "const_cast", "consteval", "constexpr", "constinit", "continue",
    "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if",
    "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "nullptr",
    "operator", "private", "protected", "public", "register", "reinterpret_cast",
    "requires", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "thread_local", "throw",
    "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while",
];

/// Keywords that name (or modify the width/sign of) a builtin type.
pub const TYPE_KEYWORDS: &[&str] = &[
    "auto", "bool", "char", "char8_t", "char16_t", "char32_t", "double", "float", "int",
    "long", "short", "signed", "unsigned", "void", "wchar_t",
];

/// Declaration specifiers that may precede a type.
pub const DECL_SPECIFIERS: &[&str] = &[
    "static", "const", "constexpr", "consteval", "constinit", "inline", "extern", "volatile",
    "mutable", "virtual", "register", "thread_local", "explicit", "typename",
];

/// Statements that never declare anything worth a comment.
pub const SKIPPED_STATEMENTS: &[&str] = &[
    "return", "using", "typedef", "goto", "break", "continue", "throw", "delete",
    "static_assert", "co_return", "co_yield", "co_await", "friend", "asm", "new",
    "sizeof", "this", "true", "false", "nullptr",
];

#[inline]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

#[inline]
pub fn is_type_keyword(word: &str) -> bool {
    TYPE_KEYWORDS.contains(&word)
}

#[inline]
pub fn is_decl_specifier(word: &str) -> bool {
    DECL_SPECIFIERS.contains(&word)
}

#[inline]
pub fn is_skipped_statement(word: &str) -> bool {
    SKIPPED_STATEMENTS.contains(&word)
}
