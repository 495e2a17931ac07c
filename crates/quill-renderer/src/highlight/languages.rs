//! Per-language highlighting tables.
//!
//! One immutable [`SyntaxConfig`] per canonical language name, plus an alias
//! table. A language that is not listed here gets no highlighting at all.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Extra highlighting passes a language family needs beyond plain tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Programming languages: only the generic token passes.
    Code,
    /// HTML/XML: tag names and attribute names.
    Markup,
    /// CSS: `property: value` pairs.
    Stylesheet,
    /// JSON/YAML: `key: value` pairs.
    Data,
}

/// Static highlighting configuration for one language.
#[derive(Debug)]
pub struct SyntaxConfig {
    /// Canonical language name (e.g. `"python"`).
    pub name: &'static str,
    /// Reserved words.
    pub keywords: &'static [&'static str],
    /// Built-in or conventional type names.
    pub types: &'static [&'static str],
    /// Operator spellings, matched literally.
    pub operators: &'static [&'static str],
    /// String delimiters. Triple forms (`"""`) and backtick templates may span lines.
    pub string_delimiters: &'static [&'static str],
    /// Comment markers. `/*` and `<!--` are block comments; anything else runs to end of line.
    pub comment_markers: &'static [&'static str],
    /// Language family for the extra passes.
    pub dialect: Dialect,
}

const C_OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "->", "=", "+", "-",
    "*", "/", "%", "!", "<", ">", "&", "|", "^", "~", "?",
];

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for", "from",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
    "static", "super", "switch", "this", "throw", "true", "try", "typeof", "undefined", "var",
    "void", "while", "yield",
];

const JS_TYPES: &[&str] = &[
    "Array", "Boolean", "Date", "Error", "Function", "JSON", "Map", "Math", "Number", "Object",
    "Promise", "RegExp", "Set", "String", "Symbol", "console", "document", "window",
];

const JS_OPERATORS: &[&str] = &[
    "===", "!==", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=",
    "=", "+", "-", "*", "/", "%", "!", "<", ">", "?",
];

static CONFIGS: &[SyntaxConfig] = &[
    SyntaxConfig {
        name: "javascript",
        keywords: JS_KEYWORDS,
        types: JS_TYPES,
        operators: JS_OPERATORS,
        string_delimiters: &["\"", "'", "`"],
        comment_markers: &["//", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "typescript",
        keywords: &[
            "abstract", "as", "async", "await", "break", "case", "catch", "class", "const",
            "continue", "declare", "default", "do", "else", "enum", "export", "extends", "false",
            "finally", "for", "from", "function", "if", "implements", "import", "in",
            "instanceof", "interface", "keyof", "let", "namespace", "new", "null", "of",
            "private", "protected", "public", "readonly", "return", "static", "super", "switch",
            "this", "throw", "true", "try", "type", "typeof", "undefined", "var", "void",
            "while", "yield",
        ],
        types: &[
            "any", "boolean", "never", "number", "object", "string", "symbol", "unknown",
            "Array", "Map", "Promise", "Record", "Partial", "Set",
        ],
        operators: JS_OPERATORS,
        string_delimiters: &["\"", "'", "`"],
        comment_markers: &["//", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "python",
        keywords: &[
            "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
            "continue", "def", "del", "elif", "else", "except", "finally", "for", "from",
            "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass",
            "raise", "return", "try", "while", "with", "yield",
        ],
        types: &[
            "bool", "bytes", "dict", "float", "int", "list", "object", "set", "str", "tuple",
            "self",
        ],
        operators: &[
            "**", "//", "==", "!=", "<=", ">=", "->", "+=", "-=", ":=", "=", "+", "-", "*", "/",
            "%", "<", ">", "@",
        ],
        string_delimiters: &["\"\"\"", "'''", "\"", "'"],
        comment_markers: &["#"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "rust",
        keywords: &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else",
            "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match",
            "mod", "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct",
            "super", "trait", "true", "type", "unsafe", "use", "where", "while",
        ],
        types: &[
            "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "str",
            "u8", "u16", "u32", "u64", "u128", "usize", "Box", "Option", "Result", "String",
            "Vec", "HashMap", "Some", "None", "Ok", "Err",
        ],
        operators: &[
            "==", "!=", "<=", ">=", "&&", "||", "+=", "-=", "->", "=>", "::", "..", "=", "+",
            "-", "*", "/", "%", "!", "<", ">", "&", "|", "?",
        ],
        // Single quotes are lifetimes and chars in Rust; only double-quoted strings count.
        string_delimiters: &["\""],
        comment_markers: &["//", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "c",
        keywords: &[
            "break", "case", "const", "continue", "default", "do", "else", "enum", "extern",
            "for", "goto", "if", "inline", "register", "return", "sizeof", "static", "struct",
            "switch", "typedef", "union", "volatile", "while", "NULL",
        ],
        types: &[
            "char", "double", "float", "int", "long", "short", "signed", "unsigned", "void",
            "size_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "int32_t", "int64_t",
            "FILE",
        ],
        operators: C_OPERATORS,
        string_delimiters: &["\"", "'"],
        comment_markers: &["//", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "cpp",
        keywords: &[
            "auto", "break", "case", "catch", "class", "const", "constexpr", "continue",
            "default", "delete", "do", "else", "enum", "explicit", "false", "for", "friend",
            "if", "inline", "namespace", "new", "nullptr", "operator", "private", "protected",
            "public", "return", "sizeof", "static", "struct", "switch", "template", "this",
            "throw", "true", "try", "typename", "using", "virtual", "while",
        ],
        types: &[
            "bool", "char", "double", "float", "int", "long", "short", "unsigned", "void",
            "size_t", "string", "vector", "map", "std",
        ],
        operators: C_OPERATORS,
        string_delimiters: &["\"", "'"],
        comment_markers: &["//", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "java",
        keywords: &[
            "abstract", "break", "case", "catch", "class", "continue", "default", "do", "else",
            "extends", "false", "final", "finally", "for", "if", "implements", "import",
            "instanceof", "interface", "new", "null", "package", "private", "protected",
            "public", "return", "static", "super", "switch", "this", "throw", "throws", "true",
            "try", "void", "while",
        ],
        types: &[
            "boolean", "byte", "char", "double", "float", "int", "long", "short", "String",
            "Integer", "List", "Map", "Object", "System",
        ],
        operators: C_OPERATORS,
        string_delimiters: &["\"", "'"],
        comment_markers: &["//", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "go",
        keywords: &[
            "break", "case", "chan", "const", "continue", "default", "defer", "else",
            "fallthrough", "false", "for", "func", "go", "goto", "if", "import", "interface",
            "map", "nil", "package", "range", "return", "select", "struct", "switch", "true",
            "type", "var",
        ],
        types: &[
            "bool", "byte", "error", "float32", "float64", "int", "int32", "int64", "rune",
            "string", "uint", "uint8", "uint32", "uint64",
        ],
        operators: &[
            ":=", "==", "!=", "<=", ">=", "&&", "||", "<-", "++", "--", "+=", "-=", "=", "+",
            "-", "*", "/", "%", "!", "<", ">", "&", "|",
        ],
        string_delimiters: &["\"", "'", "`"],
        comment_markers: &["//", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "bash",
        keywords: &[
            "case", "do", "done", "elif", "else", "esac", "exit", "export", "fi", "for",
            "function", "if", "in", "local", "return", "then", "until", "while",
        ],
        types: &[
            "echo", "cd", "ls", "cat", "grep", "sed", "awk", "curl", "sudo", "chmod", "printf",
            "read", "source",
        ],
        operators: &["&&", "||", "|", ">>", ">", "<", "=", "!"],
        string_delimiters: &["\"", "'"],
        comment_markers: &["#"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "sql",
        keywords: &[
            "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE",
            "CREATE", "TABLE", "DROP", "ALTER", "JOIN", "LEFT", "RIGHT", "INNER", "OUTER", "ON",
            "AND", "OR", "NOT", "NULL", "AS", "ORDER", "BY", "GROUP", "HAVING", "LIMIT",
            "UNION", "PRIMARY", "KEY", "select", "from", "where", "insert", "into", "values",
            "update", "set", "delete", "create", "table", "join", "on", "and", "or", "not",
            "null", "as", "order", "by", "group", "limit", "union",
        ],
        types: &[
            "INT", "INTEGER", "TEXT", "VARCHAR", "BOOLEAN", "DATE", "TIMESTAMP", "SERIAL",
            "int", "integer", "text", "varchar", "boolean",
        ],
        operators: &["<=", ">=", "<>", "!=", "=", "<", ">", "*", "+", "-", "/"],
        string_delimiters: &["'", "\""],
        comment_markers: &["--", "/*"],
        dialect: Dialect::Code,
    },
    SyntaxConfig {
        name: "html",
        keywords: &[],
        types: &[],
        operators: &[],
        string_delimiters: &["\"", "'"],
        comment_markers: &["<!--"],
        dialect: Dialect::Markup,
    },
    SyntaxConfig {
        name: "css",
        keywords: &["important", "inherit", "initial", "none", "auto", "media", "import"],
        types: &[],
        operators: &[],
        string_delimiters: &["\"", "'"],
        comment_markers: &["/*"],
        dialect: Dialect::Stylesheet,
    },
    SyntaxConfig {
        name: "json",
        keywords: &["true", "false", "null"],
        types: &[],
        operators: &[],
        string_delimiters: &["\""],
        comment_markers: &[],
        dialect: Dialect::Data,
    },
    SyntaxConfig {
        name: "yaml",
        keywords: &["true", "false", "null", "yes", "no", "on", "off"],
        types: &[],
        operators: &[],
        string_delimiters: &["\"", "'"],
        comment_markers: &["#"],
        dialect: Dialect::Data,
    },
];

/// Alternative spellings accepted in fence info strings.
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("python3", "python"),
    ("rs", "rust"),
    ("h", "c"),
    ("c++", "cpp"),
    ("cc", "cpp"),
    ("hpp", "cpp"),
    ("golang", "go"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("console", "bash"),
    ("htm", "html"),
    ("xml", "html"),
    ("svg", "html"),
    ("yml", "yaml"),
];

static TABLE: LazyLock<HashMap<&'static str, &'static SyntaxConfig>> = LazyLock::new(|| {
    let mut table: HashMap<&'static str, &'static SyntaxConfig> =
        CONFIGS.iter().map(|config| (config.name, config)).collect();
    for (alias, canonical) in ALIASES {
        if let Some(config) = table.get(*canonical).copied() {
            table.insert(*alias, config);
        }
    }
    table
});

/// Look up the configuration for a language tag (case-insensitive, aliases allowed).
///
/// Returns `None` for unknown languages, including the generic `text`.
#[must_use]
pub fn syntax_config(language: &str) -> Option<&'static SyntaxConfig> {
    let language = language.trim();
    TABLE
        .get(language)
        .or_else(|| TABLE.get(language.to_lowercase().as_str()))
        .copied()
}

/// Canonical names of all languages that get highlighting.
#[must_use]
pub fn supported_languages() -> Vec<&'static str> {
    CONFIGS.iter().map(|config| config.name).collect()
}

/// Aliases that resolve to the given canonical language.
#[must_use]
pub fn aliases_for(canonical: &str) -> Vec<&'static str> {
    ALIASES
        .iter()
        .filter(|(_, target)| *target == canonical)
        .map(|(alias, _)| *alias)
        .collect()
}
