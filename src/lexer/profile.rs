//! Language profiles: the keyword, type, literal and operator tables a lexer
//! classifies against.
//!
//! A profile is an immutable value. Several profiles can coexist and be
//! shared between a document and the background reload worker via `Arc`.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

/// How a keyword-shaped word is classified under a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Keyword,
    ContextualKeyword,
    BuiltInType,
    BuiltInLiteral,
}

/// Immutable keyword / type / literal / operator tables for one language.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    name: SmolStr,
    keywords: FxHashSet<SmolStr>,
    contextual_keywords: FxHashSet<SmolStr>,
    types: FxHashSet<SmolStr>,
    literals: FxHashSet<SmolStr>,
    preprocessor: FxHashSet<SmolStr>,
    /// Operators indexed by leading character, longest first
    operators: FxHashMap<char, Vec<SmolStr>>,
    real_suffixes: Vec<char>,
}

impl LanguageProfile {
    pub fn builder(name: impl Into<SmolStr>) -> ProfileBuilder {
        ProfileBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classify a word, or `None` when it is a plain identifier here.
    pub fn classify_word(&self, word: &str) -> Option<WordClass> {
        if self.keywords.contains(word) {
            Some(WordClass::Keyword)
        } else if self.types.contains(word) {
            Some(WordClass::BuiltInType)
        } else if self.literals.contains(word) {
            Some(WordClass::BuiltInLiteral)
        } else if self.contextual_keywords.contains(word) {
            Some(WordClass::ContextualKeyword)
        } else {
            None
        }
    }

    pub fn is_keyword_shaped(&self, word: &str) -> bool {
        self.classify_word(word).is_some()
    }

    pub fn is_preprocessor_directive(&self, word: &str) -> bool {
        self.preprocessor.contains(word)
    }

    pub fn is_real_suffix(&self, ch: char) -> bool {
        self.real_suffixes.contains(&ch)
    }

    /// Longest operator of this profile that prefixes `rest`.
    pub fn match_operator(&self, rest: &str) -> Option<&str> {
        let first = rest.chars().next()?;
        self.operators
            .get(&first)?
            .iter()
            .find(|op| rest.starts_with(op.as_str()))
            .map(SmolStr::as_str)
    }

    /// C#-flavoured profile.
    pub fn csharp() -> Self {
        Self::builder("csharp")
            .keywords(&[
                "abstract", "as", "base", "break", "case", "catch", "checked", "class", "const",
                "continue", "default", "delegate", "do", "else", "enum", "event", "explicit",
                "extern", "finally", "fixed", "for", "foreach", "goto", "if", "implicit", "in",
                "interface", "internal", "is", "lock", "namespace", "new", "operator", "out",
                "override", "params", "private", "protected", "public", "readonly", "ref",
                "return", "sealed", "sizeof", "stackalloc", "static", "struct", "switch", "this",
                "throw", "try", "typeof", "unchecked", "unsafe", "using", "virtual", "volatile",
                "while",
            ])
            .contextual_keywords(&[
                "add", "alias", "async", "await", "get", "global", "partial", "remove", "set",
                "value", "var", "where", "yield",
            ])
            .types(&[
                "bool", "byte", "char", "decimal", "double", "float", "int", "long", "object",
                "sbyte", "short", "string", "uint", "ulong", "ushort", "void",
            ])
            .literals(&["true", "false", "null"])
            .preprocessor(&[
                "if", "else", "elif", "endif", "define", "undef", "warning", "error", "line",
                "region", "endregion", "pragma",
            ])
            .operators(&[
                "<<=", ">>=", "??=", "<<", ">>", "<=", ">=", "==", "!=", "=>", "&&", "||", "++",
                "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "->", "::", "??", "?.",
                "{", "}", "[", "]", "(", ")", ".", ",", ":", ";", "+", "-", "*", "/", "%", "&",
                "|", "^", "!", "~", "=", "<", ">", "?",
            ])
            .real_suffixes(&['f', 'F', 'd', 'D', 'm', 'M'])
            .build()
    }

    /// JavaScript-flavoured profile.
    pub fn javascript() -> Self {
        Self::builder("javascript")
            .keywords(&[
                "break", "case", "catch", "class", "const", "continue", "debugger", "default",
                "delete", "do", "else", "export", "extends", "finally", "for", "function", "if",
                "import", "in", "instanceof", "let", "new", "return", "super", "switch", "this",
                "throw", "try", "typeof", "var", "void", "while", "with", "yield",
            ])
            .contextual_keywords(&["async", "await", "get", "of", "set", "static"])
            .types(&["boolean", "number", "String", "Object", "Array"])
            .literals(&["true", "false", "null", "undefined", "NaN", "Infinity"])
            .preprocessor(&["pragma"])
            .operators(&[
                ">>>=", "===", "!==", ">>>", "<<=", ">>=", "**=", "...", "<<", ">>", "<=", ">=",
                "==", "!=", "=>", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=",
                "%=", "&=", "|=", "^=", "**", "{", "}", "[", "]", "(", ")", ".", ",", ":", ";",
                "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "=", "<", ">", "?",
            ])
            .real_suffixes(&[])
            .build()
    }
}

/// Fluent builder for [`LanguageProfile`].
///
/// ```
/// use relex::lexer::LanguageProfile;
///
/// let profile = LanguageProfile::builder("tiny")
///     .keywords(&["let", "fn"])
///     .operators(&["=", "=="])
///     .build();
///
/// assert!(profile.is_keyword_shaped("fn"));
/// assert_eq!(profile.match_operator("==x"), Some("=="));
/// ```
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    name: SmolStr,
    keywords: Vec<SmolStr>,
    contextual_keywords: Vec<SmolStr>,
    types: Vec<SmolStr>,
    literals: Vec<SmolStr>,
    preprocessor: Vec<SmolStr>,
    operators: Vec<SmolStr>,
    real_suffixes: Vec<char>,
}

impl ProfileBuilder {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
            contextual_keywords: Vec::new(),
            types: Vec::new(),
            literals: Vec::new(),
            preprocessor: Vec::new(),
            operators: Vec::new(),
            real_suffixes: vec!['f', 'F', 'd', 'D', 'm', 'M'],
        }
    }

    pub fn keywords(mut self, words: &[&str]) -> Self {
        self.keywords.extend(words.iter().map(SmolStr::new));
        self
    }

    pub fn contextual_keywords(mut self, words: &[&str]) -> Self {
        self.contextual_keywords.extend(words.iter().map(SmolStr::new));
        self
    }

    pub fn types(mut self, words: &[&str]) -> Self {
        self.types.extend(words.iter().map(SmolStr::new));
        self
    }

    pub fn literals(mut self, words: &[&str]) -> Self {
        self.literals.extend(words.iter().map(SmolStr::new));
        self
    }

    pub fn preprocessor(mut self, words: &[&str]) -> Self {
        self.preprocessor.extend(words.iter().map(SmolStr::new));
        self
    }

    pub fn operators(mut self, ops: &[&str]) -> Self {
        self.operators
            .extend(ops.iter().filter(|op| !op.is_empty()).map(SmolStr::new));
        self
    }

    /// Replace the set of suffix letters that make a number real.
    pub fn real_suffixes(mut self, suffixes: &[char]) -> Self {
        self.real_suffixes = suffixes.to_vec();
        self
    }

    pub fn build(self) -> LanguageProfile {
        let mut operators: FxHashMap<char, Vec<SmolStr>> = FxHashMap::default();
        for op in self.operators {
            if let Some(first) = op.chars().next() {
                let slot = operators.entry(first).or_default();
                if !slot.contains(&op) {
                    slot.push(op);
                }
            }
        }
        // Longest first for maximal munch
        for ops in operators.values_mut() {
            ops.sort_by(|a, b| b.len().cmp(&a.len()));
        }

        LanguageProfile {
            name: self.name,
            keywords: self.keywords.into_iter().collect(),
            contextual_keywords: self.contextual_keywords.into_iter().collect(),
            types: self.types.into_iter().collect(),
            literals: self.literals.into_iter().collect(),
            preprocessor: self.preprocessor.into_iter().collect(),
            operators,
            real_suffixes: self.real_suffixes,
        }
    }
}
