//! Secondary classification pass: resolves keyword-shaped words against a
//! language profile and assigns display styles.

use super::profile::{LanguageProfile, WordClass};
use super::token::{Token, TokenKind, TokenStyle};

/// A leading `@` or any `\u` escape makes a word an identifier even when it
/// is spelled like a keyword.
pub fn is_forced_identifier(text: &str) -> bool {
    text.starts_with('@') || text.contains("\\u")
}

/// Re-tag word tokens and assign styles under `profile`.
///
/// Running this over tokens lexed under another profile re-classifies them:
/// a word that is a keyword elsewhere becomes a plain identifier here.
pub fn classify_tokens(tokens: &mut [Token], profile: &LanguageProfile) {
    for token in tokens {
        if token.kind.is_word() {
            let (kind, style) = classify_word(&token.text, profile);
            token.kind = kind;
            token.style = style;
        } else {
            token.style = style_of(token.kind);
        }
    }
}

fn classify_word(text: &str, profile: &LanguageProfile) -> (TokenKind, TokenStyle) {
    if is_forced_identifier(text) {
        return (TokenKind::Identifier, TokenStyle::Identifier);
    }
    match profile.classify_word(text) {
        Some(WordClass::Keyword) => (TokenKind::Keyword, TokenStyle::Keyword),
        Some(WordClass::BuiltInType) => (TokenKind::Keyword, TokenStyle::Type),
        Some(WordClass::ContextualKeyword) => (TokenKind::ContextualKeyword, TokenStyle::Keyword),
        Some(WordClass::BuiltInLiteral) => (TokenKind::BuiltInLiteral, TokenStyle::Literal),
        None => (TokenKind::Identifier, TokenStyle::Identifier),
    }
}

fn style_of(kind: TokenKind) -> TokenStyle {
    match kind {
        TokenKind::Comment => TokenStyle::Comment,
        TokenKind::Preprocessor => TokenStyle::Preprocessor,
        TokenKind::CharLiteral | TokenKind::StringLiteral | TokenKind::VerbatimStringLiteral => {
            TokenStyle::String
        }
        TokenKind::IntegerLiteral | TokenKind::RealLiteral => TokenStyle::Number,
        TokenKind::Punctuator => TokenStyle::Operator,
        TokenKind::Keyword | TokenKind::ContextualKeyword => TokenStyle::Keyword,
        TokenKind::Identifier => TokenStyle::Identifier,
        TokenKind::BuiltInLiteral => TokenStyle::Literal,
        TokenKind::Whitespace | TokenKind::EndOfFile | TokenKind::Missing => TokenStyle::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_identifiers() {
        assert!(is_forced_identifier("@class"));
        assert!(is_forced_identifier("cl\\u0061ss"));
        assert!(!is_forced_identifier("class"));
    }

    #[test]
    fn test_retag_under_other_profile() {
        let mut tokens = vec![
            Token::new(TokenKind::Keyword, "foreach"),
            Token::new(TokenKind::Identifier, "undefined"),
            Token::new(TokenKind::Punctuator, ";"),
        ];
        classify_tokens(&mut tokens, &LanguageProfile::javascript());
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::BuiltInLiteral);
        assert_eq!(tokens[1].style, TokenStyle::Literal);
        assert_eq!(tokens[2].style, TokenStyle::Operator);
    }

    #[test]
    fn test_builtin_type_styled_as_type() {
        let mut tokens = vec![Token::new(TokenKind::Identifier, "int")];
        classify_tokens(&mut tokens, &LanguageProfile::csharp());
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].style, TokenStyle::Type);
    }
}
