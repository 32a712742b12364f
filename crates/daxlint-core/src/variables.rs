//! Lexical detection of `VAR` declarations.
//!
//! There is no parse tree here. A declaration runs from its `VAR` keyword to
//! the next `VAR`, `RETURN` or the end of the stream, and nested scopes are
//! not tracked.

use crate::token::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Declared name with one surrounding quote pair removed.
    pub name: String,
    /// Token holding the name.
    pub token: Token,
    /// The `VAR` keyword token.
    pub keyword_token: Token,
    /// Last token of the bound expression, `None` if the binding is empty.
    pub last_expression_token: Option<Token>,
}

/// All declarations found in a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    /// Variables in declaration order.
    pub variables: Vec<Variable>,
    /// Stream indexes of the declared-name tokens.
    pub name_tokens: HashSet<usize>,
}

impl Declarations {
    /// Returns true if `token` is the name position of a declaration.
    #[must_use]
    pub fn is_declared_name(&self, token: &Token) -> bool {
        self.name_tokens.contains(&token.index)
    }

    /// Returns true if some variable is declared as `name` (case-sensitive).
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v.name == name)
    }
}

/// Removes one leading and one trailing `'`.
#[must_use]
pub fn clean_name(text: &str) -> &str {
    let text = text.strip_suffix('\'').unwrap_or(text);
    text.strip_prefix('\'').unwrap_or(text)
}

fn is_declaration_keyword(token: &Token) -> bool {
    token.kind == TokenKind::Var || token.text.eq_ignore_ascii_case("VAR")
}

fn ends_binding(token: &Token) -> bool {
    is_declaration_keyword(token) || token.kind == TokenKind::Return
}

/// Scans code- and keyword-channel tokens for declarations.
#[must_use]
pub fn detect_variables(tokens: &[&Token]) -> Declarations {
    let mut declarations = Declarations::default();
    let n = tokens.len();
    let mut i = 0;

    while i < n {
        let keyword = tokens[i];
        if !is_declaration_keyword(keyword) {
            i += 1;
            continue;
        }

        let name_at = tokens[i + 1..]
            .iter()
            .take_while(|t| t.kind != TokenKind::Equals && !ends_binding(t))
            .position(|t| t.kind.is_identifier())
            .map(|p| p + i + 1);

        let mut j = name_at.map_or(i + 1, |p| p + 1);
        if tokens.get(j).is_some_and(|t| t.kind == TokenKind::Equals) {
            j += 1;
        }

        let mut k = j;
        let mut last = None;
        while k < n && !ends_binding(tokens[k]) {
            last = Some(tokens[k]);
            k += 1;
        }

        if let Some(p) = name_at {
            let name_token = tokens[p];
            declarations.name_tokens.insert(name_token.index);
            declarations.variables.push(Variable {
                name: clean_name(&name_token.text).to_string(),
                token: name_token.clone(),
                keyword_token: keyword.clone(),
                last_expression_token: last.cloned(),
            });
        }

        // k > i, so the scan always advances.
        i = k;
    }

    declarations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::token::Channel;

    fn declarations(source: &str) -> Declarations {
        let tokens = tokenize(source);
        let visible: Vec<&Token> = tokens
            .iter()
            .filter(|t| matches!(t.channel, Channel::Code | Channel::Keyword))
            .collect();
        detect_variables(&visible)
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("'Dim Date'"), "Dim Date");
        assert_eq!(clean_name("Sales"), "Sales");
        assert_eq!(clean_name("''"), "");
        assert_eq!(clean_name("'"), "");
    }

    #[test]
    fn test_last_expression_tokens() {
        let decl = declarations("VAR x = COUNTROWS(DimCustomer) VAR y = x + 1 RETURN y");
        let names: Vec<&str> = decl.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);

        let last: Vec<Option<&str>> = decl
            .variables
            .iter()
            .map(|v| v.last_expression_token.as_ref().map(|t| t.text.as_str()))
            .collect();
        assert_eq!(last, vec![Some(")"), Some("1")]);
    }

    #[test]
    fn test_declared_name_positions() {
        let decl = declarations("VAR x = 1 RETURN x");
        assert_eq!(decl.name_tokens.len(), 1);
        assert!(decl.is_declared_name(&decl.variables[0].token));
        assert!(decl.declares("x"));
        assert!(!decl.declares("X"));
    }

    #[test]
    fn test_lowercase_keyword_and_no_spaces() {
        let decl = declarations("var _datetime=1\nVAR max_date_all= 2 RETURN 3");
        let names: Vec<&str> = decl.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["_datetime", "max_date_all"]);
    }

    #[test]
    fn test_truncated_binding() {
        let decl = declarations("VAR x =");
        assert_eq!(decl.variables.len(), 1);
        assert!(decl.variables[0].last_expression_token.is_none());

        let decl = declarations("VAR = 1");
        assert!(decl.variables.is_empty());
    }
}
