//! Classification of identifier tokens into typed references.

use crate::token::{Builtin, Token, TokenKind};
use crate::variables::{clean_name, Declarations};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A column or measure, optionally qualified by a table.
///
/// Equality and hashing consider only the names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactReference {
    /// Table name, empty when unqualified.
    pub table_name: String,
    /// Column or measure name without brackets.
    pub artifact_name: String,
    /// The bracketed token.
    pub artifact_token: Token,
    /// The table token, if qualified.
    pub table_token: Option<Token>,
}

impl PartialEq for ArtifactReference {
    fn eq(&self, other: &Self) -> bool {
        self.table_name == other.table_name && self.artifact_name == other.artifact_name
    }
}

impl Eq for ArtifactReference {}

impl Hash for ArtifactReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table_name.hash(state);
        self.artifact_name.hash(state);
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.table_name.is_empty() {
            write!(f, "[{}]", self.artifact_name)
        } else {
            write!(f, "'{}'[{}]", self.table_name, self.artifact_name)
        }
    }
}

/// A name and the token it was read from. Compares by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedReference {
    /// Cleaned name.
    pub name: String,
    /// Source token.
    pub token: Token,
}

impl NamedReference {
    fn new(name: &str, token: &Token) -> Self {
        Self {
            name: name.to_string(),
            token: token.clone(),
        }
    }
}

impl PartialEq for NamedReference {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for NamedReference {}

impl Hash for NamedReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// What a bare identifier turned out to be.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentifierReference {
    /// A table.
    Table(NamedReference),
    /// A declared variable.
    Variable(NamedReference),
    /// A call of a user-defined function.
    Function(NamedReference),
    /// An identifier with no usable name.
    Unknown(NamedReference),
}

impl IdentifierReference {
    /// Returns the inner name and token.
    #[must_use]
    pub fn named(&self) -> &NamedReference {
        match self {
            Self::Table(r) | Self::Variable(r) | Self::Function(r) | Self::Unknown(r) => r,
        }
    }

    /// Returns the cleaned name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.named().name
    }
}

/// Two table/column pairs passed to `USERELATIONSHIP` or `CROSSFILTER`.
///
/// Equality and hashing consider the five source tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipReference {
    /// First table.
    pub table1: String,
    /// First column.
    pub column1: String,
    /// Second table.
    pub table2: String,
    /// Second column.
    pub column2: String,
    /// The function token.
    pub function_token: Token,
    /// Token of the first table.
    pub table1_token: Token,
    /// Token of the first column.
    pub column1_token: Token,
    /// Token of the second table.
    pub table2_token: Token,
    /// Token of the second column.
    pub column2_token: Token,
}

impl RelationshipReference {
    fn identity(&self) -> [usize; 5] {
        [
            self.function_token.index,
            self.table1_token.index,
            self.column1_token.index,
            self.table2_token.index,
            self.column2_token.index,
        ]
    }
}

impl PartialEq for RelationshipReference {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for RelationshipReference {}

impl Hash for RelationshipReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for RelationshipReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] -> {}[{}]",
            self.table1, self.column1, self.table2, self.column2
        )
    }
}

/// Every reference found in one expression, in token order per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    /// Qualified pairs first, then standalone columns and measures.
    pub artifacts: Vec<ArtifactReference>,
    /// Tables, variables, functions and unknowns.
    pub identifiers: Vec<IdentifierReference>,
    /// Relationship overrides.
    pub relationships: Vec<RelationshipReference>,
}

impl ReferenceSet {
    fn filter(&self, pick: fn(&IdentifierReference) -> bool) -> Vec<&NamedReference> {
        self.identifiers
            .iter()
            .filter(|r| pick(r))
            .map(IdentifierReference::named)
            .collect()
    }

    /// Table references.
    #[must_use]
    pub fn tables(&self) -> Vec<&NamedReference> {
        self.filter(|r| matches!(r, IdentifierReference::Table(_)))
    }

    /// Variable references.
    #[must_use]
    pub fn variables(&self) -> Vec<&NamedReference> {
        self.filter(|r| matches!(r, IdentifierReference::Variable(_)))
    }

    /// User-defined function references.
    #[must_use]
    pub fn functions(&self) -> Vec<&NamedReference> {
        self.filter(|r| matches!(r, IdentifierReference::Function(_)))
    }

    /// Unknown references.
    #[must_use]
    pub fn unknown(&self) -> Vec<&NamedReference> {
        self.filter(|r| matches!(r, IdentifierReference::Unknown(_)))
    }
}

fn strip_brackets(text: &str) -> &str {
    let text = text.strip_suffix(']').unwrap_or(text);
    text.strip_prefix('[').unwrap_or(text)
}

/// Classifies the code- and keyword-channel tokens of one expression.
#[must_use]
pub fn classify(tokens: &[&Token], declarations: &Declarations) -> ReferenceSet {
    let n = tokens.len();
    let mut references = ReferenceSet::default();
    let mut used_columns = HashSet::new();
    let mut used_tables = HashSet::new();

    // Table[column], also across one '('.
    for (i, token) in tokens.iter().enumerate() {
        if !token.kind.is_identifier() {
            continue;
        }
        let mut j = i + 1;
        if tokens.get(j).is_some_and(|t| t.kind == TokenKind::OpenParens) {
            j += 1;
        }
        let Some(column) = tokens.get(j) else {
            continue;
        };
        if column.kind != TokenKind::ColumnOrMeasure || used_columns.contains(&j) {
            continue;
        }
        references.artifacts.push(ArtifactReference {
            table_name: clean_name(&token.text).to_string(),
            artifact_name: strip_brackets(&column.text).to_string(),
            artifact_token: (*column).clone(),
            table_token: Some((*token).clone()),
        });
        used_columns.insert(j);
        used_tables.insert(i);
    }

    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::ColumnOrMeasure && !used_columns.contains(&i) {
            references.artifacts.push(ArtifactReference {
                table_name: String::new(),
                artifact_name: strip_brackets(&token.text).to_string(),
                artifact_token: (*token).clone(),
                table_token: None,
            });
        }
    }

    for (i, token) in tokens.iter().enumerate() {
        if !token.kind.is_identifier()
            || used_tables.contains(&i)
            || declarations.is_declared_name(token)
        {
            continue;
        }
        let name = clean_name(&token.text);
        let reference = NamedReference::new(name, token);
        let called = tokens
            .get(i + 1)
            .is_some_and(|t| t.kind == TokenKind::OpenParens);
        references.identifiers.push(if name.is_empty() {
            IdentifierReference::Unknown(reference)
        } else if declarations.declares(name) {
            IdentifierReference::Variable(reference)
        } else if called {
            IdentifierReference::Function(reference)
        } else {
            IdentifierReference::Table(reference)
        });
    }

    references.relationships = relationships(tokens);
    references
}

/// Reads `FN ( T1 C1 , T2 C2` at every relationship function.
fn relationships(tokens: &[&Token]) -> Vec<RelationshipReference> {
    let code: Vec<&Token> = tokens.iter().copied().filter(|t| t.is_code()).collect();
    code.windows(7)
        .filter_map(|w| {
            let is_relationship = w[0].is_builtin(Builtin::UseRelationship)
                || w[0].is_builtin(Builtin::CrossFilter);
            let shaped = is_relationship
                && w[1].kind == TokenKind::OpenParens
                && w[2].kind.is_identifier()
                && w[3].kind == TokenKind::ColumnOrMeasure
                && w[4].kind == TokenKind::Comma
                && w[5].kind.is_identifier()
                && w[6].kind == TokenKind::ColumnOrMeasure;
            shaped.then(|| RelationshipReference {
                table1: clean_name(&w[2].text).to_string(),
                column1: strip_brackets(&w[3].text).to_string(),
                table2: clean_name(&w[5].text).to_string(),
                column2: strip_brackets(&w[6].text).to_string(),
                function_token: w[0].clone(),
                table1_token: w[2].clone(),
                column1_token: w[3].clone(),
                table2_token: w[5].clone(),
                column2_token: w[6].clone(),
            })
        })
        .collect()
}
