//! Integration test: comments, variables and references of whole expressions.

use daxlint::{restore_comments, DaxExpression, NamedReference};

fn names(refs: &[&NamedReference]) -> Vec<String> {
    refs.iter().map(|r| r.name.clone()).collect()
}

fn pairs(expr: &DaxExpression) -> Vec<(String, String)> {
    expr.artifact_references()
        .iter()
        .map(|a| (a.table_name.clone(), a.artifact_name.clone()))
        .collect()
}

fn pair(table: &str, artifact: &str) -> (String, String) {
    (table.to_string(), artifact.to_string())
}

// ── Comments ──

const COMMENTED: &str = "// lead comment\nCALCULATE(/* mid */[Sales])// tail";

#[test]
fn comments_are_split_from_code() {
    let expr = DaxExpression::new(COMMENTED);
    assert_eq!(expr.comments(), vec!["// lead comment", "/* mid */", "// tail"]);
    assert_eq!(expr.text_without_comments(), "\nCALCULATE([Sales])");
    assert_eq!(expr.canonical_text(), "CALCULATE([Sales])");
}

#[test]
fn comments_restore_to_source() {
    let sources = [
        COMMENTED,
        "-- only a comment",
        "VAR x = 1 /* unterminated",
        "SUM('T'[a]) // ''[]\"",
    ];
    for source in sources {
        let expr = DaxExpression::new(source);
        assert_eq!(
            restore_comments(expr.text_without_comments(), expr.comment_spans()),
            source
        );
    }
}

// ── Artifacts ──

#[test]
fn qualified_column() {
    let expr = DaxExpression::new("'Sales'[Amount]");
    assert_eq!(pairs(&expr), vec![pair("Sales", "Amount")]);
    assert!(expr.table_references().is_empty());
}

#[test]
fn standalone_measures() {
    let expr = DaxExpression::new("EVALUATEANDLOG([Measure1]) + EVALUATEANDLOG([Measure2])");
    assert_eq!(
        pairs(&expr),
        vec![pair("", "Measure1"), pair("", "Measure2")]
    );
}

#[test]
fn columns_and_measures_keep_brackets() {
    let expr = DaxExpression::new("SUMX('T', 'T'[a] * [b]) // [c]");
    assert_eq!(expr.columns_and_measures(), vec!["[a]", "[b]"]);
}

// ── Identifiers ──

#[test]
fn user_defined_function() {
    let expr = DaxExpression::new("MyFunc(1) + 'Sales Table'[x]");
    assert_eq!(names(&expr.function_references()), vec!["MyFunc"]);
    assert_eq!(pairs(&expr), vec![pair("Sales Table", "x")]);
}

#[test]
fn nested_user_defined_functions() {
    let expr = DaxExpression::new("Outer(Inner(1), 2)");
    assert_eq!(names(&expr.function_references()), vec!["Outer", "Inner"]);
    assert!(expr.table_references().is_empty());
}

#[test]
fn builtin_calls_are_not_user_functions() {
    for source in [
        "POWER(2, 3)",
        "MOD(5, 2)",
        "SELECTEDMEASURE()",
        "DATEDIFF(MIN(T[d]), MAX(T[d]), DAY)",
        "PERCENTILEX.INC(T, [m], 0.9)",
    ] {
        let expr = DaxExpression::new(source);
        assert!(expr.function_references().is_empty(), "{source}");
    }
}

#[test]
fn builtin_call_does_not_qualify_measure() {
    assert_eq!(
        pairs(&DaxExpression::new("MEDIAN([Sales])")),
        vec![pair("", "Sales")]
    );
    assert_eq!(
        pairs(&DaxExpression::new("SQRT([x]) + ROUNDUP([Margin], 2)")),
        vec![pair("", "x"), pair("", "Margin")]
    );
}

#[test]
fn quoted_table_reference() {
    let expr = DaxExpression::new("COUNTROWS('Dim Date') + COUNTROWS(Fact)");
    assert_eq!(names(&expr.table_references()), vec!["Dim Date", "Fact"]);
}

#[test]
fn variable_references_exclude_declarations() {
    let expr = DaxExpression::new("VAR total = SUM(T[a]) RETURN total * 2");
    assert_eq!(names(&expr.variable_references()), vec!["total"]);
    assert_eq!(expr.variable_references()[0].token.text, "total");
    assert!(expr.variable_references()[0].token.start > 20);
}

#[test]
fn empty_quoted_name_is_unknown() {
    let expr = DaxExpression::new("COUNTROWS('')");
    assert_eq!(expr.unknown_references().len(), 1);
}

// ── Variables ──

#[test]
fn last_expression_tokens() {
    let expr = DaxExpression::new("VAR a = SUM(T[x]) VAR b = 1 RETURN a + b");
    let variables = expr.variables();
    assert_eq!(variables.len(), 2);
    assert_eq!(variables[0].name, "a");
    assert_eq!(
        variables[0].last_expression_token.as_ref().map(|t| t.text.as_str()),
        Some(")")
    );
    assert_eq!(
        variables[1].last_expression_token.as_ref().map(|t| t.text.as_str()),
        Some("1")
    );
}

// ── Relationships ──

#[test]
fn simple_relationship() {
    let expr = DaxExpression::new(
        "CALCULATE(COUNTROWS(trCountries), USERELATIONSHIP(dimCountries[country_code], trCountries[Country]))",
    );
    let rels = expr.relationship_references();
    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].table1, "dimCountries");
    assert_eq!(rels[0].column1, "country_code");
    assert_eq!(rels[0].table2, "trCountries");
    assert_eq!(rels[0].column2, "Country");
}

#[test]
fn reversed_relationship() {
    let expr = DaxExpression::new(
        "CALCULATE([m], USERELATIONSHIP(trCountries[Country], dimCountries[country_code]))",
    );
    assert_eq!(
        expr.relationship_references()[0].to_string(),
        "trCountries[Country] -> dimCountries[country_code]"
    );
}

#[test]
fn relationship_with_comment_inside() {
    let expr = DaxExpression::new(
        "CALCULATE([m], USERELATIONSHIP('A'[x] /* key */, // other side\n'B'[y]))",
    );
    let rels = expr.relationship_references();
    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].table1, "A");
    assert_eq!(rels[0].column2, "y");
}

#[test]
fn multiple_relationships() {
    let expr = DaxExpression::new(
        "CALCULATE([m], USERELATIONSHIP(A[x], B[y]), CROSSFILTER(C[k], D[k], BOTH))",
    );
    let tables: Vec<&str> = expr
        .relationship_references()
        .iter()
        .map(|r| r.table1.as_str())
        .collect();
    assert_eq!(tables, vec!["A", "C"]);
}

#[test]
fn relationship_inside_variable() {
    let expr = DaxExpression::new(
        "VAR r = CALCULATE([m], USERELATIONSHIP('A'[x], 'B'[y])) RETURN r",
    );
    assert_eq!(expr.relationship_references().len(), 1);
    assert_eq!(expr.total_violations(), 0);
}

// ── Stability ──

#[test]
fn classification_is_idempotent() {
    let source = "VAR a = SUMX(VALUES(DimProduct[Category]), [Measure]) RETURN a + MyUDF(a)";
    let first = DaxExpression::unverified(source);
    let second = DaxExpression::unverified(source);
    assert_eq!(first.references(), second.references());
    assert_eq!(first.variables(), second.variables());
}
