//! Text configuration parser.
//!
//! ```text
//! InputVariable: danger
//!   range: 0.0 10000.0
//!   term: NONE Ramp 400.0 0.0
//!   term: HIGH Ramp 1000.0 10000.0
//!
//! OutputVariable: Value
//!   range: 0.0 5.0
//!   term: LOW Triangle 0.0 1.0 2.0
//!
//! RuleBlock:
//!   rule: if danger is NONE then Value is LOW
//! ```
//!
//! `#` starts a comment. Rules may mix several `and` or several `or`
//! clauses, but not both in one rule.

use crate::engine::Engine;
use crate::error::FuzzyError;
use crate::rule::{Connective, Rule};
use crate::term::{Shape, Term};
use crate::variable::Variable;

enum Section {
    None,
    Input(usize),
    Output(usize),
    Rules,
}

pub fn parse(source: &str) -> Result<Engine, FuzzyError> {
    let mut inputs: Vec<Variable> = Vec::new();
    let mut outputs: Vec<Variable> = Vec::new();
    let mut rule_lines: Vec<(usize, String)> = Vec::new();
    let mut section = Section::None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(name) = line.strip_prefix("InputVariable:") {
            let variable = new_variable(name.trim(), &inputs, &outputs, line_no)?;
            inputs.push(variable);
            section = Section::Input(inputs.len() - 1);
        } else if let Some(name) = line.strip_prefix("OutputVariable:") {
            let variable = new_variable(name.trim(), &inputs, &outputs, line_no)?;
            outputs.push(variable);
            section = Section::Output(outputs.len() - 1);
        } else if line == "RuleBlock:" {
            section = Section::Rules;
        } else if let Some(spec) = line.strip_prefix("range:") {
            let variable = current_variable(&mut section, &mut inputs, &mut outputs)
                .ok_or_else(|| syntax(line_no, "`range:` outside a variable block"))?;
            let (min, max) = parse_range(spec, line_no)?;
            variable.min = min;
            variable.max = max;
        } else if let Some(spec) = line.strip_prefix("term:") {
            let variable = current_variable(&mut section, &mut inputs, &mut outputs)
                .ok_or_else(|| syntax(line_no, "`term:` outside a variable block"))?;
            variable.terms.push(parse_term(spec, line_no)?);
        } else if let Some(spec) = line.strip_prefix("rule:") {
            if !matches!(section, Section::Rules) {
                return Err(syntax(line_no, "`rule:` outside a RuleBlock"));
            }
            rule_lines.push((line_no, spec.trim().to_owned()));
        } else {
            return Err(syntax(line_no, format!("unrecognized line `{line}`")));
        }
    }

    if outputs.is_empty() {
        return Err(FuzzyError::MissingOutput);
    }

    if rule_lines.is_empty() {
        return Err(FuzzyError::MissingRules);
    }

    let rules = rule_lines
        .into_iter()
        .map(|(line_no, text)| parse_rule(&text, &inputs, &outputs, line_no))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Engine::new(inputs, outputs, rules))
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn syntax(line: usize, message: impl Into<String>) -> FuzzyError {
    FuzzyError::Syntax {
        line,
        message: message.into(),
    }
}

fn new_variable(
    name: &str,
    inputs: &[Variable],
    outputs: &[Variable],
    line_no: usize,
) -> Result<Variable, FuzzyError> {
    if name.is_empty() {
        return Err(syntax(line_no, "variable without a name"));
    }

    if inputs.iter().chain(outputs).any(|v| v.name == name) {
        return Err(FuzzyError::DuplicateVariable(name.to_owned()));
    }

    Ok(Variable {
        name: name.to_owned(),
        min: 0.0,
        max: 1.0,
        terms: Vec::new(),
    })
}

fn current_variable<'a>(
    section: &mut Section,
    inputs: &'a mut [Variable],
    outputs: &'a mut [Variable],
) -> Option<&'a mut Variable> {
    match section {
        Section::Input(idx) => inputs.get_mut(*idx),
        Section::Output(idx) => outputs.get_mut(*idx),
        _ => None,
    }
}

fn parse_range(spec: &str, line_no: usize) -> Result<(f64, f64), FuzzyError> {
    let values = parse_floats(spec, line_no)?;

    match values[..] {
        [min, max] if min < max => Ok((min, max)),
        [_, _] => Err(syntax(line_no, "range minimum must be below maximum")),
        _ => Err(syntax(line_no, "range needs exactly two numbers")),
    }
}

fn parse_term(spec: &str, line_no: usize) -> Result<Term, FuzzyError> {
    let mut words = spec.split_whitespace();
    let name = words
        .next()
        .ok_or_else(|| syntax(line_no, "term without a name"))?;
    let shape_name = words
        .next()
        .ok_or_else(|| syntax(line_no, "term without a shape"))?;
    let params = parse_floats(&words.collect::<Vec<_>>().join(" "), line_no)?;

    let shape = match (shape_name, params.len()) {
        ("Triangle", 3) => Shape::Triangle {
            a: params[0],
            b: params[1],
            c: params[2],
        },
        ("Trapezoid", 4) => Shape::Trapezoid {
            a: params[0],
            b: params[1],
            c: params[2],
            d: params[3],
        },
        ("Ramp", 2) => Shape::Ramp {
            start: params[0],
            end: params[1],
        },
        _ => {
            return Err(syntax(
                line_no,
                format!("bad shape `{shape_name}` with {} parameters", params.len()),
            ));
        }
    };

    Ok(Term {
        name: name.to_owned(),
        shape,
    })
}

fn parse_floats(spec: &str, line_no: usize) -> Result<Vec<f64>, FuzzyError> {
    spec.split_whitespace()
        .map(|w| {
            w.parse::<f64>()
                .map_err(|_| syntax(line_no, format!("`{w}` is not a number")))
        })
        .collect()
}

fn parse_rule(
    text: &str,
    inputs: &[Variable],
    outputs: &[Variable],
    line_no: usize,
) -> Result<Rule, FuzzyError> {
    let body = text
        .strip_prefix("if ")
        .ok_or_else(|| syntax(line_no, "rule must start with `if`"))?;

    let (antecedent_text, consequent_text) = body
        .split_once(" then ")
        .ok_or_else(|| syntax(line_no, "rule is missing `then`"))?;

    let has_and = antecedent_text.contains(" and ");
    let has_or = antecedent_text.contains(" or ");

    let (connective, separator) = match (has_and, has_or) {
        (true, true) => return Err(syntax(line_no, "rule mixes `and` with `or`")),
        (false, true) => (Connective::Or, " or "),
        _ => (Connective::And, " and "),
    };

    let antecedent = antecedent_text
        .split(separator)
        .map(|clause| {
            let (variable, term) = parse_clause(clause, line_no)?;
            let var_idx = inputs
                .iter()
                .position(|v| v.name == variable)
                .ok_or_else(|| FuzzyError::UnknownVariable(variable.to_owned()))?;
            let term_idx = inputs[var_idx].term_index(term).ok_or(FuzzyError::UnknownTerm {
                variable: variable.to_owned(),
                term: term.to_owned(),
            })?;
            Ok((var_idx, term_idx))
        })
        .collect::<Result<Vec<_>, FuzzyError>>()?;

    let (out_name, out_term) = parse_clause(consequent_text, line_no)?;
    let output_variable = outputs
        .iter()
        .position(|v| v.name == out_name)
        .ok_or_else(|| FuzzyError::UnknownVariable(out_name.to_owned()))?;
    let output_term = outputs[output_variable]
        .term_index(out_term)
        .ok_or(FuzzyError::UnknownTerm {
            variable: out_name.to_owned(),
            term: out_term.to_owned(),
        })?;

    Ok(Rule {
        antecedent,
        connective,
        output_variable,
        output_term,
    })
}

/// Parses `variable is TERM`.
fn parse_clause(clause: &str, line_no: usize) -> Result<(&str, &str), FuzzyError> {
    clause
        .trim()
        .split_once(" is ")
        .map(|(v, t)| (v.trim(), t.trim()))
        .ok_or_else(|| syntax(line_no, format!("bad clause `{}`", clause.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mixed_connectives() {
        let src = "\
InputVariable: a
  range: 0.0 1.0
  term: X Ramp 0.0 1.0
InputVariable: b
  range: 0.0 1.0
  term: Y Ramp 0.0 1.0
OutputVariable: out
  range: 0.0 1.0
  term: Z Ramp 0.0 1.0
RuleBlock:
  rule: if a is X and b is Y or a is X then out is Z
";
        assert!(matches!(parse(src), Err(FuzzyError::Syntax { .. })));
    }

    #[test]
    fn rejects_unknown_term_in_rule() {
        let src = "\
InputVariable: a
  range: 0.0 1.0
  term: X Ramp 0.0 1.0
OutputVariable: out
  range: 0.0 1.0
  term: Z Ramp 0.0 1.0
RuleBlock:
  rule: if a is MISSING then out is Z
";
        assert_eq!(
            parse(src).err(),
            Some(FuzzyError::UnknownTerm {
                variable: "a".into(),
                term: "MISSING".into()
            })
        );
    }

    #[test]
    fn rejects_config_without_rules() {
        let src = "\
InputVariable: a
  range: 0.0 1.0
  term: X Ramp 0.0 1.0
OutputVariable: out
  range: 0.0 1.0
  term: Z Ramp 0.0 1.0
";
        assert_eq!(parse(src).err(), Some(FuzzyError::MissingRules));
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let src = "\
# tuning file
InputVariable: a
  range: 0.0 1.0   # inclusive
  term: X Ramp 0.0 1.0

OutputVariable: out
  range: 0.0 1.0
  term: Z Ramp 0.0 1.0

RuleBlock:
  rule: if a is X then out is Z
";
        assert!(parse(src).is_ok());
    }
}
