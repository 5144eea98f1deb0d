//! Arithmetic expression calculator.

use crate::{StatusSink, Tool};
use anyhow::Result;
use async_trait::async_trait;
use dcore::StatusKind;
use schemars::{JsonSchema, Schema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Simulated evaluation latency.
const CALC_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize, JsonSchema)]
struct CalculatorArgs {
    /// The expression to evaluate, e.g. "2+2" or "10*5"
    expression: String,
}

/// Errors from expression evaluation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The input contains characters outside the allow-list.
    #[error("expression contains unsupported characters")]
    UnsupportedCharacters,

    /// The input is not a well-formed expression.
    #[error("invalid expression")]
    Invalid,

    /// Evaluation produced infinity or NaN.
    #[error("result is not finite")]
    NotFinite,
}

/// Evaluate an arithmetic expression over `f64`.
///
/// Inputs are first checked against an allow-list of digits, `+ - * / ( ) .`
/// and whitespace. The allow-list is a coarse filter, not a validator; a
/// well-formed parse is still required afterwards.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    if expression.chars().any(|c| !allowed(c)) {
        return Err(EvalError::UnsupportedCharacters);
    }

    let mut parser = Parser {
        input: expression.chars().peekable(),
    };
    let value = parser.expr()?;
    if parser.peek().is_some() {
        return Err(EvalError::Invalid);
    }
    if !value.is_finite() {
        return Err(EvalError::NotFinite);
    }
    Ok(value)
}

fn allowed(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

/// Recursive-descent parser: `expr := term (± term)*`,
/// `term := factor (*/ factor)*`, `factor := [±] number | (expr)`.
struct Parser<'e> {
    input: std::iter::Peekable<std::str::Chars<'e>>,
}

impl Parser<'_> {
    fn peek(&mut self) -> Option<char> {
        while self.input.next_if(|c| c.is_whitespace()).is_some() {}
        self.input.peek().copied()
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some('+') => {
                    self.input.next();
                    value += self.term()?;
                }
                Some('-') => {
                    self.input.next();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.input.next();
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.input.next();
                    value /= self.factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some('-') => {
                self.input.next();
                Ok(-self.factor()?)
            }
            Some('+') => {
                self.input.next();
                self.factor()
            }
            Some('(') => {
                self.input.next();
                let value = self.expr()?;
                if self.peek() != Some(')') {
                    return Err(EvalError::Invalid);
                }
                self.input.next();
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            _ => Err(EvalError::Invalid),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let mut literal = String::new();
        while let Some(c) = self.input.next_if(|c| c.is_ascii_digit() || *c == '.') {
            literal.push(c);
        }
        literal.parse().map_err(|_| EvalError::Invalid)
    }
}

/// Expression evaluator tool.
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn description(&self) -> &'static str {
        "Evaluate an arithmetic expression"
    }

    fn parameters(&self) -> Schema {
        schema_for!(CalculatorArgs)
    }

    async fn execute(&self, args: Value, status: &StatusSink) -> Result<Value> {
        let args: CalculatorArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => {
                status.error("Calculation failed", e.to_string());
                return Err(e.into());
            }
        };

        status.progress(StatusKind::Calculating, "Calculating...", 30);
        tokio::time::sleep(CALC_DELAY).await;

        let expression = args.expression;
        match evaluate(&expression) {
            Ok(result) => {
                status.completed("Calculation complete");
                Ok(json!({
                    "expression": expression,
                    "result": number_value(result),
                    "calculation": format!("{expression} = {result}"),
                    "timestamp": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                }))
            }
            Err(e) => {
                status.error("Calculation failed", e.to_string());
                Err(e.into())
            }
        }
    }
}

/// Integral results serialize without a trailing `.0`.
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn respects_precedence() {
        assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(evaluate("10-4/2").unwrap(), 8.0);
        assert_eq!(evaluate("15 * 23 + 87").unwrap(), 432.0);
    }

    #[test]
    fn parens_override_precedence() {
        assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
        assert_eq!(evaluate("((1+2))").unwrap(), 3.0);
    }

    #[test]
    fn unary_signs() {
        assert_eq!(evaluate("-3+5").unwrap(), 2.0);
        assert_eq!(evaluate("2*-3").unwrap(), -6.0);
        assert_eq!(evaluate("+4").unwrap(), 4.0);
    }

    #[test]
    fn decimals_and_whitespace() {
        assert_eq!(evaluate("10 / 4").unwrap(), 2.5);
        assert_eq!(evaluate(" 1.5 + 2.25 ").unwrap(), 3.75);
    }

    #[test]
    fn rejects_unsupported_characters() {
        assert_eq!(evaluate("2+abc"), Err(EvalError::UnsupportedCharacters));
        assert_eq!(evaluate("1;2"), Err(EvalError::UnsupportedCharacters));
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert_eq!(evaluate(""), Err(EvalError::Invalid));
        assert_eq!(evaluate("((1+2)"), Err(EvalError::Invalid));
        assert_eq!(evaluate("1+"), Err(EvalError::Invalid));
        assert_eq!(evaluate("1 2"), Err(EvalError::Invalid));
        assert_eq!(evaluate("1..2"), Err(EvalError::Invalid));
    }

    #[test]
    fn rejects_non_finite_results() {
        assert_eq!(evaluate("1/0"), Err(EvalError::NotFinite));
        assert_eq!(evaluate("0/0"), Err(EvalError::NotFinite));
    }

    #[tokio::test(start_paused = true)]
    async fn execute_reports_progress_and_result() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = StatusSink::new("call-1", tx);

        let result = CalculatorTool
            .execute(json!({"expression": "2+2"}), &sink)
            .await
            .unwrap();

        assert_eq!(result["result"], json!(4));
        assert_eq!(result["calculation"], "2+2 = 4");

        let phases: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|s| (s.status, s.progress))
            .collect();
        assert_eq!(
            phases,
            [
                (StatusKind::Calculating, Some(30)),
                (StatusKind::Completed, Some(100)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn execute_reports_evaluation_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = StatusSink::new("call-1", tx);

        let result = CalculatorTool
            .execute(json!({"expression": "2+x"}), &sink)
            .await;
        assert!(result.is_err());

        // calculating, then error
        assert_eq!(rx.recv().await.unwrap().status, StatusKind::Calculating);
        let status = rx.recv().await.unwrap();
        assert!(status.is_error());
        assert_eq!(status.message, "Calculation failed");
    }
}
