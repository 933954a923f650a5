use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"-?\d+(?:\.\d+)?").unwrap();
    static ref DIRECT_EXPRESSION: Regex = Regex::new(r"\d+\s*[-+*/]\s*\d+").unwrap();
    static ref MATH_KEYWORDS: Regex = Regex::new(
        r"\b(?:sum|add|addition|subtract|difference|minus|multiply|product|times|divide|division|divided|percent)\b|%|\d+\s+of\s+\d+|\bis what\b"
    )
    .unwrap();
    static ref ADDITION: Regex = Regex::new(r"\b(?:sum of|add|addition)\b").unwrap();
    static ref SUBTRACTION: Regex = Regex::new(r"\b(?:difference|subtract|minus)\b").unwrap();
    static ref MULTIPLICATION: Regex = Regex::new(r"\b(?:multiply|product|times)\b").unwrap();
    static ref DIVISION: Regex = Regex::new(r"\b(?:divide|division|divided|by)\b").unwrap();
    static ref PERCENT_OF: Regex = Regex::new(r"(\d+(?:\.\d+)?)%\s*(?:of)?\s*(\d+(?:\.\d+)?)").unwrap();
    static ref WHAT_PERCENT: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)\s+is\s+(?:what|which)\s*%?\s*(?:percent)?\s*(?:of)?\s*(\d+(?:\.\d+)?)").unwrap();
    static ref BARE_OF: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*of\s*(\d+(?:\.\d+)?)").unwrap();
    static ref OPERATOR: Regex = Regex::new(r"[-+*/]").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Result is not a finite number")]
    NotFinite,
}

/// True when the lowercased utterance reads like a calculation request.
pub fn looks_like_math(lower: &str) -> bool {
    lower.chars().any(|c| c.is_ascii_digit()) && (DIRECT_EXPRESSION.is_match(lower) || MATH_KEYWORDS.is_match(lower))
}

/// Prints integers without a fraction and everything else with at most four decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let rounded = format!("{:.4}", value);
    rounded.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn numbers(expr: &str) -> Vec<f64> {
    NUMBER
        .find_iter(expr)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

fn fold(nums: &[f64], op: impl Fn(f64, f64) -> f64) -> Option<f64> {
    let (first, rest) = nums.split_first()?;
    Some(rest.iter().fold(*first, |acc, value| op(acc, *value)))
}

fn basic_arithmetic(expr: &str, nums: &[f64]) -> Option<String> {
    if ADDITION.is_match(expr) {
        if nums.len() < 2 {
            return Some("I'll need at least two numbers to add.".to_string());
        }
        return Some(format!("That comes to {}.", format_number(nums.iter().sum())));
    }

    if SUBTRACTION.is_match(expr) {
        if nums.len() < 2 {
            return Some("I'll need at least two numbers to find the difference.".to_string());
        }
        let result = fold(nums, |a, b| a - b)?;
        return Some(format!("That would be {}.", format_number(result)));
    }

    if MULTIPLICATION.is_match(expr) {
        if nums.len() < 2 {
            return Some("I'll need more than one number to multiply.".to_string());
        }
        let result = fold(nums, |a, b| a * b)?;
        return Some(format!("Multiplying that gives {}.", format_number(result)));
    }

    if DIVISION.is_match(expr) {
        if nums.len() < 2 {
            return Some("I'll need two numbers for a division.".to_string());
        }
        let result = fold(nums, |a, b| a / b)?;
        if !result.is_finite() {
            return Some("I can't divide by zero.".to_string());
        }
        return Some(format!("That works out to about {}.", format_number(result)));
    }

    None
}

fn percentage(expr: &str) -> Option<String> {
    let pair = |captures: regex::Captures| -> Option<(f64, f64)> {
        Some((captures.get(1)?.as_str().parse().ok()?, captures.get(2)?.as_str().parse().ok()?))
    };

    if let Some((percent, total)) = PERCENT_OF.captures(expr).and_then(pair) {
        return Some(format!("That's {}.", format_number(percent / 100.0 * total)));
    }

    if let Some((part, total)) = WHAT_PERCENT.captures(expr).and_then(pair) {
        if total == 0.0 {
            return Some("I can't take a percentage of zero.".to_string());
        }
        return Some(format!("That's about {}%.", format_number(part / total * 100.0)));
    }

    if let Some((percent, total)) = BARE_OF.captures(expr).and_then(pair) {
        return Some(format!("That's {}.", format_number(percent / 100.0 * total)));
    }

    None
}

fn direct_expression(expr: &str) -> Option<String> {
    if !OPERATOR.is_match(expr) {
        return None;
    }

    let cleaned: String = expr
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/().".contains(*c))
        .collect();

    Some(match evaluate(&cleaned) {
        Ok(value) => format!("Let's see... that's {}.", format_number(value)),
        Err(MathError::NotFinite) => "Hmm, that doesn't seem like a valid math expression.".to_string(),
        Err(_) => "That doesn't look like a valid calculation.".to_string(),
    })
}

fn implicit_addition(expr: &str, nums: &[f64]) -> Option<String> {
    if nums.len() == 2 && !OPERATOR.is_match(expr) {
        return Some(format!("That's {}.", format_number(nums[0] + nums[1])));
    }
    None
}

/// Answers a calculation request in words.
pub fn calculate(input: &str) -> String {
    let expr = input.trim().to_lowercase();
    let nums = numbers(&expr);

    basic_arithmetic(&expr, &nums)
        .or_else(|| percentage(&expr))
        .or_else(|| direct_expression(&expr))
        .or_else(|| implicit_addition(&expr, &nums))
        .unwrap_or_else(|| "I'm not sure what calculation you meant there.".to_string())
}

/// Evaluates `+ - * /` with parentheses and the usual precedence.
pub fn evaluate(expr: &str) -> Result<f64, MathError> {
    let mut parser = Parser {
        chars: expr.chars().filter(|c| !c.is_whitespace()).collect(),
        position: 0,
    };

    let value = parser.expression()?;
    if let Some(c) = parser.peek() {
        return Err(MathError::UnexpectedChar(c));
    }
    if !value.is_finite() {
        return Err(MathError::NotFinite);
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        self.position += 1;
        c
    }

    fn expression(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.position += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.position += 1;
            let rhs = self.factor()?;
            value = if op == '*' { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, MathError> {
        match self.peek() {
            Some('-') => {
                self.position += 1;
                Ok(-self.factor()?)
            }
            Some('+') => {
                self.position += 1;
                self.factor()
            }
            Some('(') => {
                self.position += 1;
                let value = self.expression()?;
                match self.next() {
                    Some(')') => Ok(value),
                    Some(c) => Err(MathError::UnexpectedChar(c)),
                    None => Err(MathError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(MathError::UnexpectedChar(c)),
            None => Err(MathError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, MathError> {
        let start = self.position;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.position += 1;
        }

        let literal: String = self.chars[start..self.position].iter().collect();
        literal.parse::<f64>().map_err(|_| MathError::UnexpectedChar('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::{calculate, evaluate, format_number, looks_like_math, MathError};

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(evaluate("2+2").unwrap(), 4.0);
        assert_eq!(evaluate("10+20/5").unwrap(), 14.0);
        assert_eq!(evaluate("(10+20)/5").unwrap(), 6.0);
        assert_eq!(evaluate("-3*-2").unwrap(), 6.0);
        assert_eq!(evaluate("1/0"), Err(MathError::NotFinite));
        assert_eq!(evaluate("2+"), Err(MathError::UnexpectedEnd));
        assert_eq!(evaluate("(2+3"), Err(MathError::UnexpectedEnd));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-5.0), "-5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(2.0 / 3.0), "0.6667");
    }

    #[test]
    fn test_looks_like_math() {
        assert!(looks_like_math("2 + 2"));
        assert!(looks_like_math("what is 20% of 400"));
        assert!(looks_like_math("multiply 3 and 4"));
        assert!(!looks_like_math("set a timer for 5 minutes"));
        assert!(!looks_like_math("what is love"));
        assert!(!looks_like_math("add me as a friend"));
    }

    #[test]
    fn test_calculate_phrasings() {
        assert_eq!(calculate("2 + 2"), "Let's see... that's 4.");
        assert_eq!(calculate("What is the sum of 3 and 4"), "That comes to 7.");
        assert_eq!(calculate("multiply 3 and 5"), "Multiplying that gives 15.");
        assert_eq!(calculate("what is the difference between 10 and 4"), "That would be 6.");
        assert_eq!(calculate("divide 9 by 2"), "That works out to about 4.5.");
        assert_eq!(calculate("what is 20% of 400"), "That's 80.");
        assert_eq!(calculate("80 is what percent of 400"), "That's about 20%.");
        assert_eq!(calculate("5 and 6"), "That's 11.");
        assert_eq!(calculate("add 5"), "I'll need at least two numbers to add.");
        assert_eq!(calculate("1 / 0"), "Hmm, that doesn't seem like a valid math expression.");
    }
}
