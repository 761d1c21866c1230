// Copyright (c) 2025 The must-oc Authors
// SPDX-License-Identifier: BSD-3-Clause

//! Equality-based label selector parsing and matching.
//!
//! The supported grammar is a comma-separated list of `key OP value` terms
//! with `OP` one of `=`, `==`, `!=`. Keys and values are restricted to
//! `[A-Za-z0-9_./-]` so selector input can never smuggle path or shell
//! metacharacters. Set-based selectors are out of scope.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Maximum number of terms accepted in one selector.
pub const MAX_SELECTOR_TERMS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=` and `==` are synonyms.
    Equal,
    NotEqual,
}

/// One parsed `key OP value` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub key: String,
    pub op: Operator,
    pub value: String,
}

/// A parsed selector. Empty matches everything.
pub type Selector = Vec<Term>;

fn is_selector_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-')
}

fn valid_token(s: &str) -> bool {
    s.chars().all(is_selector_char)
}

/// Parse a selector string into terms.
///
/// An empty string parses to an empty selector. Anything outside the
/// grammar fails with [`Error::BadSelector`].
pub fn parse(selector: &str) -> Result<Selector> {
    if selector.is_empty() {
        return Ok(Vec::new());
    }

    let raw_terms: Vec<&str> = selector.split(',').collect();
    if raw_terms.len() > MAX_SELECTOR_TERMS {
        return Err(Error::BadSelector(format!(
            "{} terms exceeds the maximum of {MAX_SELECTOR_TERMS}",
            raw_terms.len()
        )));
    }

    let mut terms = Vec::with_capacity(raw_terms.len());
    for (idx, raw) in raw_terms.iter().enumerate() {
        if raw.is_empty() {
            return Err(Error::BadSelector(format!(
                "empty term at position {idx} in {selector:?}"
            )));
        }
        terms.push(parse_term(raw, idx, selector)?);
    }
    Ok(terms)
}

fn parse_term(raw: &str, idx: usize, selector: &str) -> Result<Term> {
    // Order matters: "!=" and "==" both contain "=".
    let (key, op, value) = if let Some((k, v)) = raw.split_once("!=") {
        (k, Operator::NotEqual, v)
    } else if let Some((k, v)) = raw.split_once("==") {
        (k, Operator::Equal, v)
    } else if let Some((k, v)) = raw.split_once('=') {
        (k, Operator::Equal, v)
    } else {
        return Err(Error::BadSelector(format!(
            "term {raw:?} at position {idx} has no operator in {selector:?}"
        )));
    };

    if key.is_empty() || !valid_token(key) || !valid_token(value) {
        return Err(Error::BadSelector(format!(
            "invalid term {raw:?} at position {idx} in {selector:?}"
        )));
    }

    Ok(Term {
        key: key.to_string(),
        op,
        value: value.to_string(),
    })
}

/// True when ALL terms match the given labels.
///
/// For `=`/`==` the key must exist with an equal value. For `!=` the key
/// must be absent or carry a different value. An empty selector matches.
pub fn matches(labels: &BTreeMap<String, String>, selector: &Selector) -> bool {
    selector.iter().all(|term| match term.op {
        Operator::Equal => labels.get(&term.key) == Some(&term.value),
        Operator::NotEqual => labels.get(&term.key) != Some(&term.value),
    })
}
