//! Nonce term pools.

use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::statute::error::{GenerateError, GenerateResult};

/// Terms waiting to be assigned, consumed from the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoncePool {
    terms: Vec<String>,
}

impl NoncePool {
    /// Builds a pool from raw words, normalising each one: first letter upper case,
    /// the rest lower case, one trailing `s` removed.
    ///
    /// No two normalised terms may be equal or contain one another, otherwise the
    /// definitions built from them would be ambiguous.
    pub fn from_words<I, S>(words: I) -> GenerateResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        let lowered: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();
        for (i, outer) in lowered.iter().enumerate() {
            for (j, inner) in lowered.iter().enumerate().skip(i + 1) {
                if outer == inner {
                    return Err(GenerateError::DuplicateTerm(terms[i].clone()));
                }
                if outer.contains(inner.as_str()) {
                    return Err(GenerateError::OverlappingTerms {
                        inner: terms[j].clone(),
                        outer: terms[i].clone(),
                    });
                }
                if inner.contains(outer.as_str()) {
                    return Err(GenerateError::OverlappingTerms {
                        inner: terms[i].clone(),
                        outer: terms[j].clone(),
                    });
                }
            }
        }
        debug!(terms = terms.len(), "validated nonce pool");
        Ok(NoncePool { terms })
    }

    /// Reads whitespace-separated words from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> GenerateResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_words(text.split_whitespace())
    }

    /// Identifiers `A00`, `A11` … `Z99`, shuffled.
    pub fn systematic<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut terms = Vec::with_capacity(260);
        for letter in 'A'..='Z' {
            for digit in 0..10 {
                terms.push(format!("{letter}{digit}{digit}"));
            }
        }
        terms.shuffle(rng);
        NoncePool { terms }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.terms.shuffle(rng);
    }

    pub fn pop(&mut self) -> Option<String> {
        self.terms.pop()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

fn normalize(word: &str) -> String {
    let word = word.trim();
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    if out.len() > 1 && out.ends_with('s') {
        out.pop();
    }
    out
}

/// Indefinite article for a term: `an` before a vowel, and before letters whose
/// spoken name starts with a vowel when the term is a systematic id like `M11`.
pub fn article(term: &str) -> &'static str {
    let mut chars = term.chars();
    let (Some(first), second) = (chars.next(), chars.next()) else {
        return "a";
    };
    let first = first.to_ascii_lowercase();
    match second {
        Some(c) if c.is_ascii_digit() => {
            if "aefhilmnorsx".contains(first) {
                "an"
            } else {
                "a"
            }
        }
        _ if "aeiou".contains(first) => "an",
        _ => "a",
    }
}
