//! Environment variable validation with helpful warnings
//!
//! Invalid values turn into `ConfigWarning`s carrying a Levenshtein-based
//! typo suggestion; the caller keeps its current setting.

use super::loader::{ConfigWarning, ConfigWarningKind};

/// Validator for environment variable values
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse a value, or explain why it was rejected
    pub fn parse<T, F>(&self, value: &str, parser: F) -> Result<T, ConfigWarning>
    where
        F: Fn(&str) -> Option<T>,
    {
        parser(value).ok_or_else(|| ConfigWarning {
            kind: ConfigWarningKind::InvalidEnvValue {
                value: value.to_string(),
                valid: self.valid_values.iter().map(|v| v.to_string()).collect(),
            },
            key: self.var_name.to_string(),
            file: None,
            line: None,
            suggestion: self.suggest(value),
        })
    }

    /// Closest valid value within two edits
    fn suggest(&self, value: &str) -> Option<String> {
        let input = value.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for &valid in self.valid_values {
            let dist = levenshtein(&input, valid);
            match best {
                None => best = Some((valid, dist)),
                Some((_, best_dist)) if dist < best_dist => best = Some((valid, dist)),
                _ => {}
            }
        }

        match best {
            Some((suggested, dist)) if dist <= 2 && dist > 0 => Some(suggested.to_string()),
            _ => None,
        }
    }
}

/// Simple Levenshtein distance for typo detection
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let a_len = a_bytes.len();
    let b_len = b_bytes.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_bytes.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_bytes.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
