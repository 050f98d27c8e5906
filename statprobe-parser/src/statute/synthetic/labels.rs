//! Citation labels and list separators for rendered statutes.
//!
//! Levels follow the Code's nesting: subsection `(a)`, paragraph `(1)`,
//! subparagraph `(A)`, clause `(i)`, subclause `(I)`.

use crate::statute::error::{RenderError, RenderResult};

pub const MAX_LABEL_LEVELS: usize = 5;

/// The indented label of the `num`-th (zero-based) item at `level`, e.g. `  (2)`.
pub fn level_label(level: usize, num: usize) -> RenderResult<String> {
    let mark = match level {
        0 => letter(b'a', level, num)?,
        1 => (num + 1).to_string(),
        2 => letter(b'A', level, num)?,
        3 => to_roman(num + 1),
        4 => to_roman(num + 1).to_uppercase(),
        _ => return Err(RenderError::LabelDepthExceeded { level }),
    };
    Ok(format!("{}({mark})", indent(level)))
}

fn letter(base: u8, level: usize, num: usize) -> RenderResult<String> {
    if num >= 26 {
        return Err(RenderError::LabelOutOfRange { level, num });
    }
    Ok(char::from(base + num as u8).to_string())
}

/// Lower-case roman numeral of `num`; empty for zero.
pub fn to_roman(mut num: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while num >= value {
            out.push_str(numeral);
            num -= value;
        }
    }
    out
}

/// Text following the `index`-th of `len` list items.
pub fn separator(index: usize, len: usize) -> &'static str {
    if index + 2 == len {
        ", or\n"
    } else if index + 1 == len {
        ".\n"
    } else {
        ",\n"
    }
}

pub fn indent(level: usize) -> String {
    "  ".repeat(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, "(a)")]
    #[case(0, 2, "(c)")]
    #[case(1, 0, "  (1)")]
    #[case(1, 9, "  (10)")]
    #[case(2, 1, "    (B)")]
    #[case(3, 3, "      (iv)")]
    #[case(3, 8, "      (ix)")]
    #[case(4, 5, "        (VI)")]
    fn labels(#[case] level: usize, #[case] num: usize, #[case] expected: &str) {
        assert_eq!(level_label(level, num).unwrap(), expected);
    }

    #[test]
    fn label_depth_is_capped() {
        assert_eq!(
            level_label(5, 0),
            Err(RenderError::LabelDepthExceeded { level: 5 })
        );
    }

    #[test]
    fn letters_run_out() {
        assert!(level_label(0, 25).is_ok());
        assert_eq!(
            level_label(2, 26),
            Err(RenderError::LabelOutOfRange { level: 2, num: 26 })
        );
    }

    #[rstest]
    #[case(0, 3, ",\n")]
    #[case(1, 3, ", or\n")]
    #[case(2, 3, ".\n")]
    #[case(0, 1, ".\n")]
    fn separators(#[case] index: usize, #[case] len: usize, #[case] expected: &str) {
        assert_eq!(separator(index, len), expected);
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(to_roman(1), "i");
        assert_eq!(to_roman(14), "xiv");
        assert_eq!(to_roman(1994), "mcmxciv");
        assert_eq!(to_roman(0), "");
    }
}
