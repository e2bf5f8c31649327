//! Natural (human) ordering of names.
//!
//! Names are split into alternating runs of non-digits and digits. Digit runs
//! compare as integers and text runs compare case-insensitively, so `file2`
//! sorts before `file11` and `IMG3` sorts next to `img3`.
//!
//! ```
//! use filecollect::collect::natural::natural_cmp;
//!
//! let mut names = vec!["img2.png", "img11.png", "img1.png"];
//! names.sort_by(|a, b| natural_cmp(a, b));
//! assert_eq!(names, ["img1.png", "img2.png", "img11.png"]);
//! ```

use std::cmp::Ordering;

/// Compare two names in natural order.
///
/// Names that differ only in letter case or in leading zeros of a number
/// compare equal; callers use a stable sort to keep their original order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs::new(a);
    let mut right = Runs::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x, y) {
                    (Run::Digits(x), Run::Digits(y)) => cmp_digits(x, y),
                    (Run::Text(x), Run::Text(y)) => cmp_text(x, y),
                    // Both sides start with a (possibly empty) text run and
                    // alternate, so kinds always line up.
                    (Run::Text(_), Run::Digits(_)) => Ordering::Less,
                    (Run::Digits(_), Run::Text(_)) => Ordering::Greater,
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Run<'a> {
    Text(&'a str),
    Digits(&'a str),
}

/// Alternating text/digit runs, always starting with a text run.
struct Runs<'a> {
    rest: &'a str,
    expect_text: bool,
    done: bool,
}

impl<'a> Runs<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            rest: s,
            expect_text: true,
            done: false,
        }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        if self.done {
            return None;
        }

        let run = if self.expect_text {
            let end = self
                .rest
                .find(|c: char| c.is_ascii_digit())
                .unwrap_or(self.rest.len());
            let (text, rest) = self.rest.split_at(end);
            self.rest = rest;
            if rest.is_empty() {
                self.done = true;
            }
            Run::Text(text)
        } else {
            let end = self
                .rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(self.rest.len());
            let (digits, rest) = self.rest.split_at(end);
            self.rest = rest;
            // A name ending in digits still closes with an empty text run
            Run::Digits(digits)
        };

        self.expect_text = !self.expect_text;
        Some(run)
    }
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
