//! Per-option argument checkers.
//!
//! A descriptor row names one [`Check`]. The matching pass offers it a
//! [`Candidate`] (the option name plus the value text that could belong to
//! it) and acts on the returned [`ArgStatus`].

use crate::diag::Diagnostics;
use crate::error::Error;

/// Verdict of a checker about one candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgStatus {
    /// The candidate value belongs to the option; consume it.
    Accepted,
    /// The option is fine without a value; leave the candidate alone.
    AcceptedWithoutValue,
    /// The option is illegal as given.
    Rejected,
}

/// What a checker gets to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Option name as typed, with its dashes (`-r`, `--required`).
    pub name: &'a str,
    /// Glued, attached or following text that could be the value.
    pub arg: Option<&'a str>,
}

impl<'a> Candidate<'a> {
    pub fn new(name: &'a str, arg: Option<&'a str>) -> Self {
        Candidate { name, arg }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Always rejects. Meant for the catch-all row.
    Unknown,
    /// Never takes a value.
    None,
    /// Takes a value when one is offered.
    Optional,
    /// Needs a value, which may be empty.
    Required,
    /// Needs a non-empty value.
    NonEmpty,
    /// Needs a value that is a whole base-10 integer.
    Numeric,
    /// Every listed checker must accept.
    All(&'static [Check]),
}

impl Check {
    /// Judge `candidate`. When `diag` is given, a rejection writes one line
    /// explaining why.
    pub fn check(&self, candidate: &Candidate<'_>, diag: Option<&mut dyn Diagnostics>) -> ArgStatus {
        match self {
            Check::All(checks) => all(checks, candidate, diag),
            leaf => match leaf.verdict(candidate) {
                Ok(status) => status,
                Err(e) => {
                    if let Some(diag) = diag {
                        diag.report(&e.to_string());
                    }
                    ArgStatus::Rejected
                }
            },
        }
    }

    /// Whether this checker can ever consume a value.
    pub fn takes_value(&self) -> bool {
        match self {
            Check::Unknown | Check::None => false,
            Check::Optional | Check::Required | Check::NonEmpty | Check::Numeric => true,
            Check::All(checks) => checks.iter().any(Check::takes_value),
        }
    }

    fn verdict(&self, candidate: &Candidate<'_>) -> Result<ArgStatus, Error> {
        let name = || candidate.name.to_string();
        match self {
            Check::Unknown => Err(Error::UnknownOption(name())),
            Check::None => Ok(ArgStatus::AcceptedWithoutValue),
            Check::Optional => Ok(match candidate.arg {
                Some(_) => ArgStatus::Accepted,
                None => ArgStatus::AcceptedWithoutValue,
            }),
            Check::Required => match candidate.arg {
                Some(_) => Ok(ArgStatus::Accepted),
                None => Err(Error::MissingValue(name())),
            },
            Check::NonEmpty => match candidate.arg {
                Some(arg) if !arg.is_empty() => Ok(ArgStatus::Accepted),
                _ => Err(Error::EmptyValue(name())),
            },
            Check::Numeric => match candidate.arg {
                Some(arg) if is_integer(arg) => Ok(ArgStatus::Accepted),
                _ => Err(Error::NotNumeric(name())),
            },
            Check::All(_) => unreachable!("composite checks are dispatched in check()"),
        }
    }
}

fn all(checks: &[Check], candidate: &Candidate<'_>, mut diag: Option<&mut dyn Diagnostics>) -> ArgStatus {
    let mut rejected = false;
    let mut accepted = false;
    // every member runs so each one gets to report
    for check in checks {
        let status = match diag {
            Some(ref mut d) => check.check(candidate, Some(&mut **d)),
            None => check.check(candidate, None),
        };
        match status {
            ArgStatus::Rejected => rejected = true,
            ArgStatus::Accepted => accepted = true,
            ArgStatus::AcceptedWithoutValue => {}
        }
    }
    if rejected {
        ArgStatus::Rejected
    } else if accepted {
        ArgStatus::Accepted
    } else {
        ArgStatus::AcceptedWithoutValue
    }
}

/// Leading ASCII whitespace (vertical tab included) and one sign allowed,
/// then at least one digit and nothing else.
fn is_integer(s: &str) -> bool {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(check: Check, arg: Option<&str>) -> (ArgStatus, Vec<String>) {
        let mut lines: Vec<String> = Vec::new();
        let status = check.check(&Candidate::new("-x", arg), Some(&mut lines));
        (status, lines)
    }

    #[test]
    fn none_never_takes_value() {
        assert_eq!(run(Check::None, Some("val")).0, ArgStatus::AcceptedWithoutValue);
        assert_eq!(run(Check::None, None).0, ArgStatus::AcceptedWithoutValue);
    }

    #[test]
    fn optional_follows_presence() {
        assert_eq!(run(Check::Optional, Some("")).0, ArgStatus::Accepted);
        assert_eq!(run(Check::Optional, None).0, ArgStatus::AcceptedWithoutValue);
    }

    #[test]
    fn required_allows_empty() {
        assert_eq!(run(Check::Required, Some("")).0, ArgStatus::Accepted);
        let (status, lines) = run(Check::Required, None);
        assert_eq!(status, ArgStatus::Rejected);
        assert_eq!(lines, vec!["Option '-x' requires an argument"]);
    }

    #[test]
    fn nonempty_rejects_empty() {
        assert_eq!(run(Check::NonEmpty, Some("a")).0, ArgStatus::Accepted);
        let (status, lines) = run(Check::NonEmpty, Some(""));
        assert_eq!(status, ArgStatus::Rejected);
        assert_eq!(lines, vec!["Option '-x' requires a non-empty argument"]);
        assert_eq!(run(Check::NonEmpty, None).0, ArgStatus::Rejected);
    }

    #[test]
    fn numeric() {
        for ok in ["123", "-45", "+7", "0", " 12", "\t\x0b-3"] {
            assert_eq!(run(Check::Numeric, Some(ok)).0, ArgStatus::Accepted, "{ok}");
        }
        for bad in ["12a", "", "-", "1.5", "a1", "\u{3000}12", "\u{a0}5", "\u{ff11}"] {
            assert_eq!(run(Check::Numeric, Some(bad)).0, ArgStatus::Rejected, "{bad}");
        }
        let (status, lines) = run(Check::Numeric, None);
        assert_eq!(status, ArgStatus::Rejected);
        assert_eq!(lines, vec!["Option '-x' requires a numeric argument"]);
    }

    #[test]
    fn unknown_always_rejects() {
        let (status, lines) = run(Check::Unknown, Some("v"));
        assert_eq!(status, ArgStatus::Rejected);
        assert_eq!(lines, vec!["Unknown option '-x'"]);
    }

    #[test]
    fn no_message_without_sink() {
        let status = Check::Required.check(&Candidate::new("-x", None), None);
        assert_eq!(status, ArgStatus::Rejected);
    }

    #[test]
    fn composite_is_logical_and() {
        const PORT: Check = Check::All(&[Check::NonEmpty, Check::Numeric]);
        assert_eq!(run(PORT, Some("8080")).0, ArgStatus::Accepted);

        let (status, lines) = run(PORT, Some(""));
        assert_eq!(status, ArgStatus::Rejected);
        assert_eq!(
            lines,
            vec![
                "Option '-x' requires a non-empty argument",
                "Option '-x' requires a numeric argument",
            ]
        );

        assert_eq!(run(Check::All(&[Check::None]), Some("v")).0, ArgStatus::AcceptedWithoutValue);
        assert_eq!(run(Check::All(&[]), None).0, ArgStatus::AcceptedWithoutValue);
    }

    #[test]
    fn takes_value() {
        assert!(!Check::None.takes_value());
        assert!(!Check::Unknown.takes_value());
        assert!(Check::Numeric.takes_value());
        assert!(Check::All(&[Check::None, Check::Optional]).takes_value());
    }
}
