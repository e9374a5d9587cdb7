//! Tolerant parser for the text exposition format.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::metrics::labels::{is_valid_label_name, is_valid_metric_name};

/// Sorted `(name, value)` label pairs identifying a sample.
pub type LabelSet = Vec<(String, String)>;

/// Errors raised while parsing exposition text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The line does not follow the sample or comment grammar.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// The sample value is not a float.
    #[error("line {line}: invalid value {value:?}")]
    InvalidValue {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        value: String,
    },
    /// The same series appears twice.
    #[error("line {line}: duplicate sample {family}{labels}")]
    DuplicateSample {
        /// 1-based line number of the second occurrence.
        line: usize,
        /// Family name.
        family: String,
        /// Rendered label set.
        labels: String,
    },
    /// Two `HELP` or `TYPE` lines for one family disagree.
    #[error("line {line}: conflicting {field} for family {family}")]
    ConflictingMetadata {
        /// 1-based line number.
        line: usize,
        /// Family name.
        family: String,
        /// `"help"` or `"type"`.
        field: &'static str,
    },
}

/// Canonical content of one family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFamily {
    /// Unescaped help text, if a `HELP` line was present.
    pub help: Option<String>,
    /// Type name, if a `TYPE` line was present.
    pub kind: Option<String>,
    /// Sample values keyed by sorted label set.
    pub samples: BTreeMap<LabelSet, f64>,
}

/// Canonical content of a whole exposition, keyed by family name.
pub type Exposition = BTreeMap<String, ParsedFamily>;

/// Parses exposition text into its canonical form.
///
/// Blank lines, surrounding whitespace and line order are irrelevant; a
/// sample may appear before the metadata of its family. Comments other
/// than `HELP` and `TYPE` are ignored, as are sample timestamps.
pub fn parse_exposition(text: &str) -> Result<Exposition, ParseError> {
    let mut families = Exposition::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            parse_comment(comment.trim_start(), line_no, &mut families)?;
            continue;
        }

        let (name, labels, value) = parse_sample(line, line_no)?;
        let family = families.entry(name.clone()).or_default();
        if family.samples.contains_key(&labels) {
            return Err(ParseError::DuplicateSample {
                line: line_no,
                family: name,
                labels: format_labels(&labels),
            });
        }
        family.samples.insert(labels, value);
    }

    Ok(families)
}

fn parse_comment(
    comment: &str,
    line: usize,
    families: &mut Exposition,
) -> Result<(), ParseError> {
    let (keyword, rest) = comment
        .split_once(char::is_whitespace)
        .unwrap_or((comment, ""));
    if keyword != "HELP" && keyword != "TYPE" {
        return Ok(());
    }

    let rest = rest.trim_start();
    let (name, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if !is_valid_metric_name(name) {
        return Err(ParseError::Malformed {
            line,
            message: format!("invalid metric name {name:?} in {keyword} line"),
        });
    }

    let family = families.entry(name.to_string()).or_default();
    let (slot, field, value) = if keyword == "HELP" {
        (&mut family.help, "help", unescape_help(text.trim_start(), line)?)
    } else {
        (&mut family.kind, "type", text.trim().to_string())
    };

    match slot.as_deref() {
        Some(existing) if existing != value => Err(ParseError::ConflictingMetadata {
            line,
            family: name.to_string(),
            field,
        }),
        _ => {
            *slot = Some(value);
            Ok(())
        }
    }
}

fn unescape_help(text: &str, line: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            other => {
                return Err(ParseError::Malformed {
                    line,
                    message: format!("invalid escape in help text: \\{}", other.unwrap_or(' ')),
                })
            }
        }
    }
    Ok(out)
}

fn parse_sample(line: &str, line_no: usize) -> Result<(String, LabelSet, f64), ParseError> {
    let malformed = |message: String| ParseError::Malformed {
        line: line_no,
        message,
    };

    let name_end = line
        .find(|c: char| c == '{' || c.is_whitespace())
        .ok_or_else(|| malformed("sample without value".to_string()))?;
    let name = &line[..name_end];
    if !is_valid_metric_name(name) {
        return Err(malformed(format!("invalid metric name {name:?}")));
    }

    let mut rest = &line[name_end..];
    let mut labels = LabelSet::new();
    if rest.starts_with('{') {
        let (parsed, after) = parse_labels(&rest[1..], line_no)?;
        labels = parsed;
        rest = after;
    }

    let mut fields = rest.split_whitespace();
    let raw_value = fields
        .next()
        .ok_or_else(|| malformed("sample without value".to_string()))?;
    let value = parse_value(raw_value).ok_or_else(|| ParseError::InvalidValue {
        line: line_no,
        value: raw_value.to_string(),
    })?;
    if let Some(timestamp) = fields.next() {
        if timestamp.parse::<i64>().is_err() || fields.next().is_some() {
            return Err(malformed(format!("unexpected trailing text {timestamp:?}")));
        }
    }

    labels.sort();
    Ok((name.to_string(), labels, value))
}

/// Parses `name="value",...}` and returns the labels plus the remainder
/// after the closing brace.
fn parse_labels(input: &str, line: usize) -> Result<(LabelSet, &str), ParseError> {
    let malformed = |message: &str| ParseError::Malformed {
        line,
        message: message.to_string(),
    };

    let mut labels = LabelSet::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix('}') {
            return Ok((labels, after));
        }

        let eq = rest.find('=').ok_or_else(|| malformed("label without value"))?;
        let name = rest[..eq].trim();
        if !is_valid_label_name(name) {
            return Err(malformed(&format!("invalid label name {name:?}")));
        }
        if labels.iter().any(|(n, _)| n == name) {
            return Err(malformed(&format!("duplicate label {name:?}")));
        }

        rest = rest[eq + 1..].trim_start();
        rest = rest
            .strip_prefix('"')
            .ok_or_else(|| malformed("label value must be quoted"))?;

        let mut value = String::new();
        let mut chars = rest.char_indices();
        let close = loop {
            match chars.next() {
                Some((i, '"')) => break i,
                Some((_, '\\')) => match chars.next() {
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, 'n')) => value.push('\n'),
                    _ => return Err(malformed("invalid escape in label value")),
                },
                Some((_, c)) => value.push(c),
                None => return Err(malformed("unterminated label value")),
            }
        };
        labels.push((name.to_string(), value));

        rest = rest[close + 1..].trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after;
        } else if !rest.starts_with('}') {
            return Err(malformed("expected ',' or '}' after label"));
        }
    }
}

fn parse_value(raw: &str) -> Option<f64> {
    match raw {
        "NaN" => Some(f64::NAN),
        "+Inf" | "Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        _ => raw.parse().ok(),
    }
}

/// Formats a label set the way it appears on a sample line.
pub fn format_labels(labels: &LabelSet) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = labels
        .iter()
        .map(|(name, value)| format!("{name}={value:?}"))
        .collect();
    format!("{{{}}}", inner.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_family() {
        let parsed = parse_exposition(
            r#"
            # HELP kube_thing Things per namespace.
            # TYPE kube_thing gauge
            kube_thing{thing="a",namespace="ns1"} 1.5e+09
                kube_thing{namespace="ns2" , thing="b",} 3
            "#,
        )
        .unwrap();

        let family = &parsed["kube_thing"];
        assert_eq!(family.help.as_deref(), Some("Things per namespace."));
        assert_eq!(family.kind.as_deref(), Some("gauge"));
        assert_eq!(
            family.samples[&labels(&[("namespace", "ns1"), ("thing", "a")])],
            1.5e9
        );
        assert_eq!(
            family.samples[&labels(&[("namespace", "ns2"), ("thing", "b")])],
            3.0
        );
    }

    #[test]
    fn test_order_independent() {
        let a = "x{l=\"1\"} 1\n# HELP x Help.\n# TYPE x gauge\nx{l=\"2\"} 2";
        let b = "# TYPE x gauge\nx{l=\"2\"} 2\n# HELP x Help.\nx{l=\"1\"} 1";
        let (a, b) = (parse_exposition(a).unwrap(), parse_exposition(b).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_escapes() {
        let parsed = parse_exposition(
            "# HELP x Back\\\\slash\\nnewline\nx{v=\"q\\\"uote\\\\ \\n\"} 1",
        )
        .unwrap();

        assert_eq!(parsed["x"].help.as_deref(), Some("Back\\slash\nnewline"));
        assert!(parsed["x"]
            .samples
            .contains_key(&labels(&[("v", "q\"uote\\ \n")])));
    }

    #[test]
    fn test_special_values_and_timestamps() {
        let parsed = parse_exposition("a NaN\nb +Inf\nc -Inf 1500000000000").unwrap();
        assert!(parsed["a"].samples[&LabelSet::new()].is_nan());
        assert_eq!(parsed["b"].samples[&LabelSet::new()], f64::INFINITY);
        assert_eq!(parsed["c"].samples[&LabelSet::new()], f64::NEG_INFINITY);
    }

    #[test]
    fn test_rejects_malformed_lines() {
        assert!(matches!(
            parse_exposition("x{l=\"1\" 1"),
            Err(ParseError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_exposition("x{l=1} 1"),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_exposition("x"),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_exposition("\nx one"),
            Err(ParseError::InvalidValue { line: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_conflicts() {
        assert!(matches!(
            parse_exposition("x{a=\"1\"} 1\nx{a=\"1\"} 2"),
            Err(ParseError::DuplicateSample { line: 2, .. })
        ));
        assert!(matches!(
            parse_exposition("# TYPE x gauge\n# TYPE x counter"),
            Err(ParseError::ConflictingMetadata { field: "type", .. })
        ));
    }

    #[test]
    fn test_other_comments_ignored() {
        let parsed = parse_exposition("# just a note\n#\nx 1").unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
