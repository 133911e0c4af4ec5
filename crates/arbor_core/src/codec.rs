//! Line-oriented pre-order tree format
//!
//! A document holds one token per line. A branch is written as two lines,
//! `Feature: <name>` and `Threshold: <value>`, followed by its left subtree
//! and then its right subtree. A leaf is a single line holding its label.
//!
//! ```text
//! Feature: length
//! Threshold: 2.5
//! spam
//! ham
//! ```
//!
//! There is no header, footer, or version marker. Leaves read back from a
//! document carry an empty exemplar.
//!
//! Both directions walk the tree with an explicit stack, and documents
//! nesting deeper than [`MAX_DEPTH`] branches are refused either way.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::errors::{ClassifierError, Result};
use crate::features::FeatureVector;
use crate::tree::{Node, MAX_DEPTH};

/// Prefix of the line introducing a branch
pub const FEATURE_PREFIX: &str = "Feature: ";

/// Prefix of the line carrying a branch threshold
pub const THRESHOLD_PREFIX: &str = "Threshold: ";

/// Render a threshold so that parsing it yields the identical `f64`.
///
/// Uses the shortest round-trip digits. Magnitudes in `[1e-3, 1e7)` are
/// written in plain decimal with a trailing `.0` on integral values (`2.0`,
/// `2.5`); everything else uses a capital-`E` exponent with at least one
/// fractional digit (`1.0E-7`, `1.25E-4`, `1.5E7`).
pub fn format_threshold(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{value:?}");
    }

    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            format!("{mantissa}E{exponent}")
        }
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}

fn breaks_line(token: &str) -> bool {
    token.contains(|c: char| c == '\n' || c == '\r')
}

/// Serialize `node` into its document lines.
///
/// Fails with [`ClassifierError::InvalidArgument`] when a label or feature
/// name cannot be stored on a single line, or when a label would read back
/// as a branch.
pub fn to_lines<F>(node: &Node<F>) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut pending = vec![(node, 0usize)];

    while let Some((node, depth)) = pending.pop() {
        match node {
            Node::Leaf { label, .. } => {
                if breaks_line(label) || label.starts_with(FEATURE_PREFIX) {
                    return Err(ClassifierError::InvalidArgument(format!(
                        "label {label:?} cannot be written as a leaf line"
                    )));
                }
                lines.push(label.clone());
            }
            Node::Branch {
                feature,
                threshold,
                left,
                right,
            } => {
                if depth >= MAX_DEPTH {
                    return Err(ClassifierError::InvalidArgument(format!(
                        "tree nests deeper than {MAX_DEPTH} branches"
                    )));
                }
                if breaks_line(feature) {
                    return Err(ClassifierError::InvalidArgument(format!(
                        "feature name {feature:?} cannot be written on a single line"
                    )));
                }
                lines.push(format!("{FEATURE_PREFIX}{feature}"));
                lines.push(format!("{THRESHOLD_PREFIX}{}", format_threshold(*threshold)));
                pending.push((&**right, depth + 1));
                pending.push((&**left, depth + 1));
            }
        }
    }

    Ok(lines)
}

/// Write `node` and its subtrees in pre-order, one line per token.
///
/// Nothing is written when the tree cannot be serialized.
pub fn write_tree<F, W: Write>(node: &Node<F>, out: &mut W) -> Result<()> {
    for line in to_lines(node)? {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Read a tree from a document
pub fn read_tree<F: FeatureVector, R: BufRead>(reader: R) -> Result<Node<F>> {
    TreeReader::new(reader.lines()).read_document()
}

/// Parse a tree from already split document lines
pub fn parse_lines<F, I, S>(lines: I) -> Result<Node<F>>
where
    F: FeatureVector,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TreeReader::new(lines.into_iter().map(|line| Ok::<String, std::io::Error>(line.into())))
        .read_document()
}

/// A branch whose header has been read but whose subtrees are incomplete
struct OpenBranch<F> {
    feature: String,
    threshold: f64,
    line: usize,
    left: Option<Node<F>>,
}

/// Pre-order reader over a stream of lines
struct TreeReader<I> {
    lines: I,
    line_no: usize,
}

impl<I> TreeReader<I>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    fn new(lines: I) -> Self {
        Self { lines, line_no: 0 }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn read_document<F: FeatureVector>(mut self) -> Result<Node<F>> {
        let root = self.read_root()?;

        let mut trailing = 0usize;
        while self.next_line()?.is_some() {
            trailing += 1;
        }
        if trailing > 0 {
            warn!(
                "Ignoring {} line(s) after the end of the tree (line {} onwards)",
                trailing,
                self.line_no + 1 - trailing
            );
        }

        Ok(root)
    }

    fn read_root<F: FeatureVector>(&mut self) -> Result<Node<F>> {
        let mut open: Vec<OpenBranch<F>> = Vec::new();

        'lines: loop {
            let Some(line) = self.next_line()? else {
                return Err(match open.last() {
                    None => ClassifierError::InvalidState(
                        "document does not contain a tree".to_string(),
                    ),
                    Some(branch) => ClassifierError::InvalidState(format!(
                        "branch on '{}' at line {} is missing its {} subtree",
                        branch.feature,
                        branch.line,
                        if branch.left.is_some() { "right" } else { "left" }
                    )),
                });
            };

            if line.starts_with(FEATURE_PREFIX) {
                if open.len() >= MAX_DEPTH {
                    return Err(ClassifierError::InvalidState(format!(
                        "branch at line {} nests deeper than {} branches",
                        self.line_no, MAX_DEPTH
                    )));
                }
                let feature = line[FEATURE_PREFIX.len()..].to_string();
                let branch_line = self.line_no;
                let threshold = self.read_threshold(&feature)?;
                open.push(OpenBranch {
                    feature,
                    threshold,
                    line: branch_line,
                    left: None,
                });
                continue;
            }

            // A leaf completes every open branch still waiting on its right subtree
            let mut done = Node::leaf(line, F::default());
            while let Some(mut branch) = open.pop() {
                match branch.left.take() {
                    Some(left) => {
                        done = Node::branch(branch.feature, branch.threshold, left, done);
                    }
                    None => {
                        branch.left = Some(done);
                        open.push(branch);
                        continue 'lines;
                    }
                }
            }
            return Ok(done);
        }
    }

    fn read_threshold(&mut self, feature: &str) -> Result<f64> {
        let line = self.next_line()?.ok_or_else(|| ClassifierError::Parse {
            line: self.line_no + 1,
            message: format!("missing threshold for feature '{feature}'"),
        })?;

        let raw = line
            .strip_prefix(THRESHOLD_PREFIX)
            .ok_or_else(|| ClassifierError::Parse {
                line: self.line_no,
                message: format!("expected '{THRESHOLD_PREFIX}<number>', found '{line}'"),
            })?;

        raw.trim().parse::<f64>().map_err(|err| ClassifierError::Parse {
            line: self.line_no,
            message: format!("invalid threshold '{raw}': {err}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureMap;

    fn sample_tree() -> Node<FeatureMap> {
        Node::branch(
            "length",
            2.5,
            Node::leaf("spam", FeatureMap::new()),
            Node::branch(
                "money",
                1.0,
                Node::leaf("ham", FeatureMap::new()),
                Node::leaf("spam", FeatureMap::new()),
            ),
        )
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(2.5), "2.5");
        assert_eq!(format_threshold(3.0), "3.0");
        assert_eq!(format_threshold(-0.125), "-0.125");
        assert_eq!(format_threshold(0.0), "0.0");
        assert_eq!(format_threshold(0.001), "0.001");
        assert_eq!(format_threshold(1234567.0), "1234567.0");
        assert_eq!(format_threshold(0.1).parse::<f64>().unwrap(), 0.1);
    }

    #[test]
    fn test_format_threshold_exponents() {
        assert_eq!(format_threshold(1.25e-4), "1.25E-4");
        assert_eq!(format_threshold(1e-7), "1.0E-7");
        assert_eq!(format_threshold(-2e-5), "-2.0E-5");
        assert_eq!(format_threshold(1.5e7), "1.5E7");
        assert_eq!(format_threshold(1e7), "1.0E7");

        for value in [1.25e-4, 1e-7, -2e-5, 1.5e7, 6.02e23] {
            assert_eq!(format_threshold(value).parse::<f64>().unwrap(), value);
        }
    }

    #[test]
    fn test_to_lines_pre_order() {
        assert_eq!(
            to_lines(&sample_tree()).unwrap(),
            vec![
                "Feature: length",
                "Threshold: 2.5",
                "spam",
                "Feature: money",
                "Threshold: 1.0",
                "ham",
                "spam",
            ]
        );
    }

    #[test]
    fn test_write_matches_lines() {
        let tree = sample_tree();
        let mut buffer = Vec::new();
        write_tree(&tree, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut expected = to_lines(&tree).unwrap().join("\n");
        expected.push('\n');
        assert_eq!(text, expected);
    }

    #[test]
    fn test_single_leaf_document() {
        let tree: Node<FeatureMap> = parse_lines(vec!["ham"]).unwrap();
        assert_eq!(tree.label(), Some("ham"));
    }

    #[test]
    fn test_read_round_trip() {
        let tree = sample_tree();
        let text = to_lines(&tree).unwrap().join("\n");

        let restored: Node<FeatureMap> = read_tree(text.as_bytes()).unwrap();
        assert!(restored.same_structure(&tree));
    }

    #[test]
    fn test_accepts_foreign_number_spellings() {
        let tree: Node<FeatureMap> =
            parse_lines(vec!["Feature: x", "Threshold: 1.0E-7", "a", "b"]).unwrap();
        match tree {
            Node::Branch { threshold, .. } => assert_eq!(threshold, 1.0e-7),
            Node::Leaf { .. } => panic!("expected a branch"),
        }
    }

    #[test]
    fn test_windows_line_endings() {
        let restored: Node<FeatureMap> =
            read_tree("Feature: x\r\nThreshold: 2.0\r\nlow\r\nhigh\r\n".as_bytes()).unwrap();
        let expected: Node<FeatureMap> =
            parse_lines(vec!["Feature: x", "Threshold: 2.0", "low", "high"]).unwrap();
        assert!(restored.same_structure(&expected));
    }

    #[test]
    fn test_empty_document_is_invalid_state() {
        let err = parse_lines::<FeatureMap, _, String>(Vec::new()).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidState(_)));
    }

    #[test]
    fn test_truncated_branch_is_invalid_state() {
        let err = parse_lines::<FeatureMap, _, _>(vec!["Feature: x", "Threshold: 1.0", "a"])
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidState(_)));
    }

    #[test]
    fn test_bad_threshold_is_parse_error() {
        let err = parse_lines::<FeatureMap, _, _>(vec!["Feature: x", "Threshold: lots", "a", "b"])
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_threshold_prefix_is_parse_error() {
        let err = parse_lines::<FeatureMap, _, _>(vec!["Feature: x", "1.0", "a", "b"]).unwrap_err();
        assert!(matches!(err, ClassifierError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_threshold_line_is_parse_error() {
        let err = parse_lines::<FeatureMap, _, _>(vec!["Feature: x"]).unwrap_err();
        assert!(matches!(err, ClassifierError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_trailing_lines_are_ignored() {
        let tree: Node<FeatureMap> = parse_lines(vec!["ham", "spam", "extra"]).unwrap();
        assert_eq!(tree.label(), Some("ham"));
    }

    #[test]
    fn test_blank_line_is_an_empty_label() {
        let tree: Node<FeatureMap> = parse_lines(vec![""]).unwrap();
        assert_eq!(tree.label(), Some(""));
    }

    #[test]
    fn test_label_with_feature_prefix_is_not_written() {
        let tree = Node::branch(
            "length",
            2.5,
            Node::leaf("Feature: spam", FeatureMap::new()),
            Node::leaf("ham", FeatureMap::new()),
        );

        let err = to_lines(&tree).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidArgument(ref msg) if msg.contains("Feature: spam")));

        let mut buffer = Vec::new();
        assert!(write_tree(&tree, &mut buffer).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multi_line_label_is_not_written() {
        let tree: Node<FeatureMap> = Node::leaf("spam\nham", FeatureMap::new());
        assert!(matches!(
            to_lines(&tree),
            Err(ClassifierError::InvalidArgument(_))
        ));

        let tree: Node<FeatureMap> = Node::leaf("spam\r", FeatureMap::new());
        assert!(matches!(
            to_lines(&tree),
            Err(ClassifierError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_multi_line_feature_is_not_written() {
        let tree = Node::branch(
            "free\nmoney",
            0.5,
            Node::leaf("ham", FeatureMap::new()),
            Node::leaf("spam", FeatureMap::new()),
        );
        let err = to_lines(&tree).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidArgument(ref msg) if msg.contains("free")));
    }

    fn chain_document(branches: usize) -> String {
        let mut text = "Feature: x\nThreshold: 1.0\na\n".repeat(branches);
        text.push_str("b\n");
        text
    }

    #[test]
    fn test_deepest_allowed_document_loads() {
        let tree: Node<FeatureMap> = read_tree(chain_document(MAX_DEPTH).as_bytes()).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.depth, MAX_DEPTH);
        assert_eq!(stats.leaves, MAX_DEPTH + 1);
        assert_eq!(to_lines(&tree).unwrap().len(), 3 * MAX_DEPTH + 1);
    }

    #[test]
    fn test_overly_deep_document_is_invalid_state() {
        let err = read_tree::<FeatureMap, _>(chain_document(200_000).as_bytes()).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidState(_)));

        let err = read_tree::<FeatureMap, _>(chain_document(MAX_DEPTH + 1).as_bytes()).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidState(_)));
    }

    #[test]
    fn test_overly_deep_tree_is_not_written() {
        let mut tree: Node<FeatureMap> = Node::leaf("b", FeatureMap::new());
        for _ in 0..=MAX_DEPTH {
            tree = Node::branch("x", 1.0, Node::leaf("a", FeatureMap::new()), tree);
        }
        assert!(matches!(
            to_lines(&tree),
            Err(ClassifierError::InvalidArgument(_))
        ));
    }
}
