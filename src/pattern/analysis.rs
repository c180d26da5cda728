use hashbrown::HashSet as FastHashSet;

use super::element::{Element, ElementKind};
use super::{PatternError, PatternResult};

/// Identifiers bound anywhere in the tree, in encounter order.
pub fn identifiers(element: &Element) -> Vec<&str> {
    let mut out = Vec::new();
    collect_identifiers(element, &mut out);
    out
}

fn collect_identifiers<'e>(element: &'e Element, out: &mut Vec<&'e str>) {
    if let Some(identifier) = element.identifier()
        && !out.contains(&identifier)
    {
        out.push(identifier);
    }
    for child in element.children() {
        collect_identifiers(child, out);
    }
}

/// Rejects identifiers bound twice along one match path. Alternatives of a
/// variant may reuse a name since at most one of them contributes captures.
pub fn validate_identifiers(element: &Element, pattern: &str) -> PatternResult<()> {
    scope(element, pattern).map(|_| ())
}

fn scope<'e>(element: &'e Element, pattern: &str) -> PatternResult<FastHashSet<&'e str>> {
    let mut names = FastHashSet::new();
    if let Some(identifier) = element.identifier() {
        names.insert(identifier);
    }

    match element.kind() {
        ElementKind::Node(node) if node.is_variant() => {
            let mut merged = FastHashSet::new();
            for child in node.children() {
                merged.extend(scope(child, pattern)?);
            }
            append(&mut names, merged, pattern)?;
        }
        ElementKind::Node(node) => {
            for child in node.children() {
                append(&mut names, scope(child, pattern)?, pattern)?;
            }
        }
        _ => {}
    }

    Ok(names)
}

fn append<'e>(
    names: &mut FastHashSet<&'e str>,
    incoming: FastHashSet<&'e str>,
    pattern: &str,
) -> PatternResult<()> {
    for name in incoming {
        if !names.insert(name) {
            return Err(PatternError::DuplicateIdentifier {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Fewest tokens any successful match of `element` consumes.
pub fn min_length(element: &Element) -> usize {
    if element.is_optional() {
        return 0;
    }
    match element.kind() {
        ElementKind::Unit(unit) => unit.lexemes().len().max(1),
        ElementKind::Wildcard(_) => 1,
        ElementKind::Dynamic(_) => 0,
        ElementKind::Section(_) => 2,
        ElementKind::Node(node) if node.is_variant() => node
            .children()
            .iter()
            .map(min_length)
            .min()
            .unwrap_or(0),
        ElementKind::Node(node) => node.children().iter().map(min_length).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternCompiler;

    fn compile(pattern: &str) -> Element {
        PatternCompiler::default()
            .compile(pattern)
            .expect("pattern should compile")
    }

    #[test]
    fn identifiers_are_listed_once_in_order() {
        let element = compile("head:a (x:b|x:c) tail:*");
        assert_eq!(identifiers(&element), vec!["head", "x", "tail"]);
    }

    #[test]
    fn min_length_skips_optional_and_dynamic() {
        assert_eq!(min_length(&compile("a [b] {expr} ~( *")), 4);
        assert_eq!(min_length(&compile("(a b|c)")), 1);
    }

    #[test]
    fn duplicate_in_sequence_is_rejected() {
        let err = PatternCompiler::default()
            .compile("x:<a> x:<b>")
            .expect_err("duplicate identifier should be rejected");

        assert_eq!(
            err,
            PatternError::DuplicateIdentifier {
                pattern: "x:<a> x:<b>".to_string(),
                name: "x".to_string(),
            }
        );
    }
}
