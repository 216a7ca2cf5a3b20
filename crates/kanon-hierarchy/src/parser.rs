//! Hierarchy definition parser using nom.
//!
//! A definition lists one value per line. The number of leading tab
//! characters is the value's level; a line at level `d` becomes a child of
//! the most recent line at level `d - 1`.
//!
//! ```text
//! Any
//! 	Europe
//! 		France
//! 		Spain
//! 	Asia
//! 		Japan
//! ```

use nom::{
    character::complete::char,
    combinator::{all_consuming, map, rest, verify},
    multi::many0_count,
    sequence::pair,
    IResult,
};

use crate::error::{HierarchyError, HierarchyResult};
use crate::tree::{HierarchyTree, NodeId};

/// Parses a tab-indented hierarchy definition for `attribute`.
///
/// Blank lines are ignored. The returned tree has its descendant-leaf
/// counts computed.
///
/// # Examples
///
/// ```rust
/// use kanon_hierarchy::parse_hierarchy;
///
/// let tree = parse_hierarchy("country", "Any\n\tEurope\n\t\tFrance\n\tAsia\n").unwrap();
/// assert_eq!(tree.len(), 4);
/// assert_eq!(tree.root().descendant_leaf_count(), 2);
/// ```
pub fn parse_hierarchy(attribute: &str, definition: &str) -> HierarchyResult<HierarchyTree> {
    let mut tree: Option<HierarchyTree> = None;
    let mut last_by_level: Vec<NodeId> = Vec::new();

    for (idx, raw_line) in definition.lines().enumerate() {
        let line = idx + 1;
        if raw_line.trim().is_empty() {
            continue;
        }

        let (level, value) = match definition_line(raw_line) {
            Ok((_, parsed)) => parsed,
            Err(_) => {
                return Err(HierarchyError::ParseError {
                    line,
                    message: format!("expected tab indentation followed by a value, got '{}'", raw_line),
                })
            }
        };

        if level == 0 {
            if tree.is_some() {
                return Err(HierarchyError::MultipleRoots { line });
            }
            let new_tree = HierarchyTree::new(attribute, value);
            last_by_level.clear();
            last_by_level.push(new_tree.root_id());
            tree = Some(new_tree);
            continue;
        }

        let Some(tree) = tree.as_mut() else {
            return Err(HierarchyError::OrphanNode { line, level });
        };
        if level > last_by_level.len() {
            return Err(HierarchyError::OrphanNode { line, level });
        }

        let parent = last_by_level[level - 1];
        let id = tree.add_child(parent, value)?;
        last_by_level.truncate(level);
        last_by_level.push(id);
    }

    let mut tree = tree.ok_or(HierarchyError::EmptyDefinition)?;
    tree.compute_descendant_leaf_counts();
    Ok(tree)
}

/// One definition line: `(level, value)`.
fn definition_line(input: &str) -> IResult<&str, (usize, &str)> {
    all_consuming(pair(many0_count(char('\t')), value_text))(input)
}

fn value_text(input: &str) -> IResult<&str, &str> {
    map(
        verify(rest, |s: &str| {
            let trimmed = s.trim_end();
            !trimmed.is_empty() && !trimmed.starts_with(char::is_whitespace) && !trimmed.contains('\t')
        }),
        str::trim_end,
    )(input)
}
