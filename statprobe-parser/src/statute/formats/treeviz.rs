//! Treeviz formatter for statute trees
//!
//! One line per node, three characters of nesting per level, labels truncated to 30
//! characters:
//!
//!   § Foo
//!   ├─ ≔ Grault
//!   │  ├─ • Corge
//!   │  └─ • Quux
//!   └─ ≔ Qux
//!
//! Icons
//!     Root: §
//!     Provision: ≔
//!     Leaf: •
//!     Placeholder: ∅

use super::snapshot::{snapshot_tree, NodeSnapshot};
use crate::statute::tree::StatuteTree;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Root" => "§",
        "Provision" => "≔",
        "Leaf" => "•",
        "Placeholder" => "∅",
        _ => "○",
    }
}

fn format_snapshot(snapshot: &NodeSnapshot, prefix: &str, is_last: bool) -> String {
    let connector = if is_last { "└─" } else { "├─" };
    let mut output = format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(&snapshot.node_type),
        truncate(&snapshot.label, 30)
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, &child_prefix, i + 1 == child_count));
    }
    output
}

pub fn to_treeviz(tree: &StatuteTree) -> String {
    let snapshot = snapshot_tree(tree);
    let mut output = format!(
        "{} {}\n",
        get_icon(&snapshot.node_type),
        truncate(&snapshot.label, 30)
    );
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, "", i + 1 == child_count));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statute::synthetic::{generate, NoncePool};
    use crate::statute::testing::{parse_fixture, UslmFixture};

    #[test]
    fn synthetic_tree() {
        let mut pool =
            NoncePool::from_words(["Foo", "Bar", "Baz", "Qux", "Quux", "Corge", "Grault"]).unwrap();
        let tree = generate(&mut pool, 2, 2).unwrap();
        insta::assert_snapshot!(to_treeviz(&tree), @r"
        § Foo
        ├─ ≔ Grault
        │  ├─ • Corge
        │  └─ • Quux
        └─ ≔ Qux
           ├─ • Baz
           └─ • Bar
        ");
    }

    #[test]
    fn placeholders_and_truncation() {
        let section = parse_fixture(UslmFixture::Repealed.source()).parsed().unwrap();
        let viz = to_treeviz(&section.tree);
        assert!(viz.starts_with("§ § 2. Definitions and special r...\n"));
        assert!(viz.contains("├─ ∅ (e) Dependents.\n"));
        assert!(viz.contains("└─ • (g) Other rules apply to nonre...\n"));
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("§§§", 2), "§§...");
        assert_eq!(truncate("short", 30), "short");
    }
}
