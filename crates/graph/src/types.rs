use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of structural relationship between two files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    /// A imports B (import statement resolved inside the tree)
    #[serde(rename = "IMPORTS")]
    Imports,

    /// A class in A inherits from a class defined in B
    #[serde(rename = "INHERITS")]
    Inherits,

    /// A calls the constructor of a class defined in B
    #[serde(rename = "INSTANTIATES")]
    Instantiates,
}

impl Relation {
    /// Wire/display name, also the ordering key for neighbor queries
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imports => "IMPORTS",
            Self::Inherits => "INHERITS",
            Self::Instantiates => "INSTANTIATES",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed edge between two files.
///
/// The graph is a set: equal triples are deduplicated, and self-edges
/// (source == target) are invalid and dropped at load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: Relation,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation,
        }
    }

    /// Self-edges carry no structural information
    #[must_use]
    pub fn is_self_edge(&self) -> bool {
        self.source == self.target
    }
}

/// Direction filter for neighbor queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    #[default]
    Both,
}

/// Direction tag on a returned neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    /// The queried file is the edge's target
    In,
    /// The queried file is the edge's source
    Out,
}

impl EdgeDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    #[must_use]
    pub const fn matches(self, filter: Direction) -> bool {
        matches!(
            (self, filter),
            (_, Direction::Both) | (Self::In, Direction::In) | (Self::Out, Direction::Out)
        )
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a neighbor query result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub path: String,
    pub relation: Relation,
    pub direction: EdgeDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_names_sort_lexically_in_declaration_order() {
        let mut names = vec!["INSTANTIATES", "IMPORTS", "INHERITS"];
        names.sort_unstable();
        assert_eq!(names, vec!["IMPORTS", "INHERITS", "INSTANTIATES"]);
    }

    #[test]
    fn relation_serializes_to_upper_case() {
        let json = serde_json::to_string(&Relation::Imports).unwrap();
        assert_eq!(json, "\"IMPORTS\"");
    }

    #[test]
    fn self_edge_detection() {
        assert!(Edge::new("a.py", "a.py", Relation::Imports).is_self_edge());
        assert!(!Edge::new("a.py", "b.py", Relation::Imports).is_self_edge());
    }

    #[test]
    fn direction_filter_matching() {
        assert!(EdgeDirection::In.matches(Direction::Both));
        assert!(EdgeDirection::In.matches(Direction::In));
        assert!(!EdgeDirection::In.matches(Direction::Out));
        assert!(EdgeDirection::Out.matches(Direction::Out));
    }
}
