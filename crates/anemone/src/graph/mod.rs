use crate::error::{Error, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Node/link input for the force simulation. Positions are optional; the
/// simulation seeds any missing ones deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Graph {
    /// Rejects duplicate node ids and links with a missing endpoint. Both are
    /// creation-time failures: ids are the identity key for drag targeting,
    /// and a silently dropped link would change the settled shape.
    pub fn validate(&self) -> Result<()> {
        let mut seen: IndexSet<&str> = IndexSet::with_capacity(self.nodes.len());
        for n in &self.nodes {
            if !seen.insert(n.id.as_str()) {
                return Err(Error::DuplicateNodeId { id: n.id.clone() });
            }
        }
        for l in &self.links {
            if !seen.contains(l.source.as_str()) || !seen.contains(l.target.as_str()) {
                return Err(Error::UnknownLinkEndpoint {
                    source_id: l.source.clone(),
                    target_id: l.target.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Category tag carried through for styling; the layout ignores it.
    #[serde(default)]
    pub group: Option<u32>,
    /// Optional caller-supplied start position (center).
    #[serde(default)]
    pub position: Option<Point>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    /// Positive spring-stiffness scale (also the rendered line weight).
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Canvas extent. The simulation centers the layout on `width/2, height/2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}
