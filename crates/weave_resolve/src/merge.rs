//! Tree Merger: per-endpoint chains into one tree keyed by object identity.
//!
//! Hops at the same object collapse into one node unless they supply two
//! different local names; those stay separate subtrees. A hop without a
//! local name matches any name. Children are ordered by `(object, local
//! name)`, so the merged tree does not depend on the order the endpoints
//! were given in.

use std::collections::BTreeMap;

use weave_common::Ident;
use weave_db::{Database, ObjectId};

use crate::walker::ConnNode;

/// A node of the merged tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnTree {
    /// The merged hop.
    pub node: ConnNode,
    /// Sub-hierarchies below this hop.
    pub children: Vec<ConnTree>,
}

impl ConnTree {
    /// Number of nodes in this tree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ConnTree::size).sum::<usize>()
    }
}

/// The merge was impossible: two chains start at different roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoCommonStart {
    /// Root of the first chain.
    pub first: ObjectId,
    /// A root that differs from it.
    pub other: ObjectId,
}

/// Merges root-first chains into one tree.
///
/// Hops without a local name get `default_name`. Returns `Ok(None)` when no
/// chain is given.
pub fn merge(
    db: &Database,
    chains: &[Vec<ConnNode>],
    default_name: Ident,
) -> Result<Option<ConnTree>, NoCommonStart> {
    let chains: Vec<&[ConnNode]> = chains
        .iter()
        .map(Vec::as_slice)
        .filter(|c| !c.is_empty())
        .collect();
    if chains.is_empty() {
        return Ok(None);
    }
    merge_level(db, &chains, default_name).map(Some)
}

fn merge_level(
    db: &Database,
    chains: &[&[ConnNode]],
    default_name: Ident,
) -> Result<ConnTree, NoCommonStart> {
    let mut node = chains[0][0].clone();
    for chain in &chains[1..] {
        let head = &chain[0];
        if head.object != node.object {
            return Err(NoCommonStart {
                first: node.object,
                other: head.object,
            });
        }
        let (dir, conflict) = node.dir.merge(head.dir);
        node.dir = dir;
        node.dir_conflict |= conflict || head.dir_conflict;
        node.local_name = match (node.local_name, head.local_name) {
            (Some(a), Some(b)) if db.resolve(b) < db.resolve(a) => Some(b),
            (None, b) => b,
            (a, _) => a,
        };
        node.invert |= head.invert;
        node.explicit |= head.explicit;
        node.force_name |= head.force_name;
    }
    if node.local_name.is_none() {
        node.local_name = Some(default_name);
    }

    let mut by_object: BTreeMap<ObjectId, Vec<&[ConnNode]>> = BTreeMap::new();
    for chain in chains {
        let tail = &chain[1..];
        if let Some(next) = tail.first() {
            by_object.entry(next.object).or_default().push(tail);
        }
    }

    let mut children = Vec::new();
    for tails in by_object.values() {
        for part in partition_by_name(db, tails).values() {
            children.push(merge_level(db, part, default_name)?);
        }
    }
    Ok(ConnTree { node, children })
}

/// Splits the tails meeting at one object by their local name.
///
/// Only two supplied names that differ split; an unnamed tail joins the
/// named partition, the lexicographically smallest one if there are several.
fn partition_by_name<'c>(
    db: &'c Database,
    tails: &[&'c [ConnNode]],
) -> BTreeMap<Option<&'c str>, Vec<&'c [ConnNode]>> {
    let name_of = move |tail: &[ConnNode]| tail[0].local_name.map(|n| db.resolve(n));
    let fallback = tails.iter().filter_map(|&t| name_of(t)).min();

    let mut partitions: BTreeMap<Option<&str>, Vec<&[ConnNode]>> = BTreeMap::new();
    for &tail in tails {
        let name = name_of(tail).or(fallback);
        partitions.entry(name).or_default().push(tail);
    }
    partitions
}
