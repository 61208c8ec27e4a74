// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Rewrite Sites
// ─────────────────────────────────────────────────────────────────────
//! Rewrite-site detection on a [`SpiderGraph`], rule preconditions and
//! the metamirror reflection.
//!
//! Detection only proposes candidates. Nothing here mutates the input
//! graph or applies a rewrite.

use std::collections::{BTreeMap, BTreeSet};

use zx_types::{
    NodeId, NodeLabel, RewriteCandidate, RewriteSite, SpiderGraph, SpiderSignature, ZxError,
    ZxResult,
};

fn signature_at(
    label: &NodeLabel,
    adjacency: &BTreeMap<NodeId, Vec<NodeId>>,
    node: NodeId,
) -> SpiderSignature {
    SpiderSignature {
        kind: label.kind,
        phase_numerator: label.phase_numerator,
        phase_denominator: label.phase_denominator,
        degree: adjacency.get(&node).map_or(0, |n| n.len() as u32),
    }
}

/// One fusion candidate per distinct edge joining two labelled spiders
/// of the same kind, in edge order. Parallel edges collapse into the
/// first occurrence; self-loops are not fusion sites.
pub fn detect_fusion_sites(graph: &SpiderGraph) -> Vec<RewriteCandidate> {
    let adjacency = graph.adjacency();
    let mut visited = BTreeSet::new();
    let mut sites = Vec::new();

    for &(u, v) in &graph.edges {
        if u == v || !visited.insert((u.min(v), u.max(v))) {
            continue;
        }
        let (Some(label_u), Some(label_v)) = (graph.labels.get(&u), graph.labels.get(&v)) else {
            continue;
        };
        if label_u.kind != label_v.kind {
            continue;
        }
        let site = RewriteSite {
            nodes: vec![u, v],
            edges: vec![(u, v)],
        };
        sites.push(
            RewriteCandidate::fusion(
                signature_at(label_u, &adjacency, u),
                signature_at(label_v, &adjacency, v),
            )
            .at_site(site),
        );
    }
    sites
}

/// One colour-flip candidate per labelled spider of degree ≥ 2 with at
/// least one neighbour of the other kind, in node order.
pub fn detect_color_flip_sites(graph: &SpiderGraph) -> Vec<RewriteCandidate> {
    let adjacency = graph.adjacency();
    let mut sites = Vec::new();

    for &node in &graph.nodes {
        let Some(label) = graph.labels.get(&node) else {
            continue;
        };
        let neighbours = adjacency.get(&node).map(Vec::as_slice).unwrap_or_default();
        if neighbours.len() < 2 {
            continue;
        }
        // An unlabelled neighbour counts as mixed.
        let mixed = neighbours
            .iter()
            .any(|n| graph.labels.get(n).map_or(true, |l| l.kind != label.kind));
        if !mixed {
            continue;
        }
        let site = RewriteSite {
            nodes: vec![node],
            edges: Vec::new(),
        };
        sites.push(
            RewriteCandidate::color_flip(signature_at(label, &adjacency, node)).at_site(site),
        );
    }
    sites
}

/// Fusion sites followed by colour-flip sites.
pub fn detect_candidates(graph: &SpiderGraph) -> Vec<RewriteCandidate> {
    let mut candidates = detect_fusion_sites(graph);
    candidates.extend(detect_color_flip_sites(graph));
    log::debug!(
        "detected {} rewrite sites on {} spiders",
        candidates.len(),
        graph.nodes.len()
    );
    candidates
}

/// Fusion needs exactly two spiders and at least one connecting edge.
pub fn check_fusion_preconditions(site: &RewriteSite) -> ZxResult<()> {
    if site.nodes.len() != 2 {
        return Err(ZxError::Validation(format!(
            "fusion site must contain exactly two nodes, got {}",
            site.nodes.len()
        )));
    }
    if site.edges.is_empty() {
        return Err(ZxError::Validation(
            "fusion site must contain at least one connecting edge".into(),
        ));
    }
    Ok(())
}

pub fn check_color_flip_preconditions(site: &RewriteSite) -> ZxResult<()> {
    if site.nodes.is_empty() {
        return Err(ZxError::Validation("color flip site cannot be empty".into()));
    }
    Ok(())
}

/// Bireflection of `graph`: every spider changes colour, phases and
/// topology are kept, provenance is wrapped as `β(id)`.
pub fn metamirror(graph: &SpiderGraph) -> SpiderGraph {
    let labels = graph
        .labels
        .iter()
        .map(|(&id, label)| {
            (
                id,
                NodeLabel {
                    kind: label.kind.flipped(),
                    phase_numerator: label.phase_numerator,
                    phase_denominator: label.phase_denominator,
                    monadic_id: format!("β({})", label.monadic_id),
                },
            )
        })
        .collect();
    SpiderGraph {
        nodes: graph.nodes.clone(),
        edges: graph.edges.clone(),
        labels,
    }
}
