// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Candidate Record Decoding
// ─────────────────────────────────────────────────────────────────────
//! Decodes loosely-typed JSON candidate records into typed candidates.
//!
//! Record shapes:
//!
//! ```json
//! {"type": "fusion", "spider1": {..}, "spider2": {..}, "delta_c": 0.4}
//! {"type": "color_flip", "signature": {"kind": "Z", "phase_numer": 1, "phase_denom": 4, "degree": 3}}
//! {"type": "grace_emergence", "kind": "X", "phase_numer": 1, "phase_denom": 8,
//!  "source_phase_numer": 0, "source_phase_denom": 1, "new_nodes": 6, "old_nodes": 5}
//! ```
//!
//! Spider records accept `"type"` as an alias of `"kind"`. `phase_denom`
//! defaults to 1; every other field is required. Records may carry a
//! `"nodes"` / `"edges"` site. A finite `delta_c` keeps a record
//! schedulable even when its body is incomplete.

use serde_json::{Map, Value};

use zx_types::constants::DEFAULT_PHASE_DENOMINATOR;
use zx_types::{
    GraceParams, NodeId, Rewrite, RewriteCandidate, RewriteSite, SpiderKind, SpiderSignature,
    ZxError, ZxResult,
};

/// Label given to records without a `"type"` field.
pub const UNTYPED_LABEL: &str = "untyped";

/// Decode a batch. A non-array input is fatal; element failures are not.
pub fn decode_batch(value: &Value) -> ZxResult<Vec<ZxResult<RewriteCandidate>>> {
    let items = value.as_array().ok_or_else(|| {
        ZxError::Batch(format!(
            "candidate batch must be a sequence, got {}",
            json_type(value)
        ))
    })?;
    Ok(items.iter().map(decode_candidate).collect())
}

/// Decode a single candidate record.
pub fn decode_candidate(value: &Value) -> ZxResult<RewriteCandidate> {
    let obj = value.as_object().ok_or_else(|| {
        ZxError::Validation(format!(
            "candidate must be a record, got {}",
            json_type(value)
        ))
    })?;

    let precomputed = obj.get("delta_c").and_then(Value::as_f64);
    let label = obj
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or(UNTYPED_LABEL);

    let body = match label {
        "fusion" => decode_spider(obj, "spider1").and_then(|left| {
            decode_spider(obj, "spider2").map(|right| Rewrite::Fusion { left, right })
        }),
        "color_flip" => decode_spider(obj, "signature").map(|spider| Rewrite::ColorFlip { spider }),
        "grace_emergence" => decode_grace(obj).map(Rewrite::GraceEmergence),
        other => Ok(Rewrite::Other {
            label: other.to_string(),
        }),
    };

    let rewrite = match (body, precomputed.filter(|d| d.is_finite())) {
        (Ok(rewrite), _) => rewrite,
        (Err(e), Some(_)) => {
            log::debug!("{label} record kept via precomputed delta_c despite: {e}");
            Rewrite::Other {
                label: label.to_string(),
            }
        }
        (Err(e), None) => return Err(e),
    };

    Ok(RewriteCandidate {
        rewrite,
        precomputed_delta: precomputed,
        site: decode_site(obj)?,
    })
}

fn decode_spider(obj: &Map<String, Value>, field: &str) -> ZxResult<SpiderSignature> {
    let sig = obj
        .get(field)
        .ok_or_else(|| ZxError::Validation(format!("{field} signature is required")))?
        .as_object()
        .ok_or_else(|| ZxError::Validation(format!("{field} signature must be a record")))?;

    let kind = decode_kind(sig, &["kind", "type"], field)?;
    let phase_numerator = required_i64(sig, "phase_numer", field)?;
    let phase_denominator = optional_u32(sig, "phase_denom", field)?
        .unwrap_or(DEFAULT_PHASE_DENOMINATOR);
    let degree = required_u32(sig, "degree", field)?;

    SpiderSignature::new(kind, phase_numerator, phase_denominator, degree)
}

fn decode_grace(obj: &Map<String, Value>) -> ZxResult<GraceParams> {
    const CTX: &str = "grace_emergence";
    Ok(GraceParams {
        kind: decode_kind(obj, &["kind"], CTX)?,
        phase_numerator: required_i64(obj, "phase_numer", CTX)?,
        phase_denominator: optional_u32(obj, "phase_denom", CTX)?
            .unwrap_or(DEFAULT_PHASE_DENOMINATOR),
        source_phase_numerator: required_i64(obj, "source_phase_numer", CTX)?,
        source_phase_denominator: optional_u32(obj, "source_phase_denom", CTX)?
            .unwrap_or(DEFAULT_PHASE_DENOMINATOR),
        new_node_count: required_u64(obj, "new_nodes", CTX)?,
        old_node_count: required_u64(obj, "old_nodes", CTX)?,
    })
}

fn decode_kind(obj: &Map<String, Value>, keys: &[&str], ctx: &str) -> ZxResult<SpiderKind> {
    let raw = keys
        .iter()
        .find_map(|k| obj.get(*k))
        .ok_or_else(|| ZxError::Validation(format!("{ctx}: kind is required")))?;
    let label = raw
        .as_str()
        .ok_or_else(|| ZxError::Validation(format!("{ctx}: kind must be a string")))?;
    label
        .parse::<SpiderKind>()
        .map_err(|e| ZxError::Validation(format!("{ctx}: {e}")))
}

fn decode_site(obj: &Map<String, Value>) -> ZxResult<Option<RewriteSite>> {
    let Some(nodes) = obj.get("nodes") else {
        return Ok(None);
    };
    let nodes = nodes
        .as_array()
        .ok_or_else(|| ZxError::Validation("site nodes must be a sequence".into()))?
        .iter()
        .map(node_id)
        .collect::<ZxResult<Vec<NodeId>>>()?;

    let edges = match obj.get("edges") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => raw
            .as_array()
            .ok_or_else(|| ZxError::Validation("site edges must be a sequence".into()))?
            .iter()
            .map(|edge| match edge.as_array().map(Vec::as_slice) {
                Some([u, v]) => Ok((node_id(u)?, node_id(v)?)),
                _ => Err(ZxError::Validation(
                    "site edge must be a [u, v] pair".into(),
                )),
            })
            .collect::<ZxResult<Vec<_>>>()?,
    };

    Ok(Some(RewriteSite { nodes, edges }))
}

fn node_id(value: &Value) -> ZxResult<NodeId> {
    value.as_u64().ok_or_else(|| {
        ZxError::Validation(format!(
            "node id must be an unsigned integer, got {value}"
        ))
    })
}

fn required_i64(obj: &Map<String, Value>, key: &str, ctx: &str) -> ZxResult<i64> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ZxError::Validation(format!("{ctx}: {key} is required"))),
        Some(v) => v.as_i64().ok_or_else(|| {
            ZxError::Validation(format!("{ctx}: {key} must be an integer, got {v}"))
        }),
    }
}

fn required_u64(obj: &Map<String, Value>, key: &str, ctx: &str) -> ZxResult<u64> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ZxError::Validation(format!("{ctx}: {key} is required"))),
        Some(v) => v.as_u64().ok_or_else(|| {
            ZxError::Validation(format!("{ctx}: {key} must be a non-negative integer, got {v}"))
        }),
    }
}

fn required_u32(obj: &Map<String, Value>, key: &str, ctx: &str) -> ZxResult<u32> {
    let v = required_u64(obj, key, ctx)?;
    u32::try_from(v).map_err(|_| ZxError::Validation(format!("{ctx}: {key} out of range: {v}")))
}

fn optional_u32(obj: &Map<String, Value>, key: &str, ctx: &str) -> ZxResult<Option<u32>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required_u32(obj, key, ctx).map(Some),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_fusion() {
        let c = decode_candidate(&json!({
            "type": "fusion",
            "spider1": {"kind": "Z", "phase_numer": 0, "phase_denom": 1, "degree": 2},
            "spider2": {"type": "Z", "phase_numer": 1, "degree": 1},
        }))
        .unwrap();
        match c.rewrite {
            Rewrite::Fusion { left, right } => {
                assert_eq!(left.degree, 2);
                assert_eq!(right.phase_denominator, DEFAULT_PHASE_DENOMINATOR);
            }
            other => panic!("expected fusion, got {other:?}"),
        }
        assert_eq!(c.precomputed_delta, None);
    }

    #[test]
    fn test_decode_color_flip_bad_kind() {
        let err = decode_candidate(&json!({
            "type": "color_flip",
            "signature": {"kind": "H", "phase_numer": 0, "degree": 2},
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Z or X"));
    }

    #[test]
    fn test_decode_zero_denominator() {
        let err = decode_candidate(&json!({
            "type": "color_flip",
            "signature": {"kind": "X", "phase_numer": 1, "phase_denom": 0, "degree": 2},
        }))
        .unwrap_err();
        assert!(matches!(err, ZxError::Validation(_)));
    }

    #[test]
    fn test_decode_missing_degree() {
        let err = decode_candidate(&json!({
            "type": "color_flip",
            "signature": {"kind": "X", "phase_numer": 1},
        }))
        .unwrap_err();
        assert!(err.to_string().contains("degree is required"));
    }

    #[test]
    fn test_decode_negative_degree() {
        let err = decode_candidate(&json!({
            "type": "color_flip",
            "signature": {"kind": "X", "phase_numer": 1, "degree": -2},
        }))
        .unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_decode_not_a_record() {
        let err = decode_candidate(&json!(42)).unwrap_err();
        assert!(err.to_string().contains("must be a record"));
    }

    #[test]
    fn test_incomplete_body_kept_with_precomputed() {
        let c = decode_candidate(&json!({"type": "fusion", "delta_c": 0.1})).unwrap();
        assert_eq!(
            c.rewrite,
            Rewrite::Other {
                label: "fusion".into()
            }
        );
        assert_eq!(c.finite_precomputed(), Some(0.1));
    }

    #[test]
    fn test_incomplete_body_without_precomputed_fails() {
        assert!(decode_candidate(&json!({"type": "fusion", "delta_c": null})).is_err());
    }

    #[test]
    fn test_unknown_type_is_other() {
        let c = decode_candidate(&json!({"type": "invalid", "delta_c": null})).unwrap();
        assert_eq!(c.rewrite.label(), "invalid");
        assert_eq!(c.precomputed_delta, None);
    }

    #[test]
    fn test_untyped_record() {
        let c = decode_candidate(&json!({"delta_c": 0.5})).unwrap();
        assert_eq!(c.rewrite.label(), UNTYPED_LABEL);
    }

    #[test]
    fn test_decode_grace() {
        let c = decode_candidate(&json!({
            "type": "grace_emergence",
            "kind": "X",
            "phase_numer": 1,
            "phase_denom": 0,
            "source_phase_numer": 0,
            "new_nodes": 6,
            "old_nodes": 5,
        }))
        .unwrap();
        match c.rewrite {
            Rewrite::GraceEmergence(p) => {
                assert_eq!(p.kind, SpiderKind::X);
                assert_eq!(p.phase_denominator, 0);
                assert_eq!(p.source_phase_denominator, 1);
                assert_eq!(p.new_node_count, 6);
            }
            other => panic!("expected grace, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_site() {
        let c = decode_candidate(&json!({
            "type": "other",
            "delta_c": 0.2,
            "nodes": [3, 4],
            "edges": [[3, 4]],
        }))
        .unwrap();
        let site = c.site.unwrap();
        assert_eq!(site.nodes, vec![3, 4]);
        assert_eq!(site.edges, vec![(3, 4)]);
    }

    #[test]
    fn test_decode_bad_site_edge() {
        let err = decode_candidate(&json!({
            "type": "other",
            "nodes": [3, 4],
            "edges": [[3]],
        }))
        .unwrap_err();
        assert!(err.to_string().contains("[u, v]"));
    }

    #[test]
    fn test_decode_batch_not_sequence() {
        let err = decode_batch(&json!({"type": "fusion"})).unwrap_err();
        assert!(matches!(err, ZxError::Batch(_)));
    }

    #[test]
    fn test_decode_batch_mixed() {
        let decoded = decode_batch(&json!([
            {"type": "fusion", "delta_c": 0.1},
            "garbage",
        ]))
        .unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(decoded[0].is_ok());
        assert!(decoded[1].is_err());
    }
}
