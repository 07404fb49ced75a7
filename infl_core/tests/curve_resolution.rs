mod common;

use common::{bridge_dataset, write_artifact};
use infl_core::{CurveFamily, CurveResolver, InflError, ResultStore, StoreConfig};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn every_valid_index_resolves_to_matching_lengths() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let resolver = CurveResolver::new(&store);

    for family in CurveFamily::ALL {
        let spans = resolver.bounds(family, 0).unwrap().spans;
        assert!(spans > 0, "{family} has no curves");
        for span in 0..spans {
            let sections = resolver.bounds(family, span).unwrap().sections.max(1);
            for section in 0..sections {
                let curve = resolver.resolve(family, span, section).unwrap();
                assert_eq!(curve.x.len(), curve.y.len(), "{family} [{span}][{section}]");
                assert!(!curve.is_empty());
            }
        }
    }
}

#[test]
fn out_of_range_requests_clamp_to_last_valid_index() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let resolver = CurveResolver::new(&store);

    let curve = resolver.resolve(CurveFamily::SpanMoments, 40, 0).unwrap();
    assert_eq!((curve.span, curve.section), (2, 0));

    let curve = resolver.resolve(CurveFamily::SpanDeflections, 1, 40).unwrap();
    assert_eq!((curve.span, curve.section), (1, 1));

    let curve = resolver.resolve(CurveFamily::SpanShearForces, 9, 9).unwrap();
    assert_eq!((curve.span, curve.section), (2, 1));
    assert_eq!(*curve.x, vec![22.0, 24.0, 26.0, 28.0]);

    let curve = resolver.resolve(CurveFamily::SupportMoments, 12, 3).unwrap();
    assert_eq!((curve.span, curve.section), (3, 0));
    assert_eq!(curve.label, "M_3");
}

#[test]
fn clamping_follows_a_shrinking_dataset() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let resolver = CurveResolver::new(&store);
    assert_eq!(resolver.clamp(CurveFamily::SpanRotations, 2, 1).unwrap(), (2, 1));

    // New engine run with a single span of one section
    write_artifact(
        dir.path(),
        "influence_lines",
        "span_rotations",
        &json!([[[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]]]),
    );
    store.reload();

    assert_eq!(resolver.clamp(CurveFamily::SpanRotations, 2, 1).unwrap(), (0, 0));
}

#[test]
fn support_moments_use_shared_abscissas() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let curve = CurveResolver::new(&store)
        .resolve(CurveFamily::SupportMoments, 1, 0)
        .unwrap();
    assert_eq!(*curve.x, vec![0.0, 5.0, 10.0, 16.0, 22.0, 26.0, 30.0]);
    assert_eq!(curve.y[1], -1.2);
}

#[test]
fn shear_forces_follow_their_own_abscissas() {
    let dir = TempDir::new().unwrap();
    write_artifact(dir.path(), "influence_lines", "span_shear_forces", &json!([[[1, 2], [3, 4, 5]]]));
    write_artifact(
        dir.path(),
        "influence_lines",
        "shear_abscissas",
        &json!([[[0.0, 1.0], [0.0, 0.5, 1.0]]]),
    );

    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let curve = CurveResolver::new(&store)
        .resolve(CurveFamily::SpanShearForces, 0, 1)
        .unwrap();
    assert_eq!(curve.x.len(), 3);
    assert_eq!(curve.y, vec![3.0, 4.0, 5.0]);
}

#[test]
fn mismatched_shear_abscissas_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_artifact(dir.path(), "influence_lines", "span_shear_forces", &json!([[[1, 2], [3, 4, 5]]]));
    write_artifact(
        dir.path(),
        "influence_lines",
        "shear_abscissas",
        &json!([[[0.0, 1.0], [0.0, 1.0]]]),
    );

    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let err = CurveResolver::new(&store)
        .resolve(CurveFamily::SpanShearForces, 0, 1)
        .unwrap_err();
    assert_eq!(err, InflError::shape_mismatch("span_shear_forces", 0, 1, 2, 3));
}

#[test]
fn stale_total_abscissas_are_rejected() {
    let dir = bridge_dataset();
    write_artifact(dir.path(), "influence_lines", "total_abscissas", &json!([0.0, 15.0, 30.0]));

    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let err = CurveResolver::new(&store)
        .resolve(CurveFamily::SpanMoments, 0, 0)
        .unwrap_err();
    match err {
        InflError::ShapeMismatch { family, x_len, y_len, .. } => {
            assert_eq!(family, "span_moments");
            assert_eq!((x_len, y_len), (3, 7));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn reaction_without_shear_axis_is_malformed() {
    let dir = bridge_dataset();
    write_artifact(
        dir.path(),
        "influence_lines",
        "support_reactions",
        &json!([[1.0, 0.5, 0.0], [0.0, 1.0, 0.0], [0.0, 0.5, 1.0], [0.0, 0.0, 1.0]]),
    );

    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let err = CurveResolver::new(&store)
        .resolve(CurveFamily::SupportReactions, 3, 0)
        .unwrap_err();
    assert_eq!(err.error_code(), "MALFORMED_PAYLOAD");
}

#[test]
fn section_sets_cover_every_span() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let resolver = CurveResolver::new(&store);

    let curves = resolver.section_curves(CurveFamily::SpanShearForces, 1).unwrap();
    let spans: Vec<usize> = curves.iter().map(|c| c.span).collect();
    assert_eq!(spans, vec![0, 1, 2]);
    assert!(curves.iter().all(|c| c.x.len() == 4));

    assert_eq!(resolver.all_curves(CurveFamily::SpanMoments).unwrap().len(), 6);
    assert_eq!(resolver.all_curves(CurveFamily::SupportReactions).unwrap().len(), 3);
}

#[test]
fn animation_frames_are_shifted_per_frame() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let frames = CurveResolver::new(&store)
        .animation_frames(CurveFamily::SpanShearForces)
        .unwrap();

    assert_eq!(frames.len(), 6);
    for frame in &frames {
        assert_eq!(frame.x_extent().map(|(min, _)| min), Some(0.0));
    }
    assert_eq!(*frames[3].x, vec![0.0, 3.0, 6.0, 9.0]);
}
