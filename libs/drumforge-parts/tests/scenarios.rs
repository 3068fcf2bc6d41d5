//! Part library scenarios: concrete dimensions, the manifold property across
//! every part kind, and fork-join builds.

use drumforge_geometry::ops::extrude::{linear_extrude, LinearExtrudeParams};
use drumforge_geometry::primitives::{cuboid, cylinder};
use drumforge_geometry::profile::shapes::circle;
use drumforge_geometry::{intersect, union, GeometryConfig, KernelResult, Solid};
use drumforge_parts::parts::clip::{Clasp, ClipArm, ClipBolt, ClipLayout, ClipParams};
use drumforge_parts::parts::head::HeadParams;
use drumforge_parts::parts::kick_riser::{Honeycomb, KickRiserParams};
use drumforge_parts::parts::pill::PillParams;
use drumforge_parts::parts::rim_dampener::RimDampenerParams;
use drumforge_parts::parts::ring::RingParams;
use drumforge_parts::parts::subkick::{SubkickFlangeParams, SubkickShellParams};
use drumforge_parts::parts::tom_leg::TomLegParams;
use drumforge_parts::{
    Assembler, ExternalFeature, ExternalGeometry, HoneycombSpec, Layout, LayoutEntry, Orientation,
    PartError, PartKind, PartRequest, ThreadSpec,
};
use glam::{DVec2, DVec3};
use serde_json::json;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn coarse() -> GeometryConfig {
    GeometryConfig::default()
        .with_default_segments(8)
        .expect("valid segment count")
}

/// Provider standing in for the thread and honeycomb generators: threads
/// are plain rods, honeycombs a staggered grid of hexagonal prisms.
#[derive(Debug)]
struct BenchProvider;

impl ExternalGeometry for BenchProvider {
    fn supports(&self, _feature: ExternalFeature) -> bool {
        true
    }

    fn thread(&self, spec: &ThreadSpec) -> KernelResult<Solid> {
        cylinder(4.5, f64::from(spec.turns) * 1.5, 10, false)
    }

    fn honeycomb(&self, spec: &HoneycombSpec) -> KernelResult<Solid> {
        let config = GeometryConfig::default();
        let column_pitch = 1.5 * spec.radius + spec.gap;
        let row_pitch = 3f64.sqrt() * spec.radius + spec.gap;
        let mut cells = Vec::new();
        for column in 0..spec.columns {
            let stagger = if column % 2 == 1 { row_pitch / 2.0 } else { 0.0 };
            for row in 0..spec.rows {
                let center = DVec2::new(
                    f64::from(column) * column_pitch,
                    f64::from(row) * row_pitch + stagger,
                );
                let hexagon = circle(spec.radius, center, 6);
                cells.push(linear_extrude(&hexagon, &LinearExtrudeParams::new(spec.height), &config)?);
            }
        }
        union(cells, &config)
    }
}

// =============================================================================
// CONCRETE SCENARIOS
// =============================================================================

fn scenario_clip() -> ClipParams {
    ClipParams {
        width: 25.4,
        thickness: 6.35,
        offset: 6.35,
        clasp: Clasp {
            height: 25.4,
            depth: 12.7,
        },
        bolt: ClipBolt {
            width: 6.35,
            inset: 50.8,
            span: 25.4,
        },
        arm: ClipArm { depth: 19.05 },
        orientation: Orientation::Standard,
        segments: 30,
    }
}

#[test]
fn test_clip_clasp_height() {
    init_tracing();
    let params = scenario_clip();
    let config = GeometryConfig::default();
    let part = Assembler::new(config)
        .build(&PartKind::Clip(params))
        .expect("clip builds");
    let clip = part.solid().clone();
    assert!(clip.mesh().manifold_report(config.area_epsilon).is_manifold());

    // Cut the clasp out of the clip and measure it.
    let layout = ClipLayout::derive(&params);
    let reach = layout.radius + layout.delta + 1.0;
    let slab = cuboid(DVec3::new(2.0 * reach, 1000.0, params.width + 2.0), true)
        .expect("slab")
        .translated(DVec3::new(0.0, 0.0, params.width / 2.0));
    let clasp = intersect([clip, slab], &config).expect("clasp cut");
    let bbox = clasp.bounding_box().expect("clasp is not empty");
    assert!(
        (bbox.size().y - (params.clasp.height + params.thickness)).abs() < 1e-6,
        "clasp height {}",
        bbox.size().y
    );
    assert!((bbox.max.y - layout.clasp_top()).abs() < 1e-6);
}

#[test]
fn test_clip_bolt_holes() {
    let params = scenario_clip();
    let part = Assembler::default()
        .build(&PartKind::Clip(params))
        .expect("clip builds");
    let clip = part.solid();
    let layout = ClipLayout::derive(&params);
    let z = params.width / 2.0;

    assert!((layout.holes[0].x - -50.8).abs() < 1e-12);
    assert!((layout.holes[1].x - -76.2).abs() < 1e-12);
    for hole in layout.holes {
        assert!(!clip.contains_point(DVec3::new(hole.x + 0.2, hole.y, z + 0.3)));
        assert!(clip.contains_point(DVec3::new(hole.x + 4.0, hole.y, z + 0.3)));
    }
    // Solid foot between the holes.
    let between = (layout.holes[0] + layout.holes[1]) / 2.0;
    assert!(clip.contains_point(DVec3::new(between.x, between.y + 0.2, z + 0.3)));
}

#[test]
fn test_ring_dimensions() {
    let params = RingParams {
        inner_radius: 63.5,
        width: 12.7,
        thickness: 3.175,
        segments: 50,
    };
    let part = Assembler::default()
        .build(&PartKind::Ring(params))
        .expect("ring builds");
    let mesh = part.solid().mesh();
    for vertex in mesh.vertices() {
        let radius = vertex.truncate().length();
        assert!(
            (radius - 63.5).abs() < 1e-9 || (radius - 76.2).abs() < 1e-9,
            "vertex at radius {radius}"
        );
        assert!(vertex.z.abs() < 1e-9 || (vertex.z - 3.175).abs() < 1e-9);
    }
    let bbox = part.solid().bounding_box().expect("ring is not empty");
    assert!((bbox.max.x - 76.2).abs() < 1e-9);
    assert!((bbox.size().z - 3.175).abs() < 1e-9);
}

// =============================================================================
// MANIFOLD PROPERTY
// =============================================================================

fn library() -> Vec<PartRequest> {
    vec![
        PartRequest::new("clip", PartKind::Clip(ClipParams { segments: 16, ..ClipParams::default() })),
        PartRequest::new(
            "kick clip",
            PartKind::Clip(ClipParams {
                orientation: Orientation::KickMount,
                segments: 16,
                ..ClipParams::default()
            }),
        ),
        PartRequest::new("head", PartKind::Head(HeadParams { segments: 16, ..HeadParams::default() })),
        PartRequest::new("ring", PartKind::Ring(RingParams { segments: 16, ..RingParams::default() })),
        PartRequest::new(
            "rim dampener",
            PartKind::RimDampener(RimDampenerParams {
                segments: 12,
                channel_segments: 8,
                ..RimDampenerParams::default()
            }),
        ),
        PartRequest::new("tom leg", PartKind::TomLeg(TomLegParams { segments: 12, ..TomLegParams::default() })),
        PartRequest::new(
            "threaded tom leg",
            PartKind::TomLeg(TomLegParams {
                threaded: true,
                segments: 12,
                ..TomLegParams::default()
            }),
        ),
        PartRequest::new(
            "kick riser",
            PartKind::KickRiser(KickRiserParams { segments: 60, ..KickRiserParams::default() }),
        ),
        PartRequest::new(
            "honeycomb riser",
            PartKind::KickRiser(KickRiserParams {
                honeycomb: Some(Honeycomb::default()),
                segments: 60,
                ..KickRiserParams::default()
            }),
        ),
        PartRequest::new(
            "subkick shell",
            PartKind::SubkickShell(SubkickShellParams { segments: 20, ..SubkickShellParams::default() }),
        ),
        PartRequest::new(
            "subkick flange",
            PartKind::SubkickFlange(SubkickFlangeParams {
                segments: 24,
                ..SubkickFlangeParams::default()
            }),
        ),
        PartRequest::new("pill", PartKind::Pill(PillParams { segments: 16, ..PillParams::default() })),
    ]
}

#[test]
fn test_library_is_manifold() {
    init_tracing();
    let config = coarse();
    let assembler = Assembler::new(config).with_external(Arc::new(BenchProvider));
    let requests = library();
    for (request, result) in requests.iter().zip(assembler.build_all(&requests)) {
        let part = result.unwrap_or_else(|err| panic!("{} failed: {err}", request.name));
        assert_eq!(part.name(), request.name);
        let report = part.solid().mesh().manifold_report(config.area_epsilon);
        assert!(report.is_manifold(), "{}: {report:?}", request.name);
        assert!(part.solid().volume() > 0.0, "{}", request.name);
    }
}

#[test]
fn test_honeycomb_fills_chamber() {
    let assembler = Assembler::new(coarse()).with_external(Arc::new(BenchProvider));
    let hollow = KickRiserParams { segments: 60, ..KickRiserParams::default() };
    let filled = KickRiserParams {
        honeycomb: Some(Honeycomb::default()),
        ..hollow
    };
    let hollow = assembler.build(&PartKind::KickRiser(hollow)).expect("hollow riser");
    let filled = assembler.build(&PartKind::KickRiser(filled)).expect("filled riser");
    assert!(filled.solid().volume() > hollow.solid().volume() + 1000.0);

    let (a, b) = (
        hollow.solid().bounding_box().expect("hollow bounds"),
        filled.solid().bounding_box().expect("filled bounds"),
    );
    assert!((a.size() - b.size()).abs().max_element() < 1e-6);
}

// =============================================================================
// ENTRY VALIDATION
// =============================================================================

#[test]
fn test_unknown_kind_rejected() {
    let err = PartKind::from_record("cowbell_mount", json!({ "width": 1.0 })).unwrap_err();
    assert!(matches!(err, PartError::ParameterRange { parameter: "kind", .. }));
}

#[test]
fn test_missing_provider_rejected_before_building() {
    let kind = PartKind::from_record("tom_leg", json!({ "threaded": true })).expect("record parses");
    let err = Assembler::default().build(&kind).unwrap_err();
    assert!(matches!(
        err,
        PartError::ParameterRange { ref part, parameter: "threaded", .. } if part == "tom_leg"
    ));
}

// =============================================================================
// FORK-JOIN BUILDS
// =============================================================================

#[test]
fn test_build_all_reports_individually() {
    let requests = vec![
        PartRequest::new("ring", PartKind::Ring(RingParams { segments: 16, ..RingParams::default() })),
        PartRequest::new(
            "flat ring",
            PartKind::Ring(RingParams {
                thickness: 0.0,
                ..RingParams::default()
            }),
        ),
        PartRequest::new("pill", PartKind::Pill(PillParams::default())),
    ];
    let results = Assembler::new(coarse()).build_all(&requests);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().map(|p| p.name()), Ok("ring"));
    assert_eq!(
        results[1].as_ref().map_err(|e| e.part()).unwrap_err(),
        Some("flat ring")
    );
    assert_eq!(results[2].as_ref().map(|p| p.name()), Ok("pill"));
}

#[test]
fn test_hook_dampener_preview() {
    init_tracing();
    let config = GeometryConfig::default();
    let assembler = Assembler::new(config);
    let layout = Layout::hook_dampener_preview();
    let preview = assembler.build_layout(&layout).expect("preview builds");
    assert_eq!(preview.kind(), "layout");
    assert!(preview.solid().mesh().manifold_report(config.area_epsilon).is_manifold());

    let clip = assembler.build(&layout.entries[0].kind).expect("clip");
    let head = assembler.build(&layout.entries[1].kind).expect("head");
    let (clip_volume, head_volume) = (clip.solid().volume(), head.solid().volume());
    let volume = preview.solid().volume();
    assert!(volume <= (clip_volume + head_volume) * (1.0 + 1e-6));
    assert!(volume >= clip_volume.max(head_volume) * (1.0 - 1e-6));

    let bbox = preview.solid().bounding_box().expect("preview bounds");
    let head_bbox = head
        .solid()
        .translated(layout.entries[1].offset)
        .bounding_box()
        .expect("head bounds");
    assert!(bbox.contains(head_bbox.min) && bbox.contains(head_bbox.max));
}

#[test]
fn test_layout_failure_lists_sub_parts() {
    let layout = Layout {
        name: "broken".to_string(),
        entries: vec![
            LayoutEntry {
                name: "ring".to_string(),
                kind: PartKind::Ring(RingParams { segments: 16, ..RingParams::default() }),
                offset: DVec3::ZERO,
            },
            LayoutEntry {
                name: "short clip".to_string(),
                kind: PartKind::Clip(ClipParams {
                    clasp: Clasp { height: 5.0, depth: 12.7 },
                    ..ClipParams::default()
                }),
                offset: DVec3::new(200.0, 0.0, 0.0),
            },
        ],
    };
    let err = Assembler::new(coarse()).build_layout(&layout).unwrap_err();
    let PartError::Layout { failures } = &err else {
        panic!("expected a layout error, got {err}");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].part(), Some("short clip"));
    assert!(err.to_string().contains("short clip"));
}
