//! Deriving micro state from the scene structure.

use glam::Vec3;

use super::{LocalBounds, MicroState};
use crate::scene::{Category, StructuralIndex};
use crate::selection::Selection;

/// Box edge around a focused point.
const POINT_EXTENT: f32 = 0.5;
/// Box edge along an axis where a line has no extent.
const LINE_MIN_EXTENT: f32 = 0.1;
/// Box edge around a focused aux marker.
const AUX_EXTENT: f32 = 2.0;
/// Fallback box edge as a fraction of the scene radius.
const FALLBACK_RADIUS_FRACTION: f32 = 0.05;
/// Smallest fallback box edge.
const FALLBACK_MIN_EXTENT: f32 = 0.25;

/// Derives a fresh micro state for a selection.
///
/// Called by the recompute pass when micro mode is in effect and the
/// current micro focus does not match the selection. The result is
/// normalized afterwards, so implementations need not filter hidden ids or
/// cap the related list.
pub trait MicroCompute {
    /// Micro state focused on `selection`, or `None` when nothing can be
    /// derived for it.
    fn compute(
        &self,
        selection: &Selection,
        index: &StructuralIndex,
    ) -> Option<MicroState>;
}

/// Built-in derivation from adjacency and positions.
///
/// - point: related are the lines that touch it;
/// - line: related are its endpoint elements, the box spans the endpoints;
/// - aux: no related ids, a fixed box around its position.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralMicro;

impl MicroCompute for StructuralMicro {
    fn compute(
        &self,
        selection: &Selection,
        index: &StructuralIndex,
    ) -> Option<MicroState> {
        let id = selection.id()?;
        let (category, element) = index.resolve(id)?;

        let (related, position, size) = match category {
            Category::Points => (
                index.lines_at(id).to_vec(),
                element.position,
                Vec3::splat(POINT_EXTENT),
            ),
            Category::Lines => {
                let ends = element
                    .end_a
                    .as_ref()
                    .and_then(|a| index.endpoint_position(a))
                    .zip(
                        element
                            .end_b
                            .as_ref()
                            .and_then(|b| index.endpoint_position(b)),
                    );
                let size = ends.map_or(Vec3::splat(LINE_MIN_EXTENT), |(a, b)| {
                    let span = (a - b).abs();
                    Vec3::select(
                        span.cmpeq(Vec3::ZERO),
                        Vec3::splat(LINE_MIN_EXTENT),
                        span,
                    )
                });
                let position =
                    element.position.or(ends.map(|(a, b)| (a + b) * 0.5));
                (index.line_endpoints(id).to_vec(), position, size)
            }
            Category::Aux => {
                (Vec::new(), element.position, Vec3::splat(AUX_EXTENT))
            }
        };

        Some(MicroState {
            focus_id: Some(id.to_owned()),
            related_ids: related,
            category: Some(category),
            local_bounds: position.map(|center| LocalBounds { center, size }),
            focus_position: position,
        })
    }
}

/// Fill a missing focus position and local bounds from the index.
///
/// The fallback box is a cube scaled to the scene radius.
pub fn complete_geometry(state: &mut MicroState, index: &StructuralIndex) {
    let Some(focus) = state.focus_id.as_deref() else {
        return;
    };
    if state.focus_position.is_none() {
        state.focus_position = index.position_of(focus);
    }
    if state.local_bounds.is_none() {
        let edge = (index.scene_radius() * FALLBACK_RADIUS_FRACTION)
            .max(FALLBACK_MIN_EXTENT);
        state.local_bounds = state.focus_position.map(|center| LocalBounds {
            center,
            size: Vec3::splat(edge),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::scene::{Endpoint, SceneDocument, SceneElement};

    fn index() -> StructuralIndex {
        StructuralIndex::build(Arc::new(SceneDocument::new(
            vec![
                SceneElement::new("P1").at(Vec3::ZERO),
                SceneElement::new("P2").at(Vec3::new(4.0, 2.0, 0.0)),
                SceneElement::new("P3"),
            ],
            vec![
                SceneElement::new("L1").connecting(
                    Endpoint::to_element("P1"),
                    Endpoint::to_element("P2"),
                ),
                SceneElement::new("L2").connecting(
                    Endpoint::to_element("P1"),
                    Endpoint::Coord(Vec3::new(0.0, 0.0, 8.0)),
                ),
                SceneElement::new("L3").connecting(
                    Endpoint::to_element("P3"),
                    Endpoint::to_element("P1"),
                ),
            ],
            vec![SceneElement::new("A1").at(Vec3::splat(1.0))],
        )))
    }

    #[test]
    fn point_relates_to_incident_lines() {
        let index = index();
        let state = StructuralMicro
            .compute(&Selection::of("P1"), &index)
            .unwrap();
        assert_eq!(state.focus(), Some("P1"));
        assert_eq!(state.related_ids, ["L1", "L2", "L3"]);
        assert_eq!(state.local_bounds.unwrap().size, Vec3::splat(0.5));
    }

    #[test]
    fn line_focus_is_endpoint_midpoint() {
        let index = index();
        let state = StructuralMicro
            .compute(&Selection::of("L1"), &index)
            .unwrap();
        assert_eq!(state.focus_position, Some(Vec3::new(2.0, 1.0, 0.0)));
        assert_eq!(state.related_ids, ["P1", "P2"]);
        assert_eq!(
            state.local_bounds.unwrap().size,
            Vec3::new(4.0, 2.0, 0.1)
        );

        let coord_end = StructuralMicro
            .compute(&Selection::of("L2"), &index)
            .unwrap();
        assert_eq!(coord_end.focus_position, Some(Vec3::new(0.0, 0.0, 4.0)));
        assert_eq!(coord_end.related_ids, ["P1"]);
    }

    #[test]
    fn line_without_endpoint_positions_has_no_geometry() {
        let index = index();
        let state = StructuralMicro
            .compute(&Selection::of("L3"), &index)
            .unwrap();
        assert_eq!(state.related_ids, ["P3", "P1"]);
        assert_eq!(state.focus_position, None);
        assert_eq!(state.local_bounds, None);
    }

    #[test]
    fn aux_gets_fixed_box() {
        let index = index();
        let state = StructuralMicro
            .compute(&Selection::of("A1"), &index)
            .unwrap();
        assert!(state.related_ids.is_empty());
        assert_eq!(state.category, Some(Category::Aux));
        assert_eq!(state.local_bounds.unwrap().size, Vec3::splat(2.0));
    }

    #[test]
    fn unknown_selection_derives_nothing() {
        let index = index();
        assert!(StructuralMicro.compute(&Selection::none(), &index).is_none());
        assert!(StructuralMicro
            .compute(&Selection::of("ghost"), &index)
            .is_none());
    }

    #[test]
    fn completion_uses_scene_radius() {
        let index = index();
        let mut state = MicroState::focused("A1");
        complete_geometry(&mut state, &index);
        assert_eq!(state.focus_position, Some(Vec3::splat(1.0)));
        let edge = (index.scene_radius() * 0.05).max(0.25);
        assert_eq!(state.local_bounds.unwrap().size, Vec3::splat(edge));

        let mut unplaced = MicroState::focused("P3");
        complete_geometry(&mut unplaced, &index);
        assert_eq!(unplaced.local_bounds, None);
    }
}
