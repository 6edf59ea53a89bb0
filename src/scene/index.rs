//! Precomputed lookups over a [`SceneDocument`].
//!
//! The index answers three kinds of question quickly: which element does
//! an id name, which elements may be visible on a given frame, and how are
//! points and lines connected. Frame membership is a *candidate* filter
//! only; callers re-check every candidate against the full restriction.

use std::borrow::Cow;
use std::sync::Arc;

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{Category, Endpoint, SceneDocument, SceneElement};

/// Set of element ids.
pub type IdSet = FxHashSet<String>;

/// Scene radius used when no element carries a position.
pub const DEFAULT_SCENE_RADIUS: f32 = 10.0;

/// Largest frame magnitude that can widen the detected timeline. Frames
/// past it still restrict visibility but never become reachable.
pub const MAX_FRAME: f64 = 9_007_199_254_740_992.0;

/// Location of an element inside its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Category array holding the element.
    pub category: Category,
    /// Position inside that array.
    pub position: usize,
}

/// Frame buckets for one category.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    /// Integer frame → ids restricted to a discrete set containing it.
    frames: FxHashMap<i64, IdSet>,
    /// Ids filed without a discrete frame set.
    unrestricted: IdSet,
    /// Union of every frame bucket, when precomputed.
    all_frame_restricted: Option<IdSet>,
}

impl CategoryIndex {
    /// Ids filed under `frame`.
    #[must_use]
    pub fn at_frame(&self, frame: i64) -> Option<&IdSet> {
        self.frames.get(&frame)
    }

    /// Ids with no discrete frame set.
    #[must_use]
    pub fn unrestricted(&self) -> &IdSet {
        &self.unrestricted
    }

    /// Union of every frame bucket. Rebuilt from the buckets when it was
    /// not precomputed.
    #[must_use]
    pub fn all_frame_restricted(&self) -> Cow<'_, IdSet> {
        self.all_frame_restricted.as_ref().map_or_else(
            || {
                Cow::Owned(
                    self.frames.values().flatten().cloned().collect::<IdSet>(),
                )
            },
            Cow::Borrowed,
        )
    }

    /// Whether the frame-restricted union was precomputed.
    #[must_use]
    pub fn has_precomputed_union(&self) -> bool {
        self.all_frame_restricted.is_some()
    }

    fn file(&mut self, element: &SceneElement) {
        match element.frames.indexed_frames() {
            Some(frames) => {
                for frame in frames {
                    let _ = self
                        .frames
                        .entry(frame)
                        .or_default()
                        .insert(element.id.clone());
                }
            }
            None => {
                let _ = self.unrestricted.insert(element.id.clone());
            }
        }
    }
}

/// Lookup structure derived from one immutable document.
#[derive(Debug, Clone)]
pub struct StructuralIndex {
    document: Arc<SceneDocument>,
    slots: FxHashMap<String, Slot>,
    categories: [CategoryIndex; 3],
    /// Element id → lines referencing it as an endpoint.
    lines_at: FxHashMap<String, Vec<String>>,
    /// Line id → referenced endpoint ids that resolve.
    line_endpoints: FxHashMap<String, Vec<String>>,
    scene_radius: f32,
    frame_range: (i64, i64),
}

impl StructuralIndex {
    /// Build the full index, including the per-category frame-restricted
    /// unions.
    #[must_use]
    pub fn build(document: Arc<SceneDocument>) -> Self {
        let mut index = Self::build_without_unions(document);
        for category in &mut index.categories {
            category.all_frame_restricted =
                Some(category.frames.values().flatten().cloned().collect());
        }
        index
    }

    /// Build the index without precomputed unions. Absent-frame queries
    /// then rebuild the union from the frame buckets on demand.
    #[must_use]
    pub fn build_without_unions(document: Arc<SceneDocument>) -> Self {
        let mut slots: FxHashMap<String, Slot> = FxHashMap::default();
        let mut categories: [CategoryIndex; 3] = Default::default();
        let mut duplicates = 0usize;

        for category in Category::ALL {
            for (position, element) in
                document.elements(category).iter().enumerate()
            {
                if slots.contains_key(&element.id) {
                    duplicates += 1;
                    log::warn!(
                        "duplicate element id {:?} in {category}; keeping \
                         the first occurrence",
                        element.id
                    );
                    continue;
                }
                let _ = slots
                    .insert(element.id.clone(), Slot { category, position });
                categories[category_slot(category)].file(element);
            }
        }

        let mut index = Self {
            document,
            slots,
            categories,
            lines_at: FxHashMap::default(),
            line_endpoints: FxHashMap::default(),
            scene_radius: DEFAULT_SCENE_RADIUS,
            frame_range: (0, 0),
        };
        index.link_lines();
        index.scene_radius = index.measure_radius();
        index.frame_range = index.detect_frame_range();

        log::debug!(
            "structural index: {} ids, {duplicates} duplicate(s), frames \
             {:?}, radius {:.2}",
            index.slots.len(),
            index.frame_range,
            index.scene_radius
        );
        index
    }

    fn link_lines(&mut self) {
        let document = Arc::clone(&self.document);
        for (position, line) in document.lines.iter().enumerate() {
            let slot = Slot {
                category: Category::Lines,
                position,
            };
            if self.slots.get(&line.id) != Some(&slot) {
                continue;
            }
            let mut ends: Vec<String> = Vec::with_capacity(2);
            for end in line.endpoint_refs() {
                if !self.slots.contains_key(end) || ends.iter().any(|e| e == end)
                {
                    continue;
                }
                ends.push(end.to_owned());
                self.lines_at
                    .entry(end.to_owned())
                    .or_default()
                    .push(line.id.clone());
            }
            if !ends.is_empty() {
                let _ = self.line_endpoints.insert(line.id.clone(), ends);
            }
        }
    }

    fn measure_radius(&self) -> f32 {
        let positions: Vec<Vec3> = self
            .document
            .iter()
            .flat_map(|(_, el)| {
                let coords = [&el.end_a, &el.end_b].into_iter().filter_map(
                    |end| match end {
                        Some(Endpoint::Coord(c)) => Some(*c),
                        _ => None,
                    },
                );
                el.position.into_iter().chain(coords)
            })
            .collect();
        if positions.is_empty() {
            return DEFAULT_SCENE_RADIUS;
        }
        let centroid =
            positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
        positions
            .iter()
            .map(|p| p.distance(centroid))
            .fold(0.0, f32::max)
    }

    fn detect_frame_range(&self) -> (i64, i64) {
        let frames = self.document.iter().flat_map(|(_, el)| {
            let list = el.frames.list.iter().flatten().copied();
            list.chain(el.frames.single)
                .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_FRAME)
                .map(|f| f as i64)
        });
        frames
            .fold(None, |acc: Option<(i64, i64)>, f| {
                Some(acc.map_or((f, f), |(lo, hi)| (lo.min(f), hi.max(f))))
            })
            .unwrap_or((0, 0))
    }

    // -- Lookups ----------------------------------------------------------

    /// Document this index was built from.
    #[must_use]
    pub fn document(&self) -> &Arc<SceneDocument> {
        &self.document
    }

    /// Resolve an id to its category and element.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<(Category, &SceneElement)> {
        let slot = self.slots.get(id)?;
        self.document
            .elements(slot.category)
            .get(slot.position)
            .map(|el| (slot.category, el))
    }

    /// Category of the element named by `id`.
    #[must_use]
    pub fn category_of(&self, id: &str) -> Option<Category> {
        self.slots.get(id).map(|slot| slot.category)
    }

    /// Whether `id` names an element.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the index holds no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Frame buckets for `category`.
    #[must_use]
    pub fn category(&self, category: Category) -> &CategoryIndex {
        &self.categories[category_slot(category)]
    }

    /// Lines referencing `id` as an endpoint, in document order.
    #[must_use]
    pub fn lines_at(&self, id: &str) -> &[String] {
        self.lines_at.get(id).map_or(&[], Vec::as_slice)
    }

    /// Resolvable endpoint ids of line `id`.
    #[must_use]
    pub fn line_endpoints(&self, id: &str) -> &[String] {
        self.line_endpoints.get(id).map_or(&[], Vec::as_slice)
    }

    /// World position of an endpoint. A reference uses the referenced
    /// element's own position.
    #[must_use]
    pub fn endpoint_position(&self, end: &Endpoint) -> Option<Vec3> {
        match end {
            Endpoint::Coord(c) => Some(*c),
            Endpoint::Ref(id) => self.resolve(id).and_then(|(_, el)| el.position),
        }
    }

    /// Position of element `id`. Lines without their own position use the
    /// midpoint of their endpoints.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<Vec3> {
        let (category, element) = self.resolve(id)?;
        if element.position.is_some() || category != Category::Lines {
            return element.position;
        }
        let a = self.endpoint_position(element.end_a.as_ref()?)?;
        let b = self.endpoint_position(element.end_b.as_ref()?)?;
        Some((a + b) * 0.5)
    }

    /// Max distance of any known position from their centroid.
    #[must_use]
    pub fn scene_radius(&self) -> f32 {
        self.scene_radius
    }

    /// Lowest and highest integer frame named by any discrete restriction.
    #[must_use]
    pub fn frame_range(&self) -> (i64, i64) {
        self.frame_range
    }
}

const fn category_slot(category: Category) -> usize {
    match category {
        Category::Points => 0,
        Category::Lines => 1,
        Category::Aux => 2,
    }
}
