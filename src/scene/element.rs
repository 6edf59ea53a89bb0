//! Scene elements and their per-frame visibility descriptors.
//!
//! Raw scene JSON is loose: the same concept may live under `appearance`
//! or on the element itself, and frame restrictions come in several legacy
//! spellings. Everything is folded into [`SceneElement`] and
//! [`FrameRestriction`] once, at parse time. Values that are not usable
//! numbers are dropped silently.

use glam::Vec3;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

// ---------------------------------------------------------------------------
// Frame descriptors
// ---------------------------------------------------------------------------

/// Inclusive frame span. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSpan {
    /// Lowest visible frame.
    pub min: Option<f64>,
    /// Highest visible frame.
    pub max: Option<f64>,
}

impl FrameSpan {
    /// Whether `frame` falls inside the span.
    #[must_use]
    pub fn contains(&self, frame: f64) -> bool {
        self.min.is_none_or(|min| frame >= min)
            && self.max.is_none_or(|max| frame <= max)
    }
}

/// Every frame restriction an element may carry.
///
/// More than one form can be present at once. Readers apply them in a
/// fixed order: `list`, then `single`, then `range`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameRestriction {
    /// Discrete frame list. `Some(vec![])` means the list was present but
    /// held no numeric entry, which restricts nothing.
    pub list: Option<Vec<f64>>,
    /// One frame.
    pub single: Option<f64>,
    /// Inclusive span.
    pub range: Option<FrameSpan>,
}

impl FrameRestriction {
    /// No restriction at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Restriction to a discrete list of frames.
    #[must_use]
    pub fn frames(frames: &[f64]) -> Self {
        Self {
            list: Some(frames.to_vec()),
            ..Self::default()
        }
    }

    /// Restriction to exactly one frame.
    #[must_use]
    pub fn single(frame: f64) -> Self {
        Self {
            single: Some(frame),
            ..Self::default()
        }
    }

    /// Restriction to an inclusive span.
    #[must_use]
    pub fn span(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            range: Some(FrameSpan { min, max }),
            ..Self::default()
        }
    }

    /// Whether no restriction field is present.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.list.is_none() && self.single.is_none() && self.range.is_none()
    }

    /// Integer frames under which the element is filed in the structural
    /// index, or `None` when it belongs in the unrestricted bucket.
    ///
    /// A non-empty list or a single frame is a discrete set. Empty lists and
    /// spans are unrestricted for indexing purposes; candidates from that
    /// bucket are re-checked against the full restriction anyway.
    #[must_use]
    pub fn indexed_frames(&self) -> Option<Vec<i64>> {
        match &self.list {
            Some(list) if !list.is_empty() => {
                Some(list.iter().map(|f| f.trunc() as i64).collect())
            }
            Some(_) => None,
            None => self.single.map(|f| vec![f.trunc() as i64]),
        }
    }

    /// Parse the restriction from an element object and its optional
    /// `appearance` object. `appearance` wins field by field.
    fn parse(appearance: Option<&Object>, element: &Object) -> Self {
        let sources = [appearance, Some(element)];

        let mut restriction = Self::default();
        match lookup(&sources, &["frames"]) {
            Some(Value::Array(items)) => {
                restriction.list =
                    Some(items.iter().filter_map(finite_number).collect());
            }
            Some(scalar) => restriction.single = finite_number(scalar),
            None => {}
        }
        if restriction.single.is_none() {
            restriction.single =
                lookup(&sources, &["frame"]).and_then(finite_number);
        }
        restriction.range = parse_span(&sources);
        restriction
    }
}

fn parse_span(sources: &[Option<&Object>]) -> Option<FrameSpan> {
    if let Some(Value::Object(obj)) =
        lookup(sources, &["frame_range", "frameRange"])
    {
        let span = FrameSpan {
            min: first_number(obj, &["min", "start"]),
            max: first_number(obj, &["max", "end"]),
        };
        if span.min.is_some() || span.max.is_some() {
            return Some(span);
        }
    }
    let span = FrameSpan {
        min: lookup(sources, &["frame_start", "frameStart"])
            .and_then(finite_number),
        max: lookup(sources, &["frame_end", "frameEnd"])
            .and_then(finite_number),
    };
    (span.min.is_some() || span.max.is_some()).then_some(span)
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// One end of a line element.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Attached to another element by id.
    Ref(String),
    /// Free-standing coordinate.
    Coord(Vec3),
}

impl Endpoint {
    /// Endpoint referencing element `id`.
    pub fn to_element(id: impl Into<String>) -> Self {
        Self::Ref(id.into())
    }

    /// Referenced element id, if any.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Ref(id) => Some(id),
            Self::Coord(_) => None,
        }
    }

    fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) => non_empty(id).map(Self::Ref),
            Value::Array(_) => parse_vec3(value).map(Self::Coord),
            Value::Object(obj) => {
                let reference = obj
                    .get("ref")
                    .and_then(|r| match r {
                        Value::String(id) => non_empty(id),
                        Value::Object(inner) => id_of(inner),
                        _ => None,
                    })
                    .or_else(|| id_of(obj));
                reference.map(Self::Ref).or_else(|| {
                    ["coord", "position"]
                        .iter()
                        .find_map(|key| obj.get(*key).and_then(parse_vec3))
                        .or_else(|| parse_vec3(value))
                        .map(Self::Coord)
                })
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SceneElement
// ---------------------------------------------------------------------------

/// A single point, line or aux element of the scene document.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    /// Unique element id.
    pub id: String,
    /// Own visibility flag. `false` hides the element unconditionally.
    pub visible: bool,
    /// Per-frame visibility restriction.
    pub frames: FrameRestriction,
    /// World-space position, when the element has one.
    pub position: Option<Vec3>,
    /// First endpoint (lines only).
    pub end_a: Option<Endpoint>,
    /// Second endpoint (lines only).
    pub end_b: Option<Endpoint>,
}

impl SceneElement {
    /// Visible, unrestricted element with no geometry.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visible: true,
            frames: FrameRestriction::none(),
            position: None,
            end_a: None,
            end_b: None,
        }
    }

    /// Restrict to a discrete frame list.
    #[must_use]
    pub fn with_frames(mut self, frames: &[f64]) -> Self {
        self.frames.list = Some(frames.to_vec());
        self
    }

    /// Restrict to a single frame.
    #[must_use]
    pub fn with_frame(mut self, frame: f64) -> Self {
        self.frames.single = Some(frame);
        self
    }

    /// Restrict to an inclusive frame span.
    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.frames.range = Some(FrameSpan { min, max });
        self
    }

    /// Clear the own-visibility flag.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Place the element at `position`.
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Attach line endpoints.
    #[must_use]
    pub fn connecting(mut self, a: Endpoint, b: Endpoint) -> Self {
        self.end_a = Some(a);
        self.end_b = Some(b);
        self
    }

    /// Ids of referenced endpoint elements, in `a`, `b` order.
    pub fn endpoint_refs(&self) -> impl Iterator<Item = &str> {
        [&self.end_a, &self.end_b]
            .into_iter()
            .filter_map(|end| end.as_ref().and_then(Endpoint::reference))
    }

    /// Parse an element from raw scene JSON.
    ///
    /// Returns `None` when the value is not an object or carries no usable
    /// id. Every other malformed field degrades to its default.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let element = value.as_object()?;
        let id = element
            .get("meta")
            .and_then(Value::as_object)
            .and_then(|meta| meta.get("uuid"))
            .and_then(id_value)
            .or_else(|| id_of(element))?;

        let appearance = element.get("appearance").and_then(Value::as_object);
        let geometry = element.get("geometry").and_then(Value::as_object);

        let visible = !matches!(
            lookup(&[appearance, Some(element)], &["visible"]),
            Some(Value::Bool(false))
        );
        let position = lookup(&[geometry, appearance, Some(element)], &[
            "position",
        ])
        .and_then(parse_vec3);

        let ends = [geometry, Some(element)];
        let end_a = lookup(&ends, &["end_a", "endA", "a", "from", "end_a_uuid"])
            .and_then(Endpoint::parse);
        let end_b = lookup(&ends, &["end_b", "endB", "b", "to", "end_b_uuid"])
            .and_then(Endpoint::parse);

        Some(Self {
            id,
            visible,
            frames: FrameRestriction::parse(appearance, element),
            position,
            end_a,
            end_b,
        })
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// First non-null value for any of `keys`, searching `sources` in order.
fn lookup<'a>(
    sources: &[Option<&'a Object>],
    keys: &[&str],
) -> Option<&'a Value> {
    sources.iter().flatten().find_map(|obj| {
        keys.iter()
            .find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
    })
}

fn first_number(obj: &Object, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
        .and_then(finite_number)
}

/// Finite number from a JSON number or a numeric string.
fn finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_vec3(value: &Value) -> Option<Vec3> {
    match value {
        Value::Array(items) if items.len() >= 3 => Some(Vec3::new(
            finite_number(&items[0])? as f32,
            finite_number(&items[1])? as f32,
            finite_number(&items[2])? as f32,
        )),
        Value::Object(obj) => Some(Vec3::new(
            obj.get("x").and_then(finite_number)? as f32,
            obj.get("y").and_then(finite_number)? as f32,
            obj.get("z").and_then(finite_number)? as f32,
        )),
        _ => None,
    }
}

fn id_of(obj: &Object) -> Option<String> {
    ["uuid", "id"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(id_value))
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn id_prefers_meta_uuid() {
        let el = SceneElement::from_json(&json!({
            "meta": { "uuid": "m-1" },
            "uuid": "u-1",
            "id": "i-1",
        }))
        .unwrap();
        assert_eq!(el.id, "m-1");

        let el = SceneElement::from_json(&json!({ "id": 7 })).unwrap();
        assert_eq!(el.id, "7");
    }

    #[test]
    fn element_without_id_is_rejected() {
        assert!(SceneElement::from_json(&json!({ "frames": [1] })).is_none());
        assert!(SceneElement::from_json(&json!({ "id": "  " })).is_none());
        assert!(SceneElement::from_json(&json!("P1")).is_none());
    }

    #[test]
    fn appearance_fields_win_over_element_fields() {
        let el = SceneElement::from_json(&json!({
            "id": "P1",
            "frames": [1, 2],
            "visible": false,
            "appearance": { "frames": [5], "visible": true },
        }))
        .unwrap();
        assert!(el.visible);
        assert_eq!(el.frames.list, Some(vec![5.0]));
    }

    #[test]
    fn only_literal_false_hides() {
        for (raw, expected) in [
            (json!(false), false),
            (json!(0), true),
            (json!("false"), true),
            (json!(null), true),
        ] {
            let el =
                SceneElement::from_json(&json!({ "id": "P", "visible": raw }))
                    .unwrap();
            assert_eq!(el.visible, expected);
        }
    }

    #[test]
    fn frame_list_keeps_numeric_entries() {
        let el = SceneElement::from_json(&json!({
            "id": "P1",
            "frames": [0, "2", "x", null, 3.5],
        }))
        .unwrap();
        assert_eq!(el.frames.list, Some(vec![0.0, 2.0, 3.5]));

        let el = SceneElement::from_json(&json!({
            "id": "P2",
            "frames": ["x", null],
        }))
        .unwrap();
        assert_eq!(el.frames.list, Some(vec![]));
        assert_eq!(el.frames.indexed_frames(), None);
    }

    #[test]
    fn scalar_frames_and_frame_field() {
        let el =
            SceneElement::from_json(&json!({ "id": "a", "frames": 4 })).unwrap();
        assert_eq!(el.frames.single, Some(4.0));

        let el = SceneElement::from_json(&json!({
            "id": "b",
            "frames": "soon",
            "frame": 2,
        }))
        .unwrap();
        assert_eq!(el.frames.single, Some(2.0));
        assert_eq!(el.frames.list, None);
    }

    #[test]
    fn range_spellings() {
        let el = SceneElement::from_json(&json!({
            "id": "a",
            "frame_range": { "start": 1, "end": 4 },
        }))
        .unwrap();
        assert_eq!(
            el.frames.range,
            Some(FrameSpan {
                min: Some(1.0),
                max: Some(4.0)
            })
        );

        let el = SceneElement::from_json(&json!({
            "id": "b",
            "frameRange": { "min": 2 },
        }))
        .unwrap();
        assert_eq!(
            el.frames.range,
            Some(FrameSpan {
                min: Some(2.0),
                max: None
            })
        );

        let el = SceneElement::from_json(&json!({
            "id": "c",
            "frame_range": { "min": "x" },
            "frame_end": 9,
        }))
        .unwrap();
        assert_eq!(
            el.frames.range,
            Some(FrameSpan {
                min: None,
                max: Some(9.0)
            })
        );

        let el =
            SceneElement::from_json(&json!({ "id": "d", "frame_range": {} }))
                .unwrap();
        assert!(el.frames.is_unrestricted());
    }

    #[test]
    fn indexed_frames_truncate_toward_zero() {
        let r = FrameRestriction::frames(&[1.9, -0.5, 3.0]);
        assert_eq!(r.indexed_frames(), Some(vec![1, 0, 3]));
        assert_eq!(FrameRestriction::single(2.7).indexed_frames(), Some(vec![2]));
        assert_eq!(
            FrameRestriction::span(Some(0.0), Some(3.0)).indexed_frames(),
            None
        );
    }

    #[test]
    fn span_with_open_bounds() {
        let span = FrameSpan {
            min: None,
            max: Some(3.0),
        };
        assert!(span.contains(-100.0));
        assert!(span.contains(3.0));
        assert!(!span.contains(4.0));
    }

    #[test]
    fn positions_and_endpoints() {
        let el = SceneElement::from_json(&json!({
            "id": "L1",
            "geometry": { "position": [1, 2, 3] },
            "end_a": "P1",
            "endB": { "coord": { "x": 0, "y": 1, "z": 0 } },
        }))
        .unwrap();
        assert_eq!(el.position, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(el.end_a, Some(Endpoint::to_element("P1")));
        assert_eq!(el.end_b, Some(Endpoint::Coord(Vec3::Y)));
        assert_eq!(el.endpoint_refs().collect::<Vec<_>>(), vec!["P1"]);

        let el = SceneElement::from_json(&json!({
            "id": "L2",
            "end_a": { "ref": { "uuid": "P7" } },
            "end_b": [0, 0, "bad"],
        }))
        .unwrap();
        assert_eq!(el.end_a, Some(Endpoint::to_element("P7")));
        assert_eq!(el.end_b, None);
    }
}
