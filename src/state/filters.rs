use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::Category;

/// Per-category enable flags. Unset entries fall back to the legacy flat
/// flags on [`Filters`], then to `true`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(default)]
pub struct TypeFilters {
    /// Show anchor points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<bool>,
    /// Show connectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<bool>,
    /// Show auxiliary markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux: Option<bool>,
}

/// Optional scene decorations. Unset entries default to `false`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(default)]
pub struct AuxModules {
    /// Reference grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
    /// Axis gizmo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<bool>,
}

/// One optional scene decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxModule {
    /// Reference grid.
    Grid,
    /// Axis gizmo.
    Axis,
}

/// Category filters as the caller writes them.
///
/// Older callers set the flat `points`/`lines`/`aux` flags; newer ones use
/// `types`. [`Filters::canonicalize`] reconciles both spellings in place
/// and returns the only shape read downstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(default)]
pub struct Filters {
    /// Per-category enable flags.
    pub types: TypeFilters,
    /// Legacy flat flag for points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<bool>,
    /// Legacy flat flag for lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<bool>,
    /// Legacy flat flag for aux.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux: Option<bool>,
    /// Optional decorations.
    #[serde(alias = "auxModules")]
    pub aux_modules: AuxModules,
}

impl Filters {
    /// Fill every unset flag, mirror the result into both spellings and
    /// return the canonical view.
    pub fn canonicalize(&mut self) -> CanonicalFilters {
        let points = self.types.points.or(self.points).unwrap_or(true);
        let lines = self.types.lines.or(self.lines).unwrap_or(true);
        let aux = self.types.aux.or(self.aux).unwrap_or(true);
        self.types = TypeFilters {
            points: Some(points),
            lines: Some(lines),
            aux: Some(aux),
        };
        self.points = Some(points);
        self.lines = Some(lines);
        self.aux = Some(aux);

        let grid = self.aux_modules.grid.unwrap_or(false);
        let axis = self.aux_modules.axis.unwrap_or(false);
        self.aux_modules = AuxModules {
            grid: Some(grid),
            axis: Some(axis),
        };

        CanonicalFilters {
            points,
            lines,
            aux,
            aux_modules: AuxModuleFlags { grid, axis },
        }
    }

    /// Whether `category` is enabled, reading the flags the way
    /// [`canonicalize`](Self::canonicalize) would.
    #[must_use]
    pub fn category_enabled(&self, category: Category) -> bool {
        let (typed, flat) = match category {
            Category::Points => (self.types.points, self.points),
            Category::Lines => (self.types.lines, self.lines),
            Category::Aux => (self.types.aux, self.aux),
        };
        typed.or(flat).unwrap_or(true)
    }

    /// Enable or disable `category` in both spellings.
    pub fn set_category(&mut self, category: Category, enabled: bool) {
        let (typed, flat) = match category {
            Category::Points => (&mut self.types.points, &mut self.points),
            Category::Lines => (&mut self.types.lines, &mut self.lines),
            Category::Aux => (&mut self.types.aux, &mut self.aux),
        };
        *typed = Some(enabled);
        *flat = Some(enabled);
    }

    /// Whether `module` is switched on.
    #[must_use]
    pub fn aux_module_enabled(&self, module: AuxModule) -> bool {
        match module {
            AuxModule::Grid => self.aux_modules.grid,
            AuxModule::Axis => self.aux_modules.axis,
        }
        .unwrap_or(false)
    }

    /// Switch `module` on or off.
    pub fn set_aux_module(&mut self, module: AuxModule, enabled: bool) {
        match module {
            AuxModule::Grid => self.aux_modules.grid = Some(enabled),
            AuxModule::Axis => self.aux_modules.axis = Some(enabled),
        }
    }
}

/// Canonical decoration flags carried on every visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AuxModuleFlags {
    /// Reference grid.
    pub grid: bool,
    /// Axis gizmo.
    pub axis: bool,
}

/// Fully resolved filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalFilters {
    /// Show anchor points.
    pub points: bool,
    /// Show connectors.
    pub lines: bool,
    /// Show auxiliary markers.
    pub aux: bool,
    /// Decorations.
    pub aux_modules: AuxModuleFlags,
}

impl CanonicalFilters {
    /// Whether `category` may contribute to the visible set.
    #[must_use]
    pub const fn allows(&self, category: Category) -> bool {
        match category {
            Category::Points => self.points,
            Category::Lines => self.lines,
            Category::Aux => self.aux,
        }
    }
}

impl Default for CanonicalFilters {
    fn default() -> Self {
        Filters::default().canonicalize()
    }
}
