// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Layers - regular 2-D grids of typed, positioned elements.

A layer owns every element it instantiates. Role names from the layer
composition are resolved to compact [`RoleId`] tags at creation time, so
rule execution never dispatches on strings. Elements are immutable once the
layer is built; the only post-creation hook is the external attribute
initializer, which runs exactly once per element.
*/

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{self, Extent, Position};
use crate::types::{ElementId, LayerId, RoleId, TopologyError, TopologyResult};

/// Declarative description of one layer.
///
/// `composition` lists how many elements of each role occupy every grid
/// location, e.g. `[("L23pyr", 2), ("L23in", 1)]` places three co-located
/// elements per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    pub extent: Extent,
    /// Toroidal geometry if true, clamped/bounded if false.
    pub periodic: bool,
    pub composition: Vec<(String, u32)>,
}

/// One instantiated node: identity, role tag, owning layer, and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub role: RoleId,
    pub layer: LayerId,
    pub position: Position,
    /// Per-element attribute set by the external initializer (e.g. a phase).
    pub attribute: Option<f64>,
}

/// A single failed invocation of the external attribute initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct InitFailure {
    pub element: ElementId,
    pub reason: String,
}

/// A grid of spatially positioned elements of one or more roles.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    name: String,
    rows: u32,
    columns: u32,
    extent: Extent,
    periodic: bool,
    roles: Vec<String>,
    role_index: AHashMap<String, RoleId>,
    elements: Vec<Element>,
}

impl Layer {
    /// Instantiate a layer from its spec, assigning element ids starting at
    /// `*next_element_id`. Deterministic: positions depend only on the grid
    /// shape and extent, never on randomness.
    pub(crate) fn instantiate(
        id: LayerId,
        spec: &LayerSpec,
        next_element_id: &mut u32,
    ) -> TopologyResult<Self> {
        let invalid = |reason: String| TopologyError::InvalidLayer {
            name: spec.name.clone(),
            reason,
        };

        if spec.rows == 0 || spec.columns == 0 {
            return Err(invalid(format!(
                "grid must be non-empty, got {}x{}",
                spec.rows, spec.columns
            )));
        }
        spec.extent.validate().map_err(|e| invalid(e.to_string()))?;
        if spec.composition.is_empty() {
            return Err(invalid("composition must list at least one role".into()));
        }

        let mut roles = Vec::with_capacity(spec.composition.len());
        let mut role_index = AHashMap::with_capacity(spec.composition.len());
        for (name, count) in &spec.composition {
            if *count == 0 {
                return Err(invalid(format!("role '{name}' has count 0")));
            }
            let role_id = RoleId(roles.len() as u16);
            if role_index.insert(name.clone(), role_id).is_some() {
                return Err(invalid(format!("role '{name}' listed twice")));
            }
            roles.push(name.clone());
        }

        let per_cell: u32 = spec.composition.iter().map(|(_, c)| *c).sum();
        let total = spec.rows as usize * spec.columns as usize * per_cell as usize;
        let mut elements = Vec::with_capacity(total);

        for row in 0..spec.rows {
            for col in 0..spec.columns {
                let position = grid_center(row, col, spec.rows, spec.columns, spec.extent);
                for (role_idx, (_, count)) in spec.composition.iter().enumerate() {
                    for _ in 0..*count {
                        elements.push(Element {
                            id: ElementId(*next_element_id),
                            role: RoleId(role_idx as u16),
                            layer: id,
                            position,
                            attribute: None,
                        });
                        *next_element_id += 1;
                    }
                }
            }
        }

        debug!(
            target: "neuroweave-topology",
            "Instantiated layer '{}': {}x{} grid, {} roles, {} elements",
            spec.name, spec.rows, spec.columns, roles.len(), elements.len()
        );

        Ok(Self {
            id,
            name: spec.name.clone(),
            rows: spec.rows,
            columns: spec.columns,
            extent: spec.extent,
            periodic: spec.periodic,
            roles,
            role_index,
            elements,
        })
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn periodic(&self) -> bool {
        self.periodic
    }

    /// Declared role names, in composition order.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Resolve a role name declared in this layer's composition.
    pub fn role_id(&self, name: &str) -> TopologyResult<RoleId> {
        self.role_index
            .get(name)
            .copied()
            .ok_or_else(|| TopologyError::UnknownRole {
                layer: self.name.clone(),
                role: name.to_string(),
            })
    }

    /// All elements, in creation order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements matching an optional role filter; `None` matches every role.
    pub fn elements_with_role(&self, filter: Option<RoleId>) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |e| filter.map_or(true, |r| e.role == r))
    }

    /// Distance between two positions under this layer's geometry.
    pub fn distance(&self, a: Position, b: Position) -> f64 {
        geometry::distance(a, b, self.extent, self.periodic)
    }

    /// Invoke the external attribute initializer exactly once per element.
    ///
    /// A failing invocation is recorded with that element's identity and
    /// does not abort the remaining elements; the caller decides whether any
    /// failure is fatal.
    pub(crate) fn apply_initializer<F>(&mut self, mut init: F) -> Vec<InitFailure>
    where
        F: FnMut(Position) -> Result<f64, String>,
    {
        let mut failures = Vec::new();
        for element in &mut self.elements {
            match init(element.position) {
                Ok(value) => element.attribute = Some(value),
                Err(reason) => failures.push(InitFailure {
                    element: element.id,
                    reason,
                }),
            }
        }
        failures
    }
}

/// Center position of grid cell `(row, col)`: the extent is centered on the
/// origin, columns grow rightward and rows grow downward, and cells are
/// spaced evenly to exactly fill the extent.
fn grid_center(row: u32, col: u32, rows: u32, columns: u32, extent: Extent) -> Position {
    let x = ((col as f64 + 0.5) / columns as f64 - 0.5) * extent.width;
    let y = (0.5 - (row as f64 + 0.5) / rows as f64) * extent.height;
    Position::new(x, y)
}
