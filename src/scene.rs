//! Deterministic city layout: the building grid and the central tower.

use crate::mesh::Transform;
use glam::Vec3;

/// Procedural placement for the cityscape.
///
/// Every value here is a pure function of the configuration: two calls with
/// equal parameters yield bit-identical transforms in the same stable
/// row-major order. Nothing is stored between frames; the frame loop
/// regenerates the object list each time it draws.
#[derive(Clone, Debug, PartialEq)]
pub struct CityLayout {
    /// The grid spans `[-half_extent, half_extent]` on X and Z.
    pub half_extent: i32,
    /// World units between neighboring cells.
    pub cell_stride: i32,
    /// Angular frequency of the height wave.
    pub frequency: f32,
    /// Height wave amplitude above `min_height`.
    pub amplitude: f32,
    /// Shortest possible building.
    pub min_height: f32,
    /// Building footprint (X/Z extent) within a cell.
    pub footprint: f32,
    /// Central tower height; the tower sits at the grid origin.
    pub tower_height: f32,
    /// Central tower footprint.
    pub tower_footprint: f32,
}

impl Default for CityLayout {
    fn default() -> Self {
        Self {
            half_extent: 10,
            cell_stride: 2,
            frequency: 0.3,
            amplitude: 8.0,
            min_height: 2.0,
            footprint: 0.9,
            tower_height: 20.0,
            tower_footprint: 2.0,
        }
    }
}

impl CityLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Building height at a grid cell.
    ///
    /// `|sin(gx·f)·cos(gz·f)|` keeps the wave non-negative, so the result is
    /// always within `[min_height, min_height + amplitude]` by construction.
    pub fn building_height(&self, gx: i32, gz: i32) -> f32 {
        let x = gx as f32 * self.frequency;
        let z = gz as f32 * self.frequency;
        (x.sin() * z.cos()).abs() * self.amplitude + self.min_height
    }

    /// Model transform for the building at a grid cell: raised by half its
    /// height so it stands on the ground plane.
    pub fn building(&self, gx: i32, gz: i32) -> Transform {
        let height = self.building_height(gx, gz);
        Transform::from_position(Vec3::new(gx as f32, height * 0.5, gz as f32))
            .scale(Vec3::new(self.footprint, height, self.footprint))
    }

    /// Model transform for the central tower.
    pub fn tower(&self) -> Transform {
        Transform::from_position(Vec3::new(0.0, self.tower_height * 0.5, 0.0)).scale(Vec3::new(
            self.tower_footprint,
            self.tower_height,
            self.tower_footprint,
        ))
    }

    /// All scene objects for one frame: every grid cell exactly once in
    /// row-major order (X outer, Z inner), then the tower.
    pub fn objects(&self) -> Vec<Transform> {
        let mut objects = Vec::with_capacity(self.cell_count() + 1);
        let mut gx = -self.half_extent;
        while gx <= self.half_extent {
            let mut gz = -self.half_extent;
            while gz <= self.half_extent {
                objects.push(self.building(gx, gz));
                gz += self.cell_stride;
            }
            gx += self.cell_stride;
        }
        objects.push(self.tower());
        objects
    }

    fn cell_count(&self) -> usize {
        let per_axis = (2 * self.half_extent / self.cell_stride + 1) as usize;
        per_axis * per_axis
    }
}
