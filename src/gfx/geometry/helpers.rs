//! Line geometry for visual helpers (world axes, light gizmo)

use cgmath::{InnerSpace, Vector3};

use crate::gfx::scene::vertex::LineVertex;

/// Line-list geometry: every two vertices form one segment
#[derive(Debug, Clone, Default)]
pub struct LineData {
    pub vertices: Vec<LineVertex>,
}

impl LineData {
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    fn push_segment(&mut self, a: [f32; 3], b: [f32; 3], color: [f32; 3]) {
        self.vertices.push(LineVertex { position: a, color });
        self.vertices.push(LineVertex { position: b, color });
    }
}

/// World axes from the origin: X red, Y green, Z blue
pub fn axes_helper(size: f32) -> LineData {
    let mut lines = LineData::default();
    lines.push_segment([0.0; 3], [size, 0.0, 0.0], [1.0, 0.0, 0.0]);
    lines.push_segment([0.0; 3], [0.0, size, 0.0], [0.0, 1.0, 0.0]);
    lines.push_segment([0.0; 3], [0.0, 0.0, size], [0.0, 0.0, 1.0]);
    lines
}

/// Square facing the origin at the light position, plus a line to the origin
///
/// The square is centered on `position` and lies in the plane perpendicular
/// to the light direction.
pub fn directional_light_helper(position: Vector3<f32>, size: f32, color: [f32; 3]) -> LineData {
    let mut lines = LineData::default();

    let forward = if position.magnitude2() > 0.0 {
        (-position).normalize()
    } else {
        -Vector3::unit_y()
    };
    let reference = if forward.y.abs() > 0.99 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    let right = forward.cross(reference).normalize() * size;
    let up = right.cross(forward).normalize() * size;

    let corners = [
        position - right - up,
        position + right - up,
        position + right + up,
        position - right + up,
    ];
    for i in 0..4 {
        lines.push_segment(corners[i].into(), corners[(i + 1) % 4].into(), color);
    }
    lines.push_segment(position.into(), [0.0; 3], color);

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_helper() {
        let axes = axes_helper(2.0);
        assert_eq!(axes.segment_count(), 3);
        assert_eq!(axes.vertices[1].position, [2.0, 0.0, 0.0]);
        assert_eq!(axes.vertices[3].color, [0.0, 1.0, 0.0]);
        assert_eq!(axes.vertices[5].position, [0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_light_helper_square_faces_origin() {
        let position = Vector3::new(1.0, 1.0, 1.0);
        let helper = directional_light_helper(position, 0.2, [1.0, 1.0, 0.0]);
        assert_eq!(helper.segment_count(), 5);

        let direction = position.normalize();
        for vertex in &helper.vertices[..8] {
            let offset = Vector3::from(vertex.position) - position;
            assert!(offset.dot(direction).abs() < 1e-5);
        }

        let last = helper.vertices.last().unwrap();
        assert_eq!(last.position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_light_helper_straight_above() {
        let helper = directional_light_helper(Vector3::new(0.0, 5.0, 0.0), 1.0, [1.0; 3]);
        for vertex in &helper.vertices[..8] {
            assert!((vertex.position[1] - 5.0).abs() < 1e-5);
        }
    }
}
