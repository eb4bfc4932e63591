//! Mesh primitives (cone, sphere, box, octahedron, star, ring)
//!
//! Every ornament shape is built here; nothing is loaded from disk.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// A vertex with position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A mesh with vertices and indices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a);
        let base = self.vertices.len() as u32;
        for p in [a, b, c] {
            self.vertices.push(Vertex::new(p, normal));
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Axis-aligned bounds of all vertex positions
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec3::from_array(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from_array(v.position) + offset).to_array();
        }
    }
}

/// Cone along +Y centered on its mid-height, apex at `height / 2`
pub fn create_cone_mesh(radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height / 2.0;
    let apex = Vec3::new(0.0, half, 0.0);
    let base_center = Vec3::new(0.0, -half, 0.0);
    let rim = |i: u32| {
        let a = i as f32 / segments as f32 * TAU;
        Vec3::new(a.sin() * radius, -half, a.cos() * radius)
    };

    let mut mesh = Mesh::default();
    for i in 0..segments {
        let (a, b) = (rim(i), rim(i + 1));
        mesh.push_triangle(a, b, apex);
        mesh.push_triangle(b, a, base_center);
    }
    mesh
}

/// UV sphere centered at the origin
pub fn create_sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = Mesh::default();

    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * TAU;
            let normal = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            mesh.vertices.push(Vertex::new(normal * radius, normal));
        }
    }

    let row = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let a = y * row + x + 1;
            let b = y * row + x;
            let c = (y + 1) * row + x;
            let d = (y + 1) * row + x + 1;
            if y != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if y != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Create a box mesh with the given dimensions
pub fn create_box_mesh(width: f32, height: f32, depth: f32) -> Mesh {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let hd = depth / 2.0;

    // 8 corners
    let p = [
        Vec3::new(-hw, -hh, -hd), // 0: back-bottom-left
        Vec3::new(hw, -hh, -hd),  // 1: back-bottom-right
        Vec3::new(hw, hh, -hd),   // 2: back-top-right
        Vec3::new(-hw, hh, -hd),  // 3: back-top-left
        Vec3::new(-hw, -hh, hd),  // 4: front-bottom-left
        Vec3::new(hw, -hh, hd),   // 5: front-bottom-right
        Vec3::new(hw, hh, hd),    // 6: front-top-right
        Vec3::new(-hw, hh, hd),   // 7: front-top-left
    ];

    // Vertex order per face gives CCW winding for the outward normal
    // when indexed with [base, base+1, base+2, base, base+2, base+3]
    let faces = [
        ([0, 3, 2, 1], Vec3::NEG_Z),
        ([4, 5, 6, 7], Vec3::Z),
        ([0, 4, 7, 3], Vec3::NEG_X),
        ([5, 1, 2, 6], Vec3::X),
        ([0, 1, 5, 4], Vec3::NEG_Y),
        ([3, 7, 6, 2], Vec3::Y),
    ];

    let mut mesh = Mesh::default();
    for (corners, normal) in faces {
        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend(corners.iter().map(|&i| Vertex::new(p[i], normal)));
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Regular octahedron with flat faces
pub fn create_octahedron_mesh(radius: f32) -> Mesh {
    let px = Vec3::X * radius;
    let nx = Vec3::NEG_X * radius;
    let py = Vec3::Y * radius;
    let ny = Vec3::NEG_Y * radius;
    let pz = Vec3::Z * radius;
    let nz = Vec3::NEG_Z * radius;

    let mut mesh = Mesh::default();
    for (a, b) in [(px, pz), (pz, nx), (nx, nz), (nz, px)] {
        mesh.push_triangle(a, py, b);
        mesh.push_triangle(b, ny, a);
    }
    mesh
}

/// Parameters of the bevelled, extruded star on top of the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarShape {
    pub points: u32,
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

impl Default for StarShape {
    fn default() -> Self {
        Self {
            points: 5,
            outer_radius: 0.8,
            inner_radius: 0.35,
            depth: 0.3,
            bevel_thickness: 0.1,
            bevel_size: 0.1,
            bevel_segments: 5,
        }
    }
}

/// Extruded star with rounded bevels, one tip pointing up, centered on its bounds
pub fn create_star_mesh(shape: &StarShape) -> Mesh {
    let corners = shape.points.max(2) * 2;
    let outline: Vec<Vec2> = (0..corners)
        .map(|i| {
            let r = if i % 2 == 0 {
                shape.outer_radius
            } else {
                shape.inner_radius
            };
            let a = i as f32 / corners as f32 * TAU + FRAC_PI_2;
            Vec2::new(a.cos(), a.sin()) * r
        })
        .collect();

    // Per-corner outward miter vector: unit bisector scaled so edges move by 1
    let n = outline.len();
    let miters: Vec<Vec2> = (0..n)
        .map(|i| {
            let prev = outline[(i + n - 1) % n];
            let next = outline[(i + 1) % n];
            let here = outline[i];
            let n0 = outward_normal(here - prev);
            let n1 = outward_normal(next - here);
            let bisector = (n0 + n1).normalize_or_zero();
            let cos = bisector.dot(n0).max(0.25);
            bisector / cos
        })
        .collect();

    // Profile rings from the front cap around the bevel, along the wall, and back.
    // Each ring: (z, outline offset, bevel angle, which face it curves toward)
    let segs = shape.bevel_segments.max(1);
    let mut rings: Vec<(f32, f32, f32, f32)> = Vec::new();
    for k in 0..=segs {
        let theta = k as f32 / segs as f32 * FRAC_PI_2;
        rings.push((-shape.bevel_thickness * theta.cos(), shape.bevel_size * theta.sin(), theta, -1.0));
    }
    for k in (0..=segs).rev() {
        let theta = k as f32 / segs as f32 * FRAC_PI_2;
        rings.push((
            shape.depth + shape.bevel_thickness * theta.cos(),
            shape.bevel_size * theta.sin(),
            theta,
            1.0,
        ));
    }

    let mut mesh = Mesh::default();
    for &(z, offset, theta, facing) in &rings {
        for (p, m) in outline.iter().zip(&miters) {
            let position = (*p + *m * offset).extend(z);
            let side = m.normalize_or_zero() * theta.sin();
            let normal = side.extend(facing * theta.cos());
            mesh.vertices.push(Vertex::new(position, normal));
        }
    }

    let n32 = n as u32;
    for r in 0..rings.len() as u32 - 1 {
        for i in 0..n32 {
            let a = r * n32 + i;
            let b = r * n32 + (i + 1) % n32;
            let c = (r + 1) * n32 + (i + 1) % n32;
            let d = (r + 1) * n32 + i;
            mesh.indices.extend_from_slice(&[a, d, c, a, c, b]);
        }
    }

    // Caps: the outline is star-shaped about its center, so a fan covers it
    let front_ring = 0u32;
    let back_ring = (rings.len() as u32 - 1) * n32;
    let front_z = rings[0].0;
    let back_z = rings[rings.len() - 1].0;
    for (center_z, ring, normal, flip) in [
        (front_z, front_ring, Vec3::NEG_Z, true),
        (back_z, back_ring, Vec3::Z, false),
    ] {
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex::new(Vec3::new(0.0, 0.0, center_z), normal));
        let cap_start = mesh.vertices.len() as u32;
        for i in 0..n {
            let p = Vec3::from_array(mesh.vertices[(ring as usize) + i].position);
            mesh.vertices.push(Vertex::new(p, normal));
        }
        for i in 0..n32 {
            let a = cap_start + i;
            let b = cap_start + (i + 1) % n32;
            if flip {
                mesh.indices.extend_from_slice(&[center, b, a]);
            } else {
                mesh.indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    let (lo, hi) = mesh.bounds();
    mesh.translate(-(lo + hi) * 0.5);
    mesh
}

/// Flat annulus in the XY plane facing +Z
pub fn create_ring_mesh(inner_radius: f32, outer_radius: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::default();
    for i in 0..=segments {
        let a = i as f32 / segments as f32 * TAU;
        let dir = Vec3::new(a.cos(), a.sin(), 0.0);
        mesh.vertices.push(Vertex::new(dir * inner_radius, Vec3::Z));
        mesh.vertices.push(Vertex::new(dir * outer_radius, Vec3::Z));
    }
    for i in 0..segments {
        let base = i * 2;
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 3, base, base + 3, base + 2]);
    }
    mesh
}

/// Outward normal of a counter-clockwise polygon edge
fn outward_normal(edge: Vec2) -> Vec2 {
    Vec2::new(edge.y, -edge.x).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(mesh: &Mesh) {
        assert!(mesh.index_count() % 3 == 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4, "normal {n:?} not unit");
        }
    }

    #[test]
    fn cone_has_apex_on_top() {
        let mesh = create_cone_mesh(0.06, 0.25, 3);
        assert_valid(&mesh);
        assert_eq!(mesh.index_count(), 3 * 2 * 3);
        let (lo, hi) = mesh.bounds();
        assert!((hi.y - 0.125).abs() < 1e-6 && (lo.y + 0.125).abs() < 1e-6);
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let mesh = create_sphere_mesh(0.12, 32, 32);
        assert_valid(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 0.12).abs() < 1e-5);
        }
    }

    #[test]
    fn box_dimensions() {
        let mesh = create_box_mesh(0.12, 0.02, 0.3);
        assert_valid(&mesh);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        let (lo, hi) = mesh.bounds();
        assert!(((hi - lo) - Vec3::new(0.12, 0.02, 0.3)).length() < 1e-6);
    }

    #[test]
    fn box_normals_point_outward() {
        let mesh = create_box_mesh(1.0, 1.0, 1.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let winding = (b - a).cross(c - a);
            let normal = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!(winding.dot(normal) > 0.0);
        }
    }

    #[test]
    fn octahedron_faces_point_outward() {
        let mesh = create_octahedron_mesh(0.06);
        assert_valid(&mesh);
        assert_eq!(mesh.index_count(), 24);
        for tri in mesh.indices.chunks(3) {
            let v = &mesh.vertices[tri[0] as usize];
            let centroid: Vec3 = tri
                .iter()
                .map(|&i| Vec3::from_array(mesh.vertices[i as usize].position))
                .sum::<Vec3>()
                / 3.0;
            assert!(centroid.dot(Vec3::from_array(v.normal)) > 0.0);
        }
    }

    #[test]
    fn star_is_centered_and_bevelled() {
        let shape = StarShape::default();
        let mesh = create_star_mesh(&shape);
        assert_valid(&mesh);
        let (lo, hi) = mesh.bounds();
        let center = (lo + hi) * 0.5;
        assert!(center.length() < 1e-4);
        // Depth plus a bevel on each face
        assert!(((hi.z - lo.z) - 0.5).abs() < 1e-4);
        // Bevel pushes the silhouette past the raw outer radius
        assert!(hi.y - lo.y > 0.8 * 2.0 * 0.9);
    }

    #[test]
    fn ring_is_flat_annulus() {
        let mesh = create_ring_mesh(0.9, 1.0, 48);
        assert_valid(&mesh);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert_eq!(p.z, 0.0);
            let r = p.length();
            assert!((0.9 - 1e-5..=1.0 + 1e-5).contains(&r));
        }
    }
}
