//! Tinsel Render - wgpu renderer for the ornament tree
//!
//! Every ornament class is one instanced draw. Ornament materials compose
//! the explosion deformation into the shared surface template and read a
//! single expansion uniform, so one write per frame moves the whole tree.

mod camera;
pub mod compose;
mod context;
pub mod deform;
mod expansion_uniform;
mod instanced;
mod pipeline;
mod primitives;
mod scene_renderer;

pub use camera::OrbitCamera;
pub use compose::{compose, ComposeError, ComposedShader, ShaderExtension, ShaderFragment};
pub use context::{RenderContext, RenderError};
pub use deform::{deform_point, explosion_extension, rotation_matrix, DeformParams};
pub use expansion_uniform::{ExpansionUniform, SharedExpansion};
pub use instanced::{InstancedObject, SurfaceMaterial};
pub use pipeline::{BlendMode, FrameUniforms, ObjectUniforms, SurfaceLayouts, SurfacePipeline};
pub use primitives::{
    create_box_mesh, create_cone_mesh, create_octahedron_mesh, create_ring_mesh,
    create_sphere_mesh, create_star_mesh, Mesh, StarShape, Vertex,
};
pub use scene_renderer::{ripple_instances, SceneLights, SceneRenderer};

/// Base surface program with `// @slot` injection points
pub const SURFACE_TEMPLATE: &str = include_str!("surface.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> naga::Module {
        naga::front::wgsl::parse_str(source).expect("composed shader failed to parse")
    }

    #[test]
    fn surface_template_parses_as_is() {
        // Slot markers are plain comments, so the raw template is valid WGSL
        parse(SURFACE_TEMPLATE);
    }

    #[test]
    fn static_surface_parses() {
        let composed = compose(SURFACE_TEMPLATE, &[]).unwrap();
        let module = parse(&composed.source);
        assert!(module.entry_points.iter().any(|e| e.name == "vs_main"));
        assert!(module.entry_points.iter().any(|e| e.name == "fs_main"));
    }

    #[test]
    fn deformed_surface_parses() {
        let composed =
            compose(SURFACE_TEMPLATE, &[explosion_extension(&DeformParams::default())]).unwrap();
        assert!(composed.uses_expansion);
        let module = parse(&composed.source);
        assert!(module
            .global_variables
            .iter()
            .any(|(_, var)| var.name.as_deref() == Some("expansion")));
        assert!(module
            .functions
            .iter()
            .any(|(_, f)| f.name.as_deref() == Some("rotation_matrix")));
    }

    #[test]
    fn tuned_deformation_parses() {
        let params = DeformParams {
            scale: 12.0,
            gain: 0.5,
            threshold: 1e-4,
        };
        let composed = compose(SURFACE_TEMPLATE, &[explosion_extension(&params)]).unwrap();
        parse(&composed.source);
    }

    #[test]
    fn template_exposes_every_slot() {
        let slots = compose::template_slots(SURFACE_TEMPLATE).unwrap();
        for slot in ["bindings", "instance_inputs", "functions", "deform"] {
            assert!(slots.iter().any(|s| s == slot), "missing slot {slot}");
        }
    }
}
