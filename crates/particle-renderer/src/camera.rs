//! Fixed camera for the point view

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera uniform for GPU. Matches `Camera` in `vert.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

/// Static look-at camera. Built once at startup; there are no camera
/// controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl FixedCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 100.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: width as f32 / height.max(1) as f32,
            fovy: 60.0_f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view().to_cols_array_2d(),
            projection: self.projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn ndc(camera: &FixedCamera, p: Vec3) -> Vec3 {
        let clip = camera.view_projection() * Vec4::new(p.x, p.y, p.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn origin_lands_in_the_middle_of_the_screen() {
        let camera = FixedCamera::new(1280, 720);
        let origin = ndc(&camera, Vec3::ZERO);
        assert!(origin.x.abs() < 1e-5 && origin.y.abs() < 1e-5);
        assert!(origin.z > 0.0 && origin.z < 1.0);
    }

    #[test]
    fn spawn_cube_is_inside_the_frustum() {
        let camera = FixedCamera::new(1280, 720);
        for corner in [
            Vec3::new(32.0, 32.0, 32.0),
            Vec3::new(-32.0, -32.0, -32.0),
            Vec3::new(32.0, -32.0, -32.0),
        ] {
            let p = ndc(&camera, corner);
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "{:?} -> {:?}", corner, p);
            assert!((0.0..=1.0).contains(&p.z));
        }
    }

    #[test]
    fn vertical_field_of_view_is_sixty_degrees() {
        let camera = FixedCamera::new(1280, 720);
        // Half the FOV at distance 100 is 100 * tan(30°)
        let top = Vec3::new(0.0, 100.0 * 30.0_f32.to_radians().tan(), 0.0);
        assert!((ndc(&camera, top).y - 1.0).abs() < 1e-4);
        assert!((camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_is_two_column_major_matrices() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
        let camera = FixedCamera::new(1280, 720);
        let uniform = camera.to_uniform();
        assert_eq!(Mat4::from_cols_array_2d(&uniform.view), camera.view());
    }
}
