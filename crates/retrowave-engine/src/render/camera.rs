use glam::{Mat4, Vec3};

/// Perspective camera.
///
/// Depth maps to wgpu's `[0, 1]` range. The aspect ratio is supplied per frame
/// so window resizes need no extra bookkeeping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::Y,
            up: Vec3::Z,
            fov_y_deg: 45.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

/// Point light with linear falloff to zero at `range`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    pub range: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            intensity: 1.0,
            range: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn strip_camera() -> Camera {
        Camera {
            eye: Vec3::new(120.0, 0.0, 10.0),
            target: Vec3::new(120.0, 100.0, 10.0),
            ..Camera::default()
        }
    }

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let c = m * Vec4::new(p.x, p.y, p.z, 1.0);
        c.truncate() / c.w
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let ndc = project(strip_camera().view_proj(16.0 / 9.0), Vec3::new(120.0, 100.0, 10.0));
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn up_is_plus_z_on_screen() {
        let ndc = project(strip_camera().view_proj(1.0), Vec3::new(120.0, 100.0, 20.0));
        assert!(ndc.y > 0.0);
    }

    #[test]
    fn farther_points_have_greater_depth() {
        let m = strip_camera().view_proj(1.0);
        let near = project(m, Vec3::new(120.0, 10.0, 10.0));
        let far = project(m, Vec3::new(120.0, 300.0, 10.0));
        assert!(far.z > near.z);
    }

    #[test]
    fn bad_aspect_falls_back() {
        let c = strip_camera();
        assert_eq!(c.projection(0.0), c.projection(1.0));
        assert_eq!(c.projection(f32::NAN), c.projection(1.0));
    }
}
