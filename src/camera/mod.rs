/// Scene parameters and the matrix set derived from them each frame.
///
/// Conventions: left-handed view space looking down +Z, clip-space depth in
/// [0, w] (near plane maps to 0, far plane to 1). The viewport matrix flips Y
/// so that screen row 0 is the top of the image.
use glam::{Mat3, Mat4, Vec3};

/// Scalar description of where the model sits relative to the camera.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneParameters {
    pub vertical_fov_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub translate: Vec3,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotate_deg: Vec3,
    pub scale: Vec3,
    /// Added to `rotate_deg` at the start of every frame.
    pub spin_deg_per_frame: Vec3,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            vertical_fov_deg: 60.0,
            z_near: 0.5,
            z_far: 5.0,
            translate: Vec3::new(0.0, -1.0, 3.0),
            rotate_deg: Vec3::ZERO,
            scale: Vec3::ONE,
            spin_deg_per_frame: Vec3::new(0.0, -0.5, 0.0),
        }
    }
}

impl SceneParameters {
    /// A still scene: no per-frame spin.
    pub fn still(translate: Vec3) -> Self {
        Self {
            translate,
            spin_deg_per_frame: Vec3::ZERO,
            ..Self::default()
        }
    }

    /// Advance the per-frame animation state.
    #[inline]
    pub fn advance(&mut self) {
        self.rotate_deg += self.spin_deg_per_frame;
    }

    pub fn model_view_matrix(&self) -> Mat4 {
        view_matrix(self.rotate_deg, self.translate) * Mat4::from_scale(self.scale)
    }
}

/// Translation followed by X, Y, Z rotations (degrees).
pub fn view_matrix(euler_deg: Vec3, translate: Vec3) -> Mat4 {
    Mat4::from_translation(translate)
        * Mat4::from_rotation_x(euler_deg.x.to_radians())
        * Mat4::from_rotation_y(euler_deg.y.to_radians())
        * Mat4::from_rotation_z(euler_deg.z.to_radians())
}

/// Left-handed perspective projection with [0, 1] depth range.
pub fn projection_matrix(width: f32, height: f32, vertical_fov_deg: f32, z_near: f32, z_far: f32) -> Mat4 {
    Mat4::perspective_lh(vertical_fov_deg.to_radians(), width / height, z_near, z_far)
}

/// Maps NDC x/y in [-1, 1] to pixel coordinates with row 0 at NDC y = +1.
/// Z passes through unchanged.
pub fn viewport_matrix(width: f32, height: f32) -> Mat4 {
    let half_width = width * 0.5;
    let half_height = height * 0.5;
    Mat4::from_cols_array(&[
        half_width, 0.0, 0.0, 0.0,
        0.0, -half_height, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        half_width, half_height, 0.0, 1.0,
    ])
}

/// Inverse-transpose of the model-view's linear part, for transforming normals.
pub fn normal_matrix(model_view: &Mat4) -> Mat3 {
    Mat3::from_mat4(*model_view).inverse().transpose()
}

/// Matrices recomputed every frame from `SceneParameters` and the target size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MatrixState {
    pub model_view: Mat4,
    pub projection: Mat4,
    pub viewport: Mat4,
    pub normal: Mat3,
}

impl Default for MatrixState {
    fn default() -> Self {
        Self {
            model_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            viewport: Mat4::IDENTITY,
            normal: Mat3::IDENTITY,
        }
    }
}

impl MatrixState {
    /// Recompute projection and viewport for a new target size.
    pub fn reset_viewport(&mut self, width: usize, height: usize, scene: &SceneParameters) {
        let (w, h) = (width as f32, height as f32);
        self.viewport = viewport_matrix(w, h);
        self.projection = projection_matrix(w, h, scene.vertical_fov_deg, scene.z_near, scene.z_far);
    }

    /// Recompute model-view and normal matrices from the scene.
    pub fn update_scene(&mut self, scene: &SceneParameters) {
        self.model_view = scene.model_view_matrix();
        self.normal = normal_matrix(&self.model_view);
    }

    #[inline]
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.model_view
    }

    /// Maps view space straight to pixel coordinates (before the divide).
    #[inline]
    pub fn viewport_projection(&self) -> Mat4 {
        self.viewport * self.projection
    }
}
