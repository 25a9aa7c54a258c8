use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// Setup-pose definition of a bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneData {
    pub name: String,
    /// Index of the parent bone. Parents always precede their children.
    pub parent: Option<usize>,
    pub x: f32,
    pub y: f32,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl BoneData {
    #[must_use]
    pub fn new(name: &str, parent: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }
}

/// Runtime bone: the current local pose plus the world transform computed by
/// [`Skeleton::update_world_transform`](crate::pose::Skeleton::update_world_transform).
#[derive(Debug, Clone)]
pub struct Bone {
    data_index: usize,
    parent: Option<usize>,

    // === Local pose (animated by the host) ===
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,

    // === Derived ===
    pub(crate) world: Affine2,
}

impl Bone {
    pub(crate) fn new(data_index: usize, data: &BoneData) -> Self {
        let mut bone = Self {
            data_index,
            parent: data.parent,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            world: Affine2::IDENTITY,
        };
        bone.set_to_setup_pose(data);
        bone
    }

    #[inline]
    #[must_use]
    pub fn data_index(&self) -> usize {
        self.data_index
    }

    #[inline]
    #[must_use]
    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    pub fn set_to_setup_pose(&mut self, data: &BoneData) {
        self.x = data.x;
        self.y = data.y;
        self.rotation = data.rotation;
        self.scale_x = data.scale_x;
        self.scale_y = data.scale_y;
    }

    /// Local TRS as an affine transform (scale, then rotate, then translate).
    #[must_use]
    pub fn local_matrix(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::new(self.scale_x, self.scale_y),
            self.rotation.to_radians(),
            Vec2::new(self.x, self.y),
        )
    }

    /// World transform from the last `update_world_transform`.
    #[inline]
    #[must_use]
    pub fn world_transform(&self) -> &Affine2 {
        &self.world
    }

    /// Overrides the world transform directly (e.g. from an external solver).
    pub fn set_world_transform(&mut self, world: Affine2) {
        self.world = world;
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec2 {
        self.world.translation
    }

    /// Transforms a point from bone space to world space.
    #[inline]
    #[must_use]
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.world.transform_point2(local)
    }
}
