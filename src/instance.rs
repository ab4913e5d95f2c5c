use glam::{Mat3, Mat4, Vec2, Vec4};

/// An [`Instance2D`] is everything the renderer needs to draw one shape.
///
/// Drawing a particle collection produces one instance per live particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance2D {
    /// The world position of the object
    pub position: Vec2,
    /// The rotation of the object in radians
    pub rotation: f32,
    /// The scale multiplier of the shape.
    pub scale: Vec2,
    /// The color of the shape. The `w` channel carries opacity in `[0, 1]`.
    pub color: Vec4,
    /// The ID of the shape or texture to render. Opaque to this crate.
    pub shape: u32,
}

impl Default for Instance2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            color: Vec4::ONE,
            shape: 0,
        }
    }
}

impl Instance2D {
    /// Creates a new default instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `Inst` to be uploaded to the GPU through the instance buffer.
    #[allow(clippy::wrong_self_convention)]
    #[inline(always)]
    #[must_use]
    pub fn to_matrix(&self) -> Inst {
        Inst {
            transform: Mat4::from_mat3(Mat3::from_scale_angle_translation(
                self.scale,
                self.rotation,
                self.position,
            )),
            color: self.color,
        }
    }
}

/// A plain-old-data struct laid out for the instance buffer.
///
/// Holds the instance's transformation matrix and color. The 2D affine transform occupies the
/// upper 3x3 block, with the translation in the third column.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Inst {
    pub transform: Mat4,
    pub color: Vec4,
}

/// The draw target every drawable collection writes into.
///
/// One batch is filled per frame and handed to whatever renderer the application uses.
#[derive(Debug, Default, Clone)]
pub struct InstanceBatch {
    instances: Vec<Instance2D>,
}

impl InstanceBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, instance: Instance2D) {
        self.instances.push(instance);
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance2D> {
        self.instances.iter()
    }

    /// Groups instances by shape so each shape can be drawn with a single instanced call.
    ///
    /// The sort is stable: instances of one shape keep their draw order.
    pub fn sort_by_shape(&mut self) {
        self.instances.sort_by_key(|instance| instance.shape);
    }

    #[must_use]
    pub fn gpu_data(&self) -> Vec<Inst> {
        self.instances.iter().map(Instance2D::to_matrix).collect()
    }

    /// The instance buffer contents, ready to be written to the GPU.
    #[must_use]
    pub fn gpu_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.gpu_data()).to_vec()
    }
}

impl Extend<Instance2D> for InstanceBatch {
    fn extend<T: IntoIterator<Item = Instance2D>>(&mut self, iter: T) {
        self.instances.extend(iter);
    }
}
