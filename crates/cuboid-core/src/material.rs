/// Surface appearance bound to every face of the cuboid.
///
/// `T` is the backend's texture handle. Dropping a `Textured` material drops the
/// handle, which releases the GPU-side texture.
#[derive(Debug)]
pub enum Material<T> {
    /// Flat color shown before any image has been bound.
    Neutral { color: [f32; 4] },
    /// Loaded image spread across the faces through the quadrant UV layout.
    Textured { texture: T, width: u32, height: u32 },
}

impl<T> Material<T> {
    pub fn neutral(color: [f32; 4]) -> Self {
        Material::Neutral { color }
    }

    pub fn textured(texture: T, width: u32, height: u32) -> Self {
        Material::Textured { texture, width, height }
    }

    pub fn is_textured(&self) -> bool {
        matches!(self, Material::Textured { .. })
    }

    pub fn texture(&self) -> Option<&T> {
        match self {
            Material::Textured { texture, .. } => Some(texture),
            Material::Neutral { .. } => None,
        }
    }

    /// Tint multiplied with the sampled texel (or used alone when untextured).
    pub fn base_color(&self) -> [f32; 4] {
        match self {
            Material::Neutral { color } => *color,
            Material::Textured { .. } => [1.0, 1.0, 1.0, 1.0],
        }
    }
}
