//! Shader-driven materials.

use std::collections::BTreeMap;

use glam::{Mat4, Vec2, Vec3, Vec4};
use stage_core::{Error, Result};

use crate::shader::{ShaderSource, ShaderStage};

/// A named shader parameter value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl Uniform {
    /// Raw bytes of the value, ready for a uniform buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Uniform::Float(v) => bytemuck::bytes_of(v),
            Uniform::Vec2(v) => bytemuck::bytes_of(v),
            Uniform::Vec3(v) => bytemuck::bytes_of(v),
            Uniform::Vec4(v) => bytemuck::bytes_of(v),
            Uniform::Mat4(v) => bytemuck::bytes_of(v),
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Uniform::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Which faces of a triangle are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

impl Side {
    pub fn renders_front(self) -> bool {
        matches!(self, Side::Front | Side::Double)
    }

    pub fn renders_back(self) -> bool {
        matches!(self, Side::Back | Side::Double)
    }
}

/// A material defined by a vertex/fragment shader pair and its uniforms.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderMaterial {
    vertex_shader: ShaderSource,
    fragment_shader: ShaderSource,
    uniforms: BTreeMap<String, Uniform>,
    side: Side,
}

impl ShaderMaterial {
    /// Create a material from a vertex and a fragment shader.
    ///
    /// Fails with [`Error::Shader`] if either source belongs to the wrong stage.
    pub fn new(vertex_shader: ShaderSource, fragment_shader: ShaderSource) -> Result<Self> {
        if vertex_shader.stage() != ShaderStage::Vertex {
            return Err(Error::Shader(format!(
                "'{}' is a {} shader, expected vertex",
                vertex_shader.label(),
                vertex_shader.stage()
            )));
        }
        if fragment_shader.stage() != ShaderStage::Fragment {
            return Err(Error::Shader(format!(
                "'{}' is a {} shader, expected fragment",
                fragment_shader.label(),
                fragment_shader.stage()
            )));
        }
        Ok(Self {
            vertex_shader,
            fragment_shader,
            uniforms: BTreeMap::new(),
            side: Side::default(),
        })
    }

    pub fn with_uniform(mut self, name: impl Into<String>, value: Uniform) -> Self {
        self.uniforms.insert(name.into(), value);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn vertex_shader(&self) -> &ShaderSource {
        &self.vertex_shader
    }

    pub fn fragment_shader(&self) -> &ShaderSource {
        &self.fragment_shader
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.get(name)
    }

    /// Set a uniform, returning the previous value if there was one.
    pub fn set_uniform(&mut self, name: impl Into<String>, value: Uniform) -> Option<Uniform> {
        self.uniforms.insert(name.into(), value)
    }

    /// Uniforms in name order.
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &Uniform)> {
        self.uniforms.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// All uniform values packed back to back, in name order.
    pub fn uniform_bytes(&self) -> Vec<u8> {
        self.uniforms
            .values()
            .flat_map(|value| value.as_bytes().iter().copied())
            .collect()
    }
}
