//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const PATH: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const SHOOTER: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const SLOW: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const LEVEL_PIP: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const RANGE_HOVER: [f32; 4] = [0.0, 1.0, 0.0, 0.1];
    pub const RANGE_HOLD: [f32; 4] = [0.0, 1.0, 0.0, 0.08];
    pub const BULLET: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const PULSE: [f32; 3] = [0.0, 150.0 / 255.0, 1.0];
    pub const SHOP: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const SLOT: [f32; 4] = [0.333, 0.333, 0.333, 1.0];
    pub const SLOT_BORDER: [f32; 4] = [0.667, 0.667, 0.667, 1.0];
    pub const CANCEL: [f32; 4] = [0.5, 0.0, 0.0, 1.0];
    pub const BAR_BACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const BAR_HP: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const BAR_ENEMY: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const BAR_BORDER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GAME_OVER: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
