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

/// Opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> [f32; 4] {
    rgba(hex, 1.0)
}

/// Color from a 0xRRGGBB literal with alpha
pub const fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        alpha,
    ]
}

/// Same color, different alpha
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    use super::{rgb, rgba};

    pub const SKY_TOP: [f32; 4] = rgb(0x6BB3D9);
    pub const SKY_MID: [f32; 4] = rgb(0x9DCCEA);
    pub const SKY_HORIZON: [f32; 4] = rgb(0xD4E8F5);
    pub const MENU_GROUND: [f32; 4] = rgb(0xE8F0F8);

    pub const MOUNTAIN: [f32; 4] = rgb(0xA0B8C8);
    pub const MOUNTAIN_SNOW: [f32; 4] = rgb(0xD8E8F0);

    pub const OFF_PISTE: [f32; 4] = rgb(0xE4ECF2);
    pub const OFF_PISTE_ALT: [f32; 4] = rgb(0xDCE6EE);
    pub const TRAIL: [f32; 4] = rgb(0xF4F8FC);
    pub const TRAIL_ALT: [f32; 4] = rgb(0xEDF2F8);
    pub const TRAIL_EDGE: [f32; 4] = rgba(0xC83C3C, 0.4);
    pub const CENTRE_DASH: [f32; 4] = rgba(0x96B4C8, 0.15);

    pub const SHADOW: [f32; 4] = rgba(0x000000, 0.1);
    pub const TRUNK: [f32; 4] = rgb(0x5D4037);
    pub const FOLIAGE: [[f32; 4]; 3] = [rgb(0x1B5E20), rgb(0x2E7D32), rgb(0x388E3C)];
    pub const SNOW: [f32; 4] = rgb(0xFFFFFF);
    pub const ROCK: [f32; 4] = rgb(0x78909C);
    pub const ROCK_HIGHLIGHT: [f32; 4] = rgb(0xE0E0E0);
    pub const SNOWMAN: [[f32; 4]; 3] = [rgb(0xF0F0F0), rgb(0xF5F5F5), rgb(0xFAFAFA)];
    pub const HAT: [f32; 4] = rgb(0x333333);
    pub const EYE: [f32; 4] = rgb(0x000000);
    pub const CARROT: [f32; 4] = rgb(0xFF7043);
    pub const GATE: [f32; 4] = rgb(0xF44336);
    pub const GATE_BANNER: [f32; 4] = rgba(0xF44336, 0.3);
    pub const GATE_PASSED: [f32; 4] = rgba(0x4CAF50, 0.4);
    pub const GATE_PASSED_BANNER: [f32; 4] = rgba(0x4CAF50, 0.2);
    pub const FINISH_POLE: [f32; 4] = rgb(0x37474F);
    pub const FINISH_DARK: [f32; 4] = rgb(0x212121);

    pub const SKI: [f32; 4] = rgb(0x222222);
    pub const POLE: [f32; 4] = rgb(0x555555);
    pub const BASKET: [f32; 4] = rgb(0x666666);
    pub const GLOVE: [f32; 4] = rgb(0xD32F2F);

    pub const PANEL: [f32; 4] = rgba(0x000000, 0.55);
    pub const PANEL_LIGHT: [f32; 4] = rgba(0x000000, 0.4);
    pub const TITLE_CARD: [f32; 4] = rgba(0x000000, 0.65);
    pub const INSTRUCTIONS: [f32; 4] = rgba(0x000000, 0.5);
    pub const BAR_TRACK: [f32; 4] = rgba(0xFFFFFF, 0.2);
    pub const SPEED: [f32; 4] = rgb(0x4FC3F7);
    pub const SPEED_HOT: [f32; 4] = rgb(0xFF5722);
    pub const PROGRESS: [f32; 4] = rgb(0xFFC107);
    pub const BUTTON: [f32; 4] = rgb(0xD32F2F);
    pub const BUTTON_SECONDARY: [f32; 4] = rgba(0xFFFFFF, 0.2);
    pub const OVERLAY: [f32; 4] = rgba(0x000000, 0.55);
    pub const TURN_GLOW: [f32; 4] = rgba(0xFFFFFF, 0.15);

    pub const TIER_GREEN: [f32; 4] = rgb(0x4CAF50);
    pub const TIER_BLUE: [f32; 4] = rgb(0x2196F3);
    pub const TIER_BLACK: [f32; 4] = rgb(0x555555);
    pub const TIER_DOUBLE_BLACK: [f32; 4] = rgb(0xD32F2F);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(rgb(0xFFFFFF), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0, 1.0]);
        let c = rgba(0xFF8000, 0.5);
        assert_eq!(c[0], 1.0);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 0.5);
    }
}
