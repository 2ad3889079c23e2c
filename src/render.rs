use std::io::Write;

use glam::Vec3;

use crate::config::RenderConfig;
use crate::error::ConfigError;
use crate::noise::{NoiseKernel, MAX_OCTAVES};
use crate::svm::{
    eval_nodes, NoiseNode, NoiseOutputs, ProgramBuilder, RegisterStack, ShaderProgram,
};

/// A rendered noise image, row-major from the top-left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
    /// Present only when the config asked for color output.
    pub colors: Option<Vec<Vec3>>,
}

impl Frame {
    pub fn value_at(&self, x: u32, y: u32) -> Option<f32> {
        self.values.get(self.index(x, y)?).copied()
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<Vec3> {
        let i = self.index(x, y)?;
        self.colors.as_ref()?.get(i).copied()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

/// Program plus the slot layout it was built with.
struct CompiledTexture {
    program: ShaderProgram,
    vector_slot: u32,
    outputs: NoiseOutputs,
}

fn compile(config: &RenderConfig) -> Result<CompiledTexture, ConfigError> {
    let mut builder = ProgramBuilder::new();
    let vector_slot = builder.alloc(3)?;
    let dimensions = config.noise_dimensions()?;
    let node = NoiseNode {
        want_color: config.color,
        ..NoiseNode::with_params(dimensions, Some(vector_slot), config.w, config.params)
    };
    let outputs = builder.tex_noise(&node)?;
    Ok(CompiledTexture {
        program: builder.finish(),
        vector_slot,
        outputs,
    })
}

/// Shading-space point sampled for the center of pixel `(px, py)`.
#[allow(clippy::cast_precision_loss)]
pub fn pixel_point(config: &RenderConfig, px: u32, py: u32) -> Vec3 {
    let [ox, oy, oz] = config.origin;
    let [ex, ey] = config.extent;
    let u = (px as f32 + 0.5) / config.width as f32;
    let v = (py as f32 + 0.5) / config.height as f32;
    Vec3::new(ox + u * ex, oy + v * ey, oz)
}

/// Evaluate the noise texture once per pixel of the configured grid.
///
/// Every pixel runs the same compiled node program on a fresh register stack,
/// with the pixel's coordinate preloaded into the vector slot.
pub fn render<K: NoiseKernel + ?Sized>(
    kernel: &K,
    config: &RenderConfig,
) -> Result<Frame, ConfigError> {
    config.validate()?;
    if config.params.detail > MAX_OCTAVES {
        log::warn!(
            "[noisetex] detail {} exceeds {MAX_OCTAVES} octaves and will be clamped",
            config.params.detail
        );
    }
    let compiled = compile(config)?;
    log::debug!(
        "[noisetex] compiled {} node(s) for {}D noise",
        compiled.program.nodes.len(),
        config.dimensions
    );

    let pixel_count = config.width as usize * config.height as usize;
    let mut values = Vec::with_capacity(pixel_count);
    let mut colors = config.color.then(|| Vec::with_capacity(pixel_count));
    let mut stack = RegisterStack::new();

    for py in 0..config.height {
        for px in 0..config.width {
            stack.clear();
            stack.store_float3(compiled.vector_slot, pixel_point(config, px, py));
            eval_nodes(kernel, &compiled.program, &mut stack)?;

            values.push(compiled.outputs.value.map_or(0.0, |slot| stack.load_float(slot)));
            if let (Some(colors), Some(slot)) = (colors.as_mut(), compiled.outputs.color) {
                colors.push(stack.load_float3(slot));
            }
        }
    }

    log::info!("[noisetex] rendered {}x{} texture", config.width, config.height);
    Ok(Frame {
        width: config.width,
        height: config.height,
        values,
        colors,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(v: f32) -> u8 {
    // NaN clamps to 0 through the saturating cast.
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Write the scalar values as a binary 8-bit PGM.
pub fn write_pgm(frame: &Frame, out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "P5\n{} {}\n255\n", frame.width, frame.height)?;
    let bytes: Vec<u8> = frame.values.iter().map(|&v| to_byte(v)).collect();
    out.write_all(&bytes)
}

/// Write the color output as a binary 8-bit PPM. Falls back to grey from the
/// scalar values when the frame carries no color.
pub fn write_ppm(frame: &Frame, out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", frame.width, frame.height)?;
    let bytes: Vec<u8> = match &frame.colors {
        Some(colors) => colors
            .iter()
            .flat_map(|c| [to_byte(c.x), to_byte(c.y), to_byte(c.z)])
            .collect(),
        None => frame
            .values
            .iter()
            .flat_map(|&v| {
                let b = to_byte(v);
                [b, b, b]
            })
            .collect(),
    };
    out.write_all(&bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::noise::PerlinKernel;
    use crate::texture::{tex_noise_2d, tex_noise_3d, NoiseParameters};

    fn small(dimensions: u32, color: bool) -> RenderConfig {
        RenderConfig {
            width: 4,
            height: 3,
            dimensions,
            color,
            params: NoiseParameters { detail: 1.5, distortion: 0.25, scale: 3.0 },
            ..RenderConfig::default()
        }
    }

    #[test]
    fn pixel_centers_span_the_extent() {
        let config = RenderConfig {
            width: 2,
            height: 2,
            origin: [1.0, 2.0, 3.0],
            extent: [4.0, 8.0],
            ..RenderConfig::default()
        };
        assert_eq!(pixel_point(&config, 0, 0), Vec3::new(2.0, 4.0, 3.0));
        assert_eq!(pixel_point(&config, 1, 1), Vec3::new(4.0, 8.0, 3.0));
    }

    #[test]
    fn frame_matches_direct_evaluation() {
        let config = small(3, true);
        let frame = render(&PerlinKernel, &config).unwrap();
        assert_eq!(frame.values.len(), 12);

        let p = pixel_point(&config, 2, 1) * config.params.scale;
        let expected = tex_noise_3d(&PerlinKernel, p, 1.5, 0.25, true);
        assert_eq!(frame.value_at(2, 1), Some(expected.value));
        assert_eq!(frame.color_at(2, 1), expected.color);
    }

    #[test]
    fn two_d_ignores_z() {
        let mut config = small(2, false);
        config.origin[2] = 40.0;
        let frame = render(&PerlinKernel, &config).unwrap();
        let p = pixel_point(&config, 1, 0).truncate() * config.params.scale;
        let expected = tex_noise_2d(&PerlinKernel, p, 1.5, 0.25, false).value;
        assert_eq!(frame.value_at(1, 0), Some(expected));
        assert!(frame.colors.is_none());
    }

    #[test]
    fn one_d_frame_is_flat() {
        let config = RenderConfig { w: 0.3, ..small(1, false) };
        let frame = render(&PerlinKernel, &config).unwrap();
        let first = frame.values[0];
        assert!(frame.values.iter().all(|&v| v == first));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = small(0, false);
        assert!(render(&PerlinKernel, &config).is_err());
    }

    #[test]
    fn out_of_bounds_lookup() {
        let frame = render(&PerlinKernel, &small(3, false)).unwrap();
        assert_eq!(frame.value_at(4, 0), None);
        assert_eq!(frame.color_at(0, 0), None);
    }

    #[test]
    fn pgm_layout() {
        let frame = Frame {
            width: 2,
            height: 1,
            values: vec![0.0, 1.0],
            colors: None,
        };
        let mut buf = Vec::new();
        write_pgm(&frame, &mut buf).unwrap();
        assert_eq!(buf, b"P5\n2 1\n255\n\x00\xff");
    }

    #[test]
    fn ppm_uses_color_and_clamps() {
        let frame = Frame {
            width: 1,
            height: 1,
            values: vec![0.5],
            colors: Some(vec![Vec3::new(-1.0, 0.5, 2.0)]),
        };
        let mut buf = Vec::new();
        write_ppm(&frame, &mut buf).unwrap();
        assert_eq!(&buf[buf.len() - 3..], &[0, 128, 255]);
    }
}
