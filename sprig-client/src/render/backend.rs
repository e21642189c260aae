//! The GL paint target for the UI core.
//!
//! Converts the shape batch into quad meshes, batching consecutive shapes
//! that share a render mode into a single draw. Shapes are drawn in
//! submission order with depth testing left off; depth values are for the
//! host's own layering against other passes.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec4, vec2};

use sprig_core::{PaintTarget, Rect, Shape, TextMetrics};

use crate::{
    abs::{Mesh, ShaderProgram, TextureHandle, Vertex},
    render::font::Font,
};

/// Vertex layout shared by all UI meshes.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct UIVertex {
    pub position: Vec2,
    pub uv: Vec2,
}

impl Vertex for UIVertex {
    fn vertex_attribs(gl: &glow::Context) {
        use glow::HasContext;
        unsafe {
            let stride = std::mem::size_of::<UIVertex>() as i32;
            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            // UV attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                2 * std::mem::size_of::<f32>() as i32,
            );
        }
    }
}

/// The rendering mode for a batch of UI geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
enum UIRenderMode {
    Texture(TextureHandle, Vec4),
    Color(Vec4),
}

/// Renders the UI core's shape batch with glow.
pub struct GLPaintTarget {
    gl: Arc<glow::Context>,
    shader_program: ShaderProgram,
    pub projection_matrix: Mat4,
    font: Font,
    mode: Option<UIRenderMode>,
    vertices: Vec<UIVertex>,
    indices: Vec<u32>,
}

impl GLPaintTarget {
    /// Creates a new paint target drawing with the given shader program
    /// and font.
    pub fn new(
        gl: &Arc<glow::Context>,
        shader_program: ShaderProgram,
        projection_matrix: Mat4,
        font: Font,
    ) -> Self {
        Self {
            gl: Arc::clone(gl),
            shader_program,
            projection_matrix,
            font,
            mode: None,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Switches render mode, flushing the current batch if it differs.
    fn set_mode(&mut self, mode: UIRenderMode) {
        if self.mode != Some(mode) {
            self.flush();
            self.mode = Some(mode);
        }
    }

    fn append_quad(&mut self, corners: [Vec2; 4], uvs: [Vec2; 4]) {
        let base = self.vertices.len() as u32;
        for (position, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(UIVertex { position, uv });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn append_rect(&mut self, min: Vec2, max: Vec2, uv_min: Vec2, uv_max: Vec2) {
        self.append_quad(
            [
                vec2(max.x, min.y),
                vec2(min.x, min.y),
                vec2(min.x, max.y),
                vec2(max.x, max.y),
            ],
            [
                vec2(uv_max.x, uv_min.y),
                uv_min,
                vec2(uv_min.x, uv_max.y),
                uv_max,
            ],
        );
    }

    fn append_triangle(&mut self, points: [Vec2; 3]) {
        let base = self.vertices.len() as u32;
        for position in points {
            self.vertices.push(UIVertex {
                position,
                uv: Vec2::ZERO,
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Builds and draws the batched mesh for the current mode.
    fn flush(&mut self) {
        let Some(mode) = self.mode.take() else {
            return;
        };
        if self.vertices.is_empty() {
            return;
        }

        let mesh = Mesh::new(&self.gl, &self.vertices, &self.indices, glow::TRIANGLES);
        self.shader_program.use_program();
        self.shader_program
            .set_uniform("u_projection", self.projection_matrix);
        match mode {
            UIRenderMode::Texture(handle, color) => {
                handle.bind(&self.gl, 0);
                self.shader_program.set_uniform("u_tex", 0);
                self.shader_program.set_uniform("u_color", color);
                self.shader_program.set_uniform("u_solid", false);
            }
            UIRenderMode::Color(color) => {
                self.shader_program.set_uniform("u_color", color);
                self.shader_program.set_uniform("u_solid", true);
            }
        }
        mesh.draw();

        self.vertices.clear();
        self.indices.clear();
    }

    fn text_origin(rect: Rect, measured: Vec2, centered: bool) -> Vec2 {
        if centered {
            rect.pos + (rect.size - measured) * 0.5
        } else {
            vec2(rect.pos.x, rect.pos.y + (rect.size.y - measured.y) * 0.5)
        }
    }
}

impl PaintTarget for GLPaintTarget {
    fn submit(&mut self, shapes: &[Shape]) {
        for shape in shapes {
            match shape {
                Shape::Rect { rect, color, .. } => {
                    self.set_mode(UIRenderMode::Color(*color));
                    self.append_rect(rect.min(), rect.max(), Vec2::ZERO, Vec2::ZERO);
                }
                Shape::TexturedRect { rect, uv, tint, .. } => {
                    // Textured rects sample the UI atlas.
                    self.set_mode(UIRenderMode::Texture(self.font.atlas_handle(), *tint));
                    self.append_rect(rect.min(), rect.max(), uv[0], uv[1]);
                }
                Shape::Line {
                    from,
                    to,
                    width,
                    color,
                    ..
                } => {
                    self.set_mode(UIRenderMode::Color(*color));
                    let dir = (*to - *from).normalize_or_zero();
                    let normal = vec2(-dir.y, dir.x) * (*width * 0.5);
                    self.append_quad(
                        [*from + normal, *from - normal, *to - normal, *to + normal],
                        [Vec2::ZERO; 4],
                    );
                }
                Shape::Polygon { points, color, .. } => {
                    self.set_mode(UIRenderMode::Color(*color));
                    for i in 1..points.len().saturating_sub(1) {
                        self.append_triangle([points[0], points[i], points[i + 1]]);
                    }
                }
                Shape::Text {
                    text,
                    rect,
                    size,
                    color,
                    centered,
                    ..
                } => {
                    self.set_mode(UIRenderMode::Texture(self.font.atlas_handle(), *color));
                    let measured = Font::metrics().measure(text, *size);
                    let origin = Self::text_origin(*rect, measured, *centered);
                    for quad in self.font.layout(text, origin, *size) {
                        self.append_rect(quad.min, quad.max, quad.uv_min, quad.uv_max);
                    }
                }
            }
        }
        self.flush();
    }
}
