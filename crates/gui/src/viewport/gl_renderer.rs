use glam::{Mat4, Vec3};
use glow::HasContext;

use super::mesh::{MeshData, VERTEX_STRIDE};

/// Ambient light intensity (white)
pub const AMBIENT_INTENSITY: f32 = 0.6;
/// Directional light intensity (white)
pub const DIRECTIONAL_INTENSITY: f32 = 1.0;
/// Direction the directional light shines from
pub const LIGHT_POSITION: Vec3 = Vec3::new(1.0, 3.0, 1.0);

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Visible part of the viewport, same layout
    pub scissor: [f32; 4],
    pub view_projection: Mat4,
    pub model: Mat4,
    /// `None` keeps whatever egui painted underneath
    pub clear_color: Option<[f32; 3]>,
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

impl GpuMesh {
    fn delete(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ibo);
        }
    }
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    program: glow::Program,
    mesh: Option<GpuMesh>,
    /// Version of the uploaded mesh, `None` before the first sync
    mesh_version: Option<u64>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        Ok(Self {
            program,
            mesh: None,
            mesh_version: None,
        })
    }

    /// Replace the GPU mesh when `version` differs from the uploaded one
    pub fn sync_mesh(&mut self, gl: &glow::Context, mesh: Option<&MeshData>, version: u64) {
        if self.mesh_version == Some(version) {
            return;
        }
        self.mesh_version = Some(version);

        if let Some(old) = self.mesh.take() {
            old.delete(gl);
        }

        if let Some(data) = mesh.filter(|m| !m.is_empty()) {
            match upload_mesh(gl, data) {
                Ok(gpu) => self.mesh = Some(gpu),
                Err(e) => tracing::error!("Mesh upload failed: {e}"),
            }
        }
    }

    /// Render the model
    pub fn paint(&self, gl: &glow::Context, params: &RenderParams) {
        let [x, y, w, h] = params.viewport.map(|v| v as i32);
        let [sx, sy, sw, sh] = params.scissor.map(|v| v as i32);

        unsafe {
            gl.viewport(x, y, w, h);
            gl.scissor(sx, sy, sw, sh);
            gl.enable(glow::SCISSOR_TEST);

            match params.clear_color {
                Some([r, g, b]) => {
                    gl.clear_color(r, g, b, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
                }
                None => gl.clear(glow::DEPTH_BUFFER_BIT),
            }

            if let Some(mesh) = &self.mesh {
                gl.enable(glow::DEPTH_TEST);
                gl.depth_func(glow::LESS);

                gl.use_program(Some(self.program));
                let mvp = params.view_projection * params.model;
                set_uniform_mat4(gl, self.program, "u_mvp", &mvp);
                set_uniform_mat4(gl, self.program, "u_model", &params.model);
                set_uniform_vec3(gl, self.program, "u_light_dir", &LIGHT_POSITION.normalize());
                set_uniform_f32(gl, self.program, "u_ambient", AMBIENT_INTENSITY);
                set_uniform_f32(gl, self.program, "u_light_intensity", DIRECTIONAL_INTENSITY);

                gl.bind_vertex_array(Some(mesh.vao));
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
                gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
                gl.bind_vertex_array(None);

                gl.disable(glow::DEPTH_TEST);
                gl.use_program(None);
            }

            gl.disable(glow::SCISSOR_TEST);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        if let Some(mesh) = self.mesh.take() {
            mesh.delete(gl);
        }
        unsafe {
            gl.delete_program(self.program);
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (VERTEX_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;
        let mut shaders = Vec::with_capacity(2);

        for (kind, src) in [
            (glow::VERTEX_SHADER, vert_src),
            (glow::FRAGMENT_SHADER, frag_src),
        ] {
            let shader = gl.create_shader(kind)?;
            gl.shader_source(shader, src);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                return Err(format!("shader error: {}", gl.get_shader_info_log(shader)));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            return Err(format!("program link error: {}", gl.get_program_info_log(program)));
        }

        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform mat4 u_model;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    // Uniform scale only, so the upper 3x3 is enough for normals
    v_normal = mat3(u_model) * a_normal;
    v_color = a_color;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;
uniform float u_ambient;
uniform float u_light_intensity;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = max(dot(n, u_light_dir), 0.0);
    float light = u_ambient + diffuse * u_light_intensity;
    frag_color = vec4(min(v_color * light, vec3(1.0)), 1.0);
}
"#;
