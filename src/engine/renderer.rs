use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlImageElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlShader,
    WebGlTexture, WebGlUniformLocation,
};
use nalgebra::Matrix4;
use std::cell::Cell;
use std::rc::Rc;
use crate::engine::mesh::{Mesh, FLOATS_PER_VERTEX};
use wasm_bindgen::JsCast;

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aColor;
    attribute vec2 aTexCoord;
    uniform mat4 uModelViewProjection;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    void main() {
        gl_Position = uModelViewProjection * vec4(aPosition, 1.0);
        vColor = aColor;
        vTexCoord = aTexCoord;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    uniform sampler2D uTexture;
    uniform int uUseTexture;
    uniform vec3 uUniformColor;
    uniform bool uUseUniformColor;
    uniform float uAlpha;

    void main() {
        vec3 color;
        if (uUseUniformColor) {
            color = uUniformColor;
        } else {
            color = vColor;
        }

        if (uUseTexture == 1) {
            color *= texture2D(uTexture, vTexCoord).rgb;
        }

        gl_FragColor = vec4(color, uAlpha);
    }
"#;

const SPHERE_SLICES: u16 = 48;
const SPHERE_STACKS: u16 = 24;
const STRIDE: i32 = (FLOATS_PER_VERTEX * 4) as i32;

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    program: WebGlProgram,
    mvp_location: WebGlUniformLocation,
    u_uniform_color_location: WebGlUniformLocation,
    u_use_uniform_color_location: WebGlUniformLocation,
    u_use_texture_location: WebGlUniformLocation,
    u_alpha_location: WebGlUniformLocation,
    unit_sphere_vertex_buffer: WebGlBuffer,
    unit_sphere_index_buffer: WebGlBuffer,
    unit_sphere_index_count: i32,
    unit_circle_buffer: WebGlBuffer,
    unit_circle_vertex_count: i32,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let mvp_location = gl.get_uniform_location(&program, "uModelViewProjection")
            .ok_or("Failed to get uniform location")?;
        let u_uniform_color_location = gl.get_uniform_location(&program, "uUniformColor")
            .ok_or("Failed to get uUniformColor location")?;
        let u_use_uniform_color_location = gl.get_uniform_location(&program, "uUseUniformColor")
            .ok_or("Failed to get uUseUniformColor location")?;
        let u_use_texture_location = gl.get_uniform_location(&program, "uUseTexture")
            .ok_or("Failed to get uUseTexture location")?;
        let u_alpha_location = gl.get_uniform_location(&program, "uAlpha")
            .ok_or("Failed to get uAlpha location")?;

        // Every body is this one sphere, scaled and placed by its model matrix.
        let unit_sphere_vertex_buffer = gl.create_buffer().ok_or("Failed to create unit sphere buffer")?;
        let unit_sphere_index_buffer = gl.create_buffer().ok_or("Failed to create unit sphere index buffer")?;
        let unit_sphere = Mesh::sphere(1.0, SPHERE_SLICES, SPHERE_STACKS);

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&unit_sphere_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&unit_sphere.vertices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::STATIC_DRAW
            );
        }

        gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&unit_sphere_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&unit_sphere.indices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::STATIC_DRAW
            );
        }
        let unit_sphere_index_count = unit_sphere.indices.len() as i32;

        let unit_circle_buffer = gl.create_buffer().ok_or("Failed to create unit circle buffer")?;

        gl.uniform1f(Some(&u_alpha_location), 1.0);

        Ok(Renderer {
            gl,
            program,
            mvp_location,
            u_uniform_color_location,
            u_use_uniform_color_location,
            u_use_texture_location,
            u_alpha_location,
            unit_sphere_vertex_buffer,
            unit_sphere_index_buffer,
            unit_sphere_index_count,
            unit_circle_buffer,
            unit_circle_vertex_count: 0,
        })
    }

    /// Uploads the shared orbit ring once; `draw_ring` reuses it for every body.
    pub fn upload_unit_circle(&mut self, vertices: &[f32]) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.unit_circle_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::STATIC_DRAW
            );
        }
        self.unit_circle_vertex_count = (vertices.len() / 3) as i32;
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn enable_blend(&self) {
        self.gl.enable(WebGlRenderingContext::BLEND);
        self.gl.blend_func(WebGlRenderingContext::SRC_ALPHA, WebGlRenderingContext::ONE_MINUS_SRC_ALPHA);
    }

    pub fn disable_blend(&self) {
        self.gl.disable(WebGlRenderingContext::BLEND);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    pub fn draw_sphere(&self, model: &Matrix4<f32>, color: (f32, f32, f32), texture: Option<&WebGlTexture>, projection: &Matrix4<f32>, view: &Matrix4<f32>) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.unit_sphere_vertex_buffer));
        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.unit_sphere_index_buffer));

        let pos_loc = self.gl.get_attrib_location(&self.program, "aPosition") as u32;
        let col_loc = self.gl.get_attrib_location(&self.program, "aColor") as u32;
        let tex_loc = self.gl.get_attrib_location(&self.program, "aTexCoord") as u32;

        self.gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, STRIDE, 0);
        self.gl.enable_vertex_attrib_array(pos_loc);

        self.gl.vertex_attrib_pointer_with_i32(col_loc, 3, WebGlRenderingContext::FLOAT, false, STRIDE, 12);
        self.gl.enable_vertex_attrib_array(col_loc);

        self.gl.vertex_attrib_pointer_with_i32(tex_loc, 2, WebGlRenderingContext::FLOAT, false, STRIDE, 24);
        self.gl.enable_vertex_attrib_array(tex_loc);

        if let Some(tex) = texture {
            self.gl.active_texture(WebGlRenderingContext::TEXTURE0);
            self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(tex));
            self.gl.uniform1i(Some(&self.u_use_texture_location), 1);
        } else {
            self.gl.uniform1i(Some(&self.u_use_texture_location), 0);
        }
        self.gl.uniform1i(Some(&self.u_use_uniform_color_location), 1);
        self.gl.uniform3f(Some(&self.u_uniform_color_location), color.0, color.1, color.2);
        self.gl.uniform1f(Some(&self.u_alpha_location), 1.0);

        self.set_mvp(&(projection * view * model));

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            self.unit_sphere_index_count,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0
        );
    }

    pub fn draw_ring(&self, model: &Matrix4<f32>, color: (f32, f32, f32), alpha: f32, projection: &Matrix4<f32>, view: &Matrix4<f32>) {
        if self.unit_circle_vertex_count == 0 {
            return;
        }
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.unit_circle_buffer));

        let pos_loc = self.gl.get_attrib_location(&self.program, "aPosition") as u32;
        let col_loc = self.gl.get_attrib_location(&self.program, "aColor") as u32;
        let tex_loc = self.gl.get_attrib_location(&self.program, "aTexCoord") as u32;

        self.gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(pos_loc);

        self.gl.disable_vertex_attrib_array(col_loc);
        self.gl.disable_vertex_attrib_array(tex_loc);

        self.gl.uniform1i(Some(&self.u_use_uniform_color_location), 1);
        self.gl.uniform1i(Some(&self.u_use_texture_location), 0);
        self.gl.uniform3f(Some(&self.u_uniform_color_location), color.0, color.1, color.2);
        self.gl.uniform1f(Some(&self.u_alpha_location), alpha);

        self.set_mvp(&(projection * view * model));

        self.gl.draw_arrays(WebGlRenderingContext::LINE_LOOP, 0, self.unit_circle_vertex_count);
    }

    fn set_mvp(&self, mvp: &Matrix4<f32>) {
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, mvp.as_slice());
    }

    /// Starts loading `url` into a new texture. The texture is usable right away (a single grey
    /// pixel) and picks up the image once it has downloaded. `failed` is raised if the image
    /// cannot be fetched, decoded or uploaded.
    pub fn create_texture(&self, url: &str, failed: Rc<Cell<bool>>) -> Result<WebGlTexture, JsValue> {
        let texture = self.gl.create_texture().ok_or("Failed to create texture")?;
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));

        let pixel = [128u8, 128, 128, 255];
        self.gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            WebGlRenderingContext::TEXTURE_2D,
            0,
            WebGlRenderingContext::RGBA as i32,
            1,
            1,
            0,
            WebGlRenderingContext::RGBA,
            WebGlRenderingContext::UNSIGNED_BYTE,
            Some(&pixel),
        )?;

        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));

        let gl = self.gl.clone();
        let texture_clone = texture.clone();
        let img_clone = img.clone();
        let source = url.to_string();
        let upload_failed = failed.clone();

        let onload = Closure::wrap(Box::new(move || {
            gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture_clone));
            let uploaded = gl.tex_image_2d_with_u32_and_u32_and_image(
                WebGlRenderingContext::TEXTURE_2D, 0, WebGlRenderingContext::RGBA as i32, WebGlRenderingContext::RGBA, WebGlRenderingContext::UNSIGNED_BYTE, &img_clone
            );
            if uploaded.is_err() {
                web_sys::console::warn_1(&format!("Could not upload texture {source}").into());
                upload_failed.set(true);
                return;
            }

            if is_power_of_2(img_clone.width()) && is_power_of_2(img_clone.height()) {
                gl.generate_mipmap(WebGlRenderingContext::TEXTURE_2D);
            } else {
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_S, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_T, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_MIN_FILTER, WebGlRenderingContext::LINEAR as i32);
            }
        }) as Box<dyn FnMut()>);

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let source = url.to_string();
        let onerror = Closure::wrap(Box::new(move || {
            web_sys::console::warn_1(&format!("Could not load texture {source}, using the body color").into());
            failed.set(true);
        }) as Box<dyn FnMut()>);

        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        img.set_src(url);

        Ok(texture)
    }
}

fn is_power_of_2(value: u32) -> bool {
    value != 0 && (value & (value - 1)) == 0
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(JsValue::from_str(&gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(JsValue::from_str(&gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_detection() {
        assert!(is_power_of_2(512));
        assert!(is_power_of_2(1));
        assert!(!is_power_of_2(0));
        assert!(!is_power_of_2(1000));
    }
}
