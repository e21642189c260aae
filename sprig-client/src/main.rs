use glam::{Mat4, Vec2, vec2};
use glow::HasContext;

use sprig_core::{
    NodeDesc, NodeFlags, PointerState, Rect, Size, Theme, UIContext, WidgetTree,
};

use crate::{
    abs::App,
    render::{Font, GLPaintTarget},
};

mod abs;
mod render;

macro_rules! shader_program {
    ($name:ident, $gl:expr) => {{
        let vert = $crate::abs::Shader::new(
            &$gl,
            glow::VERTEX_SHADER,
            include_str!(concat!("render/shaders/", stringify!($name), "/vert.glsl")),
        )?;
        let frag = $crate::abs::Shader::new(
            &$gl,
            glow::FRAGMENT_SHADER,
            include_str!(concat!("render/shaders/", stringify!($name), "/frag.glsl")),
        )?;
        $crate::abs::ShaderProgram::new(&$gl, &[&vert, &frag])?
    }};
}

fn setup_logger() -> Result<(), String> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()
        .map_err(|e| e.to_string())
}

/// Per-frame demo state. The UI itself keeps nothing; everything a widget
/// reports is applied back into this struct by the host.
struct Demo {
    tree: WidgetTree,
    window_pos: Vec2,
    show_extras: bool,
    tint: f32,
    clicks: u32,
}

impl Demo {
    fn new() -> Self {
        Self {
            tree: WidgetTree::new(),
            window_pos: vec2(240.0, 60.0),
            show_extras: false,
            tint: 0.4,
            clicks: 0,
        }
    }

    /// Builds one frame of UI. Returns `false` when the quit button was
    /// clicked.
    fn frame(&mut self, ui: &mut UIContext, viewport: Vec2) -> bool {
        self.sidebar(ui, viewport);

        let rect = Rect::new(self.window_pos, vec2(360.0, 280.0));
        if let Some(pos) = ui.window("sprig demo", rect) {
            self.window_pos = pos;
        }

        ui.begin_row(1, 30.0, 180.0);
        ui.label(&format!("clicks so far: {}", self.clicks));

        ui.begin_row(3, 44.0, 180.0);
        if ui.button("spawn") {
            self.clicks += 1;
            log::info!("spawn clicked");
        }
        if ui.button("reset") {
            self.clicks = 0;
            log::info!("counter reset");
        }
        let quit = ui.button("quit");

        ui.begin_row(1, 30.0, 180.0);
        ui.checkbox("show extras", &mut self.show_extras);

        if self.show_extras {
            ui.begin_row(1, 30.0, 180.0);
            ui.label("background tint");
            ui.begin_row(1, 30.0, 180.0);
            ui.slider(&mut self.tint, 0.0, 1.0);
        }

        !quit
    }

    /// A sidebar built with the retained tree variant: a fixed-width panel
    /// sized by its children, with clickable entries.
    fn sidebar(&mut self, ui: &mut UIContext, viewport: Vec2) {
        let root = self.tree.begin(Rect::new(Vec2::ZERO, viewport));
        let panel = self
            .tree
            .add_child(
                root,
                NodeDesc {
                    width: Size::pixels(180.0),
                    height: Size::children_sum(),
                    flags: NodeFlags {
                        draw_background: true,
                        draw_border: true,
                        ..NodeFlags::default()
                    },
                    ..NodeDesc::default()
                },
            )
            .unwrap();
        self.tree
            .add_child(
                panel,
                NodeDesc {
                    width: Size::text(),
                    height: Size::pixels(32.0),
                    flags: NodeFlags {
                        draw_text: true,
                        ..NodeFlags::default()
                    },
                    text: " scenes",
                    ..NodeDesc::default()
                },
            )
            .unwrap();

        let mut entries = Vec::new();
        for name in ["terrain", "shadows", "particles"] {
            let entry = self
                .tree
                .add_child(
                    panel,
                    NodeDesc {
                        width: Size::percent(1.0),
                        height: Size::pixels(26.0),
                        flags: NodeFlags {
                            clickable: true,
                            draw_background: true,
                            draw_text: true,
                            ..NodeFlags::default()
                        },
                        text: name,
                        ..NodeDesc::default()
                    },
                )
                .unwrap();
            entries.push((entry, name));
        }

        self.tree.resolve(&Font::metrics(), ui.theme.text_size);
        self.tree.run_interactions(ui);
        for (entry, name) in entries {
            if self.tree.node(entry).is_some_and(|n| n.interaction.clicked) {
                log::info!("scene entry clicked: {name}");
            }
        }
        ui.paint_tree(&self.tree);
    }
}

fn run() -> Result<(), String> {
    let mut app = App::new("Sprig Demo", 960, 600)?;

    unsafe {
        app.gl.enable(glow::BLEND);
        app.gl
            .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
    }

    let shader_program = shader_program!(ui, app.gl);
    let font = Font::new(&app.gl)?;

    let mut viewport = vec2(960.0, 600.0);
    let mut backend = GLPaintTarget::new(
        &app.gl,
        shader_program,
        Mat4::orthographic_rh_gl(0.0, viewport.x, viewport.y, 0.0, -1.0, 1.0),
        font,
    );
    let mut ui = UIContext::new(Theme::default(), Box::new(Font::metrics()));
    let mut demo = Demo::new();
    let mut pointer = PointerState::default();

    log::info!("sprig demo up");

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(width, height),
                    ..
                } => {
                    unsafe {
                        app.gl.viewport(0, 0, width, height);
                    }
                    viewport = vec2(width as f32, height as f32);
                    backend.projection_matrix =
                        Mat4::orthographic_rh_gl(0.0, viewport.x, viewport.y, 0.0, -1.0, 1.0);
                }
                sdl2::event::Event::MouseMotion { x, y, .. } => {
                    pointer.position = vec2(x as f32, y as f32);
                }
                sdl2::event::Event::MouseButtonDown {
                    mouse_btn: sdl2::mouse::MouseButton::Left,
                    ..
                } => {
                    pointer.down = true;
                }
                sdl2::event::Event::MouseButtonUp {
                    mouse_btn: sdl2::mouse::MouseButton::Left,
                    ..
                } => {
                    pointer.down = false;
                }
                _ => {}
            }
        }

        ui.begin_frame(pointer);
        let keep_running = demo.frame(&mut ui, viewport);

        unsafe {
            app.gl
                .clear_color(0.06 + demo.tint * 0.12, 0.07, 0.10, 1.0);
            app.gl.clear(glow::COLOR_BUFFER_BIT);
        }
        ui.render(&mut backend);
        app.window.gl_swap_window();

        if !keep_running {
            break 'running;
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = setup_logger() {
        eprintln!("failed to set up logging: {e}");
    }
    if let Err(e) = run() {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}
