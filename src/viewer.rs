// ============================================================================
// WINDOWED VIEWER
// ============================================================================
//
// Rasterises gauge frames into a pixels buffer. Arcs are drawn per pixel
// with an angular test against the arc span, plus round caps.

use std::f64::consts::TAU;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::arcs::{ArcDescriptor, Frame};
use crate::config::{Color, Palette};
use crate::error::Result;
use crate::gauge::Speedometer;
use crate::polar::{percentage_to_angle, percentage_to_radians, VIEW_BOX};
use crate::GaugeCommand;

impl Speedometer {
    /// Opens a window and animates the gauge until it is closed.
    pub fn show(&mut self, title: &str) -> Result<()> {
        self.run_window(title, None)
    }

    /// Like [`Speedometer::show`], applying commands as they arrive.
    pub fn show_with_commands(
        &mut self,
        title: &str,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<()> {
        self.run_window(title, Some(receiver))
    }

    fn run_window(&mut self, title: &str, receiver: Option<Receiver<GaugeCommand>>) -> Result<()> {
        let logical_width = self.config().window_width;
        let logical_height = self.config().window_height;
        let palette = self.config().palette;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(
                logical_width as f64,
                logical_height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);

        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / self.config().max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        info!(width = fb_width, height = fb_height, "viewer window opened");

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        self.teardown();
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize pixel buffer");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize surface");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                debug!(?command, "applying command");
                                self.apply(command, now);
                            }
                        }
                        self.poll(now);

                        let gauge_frame = self.frame();
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        render_frame(&mut canvas, &gauge_frame, &palette);
                        if let Err(err) = pixels.render() {
                            warn!(%err, "failed to present frame");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: Color) {
        let (r, g, b) = color.as_tuple();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, 0xff]);
        }
    }

    /// Pixels per view box unit, keeping the gauge square and centred.
    fn scale(&self) -> (f64, f64, f64) {
        let side = self.width.min(self.height) as f64;
        let scale = side / VIEW_BOX;
        let left = (self.width as f64 - side) / 2.0;
        let top = (self.height as f64 - side) / 2.0;
        (scale, left, top)
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn render_frame(canvas: &mut Canvas, frame: &Frame, palette: &Palette) {
    canvas.clear(palette.background);
    let (scale, left, top) = canvas.scale();
    let cx = left + frame.center.x * scale;
    let cy = top + frame.center.y * scale;

    for arc in frame.visible_arcs() {
        render_arc(canvas, arc, cx, cy, scale, frame.transform.rotation, palette);
    }
}

fn render_arc(
    canvas: &mut Canvas,
    arc: &ArcDescriptor,
    cx: f64,
    cy: f64,
    scale: f64,
    rotation: f64,
    palette: &Palette,
) {
    let color = arc.resolve_color(palette).as_tuple();
    let radius = arc.radius * scale;
    let half_thickness = arc.stroke_width * scale / 2.0;
    let start_angle = percentage_to_angle(arc.to_percent) + rotation;
    let arc_span = percentage_to_radians(arc.render_length()).clamp(0.0, TAU);

    let min_x = (cx - radius - half_thickness - 1.0).floor().max(0.0) as i32;
    let max_x = (cx + radius + half_thickness + 1.0).ceil() as i32;
    let min_y = (cy - radius - half_thickness - 1.0).floor().max(0.0) as i32;
    let max_y = (cy + radius + half_thickness + 1.0).ceil() as i32;

    if arc_span > 0.0 {
        for y in min_y..=max_y.min(canvas.height as i32 - 1) {
            for x in min_x..=max_x.min(canvas.width as i32 - 1) {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                let angle = dy.atan2(dx);
                if (angle - start_angle).rem_euclid(TAU) > arc_span {
                    continue;
                }
                let dist = (dx * dx + dy * dy).sqrt();
                let edge = (dist - radius).abs() - half_thickness;
                let aa = (1.0 - edge.clamp(0.0, 1.0)) as f32;
                if edge < 1.0 && aa > 0.0 {
                    set_pixel(canvas.frame, canvas.width, x as usize, y as usize, color, aa);
                }
            }
        }
    }

    // Round line caps
    for angle in [start_angle, start_angle + arc_span] {
        draw_circle(
            canvas,
            cx + angle.cos() * radius,
            cy + angle.sin() * radius,
            half_thickness,
            color,
        );
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: (u8, u8, u8), alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let src = [color.0 as f32, color.1 as f32, color.2 as f32];
        let blend = |s: f32, d: u8| (s * alpha + d as f32 * (1.0 - alpha)).round() as u8;
        let out = [
            blend(src[0], frame[idx]),
            blend(src[1], frame[idx + 1]),
            blend(src[2], frame[idx + 2]),
            0xff,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

fn draw_circle(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: (u8, u8, u8)) {
    let reach = radius.ceil() as i32 + 1;
    let (px0, py0) = (cx.round() as i32, cy.round() as i32);
    for y in -reach..=reach {
        for x in -reach..=reach {
            let px = px0 + x;
            let py = py0 + y;
            if px < 0 || py < 0 || px as usize >= canvas.width || py as usize >= canvas.height {
                continue;
            }
            let dist = ((px as f64 - cx).powi(2) + (py as f64 - cy).powi(2)).sqrt();
            let aa = if dist > radius {
                1.0 - (dist - radius).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                set_pixel(canvas.frame, canvas.width, px as usize, py as usize, color, aa as f32);
            }
        }
    }
}
