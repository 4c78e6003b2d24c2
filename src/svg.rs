//! SVG serialisation of a frame.

use std::fmt::{self, Write};

use crate::arcs::Frame;
use crate::config::Palette;
use crate::polar::VIEW_BOX;

/// Renders every visible arc of `frame` into a standalone SVG document.
pub fn render_frame(frame: &Frame, palette: &Palette) -> String {
    let mut svg = String::new();
    // Writing into a String never fails.
    let _ = write_document(&mut svg, frame, palette);
    svg
}

fn write_document(out: &mut impl Write, frame: &Frame, palette: &Palette) -> fmt::Result {
    writeln!(
        out,
        r#"<svg viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg">"#,
        size = VIEW_BOX
    )?;
    writeln!(
        out,
        r#"  <g transform="rotate({} {} {})">"#,
        frame.transform.rotation_degrees(),
        frame.center.x,
        frame.center.y
    )?;

    for arc in frame.visible_arcs() {
        writeln!(
            out,
            r#"    <path d="{}" stroke="{}" stroke-width="{}" stroke-linecap="round" fill="transparent"/>"#,
            arc.to_svg_path(),
            arc.resolve_color(palette).to_hex(),
            arc.stroke_width
        )?;
    }

    out.write_str("  </g>\n</svg>\n")
}
