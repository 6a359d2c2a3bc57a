//! Terminal display: Paints atom surfaces with ANSI escape sequences.
//!
//! Every repaint redraws the whole screen into a reusable frame buffer and
//! hands it to the writer in a single `write_all`, so the terminal never
//! shows a half-drawn frame.

use super::Display;
use crate::atom::{AtomId, VisualState};
use crate::layout::Rect;
use crate::style::markup;
use crate::style::Style;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use std::collections::BTreeMap;
use std::io::{self, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Last state pushed for one atom.
#[derive(Debug, Clone, Default)]
struct Surface {
    state: VisualState,
    visible: bool,
    /// Scroll position in percent, exactly as requested.
    scroll: f64,
}

/// A [`Display`] writing to a terminal (or anything implementing `Write`).
#[derive(Debug)]
pub struct TerminalDisplay<W: Write> {
    writer: W,
    area: Rect,
    /// Painted in atom registration order.
    surfaces: BTreeMap<AtomId, Surface>,
    /// Reused between repaints.
    frame: Vec<u8>,
    frames: u64,
}

impl TerminalDisplay<io::Stdout> {
    /// A display on stdout, sized to the current terminal.
    pub fn stdout() -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new(io::stdout(), width, height))
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Create a display of `width` x `height` cells.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            writer,
            area: Rect::from_size(width, height),
            surfaces: BTreeMap::new(),
            frame: Vec::with_capacity(usize::from(width) * usize::from(height) * 4),
            frames: 0,
        }
    }

    /// Change the screen size. Takes effect on the next repaint.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::from_size(width, height);
    }

    /// The screen area.
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// Number of completed repaints.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Where `id` would be painted on the current screen.
    pub fn resolved_area(&self, id: AtomId) -> Option<Rect> {
        self.surfaces
            .get(&id)
            .map(|surface| surface.state.geometry.resolve(self.area))
    }

    fn surface(&mut self, id: AtomId) -> &mut Surface {
        self.surfaces.entry(id).or_default()
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn apply(&mut self, id: AtomId, state: &VisualState) -> io::Result<()> {
        self.surface(id).state.clone_from(state);
        Ok(())
    }

    fn set_visible(&mut self, id: AtomId, visible: bool) -> io::Result<()> {
        self.surface(id).visible = visible;
        Ok(())
    }

    fn scroll(&mut self, id: AtomId, percentage: f64) -> io::Result<()> {
        self.surface(id).scroll = percentage;
        Ok(())
    }

    fn repaint(&mut self) -> io::Result<()> {
        self.frame.clear();
        queue!(self.frame, SetAttribute(Attribute::Reset), ResetColor, Clear(ClearType::All))?;

        for surface in self.surfaces.values().filter(|surface| surface.visible) {
            paint_surface(&mut self.frame, self.area, surface)?;
        }

        queue!(self.frame, SetAttribute(Attribute::Reset), ResetColor)?;
        self.writer.write_all(&self.frame)?;
        self.writer.flush()?;
        self.frames += 1;

        tracing::trace!(bytes = self.frame.len(), frame = self.frames, "repaint");
        Ok(())
    }
}

/// First visible line for a scroll position.
///
/// Out-of-range percentages clamp to the ends; NaN reads as the top.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn scroll_offset(max_offset: usize, percentage: f64) -> usize {
    if percentage.is_nan() {
        return 0;
    }
    let fraction = percentage.clamp(0.0, 100.0) / 100.0;
    ((max_offset as f64 * fraction).round() as usize).min(max_offset)
}

fn paint_surface(frame: &mut Vec<u8>, area: Rect, surface: &Surface) -> io::Result<()> {
    let geometry = &surface.state.geometry;
    let rect = geometry.resolve(area);
    if rect.is_empty() {
        return Ok(());
    }
    let inner = geometry.inner(rect);

    let style = surface.state.style;
    let content = &surface.state.content;
    let lines: Vec<&str> = if content.is_empty() || inner.is_empty() {
        Vec::new()
    } else {
        content.split('\n').collect()
    };

    let height = usize::from(inner.height);
    let offset = scroll_offset(lines.len().saturating_sub(height), surface.scroll);
    let width = usize::from(rect.width);
    let inner_width = usize::from(inner.width);
    let indent = usize::from(inner.x.saturating_sub(rect.x));

    for y in rect.y..rect.bottom() {
        queue!(frame, MoveTo(rect.x, y))?;
        set_style(frame, style)?;

        let line = if inner.is_empty() || y < inner.y || y >= inner.bottom() {
            None
        } else {
            lines.get(offset + usize::from(y - inner.y))
        };
        let used = match line {
            Some(line) => {
                queue!(frame, Print(" ".repeat(indent)))?;
                indent + paint_line(frame, line, style, inner_width)?
            }
            None => 0,
        };

        if used < width {
            set_style(frame, style)?;
            queue!(frame, Print(" ".repeat(width - used)))?;
        }
    }
    Ok(())
}

fn set_style(frame: &mut Vec<u8>, style: Style) -> io::Result<()> {
    queue!(
        frame,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(style.fg.into()),
        SetBackgroundColor(style.bg.into())
    )
}

/// Paint one markup line, clipped to `width` columns. Returns the columns used.
fn paint_line(frame: &mut Vec<u8>, line: &str, base: Style, width: usize) -> io::Result<usize> {
    let mut used = 0;

    for span in markup::parse(line) {
        queue!(
            frame,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(span.style.fg.unwrap_or(base.fg).into()),
            SetBackgroundColor(span.style.bg.unwrap_or(base.bg).into())
        )?;
        for attribute in span.style.modifiers.attributes() {
            queue!(frame, SetAttribute(attribute))?;
        }

        for grapheme in span.text.graphemes(true) {
            let grapheme_width = grapheme.width();
            if used + grapheme_width > width {
                return Ok(used);
            }
            queue!(frame, Print(grapheme))?;
            used += grapheme_width;
        }
    }
    Ok(used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Dimension, Geometry};
    use crate::style::Color;

    fn screen(display: &TerminalDisplay<Vec<u8>>) -> vt100::Parser {
        let area = display.area();
        let mut parser = vt100::Parser::new(area.height, area.width, 0);
        parser.process(display.writer());
        parser
    }

    fn rows(parser: &vt100::Parser) -> Vec<String> {
        let width = parser.screen().size().1;
        parser
            .screen()
            .rows(0, width)
            .map(|row| row.trim_end().to_string())
            .collect()
    }

    fn state(content: &str) -> VisualState {
        VisualState {
            content: content.to_string(),
            ..VisualState::default()
        }
    }

    #[test]
    fn test_scroll_offset_clamps() {
        assert_eq!(scroll_offset(10, 0.0), 0);
        assert_eq!(scroll_offset(10, 50.0), 5);
        assert_eq!(scroll_offset(10, 100.0), 10);
        assert_eq!(scroll_offset(10, 150.0), 10);
        assert_eq!(scroll_offset(10, -20.0), 0);
        assert_eq!(scroll_offset(10, f64::NAN), 0);
        assert_eq!(scroll_offset(0, 100.0), 0);
    }

    #[test]
    fn test_paints_visible_surfaces_only() {
        let mut display = TerminalDisplay::new(Vec::new(), 20, 4);
        let shown = AtomId::new(0);
        let hidden = AtomId::new(1);

        let mut top = state("hello");
        top.geometry.height = Dimension::cells(1);
        display.apply(shown, &top).unwrap();
        display.set_visible(shown, true).unwrap();

        let mut below = state("secret");
        below.geometry.top = Dimension::cells(2);
        display.apply(hidden, &below).unwrap();
        display.repaint().unwrap();

        let parser = screen(&display);
        assert_eq!(rows(&parser), vec!["hello", "", "", ""]);
        assert_eq!(display.frames(), 1);
    }

    #[test]
    fn test_scroll_selects_window() {
        let mut display = TerminalDisplay::new(Vec::new(), 10, 2);
        let id = AtomId::new(0);
        display.apply(id, &state("a\nb\nc\nd")).unwrap();
        display.set_visible(id, true).unwrap();

        display.scroll(id, 100.0).unwrap();
        display.repaint().unwrap();
        assert_eq!(rows(&screen(&display)), vec!["c", "d"]);

        display.scroll(id, 0.0).unwrap();
        display.repaint().unwrap();
        assert_eq!(rows(&screen(&display)), vec!["a", "b"]);

        // Out of range is clamped by the display.
        display.scroll(id, 250.0).unwrap();
        display.repaint().unwrap();
        assert_eq!(rows(&screen(&display)), vec!["c", "d"]);
    }

    #[test]
    fn test_markup_and_clipping() {
        let mut display = TerminalDisplay::new(Vec::new(), 6, 1);
        let id = AtomId::new(0);
        display.apply(id, &state("{bold}ab{/bold}{red-fg}cdefgh")).unwrap();
        display.set_visible(id, true).unwrap();
        display.repaint().unwrap();

        let parser = screen(&display);
        assert_eq!(rows(&parser), vec!["abcdef"]);

        let screen = parser.screen();
        let bold = screen.cell(0, 0).unwrap();
        assert!(bold.bold());
        let red = screen.cell(0, 2).unwrap();
        assert!(!red.bold());
        assert_eq!(red.fgcolor(), vt100::Color::Idx(1));
    }

    #[test]
    fn test_wide_graphemes_are_not_split() {
        let mut display = TerminalDisplay::new(Vec::new(), 3, 1);
        let id = AtomId::new(0);
        display.apply(id, &state("日本語")).unwrap();
        display.set_visible(id, true).unwrap();
        display.repaint().unwrap();

        assert_eq!(rows(&screen(&display)), vec!["日"]);
    }

    #[test]
    fn test_background_fills_resolved_area() {
        let mut display = TerminalDisplay::new(Vec::new(), 10, 3);
        let id = AtomId::new(0);
        let pane = VisualState {
            geometry: Geometry {
                left: Dimension::percent(50.0),
                width: Dimension::percent(50.0),
                ..Geometry::default()
            },
            style: Style::new(Color::Reset, Color::Ansi(4)),
            content: String::new(),
        };
        display.apply(id, &pane).unwrap();
        display.set_visible(id, true).unwrap();
        display.repaint().unwrap();

        assert_eq!(display.resolved_area(id), Some(Rect::new(5, 0, 5, 3)));
        let parser = screen(&display);
        let screen = parser.screen();
        assert_eq!(screen.cell(1, 7).unwrap().bgcolor(), vt100::Color::Idx(4));
        assert_eq!(screen.cell(1, 2).unwrap().bgcolor(), vt100::Color::Default);
    }

    #[test]
    fn test_padding_insets_content() {
        let mut display = TerminalDisplay::new(Vec::new(), 8, 4);
        let id = AtomId::new(0);
        let pane = VisualState {
            geometry: Geometry {
                padding: 1,
                ..Geometry::default()
            },
            style: Style::new(Color::Reset, Color::Ansi(4)),
            content: "a\nb\nc\nlong line".to_string(),
        };
        display.apply(id, &pane).unwrap();
        display.set_visible(id, true).unwrap();
        display.scroll(id, 100.0).unwrap();
        display.repaint().unwrap();

        let parser = screen(&display);
        // Two content rows, scrolled to the bottom and clipped to six columns.
        assert_eq!(rows(&parser), vec!["", " c", " long l", ""]);
        let screen = parser.screen();
        assert_eq!(screen.cell(0, 0).unwrap().bgcolor(), vt100::Color::Idx(4));
        assert_eq!(screen.cell(2, 7).unwrap().bgcolor(), vt100::Color::Idx(4));
    }
}
