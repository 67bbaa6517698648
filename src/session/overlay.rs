// SPDX-License-Identifier: MPL-2.0

//! Symbol overlay rendering
//!
//! Draws detection results directly onto the captured frame:
//!
//! - A closed outline around each symbol (convex hull for long boundaries)
//! - A `<kind>: <payload>` label just above the outline's first vertex
//! - A countdown label while the cooldown gate is resting
//!
//! Text uses the 8x8 bitmap glyphs from `font8x8`, scaled up by whole pixels.
//! Characters without a glyph are drawn as `?`. Drawing clips at the frame
//! edges and never fails.

use crate::constants::overlay;
use crate::frame_processor::{DetectedSymbol, Point};
use crate::session::hull::outline_for;
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

/// Glyph cell size in font units
const GLYPH_SIZE: i32 = 8;

/// Style for one kind of overlay text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Rgb<u8>,
    pub scale: u32,
}

/// Draws symbol outlines, labels and the cooldown countdown
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    outline_color: Rgb<u8>,
    outline_thickness: i32,
    label: TextStyle,
    countdown: TextStyle,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self {
            outline_color: Rgb(overlay::OUTLINE_COLOR),
            outline_thickness: overlay::OUTLINE_THICKNESS,
            label: TextStyle {
                color: Rgb(overlay::LABEL_COLOR),
                scale: overlay::LABEL_SCALE,
            },
            countdown: TextStyle {
                color: Rgb(overlay::COUNTDOWN_COLOR),
                scale: overlay::COUNTDOWN_SCALE,
            },
        }
    }
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every symbol, plus the countdown when `resting_remaining` is set
    pub fn render(
        &self,
        image: &mut RgbImage,
        symbols: &[DetectedSymbol],
        resting_remaining: Option<f64>,
    ) {
        for symbol in symbols {
            self.draw_symbol(image, symbol);
        }
        if let Some(remaining) = resting_remaining {
            self.draw_countdown(image, remaining);
        }
    }

    /// Outline and label for one symbol
    pub fn draw_symbol(&self, image: &mut RgbImage, symbol: &DetectedSymbol) {
        let outline = outline_for(&symbol.boundary);
        self.draw_closed_polygon(image, &outline);

        if let Some(anchor) = outline.first() {
            draw_text(
                image,
                &symbol.label(),
                anchor.x,
                anchor.y - overlay::LABEL_OFFSET,
                self.label,
            );
        }
    }

    /// `Cooldown: X.Xs` at the fixed countdown position
    pub fn draw_countdown(&self, image: &mut RgbImage, remaining: f64) {
        let (x, baseline) = overlay::COUNTDOWN_ORIGIN;
        draw_text(image, &countdown_text(remaining), x, baseline, self.countdown);
    }

    fn draw_closed_polygon(&self, image: &mut RgbImage, outline: &[Point]) {
        if outline.len() == 1 {
            let p = outline[0];
            let half = self.outline_thickness / 2;
            let side = self.outline_thickness.max(1) as u32;
            draw_filled_rect_mut(
                image,
                Rect::at(p.x - half, p.y - half).of_size(side, side),
                self.outline_color,
            );
            return;
        }

        for (i, start) in outline.iter().enumerate() {
            let end = outline[(i + 1) % outline.len()];
            self.draw_thick_segment(image, *start, end);
        }
    }

    /// Segment widened by drawing offset copies around the centre line
    fn draw_thick_segment(&self, image: &mut RgbImage, start: Point, end: Point) {
        let half = self.outline_thickness / 2;
        for dy in -half..=half {
            for dx in -half..=half {
                draw_line_segment_mut(
                    image,
                    ((start.x + dx) as f32, (start.y + dy) as f32),
                    ((end.x + dx) as f32, (end.y + dy) as f32),
                    self.outline_color,
                );
            }
        }
    }
}

/// Countdown label text with one decimal place
pub fn countdown_text(remaining: f64) -> String {
    format!("Cooldown: {:.1}s", remaining.max(0.0))
}

/// Draw `text` with its bottom-left corner at `(x, baseline)`
fn draw_text(image: &mut RgbImage, text: &str, x: i32, baseline: i32, style: TextStyle) {
    let scale = style.scale.max(1) as i32;
    let top = baseline - GLYPH_SIZE * scale;
    let advance = GLYPH_SIZE * scale;

    for (i, c) in text.chars().enumerate() {
        let glyph = BASIC_FONTS
            .get(c)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        let left = x + i as i32 * advance;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                draw_filled_rect_mut(
                    image,
                    Rect::at(left + col * scale, top + row as i32 * scale)
                        .of_size(scale as u32, scale as u32),
                    style.color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, BLACK)
    }

    fn count_color(image: &RgbImage, color: Rgb<u8>) -> usize {
        image.pixels().filter(|p| **p == color).count()
    }

    fn square_symbol() -> DetectedSymbol {
        DetectedSymbol::new(
            "QRCODE",
            "hello",
            vec![
                Point::new(40, 40),
                Point::new(120, 40),
                Point::new(120, 120),
                Point::new(40, 120),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_outline_drawn_on_edges_only() {
        let renderer = OverlayRenderer::new();
        let mut image = blank(160, 160);
        renderer.draw_symbol(&mut image, &square_symbol());

        let green = Rgb(overlay::OUTLINE_COLOR);
        assert_eq!(*image.get_pixel(80, 40), green);
        assert_eq!(*image.get_pixel(120, 80), green);
        assert_eq!(*image.get_pixel(80, 120), green);
        assert_eq!(*image.get_pixel(40, 80), green);
        // 3px wide
        assert_eq!(*image.get_pixel(80, 41), green);
        assert_eq!(*image.get_pixel(80, 39), green);
        // Interior untouched
        assert_eq!(*image.get_pixel(80, 80), BLACK);
    }

    #[test]
    fn test_label_sits_above_first_vertex() {
        let renderer = OverlayRenderer::new();
        let mut image = blank(200, 160);
        renderer.draw_symbol(&mut image, &square_symbol());

        // Label band spans rows 22..30 for an anchor at y=40
        let label_pixels = (40..200)
            .flat_map(|x| (22..30).map(move |y| (x, y)))
            .filter(|&(x, y)| *image.get_pixel(x, y) != BLACK)
            .count();
        assert!(label_pixels > 0);
    }

    #[test]
    fn test_countdown_only_when_resting() {
        let renderer = OverlayRenderer::new();
        let red = Rgb(overlay::COUNTDOWN_COLOR);

        let mut ready = blank(320, 240);
        renderer.render(&mut ready, &[], None);
        assert_eq!(count_color(&ready, red), 0);

        let mut resting = blank(320, 240);
        renderer.render(&mut resting, &[], Some(2.0));
        assert!(count_color(&resting, red) > 0);
    }

    #[test]
    fn test_countdown_text_format() {
        assert_eq!(countdown_text(2.0), "Cooldown: 2.0s");
        assert_eq!(countdown_text(4.96), "Cooldown: 5.0s");
        assert_eq!(countdown_text(-1.0), "Cooldown: 0.0s");
    }

    #[test]
    fn test_drawing_clips_at_frame_edges() {
        let renderer = OverlayRenderer::new();
        let mut image = blank(20, 20);
        let symbol = DetectedSymbol::new(
            "QRCODE",
            "ünïcode payload off the edge",
            vec![Point::new(-50, 5), Point::new(70, 5), Point::new(10, 90)],
        )
        .unwrap();
        renderer.render(&mut image, &[symbol], Some(9.9));
        assert!(count_color(&image, Rgb(overlay::OUTLINE_COLOR)) > 0);
    }

    #[test]
    fn test_single_point_boundary() {
        let renderer = OverlayRenderer::new();
        let mut image = blank(20, 20);
        let symbol = DetectedSymbol::new("CODE128", "x", vec![Point::new(10, 15)]).unwrap();
        renderer.draw_symbol(&mut image, &symbol);
        assert_eq!(*image.get_pixel(10, 15), Rgb(overlay::OUTLINE_COLOR));
    }
}
