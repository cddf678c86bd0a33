use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::assets::PreparedImage;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{GogaiError, GogaiResult};
use crate::foundation::math::Rng64;
use crate::texture::columns::{ColumnLayout, plan_columns};

/// Raw font bytes supplied by the host at construction.
pub type FontBytes = Arc<Vec<u8>>;

/// One photographic inset: a reserved rectangle, the image that will fill it,
/// and its caption.
#[derive(Clone, Debug)]
pub struct InsetSpec {
    /// Reserved rectangle in texture pixels. Column text routes around it.
    pub rect: kurbo::Rect,
    /// Path of the image, relative to the asset root.
    pub source: String,
    /// Caption drawn under the rectangle once the image lands.
    pub caption: String,
}

/// Visual styling and copy of the newspaper page.
#[derive(Clone, Debug)]
pub struct PageStyle {
    /// Square texture side length in pixels.
    pub size: u32,
    /// Base paper color.
    pub paper: Rgb8,
    /// Darker grain stipple color.
    pub grain_dark: Rgb8,
    /// Lighter grain stipple color.
    pub grain_light: Rgb8,
    /// Ink for rules, headline, and body text.
    pub ink: Rgb8,
    /// Accent for the stamp.
    pub accent: Rgb8,
    /// Headline copy.
    pub headline: String,
    /// Subheading copy.
    pub subheading: String,
    /// Stamp glyphs, drawn vertically inside the circular stamp.
    pub stamp: String,
    /// Sentence pool for the vertical columns.
    pub sentences: Vec<String>,
    /// Column grid geometry.
    pub columns: ColumnLayout,
    /// Number of grain stipples.
    pub grain_stipples: usize,
    /// Shaping font. With `None` every glyph layer is skipped and the
    /// raster passes stay fully deterministic; used by tests and as the
    /// degraded mode when the host has no font to offer.
    pub font: Option<FontBytes>,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            size: 1024,
            paper: Rgb8::new(0xe3, 0xe3, 0xe3),
            grain_dark: Rgb8::new(0xd3, 0xd3, 0xd3),
            grain_light: Rgb8::new(0xee, 0xee, 0xee),
            ink: Rgb8::new(0x11, 0x11, 0x11),
            accent: Rgb8::new(0xc0, 0x39, 0x2b),
            headline: "シルク岩塩".to_string(),
            subheading: "氷のように舌で溶け、最高の旨味を解き放つ".to_string(),
            stamp: "号外".to_string(),
            sentences: vec![
                "奇跡の結晶が食卓を変える".to_string(),
                "職人が selected silk を磨き上げた".to_string(),
                "一粒が舌上で氷解する".to_string(),
            ],
            columns: ColumnLayout::default(),
            grain_stipples: 50_000,
            font: None,
        }
    }
}

/// The composited newspaper raster plus its re-upload flag.
///
/// The base layout is always drawn synchronously before first use, so the
/// rendering backend never observes an empty texture. The dirty flag is a
/// single-writer/single-reader handoff: the inset pass sets it exactly once,
/// the frame loop reads-and-clears it.
#[derive(Clone, Debug)]
pub struct SurfaceTexture {
    width: u32,
    height: u32,
    rgba8_premul: Vec<u8>,
    dirty: bool,
}

impl SurfaceTexture {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes in row-major premultiplied RGBA8.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Read and clear the re-upload flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
struct BrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl BrushRgba8 {
    fn opaque(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphLayoutKey {
    ch: char,
    size_px: u32,
    brush: BrushRgba8,
}

/// Parley shaping state for the page font.
struct TextPipeline {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<BrushRgba8>,
    font: vello_cpu::peniko::FontData,
    family: String,
    char_cache: HashMap<GlyphLayoutKey, parley::Layout<BrushRgba8>>,
}

impl TextPipeline {
    fn new(font_bytes: &FontBytes) -> GogaiResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| GogaiError::validation("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GogaiError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font,
            family,
            char_cache: HashMap::new(),
        })
    }

    fn layout_plain(
        &mut self,
        text: &str,
        size_px: f32,
        brush: BrushRgba8,
        max_width_px: Option<f32>,
    ) -> parley::Layout<BrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<BrushRgba8> = builder.build(text);
        if let Some(w) = max_width_px {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }
        layout
    }

    fn layout_char(&mut self, ch: char, size_px: f32, brush: BrushRgba8) -> &parley::Layout<BrushRgba8> {
        let key = GlyphLayoutKey {
            ch,
            size_px: size_px.to_bits(),
            brush,
        };
        if !self.char_cache.contains_key(&key) {
            let mut buf = [0u8; 4];
            let layout = self.layout_plain(ch.encode_utf8(&mut buf), size_px, brush, None);
            self.char_cache.insert(key, layout);
        }
        &self.char_cache[&key]
    }
}

const HEADLINE_SIZE: f32 = 130.0;
const SUBHEADING_SIZE: f32 = 36.0;
const COLUMN_SIZE: f32 = 18.0;
const CAPTION_SIZE: f32 = 20.0;
const STAMP_SIZE: f32 = 40.0;

/// Builds the newspaper raster: a synchronous base pass, then one optional
/// inset pass once all photographic images have decoded.
pub struct TextureCompositor {
    style: PageStyle,
    insets: Vec<InsetSpec>,
    seed: u64,
    text: Option<TextPipeline>,
}

impl TextureCompositor {
    /// Validate the style and prepare the shaping pipeline.
    pub fn new(style: PageStyle, insets: Vec<InsetSpec>, seed: u64) -> GogaiResult<Self> {
        if style.size == 0 || style.size > 4096 {
            return Err(GogaiError::validation("texture size must be in 1..=4096"));
        }
        if style.columns.row_step <= 0.0
            || style.columns.col_step <= 0.0
            || style.columns.paragraph_gap <= 0.0
        {
            return Err(GogaiError::validation("column steps must be > 0"));
        }
        let side = f64::from(style.size);
        for inset in &insets {
            let r = inset.rect;
            if r.area() <= 0.0 || r.x0 < 0.0 || r.y0 < 0.0 || r.x1 > side || r.y1 > side {
                return Err(GogaiError::validation(format!(
                    "inset rect {r:?} must lie inside the texture"
                )));
            }
        }
        let text = match &style.font {
            Some(bytes) => Some(TextPipeline::new(bytes)?),
            None => None,
        };
        Ok(Self {
            style,
            insets,
            seed,
            text,
        })
    }

    /// Inset declarations this compositor was built with.
    pub fn insets(&self) -> &[InsetSpec] {
        &self.insets
    }

    /// Synchronous base pass: background, grain, rules, headline, subheading,
    /// stamp, and image-aware column text. Always completes before first use.
    pub fn compose_base(&mut self) -> GogaiResult<SurfaceTexture> {
        let bytes = self.render_page(None)?;
        info!(size = self.style.size, "composed base newspaper raster");
        Ok(SurfaceTexture {
            width: self.style.size,
            height: self.style.size,
            rgba8_premul: bytes,
            dirty: false,
        })
    }

    /// Deferred inset pass, run once after every requested image decoded.
    ///
    /// Fills each reserved rectangle with the paper color first so a
    /// translucent image never blends against stale pixels, then draws the
    /// image and caption, redraws the columns, and flips the dirty flag
    /// exactly once.
    pub fn compose_insets(
        &mut self,
        texture: &mut SurfaceTexture,
        images: &[PreparedImage],
    ) -> GogaiResult<()> {
        if images.len() != self.insets.len() {
            return Err(GogaiError::composition(format!(
                "expected {} inset images, got {}",
                self.insets.len(),
                images.len()
            )));
        }
        texture.rgba8_premul = self.render_page(Some(images))?;
        texture.dirty = true;
        debug!("inset pass complete; texture flagged for re-upload");
        Ok(())
    }

    fn render_page(&mut self, images: Option<&[PreparedImage]>) -> GogaiResult<Vec<u8>> {
        let size = self.style.size;
        let side = size as u16;
        let sidef = f64::from(size);
        let mut ctx = vello_cpu::RenderContext::new(side, side);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        // Paper and grain.
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(self.style.paper));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, sidef, sidef));

        let grain = self.grain_paint()?;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(grain);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, sidef, sidef));

        // Header rules.
        ctx.set_paint(color(self.style.ink));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(50.0, 50.0, sidef - 50.0, 60.0));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(50.0, 180.0, sidef - 50.0, 185.0));

        // Headline and subheading.
        let ink_brush = BrushRgba8::opaque(self.style.ink);
        let headline = self.style.headline.clone();
        let subheading = self.style.subheading.clone();
        if let Some(text) = self.text.as_mut() {
            // Single-line headline and subheading, centered by measure.
            let layout = text.layout_plain(&headline, HEADLINE_SIZE, ink_brush, None);
            let x = (sidef - f64::from(layout.width())) * 0.5;
            draw_layout(&mut ctx, &text.font, &layout, x, 55.0);

            let layout = text.layout_plain(&subheading, SUBHEADING_SIZE, ink_brush, None);
            let x = (sidef - f64::from(layout.width())) * 0.5;
            draw_layout(&mut ctx, &text.font, &layout, x, 200.0);
        }

        self.draw_stamp(&mut ctx);

        // Inset pass layers.
        let exclusions: Vec<kurbo::Rect> = self.insets.iter().map(|i| i.rect).collect();
        if let Some(images) = images {
            for (inset, image) in self.insets.iter().zip(images) {
                // Paper under the image so transparency cannot bleed through
                // the grain.
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color(self.style.paper));
                ctx.fill_rect(&rect_to_cpu(inset.rect));

                let paint = image_paint(image)?;
                let sx = inset.rect.width() / f64::from(image.width);
                let sy = inset.rect.height() / f64::from(image.height);
                ctx.set_transform(
                    vello_cpu::kurbo::Affine::translate((inset.rect.x0, inset.rect.y0))
                        * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
                );
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(image.width),
                    f64::from(image.height),
                ));
            }

            let captions: Vec<(String, f64, f64)> = self
                .insets
                .iter()
                .map(|i| (i.caption.clone(), i.rect.x0 + 6.0, i.rect.y1 + 8.0))
                .collect();
            if let Some(text) = self.text.as_mut() {
                for (caption, x, y) in captions {
                    let layout = text.layout_plain(&caption, CAPTION_SIZE, ink_brush, None);
                    draw_layout(&mut ctx, &text.font, &layout, x, y);
                }
            }
        }

        // Vertical columns, routed around the reserved rectangles.
        let plan = plan_columns(&self.style.columns, &self.style.sentences, &exclusions);
        if let Some(text) = self.text.as_mut() {
            let font = text.font.clone();
            for cell in &plan.cells {
                let layout = text.layout_char(cell.ch, COLUMN_SIZE, ink_brush);
                draw_layout(&mut ctx, &font, layout, cell.x, cell.y);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(self.style.ink));
        for &x in &plan.dividers {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                x,
                self.style.columns.top,
                x + 1.0,
                self.style.columns.bottom,
            ));
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(side, side);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }

    fn draw_stamp(&mut self, ctx: &mut vello_cpu::RenderContext) {
        use kurbo::Shape;

        let center = kurbo::Point::new(860.0, 118.0);
        let ring = kurbo::Circle::new(center, 58.0).to_path(0.1);
        let hole = kurbo::Circle::new(center, 50.0).to_path(0.1);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(self.style.accent));
        ctx.fill_path(&bezpath_to_cpu(&ring));
        ctx.set_paint(color(self.style.paper));
        ctx.fill_path(&bezpath_to_cpu(&hole));

        let stamp = self.style.stamp.clone();
        let brush = BrushRgba8::opaque(self.style.accent);
        if let Some(text) = self.text.as_mut() {
            let font = text.font.clone();
            let count = stamp.chars().count() as f64;
            let mut y = center.y - count * f64::from(STAMP_SIZE) * 0.5;
            for ch in stamp.chars() {
                let layout = text.layout_char(ch, STAMP_SIZE, brush);
                draw_layout(ctx, &font, layout, center.x - f64::from(STAMP_SIZE) * 0.5, y);
                y += f64::from(STAMP_SIZE);
            }
        }
    }

    fn grain_paint(&self) -> GogaiResult<vello_cpu::Image> {
        let size = self.style.size as usize;
        let mut bytes = vec![0u8; size * size * 4];
        let mut rng = Rng64::new(self.seed);
        let dark = self.style.grain_dark;
        let light = self.style.grain_light;
        for _ in 0..self.style.grain_stipples {
            let x = (rng.next_f64_01() * size as f64) as usize;
            let y = (rng.next_f64_01() * size as f64) as usize;
            let c = if rng.next_f64_01() > 0.5 { dark } else { light };
            for dy in 0..2usize {
                for dx in 0..2usize {
                    let (px, py) = (x + dx, y + dy);
                    if px >= size || py >= size {
                        continue;
                    }
                    let idx = (py * size + px) * 4;
                    bytes[idx] = c.r;
                    bytes[idx + 1] = c.g;
                    bytes[idx + 2] = c.b;
                    bytes[idx + 3] = 255;
                }
            }
        }
        rgba_premul_to_image(&bytes, self.style.size, self.style.size)
    }
}

fn color(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<BrushRgba8>,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> GogaiResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GogaiError::composition("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GogaiError::composition("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(GogaiError::composition("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
    for px in bytes.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> GogaiResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_paint(image: &PreparedImage) -> GogaiResult<vello_cpu::Image> {
    rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compositor(insets: Vec<InsetSpec>) -> TextureCompositor {
        TextureCompositor::new(PageStyle::default(), insets, 0xE3).unwrap()
    }

    fn inset(x0: f64, y0: f64, x1: f64, y1: f64) -> InsetSpec {
        InsetSpec {
            rect: kurbo::Rect::new(x0, y0, x1, y1),
            source: "inset.png".to_string(),
            caption: "奇跡の結晶 (イメージ)".to_string(),
        }
    }

    fn flat_image(w: u32, h: u32, v: u8) -> PreparedImage {
        let mut bytes = vec![v; (w * h * 4) as usize];
        for px in bytes.chunks_exact_mut(4) {
            px[3] = 255;
        }
        PreparedImage {
            width: w,
            height: h,
            rgba8_premul: Arc::new(bytes),
        }
    }

    #[test]
    fn base_pass_is_bit_identical_for_equal_seeds() {
        let mut a = compositor(vec![inset(100.0, 400.0, 460.0, 700.0)]);
        let mut b = compositor(vec![inset(100.0, 400.0, 460.0, 700.0)]);
        let ta = a.compose_base().unwrap();
        let tb = b.compose_base().unwrap();
        assert_eq!(ta.rgba8_premul(), tb.rgba8_premul());

        // Same compositor drawn twice is idempotent too.
        let ta2 = a.compose_base().unwrap();
        assert_eq!(ta.rgba8_premul(), ta2.rgba8_premul());
    }

    #[test]
    fn different_seeds_change_the_grain() {
        let mut a = compositor(vec![]);
        let mut b = TextureCompositor::new(PageStyle::default(), vec![], 0x55).unwrap();
        assert_ne!(
            a.compose_base().unwrap().rgba8_premul(),
            b.compose_base().unwrap().rgba8_premul()
        );
    }

    #[test]
    fn base_texture_starts_clean_and_inset_pass_dirties_once() {
        let mut c = compositor(vec![inset(100.0, 400.0, 460.0, 700.0)]);
        let mut tex = c.compose_base().unwrap();
        assert!(!tex.take_dirty());

        c.compose_insets(&mut tex, &[flat_image(4, 4, 200)]).unwrap();
        assert!(tex.take_dirty());
        assert!(!tex.take_dirty(), "dirty flag must clear on read");
    }

    #[test]
    fn inset_pass_changes_the_reserved_region() {
        let mut c = compositor(vec![inset(100.0, 400.0, 460.0, 700.0)]);
        let mut tex = c.compose_base().unwrap();
        let before = tex.rgba8_premul().to_vec();
        c.compose_insets(&mut tex, &[flat_image(4, 4, 10)]).unwrap();
        assert_ne!(before, tex.rgba8_premul());

        // A sample point well inside the rectangle now shows the image.
        let size = tex.width() as usize;
        let idx = (550 * size + 280) * 4;
        assert_eq!(tex.rgba8_premul()[idx], 10);
    }

    #[test]
    fn inset_count_mismatch_is_rejected() {
        let mut c = compositor(vec![inset(100.0, 400.0, 460.0, 700.0)]);
        let mut tex = c.compose_base().unwrap();
        assert!(c.compose_insets(&mut tex, &[]).is_err());
    }

    #[test]
    fn out_of_bounds_inset_is_rejected_at_construction() {
        let r = TextureCompositor::new(
            PageStyle::default(),
            vec![inset(900.0, 900.0, 1100.0, 1100.0)],
            0,
        );
        assert!(r.is_err());
    }
}
