//! The explicit render target shared by all plot renderers.
//!
//! Each renderer prepares its data, then hands a [`Scene`] to
//! [`render_scene`], which owns the backend choice: PNG draws into an RGB
//! buffer and is encoded with the `image` crate, SVG draws into a string.
//! The result is a self-contained [`Figure`] with no process-global state.

use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;

/// A fully rendered, encoded plot.
#[derive(Debug, Clone)]
pub struct Figure {
    width: u32,
    height: u32,
    format: OutputFormat,
    bytes: Vec<u8>,
}

impl Figure {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Encoded image bytes (PNG binary or SVG text).
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Persist the figure to disk in its encoded format.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.bytes)
            .with_context(|| format!("Failed to write figure to '{}'", path.display()))
    }

    /// Stream the encoded figure to a writer (e.g. stdout for terminal
    /// pipelines or a notebook bridge).
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer
            .write_all(&self.bytes)
            .context("Failed to write figure bytes")?;
        writer.flush().context("Failed to flush figure bytes")
    }
}

/// A prepared plot that knows how to draw itself on any plotters backend.
pub(crate) trait Scene {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static;
}

/// Render a scene with the backend selected by `options.format`, saving to
/// `options.save_path` when set.
pub(crate) fn render_scene<S: Scene>(scene: &S, options: &RenderOptions) -> Result<Figure> {
    let (width, height) = (options.width, options.height);

    let bytes = match options.format {
        OutputFormat::Png => {
            let mut buffer = vec![0u8; (width * height * 3) as usize];
            {
                let root =
                    BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
                root.fill(&WHITE).context("Failed to fill background")?;
                scene.draw(&root)?;
                root.present().context("Failed to present drawing")?;
            }
            encode_png(&buffer, width, height)?
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root =
                    SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                root.fill(&WHITE).context("Failed to fill background")?;
                scene.draw(&root)?;
                root.present().context("Failed to present drawing")?;
            }
            svg.into_bytes()
        }
    };

    let figure = Figure {
        width,
        height,
        format: options.format,
        bytes,
    };

    if let Some(path) = &options.save_path {
        figure.save(path)?;
    }

    Ok(figure)
}

/// Encode an RGB8 buffer as PNG
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BlankScene;

    impl Scene for BlankScene {
        fn draw<DB: DrawingBackend>(&self, _root: &DrawingArea<DB, Shift>) -> Result<()>
        where
            DB::ErrorType: 'static,
        {
            Ok(())
        }
    }

    #[test]
    fn test_render_scene_png_signature() {
        let options = RenderOptions::default();
        let figure = render_scene(&BlankScene, &options).unwrap();
        assert_eq!(figure.format(), OutputFormat::Png);
        assert!(figure.bytes().len() > 8);
        assert_eq!(&figure.bytes()[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_render_scene_svg_is_text() {
        let options = RenderOptions {
            format: OutputFormat::Svg,
            ..RenderOptions::default()
        };
        let figure = render_scene(&BlankScene, &options).unwrap();
        let text = String::from_utf8(figure.bytes().to_vec()).unwrap();
        assert!(text.contains("<svg"));
    }

    #[test]
    fn test_no_save_path_writes_nothing() {
        let target = std::env::temp_dir().join("delaygraph_figure_should_not_exist.png");
        let _ = fs::remove_file(&target);
        let options = RenderOptions::default();
        render_scene(&BlankScene, &options).unwrap();
        assert!(!target.exists());
    }

    #[test]
    fn test_save_path_writes_artifact() {
        let target = std::env::temp_dir().join("delaygraph_figure_save_test.png");
        let _ = fs::remove_file(&target);
        let options = RenderOptions {
            save_path: Some(target.clone()),
            ..RenderOptions::default()
        };
        let figure = render_scene(&BlankScene, &options).unwrap();
        let on_disk = fs::read(&target).unwrap();
        assert_eq!(on_disk, figure.bytes());
        fs::remove_file(&target).unwrap();
    }
}
