use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use anyhow::Result;
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::config::DrawConfig;
use crate::journey_tracker::JourneyTracker;
use crate::journey_vector::JourneyVector;
use crate::map_snapshot::{self, SnapshotProvider};
use crate::path_projector;

pub struct ShareContent {
    pub name: String,
    pub png: Vec<u8>,
    pub caption: String,
    pub width: u32,
    pub height: u32,
}

/// Where the composited image ends up, e.g. a platform share sheet.
pub trait ExportSink {
    fn share(&mut self, content: ShareContent) -> Result<()>;
}

/// Writes `<name>.png` and `<name>.txt` (the caption) into a folder.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn image_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.png"))
    }

    pub fn caption_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.txt"))
    }
}

impl ExportSink for FileExportSink {
    fn share(&mut self, content: ShareContent) -> Result<()> {
        let image_path = self.image_path(&content.name);
        fs::write(&image_path, &content.png)?;
        fs::write(self.caption_path(&content.name), &content.caption)?;
        info!("exported drawing to {}", image_path.display());
        Ok(())
    }
}

pub fn caption(journey: &JourneyVector, prefix: &str) -> String {
    let segments = journey
        .track_segments()
        .iter()
        .filter(|s| !s.is_empty())
        .count();
    let date = journey
        .all_samples()
        .next()
        .and_then(|s| s.time())
        .map(|t| format!(" on {}", t.date_naive()))
        .unwrap_or_default();
    format!(
        "{}{}: {} segment{}, {:.2} km",
        prefix,
        date,
        segments,
        if segments == 1 { "" } else { "s" },
        journey.total_distance_m() / 1000.0
    )
}

// tiny-skia keeps premultiplied pixels, the exported image should not.
pub fn pixmap_to_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| anyhow!("Pixel buffer does not match the image size"))
}

pub fn image_to_png_data(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut image_png: Vec<u8> = Vec::new();
    image.write_to(&mut Cursor::new(&mut image_png), image::ImageFormat::Png)?;
    Ok(image_png)
}

/// Returns `None` when there is nothing to export.
pub fn build_share_content<P: SnapshotProvider>(
    tracker: &JourneyTracker,
    provider: &mut P,
    config: &DrawConfig,
) -> Result<Option<ShareContent>> {
    if !tracker.can_export() {
        info!("nothing to export");
        return Ok(None);
    }
    let journey = tracker.journey();
    let bounds = match map_snapshot::journey_bounds(
        journey,
        config.snapshot_padding,
        config.min_region_span_m,
    ) {
        None => return Ok(None),
        Some(bounds) => bounds,
    };

    let snapshot = provider.snapshot(&bounds, config.snapshot_width, config.snapshot_height)?;
    let pixmap = path_projector::project(
        journey,
        snapshot.pixmap(),
        |lat, lng| snapshot.coordinate_to_pixel(lat, lng),
        &config.stroke_style(),
    );
    let png = image_to_png_data(&pixmap_to_image(&pixmap)?)?;

    Ok(Some(ShareContent {
        name: format!("walk2draw-{}", tracker.journey_id()),
        png,
        caption: caption(journey, &config.caption_prefix),
        width: pixmap.width(),
        height: pixmap.height(),
    }))
}

/// Returns whether anything was handed to the sink.
pub fn share<P: SnapshotProvider, S: ExportSink>(
    tracker: &JourneyTracker,
    provider: &mut P,
    config: &DrawConfig,
    sink: &mut S,
) -> Result<bool> {
    match build_share_content(tracker, provider, config)? {
        None => Ok(false),
        Some(content) => {
            sink.share(content)?;
            Ok(true)
        }
    }
}
