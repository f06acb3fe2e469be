use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use caption_core::{suggested_filename, CaptionError, CaptionStyle, ImageProfile, OutputFormat, RenderConfig, Result};
use caption_synth::{resolve_style, Captioner, SeedSource};
use compositor::{compose, GlyphSource};
use image::DynamicImage;
use tracing::{info, warn};

/// The picture currently being worked on.
struct Loaded {
    name: Option<String>,
    image: Arc<DynamicImage>,
    profile: ImageProfile,
}

#[derive(Clone, Debug)]
pub struct RenderedOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub filename: String,
}

impl RenderedOutput {
    pub fn mime(&self) -> &'static str { self.format.mime() }
}

/// Holds the session's busy slot; frees it when dropped, unless a newer job already owns it.
struct RenderTicket {
    slot: Arc<AtomicU64>,
    id: u64,
}

impl Drop for RenderTicket {
    fn drop(&mut self) {
        let _ = self.slot.compare_exchange(self.id, 0, Ordering::AcqRel, Ordering::Acquire);
    }
}

/// Everything one render needs, detached from the session so it can run elsewhere.
/// Dropping the job (or unwinding out of [`RenderJob::run`]) releases the session.
pub struct RenderJob {
    _ticket: RenderTicket,
    generation: u64,
    source_name: Option<String>,
    image: Arc<DynamicImage>,
    caption: String,
    config: RenderConfig,
    glyphs: Arc<GlyphSource>,
}

impl RenderJob {
    pub fn generation(&self) -> u64 { self.generation }

    pub fn run(&self) -> Result<Option<RenderedOutput>> {
        let composite = compose(&self.image, &self.caption, &self.config, &self.glyphs)?;
        Ok(composite.map(|c| RenderedOutput {
            bytes: c.bytes,
            format: self.config.format,
            width: c.width,
            height: c.height,
            filename: suggested_filename(self.source_name.as_deref(), self.config.format),
        }))
    }
}

/// State of one editing session: loaded image, its profile, the caption and the last output.
///
/// Renders are single-flight: [`Session::begin_render`] refuses while a job is alive, and
/// results from before the latest [`Session::load`] are dropped on arrival.
pub struct Session {
    captioner: Captioner,
    glyphs: Arc<GlyphSource>,
    style: CaptionStyle,
    keywords: String,
    generation: u64,
    loaded: Option<Loaded>,
    caption: String,
    output: Option<RenderedOutput>,
    /// Ticket id of the live job, 0 when idle.
    busy: Arc<AtomicU64>,
    next_ticket: u64,
}

impl Default for Session {
    fn default() -> Self { Self::new(Captioner::default(), Arc::new(GlyphSource::system())) }
}

impl Session {
    pub fn new(captioner: Captioner, glyphs: Arc<GlyphSource>) -> Self {
        Self {
            captioner,
            glyphs,
            style: CaptionStyle::default(),
            keywords: String::new(),
            generation: 0,
            loaded: None,
            caption: String::new(),
            output: None,
            busy: Arc::new(AtomicU64::new(0)),
            next_ticket: 0,
        }
    }

    pub fn with_seed_source(seeds: Box<dyn SeedSource>, glyphs: Arc<GlyphSource>) -> Self {
        Self::new(Captioner::new(seeds), glyphs)
    }

    /// Decode and analyze a new picture, replacing the previous one and its output.
    /// On failure the session is left as it was.
    pub fn load(&mut self, name: Option<&str>, bytes: &[u8]) -> Result<&ImageProfile> {
        let (image, profile) = visual_features::analyze_bytes(bytes)?;
        self.generation += 1;
        self.output = None;
        info!(
            generation = self.generation,
            name = name.unwrap_or("-"),
            content = profile.content_guess.as_str(),
            mood = %profile.summary().mood,
            "image loaded"
        );
        self.caption = self.captioner.caption(&profile, self.style, &self.keywords);
        let loaded = self.loaded.insert(Loaded { name: name.map(String::from), image: Arc::new(image), profile });
        Ok(&loaded.profile)
    }

    pub fn profile(&self) -> Option<&ImageProfile> { self.loaded.as_ref().map(|l| &l.profile) }

    pub fn caption(&self) -> &str { &self.caption }

    pub fn output(&self) -> Option<&RenderedOutput> { self.output.as_ref() }

    pub fn style(&self) -> CaptionStyle { self.style }

    pub fn generation(&self) -> u64 { self.generation }

    pub fn is_rendering(&self) -> bool { self.busy.load(Ordering::Acquire) != 0 }

    /// Unknown keys fall back to cinematic. Regenerates the caption when an image is loaded.
    pub fn set_style(&mut self, key: &str) -> Option<&str> {
        self.style = resolve_style(key);
        self.regenerate_caption()
    }

    pub fn set_keywords(&mut self, raw: &str) -> Option<&str> {
        self.keywords = raw.to_string();
        self.regenerate_caption()
    }

    /// Fresh caption with the current style and keywords; `None` before any image.
    pub fn regenerate_caption(&mut self) -> Option<&str> {
        let loaded = self.loaded.as_ref()?;
        self.caption = self.captioner.caption(&loaded.profile, self.style, &self.keywords);
        Some(&self.caption)
    }

    /// User edit of the caption text.
    pub fn set_caption(&mut self, text: impl Into<String>) { self.caption = text.into(); }

    /// `Ok(None)` without an image or with a blank caption: nothing to render.
    pub fn begin_render(&mut self, config: RenderConfig) -> Result<Option<RenderJob>> {
        if self.is_rendering() {
            return Err(CaptionError::RenderInProgress);
        }
        config.validate()?;
        let Some(loaded) = self.loaded.as_ref() else { return Ok(None) };
        if self.caption.trim().is_empty() {
            info!("blank caption, render skipped");
            return Ok(None);
        }
        self.next_ticket += 1;
        self.busy.store(self.next_ticket, Ordering::Release);
        Ok(Some(RenderJob {
            _ticket: RenderTicket { slot: Arc::clone(&self.busy), id: self.next_ticket },
            generation: self.generation,
            source_name: loaded.name.clone(),
            image: Arc::clone(&loaded.image),
            caption: self.caption.clone(),
            config,
            glyphs: Arc::clone(&self.glyphs),
        }))
    }

    /// Accept a job's result and release the job. Stale results are discarded;
    /// failures keep the prior output.
    pub fn finish_render(&mut self, job: RenderJob, result: Result<Option<RenderedOutput>>) -> Result<Option<&RenderedOutput>> {
        let generation = job.generation;
        drop(job);
        if generation != self.generation {
            warn!(job = generation, current = self.generation, "discarding stale render");
            return Ok(None);
        }
        match result? {
            Some(out) => {
                info!(filename = %out.filename, bytes = out.bytes.len(), "output replaced");
                Ok(Some(&*self.output.insert(out)))
            }
            None => Ok(None),
        }
    }

    /// begin → run → finish in one call.
    pub fn render(&mut self, config: RenderConfig) -> Result<Option<&RenderedOutput>> {
        let Some(job) = self.begin_render(config)? else { return Ok(None) };
        let result = job.run();
        self.finish_render(job, result)
    }
}
