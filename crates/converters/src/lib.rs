
pub mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use caption_core::RenderConfig;
use caption_synth::{Captioner, ClockSeed, FixedSeed, SeedSource};
use compositor::GlyphSource;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use session::{RenderJob, RenderedOutput, Session};

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct TransformOpts {
    pub style: Option<String>,
    pub keywords: Option<String>,
    /// Hand-edited caption; replaces the synthesized one. A blank override renders nothing.
    pub caption: Option<String>,
    /// Original file name, used for the suggested output name.
    pub source_name: Option<String>,
    /// Pins caption selection; otherwise clock + entropy.
    pub seed: Option<u32>,
    pub render: RenderConfig,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub enum InputPayload {
    ImageBase64 { data_b64: String },
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub enum OutputArtifact {
    Json { data: serde_json::Value },
    ImageBase64 { data_b64: String, filename: String, mime: String },
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ConvertRequest { pub from: String, pub to: String, pub options: TransformOpts, pub payload: InputPayload }

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ConvertResponse { pub artifacts: Vec<OutputArtifact> }

fn session_for(opts: &TransformOpts, glyphs: Arc<GlyphSource>) -> Session {
    let seeds: Box<dyn SeedSource> = match opts.seed {
        Some(s) => Box::new(FixedSeed(s)),
        None => Box::new(ClockSeed),
    };
    let mut session = Session::new(Captioner::new(seeds), glyphs);
    if let Some(style) = opts.style.as_deref() {
        session.set_style(style);
    }
    if let Some(kw) = opts.keywords.as_deref() {
        session.set_keywords(kw);
    }
    session
}

/// Load, analyze and caption; the session is ready to render.
pub fn prepare_session(image_bytes: &[u8], opts: &TransformOpts, glyphs: Arc<GlyphSource>) -> Result<Session> {
    let mut session = session_for(opts, glyphs);
    session.load(opts.source_name.as_deref(), image_bytes).context("image analysis failed")?;
    if let Some(text) = opts.caption.as_deref() {
        session.set_caption(text);
    }
    Ok(session)
}

/// IMAGE -> profile JSON
pub fn image_to_profile(image_bytes: &[u8], opts: &TransformOpts, glyphs: Arc<GlyphSource>) -> Result<serde_json::Value> {
    let session = prepare_session(image_bytes, opts, glyphs)?;
    let profile = session.profile().context("no profile after load")?;
    Ok(serde_json::json!({
        "profile": profile,
        "summary": profile.summary(),
    }))
}

/// IMAGE -> caption JSON
pub fn image_to_caption(image_bytes: &[u8], opts: &TransformOpts, glyphs: Arc<GlyphSource>) -> Result<serde_json::Value> {
    let session = prepare_session(image_bytes, opts, glyphs)?;
    let summary = session.profile().map(|p| p.summary());
    Ok(serde_json::json!({
        "style": session.style().as_str(),
        "caption": session.caption(),
        "summary": summary,
    }))
}

/// IMAGE -> captioned IMAGE. `None` when the caption ends up blank.
pub fn image_to_image(image_bytes: &[u8], opts: &TransformOpts, glyphs: Arc<GlyphSource>) -> Result<Option<RenderedOutput>> {
    let mut session = prepare_session(image_bytes, opts, glyphs)?;
    let out = session.render(opts.render.clone()).context("render failed")?;
    Ok(out.cloned())
}

/// Public entry helper to route based on request
pub fn handle_convert(req: ConvertRequest, glyphs: Arc<GlyphSource>) -> Result<ConvertResponse> {
    let mut artifacts = vec![];
    let InputPayload::ImageBase64 { data_b64 } = &req.payload;
    let bytes = B64.decode(data_b64).context("payload is not valid base64")?;
    info!(from = %req.from, to = %req.to, bytes = bytes.len(), "convert request");

    match (req.from.as_str(), req.to.as_str()) {
        ("image", "json") => {
            let data = image_to_profile(&bytes, &req.options, glyphs)?;
            artifacts.push(OutputArtifact::Json { data });
        }
        ("image", "caption") => {
            let data = image_to_caption(&bytes, &req.options, glyphs)?;
            artifacts.push(OutputArtifact::Json { data });
        }
        ("image", "image") => match image_to_image(&bytes, &req.options, glyphs)? {
            Some(out) => artifacts.push(OutputArtifact::ImageBase64 {
                data_b64: B64.encode(&out.bytes),
                filename: out.filename.clone(),
                mime: out.mime().to_string(),
            }),
            None => artifacts.push(OutputArtifact::Json {
                data: serde_json::json!({ "skipped": "caption is empty" }),
            }),
        },
        _ => {
            artifacts.push(OutputArtifact::Json {
                data: serde_json::json!({ "error": format!("unsupported transformation {} -> {}", req.from, req.to) }),
            });
        }
    }
    Ok(ConvertResponse { artifacts })
}
