use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::extraction::{recognize_frames, FrameRange, FrameRecognizer};
use crate::segmentation::SegmentationEngine;
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for subtitle extraction

/// Runs recognition, segmentation and rendering for one source
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Draw a progress bar while recognizing
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            config,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Recognize the configured time range and aggregate it into subtitles
    pub async fn extract<R>(&self, recognizer: &R) -> Result<SubtitleCollection, AppError>
    where
        R: FrameRecognizer + ?Sized,
    {
        let ocr = &self.config.ocr;
        let video = recognizer.info();

        let range = FrameRange::resolve(&ocr.time_start, ocr.time_end.as_deref(), &video)?;
        let engine = SegmentationEngine::new(ocr.segmentation_config(video.fps)?);

        info!(
            "Recognizing frames {}..{} of {} ({} fps)",
            range.start,
            range.end,
            recognizer.source().display(),
            video.fps
        );

        let progress = self.progress_bar();
        let frames = recognize_frames(
            recognizer,
            range,
            ocr.conf_threshold,
            ocr.concurrent_recognitions,
            &progress,
        )
        .await?;
        progress.finish_and_clear();

        let candidates = engine.segment(&frames);
        Ok(SubtitleCollection::from_candidates(
            recognizer.source().to_path_buf(),
            video.fps,
            &candidates,
        ))
    }

    /// Extract and write an SRT file
    pub async fn run<R, P>(&self, recognizer: &R, output: P) -> Result<SubtitleCollection>
    where
        R: FrameRecognizer + ?Sized,
        P: AsRef<Path>,
    {
        let output = output.as_ref();
        let subtitles = self.extract(recognizer).await?;

        subtitles
            .write_to_srt(output)
            .with_context(|| format!("Failed to save subtitles to {}", output.display()))?;

        info!("Success: {} subtitles written to {:?}", subtitles.entries.len(), output);
        Ok(subtitles)
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")
        {
            progress.set_style(style.progress_chars("#>-"));
        }
        progress
    }
}

/// SRT text of the configured range
pub async fn get_subtitles<R>(recognizer: &R, config: Config) -> Result<String, AppError>
where
    R: FrameRecognizer + ?Sized,
{
    let controller = Controller::with_config(config)?;
    Ok(controller.extract(recognizer).await?.to_srt_string())
}

/// Write the SRT text of the configured range to `path`
pub async fn save_subtitles_to_file<R, P>(recognizer: &R, config: Config, path: P) -> Result<()>
where
    R: FrameRecognizer + ?Sized,
    P: AsRef<Path>,
{
    let controller = Controller::with_config(config)?;
    controller.run(recognizer, path).await?;
    Ok(())
}
