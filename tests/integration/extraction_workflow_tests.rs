/*!
 * Integration tests for the recognition fan-out and the full extraction workflow
 */

use anyhow::Result;
use indicatif::ProgressBar;

use videocr::app_config::Config;
use videocr::errors::{AppError, ConfigError, RecognitionError};
use videocr::extraction::recognize_frames;
use videocr::recognition::RecognitionData;
use videocr::{get_subtitles, save_subtitles_to_file, Controller, FrameRange, FrameRecognizer, TsvDumpRecognizer};

use crate::common::{self, MockRecognizer};

const TWO_CUES_SRT: &str = "0\n00:00:00,000 --> 00:00:00,900\nGood morning\n\n\
                            1\n00:00:02,000 --> 00:00:02,900\nSee you later\n\n";

fn two_cue_texts() -> Vec<&'static str> {
    (0..40)
        .map(|i| match i {
            0..=9 => "Good morning",
            20..=29 => "See you later",
            _ => "",
        })
        .collect()
}

#[tokio::test]
async fn test_recognizeFrames_withConcurrency_shouldKeepFrameOrder() -> Result<()> {
    let recognizer = MockRecognizer::from_texts(25.0, &["a", "b", "c", "d", "e", "f", "g", "h"], 90);
    let range = FrameRange { start: 2, end: 8 };

    let frames = recognize_frames(&recognizer, range, 65, 4, &ProgressBar::hidden()).await?;

    let indices: Vec<usize> = frames.iter().map(|f| f.index()).collect();
    assert_eq!(indices, vec![2, 3, 4, 5, 6, 7]);
    assert_eq!(frames[0].text(), "c");
    Ok(())
}

#[tokio::test]
async fn test_recognizeFrames_withEngineFailure_shouldReturnFailingFrame() {
    let recognizer = MockRecognizer::from_texts(25.0, &["a"; 10], 90).failing_at(6);
    let range = FrameRange { start: 0, end: 10 };

    let result = recognize_frames(&recognizer, range, 65, 3, &ProgressBar::hidden()).await;

    assert!(matches!(result, Err(RecognitionError::EngineFailed { index: 6, .. })));
}

#[tokio::test]
async fn test_getSubtitles_withMockRecognizer_shouldRenderSrt() -> Result<()> {
    common::init_logging();
    let recognizer = MockRecognizer::from_texts(10.0, &two_cue_texts(), 80);

    let srt = get_subtitles(&recognizer, Config::default()).await?;

    assert_eq!(srt, TWO_CUES_SRT);
    Ok(())
}

#[tokio::test]
async fn test_extract_withConcurrencyOne_shouldMatchParallelRun() -> Result<()> {
    let recognizer = MockRecognizer::from_texts(10.0, &two_cue_texts(), 80);
    let mut sequential = Config::default();
    sequential.ocr.concurrent_recognitions = 1;
    let mut parallel = Config::default();
    parallel.ocr.concurrent_recognitions = 16;

    let a = Controller::with_config(sequential)?.extract(&recognizer).await?;
    let b = Controller::with_config(parallel)?.extract(&recognizer).await?;

    assert_eq!(a.entries, b.entries);
    Ok(())
}

#[tokio::test]
async fn test_extract_withTimeStart_shouldKeepAbsoluteTimestamps() -> Result<()> {
    let recognizer = MockRecognizer::from_texts(10.0, &two_cue_texts(), 80);
    let mut config = Config::default();
    config.ocr.time_start = "0:02".to_string();

    let subtitles = Controller::with_config(config)?.extract(&recognizer).await?;

    assert_eq!(subtitles.entries.len(), 1);
    assert_eq!(subtitles.entries[0].seq_num, 0);
    assert_eq!(subtitles.entries[0].start_time_ms, 2_000);
    assert_eq!(subtitles.entries[0].end_time_ms, 2_900);
    assert_eq!(subtitles.entries[0].text, "See you later");
    Ok(())
}

#[tokio::test]
async fn test_extract_withEndBeforeStart_shouldBeConfigError() {
    let recognizer = MockRecognizer::from_texts(10.0, &two_cue_texts(), 80);
    let mut config = Config::default();
    config.ocr.time_start = "0:03".to_string();
    config.ocr.time_end = Some("0:01".to_string());

    let result = Controller::with_config(config).unwrap().extract(&recognizer).await;

    assert!(matches!(
        result,
        Err(AppError::Config(ConfigError::InvalidTimeRange { start: 30, end: 10 }))
    ));
}

#[test]
fn test_withConfig_withInvalidThreshold_shouldFail() {
    let mut config = Config::default();
    config.ocr.conf_threshold = 250;

    assert!(matches!(
        Controller::with_config(config),
        Err(AppError::Config(ConfigError::ThresholdOutOfRange { name: "conf_threshold", value: 250 }))
    ));
}

#[test]
fn test_extract_withBlankVideo_shouldProduceEmptySrt() -> Result<()> {
    let recognizer = MockRecognizer::new(24.0, vec![RecognitionData::NoResult; 48]);

    let srt = tokio_test::block_on(get_subtitles(&recognizer, Config::default()))?;

    assert_eq!(srt, "");
    Ok(())
}

#[tokio::test]
async fn test_saveSubtitlesToFile_withTsvDumps_shouldWriteSrt() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let dump_dir = temp_dir.path().join("dumps");
    std::fs::create_dir_all(&dump_dir)?;

    let frames: Vec<Vec<(u32, i32, &str)>> = (0..30)
        .map(|i| match i {
            0..=9 => vec![(1, 90, "Good"), (1, 88, "morning"), (2, 91, "friend")],
            20..=29 => vec![(1, 93, "Bye"), (1, 30, "x")],
            _ => Vec::new(),
        })
        .collect();
    common::write_dumps(&dump_dir, &frames)?;
    common::create_test_file(&dump_dir, "notes.tsv", "not a frame")?;

    let recognizer = TsvDumpRecognizer::open(&dump_dir, 10.0, 1920, 1080)?;
    assert_eq!(recognizer.dump_count(), 20);
    assert_eq!(recognizer.info().frame_count, 30);

    let output = temp_dir.path().join("dumps.srt");
    save_subtitles_to_file(&recognizer, Config::default(), &output).await?;

    let content = std::fs::read_to_string(&output)?;
    assert_eq!(
        content,
        "0\n00:00:00,000 --> 00:00:00,900\nGood morning\nfriend\n\n\
         1\n00:00:02,000 --> 00:00:02,900\nBye\n\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_tsvDumpRecognizer_shouldTreatMissingDumpAsNoResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "frame_000003.tsv", &common::tsv_dump(&[(1, 95, "Hi")]))?;

    let recognizer = TsvDumpRecognizer::open(temp_dir.path(), 25.0, 0, 0)?;

    assert_eq!(recognizer.recognize(1).await?, RecognitionData::NoResult);
    assert!(matches!(recognizer.recognize(3).await?, RecognitionData::LineRecords(ref rows) if rows.len() == 1));
    assert!(matches!(
        recognizer.recognize(4).await,
        Err(RecognitionError::FrameOutOfRange { index: 4, frame_count: 4 })
    ));
    Ok(())
}
