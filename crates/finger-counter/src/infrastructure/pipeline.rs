//! Async frame pipeline: detector lines in, rendered counters out.
//!
//! `run_pipeline` reads newline-delimited detector frames from any
//! [`AsyncBufRead`] source, classifies each one through a [`FrameProcessor`],
//! and writes the rendered result to any [`AsyncWrite`] sink, flushing after
//! every frame so a viewer sees counts as soon as they are computed.
//!
//! The loop stops at end of input, or when the shared `running` flag is
//! cleared (Ctrl+C).  Reads use a short timeout so the flag is checked even
//! while the detector is idle.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::application::{ErrorPolicy, FrameProcessor, FrameRenderer, PipelineError};

/// How often the read loop wakes up to check the shutdown flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Frame counters reported when the pipeline stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Non-blank input lines.
    pub frames_read: u64,
    /// Frames classified and written to the sink.
    pub frames_rendered: u64,
    /// Frames dropped under [`ErrorPolicy::Skip`].
    pub frames_skipped: u64,
}

/// Runs the frame pipeline until end of input or shutdown.
///
/// Frames without a `frame` field are numbered from zero by their position
/// among non-blank input lines.  A line that is not valid UTF-8 is a frame
/// error like any other and goes through the error policy.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if reading or writing fails.  Under
/// [`ErrorPolicy::Abort`], also returns the first per-frame error.
pub async fn run_pipeline<R, W>(
    mut reader: R,
    writer: &mut W,
    processor: &FrameProcessor,
    renderer: &dyn FrameRenderer,
    running: Arc<AtomicBool>,
) -> Result<PipelineSummary, PipelineError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut summary = PipelineSummary::default();

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown requested; stopping frame pipeline");
            break;
        }

        // `read_until` keeps partial input in `buf` when the timeout fires, so
        // the next call resumes the same line.
        let read = timeout(SHUTDOWN_POLL_INTERVAL, reader.read_until(b'\n', &mut buf)).await;
        let at_eof = match read {
            Err(_elapsed) => continue,
            Ok(Ok(read)) => read == 0,
            Ok(Err(e)) => return Err(PipelineError::Io(e)),
        };

        if buf.iter().all(u8::is_ascii_whitespace) {
            buf.clear();
            if at_eof {
                debug!("end of detector input");
                break;
            }
            continue;
        }
        let position = summary.frames_read;
        summary.frames_read += 1;

        let outcome = processor.process_bytes(&buf, position);
        buf.clear();

        match outcome {
            Ok(Some(processed)) => {
                let text = renderer
                    .render_frame(&processed)
                    .map_err(|source| PipelineError::Protocol {
                        frame: processed.frame,
                        source,
                    })?;
                write_line(writer, &text).await?;
                summary.frames_rendered += 1;
            }
            Ok(None) => {}
            Err(e) => match processor.policy() {
                ErrorPolicy::Abort => return Err(e),
                ErrorPolicy::Skip => {
                    warn!("skipping frame: {e}");
                    summary.frames_skipped += 1;
                    let rendered = renderer.render_error(&e).map_err(|source| {
                        PipelineError::Protocol {
                            frame: e.frame().unwrap_or(position),
                            source,
                        }
                    })?;
                    if let Some(text) = rendered {
                        write_line(writer, &text).await?;
                    }
                }
            },
        }

        if at_eof {
            debug!("end of detector input");
            break;
        }
    }

    Ok(summary)
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{JsonRenderer, TextRenderer};
    use finger_core::{HandAggregator, ProtocolError};
    use tokio::io::BufReader;

    fn running() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(true))
    }

    #[tokio::test]
    async fn test_run_pipeline_empty_input_reads_nothing() {
        let mut out = Vec::new();

        let summary = run_pipeline(
            &b""[..],
            &mut out,
            &FrameProcessor::default(),
            &TextRenderer,
            running(),
        )
        .await
        .unwrap();

        assert_eq!(summary, PipelineSummary::default());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_pipeline_renders_empty_frames_as_zero_counts() {
        let input = b"{\"frame\":0}\n\n{\"frame\":1,\"hands\":[]}\n";
        let mut out = Vec::new();

        let summary = run_pipeline(
            &input[..],
            &mut out,
            &FrameProcessor::default(),
            &JsonRenderer,
            running(),
        )
        .await
        .unwrap();

        assert_eq!(summary.frames_read, 2);
        assert_eq!(summary.frames_rendered, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"frame\":0,\"counts\":{\"Left\":0,\"Right\":0}}\n\
             {\"frame\":1,\"counts\":{\"Left\":0,\"Right\":0}}\n"
        );
    }

    #[tokio::test]
    async fn test_run_pipeline_numbers_frames_without_frame_field() {
        let input = b"{}\n\n{}\n";
        let mut out = Vec::new();

        run_pipeline(
            &input[..],
            &mut out,
            &FrameProcessor::default(),
            &JsonRenderer,
            running(),
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let frames: Vec<&str> = text.lines().collect();
        assert!(frames[0].starts_with("{\"frame\":0,"));
        assert!(frames[1].starts_with("{\"frame\":1,"));
    }

    #[tokio::test]
    async fn test_run_pipeline_skip_policy_renders_error_and_continues() {
        let input = b"garbage\n{\"frame\":5}\n";
        let mut out = Vec::new();

        let summary = run_pipeline(
            &input[..],
            &mut out,
            &FrameProcessor::default(),
            &JsonRenderer,
            running(),
        )
        .await
        .unwrap();

        assert_eq!(summary.frames_skipped, 1);
        assert_eq!(summary.frames_rendered, 1);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("{\"frame\":0,\"error\":"));
        assert_eq!(lines[1], "{\"frame\":5,\"counts\":{\"Left\":0,\"Right\":0}}");
    }

    #[tokio::test]
    async fn test_run_pipeline_skip_policy_text_output_omits_errors() {
        let input = b"garbage\n{}\n";
        let mut out = Vec::new();

        run_pipeline(
            &input[..],
            &mut out,
            &FrameProcessor::default(),
            &TextRenderer,
            running(),
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Left Hand Fingers: 0\nRight Hand Fingers: 0\n"
        );
    }

    #[tokio::test]
    async fn test_run_pipeline_abort_policy_returns_first_error() {
        let processor = FrameProcessor::new(HandAggregator::default(), ErrorPolicy::Abort);
        let input = b"{}\nnot json\n{}\n";
        let mut out = Vec::new();

        let result = run_pipeline(&input[..], &mut out, &processor, &TextRenderer, running()).await;

        let err = result.unwrap_err();
        assert_eq!(err.frame(), Some(1));
        // The frame before the error was already written.
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Left Hand Fingers: 0\nRight Hand Fingers: 0\n"
        );
    }

    #[tokio::test]
    async fn test_run_pipeline_cleared_flag_stops_before_reading() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut out = Vec::new();

        let summary = run_pipeline(
            &b"{}\n{}\n"[..],
            &mut out,
            &FrameProcessor::default(),
            &TextRenderer,
            flag,
        )
        .await
        .unwrap();

        assert_eq!(summary.frames_read, 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_pipeline_processes_last_line_without_newline() {
        let mut out = Vec::new();

        let summary = run_pipeline(
            &b"{\"frame\":3}"[..],
            &mut out,
            &FrameProcessor::default(),
            &JsonRenderer,
            running(),
        )
        .await
        .unwrap();

        assert_eq!(summary.frames_rendered, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"frame\":3,\"counts\":{\"Left\":0,\"Right\":0}}\n"
        );
    }

    // ── Invalid UTF-8 ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_run_pipeline_skip_policy_skips_invalid_utf8_line() {
        // Arrange: the middle line is not UTF-8.
        let input = b"{\"frame\":0}\n\xff\xfe\n{\"frame\":2}\n";
        let mut out = Vec::new();

        // Act
        let summary = run_pipeline(
            &input[..],
            &mut out,
            &FrameProcessor::default(),
            &JsonRenderer,
            running(),
        )
        .await
        .unwrap();

        // Assert: the bad line is reported under its position and frame 2 still renders.
        assert_eq!(
            summary,
            PipelineSummary {
                frames_read: 3,
                frames_rendered: 2,
                frames_skipped: 1,
            }
        );
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("{\"frame\":1,\"error\":"));
        assert_eq!(lines[2], "{\"frame\":2,\"counts\":{\"Left\":0,\"Right\":0}}");
    }

    #[tokio::test]
    async fn test_run_pipeline_abort_policy_reports_invalid_utf8_as_frame_error() {
        let processor = FrameProcessor::new(HandAggregator::default(), ErrorPolicy::Abort);
        let mut out = Vec::new();

        let result = run_pipeline(
            &b"\xc3\x28\n"[..],
            &mut out,
            &processor,
            &TextRenderer,
            running(),
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::Protocol {
                frame: 0,
                source: ProtocolError::InvalidUtf8(_),
            })
        ));
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_run_pipeline_stops_when_flag_cleared_mid_stream() {
        // Arrange: an input that stays open after one frame, like an idle detector.
        let (mut detector, input) = tokio::io::duplex(1024);
        let flag = running();
        let stopper = Arc::clone(&flag);
        let processor = FrameProcessor::default();
        let mut out = Vec::new();

        let feed = async move {
            detector.write_all(b"{\"frame\":0}\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            stopper.store(false, Ordering::Relaxed);
            // Returned so the write half is not dropped, which would be EOF.
            detector
        };
        let pipeline = run_pipeline(
            BufReader::new(input),
            &mut out,
            &processor,
            &JsonRenderer,
            flag,
        );

        // Act
        let (summary, _detector) = timeout(Duration::from_secs(5), async {
            tokio::join!(pipeline, feed)
        })
        .await
        .expect("pipeline must stop within a few poll intervals");

        // Assert
        assert_eq!(summary.unwrap().frames_read, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"frame\":0,\"counts\":{\"Left\":0,\"Right\":0}}\n"
        );
    }
}
