//! Speaker output through rodio (enabled by the `audio` feature).

use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::warn;

use crate::sound::{AudioSink, Tone, ToneSamples, SAMPLE_RATE};

impl Source for ToneSamples {
    fn current_span_len(&self) -> Option<usize> {
        Some(self.remaining())
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.remaining() as f32 / SAMPLE_RATE as f32,
        ))
    }
}

/// Plays every tone on its own detached sink so overlapping cues mix.
pub struct RodioSink {
    stream: OutputStream,
}

impl RodioSink {
    /// `None` when no output device can be opened.
    pub fn open() -> Option<Self> {
        match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                Some(Self { stream })
            }
            Err(e) => {
                warn!(error = %e, "audio output unavailable; running silent");
                None
            }
        }
    }
}

impl AudioSink for RodioSink {
    fn play_tone(&mut self, tone: Tone) {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(tone.samples());
        sink.detach();
    }
}
