//! Suppression of redundant partial writes
//!
//! A partial refresh of an unchanged frame still drives the waveform. After
//! the same frame went out a few times in a row the panel has settled, so
//! further copies are dropped.

use log::debug;

use crate::error::Result;
use crate::graphics::MonochromeBuffer;
use crate::traits::Sink;

/// How often the same frame is sent in a row before it is suppressed
pub const MAX_REPEATS: u8 = 3;

/// What happened to a frame handed to [`WriteCache::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The frame went out to the sink
    Written,
    /// The frame equals the last one, which was already sent often enough
    Suppressed,
}

/// Remembers the last frame and how often it went out in a row
#[derive(Debug, Default, Clone)]
pub struct WriteCache {
    last: Option<MonochromeBuffer>,
    repeat_count: u8,
}

impl WriteCache {
    /// An empty cache, the first frame is always written
    pub fn new() -> Self {
        WriteCache::default()
    }

    /// The frame most recently written
    pub fn last(&self) -> Option<&MonochromeBuffer> {
        self.last.as_ref()
    }

    /// How often [`last`](Self::last) went out in a row
    pub fn repeat_count(&self) -> u8 {
        self.repeat_count
    }

    /// Sends `buffer` unless it already went out [`MAX_REPEATS`] times in a row
    ///
    /// The cache only changes once the sink accepted the frame, so a failed
    /// write is retried in full by the next call.
    pub fn write<S: Sink + ?Sized>(
        &mut self,
        buffer: &MonochromeBuffer,
        sink: &mut S,
    ) -> Result<WriteOutcome> {
        let repeated = self.last.as_ref() == Some(buffer);
        if repeated && self.repeat_count >= MAX_REPEATS {
            debug!("frame unchanged after {} writes, skipped", self.repeat_count);
            return Ok(WriteOutcome::Suppressed);
        }

        sink.write(buffer)?;

        if repeated {
            self.repeat_count += 1;
        } else {
            self.last = Some(buffer.clone());
            self.repeat_count = 1;
        }
        debug!("frame written, repeat count {}", self.repeat_count);
        Ok(WriteOutcome::Written)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::{Error, ErrorKind};
    use crate::graphics::DisplayGeometry;
    use crate::traits::UpdateMode;
    use embedded_hal::spi;

    /// Sink that counts writes and can be told to fail
    #[derive(Debug, Default)]
    pub(crate) struct CountingSink {
        pub written: Vec<MonochromeBuffer>,
        pub fail_next: bool,
        pub inits: Vec<UpdateMode>,
        pub resets: usize,
    }

    impl Sink for CountingSink {
        fn geometry(&self) -> DisplayGeometry {
            DisplayGeometry::new(8, 2)
        }

        fn write(&mut self, buffer: &MonochromeBuffer) -> Result<()> {
            if std::mem::take(&mut self.fail_next) {
                return Err(Error::Interface(ErrorKind::SpiError(spi::ErrorKind::Other)));
            }
            self.written.push(buffer.clone());
            Ok(())
        }

        fn init(&mut self, mode: UpdateMode) -> Result<()> {
            self.inits.push(mode);
            Ok(())
        }

        fn reset(&mut self) -> Result<()> {
            self.resets += 1;
            Ok(())
        }
    }

    fn frame(color: Color) -> MonochromeBuffer {
        MonochromeBuffer::filled(DisplayGeometry::new(8, 2), color)
    }

    #[test]
    fn first_write_goes_out() {
        let mut cache = WriteCache::new();
        let mut sink = CountingSink::default();
        let outcome = cache.write(&frame(Color::Black), &mut sink).unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(cache.repeat_count(), 1);
        assert_eq!(sink.written.len(), 1);
    }

    #[test]
    fn identical_frames_are_capped() {
        let mut cache = WriteCache::new();
        let mut sink = CountingSink::default();
        let black = frame(Color::Black);

        let outcomes: Vec<_> = (0..4)
            .map(|_| cache.write(&black, &mut sink).unwrap())
            .collect();
        assert_eq!(
            outcomes,
            vec![
                WriteOutcome::Written,
                WriteOutcome::Written,
                WriteOutcome::Written,
                WriteOutcome::Suppressed
            ]
        );
        assert_eq!(sink.written.len(), 3);
        assert_eq!(cache.repeat_count(), MAX_REPEATS);
    }

    #[test]
    fn different_frame_resets_the_count() {
        let mut cache = WriteCache::new();
        let mut sink = CountingSink::default();
        for _ in 0..4 {
            cache.write(&frame(Color::Black), &mut sink).unwrap();
        }
        let white = frame(Color::White);
        assert_eq!(
            cache.write(&white, &mut sink).unwrap(),
            WriteOutcome::Written
        );
        assert_eq!(cache.repeat_count(), 1);
        assert_eq!(cache.last(), Some(&white));
        assert_eq!(sink.written.len(), 4);
    }

    #[test]
    fn alternating_frames_always_go_out() {
        let mut cache = WriteCache::new();
        let mut sink = CountingSink::default();
        for i in 0..10 {
            let color = if i % 2 == 0 { Color::Black } else { Color::White };
            cache.write(&frame(color), &mut sink).unwrap();
        }
        assert_eq!(sink.written.len(), 10);
    }

    #[test]
    fn failed_write_leaves_cache_untouched() {
        let mut cache = WriteCache::new();
        let mut sink = CountingSink::default();
        let black = frame(Color::Black);
        cache.write(&black, &mut sink).unwrap();

        sink.fail_next = true;
        assert!(cache.write(&frame(Color::White), &mut sink).is_err());
        assert_eq!(cache.last(), Some(&black));
        assert_eq!(cache.repeat_count(), 1);

        sink.fail_next = true;
        assert!(cache.write(&black, &mut sink).is_err());
        assert_eq!(cache.repeat_count(), 1);
    }
}
