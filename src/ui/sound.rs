/// Sound engine: procedural chiptune effects via rodio.
///
/// Every effect is a short note sequence rendered to an in-memory WAV
/// buffer at init time. Playback is fire-and-forget via a detached Sink.
///
/// Build without the "sound" feature to get a silent stub with the same API.

use crate::sim::event::GameEvent;

/// The effects the game can play.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Sfx {
    Step,
    Hit,
    StageClear,
    Win,
    GameOver,
}

impl Sfx {
    /// Which effect (if any) an event should trigger.
    pub fn for_event(event: &GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::PlayerMoved => Some(Sfx::Step),
            GameEvent::PlayerHit { .. } => Some(Sfx::Hit),
            GameEvent::StageCleared { .. } => Some(Sfx::StageClear),
            GameEvent::GameWon { .. } => Some(Sfx::Win),
            GameEvent::GameOver { .. } => Some(Sfx::GameOver),
            _ => None,
        }
    }

    /// (frequency Hz, seconds) per note, and overall volume.
    #[cfg_attr(not(feature = "sound"), allow(dead_code))]
    fn score(self) -> (&'static [(f32, f32)], f32) {
        match self {
            Sfx::Step       => (NOTES_STEP, 0.15),
            Sfx::Hit        => (NOTES_HIT, 0.3),
            Sfx::StageClear => (NOTES_CLEAR, 0.3),
            Sfx::Win        => (NOTES_WIN, 0.3),
            Sfx::GameOver   => (NOTES_GAME_OVER, 0.3),
        }
    }
}

const NOTES_STEP: &[(f32, f32)] = &[(880.0, 0.025)];
const NOTES_HIT: &[(f32, f32)] = &[(330.0, 0.08), (247.0, 0.08), (165.0, 0.16)];
const NOTES_CLEAR: &[(f32, f32)] = &[(523.0, 0.08), (659.0, 0.08), (784.0, 0.16)];
const NOTES_WIN: &[(f32, f32)] = &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.35)];
const NOTES_GAME_OVER: &[(f32, f32)] = &[(440.0, 0.14), (370.0, 0.14), (311.0, 0.14), (220.0, 0.4)];

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;
    const ALL: [Sfx; 5] = [Sfx::Step, Sfx::Hit, Sfx::StageClear, Sfx::Win, Sfx::GameOver];

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: HashMap<Sfx, Arc<Vec<u8>>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            let buffers = ALL.iter()
                .map(|&sfx| {
                    let (notes, volume) = sfx.score();
                    (sfx, Arc::new(make_wav(&render_notes(notes, volume))))
                })
                .collect();

            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = match self.buffers.get(&sfx) {
                Some(b) => b,
                None => return,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }

    /// Square-ish tone per note (fundamental plus a third harmonic),
    /// each note with its own linear decay.
    fn render_notes(notes: &[(f32, f32)], volume: f32) -> Vec<f32> {
        let tau = 2.0 * std::f32::consts::PI;
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - i as f32 / n as f32;
                let wave = (t * freq * tau).sin() * 0.75 + (t * freq * 3.0 * tau).sin() * 0.25;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Wrap mono f32 samples in a 16-bit PCM WAV container.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let channels: u16 = 1;
        let bits: u16 = 16;
        let block_align = channels * bits / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}
