use fundsp::prelude64::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

const SAMPLE_RATE: u32 = 44100;

/// One-shot sound effects, synthesized up front into sample buffers.
/// `new` yields `None` when no audio device is available; the game runs
/// silent in that case.
pub struct Audio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    jump: Vec<f32>,
    crash: Vec<f32>,
}

impl Audio {
    pub fn new() -> Option<Self> {
        let (stream, handle) = OutputStream::try_default().ok()?;
        Some(Audio {
            _stream: stream,
            handle,
            jump: jump_samples(),
            crash: crash_samples(),
        })
    }

    /// Short rising blip on a successful jump.
    pub fn jump(&self) {
        self.play(self.jump.clone());
    }

    /// Falling sawtooth on game over.
    pub fn crash(&self) {
        self.play(self.crash.clone());
    }

    fn play(&self, samples: Vec<f32>) {
        if let Ok(sink) = Sink::try_new(&self.handle) {
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
            sink.detach();
        }
    }
}

fn jump_samples() -> Vec<f32> {
    // 440Hz -> 880Hz sine sweep with a fast fade-out.
    let freq = lfo(|t| lerp(440.0, 880.0, (t / 0.12).min(1.0)));
    let gain = lfo(|t| lerp(0.2, 0.0, (t / 0.12).min(1.0)));
    let mut unit = (freq >> sine()) * gain;
    render(&mut unit, 0.12)
}

fn crash_samples() -> Vec<f32> {
    // 400Hz -> 80Hz sawtooth ramp fading over half a second.
    let freq = lfo(|t| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
    let mut unit = (freq >> saw()) * gain;
    render(&mut unit, 0.5)
}

fn render(unit: &mut impl AudioUnit, duration: f64) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (duration * SAMPLE_RATE as f64) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}
