//! Speaker: tone synthesis on a worker thread.
//!
//! The control actor never blocks on audio.  [`SpeakerAudio`] implements
//! the audio port by posting [`AudioCommand`]s into a shared
//! [`AudioQueue`]; the speaker thread runs a [`SpeakerWorker`] that turns
//! each signal into 16-bit mono PCM and pushes it to a [`PcmSink`]
//! (the I2S amplifier on target).
//!
//! ```text
//!   control actor ──try_send──▶ AudioQueue ──block_on(receive)──▶ SpeakerWorker ──▶ I2S
//!        │ stop()                    ▲
//!        └── generation += 1 ────────┘  (playing signal aborts at the next chunk)
//! ```

use core::f32::consts::TAU;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, warn};

use crate::app::ports::AudioPort;
use crate::settings::catalog::{Signal, Tone};

pub const SAMPLE_RATE_HZ: u32 = 44_100;
/// Peak sample value at 100 % volume.
pub const MAX_AMPLITUDE: i32 = 3_000;
/// Samples per write; 10 ms at the sample rate.
pub const CHUNK_SAMPLES: usize = (SAMPLE_RATE_HZ / 100) as usize;

const AUDIO_QUEUE_DEPTH: usize = 4;

/// Peak amplitude for `volume` percent.
pub fn amplitude(volume: u8) -> i16 {
    (MAX_AMPLITUDE * i32::from(volume.min(100)) / 100) as i16
}

/// Sample count for a tone of `duration_ms`.
pub fn samples_for(duration_ms: u16) -> usize {
    (SAMPLE_RATE_HZ as usize * usize::from(duration_ms)) / 1000
}

// ───────────────────────────────────────────────────────────────
// Synthesis
// ───────────────────────────────────────────────────────────────

/// Phase-continuous sine oscillator.
#[derive(Debug, Default)]
pub struct ToneSynth {
    phase: f32,
}

impl ToneSynth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill `out` with the next samples of `frequency_hz`.  A frequency
    /// of 0 is a rest and writes silence.
    pub fn fill(&mut self, frequency_hz: u16, amplitude: i16, out: &mut [i16]) {
        if frequency_hz == 0 {
            out.fill(0);
            self.phase = 0.0;
            return;
        }
        let step = TAU * f32::from(frequency_hz) / SAMPLE_RATE_HZ as f32;
        let amp = f32::from(amplitude);
        for s in out.iter_mut() {
            *s = (amp * self.phase.sin()) as i16;
            self.phase += step;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Command queue
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play {
        signal: Signal,
        volume: u8,
        generation: u32,
    },
    Stop,
}

pub struct AudioQueue {
    chan: Channel<CriticalSectionRawMutex, AudioCommand, AUDIO_QUEUE_DEPTH>,
    generation: AtomicU32,
}

impl AudioQueue {
    pub const fn new() -> Self {
        Self {
            chan: Channel::new(),
            generation: AtomicU32::new(0),
        }
    }

    fn generation(&self) -> u32 {
        self.generation.load(Ordering::Acquire)
    }

    fn post(&self, cmd: AudioCommand) {
        if self.chan.try_send(cmd).is_err() {
            warn!("Speaker: queue full, dropped {:?}", cmd);
        }
    }
}

impl Default for AudioQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio port handle held by the control actor.
#[derive(Clone, Copy)]
pub struct SpeakerAudio<'a> {
    queue: &'a AudioQueue,
}

impl<'a> SpeakerAudio<'a> {
    pub fn new(queue: &'a AudioQueue) -> Self {
        Self { queue }
    }
}

impl AudioPort for SpeakerAudio<'_> {
    fn play_signal(&mut self, signal: &Signal, volume: u8) {
        self.queue.post(AudioCommand::Play {
            signal: *signal,
            volume,
            generation: self.queue.generation(),
        });
    }

    fn stop(&mut self) {
        self.queue.generation.fetch_add(1, Ordering::AcqRel);
        self.queue.post(AudioCommand::Stop);
    }
}

// ───────────────────────────────────────────────────────────────
// Worker
// ───────────────────────────────────────────────────────────────

/// Destination for synthesised PCM.
pub trait PcmSink {
    /// Write one chunk.  `false` aborts the rest of the signal.
    fn write(&mut self, samples: &[i16]) -> bool;

    /// Playback ended or was stopped.
    fn silence(&mut self) {}
}

pub struct SpeakerWorker<'a, S> {
    queue: &'a AudioQueue,
    sink: S,
    synth: ToneSynth,
    buf: [i16; CHUNK_SAMPLES],
}

impl<'a, S: PcmSink> SpeakerWorker<'a, S> {
    pub fn new(queue: &'a AudioQueue, sink: S) -> Self {
        Self {
            queue,
            sink,
            synth: ToneSynth::new(),
            buf: [0; CHUNK_SAMPLES],
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Speaker thread body.
    pub fn run(&mut self) -> ! {
        loop {
            let cmd = futures_lite::future::block_on(self.queue.chan.receive());
            self.service(cmd);
        }
    }

    /// Handle every queued command without blocking.  Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while let Ok(cmd) = self.queue.chan.try_receive() {
            self.service(cmd);
            n += 1;
        }
        n
    }

    pub fn service(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Stop => self.sink.silence(),
            AudioCommand::Play {
                signal,
                volume,
                generation,
            } => {
                if generation != self.queue.generation() {
                    debug!("Speaker: '{}' superseded before start", signal.name);
                    return;
                }
                let amp = amplitude(volume);
                for tone in signal.tones {
                    if !self.play_tone(tone, amp, generation) {
                        debug!("Speaker: '{}' aborted", signal.name);
                        break;
                    }
                }
                self.sink.silence();
            }
        }
    }

    fn play_tone(&mut self, tone: &Tone, amp: i16, generation: u32) -> bool {
        let mut remaining = samples_for(tone.duration_ms);
        while remaining > 0 {
            if self.queue.generation() != generation {
                return false;
            }
            let n = remaining.min(CHUNK_SAMPLES);
            self.synth.fill(tone.frequency_hz, amp, &mut self.buf[..n]);
            if !self.sink.write(&self.buf[..n]) {
                return false;
            }
            remaining -= n;
        }
        true
    }
}

// ───────────────────────────────────────────────────────────────
// I2S sink (target only)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use i2s::I2sSink;

#[cfg(target_os = "espidf")]
mod i2s {
    use esp_idf_svc::sys::*;
    use log::{info, warn};

    use super::{PcmSink, SAMPLE_RATE_HZ};
    use crate::error::Error;
    use crate::pins;

    /// MAX98357A on I2S0, 16-bit mono Philips frames.
    pub struct I2sSink {
        handle: i2s_chan_handle_t,
        enabled: bool,
    }

    impl I2sSink {
        pub fn new() -> Result<Self, Error> {
            let chan_cfg = i2s_chan_config_t {
                id: i2s_port_t_I2S_NUM_0,
                role: i2s_role_t_I2S_ROLE_MASTER,
                dma_desc_num: 6,
                dma_frame_num: 240,
                auto_clear: true,
                ..Default::default()
            };
            let mut handle: i2s_chan_handle_t = core::ptr::null_mut();
            // SAFETY: called once from the speaker thread before any write.
            let ret = unsafe { i2s_new_channel(&chan_cfg, &mut handle, core::ptr::null_mut()) };
            if ret != ESP_OK {
                return Err(Error::Init("I2S channel"));
            }

            let std_cfg = i2s_std_config_t {
                clk_cfg: i2s_std_clk_config_t {
                    sample_rate_hz: SAMPLE_RATE_HZ,
                    clk_src: soc_periph_i2s_clk_src_t_I2S_CLK_SRC_DEFAULT,
                    mclk_multiple: i2s_mclk_multiple_t_I2S_MCLK_MULTIPLE_256,
                    ..Default::default()
                },
                slot_cfg: i2s_std_slot_config_t {
                    data_bit_width: i2s_data_bit_width_t_I2S_DATA_BIT_WIDTH_16BIT,
                    slot_bit_width: i2s_slot_bit_width_t_I2S_SLOT_BIT_WIDTH_AUTO,
                    slot_mode: i2s_slot_mode_t_I2S_SLOT_MODE_MONO,
                    slot_mask: i2s_std_slot_mask_t_I2S_STD_SLOT_LEFT,
                    ws_width: 16,
                    ws_pol: false,
                    bit_shift: true,
                    ..Default::default()
                },
                gpio_cfg: i2s_std_gpio_config_t {
                    mclk: gpio_num_t_GPIO_NUM_NC,
                    bclk: pins::SPEAKER_BCK_GPIO,
                    ws: pins::SPEAKER_LCK_GPIO,
                    dout: pins::SPEAKER_DIN_GPIO,
                    din: gpio_num_t_GPIO_NUM_NC,
                    ..Default::default()
                },
            };
            // SAFETY: `handle` was just created and is not yet enabled.
            let ret = unsafe { i2s_channel_init_std_mode(handle, &std_cfg) };
            if ret != ESP_OK {
                return Err(Error::Init("I2S std mode"));
            }
            info!("Speaker: I2S ready at {} Hz", SAMPLE_RATE_HZ);
            Ok(Self {
                handle,
                enabled: false,
            })
        }
    }

    impl PcmSink for I2sSink {
        fn write(&mut self, samples: &[i16]) -> bool {
            if !self.enabled {
                // SAFETY: the handle is owned by this sink.
                if unsafe { i2s_channel_enable(self.handle) } != ESP_OK {
                    return false;
                }
                self.enabled = true;
            }
            let mut written = 0usize;
            // SAFETY: `samples` outlives the call; the driver copies into DMA.
            let ret = unsafe {
                i2s_channel_write(
                    self.handle,
                    samples.as_ptr() as *const _,
                    core::mem::size_of_val(samples),
                    &mut written,
                    100,
                )
            };
            if ret != ESP_OK {
                warn!("Speaker: I2S write failed ({})", ret);
                return false;
            }
            true
        }

        fn silence(&mut self) {
            if self.enabled {
                // SAFETY: the handle is owned by this sink.
                unsafe { i2s_channel_disable(self.handle) };
                self.enabled = false;
            }
        }
    }
}
