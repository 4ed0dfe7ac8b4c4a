use std::sync::Arc;
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use parking_lot::Mutex;
use sonora_playback::EngineError;

use crate::mixer::Mixer;

/// Thread that owns the cpal stream. `cpal::Stream` is not `Send` on every
/// platform, so it never leaves this thread; the mixer is the only shared part.
pub(crate) struct OutputThread {
    shutdown: kanal::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl OutputThread {
    pub(crate) fn spawn() -> Result<(Self, Arc<Mutex<Mixer>>), EngineError> {
        let (ready_tx, ready_rx) = kanal::bounded::<Result<Arc<Mutex<Mixer>>, EngineError>>(1);
        let (shutdown_tx, shutdown_rx) = kanal::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("sonora-audio".into())
            .spawn(move || {
                let stream = match open_stream() {
                    Ok((stream, mixer)) => {
                        let _ = ready_tx.send(Ok(mixer));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // returns on shutdown or when the engine is gone
                let _ = shutdown_rx.recv();
                drop(stream);
                tracing::debug!("Audio output thread stopped");
            })?;

        let mixer = ready_rx
            .recv()
            .map_err(|_| EngineError::Output("Audio thread exited during startup".into()))??;

        Ok((
            Self {
                shutdown: shutdown_tx,
                handle: Some(handle),
            },
            mixer,
        ))
    }
}

impl Drop for OutputThread {
    fn drop(&mut self) {
        let _ = self.shutdown.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Audio output thread panicked");
            }
        }
    }
}

fn open_stream() -> Result<(Stream, Arc<Mutex<Mixer>>), EngineError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| EngineError::Output("No output device available".into()))?;
    let supported = device
        .default_output_config()
        .map_err(|e| EngineError::Output(format!("Failed to get default output config: {e}")))?;

    let config: StreamConfig = supported.config();
    let mixer = Arc::new(Mutex::new(Mixer::new(
        config.sample_rate.0,
        config.channels as usize,
    )));

    let stream = match supported.sample_format() {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&mixer))?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&mixer))?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&mixer))?,
        other => {
            return Err(EngineError::Output(format!(
                "Unsupported sample format: {other:?}"
            )));
        }
    };
    stream
        .play()
        .map_err(|e| EngineError::Output(format!("Failed to start stream: {e}")))?;

    tracing::info!(
        "Audio output on {} at {} Hz, {} channel(s)",
        device.name().unwrap_or_else(|_| "default device".into()),
        config.sample_rate.0,
        config.channels
    );

    Ok((stream, mixer))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<Stream, EngineError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut scratch: Vec<f32> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                mixer.lock().render(&mut scratch);

                for (out, sample) in data.iter_mut().zip(&scratch) {
                    *out = T::from_sample(sample.clamp(-1.0, 1.0));
                }
            },
            |err| tracing::error!("Audio output error: {err}"),
            None,
        )
        .map_err(|e| EngineError::Output(format!("Failed to build output stream: {e}")))
}
