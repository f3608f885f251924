//! Default output device playback through cpal.
//!
//! `cpal::Stream` is not `Send`, so the stream lives on its own thread and is
//! kept alive until [`CpalOutput`] is dropped.

use std::{
    sync::{PoisonError, mpsc},
    thread::JoinHandle,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, StreamConfig};

use crate::error::ClientError;

use super::SharedToneBank;

pub struct CpalOutput {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl CpalOutput {
    /// Open the default output device and start pulling samples from `bank`.
    ///
    /// # Errors
    ///
    /// Returns an error if no device is available or the stream cannot be built or started.
    pub fn start(bank: SharedToneBank) -> Result<Self, ClientError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), ClientError>>();

        let handle = std::thread::spawn(move || {
            let stream = match build_stream(bank) {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));

            // Keep stream alive until stop signal
            let _ = stop_rx.recv();
            drop(stream);
            tracing::debug!("Audio stream stopped");
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                stop_tx,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(ClientError::Audio("audio thread exited early".to_string()))
            }
        }
    }
}

fn build_stream(bank: SharedToneBank) -> Result<cpal::Stream, ClientError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| ClientError::Audio("no output device available".to_string()))?;

    let supported_config = device
        .default_output_config()
        .map_err(|e| ClientError::Audio(format!("failed to get output config: {}", e)))?;

    let channels = supported_config.channels();
    let sample_rate = supported_config.sample_rate();
    let config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Default,
    };

    bank.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .set_sample_rate(sample_rate.0);

    tracing::info!(
        "Opening audio output at {}Hz with {} channel(s)",
        sample_rate.0,
        channels
    );

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                bank.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .fill(data, channels as usize);
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| ClientError::Audio(format!("failed to build output stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| ClientError::Audio(format!("failed to start playback: {}", e)))?;

    Ok(stream)
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
