//! Minimal RIFF/WAVE container for synthesized speech.
//!
//! The upstream returns raw 16-bit mono PCM at 24 kHz; playback needs a
//! canonical 44-byte WAVE header in front of it. Unwrapping reproduces the
//! original PCM byte-for-byte.

use lumina_domain::error::{Error, Result};

/// Sample rate the speech model emits.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

const HEADER_LEN: usize = 44;

/// Wrap raw 16-bit mono PCM in a canonical WAVE container.
pub fn pcm16_to_wav(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let byte_rate = sample_rate * 2;
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // format: PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // channels: mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Recover the PCM bytes from a container produced by [`pcm16_to_wav`].
pub fn wav_to_pcm16(wav: &[u8]) -> Result<&[u8]> {
    if wav.len() < HEADER_LEN {
        return Err(Error::Audio("container shorter than a WAVE header".into()));
    }
    if &wav[0..4] != b"RIFF" || &wav[8..12] != b"WAVE" {
        return Err(Error::Audio("not a RIFF/WAVE container".into()));
    }
    if &wav[12..16] != b"fmt " || &wav[36..40] != b"data" {
        return Err(Error::Audio("unexpected chunk layout".into()));
    }

    let declared = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
    let available = wav.len() - HEADER_LEN;
    if declared != available {
        return Err(Error::Audio(format!(
            "data chunk declares {declared} bytes but {available} are present"
        )));
    }

    Ok(&wav[HEADER_LEN..])
}
