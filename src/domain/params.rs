use crate::domain::pcm::BitDepth;
use crate::error::{FlacStreamError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// FLAC が表現できるサンプルレートの上限 (Hz)
pub const MAX_SAMPLE_RATE: u32 = 655_350;
/// FLAC が表現できるチャンネル数の上限
pub const MAX_CHANNELS: u32 = 8;

/// セッション構築時に与える静的パラメータ。構築後は変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionParams {
    target: PathBuf,
    sample_rate: u32,
    channels: u32,
    #[serde(serialize_with = "serialize_depth")]
    bit_depth: BitDepth,
}

impl SessionParams {
    /// パラメータを検証して構築します。I/O は行いません。
    ///
    /// 空の出力先はここでは拒否せず、`initialize()` が "No file name given!" を返す。
    pub fn new(
        target: impl Into<PathBuf>,
        sample_rate: u32,
        channels: u32,
        bits_per_sample: u32,
    ) -> Result<Self> {
        let bit_depth = BitDepth::from_bits(bits_per_sample)?;
        if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
            return Err(FlacStreamError::InvalidParameter(format!(
                "sample rate {sample_rate} Hz is outside 1..={MAX_SAMPLE_RATE}"
            )));
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(FlacStreamError::InvalidParameter(format!(
                "channel count {channels} is outside 1..={MAX_CHANNELS}"
            )));
        }
        Ok(Self {
            target: target.into(),
            sample_rate,
            channels,
            bit_depth,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn has_target(&self) -> bool {
        !self.target.as_os_str().is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.bit_depth.bits()
    }
}

fn serialize_depth<S: serde::Serializer>(
    depth: &BitDepth,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u32(depth.bits())
}
