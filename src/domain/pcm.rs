//! PCM サンプル幅の表現と、エンコーダ内部表現 (`i32`) への拡張。
//!
//! 入力バッファはリトルエンディアン符号付き整数のインターリーブ列として解釈する。
//! チャンネル分離はここでは行わない。

use crate::error::{FlacStreamError, Result};

/// 対応するサンプル幅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    /// ビット数から変換。8 / 16 以外は構築時点で拒否する。
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            other => Err(FlacStreamError::UnsupportedBitDepth(other)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }

    /// 1 サンプルあたりのバイト数
    pub fn bytes_per_sample(self) -> usize {
        self.bits() as usize / 8
    }

    /// `byte_count` バイトに含まれる完全なサンプル数（端数は切り捨て）
    pub fn sample_count(self, byte_count: usize) -> usize {
        byte_count / self.bytes_per_sample()
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = FlacStreamError;

    fn try_from(bits: u32) -> Result<Self> {
        BitDepth::from_bits(bits)
    }
}

/// `bytes` を `depth` 幅の符号付きサンプル列として `out` に符号拡張して追加する。
///
/// 端数バイトは無視する。戻り値は追加したサンプル数。
pub fn widen_into(bytes: &[u8], depth: BitDepth, out: &mut Vec<i32>) -> usize {
    let count = depth.sample_count(bytes.len());
    out.reserve(count);
    match depth {
        BitDepth::Eight => {
            out.extend(bytes[..count].iter().map(|&b| i32::from(b as i8)));
        }
        BitDepth::Sixteen => {
            out.extend(
                bytes[..count * 2]
                    .chunks_exact(2)
                    .map(|pair| i32::from(i16::from_le_bytes([pair[0], pair[1]]))),
            );
        }
    }
    count
}

/// `widen_into` の簡易版。新しい `Vec` を返す。
pub fn widen(bytes: &[u8], depth: BitDepth) -> Vec<i32> {
    let mut out = Vec::with_capacity(depth.sample_count(bytes.len()));
    widen_into(bytes, depth, &mut out);
    out
}
