#![allow(dead_code)]

use std::path::Path;

/// デコード結果
pub struct Decoded {
    pub sample_rate: u32,
    pub channels: u32,
    pub bits_per_sample: u32,
    pub total_samples: Option<u64>,
    pub md5: [u8; 16],
    pub samples: Vec<i32>,
}

/// claxon で FLAC ファイルを読み、インターリーブ済みサンプルを返す
pub fn decode_flac(path: &Path) -> Decoded {
    let mut reader = claxon::FlacReader::open(path).expect("open flac");
    let info = reader.streaminfo();
    let samples = reader
        .samples()
        .collect::<Result<Vec<i32>, _>>()
        .expect("decode samples");
    Decoded {
        sample_rate: info.sample_rate,
        channels: info.channels,
        bits_per_sample: info.bits_per_sample,
        total_samples: info.samples,
        md5: info.md5sum,
        samples,
    }
}

pub fn pcm16_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

pub fn pcm8_bytes(samples: &[i8]) -> Vec<u8> {
    samples.iter().map(|&s| s as u8).collect()
}

/// 圧縮が効きすぎない程度に変化する 16bit 信号
pub fn test_signal_i16(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = i as f64 / 44100.0;
            let tone = (t * 440.0 * std::f64::consts::TAU).sin() * 12000.0;
            let ramp = ((i * 37) % 2001) as f64 - 1000.0;
            (tone + ramp).round() as i16
        })
        .collect()
}
