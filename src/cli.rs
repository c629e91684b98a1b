use crate::domain::pcm::BitDepth;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "raw PCM (little-endian, interleaved) を FLAC に逐次エンコード"
)]
pub struct Cli {
    /// 入力 PCM ファイル。`-` で標準入力
    pub input: String,

    /// 出力 FLAC ファイル
    pub output: PathBuf,

    /// サンプルレート (Hz)
    #[arg(long, default_value_t = 44100)]
    pub rate: u32,

    /// チャンネル数
    #[arg(long, default_value_t = 1)]
    pub channels: u32,

    /// ビット深度 (8 / 16)
    #[arg(long, default_value_t = 16, value_parser = parse_bits)]
    pub bits: u32,

    /// 1 回の write に渡すバイト数。未指定なら FLAC_STREAM_CHUNK_BYTES
    #[arg(long)]
    pub chunk_bytes: Option<usize>,

    /// 結果を JSON で出力
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

fn parse_bits(s: &str) -> Result<u32, String> {
    let bits = s.parse::<u32>().map_err(|e| e.to_string())?;
    BitDepth::from_bits(bits)
        .map(BitDepth::bits)
        .map_err(|e| e.to_string())
}

impl Cli {
    pub fn reads_stdin(&self) -> bool {
        self.input == "-"
    }
}
