//! STREAMINFO の確定処理。
//!
//! ヘッダはストリーム開始時に書き出されるため、フレームサイズ・総サンプル数・MD5 は
//! 未確定 (0) のままになる。`finish` 時に書き出し済みヘッダを書き換える。
//!
//! レイアウト: `fLaC` (4) + メタデータブロックヘッダ (4) + STREAMINFO 本体 (34)

use std::io::{self, Seek, SeekFrom, Write};

/// `fLaC` マーカー
pub const STREAM_MARKER: &[u8; 4] = b"fLaC";
/// STREAMINFO 本体の開始位置
pub const STREAM_INFO_OFFSET: usize = 8;
/// STREAMINFO 本体の長さ
pub const STREAM_INFO_LEN: usize = 34;
/// マーカーから STREAMINFO 末尾までの長さ
pub const HEADER_LEN: usize = STREAM_INFO_OFFSET + STREAM_INFO_LEN;

const MAX_FRAME_SIZE: u32 = (1 << 24) - 1;
const MAX_TOTAL_SAMPLES: u64 = (1 << 36) - 1;

/// ストリーム終了時に確定する値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub min_frame_size: u32,
    pub max_frame_size: u32,
    /// チャンネルあたりのサンプル数
    pub total_samples: u64,
    pub md5: [u8; 16],
}

impl StreamSummary {
    /// 書き出したフレームのバイト長を記録する
    pub fn record_frame(&mut self, frame_len: usize) {
        let len = u32::try_from(frame_len).unwrap_or(u32::MAX).min(MAX_FRAME_SIZE);
        if self.min_frame_size == 0 || len < self.min_frame_size {
            self.min_frame_size = len;
        }
        self.max_frame_size = self.max_frame_size.max(len);
    }
}

/// ヘッダが `fLaC` + STREAMINFO で始まっているか
pub fn is_stream_header(header: &[u8]) -> bool {
    header.len() >= HEADER_LEN
        && &header[..4] == STREAM_MARKER
        && header[4] & 0x7F == 0
        && header[5..8] == [0, 0, STREAM_INFO_LEN as u8]
}

/// `header` (先頭 `HEADER_LEN` バイト) の STREAMINFO を `summary` で書き換える
pub fn patch_header(header: &mut [u8], summary: &StreamSummary) {
    let info = &mut header[STREAM_INFO_OFFSET..HEADER_LEN];

    info[4..7].copy_from_slice(&summary.min_frame_size.to_be_bytes()[1..]);
    info[7..10].copy_from_slice(&summary.max_frame_size.to_be_bytes()[1..]);

    // byte 13: 上位 4bit は bits-per-sample の下位、下位 4bit は総サンプル数の上位
    let total = summary.total_samples.min(MAX_TOTAL_SAMPLES);
    info[13] = (info[13] & 0xF0) | ((total >> 32) as u8 & 0x0F);
    info[14..18].copy_from_slice(&(total as u32).to_be_bytes());

    info[18..34].copy_from_slice(&summary.md5);
}

/// 書き出し済みストリームの先頭へ戻ってヘッダを上書きし、末尾へ戻る
pub fn rewrite_header<W: Write + Seek>(sink: &mut W, header: &[u8]) -> io::Result<()> {
    sink.flush()?;
    sink.seek(SeekFrom::Start(0))?;
    sink.write_all(header)?;
    sink.seek(SeekFrom::End(0))?;
    sink.flush()
}
