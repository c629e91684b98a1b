//! flacenc によるストリーミング FLAC エンコーダ。
//!
//! flacenc はストリーム全体を一度に受け取る API が中心のため、ここでは
//! フレーム単位 API (`encode_fixed_size_frame`) を使い、ブロックが埋まるたびに
//! 1 フレームずつエンコードして出力先へ書き出す。

use super::CompressionLevel;
use super::stream_info::{self, StreamSummary};
use crate::error::{FlacStreamError, Result};
use flacenc::bitsink::MemSink;
use flacenc::component::{BitRepr, Stream};
use flacenc::config;
use flacenc::error::{Verified, Verify};
use flacenc::source::{Fill, FrameBuf};
use std::io::{Seek, Write};

/// 出力先にバインドされた FLAC エンコーダ。
///
/// `W` はヘッダ確定のためにシーク可能である必要がある。
pub struct FlacStreamEncoder<W: Write + Seek> {
    cfg: Verified<config::Encoder>,
    stream: Stream,
    header: Vec<u8>,
    frame_buf: FrameBuf,
    block_size: usize,
    channels: usize,
    bits_per_sample: usize,
    verify: bool,
    /// ブロックに満たないインターリーブ済みサンプル
    pending: Vec<i32>,
    frame_number: usize,
    summary: StreamSummary,
    md5: md5::Context,
    sink: Option<W>,
    failed: bool,
}

impl<W: Write + Seek> FlacStreamEncoder<W> {
    /// エンコーダを構成します。出力先にはまだ何も書きません。
    ///
    /// ブロックバッファを確保できなければ `EncoderCreation`、
    /// パラメータがいずれかの段階で拒否された場合は `Configuration` を返す。
    pub fn new(
        sample_rate: u32,
        channels: u32,
        bits_per_sample: u32,
        level: CompressionLevel,
        verify: bool,
    ) -> Result<Self> {
        let block_size = level.block_size();
        let channels = channels as usize;
        let bits_per_sample = bits_per_sample as usize;

        let mut pending = Vec::new();
        pending
            .try_reserve_exact(block_size * channels)
            .map_err(|e| FlacStreamError::EncoderCreation {
                detail: format!("block buffer: {e}"),
            })?;

        let mut cfg = config::Encoder::default();
        cfg.block_size = block_size;
        let cfg = cfg.into_verified().map_err(|(_, e)| configuration("config verify", e))?;

        let mut stream = Stream::new(sample_rate as usize, channels, bits_per_sample)
            .map_err(|e| configuration("streaminfo", e))?;
        stream
            .stream_info_mut()
            .set_block_sizes(block_size, block_size)
            .map_err(|e| configuration("set block sizes", e))?;

        let frame_buf = FrameBuf::with_size(channels, block_size)
            .map_err(|e| configuration("framebuf", e))?;

        let mut sink = MemSink::<u8>::new();
        stream
            .write(&mut sink)
            .map_err(|e| configuration("header write", e))?;
        let header = sink.into_inner();
        if !stream_info::is_stream_header(&header) {
            return Err(FlacStreamError::Configuration {
                detail: format!("unexpected stream header layout ({} bytes)", header.len()),
            });
        }

        Ok(Self {
            cfg,
            stream,
            header,
            frame_buf,
            block_size,
            channels,
            bits_per_sample,
            verify,
            pending,
            frame_number: 0,
            summary: StreamSummary::default(),
            md5: md5::Context::new(),
            sink: None,
            failed: false,
        })
    }

    /// 出力先にバインドし、ストリームヘッダを書き出します。
    pub fn init(&mut self, mut sink: W) -> Result<()> {
        if self.sink.is_some() {
            return Err(FlacStreamError::TargetInit {
                detail: "encoder is already bound to a target".into(),
            });
        }
        sink.write_all(&self.header)
            .map_err(|e| FlacStreamError::TargetInit {
                detail: format!("header write failed: {e}"),
            })?;
        self.sink = Some(sink);
        tracing::debug!(
            block_size = self.block_size,
            channels = self.channels,
            bits_per_sample = self.bits_per_sample,
            "FLAC stream header written"
        );
        Ok(())
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// エラー状態に入っているか。一度失敗すると以降の処理はすべて拒否する。
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// これまでにフレーム化したチャンネルあたりのサンプル数
    pub fn samples_encoded(&self) -> u64 {
        self.summary.total_samples
    }

    /// インターリーブ済みサンプルを処理します。
    ///
    /// 完全なブロックはすぐにエンコードして書き出す。端数は次回呼び出しまで保持する。
    /// 失敗した場合は `false` を返し、以降の呼び出しもすべて `false` になる。
    pub fn process_interleaved(&mut self, samples: &[i32]) -> bool {
        if self.failed || self.sink.is_none() {
            return false;
        }
        if samples.is_empty() {
            return true;
        }

        self.pending.extend_from_slice(samples);
        let block_len = self.block_size * self.channels;
        let full = self.pending.len() / block_len * block_len;
        if full == 0 {
            return true;
        }

        let mut block = Vec::with_capacity(block_len);
        for start in (0..full).step_by(block_len) {
            block.clear();
            block.extend_from_slice(&self.pending[start..start + block_len]);
            if let Err(e) = self.encode_block(&block) {
                tracing::warn!(error = %e, frame = self.frame_number, "FLAC frame rejected");
                self.failed = true;
                return false;
            }
        }
        self.pending.drain(..full);
        true
    }

    /// 残りのサンプルをフラッシュし、STREAMINFO を確定して出力先を返します。
    ///
    /// チャンネル数に満たない末尾の端数サンプルは破棄する。
    pub fn finish(mut self) -> Result<W> {
        if self.failed {
            return Err(FlacStreamError::Encode {
                detail: "encoder is in an error state".into(),
            });
        }
        if self.sink.is_none() {
            return Err(FlacStreamError::InvalidSession);
        }

        let usable = self.pending.len() / self.channels * self.channels;
        if usable < self.pending.len() {
            tracing::warn!(
                dropped = self.pending.len() - usable,
                "dropping incomplete trailing inter-channel frame"
            );
        }
        if usable > 0 {
            let tail: Vec<i32> = self.pending[..usable].to_vec();
            self.encode_block(&tail)?;
        }
        self.pending.clear();

        self.summary.md5 = std::mem::replace(&mut self.md5, md5::Context::new())
            .compute()
            .0;
        let mut header = std::mem::take(&mut self.header);
        stream_info::patch_header(&mut header, &self.summary);

        let mut sink = self.sink.take().ok_or(FlacStreamError::InvalidSession)?;
        stream_info::rewrite_header(&mut sink, &header)?;

        tracing::info!(
            frames = self.frame_number,
            total_samples = self.summary.total_samples,
            min_frame_size = self.summary.min_frame_size,
            max_frame_size = self.summary.max_frame_size,
            "FLAC stream finalized"
        );
        Ok(sink)
    }

    /// 1 ブロックをエンコードして書き出す。末尾ブロックはブロックサイズ未満でもよい
    /// (`FrameBuf` は短い入力をそのまま短いフレームとして扱う)。
    fn encode_block(&mut self, interleaved: &[i32]) -> Result<()> {
        let size = interleaved.len() / self.channels;
        self.frame_buf
            .fill_interleaved(interleaved)
            .map_err(|e| encode_error("fill interleaved", e))?;
        let encoded = self.encode_frame(&self.frame_buf)?;

        let sink = self.sink.as_mut().ok_or(FlacStreamError::InvalidSession)?;
        sink.write_all(&encoded)?;

        self.update_md5(interleaved);
        self.summary.record_frame(encoded.len());
        self.summary.total_samples += size as u64;
        self.frame_number += 1;
        Ok(())
    }

    fn encode_frame(&self, frame_buf: &FrameBuf) -> Result<Vec<u8>> {
        let frame = flacenc::encode_fixed_size_frame(
            &self.cfg,
            frame_buf,
            self.frame_number,
            self.stream.stream_info(),
        )
        .map_err(|e| encode_error("encode frame", e))?;

        if self.verify {
            frame.verify().map_err(|e| encode_error("frame verify", e))?;
        }

        let mut sink = MemSink::<u8>::new();
        frame
            .write(&mut sink)
            .map_err(|e| encode_error("frame write", e))?;
        Ok(sink.into_inner())
    }

    /// MD5 は元の幅のリトルエンディアン表現で計算する
    fn update_md5(&mut self, interleaved: &[i32]) {
        let width = self.bits_per_sample.div_ceil(8);
        let mut bytes = Vec::with_capacity(interleaved.len() * width);
        for &s in interleaved {
            bytes.extend_from_slice(&s.to_le_bytes()[..width]);
        }
        self.md5.consume(&bytes);
    }
}

fn configuration(stage: &str, e: impl std::fmt::Debug) -> FlacStreamError {
    FlacStreamError::Configuration {
        detail: format!("{stage}: {e:?}"),
    }
}

fn encode_error(stage: &str, e: impl std::fmt::Debug) -> FlacStreamError {
    FlacStreamError::Encode {
        detail: format!("{stage}: {e:?}"),
    }
}
