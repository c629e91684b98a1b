//! エンコードセッション。
//!
//! 1 つの出力ファイルに対する `initialize` → `write`* → `destroy` の流れを管理する。
//! すべての操作は呼び出し元スレッドで同期的に完了し、内部でロックは取らない。

use crate::domain::params::SessionParams;
use crate::domain::pcm;
use crate::error::{FlacStreamError, Result};
use crate::infrastructure::audio::encoder::{COMPRESSION_LEVEL, FlacStreamEncoder};
use scopeguard::ScopeGuard;
use std::fs::{self, File};
use std::io::BufWriter;

type FileEncoder = FlacStreamEncoder<BufWriter<File>>;

/// セッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 構築直後。まだ I/O は行っていない
    Uninitialized,
    /// エンコーダがバインド済みで `write` を受け付ける
    Ready,
    /// `initialize` に失敗した。`write` は何もしない
    Failed,
    /// `destroy` 済み
    Closed,
}

/// PCM バッファを受け取り、FLAC としてファイルへ逐次書き出すセッション。
pub struct EncoderSession {
    params: SessionParams,
    /// `Ready` の間だけ `Some`
    encoder: Option<FileEncoder>,
    state: SessionState,
    /// 拡張済みサンプルの作業領域
    widened: Vec<i32>,
    bytes_consumed: u64,
    samples_written: u64,
}

impl EncoderSession {
    /// パラメータを受け取って構築します。I/O はすべて `initialize` まで遅延する。
    pub fn new(params: SessionParams) -> Self {
        Self {
            params,
            encoder: None,
            state: SessionState::Uninitialized,
            widened: Vec::new(),
            bytes_consumed: 0,
            samples_written: 0,
        }
    }

    /// プリミティブ値から構築する。ビット深度などの検証はここで行う。
    pub fn with_params(
        target: impl Into<std::path::PathBuf>,
        sample_rate: u32,
        channels: u32,
        bits_per_sample: u32,
    ) -> Result<Self> {
        Ok(Self::new(SessionParams::new(
            target,
            sample_rate,
            channels,
            bits_per_sample,
        )?))
    }

    /// 出力先を開き、エンコーダを構成してストリームヘッダを書き出します。
    ///
    /// 失敗時は途中まで確保したエンコーダと作成済みの出力ファイルを解放し、
    /// セッションを `Failed` にする。`Failed` からの再試行は許す。
    pub fn initialize(&mut self) -> Result<()> {
        match self.state {
            SessionState::Ready => return Ok(()),
            SessionState::Closed => return Err(FlacStreamError::InvalidSession),
            SessionState::Uninitialized | SessionState::Failed => {}
        }

        match self.open_encoder() {
            Ok(encoder) => {
                self.encoder = Some(encoder);
                self.state = SessionState::Ready;
                tracing::debug!(
                    target_path = %self.params.target().display(),
                    sample_rate = self.params.sample_rate(),
                    channels = self.params.channels(),
                    bits_per_sample = self.params.bits_per_sample(),
                    "encoder session ready"
                );
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                tracing::warn!(
                    target_path = %self.params.target().display(),
                    reason = %e,
                    detail = e.detail().unwrap_or(""),
                    "encoder session initialization failed"
                );
                Err(e)
            }
        }
    }

    fn open_encoder(&self) -> Result<FileEncoder> {
        // 1) 出力先
        if !self.params.has_target() {
            return Err(FlacStreamError::NoTarget);
        }

        // 2) + 3) エンコーダ確保と構成
        let mut encoder = FileEncoder::new(
            self.params.sample_rate(),
            self.params.channels(),
            self.params.bits_per_sample(),
            COMPRESSION_LEVEL,
            true,
        )?;

        // 4) 出力先へバインド。ここで失敗したら作成したファイルは消す
        let path = self.params.target().to_path_buf();
        let file = File::create(&path).map_err(|e| FlacStreamError::TargetInit {
            detail: format!("{}: {e}", path.display()),
        })?;
        let guard = scopeguard::guard(path, |path| {
            let _ = fs::remove_file(&path);
        });
        encoder.init(BufWriter::new(file))?;
        ScopeGuard::into_inner(guard);

        Ok(encoder)
    }

    /// `buffer` の先頭 `byte_count` バイトを PCM として処理します。
    ///
    /// - エンコーダが無い (未初期化 / 初期化失敗 / 破棄済み) 場合は `InvalidSession`
    /// - 長さ 0、またはエンコーダが拒否した場合は `Ok(0)`
    /// - 成功時は消費したバイト数。`byte_count` はバッファ長で頭打ちにする
    ///
    /// 端数バイト（サンプル幅で割り切れない分）は呼び出し側の責任で、ここでは切り捨てる。
    pub fn write(&mut self, buffer: &[u8], byte_count: usize) -> Result<usize> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(FlacStreamError::InvalidSession);
        };

        let len = byte_count.min(buffer.len());
        if len == 0 {
            return Ok(0);
        }

        self.widened.clear();
        let depth = self.params.bit_depth();
        let samples = pcm::widen_into(&buffer[..len], depth, &mut self.widened);

        if !encoder.process_interleaved(&self.widened) {
            // どこまで書けたかは分からないので何も消費しなかったことにする
            tracing::warn!(bytes = len, samples, "encoder rejected PCM block");
            return Ok(0);
        }

        self.bytes_consumed += len as u64;
        self.samples_written += samples as u64;
        Ok(len)
    }

    /// ストリームを確定して出力先を閉じます。冪等。
    ///
    /// 終了処理中のエラーはログに残して握りつぶす。
    pub fn destroy(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        if let Some(encoder) = self.encoder.take() {
            match encoder.finish() {
                Ok(sink) => {
                    if let Err(e) = sink.into_inner().map(drop) {
                        tracing::warn!(error = %e, "failed to flush FLAC output");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to finalize FLAC stream");
                }
            }
        }

        self.widened = Vec::new();
        self.state = SessionState::Closed;
        tracing::debug!(
            target_path = %self.params.target().display(),
            bytes_consumed = self.bytes_consumed,
            samples_written = self.samples_written,
            "encoder session closed"
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.encoder.is_some()
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// `write` が受け付けた入力バイト数の累計
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    /// `write` が受け付けたサンプル数の累計（全チャンネル合計）
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }
}

impl Drop for EncoderSession {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for EncoderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderSession")
            .field("params", &self.params)
            .field("state", &self.state)
            .field("bytes_consumed", &self.bytes_consumed)
            .finish()
    }
}
