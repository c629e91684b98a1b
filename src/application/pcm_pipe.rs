//! 任意の `Read` から raw PCM を読み、セッションへ流し込む。

use crate::domain::session::EncoderSession;
use crate::error::{FlacStreamError, Result};
use serde::Serialize;
use std::io::{ErrorKind, Read};

/// エンコード結果の要約
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeSummary {
    pub bytes_read: u64,
    pub bytes_consumed: u64,
    /// 全チャンネル合計のサンプル数
    pub samples: u64,
    /// 末尾で捨てたバイト数（1 フレームに満たない端数）
    pub trailing_bytes: usize,
    pub write_calls: u64,
}

/// `reader` を EOF まで読み、フレーム境界に揃えて `session.write` に渡します。
///
/// セッションは初期化済みである必要がある。終了処理 (`destroy`) は呼び出し側で行う。
pub fn pump<R: Read>(
    reader: &mut R,
    session: &mut EncoderSession,
    chunk_bytes: usize,
) -> Result<EncodeSummary> {
    let params = session.params();
    let frame_bytes = params.bit_depth().bytes_per_sample() * params.channels() as usize;
    // フレーム境界に揃えたチャンク長
    let chunk_bytes = (chunk_bytes.max(frame_bytes) / frame_bytes) * frame_bytes;

    let mut summary = EncodeSummary {
        bytes_read: 0,
        bytes_consumed: 0,
        samples: 0,
        trailing_bytes: 0,
        write_calls: 0,
    };
    let mut buf = vec![0u8; chunk_bytes];
    let mut filled = 0usize;

    loop {
        let n = match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        summary.bytes_read += n as u64;
        filled += n;

        let aligned = filled / frame_bytes * frame_bytes;
        if filled < chunk_bytes || aligned == 0 {
            continue;
        }
        feed(session, &buf[..aligned], &mut summary)?;
        buf.copy_within(aligned..filled, 0);
        filled -= aligned;
    }

    let aligned = filled / frame_bytes * frame_bytes;
    if aligned > 0 {
        feed(session, &buf[..aligned], &mut summary)?;
    }
    summary.trailing_bytes = filled - aligned;
    if summary.trailing_bytes > 0 {
        tracing::warn!(
            bytes = summary.trailing_bytes,
            "input ended with an incomplete frame; ignoring it"
        );
    }
    summary.samples = session.samples_written();
    Ok(summary)
}

fn feed(session: &mut EncoderSession, data: &[u8], summary: &mut EncodeSummary) -> Result<()> {
    summary.write_calls += 1;
    let consumed = session.write(data, data.len())?;
    if consumed == 0 {
        return Err(FlacStreamError::Io(std::io::Error::other(format!(
            "encoder rejected a block of {} bytes",
            data.len()
        ))));
    }
    summary.bytes_consumed += consumed as u64;
    Ok(())
}
