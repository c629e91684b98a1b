//! ホスト境界向けのセッション表。
//!
//! 境界層には生ポインタではなく不透明なハンドルを渡し、1 回の `construct` に対して
//! 1 回の `destroy` で寿命を閉じる。

use crate::domain::session::EncoderSession;
use crate::error::{FlacStreamError, Result};
use std::collections::HashMap;
use std::fmt;

/// セッションを指す不透明な識別子。再利用はしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// ハンドルからセッションを引く表
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionHandle, EncoderSession>,
    next_id: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// セッションを構築して初期化し、成功したらハンドルを返します。
    ///
    /// 初期化に失敗したセッションはその場で破棄し、失敗理由を返す。
    pub fn construct(
        &mut self,
        target: &str,
        sample_rate: u32,
        channels: u32,
        bits_per_sample: u32,
    ) -> Result<SessionHandle> {
        let mut session =
            EncoderSession::with_params(target, sample_rate, channels, bits_per_sample)?;
        session.initialize()?;

        self.next_id += 1;
        let handle = SessionHandle(self.next_id);
        self.sessions.insert(handle, session);
        tracing::debug!(%handle, target_path = target, "session registered");
        Ok(handle)
    }

    /// ハンドルに対応するセッションへ書き込みます。
    ///
    /// 未知 / 破棄済みのハンドルは `InvalidSession`。
    pub fn write(
        &mut self,
        handle: SessionHandle,
        buffer: &[u8],
        byte_count: usize,
    ) -> Result<usize> {
        match self.sessions.get_mut(&handle) {
            Some(session) => session.write(buffer, byte_count),
            None => Err(FlacStreamError::InvalidSession),
        }
    }

    /// セッションを確定して表から取り除きます。未知のハンドルは無視する。
    pub fn destroy(&mut self, handle: SessionHandle) {
        if let Some(mut session) = self.sessions.remove(&handle) {
            session.destroy();
            tracing::debug!(%handle, "session destroyed");
        }
    }

    /// ハンドルが生きているか確認する
    pub fn session(&self, handle: SessionHandle) -> Result<&EncoderSession> {
        self.sessions
            .get(&handle)
            .ok_or(FlacStreamError::UnknownHandle(handle.id()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Drop for SessionRegistry {
    fn drop(&mut self) {
        for (handle, mut session) in self.sessions.drain() {
            tracing::debug!(%handle, "destroying leaked session");
            session.destroy();
        }
    }
}
