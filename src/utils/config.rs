//! グローバル環境変数設定
//!
//! CLI で使用する環境変数を一元管理。
//! プロセス起動時に一度だけ初期化し、以降はどこからでもアクセス可能。

use once_cell::sync::OnceCell;
use std::sync::Arc;

/// グローバル環境変数設定
static ENV_CONFIG: OnceCell<Arc<EnvConfig>> = OnceCell::new();

/// 1 回の `write` に渡す既定の読み込みサイズ
pub const DEFAULT_CHUNK_BYTES: usize = 4096;

/// 環境変数設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// ログフィルタ (`FLAC_STREAM_LOG`)
    pub log_filter: Option<String>,
    /// 読み込みチャンクサイズ (`FLAC_STREAM_CHUNK_BYTES`)
    pub chunk_bytes: usize,
    /// 環境変数ファイルのパス (`FLAC_STREAM_ENV_PATH`)
    pub env_path: Option<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            env_path: None,
        }
    }
}

impl EnvConfig {
    /// 環境変数から設定を読み取る（グローバルには登録しない）
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の取得関数から設定を組み立てる
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let chunk_bytes = lookup("FLAC_STREAM_CHUNK_BYTES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_CHUNK_BYTES);

        Self {
            log_filter: lookup("FLAC_STREAM_LOG").filter(|v| !v.trim().is_empty()),
            chunk_bytes,
            env_path: lookup("FLAC_STREAM_ENV_PATH"),
        }
    }

    /// 環境変数から設定を初期化
    ///
    /// 既に初期化済みの場合は何もしない（冪等）。
    pub fn init() {
        if ENV_CONFIG.get().is_some() {
            return;
        }
        // 並列実行時の競合を考慮：既に他のスレッドが初期化していても成功とする
        let _ = ENV_CONFIG.set(Arc::new(Self::from_env()));
    }

    /// 設定を取得。未初期化なら環境変数から初期化する
    pub fn get() -> Arc<EnvConfig> {
        ENV_CONFIG
            .get_or_init(|| Arc::new(Self::from_env()))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = EnvConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg, EnvConfig::default());
    }

    #[test]
    fn reads_values() {
        let cfg = EnvConfig::from_lookup(lookup_from(&[
            ("FLAC_STREAM_LOG", "debug"),
            ("FLAC_STREAM_CHUNK_BYTES", "1024"),
            ("FLAC_STREAM_ENV_PATH", "/tmp/flac.env"),
        ]));
        assert_eq!(cfg.log_filter.as_deref(), Some("debug"));
        assert_eq!(cfg.chunk_bytes, 1024);
        assert_eq!(cfg.env_path.as_deref(), Some("/tmp/flac.env"));
    }

    #[test]
    fn invalid_chunk_size_falls_back() {
        for bad in ["0", "-3", "lots", ""] {
            let cfg = EnvConfig::from_lookup(lookup_from(&[("FLAC_STREAM_CHUNK_BYTES", bad)]));
            assert_eq!(cfg.chunk_bytes, DEFAULT_CHUNK_BYTES);
        }
    }

    #[test]
    fn global_init_is_idempotent() {
        EnvConfig::init();
        let a = EnvConfig::get();
        EnvConfig::init();
        assert!(Arc::ptr_eq(&a, &EnvConfig::get()));
    }
}
