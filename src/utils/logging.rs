use crate::utils::config::EnvConfig;
use tracing_subscriber::EnvFilter;

/// バイナリ用のログ初期化。stderr に出力する。
///
/// フィルタは `FLAC_STREAM_LOG` → `RUST_LOG` → `info` の順で決まる。
/// 二重初期化は無視する。
pub fn init_logging(config: &EnvConfig) {
    let filter = config
        .log_filter
        .as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
