/// `.env` から `FLAC_STREAM_LOG` / `FLAC_STREAM_CHUNK_BYTES` を読み込む。
///
/// `FLAC_STREAM_ENV_PATH` があればそのファイルを優先する。ファイルが無くても
/// エラーにはせず、プロセスの環境変数だけで続行する。
pub fn load_env() {
    // EnvConfig の初期化前に実行する。ロガーもまだ無いので結果は捨てる
    let _ = match std::env::var_os("FLAC_STREAM_ENV_PATH") {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(drop),
    };
}
