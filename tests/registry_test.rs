mod common;

use common::{decode_flac, pcm16_bytes};
use flac_stream_encoder::{FlacStreamError, SessionRegistry};
use tempfile::tempdir;

/// ハンドル経由の construct → write → destroy で有効な FLAC が残る
#[test]
fn handle_lifecycle_produces_decodable_stream() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("handle.flac");
    let mut registry = SessionRegistry::new();

    let handle = registry
        .construct(path.to_str().unwrap(), 44100, 1, 16)
        .unwrap();
    let buf = pcm16_bytes(&[100, -100]);
    assert_eq!(registry.write(handle, &buf, buf.len()).unwrap(), 4);
    registry.destroy(handle);

    assert_eq!(decode_flac(&path).samples, vec![100, -100]);
}

/// 初期化失敗の理由は境界層へそのまま渡せる文字列になる
#[test]
fn construct_failure_reports_reason_and_exception_name() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("no-such-dir").join("x.flac");
    let mut registry = SessionRegistry::new();

    let err = registry
        .construct(bad.to_str().unwrap(), 44100, 1, 16)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not initialize FLAC encoder for the given file!"
    );
    assert_eq!(err.boundary_exception(), "java.lang.IllegalArgumentException");
    assert!(registry.is_empty());
}

/// 破棄済みハンドルへの write は無効セッション
#[test]
fn write_after_destroy_is_invalid_session() {
    let dir = tempdir().unwrap();
    let mut registry = SessionRegistry::new();
    let handle = registry
        .construct(dir.path().join("gone.flac").to_str().unwrap(), 16000, 1, 8)
        .unwrap();
    registry.destroy(handle);

    let err = registry.write(handle, &[1, 2, 3], 3).unwrap_err();
    assert!(matches!(err, FlacStreamError::InvalidSession));
    assert_eq!(err.to_string(), "Called without a valid encoder instance!");
}

/// 表ごと破棄しても開いていたセッションは確定される
#[test]
fn dropping_registry_finalizes_open_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaked.flac");
    {
        let mut registry = SessionRegistry::new();
        let handle = registry
            .construct(path.to_str().unwrap(), 44100, 2, 16)
            .unwrap();
        let buf = pcm16_bytes(&[1, -1, 2, -2, 3, -3]);
        registry.write(handle, &buf, buf.len()).unwrap();
    }
    assert_eq!(decode_flac(&path).samples, vec![1, -1, 2, -2, 3, -3]);
}
