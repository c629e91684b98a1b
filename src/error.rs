//! 統一エラーハンドリング
//!
//! flac_stream_encoder 全体で使用するエラー型を定義します。
//! 初期化失敗の `Display` は呼び出し側（ホスト境界層）へそのまま渡せる
//! 固定メッセージになっており、詳細はログ用に別フィールドで保持します。

use thiserror::Error;

/// 境界層が初期化失敗・不正使用を通知する際に送出する例外クラス名
pub const BOUNDARY_EXCEPTION: &str = "java.lang.IllegalArgumentException";

/// flac_stream_encoder 全体で使用する統一エラー型
#[derive(Debug, Error)]
pub enum FlacStreamError {
    // ========================================
    // 構築時の検証エラー
    // ========================================
    #[error("Unsupported bits per sample: {0} (expected 8 or 16)")]
    UnsupportedBitDepth(u32),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // ========================================
    // initialize() の失敗
    // ========================================
    #[error("No file name given!")]
    NoTarget,

    #[error("Could not create FLAC encoder!")]
    EncoderCreation { detail: String },

    #[error("Could not set up FLAC encoder with the given parameters!")]
    Configuration { detail: String },

    #[error("Could not initialize FLAC encoder for the given file!")]
    TargetInit { detail: String },

    // ========================================
    // エンコード中の失敗
    // ========================================
    #[error("FLAC encoder rejected a frame: {detail}")]
    Encode { detail: String },

    // ========================================
    // 不正使用
    // ========================================
    #[error("Called without a valid encoder instance!")]
    InvalidSession,

    #[error("Unknown session handle: {0}")]
    UnknownHandle(u64),

    // ========================================
    // I/O
    // ========================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 統一Result型エイリアス
pub type Result<T> = std::result::Result<T, FlacStreamError>;

/// String への変換（境界層は失敗理由を文字列で受け取る）
impl From<FlacStreamError> for String {
    fn from(error: FlacStreamError) -> Self {
        error.to_string()
    }
}

// ========================================
// ヘルパー関数
// ========================================

impl FlacStreamError {
    /// ライブラリ / I/O 層から得た詳細。固定メッセージ以外の情報が無ければ `None`
    pub fn detail(&self) -> Option<&str> {
        match self {
            FlacStreamError::EncoderCreation { detail }
            | FlacStreamError::Configuration { detail }
            | FlacStreamError::TargetInit { detail }
            | FlacStreamError::Encode { detail } => Some(detail.as_str()),
            _ => None,
        }
    }

    /// `initialize()` が返す失敗かどうか
    pub fn is_init_failure(&self) -> bool {
        matches!(
            self,
            FlacStreamError::NoTarget
                | FlacStreamError::EncoderCreation { .. }
                | FlacStreamError::Configuration { .. }
                | FlacStreamError::TargetInit { .. }
        )
    }

    /// 境界層が送出すべき例外クラス名
    pub fn boundary_exception(&self) -> &'static str {
        BOUNDARY_EXCEPTION
    }
}
