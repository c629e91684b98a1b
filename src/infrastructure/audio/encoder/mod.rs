pub mod flac;
pub mod stream_info;

pub use flac::FlacStreamEncoder;

/// 圧縮レベル (0 = 最速, 8 = 最大圧縮)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompressionLevel(u8);

/// セッションが使用する固定の圧縮レベル
pub const COMPRESSION_LEVEL: CompressionLevel = CompressionLevel(5);

impl CompressionLevel {
    pub fn value(self) -> u8 {
        self.0
    }

    /// レベルごとのブロックサイズ（サンプル数 / チャンネル）
    pub fn block_size(self) -> usize {
        match self.0 {
            0..=1 => 1152,
            2..=3 => 2048,
            4..=6 => 4096,
            _ => 4608,
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        COMPRESSION_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_level_uses_4096_blocks() {
        assert_eq!(COMPRESSION_LEVEL.value(), 5);
        assert_eq!(COMPRESSION_LEVEL.block_size(), 4096);
    }

    #[test]
    fn block_size_table_covers_every_level() {
        assert_eq!(CompressionLevel(0).block_size(), 1152);
        assert_eq!(CompressionLevel(3).block_size(), 2048);
        assert_eq!(CompressionLevel(8).block_size(), 4608);
        assert_eq!(CompressionLevel::default(), COMPRESSION_LEVEL);
    }
}
