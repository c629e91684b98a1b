use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use flac_stream_encoder::EncoderSession;
use flac_stream_encoder::domain::pcm::{self, BitDepth};
use std::time::Duration;

/// ベンチマーク用の 16bit PCM（変化のある信号）
fn pcm16(seconds: usize) -> Vec<u8> {
    (0..44100 * seconds)
        .map(|i| {
            let t = i as f64 / 44100.0;
            ((t * 440.0 * std::f64::consts::TAU).sin() * 16000.0) as i16
        })
        .flat_map(|s| s.to_le_bytes())
        .collect()
}

fn benchmark_widening(c: &mut Criterion) {
    let mut group = c.benchmark_group("widening");
    let bytes = pcm16(1);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    for depth in [BitDepth::Eight, BitDepth::Sixteen] {
        group.bench_with_input(
            BenchmarkId::new("widen_into", depth.bits()),
            &depth,
            |b, &depth| {
                let mut out = Vec::with_capacity(bytes.len());
                b.iter(|| {
                    out.clear();
                    black_box(pcm::widen_into(black_box(&bytes), depth, &mut out));
                });
            },
        );
    }
    group.finish();
}

fn benchmark_session_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_write");
    group
        .sample_size(20) // ファイル I/O を含むので回数を減らす
        .measurement_time(Duration::from_secs(10));

    let dir = tempfile::tempdir().expect("tempdir");
    for seconds in [1usize, 5] {
        let bytes = pcm16(seconds);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("mono_16bit", seconds), &bytes, |b, bytes| {
            let path = dir.path().join(format!("bench_{seconds}.flac"));
            b.iter(|| {
                let mut session =
                    EncoderSession::with_params(&path, 44100, 1, 16).expect("params");
                session.initialize().expect("initialize");
                // 録音コールバック相当の 4096 バイト単位で渡す
                for chunk in bytes.chunks(4096) {
                    black_box(session.write(chunk, chunk.len()).expect("write"));
                }
                session.destroy();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_widening, benchmark_session_write);
criterion_main!(benches);
