//! flac_stream_encoder CLI: raw PCM を `EncoderSession` で FLAC ファイルへ変換します。
use clap::Parser;
use flac_stream_encoder::application::pcm_pipe;
use flac_stream_encoder::cli::Cli;
use flac_stream_encoder::domain::session::EncoderSession;
use flac_stream_encoder::utils::{config::EnvConfig, env::load_env, logging::init_logging};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::process::ExitCode;

#[derive(Serialize)]
struct Report<'a> {
    input: &'a str,
    output: String,
    sample_rate: u32,
    channels: u32,
    bits_per_sample: u32,
    bytes_consumed: u64,
    samples: u64,
    trailing_bytes: usize,
    output_bytes: u64,
}

fn main() -> ExitCode {
    // .env 読み込み → 設定 → ログ
    load_env();
    EnvConfig::init();
    let config = EnvConfig::get();
    init_logging(&config);

    let cli = Cli::parse();
    match run(&cli, config.chunk_bytes) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, default_chunk: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut session =
        EncoderSession::with_params(&cli.output, cli.rate, cli.channels, cli.bits)?;
    session.initialize()?;

    let chunk_bytes = cli.chunk_bytes.unwrap_or(default_chunk);
    let mut reader: Box<dyn Read> = if cli.reads_stdin() {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&cli.input)?))
    };

    let result = pcm_pipe::pump(&mut reader, &mut session, chunk_bytes);
    // 失敗時も確定処理は必ず行う
    session.destroy();
    let summary = result?;

    let output_bytes = std::fs::metadata(&cli.output)
        .map(|m| m.len())
        .unwrap_or(0);
    let report = Report {
        input: &cli.input,
        output: cli.output.display().to_string(),
        sample_rate: cli.rate,
        channels: cli.channels,
        bits_per_sample: cli.bits,
        bytes_consumed: summary.bytes_consumed,
        samples: summary.samples,
        trailing_bytes: summary.trailing_bytes,
        output_bytes,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "✅ {} → {}: {} bytes in, {} samples, {} bytes out",
            report.input,
            report.output,
            report.bytes_consumed,
            report.samples,
            report.output_bytes
        );
    }
    Ok(())
}
