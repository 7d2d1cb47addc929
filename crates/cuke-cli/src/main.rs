use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use cuke_adapters::{replay, AdapterError, JsonLinesSink, LogSink, ReporterConfig, SinkKind};
use cuke_core::ReportSink;
use log::info;

const USAGE: &str = "Uso: cuke-cli replay --input <FILE.jsonl> [--sink log|jsonl] [--output <FILE.jsonl>]";

fn main() {
    // Cargar .env si existe para obtener la configuración CUKEPORT_*
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // CLI mínima: `cuke-cli replay --input <FILE> [--sink <KIND>] [--output <FILE>]`
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] != "replay" {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }
    let mut input: Option<PathBuf> = None;
    let mut sink: Option<String> = None;
    let mut output: Option<PathBuf> = None;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                if i < args.len() {
                    input = Some(PathBuf::from(&args[i]));
                }
            }
            "--sink" => {
                i += 1;
                if i < args.len() {
                    sink = Some(args[i].clone());
                }
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    output = Some(PathBuf::from(&args[i]));
                }
            }
            other => {
                eprintln!("[cuke replay] argumento desconocido: {other}");
                std::process::exit(2);
            }
        }
        i += 1;
    }
    let Some(input) = input else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    // Los flags tienen prioridad sobre las variables de entorno
    let config = ReporterConfig::from_lookup(|key| match key {
                     "CUKEPORT_SINK" if sink.is_some() => sink.clone(),
                     "CUKEPORT_OUTPUT" if output.is_some() => output.as_ref().map(|p| p.display().to_string()),
                     _ => std::env::var(key).ok(),
                 });
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[cuke replay] configuración inválida: {e}");
            std::process::exit(4);
        }
    };

    let reader = match File::open(&input) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            eprintln!("[cuke replay] no se pudo abrir {}: {e}", input.display());
            std::process::exit(3);
        }
    };

    let result = match (config.sink, &config.output) {
        (SinkKind::JsonLines, Some(path)) => JsonLinesSink::create(path).and_then(|s| run(&config, reader, s)),
        _ => run(&config, reader, LogSink::new()),
    };
    match result {
        Ok(count) => {
            info!("replay completo: {count} eventos desde {}", input.display());
        }
        Err(AdapterError::InvalidEvent { line, message }) => {
            eprintln!("[cuke replay] evento inválido en línea {line}: {message}");
            std::process::exit(3);
        }
        Err(e) => {
            eprintln!("[cuke replay] error: {e}");
            std::process::exit(5);
        }
    }
}

fn run<S: ReportSink>(config: &ReporterConfig, reader: BufReader<File>, sink: S) -> Result<usize, AdapterError> {
    let mut reporter = config.reporter(sink);
    info!("launch={} scenario_type={} sink={:?}", config.launch.name, config.scenario_type, config.sink);
    replay(reader, &mut reporter)
}
