mod api;
mod config;

use std::io::Read;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use quill_core::{DetectReport, Label, QuillError};
use quill_detect::Detector;
use quill_db::QuillDb;
use tracing::info;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Heuristic detector for machine-generated text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a text file ("-" reads stdin) and print the verdict
    Analyze {
        #[arg(help = "Path to a UTF-8 text file, or - for stdin")]
        file: String,
        #[arg(long, help = "Emit the JSON report instead of readable output")]
        json: bool,
        #[arg(short = 'f', long, default_value = "quill.toml")]
        config: String,
    },
    /// Run the HTTP detection API
    Serve {
        #[arg(short = 'f', long, default_value = "quill.toml")]
        config: String,
    },
    /// Manage the labeled reference corpus
    Corpus {
        #[command(subcommand)]
        command: CorpusCommands,
        #[arg(short = 'f', long, default_value = "quill.toml")]
        config: String,
    },
}

#[derive(Subcommand)]
enum CorpusCommands {
    /// Add a reference document from a file
    Add {
        file: String,
        #[arg(long, value_parser = parse_label)]
        label: Label,
        #[arg(long, default_value = "cli")]
        source: String,
    },
    /// List stored reference documents
    List {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn parse_label(s: &str) -> Result<Label, String> {
    match s.to_lowercase().as_str() {
        "ai" => Ok(Label::Ai),
        "human" => Ok(Label::Human),
        other => Err(format!("unknown label: {} (use ai or human)", other)),
    }
}

fn load_config(path: &str) -> Result<config::QuillConfig, Box<dyn std::error::Error>> {
    if std::path::Path::new(path).exists() {
        config::QuillConfig::from_file(path)
    } else {
        Ok(config::QuillConfig::default())
    }
}

fn read_input(file: &str) -> Result<String, Box<dyn std::error::Error>> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { file, json, config } => run_analyze(file, json, &config),
        Commands::Serve { config } => run_serve(&config).await,
        Commands::Corpus { command, config } => run_corpus(command, &config),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_analyze(file: String, json: bool, config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(config_path)?;
    let detector = Detector::new(cfg.detector.to_scoring_config())?;
    let text = read_input(&file)?;

    let result = match detector.detect(&text) {
        Ok(result) => result,
        Err(QuillError::InvalidInput(msg)) => {
            return Err(msg.into());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        let report = DetectReport::from(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let f = &result.features;
    println!("--- analysis of {} ---", file);
    println!("words: {} ({} unique)", f.word_count, f.unique_word_count);
    println!(
        "sentences: {} (avg length {:.1}, variance {:.1})",
        f.sentence_count, f.avg_sentence_length, f.sentence_length_variance
    );
    println!("lexical diversity: {:.3}", f.lexical_diversity);
    println!("mattr: {:.3}", f.mattr);
    println!("stopword ratio: {:.3}", f.stopword_ratio);
    println!("burstiness: {:.3}", f.burstiness);
    println!("pseudo-perplexity: {:.1}", f.perplexity);
    println!("top-word ratio: {:.3}", f.top_word_ratio);
    println!("reading ease: {:.1}", f.flesch_reading_ease);
    println!();
    println!(
        "score: {}/{} (confidence {:.1}%)",
        result.score,
        result.max_score,
        result.confidence * 100.0
    );
    println!("verdict: {}", result.label.as_str());

    Ok(())
}

async fn run_serve(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(config_path)?;
    let detector = Detector::new(cfg.detector.to_scoring_config())?;

    let db = match &cfg.db {
        Some(db_cfg) => {
            if let Some(parent) = std::path::Path::new(&db_cfg.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let db = QuillDb::open(&db_cfg.path)?;
            info!(path = %db_cfg.path, "database opened");
            Some(db)
        }
        None => None,
    };

    let state = Arc::new(api::ApiState { detector, db });
    let router = api::api_router(state);

    let addr = format!("{}:{}", cfg.api.bind, cfg.api.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "api listening");
    axum::serve(listener, router).await?;

    Ok(())
}

fn run_corpus(
    command: CorpusCommands,
    config_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(config_path)?;
    let db_cfg = cfg
        .db
        .ok_or("corpus commands need a [db] section in the config file")?;
    if let Some(parent) = std::path::Path::new(&db_cfg.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let db = QuillDb::open(&db_cfg.path)?;

    match command {
        CorpusCommands::Add {
            file,
            label,
            source,
        } => {
            let text = read_input(&file)?;
            if text.trim().is_empty() {
                return Err("file is empty".into());
            }
            let id = db.insert_document(&text, label, &source)?;
            println!("added {} document {}", label.as_str(), id);
        }
        CorpusCommands::List { limit } => {
            let docs = db.get_documents(limit)?;
            if docs.is_empty() {
                println!("corpus is empty");
                return Ok(());
            }
            for doc in docs {
                let preview: String = doc.content.chars().take(60).collect();
                println!(
                    "{}  [{}]  {}  {}",
                    doc.id,
                    doc.label.as_str(),
                    doc.added_at.format("%Y-%m-%d %H:%M"),
                    preview.replace('\n', " ")
                );
            }
        }
    }

    Ok(())
}
