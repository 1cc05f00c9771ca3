use api_shared::{DiagnoseRes, ListConditionsRes, ListSymptomsRes};
use clap::{Parser, Subcommand};
use medichain_core::config::{engine_config_from_env_values, knowledge_file_from_env_value};
use medichain_core::{KnowledgeBase, TriageEngine, TriageOutcome, TriageRequest};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "medichain")]
#[command(about = "MediChain symptom triage CLI")]
struct Cli {
    /// Knowledge base YAML to use instead of the built-in tables
    #[arg(long, global = true)]
    knowledge: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Triage a free-text symptom description
    Diagnose {
        /// Symptom description, e.g. "fever and a dry cough"
        text: String,
        /// Age in years
        #[arg(long)]
        age: Option<String>,
        /// Gender
        #[arg(long)]
        gender: Option<String>,
        /// Print the JSON response body instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// List condition patterns in evaluation order
    Conditions,
    /// List the keyword dictionary
    Symptoms,
    /// Validate a knowledge base YAML file
    CheckKnowledge {
        /// Path to the YAML file
        file: PathBuf,
    },
}

fn load_knowledge(flag: Option<PathBuf>) -> Result<KnowledgeBase, Box<dyn std::error::Error>> {
    let path = flag.or_else(|| {
        knowledge_file_from_env_value(std::env::var("MEDICHAIN_KNOWLEDGE_FILE").ok())
    });
    Ok(KnowledgeBase::load(path)?)
}

fn print_diagnosis(res: &DiagnoseRes) {
    println!(
        "Primary diagnosis: {} ({:.0}% confidence, {})",
        res.primary_diagnosis,
        res.confidence * 100.0,
        res.confidence_level
    );
    if res.urgent {
        println!("!! This pattern needs urgent attention !!");
    }
    println!("Detected symptoms: {}", res.detected_symptoms.join(", "));
    if res.top_predictions.len() > 1 {
        println!("Alternatives:");
        for alt in res.top_predictions.iter().skip(1) {
            println!(
                "  - {} (match {:.0}%, confidence {:.0}%)",
                alt.diagnosis,
                alt.probability * 100.0,
                alt.confidence * 100.0
            );
        }
    }
    for (title, items) in [
        ("Medications", &res.recommendations.medications),
        ("Lifestyle", &res.recommendations.lifestyle),
        ("When to see a doctor", &res.recommendations.when_to_see_doctor),
    ] {
        println!("{title}:");
        for item in items {
            println!("  - {item}");
        }
    }
    println!();
    println!("{}", res.disclaimer);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medichain=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Diagnose {
            text,
            age,
            gender,
            json,
        }) => {
            let kb = load_knowledge(cli.knowledge)?;
            let config = engine_config_from_env_values(
                std::env::var("MEDICHAIN_MIN_MATCHES").ok(),
                std::env::var("MEDICHAIN_CONFIDENCE_FLOOR").ok(),
                std::env::var("MEDICHAIN_MAX_ALTERNATIVES").ok(),
            )?;
            let engine = TriageEngine::new(Arc::new(kb), config);
            let request = TriageRequest::new(Some(text), age, gender)?;

            match engine.triage(&request) {
                TriageOutcome::Diagnosed(result) => {
                    let res = DiagnoseRes::from_result(&result, Some(&request));
                    if json {
                        println!("{}", serde_json::to_string_pretty(&res)?);
                    } else {
                        print_diagnosis(&res);
                    }
                }
                TriageOutcome::NoRecognizableSymptoms { suggestions } => {
                    eprintln!("No recognizable symptoms found. Try:");
                    for suggestion in suggestions {
                        eprintln!("  - {suggestion}");
                    }
                    std::process::exit(2);
                }
            }
        }
        Some(Commands::Conditions) => {
            let kb = load_knowledge(cli.knowledge)?;
            for condition in ListConditionsRes::from_knowledge(&kb).conditions {
                println!(
                    "{}{} [{}] base {:.2}",
                    condition.name,
                    if condition.urgent { " (urgent)" } else { "" },
                    condition.symptoms.join(", "),
                    condition.base_confidence
                );
            }
        }
        Some(Commands::Symptoms) => {
            let kb = load_knowledge(cli.knowledge)?;
            for symptom in ListSymptomsRes::from_knowledge(&kb).symptoms {
                println!("{}: {}", symptom.token, symptom.phrases.join(" | "));
            }
        }
        Some(Commands::CheckKnowledge { file }) => match KnowledgeBase::from_file(&file) {
            Ok(kb) => println!(
                "OK: {} symptoms, {} conditions",
                kb.keywords().len(),
                kb.conditions().len()
            ),
            Err(e) => {
                eprintln!("Invalid knowledge base {}: {}", file.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            println!("Use 'medichain --help' for commands");
        }
    }

    Ok(())
}
