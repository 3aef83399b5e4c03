use anyhow::Result;
use clap::{Parser, Subcommand};
use kinterm::db::Db;
use kinterm::service::{AddRelation, FamilyService, SetOverride};
use kinterm::store::NewPerson;
use kinterm::{Config, Gender, KintermError, PersonId};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kinterm", version)]
#[command(about = "Kinship address terms over a shared family graph")]
struct Args {
    /// Directory holding the numbered SQL migrations
    #[arg(long, default_value = "migrations", global = true)]
    migrations: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Add a person to the directory
    AddPerson {
        username: String,
        #[arg(long, default_value = "")]
        nickname: String,
        #[arg(long)]
        phone: Option<String>,
        /// male, female or unknown
        #[arg(long, default_value = "unknown")]
        gender: Gender,
    },
    /// Show the address term of every person as seen by the viewer
    List {
        #[arg(long)]
        viewer: PersonId,
    },
    /// Find people by phone or username fragment
    Search { keyword: String },
    /// Record "target is my <relation>" for the viewer
    AddRelation {
        #[arg(long)]
        viewer: PersonId,
        #[arg(long)]
        target: PersonId,
        /// father, mother, spouse or child
        #[arg(long)]
        relation: String,
    },
    /// Set the viewer's custom term for a target; an empty term clears it
    SetTerm {
        #[arg(long)]
        viewer: PersonId,
        #[arg(long)]
        target: PersonId,
        #[arg(long, default_value = "")]
        term: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.kinterm.log_level.as_str()),
    )
    .init();

    log::debug!("Database path: {}", config.db_path().display());

    let db = Db::new(config.db_path());
    let applied = db.migrate(&args.migrations).await?;
    if applied > 0 {
        log::info!("Applied {} migration(s)", applied);
    }

    let service = FamilyService::new(db, config.resolution.clone());

    if let Err(e) = execute(&service, args.command).await {
        // Rejections caused by the request are reported as data, not as a crash
        if let Some(err) = e.downcast_ref::<KintermError>() {
            if err.is_client_error() {
                print_json(&serde_json::json!({ "error": err.kind(), "message": err.to_string() }))?;
                std::process::exit(2);
            }
        }
        return Err(e);
    }

    Ok(())
}

async fn execute(service: &FamilyService, command: Command) -> Result<()> {
    match command {
        Command::Migrate => {
            log::info!("Database is up to date");
        }
        Command::AddPerson { username, nickname, phone, gender } => {
            let person = service
                .add_person(NewPerson { username, nickname, phone, gender })
                .await?;
            print_json(&person)?;
        }
        Command::List { viewer } => {
            let members = service.list_terms(viewer).await?;
            print_json(&members)?;
        }
        Command::Search { keyword } => {
            let people = service.search_people(&keyword).await?;
            print_json(&people)?;
        }
        Command::AddRelation { viewer, target, relation } => {
            service
                .add_relation(
                    viewer,
                    AddRelation { target_id: Some(target), relation_type: Some(relation) },
                )
                .await?;
            print_json(&serde_json::json!({ "success": true }))?;
        }
        Command::SetTerm { viewer, target, term } => {
            service
                .set_override(viewer, SetOverride { target_id: Some(target), term: Some(term) })
                .await?;
            print_json(&serde_json::json!({ "success": true }))?;
        }
    }

    Ok(())
}
