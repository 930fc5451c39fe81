use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use convene::config::ConveneConfig;
use convene::notice::{render_notice, CannedContentProvider, ContentProvider, FileExportSink, GenerationOutcome};
use convene::workflow::{Collaborators, SessionConfig, WorkflowDefinition, WorkflowKind, WorkflowSession};
use convene::{
    init_telemetry, DraftRecord, FieldValue, FileSystemDraftStore, LogSurface, StaticEntitlements,
};

#[derive(Parser)]
#[command(name = "convene")]
#[command(about = "Guided board meeting and compliance checklist workflows")]
#[command(long_about = "Convene walks a draft through the steps of a meeting or compliance \
                       checklist workflow, shows which fields each step still needs, composes \
                       the meeting notice and saves drafts locally.")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "convene.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every step of a workflow with its required-field markers
    Steps {
        /// Workflow to inspect
        #[arg(long, default_value = "meeting", help = "Workflow: meeting or compliance")]
        workflow: WorkflowKind,
        /// Draft file (TOML key/value pairs)
        #[arg(long, help = "Draft to evaluate the required fields against")]
        draft: Option<PathBuf>,
        /// Print the required-field sets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compose the meeting notice from a draft
    Notice {
        /// Draft file (TOML key/value pairs)
        #[arg(long)]
        draft: PathBuf,
        /// Ask the content provider for the notice text
        #[arg(long, help = "Generate notice content instead of using the template only")]
        generate: bool,
        /// Export into the configured notice directory
        #[arg(long, help = "Write the rendered notice into notice.export_directory")]
        export: bool,
        /// Directory to export the notice to
        #[arg(long, help = "Write the rendered notice into this directory")]
        out: Option<PathBuf>,
    },
    /// Persist a draft, optionally as submitted
    Save {
        /// Draft file (TOML key/value pairs)
        #[arg(long)]
        draft: PathBuf,
        /// Workflow the draft belongs to
        #[arg(long, default_value = "meeting")]
        workflow: WorkflowKind,
        /// Submit instead of saving as draft
        #[arg(long, help = "Jump to the review step and submit")]
        submit: bool,
        /// Override the configured draft directory
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    ConveneConfig::load_env_file()?;
    let config = ConveneConfig::load_from(&cli.config)?;
    init_telemetry(&config.observability)?;

    match cli.command {
        Commands::Steps { workflow, draft, json } => steps_command(workflow, draft.as_deref(), json),
        Commands::Notice {
            draft,
            generate,
            export,
            out,
        } => {
            let directory = out.or_else(|| export.then(|| config.notice.export_directory.clone()));
            tokio::runtime::Runtime::new()?.block_on(async { notice_command(&config, &draft, generate, directory).await })
        }
        Commands::Save {
            draft,
            workflow,
            submit,
            store_dir,
        } => tokio::runtime::Runtime::new()?
            .block_on(async { save_command(&config, workflow, &draft, submit, store_dir).await }),
    }
}

fn read_draft(path: &Path) -> Result<DraftRecord> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read draft file {}", path.display()))?;
    let draft: DraftRecord =
        toml::from_str(&contents).with_context(|| format!("Failed to parse draft file {}", path.display()))?;
    Ok(draft)
}

fn build_session(config: &ConveneConfig, workflow: WorkflowKind, store_dir: Option<PathBuf>) -> WorkflowSession {
    let entitlements = StaticEntitlements::from_config(&config.features);
    let content_provider: Option<Arc<dyn ContentProvider>> = if config.features.ai_notice_generation {
        Some(Arc::new(CannedContentProvider))
    } else {
        None
    };

    let collaborators = Collaborators {
        store: Arc::new(FileSystemDraftStore::new(
            store_dir.unwrap_or_else(|| config.storage.draft_directory.clone()),
        )),
        surface: Arc::new(LogSurface),
        entitlements: Arc::new(entitlements),
        content_provider,
    };

    WorkflowSession::new(
        WorkflowDefinition::for_kind(workflow),
        collaborators,
        SessionConfig::from_config(config),
    )
}

fn load_into(session: &mut WorkflowSession, draft: DraftRecord) -> Result<()> {
    for (name, value) in draft.iter() {
        session.update_field(name, value.clone())?;
    }
    Ok(())
}

fn steps_command(workflow: WorkflowKind, draft: Option<&Path>, json: bool) -> Result<()> {
    let definition = WorkflowDefinition::for_kind(workflow);
    let draft = match draft {
        Some(path) => read_draft(path)?,
        None => DraftRecord::new(),
    };

    if json {
        let sets: Vec<_> = definition.steps.iter().map(|step| step.required_fields(&draft)).collect();
        println!("{}", serde_json::to_string_pretty(&sets)?);
        return Ok(());
    }

    println!("📋 {} workflow", workflow);
    println!();
    for (index, step) in definition.steps.iter().enumerate() {
        let required = step.required_fields(&draft);
        println!("{}. {} [{}]", index + 1, step.label, step.id);
        for spec in &step.fields {
            let marker = match required.get(spec.name) {
                Some(field) if field.satisfied => "✅",
                Some(_) => "❌",
                None => "  ",
            };
            let suffix = if required.contains(spec.name) { " *" } else { "" };
            println!("   {} {} ({}){}", marker, spec.label, spec.name, suffix);
        }
    }

    Ok(())
}

async fn notice_command(
    config: &ConveneConfig,
    draft: &Path,
    generate: bool,
    directory: Option<PathBuf>,
) -> Result<()> {
    let mut session = build_session(config, WorkflowKind::Meeting, None);
    load_into(&mut session, read_draft(draft)?)?;
    if generate {
        session.update_field(convene::draft::fields::USE_AI_GENERATION, FieldValue::Flag(true))?;
    }

    match session.regenerate_notice().await? {
        GenerationOutcome::FellBack(error) => eprintln!("⚠️  Notice generation failed, using template: {error}"),
        GenerationOutcome::NotEntitled => eprintln!("⚠️  Notice generation is disabled, using template"),
        GenerationOutcome::Template | GenerationOutcome::Generated => {}
    }

    match directory {
        Some(directory) => {
            let sink = FileExportSink::new(directory);
            let path = session.export_notice(&sink).await?;
            println!("✅ Notice written to {}", path.display());
        }
        None => print!("{}", render_notice(&session.notice())),
    }

    Ok(())
}

async fn save_command(
    config: &ConveneConfig,
    workflow: WorkflowKind,
    draft: &Path,
    submit: bool,
    store_dir: Option<PathBuf>,
) -> Result<()> {
    let mut session = build_session(config, workflow, store_dir);
    load_into(&mut session, read_draft(draft)?)?;

    for set in session.unsatisfied_required_fields() {
        let names: Vec<_> = set.fields.iter().map(|field| field.name).collect();
        eprintln!("⚠️  {}: missing {}", set.step, names.join(", "));
    }

    let id = if submit {
        let terminal = session.definition().terminal_index();
        let terminal_id = session.definition().steps[terminal].id;
        session.go_to(terminal_id)?;
        session.submit().await?
    } else {
        session.save_draft().await?
    };

    let verb = if submit { "Submitted" } else { "Saved draft" };
    println!("✅ {verb} {id}");
    Ok(())
}
