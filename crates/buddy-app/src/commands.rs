use crate::output::Output;
use crate::state::AppState;
use crate::ToneArgs;
use anyhow::{bail, Context};
use buddy_core::{DraftStatus, GenerationStage, ToneProfileFields};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub endpoint: String,
    pub model: String,
    pub reachable: bool,
    pub model_installed: Option<bool>,
    pub available_models: Vec<String>,
    pub pending: usize,
    pub approved: usize,
    pub discarded: usize,
}

#[derive(Debug, Serialize)]
struct Removed<'a> {
    id: &'a str,
    deleted: bool,
}

pub async fn status(state: &AppState, out: &Output) -> anyhow::Result<()> {
    let reachable = state.drafts.connection_status().await;
    let available_models = if reachable {
        match state.ollama.available_models().await {
            Ok(models) => models,
            Err(err) => {
                tracing::warn!("failed to list installed models: {err}");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };
    let model = state.ollama.model().to_string();
    let model_installed = reachable.then(|| model_is_installed(&model, &available_models));

    let drafts = state.drafts.queue().list().await?;
    let count = |status: DraftStatus| drafts.iter().filter(|d| d.status == status).count();
    let report = StatusReport {
        endpoint: state.config.ollama.base_url.clone(),
        model,
        reachable,
        model_installed,
        available_models,
        pending: count(DraftStatus::Pending),
        approved: count(DraftStatus::Approved),
        discarded: count(DraftStatus::Discarded),
    };

    let connection = match (report.reachable, report.model_installed) {
        (false, _) => "unreachable".to_string(),
        (true, Some(false)) => format!("connected, model `{}` not installed", report.model),
        (true, _) => format!("connected, model `{}`", report.model),
    };
    let text = format!(
        "ollama {}: {}\ndrafts: {} pending, {} approved, {} discarded",
        report.endpoint, connection, report.pending, report.approved, report.discarded
    );
    out.report(&report, &text)?;
    Ok(())
}

pub async fn list_tones(state: &AppState, out: &Output) -> anyhow::Result<()> {
    let profiles = state.drafts.catalog().list().await?;
    out.tones(&profiles)?;
    Ok(())
}

pub async fn show_tone(state: &AppState, out: &Output, id: &str) -> anyhow::Result<()> {
    let Some(profile) = state.drafts.catalog().find(id).await? else {
        bail!("tone profile `{id}` not found");
    };
    out.tone(&profile)?;
    Ok(())
}

pub async fn create_tone(state: &AppState, out: &Output, args: ToneArgs) -> anyhow::Result<()> {
    if args.name.as_deref().map_or(true, |name| name.trim().is_empty()) {
        bail!("--name is required to create a tone profile");
    }
    let profile = state
        .drafts
        .catalog()
        .create(merge_tone_args(ToneProfileFields::default(), args))
        .await?;
    out.tone(&profile)?;
    Ok(())
}

/// Only the flags that were given replace the stored values.
pub async fn update_tone(
    state: &AppState,
    out: &Output,
    id: &str,
    args: ToneArgs,
) -> anyhow::Result<()> {
    let catalog = state.drafts.catalog();
    let Some(existing) = catalog.find(id).await? else {
        bail!("tone profile `{id}` not found");
    };
    let fields = merge_tone_args(existing.fields(), args);
    let Some(profile) = catalog.update(&existing.id, fields).await? else {
        bail!("tone profile `{id}` not found");
    };
    out.tone(&profile)?;
    Ok(())
}

pub async fn delete_tone(state: &AppState, out: &Output, id: &str) -> anyhow::Result<()> {
    let catalog = state.drafts.catalog();
    let target = catalog
        .find(id)
        .await?
        .map(|profile| profile.id)
        .unwrap_or_else(|| id.to_string());
    let deleted = catalog.delete(&target).await?;
    if !deleted {
        bail!("tone profile `{id}` not found");
    }
    out.report(
        &Removed { id: &target, deleted },
        &format!("deleted tone profile {target}"),
    )?;
    Ok(())
}

pub async fn generate(
    state: &AppState,
    out: &Output,
    tone: &str,
    file: Option<&Path>,
) -> anyhow::Result<()> {
    let email = read_input(file).await?;
    // Unknown names pass through untouched so generation reports them.
    let tone_id = state
        .drafts
        .catalog()
        .find(tone)
        .await?
        .map(|profile| profile.id)
        .unwrap_or_else(|| tone.to_string());

    let started = Instant::now();
    let drafts = state
        .drafts
        .generate_drafts(&email, Some(&tone_id), |stage| {
            if stage != GenerationStage::Idle {
                eprintln!("[{:>4}s] {stage}", started.elapsed().as_secs());
            }
        })
        .await?;
    out.drafts(&drafts)?;
    Ok(())
}

pub async fn list_drafts(
    state: &AppState,
    out: &Output,
    status: Option<DraftStatus>,
) -> anyhow::Result<()> {
    let queue = state.drafts.queue();
    let drafts = match status {
        Some(status) => queue.list_by_status(status).await?,
        None => queue.list().await?,
    };
    out.drafts(&drafts)?;
    Ok(())
}

pub async fn show_draft(state: &AppState, out: &Output, id: &str) -> anyhow::Result<()> {
    let Some(draft) = state.drafts.queue().get(id).await? else {
        bail!("draft `{id}` not found");
    };
    out.draft(&draft)?;
    Ok(())
}

pub async fn approve_draft(state: &AppState, out: &Output, id: &str) -> anyhow::Result<()> {
    let Some(draft) = state.drafts.queue().approve(id).await? else {
        bail!("draft `{id}` not found");
    };
    out.draft(&draft)?;
    Ok(())
}

pub async fn discard_draft(state: &AppState, out: &Output, id: &str) -> anyhow::Result<()> {
    let Some(draft) = state.drafts.queue().discard(id).await? else {
        bail!("draft `{id}` not found");
    };
    out.draft(&draft)?;
    Ok(())
}

pub async fn edit_draft(
    state: &AppState,
    out: &Output,
    id: &str,
    file: Option<&Path>,
) -> anyhow::Result<()> {
    let content = read_input(file).await?;
    let Some(draft) = state.drafts.queue().edit_content(id, &content).await? else {
        bail!("draft `{id}` not found");
    };
    out.draft(&draft)?;
    Ok(())
}

pub async fn delete_draft(state: &AppState, out: &Output, id: &str) -> anyhow::Result<()> {
    let deleted = state.drafts.queue().delete(id).await?;
    if !deleted {
        bail!("draft `{id}` not found");
    }
    out.report(&Removed { id, deleted }, &format!("deleted draft {id}"))?;
    Ok(())
}

fn merge_tone_args(mut fields: ToneProfileFields, args: ToneArgs) -> ToneProfileFields {
    if let Some(name) = args.name {
        fields.name = name.trim().to_string();
    }
    if let Some(description) = args.description {
        fields.description = description;
    }
    if let Some(instructions) = args.instructions {
        fields.personality_instructions = instructions;
    }
    if !args.keywords.is_empty() {
        fields.keywords = args.keywords;
    }
    if !args.phrases.is_empty() {
        fields.sample_phrases = args.phrases;
    }
    fields
}

/// Ollama reports tags like `mistral:latest`; a bare model name matches any tag.
fn model_is_installed(model: &str, available: &[String]) -> bool {
    available.iter().any(|name| {
        name == model || (!model.contains(':') && name.split(':').next() == Some(model))
    })
}

async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read {}", path.display())),
        None => read_all(tokio::io::stdin()).await.context("read stdin"),
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer).await?;
    Ok(buffer)
}
