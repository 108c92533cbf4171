use anyhow::{anyhow, bail, Context};
use clap::Parser;
use fs_err as fs;
use std::future::Future;
use std::path::Path;
use uuid::Uuid;

use deckgen::assets::{self, AssetGenerator, PlaceholderAssetGenerator};
use deckgen::cli::{self, Command, GenerateArgs, RefineArgs, StyleArg};
use deckgen::config::Config;
use deckgen::history::{HistoryItem, HistoryStore};
use deckgen::orchestrator::{Generated, Session};
use deckgen::prompt::AssetStyle;
use deckgen::wire::{GenerationConfig, PresentationDocument};
use deckgen::{log, provider, templates, ux, DeckError};

struct Ctx {
    cfg: Config,
    args: cli::Args,
    txid: Uuid,
}

impl Ctx {
    fn session(&self) -> anyhow::Result<Session> {
        let key = self.cfg.credential().ok_or_else(|| {
            anyhow!("{} (pass --api-key or set {})", DeckError::MissingCredential, self.cfg.provider.key_env())
        })?;
        let session = Session::new(self.cfg.backend_settings());
        session.set_credential(&key);
        Ok(session)
    }

    fn history(&self) -> HistoryStore {
        HistoryStore::new(self.cfg.namespace_dir())
    }

    fn save_stage(&self, stage: &str, out: &Generated) -> anyhow::Result<()> {
        log::save_stage(
            stage,
            out,
            self.txid,
            Path::new(&self.cfg.root),
            self.args.save_request,
            self.args.save_response,
        )?;
        Ok(())
    }
}

/// Runs `fut` unless Ctrl-C arrives first; dropping it cancels the in-flight call.
async fn cancellable<T>(fut: impl Future<Output = deckgen::Result<T>>) -> anyhow::Result<T> {
    tokio::select! {
        res = fut => Ok(res?),
        _ = tokio::signal::ctrl_c() => bail!("cancelled by user"),
    }
}

fn write_document(path: &str, doc: &PresentationDocument) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(doc)?)?;
    println!("saved {path}");
    Ok(())
}

fn build_config(g: &GenerateArgs) -> anyhow::Result<(String, GenerationConfig)> {
    let mut config = GenerationConfig::default();
    let mut topic = g.topic.clone();

    if let Some(id) = &g.template {
        let tpl = templates::find(id).ok_or_else(|| anyhow!("unknown template {id:?}"))?;
        tpl.apply(&mut config);
        topic.get_or_insert_with(|| tpl.name.to_string());
    }

    if let Some(n) = g.pages { config.page_count = n; }
    if let Some(v) = &g.audience { config.audience = v.clone(); }
    if let Some(v) = &g.purpose { config.purpose = v.clone(); }
    if let Some(v) = &g.tone { config.tone = v.clone(); }
    if let Some(v) = &g.domain { config.domain = Some(v.clone()); }
    if let Some(v) = &g.sub_domain { config.sub_domain = Some(v.clone()); }
    if let Some(v) = &g.color { config.primary_color = Some(v.clone()); }

    let topic = topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("a topic or --template is required"))?;
    Ok((topic, config))
}

async fn run_generate(ctx: &Ctx, g: &GenerateArgs) -> anyhow::Result<()> {
    let (topic, config) = build_config(g)?;
    let images = assets::load_assets(&g.images)?;
    let orchestrator = ctx.session()?.orchestrator()?;

    let pb = ux::spinner(&format!("drafting \"{topic}\""), !ctx.args.no_progress);
    let res = cancellable(orchestrator.generate(&topic, &config, g.guidance.as_deref(), &images)).await;
    pb.finish_and_clear();

    let out = match res {
        Ok(out) => out,
        Err(e) => {
            if let Some(DeckError::Schema { .. }) = e.downcast_ref::<DeckError>() {
                eprintln!("backend reply was unusable; showing placeholder slides");
                ux::show_document(&PresentationDocument::placeholder(&topic));
            }
            return Err(e.context("generation failed"));
        }
    };

    ctx.save_stage("generate", &out)?;
    if ctx.args.debug {
        ux::show_attempts(&out.attempts);
    }
    ux::show_document(&out.document);

    let items = ctx.history().push(HistoryItem::new(out.document.clone(), Some(out.model.clone())))?;
    println!("added to history ({} item(s)), model: {}", items.len(), out.model);

    if let Some(path) = &g.out {
        write_document(path, &out.document)?;
    }
    Ok(())
}

async fn run_refine(ctx: &Ctx, r: &RefineArgs) -> anyhow::Result<()> {
    let current: PresentationDocument = match (&r.input, r.history) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str(&text).with_context(|| format!("{path} is not a deck document"))?
        }
        (None, idx) => {
            let idx = idx.unwrap_or(0);
            ctx.history()
                .get(idx)?
                .map(|item| item.document)
                .ok_or_else(|| anyhow!("no history item at index {idx}"))?
        }
    };
    let canvas = assets::load_assets(&r.assets)?;
    let orchestrator = ctx.session()?.orchestrator()?;

    let pb = ux::spinner("refining", !ctx.args.no_progress);
    let res = cancellable(orchestrator.refine(&r.instruction, &current, &canvas)).await;
    pb.finish_and_clear();
    let out = res.context("refinement failed")?;

    ctx.save_stage("refine", &out)?;
    ux::print_changes(&current, &out.document);
    ux::show_document(&out.document);

    match &r.out {
        Some(path) => write_document(path, &out.document)?,
        None => {
            ctx.history().push(HistoryItem::new(out.document.clone(), Some(out.model.clone())))?;
            println!("refined deck added to history");
        }
    }
    Ok(())
}

async fn run_models(ctx: &Ctx) -> anyhow::Result<()> {
    let key = ctx.cfg.credential().ok_or(DeckError::MissingCredential)?;
    let backend = provider::make_provider(ctx.cfg.provider.clone(), key, ctx.cfg.api_base.clone());
    let models = backend.list_models().await.context("listing models failed")?;
    ux::show_models(&models);
    Ok(())
}

async fn run_asset(subject: &str, style: StyleArg) -> anyhow::Result<()> {
    let style = match style {
        StyleArg::ThreeD => AssetStyle::ThreeD,
        StyleArg::TwoD => AssetStyle::TwoD,
        StyleArg::Photo => AssetStyle::Photo,
    };
    let asset = PlaceholderAssetGenerator::default().generate(subject, style).await?;
    println!("{}\n{}", asset.image_url, asset.prompt);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init_tracing(args.debug);

    let cfg = Config::resolve(&args)?;
    let ctx = Ctx { cfg, args, txid: Uuid::new_v4() };

    match &ctx.args.command {
        Command::Generate(g) => run_generate(&ctx, g).await,
        Command::Refine(r) => run_refine(&ctx, r).await,
        Command::History => {
            ux::show_history(&ctx.history().load()?);
            Ok(())
        }
        Command::Templates => {
            ux::show_templates(templates::TEMPLATES);
            Ok(())
        }
        Command::Models => run_models(&ctx).await,
        Command::Asset { subject, style } => run_asset(subject, *style).await,
    }
}
