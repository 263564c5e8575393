use chrono::{Local, TimeZone};
use hashbrown::HashSet;
use spawnwatch_core::geofence::load_fence;
use spawnwatch_core::storage::{SpawnWriter, import_json_file};
use spawnwatch_core::{
    AppConfigExt, EventId, EventScope, PolygonFence, SpawnId, SpawnPoint, SpawnStore,
    next_spawns_now,
};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::CliContext;

/// Parse a comma separated id list ("1,2, 3").
pub fn parse_ids(raw: &str) -> Result<HashSet<SpawnId>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<SpawnId>()
                .map_err(|_| format!("invalid spawn id: {part}"))
        })
        .collect()
}

/// Fence named on the command line, else the configured one, else none.
async fn resolve_fence(
    fence: Option<&str>,
    name: Option<&str>,
    ctx: &CliContext,
) -> Result<Option<PolygonFence>, String> {
    let path = match fence {
        Some(path) => Some(PathBuf::from(path)),
        None => ctx.config.read().await.fence_file.as_ref().map(PathBuf::from),
    };
    match path {
        Some(path) => load_fence(&path, name)
            .map(Some)
            .map_err(|e| format!("{}: {}", path.display(), e)),
        None => Ok(None),
    }
}

async fn resolve_scope(event: Option<EventId>, ctx: &CliContext) -> EventScope {
    match event {
        Some(event) => EventScope::with_event(Some(event)),
        None => ctx.config.read().await.event_scope(),
    }
}

fn print_spawns(spawns: &[SpawnPoint]) {
    println!("{:<20} {:<24} {:<6} {:<8} Despawn", "Id", "Location", "Event", "Def");
    println!("{}", "-".repeat(70));
    for spawn in spawns {
        let despawn = spawn
            .despawn
            .known()
            .map(|ms| ms.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:<20} {:<24} {:<6} {:<8} {}",
            spawn.id,
            spawn.location.to_string(),
            spawn.event_id,
            spawn.spawndef,
            despawn
        );
    }
    println!("{} spawn point(s)", spawns.len());
}

pub async fn import(path: &str, ctx: &CliContext) -> Result<(), String> {
    let summary = import_json_file(Path::new(path)).map_err(|e| e.to_string())?;

    let data_file = ctx.data_file().await;
    if let Some(parent) = data_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let mut writer = SpawnWriter::with_capacity(summary.spawns.len());
    writer.extend(summary.spawns.iter().cloned());
    if writer.is_empty() {
        tracing::warn!(path, "Import contained no usable spawn points");
    }
    writer.write_to_file(&data_file).map_err(|e| e.to_string())?;

    let store = SpawnStore::from_spawns(summary.spawns).map_err(|e| e.to_string())?;
    ctx.replace(store).await;

    println!(
        "imported {} spawn point(s), skipped {} into {}",
        writer.len(),
        summary.skipped,
        data_file.display()
    );
    Ok(())
}

pub async fn load(path: Option<&str>, ctx: &CliContext) -> Result<(), String> {
    let path = match path {
        Some(path) => PathBuf::from(path),
        None => ctx.data_file().await,
    };
    let spawns = ctx.open(&path).await?;
    let count = spawns.get_all(None).await.map_err(|e| e.to_string())?.len();
    println!("loaded {count} spawn point(s) from {}", path.display());
    Ok(())
}

pub async fn show(id: SpawnId, ctx: &CliContext) -> Result<(), String> {
    let spawns = ctx.spawns().await?;
    match spawns.get_by_id(id).await.map_err(|e| e.to_string())? {
        Some(spawn) => print_spawns(&[spawn]),
        None => println!("no spawn point with id {id}"),
    }
    Ok(())
}

pub async fn list(ids: Option<&str>, ctx: &CliContext) -> Result<(), String> {
    let spawns = ctx.spawns().await?;
    let ids = ids.map(parse_ids).transpose()?;
    let found = spawns
        .get_all(ids.as_ref())
        .await
        .map_err(|e| e.to_string())?;
    print_spawns(&found);
    Ok(())
}

pub async fn area(
    fence: Option<&str>,
    name: Option<&str>,
    event: Option<EventId>,
    unknown: bool,
    ctx: &CliContext,
) -> Result<(), String> {
    let spawns = ctx.spawns().await?;
    let fence = resolve_fence(fence, name, ctx).await?;
    let scope = resolve_scope(event, ctx).await;

    let found = spawns
        .get_in_area(fence.as_ref(), &scope, unknown)
        .await
        .map_err(|e| e.to_string())?;
    print_spawns(&found);
    Ok(())
}

pub async fn next(
    fence: Option<&str>,
    name: Option<&str>,
    event: Option<EventId>,
    ctx: &CliContext,
) -> Result<(), String> {
    let spawns = ctx.spawns().await?;
    let fence = resolve_fence(fence, name, ctx).await?;
    let scope = resolve_scope(event, ctx).await;

    let mut upcoming = next_spawns_now(spawns.as_ref(), fence.as_ref(), &scope)
        .await
        .map_err(|e| e.to_string())?;
    upcoming.sort_by_key(|n| n.timestamp);

    println!("{:<22} {:<12} Location", "Window start", "Epoch");
    println!("{}", "-".repeat(60));
    for spawn in &upcoming {
        let local = Local
            .timestamp_opt(spawn.timestamp, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        println!("{:<22} {:<12} {}", local, spawn.timestamp, spawn.location);
    }
    println!("{} upcoming spawn(s)", upcoming.len());
    Ok(())
}

pub async fn retag(ids: &str, event: EventId, ctx: &CliContext) -> Result<(), String> {
    let spawns = ctx.spawns().await?;
    let ids = parse_ids(ids)?;
    spawns
        .retag_to_event(&ids, event)
        .await
        .map_err(|e| e.to_string())?;
    println!("retagged {} spawn point(s) to event {event}", ids.len());
    save(ctx).await
}

pub async fn save(ctx: &CliContext) -> Result<(), String> {
    let spawns = ctx.spawns().await?;
    let data_file = ctx.data_file().await;
    spawns
        .repository()
        .persist(&data_file)
        .await
        .map_err(|e| e.to_string())?;
    println!("saved {}", data_file.display());
    Ok(())
}

pub async fn show_config(ctx: &CliContext) -> Result<(), String> {
    let config = ctx.config.read().await;
    println!("data file:        {}", config.data_file);
    println!(
        "fence file:       {}",
        config.fence_file.as_deref().unwrap_or("(none)")
    );
    println!(
        "additional event: {}",
        config
            .additional_event
            .map(|e| e.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    Ok(())
}

pub async fn set_fence(path: Option<&str>, ctx: &CliContext) -> Result<(), String> {
    let mut config = ctx.config.write().await;
    config.fence_file = path.map(str::to_string);
    config.save().map_err(|e| e.to_string())
}

pub async fn set_event(event: Option<EventId>, ctx: &CliContext) -> Result<(), String> {
    let mut config = ctx.config.write().await;
    config.additional_event = event;
    config.save().map_err(|e| e.to_string())
}

pub fn exit() {
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}
