//! Demo command set served by the console host.

use super::source::PlayerSource;
use crate::commands::{
    ClassCommand, CommandContext, CommandDescriptor, CommandSet, InstanceBinding, TimeUnit,
    handler_fn, method,
};
use crate::domain::{MemoryDirectory, WorldDirectory};
use crate::error::ConfigurationError;
use crate::source::{CommandSource, SourceKind};
use anyhow::{Context as _, anyhow, bail};
use cmdgate_usage::{Location, Value};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

const WARPS_PER_PAGE: usize = 8;

/// Online players, keyed by id.
pub struct Roster {
    directory: Arc<MemoryDirectory>,
    players: DashMap<Uuid, Arc<PlayerSource>>,
}

impl Roster {
    pub fn new(directory: Arc<MemoryDirectory>) -> Self {
        Self {
            directory,
            players: DashMap::new(),
        }
    }

    /// Source for `name`, created on first use.
    pub fn join(&self, name: &str) -> Arc<PlayerSource> {
        let player = self.directory.add_player(name);
        let world = self
            .directory
            .default_world()
            .unwrap_or_else(|| self.directory.add_world("world"));
        Arc::clone(
            &self
                .players
                .entry(player.id)
                .or_insert_with(|| Arc::new(PlayerSource::new(player, world))),
        )
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<PlayerSource>> {
        self.players.get(&id).map(|p| Arc::clone(&p))
    }

    fn teleport(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let target = ctx
            .arg("target")
            .and_then(Value::as_player)
            .context("target argument missing")?;
        let destination = ctx
            .arg("destination")
            .and_then(Value::as_location)
            .or(ctx.location())
            .cloned()
            .ok_or_else(|| anyhow!("no destination given and the caller has no position"))?;
        let Some(source) = self.get(target.id) else {
            bail!("{} is not online", target.name);
        };

        source.move_to(destination.clone());
        if !ctx.has_flag("silent") {
            source.send(&format!("You were teleported to {destination}."));
        }
        ctx.reply(&format!("Teleported {} to {destination}.", target.name));
        Ok(())
    }
}

/// Named locations.
#[derive(Debug, Default)]
pub struct WarpBook {
    warps: RwLock<BTreeMap<String, Location>>,
}

impl WarpBook {
    pub fn get(&self, name: &str) -> Option<Location> {
        self.warps.read().get(&name.to_lowercase()).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.warps.read().keys().cloned().collect()
    }

    fn list(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let names = self.names();
        if names.is_empty() {
            ctx.reply("No warps set.");
            return Ok(());
        }
        let pages = names.len().div_ceil(WARPS_PER_PAGE);
        let page = ctx
            .arg("page")
            .and_then(Value::as_i64)
            .unwrap_or(1)
            .clamp(1, pages as i64) as usize;
        let shown = names
            .iter()
            .skip((page - 1) * WARPS_PER_PAGE)
            .take(WARPS_PER_PAGE)
            .cloned()
            .collect::<Vec<_>>();
        ctx.reply(&format!("Warps ({page}/{pages}): {}", shown.join(", ")));
        Ok(())
    }

    fn set(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let name = ctx.arg("name").map(ToString::to_string).context("name missing")?;
        let at = ctx
            .arg("at")
            .and_then(Value::as_location)
            .or(ctx.location())
            .cloned()
            .ok_or_else(|| anyhow!("no location given and the caller has no position"))?;
        ctx.reply(&format!("Warp {name} set to {at}."));
        self.warps.write().insert(name.to_lowercase(), at);
        Ok(())
    }

    fn delete(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let name = ctx.arg("name").map(ToString::to_string).context("name missing")?;
        match self.warps.write().remove(&name.to_lowercase()) {
            Some(_) => ctx.reply(&format!("Warp {name} deleted.")),
            None => ctx.reply(&format!("No warp named {name}.")),
        }
        Ok(())
    }

    fn go(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let name = ctx.arg("name").map(ToString::to_string).context("name missing")?;
        match self.get(&name) {
            Some(at) => ctx.reply(&format!("Warping to {name} at {at}.")),
            None => ctx.reply(&format!("No warp named {name}.")),
        }
        Ok(())
    }
}

/// Set by the `shutdown` command.
#[derive(Debug, Default)]
pub struct Shutdown(AtomicBool);

impl Shutdown {
    pub fn requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn request(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        self.0.store(true, Ordering::SeqCst);
        ctx.reply("Shutting down.");
        Ok(())
    }
}

fn echo(ctx: &CommandContext) -> anyhow::Result<()> {
    let mut words: Vec<String> = ctx.arg("message").map(ToString::to_string).into_iter().collect();
    words.extend(ctx.extra().iter().cloned());
    ctx.reply(&words.join(" "));
    Ok(())
}

/// Register `echo`, `tp`, `warp`, `heal` and `shutdown`.
pub fn register_demo_commands(set: &mut CommandSet) -> Result<(), ConfigurationError> {
    set.register(
        CommandDescriptor::new("echo <message{text}>").description("Repeat a line back"),
        handler_fn(echo),
    )?;

    set.register_with(
        CommandDescriptor::new("tp <target{player}> [destination{location}] -s|--silent")
            .alias("tp")
            .alias("teleport")
            .args(1, 2)
            .permission("cmd.tp")
            .description("Teleport a player"),
        method::<Roster, _>(Roster::teleport),
        InstanceBinding::component::<Roster>(),
    )?;

    set.register_class(
        ClassCommand::new(
            CommandDescriptor::new("warp")
                .alias("warp")
                .alias("w")
                .permission("warp.use"),
        )
        .instance(InstanceBinding::component::<WarpBook>().or_constructed::<WarpBook>())
        .subcommand(CommandDescriptor::new("list [page{integer}]"), method::<WarpBook, _>(WarpBook::list))
        .subcommand(CommandDescriptor::new("set <name> [at{location}]"), method::<WarpBook, _>(WarpBook::set))
        .subcommand(CommandDescriptor::new("go <name>"), method::<WarpBook, _>(WarpBook::go))
        .subcommand(
            CommandDescriptor::new("delete <name>")
                .alias("delete")
                .alias("del")
                .confirm(),
            method::<WarpBook, _>(WarpBook::delete),
        ),
    )?;

    set.register(
        CommandDescriptor::new("heal")
            .cooldown(30, TimeUnit::Seconds)
            .source(SourceKind::Player)
            .description("Restore your health"),
        handler_fn(|ctx| {
            ctx.reply("You have been healed.");
            Ok(())
        }),
    )?;

    set.register_with(
        CommandDescriptor::new("shutdown")
            .alias("shutdown")
            .alias("stop")
            .permission("server.shutdown")
            .confirm(),
        method::<Shutdown, _>(Shutdown::request),
        InstanceBinding::component::<Shutdown>(),
    )?;

    Ok(())
}
