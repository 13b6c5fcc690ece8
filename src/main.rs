//! Headless terminal driver: plays a session from stdin commands.

#[cfg(not(target_arch = "wasm32"))]
mod driver {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use brainrot_clicker::{
        Action, BadgeCatalog, Clock, Engine, EngineConfig, FileSlot, GameError, SaveSlot,
        SystemClock, UpgradeTrack,
    };
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::sync::oneshot;
    use tracing::{info, warn};
    use tracing_subscriber::EnvFilter;

    const POLL_INTERVAL: Duration = Duration::from_millis(50);

    const HELP: &str = "commands: c click | 1/2/3 upgrade click/battery/charge | \
b <id> buy or select badge | g claim bonus | t theme | s status | r reset | q quit";

    struct Args {
        save: Option<PathBuf>,
        catalog: PathBuf,
        config: Option<PathBuf>,
    }

    fn parse_args() -> Args {
        let mut args = Args {
            save: None,
            catalog: PathBuf::from("badges.json"),
            config: None,
        };
        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--save" => args.save = it.next().map(PathBuf::from),
                "--catalog" => {
                    if let Some(p) = it.next() {
                        args.catalog = PathBuf::from(p);
                    }
                }
                "--config" => args.config = it.next().map(PathBuf::from),
                _ => {}
            }
        }
        args
    }

    async fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
        let Some(path) = path else {
            return Ok(EngineConfig::default());
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config {}", path.display()))?;
        Ok(EngineConfig::from_json(&json)?)
    }

    async fn fetch_catalog(path: PathBuf) -> Result<BadgeCatalog, GameError> {
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| GameError::CatalogUnavailable(format!("{}: {e}", path.display())))?;
        BadgeCatalog::from_json(&json)
    }

    fn print_status<C: Clock, S: SaveSlot>(engine: &Engine<C, S>) {
        let battery = engine.battery();
        let badge = engine.current_badge();
        println!(
            "coins: {} | battery: {}/{} ({:.0}%) | click lv {} | charge lv {} | badge: {} ({}, x{}) | theme: {:?}{}",
            engine.currency(),
            battery.current(),
            battery.capacity(),
            engine.battery_percentage(),
            engine.click_level(),
            engine.charge_level(),
            badge.name,
            badge.rarity.label(),
            badge.multiplier(),
            engine.theme(),
            if engine.bonus_available() { " | BONUS! press g" } else { "" },
        );
        for track in UpgradeTrack::all() {
            println!(
                "  [{}] {} upgrade: {} coins{}",
                track.key(),
                track.name(),
                engine.upgrade_cost(*track),
                if engine.can_afford(*track) { "" } else { " (locked)" },
            );
        }
    }

    fn print_catalog<C: Clock, S: SaveSlot>(engine: &Engine<C, S>) {
        for badge in &engine.catalog().badges {
            let status = engine
                .badge_status(&badge.id)
                .map(|s| format!("{s:?}"))
                .unwrap_or_default();
            println!(
                "  {} - {} [{}] {} coins ({})",
                badge.id,
                badge.name,
                badge.rarity.label(),
                badge.cost,
                status
            );
        }
    }

    /// Handle one stdin line. Returns false when the player quits.
    fn handle_line<C: Clock, S: SaveSlot>(engine: &mut Engine<C, S>, line: &str) -> bool {
        match line.trim() {
            "q" => return false,
            "s" => print_status(engine),
            "r" => {
                engine.reset();
                println!("progress reset");
            }
            "b" => print_catalog(engine),
            "h" | "?" => println!("{HELP}"),
            "" => {}
            input => match Action::parse(input) {
                Some(action) => match engine.dispatch(action) {
                    Ok(outcome) => println!("{outcome:?} | coins: {}", engine.currency()),
                    Err(e) => println!("{e}"),
                },
                None => println!("unknown command {input:?}; {HELP}"),
            },
        }
        true
    }

    /// Handle one stdin read. Returns false when the session should end:
    /// quit, end of input, or a read error.
    fn handle_stdin<C: Clock, S: SaveSlot>(
        engine: &mut Engine<C, S>,
        line: std::io::Result<Option<String>>,
    ) -> bool {
        match line {
            Ok(Some(line)) => handle_line(engine, &line),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                false
            }
        }
    }

    pub async fn run() -> Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(filter).init();

        let args = parse_args();
        let config = load_config(args.config.as_ref()).await?;
        let save_path = args
            .save
            .unwrap_or_else(|| PathBuf::from(format!("{}.json", config.storage_key)));
        info!(save = %save_path.display(), catalog = %args.catalog.display(), "starting");

        let mut engine = Engine::new(config, SystemClock::new(), FileSlot::new(save_path))?;

        let (catalog_tx, mut catalog_rx) = oneshot::channel();
        tokio::spawn(async move {
            // receiver gone means the session already ended
            let _ = catalog_tx.send(fetch_catalog(args.catalog).await);
        });
        let mut catalog_pending = true;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        println!("{HELP}");
        print_status(&engine);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let was_open = engine.bonus_available();
                    engine.update();
                    if !was_open && engine.bonus_available() {
                        println!("a bonus appeared! press g to claim it");
                    }
                }
                fetched = &mut catalog_rx, if catalog_pending => {
                    catalog_pending = false;
                    let fetched = fetched.unwrap_or_else(|_| {
                        Err(GameError::CatalogUnavailable("fetch task dropped".into()))
                    });
                    engine.install_catalog(fetched);
                }
                line = lines.next_line() => {
                    if !handle_stdin(&mut engine, line) {
                        break;
                    }
                }
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        warn!(error = %e, "ctrl-c handler failed");
                    }
                    break;
                }
            }
        }

        let final_state = engine.shutdown();
        println!("saved with {} coins", final_state.currency);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use brainrot_clicker::{save, ManualClock, MemorySlot};

        fn engine(slot: &MemorySlot) -> Engine<ManualClock, MemorySlot> {
            Engine::new(EngineConfig::default(), ManualClock::new(), slot.clone()).unwrap()
        }

        #[test]
        fn commands_keep_session_running_until_quit() {
            let slot = MemorySlot::new();
            let mut e = engine(&slot);
            assert!(handle_stdin(&mut e, Ok(Some("c".into()))));
            assert!(handle_stdin(&mut e, Ok(Some("nonsense".into()))));
            assert!(!handle_stdin(&mut e, Ok(Some("q".into()))));
            assert!(!handle_stdin(&mut e, Ok(None)));
            assert_eq!(e.currency(), 1);
        }

        #[test]
        fn stdin_error_ends_session_through_shutdown() {
            let slot = MemorySlot::new();
            let mut e = engine(&slot);
            handle_stdin(&mut e, Ok(Some("c".into())));
            let err = std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8");
            assert!(!handle_stdin(&mut e, Err(err)));

            let writes = slot.write_count();
            let final_state = e.shutdown();
            assert_eq!(slot.write_count(), writes + 1);
            assert_eq!(save::load(slot.contents().as_deref()), final_state);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    driver::run().await
}

// The browser build is the library alone; the page drives `Engine` directly.
#[cfg(target_arch = "wasm32")]
fn main() {}
