//! Typeshot entry point
//!
//! Headless native driver: loads an optional JSON config, plays a session with
//! the autopilot for a fixed stretch of simulated time and logs what happened.
//!
//! Usage: `typeshot [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod autopilot;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};

    use typeshot::GameConfig;
    use typeshot::clock::FrameClock;
    use typeshot::hud::{HudSnapshot, dispatch};
    use typeshot::render::{DrawCommand, Renderer, render};
    use typeshot::sim::{GameState, tick};

    use crate::autopilot::Autopilot;

    /// Simulated session length (seconds)
    const SESSION_SECS: f64 = 120.0;
    const FRAME_SECS: f64 = 1.0 / 60.0;
    const DEFAULT_SEED: u64 = 0x7e57_5eed;

    /// Renderer that only counts what it is asked to draw
    #[derive(Debug, Default)]
    struct FrameStats {
        frames: u64,
        commands: u64,
        overlays: u64,
    }

    impl Renderer for FrameStats {
        fn draw(&mut self, command: &DrawCommand) {
            self.commands += 1;
            if matches!(command, DrawCommand::GameOverOverlay { .. }) {
                self.overlays += 1;
            }
        }

        fn end_frame(&mut self) {
            self.frames += 1;
        }
    }

    fn load_config(path: Option<&str>) -> Result<GameConfig> {
        let Some(path) = path else {
            log::info!("Using built-in configuration");
            return Ok(GameConfig::default());
        };
        let text = std::fs::read_to_string(path).with_context(|| format!("read config: {}", path))?;
        let config = GameConfig::from_json(&text).with_context(|| format!("load config: {}", path))?;
        log::info!("Loaded configuration from {}", path);
        Ok(config)
    }

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let config = load_config(args.next().as_deref())?;
        let seed = match args.next() {
            Some(s) => s.parse::<u64>().with_context(|| format!("parse seed: {}", s))?,
            None => DEFAULT_SEED,
        };

        let mut state = GameState::new(&config, seed)?;
        let mut clock = FrameClock::new();
        let mut pilot = Autopilot::new();
        let mut hud = HudSnapshot::default();
        let mut stats = FrameStats::default();

        log::info!("Session starting (seed {}, {}s simulated)", seed, SESSION_SECS);

        let mut now = 0.0;
        let mut next_report = 10.0;
        clock.advance(now);
        while now < SESSION_SECS {
            now += FRAME_SECS;
            let dt = clock.advance(now);
            let input = pilot.next_input(&state, &config);
            tick(&mut state, &config, &input, dt);

            dispatch(&state.drain_events(), &mut hud);
            render(&mut stats, &state, &config);

            if now >= next_report {
                log::info!(
                    "t={:.0}s wave {} score {} hp {} lives {} enemies {}",
                    now,
                    hud.wave,
                    hud.score,
                    hud.hp,
                    hud.lives,
                    state.enemies.len()
                );
                next_report += 10.0;
            }
            if state.is_game_over() {
                break;
            }
        }

        log::info!(
            "Session over: score {} wave {} lives {}{}",
            hud.score,
            hud.wave,
            hud.lives,
            if hud.game_over { " (game over)" } else { "" }
        );
        log::info!(
            "Rendered {} frames, {} draw commands, {} HUD updates",
            stats.frames,
            stats.commands,
            hud.updates
        );
        log::debug!("Game-over overlays drawn: {}", stats.overlays);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Typeshot (native) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `typeshot::sim::tick` directly
}
