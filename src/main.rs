use arboard::Clipboard;
use cavegen::{CaveSession, CellState, Config, Grid, Position, SessionStatus};
use log::{error, info, warn};
use macroquad::prelude::*;

/// Command line options
#[derive(Debug, Default)]
struct Options {
    /// Print the map and placement to stdout instead of animating.
    /// The binary runs under `#[macroquad::main]`, so a window still opens briefly.
    headless: bool,
    seed: Option<u64>,
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--headless" => options.headless = true,
            "--seed" => match iter.next().map(|value| value.parse::<u64>()) {
                Some(Ok(seed)) => options.seed = Some(seed),
                _ => warn!("--seed expects an unsigned integer, ignoring"),
            },
            other => warn!("Unknown argument '{}'", other),
        }
    }
    options
}

/// Text map with the agent drawn as '@'
fn render_with_agent(grid: &Grid, agent: Option<Position>) -> String {
    let mut result = String::new();
    for (pos, state) in grid.iter() {
        let symbol = if Some(pos) == agent { '@' } else { state.symbol() };
        result.push(symbol);
        if pos.x == grid.size() - 1 {
            result.push('\n');
        }
    }
    result
}

fn save_run_log(config: &Config, session: &CaveSession) {
    if !config.logging.enable_run_log {
        return;
    }
    let path = &config.logging.run_log_path;
    match session.run_log().save_to_file(path) {
        Ok(()) => info!("Run log written to {}", path),
        Err(e) => warn!("Failed to write run log to {}: {}", path, e),
    }
}

/// Generate, place and print without opening a window
fn run_headless(config: &Config, seed: u64) {
    let mut session = match CaveSession::with_seed(config, seed) {
        Ok(session) => session,
        Err(e) => {
            error!("Cannot start generation: {}", e);
            return;
        }
    };

    let result = session.run_to_completion();
    let agent = session.placement().map(|placement| placement.position);
    print!("{}", render_with_agent(session.grid(), agent));

    match result {
        Ok(placement) => println!(
            "\nAgent placed at {} ({} reachable tiles within radius {}, {} attempts)",
            placement.position, placement.reachable, placement.radius, placement.attempts
        ),
        Err(e) => println!("\nPlacement failed: {}", e),
    }
    println!("{}", session.run_log().summary());
    save_run_log(config, &session);
}

fn rgb(color: [u8; 3]) -> Color {
    Color::from_rgba(color[0], color[1], color[2], 255)
}

/// Visualization state
struct VisState {
    config: Config,
    session: CaveSession,
    last_step: f64,
    status: String,
    log_saved: bool,
}

impl VisState {
    fn new(config: Config, seed: u64) -> cavegen::Result<Self> {
        let session = CaveSession::with_seed(&config, seed)?;
        Ok(VisState {
            config,
            session,
            last_step: get_time(),
            status: format!("Seed {}", seed),
            log_saved: false,
        })
    }

    /// Start over with the next seed
    fn regenerate(&mut self) {
        let seed = self.session.seed().wrapping_add(1);
        match CaveSession::with_seed(&self.config, seed) {
            Ok(session) => {
                info!("Regenerating with seed {}", seed);
                self.session = session;
                self.status = format!("Seed {}", seed);
                self.last_step = get_time();
                self.log_saved = false;
            }
            Err(e) => error!("Cannot regenerate: {}", e),
        }
    }

    /// Run the next stage once its pause has elapsed
    /// The fill and the placement happen right away, every smoothing pass waits `pause_time`.
    fn update(&mut self) {
        if self.session.is_finished() {
            if !self.log_saved {
                info!("{}", self.session.run_log().summary());
                save_run_log(&self.config, &self.session);
                self.log_saved = true;
            }
            return;
        }

        let generator = self.session.generator();
        let waiting_for_pass = generator.state() != cavegen::GeneratorState::Uninitialized
            && !generator.is_stable();
        let now = get_time();
        if waiting_for_pass && now - self.last_step < self.config.visual.pause_time {
            return;
        }
        self.last_step = now;

        self.status = match self.session.step() {
            SessionStatus::Randomized => format!("Seed {}: random fill", self.session.seed()),
            SessionStatus::Smoothed { pass, changed } => format!(
                "Seed {}: pass {}/{} ({} cells changed)",
                self.session.seed(),
                pass,
                self.config.generation.smoothing_steps,
                changed
            ),
            SessionStatus::Placed(placement) => {
                info!("Player successfully placed at {}", placement.position);
                format!(
                    "Seed {}: agent at {} ({} reachable)",
                    self.session.seed(),
                    placement.position,
                    placement.reachable
                )
            }
            SessionStatus::Failed(e) => {
                warn!("{}", e);
                format!("Seed {}: {}", self.session.seed(), e)
            }
            SessionStatus::Done => self.status.clone(),
        };
    }

    fn copy_to_clipboard(&self) {
        let agent = self.session.placement().map(|placement| placement.position);
        let grid_string = render_with_agent(self.session.grid(), agent);
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&grid_string) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Map copied to clipboard");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn draw(&self) {
        clear_background(Color::from_rgba(30, 30, 30, 255));

        let grid = self.session.grid();
        let size = grid.size().max(1) as f32;
        let cell_size = (screen_width().min(screen_height()) / size).max(1.0);
        let wall = rgb(self.config.visual.wall_color);
        let floor = rgb(self.config.visual.floor_color);

        // The grid's y=0 row is drawn at the bottom, like a tilemap
        for (pos, state) in grid.iter() {
            let px = pos.x as f32 * cell_size;
            let py = (grid.size() - 1 - pos.y) as f32 * cell_size;
            let color = match state {
                CellState::Wall => wall,
                CellState::Floor => floor,
            };
            draw_rectangle(px, py, cell_size, cell_size, color);
        }

        if let Some(placement) = self.session.placement() {
            let pos = placement.position;
            let cx = (pos.x as f32 + 0.5) * cell_size;
            let cy = (grid.size() - 1 - pos.y) as f32 * cell_size + 0.5 * cell_size;
            draw_circle(
                cx,
                cy,
                (cell_size * 0.5).max(3.0),
                rgb(self.config.visual.agent_color),
            );
        }

        let info = format!(
            "{}\nR: regenerate with next seed\nC: copy map to clipboard\nEsc: close window",
            self.status
        );
        for (i, line) in info.lines().enumerate() {
            draw_text(line, 10.0, 20.0 + i as f32 * 20.0, 20.0, WHITE);
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: Config::load().visual.window_title,
        window_width: 800,
        window_height: 800,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let config = Config::load();
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args);
    let seed = options.seed.unwrap_or(config.generation.seed);

    if options.headless {
        run_headless(&config, seed);
        return;
    }

    let mut state = match VisState::new(config, seed) {
        Ok(state) => state,
        Err(e) => {
            error!("Cannot start generation: {}", e);
            return;
        }
    };

    loop {
        if is_key_pressed(KeyCode::R) {
            state.regenerate();
        }

        // Copy map to clipboard on C key
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update();
        state.draw();

        next_frame().await
    }
}
