use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::error::Error;
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use lane_hopper::{GameConfig, GameWorld, Lane, Phase, RenderSnapshot};

const WIDTH: u16 = 60;
const HEIGHT: u16 = 24;
/// Screen rows per world unit along Z; terminal cells are about twice as tall
/// as they are wide.
const Z_SCALE: f32 = 0.5;

/// Charge a jump with Space, release with Space, land on the next platform.
#[derive(Parser, Debug)]
#[command(name = "lane-hopper", version, about)]
struct Cli {
    /// RON file overriding any of the default game constants
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for platform generation (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames per second of the host loop
    #[arg(long, default_value = "20")]
    fps: u32,

    /// Write log output here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective config as RON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.dump_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let mut world = GameWorld::new(config)?;
    let tick_rate = Duration::from_millis(1000 / u64::from(cli.fps.max(1)));
    log::info!("starting host loop at {:?} per frame", tick_rate);

    let mut stdout = stdout();
    terminal::enable_raw_mode()?;
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide
    )?;

    let result = run(&mut stdout, &mut world, tick_rate);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    if let Err(e) = &result {
        log::error!("host loop failed: {}", e);
    }
    println!("Final score: {}", world.landings());
    result
}

fn init_logging(log_file: Option<&std::path::Path>) -> Result<(), Box<dyn Error>> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = builder.try_init();
    Ok(())
}

fn run(
    stdout: &mut impl Write,
    world: &mut GameWorld,
    tick_rate: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut charging = false;
    let mut last_frame = Instant::now();

    loop {
        let start_time = Instant::now();

        // --- INPUT ---
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Release {
                    continue;
                }
                match key_event.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') => {
                        if charging {
                            world.release_jump();
                            charging = false;
                        } else if !world.player().falling {
                            charging = true;
                        }
                    }
                    KeyCode::Char('c') => world.change_color(),
                    _ => {}
                }
            }
        }
        if charging {
            world.charge_jump();
        }

        // --- UPDATE ---
        let dt = world.config().step_delta(last_frame.elapsed());
        last_frame = Instant::now();
        let report = world.tick(dt)?;
        for ev in world.drain_events() {
            log::debug!("frame {}: {:?}", world.frame_id(), ev);
        }

        // --- DRAW ---
        let snapshot = world.snapshot();
        draw_frame(stdout, &snapshot, charging)?;

        if report.phase == Phase::GameOver {
            draw_game_over(stdout, snapshot.landings)?;
            wait_for_key()?;
            return Ok(());
        }

        let elapsed = start_time.elapsed();
        if let Some(time_to_wait) = tick_rate.checked_sub(elapsed) {
            thread::sleep(time_to_wait);
        }
    }
}

fn wait_for_key() -> std::io::Result<()> {
    loop {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind != KeyEventKind::Release {
                return Ok(());
            }
        }
    }
}

/// Top-down view centred on the camera focus: X runs right, -Z runs up.
fn to_screen(snapshot: &RenderSnapshot, x: f32, z: f32) -> Option<(u16, u16)> {
    let focus = snapshot.camera.focus;
    let col = (WIDTH / 2) as f32 + (x - focus.x);
    let row = (HEIGHT / 2) as f32 + (z - focus.z) * Z_SCALE;
    if col < 1.0 || row < 1.0 || col >= (WIDTH - 1) as f32 || row >= (HEIGHT - 2) as f32 {
        return None;
    }
    Some((col.round() as u16, row.round() as u16))
}

fn draw_frame(
    stdout: &mut impl Write,
    snapshot: &RenderSnapshot,
    charging: bool,
) -> std::io::Result<()> {
    queue!(stdout, terminal::Clear(ClearType::All))?;
    draw_boundaries(stdout)?;
    draw_platforms(stdout, snapshot)?;
    draw_player(stdout, snapshot)?;
    draw_hud(stdout, snapshot, charging)?;
    stdout.flush()
}

fn draw_boundaries(stdout: &mut impl Write) -> std::io::Result<()> {
    for y in 0..HEIGHT - 1 {
        queue!(
            stdout,
            cursor::MoveTo(0, y),
            Print("|"),
            cursor::MoveTo(WIDTH - 1, y),
            Print("|")
        )?;
    }
    Ok(())
}

fn draw_platforms(stdout: &mut impl Write, snapshot: &RenderSnapshot) -> std::io::Result<()> {
    for p in snapshot.platforms.iter().filter(|p| p.visible) {
        let Some((col, row)) = to_screen(snapshot, p.position.x, p.position.z) else {
            continue;
        };
        let half = p.radius.round().max(1.0) as u16;
        let glyph = if p.active { "#" } else { "=" };
        let [r, g, b, _] = p.color;
        queue!(
            stdout,
            SetForegroundColor(Color::Rgb {
                r: (r * 255.0) as u8,
                g: (g * 255.0) as u8,
                b: (b * 255.0) as u8,
            }),
            cursor::MoveTo(col.saturating_sub(half).max(1), row),
            Print(glyph.repeat(usize::from(half * 2 + 1))),
            ResetColor
        )?;
    }
    Ok(())
}

fn draw_player(stdout: &mut impl Write, snapshot: &RenderSnapshot) -> std::io::Result<()> {
    let pos = snapshot.player.position;
    if let Some((col, row)) = to_screen(snapshot, pos.x, pos.z) {
        let glyph = if snapshot.player.squash < 0.8 { "o" } else { "@" };
        queue!(stdout, cursor::MoveTo(col, row), Print(glyph))?;
    }
    Ok(())
}

fn draw_hud(
    stdout: &mut impl Write,
    snapshot: &RenderSnapshot,
    charging: bool,
) -> std::io::Result<()> {
    let player = &snapshot.player;
    let lane = match player.lane {
        Lane::X => "→",
        Lane::Z => "↑",
    };
    let status = if player.falling {
        format!("airborne  h={:.1}", player.position.y)
    } else if charging {
        format!("charging  {:>3}", player.charge_ticks)
    } else {
        "ready".to_string()
    };
    queue!(
        stdout,
        cursor::MoveTo(1, HEIGHT - 1),
        Print(format!(
            "Score: {}  lane {}  {}  [space] jump  [c] colours  [q] quit",
            snapshot.landings, lane, status
        ))
    )
}

fn draw_game_over(stdout: &mut impl Write, score: u32) -> std::io::Result<()> {
    execute!(
        stdout,
        cursor::MoveTo(WIDTH / 2 - 5, HEIGHT / 2),
        Print("Game Over!"),
        cursor::MoveTo(WIDTH / 2 - 10, HEIGHT / 2 + 1),
        Print(format!("Final Score: {}", score)),
        cursor::MoveTo(0, HEIGHT)
    )
}
