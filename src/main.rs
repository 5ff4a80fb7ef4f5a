use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::io::{BufWriter, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use burstfx::{EffectConfig, EffectKind, ParticleManager, Rgb};

const FIXED_DT: f32 = 1.0 / 60.0;

fn print_usage() {
    eprintln!("burstfx - Particle bursts for truecolor terminals");
    eprintln!();
    eprintln!("Usage: burstfx [EFFECT] [OPTIONS]");
    eprintln!();
    eprintln!("Effects:");
    eprintln!("  mix       Random mix of all effects (default)");
    eprintln!("  explosion Radial sparks with gravity and drag");
    eprintln!("  confetti  Tumbling, swaying shapes with long lifetimes");
    eprintln!("  fireworks Rising shells that burst at their peak");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bg-color RRGGBB  Background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --glow N           Glow strength, 0 disables (default 0)");
    eprintln!("  --debug            Start with the diagnostic overlay enabled");
    eprintln!();
    eprintln!("Keys: click = burst at cursor, space = burst at center,");
    eprintln!("      1/2/3 = explosion/confetti/fireworks, m = mix,");
    eprintln!("      c = clear, d = debug overlay, q/ESC = quit");
}

fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn spawn(
    manager: &mut ParticleManager,
    selected: Option<EffectKind>,
    x: f32,
    y: f32,
    cfg: &EffectConfig,
) {
    let kind = selected.unwrap_or_else(|| match fastrand::usize(0..3) {
        0 => EffectKind::Explosion,
        1 => EffectKind::Confetti,
        _ => EffectKind::Fireworks,
    });
    // Built-in kind names always parse.
    let _ = manager.add_effect(kind.name(), [x, y], cfg);
}

fn launch_position(kind: Option<EffectKind>, width: usize, height: usize) -> (f32, f32) {
    let x = fastrand::usize(width / 4..width * 3 / 4) as f32;
    // Fireworks rise, so they launch low; everything else bursts in place.
    let y = match kind {
        Some(EffectKind::Fireworks) => fastrand::usize(height * 2 / 3..height),
        _ => fastrand::usize(height / 6..height / 2),
    };
    (x, y as f32)
}

fn draw_overlay(
    stdout: &mut BufWriter<Stdout>,
    manager: &ParticleManager,
    frame_ms: f32,
) -> std::io::Result<()> {
    write!(
        stdout,
        "\x1b[H\x1b[0m\x1b[48;2;0;0;0m\x1b[38;2;220;220;220m effects: {:<3} particles: {:<5} frame: {:>5.1}ms \x1b[0m",
        manager.effects().len(),
        manager.particle_count(),
        frame_ms,
    )?;
    stdout.flush()
}

fn run(
    selected: Option<EffectKind>,
    background: Rgb,
    effect_cfg: EffectConfig,
    debug: bool,
) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(
        stdout,
        EnterAlternateScreen,
        Hide,
        Clear(ClearType::All),
        EnableMouseCapture
    )?;

    let (cols, rows) = terminal::size()?;
    let mut manager = ParticleManager::new(cols as usize, rows as usize * 2, background);
    manager.debug = debug;
    let mut selected = selected;

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    let mut sim_time = 0.0f32;
    let mut next_launch = 0.3f32;
    let mut frame_ms = 0.0f32;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c')
                        if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                    {
                        break;
                    }
                    KeyCode::Char('c') => manager.clear(),
                    KeyCode::Char('d') => manager.debug = !manager.debug,
                    KeyCode::Char('1') => selected = Some(EffectKind::Explosion),
                    KeyCode::Char('2') => selected = Some(EffectKind::Confetti),
                    KeyCode::Char('3') => selected = Some(EffectKind::Fireworks),
                    KeyCode::Char('m') => selected = None,
                    KeyCode::Char(' ') => {
                        let (w, h) = (manager.canvas().width(), manager.canvas().height());
                        spawn(
                            &mut manager,
                            selected,
                            w as f32 / 2.0,
                            h as f32 / 2.0,
                            &effect_cfg,
                        );
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        // Terminal cells are two pixels tall.
                        let x = mouse.column as f32;
                        let y = mouse.row as f32 * 2.0;
                        spawn(&mut manager, selected, x, y, &effect_cfg);
                    }
                }
                Event::Resize(cols, rows) => {
                    let debug = manager.debug;
                    manager = ParticleManager::new(cols as usize, rows as usize * 2, background);
                    manager.debug = debug;
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        frame_ms = frame_time * 1000.0;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            sim_time += FIXED_DT;
            if sim_time >= next_launch {
                let (w, h) = (manager.canvas().width(), manager.canvas().height());
                let (x, y) = launch_position(selected, w, h);
                spawn(&mut manager, selected, x, y, &effect_cfg);
                next_launch = sim_time + 0.4 + fastrand::f32() * 1.2;
            }
            manager.update(FIXED_DT * 1000.0);
            accumulator -= FIXED_DT;
        }

        manager.render();
        manager.present(&mut stdout)?;
        if manager.debug {
            draw_overlay(&mut stdout, &manager, frame_ms)?;
        }
    }

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    Ok(())
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut selected: Option<EffectKind> = None;
    let mut background: Rgb = (0, 0, 0);
    let mut glow = 0.0f32;
    let mut debug = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bg-color" => {
                if i + 1 < args.len() {
                    if let Some(color) = parse_hex_color(&args[i + 1]) {
                        background = color;
                        i += 2;
                    } else {
                        eprintln!("Invalid hex color: {}", args[i + 1]);
                        eprintln!("Expected format: RRGGBB (e.g., 1a1b26)");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("--bg-color requires a hex color value");
                    std::process::exit(1);
                }
            }
            "--glow" => {
                if let Some(n) = args.get(i + 1).and_then(|v| v.parse::<f32>().ok()) {
                    glow = n.max(0.0);
                    i += 2;
                } else {
                    eprintln!("--glow requires a numeric strength");
                    std::process::exit(1);
                }
            }
            "--debug" => {
                debug = true;
                i += 1;
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg => {
                if arg.starts_with('-') {
                    eprintln!("Unknown option: {arg}");
                    eprintln!();
                    print_usage();
                    std::process::exit(1);
                }
                if arg == "mix" {
                    selected = None;
                } else {
                    match arg.parse::<EffectKind>() {
                        Ok(kind) => selected = Some(kind),
                        Err(err) => {
                            eprintln!("{err}");
                            eprintln!();
                            print_usage();
                            std::process::exit(1);
                        }
                    }
                }
                i += 1;
            }
        }
    }

    let effect_cfg = EffectConfig {
        glow_strength: (glow > 0.0).then_some(glow),
        ..EffectConfig::default()
    };

    run(selected, background, effect_cfg, debug)
}
