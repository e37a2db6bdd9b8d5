//! Demonstration binary: wires a caller-supplied [`Config`] to an SDL2-backed `Display`,
//! `Input`, and file-backed `SaveStore`, then drives [`gameboy::Machine`] one 60Hz frame at a
//! time. Everything in this file sits outside the core itself — it exists only to prove the core
//! runs real ROMs end to end, keeping the hot loop separate from the windowing glue.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread::sleep;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use simplelog::{Config as LogConfig, WriteLogger};

use gameboy::{Config, CoreError, Display, Input, Machine, SaveStore};

const SCREEN_WIDTH: usize = 160;
const SCREEN_HEIGHT: usize = 144;
const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Keyboard bindings, high bit first, matching the joypad bitmask layout
/// `[Start|Select|B|A|Down|Up|Left|Right]`.
const KEY_BINDINGS: [Scancode; 8] = [
    Scancode::Return, // Start
    Scancode::RShift, // Select
    Scancode::S,      // B
    Scancode::A,      // A
    Scancode::Down,
    Scancode::Up,
    Scancode::Left,
    Scancode::Right,
];

/// Run a commercial Console cartridge against the core, in an SDL2 window.
#[derive(Parser, Debug)]
#[command(name = "gameboy", about = "A Console emulator core, wrapped in an SDL2 demo shell")]
struct Cli {
    /// Path to the cartridge ROM image.
    rom_path: PathBuf,

    /// Optional 256-byte boot ROM image to run before the cartridge.
    #[arg(long)]
    boot_rom: Option<PathBuf>,

    /// Save-RAM path. Defaults to `<rom_path>.save`.
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// Disable save-RAM persistence entirely.
    #[arg(long)]
    no_save: bool,

    /// Window scale factor.
    #[arg(long, default_value_t = 4)]
    scale: u32,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            rom_path: self.rom_path.to_string_lossy().into_owned(),
            boot_rom_path: self.boot_rom.map(|p| p.to_string_lossy().into_owned()),
            save_path: self.save_path.map(|p| p.to_string_lossy().into_owned()),
            no_save: self.no_save,
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let scale = cli.scale;
    let config = cli.into_config();

    match run(&config, scale) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Core(err)) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
        Err(RunError::Host(message)) => {
            error!("host windowing error: {}", message);
            ExitCode::FAILURE
        }
    }
}

enum RunError {
    Core(CoreError),
    Host(String),
}

impl From<CoreError> for RunError {
    fn from(err: CoreError) -> Self {
        RunError::Core(err)
    }
}

fn init_logging() {
    let logfile = std::env::temp_dir().join("gameboy.log");
    if let Ok(file) = fs::File::create(&logfile) {
        let _ = WriteLogger::init(LevelFilter::Info, LogConfig::default(), file);
    }
}

fn run(config: &Config, scale: u32) -> Result<(), RunError> {
    let rom_bytes = fs::read(&config.rom_path).map_err(|e| RunError::Core(e.into()))?;
    let boot_rom_bytes = match &config.boot_rom_path {
        Some(path) => Some(fs::read(path).map_err(|e| RunError::Core(e.into()))?),
        None => None,
    };

    let mut save_store = FileSaveStore::new(config.effective_save_path());
    let mut machine = Machine::new(config, rom_bytes, boot_rom_bytes, &mut save_store)?;

    let sdl_context = sdl2::init().map_err(RunError::Host)?;
    let mut display = SdlDisplay::new(&sdl_context, scale).map_err(RunError::Host)?;
    let mut input = SdlInput::new(&sdl_context).map_err(RunError::Host)?;

    'frame: loop {
        let frame_start = Instant::now();

        if input.should_exit() {
            break 'frame;
        }

        machine.run_frame(&mut display, &mut input);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            sleep(FRAME_DURATION - elapsed);
        }
    }

    if !config.no_save {
        machine.persist_save(&mut save_store);
    }

    info!("shutdown complete");
    Ok(())
}

/// Save-RAM persistence backed by a plain file on disk. A missing or unreadable file is "no save
/// data" (the core proceeds with zeroed RAM); a failed write is logged and otherwise ignored.
struct FileSaveStore {
    path: String,
}

impl FileSaveStore {
    fn new(path: String) -> Self {
        Self { path }
    }
}

impl SaveStore for FileSaveStore {
    fn load(&mut self) -> Option<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!("could not load save file {}: {}", self.path, err);
                None
            }
        }
    }

    fn store(&mut self, data: &[u8]) {
        if let Err(err) = fs::write(&self.path, data) {
            warn!("could not write save file {}: {}", self.path, err);
        }
    }
}

/// Renders completed scanlines into an SDL2 canvas, mapping the PPU's 2-bit shades onto a
/// four-step grayscale ramp (closest a host not reproducing the Console's actual LCD tint can
/// get without claiming a specific palette).
struct SdlDisplay {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    scale: u32,
    framebuffer: [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT],
}

const SHADE_COLORS: [Color; 4] = [
    Color::RGB(0xE0, 0xF0, 0xD0),
    Color::RGB(0x88, 0xA0, 0x70),
    Color::RGB(0x40, 0x58, 0x38),
    Color::RGB(0x10, 0x18, 0x08),
];

impl SdlDisplay {
    fn new(context: &sdl2::Sdl, scale: u32) -> Result<Self, String> {
        let video = context.video()?;
        let window = video
            .window(
                "gameboy",
                SCREEN_WIDTH as u32 * scale,
                SCREEN_HEIGHT as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            scale,
            framebuffer: [[0u8; SCREEN_WIDTH]; SCREEN_HEIGHT],
        })
    }
}

impl Display for SdlDisplay {
    fn draw_line(&mut self, line_index: u8, pixels: [u8; 160]) {
        self.framebuffer[line_index as usize] = pixels;
    }

    fn present(&mut self) {
        for (row, line) in self.framebuffer.iter().enumerate() {
            let mut run_start = 0usize;
            for col in 1..=SCREEN_WIDTH {
                if col == SCREEN_WIDTH || line[col] != line[run_start] {
                    self.canvas.set_draw_color(SHADE_COLORS[line[run_start] as usize]);
                    let rect = Rect::new(
                        (run_start as u32 * self.scale) as i32,
                        (row as u32 * self.scale) as i32,
                        (col - run_start) as u32 * self.scale,
                        self.scale,
                    );
                    let _ = self.canvas.fill_rect(rect);
                    run_start = col;
                }
            }
        }
        self.canvas.present();
    }
}

/// Polls SDL2 keyboard state into the joypad bitmask and tracks whether the host asked to quit.
struct SdlInput {
    event_pump: sdl2::EventPump,
    exit_requested: bool,
}

impl SdlInput {
    fn new(context: &sdl2::Sdl) -> Result<Self, String> {
        Ok(Self {
            event_pump: context.event_pump()?,
            exit_requested: false,
        })
    }

    fn should_exit(&mut self) -> bool {
        for event in self.event_pump.poll_iter() {
            if let Event::Quit { .. } = event {
                self.exit_requested = true;
            }
        }
        self.exit_requested
    }
}

impl Input for SdlInput {
    fn poll(&mut self) -> u8 {
        let pressed = self.event_pump.keyboard_state();
        let mut state = 0u8;
        for (index, scancode) in KEY_BINDINGS.iter().enumerate() {
            if pressed.is_scancode_pressed(*scancode) {
                state |= 1 << (7 - index);
            }
        }
        state
    }
}
