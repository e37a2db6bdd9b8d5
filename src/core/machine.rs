//! Top-level composition object. Owns the CPU, MMU (and everything the MMU owns: cartridge,
//! timer, interrupts, PPU, joypad), and drives the frame loop the way a host embeds the core.

use log::info;

use super::cartridge::Cartridge;
use super::config::Config;
use super::cpu::Cpu;
use super::display::{Display, Input, SaveStore};
use super::error::{CoreError, LoadError};
use super::mmu::Mmu;

/// T-cycles per second at the Console's fixed 4.194304 MHz clock.
const CLOCK_HZ: u32 = 4_194_304;
const FRAMES_PER_SECOND: u32 = 60;
const BOOT_ROM_SIZE: usize = 0x100;

pub struct Machine {
    cpu: Cpu,
    mmu: Mmu,
}

impl Machine {
    /// Construct a machine from a `Config`: loads the cartridge ROM, optionally overlays a boot
    /// ROM, and hands off to `save_store` for the initial RAM load. Starts at the post-boot
    /// register state unless a boot ROM was supplied, in which case execution begins at `0x0000`
    /// and runs the real handoff sequence.
    pub fn new(
        config: &Config,
        rom_bytes: Vec<u8>,
        boot_rom_bytes: Option<Vec<u8>>,
        save_store: &mut dyn SaveStore,
    ) -> Result<Self, CoreError> {
        if config.rom_path.trim().is_empty() {
            return Err(CoreError::ConfigError("rom_path must not be empty"));
        }

        let cartridge = Cartridge::load(rom_bytes)?;
        info!("cartridge \"{}\" ready", cartridge.title());

        let boot_rom = match boot_rom_bytes {
            Some(bytes) => Some(Self::validate_boot_rom(bytes)?),
            None => None,
        };

        let boot_rom_present = boot_rom.is_some();
        let mut mmu = Mmu::new(cartridge, boot_rom);

        if config.no_save {
            info!("save persistence disabled by configuration");
        } else {
            mmu.load_save_ram(save_store.load());
        }

        let mut cpu = Cpu::new();
        if boot_rom_present {
            cpu.regs.pc = 0x0000;
        } else {
            cpu.regs.reset_post_boot();
        }

        Ok(Self { cpu, mmu })
    }

    fn validate_boot_rom(bytes: Vec<u8>) -> Result<[u8; BOOT_ROM_SIZE], CoreError> {
        if bytes.len() != BOOT_ROM_SIZE {
            return Err(LoadError::InvalidBootRom { size: bytes.len() }.into());
        }
        let mut image = [0u8; BOOT_ROM_SIZE];
        image.copy_from_slice(&bytes);
        Ok(image)
    }

    /// Run CPU/timer/PPU in lockstep for one 60Hz frame's worth of T-cycles, sampling `input`
    /// once at the start of the frame and presenting completed scanlines to `display`.
    pub fn run_frame(&mut self, display: &mut dyn Display, input: &mut dyn Input) {
        self.mmu.joypad.set_state(input.poll());

        let mut cycles_this_frame: u32 = 0;
        let budget = CLOCK_HZ / FRAMES_PER_SECOND;

        while cycles_this_frame < budget {
            let cycles = self.cpu.step(&mut self.mmu) as u32;
            self.mmu.timer.advance(cycles, &mut self.mmu.interrupts);
            self.mmu.ppu.advance(cycles, &mut self.mmu.interrupts, display);
            cycles_this_frame += cycles;
        }
    }

    /// Flush cartridge RAM through `save_store` on shutdown (or whenever the caller wants a
    /// checkpoint). A no-op when the cartridge has no battery-backed RAM.
    pub fn persist_save(&self, save_store: &mut dyn SaveStore) {
        let ram = self.mmu.save_ram();
        if ram.is_empty() {
            return;
        }
        save_store.store(ram);
    }

    /// Run the CPU (and the timer/PPU it drives) for exactly `steps` calls to `cpu.step()`,
    /// ignoring display/input entirely. Meant for tests and tooling that need to run a short,
    /// known-length program rather than a full 60Hz frame; a `HALT`ed CPU just burns 4 cycles per
    /// step, so running past the end of a test program is harmless.
    pub fn step_n(&mut self, steps: usize) {
        for _ in 0..steps {
            let cycles = self.cpu.step(&mut self.mmu) as u32;
            self.mmu.timer.advance(cycles, &mut self.mmu.interrupts);
            self.mmu.ppu.advance(cycles, &mut self.mmu.interrupts, &mut NoopDisplay);
        }
    }

    /// A snapshot of CPU-visible state, for asserting on register values in whole-machine tests.
    pub fn cpu_state(&self) -> CpuState {
        CpuState {
            a: self.cpu.regs.a,
            b: self.cpu.regs.b,
            c: self.cpu.regs.c,
            d: self.cpu.regs.d,
            e: self.cpu.regs.e,
            h: self.cpu.regs.h,
            l: self.cpu.regs.l,
            f: self.cpu.regs.f(),
            sp: self.cpu.regs.sp,
            pc: self.cpu.regs.pc,
            halted: self.cpu.halted,
            ime: self.cpu.ime,
        }
    }

    /// Read a single byte through the MMU's normal dispatch (echo aliasing, masking, etc. all
    /// apply, exactly as they would to a CPU-issued read).
    pub fn peek(&self, address: u16) -> u8 {
        self.mmu.read(address)
    }

    /// Read a little-endian word through the MMU, as `POP`/`RET` would.
    pub fn peek_word(&self, address: u16) -> u16 {
        self.mmu.read_word(address)
    }

    /// Write a single byte through the MMU's normal dispatch. Meant for test setup (priming
    /// timer/PPU registers directly) rather than anything a real CPU instruction wouldn't also
    /// be able to do.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.mmu.write(address, value);
    }

    /// Advance the timer and PPU by `cycles` T-cycles without moving the CPU at all. Used by
    /// tests that want to check timer/PPU timing in isolation from instruction fetch/execute.
    pub fn advance_peripherals(&mut self, cycles: u32) {
        self.mmu.timer.advance(cycles, &mut self.mmu.interrupts);
        self.mmu.ppu.advance(cycles, &mut self.mmu.interrupts, &mut NoopDisplay);
    }

    /// `IF` bit test, for asserting an interrupt got raised without servicing it.
    pub fn interrupt_flag(&self, index: u8) -> bool {
        self.mmu.interrupts.iflag & (1 << index) != 0
    }
}

/// A `Display` that drops every scanline. Used by [`Machine::step_n`], which exists to drive
/// short test programs rather than to render anything.
struct NoopDisplay;
impl Display for NoopDisplay {
    fn draw_line(&mut self, _line_index: u8, _pixels: [u8; 160]) {}
    fn present(&mut self) {}
}

/// CPU-visible register snapshot returned by [`Machine::cpu_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub f: u8,
    pub sp: u16,
    pub pc: u16,
    pub halted: bool,
    pub ime: bool,
}
