use super::Mbc;

/// No memory bank controller: a single fixed 32KiB ROM, no external RAM.
pub struct Mbc0 {
    rom: Vec<u8>,
}

impl Mbc0 {
    pub fn new(rom: Vec<u8>) -> Self {
        Self { rom }
    }
}

impl Mbc for Mbc0 {
    fn read(&self, address: u16) -> u8 {
        self.rom.get(address as usize).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, _address: u16, _value: u8) {}

    fn ram(&self) -> &[u8] {
        &[]
    }

    fn load_ram(&mut self, _data: &[u8]) {}
}
