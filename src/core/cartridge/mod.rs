mod mbc0;
mod mbc1;
mod mbc3;

use log::info;
use pretty_hex::{HexConfig, PrettyHex};

use crate::core::error::LoadError;
use mbc0::Mbc0;
use mbc1::Mbc1;
use mbc3::Mbc3;

const HEADER_TITLE: std::ops::Range<usize> = 0x0134..0x0144;
const HEADER_MBC_TYPE: usize = 0x0147;
const HEADER_ROM_SIZE: usize = 0x0148;
const HEADER_RAM_SIZE: usize = 0x0149;
const HEADER_END: usize = 0x0150;

/// Address-range dispatch shared by every memory bank controller: the ROM range (`0x0000..=0x7FFF`)
/// and the cartridge-RAM window mirrored at `0xA000..=0xBFFF`.
pub trait Mbc {
    fn read(&self, address: u16) -> u8;
    fn write(&mut self, address: u16, value: u8);
    fn ram(&self) -> &[u8];
    fn load_ram(&mut self, data: &[u8]);
}

pub struct Cartridge {
    mbc: Box<dyn Mbc + Send>,
    title: String,
}

impl Cartridge {
    /// Parse a cartridge header and construct the matching MBC. `0x00` is a plain ROM with no
    /// banking, `0x01..=0x03` is the MBC1 family, `0x13` is MBC3 with RAM and battery backup.
    pub fn load(data: Vec<u8>) -> Result<Self, LoadError> {
        if data.len() <= HEADER_END {
            return Err(LoadError::CartridgeTooSmall { size: data.len() });
        }

        let mbc_type = data[HEADER_MBC_TYPE];
        let rom_size = rom_size_bytes(data[HEADER_ROM_SIZE]);
        let ram_size = ram_size_bytes(data[HEADER_RAM_SIZE]);

        if data.len() < rom_size {
            return Err(LoadError::MalformedHeader);
        }

        let title = String::from_utf8_lossy(&data[HEADER_TITLE])
            .trim_end_matches('\0')
            .to_string();

        info!(
            "loaded cartridge \"{}\" (mbc {:#04x}, rom {} KiB, ram {} KiB)\n{:?}",
            title,
            mbc_type,
            rom_size / 1024,
            ram_size / 1024,
            data[..0x20].hex_conf(HexConfig {
                title: false,
                ascii: true,
                width: 16,
                ..Default::default()
            })
        );

        let mbc: Box<dyn Mbc + Send> = match mbc_type {
            0x00 => Box::new(Mbc0::new(data)),
            0x01..=0x03 => Box::new(Mbc1::new(data, ram_size)),
            0x13 => Box::new(Mbc3::new(data, ram_size)),
            other => return Err(LoadError::UnsupportedMbc { mbc_type: other }),
        };

        Ok(Self { mbc, title })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn read(&self, address: u16) -> u8 {
        self.mbc.read(address)
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.mbc.write(address, value);
    }

    pub fn ram(&self) -> &[u8] {
        self.mbc.ram()
    }

    pub fn load_ram(&mut self, data: &[u8]) {
        self.mbc.load_ram(data);
    }
}

/// `32KiB << N` per the header's ROM-size byte.
fn rom_size_bytes(header_value: u8) -> usize {
    0x8000 << header_value
}

/// External RAM size per the header's RAM-size byte. Only header values 0, 2, 3, and 4 are
/// meaningful; anything else is treated as no RAM.
fn ram_size_bytes(header_value: u8) -> usize {
    match header_value {
        2 => 1 << 13, // 8 KiB, single bank.
        3 => 1 << 15, // 32 KiB, four banks.
        4 => 1 << 17, // 128 KiB, sixteen banks.
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_rom(mbc_type: u8, rom_size_byte: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[HEADER_MBC_TYPE] = mbc_type;
        rom[HEADER_ROM_SIZE] = rom_size_byte;
        rom
    }

    #[test]
    fn rejects_truncated_header() {
        let result = Cartridge::load(vec![0u8; 10]);
        assert!(matches!(result, Err(LoadError::CartridgeTooSmall { .. })));
    }

    #[test]
    fn rejects_unsupported_mbc() {
        let result = Cartridge::load(blank_rom(0x05, 0));
        assert!(matches!(result, Err(LoadError::UnsupportedMbc { mbc_type: 0x05 })));
    }

    #[test]
    fn accepts_plain_rom() {
        let result = Cartridge::load(blank_rom(0x00, 0));
        assert!(result.is_ok());
    }

    #[test]
    fn accepts_mbc1() {
        let result = Cartridge::load(blank_rom(0x01, 0));
        assert!(result.is_ok());
    }

    #[test]
    fn accepts_mbc3_with_ram() {
        let mut rom = blank_rom(0x13, 0);
        rom[HEADER_RAM_SIZE] = 3;
        let result = Cartridge::load(rom);
        assert!(result.is_ok());
    }
}
