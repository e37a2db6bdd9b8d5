//! Debug-only opcode metadata: mnemonic strings for disassembly and panic messages. Compiled
//! into the binary with `include_str!` rather than read from a runtime path, since the table
//! never changes and the core shouldn't depend on a working directory layout to emit a useful
//! panic message.
//!
//! This table plays no part in instruction execution or cycle accounting; both are hardcoded
//! directly in [`super::cpu`]'s own opcode table.

use serde::Deserialize;

const OPCODES_JSON: &str = include_str!("../../data/opcodes.json");

#[derive(Deserialize)]
struct RawTable {
    unprefixed: Vec<String>,
    cbprefixed: Vec<String>,
}

/// Mnemonic lookup table, parsed once from the embedded JSON.
pub struct Mnemonics {
    unprefixed: Vec<String>,
    cbprefixed: Vec<String>,
}

impl Mnemonics {
    pub fn load() -> Self {
        let raw: RawTable =
            serde_json::from_str(OPCODES_JSON).expect("embedded opcode table is malformed");
        assert_eq!(raw.unprefixed.len(), 256, "unprefixed table must cover all 256 opcodes");
        assert_eq!(raw.cbprefixed.len(), 256, "cb-prefixed table must cover all 256 opcodes");
        Self {
            unprefixed: raw.unprefixed,
            cbprefixed: raw.cbprefixed,
        }
    }

    pub fn mnemonic(&self, opcode: u8, is_cb_prefixed: bool) -> &str {
        if is_cb_prefixed {
            &self.cbprefixed[opcode as usize]
        } else {
            &self.unprefixed[opcode as usize]
        }
    }

    /// A short human-readable description, for panic messages and disassembly dumps:
    /// `0x76 HALT @ 0x0150`.
    pub fn describe(&self, opcode: u8, is_cb_prefixed: bool, address: u16) -> String {
        format!(
            "{:#04x} {} @ {:#06x}",
            opcode,
            self.mnemonic(opcode, is_cb_prefixed),
            address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_full_table() {
        let table = Mnemonics::load();
        assert_eq!(table.mnemonic(0x00, false), "NOP");
        assert_eq!(table.mnemonic(0x76, false), "HALT");
        assert_eq!(table.mnemonic(0x47, true), "BIT 0,A");
    }

    #[test]
    fn describes_with_address() {
        let table = Mnemonics::load();
        let desc = table.describe(0xCB, false, 0x0100);
        assert_eq!(desc, "0xcb PREFIX CB @ 0x0100");
    }
}
