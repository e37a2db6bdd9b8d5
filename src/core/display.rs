/// A sink for completed scanlines. The PPU calls `draw_line` once per visible line (0..144) with
/// already-palette-translated 2-bit shades, then `present` once the frame is complete.
pub trait Display {
    fn draw_line(&mut self, line_index: u8, pixels: [u8; 160]);
    fn present(&mut self);
}

/// A host-provided button source. Bit layout: `[Start|Select|B|A|Down|Up|Left|Right]`, high bit
/// first, one bit per button, `1` meaning pressed.
pub trait Input {
    fn poll(&mut self) -> u8;
}

/// Cartridge save-RAM persistence, implemented by the caller (file-backed, in-memory, or a
/// no-op). A failed `load` is treated as "no save data"; a failed `store` is only ever a warning.
pub trait SaveStore {
    fn load(&mut self) -> Option<Vec<u8>>;
    fn store(&mut self, data: &[u8]);
}

/// A `SaveStore` that never has anything to load and discards everything it's given.
pub struct NullSaveStore;

impl SaveStore for NullSaveStore {
    fn load(&mut self) -> Option<Vec<u8>> {
        None
    }

    fn store(&mut self, _data: &[u8]) {}
}
