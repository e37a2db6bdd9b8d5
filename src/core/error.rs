use thiserror::Error;

/// Unified error type for every fallible entry point the core exposes.
///
/// The three variants correspond to the error kinds the core surfaces to a caller: a bad
/// cartridge image, a failing save/boot-ROM read or write, and a malformed caller-supplied
/// configuration. The fourth kind in §7's design — an internal dispatch defect, raised for the
/// reserved illegal-opcode set and an MMU dispatch with no handler — is a fatal programming
/// defect rather than a recoverable condition, so those two sites panic directly (`cpu.rs`'s
/// `illegal_opcode`, `mmu.rs`'s unmapped-address arms) instead of constructing and propagating a
/// variant here, matching the teacher's own `panic!`/`unreachable!` idiom at the equivalent
/// sites.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("load error: {0}")]
    LoadError(#[from] LoadError),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigError(&'static str),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cartridge image is too small to contain a header ({size} bytes)")]
    CartridgeTooSmall { size: usize },

    #[error("cartridge header is malformed (declared ROM size does not fit the image)")]
    MalformedHeader,

    #[error("cartridge header declares an unsupported MBC type {mbc_type:#04x}")]
    UnsupportedMbc { mbc_type: u8 },

    #[error("boot ROM image must be exactly 256 bytes, got {size}")]
    InvalidBootRom { size: usize },
}
