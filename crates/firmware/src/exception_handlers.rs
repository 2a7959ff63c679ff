//! Cortex-M exception handlers for the Lark firmware.
//!
//! The control core treats peripheral failures as recoverable, but a
//! processor fault (illegal access, undefined instruction) cannot be; the
//! HardFault handler reports the stacked frame over defmt/RTT and halts so
//! the watchdog resets the device.
//!
//! # Hardware-only handler
//!
//! The `#[cortex_m_rt::exception]` attribute requires ARM target intrinsics
//! and is therefore gated behind `#[cfg(feature = "hardware")]`. The module
//! itself compiles unconditionally so host tests can verify it exists.

/// Marker constant — confirms this module is linked into the binary.
pub const HARDFAULT_DEFINED: bool = true;

/// HardFault exception handler (hardware target only).
///
/// Returning from a HardFault handler is undefined behavior on Cortex-M;
/// `defmt::panic!` diverges into the panic-probe handler, which halts. The
/// independent watchdog then resets the device.
#[cfg(feature = "hardware")]
#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    defmt::panic!(
        "HardFault! Stacked exception frame at 0x{:08x}. \
         Check stacked PC for the fault address.",
        ef as *const _ as u32
    );
}
