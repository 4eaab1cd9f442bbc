//! Board pin assignments and bring-up
//!
//! The shield routes the ranger and the SPI bus through multiplexers and
//! level shifters whose select lines are plain GPIOs. They are set once at
//! startup, in table order, before either worker opens its pins.

use log::{info, warn};

use pulsematrix_hal_linux::{PinDirection, SysfsGpio};

/// Ranger trigger output
pub const TRIGGER_GPIO: u32 = 11;

/// Ranger echo input
pub const ECHO_GPIO: u32 = 14;

/// Matrix chip-select output (active low)
pub const CS_GPIO: u32 = 15;

/// One pin's bring-up: export, then optional direction, then optional level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSetup {
    pub gpio: u32,
    pub direction: Option<PinDirection>,
    pub value: Option<bool>,
}

const fn pin(gpio: u32, direction: Option<PinDirection>, value: Option<bool>) -> PinSetup {
    PinSetup {
        gpio,
        direction,
        value,
    }
}

const IN: Option<PinDirection> = Some(PinDirection::In);
const OUT: Option<PinDirection> = Some(PinDirection::Out);
const HIGH: Option<bool> = Some(true);
const LOW: Option<bool> = Some(false);

/// Bring-up table
pub const BOARD_PINS: &[PinSetup] = &[
    // Ranger header
    pin(TRIGGER_GPIO, OUT, None),
    pin(13, OUT, LOW),
    pin(ECHO_GPIO, IN, None),
    pin(34, OUT, LOW),
    pin(16, OUT, HIGH),
    pin(77, None, LOW),
    pin(76, None, LOW),
    pin(64, None, LOW),
    pin(32, OUT, LOW),
    // SPI routing
    pin(72, OUT, LOW),
    pin(44, OUT, HIGH),
    pin(46, OUT, HIGH),
    pin(CS_GPIO, OUT, None),
    pin(24, OUT, LOW),
    pin(42, OUT, LOW),
    pin(30, OUT, LOW),
    pin(25, OUT, HIGH),
    pin(43, OUT, HIGH),
    pin(31, OUT, HIGH),
];

/// Apply one entry
///
/// Each step is attempted even if an earlier one failed; returns whether
/// all of them succeeded.
fn apply(gpio: &SysfsGpio, setup: &PinSetup) -> bool {
    let mut ok = true;
    if let Err(e) = gpio.export(setup.gpio) {
        warn!("{}", e);
        ok = false;
    }
    if let Some(direction) = setup.direction {
        if let Err(e) = gpio.set_direction(setup.gpio, direction) {
            warn!("{}", e);
            ok = false;
        }
    }
    if let Some(high) = setup.value {
        if let Err(e) = gpio.set_value(setup.gpio, high) {
            warn!("{}", e);
            ok = false;
        }
    }
    ok
}

/// Run the bring-up table
///
/// Failures are logged and skipped; returns how many pins failed.
pub fn init(gpio: &SysfsGpio) -> usize {
    let failed = BOARD_PINS.iter().filter(|setup| !apply(gpio, setup)).count();
    if failed > 0 {
        warn!("board init: {} of {} pins failed", failed, BOARD_PINS.len());
    } else {
        info!("board init: {} pins configured", BOARD_PINS.len());
    }
    failed
}

/// Unexport every pin from the bring-up table
pub fn release(gpio: &SysfsGpio) {
    for setup in BOARD_PINS.iter().rev() {
        if let Err(e) = gpio.unexport(setup.gpio) {
            warn!("{}", e);
        }
    }
    info!("board pins released");
}
