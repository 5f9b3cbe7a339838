//! randloop-hw-interface
//!
//! Clock → Sequencer → DAC/gate firmware for the Raspberry Pi Pico 2. Wires
//! the sequencer core and the DAC driver into a live instrument:
//!
//! 1. The sequencer task samples the clock input on every tick and hands the
//!    level to `Sequencer::tick`.
//! 2. A rising clock edge plays a step: the returned CV code is written to
//!    the MCP4725 and the gate output is asserted if the step's gate is on.
//! 3. The gate is released once the trigger timer expires, on a later tick.
//! 4. The menu task turns encoder detents and button presses into `Menu`
//!    calls. Each confirmed edit publishes a full `Parameters` batch through
//!    a signal; the sequencer task picks it up at the start of its next tick.
//!
//! Menu rendering is not implemented; menu state is logged over RTT.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mcp4725_driver::{Mcp4725, DEFAULT_ADDRESS};
use randloop::menu::MenuState;
use randloop::{ClockLevel, GateLevel, Menu, Parameters, Sequencer};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Control loop period. Short enough that a 1 ms clock pulse is never
/// missed.
const TICK_PERIOD: Duration = Duration::from_micros(250);

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Latest confirmed parameter batch, written by the menu task and taken by
/// the sequencer task. Only the newest batch is kept.
static PARAMETERS: StaticCell<Signal<CriticalSectionRawMutex, Parameters>> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// The DAC owns I2C0 outright; nothing else sits on the bus.
type DacI2c = I2c<'static, I2C0, i2c::Async>;

type ParameterSignal = Signal<CriticalSectionRawMutex, Parameters>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Clock-driven playback loop.
///
/// Owns the sequencer and every output. DAC failures are logged and the
/// loop carries on; a missed CV update is preferable to a stalled clock.
#[embassy_executor::task]
async fn sequencer_task(
    mut sequencer: Sequencer<SmallRng>,
    clock_in: Input<'static>,
    mut gate_out: Output<'static>,
    mut dac: Mcp4725<DacI2c>,
    parameters: &'static ParameterSignal,
) {
    info!("Sequencer task started");

    let mut ticker = Ticker::every(TICK_PERIOD);

    loop {
        // Apply edits between steps, never during one.
        if let Some(params) = parameters.try_take() {
            match sequencer.apply_parameters(params) {
                Ok(changes) => debug!("{} parameter(s) changed", changes.len()),
                Err(e) => warn!("Parameters rejected: {}", e),
            }
        }

        // The clock input is inverted by the input stage.
        let level = if clock_in.is_low() {
            ClockLevel::Asserted
        } else {
            ClockLevel::Deasserted
        };

        let events = sequencer.tick(Instant::now(), level);

        // CV first so the pitch has settled when the gate opens.
        if let Some(step) = events.step {
            trace!("Step {}: cv={} gate={}", step.step, step.cv, step.gate);
            if let Err(e) = dac.write(step.cv).await {
                error!("DAC write failed: {}", e);
            }
        }

        // Gate output is inverted: low = trigger on.
        match events.gate {
            Some(GateLevel::Asserted) => gate_out.set_low(),
            Some(GateLevel::Deasserted) => gate_out.set_high(),
            None => {}
        }

        ticker.next().await;
    }
}

/// Encoder and button handling.
///
/// A falling edge on CLK is one detent; the DT level at that moment gives
/// the direction. Inputs are not debounced.
#[embassy_executor::task]
async fn menu_task(
    mut enc_clk: Input<'static>,
    enc_dt: Input<'static>,
    mut button: Input<'static>,
    parameters: &'static ParameterSignal,
) {
    info!("Menu task started");

    let mut menu = Menu::new(&Parameters::default());
    log_menu(&menu);

    loop {
        match select(enc_clk.wait_for_falling_edge(), button.wait_for_falling_edge()).await {
            Either::First(()) => {
                let delta = if enc_dt.is_high() { 1 } else { -1 };
                menu.rotate(delta);
            }
            Either::Second(()) => {
                if let Some(params) = menu.press() {
                    parameters.signal(params);
                    info!("Parameters committed");
                }
            }
        }
        log_menu(&menu);
    }
}

/// Stand-in for a display: log the highlighted line.
fn log_menu(menu: &Menu) {
    let item = &menu.items()[menu.highlighted()];
    match menu.state() {
        MenuState::Browsing { .. } => {
            debug!("> {}: {}", item.kind.label(), menu.parameters().value(item.kind))
        }
        MenuState::Editing { pending, .. } => {
            debug!("* {}: {}", item.kind.label(), pending)
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("randloop-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA → GP16  (p.PIN_16)  MCP4725 at 0x62
    // I2C_SCL → GP17  (p.PIN_17)
    // CLK_IN  → GP22  (p.PIN_22)  inverted, low = clock high
    // GATE    → GP23  (p.PIN_23)  inverted, low = gate on
    // ENC_CLK → GP18  (p.PIN_18)  pull-up
    // ENC_DT  → GP19  (p.PIN_19)  pull-up
    // ENC_SW  → GP20  (p.PIN_20)  active-low, pull-up
    // ———————————————————————————————————————————————————————————————————————

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_17, // SCL
        p.PIN_16, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let mut dac = Mcp4725::new(i2c, DEFAULT_ADDRESS);

    let clock_in = Input::new(p.PIN_22, Pull::Up);
    let gate_out = Output::new(p.PIN_23, Level::High); // gate off

    let enc_clk = Input::new(p.PIN_18, Pull::Up);
    let enc_dt = Input::new(p.PIN_19, Pull::Up);
    let button = Input::new(p.PIN_20, Pull::Up);

    // —— Sequencer ——————————————————————————————————————————————————————————

    let seed = RoscRng.next_u64();
    debug!("RNG seed: {=u64:x}", seed);

    let sequencer = unwrap!(Sequencer::new(
        Parameters::default(),
        SmallRng::seed_from_u64(seed),
    ));

    // Park the output on the scale root until the first clock edge.
    if let Err(e) = dac.write(sequencer.scale().root()).await {
        warn!("Initial DAC write failed: {}", e);
    }

    let parameters: &'static ParameterSignal = PARAMETERS.init(Signal::new());

    // —— Spawn tasks ————————————————————————————————————————————————————————

    spawner.spawn(unwrap!(sequencer_task(
        sequencer, clock_in, gate_out, dac, parameters
    )));
    spawner.spawn(unwrap!(menu_task(enc_clk, enc_dt, button, parameters)));

    info!("All tasks spawned");
}
