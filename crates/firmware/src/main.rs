//! Lark MP3 Player Firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI. Creates the shared device
//! state, starts the tick source, arms the watchdog, brings up the priority
//! executors, and spawns the control unit — which spawns everything else.
//! Never returns.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use {defmt_rtt as _, panic_probe as _};

use embassy_executor::{Executor, InterruptExecutor, SendSpawner};
use embassy_stm32::gpio::{AnyPin, Input, Level, Output, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::spi::{Config as SpiConfig, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_stm32::peripherals;
use embassy_time::{Delay, Instant};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;

use control::SharedDeviceState;
use firmware::tasks::input_reader::{ButtonMap, NUM_BUTTONS};
use firmware::tasks::{codec_feed, control_unit, display, input_reader};
use firmware::tick::SysTickSource;
use firmware::{boot, CodecFeed, InputReader, StatusDisplay};
use platform::tick::{TickCallback, TickSource};
use platform::{InputPinAdapter, OutputPinAdapter, SliceSource, SpiDeviceStream};

// ---------------------------------------------------------------------------
// Concrete task types
// ---------------------------------------------------------------------------

type ButtonPin = InputPinAdapter<Input<'static, AnyPin>>;
type PanelReader = InputReader<ButtonPin, NUM_BUTTONS>;

type CodecSpi = Spi<'static, peripherals::SPI1, peripherals::DMA1_CH0, peripherals::DMA1_CH1>;
type CodecStream = SpiDeviceStream<ExclusiveDevice<CodecSpi, Output<'static, AnyPin>, Delay>>;
type Codec = CodecFeed<
    InputPinAdapter<Input<'static, AnyPin>>,
    OutputPinAdapter<Output<'static, AnyPin>>,
    CodecStream,
    SliceSource<'static>,
>;

type DisplaySpi = Spi<'static, peripherals::SPI2, peripherals::DMA1_CH2, peripherals::DMA1_CH3>;
type DisplayStream = SpiDeviceStream<ExclusiveDevice<DisplaySpi, Output<'static, AnyPin>, Delay>>;
type Display = StatusDisplay<DisplayStream>;

type Watchdog = IndependentWatchdog<'static, peripherals::IWDG1>;

// Built-in media bytes served by the chunk source until storage streaming
// lands: one period of an 8-bit PCM sine.
static STARTUP_TONE: [u8; 8] = [0x00, 0x5A, 0x7F, 0x5A, 0x00, 0xA6, 0x81, 0xA6];

// ---------------------------------------------------------------------------
// Executors — one per priority level
// ---------------------------------------------------------------------------

// High: control unit + input reader. Medium: codec feed (deadline on the
// data-request line). Low (thread mode): display rendering.
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

static SHARED: StaticCell<SharedDeviceState> = StaticCell::new();

#[interrupt]
unsafe fn UART4() {
    // SAFETY: UART4 is used solely as the high executor's software
    // interrupt; the peripheral itself is never enabled.
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[interrupt]
unsafe fn UART5() {
    // SAFETY: UART5 is used solely as the medium executor's software
    // interrupt; the peripheral itself is never enabled.
    unsafe { EXECUTOR_MED.on_interrupt() }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Control unit: spawns the feed and input tasks at their priorities, then
/// supervises readiness and feeds the hardware watchdog.
#[embassy_executor::task]
async fn control_unit_task(
    shared: &'static SharedDeviceState,
    mut watchdog: Watchdog,
    high: SendSpawner,
    med: SendSpawner,
    reader: PanelReader,
    codec: Codec,
) -> ! {
    info!("control unit: spawning tasks");
    unwrap!(high.spawn(input_reader_task(shared, reader)));
    unwrap!(med.spawn(codec_feed_task(shared, codec)));
    control_unit::run(shared, move || watchdog.pet()).await
}

#[embassy_executor::task]
async fn input_reader_task(shared: &'static SharedDeviceState, reader: PanelReader) -> ! {
    reader.run(shared).await
}

#[embassy_executor::task]
async fn codec_feed_task(shared: &'static SharedDeviceState, codec: Codec) -> ! {
    codec.run(shared).await
}

#[embassy_executor::task]
async fn display_task(shared: &'static SharedDeviceState, status: Display) -> ! {
    status.run(shared).await
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_stm32::init(Default::default());
    info!(
        "Lark {=str} starting — {=str}",
        platform::config::APP_VERSION,
        platform::config::APP_TYPE
    );

    // Step 1: the shared state exists before any task can observe it.
    let shared: &'static SharedDeviceState = SHARED.init(SharedDeviceState::new());

    // Step 2: tick source — configure before start, per the capability
    // contract. The registered callback maintains the scheduler tick count.
    //
    // SAFETY: embassy_stm32::init() may already have claimed the Cortex-M
    // peripherals singleton through its own take()/steal() path; only SYST
    // is used here, and nothing else in the firmware touches it.
    let cp = unsafe { cortex_m::Peripherals::steal() };
    let mut tick = SysTickSource::new(cp.SYST, boot::CORE_CLOCK_HZ);
    tick.configure(1);
    let actual_hz = tick.set_tick_frequency(boot::SCHEDULER_TICK_HZ);
    info!("scheduler tick: {=u32} Hz", actual_hz);
    tick.register_tick_callback(TickCallback::new(firmware::tick::scheduler_tick));
    unwrap!(tick.start());

    // Step 3: watchdog. Once unleashed it cannot be stopped — the control
    // unit MUST pet it every supervisory cycle.
    let mut watchdog = IndependentWatchdog::new(p.IWDG1, boot::watchdog_timeout_us());
    watchdog.unleash();
    info!("IWDG armed: timeout={=u32}ms", boot::WATCHDOG_TIMEOUT_MS);

    // Front-panel buttons: active-low with internal pull-ups.
    //   PA0 = play/pause   PA1 = play   PA2 = pause   PA3 = stop
    let buttons: [ButtonPin; NUM_BUTTONS] = [
        InputPinAdapter::active_low(Input::new(p.PA0, Pull::Up).degrade()),
        InputPinAdapter::active_low(Input::new(p.PA1, Pull::Up).degrade()),
        InputPinAdapter::active_low(Input::new(p.PA2, Pull::Up).degrade()),
        InputPinAdapter::active_low(Input::new(p.PA3, Pull::Up).degrade()),
    ];
    let reader = InputReader::new(buttons, ButtonMap::default_map(), Instant::now());

    // Codec wiring: SPI1 data port, PE3 data-request, PB0 reset (active low).
    let mut codec_spi_config = SpiConfig::default();
    codec_spi_config.frequency = Hertz(4_000_000);
    let codec_spi = Spi::new(
        p.SPI1, p.PA5, // SCK
        p.PA7, // MOSI
        p.PA6, // MISO (not used but required by HAL)
        p.DMA1_CH0, p.DMA1_CH1, codec_spi_config,
    );
    let codec_cs = Output::new(p.PB1, Level::High, Speed::VeryHigh).degrade();
    let codec_dev = unwrap!(ExclusiveDevice::new(codec_spi, codec_cs, Delay));
    let codec = CodecFeed::new(
        InputPinAdapter::new(Input::new(p.PE3, Pull::None).degrade()),
        OutputPinAdapter::active_low(Output::new(p.PB0, Level::High, Speed::Low).degrade()),
        SpiDeviceStream::new(codec_dev),
        SliceSource::new(&STARTUP_TONE),
    );

    // Display wiring: SPI2 command port.
    let mut display_spi_config = SpiConfig::default();
    display_spi_config.frequency = Hertz(1_000_000);
    let display_spi = Spi::new(
        p.SPI2, p.PB13, // SCK
        p.PB15, // MOSI
        p.PB14, // MISO (not used but required by HAL)
        p.DMA1_CH2, p.DMA1_CH3, display_spi_config,
    );
    let display_cs = Output::new(p.PB12, Level::High, Speed::VeryHigh).degrade();
    let display_dev = unwrap!(ExclusiveDevice::new(display_spi, display_cs, Delay));
    let status = StatusDisplay::new(SpiDeviceStream::new(display_dev));

    // Step 4: priority executors. Lower number = higher priority.
    interrupt::UART4.set_priority(Priority::P5);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::UART4);
    interrupt::UART5.set_priority(Priority::P6);
    let med_spawner = EXECUTOR_MED.start(interrupt::UART5);

    // Step 5: the control unit owns the rest of startup.
    unwrap!(high_spawner.spawn(control_unit_task(
        shared,
        watchdog,
        high_spawner,
        med_spawner,
        reader,
        codec,
    )));

    info!(
        "periods: input={=u64}ms codec={=u64}ms display={=u64}ms control={=u64}ms",
        input_reader::P_INPUT.as_millis(),
        codec_feed::P_CODEC.as_millis(),
        display::P_DISPLAY.as_millis(),
        control_unit::P_CONTROL.as_millis(),
    );

    // Thread-mode executor runs the lowest-priority task and never returns.
    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        unwrap!(spawner.spawn(display_task(shared, status)));
    })
}
