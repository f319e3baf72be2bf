#![feature(impl_trait_in_assoc_type)]
#![no_std]
#![no_main]

mod can;
mod report;

use {defmt_rtt as _, panic_probe as _};

use crate::{can::process as can_process, report::process as report_process};
use defmt::{info, unwrap};
use embassy_executor::{main, task, InterruptExecutor, Spawner};
use embassy_stm32::{
    bind_interrupts,
    can::{self as stm32_can, Can},
    interrupt,
    interrupt::InterruptExt,
    pac, peripherals,
    wdg::IndependentWatchdog,
    Config as DeviceConfig,
};
use embassy_time::{Duration, Timer};
use supercap_power::{hardware::HardwareContainer, Config, Runner, SuperPower};

bind_interrupts!(struct Irqs {
    CEC_CAN => stm32_can::Rx0InterruptHandler<peripherals::CAN>, stm32_can::Rx1InterruptHandler<peripherals::CAN>,
               stm32_can::TxInterruptHandler<peripherals::CAN>, stm32_can::SceInterruptHandler<peripherals::CAN>;
});

static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn USART2() {
    unsafe { EXECUTOR_MED.on_interrupt() }
}

static SUPER_POWER: SuperPower = SuperPower::new(Config::DEFAULT);

#[task]
async fn power_process(mut runner: Runner<'static>) -> ! {
    runner.run().await
}

#[main]
async fn main(spawner: Spawner) {
    // HSI oscillator 8 MHz, 48 MHz system frequency
    let mut config = DeviceConfig::default();
    {
        use embassy_stm32::rcc::*;
        config.rcc.hsi = true;
        config.rcc.hse = None;
        config.rcc.pll = Some(Pll {
            src: PllSource::HSI,
            prediv: PllPreDiv::DIV1,
            mul: PllMul::MUL6,
        });
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV1;
    }
    let dev = embassy_stm32::init(config);

    // Reconfigure pins for CAN bus
    pac::SYSCFG.cfgr1().modify(|w| w.set_pa11_pa12_rmp(true));

    let mut dog = IndependentWatchdog::new(dev.IWDG, 100_000);
    dog.unleash();

    // Power task preempts everything on the thread executor
    interrupt::USART2.set_priority(interrupt::Priority::P2);
    let spawner_med = EXECUTOR_MED.start(interrupt::USART2);

    // A missing bus or a refused filter is fatal.
    let mut hw = HardwareContainer::<1>::new();
    unwrap!(hw.add_can("can1", &can::CAN1));
    let runner = unwrap!(SUPER_POWER.install(&hw));
    unwrap!(spawner_med.spawn(power_process(runner)));

    let can = Can::new(dev.CAN, dev.PA11, dev.PA12, Irqs);
    unwrap!(spawner.spawn(can_process(can)));
    unwrap!(spawner.spawn(report_process(&SUPER_POWER)));

    info!("System startup");
    loop {
        dog.pet();
        Timer::after(Duration::from_millis(10)).await;
    }
}
