use defmt::info;
use embassy_executor::task;
use embassy_time::Timer;
use supercap_power::SuperPower;

#[task]
pub async fn process(power: &'static SuperPower) {
    loop {
        Timer::after_millis(100).await;
        info!("Chassis power: {} W", power.corrected_power());
    }
}
