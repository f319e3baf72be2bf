use can_messages::BITRATE;
use defmt::{info, warn};
use embassy_executor::task;
use embassy_stm32::can::{filter::Mask32, frame::Frame, Can, CanRx, Fifo, Id};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use supercap_power::{bus::RxDispatcher, frame::ClassicFrame};

/// Receive hooks registered on the chassis bus.
pub static CAN1: RxDispatcher<CriticalSectionRawMutex, 4> = RxDispatcher::new();

#[task]
pub async fn process(mut can: Can<'static>) {
    can.set_bitrate(BITRATE);
    can.set_tx_fifo_scheduling(true);
    can.enable().await;
    info!("CAN initialized.");
    let (_tx, rx) = can.split();
    receive(rx).await;
}

async fn receive(mut rx: CanRx<'static>) {
    rx.modify_filters()
        .enable_bank(0, Fifo::Fifo0, Mask32::accept_all());
    loop {
        match rx.read().await {
            Ok(envelope) => {
                if let Some(frame) = to_classic(&envelope.frame) {
                    CAN1.dispatch(&frame, false);
                }
            }
            Err(e) => warn!("CAN bus error: {}", e),
        }
    }
}

fn to_classic(frame: &Frame) -> Option<ClassicFrame> {
    match frame.id() {
        Id::Standard(id) => ClassicFrame::new_standard(id.as_raw(), frame.data()).ok(),
        Id::Extended(id) => ClassicFrame::new_extended(id.as_raw(), frame.data()).ok(),
    }
}
