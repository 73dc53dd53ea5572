//! # Resources
//! Groups the RP2040 peripherals by the task that owns them. The groups are split off in `main`.
use assign_resources::assign_resources;
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::peripherals::{I2C0, PIO0};
use embassy_rp::pio::InterruptHandler;
use embassy_rp::{Peri, bind_interrupts, peripherals};

assign_resources! {
    btn_green: GreenButtonResources {
        button_pin: PIN_20,
    },
    btn_blue: BlueButtonResources {
        button_pin: PIN_21,
    },
    btn_yellow: YellowButtonResources {
        button_pin: PIN_22,
    },
    wifi: WifiResources {
        pwr_pin: PIN_23,
        cs_pin: PIN_25,
        pio_sm: PIO0,
        dio_pin: PIN_24,
        clk_pin: PIN_29,
        dma_ch: DMA_CH0,
    },
    display: DisplayResources {
        scl: PIN_13,
        sda: PIN_12,
        i2c0: I2C0,
    },
    alarm_output: AlarmOutputResources {
        output_pin: PIN_16,
    },
}

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});
