//! Which RP2040 peripheral is wired to which part of the Medibox.
use assign_resources::assign_resources;
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::peripherals::{I2C0, PIO0};
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_rp::{Peri, bind_interrupts, peripherals};

// group the peripherals by the part of the device they belong to, main.rs hands them out
assign_resources! {
    buttons: ButtonResources {
        up: PIN_20,
        down: PIN_21,
        ok: PIN_22,
        cancel: PIN_19,
    },
    display: DisplayResources {
        scl: PIN_13,
        sda: PIN_12,
        i2c0: I2C0,
    },
    buzzer: BuzzerResources {
        pin: PIN_15,
        slice: PWM_SLICE7,
    },
    indicator: IndicatorResources {
        led: PIN_14,
    },
    sensor: SensorResources {
        data: PIN_16,
    },
    wifi: WifiResources {
        pwr_pin: PIN_23,
        cs_pin: PIN_25,
        pio_sm: PIO0,
        dio_pin: PIN_24,
        clk_pin: PIN_29,
        dma_ch: DMA_CH0,
    },
    rtc: RtcResources {
        rtc_inst: RTC,
    },
}

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});
