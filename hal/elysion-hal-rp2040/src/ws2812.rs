//! PIO-driven WS2812 writer
//!
//! One PIO program is loaded per block and shared by every chain; each chain
//! gets its own state machine. Bits are clocked at 800 kHz with ten PIO
//! cycles per bit, the pixel word is shifted out MSB first in GRB order.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, LoadedProgram, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use embassy_time::{block_for, Duration};
use elysion_drivers::ChainWriter;
use fixed::types::U24F8;

/// WS2812 bit rate in kHz
pub const BIT_RATE_KHZ: u32 = 800;

/// PIO cycles spent on one bit (T1 + T2 + T3 of the program below)
pub const CYCLES_PER_BIT: u32 = 10;

/// Idle time that latches a frame into the chain
pub const LATCH_US: u64 = 60;

/// WS2812 program loaded into a PIO block
pub struct Ws2812Program<'d, P: Instance> {
    program: LoadedProgram<'d, P>,
}

impl<'d, P: Instance> Ws2812Program<'d, P> {
    pub fn new(common: &mut Common<'d, P>) -> Self {
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "    out x, 1        side 0 [2]",
            "    jmp !x do_zero  side 1 [1]",
            "    jmp bitloop     side 1 [4]",
            "do_zero:",
            "    nop             side 0 [4]",
            ".wrap",
        );
        Self {
            program: common.load_program(&prg.program),
        }
    }
}

/// One LED chain on a PIO state machine
pub struct Ws2812<'d, P: Instance, const S: usize> {
    sm: StateMachine<'d, P, S>,
}

impl<'d, P: Instance, const S: usize> Ws2812<'d, P, S> {
    pub fn new(
        common: &mut Common<'d, P>,
        mut sm: StateMachine<'d, P, S>,
        pin: Peri<'d, impl PioPin>,
        program: &Ws2812Program<'d, P>,
    ) -> Self {
        let out_pin = common.make_pio_pin(pin);
        sm.set_pin_dirs(Direction::Out, &[&out_pin]);

        let mut cfg = Config::default();
        cfg.use_program(&program.program, &[&out_pin]);

        let clock_khz = U24F8::from_num(clk_sys_freq() / 1000);
        let bit_khz = U24F8::from_num(BIT_RATE_KHZ * CYCLES_PER_BIT);
        cfg.clock_divider = clock_khz / bit_khz;

        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 24,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_enable(true);
        Self { sm }
    }
}

/// Reorder a `0x00RRGGBB` color into the left-aligned GRB word the program shifts out
pub fn grb_word(color: u32) -> u32 {
    let r = (color >> 16) & 0xFF;
    let g = (color >> 8) & 0xFF;
    let b = color & 0xFF;
    (g << 24) | (r << 16) | (b << 8)
}

impl<'d, P: Instance, const S: usize> ChainWriter for Ws2812<'d, P, S> {
    fn write(&mut self, pixels: &[u32]) {
        for &color in pixels {
            let word = grb_word(color);
            while !self.sm.tx().try_push(word) {}
        }
        while !self.sm.tx().empty() {}
        block_for(Duration::from_micros(LATCH_US));
    }
}
