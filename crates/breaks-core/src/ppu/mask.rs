use bitflags::bitflags;

bitflags! {
    /// PPU mask register (`$2001`).
    ///
    /// Only bits 1 and 2 reach the timing network, as `BGCLIP` and `OBCLIP`.
    /// The rest are carried so a full register value can be written.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// B G R S B s b g
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mask: u8 {
        const GRAYSCALE = 0b0000_0001;
        /// Show background in the leftmost eight pixels (`BGCLIP`).
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;
        /// Show sprites in the leftmost eight pixels (`OBCLIP`).
        const SHOW_SPRITES_LEFT = 0b0000_0100;
        const SHOW_BACKGROUND = 0b0000_1000;
        const SHOW_SPRITES = 0b0001_0000;
        const EMPHASIZE_RED = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl Mask {
    /// True when neither left column is blanked.
    pub fn shows_left_column(self) -> bool {
        self.contains(Mask::SHOW_BACKGROUND_LEFT | Mask::SHOW_SPRITES_LEFT)
    }
}
