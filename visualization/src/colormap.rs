//! 256-entry color lookup tables.

use log::debug;
use specgram_core::{Error, Rgba, TRANSPARENT};

/// Number of entries in every color map.
pub const COLOR_MAP_SIZE: usize = 256;

/// Maps an intensity index onto an RGBA color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    table: Vec<Rgba>,
}

impl ColorMap {
    /// The default perceptual jet-style gradient, black through red to white.
    pub fn jet() -> Self {
        Self {
            table: JET.to_vec(),
        }
    }

    /// Linear black to white ramp.
    pub fn grayscale() -> Self {
        Self {
            table: (0..=255u8).map(|v| [v, v, v, 255]).collect(),
        }
    }

    /// Build a map from caller supplied entries.
    ///
    /// Every entry must hold exactly four channel values. Short maps are
    /// padded to 256 entries with their last entry; entries past 256 are
    /// dropped.
    pub fn build<E: AsRef<[u8]>>(entries: &[E]) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(Error::InvalidColorMap("no entries".to_string()));
        }

        let mut table = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let channels = entry.as_ref();
                Rgba::try_from(channels).map_err(|_| {
                    Error::InvalidColorMap(format!(
                        "entry {} has {} channels, expected 4",
                        i,
                        channels.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if table.len() > COLOR_MAP_SIZE {
            debug!("Dropping {} color map entries past 256", table.len() - COLOR_MAP_SIZE);
            table.truncate(COLOR_MAP_SIZE);
        }

        if let Some(&last) = table.last() {
            if table.len() < COLOR_MAP_SIZE {
                debug!(
                    "Padding {} color map entries with the last color",
                    COLOR_MAP_SIZE - table.len()
                );
                table.resize(COLOR_MAP_SIZE, last);
            }
        }

        Ok(Self { table })
    }

    /// Color for `index`, clamped into 0..=255.
    pub fn lookup(&self, index: i64) -> Rgba {
        self.table[index.clamp(0, COLOR_MAP_SIZE as i64 - 1) as usize]
    }

    /// Color for an already clamped intensity.
    #[inline]
    pub fn color(&self, intensity: u8) -> Rgba {
        self.table[intensity as usize]
    }

    /// Fill color for a cleared surface.
    pub fn background(&self) -> Rgba {
        self.table[0]
    }

    /// Color used where no sample exists.
    pub fn sentinel(&self) -> Rgba {
        TRANSPARENT
    }

    pub fn entries(&self) -> &[Rgba] {
        &self.table
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::jet()
    }
}

// Matlab style jet, darkened toward black at the low end.
#[rustfmt::skip]
const JET: [Rgba; COLOR_MAP_SIZE] = [
    [0, 0, 0, 255], [3, 1, 1, 255], [7, 2, 1, 255], [10, 3, 2, 255],
    [13, 4, 2, 255], [16, 5, 3, 255], [18, 6, 3, 255], [20, 7, 4, 255],
    [22, 8, 4, 255], [24, 9, 5, 255], [26, 10, 5, 255], [27, 11, 6, 255],
    [29, 11, 6, 255], [30, 12, 7, 255], [32, 13, 8, 255], [33, 14, 8, 255],
    [34, 15, 9, 255], [36, 15, 9, 255], [37, 16, 10, 255], [38, 16, 10, 255],
    [40, 17, 11, 255], [41, 17, 11, 255], [43, 18, 12, 255], [44, 18, 12, 255],
    [46, 18, 13, 255], [47, 19, 13, 255], [49, 19, 14, 255], [50, 19, 14, 255],
    [52, 20, 15, 255], [54, 20, 15, 255], [55, 20, 15, 255], [57, 21, 16, 255],
    [58, 21, 16, 255], [60, 21, 16, 255], [62, 22, 17, 255], [63, 22, 17, 255],
    [65, 22, 17, 255], [66, 23, 18, 255], [68, 23, 18, 255], [70, 23, 18, 255],
    [71, 24, 19, 255], [73, 24, 19, 255], [75, 24, 19, 255], [76, 25, 20, 255],
    [78, 25, 20, 255], [80, 25, 20, 255], [81, 25, 20, 255], [83, 26, 21, 255],
    [85, 26, 21, 255], [86, 26, 21, 255], [88, 26, 21, 255], [90, 27, 22, 255],
    [91, 27, 22, 255], [93, 27, 22, 255], [95, 27, 22, 255], [97, 28, 23, 255],
    [98, 28, 23, 255], [100, 28, 23, 255], [102, 28, 23, 255], [104, 29, 24, 255],
    [105, 29, 24, 255], [107, 29, 24, 255], [109, 29, 24, 255], [111, 29, 25, 255],
    [112, 30, 25, 255], [114, 30, 25, 255], [116, 30, 25, 255], [118, 30, 26, 255],
    [119, 30, 26, 255], [121, 31, 26, 255], [123, 31, 26, 255], [125, 31, 27, 255],
    [127, 31, 27, 255], [128, 31, 27, 255], [130, 31, 27, 255], [132, 32, 28, 255],
    [134, 32, 28, 255], [136, 32, 28, 255], [137, 32, 28, 255], [139, 32, 29, 255],
    [141, 32, 29, 255], [143, 32, 29, 255], [145, 33, 29, 255], [147, 33, 30, 255],
    [148, 33, 30, 255], [150, 33, 30, 255], [152, 33, 31, 255], [154, 33, 31, 255],
    [156, 33, 31, 255], [158, 33, 31, 255], [160, 33, 32, 255], [161, 34, 32, 255],
    [163, 34, 32, 255], [165, 34, 32, 255], [167, 34, 33, 255], [169, 34, 33, 255],
    [171, 34, 33, 255], [173, 34, 33, 255], [175, 34, 34, 255], [177, 34, 34, 255],
    [178, 34, 34, 255], [179, 36, 34, 255], [180, 38, 34, 255], [181, 40, 33, 255],
    [182, 42, 33, 255], [183, 44, 33, 255], [184, 45, 33, 255], [185, 47, 32, 255],
    [186, 49, 32, 255], [187, 50, 32, 255], [188, 52, 31, 255], [189, 53, 31, 255],
    [190, 55, 31, 255], [191, 56, 31, 255], [192, 58, 30, 255], [193, 59, 30, 255],
    [194, 61, 30, 255], [195, 62, 29, 255], [196, 64, 29, 255], [197, 65, 28, 255],
    [198, 66, 28, 255], [199, 68, 28, 255], [200, 69, 27, 255], [201, 71, 27, 255],
    [202, 72, 26, 255], [203, 73, 26, 255], [204, 75, 25, 255], [205, 76, 25, 255],
    [206, 77, 24, 255], [207, 79, 24, 255], [208, 80, 23, 255], [209, 82, 23, 255],
    [210, 83, 22, 255], [211, 84, 21, 255], [212, 85, 21, 255], [213, 87, 20, 255],
    [214, 88, 19, 255], [215, 89, 19, 255], [216, 91, 18, 255], [217, 92, 17, 255],
    [218, 93, 16, 255], [219, 95, 15, 255], [220, 96, 14, 255], [221, 97, 13, 255],
    [222, 98, 12, 255], [223, 100, 11, 255], [224, 101, 9, 255], [225, 102, 8, 255],
    [226, 104, 7, 255], [227, 105, 5, 255], [227, 107, 5, 255], [227, 109, 6, 255],
    [228, 110, 7, 255], [228, 112, 7, 255], [228, 114, 8, 255], [228, 116, 8, 255],
    [229, 118, 9, 255], [229, 119, 10, 255], [229, 121, 10, 255], [229, 123, 11, 255],
    [229, 124, 12, 255], [230, 126, 12, 255], [230, 128, 13, 255], [230, 130, 14, 255],
    [230, 131, 14, 255], [230, 133, 15, 255], [230, 135, 15, 255], [231, 136, 16, 255],
    [231, 138, 17, 255], [231, 140, 17, 255], [231, 141, 18, 255], [231, 143, 19, 255],
    [231, 145, 19, 255], [231, 146, 20, 255], [232, 148, 21, 255], [232, 150, 21, 255],
    [232, 151, 22, 255], [232, 153, 22, 255], [232, 154, 23, 255], [232, 156, 24, 255],
    [232, 158, 24, 255], [232, 159, 25, 255], [232, 161, 26, 255], [232, 162, 26, 255],
    [233, 164, 27, 255], [233, 166, 27, 255], [233, 167, 28, 255], [233, 169, 29, 255],
    [233, 170, 29, 255], [233, 172, 30, 255], [233, 174, 30, 255], [233, 175, 31, 255],
    [233, 177, 32, 255], [233, 178, 32, 255], [233, 180, 33, 255], [233, 181, 34, 255],
    [233, 183, 34, 255], [233, 185, 35, 255], [233, 186, 35, 255], [233, 188, 36, 255],
    [233, 189, 37, 255], [233, 191, 37, 255], [233, 192, 38, 255], [233, 194, 38, 255],
    [233, 195, 39, 255], [233, 197, 40, 255], [233, 199, 40, 255], [233, 200, 41, 255],
    [232, 202, 42, 255], [232, 203, 42, 255], [232, 205, 43, 255], [232, 206, 43, 255],
    [232, 208, 44, 255], [232, 209, 45, 255], [232, 211, 45, 255], [232, 213, 46, 255],
    [232, 214, 47, 255], [232, 216, 47, 255], [231, 217, 48, 255], [231, 219, 48, 255],
    [231, 220, 49, 255], [231, 222, 50, 255], [231, 223, 50, 255], [231, 225, 51, 255],
    [230, 226, 52, 255], [230, 228, 52, 255], [230, 229, 53, 255], [231, 231, 60, 255],
    [233, 231, 69, 255], [234, 232, 78, 255], [236, 233, 87, 255], [237, 234, 94, 255],
    [238, 235, 102, 255], [240, 236, 109, 255], [241, 236, 117, 255], [242, 237, 124, 255],
    [243, 238, 131, 255], [245, 239, 137, 255], [246, 240, 144, 255], [247, 241, 151, 255],
    [248, 241, 158, 255], [249, 242, 164, 255], [249, 243, 171, 255], [250, 244, 177, 255],
    [251, 245, 184, 255], [252, 246, 190, 255], [252, 247, 197, 255], [253, 248, 203, 255],
    [253, 249, 210, 255], [254, 249, 216, 255], [254, 250, 223, 255], [254, 251, 229, 255],
    [255, 252, 236, 255], [255, 253, 242, 255], [255, 254, 249, 255], [255, 255, 255, 255],
];
