//! Code 128 symbol encoding (code sets B and C).

use thiserror::Error;

/// Bar/space widths for symbol values 0..=105, then the stop pattern.
const PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232", "2331112",
];

const START_B: u8 = 104;
const START_C: u8 = 105;
const STOP: u8 = 106;
const MAX_PAYLOAD: usize = 48;

/// Why a payload cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    #[error("barcode payload is empty")]
    Empty,

    #[error("character {0:?} is not encodable in Code 128 set B")]
    UnsupportedChar(char),

    #[error("barcode payload is {0} characters long (max 48)")]
    TooLong(usize),
}

/// Code set chosen for the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSet {
    /// Printable ASCII, one symbol per character.
    B,
    /// Digit pairs, one symbol per two digits.
    C,
}

/// An encoded symbol: values (start, data, check, stop) and the module run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code128 {
    payload: String,
    code_set: CodeSet,
    values: Vec<u8>,
}

impl Code128 {
    /// Encode `payload`, using set C for even-length digit strings and set B
    /// otherwise.
    pub fn encode(payload: &str) -> Result<Self, BarcodeError> {
        if payload.is_empty() {
            return Err(BarcodeError::Empty);
        }
        if payload.chars().count() > MAX_PAYLOAD {
            return Err(BarcodeError::TooLong(payload.chars().count()));
        }

        let all_digits = payload.bytes().all(|b| b.is_ascii_digit());
        let (code_set, mut values) = if all_digits && payload.len() >= 4 && payload.len() % 2 == 0 {
            let pairs = payload
                .as_bytes()
                .chunks(2)
                .map(|pair| (pair[0] - b'0') * 10 + (pair[1] - b'0'));
            (CodeSet::C, std::iter::once(START_C).chain(pairs).collect::<Vec<_>>())
        } else {
            let mut values = vec![START_B];
            for c in payload.chars() {
                let code = c as u32;
                if !(32..=126).contains(&code) {
                    return Err(BarcodeError::UnsupportedChar(c));
                }
                values.push((code - 32) as u8);
            }
            (CodeSet::B, values)
        };

        values.push(checksum(&values));
        values.push(STOP);

        Ok(Self {
            payload: payload.to_string(),
            code_set,
            values,
        })
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn code_set(&self) -> CodeSet {
        self.code_set
    }

    /// Symbol values including start, check and stop symbols.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn check_value(&self) -> u8 {
        self.values[self.values.len() - 2]
    }

    /// Module sequence (`true` = bar), without quiet zones.
    pub fn modules(&self) -> Vec<bool> {
        let mut modules = Vec::with_capacity(self.values.len() * 11 + 2);
        for value in &self.values {
            let pattern = PATTERNS[usize::from(*value)];
            for (idx, width) in pattern.bytes().enumerate() {
                let dark = idx % 2 == 0;
                for _ in 0..(width - b'0') {
                    modules.push(dark);
                }
            }
        }
        modules
    }
}

/// Weighted modulo-103 check over start + data values.
fn checksum(values: &[u8]) -> u8 {
    let sum: u32 = values
        .iter()
        .enumerate()
        .map(|(pos, v)| u32::from(*v) * (pos as u32).max(1))
        .sum();
    (sum % 103) as u8
}
