/// Length of an IATA airport code.
pub const IATA_CODE_LEN: usize = 3;

/// True when `code` is exactly three uppercase ASCII letters (`^[A-Z]{3}$`).
pub fn is_iata_code(code: &str) -> bool {
    code.len() == IATA_CODE_LEN && code.bytes().all(|b| b.is_ascii_uppercase())
}
