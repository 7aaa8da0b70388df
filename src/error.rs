#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("hex decode error: {reason}")]
    HexDecode { reason: String },
}
