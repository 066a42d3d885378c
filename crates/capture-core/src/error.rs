use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to encode signature image: {0}")]
    Encode(#[from] image::ImageError),
}
