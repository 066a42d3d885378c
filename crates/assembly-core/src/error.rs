use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("failed to parse base document: {0}")]
    Parse(String),

    #[error("failed to render output document: {0}")]
    Render(String),
}
