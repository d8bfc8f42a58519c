use std::path::{Path, PathBuf};

pub type PfpResult<T> = Result<T, PfpError>;

#[derive(thiserror::Error, Debug)]
pub enum PfpError {
    #[error("layout error: {0}")]
    Layout(String),

    #[error("composite error: {0}")]
    Composite(String),

    #[error("naming error: {0}")]
    Naming(String),

    #[error("io error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error at '{}': {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PfpError {
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    pub fn naming(msg: impl Into<String>) -> Self {
        Self::Naming(msg.into())
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn image(path: impl AsRef<Path>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
